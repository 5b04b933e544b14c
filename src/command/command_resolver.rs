use crate::command::commands::{
    CommandDyn, ConfigCommand, HelpCommand, LogCommand, ScheduleAction, ScheduleCommand,
    SessionAction, SessionCommand, SwapCommand, UploadCommand, ViewAction, ViewCommand,
};
use crate::errors::{Error, Result};
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumIter as EnumIterDerive, EnumString};

pub trait CommandResolver {
    fn can_resolve(&self, command: &str) -> bool;
    fn resolve<'a>(&self, command: &str, args: &'a [String]) -> Result<CommandDyn<'a>>;
}

fn parse_word<T: FromStr>(command: &str) -> Option<T> {
    T::from_str(command.trim()).ok()
}

/// `role`, `login`, `logout`.
pub struct SessionResolver;

impl CommandResolver for SessionResolver {
    fn can_resolve(&self, command: &str) -> bool {
        parse_word::<SessionAction>(command).is_some()
    }

    fn resolve<'a>(&self, command: &str, args: &'a [String]) -> Result<CommandDyn<'a>> {
        match parse_word::<SessionAction>(command) {
            Some(action) => Ok(Box::new(SessionCommand::new(action, args))),
            None => Err(Error::unknown(command)),
        }
    }
}

/// `view`, `show`.
pub struct ViewResolver;

impl CommandResolver for ViewResolver {
    fn can_resolve(&self, command: &str) -> bool {
        parse_word::<ViewAction>(command).is_some()
    }

    fn resolve<'a>(&self, command: &str, args: &'a [String]) -> Result<CommandDyn<'a>> {
        match parse_word::<ViewAction>(command) {
            Some(action) => Ok(Box::new(ViewCommand::new(action, args))),
            None => Err(Error::unknown(command)),
        }
    }
}

/// Period moves, the picker and grid edits.
pub struct ScheduleResolver;

impl CommandResolver for ScheduleResolver {
    fn can_resolve(&self, command: &str) -> bool {
        parse_word::<ScheduleAction>(command).is_some()
    }

    fn resolve<'a>(&self, command: &str, args: &'a [String]) -> Result<CommandDyn<'a>> {
        match parse_word::<ScheduleAction>(command) {
            Some(action) => Ok(Box::new(ScheduleCommand::new(action, args))),
            None => Err(Error::unknown(command)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr, EnumIterDerive)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum ToolCommand {
    Swap,
    Upload,
    Config,
    Log,
    Help,
}

pub struct ToolResolver;

impl CommandResolver for ToolResolver {
    fn can_resolve(&self, command: &str) -> bool {
        parse_word::<ToolCommand>(command).is_some()
    }

    fn resolve<'a>(&self, command: &str, args: &'a [String]) -> Result<CommandDyn<'a>> {
        let Some(tool) = parse_word::<ToolCommand>(command) else {
            return Err(Error::unknown(command));
        };
        let cmd: CommandDyn<'a> = match tool {
            ToolCommand::Swap => Box::new(SwapCommand::new(args)),
            ToolCommand::Upload => Box::new(UploadCommand::new(args)),
            ToolCommand::Config => Box::new(ConfigCommand::new(args)),
            ToolCommand::Log => Box::new(LogCommand::new(args)),
            ToolCommand::Help => Box::new(HelpCommand::new(args)),
        };
        Ok(cmd)
    }
}
