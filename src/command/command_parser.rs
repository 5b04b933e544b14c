use crate::command::command_resolver::{
    CommandResolver, ScheduleResolver, SessionResolver, ToolResolver, ViewResolver,
};
use crate::command::commands::CommandDyn;
use crate::errors::{Error, Result};

/// First resolver that claims the command word builds the command.
pub struct CommandParser {
    registry: Vec<Box<dyn CommandResolver>>,
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandParser {
    pub fn new() -> Self {
        Self {
            registry: vec![
                Box::new(SessionResolver),
                Box::new(ViewResolver),
                Box::new(ScheduleResolver),
                Box::new(ToolResolver),
            ],
        }
    }

    pub fn parse<'a>(&self, command: &str, args: &'a [String]) -> Result<CommandDyn<'a>> {
        for r in &self.registry {
            if r.can_resolve(command) {
                return r.resolve(command, args);
            }
        }
        Err(Error::UnknownCommand(command.to_string()))
    }
}
