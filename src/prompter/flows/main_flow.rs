use std::io::{self, IsTerminal, Write};

use crate::command::args::tokenize;
use crate::command::command_parser::CommandParser;
use crate::command::commands::{CommandDyn, Outcome, PendingAction, render_active};
use crate::core::context::AppContext;
use crate::errors::Result;
use crate::logging::{LogTarget, Logger};
use crate::prompter::models::{Flow, FlowCtrl, YesNo};
use crate::ui::chrome::UiChrome;
use crate::ui::width_util::WidthUtil;

/// The command prompt. Each line is tokenized, resolved and executed
/// against the shared [`AppContext`]; a command that needs a Y/N answer
/// leaves a pending action that the next line resolves.
pub struct MainFlow<'a> {
    ctx: &'a mut AppContext,
    command_parser: CommandParser,
    logger: Logger,
    out: Box<dyn Write + 'a>,
    chrome: Option<UiChrome>,
    pending: Option<PendingAction>,
}

impl<'a> MainFlow<'a> {
    pub fn new(ctx: &'a mut AppContext) -> Self {
        let styled = io::stdout().is_terminal();
        let mut flow = Self::with_output(ctx, Box::new(io::stdout()));
        if styled {
            flow.chrome = Some(UiChrome::new());
        }
        flow
    }

    /// Unstyled flow writing to `out`.
    pub fn with_output(ctx: &'a mut AppContext, out: Box<dyn Write + 'a>) -> Self {
        let logger = ctx.logger.clone();
        Self {
            ctx,
            command_parser: CommandParser::new(),
            logger,
            out,
            chrome: None,
            pending: None,
        }
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }
}

impl<'a> Flow for MainFlow<'a> {
    fn render(&mut self) -> Result<()> {
        self.print_startup()?;
        self.print_prompt()?;
        Ok(())
    }

    fn handle_input(&mut self, input: &str) -> Result<FlowCtrl> {
        self.prepare_output_space()?;
        let line = input.trim();

        if let Some(action) = self.pending.take() {
            self.answer_pending(action, line)?;
            return Ok(FlowCtrl::Continue);
        }
        if let Some(ctrl) = self.handle_non_command(line) {
            return Ok(ctrl);
        }

        let tokens = match tokenize(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.logger.error(
                    format!("Could not read '{}'. {err}", masked_line(line)),
                    LogTarget::ConsoleAndFile,
                );
                return Ok(FlowCtrl::Continue);
            }
        };
        let Some((raw_command, raw_args)) = tokens.split_first() else {
            return Ok(FlowCtrl::Continue);
        };

        let cmd = match self.resolve_command(raw_command, raw_args) {
            Some(cmd) => cmd,
            None => return Ok(FlowCtrl::Continue),
        };

        self.log_command_run(raw_command, line);
        self.execute_command(raw_command, cmd);
        self.out.flush()?;

        Ok(FlowCtrl::Continue)
    }
}

impl<'a> MainFlow<'a> {
    fn print_startup(&mut self) -> Result<()> {
        if self.ctx.startup_displayed {
            return Ok(());
        }
        let mut banner = Vec::new();
        UiChrome::new().render_banner(&mut banner)?;
        let banner = String::from_utf8_lossy(&banner);
        if self.chrome.is_some() {
            write!(self.out, "{banner}")?;
        } else {
            write!(self.out, "{}", WidthUtil::strip_ansi(&banner))?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "Type 'help' for the list of commands.")?;
        writeln!(self.out)?;
        writeln!(self.out, "Config path: {}", self.ctx.paths.config_path.display())?;
        writeln!(self.out, "Data path: {}", self.ctx.paths.data_dir.display())?;
        writeln!(self.out, "Logs path: {}", self.ctx.paths.logs_dir.display())?;
        writeln!(self.out)?;
        self.ctx.startup_displayed = true;

        self.ctx.start();
        render_active(self.ctx, self.out.as_mut())?;
        Ok(())
    }

    fn print_prompt(&mut self) -> Result<()> {
        let prompt = match &self.pending {
            Some(action) => format!("{} ", action.prompt()),
            None => "> ".to_string(),
        };
        match &self.chrome {
            Some(chrome) => chrome.render_prompt(&prompt, self.out.as_mut())?,
            None => {
                write!(self.out, "{prompt}")?;
                self.out.flush()?;
            }
        }
        Ok(())
    }

    fn prepare_output_space(&mut self) -> Result<()> {
        if let Some(chrome) = &self.chrome {
            chrome.render_prompt_bottom_padding(self.out.as_mut())?;
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn answer_pending(&mut self, action: PendingAction, line: &str) -> Result<()> {
        let accepted = match YesNo::parse(line) {
            Some(answer) => answer == YesNo::Yes,
            None => {
                writeln!(self.out, "Please answer Y or N.")?;
                self.pending = Some(action);
                return Ok(());
            }
        };
        if let Err(err) = action.resolve(self.ctx, accepted, self.out.as_mut()) {
            self.logger.error(
                format!("Command execution failed. {err}"),
                LogTarget::ConsoleAndFile,
            );
        }
        self.out.flush()?;
        Ok(())
    }

    fn handle_non_command(&self, line: &str) -> Option<FlowCtrl> {
        if line.is_empty() {
            return Some(FlowCtrl::Continue);
        }
        if line.eq_ignore_ascii_case("exit") {
            return Some(FlowCtrl::Finish);
        }
        None
    }

    fn resolve_command<'b>(&self, raw_command: &str, args: &'b [String]) -> Option<CommandDyn<'b>> {
        match self.command_parser.parse(raw_command, args) {
            Ok(cmd) => Some(cmd),
            Err(err) => {
                self.logger.error(
                    format!("Command resolution failed for '{raw_command}'. {err}"),
                    LogTarget::ConsoleAndFile,
                );
                None
            }
        }
    }

    fn log_command_run(&self, raw_command: &str, line: &str) {
        if raw_command.eq_ignore_ascii_case("log") {
            return;
        }
        self.logger
            .info(format!("Command run: {}", masked_line(line)), LogTarget::FileOnly);
    }

    fn execute_command(&mut self, raw_command: &str, cmd: CommandDyn<'_>) {
        match cmd.execute(self.ctx, self.out.as_mut()) {
            Ok(Outcome::Done) => {}
            Ok(Outcome::Confirm(action)) => self.pending = Some(action),
            Err(err) => self.handle_command_error(raw_command, err.to_string()),
        }
    }

    fn handle_command_error(&self, raw_command: &str, err_text: String) {
        if let Some(usage_error) = self.format_usage_error(raw_command, &err_text) {
            self.logger
                .error(usage_error.console_msg, LogTarget::ConsoleOnly);
            self.logger.error(usage_error.file_msg, LogTarget::FileOnly);
            return;
        }

        self.logger.error(
            format!("Command execution failed for '{raw_command}'. {err_text}"),
            LogTarget::ConsoleAndFile,
        );
    }

    fn format_usage_error(&self, raw_command: &str, err_text: &str) -> Option<UsageErrorMessage> {
        let (head, tail) = err_text.split_once("\nUsage:")?;
        let console_msg =
            format!("Command execution failed for '{raw_command}'. {head}\nUsage:{tail}");
        let file_msg = format!(
            "Command execution failed for '{raw_command}'. {}",
            head.trim()
        );
        Some(UsageErrorMessage {
            console_msg,
            file_msg,
        })
    }
}

/// A `login` line with everything after the username replaced, so
/// passwords never reach the log.
fn masked_line(line: &str) -> String {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(cmd), Some(user), Some(_)) if cmd.eq_ignore_ascii_case("login") => {
            format!("{cmd} {user} ***")
        }
        _ => line.to_string(),
    }
}

struct UsageErrorMessage {
    console_msg: String,
    file_msg: String,
}
