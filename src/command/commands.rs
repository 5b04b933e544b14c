use crate::command::args::ArgList;
use crate::core::context::{ActiveView, AppContext};
use crate::core::screen::ScheduleScreen;
use crate::core::swap::{Removal, SwapDraft, SwapFeed};
use crate::core::types::{Date, Role, View};
use crate::errors::{Error, Result};
use crate::logging::LogTarget;
use crate::ui::display_manager::DisplayManager;
use std::io::Write;
use std::path::Path;
use strum_macros::{AsRefStr, Display, EnumIter as EnumIterDerive, EnumString};

/// Every command with a one-line description, in the order `help` lists them.
pub const HELP_ENTRIES: &[(&str, &str)] = &[
    ("role <admin|client>", "Choose who is signing in"),
    ("login <username> <password>", "Sign in"),
    ("view <dashboard|weekly|monthly|swap>", "Open a view"),
    ("show", "Redraw the current view"),
    ("prev | next | today", "Move the schedule period"),
    ("pick [date]", "Open the date picker"),
    ("pick day|month|year <n>", "Change the picker's staged date"),
    ("pick ok | pick cancel", "Jump to the staged date or close the picker"),
    ("select <date>", "Highlight a date"),
    ("cell <day> <employee>", "Select or unselect a cell"),
    ("edit", "Show the shift of the first selected cell"),
    ("apply <#|label|off>", "Set every selected cell"),
    ("save", "Keep this period's edits"),
    (
        "swap add <employee1> <employee2> <date> <remark>",
        "Request a shift swap",
    ),
    ("swap show <id>", "Show a swap request in full"),
    ("swap del <id>", "Delete a swap request"),
    ("upload <path>", "Upload an attachment"),
    ("config [KEY VALUE]", "Show or change configuration"),
    ("log", "Print this session's log"),
    ("logout", "Sign out"),
    ("help", "List commands"),
    ("exit", "Quit"),
];

/// What the prompt loop does after a command ran.
#[derive(Debug)]
pub enum Outcome {
    Done,
    /// Ask the question and hand the Y/N answer back to the action.
    Confirm(PendingAction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    DeleteSwap { id: String },
}

impl PendingAction {
    pub fn prompt(&self) -> String {
        match self {
            PendingAction::DeleteSwap { .. } => format!("{} (Y/N)", SwapFeed::delete_prompt()),
        }
    }

    pub fn resolve(self, ctx: &mut AppContext, accepted: bool, out: &mut dyn Write) -> Result<()> {
        match self {
            PendingAction::DeleteSwap { id } => {
                let feed = ctx.swap_feed()?;
                match feed.remove(&id, &mut |_: &str| accepted)? {
                    Removal::Removed => ctx.logger.info(
                        format!("Swap request {id} deleted."),
                        LogTarget::ConsoleAndFile,
                    ),
                    Removal::Cancelled => writeln!(out, "Delete cancelled.")?,
                }
                if let ActiveView::Swaps(live) = &ctx.active {
                    display().render_swaps(live, ctx.router.can_edit(), out)?;
                }
                Ok(())
            }
        }
    }
}

pub struct CommandCore<'a> {
    pub args: ArgList<'a>,
}

impl<'a> CommandCore<'a> {
    pub fn new(args: &'a [String]) -> Self {
        Self {
            args: ArgList::new(args),
        }
    }
}

mod sealed {
    use super::CommandCore;

    pub trait Sealed<'a> {
        fn core(&self) -> &CommandCore<'a>;
    }
}

pub trait Command<'a>: sealed::Sealed<'a> {
    fn usage(&self) -> String;
    fn perform(&self, ctx: &mut AppContext, out: &mut dyn Write) -> Result<Outcome>;

    /// `--help` anywhere prints the usage instead of running. Parse errors
    /// carry the usage on a trailing `Usage:` line.
    fn execute(&self, ctx: &mut AppContext, out: &mut dyn Write) -> Result<Outcome> {
        if self.core().args.wants_help() {
            writeln!(out, "Usage: {}", self.usage())?;
            return Ok(Outcome::Done);
        }
        self.perform(ctx, out).map_err(|err| match err {
            Error::Parse(msg) => Error::Parse(format!("{msg}\nUsage: {}", self.usage())),
            other => other,
        })
    }
}

pub type CommandDyn<'a> = Box<dyn Command<'a> + 'a>;

macro_rules! sealed_core {
    ($($ty:ident),* $(,)?) => {
        $(
            impl<'a> sealed::Sealed<'a> for $ty<'a> {
                fn core(&self) -> &CommandCore<'a> {
                    &self.core
                }
            }
        )*
    };
}

sealed_core!(
    SessionCommand,
    ViewCommand,
    ScheduleCommand,
    SwapCommand,
    UploadCommand,
    ConfigCommand,
    LogCommand,
    HelpCommand,
);

fn display() -> DisplayManager {
    DisplayManager::for_stdout()
}

/// Draw whatever the router is showing: role choice, login, dashboard or
/// the active view.
pub fn render_active(ctx: &AppContext, out: &mut dyn Write) -> Result<()> {
    let dm = display();
    match (ctx.router.session(), &ctx.active) {
        (None, _) => match ctx.router.role() {
            None => dm.render_role_choice(out)?,
            Some(role) => dm.render_login(role, out)?,
        },
        (Some(_), ActiveView::Schedule(screen)) => dm.render_schedule(screen, out)?,
        (Some(_), ActiveView::Swaps(live)) => {
            dm.render_swaps(live, ctx.router.can_edit(), out)?
        }
        (Some(session), ActiveView::Idle) => dm.render_dashboard(session, out)?,
    }
    Ok(())
}

fn require_admin(ctx: &AppContext, what: &str) -> Result<()> {
    match ctx.router.session() {
        None => Err(Error::auth("Sign in first.")),
        Some(s) if s.role.can_edit() => Ok(()),
        Some(_) => Err(Error::auth(format!("Only admins can {what}."))),
    }
}

fn screen_mut(ctx: &mut AppContext) -> Result<&mut ScheduleScreen> {
    ctx.screen_mut()
        .ok_or_else(|| Error::domain("Open the weekly or monthly view first."))
}

// ---------- session ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr, EnumIterDerive)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum SessionAction {
    Role,
    Login,
    Logout,
}

pub struct SessionCommand<'a> {
    core: CommandCore<'a>,
    action: SessionAction,
}

impl<'a> SessionCommand<'a> {
    pub fn new(action: SessionAction, args: &'a [String]) -> Self {
        Self {
            core: CommandCore::new(args),
            action,
        }
    }
}

impl<'a> Command<'a> for SessionCommand<'a> {
    fn usage(&self) -> String {
        match self.action {
            SessionAction::Role => "role <admin|client>".into(),
            SessionAction::Login => "login <username> <password>".into(),
            SessionAction::Logout => "logout".into(),
        }
    }

    fn perform(&self, ctx: &mut AppContext, out: &mut dyn Write) -> Result<Outcome> {
        let args = self.core.args;
        match self.action {
            SessionAction::Role => {
                args.expect_at_most(1)?;
                let role = Role::try_from(args.word(0, "role")?)?;
                ctx.router.choose_role(role)?;
            }
            SessionAction::Login => {
                args.expect_at_most(2)?;
                let id = args.word(0, "username")?;
                let secret = args.word(1, "password")?;
                let session = ctx.router.login(id, secret)?;
                ctx.active = ActiveView::Idle;
                let shown = ctx
                    .config
                    .users()
                    .iter()
                    .find(|u| u.username == session.username)
                    .map(|u| u.shown_name().to_string())
                    .unwrap_or_else(|| session.username.clone());
                writeln!(out, "Welcome, {shown}.")?;
            }
            SessionAction::Logout => {
                args.expect_at_most(0)?;
                ctx.logout();
                writeln!(out, "Signed out.")?;
            }
        }
        render_active(ctx, out)?;
        Ok(Outcome::Done)
    }
}

// ---------- views ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr, EnumIterDerive)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum ViewAction {
    View,
    Show,
}

pub struct ViewCommand<'a> {
    core: CommandCore<'a>,
    action: ViewAction,
}

impl<'a> ViewCommand<'a> {
    pub fn new(action: ViewAction, args: &'a [String]) -> Self {
        Self {
            core: CommandCore::new(args),
            action,
        }
    }
}

impl<'a> Command<'a> for ViewCommand<'a> {
    fn usage(&self) -> String {
        match self.action {
            ViewAction::View => "view <dashboard|weekly|monthly|swap>".into(),
            ViewAction::Show => "show".into(),
        }
    }

    fn perform(&self, ctx: &mut AppContext, out: &mut dyn Write) -> Result<Outcome> {
        let args = self.core.args;
        if self.action == ViewAction::View {
            args.expect_at_most(1)?;
            let view = View::try_from(args.word(0, "view name")?)?;
            ctx.open_view(view)?;
            ctx.logger
                .info(format!("Opened {view} view"), LogTarget::FileOnly);
        }
        render_active(ctx, out)?;
        Ok(Outcome::Done)
    }
}

// ---------- schedule ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr, EnumIterDerive)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum ScheduleAction {
    Prev,
    Next,
    Today,
    Pick,
    Select,
    Cell,
    Edit,
    Apply,
    Save,
}

pub struct ScheduleCommand<'a> {
    core: CommandCore<'a>,
    action: ScheduleAction,
}

impl<'a> ScheduleCommand<'a> {
    pub fn new(action: ScheduleAction, args: &'a [String]) -> Self {
        Self {
            core: CommandCore::new(args),
            action,
        }
    }

    fn pick(&self, screen: &mut ScheduleScreen) -> Result<Option<bool>> {
        let args = self.core.args;
        let Some(first) = args.get(0) else {
            screen.open_picker();
            return Ok(None);
        };
        match first.to_ascii_lowercase().as_str() {
            "ok" => {
                args.expect_at_most(1)?;
                return screen.confirm_picker().map(Some);
            }
            "cancel" => {
                args.expect_at_most(1)?;
                screen.cancel_picker();
                return Ok(None);
            }
            _ => {}
        }
        if screen.navigator().picker().is_none() {
            screen.open_picker();
        }
        match first.to_ascii_lowercase().as_str() {
            "day" => screen.set_picker_day(args.number(1, "day")?)?,
            "month" => screen.set_picker_month(args.number(1, "month")?)?,
            "year" => screen.set_picker_year(args.number(1, "year")?)?,
            _ => {
                args.expect_at_most(1)?;
                screen.set_picker_date(args.date(0, "date")?)?;
            }
        }
        Ok(None)
    }
}

impl<'a> Command<'a> for ScheduleCommand<'a> {
    fn usage(&self) -> String {
        match self.action {
            ScheduleAction::Prev => "prev".into(),
            ScheduleAction::Next => "next".into(),
            ScheduleAction::Today => "today".into(),
            ScheduleAction::Pick => {
                "pick [date] | pick day|month|year <n> | pick ok | pick cancel".into()
            }
            ScheduleAction::Select => "select <date>".into(),
            ScheduleAction::Cell => "cell <day> <employee>".into(),
            ScheduleAction::Edit => "edit".into(),
            ScheduleAction::Apply => "apply <#|label|off>".into(),
            ScheduleAction::Save => "save".into(),
        }
    }

    fn perform(&self, ctx: &mut AppContext, out: &mut dyn Write) -> Result<Outcome> {
        let args = self.core.args;
        let logger = ctx.logger.clone();
        let dm = display();
        let screen = screen_mut(ctx)?;

        let moved = match self.action {
            ScheduleAction::Prev | ScheduleAction::Next | ScheduleAction::Today => {
                args.expect_at_most(0)?;
                let moved = match self.action {
                    ScheduleAction::Prev => screen.prev()?,
                    ScheduleAction::Next => screen.next()?,
                    _ => screen.today()?,
                };
                Some(moved)
            }
            ScheduleAction::Pick => self.pick(screen)?,
            ScheduleAction::Select => {
                args.expect_at_most(1)?;
                screen.select_date(args.date(0, "date")?);
                None
            }
            ScheduleAction::Cell => {
                args.expect_at_most(2)?;
                let day = args.index(0, "day")?;
                let employee = args.index(1, "employee")?;
                if !screen.toggle(day - 1, employee - 1)? {
                    writeln!(out, "Cell ({day}, {employee}) is outside this schedule.")?;
                    return Ok(Outcome::Done);
                }
                None
            }
            ScheduleAction::Edit => {
                args.expect_at_most(0)?;
                match screen.edit_seed()? {
                    Some(draft) => dm.render_edit_seed(&draft, screen.catalog(), out)?,
                    None => writeln!(
                        out,
                        "Select one or more cells with 'cell <day> <employee>' first."
                    )?,
                }
                return Ok(Outcome::Done);
            }
            ScheduleAction::Apply => {
                let token = args.rest(0);
                if token.trim().is_empty() {
                    return Err(Error::parse("Missing shift."));
                }
                let choice = screen.catalog().choice(&token)?;
                let written = screen.apply(&choice)?;
                if written == 0 {
                    writeln!(out, "No cells selected.")?;
                } else {
                    writeln!(out, "Applied {choice} to {written} cell(s).")?;
                }
                None
            }
            ScheduleAction::Save => {
                args.expect_at_most(0)?;
                let saved = screen.save()?;
                if saved == 0 {
                    writeln!(out, "Nothing to save.")?;
                } else {
                    logger.info(
                        format!("Saved {saved} edited cell(s) for {}.", screen.period()),
                        LogTarget::ConsoleAndFile,
                    );
                }
                return Ok(Outcome::Done);
            }
        };

        if moved == Some(true) {
            logger.info(
                format!("Showing {}", screen.period()),
                LogTarget::FileOnly,
            );
        }
        dm.render_schedule(screen, out)?;
        Ok(Outcome::Done)
    }
}

// ---------- swaps ----------

pub struct SwapCommand<'a> {
    core: CommandCore<'a>,
}

impl<'a> SwapCommand<'a> {
    pub fn new(args: &'a [String]) -> Self {
        Self {
            core: CommandCore::new(args),
        }
    }

    fn add(&self, ctx: &mut AppContext, out: &mut dyn Write) -> Result<Outcome> {
        let args = self.core.args;
        let raw_date = args.get(3).unwrap_or_default().trim();
        let date = if raw_date.is_empty() {
            String::new()
        } else {
            Date::try_from_str(raw_date)?.to_string()
        };
        let mut draft = SwapDraft::new(
            args.get(1).unwrap_or_default(),
            args.get(2).unwrap_or_default(),
            date,
            args.rest(4),
        );
        let id = ctx.swap_feed()?.submit(&mut draft)?;
        ctx.logger
            .info(format!("Swap request {id} added."), LogTarget::ConsoleAndFile);
        if let ActiveView::Swaps(live) = &ctx.active {
            display().render_swaps(live, true, out)?;
        }
        Ok(Outcome::Done)
    }
}

impl<'a> Command<'a> for SwapCommand<'a> {
    fn usage(&self) -> String {
        "swap add <employee1> <employee2> <date> <remark> | swap show <id> | swap del <id>".into()
    }

    fn perform(&self, ctx: &mut AppContext, out: &mut dyn Write) -> Result<Outcome> {
        let args = self.core.args;
        let sub = args.word(0, "action (add, show or del)")?.to_ascii_lowercase();
        match sub.as_str() {
            "add" => {
                require_admin(ctx, "submit swap requests")?;
                self.add(ctx, out)
            }
            "del" | "delete" => {
                require_admin(ctx, "delete swap requests")?;
                args.expect_at_most(2)?;
                let id = args.word(1, "swap request id")?.to_string();
                Ok(Outcome::Confirm(PendingAction::DeleteSwap { id }))
            }
            "show" => {
                if ctx.router.session().is_none() {
                    return Err(Error::auth("Sign in first."));
                }
                args.expect_at_most(2)?;
                let id = args.word(1, "swap request id")?;
                let swap = ctx
                    .swap_feed()?
                    .find(id)?
                    .ok_or_else(|| Error::domain(format!("No swap request '{id}'.")))?;
                display().render_swap_detail(&swap, out)?;
                Ok(Outcome::Done)
            }
            other => Err(Error::parse(format!(
                "Unknown swap action: '{other}'. Expected add, show or del."
            ))),
        }
    }
}

// ---------- tools ----------

pub struct UploadCommand<'a> {
    core: CommandCore<'a>,
}

impl<'a> UploadCommand<'a> {
    pub fn new(args: &'a [String]) -> Self {
        Self {
            core: CommandCore::new(args),
        }
    }
}

impl<'a> Command<'a> for UploadCommand<'a> {
    fn usage(&self) -> String {
        "upload <path>".into()
    }

    fn perform(&self, ctx: &mut AppContext, out: &mut dyn Write) -> Result<Outcome> {
        require_admin(ctx, "upload attachments")?;
        let path = self.core.args.rest(0);
        if path.trim().is_empty() {
            return Err(Error::parse("Missing file path."));
        }
        let uploader = ctx.uploader();
        let uploaded = uploader.upload(Path::new(path.trim()), &mut |pct: u8| {
            let _ = writeln!(out, "Uploading... {pct}%");
        });
        let file = uploaded?;
        ctx.logger.info(
            format!("Uploaded {} ({} bytes) to {}", file.name, file.size, file.path),
            LogTarget::FileOnly,
        );
        display().render_upload(&file, out)?;
        Ok(Outcome::Done)
    }
}

pub struct ConfigCommand<'a> {
    core: CommandCore<'a>,
}

impl<'a> ConfigCommand<'a> {
    pub fn new(args: &'a [String]) -> Self {
        Self {
            core: CommandCore::new(args),
        }
    }
}

impl<'a> Command<'a> for ConfigCommand<'a> {
    fn usage(&self) -> String {
        "config [KEY VALUE]".into()
    }

    fn perform(&self, ctx: &mut AppContext, out: &mut dyn Write) -> Result<Outcome> {
        let args = self.core.args;
        if args.is_empty() {
            display().render_config(&ctx.config, out)?;
            return Ok(Outcome::Done);
        }
        let key = args.word(0, "config key")?;
        let value = args.rest(1);
        if value.trim().is_empty() {
            return Err(Error::parse(format!("Missing value for {key}.")));
        }
        ctx.config.set(key, &value)?;
        ctx.logger
            .set_file_logging_enabled(ctx.config.file_logging_enabled());
        if let Some((key, old, new)) = ctx.config.take_last_change() {
            ctx.logger.info(
                format!("Config {key} changed from '{old}' to '{new}'."),
                LogTarget::ConsoleAndFile,
            );
        }
        Ok(Outcome::Done)
    }
}

pub struct LogCommand<'a> {
    core: CommandCore<'a>,
}

impl<'a> LogCommand<'a> {
    pub fn new(args: &'a [String]) -> Self {
        Self {
            core: CommandCore::new(args),
        }
    }
}

impl<'a> Command<'a> for LogCommand<'a> {
    fn usage(&self) -> String {
        "log".into()
    }

    fn perform(&self, ctx: &mut AppContext, out: &mut dyn Write) -> Result<Outcome> {
        self.core.args.expect_at_most(0)?;
        display().render_log(&ctx.logger.history(), out)?;
        Ok(Outcome::Done)
    }
}

pub struct HelpCommand<'a> {
    core: CommandCore<'a>,
}

impl<'a> HelpCommand<'a> {
    pub fn new(args: &'a [String]) -> Self {
        Self {
            core: CommandCore::new(args),
        }
    }
}

impl<'a> Command<'a> for HelpCommand<'a> {
    fn usage(&self) -> String {
        "help".into()
    }

    fn perform(&self, _ctx: &mut AppContext, out: &mut dyn Write) -> Result<Outcome> {
        display().render_help(HELP_ENTRIES, out)?;
        Ok(Outcome::Done)
    }
}
