use crate::config::Config;
use crate::core::auth::Session;
use crate::core::navigation::{PickerDraft, scroll_target};
use crate::core::screen::ScheduleScreen;
use crate::core::shifts::{ShiftCatalog, ShiftDraft};
use crate::core::swap::{LiveSwaps, SwapRequest};
use crate::core::types::Role;
use crate::core::upload::UploadedFile;
use crate::ui::display_data::DisplayDataBuilder;
use crate::ui::table_printer::{TablePrinter, TableSpec};
use crate::ui::width_util::WidthUtil;
use std::io::{self, IsTerminal, Write};

const LEGEND: &str = "* selected   + edited   OFF day off";

/// Renders each view into a writer. The prompt loop passes stdout; tests
/// pass a buffer.
#[derive(Debug, Default, Clone)]
pub struct DisplayManager {
    pub printer: TablePrinter,
    pub util: WidthUtil,
    pub data: DisplayDataBuilder,
}

impl DisplayManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unstyled output, used when stdout is not a terminal and in tests.
    pub fn plain() -> Self {
        Self {
            data: DisplayDataBuilder::plain(),
            ..Self::default()
        }
    }

    /// Styled when stdout is a terminal, plain when it is piped.
    pub fn for_stdout() -> Self {
        if io::stdout().is_terminal() {
            Self::new()
        } else {
            Self::plain()
        }
    }

    pub fn render_role_choice<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        let headers = ["ROLE", "ACCESS"];
        let rows = vec![
            vec!["admin", "Edit schedules, manage swaps, upload files"],
            vec!["client", "View schedules and swap requests"],
        ];
        let footer = ["Choose with 'role <admin|client>'.".to_string()];
        self.printer.render(
            &TableSpec::new("Who are you?", &headers, &rows).footer(&footer),
            out,
        )
    }

    pub fn render_login<W: Write + ?Sized>(&self, role: Role, out: &mut W) -> io::Result<()> {
        self.printer
            .render_banner(&format!("{} login", role.title()), 0, out)?;
        writeln!(out, "Sign in with 'login <username> <password>'.")?;
        writeln!(out, "Use 'logout' to pick a different role.")
    }

    pub fn render_dashboard<W: Write + ?Sized>(
        &self,
        session: &Session,
        out: &mut W,
    ) -> io::Result<()> {
        let headers = ["VIEW", "SHOWS", "ACCESS"];
        let rows = self.data.dashboard_rows(session.role);
        let title = format!("{} dashboard", session.role.title());
        let footer = [
            format!("Signed in as {}.", session.username),
            "Open a view with 'view <name>'.".to_string(),
        ];
        self.printer
            .render(&TableSpec::new(&title, &headers, &rows).footer(&footer), out)
    }

    pub fn render_schedule<W: Write + ?Sized>(
        &self,
        screen: &ScheduleScreen,
        out: &mut W,
    ) -> io::Result<()> {
        let sections = self.data.grid_sections(screen);
        let mode = if screen.is_read_only() {
            "read-only"
        } else {
            "editable"
        };
        let title = format!("{} ({mode})", screen.period());

        let mut width = self.util.visible_width(&title);
        for s in &sections {
            let headers = s.header_refs();
            width = width.max(self.printer.compute_table_width(&headers, &s.rows));
        }
        self.printer.render_banner(&title, width, out)?;

        for s in &sections {
            let headers = s.header_refs();
            self.printer.render(
                &TableSpec::new(&s.title, &headers, &s.rows).min_width(width),
                out,
            )?;
        }

        let navigator = screen.navigator();
        let board = screen.board();
        let selected = navigator.selected();
        let column = match scroll_target(selected, screen.period()) {
            Some(col) => format!("column {col}"),
            None => "outside this period".to_string(),
        };
        writeln!(out, "{LEGEND}")?;
        writeln!(out, "Selected date: {} ({column})", selected.format("%a %d %b %Y"))?;
        if !screen.is_read_only() {
            writeln!(
                out,
                "Selected cells: {}   Unsaved edits: {}",
                board.selection().len(),
                board.edited().len()
            )?;
        }
        if let Some(draft) = navigator.picker() {
            self.render_picker(draft, out)?;
        }
        Ok(())
    }

    pub fn render_picker<W: Write + ?Sized>(
        &self,
        draft: &PickerDraft,
        out: &mut W,
    ) -> io::Result<()> {
        writeln!(
            out,
            "Picker: day {} / month {} / year {} (1-{} this month). 'pick ok' to jump, 'pick cancel' to close.",
            draft.day,
            draft.month,
            draft.year,
            draft.days_available()
        )
    }

    pub fn render_edit_seed<W: Write + ?Sized>(
        &self,
        draft: &ShiftDraft,
        catalog: &ShiftCatalog,
        out: &mut W,
    ) -> io::Result<()> {
        let headers = ["#", "SHIFT", "HOURS", "NOTE"];
        let rows = self.data.catalog_rows(catalog);
        let footer = [
            format!("Current: {}", draft.choice()),
            "Apply with 'apply <#|label|off>'.".to_string(),
        ];
        self.printer
            .render(&TableSpec::new("Edit shift", &headers, &rows).footer(&footer), out)
    }

    pub fn render_swaps<W: Write + ?Sized>(
        &self,
        live: &LiveSwaps,
        can_manage: bool,
        out: &mut W,
    ) -> io::Result<()> {
        let headers = ["ID", "EMPLOYEE 1", "EMPLOYEE 2", "DATE", "REMARK", "CREATED"];
        let rows = self.data.swap_rows(&live.items());
        let mut footer = Vec::new();
        if let Some(err) = live.last_error() {
            footer.push(format!("Live updates failed: {err}"));
        }
        if can_manage {
            footer.push("Add with 'swap add <employee1> <employee2> <date> <remark>'.".to_string());
            footer.push("Delete with 'swap del <id>'.".to_string());
        }
        self.printer.render(
            &TableSpec::new("Swap requests", &headers, &rows)
                .empty_message("No swap requests yet.")
                .footer(&footer),
            out,
        )
    }

    pub fn render_swap_detail<W: Write + ?Sized>(
        &self,
        swap: &SwapRequest,
        out: &mut W,
    ) -> io::Result<()> {
        writeln!(out, "Swap request {}", swap.id)?;
        for line in self.data.swap_detail_lines(swap) {
            writeln!(out, "  {line}")?;
        }
        Ok(())
    }

    pub fn render_config<W: Write + ?Sized>(&self, config: &Config, out: &mut W) -> io::Result<()> {
        let headers = ["ID", "KEY", "DESCRIPTION", "VALUE"];
        let rows = self.data.config_rows(config);
        let footer = ["Edit with 'config <KEY> <VALUE>'.".to_string()];
        self.printer.render(
            &TableSpec::new("Config", &headers, &rows)
                .empty_message("No config items found.")
                .footer(&footer),
            out,
        )
    }

    pub fn render_upload<W: Write + ?Sized>(
        &self,
        file: &UploadedFile,
        out: &mut W,
    ) -> io::Result<()> {
        let headers = ["FIELD", "VALUE"];
        let rows = vec![
            vec!["name".to_string(), file.name.clone()],
            vec!["size".to_string(), format!("{} bytes", file.size)],
            vec!["type".to_string(), file.content_type.clone()],
            vec!["uploaded".to_string(), file.uploaded_at.clone()],
            vec!["url".to_string(), file.url.clone()],
        ];
        self.printer
            .render(&TableSpec::new("Upload complete", &headers, &rows), out)
    }

    pub fn render_help<W: Write + ?Sized>(
        &self,
        entries: &[(&str, &str)],
        out: &mut W,
    ) -> io::Result<()> {
        let headers = ["COMMAND", "DOES"];
        let rows: Vec<Vec<&str>> = entries.iter().map(|(c, d)| vec![*c, *d]).collect();
        self.printer.render(
            &TableSpec::new("Commands", &headers, &rows).empty_message("No commands available."),
            out,
        )
    }

    pub fn render_log<W: Write + ?Sized>(&self, lines: &[String], out: &mut W) -> io::Result<()> {
        let headers: [&str; 0] = [];
        let rows: Vec<Vec<&str>> = lines.iter().map(|l| vec![l.as_str()]).collect();
        self.printer.render(
            &TableSpec::new("Session log", &headers, &rows).empty_message("Nothing logged yet."),
            out,
        )
    }

    pub fn emphasize(&self, text: &str) -> String {
        self.data.emphasize(text)
    }
}
