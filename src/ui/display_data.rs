use crate::config::Config;
use crate::core::grid::CellPos;
use crate::core::screen::ScheduleScreen;
use crate::core::shifts::{ShiftCatalog, ShiftTemplate};
use crate::core::swap::SwapRequest;
use crate::core::types::Role;
use crate::ui::ansi::{FG_GREEN, FG_RED, FG_YELLOW, STYLE_BOLD, STYLE_RESET, STYLE_REVERSE};
use crate::ui::width_util::WidthUtil;
use chrono::{DateTime, Datelike, Local, NaiveDate, Weekday};

const REMARK_WIDTH: usize = 40;

/// One Monday-to-Sunday band of the schedule table. `first_day` is the
/// period's day index of the band's first column.
#[derive(Debug, Clone)]
pub struct GridSection {
    pub title: String,
    pub first_day: usize,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl GridSection {
    pub fn header_refs(&self) -> Vec<&str> {
        self.headers.iter().map(String::as_str).collect()
    }
}

/// Turns domain state into table rows. Markers are plain characters so the
/// output reads the same with styling off: `*` selected, `+` edited.
#[derive(Debug, Clone)]
pub struct DisplayDataBuilder {
    styled: bool,
    util: WidthUtil,
}

impl Default for DisplayDataBuilder {
    fn default() -> Self {
        Self {
            styled: true,
            util: WidthUtil,
        }
    }
}

impl DisplayDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain() -> Self {
        Self {
            styled: false,
            util: WidthUtil,
        }
    }

    fn paint(&self, style: &str, text: &str) -> String {
        if self.styled {
            format!("{style}{text}{STYLE_RESET}")
        } else {
            text.to_string()
        }
    }

    pub fn grid_sections(&self, screen: &ScheduleScreen) -> Vec<GridSection> {
        let grid = screen.grid();
        let selected_date = screen.navigator().selected();
        let board = screen.board();

        week_bands(grid.dates())
            .into_iter()
            .map(|(first_day, dates)| {
                let mut headers = vec!["EMPLOYEE".to_string()];
                for (offset, date) in dates.iter().enumerate() {
                    let label = format!("{}. {}", first_day + offset + 1, date.format("%a %d"));
                    if *date == selected_date {
                        headers.push(self.paint(FG_YELLOW, &format!("{label} <")));
                    } else {
                        headers.push(label);
                    }
                }

                let rows = screen
                    .roster()
                    .names()
                    .iter()
                    .enumerate()
                    .map(|(employee, name)| {
                        let mut row = vec![format!("{}. {name}", employee + 1)];
                        for offset in 0..dates.len() {
                            let pos = CellPos::new(first_day + offset, employee);
                            let Some(cell) = grid.cell(pos) else {
                                row.push(String::new());
                                continue;
                            };
                            let selected = board.selection().contains(pos);
                            let edited = board.edited().contains(pos);
                            let text = format!(
                                "{}{cell}{}",
                                if selected { "*" } else { " " },
                                if edited { "+" } else { "" }
                            );
                            let styled = if selected {
                                self.paint(STYLE_REVERSE, &text)
                            } else if edited {
                                self.paint(FG_GREEN, &text)
                            } else if cell.is_off() {
                                self.paint(FG_RED, &text)
                            } else {
                                text
                            };
                            row.push(styled);
                        }
                        row
                    })
                    .collect();

                let (first, last) = (dates[0], dates[dates.len() - 1]);
                GridSection {
                    title: format!("{} - {}", first.format("%a %d %b"), last.format("%a %d %b")),
                    first_day,
                    headers,
                    rows,
                }
            })
            .collect()
    }

    pub fn swap_rows(&self, swaps: &[SwapRequest]) -> Vec<Vec<String>> {
        swaps
            .iter()
            .map(|s| {
                vec![
                    s.id.clone(),
                    s.employee1.clone(),
                    s.employee2.clone(),
                    s.date.clone(),
                    self.util.truncate_visible(&s.remark, REMARK_WIDTH),
                    created_label(s.created_at),
                ]
            })
            .collect()
    }

    /// Full request, remark uncut.
    pub fn swap_detail_lines(&self, swap: &SwapRequest) -> Vec<String> {
        let or_dash = |s: &str| if s.trim().is_empty() { "-".to_string() } else { s.to_string() };
        vec![
            format!("Swap: {} <-> {}", swap.employee1, swap.employee2),
            format!("Date: {}", or_dash(&swap.date)),
            format!("Remark: {}", or_dash(&swap.remark)),
            format!("Submitted at: {}", created_label(swap.created_at)),
        ]
    }

    pub fn config_rows(&self, config: &Config) -> Vec<Vec<String>> {
        config
            .rows()
            .iter()
            .enumerate()
            .map(|(i, (k, d, v))| vec![i.to_string(), k.clone(), d.clone(), v.clone()])
            .collect()
    }

    pub fn catalog_rows(&self, catalog: &ShiftCatalog) -> Vec<Vec<String>> {
        let default = catalog.default_shift();
        let mut rows: Vec<Vec<String>> = catalog
            .templates()
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let mut notes = Vec::new();
                if t == default {
                    notes.push("default");
                }
                if t.is_overnight() {
                    notes.push("overnight");
                }
                vec![
                    (i + 1).to_string(),
                    t.label(),
                    hours_label(t),
                    notes.join(", "),
                ]
            })
            .collect();
        rows.push(vec![
            "off".into(),
            "Day Off".into(),
            "-".into(),
            String::new(),
        ]);
        rows
    }

    /// Views the dashboard offers, with the access the role gets.
    pub fn dashboard_rows(&self, role: Role) -> Vec<Vec<String>> {
        let access = if role.can_edit() { "edit" } else { "read-only" };
        vec![
            vec!["weekly".into(), "Weekly schedule".into(), access.into()],
            vec!["monthly".into(), "Monthly schedule".into(), access.into()],
            vec![
                "swap".into(),
                "Shift swap requests".into(),
                if role.can_edit() { "submit, delete" } else { "read-only" }.into(),
            ],
        ]
    }

    pub fn emphasize(&self, text: &str) -> String {
        self.paint(STYLE_BOLD, text)
    }
}

/// Split consecutive dates into runs ending on Sunday, keyed by the index of
/// each run's first date.
pub fn week_bands(dates: &[NaiveDate]) -> Vec<(usize, Vec<NaiveDate>)> {
    let mut bands: Vec<(usize, Vec<NaiveDate>)> = Vec::new();
    for (idx, date) in dates.iter().enumerate() {
        let open = bands
            .last()
            .is_some_and(|(_, band)| band.last().is_some_and(|d| d.weekday() != Weekday::Sun));
        if let Some((_, band)) = bands.last_mut().filter(|_| open) {
            band.push(*date);
        } else {
            bands.push((idx, vec![*date]));
        }
    }
    bands
}

fn hours_label(t: &ShiftTemplate) -> String {
    let mut minutes = (t.end() - t.start()).num_minutes();
    if minutes < 0 {
        minutes += 24 * 60;
    }
    format!("{}h{:02}", minutes / 60, minutes % 60)
}

fn created_label(created_at: Option<i64>) -> String {
    created_at
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}
