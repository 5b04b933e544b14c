use crate::ui::width_util::WidthUtil;
use std::io::{self, Write};

const COLUMN_GAP: &str = " | ";

/// What to draw: a titled table with optional empty-state text, a minimum
/// width shared with sibling tables, and footer lines under the last rule.
pub struct TableSpec<'a, T> {
    pub title: &'a str,
    pub headers: &'a [&'a str],
    pub rows: &'a [Vec<T>],
    pub empty_message: Option<&'a str>,
    pub min_width: Option<usize>,
    pub footer: &'a [String],
}

impl<'a, T: AsRef<str>> TableSpec<'a, T> {
    pub fn new(title: &'a str, headers: &'a [&'a str], rows: &'a [Vec<T>]) -> Self {
        Self {
            title,
            headers,
            rows,
            empty_message: None,
            min_width: None,
            footer: &[],
        }
    }

    pub fn empty_message(mut self, msg: &'a str) -> Self {
        self.empty_message = Some(msg);
        self
    }

    pub fn min_width(mut self, width: usize) -> Self {
        self.min_width = Some(width);
        self
    }

    pub fn footer(mut self, lines: &'a [String]) -> Self {
        self.footer = lines;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct TablePrinter {
    util: WidthUtil,
    left_pad: usize,
}

impl TablePrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone that indents every line by `pad` spaces.
    pub fn with_left_pad(&self, pad: usize) -> Self {
        let mut c = self.clone();
        c.left_pad = pad;
        c
    }

    fn write_indented<W: Write + ?Sized>(&self, out: &mut W, s: &str) -> io::Result<()> {
        if self.left_pad > 0 {
            write!(out, "{}", " ".repeat(self.left_pad))?;
        }
        writeln!(out, "{s}")
    }

    fn write_separator<W: Write + ?Sized>(&self, out: &mut W, width: usize) -> io::Result<()> {
        self.write_indented(out, &"-".repeat(width.max(1)))
    }

    pub fn render_banner<W: Write + ?Sized>(
        &self,
        title: &str,
        width: usize,
        out: &mut W,
    ) -> io::Result<()> {
        let w = width.max(self.util.visible_width(title));
        self.write_separator(out, w)?;
        self.write_indented(out, &title.to_uppercase())?;
        self.write_separator(out, w)
    }

    pub fn compute_table_width<T: AsRef<str>>(&self, headers: &[&str], rows: &[Vec<T>]) -> usize {
        let col_widths = self.compute_col_widths(headers, rows);
        Self::natural_width(&col_widths)
    }

    /// Widest of the table, its title and its empty-state text.
    pub fn spec_width<T: AsRef<str>>(&self, spec: &TableSpec<'_, T>) -> usize {
        let mut w = self
            .compute_table_width(spec.headers, spec.rows)
            .max(self.util.visible_width(spec.title));
        if spec.rows.is_empty() {
            if let Some(msg) = spec.empty_message {
                w = w.max(self.util.visible_width(msg));
            }
        }
        w.max(spec.min_width.unwrap_or(0))
    }

    pub fn render<T: AsRef<str>, W: Write + ?Sized>(
        &self,
        spec: &TableSpec<'_, T>,
        out: &mut W,
    ) -> io::Result<()> {
        let col_widths = self.compute_col_widths(spec.headers, spec.rows);
        let total_width = self.spec_width(spec);

        if spec.rows.is_empty() {
            if let Some(msg) = spec.empty_message {
                self.render_banner(spec.title, total_width, out)?;
                self.write_indented(out, msg)?;
                self.write_separator(out, total_width)?;
                return self.render_footer(spec.footer, out);
            }
        }

        self.render_banner(spec.title, total_width, out)?;
        if !spec.headers.is_empty() {
            self.write_indented(out, &self.build_line(spec.headers, &col_widths))?;
            self.write_separator(out, total_width)?;
        }
        for row in spec.rows {
            let line = if spec.headers.is_empty() {
                row.iter().map(|c| c.as_ref()).collect::<Vec<_>>().join(COLUMN_GAP)
            } else {
                self.build_line(row, &col_widths)
            };
            self.write_indented(out, &line)?;
        }
        self.write_separator(out, total_width)?;
        self.render_footer(spec.footer, out)
    }

    fn render_footer<W: Write + ?Sized>(&self, lines: &[String], out: &mut W) -> io::Result<()> {
        for line in lines {
            self.write_indented(out, line)?;
        }
        Ok(())
    }

    fn compute_col_widths<T: AsRef<str>>(&self, headers: &[&str], rows: &[Vec<T>]) -> Vec<usize> {
        let mut col_widths: Vec<usize> =
            headers.iter().map(|h| self.util.visible_width(h)).collect();
        for r in rows {
            for (w, cell) in col_widths.iter_mut().zip(r.iter()) {
                *w = (*w).max(self.util.visible_width(cell.as_ref()));
            }
        }
        col_widths
    }

    fn natural_width(col_widths: &[usize]) -> usize {
        if col_widths.is_empty() {
            return 0;
        }
        col_widths.iter().sum::<usize>() + (col_widths.len() - 1) * COLUMN_GAP.len()
    }

    fn build_line<T: AsRef<str>>(&self, cells: &[T], col_widths: &[usize]) -> String {
        cells
            .iter()
            .zip(col_widths)
            .map(|(cell, w)| self.util.pad_visible(cell.as_ref(), *w))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP)
    }
}
