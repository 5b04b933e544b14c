use crate::ui::ansi::{
    CLEAR_LINE_REST, CURSOR_UP_ONE, FG_LIGHT_GRAY, PROMPT_STYLE, STYLE_BOLD, STYLE_ITALIC,
    STYLE_RESET,
};
use crate::ui::width_util::WidthUtil;
use std::io::{self, Write};

const BANNER_INNER_WIDTH: usize = 50;

/// Screen furniture around the views: the startup banner and the prompt line.
#[derive(Debug, Default, Clone)]
pub struct UiChrome {
    util: WidthUtil,
}

impl UiChrome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render_banner<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        let version = env!("CARGO_PKG_VERSION");
        let title =
            format!("{STYLE_BOLD}I G S{STYLE_RESET} {FG_LIGHT_GRAY}(v{version}){STYLE_RESET}");
        let subtitle = format!("{STYLE_ITALIC}Shift scheduling and swap requests{STYLE_RESET}");
        let rule = "─".repeat(BANNER_INNER_WIDTH);
        let blank = " ".repeat(BANNER_INNER_WIDTH);
        writeln!(out, "╭{rule}╮")?;
        writeln!(out, "│{blank}│")?;
        writeln!(out, "│{}│", self.center_in_box(&title, BANNER_INNER_WIDTH))?;
        writeln!(out, "│{}│", self.center_in_box(&subtitle, BANNER_INNER_WIDTH))?;
        writeln!(out, "│{blank}│")?;
        writeln!(out, "╰{rule}╯")
    }

    /// Styled input line; the cursor is left right after `prompt`.
    pub fn render_prompt<W: Write + ?Sized>(&self, prompt: &str, out: &mut W) -> io::Result<()> {
        self.render_padding_line(out)?;
        write!(out, "{PROMPT_STYLE}{prompt}{CLEAR_LINE_REST}{STYLE_RESET}\n")?;
        write!(out, "{PROMPT_STYLE}{CLEAR_LINE_REST}{STYLE_RESET}")?;
        let column = self.util.visible_width(prompt) + 1;
        write!(out, "{CURSOR_UP_ONE}\x1B[{column}G{PROMPT_STYLE}")?;
        out.flush()
    }

    /// Closes the prompt band after the user pressed enter.
    pub fn render_prompt_bottom_padding<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        self.render_padding_line(out)?;
        write!(out, "{STYLE_RESET}")?;
        out.flush()
    }

    fn render_padding_line<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{PROMPT_STYLE}{CLEAR_LINE_REST}{STYLE_RESET}\n")
    }

    pub(crate) fn center_in_box(&self, content: &str, width: usize) -> String {
        let content_width = self.util.visible_width(content);
        if content_width >= width {
            return content.to_string();
        }
        let left = (width - content_width) / 2;
        let right = width - content_width - left;
        format!("{}{}{}", " ".repeat(left), content, " ".repeat(right))
    }
}
