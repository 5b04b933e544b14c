// ANSI/VT100 sequences used by the prompt loop and the grid renderer.

/// Switch to the terminal's alternate screen buffer (smcup).
pub const ENTER_ALT_SCREEN: &str = crate::csi!("?1049h");
/// Return to the main screen buffer (rmcup).
pub const EXIT_ALT_SCREEN: &str = crate::csi!("?1049l");
pub const CURSOR_HOME: &str = crate::csi!("H");
pub const CLEAR_LINE_REST: &str = crate::csi!("0K");
pub const CURSOR_UP_ONE: &str = crate::csi!("1A");

pub const HIDE_CURSOR: &str = crate::csi!("?25l");
pub const SHOW_CURSOR: &str = crate::csi!("?25h");
/// Blinking block cursor, where the terminal supports it.
pub const CURSOR_BLINKING_BLOCK: &str = crate::csi!("1 q");

pub const STYLE_RESET: &str = crate::csi!("0m");
pub const STYLE_BOLD: &str = crate::csi!("1m");
pub const STYLE_ITALIC: &str = crate::csi!("3m");
/// Swapped foreground/background; marks selected grid cells.
pub const STYLE_REVERSE: &str = crate::csi!("7m");
pub const FG_LIGHT_GRAY: &str = crate::csi!("37m");
/// Day-off cells.
pub const FG_RED: &str = crate::csi!("31m");
/// Cells edited since the period was loaded.
pub const FG_GREEN: &str = crate::csi!("32m");
/// Header of the highlighted date.
pub const FG_YELLOW: &str = crate::csi!("33m");
/// White on dark gray for the input line.
pub const PROMPT_STYLE: &str = crate::csi2!("38;5;15m", "48;5;236m");
