use crate::errors::{Error, Result};
use crate::prompter::models::{Flow, FlowCtrl};
use crate::ui::ansi::{
    CURSOR_BLINKING_BLOCK, CURSOR_HOME, ENTER_ALT_SCREEN, EXIT_ALT_SCREEN, HIDE_CURSOR, SHOW_CURSOR,
};
use std::io::{self, BufRead, BufReader, IsTerminal, Write};

/// Read-render loop around a [`Flow`]. Cursor and alternate-screen control
/// codes are only sent when `styled` is set.
#[derive(Debug, Clone)]
pub struct Prompter {
    styled: bool,
}

impl Default for Prompter {
    fn default() -> Self {
        Self {
            styled: io::stdout().is_terminal(),
        }
    }
}

struct AltScreenGuard;
impl AltScreenGuard {
    fn enter() -> Self {
        print!("{ENTER_ALT_SCREEN}{CURSOR_HOME}");
        let _ = io::stdout().flush();
        Self
    }
}
impl Drop for AltScreenGuard {
    fn drop(&mut self) {
        print!("{SHOW_CURSOR}{EXIT_ALT_SCREEN}");
        let _ = io::stdout().flush();
    }
}

impl Prompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain() -> Self {
        Self { styled: false }
    }

    pub fn is_styled(&self) -> bool {
        self.styled
    }

    fn hide_cursor(&self) {
        if self.styled {
            print!("{HIDE_CURSOR}");
            let _ = io::stdout().flush();
        }
    }

    fn show_cursor_blinking(&self) {
        if self.styled {
            print!("{SHOW_CURSOR}{CURSOR_BLINKING_BLOCK}");
            let _ = io::stdout().flush();
        }
    }

    pub fn run<F: Flow>(&self, flow: F, use_alt_screen: bool) -> Result<()> {
        let stdin = io::stdin();
        let reader = BufReader::new(stdin);
        self.run_with_reader(flow, use_alt_screen, reader)
    }

    pub fn run_with_reader<F: Flow, R: BufRead>(
        &self,
        mut flow: F,
        use_alt_screen: bool,
        mut reader: R,
    ) -> Result<()> {
        let _alt = if use_alt_screen && self.styled {
            Some(AltScreenGuard::enter())
        } else {
            None
        };

        loop {
            self.hide_cursor();
            flow.render()?;
            self.show_cursor_blinking();

            let mut line = String::new();
            let n = reader.read_line(&mut line).map_err(Error::Io)?;
            if n == 0 {
                return Ok(());
            }
            let line = line.trim();

            // "exit" always leaves, even mid-question.
            if line.eq_ignore_ascii_case("exit") {
                return Ok(());
            }

            match flow.handle_input(line)? {
                FlowCtrl::Continue => continue,
                FlowCtrl::Finish | FlowCtrl::Abort => return Ok(()),
            }
        }
    }
}
