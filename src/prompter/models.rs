use crate::errors::Result;

pub enum FlowCtrl {
    Continue,
    Finish,
    Abort,
}

/// One interactive screen driven by the prompter: draw, then react to a line.
pub trait Flow {
    fn render(&mut self) -> Result<()>;
    fn handle_input(&mut self, input: &str) -> Result<FlowCtrl>;
}

/// Answer to a Y/N question. Anything else asks again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Some(YesNo::Yes),
            "n" | "no" => Some(YesNo::No),
            _ => None,
        }
    }
}
