pub mod command;
pub mod config;
pub mod core;
pub mod errors;
pub mod extensions;
pub mod logging;
pub mod prompter;
pub mod ui;

pub use crate::core::cli::CliPaths;
pub use crate::core::context::AppContext;
pub use crate::errors::{Error, Result};
