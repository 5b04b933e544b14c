pub mod auth;
pub mod calendar;
pub mod cli;
pub mod context;
pub mod grid;
pub mod navigation;
pub mod router;
pub mod screen;
pub mod shifts;
pub mod store;
pub mod swap;
pub mod types;
pub mod upload;
