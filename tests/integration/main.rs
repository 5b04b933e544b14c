mod common;
mod config;
mod schedule;
mod session;
mod swap;
