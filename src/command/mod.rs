pub mod args;
pub mod command_parser;
pub mod command_resolver;
pub mod commands;
