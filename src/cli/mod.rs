//! CLI module for drover - command-line interface.

pub mod commands;

pub use commands::Cli;
