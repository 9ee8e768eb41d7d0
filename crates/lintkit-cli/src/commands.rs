//! Subcommand implementations.

pub mod check;
pub mod init;
pub mod list_checks;
pub mod list_fixits;
pub mod output;
