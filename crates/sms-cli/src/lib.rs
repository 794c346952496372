//! sms-cli library
//!
//! Wires configuration, the backend client and the session manager into the
//! commands of the `sms` binary.

pub mod app;
pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod output;
pub mod profile_commands;

#[cfg(test)]
mod tests;

pub use app::App;
pub use cli::Cli;
pub use commands::Commands;
pub use error::{CliError, Result as CliResult};
pub use profile_commands::ProfileCommands;
