use crate::commands::Commands;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "sms")]
#[command(about = "Student management dashboard: sign in and open views from the terminal")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}
