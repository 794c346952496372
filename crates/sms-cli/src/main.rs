//! sms - Student Management System CLI
//!
//! Signs in against the hosted backend and opens dashboard views through the
//! route guard. Results are JSON on stdout.
//!
//! # Examples
//!
//! ```bash
//! # Sign in (password from SMS_PASSWORD)
//! sms login --email admin@center.test --return-to /students
//!
//! # What would /reports show me?
//! sms open /reports --pretty
//!
//! # Rename yourself
//! sms profile update --full-name "Ada Lovelace"
//! ```

use sms_cli::{Cli, app, output};

use std::process::ExitCode;

use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match app::run(cli.command).await {
        Ok(value) => output::render(&value, cli.pretty),
        Err(e) => Err(e),
    };

    match result {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
