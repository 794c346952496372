use clap::Subcommand;
use sms_core::Role;

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ProfileCommands {
    /// Show the signed-in user's profile
    Show,

    /// Update the signed-in user's profile
    Update {
        #[arg(long)]
        full_name: Option<String>,

        #[arg(long)]
        avatar_url: Option<String>,

        /// admin, staff or user (subject to backend row policies)
        #[arg(long)]
        role: Option<Role>,
    },
}
