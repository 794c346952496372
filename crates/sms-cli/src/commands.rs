use crate::profile_commands::ProfileCommands;

use clap::Subcommand;

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,

        /// Falls back to the SMS_PASSWORD environment variable
        #[arg(long)]
        password: Option<String>,

        /// Path to continue to after signing in
        #[arg(long)]
        return_to: Option<String>,
    },

    /// Create an account
    Signup {
        #[arg(long)]
        email: String,

        /// Falls back to the SMS_PASSWORD environment variable
        #[arg(long)]
        password: Option<String>,

        /// Display name stored on the profile
        #[arg(long)]
        full_name: String,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the current identity and profile
    Whoami,

    /// Ask to open a view; prints what the route guard decided
    Open {
        /// View path (e.g. /students)
        path: String,
    },

    /// List the views and whether the current user may open them
    Routes,

    /// Profile operations
    Profile {
        #[command(subcommand)]
        action: ProfileCommands,
    },
}
