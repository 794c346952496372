pub mod error;
pub mod models;

#[cfg(test)]
mod tests;

pub use error::{CoreError, Result};
pub use models::identity::Identity;
pub use models::profile::Profile;
pub use models::profile_update::ProfileUpdate;
pub use models::role::Role;
