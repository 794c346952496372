//! One CLI invocation: build the session stack, run a command, tear down.

use crate::{CliError, CliResult, Commands, ProfileCommands};

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use serde_json::{Value, json};
use sms_auth::{
    AuthError, Navigator, ProfileRepository, RouteGuard, RouteTable, SessionManager,
    SessionSettings, SessionSnapshot,
};
use sms_backend::{
    AuthClient, BackendClient, Database, FileSessionStorage, MemorySessionStorage, SessionStorage,
};
use sms_config::Config;
use sms_core::ProfileUpdate;
use tokio::time::timeout;

const PASSWORD_ENV: &str = "SMS_PASSWORD";

pub struct App {
    manager: SessionManager,
    navigator: Navigator,
    settle_limit: Duration,
}

impl App {
    /// Build the client stack from a validated config and start the session
    /// manager. Must be called inside a tokio runtime.
    pub fn start(config: &Config) -> CliResult<Self> {
        let anon_key = config.backend.anon_key.as_deref().unwrap_or_default();
        let client = BackendClient::new(
            &config.backend.url,
            anon_key,
            config.backend.request_timeout(),
        )?;

        let storage: Arc<dyn SessionStorage> = if config.session.persist {
            let path = config.session_storage_path()?;
            debug!("Session persisted at {}", path.display());
            Arc::new(FileSessionStorage::new(path))
        } else {
            Arc::new(MemorySessionStorage::new())
        };

        let auth = Arc::new(AuthClient::new(client.clone(), storage));
        let db = Database::new(client, Arc::clone(&auth));
        let profiles = Arc::new(ProfileRepository::new(
            db,
            config.session.profile_table.clone(),
        ));

        let manager = SessionManager::start(
            auth,
            profiles,
            SessionSettings::from_config(&config.session),
        );
        let navigator = Navigator::new(
            RouteTable::from_config(&config.routes),
            RouteGuard::from_config(config),
        );

        Ok(Self {
            manager,
            navigator,
            settle_limit: config.session.guard_timeout(),
        })
    }

    pub async fn run(&self, command: Commands) -> CliResult<Value> {
        match command {
            Commands::Login {
                email,
                password,
                return_to,
            } => {
                let password = resolve_password(password)?;
                self.manager.sign_in(&email, &password).await?;
                let snapshot = self.settled_snapshot().await;
                let target = self
                    .navigator
                    .table()
                    .post_login_target(return_to.as_deref());
                info!("Signed in, continuing to {target}");

                Ok(json!({
                    "identity": snapshot.identity,
                    "profile": snapshot.profile,
                    "redirect": target,
                }))
            }

            Commands::Signup {
                email,
                password,
                full_name,
            } => {
                let password = resolve_password(password)?;
                let outcome = self.manager.sign_up(&email, &password, &full_name).await?;

                Ok(json!({
                    "identity": outcome.user.identity(),
                    "signed_in": outcome.session.is_some(),
                    "confirmation_required": outcome.session.is_none(),
                }))
            }

            Commands::Logout => {
                self.manager.sign_out().await?;
                Ok(json!({ "signed_out": true }))
            }

            Commands::Whoami => {
                let snapshot = self.settled_snapshot().await;
                let views: Vec<&str> = self
                    .navigator
                    .table()
                    .visible_views(&snapshot)
                    .into_iter()
                    .map(|view| view.path.as_str())
                    .collect();

                Ok(json!({
                    "session": snapshot,
                    "views": views,
                }))
            }

            Commands::Open { path } => {
                let outcome = self.navigator.navigate(&self.manager.handle(), &path).await;
                Ok(serde_json::to_value(outcome)?)
            }

            Commands::Routes => {
                let snapshot = self.settled_snapshot().await;
                let table = self.navigator.table();
                let views: Vec<Value> = table
                    .views()
                    .iter()
                    .map(|view| {
                        json!({
                            "path": view.path,
                            "title": view.title,
                            "allowed_roles": view.allowed_roles,
                            "accessible": view.admits(&snapshot),
                        })
                    })
                    .collect();

                Ok(json!({
                    "login_path": table.login_path(),
                    "unauthorized_path": table.unauthorized_path(),
                    "home_path": table.home_path(),
                    "views": views,
                }))
            }

            Commands::Profile { action } => match action {
                ProfileCommands::Show => {
                    let snapshot = self.settled_snapshot().await;
                    match snapshot.profile {
                        Some(profile) => Ok(serde_json::to_value(profile)?),
                        None => Err(CliError::from(AuthError::not_signed_in())),
                    }
                }
                ProfileCommands::Update {
                    full_name,
                    avatar_url,
                    role,
                } => {
                    // Updates need the identity from the stored session
                    self.settled_snapshot().await;
                    let update = ProfileUpdate {
                        full_name,
                        avatar_url,
                        role,
                    };
                    let profile = self.manager.update_profile(update).await?;
                    Ok(serde_json::to_value(profile)?)
                }
            },
        }
    }

    pub async fn shutdown(self) {
        self.manager.shutdown().await;
    }

    /// Snapshot once loading is over, or whatever is there at the deadline
    async fn settled_snapshot(&self) -> SessionSnapshot {
        let mut handle = self.manager.handle();
        match timeout(self.settle_limit, handle.settled()).await {
            Ok(Ok(snapshot)) => snapshot,
            Ok(Err(e)) => {
                warn!("Session manager stopped while settling: {e}");
                handle.snapshot()
            }
            Err(_) => {
                warn!("Session still loading after {:?}", self.settle_limit);
                handle.snapshot()
            }
        }
    }
}

/// Flag first, then the environment
pub fn resolve_password(flag: Option<String>) -> CliResult<String> {
    match flag {
        Some(password) => Ok(password),
        None => std::env::var(PASSWORD_ENV).map_err(|_| CliError::missing_password()),
    }
}

/// Load and validate config, set up logging, run one command.
pub async fn run(command: Commands) -> CliResult<Value> {
    let config = Config::load()?;
    config.validate()?;

    crate::logger::initialize(
        config.logging.level,
        config.log_file_path()?,
        config.logging.colored,
    )?;
    config.log_summary();

    let app = App::start(&config)?;
    let result = app.run(command).await;
    app.shutdown().await;
    result
}
