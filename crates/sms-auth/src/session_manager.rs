//! The session store: one writer task, many readers.
//!
//! The loop owns the `watch` sender and is the only place snapshots are
//! built. Auth notifications, the initial lookup and profile resolutions all
//! reach it as messages, each tagged with the auth generation it belongs to.

use crate::{
    AuthError, AuthProvider, ProfileStore, Result, SessionHandle, SessionPhase, SessionSettings,
    SessionSnapshot,
};

use std::sync::Arc;

use log::{debug, error, info, warn};
use sms_backend::{AuthSubscription, BackendError, Session, SessionLookup, SignUpOutcome};
use sms_core::{Identity, Profile, ProfileUpdate};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;

const COMMAND_CHANNEL_CAPACITY: usize = 16;

enum Command {
    ApplyProfile {
        profile: Profile,
        ack: oneshot::Sender<()>,
    },
}

/// Background work reporting back to the loop
enum Outcome {
    Lookup(SessionLookup),
    LookupFailed(BackendError),
    Profile { generation: u64, profile: Profile },
}

/// Owns the session loop. Hand [`SessionHandle`]s to readers.
pub struct SessionManager {
    auth: Arc<dyn AuthProvider>,
    profiles: Arc<dyn ProfileStore>,
    snapshot: watch::Receiver<SessionSnapshot>,
    commands: mpsc::Sender<Command>,
    shutdown_tx: broadcast::Sender<()>,
    task: Option<JoinHandle<()>>,
}

impl SessionManager {
    /// Subscribe to auth changes, start the loop and kick off the initial
    /// session lookup. Must be called inside a tokio runtime.
    pub fn start(
        auth: Arc<dyn AuthProvider>,
        profiles: Arc<dyn ProfileStore>,
        settings: SessionSettings,
    ) -> Self {
        // Subscribe before looking up so no change can fall in between
        let subscription = auth.subscribe();

        let (snapshot_tx, snapshot_rx) = watch::channel(SessionSnapshot::initializing());
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let session_loop = SessionLoop {
            auth: Arc::clone(&auth),
            profiles: Arc::clone(&profiles),
            settings,
            snapshot_tx,
            outcomes_tx,
            last_applied: None,
            pending_profile: None,
        };
        session_loop.spawn_lookup();

        let task = tokio::spawn(session_loop.run(
            subscription,
            commands_rx,
            outcomes_rx,
            shutdown_rx,
        ));

        Self {
            auth,
            profiles,
            snapshot: snapshot_rx,
            commands: commands_tx,
            shutdown_tx,
            task: Some(task),
        }
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle::new(self.snapshot.clone())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Returns once the snapshot reflects the new identity
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let email = require("email", email)?;
        require("password", password)?;

        let event = self.auth.sign_in(email, password).await.map_err(|e| {
            error!("Sign-in failed for {email}: {e}");
            AuthError::from(e)
        })?;

        self.wait_for_generation(event.generation).await?;
        event.session.ok_or_else(AuthError::not_signed_in)
    }

    /// Create an account and its profile row.
    ///
    /// A failed profile insert does not fail the sign-up; the row is
    /// repaired on the next profile resolution.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<SignUpOutcome> {
        let email = require("email", email)?;
        require("password", password)?;

        let (outcome, event) = self
            .auth
            .sign_up(email, password, display_name)
            .await
            .map_err(|e| {
                error!("Sign-up failed for {email}: {e}");
                AuthError::from(e)
            })?;

        let identity = outcome.user.identity();
        let new_profile = Profile::for_new_account(&identity, display_name);
        let inserted = match self.profiles.insert(&new_profile).await {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!("Profile row for new account {} not created: {e}", identity.id);
                None
            }
        };

        if let Some(event) = event {
            self.wait_for_generation(event.generation).await?;
            if let Some(profile) = inserted {
                self.apply_profile(profile).await?;
            }
        }

        Ok(outcome)
    }

    /// Returns once the snapshot is signed out
    pub async fn sign_out(&self) -> Result<()> {
        let event = self.auth.sign_out().await.map_err(|e| {
            error!("Sign-out failed: {e}");
            AuthError::from(e)
        })?;

        self.wait_for_generation(event.generation).await
    }

    /// Write the signed-in user's profile and publish the stored row
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<Profile> {
        update.validate()?;

        let identity = self
            .snapshot()
            .identity
            .ok_or_else(AuthError::not_signed_in)?;

        let profile = self
            .profiles
            .update(identity.id, &update)
            .await
            .map_err(|e| {
                error!("Profile update failed for {}: {e}", identity.id);
                AuthError::from(e)
            })?;

        self.apply_profile(profile.clone()).await?;
        Ok(profile)
    }

    /// Stop the loop and unsubscribe. Profile lookups still in flight finish
    /// on their own and their results are dropped.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(());
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            warn!("Session loop ended abnormally: {e}");
        }
    }

    async fn wait_for_generation(&self, generation: u64) -> Result<()> {
        self.handle()
            .wait_for(|snapshot| snapshot.generation >= generation)
            .await
            .map(|_| ())
    }

    async fn apply_profile(&self, profile: Profile) -> Result<()> {
        let (ack, done) = oneshot::channel();
        self.commands
            .send(Command::ApplyProfile { profile, ack })
            .await
            .map_err(|_| AuthError::manager_stopped())?;
        done.await.map_err(|_| AuthError::manager_stopped())
    }
}

fn require<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AuthError::invalid_input(field, "must not be empty"));
    }
    Ok(trimmed)
}

struct SessionLoop {
    auth: Arc<dyn AuthProvider>,
    profiles: Arc<dyn ProfileStore>,
    settings: SessionSettings,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    outcomes_tx: mpsc::UnboundedSender<Outcome>,
    /// Generation of the newest observation applied; None until the first
    last_applied: Option<u64>,
    /// Generation whose profile resolution may still be applied
    pending_profile: Option<u64>,
}

impl SessionLoop {
    async fn run(
        mut self,
        mut subscription: AuthSubscription,
        mut commands: mpsc::Receiver<Command>,
        mut outcomes: mpsc::UnboundedReceiver<Outcome>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        info!("Session loop started");

        loop {
            tokio::select! {
                biased;

                // Explicit shutdown, or the manager was dropped
                _ = shutdown.recv() => break,

                event = subscription.recv() => match event {
                    Ok(event) => {
                        debug!("Auth change {:?} (generation {})", event.kind, event.generation);
                        self.observe(event.generation, event.session);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Missed {skipped} auth notifications, re-reading session");
                        self.spawn_lookup();
                    }
                    Err(RecvError::Closed) => {
                        warn!("Auth notifications closed, stopping session loop");
                        break;
                    }
                },

                Some(outcome) = outcomes.recv() => self.handle_outcome(outcome),

                Some(command) = commands.recv() => self.handle_command(command),
            }
        }

        subscription.unsubscribe();
        info!("Session loop stopped");
    }

    fn current(&self) -> SessionSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    fn publish(&self, snapshot: SessionSnapshot) {
        debug!(
            "Session snapshot: {:?} (generation {})",
            snapshot.phase, snapshot.generation
        );
        self.snapshot_tx.send_replace(snapshot);
    }

    /// Apply a session observation unless a newer one is already applied
    fn observe(&mut self, generation: u64, session: Option<Session>) {
        if self.last_applied.is_some_and(|last| generation <= last) {
            debug!("Discarding stale session observation (generation {generation})");
            return;
        }
        self.last_applied = Some(generation);

        let Some(session) = session else {
            self.pending_profile = None;
            self.publish(SessionSnapshot::signed_out(generation));
            return;
        };

        let identity = session.identity();
        let full_name = session.user.full_name().map(str::to_string);
        let current = self.current();

        // Same user (token refresh, metadata update): keep showing the
        // resolved profile while it is fetched again
        let kept = match (&current.identity, current.profile) {
            (Some(known), Some(profile)) if known.id == identity.id => Some(profile),
            _ => None,
        };
        let phase = if kept.is_some() {
            SessionPhase::Ready
        } else {
            SessionPhase::LoadingProfile
        };

        self.publish(SessionSnapshot {
            identity: Some(identity.clone()),
            profile: kept,
            phase,
            generation,
        });
        self.spawn_profile_resolution(generation, identity, full_name);
    }

    fn handle_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Lookup(lookup) => self.observe(lookup.generation, lookup.session),
            Outcome::LookupFailed(e) => {
                if self.last_applied.is_none() {
                    warn!("Session lookup failed, treating as signed out: {e}");
                    self.publish(SessionSnapshot::signed_out(0));
                } else {
                    warn!("Session lookup failed, keeping current session: {e}");
                }
            }
            Outcome::Profile {
                generation,
                profile,
            } => {
                if self.pending_profile != Some(generation) {
                    debug!("Discarding profile resolved for generation {generation}");
                    return;
                }
                self.pending_profile = None;
                self.set_profile(profile);
            }
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::ApplyProfile { profile, ack } => {
                // A stored row beats whatever lookup is still running
                self.pending_profile = None;
                self.set_profile(profile);
                let _ = ack.send(());
            }
        }
    }

    fn set_profile(&self, profile: Profile) {
        let mut snapshot = self.current();
        if snapshot.identity.as_ref().map(|i| i.id) != Some(profile.id) {
            debug!("Ignoring profile {} for another identity", profile.id);
            return;
        }
        snapshot.profile = Some(profile);
        snapshot.phase = SessionPhase::Ready;
        self.publish(snapshot);
    }

    fn spawn_lookup(&self) {
        let auth = Arc::clone(&self.auth);
        let outcomes = self.outcomes_tx.clone();

        tokio::spawn(async move {
            let outcome = match auth.current_session().await {
                Ok(lookup) => Outcome::Lookup(lookup),
                Err(e) => Outcome::LookupFailed(e),
            };
            // Loop gone: nobody left to update
            let _ = outcomes.send(outcome);
        });
    }

    fn spawn_profile_resolution(
        &mut self,
        generation: u64,
        identity: Identity,
        full_name: Option<String>,
    ) {
        self.pending_profile = Some(generation);

        let profiles = Arc::clone(&self.profiles);
        let settings = self.settings.clone();
        let outcomes = self.outcomes_tx.clone();

        tokio::spawn(async move {
            let profile = resolve_profile(
                profiles.as_ref(),
                &settings,
                &identity,
                full_name.as_deref(),
            )
            .await;
            let _ = outcomes.send(Outcome::Profile {
                generation,
                profile,
            });
        });
    }
}

/// Stored profile, else a repaired one, else the local default. Never fails.
///
/// A repaired row takes the name from the account metadata, so it matches
/// the row sign-up would have written if the repair got there first.
async fn resolve_profile(
    profiles: &dyn ProfileStore,
    settings: &SessionSettings,
    identity: &Identity,
    full_name: Option<&str>,
) -> Profile {
    let limit = settings.profile_fetch_timeout;

    match timeout(limit, profiles.fetch(identity.id)).await {
        Ok(Ok(profile)) => {
            debug!("Loaded profile for {}", identity.id);
            profile
        }
        Ok(Err(e)) if e.is_not_found() && settings.repair_missing_profiles => {
            warn!("No profile for {}, creating a default one", identity.id);
            let repaired = match full_name {
                Some(name) => Profile::for_new_account(identity, name),
                None => Profile::fallback(identity),
            };
            match timeout(limit, profiles.insert(&repaired)).await {
                Ok(Ok(stored)) => stored,
                Ok(Err(e)) => {
                    warn!("Creating default profile for {} failed: {e}", identity.id);
                    Profile::fallback(identity)
                }
                Err(_) => {
                    warn!(
                        "Creating default profile for {} timed out after {limit:?}",
                        identity.id
                    );
                    Profile::fallback(identity)
                }
            }
        }
        Ok(Err(e)) => {
            warn!("Profile lookup failed for {}, using default: {e}", identity.id);
            Profile::fallback(identity)
        }
        Err(_) => {
            warn!(
                "Profile lookup for {} timed out after {limit:?}, using default",
                identity.id
            );
            Profile::fallback(identity)
        }
    }
}
