use crate::{
    AUTH_PATH, AuthChangeEvent, AuthEvent, AuthSubscription, BackendClient, BackendError,
    BackendResult, EXPIRY_MARGIN_SECS, Session, SessionLookup, SessionStorage, SignUpOutcome,
};

use std::sync::Arc;

use log::{debug, info, warn};
use reqwest::Method;
use serde_json::json;
use tokio::sync::{Mutex, broadcast};

const EVENT_CHANNEL_CAPACITY: usize = 32;

#[derive(Default)]
struct AuthState {
    session: Option<Session>,
    generation: u64,
    loaded: bool,
}

/// Password auth against `/auth/v1`, with the current session kept in
/// memory, mirrored to [`SessionStorage`] and announced to subscribers.
pub struct AuthClient {
    client: BackendClient,
    storage: Arc<dyn SessionStorage>,
    state: Mutex<AuthState>,
    events: broadcast::Sender<AuthEvent>,
}

impl AuthClient {
    pub fn new(client: BackendClient, storage: Arc<dyn SessionStorage>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            client,
            storage,
            state: Mutex::new(AuthState::default()),
            events,
        }
    }

    pub fn backend(&self) -> &BackendClient {
        &self.client
    }

    /// Session-change notifications from now on
    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription::new(self.events.subscribe())
    }

    /// Generation of the most recent change
    pub async fn generation(&self) -> u64 {
        self.state.lock().await.generation
    }

    /// Current session, loading it from storage on first use and refreshing
    /// it when it is expired or about to expire.
    ///
    /// A refresh the server rejects signs the user out. A refresh that never
    /// reached the server is an error and leaves the stored session alone.
    pub async fn current_session(&self) -> BackendResult<SessionLookup> {
        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state);

        let now = chrono::Utc::now().timestamp();
        let refresh_token = match &state.session {
            Some(session) if session.is_expired(now, EXPIRY_MARGIN_SECS) => {
                session.refresh_token.clone()
            }
            _ => {
                return Ok(SessionLookup {
                    session: state.session.clone(),
                    generation: state.generation,
                });
            }
        };

        debug!("Stored session expired or expiring, refreshing");
        match self.request_refresh(&refresh_token).await {
            Ok(session) => {
                let event =
                    self.apply(&mut state, AuthChangeEvent::TokenRefreshed, Some(session));
                Ok(SessionLookup {
                    session: event.session,
                    generation: event.generation,
                })
            }
            Err(e) if e.is_rejection() => {
                warn!("Session refresh rejected, signing out: {e}");
                let event = self.apply(&mut state, AuthChangeEvent::SignedOut, None);
                Ok(SessionLookup {
                    session: None,
                    generation: event.generation,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Sign in with email and password; returns the `SignedIn` notification
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> BackendResult<AuthEvent> {
        let path = format!("{AUTH_PATH}/token?grant_type=password");
        let req = self
            .client
            .request(Method::POST, &path, None)
            .json(&json!({ "email": email, "password": password }));

        let body = self.client.execute(req).await?;
        let session: Session = serde_json::from_value(body)?;
        let session = session.with_expiry_from(chrono::Utc::now().timestamp());

        info!("Signed in as {}", session.user.id);
        let mut state = self.state.lock().await;
        state.loaded = true;
        Ok(self.apply(&mut state, AuthChangeEvent::SignedIn, Some(session)))
    }

    /// Create an account. `full_name` is stored in the user metadata.
    ///
    /// When the backend returns a session right away the client is signed in
    /// and the `SignedIn` notification is returned alongside the outcome.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> BackendResult<(SignUpOutcome, Option<AuthEvent>)> {
        let path = format!("{AUTH_PATH}/signup");
        let req = self.client.request(Method::POST, &path, None).json(&json!({
            "email": email,
            "password": password,
            "data": { "full_name": full_name },
        }));

        let body = self.client.execute(req).await?;
        let outcome = SignUpOutcome::from_body(body, chrono::Utc::now().timestamp())?;
        info!("Signed up {}", outcome.user.id);

        let event = match &outcome.session {
            Some(session) => {
                let mut state = self.state.lock().await;
                state.loaded = true;
                Some(self.apply(&mut state, AuthChangeEvent::SignedIn, Some(session.clone())))
            }
            None => {
                info!("Sign-up awaiting email confirmation");
                None
            }
        };

        Ok((outcome, event))
    }

    /// Revoke the session on the server and forget it locally.
    ///
    /// A server that no longer knows the token still counts as signed out;
    /// a transport failure keeps the session so the call can be retried.
    pub async fn sign_out(&self) -> BackendResult<AuthEvent> {
        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state);

        if let Some(session) = &state.session {
            let path = format!("{AUTH_PATH}/logout");
            let req = self
                .client
                .request(Method::POST, &path, Some(&session.access_token));

            match self.client.execute(req).await {
                Ok(_) => {}
                Err(e) if e.is_rejection() => {
                    warn!("Server rejected logout, clearing local session anyway: {e}");
                }
                Err(e) => return Err(e),
            }
        }

        info!("Signed out");
        Ok(self.apply(&mut state, AuthChangeEvent::SignedOut, None))
    }

    /// Exchange the refresh token for a new session now
    pub async fn refresh_session(&self) -> BackendResult<AuthEvent> {
        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state);

        let refresh_token = match &state.session {
            Some(session) => session.refresh_token.clone(),
            None => return Err(BackendError::not_signed_in()),
        };

        match self.request_refresh(&refresh_token).await {
            Ok(session) => {
                Ok(self.apply(&mut state, AuthChangeEvent::TokenRefreshed, Some(session)))
            }
            Err(e) => {
                if e.is_rejection() {
                    warn!("Session refresh rejected, signing out: {e}");
                    self.apply(&mut state, AuthChangeEvent::SignedOut, None);
                }
                Err(e)
            }
        }
    }

    async fn request_refresh(&self, refresh_token: &str) -> BackendResult<Session> {
        let path = format!("{AUTH_PATH}/token?grant_type=refresh_token");
        let req = self
            .client
            .request(Method::POST, &path, None)
            .json(&json!({ "refresh_token": refresh_token }));

        let body = self.client.execute(req).await?;
        let session: Session = serde_json::from_value(body)?;
        Ok(session.with_expiry_from(chrono::Utc::now().timestamp()))
    }

    fn ensure_loaded(&self, state: &mut AuthState) {
        if state.loaded {
            return;
        }
        state.loaded = true;

        match self.storage.load() {
            Ok(session) => state.session = session,
            Err(e) => warn!("Failed to load stored session, starting signed out: {e}"),
        }
    }

    /// Record a change: persist, bump the generation, notify.
    fn apply(
        &self,
        state: &mut AuthState,
        kind: AuthChangeEvent,
        session: Option<Session>,
    ) -> AuthEvent {
        let persisted = match &session {
            Some(session) => self.storage.save(session),
            None => self.storage.clear(),
        };
        if let Err(e) = persisted {
            warn!("Failed to persist session change: {e}");
        }

        state.session = session;
        state.generation += 1;

        let event = AuthEvent {
            kind,
            session: state.session.clone(),
            generation: state.generation,
        };

        // No subscribers is fine
        let _ = self.events.send(event.clone());
        debug!("Auth change {:?} (generation {})", kind, state.generation);
        event
    }
}
