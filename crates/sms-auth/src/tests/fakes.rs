//! In-memory stand-ins for the auth service and the profile table.

use crate::{AuthProvider, ProfileStore};

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use sms_backend::{
    AuthChangeEvent, AuthEvent, AuthSubscription, AuthUser, BackendError, BackendResult, Session,
    SessionLookup, SignUpOutcome,
};
use sms_core::{Identity, Profile, ProfileUpdate, Role};
use tokio::sync::{Notify, broadcast};
use uuid::Uuid;

pub(crate) const PASSWORD: &str = "secret";

pub(crate) fn user_id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

pub(crate) fn session_for(id: Uuid, email: &str) -> Session {
    Session {
        access_token: format!("access-{id}"),
        refresh_token: format!("refresh-{id}"),
        token_type: String::from("bearer"),
        expires_in: 3600,
        expires_at: None,
        user: AuthUser {
            id,
            email: Some(email.to_string()),
            user_metadata: Value::Null,
        },
    }
}

pub(crate) fn profile_row(id: Uuid, email: &str, role: Option<Role>) -> Profile {
    Profile {
        full_name: Some(String::from("Stored Name")),
        role,
        ..Profile::fallback(&Identity::new(id, email))
    }
}

fn rejection(status: u16, code: &str) -> BackendError {
    BackendError::from_error_body(status, &json!({ "error_code": code, "msg": code }))
}

struct FakeAuthState {
    session: Option<Session>,
    generation: u64,
    accounts: HashMap<String, Uuid>,
}

/// Auth service double. Accounts sign in with [`PASSWORD`].
pub(crate) struct FakeAuth {
    events: broadcast::Sender<AuthEvent>,
    state: Mutex<FakeAuthState>,
    /// When set, the next lookups wait for this and answer with a snapshot
    /// taken before waiting
    lookup_gate: Mutex<Option<Arc<Notify>>>,
    lookup_calls: AtomicUsize,
    sign_up_returns_session: AtomicBool,
}

impl FakeAuth {
    pub(crate) fn new() -> Self {
        Self::with_capacity(16)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity);
        Self {
            events,
            state: Mutex::new(FakeAuthState {
                session: None,
                generation: 0,
                accounts: HashMap::new(),
            }),
            lookup_gate: Mutex::new(None),
            lookup_calls: AtomicUsize::new(0),
            sign_up_returns_session: AtomicBool::new(true),
        }
    }

    pub(crate) fn with_account(self, email: &str, id: Uuid) -> Self {
        self.state
            .lock()
            .unwrap()
            .accounts
            .insert(email.to_string(), id);
        self
    }

    pub(crate) fn with_stored_session(self, session: Session) -> Self {
        self.state.lock().unwrap().session = Some(session);
        self
    }

    pub(crate) fn gate_lookups(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.lookup_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub(crate) fn require_email_confirmation(&self) {
        self.sign_up_returns_session.store(false, Ordering::SeqCst);
    }

    pub(crate) fn lookup_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    /// Broadcast a change without awaiting anything
    pub(crate) fn emit(&self, kind: AuthChangeEvent, session: Option<Session>) -> AuthEvent {
        let mut state = self.state.lock().unwrap();
        state.session = session;
        state.generation += 1;
        let event = AuthEvent {
            kind,
            session: state.session.clone(),
            generation: state.generation,
        };
        let _ = self.events.send(event.clone());
        event
    }
}

#[async_trait]
impl AuthProvider for FakeAuth {
    fn subscribe(&self) -> AuthSubscription {
        AuthSubscription::new(self.events.subscribe())
    }

    async fn current_session(&self) -> BackendResult<SessionLookup> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        let lookup = {
            let state = self.state.lock().unwrap();
            SessionLookup {
                session: state.session.clone(),
                generation: state.generation,
            }
        };

        let gate = self.lookup_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(lookup)
    }

    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<AuthEvent> {
        let id = self.state.lock().unwrap().accounts.get(email).copied();
        match id {
            Some(id) if password == PASSWORD => {
                Ok(self.emit(AuthChangeEvent::SignedIn, Some(session_for(id, email))))
            }
            _ => Err(rejection(400, "invalid_credentials")),
        }
    }

    async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        full_name: &str,
    ) -> BackendResult<(SignUpOutcome, Option<AuthEvent>)> {
        let id = {
            let mut state = self.state.lock().unwrap();
            if state.accounts.contains_key(email) {
                return Err(rejection(422, "user_already_exists"));
            }
            let id = Uuid::new_v4();
            state.accounts.insert(email.to_string(), id);
            id
        };

        let mut session = session_for(id, email);
        session.user.user_metadata = json!({ "full_name": full_name });
        if self.sign_up_returns_session.load(Ordering::SeqCst) {
            let event = self.emit(AuthChangeEvent::SignedIn, Some(session.clone()));
            let outcome = SignUpOutcome {
                user: session.user.clone(),
                session: Some(session),
            };
            Ok((outcome, Some(event)))
        } else {
            let outcome = SignUpOutcome {
                user: session.user,
                session: None,
            };
            Ok((outcome, None))
        }
    }

    async fn sign_out(&self) -> BackendResult<AuthEvent> {
        Ok(self.emit(AuthChangeEvent::SignedOut, None))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FetchBehavior {
    /// Answer from the stored rows (NotFound when absent)
    Rows,
    Fail,
    Hang,
}

/// Profile table double
pub(crate) struct FakeProfiles {
    rows: Mutex<HashMap<Uuid, Profile>>,
    behavior: Mutex<FetchBehavior>,
    fail_inserts: AtomicBool,
    fetch_delay: Mutex<Option<Duration>>,
    /// Applied once, to whichever insert comes first
    first_insert_delay: Mutex<Option<Duration>>,
    fetch_calls: AtomicUsize,
    insert_calls: AtomicUsize,
}

impl FakeProfiles {
    pub(crate) fn new() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            behavior: Mutex::new(FetchBehavior::Rows),
            fail_inserts: AtomicBool::new(false),
            fetch_delay: Mutex::new(None),
            first_insert_delay: Mutex::new(None),
            fetch_calls: AtomicUsize::new(0),
            insert_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_row(self, profile: Profile) -> Self {
        self.rows.lock().unwrap().insert(profile.id, profile);
        self
    }

    pub(crate) fn set_behavior(&self, behavior: FetchBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub(crate) fn delay_fetches(&self, delay: Duration) {
        *self.fetch_delay.lock().unwrap() = Some(delay);
    }

    pub(crate) fn delay_first_insert(&self, delay: Duration) {
        *self.first_insert_delay.lock().unwrap() = Some(delay);
    }

    pub(crate) fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }

    pub(crate) fn row(&self, id: Uuid) -> Option<Profile> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    pub(crate) fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileStore for FakeProfiles {
    async fn fetch(&self, id: Uuid) -> BackendResult<Profile> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.fetch_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let behavior = *self.behavior.lock().unwrap();
        match behavior {
            FetchBehavior::Rows => self.row(id).ok_or_else(rejection_no_rows),
            FetchBehavior::Fail => Err(rejection(500, "internal")),
            FetchBehavior::Hang => std::future::pending().await,
        }
    }

    async fn insert(&self, profile: &Profile) -> BackendResult<Profile> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.first_insert_delay.lock().unwrap().take();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(rejection(403, "permission_denied"));
        }
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&profile.id) {
            return Err(rejection(409, "23505"));
        }
        rows.insert(profile.id, profile.clone());
        Ok(profile.clone())
    }

    async fn update(&self, id: Uuid, update: &ProfileUpdate) -> BackendResult<Profile> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.get_mut(&id).ok_or_else(rejection_no_rows)?;
        if let Some(name) = &update.full_name {
            row.full_name = Some(name.clone());
        }
        if let Some(avatar) = &update.avatar_url {
            row.avatar_url = Some(avatar.clone());
        }
        if let Some(role) = update.role {
            row.role = Some(role);
        }
        Ok(row.clone())
    }
}

fn rejection_no_rows() -> BackendError {
    BackendError::from_error_body(406, &json!({ "code": "PGRST116", "message": "0 rows" }))
}
