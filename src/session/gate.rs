use super::models::{AdminCredentials, LoginOutcome, SessionToken, SessionUser};
use super::store::SessionStore;
use crate::latency::{Latency, Operation};
use anyhow::Result;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{error, info, warn};

pub const AUTH_TOKEN_KEY: &str = "auth_token";
pub const USER_DATA_KEY: &str = "user_data";

#[derive(Clone, Debug, Default)]
struct SessionState {
    authenticated: bool,
    user: Option<SessionUser>,
}

/// Checks the admin credentials and remembers who is logged in.
///
/// The in-memory flags are the source of truth while the process runs; the
/// [`SessionStore`] only exists so [`SessionGate::check_auth_status`] can
/// bring them back after a restart.
pub struct SessionGate {
    credentials: AdminCredentials,
    store: Box<dyn SessionStore>,
    state: Mutex<SessionState>,
    latency: Latency,
}

impl SessionGate {
    pub fn new(credentials: AdminCredentials, store: Box<dyn SessionStore>) -> Self {
        SessionGate {
            credentials,
            store,
            state: Mutex::new(SessionState::default()),
            latency: Latency::None,
        }
    }

    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().authenticated
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.lock().user.clone()
    }

    pub async fn login(&self, username: &str, password: &str) -> LoginOutcome {
        self.latency.wait(Operation::Login).await;

        if !self.credentials.matches(username, password) {
            info!("Rejected login attempt for \"{}\"", username);
            return LoginOutcome {
                success: false,
                message: "Invalid credentials".to_string(),
            };
        }

        let user = SessionUser::administrator(&self.credentials.username);
        {
            let mut state = self.lock();
            state.authenticated = true;
            state.user = Some(user.clone());
        }
        if let Err(err) = self.persist(&user) {
            warn!("Session for {} will not survive a restart: {:#}", user.username, err);
        }

        info!("User {} logged in", user.username);
        LoginOutcome {
            success: true,
            message: "Login successful".to_string(),
        }
    }

    fn persist(&self, user: &SessionUser) -> Result<()> {
        let token = SessionToken::generate();
        let user_data = serde_json::to_string(user)?;
        self.store.set(AUTH_TOKEN_KEY, &token.0)?;
        self.store.set(USER_DATA_KEY, &user_data)?;
        Ok(())
    }

    /// Clears the in-memory session and the persisted entries.
    pub fn logout(&self) {
        {
            let mut state = self.lock();
            if let Some(user) = state.user.take() {
                info!("User {} logged out", user.username);
            }
            state.authenticated = false;
        }
        for key in [AUTH_TOKEN_KEY, USER_DATA_KEY] {
            if let Err(err) = self.store.remove(key) {
                warn!("Failed to remove persisted {}: {:#}", key, err);
            }
        }
    }

    /// The persisted value under `key`. An empty value counts as missing.
    fn read_entry(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(err) => {
                warn!("Failed to read persisted {}: {:#}", key, err);
                None
            }
        }
    }

    /// Restores the session from the persisted entries. A corrupt user
    /// record logs everything out.
    pub fn check_auth_status(&self) -> bool {
        let token = self.read_entry(AUTH_TOKEN_KEY);
        let user_data = self.read_entry(USER_DATA_KEY);
        let (Some(_), Some(user_data)) = (token, user_data) else {
            return false;
        };

        match serde_json::from_str::<SessionUser>(&user_data) {
            Ok(user) => {
                info!("Restored session for {}", user.username);
                let mut state = self.lock();
                state.authenticated = true;
                state.user = Some(user);
                true
            }
            Err(err) => {
                error!("Error parsing persisted user data: {}", err);
                self.logout();
                false
            }
        }
    }
}
