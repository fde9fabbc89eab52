use crate::db::{load_or_default, save, PersistentStore};
use crate::errors::{AppError, AppResult};
use crate::models::Session;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub const SESSION_KEY: &str = "user";

pub trait AuthGate: Send + Sync {
    fn is_authorized(&self) -> bool;
}

impl<F> AuthGate for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_authorized(&self) -> bool {
        self()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    pub username: String,
    pub password: String,
}

impl Default for StaticCredentials {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "password".to_string(),
        }
    }
}

pub struct SessionManager {
    store: Arc<dyn PersistentStore>,
    credentials: StaticCredentials,
}

impl SessionManager {
    pub fn new(store: Arc<dyn PersistentStore>, credentials: StaticCredentials) -> Self {
        Self { store, credentials }
    }

    pub fn login(&self, username: &str, password: &str) -> AppResult<Session> {
        if username != self.credentials.username || password != self.credentials.password {
            tracing::warn!(username, "login rejected");
            return Err(AppError::Unauthorized("Invalid username or password".to_string()));
        }

        let session = Session {
            username: username.to_string(),
            session_id: Some(Uuid::new_v4().to_string()),
            logged_in_at: Some(Utc::now()),
        };
        save(self.store.as_ref(), SESSION_KEY, &session)?;
        tracing::info!(username, "logged in");
        Ok(session)
    }

    pub fn logout(&self) -> AppResult<()> {
        self.store.remove(SESSION_KEY)?;
        tracing::info!("logged out");
        Ok(())
    }

    pub fn current_session(&self) -> AppResult<Option<Session>> {
        load_or_default(self.store.as_ref(), SESSION_KEY)
    }
}

impl AuthGate for SessionManager {
    fn is_authorized(&self) -> bool {
        match self.current_session() {
            Ok(session) => session.is_some(),
            Err(error) => {
                tracing::warn!(error = %error, "session lookup failed");
                false
            }
        }
    }
}
