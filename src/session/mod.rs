//! Session resolution: deriving the current user from the stored token.
//!
//! The session is the single writer of the current-user snapshot; everything
//! else reads it. State moves Resolving -> Anonymous | Authenticated, and a
//! token change (login, register, logout) re-enters Resolving via
//! [`Session::resolve`].

use std::sync::{Arc, PoisonError, RwLock};

use crate::auth;
use crate::client::YamClient;
use crate::error::ApiError;
use crate::models::{LoginData, RegisterData, User};
use crate::store::TokenStore;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Resolution in progress; the UI shows a loading indicator, nothing else.
    #[default]
    Resolving,
    Anonymous,
    Authenticated(User),
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

pub struct Session {
    client: Arc<YamClient>,
    tokens: TokenStore,
    state: RwLock<SessionState>,
}

impl Session {
    pub fn new(client: Arc<YamClient>, tokens: TokenStore) -> Self {
        Self {
            client,
            tokens,
            state: RwLock::new(SessionState::Resolving),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state().user().cloned()
    }

    pub fn client(&self) -> &Arc<YamClient> {
        &self.client
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    fn set_state(&self, state: SessionState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Establish the current user from the stored token.
    ///
    /// No token, a token that fails to decode, or a backend that rejects the
    /// decoded user id all resolve to Anonymous. A rejected token stays in
    /// the store; only an explicit logout removes it.
    pub async fn resolve(&self) -> SessionState {
        self.set_state(SessionState::Resolving);

        let Some(token) = self.tokens.get() else {
            self.set_state(SessionState::Anonymous);
            return self.state();
        };

        let claims = match auth::decode_claims(&token) {
            Ok(claims) => claims,
            Err(err) => {
                tracing::warn!("stored token failed to decode, treating as anonymous: {}", err);
                self.set_state(SessionState::Anonymous);
                return self.state();
            }
        };

        // The token rides along on this fetch and every request after it.
        self.client.set_token(Some(&token));

        match self.client.get_user(claims.id).await {
            Ok(user) => {
                tracing::debug!("session resolved for user {}", user.id);
                self.set_state(SessionState::Authenticated(user));
            }
            Err(err) => {
                // Token stays in the store; see DESIGN.md on this decision.
                tracing::warn!(
                    "user fetch for id {} failed, treating as anonymous: {}",
                    claims.id,
                    err
                );
                self.set_state(SessionState::Anonymous);
            }
        }

        self.state()
    }

    /// Log in and establish the session. Stores the returned token first so
    /// a process restart resumes the same session.
    pub async fn login(&self, data: &LoginData) -> Result<User, ApiError> {
        let token = self.client.login(data).await?;
        self.install_token(&token).await
    }

    /// Register a new account. Registration logs the user in immediately.
    pub async fn register(&self, data: &RegisterData) -> Result<User, ApiError> {
        let token = self.client.register(data).await?;
        self.install_token(&token).await
    }

    async fn install_token(&self, token: &str) -> Result<User, ApiError> {
        self.tokens.set(Some(token))?;
        match self.resolve().await {
            SessionState::Authenticated(user) => Ok(user),
            _ => Err(ApiError::Session(
                "token was issued but the user could not be fetched".to_string(),
            )),
        }
    }

    /// Drop the session: clear the stored token, the client credential, and
    /// the current user, all synchronously.
    pub fn logout(&self) {
        if let Err(err) = self.tokens.set(None) {
            tracing::warn!("failed to remove stored token: {}", err);
        }
        self.client.set_token(None);
        self.set_state(SessionState::Anonymous);
    }
}
