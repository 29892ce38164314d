//! Session gate run once at the composition root, before any view exists.

use mlnano_client::Session;
use thiserror::Error;
use tracing::debug;

use crate::config::ContextConfig;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("not signed in: no auth token in context (set one with `mlnano context set --token` or MLNANO_AUTH_TOKEN)")]
    MissingToken,
    #[error("not signed in: no identity id in context (set one with `mlnano context set --identity` or MLNANO_IDENTITY_ID)")]
    MissingIdentity,
}

pub struct AuthGate;

impl AuthGate {
    pub fn require_session(context: &ContextConfig) -> Result<Session, AuthError> {
        let token = context
            .auth_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(AuthError::MissingToken)?;
        let identity = context
            .identity_id
            .as_deref()
            .filter(|i| !i.trim().is_empty())
            .ok_or(AuthError::MissingIdentity)?;
        debug!(identity, "session available");
        Ok(Session::new(identity, token))
    }
}
