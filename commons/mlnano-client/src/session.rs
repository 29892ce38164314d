use std::fmt;

/// An authenticated identity. Only the auth gate constructs one; everything
/// downstream receives it already validated.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    identity_id: String,
    token: String,
}

impl Session {
    pub fn new(identity_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            identity_id: identity_id.into(),
            token: token.into(),
        }
    }

    pub fn identity_id(&self) -> &str {
        &self.identity_id
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("identity_id", &self.identity_id)
            .field("token", &"<redacted>")
            .finish()
    }
}
