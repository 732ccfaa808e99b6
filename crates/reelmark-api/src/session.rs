use std::fmt;

/// Credentials for an authenticated account session.
///
/// Supplied by whatever performed the login; the client only reads them.
/// All three values are treated as opaque strings.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionContext {
    api_key: String,
    session_id: String,
    user_id: String,
}

impl SessionContext {
    pub fn new(
        api_key: impl Into<String>,
        session_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            session_id: session_id.into(),
            user_id: user_id.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("api_key", &"<redacted>")
            .field("session_id", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}
