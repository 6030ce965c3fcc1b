use std::fmt;

use base64::{Engine, engine::general_purpose};
use http::HeaderValue;

use super::error::ClientError;

/// Username and password sent as HTTP basic auth. Both empty means anonymous access.
#[derive(Clone, Default, PartialEq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<hidden>")
            .finish()
    }
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn is_anonymous(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }

    /// `Authorization` header value, or `None` for anonymous credentials.
    pub(crate) fn authorization_header(&self) -> Result<Option<HeaderValue>, ClientError> {
        if self.is_anonymous() {
            return Ok(None);
        }
        let encoded =
            general_purpose::STANDARD.encode(format!("{}:{}", self.username, self.password));
        let mut header = HeaderValue::from_str(&format!("Basic {encoded}")).map_err(|_| {
            ClientError::InvalidRequest(
                "invalid HTTP header value set for Authorization".to_string(),
            )
        })?;
        header.set_sensitive(true);
        Ok(Some(header))
    }
}
