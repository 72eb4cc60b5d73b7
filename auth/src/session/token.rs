use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use super::errors::SessionTokenError;

/// Opaque session token handed to clients as a cookie value.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a token received from a client.
    ///
    /// Only the shape is checked here; whether the token maps to a live
    /// session is up to the session store.
    ///
    /// # Errors
    /// * `Empty` - Token is an empty string
    /// * `InvalidCharacters` - Token contains characters outside the URL-safe base64 alphabet
    pub fn parse(token: impl Into<String>) -> Result<Self, SessionTokenError> {
        let token = token.into();
        if token.is_empty() {
            return Err(SessionTokenError::Empty);
        }
        if !token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(SessionTokenError::InvalidCharacters);
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

// Tokens are credentials; keep them out of debug logs.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&"<redacted>").finish()
    }
}

/// Session token generator backed by the operating system CSPRNG.
pub struct SessionTokenGenerator {
    length: usize,
}

impl SessionTokenGenerator {
    /// Number of random bytes in a token (256 bits).
    pub const DEFAULT_LENGTH: usize = 32;

    /// Create a generator producing tokens of `DEFAULT_LENGTH` random bytes.
    pub fn new() -> Self {
        Self {
            length: Self::DEFAULT_LENGTH,
        }
    }

    /// Generate a fresh, unguessable session token.
    ///
    /// # Returns
    /// URL-safe base64 (no padding) encoding of `length` random bytes
    pub fn generate(&self) -> SessionToken {
        let mut bytes = vec![0u8; self.length];
        OsRng.fill_bytes(&mut bytes);
        SessionToken(URL_SAFE_NO_PAD.encode(bytes))
    }
}

impl Default for SessionTokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}
