use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Username;

/// Cookie name under which the session token is issued.
pub const DEFAULT_SESSION_COOKIE: &str = "session";

/// Cookies keyed by name, as sent by a client or issued to one.
pub type CookieSet = BTreeMap<String, String>;

/// Names of cookies the client must drop.
pub type CookieDeletion = BTreeSet<String>;

/// Command to register a new user with domain types
#[derive(Debug)]
pub struct SignupCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub password1: String,
    pub password2: String,
}

impl SignupCommand {
    /// Construct a new signup command.
    ///
    /// # Arguments
    /// * `username` - Validated username
    /// * `email` - Validated email address
    /// * `password1` - Plain text password (will be hashed by service)
    /// * `password2` - Confirmation, must equal `password1`
    pub fn new(
        username: Username,
        email: EmailAddress,
        password1: String,
        password2: String,
    ) -> Self {
        Self {
            username,
            email,
            password1,
            password2,
        }
    }

    pub fn passwords_match(&self) -> bool {
        self.password1 == self.password2
    }
}

/// Sign-in credentials. Consumed by the sign-in call and never stored.
#[derive(Debug)]
pub struct Credentials {
    pub username_or_email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username_or_email: String, password: String) -> Self {
        Self {
            username_or_email,
            password,
        }
    }
}
