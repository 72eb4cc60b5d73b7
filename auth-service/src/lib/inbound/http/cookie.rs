//! Session cookie attributes and `Set-Cookie` rendering.

use std::time::Duration;

use axum::http::HeaderValue;
use axum_extra::extract::CookieJar;

use crate::config::SessionCookieConfig;
use crate::domain::auth::models::CookieSet;

/// Attributes applied to every cookie the service issues or expires.
#[derive(Debug, Clone)]
pub struct CookiePolicy {
    pub secure: bool,
    pub path: String,
    pub max_age: Duration,
}

impl CookiePolicy {
    pub fn new(config: &SessionCookieConfig, max_age: Duration) -> Self {
        Self {
            secure: config.secure,
            path: "/".to_string(),
            max_age,
        }
    }

    /// `Set-Cookie` value issuing `name=value`.
    pub fn issue(&self, name: &str, value: &str) -> String {
        let mut cookie = format!("{}={}; HttpOnly", name, value);
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str("; SameSite=Lax");
        cookie.push_str(&format!("; Path={}", self.path));
        cookie.push_str(&format!("; Max-Age={}", self.max_age.as_secs()));
        cookie
    }

    /// `Set-Cookie` value telling the client to drop `name`.
    pub fn expire(&self, name: &str) -> String {
        format!("{}=; HttpOnly; Path={}; Max-Age=0", name, self.path)
    }
}

/// Every cookie the client sent, by name.
pub fn cookie_set(jar: &CookieJar) -> CookieSet {
    jar.iter()
        .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
        .collect()
}

/// Render `Set-Cookie` values, skipping any that are not valid header text.
pub fn set_cookie_headers(values: impl IntoIterator<Item = String>) -> Vec<HeaderValue> {
    values
        .into_iter()
        .filter_map(|value| match HeaderValue::from_str(&value) {
            Ok(header) => Some(header),
            Err(e) => {
                tracing::warn!(error = %e, "Dropping unrepresentable Set-Cookie value");
                None
            }
        })
        .collect()
}
