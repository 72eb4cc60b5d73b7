//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure for services:
//! - Password hashing (Argon2id)
//! - Session token generation
//! - Credential verification
//!
//! Each service defines its own authentication traits and adapts these implementations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::SessionTokenGenerator;
//!
//! let generator = SessionTokenGenerator::new();
//! let token = generator.generate();
//! assert!(!token.as_str().is_empty());
//! ```
//!
//! ## Credential Check
//! ```
//! use auth::Authenticator;
//!
//! let auth = Authenticator::new();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Sign in: verify password
//! assert!(auth.authenticate("password123", &hash).is_ok());
//! assert!(auth.authenticate("wrong", &hash).is_err());
//! ```

pub mod authenticator;
pub mod password;
pub mod session;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use session::SessionToken;
pub use session::SessionTokenError;
pub use session::SessionTokenGenerator;
