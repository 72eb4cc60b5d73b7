pub mod errors;
pub mod token;

pub use errors::SessionTokenError;
pub use token::SessionToken;
pub use token::SessionTokenGenerator;
