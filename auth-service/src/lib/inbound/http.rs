pub mod cookie;
pub mod handlers;
pub mod router;
