pub mod session;
pub mod user;

pub use session::MockSessionRepository;
pub use session::RedisSessionRepository;
pub use user::MockUserRepository;
pub use user::OracleUserRepository;
pub use user::PostgresUserRepository;
