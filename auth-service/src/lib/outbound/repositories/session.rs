pub mod mock;
pub mod redis;

pub use self::mock::MockSessionRepository;
pub use self::redis::RedisSessionRepository;
