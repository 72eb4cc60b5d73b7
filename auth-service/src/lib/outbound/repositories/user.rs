pub mod mock;
pub mod oracle;
pub mod postgres;

pub use self::mock::MockUserRepository;
pub use self::oracle::OracleUserRepository;
pub use self::postgres::PostgresUserRepository;
