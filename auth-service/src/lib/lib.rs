pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod telemetry;

pub use domain::session;
pub use domain::user;
pub use outbound::registry;
pub use outbound::repositories;
