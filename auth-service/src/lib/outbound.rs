pub mod registry;
pub mod repositories;
