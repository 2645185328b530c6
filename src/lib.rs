// Library for tests to access modules

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod snapshot;
pub mod telemetry_repo;
pub mod version;
