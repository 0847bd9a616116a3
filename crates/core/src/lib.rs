// Casebook Core - Data source intake domain, ports and services
// NO infrastructure dependencies (hexagonal: database and filesystem live in infra crates)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
