pub mod config;
pub mod errors;
pub mod naming;

pub use config::{ConfigError, ConnectionConfig, CrudConfig, DEFAULT_CONFIG_FILE};
pub use errors::{CoreError, CoreResult};
pub use naming::Naming;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tool name used in log targets and CLI output
pub const TOOL_NAME: &str = "crudkit";
