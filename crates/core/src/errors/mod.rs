pub mod core;

pub use self::core::CoreError;

/// Result alias used across the core crate
pub type CoreResult<T> = Result<T, CoreError>;
