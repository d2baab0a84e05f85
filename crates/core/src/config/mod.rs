pub mod crud_config;
pub mod validation;

pub use crud_config::*;
pub use validation::*;
