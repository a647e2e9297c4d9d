//! # PageBridge Config
//!
//! Configuration for the editing bridge: injection timing, marker names, the
//! selector's visual affordance, and the preview environment URLs.

mod env;
mod error;
mod loader;
mod schema;
mod validator;

pub use env::{CodeGenType, EnvConfig};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
