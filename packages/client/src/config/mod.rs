//! Client configuration
//!
//! `HttpConfig` carries every knob the transport reads: deadlines, socket
//! options, body limits and identity. Defaults suit a local test server;
//! `validate` rejects settings that would make every request fail.

pub mod core;
pub mod validation;

pub use self::core::HttpConfig;
pub use validation::{ConfigResult, ConfigValidator, ConfigurationError, Validator};
