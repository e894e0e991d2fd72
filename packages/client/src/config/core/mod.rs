//! Core HTTP configuration types and default implementations
//!
//! - `types`: the `HttpConfig` struct
//! - `defaults`: default values
//! - `builders`: fluent `with_*` methods

pub mod builders;
pub mod defaults;
pub mod types;

pub use types::HttpConfig;
