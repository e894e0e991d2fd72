//! Request builder modules
//!
//! A [`Request`] collects headers, authentication, a timeout and filters,
//! then issues any number of verb calls against the tester's host.

pub mod auth;
mod body;
pub mod core;
pub mod headers;
pub mod methods;

pub use auth::X_API_KEY;
pub use self::core::*;
pub use headers::*;
