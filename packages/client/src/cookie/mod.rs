//! HTTP cookie jar
//!
//! Session requests read `Cookie` values from the jar before sending and feed
//! every `Set-Cookie` of the response back into it.

pub mod core;

pub use self::core::*;
