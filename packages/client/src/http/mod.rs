//! HTTP message types and helpers
//!
//! Requests and responses are fully buffered: a test exchange is small and
//! assertions need the whole body anyway.

pub mod body;
pub mod headers;
pub mod into_url;
pub mod multipart;
pub mod request;
pub mod response;
pub mod url;

pub use body::{Params, RequestBody};
pub use headers::*;
pub use into_url::IntoUrl;
pub use multipart::{FileSource, MultipartForm};
pub use request::HttpRequest;
pub use response::HttpResponse;
pub use self::url::*;
