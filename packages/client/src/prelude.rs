//! Essential types for making requests and asserting on responses.

pub use crate::http::{FileSource, HttpRequest, HttpResponse, MultipartForm, Params, RequestBody};

pub use crate::error::{Error, HttpError, Kind};

pub use crate::client::{ClientStatsSnapshot, HttpClient, HttpClientBuilder};
pub use crate::config::HttpConfig;
pub use crate::cookie::{CookieStore, Jar};
pub use crate::middleware::{FilterChain, RequestFilter};

pub use crate::server::{ServerTls, TestServer, TestServerBuilder};
pub use crate::websocket::{Message, WebSocket};

pub use crate::jsonpath::{Failure, FailureKind, Literal, Outcome};

pub use ::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Version};

pub use url::Url;
