//! Websocket dialing over the client's own connections

use http::{HeaderMap, HeaderValue};
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use url::Url;

use crate::client::HttpClient;
use crate::connect::Conn;
use crate::cookie::CookieStore;
use crate::error::{self, Result};
use crate::http::IntoUrl;

pub use tokio_tungstenite::tungstenite::Message;
pub use tokio_tungstenite::tungstenite::protocol::CloseFrame;

/// An established websocket.
pub type WebSocket = WebSocketStream<Conn>;

/// Dial `url` (`ws://` or `wss://`) and complete the upgrade handshake.
///
/// `Origin` defaults to the root of the target, the session cookies for the
/// target are attached and `headers` are added last. The handshake shares
/// the client's response deadline.
///
/// # Errors
///
/// Returns connect, TLS or timeout errors from dialing and an upgrade error
/// if the server refuses the handshake.
pub async fn connect<U: IntoUrl>(client: &HttpClient, url: U, headers: &HeaderMap) -> Result<WebSocket> {
    let url = url.into_url()?;
    if !matches!(url.scheme(), "ws" | "wss") {
        return Err(error::url_bad_scheme(url));
    }

    let mut request = url
        .as_str()
        .into_client_request()
        .map_err(|e| error::builder(e).with_url(url.clone()))?;

    let request_headers = request.headers_mut();
    if let Ok(origin) = HeaderValue::from_str(&origin_of(&url)) {
        request_headers.insert(http::header::ORIGIN, origin);
    }
    if client.config().cookie_store
        && let Some(cookies) = client.jar().cookies(&http_equivalent(&url))
    {
        request_headers.insert(http::header::COOKIE, cookies);
    }
    for (name, value) in headers {
        request_headers.insert(name.clone(), value.clone());
    }

    let conn = client.connector().connect(&url).await?;
    let deadline = client.config().response_timeout;

    let (socket, response) =
        tokio::time::timeout(deadline, tokio_tungstenite::client_async(request, conn))
            .await
            .map_err(|_| error::timeout("websocket handshake").with_url(url.clone()))?
            .map_err(|e| error::upgrade(e).with_url(url.clone()))?;

    tracing::debug!(
        target: "httpcheck::websocket",
        %url,
        status = response.status().as_u16(),
        "websocket connected"
    );
    Ok(socket)
}

fn origin_of(url: &Url) -> String {
    format!("{}://{}/", url.scheme(), crate::http::authority(url))
}

/// Cookies are keyed by the http(s) form of the URL.
fn http_equivalent(url: &Url) -> Url {
    let mut mapped = url.clone();
    let scheme = if url.scheme() == "wss" { "https" } else { "http" };
    if mapped.set_scheme(scheme).is_err() {
        return url.clone();
    }
    mapped
}
