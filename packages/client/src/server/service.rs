//! Per-connection request dispatch

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use http::{HeaderValue, Request, Response, StatusCode, header};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::handshake::derive_accept_key;
use tokio_tungstenite::tungstenite::protocol::Role;

use super::{Handler, WebSocketHandler};

pub(super) struct App {
    handler: Handler,
    websocket: Option<WebSocketHandler>,
}

impl App {
    pub(super) fn new(handler: Handler, websocket: Option<WebSocketHandler>) -> Self {
        Self { handler, websocket }
    }

    async fn dispatch(&self, request: Request<Incoming>) -> Response<Full<Bytes>> {
        if let Some(websocket) = &self.websocket
            && is_websocket_upgrade(&request)
        {
            return upgrade(request, Arc::clone(websocket));
        }

        let (parts, body) = request.into_parts();
        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                tracing::debug!(target: "httpcheck::server", error = %e, "failed to read request body");
                return status(StatusCode::BAD_REQUEST);
            }
        };

        let handler = Arc::clone(&self.handler);
        let request = Request::from_parts(parts, body);
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        match tokio::task::spawn_blocking(move || handler(request)).await {
            Ok(response) => {
                tracing::trace!(
                    target: "httpcheck::server",
                    %method,
                    path,
                    status = response.status().as_u16(),
                    "handled request"
                );
                response.map(Full::new)
            }
            Err(e) => {
                tracing::warn!(target: "httpcheck::server", %method, path, error = %e, "handler panicked");
                status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

pub(super) async fn serve_connection<I>(io: I, app: Arc<App>, remote: SocketAddr)
where
    I: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let service = service_fn(move |request: Request<Incoming>| {
        let app = Arc::clone(&app);
        async move { Ok::<_, Infallible>(app.dispatch(request).await) }
    });

    if let Err(e) = http1::Builder::new()
        .serve_connection(TokioIo::new(io), service)
        .with_upgrades()
        .await
    {
        tracing::debug!(target: "httpcheck::server", %remote, error = %e, "connection error");
    }
}

fn status(code: StatusCode) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = code;
    response
}

fn is_websocket_upgrade<B>(request: &Request<B>) -> bool {
    let upgrade = request
        .headers()
        .get(header::UPGRADE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("websocket"));

    upgrade && request.headers().contains_key(header::SEC_WEBSOCKET_KEY)
}

fn upgrade(mut request: Request<Incoming>, handler: WebSocketHandler) -> Response<Full<Bytes>> {
    let Some(key) = request.headers().get(header::SEC_WEBSOCKET_KEY) else {
        return status(StatusCode::BAD_REQUEST);
    };
    let Ok(accept) = HeaderValue::try_from(derive_accept_key(key.as_bytes())) else {
        return status(StatusCode::BAD_REQUEST);
    };

    let on_upgrade = hyper::upgrade::on(&mut request);
    tokio::spawn(async move {
        match on_upgrade.await {
            Ok(upgraded) => {
                let stream =
                    WebSocketStream::from_raw_socket(TokioIo::new(upgraded), Role::Server, None)
                        .await;
                echo(stream, handler).await;
            }
            Err(e) => tracing::debug!(target: "httpcheck::server", error = %e, "websocket upgrade failed"),
        }
    });

    let mut response = status(StatusCode::SWITCHING_PROTOCOLS);
    let headers = response.headers_mut();
    headers.insert(header::CONNECTION, HeaderValue::from_static("upgrade"));
    headers.insert(header::UPGRADE, HeaderValue::from_static("websocket"));
    headers.insert(header::SEC_WEBSOCKET_ACCEPT, accept);
    response
}

async fn echo<S>(mut stream: WebSocketStream<S>, handler: WebSocketHandler)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    while let Some(message) = stream.next().await {
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(target: "httpcheck::server", error = %e, "websocket read failed");
                break;
            }
        };

        if message.is_close() {
            let _ = stream.close(None).await;
            break;
        }
        if !(message.is_text() || message.is_binary()) {
            continue;
        }

        if let Some(reply) = handler(message)
            && stream.send(reply).await.is_err()
        {
            break;
        }
    }
}
