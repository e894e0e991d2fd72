//! Client transport tests against the in-process test server

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use httpcheck_client::prelude::*;
use httpcheck_client::{jsonpath, websocket};

fn init_logging() {
    env_logger::builder().is_test(true).try_init().ok();
}

fn echo_handler(request: ::http::Request<Bytes>) -> ::http::Response<Bytes> {
    let content_type = request
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = format!(
        r#"{{"method":"{}","path":"{}","query":"{}","content_type":"{}","length":{}}}"#,
        request.method(),
        request.uri().path(),
        request.uri().query().unwrap_or_default(),
        content_type,
        request.body().len()
    );

    ::http::Response::builder()
        .header("content-type", "application/json")
        .body(Bytes::from(body))
        .expect("response")
}

fn client_for(server: &TestServer) -> HttpClient {
    let mut builder = HttpClient::builder();
    for root in server.trusted_roots() {
        builder = builder.trust_root(root.clone());
    }
    builder.build().expect("client")
}

#[cfg(test)]
mod exchange_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_round_trip() {
        init_logging();
        let server = TestServer::http(echo_handler).expect("server");
        let client = client_for(&server);

        let request = HttpRequest::parse(Method::GET, format!("{}/users?id=7", server.url()))
            .expect("url");
        let response = client.execute(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.header("content-type"), "application/json");
        assert!(jsonpath::assert_contains(response.body(), "path", "/users").passed);
        assert!(jsonpath::assert_contains(response.body(), "query", "id=7").passed);
        assert!(jsonpath::assert_contains(response.body(), "method", "GET").passed);
    }

    #[tokio::test]
    async fn test_post_body_is_delivered() {
        init_logging();
        let server = TestServer::http(echo_handler).expect("server");
        let client = client_for(&server);

        let request = HttpRequest::parse(Method::POST, format!("{}/submit", server.url()))
            .expect("url")
            .with_header(
                ::http::header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain"),
            )
            .with_body("hello world");
        let response = client.execute(request).await.expect("response");

        assert!(jsonpath::assert_contains(response.body(), "length", 11).passed);
        assert!(jsonpath::assert_contains(response.body(), "content_type", "text/plain").passed);

        let stats = client.stats();
        assert_eq!(stats.requests_completed, 1);
        assert_eq!(stats.bytes_sent, 11);
    }

    #[tokio::test]
    async fn test_no_content_has_empty_body() {
        init_logging();
        let server = TestServer::http(|_req| {
            ::http::Response::builder()
                .status(204)
                .body(Bytes::new())
                .expect("response")
        })
        .expect("server");
        let client = client_for(&server);

        let request = HttpRequest::parse(Method::DELETE, format!("{}/item", server.url()))
            .expect("url");
        let response = client.execute(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.body().is_empty());
    }

    #[tokio::test]
    async fn test_handler_panic_becomes_server_error() {
        init_logging();
        let server = TestServer::http(|_req| panic!("handler bug")).expect("server");
        let client = client_for(&server);

        let request = HttpRequest::parse(Method::GET, format!("{}/", server.url())).expect("url");
        let response = client.execute(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

#[cfg(test)]
mod limit_tests {
    use super::*;

    #[tokio::test]
    async fn test_response_timeout() {
        init_logging();
        let server = TestServer::http(|_req| {
            std::thread::sleep(Duration::from_millis(500));
            ::http::Response::new(Bytes::new())
        })
        .expect("server");
        let client = client_for(&server);

        let request = HttpRequest::parse(Method::GET, format!("{}/slow", server.url()))
            .expect("url")
            .with_timeout(Duration::from_millis(50));
        let err = client.execute(request).await.expect_err("times out");

        assert!(err.is_timeout());
        assert_eq!(client.stats().requests_failed, 1);
    }

    #[tokio::test]
    async fn test_body_limit() {
        init_logging();
        let server = TestServer::http(|_req| ::http::Response::new(Bytes::from(vec![b'x'; 4096])))
            .expect("server");
        let client = HttpClient::builder()
            .config(HttpConfig::default().with_max_body_size(1024))
            .build()
            .expect("client");

        let request = HttpRequest::parse(Method::GET, format!("{}/big", server.url())).expect("url");
        let err = client.execute(request).await.expect_err("body too large");
        assert_eq!(err.kind(), Kind::Body);
    }
}

#[cfg(test)]
mod cookie_tests {
    use super::*;

    fn session_handler(request: ::http::Request<Bytes>) -> ::http::Response<Bytes> {
        if request.uri().path() == "/login" {
            return ::http::Response::builder()
                .header("set-cookie", "session=abc123; Path=/")
                .body(Bytes::new())
                .expect("response");
        }

        let cookie = request
            .headers()
            .get("cookie")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        ::http::Response::new(Bytes::from(cookie))
    }

    #[tokio::test]
    async fn test_session_cookies_are_replayed() {
        init_logging();
        let server = TestServer::http(session_handler).expect("server");
        let client = client_for(&server);

        let login = HttpRequest::parse(Method::POST, format!("{}/login", server.url())).expect("url");
        client.execute(login).await.expect("login");

        let me = HttpRequest::parse(Method::GET, format!("{}/me", server.url())).expect("url");
        let response = client.execute(me).await.expect("me");
        assert_eq!(response.text(), "session=abc123");
    }

    #[tokio::test]
    async fn test_filtered_requests_skip_the_jar() {
        init_logging();
        let server = TestServer::http(session_handler).expect("server");
        let client = client_for(&server);

        let login = HttpRequest::parse(Method::POST, format!("{}/login", server.url())).expect("url");
        client.execute(login).await.expect("login");

        let me = HttpRequest::parse(Method::GET, format!("{}/me", server.url())).expect("url");
        let response = client
            .execute_filtered(me, &FilterChain::new())
            .await
            .expect("me");
        assert_eq!(response.text(), "");
    }

    #[tokio::test]
    async fn test_disabled_cookie_store() {
        init_logging();
        let server = TestServer::http(session_handler).expect("server");
        let client = HttpClient::builder()
            .config(HttpConfig::default().with_cookie_store(false))
            .build()
            .expect("client");

        let login = HttpRequest::parse(Method::POST, format!("{}/login", server.url())).expect("url");
        client.execute(login).await.expect("login");
        assert!(client.jar().cookies_for(&Url::parse(&server.url()).expect("url")).is_empty());
    }
}

#[cfg(test)]
mod filter_tests {
    use super::*;

    #[tokio::test]
    async fn test_filter_rewrites_request() {
        init_logging();
        let server = TestServer::http(echo_handler).expect("server");
        let client = client_for(&server);

        let filters = FilterChain::new().add(|request: &mut HttpRequest| -> anyhow::Result<()> {
            request.url_mut().set_path("/rewritten");
            Ok(())
        });
        let request = HttpRequest::parse(Method::GET, format!("{}/original", server.url()))
            .expect("url");
        let response = client.execute_filtered(request, &filters).await.expect("response");

        assert!(jsonpath::assert_contains(response.body(), "path", "/rewritten").passed);
    }

    #[tokio::test]
    async fn test_filter_error_prevents_dialing() {
        init_logging();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let server = TestServer::http(move |_req| {
            counter.fetch_add(1, Ordering::SeqCst);
            ::http::Response::new(Bytes::new())
        })
        .expect("server");
        let client = client_for(&server);

        let filters = FilterChain::new()
            .add(|_: &mut HttpRequest| -> anyhow::Result<()> { anyhow::bail!("blocked by test") });
        let request = HttpRequest::parse(Method::GET, format!("{}/", server.url())).expect("url");
        let err = client.execute_filtered(request, &filters).await.expect_err("filtered");

        assert!(err.is_filter());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        let stats = client.stats();
        assert_eq!(stats.requests_filtered, 1);
        assert_eq!(stats.connections_total, 0);
    }
}

#[cfg(test)]
mod tls_tests {
    use super::*;

    #[tokio::test]
    async fn test_generated_certificate_is_trusted() {
        init_logging();
        let server = TestServer::https(echo_handler).expect("server");
        assert!(server.url().starts_with("https://127.0.0.1:"));
        let client = client_for(&server);

        let request = HttpRequest::parse(Method::GET, format!("{}/secure", server.url()))
            .expect("url");
        let response = client.execute(request).await.expect("response");
        assert!(jsonpath::assert_contains(response.body(), "path", "/secure").passed);
    }

    #[tokio::test]
    async fn test_untrusted_certificate_is_rejected() {
        init_logging();
        let server = TestServer::https(echo_handler).expect("server");
        let client = HttpClient::new().expect("client");

        let request = HttpRequest::parse(Method::GET, format!("{}/", server.url())).expect("url");
        let err = client.execute(request).await.expect_err("unknown issuer");
        assert_eq!(err.kind(), Kind::Tls);
    }

    #[tokio::test]
    async fn test_supplied_pem_identity() {
        init_logging();
        let identity = httpcheck_client::server::generate_identity().expect("identity");
        let chain = format!("{}{}", identity.cert_pem, identity.ca_pem);
        let server = TestServer::builder(echo_handler)
            .tls(ServerTls::Pem {
                cert: chain.clone().into_bytes(),
                key: identity.key_pem.clone().into_bytes(),
            })
            .start()
            .expect("server");
        let client = HttpClient::builder()
            .trust_pem(chain.as_bytes())
            .expect("pem roots")
            .build()
            .expect("client");

        let url = format!("https://localhost:{}/pem", server.addr().port());
        let request = HttpRequest::parse(Method::GET, url).expect("url");
        let response = client.execute(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[cfg(test)]
mod websocket_tests {
    use super::*;

    #[tokio::test]
    async fn test_websocket_echo() {
        init_logging();
        let server = TestServer::builder(echo_handler)
            .websocket(|message| match message {
                Message::Text(text) => Some(Message::text(format!("echo: {}", text.as_str()))),
                other => Some(other),
            })
            .start()
            .expect("server");
        let client = client_for(&server);

        let url = format!("ws://{}/ws", server.host());
        let mut socket = websocket::connect(&client, url, &HeaderMap::new())
            .await
            .expect("connected");

        socket.send(Message::text("hi")).await.expect("send");
        let reply = socket.next().await.expect("reply").expect("frame");
        assert_eq!(reply, Message::text("echo: hi"));

        socket.send(Message::binary(vec![1u8, 2, 3])).await.expect("send");
        let reply = socket.next().await.expect("reply").expect("frame");
        assert_eq!(reply, Message::binary(vec![1u8, 2, 3]));

        socket.close(None).await.expect("close");
    }

    #[tokio::test]
    async fn test_plain_server_refuses_upgrade() {
        init_logging();
        let server = TestServer::http(echo_handler).expect("server");
        let client = client_for(&server);

        let url = format!("ws://{}/ws", server.host());
        let err = websocket::connect(&client, url, &HeaderMap::new())
            .await
            .expect_err("no websocket handler");
        assert_eq!(err.kind(), Kind::Upgrade);
    }
}
