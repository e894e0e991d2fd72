//! Blocking websocket wrapper

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use httpcheck_client::websocket::WebSocket as AsyncWebSocket;
use httpcheck_client::{Error, Message, Result, error};

use crate::tester::Session;

/// A websocket opened by [`Tester::websocket`](crate::Tester::websocket).
///
/// Every call blocks on the tester's runtime.
pub struct WebSocket {
    session: Arc<Session>,
    stream: AsyncWebSocket,
}

impl WebSocket {
    pub(crate) fn new(session: Arc<Session>, stream: AsyncWebSocket) -> Self {
        Self { session, stream }
    }

    /// Send a text frame.
    ///
    /// # Errors
    ///
    /// Returns a request error if the frame cannot be written.
    pub fn send_text(&mut self, text: &str) -> Result<()> {
        self.send(Message::text(text))
    }

    /// Send a binary frame.
    ///
    /// # Errors
    ///
    /// Returns a request error if the frame cannot be written.
    pub fn send_binary(&mut self, data: impl Into<Bytes>) -> Result<()> {
        self.send(Message::binary(data.into()))
    }

    /// Send any message.
    ///
    /// # Errors
    ///
    /// Returns a request error if the frame cannot be written.
    pub fn send(&mut self, message: Message) -> Result<()> {
        let session = Arc::clone(&self.session);
        session
            .block_on(self.stream.send(message))
            .map_err(error::request)
    }

    /// Wait for the next data message, skipping pings and pongs.
    ///
    /// Returns `None` once the peer closed the connection.
    ///
    /// # Errors
    ///
    /// Returns a body error if reading fails.
    pub fn recv(&mut self) -> Result<Option<Message>> {
        let session = Arc::clone(&self.session);
        session.block_on(next_data(&mut self.stream))
    }

    /// Like [`recv`](Self::recv) with a deadline.
    ///
    /// # Errors
    ///
    /// Returns a timeout error if nothing arrives within `timeout`.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<Message>> {
        let session = Arc::clone(&self.session);
        session.block_on(async {
            tokio::time::timeout(timeout, next_data(&mut self.stream))
                .await
                .map_err(|_| error::timeout("websocket receive"))?
        })
    }

    /// Send a close frame and wait for the peer to acknowledge it.
    ///
    /// # Errors
    ///
    /// Returns a request error if the close handshake fails.
    pub fn close(mut self) -> Result<()> {
        let session = Arc::clone(&self.session);
        session.block_on(async {
            self.stream.close(None).await.map_err(error::request)?;
            // drain until the peer's close frame ends the stream
            while let Some(frame) = self.stream.next().await {
                if frame.is_err() {
                    break;
                }
            }
            Ok::<(), Error>(())
        })
    }
}

async fn next_data(stream: &mut AsyncWebSocket) -> Result<Option<Message>> {
    while let Some(frame) = stream.next().await {
        match frame.map_err(error::body)? {
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            Message::Close(_) => return Ok(None),
            message => return Ok(Some(message)),
        }
    }
    Ok(None)
}

impl std::fmt::Debug for WebSocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSocket").finish_non_exhaustive()
    }
}
