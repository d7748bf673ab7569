//! Websocket client for exercising the realtime endpoint in tests.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub struct WsJsonClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsJsonClient {
    /// Connect, retrying until `timeout` elapses so tests can race server startup.
    pub async fn connect_retry(url: &str, timeout: Duration) -> Result<Self, BoxError> {
        let start = tokio::time::Instant::now();
        loop {
            match connect_async(url).await {
                Ok((stream, _)) => return Ok(Self { stream }),
                Err(err) if start.elapsed() >= timeout => return Err(Box::new(err)),
                Err(_) => tokio::time::sleep(Duration::from_millis(5)).await,
            }
        }
    }

    pub async fn send_json(&mut self, value: &Value) -> Result<(), BoxError> {
        self.send_text(&value.to_string()).await
    }

    pub async fn send_text(&mut self, text: &str) -> Result<(), BoxError> {
        self.stream.send(Message::Text(text.into())).await?;
        Ok(())
    }

    pub async fn send_binary(&mut self, bytes: Vec<u8>) -> Result<(), BoxError> {
        self.stream.send(Message::Binary(bytes.into())).await?;
        Ok(())
    }

    /// Next JSON text frame. Control frames are skipped; a closed stream or
    /// a timeout is an error.
    pub async fn recv_json(&mut self, timeout: Duration) -> Result<Value, BoxError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let next = tokio::time::timeout_at(deadline, self.stream.next())
                .await
                .map_err(|_| "timed out waiting for a websocket message")?;
            match next {
                Some(Ok(Message::Text(text))) => return Ok(serde_json::from_str(text.as_str())?),
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => continue,
                Some(Ok(Message::Binary(_))) => return Err("unexpected binary frame".into()),
                Some(Ok(Message::Close(_))) | None => return Err("websocket closed".into()),
                Some(Err(err)) => return Err(Box::new(err)),
            }
        }
    }

    /// Skip frames until one with `"type": kind` arrives.
    pub async fn recv_type(&mut self, kind: &str, timeout: Duration) -> Result<Value, BoxError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            let msg = self.recv_json(remaining).await?;
            if msg["type"] == kind {
                return Ok(msg);
            }
        }
    }

    pub async fn close(&mut self) -> Result<(), BoxError> {
        self.stream.close(None).await?;
        Ok(())
    }
}
