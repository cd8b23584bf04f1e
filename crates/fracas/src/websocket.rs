//! WebSocket plumbing via `tokio-tungstenite`.
//!
//! Each accepted connection is split into halves: the read half stays with
//! the connection handler's request loop, while the write half lives
//! behind a cloneable [`WsWriter`] so subscription-push tasks can write
//! concurrently with the request loop without contending on a reader that
//! is parked in `recv`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

use crate::FracasError;

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

type WsStream = WebSocketStream<TcpStream>;

/// Listens for incoming websocket connections.
pub struct WsListener {
    listener: TcpListener,
}

impl WsListener {
    /// Binds to the given address.
    pub async fn bind(addr: &str) -> Result<Self, FracasError> {
        let listener = TcpListener::bind(addr).await.map_err(FracasError::Bind)?;
        tracing::info!(addr, "websocket listener bound");
        Ok(Self { listener })
    }

    /// The local address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Waits for and upgrades the next incoming connection.
    pub async fn accept(&self) -> Result<WsConnection, FracasError> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(FracasError::Accept)?;

        let ws = tokio_tungstenite::accept_async(stream)
            .await
            .map_err(FracasError::Handshake)?;

        let id = NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(conn = id, %addr, "accepted websocket connection");

        let (sink, stream) = ws.split();
        Ok(WsConnection {
            id,
            reader: stream,
            writer: WsWriter {
                sink: Arc::new(Mutex::new(sink)),
            },
        })
    }
}

/// The write half of a connection. Cheap to clone; writes are serialized
/// through an internal mutex.
#[derive(Clone)]
pub struct WsWriter {
    sink: Arc<Mutex<SplitSink<WsStream, Message>>>,
}

impl WsWriter {
    /// Sends one binary frame.
    pub async fn send(&self, data: &[u8]) -> Result<(), FracasError> {
        self.sink
            .lock()
            .await
            .send(Message::Binary(data.to_vec().into()))
            .await
            .map_err(FracasError::Send)
    }
}

/// One accepted websocket connection.
pub struct WsConnection {
    id: u64,
    reader: SplitStream<WsStream>,
    writer: WsWriter,
}

impl WsConnection {
    /// The connection's unique ID (for logging).
    pub fn id(&self) -> u64 {
        self.id
    }

    /// A clone of the write half, independent of the read loop.
    pub fn writer(&self) -> WsWriter {
        self.writer.clone()
    }

    /// Receives the next data frame. Returns `None` once the peer closed
    /// the connection; ping/pong frames are skipped.
    pub async fn recv(&mut self) -> Result<Option<Vec<u8>>, FracasError> {
        loop {
            match self.reader.next().await {
                Some(Ok(Message::Binary(data))) => return Ok(Some(data.into())),
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_bytes().to_vec()));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(FracasError::Receive(e)),
            }
        }
    }
}
