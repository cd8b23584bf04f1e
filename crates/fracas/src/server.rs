//! `FracasServer` builder and accept loop.

use std::sync::Arc;

use fracas_protocol::JsonCodec;
use fracas_room::SessionEngine;

use crate::FracasError;
use crate::handler::handle_connection;
use crate::websocket::WsListener;

/// Builder for configuring and starting a fracas server.
pub struct FracasServerBuilder {
    bind_addr: String,
}

impl FracasServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Binds the listener and assembles the server.
    pub async fn build(self) -> Result<FracasServer, FracasError> {
        let listener = WsListener::bind(&self.bind_addr).await?;
        Ok(FracasServer {
            listener,
            engine: Arc::new(SessionEngine::new()),
            codec: JsonCodec,
        })
    }
}

impl Default for FracasServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running fracas server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct FracasServer {
    listener: WsListener,
    engine: Arc<SessionEngine>,
    codec: JsonCodec,
}

impl FracasServer {
    /// Creates a new builder.
    pub fn builder() -> FracasServerBuilder {
        FracasServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// The shared session engine (for embedding or inspection).
    pub fn engine(&self) -> Arc<SessionEngine> {
        Arc::clone(&self.engine)
    }

    /// Runs the accept loop: each connection gets its own handler task.
    /// Runs until the process is terminated.
    pub async fn run(self) -> Result<(), FracasError> {
        tracing::info!("fracas server running");

        loop {
            match self.listener.accept().await {
                Ok(conn) => {
                    let engine = Arc::clone(&self.engine);
                    let codec = self.codec;
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, engine, codec).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
