//! Per-connection handler: decodes requests, runs engine operations,
//! and wires snapshot streams back to the socket.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! A connection may issue any mix of requests; `Subscribe` additionally
//! spawns a forward task that pushes the room's snapshots to this socket
//! for as long as both ends live.

use std::sync::Arc;

use fracas_protocol::{ClientRequest, Codec, JsonCodec, Move, ServerMessage};
use fracas_room::{RoomError, SessionEngine};

use crate::FracasError;
use crate::websocket::{WsConnection, WsWriter};

/// HTTP-style code for a room-level rejection.
fn room_error_code(err: &RoomError) -> u16 {
    match err {
        RoomError::NotYourTurn { .. } => 403,
        RoomError::GameOver(_) => 409,
        RoomError::Unavailable(_) => 503,
    }
}

async fn send_message(
    writer: &WsWriter,
    codec: &JsonCodec,
    msg: &ServerMessage,
) -> Result<(), FracasError> {
    let bytes = codec.encode(msg)?;
    writer.send(&bytes).await
}

async fn send_error(
    writer: &WsWriter,
    codec: &JsonCodec,
    code: u16,
    message: String,
) -> Result<(), FracasError> {
    send_message(writer, codec, &ServerMessage::Error { code, message }).await
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    mut conn: WsConnection,
    engine: Arc<SessionEngine>,
    codec: JsonCodec,
) -> Result<(), FracasError> {
    let conn_id = conn.id();
    let writer = conn.writer();
    tracing::debug!(conn = conn_id, "handling new connection");

    while let Some(data) = conn.recv().await? {
        let request: ClientRequest = match codec.decode(&data) {
            Ok(req) => req,
            Err(e) => {
                tracing::debug!(conn = conn_id, error = %e, "undecodable request");
                send_error(&writer, &codec, 400, e.to_string()).await?;
                continue;
            }
        };

        handle_request(&engine, &writer, codec, conn_id, request).await?;
    }

    tracing::debug!(conn = conn_id, "connection closed");
    Ok(())
}

async fn handle_request(
    engine: &Arc<SessionEngine>,
    writer: &WsWriter,
    codec: JsonCodec,
    conn_id: u64,
    request: ClientRequest,
) -> Result<(), FracasError> {
    match request {
        ClientRequest::Join { room, name } => {
            match engine.join(&room, name.as_deref()).await {
                Ok(snapshot) => {
                    send_message(writer, &codec, &ServerMessage::State { snapshot })
                        .await?;
                }
                Err(e) => {
                    send_error(writer, &codec, room_error_code(&e), e.to_string())
                        .await?;
                }
            }
        }

        ClientRequest::SubmitMove { room, slot, mv } => {
            // Move tokens are validated here so the engine only ever sees
            // the three legal moves.
            let mv: Move = match mv.parse() {
                Ok(mv) => mv,
                Err(e) => {
                    return send_error(writer, &codec, 400, e.to_string()).await;
                }
            };
            match engine.submit_move(&room, slot, mv).await {
                Ok(()) => send_message(writer, &codec, &ServerMessage::Ack).await?,
                Err(e) => {
                    send_error(writer, &codec, room_error_code(&e), e.to_string())
                        .await?;
                }
            }
        }

        ClientRequest::SubmitAction { room, slot, action } => {
            match engine.submit_action(&room, slot, &action).await {
                Ok(()) => send_message(writer, &codec, &ServerMessage::Ack).await?,
                Err(e) => {
                    send_error(writer, &codec, room_error_code(&e), e.to_string())
                        .await?;
                }
            }
        }

        ClientRequest::Subscribe { room } => {
            let mut snapshots = engine.subscribe(&room).await?;
            let push_writer = writer.clone();
            tokio::spawn(async move {
                while let Some(snapshot) = snapshots.recv().await {
                    let msg = ServerMessage::State { snapshot };
                    let bytes = match codec.encode(&msg) {
                        Ok(bytes) => bytes,
                        Err(e) => {
                            tracing::warn!(conn = conn_id, error = %e, "snapshot encode failed");
                            break;
                        }
                    };
                    if push_writer.send(&bytes).await.is_err() {
                        // Socket gone. Dropping the receiver is the only
                        // signal the room actor needs; it prunes this
                        // subscriber on its next publish.
                        tracing::debug!(conn = conn_id, "snapshot push failed, unsubscribing");
                        break;
                    }
                }
            });
        }
    }

    Ok(())
}
