//! Bridges an individual WebSocket connection to a live session.
//!
//! Two loops run per connection: inbound (client frames to session
//! submissions and control dispatch) and outbound (session events to wire
//! messages). Whichever loop finishes first aborts the other, and the
//! session is always cleaned up on the way out.

use super::protocol::{ClientMessage, ControlAction, ServerMessage};
use crate::state::AppState;
use anyhow::Result;
use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use tutor_core::session::{SubmitKind, TutorSession};
use uuid::Uuid;

/// Axum handler to upgrade an HTTP connection to a WebSocket.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(session_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, session_id, state))
}

/// Main handler for an individual WebSocket connection.
#[instrument(name = "ws_session", skip_all, fields(session_id = %session_id))]
async fn handle_socket(socket: WebSocket, session_id: Uuid, state: Arc<AppState>) {
    info!("WebSocket connection established");

    // The session must already exist; the real-time channel never creates
    // one implicitly.
    let Some(session) = state.manager.get_session(&session_id).await else {
        warn!("WebSocket connection for unknown session");
        let (mut socket_tx, _socket_rx) = socket.split();
        let _ = send_msg(
            &mut socket_tx,
            ServerMessage::Error {
                message: "Session not found. Please create a session first.".to_string(),
            },
        )
        .await;
        let _ = socket_tx.close().await;
        return;
    };

    let (socket_tx, socket_rx) = socket.split();
    let mut outbound = tokio::spawn(outbound_loop(socket_tx, session.clone()));
    let mut inbound = tokio::spawn(inbound_loop(socket_rx, session));

    // Whichever direction finishes first tears down the other.
    tokio::select! {
        _ = &mut outbound => inbound.abort(),
        _ = &mut inbound => outbound.abort(),
    }

    state.manager.cleanup_session(&session_id).await;
    info!("WebSocket connection closed and session cleaned up");
}

/// Forwards client frames into the session until the connection ends.
async fn inbound_loop(mut socket_rx: SplitStream<WebSocket>, session: Arc<TutorSession>) {
    while let Some(msg_result) = socket_rx.next().await {
        match msg_result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(msg) => dispatch_client_message(&session, msg).await,
                Err(e) => warn!(error = %e, "Dropping unparsable client message"),
            },
            Ok(Message::Close(_)) => {
                info!("Client sent close frame");
                break;
            }
            Ok(Message::Binary(_)) => {
                warn!("Ignoring unexpected binary frame");
            }
            Ok(Message::Ping(_) | Message::Pong(_)) => {}
            Err(e) => {
                error!(error = ?e, "Error receiving from client WebSocket");
                break;
            }
        }
    }
}

async fn dispatch_client_message(session: &Arc<TutorSession>, msg: ClientMessage) {
    match msg {
        ClientMessage::Text { content } => session.submit(SubmitKind::Text, &content).await,
        ClientMessage::Audio { data } => session.submit(SubmitKind::Audio, &data).await,
        ClientMessage::Control { action, data } => match action {
            ControlAction::SwitchAgent => {
                let agent = data
                    .as_ref()
                    .and_then(|d| d.get("agent"))
                    .and_then(|a| a.as_str());
                match agent {
                    Some(name) => {
                        if !session.switch_agent(name).await {
                            warn!(agent = %name, "Client requested switch to unknown agent");
                        }
                    }
                    None => warn!("switch_agent control message missing agent name"),
                }
            }
            ControlAction::Stop => session.stop().await,
            ControlAction::Restart => session.restart().await,
            ControlAction::Unknown => warn!("Ignoring unknown control action"),
        },
    }
}

/// Streams session events to the client until the event sequence ends.
async fn outbound_loop(mut socket_tx: SplitSink<WebSocket, Message>, session: Arc<TutorSession>) {
    while let Some(event) = session.next_event().await {
        if let Err(e) = send_msg(&mut socket_tx, ServerMessage::from(event)).await {
            error!(error = ?e, "Failed to send event to client");
            break;
        }
    }
    info!("Session event stream ended");
}

/// A helper function to serialize and send a `ServerMessage` to the client.
async fn send_msg(socket_tx: &mut SplitSink<WebSocket, Message>, msg: ServerMessage) -> Result<()> {
    let serialized = serde_json::to_string(&msg)?;
    socket_tx.send(Message::Text(serialized.into())).await?;
    Ok(())
}
