//! Socket lifecycle: upgrade, optional session attach, the select loop
//! over outbound queue and inbound frames, teardown.

use std::sync::Arc;

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::HeaderMap,
    response::Response,
    routing::get,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{debug, error, info, warn};

use crate::model::SocketSession;
use crate::protocol::{ClientRequest, ServerMessage};
use crate::server::{AppState, Connection, handle_request};

pub fn router(state: Arc<AppState>) -> Router {
    let mut router = Router::new().route("/ws", get(websocket_handler));
    if let Some(dir) = &state.config.sounds.serve_dir {
        router = router.nest_service("/sounds", ServeDir::new(dir));
    }
    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// An invalid or expired code attaches nothing; the connection still
/// proceeds and may browse unprotected events.
pub async fn websocket_handler(
    headers: HeaderMap,
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let code_hash = headers
        .get("socket-code")
        .and_then(|h| h.to_str().ok())
        .map(String::from);

    let session = match &code_hash {
        Some(hash) => match state.sessions.validate_socket_code(hash).await {
            Ok(Some(session)) => Some(session),
            Ok(None) => {
                debug!("socket code did not validate, proceeding unauthenticated");
                None
            }
            Err(e) => {
                warn!("session lookup failed: {}", e);
                None
            }
        },
        None => None,
    };

    ws.on_upgrade(move |socket| handle_socket(socket, state, session, code_hash))
}

pub async fn handle_socket(
    mut socket: WebSocket,
    state: Arc<AppState>,
    session: Option<SocketSession>,
    code_hash: Option<String>,
) {
    let (tx, rx) = flume::unbounded();
    let attached = session.is_some();
    let conn = Arc::new(Connection::new(tx, session, code_hash));
    state.connections.insert(conn.id, Arc::clone(&conn));
    info!(
        "websocket connected: {} (session attached: {})",
        conn.id, attached
    );

    let ready = ServerMessage::Ready {
        connection_id: conn.id,
        session: attached,
    };
    if let Ok(json) = serde_json::to_string(&ready) {
        let _ = socket.send(Message::Text(json.into())).await;
    }

    loop {
        tokio::select! {
            Ok(message) = rx.recv_async() => {
                let json = match serde_json::to_string(&message) {
                    Ok(json) => json,
                    Err(e) => {
                        error!("failed to encode message: {}", e);
                        continue;
                    }
                };
                if let Err(e) = socket.send(Message::Text(json.into())).await {
                    warn!("socket send error: {}: {}", conn.id, e);
                    break;
                }
            }
            incoming = socket.recv() => {
                let message = match incoming {
                    Some(Ok(message)) => message,
                    Some(Err(e)) => {
                        warn!("websocket error: {}: {}", conn.id, e);
                        break;
                    }
                    None => break,
                };

                match message {
                    Message::Text(text) => {
                        let request: ClientRequest = match serde_json::from_str(&text) {
                            Ok(request) => request,
                            Err(e) => {
                                debug!("dropping unparseable frame from {}: {}", conn.id, e);
                                continue;
                            }
                        };
                        if let Some(reply) = handle_request(&state, &conn, request).await {
                            match serde_json::to_string(&reply) {
                                Ok(json) => {
                                    if let Err(e) = socket.send(Message::Text(json.into())).await {
                                        warn!("socket send error: {}: {}", conn.id, e);
                                        break;
                                    }
                                }
                                Err(e) => error!("failed to encode reply: {}", e),
                            }
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    }

    // membership first, so broadcasts stop targeting this connection
    if let Some(event_id) = conn.active_event() {
        state.leave_room(event_id, conn.id);
    }
    state.connections.remove(&conn.id);
    info!("websocket disconnected: {}", conn.id);
}
