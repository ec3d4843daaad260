//! Request dispatch for the realtime socket. Join/leave maintain the
//! room registries; playerControl runs the permission gates before the
//! relay.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::common::errors::ProtocolError;
use crate::common::types::EventId;
use crate::model::SocketSession;
use crate::protocol::{ClientRequest, PlayerControl, ServerMessage};
use crate::server::broadcast::broadcast_to_room;
use crate::server::connection::Connection;
use crate::server::state::AppState;

/// Dispatch one parsed request. The return value is the direct reply;
/// broadcasts go through the room.
pub async fn handle_request(
    state: &Arc<AppState>,
    conn: &Arc<Connection>,
    request: ClientRequest,
) -> Option<ServerMessage> {
    match request {
        ClientRequest::JoinEvent { event_id } => Some(join_event(state, conn, event_id).await),
        ClientRequest::LeaveEvent { event_id } => {
            leave_event(state, conn, event_id);
            None
        }
        ClientRequest::CheckActiveEvent => Some(ServerMessage::ActiveEvent {
            event_id: conn.active_event(),
        }),
        ClientRequest::PlayerControl { control } => {
            Some(player_control(state, conn, control).await)
        }
    }
}

/// A failed join changes no membership; a successful one moves the
/// connection out of its previous room and replies with full state.
async fn join_event(
    state: &Arc<AppState>,
    conn: &Arc<Connection>,
    event_id: EventId,
) -> ServerMessage {
    let event = match state.events.get_event(event_id).await {
        Ok(Some(event)) => event,
        Ok(None) => return ServerMessage::join_err(ProtocolError::EventNotFound),
        Err(e) => {
            warn!("event lookup failed: {}", e);
            return ServerMessage::join_err(ProtocolError::StoreUnavailable);
        }
    };
    let activities = match state.events.get_activities(event_id).await {
        Ok(list) => list,
        Err(e) => {
            warn!("activity lookup failed: {}", e);
            return ServerMessage::join_err(ProtocolError::StoreUnavailable);
        }
    };

    let previous = conn.active_event.lock().replace(event_id);
    if let Some(previous) = previous {
        if previous != event_id {
            state.leave_room(previous, conn.id);
        }
    }
    state.join_room(event_id, conn.id);

    if event.is_protected() {
        state.protected_events.insert(event_id);
    } else {
        state.protected_events.remove(&event_id);
    }

    debug!("connection {} joined event {}", conn.id, event_id);
    ServerMessage::join_ok(event, activities)
}

fn leave_event(state: &Arc<AppState>, conn: &Arc<Connection>, event_id: EventId) {
    let mut active = conn.active_event.lock();
    if *active == Some(event_id) {
        *active = None;
        drop(active);
        state.leave_room(event_id, conn.id);
        debug!("connection {} left event {}", conn.id, event_id);
    }
}

async fn player_control(
    state: &Arc<AppState>,
    conn: &Arc<Connection>,
    control: PlayerControl,
) -> ServerMessage {
    let Some(event_id) = conn.active_event() else {
        return ServerMessage::control_err(ProtocolError::NotInEvent);
    };

    if state.protected_events.contains(&event_id) {
        if let Err(reason) = authorize(state, conn, event_id).await {
            debug!("control on event {} rejected: {}", event_id, reason);
            return ServerMessage::control_err(reason);
        }
    }

    broadcast_to_room(state, event_id, ServerMessage::PlayerControl { control });
    ServerMessage::control_ok()
}

/// Permission gate for controls on a protected event. A session marked
/// dirty is revalidated against the store first, so revoked permissions
/// never outlive the next privileged action.
async fn authorize(
    state: &Arc<AppState>,
    conn: &Arc<Connection>,
    event_id: EventId,
) -> Result<(), ProtocolError> {
    let session_id = match conn.session_id() {
        Some(id) => id,
        None => return Err(ProtocolError::NoSession),
    };

    if state.updated_sessions.remove(&session_id).is_some() {
        match revalidate(state, conn).await {
            Some(fresh) => *conn.session.lock() = Some(fresh),
            None => {
                *conn.session.lock() = None;
                return Err(ProtocolError::InvalidSession);
            }
        }
    }

    let authorized = conn
        .session
        .lock()
        .as_ref()
        .is_some_and(|s| s.can_control(event_id, Utc::now()));
    if authorized {
        Ok(())
    } else {
        Err(ProtocolError::MissingPermission)
    }
}

async fn revalidate(state: &Arc<AppState>, conn: &Arc<Connection>) -> Option<SocketSession> {
    let code_hash = conn.code_hash.as_deref()?;
    match state.sessions.validate_socket_code(code_hash).await {
        Ok(session) => session,
        Err(e) => {
            warn!("session revalidation failed: {}", e);
            None
        }
    }
}
