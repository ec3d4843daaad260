//! Push notifications into event rooms. The admin side calls these
//! after the store confirms a mutation; connected clients and the
//! announcer follow along without polling.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::common::types::{ActivityId, EventId};
use crate::protocol::ServerMessage;
use crate::server::state::AppState;

/// Event row changed. Pushes `eventUpdate` and refreshes the protected
/// marker; a deleted event only clears the marker.
pub async fn trigger_event_update(state: &Arc<AppState>, event_id: EventId) {
    match state.events.get_event(event_id).await {
        Ok(Some(event)) => {
            if event.is_protected() {
                state.protected_events.insert(event_id);
            } else {
                state.protected_events.remove(&event_id);
            }
            broadcast_to_room(state, event_id, ServerMessage::EventUpdate { event_id, event });
        }
        Ok(None) => {
            state.protected_events.remove(&event_id);
        }
        Err(e) => warn!("skipping event broadcast for {}: {}", event_id, e),
    }
}

/// Activity rows changed. With an id the narrow `activityUpdate` or
/// `activityDelete` goes out first; the authoritative full list always
/// follows.
pub async fn trigger_activities_update(
    state: &Arc<AppState>,
    event_id: EventId,
    activity_id: Option<ActivityId>,
) {
    match state.events.get_event(event_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return,
        Err(e) => {
            warn!("skipping activity broadcast for {}: {}", event_id, e);
            return;
        }
    }

    if let Some(activity_id) = activity_id {
        match state.events.get_activity(event_id, activity_id).await {
            Ok(Some(activity)) => broadcast_to_room(
                state,
                event_id,
                ServerMessage::ActivityUpdate {
                    event_id,
                    activity_id,
                    activity,
                },
            ),
            Ok(None) => broadcast_to_room(
                state,
                event_id,
                ServerMessage::ActivityDelete {
                    event_id,
                    activity_id,
                },
            ),
            Err(e) => {
                warn!("skipping activity broadcast for {}: {}", event_id, e);
                return;
            }
        }
    }

    match state.events.get_activities(event_id).await {
        Ok(activities) => broadcast_to_room(
            state,
            event_id,
            ServerMessage::ActivityListUpdate {
                event_id,
                activities,
            },
        ),
        Err(e) => warn!("skipping activity list broadcast for {}: {}", event_id, e),
    }
}

/// Force the session's next privileged action to revalidate against the
/// store. Bounds how long a revoked permission can keep working.
pub fn mark_session_as_updated(state: &Arc<AppState>, session_id: &str) {
    state.updated_sessions.insert(session_id.to_string());
}

/// Fan a message out to the room. Sends are fire-and-forget; a dead
/// channel belongs to a socket already tearing down.
pub fn broadcast_to_room(state: &Arc<AppState>, event_id: EventId, message: ServerMessage) {
    let members = state.room_members(event_id);
    debug!(
        "broadcasting to {} members of event {}",
        members.len(),
        event_id
    );
    for id in members {
        if let Some(conn) = state.connections.get(&id) {
            conn.send(message.clone());
        }
    }
}
