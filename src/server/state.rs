use std::collections::HashSet;
use std::sync::Arc;

use dashmap::{DashMap, DashSet};
use uuid::Uuid;

use crate::common::types::EventId;
use crate::config::Config;
use crate::server::connection::Connection;
use crate::store::{EventStore, SessionStore};

/// Top-level hub state, shared by the socket tasks and the broadcast
/// entry points. Created once at startup, dropped at shutdown.
pub struct AppState {
    pub connections: DashMap<Uuid, Arc<Connection>>,
    /// Room membership; members receive every broadcast for the event.
    pub rooms: DashMap<EventId, HashSet<Uuid>>,
    /// Events whose controls require a session.
    pub protected_events: DashSet<EventId>,
    /// Session ids whose permissions changed since their last check.
    pub updated_sessions: DashSet<String>,
    pub events: Arc<dyn EventStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        events: Arc<dyn EventStore>,
        sessions: Arc<dyn SessionStore>,
        config: Config,
    ) -> Self {
        Self {
            connections: DashMap::new(),
            rooms: DashMap::new(),
            protected_events: DashSet::new(),
            updated_sessions: DashSet::new(),
            events,
            sessions,
            config,
        }
    }

    pub fn join_room(&self, event_id: EventId, connection_id: Uuid) {
        self.rooms
            .entry(event_id)
            .or_default()
            .insert(connection_id);
    }

    /// Remove the member, dropping the room once it empties.
    pub fn leave_room(&self, event_id: EventId, connection_id: Uuid) {
        let emptied = match self.rooms.get_mut(&event_id) {
            Some(mut members) => {
                members.remove(&connection_id);
                members.is_empty()
            }
            None => false,
        };
        if emptied {
            self.rooms.remove_if(&event_id, |_, members| members.is_empty());
        }
    }

    /// Snapshot of the room's member ids.
    pub fn room_members(&self, event_id: EventId) -> Vec<Uuid> {
        self.rooms
            .get(&event_id)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }
}
