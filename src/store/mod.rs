//! Storage seams for the hub. The realtime layer only ever reads;
//! writes happen elsewhere and are signalled through the broadcast
//! entry points.

use async_trait::async_trait;

use crate::common::types::{ActivityId, AnyResult, EventId};
use crate::model::{Activity, Event, SocketSession};

pub mod memory;

pub use memory::MemoryStore;

/// Read access to events and their activities, always hydrated.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn get_event(&self, event_id: EventId) -> AnyResult<Option<Event>>;

    /// Every activity of the event, ordered by start time.
    async fn get_activities(&self, event_id: EventId) -> AnyResult<Vec<Activity>>;

    async fn get_activity(
        &self,
        event_id: EventId,
        activity_id: ActivityId,
    ) -> AnyResult<Option<Activity>>;
}

/// Socket-code lookup for privileged connections.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Resolves the sha-256 hex digest presented in the `Socket-Code`
    /// header. Unknown and expired codes are both `None`.
    async fn validate_socket_code(&self, code_hash: &str) -> AnyResult<Option<SocketSession>>;
}
