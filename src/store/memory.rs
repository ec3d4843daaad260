//! In-memory store, filled from a JSON fixture or through the mutation
//! helpers. Backs the hub binary and the tests.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::info;

use crate::common::types::{ActivityId, AnyResult, EventId};
use crate::model::{Activity, Event, SocketSession};
use crate::store::{EventStore, SessionStore};

#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default)]
    events: Vec<Event>,
    #[serde(default)]
    activities: Vec<Activity>,
    #[serde(default)]
    sessions: Vec<SessionRecord>,
}

/// One session row: the stored digest of its socket code plus the
/// session itself.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    socket_code_hash: String,
    #[serde(flatten)]
    session: SocketSession,
}

#[derive(Default)]
pub struct MemoryStore {
    events: RwLock<HashMap<EventId, Event>>,
    activities: RwLock<HashMap<ActivityId, Activity>>,
    /// Keyed by the sha-256 hex digest of the socket code.
    sessions: RwLock<HashMap<String, SocketSession>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `{ events, activities, sessions }` from a JSON file.
    pub fn from_fixture(path: impl AsRef<Path>) -> AnyResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let fixture: Fixture = serde_json::from_str(&raw)?;
        info!(
            "loaded fixture: {} events, {} activities, {} sessions",
            fixture.events.len(),
            fixture.activities.len(),
            fixture.sessions.len()
        );

        let store = Self::new();
        for event in fixture.events {
            store.put_event(event);
        }
        for activity in fixture.activities {
            store.put_activity(activity);
        }
        for record in fixture.sessions {
            store.put_session(record.socket_code_hash, record.session);
        }
        Ok(store)
    }

    pub fn put_event(&self, event: Event) {
        self.events.write().insert(event.id, event);
    }

    pub fn remove_event(&self, event_id: EventId) -> Option<Event> {
        self.events.write().remove(&event_id)
    }

    pub fn put_activity(&self, activity: Activity) {
        self.activities.write().insert(activity.id, activity);
    }

    pub fn remove_activity(&self, activity_id: ActivityId) -> Option<Activity> {
        self.activities.write().remove(&activity_id)
    }

    pub fn put_session(&self, code_hash: String, session: SocketSession) {
        self.sessions.write().insert(code_hash, session);
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn get_event(&self, event_id: EventId) -> AnyResult<Option<Event>> {
        Ok(self.events.read().get(&event_id).cloned())
    }

    async fn get_activities(&self, event_id: EventId) -> AnyResult<Vec<Activity>> {
        let mut list: Vec<Activity> = self
            .activities
            .read()
            .values()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect();
        list.sort_by_key(|a| a.start_time);
        Ok(list)
    }

    async fn get_activity(
        &self,
        event_id: EventId,
        activity_id: ActivityId,
    ) -> AnyResult<Option<Activity>> {
        Ok(self
            .activities
            .read()
            .get(&activity_id)
            .filter(|a| a.event_id == event_id)
            .cloned())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    /// Expired rows are dropped on sight, matching the admin side's
    /// lazy cleanup.
    async fn validate_socket_code(&self, code_hash: &str) -> AnyResult<Option<SocketSession>> {
        let mut sessions = self.sessions.write();
        let Some(session) = sessions.get(code_hash) else {
            return Ok(None);
        };
        if session.expires_at <= Utc::now() {
            sessions.remove(code_hash);
            return Ok(None);
        }
        Ok(Some(session.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AllowedEvent;
    use chrono::Duration as ChronoDuration;

    const FIXTURE: &str = r#"{
        "events": [
            {
                "id": 1,
                "name": "Tábor Zelený háj",
                "startDate": "2030-07-01T08:00:00Z",
                "endDate": "2030-07-08T18:00:00Z",
                "adminPasswordHash": "$argon2id$stub",
                "sounds": {
                    "zvolavacka": {
                        "id": 10,
                        "key": "zvolavacka",
                        "path": "zvolavacka.mp3"
                    }
                }
            }
        ],
        "activities": [
            {
                "id": 21,
                "eventId": 1,
                "name": "Futbal",
                "startTime": "2030-07-02T15:00:00Z",
                "endTime": "2030-07-02T16:00:00Z",
                "type": "SPORT",
                "location": {
                    "id": 3,
                    "name": "Ihrisko",
                    "content": "na ihrisku",
                    "path": "/sounds/location/ihrisko.mp3",
                    "isStatic": true
                },
                "zvolavanie": true,
                "alertTimes": [15, 5]
            },
            {
                "id": 20,
                "eventId": 1,
                "name": "Budíček",
                "startTime": "2030-07-02T08:00:00Z",
                "endTime": "2030-07-02T08:15:00Z",
                "type": "WAKE_UP",
                "location": {
                    "id": 4,
                    "name": "Chatky",
                    "content": "pri chatkách",
                    "path": "/sounds/location/chatky.mp3",
                    "isStatic": true
                }
            },
            {
                "id": 22,
                "eventId": 2,
                "name": "Prednáška",
                "startTime": "2030-07-02T10:00:00Z",
                "endTime": "2030-07-02T11:00:00Z",
                "type": "LECTURE",
                "location": {
                    "id": 5,
                    "name": "Jedáleň",
                    "content": "v jedálni",
                    "path": "/sounds/location/jedalen.mp3",
                    "isStatic": true
                }
            }
        ],
        "sessions": [
            {
                "socketCodeHash": "aabbcc",
                "id": "session-1",
                "expiresAt": "2030-01-01T00:00:00Z",
                "allowedEvents": [
                    { "eventId": 1, "expiresAt": "2030-01-01T00:00:00Z" }
                ]
            }
        ]
    }"#;

    fn fixture_store(tag: &str) -> MemoryStore {
        let path = std::env::temp_dir()
            .join(format!("rozhlas-store-{}-{}.json", tag, std::process::id()));
        std::fs::write(&path, FIXTURE).unwrap();
        let store = MemoryStore::from_fixture(&path).unwrap();
        std::fs::remove_file(&path).ok();
        store
    }

    #[tokio::test]
    async fn fixture_hydrates_all_three_collections() {
        let store = fixture_store("hydrate");

        let event = store.get_event(EventId(1)).await.unwrap().unwrap();
        assert_eq!(event.name, "Tábor Zelený háj");
        assert!(event.is_protected());
        assert!(event.sounds.contains_key(&crate::sounds::keys::ConfigurableSound::Zvolavacka));

        let session = store.validate_socket_code("aabbcc").await.unwrap().unwrap();
        assert_eq!(session.id, "session-1");
        assert!(session.can_control(EventId(1), Utc::now()));
        assert!(!session.can_control(EventId(2), Utc::now()));

        assert!(store.get_event(EventId(9)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn activities_are_scoped_to_the_event_and_ordered() {
        let store = fixture_store("scoped");

        let activities = store.get_activities(EventId(1)).await.unwrap();
        let ids: Vec<i64> = activities.iter().map(|a| a.id.0).collect();
        assert_eq!(ids, vec![20, 21], "ordered by start time, other events filtered");

        let hit = store.get_activity(EventId(1), ActivityId(21)).await.unwrap();
        assert_eq!(hit.unwrap().name, "Futbal");

        // activity 22 belongs to event 2, not event 1
        let miss = store.get_activity(EventId(1), ActivityId(22)).await.unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn expired_codes_are_dropped_on_lookup() {
        let store = MemoryStore::new();
        store.put_session(
            "fresh".to_string(),
            SocketSession {
                id: "s-fresh".to_string(),
                expires_at: Utc::now() + ChronoDuration::hours(1),
                allowed_events: Vec::new(),
            },
        );
        store.put_session(
            "stale".to_string(),
            SocketSession {
                id: "s-stale".to_string(),
                expires_at: Utc::now() - ChronoDuration::hours(1),
                allowed_events: vec![AllowedEvent {
                    event_id: EventId(1),
                    expires_at: Utc::now() + ChronoDuration::hours(1),
                }],
            },
        );

        assert!(store.validate_socket_code("stale").await.unwrap().is_none());
        assert_eq!(store.sessions.read().len(), 1, "expired row is deleted");

        assert!(store.validate_socket_code("missing").await.unwrap().is_none());
        assert!(store.validate_socket_code("fresh").await.unwrap().is_some());
    }
}
