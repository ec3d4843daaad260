//! Entities served by the external store. Shapes match the admin side's
//! database rows, hydrated and serialized camelCase for the wire.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::types::{ActivityId, EventId};
use crate::sounds::keys::{ActivityType, AdditionalInfo, ConfigurableSound, ParticipantNeed};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Non-empty when the event is password protected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_password_hash: Option<String>,
    /// Custom sounds assigned to configurable roles.
    #[serde(default)]
    pub sounds: HashMap<ConfigurableSound, CustomSound>,
}

impl Event {
    pub fn is_protected(&self) -> bool {
        self.admin_password_hash
            .as_deref()
            .is_some_and(|h| !h.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSound {
    pub id: i64,
    pub key: ConfigurableSound,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub path: String,
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: i64,
    pub name: String,
    /// Spoken locative form, e.g. "v jedáleni".
    pub content: String,
    pub path: String,
    /// Built-in recording under the fixed root rather than an upload.
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub event_id: EventId,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub location: Location,
    /// Requests the call-to-gather announcement at start time.
    #[serde(default)]
    pub zvolavanie: bool,
    /// Minutes the activity is pushed back, shifting every announcement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<i64>,
    /// Lead times in minutes for the advance announcements.
    #[serde(default)]
    pub alert_times: Vec<u32>,
    #[serde(default)]
    pub participant_needs: Vec<ParticipantNeed>,
    #[serde(default)]
    pub additional_infos: Vec<AdditionalInfo>,
}

impl Activity {
    /// Delay-adjusted start in epoch milliseconds.
    pub fn effective_start_ms(&self) -> i64 {
        self.start_time.timestamp_millis() + self.delay.unwrap_or(0) * 60_000
    }
}

/// Live session data behind a rotating socket code, consulted by the
/// broadcast server before privileged commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocketSession {
    pub id: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub allowed_events: Vec<AllowedEvent>,
}

impl SocketSession {
    /// True while the session holds an unexpired permission for the event.
    pub fn can_control(&self, event_id: EventId, now: DateTime<Utc>) -> bool {
        self.allowed_events
            .iter()
            .any(|a| a.event_id == event_id && a.expires_at > now)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedEvent {
    pub event_id: EventId,
    pub expires_at: DateTime<Utc>,
}
