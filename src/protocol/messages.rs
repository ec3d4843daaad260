//! Wire messages for the realtime socket. All JSON, camelCase,
//! internally tagged so both sides dispatch on a single field.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::types::{ActivityId, EventId};
use crate::model::{Activity, Event};
use crate::sounds::keys::SoundToken;

/// Requests a connected client may send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ClientRequest {
    #[serde(rename_all = "camelCase")]
    JoinEvent { event_id: EventId },
    #[serde(rename_all = "camelCase")]
    LeaveEvent { event_id: EventId },
    CheckActiveEvent,
    PlayerControl { control: PlayerControl },
}

/// Playback overrides, relayed verbatim to every member of the event
/// room once the sender passes the permission gates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlayerControl {
    StopPlaying,
    #[serde(rename_all = "camelCase")]
    DelayAnnouncement { delay_minutes: u32 },
    CustomSound { sounds: Vec<SoundToken> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ServerMessage {
    /// First message after the upgrade; `session` tells the client
    /// whether its socket code attached a valid session.
    #[serde(rename_all = "camelCase")]
    Ready { connection_id: Uuid, session: bool },
    #[serde(rename_all = "camelCase")]
    JoinReply {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        event: Option<Event>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        activities: Option<Vec<Activity>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    ActiveEvent { event_id: Option<EventId> },
    #[serde(rename_all = "camelCase")]
    ControlReply {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    EventUpdate { event_id: EventId, event: Event },
    #[serde(rename_all = "camelCase")]
    ActivityUpdate {
        event_id: EventId,
        activity_id: ActivityId,
        activity: Activity,
    },
    #[serde(rename_all = "camelCase")]
    ActivityDelete {
        event_id: EventId,
        activity_id: ActivityId,
    },
    #[serde(rename_all = "camelCase")]
    ActivityListUpdate {
        event_id: EventId,
        activities: Vec<Activity>,
    },
    PlayerControl { control: PlayerControl },
}

impl ServerMessage {
    pub fn join_ok(event: Event, activities: Vec<Activity>) -> Self {
        Self::JoinReply {
            success: true,
            event: Some(event),
            activities: Some(activities),
            error: None,
        }
    }

    pub fn join_err(error: impl ToString) -> Self {
        Self::JoinReply {
            success: false,
            event: None,
            activities: None,
            error: Some(error.to_string()),
        }
    }

    pub fn control_ok() -> Self {
        Self::ControlReply {
            success: true,
            error: None,
        }
    }

    pub fn control_err(error: impl ToString) -> Self {
        Self::ControlReply {
            success: false,
            error: Some(error.to_string()),
        }
    }
}
