//! Outbound hub connection for the announcer daemon. Joins the
//! configured event, mirrors its activity list and drives the
//! [`Announcer`] from server pushes.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use sha2::{Digest, Sha256};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::protocol::Message;
use tracing::{debug, error, info, warn};

use crate::announcer::Announcer;
use crate::common::errors::ClientError;
use crate::common::types::{ActivityId, EventId};
use crate::config::AnnouncerConfig;
use crate::model::Activity;
use crate::protocol::{ClientRequest, ServerMessage};

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

pub struct RealtimeClient {
    config: AnnouncerConfig,
    announcer: Arc<Announcer>,
    activities: HashMap<ActivityId, Activity>,
}

impl RealtimeClient {
    pub fn new(config: AnnouncerConfig, announcer: Arc<Announcer>) -> Self {
        Self {
            config,
            announcer,
            activities: HashMap::new(),
        }
    }

    /// Connect and follow the hub until the task is dropped. Every lost
    /// or rejected session is retried after a fixed backoff; the join
    /// reply of the new session replaces all locally mirrored state.
    pub async fn run(&mut self) {
        loop {
            if let Err(e) = self.session().await {
                error!("hub session ended: {}", e);
            }
            info!("reconnecting in {}s", RECONNECT_DELAY.as_secs());
            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    }

    async fn session(&mut self) -> Result<(), ClientError> {
        let mut request = self.config.hub_url.as_str().into_client_request()?;
        if let Some(code) = &self.config.socket_code {
            let digest = hex::encode(Sha256::digest(code.as_bytes()));
            if let Ok(value) = digest.parse() {
                request.headers_mut().insert("Socket-Code", value);
            }
        }

        info!("connecting to hub at {}", self.config.hub_url);
        let (stream, _) = connect_async(request).await?;
        let (mut write, mut read) = stream.split();

        let (tx, rx) = flume::unbounded::<ClientRequest>();
        let writer = tokio::spawn(async move {
            while let Ok(request) = rx.recv_async().await {
                let text = match serde_json::to_string(&request) {
                    Ok(text) => text,
                    Err(e) => {
                        error!("failed to encode request: {}", e);
                        continue;
                    }
                };
                if let Err(e) = write.send(Message::Text(text.into())).await {
                    error!("hub write error: {}", e);
                    break;
                }
            }
        });

        let result = loop {
            let Some(frame) = read.next().await else {
                break Err(ClientError::ConnectionClosed);
            };
            match frame {
                Ok(Message::Text(text)) => {
                    let message: ServerMessage = match serde_json::from_str(&text) {
                        Ok(message) => message,
                        Err(e) => {
                            warn!("dropping unparseable hub frame: {}", e);
                            continue;
                        }
                    };
                    if let Err(e) = self.handle_message(message, &tx).await {
                        break Err(e);
                    }
                }
                Ok(Message::Close(_)) => break Err(ClientError::ConnectionClosed),
                Ok(_) => {}
                Err(e) => break Err(ClientError::Ws(e)),
            }
        };

        writer.abort();
        result
    }

    async fn handle_message(
        &mut self,
        message: ServerMessage,
        tx: &flume::Sender<ClientRequest>,
    ) -> Result<(), ClientError> {
        let configured = EventId(self.config.event_id);
        match message {
            ServerMessage::Ready {
                connection_id,
                session,
            } => {
                info!(
                    "hub ready, connection {} (session attached: {})",
                    connection_id, session
                );
                self.send_join(tx)?;
            }
            ServerMessage::JoinReply {
                success: false,
                error,
                ..
            } => {
                return Err(ClientError::JoinRejected(
                    error.unwrap_or_else(|| "no reason given".to_string()),
                ));
            }
            ServerMessage::JoinReply {
                event: Some(event),
                activities,
                ..
            } => {
                let activities = activities.unwrap_or_default();
                info!(
                    "joined event '{}' with {} activities",
                    event.name,
                    activities.len()
                );
                self.announcer.set_event_sounds(&event);
                self.activities = activities.into_iter().map(|a| (a.id, a)).collect();
                self.rebuild().await;
            }
            ServerMessage::JoinReply { .. } => {
                warn!("join reply carried no event payload");
            }
            ServerMessage::EventUpdate { event_id, event } if event_id == configured => {
                info!(
                    "event '{}' changed, refreshing sounds and schedule",
                    event.name
                );
                self.announcer.set_event_sounds(&event);
                self.rebuild().await;
            }
            ServerMessage::ActivityUpdate {
                event_id,
                activity_id,
                activity,
            } if event_id == configured => {
                debug!("activity {} updated", activity_id);
                self.activities.insert(activity_id, activity);
                self.rebuild().await;
            }
            ServerMessage::ActivityDelete {
                event_id,
                activity_id,
            } if event_id == configured => {
                debug!("activity {} deleted", activity_id);
                self.activities.remove(&activity_id);
                self.rebuild().await;
            }
            ServerMessage::ActivityListUpdate {
                event_id,
                activities,
            } if event_id == configured => {
                debug!("activity list replaced, {} entries", activities.len());
                self.activities = activities.into_iter().map(|a| (a.id, a)).collect();
                self.rebuild().await;
            }
            ServerMessage::EventUpdate { event_id, .. }
            | ServerMessage::ActivityUpdate { event_id, .. }
            | ServerMessage::ActivityDelete { event_id, .. }
            | ServerMessage::ActivityListUpdate { event_id, .. } => {
                warn!(
                    "update for event {} while following {}, rejoining",
                    event_id, configured
                );
                self.send_join(tx)?;
            }
            ServerMessage::PlayerControl { control } => {
                self.announcer.handle_control(control);
            }
            other => debug!("ignoring hub message: {:?}", other),
        }
        Ok(())
    }

    fn send_join(&self, tx: &flume::Sender<ClientRequest>) -> Result<(), ClientError> {
        tx.send(ClientRequest::JoinEvent {
            event_id: EventId(self.config.event_id),
        })
        .map_err(|_| ClientError::ConnectionClosed)
    }

    /// Full rebuild from the mirrored activity map; the scheduler never
    /// gets patched in place.
    async fn rebuild(&self) {
        let activities: Vec<Activity> = self.activities.values().cloned().collect();
        self.announcer.rebuild_schedule(&activities).await;
    }
}
