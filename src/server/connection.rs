use flume::Sender;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::common::types::EventId;
use crate::model::SocketSession;
use crate::protocol::ServerMessage;

/// One live socket. The socket task drains the paired receiver;
/// everything else reaches the peer through `send`.
pub struct Connection {
    pub id: Uuid,
    sender: Sender<ServerMessage>,
    pub active_event: Mutex<Option<EventId>>,
    /// Session attached at connect time, swapped on revalidation.
    pub session: Mutex<Option<SocketSession>>,
    /// Digest presented in the `Socket-Code` header, kept so the
    /// session can be revalidated later.
    pub code_hash: Option<String>,
}

impl Connection {
    pub fn new(
        sender: Sender<ServerMessage>,
        session: Option<SocketSession>,
        code_hash: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            active_event: Mutex::new(None),
            session: Mutex::new(session),
            code_hash,
        }
    }

    /// Queue a message for the socket task. A gone receiver means the
    /// socket is tearing down; the message is simply dropped.
    pub fn send(&self, message: ServerMessage) {
        let _ = self.sender.send(message);
    }

    pub fn active_event(&self) -> Option<EventId> {
        *self.active_event.lock()
    }

    pub fn session_id(&self) -> Option<String> {
        self.session.lock().as_ref().map(|s| s.id.clone())
    }
}
