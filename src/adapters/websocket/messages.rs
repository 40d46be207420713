//! WebSocket message types for the session relay.
//!
//! Defines the protocol between server and connected clients:
//! - Client → Server: join, message, terminate
//! - Server → Client: userJoined, message, userLeft, terminated, sessionError
//!
//! Frames are JSON text, internally tagged by `type`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{ConnectionId, SessionId};
use crate::domain::relay::{Notification, RelayEvent};

// ============================================
// Server → Client Messages
// ============================================

/// All message types that can be sent from server to client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// A member joined the session.
    UserJoined(UserCountMessage),

    /// Text relayed from another member.
    Message(ChatMessage),

    /// A member disconnected.
    UserLeft(UserCountMessage),

    /// The session was closed for good.
    Terminated,

    /// The join was rejected.
    SessionError(ErrorMessage),
}

/// Session membership count after a join or leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCountMessage {
    pub session_id: SessionId,
    pub user_count: usize,
}

/// Relayed chat text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub message: String,
}

/// Human-readable error sent to a single client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorMessage {
    pub message: String,
}

impl From<Notification> for ServerMessage {
    fn from(notification: Notification) -> Self {
        match notification {
            Notification::UserJoined {
                session_id,
                user_count,
            } => ServerMessage::UserJoined(UserCountMessage {
                session_id,
                user_count,
            }),
            Notification::Message { message } => ServerMessage::Message(ChatMessage { message }),
            Notification::UserLeft {
                session_id,
                user_count,
            } => ServerMessage::UserLeft(UserCountMessage {
                session_id,
                user_count,
            }),
            Notification::Terminated => ServerMessage::Terminated,
            Notification::SessionError { message } => {
                ServerMessage::SessionError(ErrorMessage { message })
            }
        }
    }
}

// ============================================
// Client → Server Messages
// ============================================

/// All message types that can be received from client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Join or create a session.
    #[serde(rename_all = "camelCase")]
    Join { session_id: SessionId },

    /// Send text to the other members.
    #[serde(rename_all = "camelCase")]
    Message {
        session_id: SessionId,
        message: String,
    },

    /// Permanently close a session.
    #[serde(rename_all = "camelCase")]
    Terminate { session_id: SessionId },
}

impl ClientMessage {
    /// Decode a text frame.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::from)
    }

    /// Attach the sending connection, producing a relay event.
    pub fn into_event(self, connection: ConnectionId) -> RelayEvent {
        match self {
            ClientMessage::Join { session_id } => RelayEvent::Join {
                connection,
                session_id,
            },
            ClientMessage::Message {
                session_id,
                message,
            } => RelayEvent::Send {
                connection,
                session_id,
                text: message,
            },
            ClientMessage::Terminate { session_id } => RelayEvent::Terminate {
                connection,
                session_id,
            },
        }
    }
}

/// A client frame that could not be understood.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Malformed client frame: {0}")]
    Malformed(#[from] serde_json::Error),
}
