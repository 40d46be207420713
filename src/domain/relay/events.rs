//! Inbound relay events and outbound notifications.

use crate::domain::foundation::{ConnectionId, SessionId};

/// Everything the dispatcher reacts to.
///
/// Every variant carries the connection that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// Join (or create) a session.
    Join {
        connection: ConnectionId,
        session_id: SessionId,
    },

    /// Broadcast text to the other members of a session.
    Send {
        connection: ConnectionId,
        session_id: SessionId,
        text: String,
    },

    /// Permanently close a session.
    Terminate {
        connection: ConnectionId,
        session_id: SessionId,
    },

    /// Transport-level connection loss.
    Disconnect { connection: ConnectionId },
}

impl RelayEvent {
    /// The connection that triggered this event.
    pub fn connection(&self) -> ConnectionId {
        match self {
            RelayEvent::Join { connection, .. }
            | RelayEvent::Send { connection, .. }
            | RelayEvent::Terminate { connection, .. }
            | RelayEvent::Disconnect { connection } => *connection,
        }
    }
}

/// Notification pushed to a single connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Someone joined; sent to every member including the joiner.
    UserJoined {
        session_id: SessionId,
        user_count: usize,
    },

    /// Text relayed from another member.
    Message { message: String },

    /// A member disconnected; sent to the remaining members.
    UserLeft {
        session_id: SessionId,
        user_count: usize,
    },

    /// The session was explicitly closed.
    Terminated,

    /// The requested session cannot be joined.
    SessionError { message: String },
}

/// A notification addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub recipient: ConnectionId,
    pub notification: Notification,
}

impl Delivery {
    pub fn new(recipient: ConnectionId, notification: Notification) -> Self {
        Self {
            recipient,
            notification,
        }
    }
}
