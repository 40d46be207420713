//! Connection hub: outbound channels for every live connection.
//!
//! The relay addresses notifications by [`ConnectionId`]; the hub turns
//! each one into a [`ServerMessage`] and pushes it onto that connection's
//! outbox, which the socket writer task drains.
//!
//! ```text
//! Delivery { c1, UserJoined } ──▶ hub ──▶ outbox(c1) ──▶ socket c1
//! ```

use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::foundation::ConnectionId;
use crate::domain::relay::Delivery;

use super::messages::ServerMessage;

/// Why a notification did not reach its recipient.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Connection {0} is not registered")]
    UnknownConnection(ConnectionId),

    #[error("Outbox for connection {0} is full")]
    OutboxFull(ConnectionId),

    #[error("Connection {0} has closed its outbox")]
    OutboxClosed(ConnectionId),
}

/// Map of connection id → outbox sender.
///
/// Owned by the relay task, so it needs no locking.
#[derive(Debug, Default)]
pub struct ConnectionHub {
    outboxes: HashMap<ConnectionId, mpsc::Sender<ServerMessage>>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the outbox for a newly connected client.
    pub fn register(&mut self, connection: ConnectionId, outbox: mpsc::Sender<ServerMessage>) {
        if self.outboxes.insert(connection, outbox).is_some() {
            tracing::warn!(connection_id = %connection, "Replaced existing outbox");
        }
    }

    /// Drop a connection's outbox. Returns false if it was unknown.
    pub fn unregister(&mut self, connection: &ConnectionId) -> bool {
        self.outboxes.remove(connection).is_some()
    }

    /// Queue one notification without waiting.
    ///
    /// A full outbox rejects the notification rather than stall the relay.
    pub fn deliver(&self, delivery: Delivery) -> Result<(), DeliveryError> {
        let recipient = delivery.recipient;
        let outbox = self
            .outboxes
            .get(&recipient)
            .ok_or(DeliveryError::UnknownConnection(recipient))?;

        outbox
            .try_send(ServerMessage::from(delivery.notification))
            .map_err(|err| match err {
                mpsc::error::TrySendError::Full(_) => DeliveryError::OutboxFull(recipient),
                mpsc::error::TrySendError::Closed(_) => DeliveryError::OutboxClosed(recipient),
            })
    }

    /// Deliver a batch in order, logging failures.
    ///
    /// Returns the connections whose outbox was full. They have missed a
    /// notification and must be evicted by the caller.
    pub fn deliver_all(&self, deliveries: Vec<Delivery>) -> Vec<ConnectionId> {
        let mut overflowed = Vec::new();

        for delivery in deliveries {
            // Once a notification is missed, later ones must not arrive out of order
            if overflowed.contains(&delivery.recipient) {
                continue;
            }
            match self.deliver(delivery) {
                Ok(()) => {}
                Err(DeliveryError::OutboxFull(connection)) => {
                    tracing::warn!(connection_id = %connection, "Outbox full, evicting connection");
                    overflowed.push(connection);
                }
                Err(err) => {
                    tracing::debug!("Dropping notification: {}", err);
                }
            }
        }

        overflowed
    }

    /// Number of registered connections.
    pub fn connection_count(&self) -> usize {
        self.outboxes.len()
    }
}
