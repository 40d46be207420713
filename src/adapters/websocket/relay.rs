//! Relay task: the single reactor that owns all relay state.
//!
//! Socket handlers never touch [`RelayState`] directly. They send
//! [`RelayCommand`]s through a [`RelayHandle`]; one task receives them and
//! runs each to completion before looking at the next, so the registry,
//! ledger and hub need no locks and every connection observes
//! notifications in processing order.

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::config::RelayConfig;
use crate::domain::foundation::ConnectionId;
use crate::domain::relay::{RelayEvent, RelayState};

use super::hub::ConnectionHub;
use super::messages::ServerMessage;

/// The relay task is no longer running.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelayError {
    #[error("Relay task has stopped")]
    Closed,
}

/// Point-in-time counters for monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayStats {
    pub active_sessions: usize,
    pub terminated_sessions: usize,
    pub connections: usize,
}

/// Work items processed by the relay task.
#[derive(Debug)]
pub enum RelayCommand {
    /// Register a new connection's outbox.
    Connect {
        connection: ConnectionId,
        outbox: mpsc::Sender<ServerMessage>,
    },

    /// Apply a relay event and deliver its notifications.
    Event(RelayEvent),

    /// Report current counters.
    Stats(oneshot::Sender<RelayStats>),
}

/// Cloneable sender side of the relay task.
#[derive(Debug, Clone)]
pub struct RelayHandle {
    commands: mpsc::Sender<RelayCommand>,
    outbound_buffer: usize,
}

impl RelayHandle {
    /// Register a new connection.
    ///
    /// Returns its id and the receiver its writer task should drain.
    pub async fn connect(
        &self,
    ) -> Result<(ConnectionId, mpsc::Receiver<ServerMessage>), RelayError> {
        let connection = ConnectionId::new();
        let (outbox, inbox) = mpsc::channel(self.outbound_buffer);
        self.send(RelayCommand::Connect { connection, outbox })
            .await?;
        Ok((connection, inbox))
    }

    /// Submit a join, send or terminate from a connection.
    pub async fn dispatch(&self, event: RelayEvent) -> Result<(), RelayError> {
        self.send(RelayCommand::Event(event)).await
    }

    /// Clean up after a connection is lost.
    pub async fn disconnect(&self, connection: ConnectionId) -> Result<(), RelayError> {
        self.dispatch(RelayEvent::Disconnect { connection }).await
    }

    /// Fetch current counters.
    pub async fn stats(&self) -> Result<RelayStats, RelayError> {
        let (reply, response) = oneshot::channel();
        self.send(RelayCommand::Stats(reply)).await?;
        response.await.map_err(|_| RelayError::Closed)
    }

    async fn send(&self, command: RelayCommand) -> Result<(), RelayError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| RelayError::Closed)
    }
}

/// Start the relay task.
///
/// The task runs until every [`RelayHandle`] has been dropped.
pub fn spawn_relay(config: &RelayConfig) -> (RelayHandle, JoinHandle<()>) {
    let (commands, inbox) = mpsc::channel(config.command_buffer);
    let task = tokio::spawn(run(inbox));
    let handle = RelayHandle {
        commands,
        outbound_buffer: config.outbound_buffer,
    };
    (handle, task)
}

async fn run(mut inbox: mpsc::Receiver<RelayCommand>) {
    let mut state = RelayState::new();
    let mut hub = ConnectionHub::new();

    while let Some(command) = inbox.recv().await {
        match command {
            RelayCommand::Connect { connection, outbox } => {
                hub.register(connection, outbox);
                tracing::info!(
                    connection_id = %connection,
                    connections = hub.connection_count(),
                    "Connection opened"
                );
            }
            RelayCommand::Event(event) => apply_and_deliver(&mut state, &mut hub, event),
            RelayCommand::Stats(reply) => {
                let _ = reply.send(RelayStats {
                    active_sessions: state.registry().session_count(),
                    terminated_sessions: state.ledger().len(),
                    connections: hub.connection_count(),
                });
            }
        }
    }

    tracing::debug!("Relay task stopped");
}

/// Apply an event, deliver its notifications, and evict slow connections.
///
/// A connection whose outbox overflowed is unregistered (closing its
/// socket) and then disconnected, so remaining members see `userLeft`.
/// Evictions can overflow further outboxes; the loop runs until none do.
fn apply_and_deliver(state: &mut RelayState, hub: &mut ConnectionHub, event: RelayEvent) {
    let mut pending = vec![event];

    while let Some(event) = pending.pop() {
        tracing::trace!(connection_id = %event.connection(), "Applying relay event");
        let disconnected = match &event {
            RelayEvent::Disconnect { connection } => Some(*connection),
            _ => None,
        };

        let overflowed = hub.deliver_all(state.apply(event));

        if let Some(connection) = disconnected {
            if hub.unregister(&connection) {
                tracing::info!(
                    connection_id = %connection,
                    connections = hub.connection_count(),
                    "Connection closed"
                );
            }
        }

        for connection in overflowed {
            if hub.unregister(&connection) {
                tracing::warn!(
                    connection_id = %connection,
                    connections = hub.connection_count(),
                    "Evicted slow connection"
                );
            }
            pending.push(RelayEvent::Disconnect { connection });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;

    #[tokio::test]
    async fn connect_registers_outbox() {
        let (relay, _task) = spawn_relay(&RelayConfig::default());

        let (_id, _rx) = relay.connect().await.unwrap();

        let stats = relay.stats().await.unwrap();
        assert_eq!(stats.connections, 1);
        assert_eq!(stats.active_sessions, 0);
    }

    #[tokio::test]
    async fn join_notification_reaches_outbox() {
        let (relay, _task) = spawn_relay(&RelayConfig::default());
        let (id, mut rx) = relay.connect().await.unwrap();

        relay
            .dispatch(RelayEvent::Join {
                connection: id,
                session_id: SessionId::from("s"),
            })
            .await
            .unwrap();

        let msg = rx.recv().await.unwrap();
        assert!(matches!(msg, ServerMessage::UserJoined(ref m) if m.user_count == 1));
    }

    #[tokio::test]
    async fn disconnect_unregisters_connection() {
        let (relay, _task) = spawn_relay(&RelayConfig::default());
        let (id, mut rx) = relay.connect().await.unwrap();

        relay.disconnect(id).await.unwrap();

        assert_eq!(relay.stats().await.unwrap().connections, 0);
        // The hub dropped the sender, so the outbox is closed.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn terminate_evicts_member_with_full_outbox() {
        let config = RelayConfig {
            outbound_buffer: 2,
            ..Default::default()
        };
        let (relay, _task) = spawn_relay(&config);
        let (alice, mut alice_rx) = relay.connect().await.unwrap();
        let (bob, mut bob_rx) = relay.connect().await.unwrap();
        let session_id = SessionId::from("s");

        for connection in [alice, bob] {
            relay
                .dispatch(RelayEvent::Join {
                    connection,
                    session_id: session_id.clone(),
                })
                .await
                .unwrap();
        }
        alice_rx.recv().await.unwrap();
        alice_rx.recv().await.unwrap();

        // Bob's outbox now holds userJoined and the message: full
        relay
            .dispatch(RelayEvent::Send {
                connection: alice,
                session_id: session_id.clone(),
                text: "x".to_string(),
            })
            .await
            .unwrap();
        relay
            .dispatch(RelayEvent::Terminate {
                connection: alice,
                session_id,
            })
            .await
            .unwrap();

        assert_eq!(alice_rx.recv().await.unwrap(), ServerMessage::Terminated);
        assert!(matches!(bob_rx.recv().await, Some(ServerMessage::UserJoined(_))));
        assert!(matches!(bob_rx.recv().await, Some(ServerMessage::Message(_))));
        // Bob cannot have missed the termination silently: his outbox is closed
        assert!(bob_rx.recv().await.is_none());

        let stats = relay.stats().await.unwrap();
        assert_eq!(stats.connections, 1);
        assert_eq!(stats.terminated_sessions, 1);
    }

    #[tokio::test]
    async fn handle_reports_closed_after_task_stops() {
        let (relay, task) = spawn_relay(&RelayConfig::default());
        task.abort();
        let _ = task.await;

        assert_eq!(relay.stats().await, Err(RelayError::Closed));
    }
}
