//! Relay dispatcher: the single state-transition function of the relay.
//!
//! `RelayState::apply` consumes one event, mutates the registry and
//! ledger, and returns the notifications to deliver in processing order.
//! It never fails; unknown sessions, duplicate joins and empty messages
//! degrade to no-ops or to a single `SessionError` for the caller.

use crate::domain::foundation::{ConnectionId, SessionId, StateMachine};

use super::{
    Delivery, Departure, Notification, RelayEvent, SessionLifecycle, SessionRegistry,
    TerminationLedger,
};

/// Reason sent to a connection that tries to join a terminated session.
pub const TERMINATED_SESSION_REASON: &str =
    "This session has been terminated and is no longer accessible.";

/// Owns the session registry and termination ledger.
///
/// Invariant: no session id is both registered and terminated.
#[derive(Debug, Default)]
pub struct RelayState {
    registry: SessionRegistry,
    ledger: TerminationLedger,
}

impl RelayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event and returns the resulting deliveries.
    pub fn apply(&mut self, event: RelayEvent) -> Vec<Delivery> {
        match event {
            RelayEvent::Join {
                connection,
                session_id,
            } => self.join(connection, session_id),
            RelayEvent::Send {
                connection,
                session_id,
                text,
            } => self.send(connection, &session_id, text),
            RelayEvent::Terminate {
                connection,
                session_id,
            } => self.terminate(connection, session_id),
            RelayEvent::Disconnect { connection } => self.disconnect(connection),
        }
    }

    /// Where a session id currently sits in its lifecycle.
    pub fn lifecycle(&self, session_id: &SessionId) -> SessionLifecycle {
        if self.ledger.is_terminated(session_id) {
            SessionLifecycle::Terminated
        } else if self.registry.contains(session_id) {
            SessionLifecycle::Active
        } else {
            SessionLifecycle::NeverSeen
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &TerminationLedger {
        &self.ledger
    }

    fn join(&mut self, connection: ConnectionId, session_id: SessionId) -> Vec<Delivery> {
        if self.lifecycle(&session_id).is_terminal() {
            tracing::info!(
                session_id = %session_id,
                connection_id = %connection,
                "Rejected join to terminated session"
            );
            return vec![Delivery::new(
                connection,
                Notification::SessionError {
                    message: TERMINATED_SESSION_REASON.to_string(),
                },
            )];
        }

        let user_count = self.registry.join(&session_id, connection);
        tracing::debug!(
            session_id = %session_id,
            connection_id = %connection,
            user_count,
            "Connection joined session"
        );

        self.broadcast(
            &session_id,
            None,
            Notification::UserJoined {
                session_id: session_id.clone(),
                user_count,
            },
        )
    }

    fn send(
        &self,
        connection: ConnectionId,
        session_id: &SessionId,
        text: String,
    ) -> Vec<Delivery> {
        let deliveries = self.broadcast(
            session_id,
            Some(connection),
            Notification::Message { message: text },
        );
        tracing::trace!(
            session_id = %session_id,
            connection_id = %connection,
            sender_is_member = self.registry.is_member(session_id, &connection),
            recipients = deliveries.len(),
            "Relayed message"
        );
        deliveries
    }

    fn terminate(&mut self, connection: ConnectionId, session_id: SessionId) -> Vec<Delivery> {
        let Some(members) = self.registry.remove_session(&session_id) else {
            tracing::debug!(
                session_id = %session_id,
                connection_id = %connection,
                "Terminate ignored, session not found"
            );
            return Vec::new();
        };

        tracing::debug!(
            session_id = %session_id,
            connection_id = %connection,
            members = members.len(),
            "Session terminated"
        );
        self.ledger.record(session_id);

        members
            .into_iter()
            .map(|member| Delivery::new(member, Notification::Terminated))
            .collect()
    }

    fn disconnect(&mut self, connection: ConnectionId) -> Vec<Delivery> {
        let mut deliveries = Vec::new();

        for departure in self.registry.leave_all(&connection) {
            match departure {
                Departure::Emptied { session_id } => {
                    tracing::debug!(
                        session_id = %session_id,
                        connection_id = %connection,
                        "Last member left, session removed"
                    );
                }
                Departure::Left {
                    session_id,
                    remaining,
                } => {
                    let user_count = remaining.len();
                    tracing::debug!(
                        session_id = %session_id,
                        connection_id = %connection,
                        user_count,
                        "Member left session"
                    );
                    deliveries.extend(remaining.into_iter().map(|member| {
                        Delivery::new(
                            member,
                            Notification::UserLeft {
                                session_id: session_id.clone(),
                                user_count,
                            },
                        )
                    }));
                }
            }
        }

        deliveries
    }

    /// Addresses a notification to every member, optionally skipping one.
    fn broadcast(
        &self,
        session_id: &SessionId,
        except: Option<ConnectionId>,
        notification: Notification,
    ) -> Vec<Delivery> {
        self.registry
            .members(session_id)
            .into_iter()
            .filter(|member| Some(*member) != except)
            .map(|member| Delivery::new(member, notification.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join(state: &mut RelayState, connection: ConnectionId, session: &str) -> Vec<Delivery> {
        state.apply(RelayEvent::Join {
            connection,
            session_id: SessionId::from(session),
        })
    }

    #[test]
    fn first_join_creates_session_and_notifies_joiner() {
        let mut state = RelayState::new();
        let c1 = ConnectionId::new();

        let out = join(&mut state, c1, "s");

        assert_eq!(
            out,
            vec![Delivery::new(
                c1,
                Notification::UserJoined {
                    session_id: SessionId::from("s"),
                    user_count: 1,
                }
            )]
        );
        assert_eq!(state.lifecycle(&SessionId::from("s")), SessionLifecycle::Active);
    }

    #[test]
    fn duplicate_join_still_broadcasts_same_count() {
        let mut state = RelayState::new();
        let c1 = ConnectionId::new();
        join(&mut state, c1, "s");

        let out = join(&mut state, c1, "s");

        assert_eq!(out.len(), 1);
        assert!(matches!(
            out[0].notification,
            Notification::UserJoined { user_count: 1, .. }
        ));
    }

    #[test]
    fn send_skips_sender() {
        let mut state = RelayState::new();
        let c1 = ConnectionId::new();
        let c2 = ConnectionId::new();
        join(&mut state, c1, "s");
        join(&mut state, c2, "s");

        let out = state.apply(RelayEvent::Send {
            connection: c1,
            session_id: SessionId::from("s"),
            text: "hi".to_string(),
        });

        assert_eq!(
            out,
            vec![Delivery::new(
                c2,
                Notification::Message {
                    message: "hi".to_string()
                }
            )]
        );
    }

    #[test]
    fn send_from_non_member_reaches_all_members() {
        let mut state = RelayState::new();
        let member = ConnectionId::new();
        join(&mut state, member, "s");

        let out = state.apply(RelayEvent::Send {
            connection: ConnectionId::new(),
            session_id: SessionId::from("s"),
            text: String::new(),
        });

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].recipient, member);
    }

    #[test]
    fn terminate_unknown_session_records_nothing() {
        let mut state = RelayState::new();

        let out = state.apply(RelayEvent::Terminate {
            connection: ConnectionId::new(),
            session_id: SessionId::from("ghost"),
        });

        assert!(out.is_empty());
        assert!(state.ledger().is_empty());
        assert_eq!(
            state.lifecycle(&SessionId::from("ghost")),
            SessionLifecycle::NeverSeen
        );
    }

    #[test]
    fn join_after_terminate_is_rejected_without_mutation() {
        let mut state = RelayState::new();
        let c1 = ConnectionId::new();
        join(&mut state, c1, "s");
        state.apply(RelayEvent::Terminate {
            connection: c1,
            session_id: SessionId::from("s"),
        });

        let late = ConnectionId::new();
        let out = join(&mut state, late, "s");

        assert_eq!(
            out,
            vec![Delivery::new(
                late,
                Notification::SessionError {
                    message: TERMINATED_SESSION_REASON.to_string()
                }
            )]
        );
        assert!(!state.registry().contains(&SessionId::from("s")));
        assert_eq!(
            state.lifecycle(&SessionId::from("s")),
            SessionLifecycle::Terminated
        );
    }

    #[test]
    fn disconnect_of_unknown_connection_is_noop() {
        let mut state = RelayState::new();
        join(&mut state, ConnectionId::new(), "s");

        let out = state.apply(RelayEvent::Disconnect {
            connection: ConnectionId::new(),
        });

        assert!(out.is_empty());
        assert_eq!(state.registry().member_count(&SessionId::from("s")), 1);
    }
}
