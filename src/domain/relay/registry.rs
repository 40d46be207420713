//! Session registry: which connections are members of which session.
//!
//! A session exists exactly while it has an entry here. Entries are
//! created by the first join and removed when the member set empties or
//! the session is terminated.

use std::collections::{HashMap, HashSet};

use crate::domain::foundation::{ConnectionId, SessionId};

/// Outcome of removing a connection from one session it belonged to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Departure {
    /// The connection was the last member; the session entry is gone.
    Emptied { session_id: SessionId },

    /// Other members remain.
    Left {
        session_id: SessionId,
        remaining: Vec<ConnectionId>,
    },
}

/// Map of session id → set of member connections.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, HashSet<ConnectionId>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the session currently has an entry.
    pub fn contains(&self, session_id: &SessionId) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Adds a connection to a session, creating the entry if needed.
    ///
    /// Idempotent on membership. Returns the member count after the join.
    pub fn join(&mut self, session_id: &SessionId, connection: ConnectionId) -> usize {
        let members = self.sessions.entry(session_id.clone()).or_default();
        members.insert(connection);
        members.len()
    }

    /// Returns true if the connection is a member of the session.
    pub fn is_member(&self, session_id: &SessionId, connection: &ConnectionId) -> bool {
        self.sessions
            .get(session_id)
            .is_some_and(|members| members.contains(connection))
    }

    /// Current members of a session (empty if the session does not exist).
    pub fn members(&self, session_id: &SessionId) -> Vec<ConnectionId> {
        self.sessions
            .get(session_id)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of members in a session (0 if the session does not exist).
    pub fn member_count(&self, session_id: &SessionId) -> usize {
        self.sessions.get(session_id).map(HashSet::len).unwrap_or(0)
    }

    /// Deletes a session entry, returning its former members.
    pub fn remove_session(&mut self, session_id: &SessionId) -> Option<Vec<ConnectionId>> {
        self.sessions
            .remove(session_id)
            .map(|members| members.into_iter().collect())
    }

    /// Removes a connection from every session it belongs to.
    ///
    /// Sessions left without members are deleted. This walks every live
    /// session.
    pub fn leave_all(&mut self, connection: &ConnectionId) -> Vec<Departure> {
        let mut departures = Vec::new();

        for (session_id, members) in self.sessions.iter_mut() {
            if !members.remove(connection) {
                continue;
            }
            if members.is_empty() {
                departures.push(Departure::Emptied {
                    session_id: session_id.clone(),
                });
            } else {
                departures.push(Departure::Left {
                    session_id: session_id.clone(),
                    remaining: members.iter().copied().collect(),
                });
            }
        }

        self.sessions.retain(|_, members| !members.is_empty());
        departures
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(raw: &str) -> SessionId {
        SessionId::from(raw)
    }

    #[test]
    fn join_creates_session_if_not_exists() {
        let mut registry = SessionRegistry::new();
        assert!(!registry.contains(&sid("a")));

        let count = registry.join(&sid("a"), ConnectionId::new());

        assert_eq!(count, 1);
        assert!(registry.contains(&sid("a")));
        assert_eq!(registry.session_count(), 1);
    }

    #[test]
    fn repeated_join_is_idempotent() {
        let mut registry = SessionRegistry::new();
        let conn = ConnectionId::new();

        assert_eq!(registry.join(&sid("a"), conn), 1);
        assert_eq!(registry.join(&sid("a"), conn), 1);
        assert_eq!(registry.member_count(&sid("a")), 1);
    }

    #[test]
    fn members_of_unknown_session_is_empty() {
        let registry = SessionRegistry::new();
        assert!(registry.members(&sid("ghost")).is_empty());
        assert_eq!(registry.member_count(&sid("ghost")), 0);
    }

    #[test]
    fn remove_session_returns_members() {
        let mut registry = SessionRegistry::new();
        let c1 = ConnectionId::new();
        let c2 = ConnectionId::new();
        registry.join(&sid("a"), c1);
        registry.join(&sid("a"), c2);

        let mut removed = registry.remove_session(&sid("a")).unwrap();
        removed.sort();
        let mut expected = vec![c1, c2];
        expected.sort();

        assert_eq!(removed, expected);
        assert!(!registry.contains(&sid("a")));
        assert!(registry.remove_session(&sid("a")).is_none());
    }

    #[test]
    fn leave_all_removes_connection_from_every_session() {
        let mut registry = SessionRegistry::new();
        let leaving = ConnectionId::new();
        let staying = ConnectionId::new();
        registry.join(&sid("solo"), leaving);
        registry.join(&sid("pair"), leaving);
        registry.join(&sid("pair"), staying);
        registry.join(&sid("other"), staying);

        let mut departures = registry.leave_all(&leaving);
        departures.sort_by_key(|d| match d {
            Departure::Emptied { session_id } | Departure::Left { session_id, .. } => {
                session_id.clone()
            }
        });

        assert_eq!(
            departures,
            vec![
                Departure::Left {
                    session_id: sid("pair"),
                    remaining: vec![staying],
                },
                Departure::Emptied {
                    session_id: sid("solo"),
                },
            ]
        );
        assert!(!registry.contains(&sid("solo")));
        assert_eq!(registry.member_count(&sid("pair")), 1);
        assert_eq!(registry.member_count(&sid("other")), 1);
        assert!(!registry.sessions.values().any(HashSet::is_empty));
    }

    #[test]
    fn leave_all_for_unknown_connection_is_noop() {
        let mut registry = SessionRegistry::new();
        registry.join(&sid("a"), ConnectionId::new());

        assert!(registry.leave_all(&ConnectionId::new()).is_empty());
        assert_eq!(registry.session_count(), 1);
    }
}
