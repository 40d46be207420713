//! Session relay domain.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                 RelayState                     │
//! │   apply(RelayEvent) -> Vec<Delivery>           │
//! │                                               │
//! │   ┌─────────────────┐   ┌──────────────────┐  │
//! │   │ SessionRegistry │   │ TerminationLedger │  │
//! │   │ s-1: {c1, c2}   │   │ { s-0, s-7 }      │  │
//! │   │ s-2: {c3}       │   │                   │  │
//! │   └─────────────────┘   └──────────────────┘  │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! The two structures partition every session id ever seen into active,
//! terminated, or never-seen (see [`SessionLifecycle`]).

mod dispatcher;
mod events;
mod ledger;
mod lifecycle;
mod registry;

pub use dispatcher::{RelayState, TERMINATED_SESSION_REASON};
pub use events::{Delivery, Notification, RelayEvent};
pub use ledger::TerminationLedger;
pub use lifecycle::SessionLifecycle;
pub use registry::{Departure, SessionRegistry};
