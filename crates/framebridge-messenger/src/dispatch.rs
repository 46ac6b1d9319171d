use crate::error::OriginMismatch;

/// Why a structurally unusable message was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discard {
    /// Not an object with a string `kind`, failed its kind's schema, or did
    /// not decode into the message type.
    Malformed(String),
    /// Well formed, but no handler is registered for this kind.
    Unrouted(String),
}

/// Outcome of [`handle_event`](crate::Messenger::handle_event) for a
/// message that did not fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Delivered { kind: String },
    Discarded(Discard),
}

/// What the channel listener did with one inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receipt {
    /// No session is open.
    NoSession,
    /// Belonged to a session that has since been closed or replaced.
    Stale,
    /// Sent by the host document to itself.
    SelfOrigin,
    /// Origin check failed; the session was closed and the error reported.
    Rejected(OriginMismatch),
    /// Passed the origin check and was handed to `handle_event`.
    Dispatched(Dispatch),
    /// The handler for `kind` failed; the session was closed and the error
    /// reported.
    Faulted { kind: String },
}

impl Receipt {
    pub fn label(&self) -> &'static str {
        match self {
            Receipt::NoSession => "no-session",
            Receipt::Stale => "stale",
            Receipt::SelfOrigin => "self-origin",
            Receipt::Rejected(_) => "rejected",
            Receipt::Dispatched(Dispatch::Delivered { .. }) => "delivered",
            Receipt::Dispatched(Dispatch::Discarded(Discard::Malformed(_))) => "malformed",
            Receipt::Dispatched(Dispatch::Discarded(Discard::Unrouted(_))) => "unrouted",
            Receipt::Faulted { .. } => "faulted",
        }
    }

    /// True when the session was torn down while handling this event.
    pub fn closed_session(&self) -> bool {
        matches!(self, Receipt::Rejected(_) | Receipt::Faulted { .. })
    }
}
