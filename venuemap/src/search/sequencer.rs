//! Last-request-wins bookkeeping.

use std::fmt;

/// Monotonic id attached to an issued search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out tickets and decides which response may be applied.
///
/// Only the most recently issued ticket is current. A response is accepted
/// at most once; anything older is superseded.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: u64,
    accepted: Option<u64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next ticket, superseding every earlier one.
    pub fn begin(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket(self.issued)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.issued && self.accepted != Some(ticket.0)
    }

    /// Marks the ticket's response as applied if it is still current.
    pub fn accept(&mut self, ticket: RequestTicket) -> bool {
        if self.is_current(ticket) {
            self.accepted = Some(ticket.0);
            true
        } else {
            false
        }
    }

    /// Whether the latest ticket is still waiting for its response.
    pub fn in_flight(&self) -> bool {
        self.issued > 0 && self.accepted != Some(self.issued)
    }

    /// Marks the latest ticket as settled without applying anything
    /// (used when it failed).
    pub fn settle(&mut self, ticket: RequestTicket) {
        if ticket.0 == self.issued {
            self.accepted = Some(ticket.0);
        }
    }
}
