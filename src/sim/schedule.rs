//! Frame tickets
//!
//! The driver asks for the next animation callback by holding a
//! [`FrameTicket`]. Only the most recently issued ticket is live; cancelling
//! or reissuing bumps the generation so a callback carrying an older ticket
//! becomes a no-op.

/// Handle for one scheduled tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameTicket(u64);

#[derive(Debug, Default, Clone)]
pub struct FrameSchedule {
    generation: u64,
    pending: Option<FrameTicket>,
}

impl FrameSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh ticket, invalidating any pending one
    pub fn request(&mut self) -> FrameTicket {
        self.generation += 1;
        let ticket = FrameTicket(self.generation);
        self.pending = Some(ticket);
        ticket
    }

    /// Drop the pending ticket, if any
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            self.generation += 1;
        }
    }

    pub fn pending(&self) -> Option<FrameTicket> {
        self.pending
    }

    /// Redeem `ticket`. True only for the live ticket, which is then spent.
    pub fn consume(&mut self, ticket: FrameTicket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}
