use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic request counter used to drop superseded responses.
///
/// Every fetch takes a ticket before it starts; when it resolves, only the
/// holder of the most recently issued ticket may apply its result.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_increase() {
        let seq = RequestSequence::new();
        let a = seq.issue();
        let b = seq.issue();
        assert!(b > a);
        assert_eq!(a.value(), 1);
    }

    #[test]
    fn test_only_latest_ticket_is_current() {
        let seq = RequestSequence::new();
        let a = seq.issue();
        assert!(seq.is_current(a));
        let b = seq.issue();
        assert!(!seq.is_current(a));
        assert!(seq.is_current(b));
    }
}
