/// Issue order of a remote request; later requests compare greater
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Latest-wins guard for responses that may arrive out of order.
///
/// Only the most recently issued request may be applied, and only once.
/// A superseded request is dropped whenever it completes.
#[derive(Debug, Default)]
pub struct RequestTracker {
    issued: u64,
    applied: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket(self.issued)
    }

    /// Record `ticket` as applied if it is still the latest; returns whether to apply
    pub fn try_apply(&mut self, ticket: RequestTicket) -> bool {
        if self.is_latest(ticket) && ticket.0 > self.applied {
            self.applied = ticket.0;
            true
        } else {
            false
        }
    }

    /// Whether `ticket` is the most recently issued request
    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Make every request issued so far stale
    pub fn cancel_outstanding(&mut self) {
        self.applied = self.issued;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_order_completions_apply() {
        let mut tracker = RequestTracker::new();
        let first = tracker.begin();
        assert!(tracker.try_apply(first));
        let second = tracker.begin();
        assert!(tracker.try_apply(second));
    }

    #[test]
    fn test_stale_completion_is_dropped() {
        let mut tracker = RequestTracker::new();
        let older = tracker.begin();
        let newer = tracker.begin();
        assert!(!tracker.is_latest(older));

        assert!(tracker.try_apply(newer));
        assert!(!tracker.try_apply(older));
    }

    #[test]
    fn test_superseded_rejected_before_newer_arrives() {
        let mut tracker = RequestTracker::new();
        let older = tracker.begin();
        let newer = tracker.begin();
        assert!(!tracker.try_apply(older));
        assert!(tracker.try_apply(newer));
        assert!(!tracker.try_apply(newer));
    }

    #[test]
    fn test_cancel_outstanding() {
        let mut tracker = RequestTracker::new();
        let pending = tracker.begin();
        tracker.cancel_outstanding();
        assert!(!tracker.try_apply(pending));

        let next = tracker.begin();
        assert!(tracker.is_latest(next));
        assert!(tracker.try_apply(next));
    }

    #[test]
    fn test_foreign_ticket_rejected() {
        let mut tracker = RequestTracker::new();
        tracker.begin();
        assert!(!tracker.try_apply(RequestTicket(5)));
    }
}
