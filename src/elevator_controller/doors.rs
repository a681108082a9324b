use std::time::Duration;

/// Door state plus its single dwell deadline.
///
/// Opening or extending always replaces the deadline, so at most one
/// auto-close is ever pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Door {
    open: bool,
    dwell: Duration,
    close_at: Option<Duration>,
}

impl Door {
    pub fn new(dwell: Duration) -> Self {
        Self {
            open: false,
            dwell,
            close_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close_at(&self) -> Option<Duration> {
        self.close_at
    }

    /// Returns false if the door was already open. Either way the dwell restarts.
    pub fn open(&mut self, now: Duration) -> bool {
        let was_closed = !self.open;
        self.open = true;
        self.close_at = Some(now + self.dwell);
        was_closed
    }

    /// Restarts the dwell of an open door. No effect on a closed one.
    pub fn extend(&mut self, now: Duration) {
        if self.open {
            self.close_at = Some(now + self.dwell);
        }
    }

    /// Returns false if the door was already closed.
    pub fn close(&mut self) -> bool {
        self.close_at = None;
        std::mem::replace(&mut self.open, false)
    }

    pub fn is_due(&self, now: Duration) -> bool {
        matches!(self.close_at, Some(deadline) if deadline <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DWELL: Duration = Duration::from_secs(3);

    #[test]
    fn opening_sets_a_single_deadline() {
        let mut door = Door::new(DWELL);
        assert!(door.open(Duration::from_secs(10)));
        assert_eq!(door.close_at(), Some(Duration::from_secs(13)));
        assert!(!door.is_due(Duration::from_secs(12)));
        assert!(door.is_due(Duration::from_secs(13)));
    }

    #[test]
    fn reopening_replaces_the_deadline() {
        let mut door = Door::new(DWELL);
        door.open(Duration::ZERO);
        assert!(!door.open(Duration::from_secs(1)));
        assert_eq!(door.close_at(), Some(Duration::from_secs(4)));
    }

    #[test]
    fn extend_does_not_open_a_closed_door() {
        let mut door = Door::new(DWELL);
        door.extend(Duration::from_secs(5));
        assert!(!door.is_open());
        assert_eq!(door.close_at(), None);
    }

    #[test]
    fn close_cancels_the_deadline() {
        let mut door = Door::new(DWELL);
        door.open(Duration::ZERO);
        assert!(door.close());
        assert!(!door.close());
        assert!(!door.is_due(Duration::from_secs(100)));
    }
}
