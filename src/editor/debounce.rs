/// Holds the latest value of a field until it has been quiet for `delay_ms`.
///
/// Queuing a new value replaces the pending one and restarts the wait, so only
/// the final value of a burst is ever released.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay_ms: u64,
    pending: Option<(T, u64)>,
}

impl<T> Debouncer<T> {
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub const fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn queue(&mut self, value: T, now_ms: u64) {
        self.pending = Some((value, now_ms));
    }

    /// Release the pending value once its delay has elapsed.
    pub fn take_ready(&mut self, now_ms: u64) -> Option<T> {
        let (_, queued_at) = self.pending.as_ref()?;
        if now_ms.saturating_sub(*queued_at) >= self.delay_ms {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes ready.
    pub fn deadline(&self) -> Option<u64> {
        self.pending
            .as_ref()
            .map(|(_, queued_at)| queued_at.saturating_add(self.delay_ms))
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_waits_for_delay() {
        let mut debouncer = Debouncer::new(100);
        debouncer.queue("a", 0);
        assert!(debouncer.take_ready(99).is_none());
        assert_eq!(debouncer.take_ready(100), Some("a"));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_requeue_restarts_the_wait() {
        let mut debouncer = Debouncer::new(100);
        debouncer.queue(1, 0);
        debouncer.queue(2, 80);
        assert!(debouncer.take_ready(120).is_none());
        assert_eq!(debouncer.deadline(), Some(180));
        assert_eq!(debouncer.take_ready(180), Some(2));
    }

    #[test]
    fn test_cancel_drops_pending_value() {
        let mut debouncer = Debouncer::new(100);
        debouncer.queue(1, 0);
        debouncer.cancel();
        assert!(debouncer.take_ready(1_000).is_none());
        assert!(debouncer.deadline().is_none());
    }
}
