//! Deferred actions, run a fixed number of host ticks in the future
//!
//! Actions are plain values; the owner decides what they mean when they
//! come due. Once scheduled an action always fires, unless the whole queue
//! is dropped or cleared with its owner.

/// Queue of actions keyed by the tick they become due.
#[derive(Debug, Clone)]
pub struct Scheduler<A> {
    tick: u64,
    queue: Vec<(u64, A)>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self {
            tick: 0,
            queue: Vec::new(),
        }
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` `delay_ticks` ticks from now. A delay of zero fires on
    /// the next [`advance`](Self::advance).
    pub fn schedule(&mut self, delay_ticks: u64, action: A) {
        let due = self.tick + delay_ticks.max(1);
        self.queue.push((due, action));
    }

    /// Move to the next tick and take every action now due, in the order
    /// they were scheduled.
    pub fn advance(&mut self) -> Vec<A> {
        self.tick += 1;
        let now = self.tick;
        let (due, pending): (Vec<_>, Vec<_>) =
            self.queue.drain(..).partition(|(at, _)| *at <= now);
        self.queue = pending;
        due.into_iter().map(|(_, action)| action).collect()
    }

    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop everything still pending
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_on_exact_tick() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(2, "clear");

        assert!(scheduler.advance().is_empty());
        assert_eq!(scheduler.advance(), vec!["clear"]);
        assert!(scheduler.advance().is_empty());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_keeps_schedule_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(3, 1);
        scheduler.schedule(1, 2);
        scheduler.schedule(3, 3);

        assert_eq!(scheduler.advance(), vec![2]);
        assert!(scheduler.advance().is_empty());
        assert_eq!(scheduler.advance(), vec![1, 3]);
    }

    #[test]
    fn test_zero_delay_waits_one_tick() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0, ());
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.advance().len(), 1);
    }

    #[test]
    fn test_delay_is_relative_to_current_tick() {
        let mut scheduler = Scheduler::new();
        scheduler.advance();
        scheduler.advance();
        scheduler.schedule(2, 'a');
        assert!(scheduler.advance().is_empty());
        assert_eq!(scheduler.advance(), vec!['a']);
        assert_eq!(scheduler.tick(), 4);
    }

    #[test]
    fn test_clear() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1, 0);
        scheduler.clear();
        assert!(scheduler.advance().is_empty());
    }
}
