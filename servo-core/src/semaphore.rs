//! Counting wakeup from interrupt context.
//!
//! The radio stack raises an interrupt once per pending event batch. The
//! handler cannot touch the stack itself, so it calls [`CountingSignal::give`]
//! and the radio task later performs exactly one processing pass per give.
//! A plain [`Signal`] would coalesce back-to-back gives into one wakeup.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicU32, Ordering};

pub struct CountingSignal<M: RawMutex> {
    count: AtomicU32,
    signal: Signal<M, ()>,
}

impl<M: RawMutex> CountingSignal<M> {
    pub const fn new() -> Self {
        Self {
            count: AtomicU32::new(0),
            signal: Signal::new(),
        }
    }

    /// Record one pending unit of work. Safe from interrupt context.
    pub fn give(&self) {
        self.count.fetch_add(1, Ordering::AcqRel);
        self.signal.signal(());
    }

    /// Consume one unit if any is pending.
    pub fn try_take(&self) -> bool {
        self.count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }

    /// Wait for and consume one unit.
    pub async fn take(&self) {
        loop {
            if self.try_take() {
                return;
            }
            self.signal.wait().await;
        }
    }

    pub fn pending(&self) -> u32 {
        self.count.load(Ordering::Acquire)
    }
}

impl<M: RawMutex> Default for CountingSignal<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{block_on, poll_once};
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

    #[test]
    fn test_each_give_wakes_once() {
        let sem: CountingSignal<CriticalSectionRawMutex> = CountingSignal::new();
        sem.give();
        sem.give();
        sem.give();
        assert_eq!(sem.pending(), 3);
        block_on(sem.take());
        block_on(sem.take());
        block_on(sem.take());
        assert_eq!(sem.pending(), 0);
        assert!(poll_once(sem.take()).is_pending());
    }

    #[test]
    fn test_try_take_empty() {
        let sem: CountingSignal<CriticalSectionRawMutex> = CountingSignal::new();
        assert!(!sem.try_take());
        sem.give();
        assert!(sem.try_take());
        assert!(!sem.try_take());
    }
}
