//! Last-sequence-wins display cell.
//!
//! A [`Latest`] pairs a displayed value with the sequence number of the most
//! recently issued operation. Issuing bumps the sequence; a result only lands
//! if it carries the sequence that is still current. Both steps run inside the
//! watch channel's own critical section, so an issue can never interleave
//! between a resolver's check and its write.

use std::sync::Arc;

use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequenced<T> {
    pub sequence: u64,
    pub value: T,
}

pub struct Latest<T> {
    tx: Arc<watch::Sender<Sequenced<T>>>,
}

impl<T> Clone for Latest<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T> Latest<T> {
    pub fn new(value: T) -> Self {
        let (tx, _rx) = watch::channel(Sequenced { sequence: 0, value });
        Self { tx: Arc::new(tx) }
    }

    /// Starts a new operation and returns its sequence. `update` runs against
    /// the displayed value in the same step, which is how synchronous clears
    /// are expressed.
    pub fn issue(&self, update: impl FnOnce(&mut T)) -> u64 {
        let mut issued = 0;
        self.tx.send_modify(|slot| {
            slot.sequence += 1;
            issued = slot.sequence;
            update(&mut slot.value);
        });
        issued
    }

    /// Applies `update` only if `sequence` is still the latest issued one.
    /// Returns whether the result landed.
    pub fn resolve(&self, sequence: u64, update: impl FnOnce(&mut T)) -> bool {
        self.tx.send_if_modified(|slot| {
            if slot.sequence != sequence {
                return false;
            }
            update(&mut slot.value);
            true
        })
    }

    pub fn sequence(&self) -> u64 {
        self.tx.borrow().sequence
    }

    pub fn is_current(&self, sequence: u64) -> bool {
        self.sequence() == sequence
    }

    pub fn inspect<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        read(&self.tx.borrow().value)
    }

    pub fn subscribe(&self) -> watch::Receiver<Sequenced<T>> {
        self.tx.subscribe()
    }
}

impl<T: Clone> Latest<T> {
    pub fn snapshot(&self) -> T {
        self.tx.borrow().value.clone()
    }
}

impl<T: Default> Default for Latest<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_resolution_is_discarded() {
        let cell = Latest::new(None::<&str>);
        let first = cell.issue(|_| {});
        let second = cell.issue(|_| {});
        assert!(first < second);

        assert!(cell.resolve(second, |v| *v = Some("second")));
        assert!(!cell.resolve(first, |v| *v = Some("first")));
        assert_eq!(cell.snapshot(), Some("second"));
    }

    #[test]
    fn issue_update_applies_immediately() {
        let cell = Latest::new(5u32);
        let sequence = cell.issue(|v| *v = 0);
        assert_eq!(sequence, 1);
        assert_eq!(cell.snapshot(), 0);
        assert!(cell.is_current(sequence));
    }

    #[tokio::test]
    async fn subscribers_only_see_landed_results() {
        let cell = Latest::new(0u32);
        let mut rx = cell.subscribe();
        let stale = cell.issue(|_| {});
        let current = cell.issue(|_| {});
        rx.borrow_and_update();

        assert!(!cell.resolve(stale, |v| *v = 1));
        assert!(!rx.has_changed().expect("sender alive"));

        assert!(cell.resolve(current, |v| *v = 2));
        rx.changed().await.expect("sender alive");
        assert_eq!(rx.borrow().value, 2);
    }
}
