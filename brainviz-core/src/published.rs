//! Whole-value publication cell shared between a producer and its readers

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A value that one thread replaces wholesale and other threads read.
///
/// Readers get an `Arc` to the value that was current when they called
/// [`Published::load`]; they keep that exact value for as long as they hold
/// the `Arc`, no matter how many times the writer publishes in between.
/// The lock is only held for the pointer swap or the `Arc` clone, never
/// while a value is being built or read.
#[derive(Debug)]
pub struct Published<T> {
    current: RwLock<Arc<T>>,
    version: AtomicU64,
}

impl<T> Published<T> {
    pub fn new(initial: T) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
            version: AtomicU64::new(0),
        }
    }

    /// Replace the current value. Returns the new version number.
    pub fn publish(&self, value: T) -> u64 {
        self.publish_arc(Arc::new(value))
    }

    /// Replace the current value with an already shared one
    pub fn publish_arc(&self, value: Arc<T>) -> u64 {
        let mut guard = self.current.write();
        *guard = value;
        // Bumped under the write lock so version and value move together
        self.version.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// The current value
    pub fn load(&self) -> Arc<T> {
        Arc::clone(&self.current.read())
    }

    /// Number of publications so far
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }
}

impl<T: Default> Default for Published<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_load_keeps_old_value_after_publish() {
        let cell = Published::new(vec![1, 2, 3]);
        let before = cell.load();
        assert_eq!(cell.publish(vec![4, 5]), 1);

        assert_eq!(*before, vec![1, 2, 3]);
        assert_eq!(*cell.load(), vec![4, 5]);
        assert_eq!(cell.version(), 1);
    }

    #[test]
    fn test_readers_never_see_mixed_values() {
        let cell = Arc::new(Published::new(vec![0u64; 16]));
        let writer = {
            let cell = Arc::clone(&cell);
            thread::spawn(move || {
                for round in 1..=2_000u64 {
                    cell.publish(vec![round; 16]);
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let cell = Arc::clone(&cell);
                thread::spawn(move || {
                    for _ in 0..2_000 {
                        let value = cell.load();
                        assert_eq!(value.len(), 16);
                        assert!(value.iter().all(|v| *v == value[0]));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(cell.version(), 2_000);
    }
}
