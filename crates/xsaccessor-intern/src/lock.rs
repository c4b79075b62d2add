//! Global lock shared by both registries
//!
//! A binary semaphore built from a mutex-protected hold flag and a condition
//! variable. The mutex is only held long enough to flip the flag; the
//! protected data lives beside it and is reachable solely through a
//! [`GlobalLockGuard`].
//!
//! The lock is not reentrant: acquiring it again on a thread that already
//! holds it blocks forever.

use std::cell::UnsafeCell;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::{Condvar, Mutex, PoisonError};

/// Single-holder critical section guarding `T`.
pub struct GlobalLock<T> {
    held: Mutex<bool>,
    released: Condvar,
    data: UnsafeCell<T>,
}

// SAFETY: `data` is only reachable through a guard, and at most one guard
// exists at a time because `held` is flipped under `Mutex`.
unsafe impl<T: Send> Sync for GlobalLock<T> {}

impl<T> GlobalLock<T> {
    /// Create an unheld lock around `data`.
    pub fn new(data: T) -> Self {
        Self {
            held: Mutex::new(false),
            released: Condvar::new(),
            data: UnsafeCell::new(data),
        }
    }

    /// Block until the calling thread is the sole holder.
    ///
    /// There is no timeout. Spurious wakeups re-check the hold flag.
    pub fn acquire(&self) -> GlobalLockGuard<'_, T> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        while *held {
            held = self
                .released
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *held = true;
        drop(held);

        GlobalLockGuard {
            lock: self,
            _marker: PhantomData,
        }
    }

    /// Take the lock only if nobody holds it.
    pub fn try_acquire(&self) -> Option<GlobalLockGuard<'_, T>> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        if *held {
            return None;
        }
        *held = true;
        drop(held);

        Some(GlobalLockGuard {
            lock: self,
            _marker: PhantomData,
        })
    }

    /// Whether some guard currently holds the lock.
    pub fn is_held(&self) -> bool {
        *self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }

    fn release(&self) {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        *held = false;
        self.released.notify_one();
    }
}

impl<T: Default> Default for GlobalLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> std::fmt::Debug for GlobalLock<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalLock")
            .field("held", &self.is_held())
            .finish_non_exhaustive()
    }
}

/// Proof of holding a [`GlobalLock`]. Releases the lock on drop.
pub struct GlobalLockGuard<'a, T> {
    lock: &'a GlobalLock<T>,
    // Sync only when `T` is, like `&mut T`.
    _marker: PhantomData<&'a mut T>,
}

impl<T> Deref for GlobalLockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: this guard is the only holder.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> DerefMut for GlobalLockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: this guard is the only holder.
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for GlobalLockGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_guard_releases_on_drop() {
        let lock = GlobalLock::new(0u32);
        {
            let mut guard = lock.acquire();
            *guard += 1;
            assert!(lock.is_held());
        }
        assert!(!lock.is_held());
        assert_eq!(*lock.acquire(), 1);
    }

    #[test]
    fn test_try_acquire_fails_while_held() {
        let lock = GlobalLock::new(());
        let guard = lock.acquire();
        assert!(lock.try_acquire().is_none());
        drop(guard);
        assert!(lock.try_acquire().is_some());
    }

    #[test]
    fn test_waiter_wakes_after_release() {
        let lock = Arc::new(GlobalLock::new(Vec::<u32>::new()));
        let entered = Arc::new(AtomicBool::new(false));

        let guard = lock.acquire();
        let waiter = {
            let lock = Arc::clone(&lock);
            let entered = Arc::clone(&entered);
            thread::spawn(move || {
                let mut data = lock.acquire();
                entered.store(true, Ordering::SeqCst);
                data.push(2);
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!entered.load(Ordering::SeqCst));
        drop(guard);

        waiter.join().unwrap();
        assert!(entered.load(Ordering::SeqCst));
        assert_eq!(*lock.acquire(), vec![2]);
    }

    #[test]
    fn test_mutual_exclusion_under_contention() {
        let lock = GlobalLock::new((0u64, 0u64));
        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..1_000 {
                        let mut pair = lock.acquire();
                        // Lost updates would show up in the totals.
                        pair.0 += 1;
                        thread::yield_now();
                        pair.1 += 1;
                    }
                });
            }
        });
        let pair = lock.into_inner();
        assert_eq!(pair, (8_000, 8_000));
    }
}
