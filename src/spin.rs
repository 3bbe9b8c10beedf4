//! Minimal test-and-set spinlock.
//!
//! Only one instance matters at startup: [`DUMMY_SPINLOCK`], which the
//! fallback memory barrier acquires and releases on platforms that lack a
//! native fence. It must be initialised before anything can issue such a
//! barrier, so the platform normaliser does it first thing.

use std::hint;
use std::sync::atomic::{AtomicBool, Ordering};

/// A spinlock guarding a very short critical section.
#[derive(Debug)]
pub struct SpinLock {
    locked: AtomicBool,
}

impl SpinLock {
    pub const fn new() -> Self {
        SpinLock { locked: AtomicBool::new(false) }
    }

    /// Reset to the unlocked state.
    pub fn init(&self) {
        self.locked.store(false, Ordering::Release);
    }

    /// One test-and-set attempt.
    pub fn try_acquire(&self) -> bool {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    /// Spin until the lock is ours.
    pub fn acquire(&self) {
        while !self.try_acquire() {
            while self.locked.load(Ordering::Relaxed) {
                hint::spin_loop();
            }
        }
    }

    pub fn release(&self) {
        self.locked.store(false, Ordering::Release);
    }

    pub fn is_held(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}

impl Default for SpinLock {
    fn default() -> Self {
        SpinLock::new()
    }
}

/// Spinlock used only to emulate a full memory barrier.
pub static DUMMY_SPINLOCK: SpinLock = SpinLock::new();

/// Full memory barrier built from [`DUMMY_SPINLOCK`].
///
/// The acquire/release pair on a shared lock orders every access before it
/// against every access after it.
pub fn fallback_memory_barrier() {
    DUMMY_SPINLOCK.acquire();
    DUMMY_SPINLOCK.release();
}
