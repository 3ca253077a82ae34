//! Single-fire wait/notify primitives
//!
//! Every blocking operation in this crate (the engine init handshake, raw
//! audio synthesis, modal prompts) parks the calling thread on one of these
//! until a platform callback releases it. Both primitives fire at most once;
//! late or duplicate signals are ignored, so a callback that arrives after a
//! timeout has nothing left to corrupt.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Lock a mutex, recovering the guard if a panicking thread poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Single-count countdown latch
///
/// The blocking side calls [`Latch::wait_timeout`]; the callback side calls
/// [`Latch::fire`] exactly once (extra fires are no-ops). One latch serves
/// one request; a fresh request gets a fresh latch.
pub struct Latch {
    fired: Mutex<bool>,
    cv: Condvar,
}

impl Latch {
    pub fn new() -> Self {
        Self {
            fired: Mutex::new(false),
            cv: Condvar::new(),
        }
    }

    /// Release any waiter. Idempotent.
    pub fn fire(&self) {
        let mut fired = lock(&self.fired);
        *fired = true;
        self.cv.notify_all();
    }

    pub fn is_fired(&self) -> bool {
        *lock(&self.fired)
    }

    /// Block until fired or the timeout elapses.
    ///
    /// Returns true if the latch fired within the bound.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut fired = lock(&self.fired);
        while !*fired {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = self
                .cv
                .wait_timeout(fired, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            fired = guard;
        }
        true
    }
}

impl Default for Latch {
    fn default() -> Self {
        Self::new()
    }
}

struct Slot<T> {
    value: Option<T>,
    done: bool,
}

/// One-shot value slot
///
/// The waiting side blocks on [`Completion::wait`] (or the bounded variant);
/// the resolving side holds a [`Completer`] and resolves exactly once. The
/// first resolution wins; everything after it is ignored.
pub struct Completion<T> {
    slot: Mutex<Slot<T>>,
    cv: Condvar,
}

impl<T> Completion<T> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            slot: Mutex::new(Slot {
                value: None,
                done: false,
            }),
            cv: Condvar::new(),
        })
    }

    /// Resolve with a value. Returns false if already resolved.
    fn complete(&self, value: T) -> bool {
        let mut slot = lock(&self.slot);
        if slot.done {
            return false;
        }
        slot.value = Some(value);
        slot.done = true;
        self.cv.notify_all();
        true
    }

    /// Resolve with no value (cancellation). Returns false if already resolved.
    fn cancel(&self) -> bool {
        let mut slot = lock(&self.slot);
        if slot.done {
            return false;
        }
        slot.done = true;
        self.cv.notify_all();
        true
    }

    pub fn is_done(&self) -> bool {
        lock(&self.slot).done
    }

    /// Block until resolved; None means cancelled.
    pub fn wait(&self) -> Option<T> {
        let mut slot = lock(&self.slot);
        while !slot.done {
            slot = self
                .cv
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
        slot.value.take()
    }

    /// Block until resolved or the timeout elapses; None means cancelled or
    /// timed out.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut slot = lock(&self.slot);
        while !slot.done {
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            let (guard, _) = self
                .cv
                .wait_timeout(slot, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            slot = guard;
        }
        slot.value.take()
    }
}

/// Resolving handle for a [`Completion`]
///
/// Dropping an unresolved completer cancels the completion, so a host that
/// tears down without answering still releases the blocked caller.
pub struct Completer<T> {
    completion: Arc<Completion<T>>,
    resolved: bool,
}

impl<T> Completer<T> {
    pub fn new(completion: Arc<Completion<T>>) -> Self {
        Self {
            completion,
            resolved: false,
        }
    }

    /// Resolve the waiter with a value. Consumes the completer.
    pub fn complete(mut self, value: T) {
        self.resolved = true;
        self.completion.complete(value);
    }

    /// Resolve the waiter with a cancellation. Consumes the completer.
    pub fn cancel(mut self) {
        self.resolved = true;
        self.completion.cancel();
    }
}

impl<T> Drop for Completer<T> {
    fn drop(&mut self) {
        if !self.resolved {
            self.completion.cancel();
        }
    }
}
