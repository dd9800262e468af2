//! Atomic latch that lets a callback run at most once.

use std::sync::atomic::{AtomicU8, Ordering};

const NOT_FIRED: u8 = 0;
const FIRING: u8 = 1;
const FIRED: u8 = 2;

/// Once-guard bound to a single hook.
///
/// The first `fire_once` call claims the latch with a compare-and-set and runs the callback;
/// every later call, including one made re-entrantly from inside the callback, is a no-op.
#[derive(Debug, Default)]
pub struct OnceGuard {
    state: AtomicU8,
}

impl OnceGuard {
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(NOT_FIRED),
        }
    }

    /// Run `f` if this is the first call. Returns whether `f` ran.
    pub fn fire_once<F: FnOnce()>(&self, f: F) -> bool {
        if self
            .state
            .compare_exchange(NOT_FIRED, FIRING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        // Latch closes even if `f` unwinds.
        let _done = MarkFired(&self.state);
        f();
        true
    }

    /// True once the latch has been claimed. The in-progress state is reported as fired.
    pub fn has_fired(&self) -> bool {
        self.state.load(Ordering::Acquire) != NOT_FIRED
    }
}

struct MarkFired<'a>(&'a AtomicU8);

impl Drop for MarkFired<'_> {
    fn drop(&mut self) {
        self.0.store(FIRED, Ordering::Release);
    }
}
