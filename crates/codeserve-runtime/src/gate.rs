//! Run-at-most-once gate.
//!
//! The first caller claims `NotStarted -> Running` and runs the closure. Every
//! other caller waits until the gate is `Done` and returns without running
//! anything. The gate never leaves `Done`, even if the closure failed or
//! panicked.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Lifecycle of a [`Gate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Nobody has claimed the gate yet.
    NotStarted,
    /// The claiming caller is running the guarded closure.
    Running,
    /// The guarded closure has finished.
    Done,
}

/// Runs a closure at most once, blocking concurrent callers until it finishes.
#[derive(Debug)]
pub struct Gate {
    state: Mutex<GateState>,
    done: Condvar,
}

impl Gate {
    /// Creates a gate in the `NotStarted` state.
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(GateState::NotStarted),
            done: Condvar::new(),
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> GateState {
        *self.lock()
    }

    /// Runs `f` if no caller has claimed the gate yet.
    ///
    /// Returns `true` for the caller that ran `f`. Callers arriving while `f`
    /// is running block until it finishes, then return `false`.
    pub fn run_once<F: FnOnce()>(&self, f: F) -> bool {
        {
            let mut state = self.lock();
            match *state {
                GateState::NotStarted => *state = GateState::Running,
                GateState::Running => {
                    let _done = self
                        .done
                        .wait_while(state, |s| *s != GateState::Done)
                        .unwrap_or_else(PoisonError::into_inner);
                    return false;
                }
                GateState::Done => return false,
            }
        }

        let _finish = Finish(self);
        f();
        true
    }

    // The lock is never held while user code runs, so poisoning carries no
    // broken invariant.
    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}

/// Marks the gate `Done` and wakes waiters, also during unwinding.
struct Finish<'a>(&'a Gate);

impl Drop for Finish<'_> {
    fn drop(&mut self) {
        *self.0.lock() = GateState::Done;
        self.0.done.notify_all();
    }
}
