use std::{
    sync::atomic::{AtomicUsize, Ordering},
    thread::{self, ThreadId},
};

use crossbeam::utils::Backoff;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::utils::error::{TraphError, TraphResult};

const STATE_UNEVALUATED: usize = 0; // No value and nobody is computing it
const STATE_EVALUATING: usize = 1; // A rule is running (see `owner` for the thread)
const STATE_EVALUATED: usize = 2; // Value is stored and never changes again

/// Memoization cell for a single derived field.
///
/// The cell walks through `Unevaluated -> Evaluating -> Evaluated`. The first reader wins the
/// transition to `Evaluating` and runs the computation; concurrent readers on other threads
/// wait for the result, so the computation runs at most once. A reader on the *same* thread
/// that finds the cell `Evaluating` is re-entering its own computation and gets
/// [`TraphError::CyclicDependency`] instead of deadlocking.
///
/// A failed computation puts the cell back to `Unevaluated`: nothing is cached and a later
/// read runs the computation again.
pub struct MemoSlot<T> {
    value: OnceCell<T>,
    state: AtomicUsize,
    owner: Mutex<Option<ThreadId>>,
}

impl<T> MemoSlot<T> {
    pub fn new() -> Self {
        Self {
            value: OnceCell::new(),
            state: AtomicUsize::new(STATE_UNEVALUATED),
            owner: Mutex::new(None),
        }
    }

    /// Cached value, if the field was already evaluated. Never triggers a computation.
    pub fn peek(&self) -> Option<&T> {
        self.value.get()
    }

    /// Same signal as [`MemoSlot::peek`]: true as soon as the value is published.
    pub fn is_evaluated(&self) -> bool {
        self.value.get().is_some()
    }

    /// Returns the cached value, running `compute` first if the cell is still unevaluated.
    ///
    /// `field` is only used to name the field in a cycle error.
    pub fn get_or_evaluate(
        &self,
        field: &str,
        compute: impl FnOnce() -> TraphResult<T>,
    ) -> TraphResult<&T> {
        let backoff = Backoff::new();

        loop {
            if let Some(value) = self.value.get() {
                return Ok(value);
            }

            match self.state.compare_exchange(
                STATE_UNEVALUATED,
                STATE_EVALUATING,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(STATE_EVALUATING) => {
                    let current = thread::current().id();
                    if *self.owner.lock() == Some(current) {
                        return Err(TraphError::CyclicDependency {
                            field: field.to_string(),
                        });
                    }

                    // Another thread is computing, wait for it
                    backoff.snooze();
                }
                Err(_) => {
                    // Evaluated in the meantime, the value is published before the state
                    backoff.spin();
                }
            }
        }

        // We own the `Evaluating` state from here on.
        let mut evaluation = Evaluation {
            state: &self.state,
            owner: &self.owner,
            done: false,
        };
        *self.owner.lock() = Some(thread::current().id());

        let value = compute()?;
        let stored = self.value.get_or_init(|| value);
        self.state.store(STATE_EVALUATED, Ordering::Release);
        evaluation.done = true;

        Ok(stored)
    }
}

impl<T> Default for MemoSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Releases the `Evaluating` state, whichever way the computation ended (value, error, panic).
struct Evaluation<'a> {
    state: &'a AtomicUsize,
    owner: &'a Mutex<Option<ThreadId>>,
    done: bool,
}

impl<'a> Drop for Evaluation<'a> {
    fn drop(&mut self) {
        *self.owner.lock() = None;
        if !self.done {
            self.state.store(STATE_UNEVALUATED, Ordering::Release);
        }
    }
}
