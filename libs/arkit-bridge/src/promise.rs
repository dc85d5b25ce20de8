// Copyright (c) 2026 ARKit Bridge contributors
// SPDX-License-Identifier: MIT

//! One-shot promises resolved by external callbacks.
//!
//! [`Promise`] is the consumer half: a poll-predicate future intended for a
//! cooperative loop that re-checks [`Promise::keep_waiting`] once per tick.
//! [`PromiseResolver`] is the producer half handed to whatever fires the
//! completion — resolving consumes the resolver, so a second resolution of the
//! same promise is unrepresentable rather than merely checked.
//!
//! Dropping a promise abandons it: the eventual resolution is discarded, but
//! the resolver side still completes normally, which is what keeps the global
//! pending-slot bookkeeping correct for abandoned native requests.

use std::sync::Arc;

use parking_lot::Mutex;

struct Shared<T> {
    value: Mutex<Option<T>>,
}

/// The consumer half of a one-shot asynchronous result.
pub struct Promise<T> {
    shared: Arc<Shared<T>>,
    /// Settled value, moved out of the shared cell on first observation so
    /// repeated reads return one immutable value.
    settled: Option<T>,
}

/// The producer half. Held by the completion path; resolving consumes it.
pub(crate) struct PromiseResolver<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Promise<T> {
    /// Creates an unresolved promise and the resolver that will settle it.
    pub(crate) fn new() -> (Self, PromiseResolver<T>) {
        let shared = Arc::new(Shared {
            value: Mutex::new(None),
        });
        (
            Self {
                shared: Arc::clone(&shared),
                settled: None,
            },
            PromiseResolver { shared },
        )
    }

    /// Creates a promise that is already resolved with `value`.
    pub(crate) fn resolved(value: T) -> Self {
        let (promise, resolver) = Self::new();
        resolver.resolve(value);
        promise
    }

    /// `true` while no result has arrived. Poll this once per tick; it never
    /// blocks. Once it returns `false` it returns `false` forever.
    pub fn keep_waiting(&self) -> bool {
        self.settled.is_none() && self.shared.value.lock().is_none()
    }

    /// The settled result, or `None` while still waiting. After the first
    /// `Some`, every later call returns the same value.
    pub fn result(&mut self) -> Option<&T> {
        if self.settled.is_none() {
            self.settled = self.shared.value.lock().take();
        }
        self.settled.as_ref()
    }

    /// Consumes the promise, yielding the result if it has arrived.
    pub fn into_result(mut self) -> Option<T> {
        self.result();
        self.settled
    }
}

impl<T> PromiseResolver<T> {
    /// Settles the promise. The resolver is consumed; the state machine has
    /// no path back to pending.
    pub(crate) fn resolve(self, value: T) {
        *self.shared.value.lock() = Some(value);
    }
}

/// Single-slot registry for the one resolver allowed to be outstanding per
/// promise type. The native boundary can only invoke a fixed function
/// pointer, so the completion path finds its target here rather than in a
/// captured closure; the slot existing at all is what enforces the
/// one-outstanding-request contract structurally.
pub(crate) struct PendingSlot<T> {
    slot: Mutex<Option<T>>,
}

impl<T> PendingSlot<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Installs `value` if the slot is empty; hands it back if a value is
    /// already pending. Install-or-reject is one critical section, so a
    /// resolve-then-clear cannot race a concurrent install.
    pub(crate) fn try_install(&self, value: T) -> Result<(), T> {
        let mut slot = self.slot.lock();
        match *slot {
            Some(_) => Err(value),
            None => {
                *slot = Some(value);
                Ok(())
            }
        }
    }

    /// Clears the slot, returning the pending value if any.
    pub(crate) fn take(&self) -> Option<T> {
        self.slot.lock().take()
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.slot.lock().is_some()
    }
}
