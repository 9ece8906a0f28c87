// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Completion futures and callbacks.
//!
//! Every instruction hands out a [`TweenCompletion`]. It settles with the
//! tween's final value when the interpolation finishes, or with
//! [`Cancelled`] when the tween is stopped, jumped with `set`, or dropped
//! first. A superseding instruction does not settle anything: the pending
//! completions carry over and settle with the new target.
//!
//! Completions never settle inside the call that created them. Settlement
//! happens while the owning scheduler ticks, after the tween's own state has
//! been updated, so a callback may freely instruct the same tween again.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, Waker};

use crate::error::Cancelled;

pub(crate) enum Slot<T> {
    Pending(Option<Waker>),
    Ready(Result<T, Cancelled>),
    Taken,
}

/// A future resolving when a tween instruction finishes.
///
/// The output is `Ok(value)` with the tween's value at completion, or
/// `Err(Cancelled)` if the tween stopped first.
#[must_use = "dropping a completion does not cancel the tween"]
pub struct TweenCompletion<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

impl<T> TweenCompletion<T> {
    fn pending() -> (Self, Resolver<T>) {
        let slot = Rc::new(RefCell::new(Slot::Pending(None)));
        (
            Self {
                slot: Rc::clone(&slot),
            },
            Resolver::Future(slot),
        )
    }

    /// Returns whether the completion has settled (and not yet been taken).
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(*self.slot.borrow(), Slot::Ready(_))
    }

    /// Takes the outcome if the completion has settled.
    pub fn try_take(&mut self) -> Option<Result<T, Cancelled>> {
        let mut slot = self.slot.borrow_mut();
        match core::mem::replace(&mut *slot, Slot::Taken) {
            Slot::Ready(outcome) => Some(outcome),
            other => {
                *slot = other;
                None
            }
        }
    }
}

impl<T> fmt::Debug for TweenCompletion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match *self.slot.borrow() {
            Slot::Pending(_) => "pending",
            Slot::Ready(_) => "ready",
            Slot::Taken => "taken",
        };
        f.debug_struct("TweenCompletion")
            .field("state", &state)
            .finish()
    }
}

impl<T> Future for TweenCompletion<T> {
    type Output = Result<T, Cancelled>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut slot = self.slot.borrow_mut();
        match core::mem::replace(&mut *slot, Slot::Taken) {
            Slot::Ready(outcome) => Poll::Ready(outcome),
            Slot::Pending(_) => {
                *slot = Slot::Pending(Some(cx.waker().clone()));
                Poll::Pending
            }
            Slot::Taken => panic!("TweenCompletion polled after it returned Ready"),
        }
    }
}

/// One party waiting on an instruction.
pub(crate) enum Resolver<T> {
    Future(Rc<RefCell<Slot<T>>>),
    Callback(Box<dyn FnOnce(Result<T, Cancelled>)>),
}

impl<T> Resolver<T> {
    /// Creates a future and the resolver that settles it.
    pub(crate) fn future() -> (TweenCompletion<T>, Self) {
        TweenCompletion::pending()
    }

    pub(crate) fn callback(f: impl FnOnce(Result<T, Cancelled>) + 'static) -> Self {
        Self::Callback(Box::new(f))
    }

    pub(crate) fn settle(self, outcome: Result<T, Cancelled>) {
        match self {
            Self::Future(slot) => {
                let waker = {
                    let mut slot = slot.borrow_mut();
                    match core::mem::replace(&mut *slot, Slot::Ready(outcome)) {
                        Slot::Pending(waker) => waker,
                        // Settling twice keeps the first outcome.
                        prev @ (Slot::Ready(_) | Slot::Taken) => {
                            *slot = prev;
                            None
                        }
                    }
                };
                if let Some(waker) = waker {
                    waker.wake();
                }
            }
            Self::Callback(f) => f(outcome),
        }
    }
}

impl<T> fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Future(_) => f.write_str("Resolver::Future"),
            Self::Callback(_) => f.write_str("Resolver::Callback"),
        }
    }
}
