#![forbid(unsafe_code)]

//! Shared, version-tracked values with change notification.
//!
//! An [`Observable<T>`] is a cheaply clonable handle to a single value. Every
//! clone sees the same value; writes through any clone notify every live
//! subscriber. This is the cell a UI layer renders from while a controller
//! (for example a confirm dialog) writes to it.
//!
//! # Invariants
//!
//! 1. The version increments exactly once per `set` that changes the value.
//! 2. Setting a value equal to the current one is a no-op: no version bump,
//!    no notifications.
//! 3. Subscribers are notified in registration order, after the new value is
//!    stored, with no internal borrow held.
//! 4. Dropping a [`Subscription`] removes its callback before the next
//!    notification cycle.
//!
//! # Failure Modes
//!
//! - Calling `set`/`update` from inside a `with` closure on the same
//!   observable panics (`RefCell` double borrow).
//! - Subscriber panic: propagates to the caller of `set`.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = dyn Fn(&T);

struct Inner<T> {
    value: T,
    version: u64,
    subscribers: Vec<Weak<Callback<T>>>,
}

/// A shared, version-tracked value wrapper.
///
/// Clones share state (`Rc`). Not `Send`; intended for a single UI thread.
pub struct Observable<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create a new observable holding `value` at version 0.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone out the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Store `value`, notifying subscribers if it differs from the current one.
    pub fn set(&self, value: T) {
        let callbacks = {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
            inner.subscribers.retain(|sub| sub.strong_count() > 0);
            inner
                .subscribers
                .iter()
                .filter_map(Weak::upgrade)
                .collect::<Vec<_>>()
        };

        if callbacks.is_empty() {
            return;
        }

        let current = self.get();
        for callback in callbacks {
            callback(&current);
        }
    }

    /// Mutate a copy of the value in place and store it with [`set`](Self::set).
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut next = self.get();
        f(&mut next);
        self.set(next);
    }

    /// Number of value changes since construction.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Register `callback` to run after every value change.
    ///
    /// The callback stays registered for as long as the returned
    /// [`Subscription`] is alive.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: Rc<Callback<T>> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Number of subscribers whose [`Subscription`] is still alive.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|sub| sub.strong_count() > 0)
            .count()
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

/// RAII guard for an [`Observable`] subscription.
///
/// Dropping the guard unsubscribes the callback.
#[must_use = "dropping a Subscription immediately unsubscribes the callback"]
pub struct Subscription {
    _guard: Box<dyn Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn get_returns_initial_value() {
        let obs = Observable::new(7);
        assert_eq!(obs.get(), 7);
        assert_eq!(obs.version(), 0);
    }

    #[test]
    fn set_bumps_version_once_per_change() {
        let obs = Observable::new(false);
        obs.set(true);
        assert_eq!(obs.version(), 1);
        obs.set(true);
        assert_eq!(obs.version(), 1, "equal value must not bump version");
        obs.set(false);
        assert_eq!(obs.version(), 2);
    }

    #[test]
    fn clones_share_state() {
        let a = Observable::new(String::from("a"));
        let b = a.clone();
        b.set("b".to_string());
        assert_eq!(a.get(), "b");
    }

    #[test]
    fn subscribers_fire_in_registration_order() {
        let obs = Observable::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = Rc::clone(&log);
        let _s1 = obs.subscribe(move |v| l1.borrow_mut().push(("first", *v)));
        let l2 = Rc::clone(&log);
        let _s2 = obs.subscribe(move |v| l2.borrow_mut().push(("second", *v)));

        obs.set(3);
        assert_eq!(*log.borrow(), vec![("first", 3), ("second", 3)]);
    }

    #[test]
    fn equal_set_does_not_notify() {
        let obs = Observable::new(1);
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = obs.subscribe(move |_| h.set(h.get() + 1));

        obs.set(1);
        assert_eq!(hits.get(), 0);
        obs.set(2);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn dropped_subscription_stops_firing() {
        let obs = Observable::new(0);
        let seen = Rc::new(Cell::new(0));
        let s = Rc::clone(&seen);
        let sub = obs.subscribe(move |v| s.set(*v));
        assert_eq!(obs.subscriber_count(), 1);

        obs.set(5);
        drop(sub);
        obs.set(9);
        assert_eq!(seen.get(), 5);
        assert_eq!(obs.subscriber_count(), 0);
    }

    #[test]
    fn subscriber_may_write_back() {
        let obs = Observable::new(0);
        let writer = obs.clone();
        let _sub = obs.subscribe(move |v| {
            if *v == 1 {
                writer.set(2);
            }
        });

        obs.set(1);
        assert_eq!(obs.get(), 2);
        assert_eq!(obs.version(), 2);
    }

    #[test]
    fn update_applies_closure() {
        let obs = Observable::new(vec![1, 2]);
        obs.update(|v| v.push(3));
        assert_eq!(obs.get(), vec![1, 2, 3]);
        assert_eq!(obs.version(), 1);
    }

    #[test]
    fn with_borrows_without_clone() {
        let obs = Observable::new(String::from("hello"));
        assert_eq!(obs.with(String::len), 5);
    }

    #[test]
    fn debug_format_includes_version() {
        let obs = Observable::new(true);
        obs.set(false);
        let debug = format!("{obs:?}");
        assert!(debug.contains("version: 1"));
    }

    proptest::proptest! {
        #[test]
        fn version_counts_distinct_transitions(values in proptest::collection::vec(0u8..4, 0..64)) {
            let obs = Observable::new(0u8);
            let mut expected = 0u64;
            let mut last = 0u8;
            for v in values {
                if v != last {
                    expected += 1;
                    last = v;
                }
                obs.set(v);
            }
            proptest::prop_assert_eq!(obs.version(), expected);
            proptest::prop_assert_eq!(obs.get(), last);
        }
    }
}
