#![forbid(unsafe_code)]

//! Reactive cells for Parley.
//!
//! - [`Observable`]: a shared, version-tracked value with change
//!   notification via subscriber callbacks.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//! - [`FlagCell`]: the read/write capability a dialog controller needs from
//!   the visibility flag it is given.
//!
//! # Architecture
//!
//! `Observable<T>` uses `Rc<RefCell<..>>` for single-threaded shared
//! ownership. Subscribers are stored as `Weak` callbacks and pruned lazily
//! during notification.

pub mod flag;
pub mod observable;

pub use flag::FlagCell;
pub use observable::{Observable, Subscription};
