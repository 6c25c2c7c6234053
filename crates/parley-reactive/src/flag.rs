#![forbid(unsafe_code)]

//! Boolean cells a controller can read and write through a shared reference.
//!
//! [`FlagCell`] is the capability a dialog controller needs from the
//! visibility flag it is handed: read the current state, write a new one.
//! The caller owns the cell and decides how writes reach the renderer.
//! An [`Observable<bool>`] notifies its subscribers; a plain `Cell<bool>` or
//! `AtomicBool` is simply polled.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::observable::Observable;

/// A boolean cell with interior mutability.
pub trait FlagCell {
    /// Current value of the flag.
    fn get(&self) -> bool;

    /// Store a new value.
    fn set(&self, value: bool);
}

impl FlagCell for Observable<bool> {
    fn get(&self) -> bool {
        Observable::get(self)
    }

    fn set(&self, value: bool) {
        Observable::set(self, value);
    }
}

impl FlagCell for Cell<bool> {
    fn get(&self) -> bool {
        Cell::get(self)
    }

    fn set(&self, value: bool) {
        Cell::set(self, value);
    }
}

impl FlagCell for AtomicBool {
    fn get(&self) -> bool {
        self.load(Ordering::Acquire)
    }

    fn set(&self, value: bool) {
        self.store(value, Ordering::Release);
    }
}

impl<C: FlagCell + ?Sized> FlagCell for &C {
    fn get(&self) -> bool {
        (**self).get()
    }

    fn set(&self, value: bool) {
        (**self).set(value);
    }
}

impl<C: FlagCell + ?Sized> FlagCell for Rc<C> {
    fn get(&self) -> bool {
        (**self).get()
    }

    fn set(&self, value: bool) {
        (**self).set(value);
    }
}

impl<C: FlagCell + ?Sized> FlagCell for Arc<C> {
    fn get(&self) -> bool {
        (**self).get()
    }

    fn set(&self, value: bool) {
        (**self).set(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggle(flag: &impl FlagCell) {
        flag.set(!flag.get());
    }

    #[test]
    fn observable_flag_notifies() {
        let show = Observable::new(false);
        let seen = Rc::new(Cell::new(false));
        let s = Rc::clone(&seen);
        let _sub = show.subscribe(move |v| s.set(*v));

        toggle(&show);
        assert!(FlagCell::get(&show));
        assert!(seen.get());
    }

    #[test]
    fn shared_cell_flag() {
        let show = Rc::new(Cell::new(false));
        let handle = Rc::clone(&show);
        toggle(&handle);
        assert!(show.get());
    }

    #[test]
    fn atomic_flag_across_arc() {
        let show = Arc::new(AtomicBool::new(true));
        toggle(&Arc::clone(&show));
        assert!(!show.load(Ordering::Acquire));
    }

    #[test]
    fn reference_forwards() {
        let show = Cell::new(false);
        let by_ref: &Cell<bool> = &show;
        toggle(&by_ref);
        assert!(show.get());
    }
}
