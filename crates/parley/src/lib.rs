#![forbid(unsafe_code)]

//! Parley public facade.
//!
//! Re-exports the reactive cells and the confirm-dialog controller so an
//! application depends on one crate:
//!
//! ```ignore
//! use parley::prelude::*;
//!
//! let show = Observable::new(false);
//! let dialog: ConfirmDialog<_, (), bool> = ConfirmDialog::new(show.clone());
//! let answer = dialog.reveal();
//! dialog.confirm_with(true);
//! assert_eq!(answer.await, Ok(ConfirmResult::confirmed(Some(true))));
//! ```

pub use parley_dialog as dialog;
pub use parley_reactive as reactive;

pub use parley_dialog::{
    ConfirmDialog, ConfirmDialogConfig, ConfirmResult, DialogPhase, HookHandle, HookScope,
    RevealError, RevealFuture, SupersedePolicy,
};
pub use parley_reactive::{FlagCell, Observable, Subscription};

/// Everything needed to build and drive a dialog.
pub mod prelude {
    pub use crate::{
        ConfirmDialog, ConfirmDialogConfig, ConfirmResult, DialogPhase, FlagCell, HookHandle,
        HookScope, Observable, RevealError, RevealFuture, SupersedePolicy, Subscription,
    };
}
