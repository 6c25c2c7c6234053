#![forbid(unsafe_code)]

//! Awaitable confirm dialogs for Parley.
//!
//! A [`ConfirmDialog`] toggles a caller-owned visibility flag and turns the
//! user's eventual answer into a future:
//!
//! - `reveal()` sets the flag, fires reveal hooks and returns a
//!   [`RevealFuture`].
//! - `confirm()`/`cancel()` clear the flag, fire their hooks and settle that
//!   future with a [`ConfirmResult`].
//!
//! The dialog never renders anything. A UI layer observes the flag (for
//! example a [`parley_reactive::Observable<bool>`]) and calls `confirm` or
//! `cancel` from its button handlers.
//!
//! # Example
//!
//! ```ignore
//! use parley_dialog::{ConfirmDialog, ConfirmResult};
//! use parley_reactive::Observable;
//!
//! let show = Observable::new(false);
//! let dialog: ConfirmDialog<_, (), String> = ConfirmDialog::new(show.clone());
//!
//! dialog.on_cancel(|reason| tracing::info!(?reason, "user backed out"));
//!
//! let answer = dialog.reveal();
//! // ...the UI renders because `show` is now true...
//! dialog.cancel_with("closed with Escape".to_string());
//!
//! let ConfirmResult { data, is_canceled } = answer.await?;
//! ```

pub mod config;
pub mod controller;
pub mod hooks;
pub mod pending;
pub mod result;

pub use config::{ConfigError, ConfirmDialogConfig, DEFAULT_LABEL, SupersedePolicy};
pub use controller::{ConfirmDialog, DialogPhase, DialogStats, WeakConfirmDialog};
pub use hooks::{HookHandle, HookId, HookRegistry, HookScope};
pub use pending::{RequestId, RevealFuture, Settlement};
pub use result::{ConfirmResult, RevealError};
