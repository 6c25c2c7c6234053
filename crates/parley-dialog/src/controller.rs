#![forbid(unsafe_code)]

//! The confirm-dialog controller.
//!
//! [`ConfirmDialog`] drives a caller-owned visibility flag through two
//! states and bridges them to a future:
//!
//! ```text
//!            reveal()                 reveal()  (supersedes)
//!   Idle ──────────────▶ Revealed ◀──────────────┐
//!    ▲                      │  └──────────────────┘
//!    └── confirm()/cancel() ┘
//! ```
//!
//! # Invariants
//!
//! 1. At most one request is open. A reveal while one is open settles the
//!    earlier one according to [`SupersedePolicy`]; it is never orphaned.
//! 2. The flag is `true` before any reveal hook runs and `false` before any
//!    confirm or cancel hook runs.
//! 3. Confirm hooks fire only on confirm, cancel hooks only on cancel, once
//!    per call, in registration order, even when no request is open.
//! 4. A request is detached from the controller before hooks run and settled
//!    after them, so a hook that reveals again opens a fresh request instead
//!    of stealing the one being closed.
//! 5. No internal borrow is held while hooks run; hooks may call back into
//!    the controller.
//!
//! # Failure Modes
//!
//! - confirm/cancel while idle: hooks fire, flag is written `false`, nothing
//!   is settled.
//! - Awaiter dropped: the next confirm/cancel still closes the request and
//!   counts it in [`DialogStats::abandoned`].
//! - Every controller handle dropped with a request open: the future
//!   resolves to [`RevealError::Detached`].
//! - A hook that captures a strong [`ConfirmDialog`] keeps the controller
//!   alive forever; capture a [`WeakConfirmDialog`] instead.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use parley_reactive::FlagCell;
use tracing::{debug, trace, warn};

use crate::config::{ConfirmDialogConfig, SupersedePolicy};
use crate::hooks::{HookHandle, HookRegistry};
use crate::pending::{PendingRequest, RequestId, RevealFuture};
use crate::result::{ConfirmResult, RevealError};

/// Logical state of a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DialogPhase {
    /// No request is open.
    #[default]
    Idle,
    /// A reveal is waiting for confirm or cancel.
    Revealed,
}

/// Lifetime counters for one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DialogStats {
    /// Calls to `reveal`/`reveal_with`.
    pub reveals: u64,
    /// Calls to `confirm`/`confirm_with`.
    pub confirms: u64,
    /// Calls to `cancel`/`cancel_with`.
    pub cancels: u64,
    /// Requests replaced by a later reveal.
    pub superseded: u64,
    /// Requests closed after their future was dropped.
    pub abandoned: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Confirm,
    Cancel,
}

impl Outcome {
    fn as_str(self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Cancel => "cancel",
        }
    }
}

struct Shared<C, P, D> {
    flag: C,
    config: ConfirmDialogConfig,
    pending: RefCell<Option<PendingRequest<D>>>,
    reveal_hooks: HookRegistry<P>,
    confirm_hooks: HookRegistry<D>,
    cancel_hooks: HookRegistry<D>,
    stats: Cell<DialogStats>,
}

/// An awaitable confirm dialog bound to a caller-owned visibility flag.
///
/// `C` is the flag, `P` the payload handed to reveal hooks and `D` the
/// payload carried by confirm/cancel into the [`ConfirmResult`].
///
/// Handles are cheap to clone and share one dialog, so each UI handler can
/// keep its own. Not `Send`: drive it from one thread.
///
/// ```ignore
/// let show = Observable::new(false);
/// let dialog: ConfirmDialog<_, String, bool> = ConfirmDialog::new(show.clone());
///
/// let answer = dialog.reveal_with("Delete 3 files?".to_string());
/// assert!(show.get());
///
/// // ...later, from the button handler:
/// dialog.confirm_with(true);
/// assert_eq!(answer.await, Ok(ConfirmResult::confirmed(Some(true))));
/// ```
pub struct ConfirmDialog<C: FlagCell, P = (), D = ()> {
    shared: Rc<Shared<C, P, D>>,
}

impl<C: FlagCell, P, D> Clone for ConfirmDialog<C, P, D> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<C: FlagCell, P: 'static, D: 'static> ConfirmDialog<C, P, D> {
    /// Bind a dialog to `flag` with the default configuration.
    pub fn new(flag: C) -> Self {
        Self::with_config(flag, ConfirmDialogConfig::default())
    }

    /// Bind a dialog to `flag` with an explicit configuration.
    ///
    /// The flag is not written until the first reveal, confirm or cancel.
    pub fn with_config(flag: C, config: ConfirmDialogConfig) -> Self {
        Self {
            shared: Rc::new(Shared {
                flag,
                config,
                pending: RefCell::new(None),
                reveal_hooks: HookRegistry::new(),
                confirm_hooks: HookRegistry::new(),
                cancel_hooks: HookRegistry::new(),
                stats: Cell::new(DialogStats::default()),
            }),
        }
    }

    // --- Lifecycle ---

    /// Open the dialog without a payload.
    pub fn reveal(&self) -> RevealFuture<D> {
        self.open(None)
    }

    /// Open the dialog, handing `payload` to every reveal hook.
    pub fn reveal_with(&self, payload: P) -> RevealFuture<D> {
        self.open(Some(payload))
    }

    /// Close the dialog affirmatively without a payload.
    pub fn confirm(&self) {
        self.close(Outcome::Confirm, None);
    }

    /// Close the dialog affirmatively, settling the open request with `data`.
    pub fn confirm_with(&self, data: D) {
        self.close(Outcome::Confirm, Some(data));
    }

    /// Close the dialog negatively without a payload.
    pub fn cancel(&self) {
        self.close(Outcome::Cancel, None);
    }

    /// Close the dialog negatively, settling the open request with `data`.
    pub fn cancel_with(&self, data: D) {
        self.close(Outcome::Cancel, Some(data));
    }

    // --- Hooks ---

    /// Run `hook` on every reveal with the reveal payload.
    pub fn on_reveal(&self, hook: impl Fn(Option<&P>) + 'static) -> HookHandle {
        self.shared.reveal_hooks.register(hook)
    }

    /// Run `hook` on every confirm with the confirm payload.
    pub fn on_confirm(&self, hook: impl Fn(Option<&D>) + 'static) -> HookHandle {
        self.shared.confirm_hooks.register(hook)
    }

    /// Run `hook` on every cancel with the cancel payload.
    pub fn on_cancel(&self, hook: impl Fn(Option<&D>) + 'static) -> HookHandle {
        self.shared.cancel_hooks.register(hook)
    }

    // --- State Queries ---

    /// Current value of the visibility flag.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.shared.flag.get()
    }

    /// Whether a request is open.
    #[must_use]
    pub fn phase(&self) -> DialogPhase {
        if self.has_pending() {
            DialogPhase::Revealed
        } else {
            DialogPhase::Idle
        }
    }

    /// Whether a reveal is waiting to be settled.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.shared.pending.borrow().is_some()
    }

    /// ID of the open request, if any.
    #[must_use]
    pub fn pending_id(&self) -> Option<RequestId> {
        self.shared.pending.borrow().as_ref().map(PendingRequest::id)
    }

    /// Snapshot of the lifetime counters.
    #[must_use]
    pub fn stats(&self) -> DialogStats {
        self.shared.stats.get()
    }

    /// The configuration this dialog was built with.
    #[must_use]
    pub fn config(&self) -> &ConfirmDialogConfig {
        &self.shared.config
    }

    /// The visibility flag this dialog writes.
    #[must_use]
    pub fn flag(&self) -> &C {
        &self.shared.flag
    }

    /// Registered reveal hooks.
    #[must_use]
    pub fn reveal_hook_count(&self) -> usize {
        self.shared.reveal_hooks.len()
    }

    /// Registered confirm hooks.
    #[must_use]
    pub fn confirm_hook_count(&self) -> usize {
        self.shared.confirm_hooks.len()
    }

    /// Registered cancel hooks.
    #[must_use]
    pub fn cancel_hook_count(&self) -> usize {
        self.shared.cancel_hooks.len()
    }

    /// A handle that does not keep the dialog alive.
    #[must_use]
    pub fn downgrade(&self) -> WeakConfirmDialog<C, P, D> {
        WeakConfirmDialog {
            shared: Rc::downgrade(&self.shared),
        }
    }

    // --- Internals ---

    fn label(&self) -> &str {
        self.shared.config.label_or_default()
    }

    fn bump(&self, f: impl FnOnce(&mut DialogStats)) {
        let mut stats = self.shared.stats.get();
        f(&mut stats);
        self.shared.stats.set(stats);
    }

    fn open(&self, payload: Option<P>) -> RevealFuture<D> {
        let (request, future) = PendingRequest::open();
        let id = request.id();
        let previous = self.shared.pending.replace(Some(request));
        if let Some(previous) = previous {
            self.supersede(previous, id);
        }

        self.shared.flag.set(true);
        self.bump(|s| s.reveals += 1);
        let hooks = self.shared.reveal_hooks.fire(payload.as_ref());

        debug!(
            dialog = self.label(),
            request = id.get(),
            hooks,
            "dialog revealed"
        );
        future
    }

    fn supersede(&self, previous: PendingRequest<D>, by: RequestId) {
        let request = previous.id();
        let policy = self.shared.config.supersede;
        self.bump(|s| s.superseded += 1);
        warn!(
            dialog = self.label(),
            request = request.get(),
            by = by.get(),
            policy = ?policy,
            "open confirmation superseded by a new reveal"
        );

        let outcome = match policy {
            SupersedePolicy::Reject => Err(RevealError::Superseded { request, by }),
            SupersedePolicy::CancelPrevious => Ok(ConfirmResult::canceled(None)),
        };
        if !previous.settle(outcome) {
            self.bump(|s| s.abandoned += 1);
            trace!(
                dialog = self.label(),
                request = request.get(),
                "superseded request had no awaiter"
            );
        }
    }

    fn close(&self, outcome: Outcome, data: Option<D>) {
        let pending = self.shared.pending.take();
        self.shared.flag.set(false);

        let hooks = match outcome {
            Outcome::Confirm => {
                self.bump(|s| s.confirms += 1);
                self.shared.confirm_hooks.fire(data.as_ref())
            }
            Outcome::Cancel => {
                self.bump(|s| s.cancels += 1);
                self.shared.cancel_hooks.fire(data.as_ref())
            }
        };

        let Some(request) = pending else {
            trace!(
                dialog = self.label(),
                outcome = outcome.as_str(),
                hooks,
                "dialog closed with no open request"
            );
            return;
        };

        let id = request.id();
        let elapsed_us = u64::try_from(request.elapsed().as_micros()).unwrap_or(u64::MAX);
        let result = match outcome {
            Outcome::Confirm => ConfirmResult::confirmed(data),
            Outcome::Cancel => ConfirmResult::canceled(data),
        };

        if request.settle(Ok(result)) {
            debug!(
                dialog = self.label(),
                request = id.get(),
                outcome = outcome.as_str(),
                hooks,
                elapsed_us,
                "dialog settled"
            );
        } else {
            self.bump(|s| s.abandoned += 1);
            trace!(
                dialog = self.label(),
                request = id.get(),
                outcome = outcome.as_str(),
                "dialog settled after its awaiter was dropped"
            );
        }
    }
}

impl<C: FlagCell, P, D> fmt::Debug for ConfirmDialog<C, P, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pending = self.shared.pending.borrow();
        f.debug_struct("ConfirmDialog")
            .field("label", &self.shared.config.label_or_default())
            .field("revealed", &self.shared.flag.get())
            .field("pending", &pending.as_ref().map(PendingRequest::id))
            .field("stats", &self.shared.stats.get())
            .finish()
    }
}

/// Non-owning handle to a [`ConfirmDialog`], for hooks that need to call
/// back into the dialog they are registered on.
pub struct WeakConfirmDialog<C: FlagCell, P = (), D = ()> {
    shared: Weak<Shared<C, P, D>>,
}

impl<C: FlagCell, P, D> WeakConfirmDialog<C, P, D> {
    /// The dialog, if any strong handle is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<ConfirmDialog<C, P, D>> {
        self.shared.upgrade().map(|shared| ConfirmDialog { shared })
    }
}

impl<C: FlagCell, P, D> Clone for WeakConfirmDialog<C, P, D> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<C: FlagCell, P, D> fmt::Debug for WeakConfirmDialog<C, P, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakConfirmDialog")
            .field("alive", &(self.shared.strong_count() > 0))
            .finish()
    }
}
