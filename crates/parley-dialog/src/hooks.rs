#![forbid(unsafe_code)]

//! Ordered callback registries for dialog lifecycle events.
//!
//! A [`HookRegistry<A>`] is a list of callbacks that all receive the same
//! optional payload when the registry fires. Registration returns a
//! [`HookHandle`]; unlike an observable subscription, dropping the handle
//! keeps the hook registered, and [`HookHandle::off`] removes it.
//! [`HookScope`] restores RAII semantics for callers that want them.
//!
//! # Invariants
//!
//! 1. Hooks fire in registration order.
//! 2. `fire` snapshots the list first: hooks added or removed while firing
//!    take effect from the next `fire`.
//! 3. No internal borrow is held while a hook runs, so hooks may register,
//!    remove, or trigger other hooks.
//!
//! # Failure Modes
//!
//! - Hook panic: propagates to the caller of `fire`; later hooks in the same
//!   round do not run.
//! - `off` after the registry was dropped: returns `false`.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for hook IDs.
static HOOK_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifier of one registered hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

impl HookId {
    fn next() -> Self {
        Self(HOOK_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

type HookFn<A> = dyn Fn(Option<&A>);

struct HookList<A> {
    entries: Vec<(HookId, Rc<HookFn<A>>)>,
}

/// Type-erased removal, so handles do not carry the payload type.
trait Unregister {
    fn unregister(&self, id: HookId) -> bool;
    fn contains(&self, id: HookId) -> bool;
}

impl<A> Unregister for RefCell<HookList<A>> {
    fn unregister(&self, id: HookId) -> bool {
        let mut list = self.borrow_mut();
        let before = list.entries.len();
        list.entries.retain(|(entry, _)| *entry != id);
        list.entries.len() != before
    }

    fn contains(&self, id: HookId) -> bool {
        self.borrow().entries.iter().any(|(entry, _)| *entry == id)
    }
}

/// An ordered list of callbacks receiving `Option<&A>`.
pub struct HookRegistry<A> {
    hooks: Rc<RefCell<HookList<A>>>,
}

impl<A: 'static> HookRegistry<A> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hooks: Rc::new(RefCell::new(HookList {
                entries: Vec::new(),
            })),
        }
    }

    /// Append `hook`; it runs on every subsequent [`fire`](Self::fire).
    pub fn register(&self, hook: impl Fn(Option<&A>) + 'static) -> HookHandle {
        let id = HookId::next();
        self.hooks.borrow_mut().entries.push((id, Rc::new(hook)));
        let owner: Weak<dyn Unregister> = Rc::downgrade(&self.hooks) as Weak<dyn Unregister>;
        HookHandle { id, owner }
    }

    /// Run every hook in registration order with `payload`.
    ///
    /// Returns how many hooks ran.
    pub fn fire(&self, payload: Option<&A>) -> usize {
        let snapshot: Vec<Rc<HookFn<A>>> = self
            .hooks
            .borrow()
            .entries
            .iter()
            .map(|(_, hook)| Rc::clone(hook))
            .collect();

        for hook in &snapshot {
            hook(payload);
        }
        snapshot.len()
    }

    /// Number of registered hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.borrow().entries.len()
    }

    /// Whether no hooks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.borrow().entries.is_empty()
    }

    /// Remove every hook. Outstanding handles report `false` from `off`.
    pub fn clear(&self) {
        self.hooks.borrow_mut().entries.clear();
    }
}

impl<A: 'static> Default for HookRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for HookRegistry<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.hooks.borrow().entries.len())
            .finish()
    }
}

/// Disposer for a registered hook.
///
/// Dropping the handle does not unregister the hook.
pub struct HookHandle {
    id: HookId,
    owner: Weak<dyn Unregister>,
}

impl HookHandle {
    /// The hook's identifier.
    #[inline]
    #[must_use]
    pub fn id(&self) -> HookId {
        self.id
    }

    /// Whether the hook is still registered.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.owner
            .upgrade()
            .is_some_and(|owner| owner.contains(self.id))
    }

    /// Unregister the hook.
    ///
    /// Returns `false` if it was already removed or the registry is gone.
    pub fn off(self) -> bool {
        self.owner
            .upgrade()
            .is_some_and(|owner| owner.unregister(self.id))
    }
}

impl fmt::Debug for HookHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookHandle")
            .field("id", &self.id)
            .field("registered", &self.is_registered())
            .finish()
    }
}

/// Collects hook handles for a logical owner (e.g. one view).
///
/// When the scope is dropped, every held hook is unregistered.
///
/// # Invariants
///
/// 1. Hooks are unregistered in reverse registration order.
/// 2. After drop or `clear()`, no hook held by this scope fires again.
/// 3. `clear()` leaves the scope empty but reusable.
#[derive(Default)]
pub struct HookScope {
    handles: Vec<HookHandle>,
}

impl HookScope {
    /// Create an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `handle`. Returns the scope for chaining.
    pub fn hold(&mut self, handle: HookHandle) -> &mut Self {
        self.handles.push(handle);
        self
    }

    /// Number of held handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether the scope holds no handles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Unregister every held hook now.
    pub fn clear(&mut self) {
        while let Some(handle) = self.handles.pop() {
            handle.off();
        }
    }
}

impl Drop for HookScope {
    fn drop(&mut self) {
        self.clear();
    }
}

impl fmt::Debug for HookScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookScope")
            .field("hooks", &self.handles.len())
            .finish()
    }
}
