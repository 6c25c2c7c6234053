#![forbid(unsafe_code)]

//! The single-slot bridge between a reveal and its settlement.
//!
//! Each reveal opens a [`PendingRequest`] (held by the controller) and a
//! [`RevealFuture`] (handed to the caller). The two halves share a oneshot
//! channel: settling the request resolves the future exactly once.
//!
//! # Failure Modes
//!
//! - Request dropped unsettled (controller dropped): the future resolves to
//!   [`RevealError::Detached`].
//! - Future dropped before settlement: `settle` returns `false`; the request
//!   is otherwise unaffected.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use web_time::Instant;

use crate::result::{ConfirmResult, RevealError};

/// Global counter for request IDs.
static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// What a [`RevealFuture`] resolves to.
pub type Settlement<D> = Result<ConfirmResult<D>, RevealError>;

/// Identifier of one reveal, unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    fn next() -> Self {
        Self(REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap a raw id, e.g. one read back from a log line.
    #[inline]
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Controller-side half of an open reveal.
pub(crate) struct PendingRequest<D> {
    id: RequestId,
    sender: oneshot::Sender<Settlement<D>>,
    revealed_at: Instant,
}

impl<D> PendingRequest<D> {
    /// Open a new request and the future that observes it.
    pub(crate) fn open() -> (Self, RevealFuture<D>) {
        let id = RequestId::next();
        let (sender, receiver) = oneshot::channel();
        let request = Self {
            id,
            sender,
            revealed_at: Instant::now(),
        };
        let future = RevealFuture {
            request: id,
            receiver,
        };
        (request, future)
    }

    pub(crate) fn id(&self) -> RequestId {
        self.id
    }

    /// Time since the reveal that opened this request.
    pub(crate) fn elapsed(&self) -> Duration {
        self.revealed_at.elapsed()
    }

    /// Deliver `outcome` to the awaiter.
    ///
    /// Returns `false` if the future was dropped first.
    pub(crate) fn settle(self, outcome: Settlement<D>) -> bool {
        self.sender.send(outcome).is_ok()
    }
}

impl<D> fmt::Debug for PendingRequest<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRequest")
            .field("id", &self.id)
            .field("abandoned", &self.sender.is_closed())
            .finish()
    }
}

/// Caller-side half of a reveal: resolves once the dialog is settled.
///
/// The future does not drive the dialog. Dropping it leaves the controller's
/// state untouched; the next confirm or cancel still closes the request.
#[must_use = "a RevealFuture does nothing unless awaited or polled"]
pub struct RevealFuture<D> {
    request: RequestId,
    receiver: oneshot::Receiver<Settlement<D>>,
}

impl<D> RevealFuture<D> {
    /// The request this future observes.
    #[inline]
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request
    }

    /// Non-blocking check for a settlement.
    ///
    /// Suited to frame-driven loops that poll once per tick instead of
    /// awaiting. Returns `None` while the dialog is still open. A settlement
    /// is handed out once; later calls report the request as detached.
    pub fn try_settlement(&mut self) -> Option<Settlement<D>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(RevealError::Detached {
                request: self.request,
            })),
        }
    }
}

impl<D> Future for RevealFuture<D> {
    type Output = Settlement<D>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let request = self.request;
        Pin::new(&mut self.receiver).poll(cx).map(|received| {
            received.unwrap_or(Err(RevealError::Detached { request }))
        })
    }
}

impl<D> fmt::Debug for RevealFuture<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevealFuture")
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_increasing() {
        let (a, _fa) = PendingRequest::<()>::open();
        let (b, _fb) = PendingRequest::<()>::open();
        assert!(b.id() > a.id());
    }

    #[test]
    fn settle_reaches_future() {
        let (request, mut future) = PendingRequest::open();
        assert!(future.try_settlement().is_none());
        assert!(request.settle(Ok(ConfirmResult::confirmed(Some(5)))));
        assert_eq!(
            future.try_settlement(),
            Some(Ok(ConfirmResult::confirmed(Some(5))))
        );
    }

    #[test]
    fn dropped_request_detaches_future() {
        let (request, mut future) = PendingRequest::<u8>::open();
        let id = request.id();
        drop(request);
        assert_eq!(
            future.try_settlement(),
            Some(Err(RevealError::Detached { request: id }))
        );
    }

    #[test]
    fn settle_after_future_dropped_reports_false() {
        let (request, future) = PendingRequest::<u8>::open();
        assert_eq!(future.request_id(), request.id());
        drop(future);
        assert!(!request.settle(Ok(ConfirmResult::canceled(None))));
    }

    #[tokio::test]
    async fn future_awaits_settlement() {
        let (request, future) = PendingRequest::open();
        request.settle(Ok(ConfirmResult::canceled(Some("no"))));
        assert_eq!(future.await, Ok(ConfirmResult::canceled(Some("no"))));
    }
}
