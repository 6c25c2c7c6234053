#![forbid(unsafe_code)]

//! Settlement values delivered to the awaiter of a reveal.

use std::fmt;

use crate::pending::RequestId;

/// The record a settled reveal resolves to.
///
/// `data` is the payload passed to `confirm_with`/`cancel_with`, or `None`
/// when the dialog was closed with `confirm()`/`cancel()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfirmResult<D> {
    /// Payload handed to the settling call.
    pub data: Option<D>,
    /// True iff the dialog was closed through `cancel`.
    pub is_canceled: bool,
}

impl<D> ConfirmResult<D> {
    /// An affirmative result.
    #[must_use]
    pub fn confirmed(data: Option<D>) -> Self {
        Self {
            data,
            is_canceled: false,
        }
    }

    /// A negative result.
    #[must_use]
    pub fn canceled(data: Option<D>) -> Self {
        Self {
            data,
            is_canceled: true,
        }
    }

    /// Inverse of `is_canceled`.
    #[inline]
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        !self.is_canceled
    }

    /// Discard the outcome and keep the payload.
    #[must_use]
    pub fn into_data(self) -> Option<D> {
        self.data
    }

    /// Transform the payload, keeping the outcome.
    pub fn map<U>(self, f: impl FnOnce(D) -> U) -> ConfirmResult<U> {
        ConfirmResult {
            data: self.data.map(f),
            is_canceled: self.is_canceled,
        }
    }
}

/// Why a reveal future resolved without a confirm or cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealError {
    /// A later reveal replaced this request before it was settled.
    Superseded {
        /// The request that was replaced.
        request: RequestId,
        /// The request that replaced it.
        by: RequestId,
    },
    /// Every handle to the controller was dropped with the request open.
    Detached {
        /// The request that was left open.
        request: RequestId,
    },
}

impl RevealError {
    /// The request this error settles.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        match self {
            Self::Superseded { request, .. } | Self::Detached { request } => *request,
        }
    }
}

impl fmt::Display for RevealError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Superseded { request, by } => {
                write!(f, "confirmation {request} superseded by {by}")
            }
            Self::Detached { request } => {
                write!(f, "confirmation {request} detached: dialog controller dropped")
            }
        }
    }
}

impl std::error::Error for RevealError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_outcome() {
        let ok = ConfirmResult::confirmed(Some(1));
        assert!(ok.is_confirmed());
        assert!(!ok.is_canceled);

        let no: ConfirmResult<i32> = ConfirmResult::canceled(None);
        assert!(no.is_canceled);
        assert_eq!(no.into_data(), None);
    }

    #[test]
    fn map_keeps_outcome() {
        let res = ConfirmResult::canceled(Some(2)).map(|v| v * 10);
        assert_eq!(res, ConfirmResult::canceled(Some(20)));
    }

    #[test]
    fn error_display_names_requests() {
        let err = RevealError::Superseded {
            request: RequestId::from_raw(3),
            by: RequestId::from_raw(4),
        };
        assert_eq!(err.to_string(), "confirmation #3 superseded by #4");
        assert_eq!(err.request_id(), RequestId::from_raw(3));

        let err = RevealError::Detached {
            request: RequestId::from_raw(9),
        };
        assert!(err.to_string().contains("#9 detached"));
    }
}
