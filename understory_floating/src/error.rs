// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors returned by the positioning engine.

/// Failure of a single [`compute_position_async`](crate::compute_position_async) call.
///
/// `E` is the platform's error type.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ComputeError<E> {
    /// A middleware asked for another reset after the ceiling was reached.
    ///
    /// The middleware list resets forever; this is a configuration error.
    #[error("middleware `{middleware}` requested a reset after {limit} resets")]
    InfiniteReset {
        /// The reset ceiling that was hit.
        limit: usize,
        /// Name of the middleware that requested the rejected reset.
        middleware: &'static str,
    },
    /// A platform measurement failed.
    #[error("{0}")]
    Platform(E),
}

impl<E> ComputeError<E> {
    /// The platform error, if this is one.
    pub fn platform(&self) -> Option<&E> {
        match self {
            Self::Platform(e) => Some(e),
            Self::InfiniteReset { .. } => None,
        }
    }
}
