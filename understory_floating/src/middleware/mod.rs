// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Middleware: independent positioning strategies run in order by the engine.
//!
//! ## Contract
//!
//! A [`Middleware`] receives a read-only [`MiddlewareState`] describing the resolution so far and
//! returns a [`MiddlewareReturn`]:
//!
//! - `x`/`y` replace the running coordinates (unset keeps the previous value),
//! - `data` is merged into [`MiddlewareData`] under the middleware's name,
//! - `reset` restarts the pipeline from the first middleware, optionally with a new placement
//!   and/or new rects.
//!
//! Middleware must be total over well-formed input. Any platform call they make may fail; that
//! error is returned as-is and aborts the resolution.
//!
//! ## Built-ins
//!
//! | Middleware        | Moves coords | Resets                          |
//! |-------------------|--------------|---------------------------------|
//! | [`Offset`]        | yes          | no                              |
//! | [`Shift`]         | yes          | no                              |
//! | [`Flip`]          | no           | to the next or best placement   |
//! | [`AutoPlacement`] | no           | to each candidate, then the best|
//! | [`Size`]          | no           | re-measure after `apply`        |
//! | [`Arrow`]         | rarely       | once, for an alignment offset   |
//! | [`Hide`]          | no           | no                              |
//! | [`Inline`]        | no           | with concrete reference rects   |

use alloc::boxed::Box;
use core::fmt;
use core::future::Future;
use core::pin::Pin;

use kurbo::Point;

use crate::data::{MiddlewareData, MiddlewarePayload};
use crate::platform::Platform;
use crate::types::{ElementRects, Placement, Strategy};

mod arrow;
mod auto_placement;
mod flip;
mod hide;
mod inline;
mod offset;
mod shift;
mod size;

pub use arrow::Arrow;
pub use auto_placement::AutoPlacement;
pub use flip::{Flip, FlipCrossAxis, FlipFallbackStrategy};
pub use hide::{Hide, HideStrategy};
pub use inline::Inline;
pub use offset::{Offset, OffsetValue};
pub use shift::{LimitShift, LimitShiftOffset, Limiter, Shift};
pub use size::{AvailableSize, Size};

/// Future returned by [`Middleware::compute`].
pub type MiddlewareFuture<'a, E> = Pin<Box<dyn Future<Output = Result<MiddlewareReturn, E>> + 'a>>;

/// A positioning strategy.
pub trait Middleware<P: Platform> {
    /// Name under which data is recorded. Built-ins use their lowercase camel name (`"flip"`).
    fn name(&self) -> &'static str;

    /// Run against the current state of the resolution.
    fn compute<'a>(&'a self, state: &'a MiddlewareState<'a, P>) -> MiddlewareFuture<'a, P::Error>
    where
        P: 'a;
}

/// The reference and floating element handles.
pub struct Elements<'a, E> {
    /// The anchor element.
    pub reference: &'a E,
    /// The positioned element.
    pub floating: &'a E,
}

impl<E> Clone for Elements<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Elements<'_, E> {}

impl<E: fmt::Debug> fmt::Debug for Elements<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Elements")
            .field("reference", self.reference)
            .field("floating", self.floating)
            .finish()
    }
}

/// Snapshot of the platform-independent part of a [`MiddlewareState`].
///
/// Handed to option-deriving closures and shift limiters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacementContext {
    /// Current coordinates.
    pub coords: Point,
    /// Placement requested by the caller.
    pub initial_placement: Placement,
    /// Placement currently being rendered.
    pub placement: Placement,
    /// Positioning strategy.
    pub strategy: Strategy,
    /// Current rects.
    pub rects: ElementRects,
}

/// Read-only view of one resolution, handed to each middleware.
pub struct MiddlewareState<'a, P: Platform> {
    /// Current x coordinate of the floating element.
    pub x: f64,
    /// Current y coordinate of the floating element.
    pub y: f64,
    /// Placement requested by the caller.
    pub initial_placement: Placement,
    /// Placement currently being rendered.
    pub placement: Placement,
    /// Positioning strategy.
    pub strategy: Strategy,
    /// Current rects.
    pub rects: &'a ElementRects,
    /// Data accumulated so far.
    pub middleware_data: &'a MiddlewareData,
    /// Element handles.
    pub elements: Elements<'a, P::Element>,
    /// Measurement provider.
    pub platform: &'a P,
}

impl<P: Platform> fmt::Debug for MiddlewareState<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareState")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("initial_placement", &self.initial_placement)
            .field("placement", &self.placement)
            .field("strategy", &self.strategy)
            .field("rects", self.rects)
            .field("middleware_data", self.middleware_data)
            .finish_non_exhaustive()
    }
}

impl<P: Platform> MiddlewareState<'_, P> {
    /// Current coordinates as a point.
    #[must_use]
    pub fn coords(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Platform-independent snapshot of this state.
    #[must_use]
    pub fn context(&self) -> PlacementContext {
        PlacementContext {
            coords: self.coords(),
            initial_placement: self.initial_placement,
            placement: self.placement,
            strategy: self.strategy,
            rects: *self.rects,
        }
    }
}

/// New rects requested by a [`Reset`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ResetRects {
    /// Ask the platform to measure both elements again.
    Remeasure,
    /// Adopt these rects without a platform call.
    Use(ElementRects),
}

/// A request to restart the pipeline from the first middleware.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Reset {
    /// Restart, keeping the current placement, rects, and coordinates.
    Restart,
    /// Restart after switching placement and/or rects. Coordinates are recomputed from the
    /// (possibly new) placement and rects.
    With {
        /// Placement to render next.
        placement: Option<Placement>,
        /// Rects to use next.
        rects: Option<ResetRects>,
    },
}

impl Reset {
    /// Restart with a new placement.
    #[must_use]
    pub const fn placement(placement: Placement) -> Self {
        Self::With {
            placement: Some(placement),
            rects: None,
        }
    }

    /// Restart after re-measuring both elements.
    #[must_use]
    pub const fn remeasure() -> Self {
        Self::With {
            placement: None,
            rects: Some(ResetRects::Remeasure),
        }
    }

    /// Restart with the given rects.
    #[must_use]
    pub const fn rects(rects: ElementRects) -> Self {
        Self::With {
            placement: None,
            rects: Some(ResetRects::Use(rects)),
        }
    }
}

/// What a middleware hands back to the engine.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MiddlewareReturn {
    /// New x coordinate, if changed.
    pub x: Option<f64>,
    /// New y coordinate, if changed.
    pub y: Option<f64>,
    /// Data to merge under the middleware's name.
    pub data: Option<MiddlewarePayload>,
    /// Restart request.
    pub reset: Option<Reset>,
}

impl MiddlewareReturn {
    /// Leave everything unchanged.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Move the floating element to `coords`.
    #[must_use]
    pub fn coords(coords: Point) -> Self {
        Self {
            x: Some(coords.x),
            y: Some(coords.y),
            ..Self::default()
        }
    }

    /// Attach `data`.
    #[must_use]
    pub fn with_data(mut self, data: MiddlewarePayload) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach a reset request.
    #[must_use]
    pub fn with_reset(mut self, reset: Reset) -> Self {
        self.reset = Some(reset);
        self
    }
}

/// Options that are either fixed or derived from the current [`PlacementContext`].
pub enum Derivable<T> {
    /// A fixed value.
    Value(T),
    /// A value computed from the resolution state each time the middleware runs.
    Derived(Box<dyn Fn(&PlacementContext) -> T>),
}

impl<T: Clone> Derivable<T> {
    /// Resolve against `context`.
    pub fn evaluate(&self, context: &PlacementContext) -> T {
        match self {
            Self::Value(v) => v.clone(),
            Self::Derived(f) => f(context),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Derivable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

impl<T> From<T> for Derivable<T> {
    fn from(v: T) -> Self {
        Self::Value(v)
    }
}

#[cfg(test)]
pub(crate) mod test_platform;
