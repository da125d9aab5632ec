// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keep the floating element in view by sliding it along its axes.

use alloc::boxed::Box;
use core::fmt;

use kurbo::Point;

use super::{Derivable, Middleware, MiddlewareFuture, MiddlewareReturn, MiddlewareState, PlacementContext};
use crate::data::{AxisFlags, MiddlewareData, MiddlewarePayload, ShiftData};
use crate::overflow::{DetectOverflowOptions, detect_overflow};
use crate::platform::Platform;
use crate::types::clamp;

/// Second-stage adjustment applied after [`Shift`] clamps the coordinates.
///
/// `context.coords` holds the shifted coordinates; the limiter returns the final ones.
pub trait Limiter {
    /// Adjust the shifted coordinates.
    fn limit(&self, context: &PlacementContext, middleware_data: &MiddlewareData) -> Point;
}

impl<F> Limiter for F
where
    F: Fn(&PlacementContext, &MiddlewareData) -> Point,
{
    fn limit(&self, context: &PlacementContext, middleware_data: &MiddlewareData) -> Point {
        self(context, middleware_data)
    }
}

/// Slides the floating element along the alignment axis (and optionally the side axis) so it
/// stays within its clipping boundary.
///
/// Never resets.
pub struct Shift {
    main_axis: bool,
    cross_axis: bool,
    limiter: Option<Box<dyn Limiter>>,
    overflow: DetectOverflowOptions,
}

impl fmt::Debug for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shift")
            .field("main_axis", &self.main_axis)
            .field("cross_axis", &self.cross_axis)
            .field("limiter", &self.limiter.is_some())
            .field("overflow", &self.overflow)
            .finish()
    }
}

impl Default for Shift {
    fn default() -> Self {
        Self::new()
    }
}

impl Shift {
    /// Shift along the alignment axis only, with no limiter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            main_axis: true,
            cross_axis: false,
            limiter: None,
            overflow: DetectOverflowOptions::default(),
        }
    }

    /// Whether to shift along the alignment axis. Default `true`.
    #[must_use]
    pub fn with_main_axis(mut self, enabled: bool) -> Self {
        self.main_axis = enabled;
        self
    }

    /// Whether to shift along the side axis. Default `false`.
    #[must_use]
    pub fn with_cross_axis(mut self, enabled: bool) -> Self {
        self.cross_axis = enabled;
        self
    }

    /// Post-process the shifted coordinates, for example with [`LimitShift`].
    #[must_use]
    pub fn with_limiter(mut self, limiter: impl Limiter + 'static) -> Self {
        self.limiter = Some(Box::new(limiter));
        self
    }

    /// Options for the overflow check.
    #[must_use]
    pub fn with_overflow(mut self, options: DetectOverflowOptions) -> Self {
        self.overflow = options;
        self
    }

    async fn run<P: Platform>(
        &self,
        state: &MiddlewareState<'_, P>,
    ) -> Result<MiddlewareReturn, P::Error> {
        let overflow = detect_overflow(state, &self.overflow).await?;
        // Shift's main axis is the alignment axis; its cross axis is the side axis.
        let cross = state.placement.side_axis();
        let main = cross.opposite();

        let mut coords = state.coords();
        for (axis, enabled) in [(main, self.main_axis), (cross, self.cross_axis)] {
            if !enabled {
                continue;
            }
            let value = axis.coord(coords);
            let min = value + overflow[axis.min_side()];
            let max = value - overflow[axis.max_side()];
            axis.set_coord(&mut coords, clamp(min, value, max));
        }

        let limited = match &self.limiter {
            Some(limiter) => {
                let mut context = state.context();
                context.coords = coords;
                limiter.limit(&context, state.middleware_data)
            }
            None => coords,
        };

        let mut enabled = AxisFlags::empty();
        if self.main_axis {
            enabled |= AxisFlags::from(main);
        }
        if self.cross_axis {
            enabled |= AxisFlags::from(cross);
        }
        Ok(
            MiddlewareReturn::coords(limited).with_data(MiddlewarePayload::Shift(ShiftData {
                x: limited.x - state.x,
                y: limited.y - state.y,
                enabled,
            })),
        )
    }
}

impl<P: Platform> Middleware<P> for Shift {
    fn name(&self) -> &'static str {
        "shift"
    }

    fn compute<'a>(&'a self, state: &'a MiddlewareState<'a, P>) -> MiddlewareFuture<'a, P::Error>
    where
        P: 'a,
    {
        Box::pin(self.run(state))
    }
}

/// Offset used by [`LimitShift`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LimitShiftOffset {
    /// Main-axis offset; cross axis zero.
    Scalar(f64),
    /// Per-axis offsets.
    Axes {
        /// Offset along shift's main axis (the alignment axis).
        main_axis: f64,
        /// Offset along shift's cross axis (the side axis).
        cross_axis: f64,
    },
}

impl Default for LimitShiftOffset {
    fn default() -> Self {
        Self::Scalar(0.0)
    }
}

impl From<f64> for LimitShiftOffset {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

/// A [`Limiter`] that keeps the floating element tethered to the reference.
///
/// Shift stops once the floating element's edge would pass the reference's opposite edge, so
/// the two always overlap along the shifted axis (minus `offset`).
///
/// ```
/// use understory_floating::middleware::{LimitShift, Shift};
///
/// let shift = Shift::new().with_limiter(LimitShift::new().with_offset(10.0));
/// # let _ = shift;
/// ```
#[derive(Debug)]
pub struct LimitShift {
    offset: Derivable<LimitShiftOffset>,
    main_axis: bool,
    cross_axis: bool,
}

impl Default for LimitShift {
    fn default() -> Self {
        Self::new()
    }
}

impl LimitShift {
    /// Limit both axes with no offset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            offset: Derivable::Value(LimitShiftOffset::default()),
            main_axis: true,
            cross_axis: true,
        }
    }

    /// Fixed offset. Positive values stop shifting earlier.
    #[must_use]
    pub fn with_offset(mut self, offset: impl Into<LimitShiftOffset>) -> Self {
        self.offset = Derivable::Value(offset.into());
        self
    }

    /// Offset computed from the resolution state each time.
    #[must_use]
    pub fn with_derived_offset(
        mut self,
        f: impl Fn(&PlacementContext) -> LimitShiftOffset + 'static,
    ) -> Self {
        self.offset = Derivable::Derived(Box::new(f));
        self
    }

    /// Whether to limit the main axis. Default `true`.
    #[must_use]
    pub fn with_main_axis(mut self, enabled: bool) -> Self {
        self.main_axis = enabled;
        self
    }

    /// Whether to limit the cross axis. Default `true`.
    #[must_use]
    pub fn with_cross_axis(mut self, enabled: bool) -> Self {
        self.cross_axis = enabled;
        self
    }
}

/// Pull `value` back inside `[min, max]`, checking `min` first.
fn tether(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

impl Limiter for LimitShift {
    fn limit(&self, context: &PlacementContext, middleware_data: &MiddlewareData) -> Point {
        let rects = context.rects;
        let cross = context.placement.side_axis();
        let main = cross.opposite();
        let mut coords = context.coords;

        let (main_offset, cross_offset) = match self.offset.evaluate(context) {
            LimitShiftOffset::Scalar(v) => (v, 0.0),
            LimitShiftOffset::Axes {
                main_axis,
                cross_axis,
            } => (main_axis, cross_axis),
        };

        if self.main_axis {
            let len = main.length(rects.floating);
            let reference_start = main.start(rects.reference);
            let limit_min = reference_start - len + main_offset;
            let limit_max = reference_start + main.length(rects.reference) - main_offset;
            let value = main.coord(coords);
            main.set_coord(&mut coords, tether(value, limit_min, limit_max));
        }

        if self.cross_axis {
            let len = cross.length(rects.floating);
            let reference_start = cross.start(rects.reference);
            let is_origin_side = context.placement.side.is_origin_side();
            let applied = middleware_data
                .offset
                .as_ref()
                .map_or(0.0, |o| cross.coord(Point::new(o.x, o.y)));
            let (min_extra, max_extra) = if is_origin_side {
                (applied, -cross_offset)
            } else {
                (cross_offset, applied)
            };
            let limit_min = reference_start - len + min_extra;
            let limit_max = reference_start + cross.length(rects.reference) + max_extra;
            let value = cross.coord(coords);
            cross.set_coord(&mut coords, tether(value, limit_min, limit_max));
        }

        coords
    }
}
