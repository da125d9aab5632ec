// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Translate the floating element away from (or along) the reference.

use alloc::boxed::Box;

use kurbo::Vec2;

use super::{Derivable, Middleware, MiddlewareFuture, MiddlewareReturn, MiddlewareState, PlacementContext};
use crate::data::{MiddlewarePayload, OffsetData};
use crate::platform::Platform;
use crate::types::{Alignment, Axis, Side};

/// Distance to translate by.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OffsetValue {
    /// Distance along the main axis, away from the reference.
    Scalar(f64),
    /// Per-axis distances.
    Axes {
        /// Distance along the side axis, away from the reference.
        main_axis: f64,
        /// Distance along the alignment axis.
        cross_axis: f64,
        /// For aligned placements, replaces `cross_axis` and is measured inwards from the aligned
        /// edge (negated for `End`).
        alignment_axis: Option<f64>,
    },
}

impl Default for OffsetValue {
    fn default() -> Self {
        Self::Scalar(0.0)
    }
}

impl From<f64> for OffsetValue {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

/// Translates the floating element.
///
/// Positive main-axis values always move the floating element away from the reference, whatever
/// the side. Usually placed first in the middleware list.
///
/// ```
/// use understory_floating::middleware::{Offset, OffsetValue};
///
/// let gap = Offset::new(8.0);
/// let skewed = Offset::new(OffsetValue::Axes {
///     main_axis: 8.0,
///     cross_axis: 4.0,
///     alignment_axis: None,
/// });
/// # let _ = (gap, skewed);
/// ```
#[derive(Debug)]
pub struct Offset {
    value: Derivable<OffsetValue>,
}

impl Offset {
    /// Translate by a fixed value.
    #[must_use]
    pub fn new(value: impl Into<OffsetValue>) -> Self {
        Self {
            value: Derivable::Value(value.into()),
        }
    }

    /// Translate by a value computed from the resolution state on every run.
    #[must_use]
    pub fn derived(f: impl Fn(&PlacementContext) -> OffsetValue + 'static) -> Self {
        Self {
            value: Derivable::Derived(Box::new(f)),
        }
    }
}

impl Default for Offset {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Translation for `value` at the context's placement.
fn offset_translation(context: &PlacementContext, value: OffsetValue, rtl: bool) -> Vec2 {
    let placement = context.placement;
    let is_vertical = placement.side_axis() == Axis::Y;
    let main_multi = match placement.side {
        Side::Left | Side::Top => -1.0,
        Side::Right | Side::Bottom => 1.0,
    };
    let cross_multi = if rtl && is_vertical { -1.0 } else { 1.0 };

    let (main, mut cross, alignment_axis) = match value {
        OffsetValue::Scalar(v) => (v, 0.0, None),
        OffsetValue::Axes {
            main_axis,
            cross_axis,
            alignment_axis,
        } => (main_axis, cross_axis, alignment_axis),
    };
    if let (Some(alignment), Some(a)) = (placement.alignment, alignment_axis) {
        cross = match alignment {
            Alignment::Start => a,
            Alignment::End => -a,
        };
    }

    if is_vertical {
        Vec2::new(cross * cross_multi, main * main_multi)
    } else {
        Vec2::new(main * main_multi, cross * cross_multi)
    }
}

impl Offset {
    async fn run<P: Platform>(
        &self,
        state: &MiddlewareState<'_, P>,
    ) -> Result<MiddlewareReturn, P::Error> {
        let data = state.middleware_data;
        let arrow_shifted = data
            .arrow
            .as_ref()
            .and_then(|a| a.alignment_offset)
            .is_some_and(|v| v != 0.0);
        let same_placement = data
            .offset
            .as_ref()
            .is_some_and(|o| o.placement == state.placement);
        if arrow_shifted && same_placement {
            return Ok(MiddlewareReturn::none());
        }

        let context = state.context();
        let rtl = state.platform.is_rtl(state.elements.floating).await?;
        let diff = offset_translation(&context, self.value.evaluate(&context), rtl);
        Ok(
            MiddlewareReturn::coords(context.coords + diff).with_data(MiddlewarePayload::Offset(
                OffsetData {
                    x: diff.x,
                    y: diff.y,
                    placement: state.placement,
                },
            )),
        )
    }
}

impl<P: Platform> Middleware<P> for Offset {
    fn name(&self) -> &'static str {
        "offset"
    }

    fn compute<'a>(&'a self, state: &'a MiddlewareState<'a, P>) -> MiddlewareFuture<'a, P::Error>
    where
        P: 'a,
    {
        Box::pin(self.run(state))
    }
}
