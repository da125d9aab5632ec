// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Report the space available to the floating element and let the caller resize it.

use alloc::boxed::Box;
use core::fmt;

use super::{Middleware, MiddlewareFuture, MiddlewareReturn, MiddlewareState, PlacementContext, Reset};
use crate::data::{AxisFlags, MiddlewarePayload, SizeData};
use crate::overflow::{DetectOverflowOptions, detect_overflow};
use crate::platform::Platform;
use crate::types::{Alignment, Axis, Side};

/// Space available to the floating element, passed to the [`Size`] callback.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AvailableSize {
    /// Width the floating element may grow to at its current placement.
    pub available_width: f64,
    /// Height the floating element may grow to at its current placement.
    pub available_height: f64,
    /// Resolution state when the sizes were measured.
    pub context: PlacementContext,
}

/// Measures the available space and hands it to a callback that may resize the floating element.
///
/// If the floating element's dimensions change after the callback runs, the resolution is
/// restarted with fresh measurements.
///
/// ```
/// use understory_floating::middleware::Size;
///
/// let size = Size::new().with_apply(|available| {
///     // Constrain the floating element, e.g. set a max height on it.
///     let _ = available.available_height;
/// });
/// # let _ = size;
/// ```
pub struct Size {
    apply: Option<Box<dyn Fn(&AvailableSize)>>,
    overflow: DetectOverflowOptions,
}

impl fmt::Debug for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Size")
            .field("apply", &self.apply.is_some())
            .field("overflow", &self.overflow)
            .finish()
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new()
    }
}

impl Size {
    /// Only record the available space.
    #[must_use]
    pub fn new() -> Self {
        Self {
            apply: None,
            overflow: DetectOverflowOptions::default(),
        }
    }

    /// Called with the available space on every run.
    #[must_use]
    pub fn with_apply(mut self, apply: impl Fn(&AvailableSize) + 'static) -> Self {
        self.apply = Some(Box::new(apply));
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
        let placement = state.placement;
        let alignment = placement.alignment;
        let is_y_axis = placement.side_axis() == Axis::Y;
        let width = state.rects.floating.width();
        let height = state.rects.floating.height();

        let (height_side, width_side) = if is_y_axis {
            let rtl = state.platform.is_rtl(state.elements.floating).await?;
            let trailing = if rtl { Alignment::Start } else { Alignment::End };
            let width_side = if alignment == Some(trailing) {
                Side::Left
            } else {
                Side::Right
            };
            (placement.side, width_side)
        } else {
            let height_side = if alignment == Some(Alignment::End) {
                Side::Top
            } else {
                Side::Bottom
            };
            (height_side, placement.side)
        };

        let max_height = height - overflow.top - overflow.bottom;
        let max_width = width - overflow.left - overflow.right;
        let mut available_height = (height - overflow[height_side]).min(max_height);
        let mut available_width = (width - overflow[width_side]).min(max_width);

        let shift = state.middleware_data.shift.as_ref();
        if shift.is_some_and(|s| s.enabled.contains(AxisFlags::X)) {
            available_width = max_width;
        }
        if shift.is_some_and(|s| s.enabled.contains(AxisFlags::Y)) {
            available_height = max_height;
        }
        if shift.is_none() && alignment.is_none() {
            // Centered placements can grow symmetrically on the cross axis.
            let symmetric = |start: f64, end: f64| {
                let (min, max) = (start.max(0.0), end.max(0.0));
                if min != 0.0 || max != 0.0 {
                    min + max
                } else {
                    start.max(end)
                }
            };
            if is_y_axis {
                available_width = width - 2.0 * symmetric(overflow.left, overflow.right);
            } else {
                available_height = height - 2.0 * symmetric(overflow.top, overflow.bottom);
            }
        }

        if let Some(apply) = &self.apply {
            apply(&AvailableSize {
                available_width,
                available_height,
                context: state.context(),
            });
        }

        let next = state.platform.get_dimensions(state.elements.floating).await?;
        let ret = MiddlewareReturn::none().with_data(MiddlewarePayload::Size(SizeData {
            available_width,
            available_height,
        }));
        Ok(if next.width != width || next.height != height {
            ret.with_reset(Reset::remeasure())
        } else {
            ret
        })
    }
}

impl<P: Platform> Middleware<P> for Size {
    fn name(&self) -> &'static str {
        "size"
    }

    fn compute<'a>(&'a self, state: &'a MiddlewareState<'a, P>) -> MiddlewareFuture<'a, P::Error>
    where
        P: 'a,
    {
        Box::pin(self.run(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{ComputeConfig, compute_position_async};
    use crate::data::{MiddlewareData, ShiftData};
    use crate::middleware::test_platform::{
        FLOATING, REFERENCE, TestPlatform, block_on, state,
    };
    use crate::types::Placement;
    use alloc::rc::Rc;
    use core::cell::Cell;
    use kurbo::Rect;

    fn platform() -> TestPlatform {
        TestPlatform::new(
            Rect::new(50.0, 50.0, 150.0, 100.0),
            kurbo::Size::new(80.0, 30.0),
            Rect::new(0.0, 0.0, 200.0, 200.0),
        )
    }

    fn measure(
        p: &TestPlatform,
        data: &MiddlewareData,
        placement: Placement,
        coords: (f64, f64),
    ) -> SizeData {
        let rects = p.rects();
        let s = state(p, &rects, data, placement, coords);
        let ret = block_on(Middleware::<TestPlatform>::compute(&Size::new(), &s)).unwrap();
        assert!(ret.reset.is_none(), "dimensions did not change");
        match ret.data {
            Some(MiddlewarePayload::Size(d)) => d,
            other => panic!("unexpected data {other:?}"),
        }
    }

    #[test]
    fn centered_placement_grows_symmetrically() {
        let p = platform();
        let d = measure(&p, &MiddlewareData::default(), Placement::BOTTOM, (60.0, 100.0));
        assert_eq!(d.available_height, 100.0);
        assert_eq!(d.available_width, 200.0);

        // Off-center: limited by twice the nearer edge.
        let d = measure(&p, &MiddlewareData::default(), Placement::BOTTOM, (20.0, 100.0));
        assert_eq!(d.available_width, 120.0);
    }

    #[test]
    fn aligned_placement_grows_away_from_aligned_edge() {
        let p = platform();
        let d = measure(
            &p,
            &MiddlewareData::default(),
            Placement::BOTTOM_START,
            (20.0, 100.0),
        );
        assert_eq!(d.available_width, 180.0);

        let mut rtl = platform();
        rtl.rtl = true;
        let d = measure(
            &rtl,
            &MiddlewareData::default(),
            Placement::BOTTOM_START,
            (20.0, 100.0),
        );
        assert_eq!(d.available_width, 100.0);
    }

    #[test]
    fn shifted_axis_uses_whole_boundary() {
        let p = platform();
        let data = MiddlewareData {
            shift: Some(ShiftData {
                x: 0.0,
                y: 0.0,
                enabled: AxisFlags::X,
            }),
            ..MiddlewareData::default()
        };
        let d = measure(&p, &data, Placement::BOTTOM, (20.0, 100.0));
        assert_eq!(d.available_width, 200.0);
        assert_eq!(d.available_height, 100.0);
    }

    #[test]
    fn resize_in_apply_triggers_remeasure() {
        let p = TestPlatform::new(
            Rect::new(50.0, 50.0, 150.0, 100.0),
            kurbo::Size::new(80.0, 30.0),
            Rect::new(0.0, 0.0, 200.0, 120.0),
        );
        let floating = Rc::clone(&p.floating);
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let size = Size::new().with_apply(move |available| {
            seen.set(seen.get() + 1);
            let height = available.available_height.min(30.0);
            floating.set(kurbo::Size::new(80.0, height));
        });
        let out = block_on(compute_position_async(
            &REFERENCE,
            &FLOATING,
            &ComputeConfig::new(&p).with_middleware(size),
        ))
        .unwrap();
        assert_eq!(
            out.middleware_data.size,
            Some(SizeData {
                available_width: 200.0,
                available_height: 20.0,
            })
        );
        assert_eq!(calls.get(), 2);
        assert_eq!(p.rect_calls.get(), 2);
        assert_eq!(p.floating.get(), kurbo::Size::new(80.0, 20.0));
    }
}
