// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position an arrow element so it points at the center of the reference.

use alloc::boxed::Box;

use super::{Middleware, MiddlewareFuture, MiddlewareReturn, MiddlewareState, Reset};
use crate::data::{ArrowData, MiddlewarePayload};
use crate::platform::Platform;
use crate::types::{Axis, Padding, SideObject, clamp};

/// Computes the offset of an arrow inside the floating element, along the alignment axis.
///
/// The arrow stays `padding` away from the floating element's edges. When the reference is
/// too small for that with an aligned placement, the floating element itself is nudged once so
/// the arrow can still point at the reference; see [`ArrowData::alignment_offset`].
///
/// Place it after [`Shift`](super::Shift) and the placement-changing middleware so it sees the
/// final coordinates.
#[derive(Clone, Debug)]
pub struct Arrow<E> {
    element: E,
    padding: Padding,
}

impl<E> Arrow<E> {
    /// An arrow for `element`, with no padding.
    #[must_use]
    pub fn new(element: E) -> Self {
        Self {
            element,
            padding: SideObject::ZERO,
        }
    }

    /// Minimum distance between the arrow and the floating element's edges.
    #[must_use]
    pub fn with_padding(mut self, padding: impl Into<Padding>) -> Self {
        self.padding = padding.into();
        self
    }

    async fn run<P: Platform<Element = E>>(
        &self,
        state: &MiddlewareState<'_, P>,
    ) -> Result<MiddlewareReturn, P::Error> {
        let platform = state.platform;
        let placement = state.placement;
        let rects = state.rects;
        let axis = placement.alignment_axis();
        let coords = state.coords();

        let arrow_len = axis.size_length(platform.get_dimensions(&self.element).await?);
        let reference_len = axis.length(rects.reference);
        let reference_start = axis.start(rects.reference);
        let floating_len = axis.length(rects.floating);
        let coord = axis.coord(coords);

        let end_diff = reference_len + reference_start - coord - floating_len;
        let start_diff = coord - reference_start;

        let parent_size = match platform.get_offset_parent(&self.element).await? {
            Some(parent) => platform.get_client_size(&parent).await?,
            None => None,
        };
        let client_size = match parent_size.map(|s| axis.size_length(s)) {
            Some(len) if len != 0.0 => len,
            _ => match platform
                .get_client_size(state.elements.floating)
                .await?
                .map(|s| axis.size_length(s))
            {
                Some(len) if len != 0.0 => len,
                _ => floating_len,
            },
        };

        let center_to_reference = end_diff / 2.0 - start_diff / 2.0;
        // Padding never pushes the arrow past the middle of the floating element.
        let largest_padding = client_size / 2.0 - arrow_len / 2.0 - 1.0;
        let min_padding = self.padding[axis.min_side()].min(largest_padding);
        let max_padding = self.padding[axis.max_side()].min(largest_padding);

        let min = min_padding;
        let max = client_size - arrow_len - max_padding;
        let center = client_size / 2.0 - arrow_len / 2.0 + center_to_reference;
        let offset = clamp(min, center, max);

        let edge_padding = if center < min { min_padding } else { max_padding };
        let should_add_offset = state.middleware_data.arrow.is_none()
            && placement.alignment.is_some()
            && center != offset
            && reference_len / 2.0 - edge_padding - arrow_len / 2.0 < 0.0;
        let alignment_offset = if !should_add_offset {
            0.0
        } else if center < min {
            center - min
        } else {
            center - max
        };

        let data = ArrowData {
            x: (axis == Axis::X).then_some(offset),
            y: (axis == Axis::Y).then_some(offset),
            center_offset: center - offset - alignment_offset,
            alignment_offset: should_add_offset.then_some(alignment_offset),
        };
        let moved = coord + alignment_offset;
        let mut ret = MiddlewareReturn::none().with_data(MiddlewarePayload::Arrow(data));
        match axis {
            Axis::X => ret.x = Some(moved),
            Axis::Y => ret.y = Some(moved),
        }
        if should_add_offset {
            ret = ret.with_reset(Reset::Restart);
        }
        Ok(ret)
    }
}

impl<E, P: Platform<Element = E>> Middleware<P> for Arrow<E> {
    fn name(&self) -> &'static str {
        "arrow"
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
    use crate::compute::{ComputeConfig, compute_position_async_with_trace};
    use crate::data::MiddlewareData;
    use crate::middleware::test_platform::{
        El, FLOATING, REFERENCE, TestPlatform, block_on, state,
    };
    use crate::trace::RecordingTrace;
    use crate::types::Placement;
    use kurbo::{Rect, Size};

    fn platform(reference: Rect) -> TestPlatform {
        let mut p = TestPlatform::new(
            reference,
            Size::new(80.0, 30.0),
            Rect::new(0.0, 0.0, 500.0, 500.0),
        );
        p.arrow = Size::new(10.0, 5.0);
        p
    }

    fn apply(
        p: &TestPlatform,
        arrow: &Arrow<El>,
        placement: Placement,
        coords: (f64, f64),
    ) -> MiddlewareReturn {
        let rects = p.rects();
        let data = MiddlewareData::default();
        let s = state(p, &rects, &data, placement, coords);
        block_on(Middleware::<TestPlatform>::compute(arrow, &s)).unwrap()
    }

    fn arrow_data(ret: &MiddlewareReturn) -> ArrowData {
        match &ret.data {
            Some(MiddlewarePayload::Arrow(d)) => *d,
            other => panic!("unexpected data {other:?}"),
        }
    }

    #[test]
    fn centered_on_reference() {
        let p = platform(Rect::new(50.0, 50.0, 150.0, 100.0));
        let ret = apply(&p, &Arrow::new(El::Arrow), Placement::BOTTOM, (60.0, 100.0));
        let d = arrow_data(&ret);
        assert_eq!(d.x, Some(35.0));
        assert_eq!(d.y, None);
        assert_eq!(d.center_offset, 0.0);
        assert_eq!(d.alignment_offset, None);
        assert_eq!(ret.x, Some(60.0));
        assert!(ret.reset.is_none());
    }

    #[test]
    fn clamped_to_floating_edge_after_shift() {
        let p = platform(Rect::new(50.0, 50.0, 150.0, 100.0));
        let ret = apply(&p, &Arrow::new(El::Arrow), Placement::BOTTOM, (0.0, 100.0));
        let d = arrow_data(&ret);
        assert_eq!(d.x, Some(70.0));
        assert_eq!(d.center_offset, 25.0);
        assert_eq!(d.alignment_offset, None);
    }

    #[test]
    fn vertical_alignment_axis_for_side_placements() {
        let p = platform(Rect::new(50.0, 50.0, 150.0, 100.0));
        // Floating 30 tall next to a 50 tall reference, centered at y = 60.
        let ret = apply(&p, &Arrow::new(El::Arrow), Placement::RIGHT, (150.0, 60.0));
        let d = arrow_data(&ret);
        assert_eq!(d.x, None);
        assert_eq!(d.y, Some(12.5));
        assert_eq!(ret.y, Some(60.0));
    }

    #[test]
    fn offset_parent_client_size_wins() {
        let mut p = platform(Rect::new(50.0, 50.0, 150.0, 100.0));
        p.offset_parent = Some(Size::new(200.0, 100.0));
        let ret = apply(&p, &Arrow::new(El::Arrow), Placement::BOTTOM, (60.0, 100.0));
        assert_eq!(arrow_data(&ret).x, Some(95.0));
    }

    #[test]
    fn small_reference_nudges_floating_element() {
        let p = platform(Rect::new(100.0, 50.0, 110.0, 60.0));
        let arrow = Arrow::new(El::Arrow).with_padding(20.0);
        let ret = apply(&p, &arrow, Placement::BOTTOM_START, (100.0, 60.0));
        let d = arrow_data(&ret);
        assert_eq!(d.x, Some(20.0));
        assert_eq!(d.alignment_offset, Some(-20.0));
        assert_eq!(d.center_offset, 0.0);
        assert_eq!(ret.x, Some(80.0));
        assert_eq!(ret.reset, Some(Reset::Restart));
    }

    #[test]
    fn nudge_happens_once_per_resolution() {
        let p = platform(Rect::new(100.0, 50.0, 110.0, 60.0));
        let mut trace = RecordingTrace::new();
        let out = block_on(compute_position_async_with_trace(
            &REFERENCE,
            &FLOATING,
            &ComputeConfig::new(&p)
                .with_placement(Placement::BOTTOM_START)
                .with_middleware(Arrow::new(El::Arrow).with_padding(20.0)),
            &mut trace,
        ))
        .unwrap();
        assert_eq!(out.x, 80.0);
        assert_eq!(trace.reset_count(), 1);
        let d = out.middleware_data.arrow.unwrap();
        assert_eq!(d.x, Some(20.0));
        assert_eq!(d.center_offset, 0.0);
        assert_eq!(d.alignment_offset, Some(-20.0));
    }
}
