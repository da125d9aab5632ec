// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Better positioning for references that span several lines of text.

use alloc::boxed::Box;
use alloc::vec::Vec;

use kurbo::{Point, Rect};

use super::{Middleware, MiddlewareFuture, MiddlewareReturn, MiddlewareState, Reset};
use crate::platform::Platform;
use crate::types::{Axis, ElementRects, Padding, Placement, Side, SideObject};

/// Replaces the reference rect with the part of a wrapped inline reference that the floating
/// element should attach to.
///
/// Uses [`Platform::get_client_rects`]. Rects are grouped into lines; with a pointer position and
/// two disjoint lines, the line under the pointer wins. Otherwise the first or last line is chosen
/// from the placement side.
#[derive(Copy, Clone, Debug)]
pub struct Inline {
    padding: Padding,
    point: Option<Point>,
}

impl Default for Inline {
    fn default() -> Self {
        Self::new()
    }
}

impl Inline {
    /// Default padding of 2 around each line for pointer hit testing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            padding: SideObject::uniform(2.0),
            point: None,
        }
    }

    /// Padding added around lines when hit testing the pointer.
    #[must_use]
    pub fn with_padding(mut self, padding: impl Into<Padding>) -> Self {
        self.padding = padding.into();
        self
    }

    /// Pointer position (e.g. of the hover that opened the floating element).
    #[must_use]
    pub fn with_point(mut self, point: impl Into<Option<Point>>) -> Self {
        self.point = point.into();
        self
    }

    fn choose(&self, placement: Placement, client_rects: &[Rect]) -> Option<Rect> {
        let fallback = bounding(client_rects)?;
        let lines = lines(client_rects);

        if let ([first, second], Some(point)) = (lines.as_slice(), self.point)
            && first.x0 > second.x1
        {
            let pad = self.padding;
            let hit = lines.iter().copied().find(|r| {
                point.x > r.x0 - pad.left
                    && point.x < r.x1 + pad.right
                    && point.y > r.y0 - pad.top
                    && point.y < r.y1 + pad.bottom
            });
            return Some(hit.unwrap_or(fallback));
        }

        let (Some(first), Some(last)) = (lines.first(), lines.last()) else {
            return Some(fallback);
        };
        if lines.len() < 2 {
            return Some(fallback);
        }

        if placement.side_axis() == Axis::Y {
            let edge = if placement.side == Side::Top { first } else { last };
            return Some(Rect::new(edge.x0, first.y0, edge.x1, last.y1));
        }

        let is_left = placement.side == Side::Left;
        let left = lines.iter().map(|r| r.x0).fold(f64::INFINITY, f64::min);
        let right = lines.iter().map(|r| r.x1).fold(f64::NEG_INFINITY, f64::max);
        let mut measured = lines
            .iter()
            .filter(|r| if is_left { r.x0 == left } else { r.x1 == right });
        let top = measured.next().copied().unwrap_or(*first);
        let bottom = measured.next_back().copied().unwrap_or(top);
        Some(Rect::new(left, top.y0, right, bottom.y1))
    }

    async fn run<P: Platform>(
        &self,
        state: &MiddlewareState<'_, P>,
    ) -> Result<MiddlewareReturn, P::Error> {
        let client_rects = state
            .platform
            .get_client_rects(state.elements.reference)
            .await?;
        let Some(reference) = self.choose(state.placement, &client_rects) else {
            return Ok(MiddlewareReturn::none());
        };
        if reference == state.rects.reference {
            return Ok(MiddlewareReturn::none());
        }
        tracing::trace!(?reference, lines = client_rects.len(), "inline reference");
        Ok(MiddlewareReturn::none().with_reset(Reset::rects(ElementRects {
            reference,
            floating: state.rects.floating,
        })))
    }
}

/// Union of all rects.
fn bounding(rects: &[Rect]) -> Option<Rect> {
    rects.iter().copied().reduce(|a, b| a.union(b))
}

/// Group rects into lines, top to bottom, each line being the bounds of its rects.
fn lines(rects: &[Rect]) -> Vec<Rect> {
    let mut sorted = rects.to_vec();
    sorted.sort_by(|a, b| a.y0.total_cmp(&b.y0));

    let mut lines: Vec<Rect> = Vec::new();
    let mut previous: Option<Rect> = None;
    for rect in sorted {
        let new_line = previous.is_none_or(|p| rect.y0 - p.y0 > p.height() / 2.0);
        match lines.last_mut() {
            Some(line) if !new_line => *line = line.union(rect),
            _ => lines.push(rect),
        }
        previous = Some(rect);
    }
    lines
}

impl<P: Platform> Middleware<P> for Inline {
    fn name(&self) -> &'static str {
        "inline"
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
    use crate::middleware::test_platform::{FLOATING, REFERENCE, TestPlatform, block_on};
    use alloc::vec;
    use kurbo::Size;

    // Text wrapping from the end of one line to the start of the next.
    const LINE_ONE: Rect = Rect::new(100.0, 0.0, 200.0, 20.0);
    const LINE_TWO: Rect = Rect::new(0.0, 20.0, 60.0, 40.0);

    #[test]
    fn groups_rects_into_lines() {
        let rects = [
            Rect::new(50.0, 2.0, 100.0, 22.0),
            Rect::new(0.0, 0.0, 50.0, 20.0),
            Rect::new(0.0, 30.0, 10.0, 50.0),
        ];
        assert_eq!(
            lines(&rects),
            vec![Rect::new(0.0, 0.0, 100.0, 22.0), Rect::new(0.0, 30.0, 10.0, 50.0)]
        );
    }

    #[test]
    fn vertical_sides_pick_nearest_line() {
        let inline = Inline::new();
        let rects = [LINE_ONE, LINE_TWO];
        assert_eq!(
            inline.choose(Placement::TOP, &rects),
            Some(Rect::new(100.0, 0.0, 200.0, 40.0))
        );
        assert_eq!(
            inline.choose(Placement::BOTTOM, &rects),
            Some(Rect::new(0.0, 0.0, 60.0, 40.0))
        );
    }

    #[test]
    fn horizontal_sides_span_lines_at_the_extreme() {
        let inline = Inline::new();
        let rects = [LINE_ONE, LINE_TWO];
        assert_eq!(
            inline.choose(Placement::RIGHT, &rects),
            Some(Rect::new(0.0, 0.0, 200.0, 20.0))
        );
        assert_eq!(
            inline.choose(Placement::LEFT, &rects),
            Some(Rect::new(0.0, 20.0, 200.0, 40.0))
        );
    }

    #[test]
    fn horizontal_sides_span_first_to_last_extreme_line() {
        let inline = Inline::new();
        let rects = [
            Rect::new(0.0, 0.0, 200.0, 20.0),
            Rect::new(0.0, 20.0, 120.0, 40.0),
            Rect::new(40.0, 40.0, 200.0, 60.0),
        ];
        assert_eq!(
            inline.choose(Placement::RIGHT, &rects),
            Some(Rect::new(0.0, 0.0, 200.0, 60.0))
        );
        assert_eq!(
            inline.choose(Placement::LEFT, &rects),
            Some(Rect::new(0.0, 0.0, 200.0, 40.0))
        );
    }

    #[test]
    fn pointer_selects_line_under_it() {
        let rects = [LINE_ONE, LINE_TWO];
        let inline = Inline::new().with_point(Point::new(30.0, 30.0));
        assert_eq!(inline.choose(Placement::TOP, &rects), Some(LINE_TWO));
        let missed = Inline::new().with_point(Point::new(80.0, 30.0));
        assert_eq!(
            missed.choose(Placement::TOP, &rects),
            Some(Rect::new(0.0, 0.0, 200.0, 40.0))
        );
    }

    #[test]
    fn single_line_and_empty() {
        let inline = Inline::new();
        let rects = [Rect::new(0.0, 0.0, 50.0, 20.0), Rect::new(50.0, 2.0, 100.0, 22.0)];
        assert_eq!(
            inline.choose(Placement::BOTTOM, &rects),
            Some(Rect::new(0.0, 0.0, 100.0, 22.0))
        );
        assert_eq!(inline.choose(Placement::BOTTOM, &[]), None);
    }

    #[test]
    fn resets_with_chosen_reference() {
        let mut p = TestPlatform::new(
            Rect::new(0.0, 0.0, 200.0, 40.0),
            Size::new(40.0, 10.0),
            Rect::new(0.0, 0.0, 500.0, 500.0),
        );
        p.client_rects = vec![LINE_ONE, LINE_TWO];
        let out = block_on(compute_position_async(
            &REFERENCE,
            &FLOATING,
            &ComputeConfig::new(&p).with_middleware(Inline::new()),
        ))
        .unwrap();
        assert_eq!((out.x, out.y), (10.0, 40.0));
        // The chosen rects were supplied directly; no second measurement.
        assert_eq!(p.rect_calls.get(), 1);
    }
}
