// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Signed overflow of an element against its clipping boundary.
//!
//! ## Sign convention
//!
//! Every side of the returned [`SideObject`] is the distance by which the tested element crosses
//! that side of the clipping rectangle:
//!
//! - positive: overflowing by that many units,
//! - zero: flush,
//! - negative: that much clearance remains.
//!
//! Padding shrinks the clipping rectangle, so it is added to every side.

use kurbo::Rect;

use crate::middleware::MiddlewareState;
use crate::platform::{Boundary, ClippingRectRequest, ConvertRectRequest, Platform, RootBoundary};
use crate::types::{Padding, SideObject};

/// Which element [`detect_overflow`] tests.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ElementContext {
    /// The floating element at the current coordinates.
    #[default]
    Floating,
    /// The reference element at its measured rect.
    Reference,
}

impl ElementContext {
    /// The other element.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Floating => Self::Reference,
            Self::Reference => Self::Floating,
        }
    }
}

/// Options for [`detect_overflow`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DetectOverflowOptions {
    /// Clipping boundary.
    pub boundary: Boundary,
    /// Root clipping boundary.
    pub root_boundary: RootBoundary,
    /// Element to test.
    pub element_context: ElementContext,
    /// Take the clipping boundary from the element opposite to `element_context`.
    pub alt_boundary: bool,
    /// Virtual padding applied inside the clipping rect.
    pub padding: Padding,
}

impl DetectOverflowOptions {
    /// Set the clipping boundary.
    #[must_use]
    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Set the root clipping boundary.
    #[must_use]
    pub fn with_root_boundary(mut self, root_boundary: RootBoundary) -> Self {
        self.root_boundary = root_boundary;
        self
    }

    /// Set the tested element.
    #[must_use]
    pub fn with_element_context(mut self, element_context: ElementContext) -> Self {
        self.element_context = element_context;
        self
    }

    /// Use the opposite element's clipping boundary.
    #[must_use]
    pub fn with_alt_boundary(mut self, alt_boundary: bool) -> Self {
        self.alt_boundary = alt_boundary;
        self
    }

    /// Set the padding.
    #[must_use]
    pub fn with_padding(mut self, padding: impl Into<Padding>) -> Self {
        self.padding = padding.into();
        self
    }
}

/// Compute how far the tested element overflows its clipping rect on each side.
///
/// The floating element is tested at `state`'s current coordinates with its measured size; the
/// reference is tested at its measured rect. Distances are divided by the scale of the floating
/// element's offset parent, when it has one.
///
/// # Errors
///
/// Returns any error produced by the platform.
pub async fn detect_overflow<P: Platform>(
    state: &MiddlewareState<'_, P>,
    options: &DetectOverflowOptions,
) -> Result<SideObject, P::Error> {
    let platform = state.platform;
    let elements = state.elements;
    let element_of = |context: ElementContext| match context {
        ElementContext::Floating => elements.floating,
        ElementContext::Reference => elements.reference,
    };

    let clipping_context = if options.alt_boundary {
        options.element_context.opposite()
    } else {
        options.element_context
    };
    let clip = platform
        .get_clipping_rect(ClippingRectRequest {
            element: element_of(clipping_context),
            boundary: options.boundary,
            root_boundary: options.root_boundary,
            strategy: state.strategy,
        })
        .await?;

    let rect = match options.element_context {
        ElementContext::Floating => {
            Rect::from_origin_size((state.x, state.y), state.rects.floating.size())
        }
        ElementContext::Reference => state.rects.reference,
    };

    let offset_parent = platform.get_offset_parent(elements.floating).await?;
    let scale = match &offset_parent {
        Some(parent) => platform.get_scale(parent).await?,
        None => kurbo::Vec2::new(1.0, 1.0),
    };
    let element = platform
        .convert_offset_parent_relative_rect_to_viewport_relative_rect(ConvertRectRequest {
            rect,
            offset_parent: offset_parent.as_ref(),
            strategy: state.strategy,
        })
        .await?
        .unwrap_or(rect);

    let pad = options.padding;
    Ok(SideObject {
        top: (clip.y0 - element.y0 + pad.top) / scale.y,
        bottom: (element.y1 - clip.y1 + pad.bottom) / scale.y,
        left: (clip.x0 - element.x0 + pad.left) / scale.x,
        right: (element.x1 - clip.x1 + pad.right) / scale.x,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MiddlewareData;
    use crate::middleware::test_platform::{TestPlatform, block_on, state};
    use crate::types::Placement;
    use kurbo::{Size, Vec2};

    fn platform() -> TestPlatform {
        TestPlatform::new(
            Rect::new(50.0, 50.0, 150.0, 100.0),
            Size::new(80.0, 30.0),
            Rect::new(0.0, 0.0, 200.0, 200.0),
        )
    }

    #[test]
    fn flush_with_clipping_rect_is_zero() {
        let p = TestPlatform::new(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Size::new(200.0, 200.0),
            Rect::new(0.0, 0.0, 200.0, 200.0),
        );
        let rects = p.rects();
        let data = MiddlewareData::default();
        let s = state(&p, &rects, &data, Placement::BOTTOM, (0.0, 0.0));
        let o = block_on(detect_overflow(&s, &DetectOverflowOptions::default())).unwrap();
        assert_eq!(o, SideObject::ZERO);
    }

    #[test]
    fn signs_follow_clipping() {
        let p = platform();
        let rects = p.rects();
        let data = MiddlewareData::default();
        // 80x30 at (-20, 180): 20 over on the left, 10 over at the bottom.
        let s = state(&p, &rects, &data, Placement::BOTTOM, (-20.0, 180.0));
        let o = block_on(detect_overflow(&s, &DetectOverflowOptions::default())).unwrap();
        assert_eq!(o, SideObject::new(-180.0, -140.0, 10.0, 20.0));
    }

    #[test]
    fn padding_adds_to_every_side() {
        let p = platform();
        let rects = p.rects();
        let data = MiddlewareData::default();
        let s = state(&p, &rects, &data, Placement::BOTTOM, (60.0, 100.0));
        let plain = block_on(detect_overflow(&s, &DetectOverflowOptions::default())).unwrap();
        let padded = block_on(detect_overflow(
            &s,
            &DetectOverflowOptions::default().with_padding(5.0),
        ))
        .unwrap();
        for side in crate::types::Side::ALL {
            assert_eq!(padded[side], plain[side] + 5.0);
        }
    }

    #[test]
    fn reference_context_tests_reference_rect() {
        let mut p = platform();
        p.reference_clipping = Some(Rect::new(0.0, 0.0, 100.0, 100.0));
        let rects = p.rects();
        let data = MiddlewareData::default();
        let s = state(&p, &rects, &data, Placement::BOTTOM, (0.0, 0.0));

        let own = block_on(detect_overflow(
            &s,
            &DetectOverflowOptions::default().with_element_context(ElementContext::Reference),
        ))
        .unwrap();
        assert_eq!(own.right, 50.0);

        // Alt boundary: reference measured against the floating element's clipping rect.
        let alt = block_on(detect_overflow(
            &s,
            &DetectOverflowOptions::default()
                .with_element_context(ElementContext::Reference)
                .with_alt_boundary(true),
        ))
        .unwrap();
        assert_eq!(alt.right, -50.0);
    }

    #[test]
    fn explicit_boundary_narrows_clipping() {
        let p = platform();
        let rects = p.rects();
        let data = MiddlewareData::default();
        let s = state(&p, &rects, &data, Placement::BOTTOM, (0.0, 0.0));
        let o = block_on(detect_overflow(
            &s,
            &DetectOverflowOptions::default()
                .with_boundary(Boundary::Rect(Rect::new(10.0, 0.0, 60.0, 200.0))),
        ))
        .unwrap();
        assert_eq!(o.left, 10.0);
        assert_eq!(o.right, 20.0);
    }

    #[test]
    fn root_boundary_reaches_platform() {
        let p = platform();
        let rects = p.rects();
        let data = MiddlewareData::default();
        let s = state(&p, &rects, &data, Placement::BOTTOM, (0.0, 0.0));
        let narrowed = block_on(detect_overflow(
            &s,
            &DetectOverflowOptions::default()
                .with_root_boundary(RootBoundary::Rect(Rect::new(10.0, 0.0, 60.0, 200.0))),
        ))
        .unwrap();
        assert_eq!(narrowed.left, 10.0);
        assert_eq!(narrowed.right, 20.0);

        let viewport = block_on(detect_overflow(
            &s,
            &DetectOverflowOptions::default().with_root_boundary(RootBoundary::Viewport),
        ))
        .unwrap();
        assert_eq!(viewport.left, 0.0);
        assert_eq!(viewport.right, -120.0);
    }

    #[test]
    fn offset_parent_scale_divides_distances() {
        let mut p = platform();
        p.offset_parent = Some(Size::new(400.0, 400.0));
        p.scale = Vec2::new(2.0, 4.0);
        let rects = p.rects();
        let data = MiddlewareData::default();
        let s = state(&p, &rects, &data, Placement::BOTTOM, (-20.0, 180.0));
        let o = block_on(detect_overflow(&s, &DetectOverflowOptions::default())).unwrap();
        assert_eq!(o.left, 10.0);
        assert_eq!(o.bottom, 2.5);
    }
}
