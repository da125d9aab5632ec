// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The measurement boundary between the positioning core and a UI toolkit.
//!
//! ## Overview
//!
//! The core never measures anything itself. Every rectangle, clipping area, scale, and element
//! size comes from a [`Platform`] implementation supplied by the embedder: a DOM binding, a
//! retained-mode scene, or a test double.
//!
//! Each method returns a future so adapters may suspend while measuring. Synchronous adapters
//! simply write `async fn` bodies that complete immediately; the blocking engine
//! ([`compute_position`](crate::compute_position)) drives them without ever parking.
//!
//! ## Contract
//!
//! - Calls are reads. The engine may issue the same call many times per pass and expects the
//!   same answer each time within one resolution.
//! - Errors propagate unchanged to the caller of the engine; the core never retries.
//! - All rectangles handed back share one coordinate space of the adapter's choosing (viewport or
//!   offset-parent relative). The core is agnostic as long as it is consistent.

use alloc::vec::Vec;
use core::future::{Future, ready};

use kurbo::{Rect, Size, Vec2};

use crate::types::{ElementRects, Strategy};

/// Region whose clipping ancestors limit where the floating element may be visible.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Boundary {
    /// The element's overflow ancestors, as determined by the platform.
    #[default]
    ClippingAncestors,
    /// An explicit rectangle in the platform's coordinate space.
    Rect(Rect),
}

/// Outermost clipping area intersected with the [`Boundary`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum RootBoundary {
    /// The visible viewport.
    #[default]
    Viewport,
    /// The whole scrollable document.
    Document,
    /// An explicit rectangle in the platform's coordinate space.
    Rect(Rect),
}

/// Request handed to [`Platform::get_clipping_rect`].
#[derive(Debug)]
pub struct ClippingRectRequest<'a, E> {
    /// Element whose clipping ancestors apply.
    pub element: &'a E,
    /// Boundary to clip against.
    pub boundary: Boundary,
    /// Root boundary to clip against.
    pub root_boundary: RootBoundary,
    /// Positioning strategy of the floating element.
    pub strategy: Strategy,
}

/// Request handed to
/// [`Platform::convert_offset_parent_relative_rect_to_viewport_relative_rect`].
#[derive(Debug)]
pub struct ConvertRectRequest<'a, E> {
    /// The rectangle to convert, relative to `offset_parent`.
    pub rect: Rect,
    /// Offset parent of the floating element, if the platform reported one.
    pub offset_parent: Option<&'a E>,
    /// Positioning strategy of the floating element.
    pub strategy: Strategy,
}

/// Measurement provider queried by the engine and middleware.
///
/// Only the first three methods are required. The rest have neutral defaults that describe a
/// left-to-right, unscaled world without offset parents.
pub trait Platform {
    /// Handle to a measurable element.
    type Element;
    /// Error produced when a measurement fails.
    type Error;

    /// Measure the reference and floating elements.
    ///
    /// The reference rect is positioned in the platform's coordinate space; only the size of the
    /// floating rect is used.
    fn get_element_rects(
        &self,
        reference: &Self::Element,
        floating: &Self::Element,
        strategy: Strategy,
    ) -> impl Future<Output = Result<ElementRects, Self::Error>>;

    /// The clipping rectangle for `request.element` given the boundaries.
    fn get_clipping_rect(
        &self,
        request: ClippingRectRequest<'_, Self::Element>,
    ) -> impl Future<Output = Result<Rect, Self::Error>>;

    /// Current size of `element`.
    fn get_dimensions(
        &self,
        element: &Self::Element,
    ) -> impl Future<Output = Result<Size, Self::Error>>;

    /// Whether `element` lays out right-to-left.
    fn is_rtl(&self, element: &Self::Element) -> impl Future<Output = Result<bool, Self::Error>> {
        let _ = element;
        ready(Ok(false))
    }

    /// Offset parent of `element`, if any.
    fn get_offset_parent(
        &self,
        element: &Self::Element,
    ) -> impl Future<Output = Result<Option<Self::Element>, Self::Error>> {
        let _ = element;
        ready(Ok(None))
    }

    /// Scale applied to `element`'s content. Overflow distances are divided by it.
    fn get_scale(&self, element: &Self::Element) -> impl Future<Output = Result<Vec2, Self::Error>> {
        let _ = element;
        ready(Ok(Vec2::new(1.0, 1.0)))
    }

    /// Convert a rect relative to the floating element's offset parent into the clipping rect's
    /// coordinate space. `None` means the rect is already in that space.
    fn convert_offset_parent_relative_rect_to_viewport_relative_rect(
        &self,
        request: ConvertRectRequest<'_, Self::Element>,
    ) -> impl Future<Output = Result<Option<Rect>, Self::Error>> {
        let _ = request;
        ready(Ok(None))
    }

    /// Per-line boxes of an inline `element`, in the same space as [`ElementRects::reference`].
    fn get_client_rects(
        &self,
        element: &Self::Element,
    ) -> impl Future<Output = Result<Vec<Rect>, Self::Error>> {
        let _ = element;
        ready(Ok(Vec::new()))
    }

    /// Inner (client) size of `element`, excluding borders and scrollbars, if known.
    fn get_client_size(
        &self,
        element: &Self::Element,
    ) -> impl Future<Output = Result<Option<Size>, Self::Error>> {
        let _ = element;
        ready(Ok(None))
    }
}
