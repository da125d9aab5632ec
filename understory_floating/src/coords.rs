// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Base coordinates for a placement, before any middleware runs.

use kurbo::Point;

use crate::types::{Alignment, Axis, ElementRects, Placement, Side};

/// Compute the floating element's top-left offset for `placement`.
///
/// The floating element is centered on the reference along both axes, then pushed flush against
/// the requested side. An alignment moves it along the alignment axis so its leading (`Start`) or
/// trailing (`End`) edge lines up with the reference's. When `rtl` is set and the alignment axis
/// is horizontal, `Start` means the right edge.
///
/// Pure and total. Negative sizes produce meaningless but finite coordinates.
#[must_use]
pub fn compute_coords_from_placement(rects: &ElementRects, placement: Placement, rtl: bool) -> Point {
    let reference = rects.reference;
    let floating = rects.floating;
    let alignment_axis = placement.alignment_axis();

    let common_x = reference.x0 + reference.width() / 2.0 - floating.width() / 2.0;
    let common_y = reference.y0 + reference.height() / 2.0 - floating.height() / 2.0;
    let common_align =
        alignment_axis.length(reference) / 2.0 - alignment_axis.length(floating) / 2.0;

    let mut coords = match placement.side {
        Side::Top => Point::new(common_x, reference.y0 - floating.height()),
        Side::Bottom => Point::new(common_x, reference.y0 + reference.height()),
        Side::Right => Point::new(reference.x0 + reference.width(), common_y),
        Side::Left => Point::new(reference.x0 - floating.width(), common_y),
    };

    let direction = if rtl && alignment_axis == Axis::X {
        -1.0
    } else {
        1.0
    };
    let shift = match placement.alignment {
        Some(Alignment::Start) => -common_align * direction,
        Some(Alignment::End) => common_align * direction,
        None => 0.0,
    };
    match alignment_axis {
        Axis::X => coords.x += shift,
        Axis::Y => coords.y += shift,
    }
    coords
}
