// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Candidate placement lists used by the placement-searching middleware.

use alloc::vec::Vec;

use crate::types::{Alignment, Axis, ElementRects, Placement, Side};

/// Direction in which [`opposite_axis_placements`] orders the perpendicular sides.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum AxisSideDirection {
    /// Do not add perpendicular placements.
    #[default]
    None,
    /// Start with the logical start side (left in LTR, top for vertical axes).
    Start,
    /// Start with the logical end side.
    End,
}

/// The alignment-flipped placement, the opposite placement, and the opposite placement with its
/// alignment flipped, in that order.
#[must_use]
pub fn expanded_placements(placement: Placement) -> [Placement; 3] {
    let opposite = placement.opposite();
    [
        placement.opposite_alignment(),
        opposite,
        opposite.opposite_alignment(),
    ]
}

/// Placements on the sides perpendicular to `placement`'s side.
///
/// Aligned placements keep their alignment, and when `flip_alignment` is set the
/// alignment-flipped variants are appended.
#[must_use]
pub fn opposite_axis_placements(
    placement: Placement,
    flip_alignment: bool,
    direction: AxisSideDirection,
    rtl: bool,
) -> Vec<Placement> {
    if direction == AxisSideDirection::None {
        return Vec::new();
    }
    let is_start = direction == AxisSideDirection::Start;
    let sides: [Side; 2] = match placement.side {
        Side::Top | Side::Bottom => {
            let ltr = if is_start {
                [Side::Left, Side::Right]
            } else {
                [Side::Right, Side::Left]
            };
            if rtl { [ltr[1], ltr[0]] } else { ltr }
        }
        Side::Left | Side::Right => {
            if is_start {
                [Side::Top, Side::Bottom]
            } else {
                [Side::Bottom, Side::Top]
            }
        }
    };
    let mut out: Vec<Placement> = sides
        .iter()
        .map(|&side| Placement::new(side, placement.alignment))
        .collect();
    if placement.alignment.is_some() && flip_alignment {
        let flipped: Vec<Placement> = out.iter().map(|p| p.opposite_alignment()).collect();
        out.extend(flipped);
    }
    out
}

/// The two sides bounding the alignment axis, the "main" one first.
///
/// The main side is the one the floating element would overflow first given its alignment. When
/// the reference is longer than the floating element along that axis, the sides swap.
#[must_use]
pub fn alignment_sides(placement: Placement, rects: &ElementRects, rtl: bool) -> [Side; 2] {
    let axis = placement.alignment_axis();
    let leading = if rtl {
        Alignment::End
    } else {
        Alignment::Start
    };
    let mut main = match axis {
        Axis::X => {
            if placement.alignment == Some(leading) {
                Side::Right
            } else {
                Side::Left
            }
        }
        Axis::Y => {
            if placement.alignment == Some(Alignment::Start) {
                Side::Bottom
            } else {
                Side::Top
            }
        }
    };
    if axis.length(rects.reference) > axis.length(rects.floating) {
        main = main.opposite();
    }
    [main, main.opposite()]
}

/// Candidate list for auto placement.
///
/// Without a forced alignment only unaligned placements from `allowed` are kept. With one, the
/// placements carrying that alignment come first, followed (when `auto_alignment` is set) by
/// the aligned placements with the other alignment.
pub(crate) fn auto_placement_list(
    alignment: Option<Alignment>,
    auto_alignment: bool,
    allowed: &[Placement],
) -> Vec<Placement> {
    match alignment {
        None => allowed
            .iter()
            .copied()
            .filter(|p| p.alignment.is_none())
            .collect(),
        Some(a) => allowed
            .iter()
            .copied()
            .filter(|p| p.alignment == Some(a))
            .chain(allowed.iter().copied().filter(|p| p.alignment != Some(a)))
            .filter(|p| p.alignment == Some(a) || (auto_alignment && p.alignment.is_some()))
            .collect(),
    }
}
