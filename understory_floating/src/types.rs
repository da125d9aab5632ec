// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for positioning: sides, alignments, placements, rect pairs, and side offsets.
//!
//! A [`Placement`] is a `(side, alignment)` pair. Its axes are always derived from the side and
//! never stored: the side picks the axis the floating element is pushed along, and the
//! alignment (if any) applies along the other one.

use core::fmt;
use core::ops::{Index, IndexMut};
use core::str::FromStr;

use kurbo::{Point, Rect, Size};

/// One of the four sides of the reference element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    /// Above the reference.
    Top,
    /// To the right of the reference.
    Right,
    /// Below the reference.
    Bottom,
    /// To the left of the reference.
    Left,
}

impl Side {
    /// All sides in canonical order.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// The side across the reference from this one.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }

    /// The axis a floating element placed on this side is pushed along.
    ///
    /// `Top`/`Bottom` yield [`Axis::Y`], `Left`/`Right` yield [`Axis::X`].
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Top | Self::Bottom => Axis::Y,
            Self::Right | Self::Left => Axis::X,
        }
    }

    /// Whether this side lies toward the coordinate origin (`Top` or `Left`).
    #[must_use]
    pub const fn is_origin_side(self) -> bool {
        matches!(self, Self::Top | Self::Left)
    }

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

/// Alignment of the floating element along the side's cross axis.
///
/// An unaligned (centered) placement carries no alignment at all.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Alignment {
    /// Align with the leading edge of the reference.
    Start,
    /// Align with the trailing edge of the reference.
    End,
}

impl Alignment {
    /// The other alignment.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// A physical axis.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

impl Axis {
    /// The perpendicular axis.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }

    /// Origin of `rect` along this axis.
    pub(crate) fn start(self, rect: Rect) -> f64 {
        match self {
            Self::X => rect.x0,
            Self::Y => rect.y0,
        }
    }

    /// Length of `rect` along this axis.
    pub(crate) fn length(self, rect: Rect) -> f64 {
        match self {
            Self::X => rect.width(),
            Self::Y => rect.height(),
        }
    }

    /// Extent of `size` along this axis.
    pub(crate) fn size_length(self, size: Size) -> f64 {
        match self {
            Self::X => size.width,
            Self::Y => size.height,
        }
    }

    /// Component of `point` along this axis.
    pub(crate) fn coord(self, point: Point) -> f64 {
        match self {
            Self::X => point.x,
            Self::Y => point.y,
        }
    }

    /// Replace the component of `point` along this axis.
    pub(crate) fn set_coord(self, point: &mut Point, value: f64) {
        match self {
            Self::X => point.x = value,
            Self::Y => point.y = value,
        }
    }

    /// The side bounding this axis at its origin (`Left` or `Top`).
    pub(crate) const fn min_side(self) -> Side {
        match self {
            Self::X => Side::Left,
            Self::Y => Side::Top,
        }
    }

    /// The side bounding this axis away from its origin (`Right` or `Bottom`).
    pub(crate) const fn max_side(self) -> Side {
        match self {
            Self::X => Side::Right,
            Self::Y => Side::Bottom,
        }
    }
}

/// Where the floating element sits relative to the reference.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Placement {
    /// Side of the reference the floating element is placed on.
    pub side: Side,
    /// Optional alignment along the cross axis; `None` centers the floating element.
    pub alignment: Option<Alignment>,
}

impl Placement {
    /// `top`
    pub const TOP: Self = Self::new(Side::Top, None);
    /// `top-start`
    pub const TOP_START: Self = Self::new(Side::Top, Some(Alignment::Start));
    /// `top-end`
    pub const TOP_END: Self = Self::new(Side::Top, Some(Alignment::End));
    /// `right`
    pub const RIGHT: Self = Self::new(Side::Right, None);
    /// `right-start`
    pub const RIGHT_START: Self = Self::new(Side::Right, Some(Alignment::Start));
    /// `right-end`
    pub const RIGHT_END: Self = Self::new(Side::Right, Some(Alignment::End));
    /// `bottom`
    pub const BOTTOM: Self = Self::new(Side::Bottom, None);
    /// `bottom-start`
    pub const BOTTOM_START: Self = Self::new(Side::Bottom, Some(Alignment::Start));
    /// `bottom-end`
    pub const BOTTOM_END: Self = Self::new(Side::Bottom, Some(Alignment::End));
    /// `left`
    pub const LEFT: Self = Self::new(Side::Left, None);
    /// `left-start`
    pub const LEFT_START: Self = Self::new(Side::Left, Some(Alignment::Start));
    /// `left-end`
    pub const LEFT_END: Self = Self::new(Side::Left, Some(Alignment::End));

    /// Every placement, each side followed by its `start` and `end` variants.
    pub const ALL: [Self; 12] = [
        Self::TOP,
        Self::TOP_START,
        Self::TOP_END,
        Self::RIGHT,
        Self::RIGHT_START,
        Self::RIGHT_END,
        Self::BOTTOM,
        Self::BOTTOM_START,
        Self::BOTTOM_END,
        Self::LEFT,
        Self::LEFT_START,
        Self::LEFT_END,
    ];

    /// Create a placement from a side and optional alignment.
    #[must_use]
    pub const fn new(side: Side, alignment: Option<Alignment>) -> Self {
        Self { side, alignment }
    }

    /// Axis the side pushes along (the "main axis").
    #[must_use]
    pub const fn side_axis(self) -> Axis {
        self.side.axis()
    }

    /// Axis the alignment applies along.
    #[must_use]
    pub const fn alignment_axis(self) -> Axis {
        self.side.axis().opposite()
    }

    /// Same alignment, opposite side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        Self::new(self.side.opposite(), self.alignment)
    }

    /// Same side, opposite alignment. Unaligned placements are returned unchanged.
    #[must_use]
    pub const fn opposite_alignment(self) -> Self {
        match self.alignment {
            Some(a) => Self::new(self.side, Some(a.opposite())),
            None => self,
        }
    }

    /// The unaligned placement on the same side.
    #[must_use]
    pub const fn unaligned(self) -> Self {
        Self::new(self.side, None)
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::BOTTOM
    }
}

impl From<Side> for Placement {
    fn from(side: Side) -> Self {
        Self::new(side, None)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alignment {
            Some(a) => write!(f, "{}-{}", self.side.as_str(), a.as_str()),
            None => f.write_str(self.side.as_str()),
        }
    }
}

/// Error returned when parsing a [`Placement`] from an unrecognized string.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unrecognized placement (expected e.g. `bottom` or `top-start`)")]
pub struct ParsePlacementError;

impl FromStr for Placement {
    type Err = ParsePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (side, alignment) = match s.split_once('-') {
            Some((side, alignment)) => (side, Some(alignment)),
            None => (s, None),
        };
        let side = match side {
            "top" => Side::Top,
            "right" => Side::Right,
            "bottom" => Side::Bottom,
            "left" => Side::Left,
            _ => return Err(ParsePlacementError),
        };
        let alignment = match alignment {
            None => None,
            Some("start") => Some(Alignment::Start),
            Some("end") => Some(Alignment::End),
            Some(_) => return Err(ParsePlacementError),
        };
        Ok(Self::new(side, alignment))
    }
}

/// CSS positioning strategy of the floating element.
///
/// The engine only passes it through to the [platform](crate::platform::Platform) and echoes it in
/// the result.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Strategy {
    /// Positioned relative to the offset parent.
    #[default]
    Absolute,
    /// Positioned relative to the viewport.
    Fixed,
}

/// Measured rectangles of the two elements taking part in a resolution pass.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ElementRects {
    /// The anchor the floating element is positioned against.
    pub reference: Rect,
    /// The positioned element. Only its size is meaningful to the core.
    pub floating: Rect,
}

/// Signed per-side distances.
///
/// As an overflow result: positive means the element overflows the boundary on that side by that
/// amount, zero means flush, negative means that much clearance remains.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SideObject {
    /// Distance on the top side.
    pub top: f64,
    /// Distance on the right side.
    pub right: f64,
    /// Distance on the bottom side.
    pub bottom: f64,
    /// Distance on the left side.
    pub left: f64,
}

/// Per-side padding. A scalar converts to equal padding on every side.
pub type Padding = SideObject;

impl SideObject {
    /// All sides zero.
    pub const ZERO: Self = Self::uniform(0.0);

    /// Create from explicit per-side values.
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The same value on every side.
    #[must_use]
    pub const fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v)
    }

    /// Value for `side`.
    #[must_use]
    pub const fn get(&self, side: Side) -> f64 {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    /// True if any side is `>= 0`.
    pub(crate) fn any_non_negative(&self) -> bool {
        Side::ALL.iter().any(|&s| self.get(s) >= 0.0)
    }
}

impl From<f64> for SideObject {
    fn from(v: f64) -> Self {
        Self::uniform(v)
    }
}

impl Index<Side> for SideObject {
    type Output = f64;

    fn index(&self, side: Side) -> &f64 {
        match side {
            Side::Top => &self.top,
            Side::Right => &self.right,
            Side::Bottom => &self.bottom,
            Side::Left => &self.left,
        }
    }
}

impl IndexMut<Side> for SideObject {
    fn index_mut(&mut self, side: Side) -> &mut f64 {
        match side {
            Side::Top => &mut self.top,
            Side::Right => &mut self.right,
            Side::Bottom => &mut self.bottom,
            Side::Left => &mut self.left,
        }
    }
}

/// `clamp(min, value, max)` with `min` taking precedence when the range is inverted.
pub(crate) fn clamp(min: f64, value: f64, max: f64) -> f64 {
    min.max(value.min(max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_and_parse_agree() {
        for p in Placement::ALL {
            let s = p.to_string();
            assert_eq!(s.parse::<Placement>(), Ok(p), "round trip for {s}");
        }
        assert_eq!(Placement::BOTTOM_START.to_string(), "bottom-start");
        assert_eq!("left".parse::<Placement>(), Ok(Placement::LEFT));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!("middle".parse::<Placement>(), Err(ParsePlacementError));
        assert_eq!("top-center".parse::<Placement>(), Err(ParsePlacementError));
        assert_eq!("".parse::<Placement>(), Err(ParsePlacementError));
    }

    #[test]
    fn axes_derive_from_side() {
        assert_eq!(Placement::TOP_END.side_axis(), Axis::Y);
        assert_eq!(Placement::TOP_END.alignment_axis(), Axis::X);
        assert_eq!(Placement::LEFT.side_axis(), Axis::X);
        assert_eq!(Placement::LEFT.alignment_axis(), Axis::Y);
    }

    #[test]
    fn opposites() {
        assert_eq!(Placement::TOP_START.opposite(), Placement::BOTTOM_START);
        assert_eq!(
            Placement::TOP_START.opposite_alignment(),
            Placement::TOP_END
        );
        assert_eq!(Placement::RIGHT.opposite_alignment(), Placement::RIGHT);
        assert_eq!(Side::Left.opposite(), Side::Right);
    }

    #[test]
    fn side_object_indexing() {
        let mut s = SideObject::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(s[Side::Bottom], 3.0);
        s[Side::Left] = -1.0;
        assert_eq!(s.get(Side::Left), -1.0);
        assert_eq!(SideObject::from(5.0), SideObject::uniform(5.0));
    }

    #[test]
    fn clamp_prefers_min_on_inverted_range() {
        assert_eq!(clamp(0.0, -5.0, 10.0), 0.0);
        assert_eq!(clamp(0.0, 15.0, 10.0), 10.0);
        assert_eq!(clamp(10.0, 5.0, 0.0), 10.0);
    }
}
