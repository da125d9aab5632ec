// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-middleware data accumulated across a resolution.
//!
//! ## Merge semantics
//!
//! Every middleware may attach a [`MiddlewarePayload`] to its return value. The engine merges it
//! into the slot for that middleware in [`MiddlewareData`]; it never replaces the slot wholesale.
//! Optional keys missing from a newer payload keep the value recorded by an earlier invocation,
//! which is how a middleware tracks state ("which candidate am I on") across resets.
//!
//! Built-in middleware use typed slots. Custom middleware use [`MiddlewarePayload::Custom`], a
//! string-keyed [`DataMap`] stored under the middleware's name and extended on each merge.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use bitflags::bitflags;

use crate::types::{Axis, Placement, SideObject};

/// Overflow record for one placement tried by a placement-searching middleware.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementOverflow {
    /// The candidate placement.
    pub placement: Placement,
    /// Checked overflow values, main side first.
    pub overflows: Vec<f64>,
}

impl PlacementOverflow {
    /// Sum of the positive (clipping) overflow values.
    #[must_use]
    pub fn total_positive(&self) -> f64 {
        self.overflows.iter().filter(|v| **v > 0.0).sum()
    }

    /// True if no checked side overflows.
    #[must_use]
    pub fn fits(&self) -> bool {
        self.overflows.iter().all(|v| *v <= 0.0)
    }
}

/// Data recorded by [`Arrow`](crate::middleware::Arrow).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ArrowData {
    /// Arrow offset along x, when the alignment axis is horizontal.
    pub x: Option<f64>,
    /// Arrow offset along y, when the alignment axis is vertical.
    pub y: Option<f64>,
    /// How far the ideal (unclamped) center is from the applied offset.
    pub center_offset: f64,
    /// Shift applied to the floating element so an arrow can still point at a small reference.
    pub alignment_offset: Option<f64>,
}

/// Data recorded by [`Flip`](crate::middleware::Flip).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlipData {
    /// Index into the candidate list of the placement being tried.
    pub index: usize,
    /// Overflow of every candidate that did not fit, in the order tried.
    pub overflows: Vec<PlacementOverflow>,
    /// Set once the candidates are exhausted and a best fit was chosen.
    pub skip: bool,
}

/// Data recorded by [`AutoPlacement`](crate::middleware::AutoPlacement).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AutoPlacementData {
    /// Index into the candidate list of the next placement to measure.
    pub index: usize,
    /// Overflow of every candidate measured so far.
    pub overflows: Vec<PlacementOverflow>,
    /// Set once every candidate was measured and the best one chosen.
    pub skip: bool,
}

bitflags! {
    /// Physical axes a middleware acted on.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct AxisFlags: u8 {
        /// Horizontal axis.
        const X = 0b0000_0001;
        /// Vertical axis.
        const Y = 0b0000_0010;
    }
}

impl From<Axis> for AxisFlags {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::X,
            Axis::Y => Self::Y,
        }
    }
}

/// Data recorded by [`Shift`](crate::middleware::Shift).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShiftData {
    /// Horizontal displacement applied by shift (and its limiter).
    pub x: f64,
    /// Vertical displacement applied by shift (and its limiter).
    pub y: f64,
    /// Axes shift was allowed to constrain.
    pub enabled: AxisFlags,
}

/// Data recorded by [`Offset`](crate::middleware::Offset).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OffsetData {
    /// Horizontal translation applied.
    pub x: f64,
    /// Vertical translation applied.
    pub y: f64,
    /// Placement the translation was computed for.
    pub placement: Placement,
}

/// Data recorded by [`Size`](crate::middleware::Size).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SizeData {
    /// Width available to the floating element at its current placement.
    pub available_width: f64,
    /// Height available to the floating element at its current placement.
    pub available_height: f64,
}

/// Data recorded by [`Hide`](crate::middleware::Hide).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HideData {
    /// The reference is fully clipped on at least one side.
    pub reference_hidden: Option<bool>,
    /// Per-side distances used for `reference_hidden`; `>= 0` means fully clipped.
    pub reference_hidden_offsets: Option<SideObject>,
    /// The floating element has fully escaped the reference's clipping context.
    pub escaped: Option<bool>,
    /// Per-side distances used for `escaped`; `>= 0` means fully escaped.
    pub escaped_offsets: Option<SideObject>,
}

/// A value stored by custom middleware.
#[derive(Clone, Debug, PartialEq)]
pub enum DataValue {
    /// A number.
    Number(f64),
    /// A flag.
    Bool(bool),
    /// Free-form text.
    Text(String),
    /// A placement.
    Placement(Placement),
}

/// Open-ended key/value payload for custom middleware.
pub type DataMap = BTreeMap<String, DataValue>;

/// Payload a middleware attaches to its return value.
///
/// The typed variants belong to the built-in middleware of the same name (see
/// [`MiddlewarePayload::owner`]). Custom middleware report through [`MiddlewarePayload::Custom`].
#[derive(Clone, Debug, PartialEq)]
pub enum MiddlewarePayload {
    /// See [`ArrowData`].
    Arrow(ArrowData),
    /// See [`AutoPlacementData`].
    AutoPlacement(AutoPlacementData),
    /// See [`FlipData`].
    Flip(FlipData),
    /// See [`HideData`].
    Hide(HideData),
    /// See [`OffsetData`].
    Offset(OffsetData),
    /// See [`ShiftData`].
    Shift(ShiftData),
    /// See [`SizeData`].
    Size(SizeData),
    /// Custom data, merged key by key under the middleware's name.
    Custom(DataMap),
}

impl MiddlewarePayload {
    /// Name of the built-in middleware that owns this variant's slot, `None` for custom data.
    #[must_use]
    pub fn owner(&self) -> Option<&'static str> {
        Some(match self {
            Self::Arrow(_) => "arrow",
            Self::AutoPlacement(_) => "autoPlacement",
            Self::Flip(_) => "flip",
            Self::Hide(_) => "hide",
            Self::Offset(_) => "offset",
            Self::Shift(_) => "shift",
            Self::Size(_) => "size",
            Self::Custom(_) => return None,
        })
    }
}

/// Everything middleware recorded during a resolution, keyed by middleware.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MiddlewareData {
    /// Recorded by arrow.
    pub arrow: Option<ArrowData>,
    /// Recorded by auto placement.
    pub auto_placement: Option<AutoPlacementData>,
    /// Recorded by flip.
    pub flip: Option<FlipData>,
    /// Recorded by hide.
    pub hide: Option<HideData>,
    /// Recorded by offset.
    pub offset: Option<OffsetData>,
    /// Recorded by shift.
    pub shift: Option<ShiftData>,
    /// Recorded by size.
    pub size: Option<SizeData>,
    /// Recorded by custom middleware, keyed by middleware name.
    pub custom: BTreeMap<&'static str, DataMap>,
}

impl MiddlewareData {
    /// Data recorded by the custom middleware called `name`.
    #[must_use]
    pub fn custom(&self, name: &str) -> Option<&DataMap> {
        self.custom.get(name)
    }

    /// Merge `payload`, produced by the middleware called `name`, into the accumulated data.
    ///
    /// A typed payload from a middleware other than its [`owner`](MiddlewarePayload::owner) is
    /// dropped, so a custom middleware cannot overwrite a built-in slot.
    pub fn merge(&mut self, name: &'static str, payload: MiddlewarePayload) {
        if let Some(owner) = payload.owner().filter(|owner| *owner != name) {
            tracing::warn!(
                middleware = name,
                owner,
                "typed payload from a foreign middleware dropped"
            );
            return;
        }
        match payload {
            MiddlewarePayload::Arrow(new) => {
                if let Some(old) = &mut self.arrow {
                    if new.x.is_some() {
                        old.x = new.x;
                    }
                    if new.y.is_some() {
                        old.y = new.y;
                    }
                    old.center_offset = new.center_offset;
                    if new.alignment_offset.is_some() {
                        old.alignment_offset = new.alignment_offset;
                    }
                } else {
                    self.arrow = Some(new);
                }
            }
            MiddlewarePayload::Hide(new) => {
                if let Some(old) = &mut self.hide {
                    if new.reference_hidden.is_some() {
                        old.reference_hidden = new.reference_hidden;
                        old.reference_hidden_offsets = new.reference_hidden_offsets;
                    }
                    if new.escaped.is_some() {
                        old.escaped = new.escaped;
                        old.escaped_offsets = new.escaped_offsets;
                    }
                } else {
                    self.hide = Some(new);
                }
            }
            MiddlewarePayload::AutoPlacement(new) => self.auto_placement = Some(new),
            MiddlewarePayload::Flip(new) => self.flip = Some(new),
            MiddlewarePayload::Offset(new) => self.offset = Some(new),
            MiddlewarePayload::Shift(new) => self.shift = Some(new),
            MiddlewarePayload::Size(new) => self.size = Some(new),
            MiddlewarePayload::Custom(map) => {
                self.custom.entry(name).or_default().extend(map);
            }
        }
    }
}
