// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Try fallback placements, in order, when the current one clips.
//!
//! Flip keeps its progress in [`FlipData`]: the candidate index and the overflow of every
//! candidate that did not fit. Each miss resets the pipeline to the next candidate so every
//! other middleware gets to weigh in on it. Once the list is exhausted the best candidate is
//! chosen and flip marks itself as done.

use alloc::boxed::Box;
use alloc::vec::Vec;

use super::{Middleware, MiddlewareFuture, MiddlewareReturn, MiddlewareState, Reset};
use crate::data::{FlipData, MiddlewarePayload, PlacementOverflow};
use crate::overflow::{DetectOverflowOptions, detect_overflow};
use crate::placement::{
    AxisSideDirection, alignment_sides, expanded_placements, opposite_axis_placements,
};
use crate::platform::Platform;
use crate::types::{Axis, Placement};

/// Whether [`Flip`] checks overflow along the alignment axis.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum FlipCrossAxis {
    /// Check both alignment sides.
    #[default]
    Enabled,
    /// Only check the side being placed on.
    Disabled,
    /// Check the alignment sides only while the candidate shares the initial placement's side
    /// axis.
    AlignmentOnly,
}

/// What [`Flip`] settles on when no candidate fits.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum FlipFallbackStrategy {
    /// The candidate with the least total clipping.
    #[default]
    BestFit,
    /// The requested placement.
    InitialPlacement,
}

/// Moves the floating element to a fallback placement when the current one overflows.
///
/// Candidates are the initial placement followed by the fallbacks. When no fallbacks are given
/// they default to the opposite side, or for aligned placements (with `flip_alignment`) to the
/// [expanded placements](crate::placement::expanded_placements).
#[derive(Clone, Debug)]
pub struct Flip {
    main_axis: bool,
    cross_axis: FlipCrossAxis,
    fallback_placements: Option<Vec<Placement>>,
    fallback_strategy: FlipFallbackStrategy,
    fallback_axis_side_direction: AxisSideDirection,
    flip_alignment: bool,
    overflow: DetectOverflowOptions,
}

impl Default for Flip {
    fn default() -> Self {
        Self::new()
    }
}

impl Flip {
    /// Flip with default options.
    #[must_use]
    pub fn new() -> Self {
        Self {
            main_axis: true,
            cross_axis: FlipCrossAxis::Enabled,
            fallback_placements: None,
            fallback_strategy: FlipFallbackStrategy::BestFit,
            fallback_axis_side_direction: AxisSideDirection::None,
            flip_alignment: true,
            overflow: DetectOverflowOptions::default(),
        }
    }

    /// Whether to check overflow on the side being placed on. Default `true`.
    #[must_use]
    pub fn with_main_axis(mut self, enabled: bool) -> Self {
        self.main_axis = enabled;
        self
    }

    /// How to check overflow along the alignment axis.
    #[must_use]
    pub fn with_cross_axis(mut self, cross_axis: FlipCrossAxis) -> Self {
        self.cross_axis = cross_axis;
        self
    }

    /// Explicit fallback placements, tried in order.
    #[must_use]
    pub fn with_fallback_placements(
        mut self,
        placements: impl IntoIterator<Item = Placement>,
    ) -> Self {
        self.fallback_placements = Some(placements.into_iter().collect());
        self
    }

    /// What to settle on when nothing fits.
    #[must_use]
    pub fn with_fallback_strategy(mut self, strategy: FlipFallbackStrategy) -> Self {
        self.fallback_strategy = strategy;
        self
    }

    /// Also try the perpendicular sides, starting from `direction`. Ignored when explicit
    /// fallbacks are given.
    #[must_use]
    pub fn with_fallback_axis_side_direction(mut self, direction: AxisSideDirection) -> Self {
        self.fallback_axis_side_direction = direction;
        self
    }

    /// Whether aligned placements may also try the opposite alignment. Default `true`.
    #[must_use]
    pub fn with_flip_alignment(mut self, enabled: bool) -> Self {
        self.flip_alignment = enabled;
        self
    }

    /// Options for the overflow check.
    #[must_use]
    pub fn with_overflow(mut self, options: DetectOverflowOptions) -> Self {
        self.overflow = options;
        self
    }

    fn candidates(&self, initial: Placement, rtl: bool) -> Vec<Placement> {
        let mut out = Vec::with_capacity(8);
        out.push(initial);
        match &self.fallback_placements {
            Some(fallbacks) => out.extend_from_slice(fallbacks),
            None => {
                if initial.alignment.is_none() || !self.flip_alignment {
                    out.push(initial.opposite());
                } else {
                    out.extend(expanded_placements(initial));
                }
                out.extend(opposite_axis_placements(
                    initial,
                    self.flip_alignment,
                    self.fallback_axis_side_direction,
                    rtl,
                ));
            }
        }
        out
    }

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
        let previous = data.flip.as_ref();
        if arrow_shifted || previous.is_some_and(|f| f.skip) {
            return Ok(MiddlewareReturn::none());
        }

        let placement = state.placement;
        let initial = state.initial_placement;
        let initial_axis = initial.side_axis();
        let rtl = state.platform.is_rtl(state.elements.floating).await?;
        let candidates = self.candidates(initial, rtl);

        let overflow = detect_overflow(state, &self.overflow).await?;
        let mut overflows = Vec::with_capacity(3);
        if self.main_axis {
            overflows.push(overflow[placement.side]);
        }
        let check_cross = match self.cross_axis {
            FlipCrossAxis::Enabled => true,
            FlipCrossAxis::Disabled => false,
            FlipCrossAxis::AlignmentOnly => placement.side_axis() == initial_axis,
        };
        if check_cross {
            let [main, other] = alignment_sides(placement, state.rects, rtl);
            overflows.push(overflow[main]);
            overflows.push(overflow[other]);
        }
        let current = PlacementOverflow {
            placement,
            overflows,
        };
        if current.fits() {
            return Ok(MiddlewareReturn::none());
        }

        let index = previous.map_or(0, |f| f.index);
        let mut tried: Vec<PlacementOverflow> =
            previous.map(|f| f.overflows.clone()).unwrap_or_default();
        tried.push(current);

        if let Some(&next) = candidates.get(index + 1) {
            return Ok(MiddlewareReturn::none()
                .with_data(MiddlewarePayload::Flip(FlipData {
                    index: index + 1,
                    overflows: tried,
                    skip: false,
                }))
                .with_reset(Reset::placement(next)));
        }

        let chosen = match self.fallback_strategy {
            FlipFallbackStrategy::BestFit => {
                let restrict = self.fallback_axis_side_direction != AxisSideDirection::None;
                best_fit(tried.iter().filter(|t| {
                    // With perpendicular fallbacks only consider the initial axis and the
                    // vertical one.
                    !restrict
                        || t.placement.side_axis() == initial_axis
                        || t.placement.side_axis() == Axis::Y
                }))
                .unwrap_or(initial)
            }
            FlipFallbackStrategy::InitialPlacement => initial,
        };
        tracing::debug!(%chosen, tried = tried.len(), "flip candidates exhausted");

        let ret = MiddlewareReturn::none().with_data(MiddlewarePayload::Flip(FlipData {
            index,
            overflows: tried,
            skip: true,
        }));
        Ok(if chosen == placement {
            ret
        } else {
            ret.with_reset(Reset::placement(chosen))
        })
    }
}

/// The candidate with the smallest total positive overflow; earlier candidates win ties.
pub(crate) fn best_fit<'a>(tried: impl Iterator<Item = &'a PlacementOverflow>) -> Option<Placement> {
    let mut best: Option<(&PlacementOverflow, f64)> = None;
    for t in tried {
        let total = t.total_positive();
        if best.is_none_or(|(_, b)| total < b) {
            best = Some((t, total));
        }
    }
    best.map(|(t, _)| t.placement)
}

impl<P: Platform> Middleware<P> for Flip {
    fn name(&self) -> &'static str {
        "flip"
    }

    fn compute<'a>(&'a self, state: &'a MiddlewareState<'a, P>) -> MiddlewareFuture<'a, P::Error>
    where
        P: 'a,
    {
        Box::pin(self.run(state))
    }
}
