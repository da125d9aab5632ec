// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pick the placement with the most room, measuring every candidate.
//!
//! Unlike [`Flip`](super::Flip), which stops at the first candidate that fits, auto placement
//! visits every candidate once (one reset per candidate), records its overflow in
//! [`AutoPlacementData`], and then resets to the best one.

use alloc::boxed::Box;
use alloc::vec::Vec;

use super::flip::best_fit;
use super::{Middleware, MiddlewareFuture, MiddlewareReturn, MiddlewareState, Reset};
use crate::data::{AutoPlacementData, MiddlewarePayload, PlacementOverflow};
use crate::overflow::{DetectOverflowOptions, detect_overflow};
use crate::placement::{alignment_sides, auto_placement_list};
use crate::platform::Platform;
use crate::types::{Alignment, Placement};

/// Chooses the placement with the most available space.
#[derive(Clone, Debug)]
pub struct AutoPlacement {
    cross_axis: bool,
    alignment: Option<Alignment>,
    auto_alignment: bool,
    allowed_placements: Option<Vec<Placement>>,
    overflow: DetectOverflowOptions,
}

impl Default for AutoPlacement {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoPlacement {
    /// Consider the four unaligned placements.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cross_axis: false,
            alignment: None,
            auto_alignment: true,
            allowed_placements: None,
            overflow: DetectOverflowOptions::default(),
        }
    }

    /// Rank aligned placements by the room on their side plus their main alignment side.
    #[must_use]
    pub fn with_cross_axis(mut self, enabled: bool) -> Self {
        self.cross_axis = enabled;
        self
    }

    /// Prefer placements with this alignment. `None` considers unaligned placements only.
    #[must_use]
    pub fn with_alignment(mut self, alignment: Option<Alignment>) -> Self {
        self.alignment = alignment;
        self
    }

    /// With a preferred alignment, also consider the opposite alignment. Default `true`.
    #[must_use]
    pub fn with_auto_alignment(mut self, enabled: bool) -> Self {
        self.auto_alignment = enabled;
        self
    }

    /// Restrict candidates to these placements.
    #[must_use]
    pub fn with_allowed_placements(
        mut self,
        placements: impl IntoIterator<Item = Placement>,
    ) -> Self {
        self.allowed_placements = Some(placements.into_iter().collect());
        self
    }

    /// Options for the overflow check.
    #[must_use]
    pub fn with_overflow(mut self, options: DetectOverflowOptions) -> Self {
        self.overflow = options;
        self
    }

    fn candidates(&self) -> Vec<Placement> {
        match &self.allowed_placements {
            Some(allowed) if self.alignment.is_none() => allowed.clone(),
            Some(allowed) => auto_placement_list(self.alignment, self.auto_alignment, allowed),
            None => auto_placement_list(self.alignment, self.auto_alignment, &Placement::ALL),
        }
    }

    /// The candidate to settle on once every one was measured.
    fn choose(&self, tried: &[PlacementOverflow]) -> Option<Placement> {
        // Most room first: the smallest (most negative) overflow wins.
        let room = |t: &PlacementOverflow| {
            if t.placement.alignment.is_some() && self.cross_axis {
                t.overflows.iter().take(2).sum::<f64>()
            } else {
                t.overflows.first().copied().unwrap_or(0.0)
            }
        };
        let fits = |t: &PlacementOverflow| {
            let checked = if t.placement.alignment.is_some() { 2 } else { 3 };
            t.overflows.iter().take(checked).all(|v| *v <= 0.0)
        };

        let mut best: Option<(&PlacementOverflow, f64)> = None;
        for t in tried.iter().filter(|&t| fits(t)) {
            let r = room(t);
            if best.is_none_or(|(_, b)| r < b) {
                best = Some((t, r));
            }
        }
        match best {
            Some((t, _)) => Some(t.placement),
            None => best_fit(tried.iter()),
        }
    }

    async fn run<P: Platform>(
        &self,
        state: &MiddlewareState<'_, P>,
    ) -> Result<MiddlewareReturn, P::Error> {
        let previous = state.middleware_data.auto_placement.as_ref();
        if previous.is_some_and(|a| a.skip) {
            return Ok(MiddlewareReturn::none());
        }
        let candidates = self.candidates();
        let index = previous.map_or(0, |a| a.index);
        let Some(&current) = candidates.get(index) else {
            return Ok(MiddlewareReturn::none());
        };
        if state.placement != current {
            // First pass: start measuring from the first candidate.
            return Ok(MiddlewareReturn::none().with_reset(Reset::placement(candidates[0])));
        }

        let overflow = detect_overflow(state, &self.overflow).await?;
        let rtl = state.platform.is_rtl(state.elements.floating).await?;
        let [main, other] = alignment_sides(current, state.rects, rtl);
        let mut tried: Vec<PlacementOverflow> = previous
            .map(|a| a.overflows.clone())
            .unwrap_or_default();
        tried.push(PlacementOverflow {
            placement: current,
            overflows: Vec::from([overflow[current.side], overflow[main], overflow[other]]),
        });

        if let Some(&next) = candidates.get(index + 1) {
            return Ok(MiddlewareReturn::none()
                .with_data(MiddlewarePayload::AutoPlacement(AutoPlacementData {
                    index: index + 1,
                    overflows: tried,
                    skip: false,
                }))
                .with_reset(Reset::placement(next)));
        }

        let chosen = self.choose(&tried).unwrap_or(current);
        tracing::debug!(%chosen, measured = tried.len(), "auto placement chose");
        let ret = MiddlewareReturn::none().with_data(MiddlewarePayload::AutoPlacement(
            AutoPlacementData {
                index: index + 1,
                overflows: tried,
                skip: true,
            },
        ));
        Ok(if chosen == state.placement {
            ret
        } else {
            ret.with_reset(Reset::placement(chosen))
        })
    }
}

impl<P: Platform> Middleware<P> for AutoPlacement {
    fn name(&self) -> &'static str {
        "autoPlacement"
    }

    fn compute<'a>(&'a self, state: &'a MiddlewareState<'a, P>) -> MiddlewareFuture<'a, P::Error>
    where
        P: 'a,
    {
        Box::pin(self.run(state))
    }
}
