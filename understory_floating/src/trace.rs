// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explainability hooks for the middleware pipeline.
//!
//! The engine keeps no record of how it reached its result. When an embedder wants to answer
//! "why did this popover end up on the left?", it can pass a [`PositionTrace`] sink to
//! [`compute_position_with_trace`](crate::compute_position_with_trace) and inspect the steps
//! afterwards. [`RecordingTrace`] keeps every step in order; [`NoTrace`] discards them.
//!
//! Independently of any sink, the engine emits `tracing` events: `trace` for each middleware
//! step and `debug` for each reset.

use alloc::vec::Vec;

use kurbo::Point;

use crate::middleware::Reset;
use crate::types::Placement;

/// One observed step of a resolution.
#[derive(Clone, Debug, PartialEq)]
pub enum TraceEvent {
    /// A middleware ran and its return value was applied.
    Step {
        /// Position of the middleware in the configured list.
        index: usize,
        /// Name of the middleware.
        name: &'static str,
        /// Placement after the step.
        placement: Placement,
        /// Coordinates after the step.
        coords: Point,
    },
    /// A middleware's reset was accepted and the pipeline restarted.
    Reset {
        /// Number of resets accepted so far, including this one.
        count: usize,
        /// Name of the middleware that requested it.
        name: &'static str,
        /// The request.
        reset: Reset,
    },
    /// The pipeline terminated.
    Done {
        /// Final placement.
        placement: Placement,
        /// Final coordinates.
        coords: Point,
    },
}

/// A callback sink for pipeline tracing.
pub trait PositionTrace {
    /// Called after the middleware at `index` ran and its return value was applied.
    fn step(&mut self, index: usize, name: &'static str, placement: Placement, coords: Point);

    /// Called when a reset is accepted, before the pipeline restarts.
    fn reset(&mut self, count: usize, name: &'static str, reset: &Reset);

    /// Called once with the final result.
    fn done(&mut self, placement: Placement, coords: Point);
}

/// Discards every event.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoTrace;

impl PositionTrace for NoTrace {
    fn step(&mut self, _index: usize, _name: &'static str, _placement: Placement, _coords: Point) {}

    fn reset(&mut self, _count: usize, _name: &'static str, _reset: &Reset) {}

    fn done(&mut self, _placement: Placement, _coords: Point) {}
}

/// Records every event in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingTrace {
    events: Vec<TraceEvent>,
}

impl RecordingTrace {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Number of accepted resets.
    #[must_use]
    pub fn reset_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Reset { .. }))
            .count()
    }

    /// Placements the pipeline rendered, in order, without consecutive repeats.
    #[must_use]
    pub fn placements(&self) -> Vec<Placement> {
        let mut out: Vec<Placement> = Vec::new();
        for event in &self.events {
            let placement = match event {
                TraceEvent::Step { placement, .. } | TraceEvent::Done { placement, .. } => {
                    *placement
                }
                TraceEvent::Reset { .. } => continue,
            };
            if out.last() != Some(&placement) {
                out.push(placement);
            }
        }
        out
    }

    /// Clears all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl PositionTrace for RecordingTrace {
    fn step(&mut self, index: usize, name: &'static str, placement: Placement, coords: Point) {
        self.events.push(TraceEvent::Step {
            index,
            name,
            placement,
            coords,
        });
    }

    fn reset(&mut self, count: usize, name: &'static str, reset: &Reset) {
        self.events.push(TraceEvent::Reset {
            count,
            name,
            reset: *reset,
        });
    }

    fn done(&mut self, placement: Placement, coords: Point) {
        self.events.push(TraceEvent::Done { placement, coords });
    }
}
