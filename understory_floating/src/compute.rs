// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The pipeline engine.
//!
//! ## Algorithm
//!
//! 1. Ask the platform whether the floating element is right-to-left and measure both elements.
//! 2. Compute base coordinates for the requested placement.
//! 3. Run the middleware list left to right, skipping disabled slots. Each return value is
//!    applied before the next middleware runs: coordinates are replaced, data is merged.
//! 4. A reset restarts the list from the first slot. A `Reset::With` first switches placement
//!    and/or rects and recomputes the base coordinates; `Reset::Restart` keeps them.
//! 5. The call completes once a full pass runs without a reset.
//!
//! At most [`MAX_RESETS`] resets are accepted per call. A further reset fails the call with
//! [`ComputeError::InfiniteReset`].

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Point;

use crate::coords::compute_coords_from_placement;
use crate::data::MiddlewareData;
use crate::error::ComputeError;
use crate::middleware::{Elements, Middleware, MiddlewareState, Reset, ResetRects};
use crate::platform::Platform;
use crate::trace::{NoTrace, PositionTrace};
use crate::types::{Placement, Strategy};

/// Resets accepted per call before the engine gives up.
pub const MAX_RESETS: usize = 50;

/// One entry of [`ComputeConfig::middleware`]. `None` is a disabled slot.
pub type MiddlewareSlot<'a, P> = Option<Box<dyn Middleware<P> + 'a>>;

/// Configuration for one resolution.
pub struct ComputeConfig<'a, P: Platform> {
    /// Requested placement. Defaults to [`Placement::BOTTOM`].
    pub placement: Placement,
    /// Positioning strategy. Defaults to [`Strategy::Absolute`].
    pub strategy: Strategy,
    /// Ordered middleware slots. `None` slots are skipped.
    pub middleware: Vec<MiddlewareSlot<'a, P>>,
    /// Measurement provider.
    pub platform: &'a P,
}

impl<'a, P: Platform> ComputeConfig<'a, P> {
    /// Configuration with default placement and strategy and no middleware.
    #[must_use]
    pub fn new(platform: &'a P) -> Self {
        Self {
            placement: Placement::default(),
            strategy: Strategy::default(),
            middleware: Vec::new(),
            platform,
        }
    }

    /// Set the requested placement.
    #[must_use]
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Set the positioning strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Append a middleware.
    #[must_use]
    pub fn with_middleware(mut self, middleware: impl Middleware<P> + 'a) -> Self {
        self.middleware.push(Some(Box::new(middleware)));
        self
    }

    /// Append a middleware slot that is disabled unless `enabled`.
    #[must_use]
    pub fn with_middleware_if(mut self, enabled: bool, middleware: impl Middleware<P> + 'a) -> Self {
        let slot: MiddlewareSlot<'a, P> = if enabled {
            Some(Box::new(middleware))
        } else {
            None
        };
        self.middleware.push(slot);
        self
    }
}

impl<P: Platform> fmt::Debug for ComputeConfig<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<Option<&'static str>> = self
            .middleware
            .iter()
            .map(|slot| slot.as_ref().map(|m| m.name()))
            .collect();
        f.debug_struct("ComputeConfig")
            .field("placement", &self.placement)
            .field("strategy", &self.strategy)
            .field("middleware", &names)
            .finish_non_exhaustive()
    }
}

/// Result of a resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct ComputePositionReturn {
    /// Final x coordinate of the floating element.
    pub x: f64,
    /// Final y coordinate of the floating element.
    pub y: f64,
    /// Placement that was finally rendered. May differ from the requested one.
    pub placement: Placement,
    /// Strategy, echoed from the configuration.
    pub strategy: Strategy,
    /// Everything the middleware recorded.
    pub middleware_data: MiddlewareData,
}

impl ComputePositionReturn {
    /// Final coordinates as a point.
    #[must_use]
    pub fn coords(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Resolve the position of `floating` against `reference`, awaiting platform calls.
///
/// # Errors
///
/// Returns [`ComputeError::Platform`] if a measurement fails and
/// [`ComputeError::InfiniteReset`] if the middleware keep resetting.
pub async fn compute_position_async<P: Platform>(
    reference: &P::Element,
    floating: &P::Element,
    config: &ComputeConfig<'_, P>,
) -> Result<ComputePositionReturn, ComputeError<P::Error>> {
    compute_position_async_with_trace(reference, floating, config, &mut NoTrace).await
}

/// Like [`compute_position_async`], reporting each step to `trace`.
///
/// # Errors
///
/// See [`compute_position_async`].
pub async fn compute_position_async_with_trace<P, T>(
    reference: &P::Element,
    floating: &P::Element,
    config: &ComputeConfig<'_, P>,
    trace: &mut T,
) -> Result<ComputePositionReturn, ComputeError<P::Error>>
where
    P: Platform,
    T: PositionTrace + ?Sized,
{
    let platform = config.platform;
    let strategy = config.strategy;
    let initial_placement = config.placement;
    let elements = Elements {
        reference,
        floating,
    };

    let rtl = platform
        .is_rtl(floating)
        .await
        .map_err(ComputeError::Platform)?;
    let mut rects = platform
        .get_element_rects(reference, floating, strategy)
        .await
        .map_err(ComputeError::Platform)?;
    let mut placement = initial_placement;
    let mut coords = compute_coords_from_placement(&rects, placement, rtl);
    let mut middleware_data = MiddlewareData::default();
    let mut reset_count = 0_usize;

    let mut index = 0;
    while index < config.middleware.len() {
        let Some(middleware) = &config.middleware[index] else {
            index += 1;
            continue;
        };
        let name = middleware.name();

        let ret = {
            let state = MiddlewareState {
                x: coords.x,
                y: coords.y,
                initial_placement,
                placement,
                strategy,
                rects: &rects,
                middleware_data: &middleware_data,
                elements,
                platform,
            };
            middleware
                .compute(&state)
                .await
                .map_err(ComputeError::Platform)?
        };

        if let Some(x) = ret.x {
            coords.x = x;
        }
        if let Some(y) = ret.y {
            coords.y = y;
        }
        if let Some(data) = ret.data {
            middleware_data.merge(name, data);
        }
        tracing::trace!(
            middleware = name,
            index,
            %placement,
            x = coords.x,
            y = coords.y,
            "middleware step"
        );
        trace.step(index, name, placement, coords);

        let Some(reset) = ret.reset else {
            index += 1;
            continue;
        };
        if reset_count >= MAX_RESETS {
            tracing::debug!(middleware = name, limit = MAX_RESETS, "reset ceiling reached");
            return Err(ComputeError::InfiniteReset {
                limit: MAX_RESETS,
                middleware: name,
            });
        }
        reset_count += 1;

        if let Reset::With {
            placement: next_placement,
            rects: next_rects,
        } = reset
        {
            if let Some(next) = next_placement {
                placement = next;
            }
            match next_rects {
                Some(ResetRects::Remeasure) => {
                    rects = platform
                        .get_element_rects(reference, floating, strategy)
                        .await
                        .map_err(ComputeError::Platform)?;
                }
                Some(ResetRects::Use(next)) => rects = next,
                None => {}
            }
            coords = compute_coords_from_placement(&rects, placement, rtl);
        }
        tracing::debug!(
            middleware = name,
            count = reset_count,
            %placement,
            "pipeline reset"
        );
        trace.reset(reset_count, name, &reset);
        index = 0;
    }

    trace.done(placement, coords);
    Ok(ComputePositionReturn {
        x: coords.x,
        y: coords.y,
        placement,
        strategy,
        middleware_data,
    })
}

/// Resolve the position of `floating` against `reference`, blocking on platform calls.
///
/// Synchronous platforms complete immediately; asynchronous ones park the current thread.
///
/// # Errors
///
/// See [`compute_position_async`].
#[cfg(feature = "std")]
pub fn compute_position<P: Platform>(
    reference: &P::Element,
    floating: &P::Element,
    config: &ComputeConfig<'_, P>,
) -> Result<ComputePositionReturn, ComputeError<P::Error>> {
    pollster::block_on(compute_position_async(reference, floating, config))
}

/// Like [`compute_position`], reporting each step to `trace`.
///
/// # Errors
///
/// See [`compute_position_async`].
#[cfg(feature = "std")]
pub fn compute_position_with_trace<P, T>(
    reference: &P::Element,
    floating: &P::Element,
    config: &ComputeConfig<'_, P>,
    trace: &mut T,
) -> Result<ComputePositionReturn, ComputeError<P::Error>>
where
    P: Platform,
    T: PositionTrace + ?Sized,
{
    pollster::block_on(compute_position_async_with_trace(
        reference, floating, config, trace,
    ))
}
