// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_floating --heading-base-level=0

//! Understory Floating: headless anchored positioning for tooltips, popovers, and menus.
//!
//! Given a reference element and a floating element, this crate computes where the floating
//! element should go so it sits next to the reference, then refines that position through an
//! ordered list of middleware (offset, flip, shift, size, arrow, ...).
//!
//! It does not measure or render anything. All measurements come from a [`Platform`]
//! implementation supplied by the embedder, so the same core serves a DOM binding, a
//! retained-mode scene, or a test double.
//!
//! ## Model
//!
//! - [`Placement`]: one of 12 positions, a [`Side`] plus an optional [`Alignment`].
//! - [`ElementRects`]: the reference rect and the floating element's size.
//! - [`compute_coords_from_placement`]: base coordinates for a placement, RTL aware.
//! - [`detect_overflow`]: signed per-side overflow of an element against its clipping boundary.
//! - [`middleware`]: the pipeline stages. Each one can move the floating element, record data in
//!   [`MiddlewareData`], and request a [`Reset`](middleware::Reset) that restarts the pipeline
//!   with a new placement or fresh measurements.
//!
//! ## Engine
//!
//! [`compute_position_async`] drives the pipeline until a full pass completes without a reset,
//! accepting at most [`MAX_RESETS`] resets. With the `std` feature, [`compute_position`] runs the
//! same engine to completion on the calling thread.
//!
//! Every step can be observed through a [`PositionTrace`]; steps and resets are also emitted as
//! `tracing` events at `trace` and `debug` level.
//!
//! ## Minimal usage
//!
//! ```
//! use kurbo::{Rect, Size};
//! use understory_floating::middleware::{Flip, Offset, Shift};
//! use understory_floating::platform::ClippingRectRequest;
//! use understory_floating::{
//!     ComputeConfig, ElementRects, Placement, Platform, Strategy, compute_position,
//! };
//!
//! enum Node {
//!     Button,
//!     Tooltip,
//! }
//!
//! struct Scene {
//!     button: Rect,
//!     tooltip: Size,
//!     viewport: Rect,
//! }
//!
//! impl Platform for Scene {
//!     type Element = Node;
//!     type Error = core::convert::Infallible;
//!
//!     async fn get_element_rects(
//!         &self,
//!         _reference: &Node,
//!         _floating: &Node,
//!         _strategy: Strategy,
//!     ) -> Result<ElementRects, Self::Error> {
//!         Ok(ElementRects {
//!             reference: self.button,
//!             floating: Rect::from_origin_size((0.0, 0.0), self.tooltip),
//!         })
//!     }
//!
//!     async fn get_clipping_rect(
//!         &self,
//!         _request: ClippingRectRequest<'_, Node>,
//!     ) -> Result<Rect, Self::Error> {
//!         Ok(self.viewport)
//!     }
//!
//!     async fn get_dimensions(&self, node: &Node) -> Result<Size, Self::Error> {
//!         Ok(match node {
//!             Node::Button => self.button.size(),
//!             Node::Tooltip => self.tooltip,
//!         })
//!     }
//! }
//!
//! // A button hugging the top of the viewport: a tooltip above it would be clipped.
//! let scene = Scene {
//!     button: Rect::new(100.0, 0.0, 180.0, 20.0),
//!     tooltip: Size::new(60.0, 30.0),
//!     viewport: Rect::new(0.0, 0.0, 400.0, 300.0),
//! };
//! let config = ComputeConfig::new(&scene)
//!     .with_placement(Placement::TOP)
//!     .with_middleware(Offset::new(8.0))
//!     .with_middleware(Flip::new())
//!     .with_middleware(Shift::new());
//!
//! let out = compute_position(&Node::Button, &Node::Tooltip, &config).unwrap();
//! assert_eq!(out.placement, Placement::BOTTOM);
//! assert_eq!((out.x, out.y), (110.0, 28.0));
//! ```
//!
//! This crate is `no_std` and uses `alloc`. Disable default features and enable `libm` for
//! `no_std` targets; the async engine stays available.

#![no_std]

extern crate alloc;

pub mod compute;
pub mod coords;
pub mod data;
pub mod error;
pub mod middleware;
pub mod overflow;
pub mod placement;
pub mod platform;
pub mod trace;
pub mod types;

pub use compute::{
    ComputeConfig, ComputePositionReturn, MAX_RESETS, MiddlewareSlot, compute_position_async,
    compute_position_async_with_trace,
};
#[cfg(feature = "std")]
pub use compute::{compute_position, compute_position_with_trace};
pub use coords::compute_coords_from_placement;
pub use data::MiddlewareData;
pub use error::ComputeError;
pub use overflow::{DetectOverflowOptions, ElementContext, detect_overflow};
pub use platform::Platform;
pub use trace::{NoTrace, PositionTrace, RecordingTrace, TraceEvent};
pub use types::{
    Alignment, Axis, ElementRects, Padding, ParsePlacementError, Placement, Side, SideObject,
    Strategy,
};
