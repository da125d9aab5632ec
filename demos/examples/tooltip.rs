// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tooltip with an arrow.
//!
//! Positions a tooltip above a button that sits near the top-right corner of the viewport.
//! `Flip` moves it below, `Shift` keeps it inside the viewport, and `Arrow` points back at the
//! button. Debug-level engine events are printed as resets happen.
//!
//! Run:
//! - `cargo run -p understory_floating_demos --example tooltip`

use kurbo::{Rect, Size};
use tracing_subscriber::filter::LevelFilter;
use understory_floating::middleware::{Arrow, Flip, Hide, Offset, Shift};
use understory_floating::platform::ClippingRectRequest;
use understory_floating::{
    ComputeConfig, ElementRects, Placement, Platform, RecordingTrace, Strategy,
    compute_position_with_trace,
};

#[derive(Copy, Clone, Debug, PartialEq)]
enum Node {
    Button,
    Tooltip,
    Arrow,
}

struct Scene {
    button: Rect,
    tooltip: Size,
    arrow: Size,
    viewport: Rect,
}

impl Platform for Scene {
    type Element = Node;
    type Error = core::convert::Infallible;

    async fn get_element_rects(
        &self,
        _reference: &Node,
        _floating: &Node,
        _strategy: Strategy,
    ) -> Result<ElementRects, Self::Error> {
        Ok(ElementRects {
            reference: self.button,
            floating: Rect::from_origin_size((0.0, 0.0), self.tooltip),
        })
    }

    async fn get_clipping_rect(
        &self,
        _request: ClippingRectRequest<'_, Node>,
    ) -> Result<Rect, Self::Error> {
        Ok(self.viewport)
    }

    async fn get_dimensions(&self, node: &Node) -> Result<Size, Self::Error> {
        Ok(match node {
            Node::Button => self.button.size(),
            Node::Tooltip => self.tooltip,
            Node::Arrow => self.arrow,
        })
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    let scene = Scene {
        button: Rect::new(560.0, 4.0, 620.0, 28.0),
        tooltip: Size::new(160.0, 40.0),
        arrow: Size::new(10.0, 5.0),
        viewport: Rect::new(0.0, 0.0, 640.0, 480.0),
    };
    let config = ComputeConfig::new(&scene)
        .with_placement(Placement::TOP)
        .with_middleware(Offset::new(6.0))
        .with_middleware(Flip::new())
        .with_middleware(Shift::new())
        .with_middleware(Arrow::new(Node::Arrow).with_padding(4.0))
        .with_middleware(Hide::new());

    let mut trace = RecordingTrace::new();
    let out = compute_position_with_trace(&Node::Button, &Node::Tooltip, &config, &mut trace)
        .expect("a static scene always resolves");

    println!("== Tooltip ==");
    println!("  placement = {}", out.placement);
    println!("  position  = ({:.1}, {:.1})", out.x, out.y);
    if let Some(shift) = &out.middleware_data.shift {
        println!("  shifted   = ({:.1}, {:.1})", shift.x, shift.y);
    }
    if let Some(arrow) = &out.middleware_data.arrow {
        println!(
            "  arrow x   = {:?} (center offset {:.1})",
            arrow.x, arrow.center_offset
        );
    }
    if let Some(hide) = &out.middleware_data.hide {
        println!(
            "  hidden    = reference {:?}, escaped {:?}",
            hide.reference_hidden, hide.escaped
        );
    }
    println!(
        "  tried     = {:?} ({} resets)",
        trace
            .placements()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
        trace.reset_count()
    );
}
