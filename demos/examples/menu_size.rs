// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Context menu that picks the roomiest side and shrinks to fit.
//!
//! `AutoPlacement` measures every side and keeps the one with the most space. `Size` then caps
//! the menu's height at the available space; because that changes the menu's dimensions, the
//! engine remeasures and runs the pipeline once more.
//!
//! Run:
//! - `cargo run -p understory_floating_demos --example menu_size`

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Rect, Size};
use understory_floating::middleware::{AutoPlacement, Offset, Size as SizeMiddleware};
use understory_floating::platform::ClippingRectRequest;
use understory_floating::{
    ComputeConfig, ElementRects, Platform, RecordingTrace, Strategy, TraceEvent,
    compute_position_with_trace,
};

#[derive(Copy, Clone, Debug, PartialEq)]
enum Node {
    Anchor,
    Menu,
}

struct Scene {
    anchor: Rect,
    menu: Rc<Cell<Size>>,
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
            reference: self.anchor,
            floating: Rect::from_origin_size((0.0, 0.0), self.menu.get()),
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
            Node::Anchor => self.anchor.size(),
            Node::Menu => self.menu.get(),
        })
    }
}

/// Natural height of the menu's content.
const CONTENT_HEIGHT: f64 = 420.0;

fn main() {
    let menu = Rc::new(Cell::new(Size::new(180.0, CONTENT_HEIGHT)));
    let scene = Scene {
        anchor: Rect::new(40.0, 200.0, 120.0, 224.0),
        menu: Rc::clone(&menu),
        viewport: Rect::new(0.0, 0.0, 800.0, 400.0),
    };

    let resize = Rc::clone(&menu);
    let config = ComputeConfig::new(&scene)
        .with_middleware(Offset::new(4.0))
        .with_middleware(AutoPlacement::new())
        .with_middleware(SizeMiddleware::new().with_apply(move |available| {
            let height = CONTENT_HEIGHT.min(available.available_height.max(0.0));
            resize.set(Size::new(180.0, height));
        }));

    let mut trace = RecordingTrace::new();
    let out = compute_position_with_trace(&Node::Anchor, &Node::Menu, &config, &mut trace)
        .expect("a static scene always resolves");

    println!("== Menu ==");
    println!("  placement = {}", out.placement);
    println!("  position  = ({:.1}, {:.1})", out.x, out.y);
    println!("  size      = {:?}", menu.get());
    if let Some(auto) = &out.middleware_data.auto_placement {
        for tried in &auto.overflows {
            println!("  {:<12} overflow {:?}", tried.placement.to_string(), tried.overflows);
        }
    }
    for event in trace.events() {
        if let TraceEvent::Reset { count, name, reset } = event {
            println!("  reset #{count} by {name}: {reset:?}");
        }
    }
}
