// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Popover for a link that wraps across two lines.
//!
//! Without `Inline`, the popover centers on the bounding box of both line fragments, which can
//! leave it far from either. With `Inline`, it attaches to the fragment nearest its side, or to
//! the fragment under the pointer.
//!
//! Run:
//! - `cargo run -p understory_floating_demos --example inline_link`

use kurbo::{Point, Rect, Size};
use understory_floating::middleware::{Inline, Offset};
use understory_floating::platform::ClippingRectRequest;
use understory_floating::{
    ComputeConfig, ElementRects, Placement, Platform, Strategy, compute_position,
};

#[derive(Copy, Clone, Debug, PartialEq)]
enum Node {
    Link,
    Popover,
}

struct Paragraph {
    fragments: Vec<Rect>,
    popover: Size,
    viewport: Rect,
}

impl Paragraph {
    fn link_bounds(&self) -> Rect {
        self.fragments
            .iter()
            .copied()
            .reduce(|a, b| a.union(b))
            .unwrap_or_default()
    }
}

impl Platform for Paragraph {
    type Element = Node;
    type Error = core::convert::Infallible;

    async fn get_element_rects(
        &self,
        _reference: &Node,
        _floating: &Node,
        _strategy: Strategy,
    ) -> Result<ElementRects, Self::Error> {
        Ok(ElementRects {
            reference: self.link_bounds(),
            floating: Rect::from_origin_size((0.0, 0.0), self.popover),
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
            Node::Link => self.link_bounds().size(),
            Node::Popover => self.popover,
        })
    }

    async fn get_client_rects(&self, node: &Node) -> Result<Vec<Rect>, Self::Error> {
        Ok(match node {
            Node::Link => self.fragments.clone(),
            Node::Popover => vec![Rect::from_origin_size((0.0, 0.0), self.popover)],
        })
    }
}

fn main() {
    let paragraph = Paragraph {
        fragments: vec![
            Rect::new(380.0, 100.0, 480.0, 120.0),
            Rect::new(20.0, 120.0, 90.0, 140.0),
        ],
        popover: Size::new(120.0, 60.0),
        viewport: Rect::new(0.0, 0.0, 500.0, 400.0),
    };

    let cases = [
        ("bounding box", Placement::BOTTOM, None),
        ("inline", Placement::BOTTOM, Some(None)),
        ("inline", Placement::TOP, Some(None)),
        ("pointer", Placement::TOP, Some(Some(Point::new(50.0, 130.0)))),
    ];

    println!("== Inline reference ==");
    for (label, placement, inline) in cases {
        let config = ComputeConfig::new(&paragraph)
            .with_placement(placement)
            .with_middleware(Offset::new(4.0))
            .with_middleware_if(
                inline.is_some(),
                Inline::new().with_point(inline.flatten()),
            );
        let out = compute_position(&Node::Link, &Node::Popover, &config)
            .expect("a static scene always resolves");
        println!(
            "  {label:<12} {:<7} -> ({:.1}, {:.1})",
            placement.to_string(),
            out.x,
            out.y
        );
    }
}
