// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size};
use understory_floating::middleware::{
    Arrow, AutoPlacement, Flip, Hide, LimitShift, Offset, Shift, Size as SizeMiddleware,
};
use understory_floating::platform::ClippingRectRequest;
use understory_floating::{
    ComputeConfig, ElementRects, Placement, Platform, Strategy, compute_position,
};

#[derive(Copy, Clone, Debug, PartialEq)]
enum Node {
    Reference,
    Floating,
    Arrow,
}

struct Scene {
    reference: Rect,
    floating: Size,
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
            reference: self.reference,
            floating: Rect::from_origin_size((0.0, 0.0), self.floating),
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
            Node::Reference => self.reference.size(),
            Node::Floating => self.floating,
            Node::Arrow => Size::new(10.0, 5.0),
        })
    }
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// References scattered over the viewport, many close enough to an edge to force a flip.
fn gen_scenes(count: usize) -> Vec<Scene> {
    let viewport = Rect::new(0.0, 0.0, 1280.0, 720.0);
    let mut rng = Rng::new(0xF10A_7196_0000_BEEF);
    (0..count)
        .map(|_| {
            let x0 = rng.next_f64() * (viewport.width() - 80.0);
            let y0 = rng.next_f64() * (viewport.height() - 24.0);
            Scene {
                reference: Rect::new(x0, y0, x0 + 80.0, y0 + 24.0),
                floating: Size::new(200.0 + rng.next_f64() * 100.0, 120.0),
                viewport,
            }
        })
        .collect()
}

fn run_all<'a>(scenes: &'a [Scene], config: impl Fn(&'a Scene) -> ComputeConfig<'a, Scene>) {
    for scene in scenes {
        let out = compute_position(&Node::Reference, &Node::Floating, &config(scene));
        black_box(out.ok());
    }
}

fn bench_pipelines(c: &mut Criterion) {
    let scenes = gen_scenes(256);
    let mut group = c.benchmark_group("compute_position");
    group.throughput(Throughput::Elements(scenes.len() as u64));

    group.bench_function("base", |b| {
        b.iter(|| run_all(&scenes, |s| ComputeConfig::new(s).with_placement(Placement::TOP)));
    });

    group.bench_function("offset_flip_shift", |b| {
        b.iter(|| {
            run_all(&scenes, |s| {
                ComputeConfig::new(s)
                    .with_placement(Placement::TOP)
                    .with_middleware(Offset::new(8.0))
                    .with_middleware(Flip::new())
                    .with_middleware(Shift::new().with_limiter(LimitShift::new()))
            });
        });
    });

    group.bench_function("tooltip_full", |b| {
        b.iter(|| {
            run_all(&scenes, |s| {
                ComputeConfig::new(s)
                    .with_placement(Placement::TOP_START)
                    .with_middleware(Offset::new(8.0))
                    .with_middleware(Flip::new())
                    .with_middleware(Shift::new())
                    .with_middleware(SizeMiddleware::new())
                    .with_middleware(Arrow::new(Node::Arrow).with_padding(4.0))
                    .with_middleware(Hide::new())
            });
        });
    });

    group.bench_function("auto_placement", |b| {
        b.iter(|| {
            run_all(&scenes, |s| {
                ComputeConfig::new(s)
                    .with_middleware(Offset::new(8.0))
                    .with_middleware(AutoPlacement::new())
            });
        });
    });

    group.finish();
}

criterion_group!(benches, bench_pipelines);
criterion_main!(benches);
