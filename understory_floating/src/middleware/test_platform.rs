// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic in-memory platform shared by the unit tests.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;
use core::future::Future;
use core::pin::pin;
use core::task::{Context, Poll, Waker};

use kurbo::{Rect, Size, Vec2};

use crate::data::MiddlewareData;
use crate::middleware::{Elements, MiddlewareState};
use crate::platform::{Boundary, ClippingRectRequest, ConvertRectRequest, Platform, RootBoundary};
use crate::types::{ElementRects, Placement, Strategy};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum El {
    Reference,
    Floating,
    Arrow,
    OffsetParent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TestError(pub &'static str);

impl core::fmt::Display for TestError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug)]
pub(crate) struct TestPlatform {
    pub(crate) reference: Rect,
    pub(crate) floating: Rc<Cell<Size>>,
    pub(crate) clipping: Rect,
    pub(crate) reference_clipping: Option<Rect>,
    pub(crate) rtl: bool,
    pub(crate) arrow: Size,
    pub(crate) offset_parent: Option<Size>,
    pub(crate) scale: Vec2,
    pub(crate) client_rects: Vec<Rect>,
    pub(crate) fail_rects: bool,
    pub(crate) rect_calls: Cell<usize>,
}

impl TestPlatform {
    pub(crate) fn new(reference: Rect, floating: Size, clipping: Rect) -> Self {
        Self {
            reference,
            floating: Rc::new(Cell::new(floating)),
            clipping,
            reference_clipping: None,
            rtl: false,
            arrow: Size::ZERO,
            offset_parent: None,
            scale: Vec2::new(1.0, 1.0),
            client_rects: Vec::new(),
            fail_rects: false,
            rect_calls: Cell::new(0),
        }
    }

    pub(crate) fn rects(&self) -> ElementRects {
        ElementRects {
            reference: self.reference,
            floating: Rect::from_origin_size((0.0, 0.0), self.floating.get()),
        }
    }
}

impl Platform for TestPlatform {
    type Element = El;
    type Error = TestError;

    async fn get_element_rects(
        &self,
        _reference: &El,
        _floating: &El,
        _strategy: Strategy,
    ) -> Result<ElementRects, TestError> {
        self.rect_calls.set(self.rect_calls.get() + 1);
        if self.fail_rects {
            return Err(TestError("measure failed"));
        }
        Ok(self.rects())
    }

    async fn get_clipping_rect(
        &self,
        request: ClippingRectRequest<'_, El>,
    ) -> Result<Rect, TestError> {
        let base = match (request.element, self.reference_clipping) {
            (El::Reference, Some(r)) => r,
            _ => self.clipping,
        };
        let base = match request.root_boundary {
            RootBoundary::Rect(r) => base.intersect(r),
            RootBoundary::Viewport | RootBoundary::Document => base,
        };
        Ok(match request.boundary {
            Boundary::Rect(r) => base.intersect(r),
            Boundary::ClippingAncestors => base,
        })
    }

    async fn get_dimensions(&self, element: &El) -> Result<Size, TestError> {
        Ok(match element {
            El::Reference => self.reference.size(),
            El::Floating => self.floating.get(),
            El::Arrow => self.arrow,
            El::OffsetParent => self.offset_parent.unwrap_or(Size::ZERO),
        })
    }

    async fn is_rtl(&self, _element: &El) -> Result<bool, TestError> {
        Ok(self.rtl)
    }

    async fn get_offset_parent(&self, _element: &El) -> Result<Option<El>, TestError> {
        Ok(self.offset_parent.map(|_| El::OffsetParent))
    }

    async fn get_scale(&self, _element: &El) -> Result<Vec2, TestError> {
        Ok(self.scale)
    }

    async fn convert_offset_parent_relative_rect_to_viewport_relative_rect(
        &self,
        _request: ConvertRectRequest<'_, El>,
    ) -> Result<Option<Rect>, TestError> {
        Ok(None)
    }

    async fn get_client_rects(&self, _element: &El) -> Result<Vec<Rect>, TestError> {
        Ok(self.client_rects.clone())
    }

    async fn get_client_size(&self, element: &El) -> Result<Option<Size>, TestError> {
        Ok(match element {
            El::OffsetParent => self.offset_parent,
            _ => None,
        })
    }
}

/// Drive a future that never waits on external wakeups.
pub(crate) fn block_on<F: Future>(future: F) -> F::Output {
    let mut future = pin!(future);
    let mut cx = Context::from_waker(Waker::noop());
    loop {
        if let Poll::Ready(out) = future.as_mut().poll(&mut cx) {
            return out;
        }
    }
}

pub(crate) const REFERENCE: El = El::Reference;
pub(crate) const FLOATING: El = El::Floating;

/// A state for calling a middleware directly.
pub(crate) fn state<'a>(
    platform: &'a TestPlatform,
    rects: &'a ElementRects,
    data: &'a MiddlewareData,
    placement: Placement,
    coords: (f64, f64),
) -> MiddlewareState<'a, TestPlatform> {
    MiddlewareState {
        x: coords.0,
        y: coords.1,
        initial_placement: placement,
        placement,
        strategy: Strategy::Absolute,
        rects,
        middleware_data: data,
        elements: Elements {
            reference: &REFERENCE,
            floating: &FLOATING,
        },
        platform,
    }
}
