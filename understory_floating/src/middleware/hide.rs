// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Report when the floating element should be hidden.

use alloc::boxed::Box;

use bitflags::bitflags;
use kurbo::Rect;

use super::{Middleware, MiddlewareFuture, MiddlewareReturn, MiddlewareState};
use crate::data::{HideData, MiddlewarePayload};
use crate::overflow::{DetectOverflowOptions, ElementContext, detect_overflow};
use crate::platform::Platform;
use crate::types::SideObject;

bitflags! {
    /// Which visibility checks [`Hide`] performs.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct HideStrategy: u8 {
        /// The reference is fully clipped by its own clipping ancestors.
        const REFERENCE_HIDDEN = 0b0000_0001;
        /// The floating element sits entirely outside the reference's clipping context.
        const ESCAPED = 0b0000_0010;
    }
}

impl Default for HideStrategy {
    fn default() -> Self {
        Self::all()
    }
}

/// Records [`HideData`]; it never moves the floating element.
///
/// ```
/// use understory_floating::middleware::{Hide, HideStrategy};
///
/// let hide = Hide::new().with_strategy(HideStrategy::REFERENCE_HIDDEN);
/// # let _ = hide;
/// ```
#[derive(Clone, Debug, Default)]
pub struct Hide {
    strategy: HideStrategy,
    overflow: DetectOverflowOptions,
}

impl Hide {
    /// Run both checks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the checks to run.
    #[must_use]
    pub fn with_strategy(mut self, strategy: HideStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Options for the overflow checks. The element context and alternate boundary are set per
    /// check.
    #[must_use]
    pub fn with_overflow(mut self, options: DetectOverflowOptions) -> Self {
        self.overflow = options;
        self
    }

    async fn run<P: Platform>(
        &self,
        state: &MiddlewareState<'_, P>,
    ) -> Result<MiddlewareReturn, P::Error> {
        let mut data = HideData::default();

        if self.strategy.contains(HideStrategy::REFERENCE_HIDDEN) {
            let options = self
                .overflow
                .with_element_context(ElementContext::Reference)
                .with_alt_boundary(false);
            let overflow = detect_overflow(state, &options).await?;
            let offsets = side_offsets(overflow, state.rects.reference);
            data.reference_hidden = Some(offsets.any_non_negative());
            data.reference_hidden_offsets = Some(offsets);
        }

        if self.strategy.contains(HideStrategy::ESCAPED) {
            let options = self
                .overflow
                .with_element_context(ElementContext::Floating)
                .with_alt_boundary(true);
            let overflow = detect_overflow(state, &options).await?;
            let offsets = side_offsets(overflow, state.rects.floating);
            data.escaped = Some(offsets.any_non_negative());
            data.escaped_offsets = Some(offsets);
        }

        tracing::trace!(
            reference_hidden = ?data.reference_hidden,
            escaped = ?data.escaped,
            "hide checked"
        );
        Ok(MiddlewareReturn::none().with_data(MiddlewarePayload::Hide(data)))
    }
}

/// Overflow minus the rect's extent: `>= 0` on a side means the rect is entirely past it.
fn side_offsets(overflow: SideObject, rect: Rect) -> SideObject {
    SideObject::new(
        overflow.top - rect.height(),
        overflow.right - rect.width(),
        overflow.bottom - rect.height(),
        overflow.left - rect.width(),
    )
}

impl<P: Platform> Middleware<P> for Hide {
    fn name(&self) -> &'static str {
        "hide"
    }

    fn compute<'a>(&'a self, state: &'a MiddlewareState<'a, P>) -> MiddlewareFuture<'a, P::Error>
    where
        P: 'a,
    {
        Box::pin(self.run(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MiddlewareData;
    use crate::middleware::test_platform::{TestPlatform, block_on, state};
    use crate::types::Placement;
    use kurbo::Size;

    fn platform(reference: Rect) -> TestPlatform {
        let mut p = TestPlatform::new(
            reference,
            Size::new(80.0, 30.0),
            Rect::new(0.0, 0.0, 500.0, 500.0),
        );
        p.reference_clipping = Some(Rect::new(0.0, 0.0, 100.0, 100.0));
        p
    }

    fn check(p: &TestPlatform, hide: &Hide, coords: (f64, f64)) -> HideData {
        let rects = p.rects();
        let data = MiddlewareData::default();
        let s = state(p, &rects, &data, Placement::BOTTOM, coords);
        let ret = block_on(Middleware::<TestPlatform>::compute(hide, &s)).unwrap();
        assert_eq!((ret.x, ret.y, ret.reset.is_none()), (None, None, true));
        match ret.data {
            Some(MiddlewarePayload::Hide(d)) => d,
            other => panic!("unexpected data {other:?}"),
        }
    }

    #[test]
    fn reference_clipped_away() {
        let p = platform(Rect::new(120.0, 0.0, 160.0, 40.0));
        let d = check(&p, &Hide::new(), (10.0, 10.0));
        assert_eq!(d.reference_hidden, Some(true));
        assert_eq!(
            d.reference_hidden_offsets,
            Some(SideObject::new(-40.0, 20.0, -100.0, -160.0))
        );
    }

    #[test]
    fn visible_reference_and_contained_floating() {
        let p = platform(Rect::new(50.0, 0.0, 90.0, 40.0));
        let d = check(&p, &Hide::new(), (10.0, 10.0));
        assert_eq!(d.reference_hidden, Some(false));
        assert_eq!(d.escaped, Some(false));
    }

    #[test]
    fn floating_escaped_reference_context() {
        let p = platform(Rect::new(50.0, 0.0, 90.0, 40.0));
        let d = check(&p, &Hide::new(), (300.0, 0.0));
        assert_eq!(d.escaped, Some(true));
        assert_eq!(d.escaped_offsets.map(|o| o.right), Some(200.0));
    }

    #[test]
    fn strategy_limits_checks() {
        let p = platform(Rect::new(120.0, 0.0, 160.0, 40.0));
        let d = check(
            &p,
            &Hide::new().with_strategy(HideStrategy::ESCAPED),
            (10.0, 10.0),
        );
        assert_eq!(d.reference_hidden, None);
        assert_eq!(d.escaped, Some(false));
        assert_eq!(HideStrategy::default(), HideStrategy::all());
    }
}
