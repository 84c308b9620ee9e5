use alloc::sync::Arc;

use virtual_window::{LoadMoreCallback, LoadMoreGate, Rect, VirtualizerId, VisibleRectState};

pub(crate) fn same_callback(a: Option<&LoadMoreCallback>, b: Option<&LoadMoreCallback>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Bridges viewport visible-rect notifications into the state and the threshold policy.
///
/// A host that subscribes this handler to its viewport can use [`Self::generation`] as the
/// subscription identity: it only changes when the captured virtualizer or callback changes.
#[derive(Clone)]
pub struct ScrollChangeHandler {
    virtualizer: VirtualizerId,
    on_load_more: Option<LoadMoreCallback>,
    generation: u64,
}

impl ScrollChangeHandler {
    pub fn new(virtualizer: VirtualizerId, on_load_more: Option<LoadMoreCallback>) -> Self {
        Self {
            virtualizer,
            on_load_more,
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn virtualizer(&self) -> VirtualizerId {
        self.virtualizer
    }

    /// Re-captures the dependencies, bumping the generation only if one of them changed.
    ///
    /// Returns `true` when the handler was re-created.
    pub fn refresh(
        &mut self,
        virtualizer: VirtualizerId,
        on_load_more: Option<&LoadMoreCallback>,
    ) -> bool {
        if self.virtualizer == virtualizer
            && same_callback(self.on_load_more.as_ref(), on_load_more)
        {
            return false;
        }
        self.virtualizer = virtualizer;
        self.on_load_more = on_load_more.cloned();
        self.generation = self.generation.wrapping_add(1);
        vtrace!(generation = self.generation, "ScrollChangeHandler::refresh");
        true
    }

    /// Applies one visible-rect notification.
    ///
    /// The rect is written to `state` first, whether or not a callback is registered, so the
    /// threshold check always sees the content size for the new rect. Returns `true` when
    /// `on_load_more` was invoked.
    pub fn handle<S>(&self, state: &mut S, gate: &LoadMoreGate, rect: Rect) -> bool
    where
        S: VisibleRectState + ?Sized,
    {
        if state.id() != self.virtualizer {
            vwarn!(
                expected = self.virtualizer.get(),
                actual = state.id().get(),
                "ScrollChangeHandler: handler is stale for this virtualizer"
            );
        }
        state.set_visible_rect(rect);
        gate.evaluate_threshold(rect, state.content_size(), self.on_load_more.as_ref())
    }
}

impl core::fmt::Debug for ScrollChangeHandler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollChangeHandler")
            .field("virtualizer", &self.virtualizer)
            .field("has_on_load_more", &self.on_load_more.is_some())
            .field("generation", &self.generation)
            .finish()
    }
}
