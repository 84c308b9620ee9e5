use alloc::sync::Arc;

use virtual_window::{
    LoadMoreCallback, LoadMoreGate, LoadMoreProps, Size, VirtualizerId, VisibleRectState,
};

use crate::scroll::same_callback;

#[derive(Clone)]
struct CommitDeps {
    content_size: Size,
    virtualizer: VirtualizerId,
    is_loading: bool,
    on_load_more: Option<LoadMoreCallback>,
    props: Arc<LoadMoreProps>,
}

impl CommitDeps {
    fn capture<S: VisibleRectState + ?Sized>(props: &Arc<LoadMoreProps>, state: &S) -> Self {
        Self {
            content_size: state.content_size(),
            virtualizer: state.id(),
            is_loading: props.is_loading,
            on_load_more: props.on_load_more.clone(),
            props: Arc::clone(props),
        }
    }

    fn same_as(&self, other: &CommitDeps) -> bool {
        self.content_size == other.content_size
            && self.virtualizer == other.virtualizer
            && self.is_loading == other.is_loading
            && same_callback(self.on_load_more.as_ref(), other.on_load_more.as_ref())
            && Arc::ptr_eq(&self.props, &other.props)
    }
}

/// Applies the fill policy after each commit.
///
/// Runs only when the content size, the virtualizer, `is_loading`, the callback identity or the
/// props identity changed since the previous run. The gate is resynchronized to the caller's
/// `is_loading` only when the props object itself is new; a commit caused by local state keeps
/// whatever the gate recorded.
pub struct ContentSizeWatcher {
    prev_props: Arc<LoadMoreProps>,
    last_run: Option<CommitDeps>,
}

impl ContentSizeWatcher {
    /// `initial_props` counts as already seen: the first commit does not resync.
    pub fn new(initial_props: &Arc<LoadMoreProps>) -> Self {
        Self {
            prev_props: Arc::clone(initial_props),
            last_run: None,
        }
    }

    /// Returns `true` when `on_load_more` was invoked.
    pub fn after_commit<S>(
        &mut self,
        props: &Arc<LoadMoreProps>,
        state: &S,
        gate: &LoadMoreGate,
    ) -> bool
    where
        S: VisibleRectState + ?Sized,
    {
        let deps = CommitDeps::capture(props, state);
        if self.last_run.as_ref().is_some_and(|last| last.same_as(&deps)) {
            return false;
        }
        self.last_run = Some(deps);

        // Captured before the resync: a load that just finished counts as a transition.
        let was_loading = gate.is_outstanding();
        if !Arc::ptr_eq(props, &self.prev_props) {
            gate.resync(props.is_loading);
            self.prev_props = Arc::clone(props);
        }

        gate.evaluate_fill(
            state.content_size(),
            state.visible_rect().height,
            was_loading,
            props.on_load_more.as_ref(),
        )
    }
}

impl core::fmt::Debug for ContentSizeWatcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ContentSizeWatcher")
            .field("prev_props", &self.prev_props)
            .field("has_run", &self.last_run.is_some())
            .finish()
    }
}
