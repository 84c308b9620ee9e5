use alloc::sync::Arc;
use core::cell::Cell;

use crate::{Rect, Size};

/// Caller-supplied operation that fetches more collection items.
///
/// The virtualizer never awaits it; completion is signalled by the caller supplying new
/// [`LoadMoreProps`] with `is_loading = false`.
pub type LoadMoreCallback = Arc<dyn Fn() + Send + Sync>;

/// The loading/callback pair a caller hands to the virtualizer on every render.
///
/// Adapters compare these by `Arc` identity: a new `Arc<LoadMoreProps>` is an external update, the
/// same `Arc` seen again is a re-render caused by local state.
#[derive(Clone, Default)]
pub struct LoadMoreProps {
    pub is_loading: bool,
    pub on_load_more: Option<LoadMoreCallback>,
}

impl LoadMoreProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_is_loading(mut self, is_loading: bool) -> Self {
        self.is_loading = is_loading;
        self
    }

    pub fn with_on_load_more(mut self, on_load_more: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_load_more = Some(Arc::new(on_load_more));
        self
    }

    /// Reuses an existing callback so its identity is preserved across props objects.
    pub fn with_callback(mut self, on_load_more: Option<LoadMoreCallback>) -> Self {
        self.on_load_more = on_load_more;
        self
    }
}

impl core::fmt::Debug for LoadMoreProps {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoadMoreProps")
            .field("is_loading", &self.is_loading)
            .field("on_load_more", &self.on_load_more.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Vertical scroll offset past which a visible rect should request more items.
///
/// Loading starts once less than one viewport of content remains below the bottom edge of the
/// viewport. With a zero-height viewport this is simply the content height.
pub fn load_more_threshold(content_height: f64, viewport_height: f64) -> f64 {
    content_height - viewport_height * 2.0
}

/// Threshold policy, run on every visible-rect change.
pub fn should_load_on_scroll(
    rect: Rect,
    content_size: Size,
    is_outstanding: bool,
    has_callback: bool,
) -> bool {
    if is_outstanding || !has_callback {
        return false;
    }
    rect.y > load_more_threshold(content_size.height, rect.height)
}

/// Fill policy, run after layout when the content may not fill the viewport yet.
///
/// Fires only when there is positive content shorter than the viewport, and either a load just
/// finished (`was_loading`) or the content height actually changed since the last evaluation.
pub fn should_fill_viewport(
    content_size: Size,
    viewport_height: f64,
    last_content_height: f64,
    was_loading: bool,
    is_outstanding: bool,
    has_callback: bool,
) -> bool {
    if is_outstanding || !has_callback {
        return false;
    }
    let height = content_size.height;
    // NaN fails both comparisons.
    if !(height > 0.0) || !(height <= viewport_height) {
        return false;
    }
    was_loading || height != last_content_height
}

/// The outstanding-load register shared by both trigger policies.
///
/// State lives in `Cell`s so it can be read and written through `&self` without taking part in
/// any change notification. At most one load is outstanding per episode; an episode ends only when
/// [`LoadMoreGate::resync`] is called with `false`.
#[derive(Debug, Default)]
pub struct LoadMoreGate {
    outstanding: Cell<bool>,
    last_content_height: Cell<f64>,
}

impl LoadMoreGate {
    pub fn new(is_loading: bool) -> Self {
        Self {
            outstanding: Cell::new(is_loading),
            last_content_height: Cell::new(0.0),
        }
    }

    pub fn is_outstanding(&self) -> bool {
        self.outstanding.get()
    }

    /// Overwrites the register with a caller-declared loading state.
    pub fn resync(&self, is_loading: bool) {
        if self.outstanding.replace(is_loading) != is_loading {
            vtrace!(is_loading, "LoadMoreGate::resync");
        }
    }

    pub fn last_content_height(&self) -> f64 {
        self.last_content_height.get()
    }

    /// Applies the threshold policy and invokes `on_load_more` when it passes.
    ///
    /// Returns `true` when the callback was invoked.
    pub fn evaluate_threshold(
        &self,
        rect: Rect,
        content_size: Size,
        on_load_more: Option<&LoadMoreCallback>,
    ) -> bool {
        let Some(on_load_more) = on_load_more else {
            return false;
        };
        if !should_load_on_scroll(rect, content_size, self.outstanding.get(), true) {
            return false;
        }
        vdebug!(
            y = rect.y,
            viewport_height = rect.height,
            content_height = content_size.height,
            "load more: scroll threshold crossed"
        );
        self.fire(on_load_more);
        true
    }

    /// Applies the fill policy and invokes `on_load_more` when it passes.
    ///
    /// Always records `content_size.height` as the last seen content height, fired or not.
    /// Returns `true` when the callback was invoked.
    pub fn evaluate_fill(
        &self,
        content_size: Size,
        viewport_height: f64,
        was_loading: bool,
        on_load_more: Option<&LoadMoreCallback>,
    ) -> bool {
        let last = self.last_content_height.replace(content_size.height);
        let Some(on_load_more) = on_load_more else {
            return false;
        };
        if !should_fill_viewport(
            content_size,
            viewport_height,
            last,
            was_loading,
            self.outstanding.get(),
            true,
        ) {
            return false;
        }
        vdebug!(
            content_height = content_size.height,
            viewport_height,
            was_loading,
            "load more: viewport not filled"
        );
        self.fire(on_load_more);
        true
    }

    fn fire(&self, on_load_more: &LoadMoreCallback) {
        // Set before invoking so a re-entrant evaluation sees the load as outstanding.
        self.outstanding.set(true);
        on_load_more();
    }
}
