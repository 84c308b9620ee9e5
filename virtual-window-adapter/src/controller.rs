use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use virtual_window::{
    Error, Layout, LayoutInfo, LoadMoreGate, LoadMoreProps, Point, Rect, RenderWrapper,
    Virtualizer, render_views,
};

use crate::{ContentSizeWatcher, ScrollChangeHandler, ScrollViewport};

/// A framework-neutral list controller: a [`Virtualizer`] plus load-more coordination.
///
/// This type does not hold any UI objects beyond an optional [`ScrollViewport`]. Hosts drive it
/// by calling:
/// - `on_visible_rect_change` for every viewport scroll/resize notification
/// - `set_props` when the caller hands over a new loading/callback pair
/// - `commit` after each render/layout pass
/// - `render` to obtain the wrapped view tree
pub struct Controller<L: Layout, V> {
    v: Virtualizer<L, V>,
    props: Arc<LoadMoreProps>,
    gate: LoadMoreGate,
    scroll: ScrollChangeHandler,
    watcher: ContentSizeWatcher,
    viewport: Option<Box<dyn ScrollViewport>>,
}

impl<L: Layout, V: Clone> Controller<L, V> {
    pub fn new(v: Virtualizer<L, V>, props: Arc<LoadMoreProps>) -> Self {
        let scroll = ScrollChangeHandler::new(v.id(), props.on_load_more.clone());
        let watcher = ContentSizeWatcher::new(&props);
        Self {
            gate: LoadMoreGate::new(props.is_loading),
            v,
            props,
            scroll,
            watcher,
            viewport: None,
        }
    }

    pub fn virtualizer(&self) -> &Virtualizer<L, V> {
        &self.v
    }

    pub fn virtualizer_mut(&mut self) -> &mut Virtualizer<L, V> {
        &mut self.v
    }

    pub fn into_virtualizer(self) -> Virtualizer<L, V> {
        self.v
    }

    pub fn props(&self) -> &Arc<LoadMoreProps> {
        &self.props
    }

    /// Hands over the caller's latest props. Takes effect for scrolling immediately and for the
    /// fill policy on the next [`Self::commit`].
    pub fn set_props(&mut self, props: Arc<LoadMoreProps>) {
        self.props = props;
        self.scroll.refresh(self.v.id(), self.props.on_load_more.as_ref());
    }

    pub fn is_load_outstanding(&self) -> bool {
        self.gate.is_outstanding()
    }

    /// Identity of the scroll subscription; stable until the callback changes.
    pub fn scroll_handler_generation(&self) -> u64 {
        self.scroll.generation()
    }

    pub fn attach_viewport(&mut self, viewport: Box<dyn ScrollViewport>) {
        self.viewport = Some(viewport);
    }

    pub fn detach_viewport(&mut self) -> Option<Box<dyn ScrollViewport>> {
        self.viewport.take()
    }

    pub fn has_viewport(&self) -> bool {
        self.viewport.is_some()
    }

    /// Call this for every visible-rect notification from the viewport.
    ///
    /// Returns `true` when `on_load_more` was invoked.
    pub fn on_visible_rect_change(&mut self, rect: Rect) -> bool {
        self.scroll.handle(&mut self.v, &self.gate, rect)
    }

    /// Call this after every render/layout pass.
    ///
    /// Returns `true` when `on_load_more` was invoked.
    pub fn commit(&mut self) -> bool {
        self.watcher.after_commit(&self.props, &self.v, &self.gate)
    }

    pub fn on_scroll_start(&mut self) {
        self.v.start_scrolling();
    }

    pub fn on_scroll_end(&mut self) {
        self.v.end_scrolling();
    }

    /// Moves the visible rect to `origin` and pushes the position to the viewport.
    ///
    /// Without an attached viewport only the state is updated. The threshold policy runs when the
    /// viewport reports the new rect back through [`Self::on_visible_rect_change`].
    pub fn scroll_to(&mut self, origin: Point) {
        let rect = self.v.visible_rect().with_origin(origin);
        self.v.set_visible_rect(rect);
        match self.viewport.as_mut() {
            Some(viewport) => {
                viewport.set_scroll_left(origin.x);
                viewport.set_scroll_top(origin.y);
            }
            None => {
                vdebug!(x = origin.x, y = origin.y, "scroll_to: no viewport attached");
            }
        }
    }

    /// Resolves the visible views and wraps them with `wrapper`.
    pub fn render<O, W>(
        &mut self,
        wrapper: &W,
        render_view: impl FnMut(&LayoutInfo<L::Key>) -> V,
    ) -> Result<Vec<O>, Error>
    where
        W: RenderWrapper<L::Key, V, O> + ?Sized,
    {
        let views = self.v.visible_views(render_view)?;
        Ok(render_views(&views, wrapper))
    }
}

impl<L, V> core::fmt::Debug for Controller<L, V>
where
    L: Layout,
    L::Key: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Controller")
            .field("v", &self.v)
            .field("props", &self.props)
            .field("gate", &self.gate)
            .field("scroll", &self.scroll)
            .field("has_viewport", &self.viewport.is_some())
            .finish_non_exhaustive()
    }
}
