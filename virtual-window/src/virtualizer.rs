use alloc::vec::Vec;

use crate::key::KeyMap;
use crate::view::build_view_tree;
use crate::{
    Error, FrameState, Layout, LayoutInfo, Rect, ReusableView, Size, VirtualizerId,
    VirtualizerOptions,
};

/// The visible-rect state as seen by scroll and commit adapters.
pub trait VisibleRectState {
    fn id(&self) -> VirtualizerId;
    fn visible_rect(&self) -> Rect;
    fn set_visible_rect(&mut self, rect: Rect);
    /// Total content size as computed by the layout.
    fn content_size(&self) -> Size;
}

/// Counters from the most recent [`Virtualizer::visible_views`] pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Views in the last produced tree.
    pub views_in_use: usize,
    /// Views rendered from scratch in the last pass.
    pub rendered: usize,
    /// Views whose rendered value was recycled from the previous pass.
    pub reused: usize,
    /// Total number of passes so far.
    pub passes: usize,
}

/// Virtualization state: the visible rect, the layout it is resolved against, and the pool of
/// rendered values kept for recycling.
///
/// The virtualizer holds no UI objects. Adapters feed it visible-rect changes and ask it for the
/// views to draw.
pub struct Virtualizer<L: Layout, V> {
    id: VirtualizerId,
    layout: L,
    options: VirtualizerOptions<L::Key>,
    visible_rect: Rect,
    is_scrolling: bool,
    reuse_pool: KeyMap<L::Key, V>,
    stats: RenderStats,
}

impl<L: Layout, V: Clone> Virtualizer<L, V> {
    pub fn new(layout: L, options: VirtualizerOptions<L::Key>) -> Self {
        let visible_rect = options.initial_rect.unwrap_or_default();
        let id = VirtualizerId::next();
        vdebug!(id = id.get(), "Virtualizer::new");
        Self {
            id,
            layout,
            options,
            visible_rect,
            is_scrolling: false,
            reuse_pool: KeyMap::new(),
            stats: RenderStats::default(),
        }
    }

    pub fn id(&self) -> VirtualizerId {
        self.id
    }

    pub fn options(&self) -> &VirtualizerOptions<L::Key> {
        &self.options
    }

    pub fn set_options(&mut self, options: VirtualizerOptions<L::Key>) {
        self.options = options;
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Mutable access to the layout, e.g. after the collection grew.
    ///
    /// Recycled views are kept; call [`Self::invalidate`] if existing items changed content.
    pub fn layout_mut(&mut self) -> &mut L {
        &mut self.layout
    }

    /// Replaces the layout and drops every recycled view.
    pub fn set_layout(&mut self, layout: L) {
        self.layout = layout;
        self.invalidate();
    }

    /// Forces every view to be rendered again on the next pass.
    pub fn invalidate(&mut self) {
        vtrace!(pooled = self.reuse_pool.len(), "Virtualizer::invalidate");
        self.reuse_pool.clear();
    }

    pub fn visible_rect(&self) -> Rect {
        self.visible_rect
    }

    pub fn set_visible_rect(&mut self, rect: Rect) {
        if self.visible_rect == rect {
            return;
        }
        vtrace!(
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            "Virtualizer::set_visible_rect"
        );
        self.visible_rect = rect;
    }

    pub fn content_size(&self) -> Size {
        self.layout.content_size()
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    pub fn start_scrolling(&mut self) {
        self.is_scrolling = true;
    }

    pub fn end_scrolling(&mut self) {
        self.is_scrolling = false;
    }

    pub fn persisted_keys(&self) -> &[L::Key] {
        &self.options.persisted_keys
    }

    pub fn set_persisted_keys(&mut self, keys: impl IntoIterator<Item = L::Key>) {
        self.options.persisted_keys = keys.into_iter().collect();
    }

    pub fn set_focused_key(&mut self, key: Option<L::Key>) {
        self.options.focused_key = key;
    }

    /// Returns a combined snapshot of visible rect, content size and scrolling state.
    pub fn frame_state(&self) -> FrameState {
        FrameState {
            visible_rect: self.visible_rect,
            content_size: self.content_size(),
            is_scrolling: self.is_scrolling,
        }
    }

    /// Restores the visible rect and scrolling flag from a snapshot.
    ///
    /// The content size is owned by the layout and is not restored.
    pub fn restore_frame_state(&mut self, frame: FrameState) {
        self.set_visible_rect(frame.visible_rect);
        self.is_scrolling = frame.is_scrolling;
    }

    pub fn render_stats(&self) -> RenderStats {
        self.stats
    }

    /// Resolves the current visible rect into a tree of reusable views.
    ///
    /// `render_view` is only called for keys that were not part of the previous pass; other
    /// views reuse their previously rendered value.
    ///
    /// Views whose parent the layout cannot resolve are rendered as roots. Duplicate keys and
    /// parent cycles fail the pass.
    pub fn visible_views(
        &mut self,
        mut render_view: impl FnMut(&LayoutInfo<L::Key>) -> V,
    ) -> Result<Vec<ReusableView<L::Key, V>>, Error> {
        let infos = self.collect_layout_infos();

        let pool = &self.reuse_pool;
        let mut rendered = 0usize;
        let mut reused = 0usize;
        let views = build_view_tree(infos, self.id, |info| match pool.get(&info.key) {
            Some(value) => {
                reused += 1;
                value.clone()
            }
            None => {
                rendered += 1;
                render_view(info)
            }
        });
        let views = match views {
            Ok(views) => views,
            Err(err) => {
                vwarn!(error = ?err, "Virtualizer::visible_views: layout is not a tree");
                return Err(err);
            }
        };

        let mut next_pool = KeyMap::new();
        fill_pool(&views, &mut next_pool);
        self.reuse_pool = next_pool;
        self.stats = RenderStats {
            views_in_use: self.reuse_pool.len(),
            rendered,
            reused,
            passes: self.stats.passes.saturating_add(1),
        };
        vtrace!(rendered, reused, "Virtualizer::visible_views");
        Ok(views)
    }

    fn collect_layout_infos(&self) -> Vec<LayoutInfo<L::Key>> {
        let mut infos = self.layout.visible_layout_infos(self.visible_rect);
        let mut present: KeyMap<L::Key, ()> = KeyMap::new();
        for info in &infos {
            present.insert(info.key.clone(), ());
        }

        for key in self.options.retained_keys() {
            if present.contains_key(key) {
                continue;
            }
            match self.layout.layout_info(key) {
                Some(info) => {
                    present.insert(info.key.clone(), ());
                    infos.push(info);
                }
                None => {
                    vdebug!("Virtualizer: persisted key is not in the layout");
                }
            }
        }

        // Pull in ancestors of anything whose parent is not laid out in this pass. Each key is
        // added at most once, so this terminates even for cyclic layouts.
        let mut i = 0;
        while i < infos.len() {
            if let Some(parent_key) = infos[i].parent_key.clone() {
                if !present.contains_key(&parent_key) {
                    if let Some(parent) = self.layout.layout_info(&parent_key) {
                        present.insert(parent.key.clone(), ());
                        infos.push(parent);
                    }
                }
            }
            i += 1;
        }

        // A parent the layout cannot resolve would fail the whole pass; render the child as a root.
        for info in &mut infos {
            if info
                .parent_key
                .as_ref()
                .is_some_and(|parent_key| !present.contains_key(parent_key))
            {
                vwarn!("Virtualizer: parent key is not in the layout, rendering view as a root");
                info.parent_key = None;
            }
        }
        infos
    }
}

impl<L, V> core::fmt::Debug for Virtualizer<L, V>
where
    L: Layout,
    L::Key: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Virtualizer")
            .field("id", &self.id)
            .field("options", &self.options)
            .field("visible_rect", &self.visible_rect)
            .field("is_scrolling", &self.is_scrolling)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

fn fill_pool<K: crate::ViewKey, V: Clone>(views: &[ReusableView<K, V>], pool: &mut KeyMap<K, V>) {
    for view in views {
        pool.insert(view.key.clone(), view.rendered.clone());
        fill_pool(&view.children, pool);
    }
}

impl<L: Layout, V: Clone> VisibleRectState for Virtualizer<L, V> {
    fn id(&self) -> VirtualizerId {
        Virtualizer::id(self)
    }

    fn visible_rect(&self) -> Rect {
        Virtualizer::visible_rect(self)
    }

    fn set_visible_rect(&mut self, rect: Rect) {
        Virtualizer::set_visible_rect(self, rect);
    }

    fn content_size(&self) -> Size {
        Virtualizer::content_size(self)
    }
}
