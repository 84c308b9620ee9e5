use alloc::vec::Vec;

use crate::{LayoutInfo, ReusableView, VirtualizerId};

/// Wraps one reusable view into a renderable node of type `O`.
///
/// The walker hands each wrapper the parent view, the view itself, its child views, and a
/// continuation that renders a slice of views as children of `view`. A wrapper decides whether
/// (and where) to call the continuation; one that never calls it renders a flat list.
///
/// Any closure or function with the same shape as [`RenderWrapper::wrap`] is a wrapper.
pub trait RenderWrapper<K, V, O> {
    fn wrap(
        &self,
        parent: Option<&ReusableView<K, V>>,
        view: &ReusableView<K, V>,
        children: &[ReusableView<K, V>],
        render_children: &mut dyn FnMut(&[ReusableView<K, V>]) -> Vec<O>,
    ) -> O;
}

impl<K, V, O, F> RenderWrapper<K, V, O> for F
where
    F: Fn(
        Option<&ReusableView<K, V>>,
        &ReusableView<K, V>,
        &[ReusableView<K, V>],
        &mut dyn FnMut(&[ReusableView<K, V>]) -> Vec<O>,
    ) -> O,
{
    fn wrap(
        &self,
        parent: Option<&ReusableView<K, V>>,
        view: &ReusableView<K, V>,
        children: &[ReusableView<K, V>],
        render_children: &mut dyn FnMut(&[ReusableView<K, V>]) -> Vec<O>,
    ) -> O {
        self(parent, view, children, render_children)
    }
}

/// Wraps `views` (children of `parent`) with `wrapper`, recursing through the continuation.
pub fn render_children<K, V, O, W>(
    parent: Option<&ReusableView<K, V>>,
    views: &[ReusableView<K, V>],
    wrapper: &W,
) -> Vec<O>
where
    W: RenderWrapper<K, V, O> + ?Sized,
{
    views
        .iter()
        .map(|view| {
            wrapper.wrap(parent, view, &view.children, &mut |child_views| {
                render_children(Some(view), child_views, wrapper)
            })
        })
        .collect()
}

/// Wraps a top-level list of views.
pub fn render_views<K, V, O, W>(views: &[ReusableView<K, V>], wrapper: &W) -> Vec<O>
where
    W: RenderWrapper<K, V, O> + ?Sized,
{
    render_children(None, views, wrapper)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Positioning {
    #[default]
    Absolute,
    Sticky,
}

/// Placement of a wrapped item, relative to its parent's layout rect.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStyle {
    pub positioning: Positioning,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub z_index: i32,
}

impl ItemStyle {
    pub fn for_layout<K>(layout_info: &LayoutInfo<K>, parent: Option<&LayoutInfo<K>>) -> Self {
        let (origin_x, origin_y) = parent.map_or((0.0, 0.0), |p| (p.rect.x, p.rect.y));
        let rect = layout_info.rect;
        Self {
            positioning: if layout_info.is_sticky {
                Positioning::Sticky
            } else {
                Positioning::Absolute
            },
            left: rect.x - origin_x,
            top: rect.y - origin_y,
            width: rect.width,
            height: rect.height,
            z_index: layout_info.z_index,
        }
    }
}

/// Output node of [`PositionedWrapper`].
#[derive(Clone, Debug, PartialEq)]
pub struct VirtualizerItem<K, V> {
    pub key: K,
    pub layout_info: LayoutInfo<K>,
    pub parent: Option<LayoutInfo<K>>,
    pub virtualizer: VirtualizerId,
    pub style: ItemStyle,
    pub content: V,
    pub children: Vec<VirtualizerItem<K, V>>,
}

impl<K, V> VirtualizerItem<K, V> {
    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Pre-order traversal; `f` receives each node and its depth (0 for `self`).
    pub fn walk(&self, f: &mut impl FnMut(&VirtualizerItem<K, V>, usize)) {
        self.walk_at(0, f);
    }

    fn walk_at(&self, depth: usize, f: &mut impl FnMut(&VirtualizerItem<K, V>, usize)) {
        f(self, depth);
        for child in &self.children {
            child.walk_at(depth + 1, f);
        }
    }
}

/// The default wrapper: positions every item absolutely from its layout info and nests
/// section children under their parent.
#[derive(Clone, Copy, Debug, Default)]
pub struct PositionedWrapper;

impl<K: Clone, V: Clone> RenderWrapper<K, V, VirtualizerItem<K, V>> for PositionedWrapper {
    fn wrap(
        &self,
        parent: Option<&ReusableView<K, V>>,
        view: &ReusableView<K, V>,
        children: &[ReusableView<K, V>],
        render_children: &mut dyn FnMut(&[ReusableView<K, V>]) -> Vec<VirtualizerItem<K, V>>,
    ) -> VirtualizerItem<K, V> {
        let parent_info = parent.map(|p| &p.layout_info);
        VirtualizerItem {
            key: view.key.clone(),
            layout_info: view.layout_info.clone(),
            parent: parent_info.cloned(),
            virtualizer: view.virtualizer,
            style: ItemStyle::for_layout(&view.layout_info, parent_info),
            content: view.rendered.clone(),
            children: render_children(children),
        }
    }
}
