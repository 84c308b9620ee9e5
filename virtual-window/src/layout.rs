use alloc::vec::Vec;

use crate::{Rect, Size, ViewKey};

/// Position and metadata for one laid-out item or section.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutInfo<K> {
    pub key: K,
    /// Key of the enclosing section, if any. Children are positioned relative to it.
    pub parent_key: Option<K>,
    pub rect: Rect,
    pub z_index: i32,
    pub is_sticky: bool,
}

impl<K> LayoutInfo<K> {
    pub fn new(key: K, rect: Rect) -> Self {
        Self {
            key,
            parent_key: None,
            rect,
            z_index: 0,
            is_sticky: false,
        }
    }

    pub fn with_parent(mut self, parent_key: K) -> Self {
        self.parent_key = Some(parent_key);
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_sticky(mut self, is_sticky: bool) -> Self {
        self.is_sticky = is_sticky;
        self
    }
}

/// The layout engine collaborator.
///
/// A layout owns item positioning for the current collection. The virtualizer only asks it for
/// the total extent and for the items that intersect a rect; it never computes positions itself.
pub trait Layout {
    type Key: ViewKey;

    /// Total extent of every laid-out item.
    fn content_size(&self) -> Size;

    /// Layout infos intersecting `rect`, parents listed before their children.
    fn visible_layout_infos(&self, rect: Rect) -> Vec<LayoutInfo<Self::Key>>;

    /// Layout info for a single key, regardless of visibility.
    fn layout_info(&self, key: &Self::Key) -> Option<LayoutInfo<Self::Key>>;
}
