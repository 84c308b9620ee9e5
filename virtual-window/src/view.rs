use alloc::vec::Vec;
use core::sync::atomic::{AtomicU64, Ordering};

use crate::key::KeyMap;
use crate::{Error, LayoutInfo, ViewKey};

static NEXT_VIRTUALIZER_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies the virtualizer a view belongs to.
///
/// This is a plain handle rather than a reference, so view trees never own (or borrow) the state
/// that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualizerId(u64);

impl VirtualizerId {
    pub(crate) fn next() -> Self {
        Self(NEXT_VIRTUALIZER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A recyclable rendered representation of one collection item or section.
#[derive(Clone, Debug, PartialEq)]
pub struct ReusableView<K, V> {
    pub key: K,
    pub layout_info: LayoutInfo<K>,
    pub rendered: V,
    /// Child views for sections; empty for plain items.
    pub children: Vec<ReusableView<K, V>>,
    pub virtualizer: VirtualizerId,
}

impl<K: ViewKey, V> ReusableView<K, V> {
    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of views in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Depth-first search for `key` in this subtree.
    pub fn find(&self, key: &K) -> Option<&ReusableView<K, V>> {
        if self.key == *key {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(key))
    }
}

/// Nests a flat list of layout infos into a view tree using each info's `parent_key`.
///
/// `render` is called once per info, parents before children. Sibling order follows the order
/// of `infos`.
pub fn build_view_tree<K: ViewKey, V>(
    infos: Vec<LayoutInfo<K>>,
    virtualizer: VirtualizerId,
    mut render: impl FnMut(&LayoutInfo<K>) -> V,
) -> Result<Vec<ReusableView<K, V>>, Error> {
    let count = infos.len();

    let mut index_of: KeyMap<K, usize> = KeyMap::new();
    for (index, info) in infos.iter().enumerate() {
        if index_of.insert(info.key.clone(), index).is_some() {
            return Err(Error::DuplicateKey { index });
        }
    }

    let mut parents: Vec<Option<usize>> = Vec::with_capacity(count);
    for (index, info) in infos.iter().enumerate() {
        let parent = match &info.parent_key {
            Some(parent_key) => match index_of.get(parent_key) {
                Some(&p) => Some(p),
                None => return Err(Error::MissingParent { index }),
            },
            None => None,
        };
        parents.push(parent);
    }

    for start in 0..count {
        let mut cur = start;
        let mut steps = 0usize;
        while let Some(p) = parents[cur] {
            steps += 1;
            if steps > count {
                return Err(Error::ParentCycle { index: start });
            }
            cur = p;
        }
    }

    let mut children_of: Vec<Vec<usize>> = (0..count).map(|_| Vec::new()).collect();
    let mut roots = Vec::new();
    for (index, parent) in parents.iter().enumerate() {
        match parent {
            Some(p) => children_of[*p].push(index),
            None => roots.push(index),
        }
    }

    let mut slots: Vec<Option<LayoutInfo<K>>> = infos.into_iter().map(Some).collect();
    let mut out = Vec::with_capacity(roots.len());
    for root in roots {
        if let Some(view) = take_subtree(root, &mut slots, &children_of, virtualizer, &mut render) {
            out.push(view);
        }
    }
    Ok(out)
}

fn take_subtree<K: ViewKey, V>(
    index: usize,
    slots: &mut [Option<LayoutInfo<K>>],
    children_of: &[Vec<usize>],
    virtualizer: VirtualizerId,
    render: &mut impl FnMut(&LayoutInfo<K>) -> V,
) -> Option<ReusableView<K, V>> {
    // Each slot is reachable from exactly one parent once cycles are ruled out.
    let layout_info = slots[index].take()?;
    let rendered = render(&layout_info);
    let children = children_of[index]
        .iter()
        .filter_map(|&child| take_subtree(child, slots, children_of, virtualizer, render))
        .collect();
    Some(ReusableView {
        key: layout_info.key.clone(),
        layout_info,
        rendered,
        children,
        virtualizer,
    })
}
