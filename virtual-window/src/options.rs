use alloc::vec::Vec;

use crate::Rect;

/// Configuration for [`crate::Virtualizer`].
#[derive(Clone, Debug, PartialEq)]
pub struct VirtualizerOptions<K> {
    /// The visible rect before the viewport reports its first notification.
    pub initial_rect: Option<Rect>,

    /// Keys that stay rendered even when scrolled out of view.
    ///
    /// Their ancestors are rendered too, so the view tree stays well formed.
    pub persisted_keys: Vec<K>,

    /// The focused item, if any. Treated as an additional persisted key.
    pub focused_key: Option<K>,
}

impl<K> Default for VirtualizerOptions<K> {
    fn default() -> Self {
        Self {
            initial_rect: None,
            persisted_keys: Vec::new(),
            focused_key: None,
        }
    }
}

impl<K> VirtualizerOptions<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_rect(mut self, initial_rect: Option<Rect>) -> Self {
        self.initial_rect = initial_rect;
        self
    }

    pub fn with_persisted_keys(mut self, persisted_keys: impl IntoIterator<Item = K>) -> Self {
        self.persisted_keys = persisted_keys.into_iter().collect();
        self
    }

    pub fn with_focused_key(mut self, focused_key: Option<K>) -> Self {
        self.focused_key = focused_key;
        self
    }

    /// Persisted keys followed by the focused key.
    pub(crate) fn retained_keys(&self) -> impl Iterator<Item = &K> {
        self.persisted_keys.iter().chain(self.focused_key.iter())
    }
}
