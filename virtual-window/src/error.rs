use thiserror::Error;

/// Structural problems found while nesting layout infos into a view tree.
///
/// Indexes refer to positions in the flat layout-info list that was being nested.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Two layout infos share the same key.
    #[error("duplicate view key at layout index {index}")]
    DuplicateKey { index: usize },
    /// A layout info names a parent key that is not part of the pass.
    #[error("layout index {index} refers to a parent that is not laid out")]
    MissingParent { index: usize },
    /// Following parent keys from this layout info never reaches a root.
    #[error("layout index {index} is part of a parent cycle")]
    ParentCycle { index: usize },
}
