//! Visible-rect tracking, incremental loading and view recycling for virtualized collections.
//!
//! For scroll/commit adapters that drive these pieces from a host framework, see the
//! `virtual-window-adapter` crate.
//!
//! This crate is the headless core of a windowed list: it keeps track of which region of the
//! content is scrolled into view, decides when a caller-supplied "load more" operation should run,
//! and turns the currently visible views into a renderable tree.
//!
//! It is UI-agnostic. A host layer is expected to provide:
//! - a [`Layout`] that positions items and reports the total content size
//! - visible-rect notifications from its scrollable viewport
//! - a way to render one item into a value `V`
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod key;
mod layout;
mod load_more;
mod options;
mod render;
mod types;
mod view;
mod virtualizer;

#[cfg(test)]
mod tests;

pub use error::Error;
pub use key::ViewKey;
pub use layout::{Layout, LayoutInfo};
pub use load_more::{
    LoadMoreCallback, LoadMoreGate, LoadMoreProps, load_more_threshold, should_fill_viewport,
    should_load_on_scroll,
};
pub use options::VirtualizerOptions;
pub use render::{
    ItemStyle, PositionedWrapper, Positioning, RenderWrapper, VirtualizerItem, render_children,
    render_views,
};
pub use types::{FrameState, Point, Rect, Size};
pub use view::{ReusableView, VirtualizerId, build_view_tree};
pub use virtualizer::{RenderStats, Virtualizer, VisibleRectState};
