//! Adapters that drive the `virtual-window` crate from a host UI framework.
//!
//! The `virtual-window` crate holds state and pure decision logic. This crate connects that logic
//! to the two event streams a host delivers:
//!
//! - visible-rect notifications from the scrollable viewport ([`ScrollChangeHandler`])
//! - commit/layout completion, after content size or props changed ([`ContentSizeWatcher`])
//!
//! [`Controller`] bundles both with a [`virtual_window::Virtualizer`] the way a list component
//! would. Nothing here is tied to a specific toolkit.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod scroll;
mod viewport;
mod watcher;


pub use controller::Controller;
pub use scroll::ScrollChangeHandler;
pub use viewport::ScrollViewport;
pub use watcher::ContentSizeWatcher;
