//! A headless windowed-rendering engine.
//!
//! For host-side plumbing (observer subscriptions, timers, scroll writes), see the
//! `windowing-host` crate.
//!
//! This crate holds the core algorithms needed to render massive lists at interactive frame
//! rates: an incrementally recomputed measurement list, fast offset → index lookup, overscanned
//! visible ranges, and scroll corrections that keep content from jumping while items are
//! measured.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - viewport size (height/width)
//! - scroll offset
//! - item size estimates and (optionally) dynamic measurements
//! - a way to write scroll offsets back to its scroll container
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod emitter;
mod key;
mod measurements;
mod options;
mod range;
mod scroll;
mod state;
mod types;
mod virtualizer;

#[cfg(test)]
mod tests;

pub use emitter::IndexEmitter;
pub use measurements::sanitize_size;
pub use options::{
    InitialOffset, ItemVisibilityCallback, OnChangeCallback, RangeExtractor,
    ShouldAdjustScrollPositionOnItemSizeChangeCallback, VirtualizerOptions,
};
pub use range::{calculate_range, default_range_extractor};
pub use state::{FrameState, ScrollState, ViewportState};
pub use types::{
    Align, ItemKey, ItemVisibility, Range, Rect, ScrollDirection, VirtualItem, VisibleRange,
};
pub use virtualizer::Virtualizer;

#[doc(hidden)]
pub use key::KeyCacheKey;
