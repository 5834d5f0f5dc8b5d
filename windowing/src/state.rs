use crate::{Rect, ScrollDirection};

/// A lightweight, serializable snapshot of the current viewport geometry.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    pub rect: Rect,
}

/// Scroll position as tracked by the offset controller.
///
/// `offset` is the raw value last observed from the host. `offset_adjusted` additionally
/// includes anti-jump corrections applied since that observation; it is the position the
/// visible range is computed from.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    pub offset: f64,
    pub offset_adjusted: f64,
    pub direction: Option<ScrollDirection>,
    pub is_scrolling: bool,
}

/// A combined snapshot of viewport + scroll state.
///
/// This is useful for restoring UI state across frames or sessions without
/// coupling the virtualizer to any specific UI framework.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameState {
    pub viewport: ViewportState,
    pub scroll: ScrollState,
}
