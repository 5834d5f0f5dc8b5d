use crate::measurements::sanitize_size;
use crate::{Align, ScrollDirection, ScrollState, VirtualItem};

/// Tracks the scroll position, its direction, the transient `is_scrolling` flag and the
/// anti-jump corrections applied on top of the last observed offset.
#[derive(Clone, Debug)]
pub(crate) struct ScrollController {
    state: ScrollState,
    last_scroll_event_ms: Option<u64>,
}

impl ScrollController {
    pub(crate) fn new(offset: f64) -> Self {
        let offset = sanitize_size(offset);
        Self {
            state: ScrollState {
                offset,
                offset_adjusted: offset,
                direction: None,
                is_scrolling: false,
            },
            last_scroll_event_ms: None,
        }
    }

    pub(crate) fn state(&self) -> ScrollState {
        self.state
    }

    /// The position ranges are computed from.
    pub(crate) fn offset(&self) -> f64 {
        self.state.offset_adjusted
    }

    pub(crate) fn is_scrolling(&self) -> bool {
        self.state.is_scrolling
    }

    pub(crate) fn direction(&self) -> Option<ScrollDirection> {
        self.state.direction
    }

    /// Records a new observed offset and drops pending corrections.
    ///
    /// Returns `false` if the position did not change.
    pub(crate) fn observe(&mut self, offset: f64) -> bool {
        let offset = sanitize_size(offset);
        let prev = self.state.offset_adjusted;
        self.state.offset = offset;
        self.state.offset_adjusted = offset;
        if offset > prev {
            self.state.direction = Some(ScrollDirection::Forward);
        } else if offset < prev {
            self.state.direction = Some(ScrollDirection::Backward);
        } else {
            return false;
        }
        true
    }

    /// Shifts the adjusted offset by `delta` and returns the new position to write.
    pub(crate) fn adjust(&mut self, delta: f64) -> f64 {
        self.state.offset_adjusted = sanitize_size(self.state.offset_adjusted + delta);
        self.state.offset_adjusted
    }

    /// Anti-jump predicate: an item starting above the current top shifts visible content.
    pub(crate) fn is_above_viewport<K>(&self, item: &VirtualItem<K>) -> bool {
        item.start < self.state.offset_adjusted
    }

    /// Returns `true` when this event moved the state machine from idle to scrolling.
    pub(crate) fn scroll_event(&mut self, now_ms: u64) -> bool {
        self.last_scroll_event_ms = Some(now_ms);
        self.set_is_scrolling(true)
    }

    /// Returns `true` when the quiet period elapsed and the state went back to idle.
    pub(crate) fn update_scrolling(&mut self, now_ms: u64, reset_delay_ms: u64) -> bool {
        if !self.state.is_scrolling {
            return false;
        }
        let Some(last) = self.last_scroll_event_ms else {
            return false;
        };
        if now_ms.saturating_sub(last) >= reset_delay_ms {
            return self.set_is_scrolling(false);
        }
        false
    }

    pub(crate) fn set_is_scrolling(&mut self, is_scrolling: bool) -> bool {
        if self.state.is_scrolling == is_scrolling {
            return false;
        }
        self.state.is_scrolling = is_scrolling;
        if !is_scrolling {
            self.state.direction = None;
            self.last_scroll_event_ms = None;
        }
        true
    }

    pub(crate) fn reset(&mut self, offset: f64) {
        *self = Self::new(offset);
    }
}

/// Maps a target offset to the final scroll position for `align`, clamped to `[0, max_offset]`.
///
/// `Auto` resolves to `End` when the target lies at or past the viewport's end, and to
/// `Start` otherwise.
pub(crate) fn offset_for_alignment(
    target: f64,
    align: Align,
    current: f64,
    viewport_size: f64,
    max_offset: f64,
) -> f64 {
    let align = match align {
        Align::Auto if target > current && target >= current + viewport_size => Align::End,
        Align::Auto => Align::Start,
        other => other,
    };
    let offset = match align {
        Align::Start | Align::Auto => target,
        Align::End => target - viewport_size,
        Align::Center => target - viewport_size / 2.0,
    };
    offset.clamp(0.0, max_offset.max(0.0))
}

/// Resolves an item to its alignment target. `None` means `Auto` found the item fully
/// visible and no scroll is needed.
pub(crate) fn offset_for_item<K>(
    item: &VirtualItem<K>,
    align: Align,
    current: f64,
    viewport_size: f64,
    scroll_padding_start: f64,
    scroll_padding_end: f64,
) -> Option<(f64, Align)> {
    let align = match align {
        Align::Auto => {
            let view_start = current + scroll_padding_start;
            let view_end = current + viewport_size - scroll_padding_end;
            // An item overflowing both edges aligns to its end.
            if item.end > view_end {
                Align::End
            } else if item.start < view_start {
                Align::Start
            } else {
                return None;
            }
        }
        other => other,
    };
    let target = match align {
        Align::Start | Align::Auto => item.start - scroll_padding_start,
        Align::End => item.end + scroll_padding_end,
        Align::Center => item.start + item.size / 2.0,
    };
    Some((target, align))
}
