#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    Auto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// Whether an item joined or left the rendered set during a recompute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemVisibility {
    Entered,
    Left,
}

/// Size of the scroll container as reported by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Extent along the virtualized axis.
    pub fn main(&self, horizontal: bool) -> f64 {
        if horizontal { self.width } else { self.height }
    }
}

/// The minimal window of items intersecting the viewport, before overscan.
///
/// Both bounds are inclusive: `start_index <= end_index < count`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    pub start_index: usize,
    pub end_index: usize,
}

impl VisibleRange {
    pub fn contains(&self, index: usize) -> bool {
        self.start_index <= index && index <= self.end_index
    }
}

/// Input of a range extractor: the visible range plus the settings needed to widen it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub start_index: usize,
    pub end_index: usize, // inclusive, visible range (no overscan)
    pub overscan: usize,
    pub count: usize,
}

/// One laid-out item. `end == start + size`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualItem<K = ItemKey> {
    pub index: usize,
    pub key: K,
    /// Start offset in the scroll axis (includes `padding_start`).
    pub start: f64,
    pub end: f64,
    pub size: f64,
}

pub type ItemKey = u64;
