use alloc::sync::Arc;

use crate::virtualizer::Virtualizer;
use crate::{ItemKey, ItemVisibility, Range, Rect, VirtualItem};

/// A callback fired after a recompute changed the visible output.
///
/// The second argument is `sync`: `true` when the update was driven by scrolling (or a scroll
/// correction) and must be flushed before the next paint, `false` for updates the host may
/// defer (option changes, plain measurements).
pub type OnChangeCallback<K> = Arc<dyn Fn(&Virtualizer<K>, bool) + Send + Sync>;

/// A callback fired for each item that joined or left the rendered set.
///
/// Hosts use it to hook measurement up when an item is attached and to release it when the
/// item is detached.
pub type ItemVisibilityCallback<K> = Arc<dyn Fn(&VirtualItem<K>, ItemVisibility) + Send + Sync>;

/// A hook that decides whether to adjust scroll position when an item size changes.
///
/// This is typically used to prevent visual "jumps" when an item above the current scroll offset
/// is measured and differs from its estimate. The third argument is `new_size - old_size`.
pub type ShouldAdjustScrollPositionOnItemSizeChangeCallback<K> =
    Arc<dyn Fn(&Virtualizer<K>, &VirtualItem<K>, f64) -> bool + Send + Sync>;

/// A callback that emits virtual item indexes for a given visible range.
///
/// Instead of returning a `Vec`, the extractor receives an `emit` callback and can push indexes
/// directly into the virtualizer's output buffer.
///
/// The emitted sequence is used as-is: order is preserved (reverse or non-contiguous selections
/// are fine) and only indexes outside `[0, range.count)` are dropped.
///
/// Tip: use [`crate::IndexEmitter`] or [`crate::default_range_extractor`] as building blocks.
pub type RangeExtractor = Arc<dyn Fn(Range, &mut dyn FnMut(usize)) + Send + Sync>;

/// Initial scroll offset configuration.
#[derive(Clone)]
pub enum InitialOffset {
    /// A fixed initial offset.
    Value(f64),
    /// A lazily evaluated initial offset provider (called by `Virtualizer::new`).
    Provider(Arc<dyn Fn() -> f64 + Send + Sync>),
}

impl InitialOffset {
    pub(crate) fn resolve(&self) -> f64 {
        match self {
            Self::Value(v) => *v,
            Self::Provider(f) => f(),
        }
    }
}

impl Default for InitialOffset {
    fn default() -> Self {
        Self::Value(0.0)
    }
}

impl core::fmt::Debug for InitialOffset {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}

/// Configuration for [`crate::Virtualizer`].
///
/// This type is designed to be cheap to clone: closures are stored in `Arc`s so adapters can
/// update a few fields and call `Virtualizer::set_options` without reallocating them. Closure
/// identity matters: replacing `estimate_size` with a new `Arc` clears the measurement cache.
pub struct VirtualizerOptions<K = ItemKey> {
    pub count: usize,
    /// Provisional size of an item before it is measured. Negative or non-finite results are
    /// treated as `0`.
    pub estimate_size: Arc<dyn Fn(usize) -> f64 + Send + Sync>,
    pub get_item_key: Arc<dyn Fn(usize) -> K + Send + Sync>,
    /// Optional index selection hook. `None` uses [`crate::default_range_extractor`].
    pub range_extractor: Option<RangeExtractor>,

    /// Enables/disables the virtualizer. When disabled, query methods return empty results.
    pub enabled: bool,

    pub overscan: usize,

    /// Virtualize along the x axis (`Rect::width`) instead of the y axis.
    pub horizontal: bool,

    /// The initial size of the scrollable area, used until the host reports one.
    pub initial_rect: Option<Rect>,

    /// Padding before the first item.
    pub padding_start: f64,
    /// Padding after the last item.
    pub padding_end: f64,

    /// Additional padding applied when computing scroll-to-index offsets.
    pub scroll_padding_start: f64,
    /// Additional padding applied when computing scroll-to-index offsets.
    pub scroll_padding_end: f64,

    pub initial_offset: InitialOffset,

    pub on_change: Option<OnChangeCallback<K>>,

    pub on_item_visibility: Option<ItemVisibilityCallback<K>>,

    /// Quiet period after the last scroll event before `is_scrolling` resets.
    pub is_scrolling_reset_delay_ms: u64,

    /// Overrides the default anti-jump rule (`item.start < current offset`).
    pub should_adjust_scroll_position_on_item_size_change:
        Option<ShouldAdjustScrollPositionOnItemSizeChangeCallback<K>>,
}

impl<K> Clone for VirtualizerOptions<K> {
    fn clone(&self) -> Self {
        Self {
            count: self.count,
            estimate_size: Arc::clone(&self.estimate_size),
            get_item_key: Arc::clone(&self.get_item_key),
            range_extractor: self.range_extractor.clone(),
            enabled: self.enabled,
            overscan: self.overscan,
            horizontal: self.horizontal,
            initial_rect: self.initial_rect,
            padding_start: self.padding_start,
            padding_end: self.padding_end,
            scroll_padding_start: self.scroll_padding_start,
            scroll_padding_end: self.scroll_padding_end,
            initial_offset: self.initial_offset.clone(),
            on_change: self.on_change.clone(),
            on_item_visibility: self.on_item_visibility.clone(),
            is_scrolling_reset_delay_ms: self.is_scrolling_reset_delay_ms,
            should_adjust_scroll_position_on_item_size_change: self
                .should_adjust_scroll_position_on_item_size_change
                .clone(),
        }
    }
}

impl VirtualizerOptions<ItemKey> {
    /// Creates options for a list keyed by index (`ItemKey = u64`).
    ///
    /// `estimate_size(i)` should return the estimated item size in the scroll axis (e.g. row
    /// height for vertical lists). The estimate is used until an item is measured.
    pub fn new(count: usize, estimate_size: impl Fn(usize) -> f64 + Send + Sync + 'static) -> Self {
        Self::new_with_key(count, estimate_size, |i| i as u64)
    }
}

impl<K> VirtualizerOptions<K> {
    /// Creates options with a custom key mapping.
    ///
    /// Use this when you want measurements to follow items across reordering/replacement:
    /// `get_item_key(i)` should return a stable identity for the item at index `i`.
    pub fn new_with_key(
        count: usize,
        estimate_size: impl Fn(usize) -> f64 + Send + Sync + 'static,
        get_item_key: impl Fn(usize) -> K + Send + Sync + 'static,
    ) -> Self {
        Self {
            count,
            estimate_size: Arc::new(estimate_size),
            get_item_key: Arc::new(get_item_key),
            range_extractor: None,
            enabled: true,
            overscan: 1,
            horizontal: false,
            initial_rect: None,
            padding_start: 0.0,
            padding_end: 0.0,
            scroll_padding_start: 0.0,
            scroll_padding_end: 0.0,
            initial_offset: InitialOffset::default(),
            on_change: None,
            on_item_visibility: None,
            is_scrolling_reset_delay_ms: 150,
            should_adjust_scroll_position_on_item_size_change: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_estimate_size(
        mut self,
        estimate_size: impl Fn(usize) -> f64 + Send + Sync + 'static,
    ) -> Self {
        self.estimate_size = Arc::new(estimate_size);
        self
    }

    pub fn with_get_item_key(
        mut self,
        get_item_key: impl Fn(usize) -> K + Send + Sync + 'static,
    ) -> Self {
        self.get_item_key = Arc::new(get_item_key);
        self
    }

    pub fn with_range_extractor(
        mut self,
        range_extractor: Option<impl Fn(Range, &mut dyn FnMut(usize)) + Send + Sync + 'static>,
    ) -> Self {
        self.range_extractor = range_extractor.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_horizontal(mut self, horizontal: bool) -> Self {
        self.horizontal = horizontal;
        self
    }

    /// Sets the initial viewport rectangle.
    pub fn with_initial_rect(mut self, initial_rect: Option<Rect>) -> Self {
        self.initial_rect = initial_rect;
        self
    }

    pub fn with_padding(mut self, padding_start: f64, padding_end: f64) -> Self {
        self.padding_start = padding_start;
        self.padding_end = padding_end;
        self
    }

    pub fn with_scroll_padding(mut self, scroll_padding_start: f64, scroll_padding_end: f64) -> Self {
        self.scroll_padding_start = scroll_padding_start;
        self.scroll_padding_end = scroll_padding_end;
        self
    }

    pub fn with_initial_offset(mut self, initial_offset: InitialOffset) -> Self {
        self.initial_offset = initial_offset;
        self
    }

    pub fn with_initial_offset_value(mut self, initial_offset: f64) -> Self {
        self.initial_offset = InitialOffset::Value(initial_offset);
        self
    }

    pub fn with_initial_offset_provider(
        mut self,
        initial_offset: impl Fn() -> f64 + Send + Sync + 'static,
    ) -> Self {
        self.initial_offset = InitialOffset::Provider(Arc::new(initial_offset));
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&Virtualizer<K>, bool) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_item_visibility(
        mut self,
        on_item_visibility: Option<impl Fn(&VirtualItem<K>, ItemVisibility) + Send + Sync + 'static>,
    ) -> Self {
        self.on_item_visibility = on_item_visibility.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_is_scrolling_reset_delay_ms(mut self, delay_ms: u64) -> Self {
        self.is_scrolling_reset_delay_ms = delay_ms;
        self
    }

    pub fn with_should_adjust_scroll_position_on_item_size_change(
        mut self,
        f: Option<impl Fn(&Virtualizer<K>, &VirtualItem<K>, f64) -> bool + Send + Sync + 'static>,
    ) -> Self {
        self.should_adjust_scroll_position_on_item_size_change = f.map(|f| Arc::new(f) as _);
        self
    }
}

impl<K> core::fmt::Debug for VirtualizerOptions<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VirtualizerOptions")
            .field("count", &self.count)
            .field("enabled", &self.enabled)
            .field("overscan", &self.overscan)
            .field("horizontal", &self.horizontal)
            .field("initial_rect", &self.initial_rect)
            .field("padding_start", &self.padding_start)
            .field("padding_end", &self.padding_end)
            .field("scroll_padding_start", &self.scroll_padding_start)
            .field("scroll_padding_end", &self.scroll_padding_end)
            .field("initial_offset", &self.initial_offset)
            .field(
                "is_scrolling_reset_delay_ms",
                &self.is_scrolling_reset_delay_ms,
            )
            .finish_non_exhaustive()
    }
}
