use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::Cell;

use crate::key::{KeyCacheKey, KeySizeMap};
use crate::measurements::{Measurements, sanitize_size};
use crate::range::{calculate_range, default_range_extractor, find_nearest_binary_search};
use crate::scroll::{self, ScrollController};
use crate::{
    Align, FrameState, InitialOffset, ItemKey, ItemVisibility, Range, Rect, ScrollDirection,
    ScrollState, ViewportState, VirtualItem, VirtualizerOptions, VisibleRange,
};

/// A headless virtualization engine.
///
/// This type is intentionally UI-agnostic:
/// - It does not hold any UI objects.
/// - Your adapter drives it by providing viewport geometry, scroll offsets and measured sizes.
/// - Every mutating call recomputes synchronously, so queries always reflect the latest
///   state (the one exception is [`Self::notify_dirty`], which waits for [`Self::recompute`]).
///
/// For subscription/timer plumbing against a real scroll container, see the `windowing-host`
/// crate.
#[derive(Clone, Debug)]
pub struct Virtualizer<K = ItemKey> {
    options: VirtualizerOptions<K>,
    scroll_rect: Rect,
    viewport_size: f64,
    scroll: ScrollController,

    measurements: Measurements<K>,
    item_sizes: KeySizeMap<K>,
    range: Option<VisibleRange>,
    virtual_items: Vec<VirtualItem<K>>,
    total_size: f64,
    items_stale: bool,
    pending_scroll: Option<(usize, Align)>,
    generation: u64,

    notify_depth: Cell<usize>,
    notify_pending: Cell<Option<bool>>,
}

impl<K: KeyCacheKey> Virtualizer<K> {
    /// Creates a new virtualizer from options.
    ///
    /// If `options.initial_rect` and/or `options.initial_offset` are set, those values are applied
    /// immediately.
    pub fn new(options: VirtualizerOptions<K>) -> Self {
        let scroll_rect = options.initial_rect.unwrap_or_default();
        let offset = options.initial_offset.resolve();
        vdebug!(
            count = options.count,
            enabled = options.enabled,
            overscan = options.overscan,
            "Virtualizer::new"
        );
        let mut v = Self {
            viewport_size: sanitize_size(scroll_rect.main(options.horizontal)),
            scroll_rect,
            scroll: ScrollController::new(offset),
            measurements: Measurements::new(),
            item_sizes: KeySizeMap::<K>::new(),
            range: None,
            virtual_items: Vec::new(),
            total_size: 0.0,
            items_stale: true,
            pending_scroll: None,
            generation: 0,
            options,
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(None),
        };
        v.recompute_inner();
        v
    }

    pub fn options(&self) -> &VirtualizerOptions<K> {
        &self.options
    }

    /// Replaces the whole configuration atomically.
    ///
    /// The measurement cache is cleared only when `estimate_size` is a different closure
    /// (`Arc` identity); otherwise measured sizes survive and only the affected suffix of the
    /// layout is recomputed.
    pub fn set_options(&mut self, options: VirtualizerOptions<K>) {
        let prev = core::mem::replace(&mut self.options, options);
        vtrace!(
            count = self.options.count,
            enabled = self.options.enabled,
            overscan = self.options.overscan,
            "Virtualizer::set_options"
        );

        if !Arc::ptr_eq(&prev.estimate_size, &self.options.estimate_size) {
            vdebug!(
                cached = self.item_sizes.len(),
                "estimate_size replaced, clearing measurement cache"
            );
            self.item_sizes.clear();
            self.measurements.mark_dirty(0);
        } else if !Arc::ptr_eq(&prev.get_item_key, &self.options.get_item_key)
            || prev.padding_start != self.options.padding_start
        {
            self.measurements.mark_dirty(0);
        } else if prev.count != self.options.count {
            self.measurements
                .mark_dirty(prev.count.min(self.options.count));
        }

        if !self.options.enabled {
            self.scroll_rect = Rect::default();
            self.scroll.reset(self.options.initial_offset.resolve());
            self.pending_scroll = None;
        } else if !prev.enabled {
            self.reset_to_initial();
        }
        self.viewport_size = sanitize_size(self.scroll_rect.main(self.options.horizontal));

        self.items_stale = true;
        if self.recompute_inner() {
            self.notify(false);
        }
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    ///
    /// This is useful when you want to update multiple options at once while letting the
    /// virtualizer decide what needs to be recomputed.
    pub fn update_options(&mut self, f: impl FnOnce(&mut VirtualizerOptions<K>)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    fn reset_to_initial(&mut self) {
        self.scroll_rect = self.options.initial_rect.unwrap_or_default();
        self.scroll.reset(self.options.initial_offset.resolve());
        self.pending_scroll = None;
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&Virtualizer<K>, bool) + Send + Sync + 'static>,
    ) {
        self.options.on_change = on_change.map(|f| Arc::new(f) as _);
    }

    pub fn set_initial_offset(&mut self, initial_offset: f64) {
        self.options.initial_offset = InitialOffset::Value(initial_offset);
    }

    pub fn set_count(&mut self, count: usize) {
        if self.options.count == count {
            return;
        }
        self.update_options(|o| o.count = count);
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        if self.options.overscan == overscan {
            return;
        }
        self.update_options(|o| o.overscan = overscan);
    }

    pub fn set_padding(&mut self, padding_start: f64, padding_end: f64) {
        self.update_options(|o| {
            o.padding_start = padding_start;
            o.padding_end = padding_end;
        });
    }

    pub fn set_scroll_padding(&mut self, scroll_padding_start: f64, scroll_padding_end: f64) {
        self.options.scroll_padding_start = scroll_padding_start;
        self.options.scroll_padding_end = scroll_padding_end;
    }

    pub fn set_horizontal(&mut self, horizontal: bool) {
        if self.options.horizontal == horizontal {
            return;
        }
        self.update_options(|o| o.horizontal = horizontal);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.options.enabled == enabled {
            return;
        }
        self.update_options(|o| o.enabled = enabled);
    }

    /// Replaces the estimate function. This always clears the measurement cache.
    pub fn set_estimate_size(&mut self, f: impl Fn(usize) -> f64 + Send + Sync + 'static) {
        self.update_options(|o| o.estimate_size = Arc::new(f));
    }

    /// Replaces the key mapping. Cached sizes follow their keys to the new indexes.
    pub fn set_get_item_key(&mut self, f: impl Fn(usize) -> K + Send + Sync + 'static) {
        self.update_options(|o| o.get_item_key = Arc::new(f));
    }

    pub fn set_range_extractor(
        &mut self,
        f: Option<impl Fn(Range, &mut dyn FnMut(usize)) + Send + Sync + 'static>,
    ) {
        self.update_options(|o| o.range_extractor = f.map(|f| Arc::new(f) as _));
    }

    pub fn set_should_adjust_scroll_position_on_item_size_change(
        &mut self,
        f: Option<impl Fn(&Virtualizer<K>, &VirtualItem<K>, f64) -> bool + Send + Sync + 'static>,
    ) {
        self.options
            .should_adjust_scroll_position_on_item_size_change = f.map(|f| Arc::new(f) as _);
    }

    fn notify_now(&self, sync: bool) {
        if let Some(cb) = &self.options.on_change {
            cb(self, sync);
        }
    }

    fn notify(&self, sync: bool) {
        if self.notify_depth.get() > 0 {
            let pending = self.notify_pending.get().unwrap_or(false) || sync;
            self.notify_pending.set(Some(pending));
            return;
        }
        self.notify_now(sync);
    }

    /// Batches multiple updates into a single `on_change` notification.
    ///
    /// The coalesced notification is `sync` if any of the batched updates was.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 {
            if let Some(sync) = self.notify_pending.take() {
                self.notify_now(sync);
            }
        }
    }

    /// Marks the whole layout stale without recomputing.
    ///
    /// Use this when the data behind `estimate_size` changed in place. Queries keep returning
    /// the previous output until [`Self::recompute`] runs.
    pub fn notify_dirty(&mut self) {
        self.measurements.mark_dirty(0);
        self.items_stale = true;
    }

    /// Runs a recomputation pass and notifies `on_change` if the visible output changed.
    ///
    /// Returns whether it changed.
    pub fn recompute(&mut self) -> bool {
        let changed = self.recompute_inner();
        if changed {
            self.notify(false);
        }
        changed
    }

    /// Bumped on every recompute that changed the visible output.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn count(&self) -> usize {
        self.options.count
    }

    pub fn enabled(&self) -> bool {
        self.options.enabled
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_scrolling()
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.scroll.direction()
    }

    pub fn set_is_scrolling(&mut self, is_scrolling: bool) {
        if self.scroll.set_is_scrolling(is_scrolling) {
            self.notify(false);
        }
    }

    /// Marks the start (or continuation) of a scroll gesture at `now_ms`.
    pub fn notify_scroll_event(&mut self, now_ms: u64) {
        if !self.options.enabled {
            return;
        }
        if self.scroll.scroll_event(now_ms) {
            self.notify(false);
        }
    }

    /// Resets `is_scrolling` once `is_scrolling_reset_delay_ms` passed without scroll events.
    pub fn update_scrolling(&mut self, now_ms: u64) {
        if !self.options.enabled {
            return;
        }
        let delay = self.options.is_scrolling_reset_delay_ms;
        if self.scroll.update_scrolling(now_ms, delay) {
            vtrace!(now_ms, "is_scrolling reset");
            self.notify(false);
        }
    }

    pub fn viewport_size(&self) -> f64 {
        self.viewport_size
    }

    pub fn scroll_rect(&self) -> Rect {
        self.scroll_rect
    }

    /// Returns a lightweight snapshot of the current viewport state.
    pub fn viewport_state(&self) -> ViewportState {
        ViewportState {
            rect: self.scroll_rect,
        }
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.scroll.state()
    }

    /// Returns a combined snapshot of viewport + scroll state.
    pub fn frame_state(&self) -> FrameState {
        FrameState {
            viewport: self.viewport_state(),
            scroll: self.scroll_state(),
        }
    }

    /// Restores both viewport + scroll state from a previously captured snapshot.
    ///
    /// When `frame.scroll.is_scrolling` is `true`, this will update the internal scrolling timers
    /// as if a scroll event happened at `now_ms`.
    pub fn restore_frame_state(&mut self, frame: FrameState, now_ms: u64) {
        self.batch_update(|v| {
            v.set_scroll_rect(frame.viewport.rect);
            v.set_scroll_offset(frame.scroll.offset_adjusted);
            if frame.scroll.is_scrolling {
                v.notify_scroll_event(now_ms);
            } else {
                v.set_is_scrolling(false);
            }
        });
    }

    /// Applies a viewport size change from the host's rect observer.
    pub fn set_scroll_rect(&mut self, rect: Rect) {
        if self.scroll_rect == rect {
            return;
        }
        self.scroll_rect = rect;
        self.viewport_size = sanitize_size(rect.main(self.options.horizontal));
        vtrace!(viewport_size = self.viewport_size, "set_scroll_rect");
        if self.recompute_inner() {
            self.notify(self.scroll.is_scrolling());
        }
    }

    pub fn set_viewport_size(&mut self, size: f64) {
        let mut rect = self.scroll_rect;
        if self.options.horizontal {
            rect.width = size;
        } else {
            rect.height = size;
        }
        self.set_scroll_rect(rect);
    }

    /// The offset the visible range is computed from (including anti-jump corrections).
    pub fn scroll_offset(&self) -> f64 {
        self.scroll.offset()
    }

    /// Moves the viewport programmatically. Does not mark the virtualizer as scrolling.
    pub fn set_scroll_offset(&mut self, offset: f64) {
        if !self.scroll.observe(offset) {
            return;
        }
        if self.recompute_inner() {
            self.notify(true);
        }
    }

    pub fn set_scroll_offset_clamped(&mut self, offset: f64) {
        let clamped = self.clamp_scroll_offset(offset);
        self.set_scroll_offset(clamped);
    }

    /// Applies a scroll offset reported by the host's offset observer (e.g. wheel/drag), and
    /// marks the virtualizer as scrolling.
    ///
    /// Every event recomputes the visible range before returning; events are never coalesced.
    pub fn apply_scroll_offset_event(&mut self, offset: f64, now_ms: u64) {
        if !self.options.enabled {
            return;
        }
        vtrace!(offset, now_ms, "apply_scroll_offset_event");
        self.batch_update(|v| {
            let moved = v.scroll.observe(offset);
            v.notify_scroll_event(now_ms);
            if moved && v.recompute_inner() {
                v.notify(true);
            }
        });
    }

    /// Records a measured size for the item at `index`.
    ///
    /// If the size differs from the cached one, the cache is updated and the layout from
    /// `index` onward is recomputed before returning. When the item starts above the current
    /// offset, the offset is corrected by the size delta and the corrected position is
    /// returned: the host must write it to its scroll container so on-screen content stays
    /// put.
    pub fn measure(&mut self, index: usize, size: f64) -> Option<f64> {
        if !self.options.enabled {
            return None;
        }
        if self.measurements.is_dirty() && self.recompute_inner() {
            self.notify(false);
        }
        let item = self.measurements.get(index)?.clone();
        let size = sanitize_size(size);
        if self.item_sizes.get(&item.key) == Some(&size) {
            return None;
        }
        vtrace!(index, size, "measure");
        self.item_sizes.insert(item.key.clone(), size);

        let delta = size - item.size;
        if delta == 0.0 {
            return None;
        }
        self.measurements.mark_dirty(index);

        let should_adjust = match &self
            .options
            .should_adjust_scroll_position_on_item_size_change
        {
            Some(f) => f(self, &item, delta),
            None => self.scroll.is_above_viewport(&item),
        };
        if should_adjust {
            vdebug!(index, delta, "measure: correcting scroll offset");
        }
        let write = should_adjust.then(|| self.scroll.adjust(delta));

        let changed = self.recompute_inner();
        if changed || write.is_some() {
            self.notify(write.is_some());
        }
        write
    }

    /// Applies several measurements with a single notification.
    ///
    /// Returns the last scroll correction, if any was applied.
    pub fn measure_many(
        &mut self,
        measurements: impl IntoIterator<Item = (usize, f64)>,
    ) -> Option<f64> {
        let mut write = None;
        self.batch_update(|v| {
            for (index, size) in measurements {
                if let Some(offset) = v.measure(index, size) {
                    write = Some(offset);
                }
            }
        });
        write
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.measurements
            .get(index)
            .is_some_and(|it| self.item_sizes.contains_key(&it.key))
    }

    /// Clears every cached size and falls back to estimates.
    pub fn reset_measurements(&mut self) {
        self.item_sizes.clear();
        self.measurements.mark_dirty(0);
        if self.recompute_inner() {
            self.notify(false);
        }
    }

    /// Returns the number of cached measured sizes (key → size).
    pub fn measurement_cache_len(&self) -> usize {
        self.item_sizes.len()
    }

    /// Exports the cached measured sizes as a `Vec`.
    pub fn export_measurement_cache(&self) -> Vec<(K, f64)> {
        self.item_sizes
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }

    /// Replaces the cached measured sizes (useful when restoring state).
    pub fn import_measurement_cache(&mut self, entries: impl IntoIterator<Item = (K, f64)>) {
        self.item_sizes.clear();
        for (k, v) in entries {
            self.item_sizes.insert(k, sanitize_size(v));
        }
        vdebug!(entries = self.item_sizes.len(), "import_measurement_cache");
        self.measurements.mark_dirty(0);
        if self.recompute_inner() {
            self.notify(false);
        }
    }

    /// `last item end + padding_end`, or `padding_start + padding_end` for an empty list.
    pub fn total_size(&self) -> f64 {
        self.total_size
    }

    pub fn key_for(&self, index: usize) -> K {
        (self.options.get_item_key)(index)
    }

    /// The items to render, in the order produced by the range extractor.
    pub fn virtual_items(&self) -> &[VirtualItem<K>] {
        &self.virtual_items
    }

    pub fn virtual_indexes(&self) -> impl Iterator<Item = usize> + '_ {
        self.virtual_items.iter().map(|it| it.index)
    }

    /// The visible range before overscan, `None` when there is nothing to show.
    pub fn range(&self) -> Option<VisibleRange> {
        self.range
    }

    /// Geometry of every item.
    pub fn measurements(&self) -> &[VirtualItem<K>] {
        if !self.options.enabled {
            return &[];
        }
        self.measurements.items()
    }

    pub fn item(&self, index: usize) -> Option<&VirtualItem<K>> {
        if !self.options.enabled {
            return None;
        }
        self.measurements.get(index)
    }

    pub fn item_start(&self, index: usize) -> Option<f64> {
        self.item(index).map(|it| it.start)
    }

    pub fn item_size(&self, index: usize) -> Option<f64> {
        self.item(index).map(|it| it.size)
    }

    pub fn index_at_offset(&self, offset: f64) -> Option<usize> {
        let items = self.measurements();
        let last = items.len().checked_sub(1)?;
        Some(find_nearest_binary_search(0, last, |i| items[i].start, offset))
    }

    pub fn max_scroll_offset(&self) -> f64 {
        (self.total_size - self.viewport_size).max(0.0)
    }

    pub fn clamp_scroll_offset(&self, offset: f64) -> f64 {
        sanitize_size(offset).min(self.max_scroll_offset())
    }

    /// Maps `target` to a final offset for `align` (see [`Align`]), clamped to the scrollable
    /// extent.
    pub fn offset_for_alignment(&self, target: f64, align: Align) -> f64 {
        scroll::offset_for_alignment(
            target,
            align,
            self.scroll.offset(),
            self.viewport_size,
            self.max_scroll_offset(),
        )
    }

    /// Resolves `index` (clamped to `[0, count - 1]`) to a scroll offset using its current
    /// geometry. Returns `None` when there are no items, or when `Align::Auto` finds the item
    /// already fully visible.
    pub fn offset_for_index(&self, index: usize, align: Align) -> Option<f64> {
        let last = self.measurements().len().checked_sub(1)?;
        let item = self.measurements.get(index.min(last))?;
        let (target, align) = scroll::offset_for_item(
            item,
            align,
            self.scroll.offset(),
            self.viewport_size,
            self.options.scroll_padding_start,
            self.options.scroll_padding_end,
        )?;
        Some(self.offset_for_alignment(target, align))
    }

    /// Programmatically scrolls to `target` (no animation) and returns the applied offset for
    /// the host to write. Cancels a pending scroll-to-index correction.
    pub fn scroll_to_offset(&mut self, target: f64, align: Align) -> f64 {
        let offset = self.offset_for_alignment(target, align);
        self.pending_scroll = None;
        self.set_scroll_offset(offset);
        offset
    }

    /// Programmatically scrolls to an index and returns the applied offset.
    ///
    /// The first pass may be based on estimates for items that were never rendered. The
    /// request is remembered; call [`Self::resolve_pending_scroll`] after the next paint to
    /// correct the drift once real measurements have landed.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> f64 {
        let current = self.scroll.offset();
        let Some(last) = self.measurements().len().checked_sub(1) else {
            return current;
        };
        let index = index.min(last);
        let offset = self.offset_for_index(index, align).unwrap_or(current);
        vtrace!(index, offset, "scroll_to_index");
        self.pending_scroll = Some((index, align));
        self.set_scroll_offset(offset);
        offset
    }

    /// Second pass of [`Self::scroll_to_index`].
    ///
    /// Returns the corrected offset when the target moved since the first pass, `None`
    /// otherwise (or when nothing is pending).
    pub fn resolve_pending_scroll(&mut self) -> Option<f64> {
        let (index, align) = self.pending_scroll.take()?;
        let offset = self.offset_for_index(index, align)?;
        if offset == self.scroll.offset() {
            return None;
        }
        vtrace!(index, offset, "resolve_pending_scroll");
        self.set_scroll_offset(offset);
        Some(offset)
    }

    pub fn has_pending_scroll(&self) -> bool {
        self.pending_scroll.is_some()
    }

    fn recompute_inner(&mut self) -> bool {
        let prev_total = self.total_size;
        if !self.options.enabled {
            self.range = None;
            self.total_size = 0.0;
            if self.virtual_items.is_empty() && prev_total == 0.0 {
                return false;
            }
            let prev = core::mem::take(&mut self.virtual_items);
            self.emit_visibility(&prev);
            self.generation = self.generation.wrapping_add(1);
            return true;
        }

        let measured = self.measurements.compute(
            self.options.count,
            self.options.padding_start,
            &*self.options.estimate_size,
            &*self.options.get_item_key,
            &self.item_sizes,
        );
        let total = self
            .measurements
            .total_size(self.options.padding_start, self.options.padding_end);
        let range = calculate_range(
            self.measurements.items(),
            self.scroll.offset(),
            self.viewport_size,
        );

        if !measured && !self.items_stale && range == self.range && total == prev_total {
            return false;
        }
        self.items_stale = false;
        self.range = range;
        self.total_size = total;

        let prev = core::mem::take(&mut self.virtual_items);
        if let Some(visible) = range {
            let mut next = Vec::with_capacity(prev.len());
            self.extract_items(visible, &mut next);
            self.virtual_items = next;
        }

        if total == prev_total && self.virtual_items == prev {
            return false;
        }
        self.emit_visibility(&prev);
        self.generation = self.generation.wrapping_add(1);
        vtrace!(
            items = self.virtual_items.len(),
            total,
            generation = self.generation,
            "recompute"
        );
        true
    }

    fn extract_items(&self, visible: VisibleRange, out: &mut Vec<VirtualItem<K>>) {
        let count = self.options.count;
        let range = Range {
            start_index: visible.start_index,
            end_index: visible.end_index,
            overscan: self.options.overscan,
            count,
        };
        let items = self.measurements.items();
        let mut push = |i: usize| match items.get(i) {
            Some(it) => out.push(it.clone()),
            None => {
                vwarn!(index = i, count, "range_extractor emitted out-of-bounds index");
            }
        };
        match &self.options.range_extractor {
            Some(extract) => extract(range, &mut push),
            None => default_range_extractor(range, &mut push),
        }
    }

    fn emit_visibility(&self, prev: &[VirtualItem<K>]) {
        let Some(cb) = &self.options.on_item_visibility else {
            return;
        };
        for item in prev {
            if !self.virtual_items.iter().any(|it| it.key == item.key) {
                cb(item, ItemVisibility::Left);
            }
        }
        for item in &self.virtual_items {
            if !prev.iter().any(|it| it.key == item.key) {
                cb(item, ItemVisibility::Entered);
            }
        }
    }
}
