use alloc::vec::Vec;

use crate::VirtualItem;
use crate::key::{KeyCacheKey, KeySizeMap};

/// Clamps a size or offset reported from outside into `[0, inf)`.
///
/// Negative, NaN and infinite values all become `0.0`. Keeping sizes non-negative keeps item
/// starts monotonic, which the range binary search depends on.
pub fn sanitize_size(size: f64) -> f64 {
    if size.is_finite() && size > 0.0 {
        size
    } else {
        0.0
    }
}

/// The ordered list of item geometries, recomputed incrementally from the lowest dirty index.
#[derive(Clone, Debug)]
pub(crate) struct Measurements<K> {
    items: Vec<VirtualItem<K>>,
    dirty_from: Option<usize>,
}

impl<K: KeyCacheKey> Measurements<K> {
    pub(crate) fn new() -> Self {
        Self {
            items: Vec::new(),
            dirty_from: Some(0),
        }
    }

    pub(crate) fn items(&self) -> &[VirtualItem<K>] {
        &self.items
    }

    pub(crate) fn get(&self, index: usize) -> Option<&VirtualItem<K>> {
        self.items.get(index)
    }

    /// Marks `index` (and everything after it) for recomputation on the next pass.
    pub(crate) fn mark_dirty(&mut self, index: usize) {
        self.dirty_from = Some(match self.dirty_from {
            Some(cur) => cur.min(index),
            None => index,
        });
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty_from.is_some()
    }

    /// Recomputes geometries for `[dirty_from, count)` and reuses the prefix verbatim.
    ///
    /// Returns `false` when nothing was dirty and `count` is unchanged (the previous list is
    /// kept as-is).
    pub(crate) fn compute(
        &mut self,
        count: usize,
        padding_start: f64,
        estimate_size: &dyn Fn(usize) -> f64,
        get_item_key: &dyn Fn(usize) -> K,
        cache: &KeySizeMap<K>,
    ) -> bool {
        let from = match self.dirty_from.take() {
            Some(from) => from,
            None if self.items.len() != count => self.items.len(),
            None => return false,
        };
        let from = from.min(self.items.len()).min(count);
        vtrace!(from, count, cached = cache.len(), "Measurements::compute");

        self.items.truncate(from);
        self.items.reserve(count - from);

        let padding_start = sanitize_size(padding_start);
        for index in from..count {
            let start = match index.checked_sub(1) {
                Some(prev) => self.items[prev].end,
                None => padding_start,
            };
            let key = get_item_key(index);
            let size = match cache.get(&key) {
                Some(&measured) => measured,
                None => sanitize_size(estimate_size(index)),
            };
            self.items.push(VirtualItem {
                index,
                key,
                start,
                end: start + size,
                size,
            });
        }
        true
    }

    /// `(last end, or padding_start when empty) + padding_end`.
    pub(crate) fn total_size(&self, padding_start: f64, padding_end: f64) -> f64 {
        let end = match self.items.last() {
            Some(last) => last.end,
            None => sanitize_size(padding_start),
        };
        end + sanitize_size(padding_end)
    }
}
