use crate::Range;

/// Helper to build `range_extractor` implementations without allocations.
///
/// - Out-of-bounds indexes are ignored (and debug-asserted).
/// - Immediate repeats of the previously emitted index are ignored, so a pinned row that is
///   also the first overscanned row is emitted once.
///
/// Order is otherwise up to the caller.
pub struct IndexEmitter<'a> {
    range: Range,
    last: Option<usize>,
    emit: &'a mut dyn FnMut(usize),
}

impl<'a> IndexEmitter<'a> {
    pub fn new(range: Range, emit: &'a mut dyn FnMut(usize)) -> Self {
        Self {
            range,
            last: None,
            emit,
        }
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn emit(&mut self, index: usize) {
        if index >= self.range.count {
            vwarn!(
                index,
                count = self.range.count,
                "IndexEmitter: out-of-bounds index"
            );
            debug_assert!(
                index < self.range.count,
                "IndexEmitter: out-of-bounds index (i={index}, count={})",
                self.range.count
            );
            return;
        }
        if self.last == Some(index) {
            return;
        }
        self.last = Some(index);
        (self.emit)(index);
    }

    pub fn emit_pinned(&mut self, index: usize) {
        self.emit(index);
    }

    /// Emits `[start_index, end_index]` (inclusive) in ascending order.
    pub fn emit_range(&mut self, start_index: usize, end_index: usize) {
        let Some(last) = self.range.count.checked_sub(1) else {
            return;
        };
        for i in start_index..=end_index.min(last) {
            self.emit(i);
        }
    }

    /// Emits `[start_index, end_index]` (inclusive) in descending order.
    pub fn emit_range_rev(&mut self, start_index: usize, end_index: usize) {
        let Some(last) = self.range.count.checked_sub(1) else {
            return;
        };
        for i in (start_index..=end_index.min(last)).rev() {
            self.emit(i);
        }
    }

    pub fn emit_visible(&mut self) {
        self.emit_range(self.range.start_index, self.range.end_index);
    }

    pub fn overscanned_bounds(&self) -> (usize, usize) {
        let start = self.range.start_index.saturating_sub(self.range.overscan);
        let end = self
            .range
            .end_index
            .saturating_add(self.range.overscan)
            .min(self.range.count.saturating_sub(1));
        (start, end)
    }

    pub fn emit_overscanned(&mut self) {
        let (start, end) = self.overscanned_bounds();
        self.emit_range(start, end);
    }
}
