use crate::{Range, VirtualItem, VisibleRange};

/// Binary search over a monotonic sequence for the greatest index whose value is `<= value`.
///
/// An exact hit returns that index directly. Otherwise the lower neighbour of the insertion
/// point is returned, clamped to `low`. With runs of equal values (zero-size items) the first
/// probe that hits wins, so the midpoint sequence matters for tie behaviour.
pub(crate) fn find_nearest_binary_search(
    mut low: usize,
    mut high: usize,
    value_at: impl Fn(usize) -> f64,
    value: f64,
) -> usize {
    let floor = low;
    while low <= high {
        let middle = low + (high - low) / 2;
        let current = value_at(middle);
        if current < value {
            low = middle + 1;
        } else if current > value {
            if middle == 0 {
                break;
            }
            high = middle - 1;
        } else {
            return middle;
        }
    }
    if low > floor { low - 1 } else { floor }
}

/// Locates the items intersecting `[scroll_offset, scroll_offset + viewport_size)`.
///
/// The start index comes from a binary search over item starts; the end index is found by a
/// linear scan, which also stops on runs of zero-size items. Returns `None` when there are no
/// items. A zero-size viewport still yields a one-item range.
pub fn calculate_range<K>(
    measurements: &[VirtualItem<K>],
    scroll_offset: f64,
    viewport_size: f64,
) -> Option<VisibleRange> {
    let last = measurements.len().checked_sub(1)?;
    let start_index =
        find_nearest_binary_search(0, last, |i| measurements[i].start, scroll_offset);

    let viewport_end = scroll_offset + viewport_size;
    let mut end_index = start_index;
    while end_index < last && measurements[end_index].end < viewport_end {
        end_index += 1;
    }

    Some(VisibleRange {
        start_index,
        end_index,
    })
}

/// The default overscan policy: widens the visible range by `overscan` on both sides, clipped
/// to `[0, count - 1]`, and emits the indexes in ascending order.
pub fn default_range_extractor(range: Range, emit: &mut dyn FnMut(usize)) {
    let Some(last) = range.count.checked_sub(1) else {
        return;
    };
    let start = range.start_index.saturating_sub(range.overscan);
    let end = range.end_index.saturating_add(range.overscan).min(last);
    for i in start..=end {
        emit(i);
    }
}
