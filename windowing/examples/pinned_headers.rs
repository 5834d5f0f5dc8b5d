// Example: pinned/sticky rows via range_extractor + IndexEmitter.
use std::sync::Arc;

use windowing::{IndexEmitter, Range, Rect, Virtualizer, VirtualizerOptions};

fn main() {
    let pinned: Arc<[usize]> = Arc::from([0usize, 10, 20, 30, 40, 999]);
    let opts = VirtualizerOptions::new(1_000, |_| 1.0)
        .with_overscan(2)
        .with_initial_rect(Some(Rect::new(40.0, 10.0)))
        .with_range_extractor(Some({
            let pinned = Arc::clone(&pinned);
            move |r: Range, emit: &mut dyn FnMut(usize)| {
                let mut e = IndexEmitter::new(r, emit);
                let (start, end) = e.overscanned_bounds();

                // Output order is kept as emitted, so lay rows out top to bottom: headers above
                // the window, the window itself, then headers below it.
                for &idx in pinned.iter().filter(|&&idx| idx < start) {
                    e.emit_pinned(idx);
                }
                e.emit_overscanned();
                for &idx in pinned.iter().filter(|&&idx| idx > end) {
                    e.emit_pinned(idx);
                }
            }
        }));

    let mut v = Virtualizer::new(opts);
    v.set_scroll_offset_clamped(500.0);

    let collected: Vec<usize> = v.virtual_indexes().collect();
    println!("range={:?}", v.range());
    println!("indexes_len={} indexes={collected:?}", collected.len());

    let headers = v
        .virtual_items()
        .iter()
        .filter(|it| pinned.binary_search(&it.index).is_ok())
        .count();
    println!("pinned_headers_in_output={headers}");
}
