// Example: dynamic measurement and scroll jump prevention.
use windowing::{Align, Rect, Virtualizer, VirtualizerOptions};

fn main() {
    let mut v = Virtualizer::new(
        VirtualizerOptions::new(100, |_| 10.0).with_initial_rect(Some(Rect::new(80.0, 30.0))),
    );
    v.set_scroll_offset(200.0);

    println!(
        "before: off={} total={} range={:?}",
        v.scroll_offset(),
        v.total_size(),
        v.range()
    );

    // Item 0 sits above the viewport. Growing it would push visible content down, so the
    // virtualizer shifts its offset by the same delta and hands back the position to write.
    if let Some(write) = v.measure(0, 30.0) {
        println!("measure(0): write scroll offset {write}");
    }
    println!("after: off={} total={}", v.scroll_offset(), v.total_size());

    // Items inside the viewport are laid out again without moving the scroll position.
    let first = v.range().map(|r| r.start_index).unwrap_or(0);
    let write = v.measure(first + 1, 25.0);
    println!("measure({}): write={write:?} total={}", first + 1, v.total_size());

    // Jumping far ahead lands on estimates first. Once the target rows are measured, the
    // pending request is resolved again against their real sizes.
    let to = v.scroll_to_index(80, Align::Start);
    println!("scroll_to_index(80): first pass off={to}");
    v.measure_many([(40, 40.0), (41, 40.0)]);
    println!(
        "resolve_pending_scroll: {:?} range={:?}",
        v.resolve_pending_scroll(),
        v.range()
    );
}
