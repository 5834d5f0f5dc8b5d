// Example: minimal usage and scroll-to-index.
use windowing::{Align, Rect, Virtualizer, VirtualizerOptions};

fn main() {
    let mut v = Virtualizer::new(
        VirtualizerOptions::new(1_000_000, |_| 24.0)
            .with_initial_rect(Some(Rect::new(320.0, 480.0))),
    );
    v.set_scroll_offset(123_456.0);

    println!("total_size={}", v.total_size());
    println!("range={:?}", v.range());
    println!("first_rendered={:?}", v.virtual_items().first());

    let offset = v.scroll_to_index(999_999, Align::End);
    println!(
        "after scroll_to_index: offset={offset} last_rendered={:?}",
        v.virtual_items().last().map(|it| it.index)
    );
}
