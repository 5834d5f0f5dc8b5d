// Example: measurements follow keys after reorder.
use std::sync::{Arc, Mutex};

use windowing::{Virtualizer, VirtualizerOptions};

fn main() {
    let ids = Arc::new(Mutex::new(vec!["a", "b", "c"]));
    let mut v = Virtualizer::new(VirtualizerOptions::new_with_key(3, |_| 1.0, {
        let ids = Arc::clone(&ids);
        move |i| ids.lock().map(|ids| ids[i]).unwrap_or_default()
    }));
    v.measure(0, 10.0);
    println!(
        "before reorder: size0={:?} size2={:?}",
        v.item_size(0),
        v.item_size(2)
    );

    // The dataset was reordered in place: keep `get_item_key` and ask for a recompute.
    if let Ok(mut ids) = ids.lock() {
        ids.reverse();
    }
    v.notify_dirty();
    v.recompute();

    println!(
        "after reorder: size0={:?} size2={:?}",
        v.item_size(0),
        v.item_size(2)
    );
}
