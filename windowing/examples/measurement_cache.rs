// Example: export and import measurement cache.
use windowing::{Virtualizer, VirtualizerOptions};

fn main() {
    // Persisting measurements across screens lets a fresh virtualizer start from real sizes
    // instead of estimates.
    let mut v1 = Virtualizer::new(VirtualizerOptions::new(10, |_| 1.0));
    v1.measure(2, 10.0);
    v1.measure(5, 42.0);

    let snapshot = v1.export_measurement_cache();
    println!("exported_cache_len={}", snapshot.len());

    let mut v2 = Virtualizer::new(VirtualizerOptions::new(10, |_| 1.0));
    println!(
        "before import: size2={:?} size5={:?} total={}",
        v2.item_size(2),
        v2.item_size(5),
        v2.total_size()
    );

    v2.import_measurement_cache(snapshot);
    println!(
        "after import: cache_len={} size2={:?} size5={:?} total={}",
        v2.measurement_cache_len(),
        v2.item_size(2),
        v2.item_size(5),
        v2.total_size()
    );
}
