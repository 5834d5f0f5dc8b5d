use crate::*;

use alloc::sync::Arc;
use alloc::vec::Vec;
use proptest::prelude::*;
use std::sync::Mutex;

fn list(count: usize, size: f64, viewport: f64) -> Virtualizer {
    Virtualizer::new(
        VirtualizerOptions::new(count, move |_| size)
            .with_initial_rect(Some(Rect::new(300.0, viewport))),
    )
}

fn indexes<K: KeyCacheKey>(v: &Virtualizer<K>) -> Vec<usize> {
    v.virtual_indexes().collect()
}

fn recorder() -> (Arc<Mutex<Vec<bool>>>, impl Fn(&Virtualizer, bool) + Send + Sync + 'static) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    (calls, move |_: &Virtualizer, sync: bool| {
        sink.lock().unwrap().push(sync);
    })
}

#[test]
fn fixed_size_range_and_overscan() {
    let mut v = list(200, 50.0, 200.0);
    assert_eq!(v.total_size(), 10_000.0);
    assert_eq!(
        v.range(),
        Some(VisibleRange {
            start_index: 0,
            end_index: 3
        })
    );
    assert_eq!(indexes(&v), [0, 1, 2, 3, 4]);

    v.set_scroll_offset(400.0);
    assert_eq!(
        v.range(),
        Some(VisibleRange {
            start_index: 8,
            end_index: 11
        })
    );
    assert_eq!(indexes(&v), [7, 8, 9, 10, 11, 12]);
}

#[test]
fn virtual_items_carry_geometry() {
    let v = Virtualizer::new(
        VirtualizerOptions::new(3, |i| (i as f64 + 1.0) * 10.0)
            .with_padding(5.0, 7.0)
            .with_initial_rect(Some(Rect::new(0.0, 100.0))),
    );
    let items = v.virtual_items();
    assert_eq!(items.len(), 3);
    assert_eq!((items[0].start, items[0].end, items[0].size), (5.0, 15.0, 10.0));
    assert_eq!((items[1].start, items[1].end), (15.0, 35.0));
    assert_eq!((items[2].start, items[2].end), (35.0, 65.0));
    assert_eq!(v.total_size(), 72.0);
}

#[test]
fn empty_list_total_is_paddings() {
    let v = Virtualizer::new(
        VirtualizerOptions::new(0, |_| 50.0)
            .with_padding(10.0, 4.0)
            .with_initial_rect(Some(Rect::new(0.0, 200.0))),
    );
    assert_eq!(v.total_size(), 14.0);
    assert!(v.virtual_items().is_empty());
    assert_eq!(v.range(), None);
    assert_eq!(v.index_at_offset(0.0), None);
}

#[test]
fn zero_viewport_renders_a_minimal_window() {
    let v = list(10, 50.0, 0.0);
    assert_eq!(
        v.range(),
        Some(VisibleRange {
            start_index: 0,
            end_index: 0
        })
    );
    assert_eq!(indexes(&v), [0, 1]);
}

#[test]
fn range_extractor_output_is_used_verbatim() {
    let mut v = Virtualizer::new(
        VirtualizerOptions::new(200, |_| 50.0)
            .with_initial_rect(Some(Rect::new(0.0, 200.0)))
            .with_range_extractor(Some(|_: Range, emit: &mut dyn FnMut(usize)| {
                emit(0);
                emit(1);
            })),
    );
    assert_eq!(indexes(&v), [0, 1]);

    v.set_scroll_offset(5_000.0);
    assert_eq!(indexes(&v), [0, 1]);
    assert_eq!(v.range().map(|r| r.start_index), Some(100));
}

#[test]
fn range_extractor_order_is_preserved_and_out_of_bounds_dropped() {
    let v = Virtualizer::new(
        VirtualizerOptions::new(5, |_| 10.0)
            .with_initial_rect(Some(Rect::new(0.0, 30.0)))
            .with_range_extractor(Some(|r: Range, emit: &mut dyn FnMut(usize)| {
                for i in (r.start_index..=r.end_index).rev() {
                    emit(i);
                }
                emit(r.count + 3);
            })),
    );
    assert_eq!(indexes(&v), [2, 1, 0]);
}

#[test]
fn range_extractor_receives_visible_range_and_overscan() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut v = Virtualizer::new(
        VirtualizerOptions::new(100, |_| 10.0)
            .with_overscan(3)
            .with_initial_rect(Some(Rect::new(0.0, 40.0)))
            .with_range_extractor(Some(move |r: Range, emit: &mut dyn FnMut(usize)| {
                sink.lock().unwrap().push(r);
                default_range_extractor(r, emit);
            })),
    );
    v.set_scroll_offset(200.0);

    let last = *seen.lock().unwrap().last().unwrap();
    assert_eq!(
        last,
        Range {
            start_index: 20,
            end_index: 23,
            overscan: 3,
            count: 100
        }
    );
    assert_eq!(indexes(&v), (17..=26).collect::<Vec<_>>());
}

#[test]
fn pinned_header_extractor_with_index_emitter() {
    let mut v = Virtualizer::new(
        VirtualizerOptions::new(100, |_| 50.0)
            .with_initial_rect(Some(Rect::new(0.0, 100.0)))
            .with_range_extractor(Some(|r: Range, emit: &mut dyn FnMut(usize)| {
                let mut e = IndexEmitter::new(r, emit);
                e.emit_pinned(0);
                e.emit_overscanned();
            })),
    );
    // Pinned row coincides with the first overscanned row and is emitted once.
    assert_eq!(indexes(&v), [0, 1, 2]);

    v.set_scroll_offset(500.0);
    assert_eq!(indexes(&v), [0, 9, 10, 11, 12]);
}

#[test]
fn measure_before_viewport_does_not_shift_at_top() {
    let mut v = list(10, 50.0, 200.0);
    assert_eq!(v.measure(0, 100.0), None);
    assert_eq!(v.scroll_offset(), 0.0);
    assert_eq!(v.item_start(1), Some(100.0));
    assert_eq!(v.total_size(), 550.0);
}

#[test]
fn measure_above_offset_returns_scroll_correction() {
    let mut v = list(10, 50.0, 200.0);
    v.set_scroll_offset(60.0);

    assert_eq!(v.measure(0, 100.0), Some(110.0));
    let state = v.scroll_state();
    assert_eq!(state.offset, 60.0);
    assert_eq!(state.offset_adjusted, 110.0);
    assert_eq!(v.scroll_offset(), 110.0);
    assert_eq!(v.range().map(|r| r.start_index), Some(1));
}

#[test]
fn shrinking_item_above_offset_corrects_backwards() {
    let mut v = list(10, 50.0, 100.0);
    v.set_scroll_offset(200.0);
    assert_eq!(v.measure(1, 20.0), Some(170.0));
    assert_eq!(v.item_start(4), Some(170.0));
}

#[test]
fn host_echo_of_correction_is_not_a_move() {
    let mut v = list(10, 50.0, 200.0);
    v.set_scroll_offset(60.0);
    v.measure(0, 100.0);
    let generation = v.generation();

    v.apply_scroll_offset_event(110.0, 0);
    assert_eq!(v.scroll_state().offset, 110.0);
    assert_eq!(v.scroll_offset(), 110.0);
    assert_eq!(v.generation(), generation);
}

#[test]
fn should_adjust_hook_overrides_anti_jump_rule() {
    let mut v = Virtualizer::new(
        VirtualizerOptions::new(10, |_| 50.0)
            .with_initial_rect(Some(Rect::new(0.0, 200.0)))
            .with_should_adjust_scroll_position_on_item_size_change(Some(
                |_: &Virtualizer, _: &VirtualItem, _: f64| false,
            )),
    );
    v.set_scroll_offset(60.0);
    assert_eq!(v.measure(0, 100.0), None);
    assert_eq!(v.scroll_offset(), 60.0);

    v.set_should_adjust_scroll_position_on_item_size_change(Some(
        |_: &Virtualizer, item: &VirtualItem, delta: f64| item.index == 0 && delta > 0.0,
    ));
    assert_eq!(v.measure(0, 120.0), Some(80.0));
}

#[test]
fn repeated_measurement_is_a_noop() {
    let mut v = list(10, 50.0, 200.0);
    v.measure(2, 80.0);
    let generation = v.generation();
    let total = v.total_size();

    assert_eq!(v.measure(2, 80.0), None);
    assert_eq!(v.generation(), generation);
    assert_eq!(v.total_size(), total);
}

#[test]
fn measuring_the_estimate_only_marks_the_item_measured() {
    let mut v = list(10, 50.0, 200.0);
    let generation = v.generation();
    assert!(!v.is_measured(0));
    assert_eq!(v.measure(0, 50.0), None);
    assert!(v.is_measured(0));
    assert_eq!(v.generation(), generation);
}

#[test]
fn invalid_sizes_and_indexes_are_tolerated() {
    let mut v = list(4, 50.0, 200.0);
    assert_eq!(v.measure(99, 10.0), None);
    v.measure(0, -10.0);
    assert_eq!(v.item_size(0), Some(0.0));
    v.measure(1, f64::NAN);
    assert_eq!(v.item_size(1), Some(0.0));
    assert_eq!(v.total_size(), 100.0);
}

#[test]
fn measure_many_notifies_once() {
    let (calls, on_change) = recorder();
    let mut v = list(4, 10.0, 100.0);
    v.set_on_change(Some(on_change));

    v.measure_many([(0, 20.0), (3, 7.0)]);
    assert!(v.is_measured(0));
    assert!(v.is_measured(3));
    assert_eq!(v.total_size(), 20.0 + 10.0 + 10.0 + 7.0);
    assert_eq!(*calls.lock().unwrap(), [false]);
}

#[test]
fn scroll_events_notify_sync_and_idle_resets_after_delay() {
    let (calls, on_change) = recorder();
    let mut v = list(200, 50.0, 200.0);
    v.set_on_change(Some(on_change));

    v.apply_scroll_offset_event(400.0, 1_000);
    assert!(v.is_scrolling());
    assert_eq!(v.scroll_direction(), Some(ScrollDirection::Forward));
    assert_eq!(*calls.lock().unwrap(), [true]);

    v.update_scrolling(1_100);
    assert!(v.is_scrolling());

    v.update_scrolling(1_150);
    assert!(!v.is_scrolling());
    assert_eq!(v.scroll_direction(), None);
    assert_eq!(*calls.lock().unwrap(), [true, false]);
}

#[test]
fn scroll_direction_follows_offset() {
    let mut v = list(200, 50.0, 200.0);
    v.apply_scroll_offset_event(300.0, 0);
    assert_eq!(v.scroll_direction(), Some(ScrollDirection::Forward));
    v.apply_scroll_offset_event(100.0, 10);
    assert_eq!(v.scroll_direction(), Some(ScrollDirection::Backward));
}

#[test]
fn is_scrolling_reset_delay_is_configurable() {
    let mut v = Virtualizer::new(
        VirtualizerOptions::new(10, |_| 50.0)
            .with_initial_rect(Some(Rect::new(0.0, 100.0)))
            .with_is_scrolling_reset_delay_ms(20),
    );
    v.apply_scroll_offset_event(10.0, 0);
    v.update_scrolling(19);
    assert!(v.is_scrolling());
    v.update_scrolling(20);
    assert!(!v.is_scrolling());
}

#[test]
fn batch_update_coalesces_notifications() {
    let (calls, on_change) = recorder();
    let mut v = list(10, 50.0, 100.0);
    v.set_on_change(Some(on_change));

    v.batch_update(|v| {
        v.set_count(20);
        v.set_overscan(3);
        v.set_scroll_offset(200.0);
    });
    assert_eq!(*calls.lock().unwrap(), [true]);
}

#[test]
fn option_changes_notify_async() {
    let (calls, on_change) = recorder();
    let mut v = list(10, 50.0, 100.0);
    v.set_on_change(Some(on_change));

    v.set_overscan(3);
    v.set_count(10);
    assert_eq!(*calls.lock().unwrap(), [false]);
}

#[test]
fn estimate_identity_change_clears_cache() {
    let mut v = list(10, 50.0, 200.0);
    v.measure(0, 100.0);
    assert_eq!(v.measurement_cache_len(), 1);

    v.update_options(|o| o.overscan = 2);
    assert_eq!(v.measurement_cache_len(), 1);
    assert_eq!(v.item_size(0), Some(100.0));

    v.set_estimate_size(|_| 20.0);
    assert_eq!(v.measurement_cache_len(), 0);
    assert_eq!(v.item_size(0), Some(20.0));
    assert_eq!(v.total_size(), 200.0);
}

#[test]
fn count_changes_preserve_measurements_by_key() {
    let mut v = list(5, 10.0, 100.0);
    v.measure(1, 80.0);
    v.set_count(1);
    assert_eq!(v.measurements().len(), 1);
    assert_eq!(v.total_size(), 10.0);

    v.set_count(5);
    assert_eq!(v.item_size(1), Some(80.0));
    assert_eq!(v.item_size(4), Some(10.0));
    assert_eq!(v.total_size(), 120.0);
}

#[test]
fn padding_start_change_relayouts_everything() {
    let mut v = list(3, 10.0, 100.0);
    v.set_padding(5.0, 0.0);
    assert_eq!(v.item_start(0), Some(5.0));
    assert_eq!(v.item_start(2), Some(25.0));
    assert_eq!(v.total_size(), 35.0);
}

#[test]
fn measurements_follow_keys_after_reorder() {
    let keys = Arc::new(Mutex::new(vec![10u64, 11, 12]));
    let mut v = Virtualizer::new(
        VirtualizerOptions::new_with_key(3, |_| 1.0, {
            let keys = Arc::clone(&keys);
            move |i| keys.lock().unwrap()[i]
        })
        .with_initial_rect(Some(Rect::new(0.0, 10.0))),
    );
    v.measure(0, 10.0);
    assert_eq!(v.item_size(0), Some(10.0));

    *keys.lock().unwrap() = vec![12, 11, 10];
    // Nothing is recomputed until the host asks for it.
    assert_eq!(v.item_size(0), Some(10.0));
    v.notify_dirty();
    assert!(v.recompute());

    assert_eq!(v.item_size(0), Some(1.0));
    assert_eq!(v.item_size(2), Some(10.0));
    assert_eq!(v.virtual_items()[2].key, 10);
}

#[test]
fn recompute_without_changes_is_stable() {
    let mut v = list(10, 50.0, 200.0);
    let generation = v.generation();
    let items = v.virtual_items().to_vec();

    assert!(!v.recompute());
    v.set_scroll_offset(0.0);
    assert_eq!(v.generation(), generation);
    assert_eq!(v.virtual_items(), items.as_slice());
}

#[test]
fn item_visibility_reports_entered_and_left() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let mut v = Virtualizer::new(
        VirtualizerOptions::new(10, |_| 50.0)
            .with_overscan(0)
            .with_initial_rect(Some(Rect::new(0.0, 100.0)))
            .with_on_item_visibility(Some(move |item: &VirtualItem, vis: ItemVisibility| {
                sink.lock().unwrap().push((item.index, vis));
            })),
    );
    assert_eq!(
        *events.lock().unwrap(),
        [(0, ItemVisibility::Entered), (1, ItemVisibility::Entered)]
    );
    events.lock().unwrap().clear();

    v.set_scroll_offset(100.0);
    assert_eq!(
        *events.lock().unwrap(),
        [
            (0, ItemVisibility::Left),
            (1, ItemVisibility::Left),
            (2, ItemVisibility::Entered),
            (3, ItemVisibility::Entered),
        ]
    );
}

#[test]
fn scroll_to_offset_alignment() {
    let mut v = list(10, 50.0, 100.0);
    assert_eq!(v.offset_for_alignment(50.0, Align::Auto), 50.0);
    assert_eq!(v.offset_for_alignment(300.0, Align::Auto), 200.0);
    assert_eq!(v.offset_for_alignment(300.0, Align::Center), 250.0);
    assert_eq!(v.offset_for_alignment(-20.0, Align::Start), 0.0);
    assert_eq!(v.offset_for_alignment(10_000.0, Align::Start), 400.0);

    assert_eq!(v.scroll_to_offset(300.0, Align::End), 200.0);
    assert_eq!(v.scroll_offset(), 200.0);
}

#[test]
fn scroll_to_index_alignments() {
    let mut v = list(10, 50.0, 100.0);

    // Fully visible: no scroll.
    assert_eq!(v.scroll_to_index(1, Align::Auto), 0.0);

    // Below the viewport: behaves like End.
    assert_eq!(v.scroll_to_index(5, Align::Auto), 200.0);
    assert_eq!(v.scroll_to_index(5, Align::Center), 225.0);
    assert_eq!(v.scroll_to_index(5, Align::Start), 250.0);

    // Above the viewport: behaves like Start.
    assert_eq!(v.scroll_to_index(2, Align::Auto), 100.0);
}

#[test]
fn scroll_to_index_respects_scroll_padding() {
    let mut v = Virtualizer::new(
        VirtualizerOptions::new(10, |_| 50.0)
            .with_scroll_padding(20.0, 10.0)
            .with_initial_rect(Some(Rect::new(0.0, 100.0))),
    );
    assert_eq!(v.offset_for_index(4, Align::Start), Some(180.0));
    assert_eq!(v.offset_for_index(4, Align::End), Some(160.0));
    // Item 1 ends at 100 but the visible window stops at 90.
    assert_eq!(v.offset_for_index(1, Align::Auto), Some(10.0));
    v.scroll_to_index(3, Align::Start);
    assert_eq!(v.offset_for_index(3, Align::Auto), None);
}

#[test]
fn auto_align_for_item_taller_than_viewport_uses_end() {
    let mut v = Virtualizer::new(
        VirtualizerOptions::new(10, |i| if i == 2 { 300.0 } else { 50.0 })
            .with_initial_rect(Some(Rect::new(0.0, 100.0))),
    );
    v.set_scroll_offset(120.0);
    // Item 2 spans 100..400, past both edges of 120..220.
    assert_eq!(v.offset_for_index(2, Align::Auto), Some(300.0));
    assert_eq!(v.offset_for_index(2, Align::End), Some(300.0));
}

#[test]
fn scroll_to_index_clamps_index_and_offset() {
    let mut v = list(10, 50.0, 100.0);
    assert_eq!(v.scroll_to_index(50, Align::Start), 400.0);
    assert_eq!(v.max_scroll_offset(), 400.0);
    assert!(v.has_pending_scroll());
    assert_eq!(v.range().map(|r| r.end_index), Some(9));

    let mut empty = list(0, 50.0, 100.0);
    assert_eq!(empty.scroll_to_index(3, Align::Start), 0.0);
    assert!(!empty.has_pending_scroll());
}

#[test]
fn pending_scroll_to_index_corrects_after_measurement() {
    let mut v = Virtualizer::new(
        VirtualizerOptions::new(10, |_| 50.0)
            .with_initial_rect(Some(Rect::new(0.0, 100.0)))
            .with_should_adjust_scroll_position_on_item_size_change(Some(
                |_: &Virtualizer, _: &VirtualItem, _: f64| false,
            )),
    );
    assert_eq!(v.scroll_to_index(5, Align::Start), 250.0);
    assert_eq!(v.measure(2, 100.0), None);

    assert_eq!(v.resolve_pending_scroll(), Some(300.0));
    assert_eq!(v.scroll_offset(), 300.0);
    assert_eq!(v.range().map(|r| r.start_index), Some(5));
    assert_eq!(v.resolve_pending_scroll(), None);
}

#[test]
fn scroll_to_offset_cancels_pending_index() {
    let mut v = list(10, 50.0, 100.0);
    v.scroll_to_index(5, Align::Start);
    v.scroll_to_offset(0.0, Align::Start);
    assert!(!v.has_pending_scroll());
}

#[test]
fn clamped_offset_respects_max_scroll_offset() {
    let mut v = list(200, 50.0, 200.0);
    assert_eq!(v.clamp_scroll_offset(-5.0), 0.0);
    v.set_scroll_offset_clamped(1_000_000.0);
    assert_eq!(v.scroll_offset(), 9_800.0);
    assert_eq!(v.range().map(|r| r.end_index), Some(199));
}

#[test]
fn index_at_offset_maps_into_items() {
    let v = list(10, 50.0, 100.0);
    assert_eq!(v.index_at_offset(0.0), Some(0));
    assert_eq!(v.index_at_offset(120.0), Some(2));
    assert_eq!(v.index_at_offset(150.0), Some(3));
    assert_eq!(v.index_at_offset(5_000.0), Some(9));
}

#[test]
fn disabled_virtualizer_is_empty_and_side_effect_free() {
    let mut v = Virtualizer::new(
        VirtualizerOptions::new(10, |_| 50.0)
            .with_enabled(false)
            .with_initial_rect(Some(Rect::new(0.0, 100.0))),
    );
    assert_eq!(v.total_size(), 0.0);
    assert!(v.virtual_items().is_empty());
    assert!(v.measurements().is_empty());
    assert_eq!(v.range(), None);
    assert_eq!(v.index_at_offset(0.0), None);
    assert_eq!(v.measure(0, 100.0), None);
    assert_eq!(v.scroll_to_index(3, Align::Start), 0.0);
    v.apply_scroll_offset_event(100.0, 0);
    assert!(!v.is_scrolling());

    v.set_enabled(true);
    assert_eq!(indexes(&v), [0, 1, 2]);
    assert_eq!(v.total_size(), 500.0);
}

#[test]
fn disabling_drops_rendered_items() {
    let (calls, on_change) = recorder();
    let mut v = list(10, 50.0, 100.0);
    v.set_on_change(Some(on_change));
    v.set_enabled(false);
    assert!(v.virtual_items().is_empty());
    assert_eq!(*calls.lock().unwrap(), [false]);
}

#[test]
fn horizontal_uses_width() {
    let v = Virtualizer::new(
        VirtualizerOptions::new(10, |_| 50.0)
            .with_horizontal(true)
            .with_initial_rect(Some(Rect::new(100.0, 1_000.0))),
    );
    assert_eq!(v.viewport_size(), 100.0);
    assert_eq!(indexes(&v), [0, 1, 2]);
}

#[test]
fn viewport_resize_recomputes_range() {
    let mut v = list(10, 50.0, 100.0);
    v.set_viewport_size(200.0);
    assert_eq!(v.scroll_rect(), Rect::new(300.0, 200.0));
    assert_eq!(v.range().map(|r| r.end_index), Some(3));
}

#[test]
fn initial_offset_provider_is_resolved_on_construction() {
    let v = Virtualizer::new(
        VirtualizerOptions::new(100, |_| 50.0)
            .with_initial_rect(Some(Rect::new(0.0, 100.0)))
            .with_initial_offset_provider(|| 250.0),
    );
    assert_eq!(v.scroll_offset(), 250.0);
    assert_eq!(v.range().map(|r| r.start_index), Some(5));
}

#[test]
fn measurement_cache_can_roundtrip() {
    let mut v = list(10, 50.0, 100.0);
    v.measure(0, 70.0);
    v.measure(3, 20.0);
    let mut exported = v.export_measurement_cache();
    exported.sort_by_key(|(k, _)| *k);
    assert_eq!(exported, [(0, 70.0), (3, 20.0)]);

    let mut restored = list(10, 50.0, 100.0);
    restored.import_measurement_cache(exported);
    assert_eq!(restored.item_size(0), Some(70.0));
    assert_eq!(restored.item_size(3), Some(20.0));
    assert_eq!(restored.total_size(), v.total_size());

    restored.reset_measurements();
    assert_eq!(restored.measurement_cache_len(), 0);
    assert_eq!(restored.total_size(), 500.0);
}

#[test]
fn frame_state_can_be_restored() {
    let mut v = list(100, 50.0, 100.0);
    v.apply_scroll_offset_event(700.0, 5);
    let frame = v.frame_state();
    assert!(frame.scroll.is_scrolling);

    let mut restored = list(100, 50.0, 0.0);
    restored.restore_frame_state(frame, 5);
    assert_eq!(restored.scroll_offset(), 700.0);
    assert_eq!(restored.viewport_state(), v.viewport_state());
    assert!(restored.is_scrolling());
    assert_eq!(indexes(&restored), indexes(&v));
}

#[test]
fn zero_size_items_keep_range_well_formed() {
    let v = list(5, 0.0, 100.0);
    assert_eq!(v.total_size(), 0.0);
    let range = v.range().unwrap();
    assert!(range.start_index <= range.end_index);
    assert_eq!(range.end_index, 4);
}

fn sizes_strategy(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((0u16..200).prop_map(f64::from), 0..max_len)
}

fn sized(sizes: Vec<f64>, padding: (f64, f64), viewport: f64) -> Virtualizer {
    let sizes = Arc::new(sizes);
    let count = sizes.len();
    Virtualizer::new(
        VirtualizerOptions::new(count, move |i| sizes[i])
            .with_padding(padding.0, padding.1)
            .with_initial_rect(Some(Rect::new(0.0, viewport))),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn layout_is_contiguous_and_totals_match(
        sizes in sizes_strategy(64),
        padding_start in 0u16..50,
        padding_end in 0u16..50,
    ) {
        let (ps, pe) = (f64::from(padding_start), f64::from(padding_end));
        let v = sized(sizes.clone(), (ps, pe), 100.0);
        let items = v.measurements();
        prop_assert_eq!(items.len(), sizes.len());

        let mut expected_start = ps;
        for (i, item) in items.iter().enumerate() {
            prop_assert_eq!(item.index, i);
            prop_assert_eq!(item.start, expected_start);
            prop_assert_eq!(item.size, sizes[i]);
            prop_assert_eq!(item.end, item.start + item.size);
            expected_start = item.end;
        }
        prop_assert_eq!(v.total_size(), expected_start + pe);
    }

    #[test]
    fn range_covers_every_intersecting_item(
        sizes in prop::collection::vec((1u16..100).prop_map(f64::from), 1..80),
        viewport in 1u16..500,
        offset_frac in 0.0f64..1.0,
    ) {
        let mut v = sized(sizes, (0.0, 0.0), f64::from(viewport));
        let offset = (v.total_size() * offset_frac).floor();
        v.set_scroll_offset(offset);

        let range = v.range().unwrap();
        prop_assert!(range.start_index <= range.end_index);
        prop_assert!(range.end_index < v.count());

        let view_end = offset + f64::from(viewport);
        for item in v.measurements() {
            if item.start < view_end && item.end > offset {
                prop_assert!(range.contains(item.index), "item {} outside {:?}", item.index, range);
            }
        }
        for i in range.start_index..=range.end_index {
            prop_assert!(indexes(&v).contains(&i));
        }
    }

    #[test]
    fn correction_keeps_first_visible_item_in_place(
        offset in 0u16..1_600,
        index in 0usize..50,
        size in 0u16..200,
    ) {
        let mut v = list(50, 40.0, 200.0);
        v.set_scroll_offset(f64::from(offset));
        let first = v.range().unwrap().start_index;
        let before = v.item_start(first).unwrap() - v.scroll_offset();

        let write = v.measure(index, f64::from(size));
        if index < first {
            prop_assert!(write.is_some() || f64::from(size) == 40.0);
            let after = v.item_start(first).unwrap() - v.scroll_offset();
            prop_assert_eq!(before, after);
        }
        if let Some(write) = write {
            prop_assert_eq!(write, v.scroll_offset());
        }
    }
}
