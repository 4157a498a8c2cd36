// =====
// TESTS: 12
// =====
//
// Autoscroll and return-pill flows across both contexts.
// Scroll samples enter the frame context, cross the bridge, and drive
// decisions in the logic context.

use feedline::config::{EngineConfig, KeyboardLeniency, ListOrientation};
use feedline::feed::{FeedEvent, KeyboardEvent, ReturnPill, ScrollPhase};
use pretty_assertions::assert_eq;

use crate::helpers::Harness;

fn pill(visible: bool, unread_count: usize) -> FeedEvent<String> {
    FeedEvent::ReturnPill(ReturnPill { visible, unread_count })
}

// --- At bottom ---

#[test]
fn new_message_at_bottom_scrolls_to_bottom() {
    let mut h = Harness::new(&EngineConfig::default());
    assert_eq!(h.messages(21), vec![FeedEvent::ScrollToBottom { animated: true }]);
    assert_eq!(h.logic.list().offsets, vec![0.0]);
    assert_eq!(h.logic.pill(), ReturnPill::default());
}

#[test]
fn small_scroll_inside_threshold_still_autoscrolls() {
    let mut h = Harness::new(&EngineConfig::default());
    h.scroll_to(180.0);
    assert_eq!(h.messages(22), vec![FeedEvent::ScrollToBottom { animated: true }]);
}

// --- In scrollback ---

#[test]
fn scrollback_counts_unread_then_clears_on_return() {
    let mut h = Harness::new(&EngineConfig::default());
    h.scroll_to(600.0);
    assert_eq!(h.messages(21), vec![pill(true, 1)]);
    assert_eq!(h.messages(23), vec![pill(true, 3)]);
    assert!(h.logic.list().offsets.is_empty());

    // Reader scrolls back down on their own.
    h.scroll_to(150.0);
    assert_eq!(h.drain_events(), vec![pill(false, 0)]);
    assert_eq!(h.messages(24), vec![FeedEvent::ScrollToBottom { animated: true }]);
}

#[test]
fn unread_total_matches_messages_added_while_away() {
    let mut h = Harness::new(&EngineConfig::default());
    h.scroll_to(2_000.0);
    let mut count = 20;
    let mut added = 0;
    for batch in [1, 4, 2, 7, 1] {
        count += batch;
        added += batch;
        h.messages(count);
        assert_eq!(h.logic.pill(), ReturnPill { visible: true, unread_count: added });
    }
}

#[test]
fn pressing_pill_scrolls_and_clears() {
    let mut h = Harness::new(&EngineConfig::default());
    h.scroll_to(900.0);
    h.messages(25);
    h.logic.press_return_pill();
    assert_eq!(
        h.drain_events(),
        vec![FeedEvent::ScrollToBottom { animated: true }, pill(false, 0)]
    );
    assert_eq!(h.logic.list().offsets, vec![0.0]);
}

#[test]
fn deleting_messages_clamps_unread() {
    let mut h = Harness::new(&EngineConfig::default());
    h.scroll_to(900.0);
    h.messages(26);
    assert_eq!(h.logic.pill().unread_count, 6);
    assert_eq!(h.messages(3), vec![pill(true, 3)]);
    assert_eq!(h.messages(0), vec![pill(false, 0)]);
}

// --- Dragging ---

#[test]
fn dragging_near_bottom_suppresses_autoscroll() {
    let mut h = Harness::new(&EngineConfig::default());
    h.drag(40.0, ScrollPhase::DragBegin);
    assert_eq!(h.logic.pill(), ReturnPill::default());
    assert_eq!(h.messages(21), vec![pill(true, 1)]);
    assert!(h.logic.list().offsets.is_empty());

    h.drag(40.0, ScrollPhase::DragEnd);
    // Released near the bottom: the next arrival autoscrolls and drops the pill.
    assert_eq!(
        h.messages(22),
        vec![FeedEvent::ScrollToBottom { animated: true }, pill(false, 0)]
    );
}

// --- Keyboard leniency ---

#[test]
fn open_keyboard_widens_at_bottom_band() {
    let mut h = Harness::new(&EngineConfig::default());
    h.scroll_to(350.0);
    assert_eq!(h.messages(21), vec![pill(true, 1)]);

    h.frame.on_keyboard_event(KeyboardEvent::Show { height: 300.0 });
    h.pump();
    // 350px is inside 200 + 300 while the keyboard is up.
    assert_eq!(h.drain_events(), vec![pill(false, 0)]);
    assert_eq!(h.messages(22), vec![FeedEvent::ScrollToBottom { animated: true }]);

    h.frame.on_keyboard_event(KeyboardEvent::Hide);
    h.pump();
    assert_eq!(h.messages(23), vec![pill(true, 1)]);
}

#[test]
fn keyboard_opening_deep_in_scrollback_keeps_unread() {
    let mut h = Harness::new(&EngineConfig::default());
    // Last band crossing was reported at 260; the reader keeps going to 900.
    h.scroll_to(260.0);
    h.scroll_to(900.0);
    h.drain_events();
    assert_eq!(h.messages(21), vec![pill(true, 1)]);

    h.frame.on_keyboard_event(KeyboardEvent::Show { height: 300.0 });
    h.pump();
    // 900px is outside 200 + 300, so nothing counts as a return.
    assert!(h.drain_events().is_empty());
    assert_eq!(h.messages(22), vec![pill(true, 2)]);
    assert!(h.logic.list().offsets.is_empty());

    h.scroll_to(450.0);
    assert_eq!(h.drain_events(), vec![pill(false, 0)]);
}

#[test]
fn leniency_can_be_disabled() {
    let config = EngineConfig { keyboard_leniency: KeyboardLeniency::None, ..EngineConfig::default() };
    let mut h = Harness::new(&config);
    h.scroll_to(350.0);
    h.frame.on_keyboard_event(KeyboardEvent::Show { height: 300.0 });
    h.pump();
    assert_eq!(h.messages(21), vec![pill(true, 1)]);
}

#[test]
fn keyboard_frames_move_inset_without_logic_traffic() {
    let mut h = Harness::new(&EngineConfig::default());
    h.scroll_to(600.0);
    h.drain_events();
    for height in [40.0, 160.0, 290.0] {
        h.frame.on_keyboard_frame(height);
    }
    assert!((h.inset.get() - 290.0).abs() < f32::EPSILON);
    assert!(h.bridge.try_recv().is_err());
    assert_eq!(h.messages(21), vec![pill(true, 1)]);
}

// --- Normal orientation ---

#[test]
fn normal_orientation_scrolls_to_the_end_of_content() {
    let config = EngineConfig { orientation: ListOrientation::Normal, ..EngineConfig::default() };
    let mut h = Harness::new(&config);
    // Bottom of 10000px content in an 800px viewport.
    h.scroll_to(9_200.0);
    h.drain_events();
    assert_eq!(h.messages(21), vec![FeedEvent::ScrollToBottom { animated: true }]);
    assert_eq!(h.logic.list().offsets, vec![9_200.0]);

    // Content grows by one row; the bottom moves with it.
    h.frame.on_layout(800.0, 10_064.0);
    h.pump();
    assert_eq!(h.messages(22), vec![FeedEvent::ScrollToBottom { animated: true }]);
    assert_eq!(h.logic.list().offsets, vec![9_200.0, 9_264.0]);

    // Scrolling up means a smaller raw offset here.
    h.scroll_to(8_000.0);
    h.drain_events();
    assert_eq!(h.messages(24), vec![pill(true, 2)]);

    h.logic.press_return_pill();
    assert_eq!(
        h.drain_events(),
        vec![FeedEvent::ScrollToBottom { animated: true }, pill(false, 0)]
    );
    assert_eq!(h.logic.list().offsets, vec![9_200.0, 9_264.0, 9_264.0]);
}
