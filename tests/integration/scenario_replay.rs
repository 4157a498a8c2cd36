// =====
// TESTS: 3
// =====
//
// Full scenario replays against the simulated list.

use feedline::config::EngineConfig;
use feedline::error::FeedError;
use feedline::feed::{FeedEvent, ReturnPill};
use feedline::scenario::{ReplyPreview, parse_scenario, replay};
use pretty_assertions::assert_eq;
use std::time::Duration;

const CHAT_SESSION: &str = r#"{
    "measured_rows": 30,
    "steps": [
        {"at_ms": 0, "action": "messages", "count": 30},
        {"at_ms": 50, "action": "messages", "count": 31},
        {"at_ms": 100, "action": "scroll", "offset": 900},
        {"at_ms": 200, "action": "messages", "count": 34},
        {"at_ms": 300, "action": "press_pill"},
        {"at_ms": 400, "action": "pointer", "id": 33, "event": {"kind": "down", "x": 0, "y": 0}},
        {"at_ms": 410, "action": "pointer", "id": 33, "event": {"kind": "move", "x": 70, "y": 2}},
        {"at_ms": 420, "action": "pointer", "id": 33, "event": {"kind": "up"}},
        {"at_ms": 500, "action": "scroll_to_index", "index": 50, "animated": true}
    ]
}"#;

#[tokio::test(start_paused = true)]
async fn chat_session_transcript() {
    let scenario = parse_scenario(CHAT_SESSION).unwrap();
    let transcript =
        replay(scenario, EngineConfig::default(), Duration::from_millis(400)).await.unwrap();
    let events: Vec<_> = transcript.iter().map(|timed| timed.event.clone()).collect();
    assert_eq!(
        events,
        vec![
            FeedEvent::ScrollToBottom { animated: true },
            FeedEvent::ReturnPill(ReturnPill { visible: true, unread_count: 3 }),
            FeedEvent::ScrollToBottom { animated: true },
            FeedEvent::ReturnPill(ReturnPill { visible: false, unread_count: 0 }),
            FeedEvent::ReplyRequested {
                target: ReplyPreview {
                    message_id: 33,
                    author: "bob".to_owned(),
                    excerpt: "message number 33 from bob".to_owned(),
                },
            },
            FeedEvent::ScrollToIndex { index: 50, animated: true, retry: false },
            FeedEvent::ScrollToIndex { index: 29, animated: true, retry: true },
        ]
    );

    let first_try = &transcript[5];
    let retry = &transcript[6];
    assert!(retry.at_ms - first_try.at_ms >= 100);
}

#[tokio::test(start_paused = true)]
async fn system_messages_do_not_swipe() {
    let scenario = parse_scenario(
        r#"{"steps": [
            {"at_ms": 0, "action": "messages", "count": 5, "system": true},
            {"at_ms": 10, "action": "pointer", "id": 2, "event": {"kind": "down", "x": 0, "y": 0}},
            {"at_ms": 20, "action": "pointer", "id": 2, "event": {"kind": "move", "x": 90, "y": 0}}
        ]}"#,
    )
    .unwrap();
    let transcript =
        replay(scenario, EngineConfig::default(), Duration::from_millis(100)).await.unwrap();
    assert!(transcript.is_empty());
}

#[tokio::test]
async fn scenario_config_must_be_valid() {
    let err = parse_scenario(
        r#"{"config": {"swipe": {"trigger_threshold": 120}}, "steps": []}"#,
    )
    .unwrap_err();
    assert!(matches!(err, FeedError::InvalidConfig(_)));
    assert_eq!(err.exit_code(), FeedError::INVALID_CONFIG_EXIT_CODE);
}
