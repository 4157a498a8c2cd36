// =====
// TESTS: 5
// =====
//
// Both contexts running as async loops on paused tokio time.

use feedline::config::EngineConfig;
use feedline::feed::{
    FeedEvent, FrameContext, FrameInput, KeyboardEvent, LogicBridge, LogicContext, LogicInput,
    PointerEvent, ReturnPill, ScrollEvent, SharedInset, SwipePhase, run_frame_loop,
    run_logic_loop,
};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::helpers::{Frame, Logic, Message, RecordingList, message, reply_adapter};

struct Running {
    frame_tx: mpsc::UnboundedSender<FrameInput<u32, Message>>,
    logic_tx: mpsc::UnboundedSender<LogicInput>,
    events: mpsc::UnboundedReceiver<FeedEvent<String>>,
    inset: SharedInset,
    cancel: CancellationToken,
    frame: JoinHandle<Frame>,
    logic: JoinHandle<Logic>,
}

impl Running {
    fn start(config: &EngineConfig) -> Self {
        let (bridge, mut bridge_rx) = LogicBridge::channel();
        let (frame_tx, mut frame_rx) = mpsc::unbounded_channel();
        let (logic_tx, mut logic_rx) = mpsc::unbounded_channel();
        let (events_tx, events) = mpsc::unbounded_channel();
        let inset = SharedInset::default();
        let cancel = CancellationToken::new();

        let mut frame: Frame =
            FrameContext::new(config, reply_adapter(), bridge, Some(inset.clone()));
        let list = RecordingList { measured_up_to: 20, ..RecordingList::default() };
        let mut logic: Logic = LogicContext::new(config, list, events_tx);
        let interval = config.frame_interval();

        let frame_cancel = cancel.clone();
        let frame = tokio::spawn(async move {
            run_frame_loop(&mut frame, &mut frame_rx, interval, frame_cancel).await;
            frame
        });
        let logic_cancel = cancel.clone();
        let logic = tokio::spawn(async move {
            run_logic_loop(&mut logic, &mut bridge_rx, &mut logic_rx, logic_cancel).await;
            logic
        });
        Self { frame_tx, logic_tx, events, inset, cancel, frame, logic }
    }

    async fn settle(&self, ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    async fn stop(mut self) -> (Frame, Logic, Vec<FeedEvent<String>>) {
        self.cancel.cancel();
        let frame = self.frame.await.unwrap();
        let logic = self.logic.await.unwrap();
        let events = std::iter::from_fn(|| self.events.try_recv().ok()).collect();
        (frame, logic, events)
    }
}

#[tokio::test(start_paused = true)]
async fn scroll_to_index_miss_retries_after_delay() {
    let run = Running::start(&EngineConfig::default());
    run.logic_tx.send(LogicInput::ScrollToIndex { index: 35, animated: true }).unwrap();
    run.settle(50).await;
    run.settle(100).await;
    let (_, logic, events) = run.stop().await;
    assert_eq!(logic.list().index_calls, vec![35, 20]);
    assert_eq!(
        events,
        vec![
            FeedEvent::ScrollToIndex { index: 35, animated: true, retry: false },
            FeedEvent::ScrollToIndex { index: 20, animated: true, retry: true },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn newer_request_supersedes_pending_retry() {
    let run = Running::start(&EngineConfig::default());
    run.logic_tx.send(LogicInput::MessageCount(20)).unwrap();
    run.logic_tx.send(LogicInput::ScrollToIndex { index: 35, animated: false }).unwrap();
    run.settle(40).await;
    run.logic_tx.send(LogicInput::ReturnPillPressed).unwrap();
    run.settle(300).await;
    let (_, logic, _) = run.stop().await;
    assert_eq!(logic.list().index_calls, vec![35]);
    assert_eq!(logic.list().offsets, vec![0.0]);
}

#[tokio::test(start_paused = true)]
async fn unmount_drops_pending_retry() {
    let run = Running::start(&EngineConfig::default());
    run.logic_tx.send(LogicInput::ScrollToIndex { index: 50, animated: true }).unwrap();
    run.settle(20).await;
    let (_, logic, _) = run.stop().await;
    assert!(logic.pending_retry().is_some());
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(logic.list().index_calls, vec![50]);
}

#[tokio::test(start_paused = true)]
async fn scrollback_and_swipe_flow_end_to_end() {
    let run = Running::start(&EngineConfig::default());
    run.frame_tx
        .send(FrameInput::Layout { viewport_height: 800.0, content_height: 6_000.0 })
        .unwrap();
    run.logic_tx.send(LogicInput::MessageCount(40)).unwrap();
    run.frame_tx.send(FrameInput::Scroll(ScrollEvent::scroll(1_200.0))).unwrap();
    run.settle(20).await;
    run.logic_tx.send(LogicInput::MessageCount(42)).unwrap();
    run.settle(20).await;

    run.frame_tx
        .send(FrameInput::Mount { key: 7, message: message(7), swipe_enabled: true })
        .unwrap();
    run.frame_tx
        .send(FrameInput::Pointer { key: 7, event: PointerEvent::Down { x: 10.0, y: 10.0 } })
        .unwrap();
    run.frame_tx
        .send(FrameInput::Pointer { key: 7, event: PointerEvent::Move { x: 85.0, y: 12.0 } })
        .unwrap();
    run.frame_tx.send(FrameInput::Pointer { key: 7, event: PointerEvent::Up }).unwrap();
    run.settle(1_000).await;

    let (frame, _, events) = run.stop().await;
    assert_eq!(
        events,
        vec![
            FeedEvent::ReturnPill(ReturnPill { visible: true, unread_count: 2 }),
            FeedEvent::ReplyRequested { target: "bob:7".to_owned() },
        ]
    );
    let state = frame.swipe_state(&7).unwrap();
    assert_eq!(state.phase, SwipePhase::Idle);
    assert!(state.translation_x.abs() < f32::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn keyboard_frames_drive_shared_inset() {
    let mut config = EngineConfig::default();
    config.inset.composer_height = 56.0;
    config.inset.bottom_safe_area = 34.0;
    let run = Running::start(&config);
    for height in [0.0, 90.0, 210.0, 300.0] {
        run.frame_tx.send(FrameInput::KeyboardFrame(height)).unwrap();
        run.settle(16).await;
    }
    assert!((run.inset.get() - 356.0).abs() < f32::EPSILON);
    run.frame_tx.send(FrameInput::Keyboard(KeyboardEvent::Show { height: 300.0 })).unwrap();
    run.frame_tx.send(FrameInput::KeyboardFrame(0.0)).unwrap();
    run.settle(16).await;
    assert!((run.inset.get() - 90.0).abs() < f32::EPSILON);
    let (_, _, events) = run.stop().await;
    assert!(events.is_empty());
}
