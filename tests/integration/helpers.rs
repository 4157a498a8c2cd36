use feedline::config::EngineConfig;
use feedline::feed::{
    FeedEvent, FrameContext, LayoutMiss, LogicBridge, LogicContext, LogicTask, ReplyAdapter,
    ScrollEvent, ScrollPhase, SharedInset, VirtualizedList,
};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: u32,
    pub author: &'static str,
}

pub type Frame = FrameContext<u32, Message, String>;
pub type Logic = LogicContext<RecordingList, String>;

/// List double that records every programmatic scroll.
#[derive(Debug, Default)]
pub struct RecordingList {
    pub offsets: Vec<f32>,
    pub index_calls: Vec<usize>,
    pub measured_up_to: usize,
}

impl VirtualizedList for RecordingList {
    fn scroll_to_offset(&mut self, offset: f32, _animated: bool) {
        self.offsets.push(offset);
    }

    fn scroll_to_index(&mut self, index: usize, _animated: bool) -> Result<(), LayoutMiss> {
        self.index_calls.push(index);
        if index > self.measured_up_to {
            return Err(LayoutMiss { requested: index, highest_measured_index: self.measured_up_to });
        }
        Ok(())
    }
}

pub fn reply_adapter() -> ReplyAdapter<Message, String> {
    Arc::new(|message: &Message| format!("{}:{}", message.author, message.id))
}

pub fn message(id: u32) -> Arc<Message> {
    Arc::new(Message { id, author: if id % 2 == 0 { "alice" } else { "bob" } })
}

/// Both contexts wired together, with the bridge pumped by hand.
pub struct Harness {
    pub frame: Frame,
    pub logic: Logic,
    pub bridge: UnboundedReceiver<LogicTask<String>>,
    pub events: UnboundedReceiver<FeedEvent<String>>,
    pub inset: SharedInset,
}

impl Harness {
    /// 800px viewport over 10000px of content, 20 messages already loaded.
    pub fn new(config: &EngineConfig) -> Self {
        let (bridge_tx, bridge) = LogicBridge::channel();
        let (events_tx, events) = tokio::sync::mpsc::unbounded_channel();
        let inset = SharedInset::default();
        let frame = FrameContext::new(config, reply_adapter(), bridge_tx, Some(inset.clone()));
        let list = RecordingList { measured_up_to: 20, ..RecordingList::default() };
        let logic = LogicContext::new(config, list, events_tx);
        let mut harness = Self { frame, logic, bridge, events, inset };
        harness.frame.on_layout(800.0, 10_000.0);
        harness.logic.on_message_count(20);
        harness.pump();
        harness.drain_events();
        harness
    }

    /// Deliver everything queued on the bridge to the logic context.
    pub fn pump(&mut self) {
        while let Ok(task) = self.bridge.try_recv() {
            self.logic.handle(task);
        }
    }

    pub fn drain_events(&mut self) -> Vec<FeedEvent<String>> {
        std::iter::from_fn(|| self.events.try_recv().ok()).collect()
    }

    pub fn scroll_to(&mut self, offset: f32) {
        self.frame.on_scroll(ScrollEvent::scroll(offset));
        self.pump();
    }

    pub fn drag(&mut self, offset: f32, phase: ScrollPhase) {
        self.frame.on_scroll(ScrollEvent { offset, velocity: 0.0, phase });
        self.pump();
    }

    pub fn messages(&mut self, count: usize) -> Vec<FeedEvent<String>> {
        self.logic.on_message_count(count);
        self.drain_events()
    }
}
