// feedline - Live message feed interaction engine for chat views
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Scripted replay of a chat screen against a simulated virtualized list.
//!
//! A scenario is a JSON document of timed presentation inputs. Replaying it
//! runs both execution contexts concurrently on the current task and
//! collects every [`FeedEvent`] the engine publishes.

use crate::config::{EngineConfig, ListOrientation};
use crate::error::FeedError;
use crate::feed::{
    FeedEvent, FrameContext, FrameInput, KeyboardEvent, LayoutMiss, ListAxis, LogicBridge,
    LogicContext, LogicInput, PointerEvent, ReplyAdapter, ScrollEvent, ScrollPhase, SharedInset,
    VirtualizedList, run_frame_loop, run_logic_loop,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

const EXCERPT_CHARS: usize = 40;

fn default_viewport_height() -> f32 {
    800.0
}

fn default_item_height() -> f32 {
    64.0
}

fn default_measured_rows() -> usize {
    30
}

fn default_phase() -> ScrollPhase {
    ScrollPhase::Scroll
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Overrides the config passed on the command line.
    #[serde(default)]
    pub config: Option<EngineConfig>,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f32,
    #[serde(default = "default_item_height")]
    pub item_height: f32,
    /// Rows, counted from the newest message, the simulated list has already measured.
    #[serde(default = "default_measured_rows")]
    pub measured_rows: usize,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Total message count is now `count`. Index 0 is always the newest message.
    Messages {
        count: usize,
        #[serde(default)]
        system: bool,
    },
    Scroll {
        offset: f32,
        #[serde(default)]
        velocity: f32,
        #[serde(default = "default_phase")]
        phase: ScrollPhase,
    },
    Keyboard {
        event: KeyboardEvent,
    },
    KeyboardFrame {
        height: f32,
    },
    Composer {
        height: f32,
    },
    Pointer {
        id: u64,
        event: PointerEvent,
    },
    PressPill,
    ScrollToIndex {
        index: usize,
        #[serde(default)]
        animated: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioMessage {
    pub id: u64,
    pub author: String,
    pub text: String,
}

impl ScenarioMessage {
    #[must_use]
    pub fn generated(id: u64) -> Self {
        let author = if id % 2 == 0 { "alice" } else { "bob" };
        Self { id, author: author.to_owned(), text: format!("message number {id} from {author}") }
    }
}

/// Reply-target descriptor produced for scenario messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyPreview {
    pub message_id: u64,
    pub author: String,
    pub excerpt: String,
}

#[must_use]
pub fn reply_preview(message: &ScenarioMessage) -> ReplyPreview {
    ReplyPreview {
        message_id: message.id,
        author: message.author.clone(),
        excerpt: message.text.chars().take(EXCERPT_CHARS).collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: FeedEvent<ReplyPreview>,
}

type ScenarioFrameInput = FrameInput<u64, ScenarioMessage>;

/// Virtualized list stand-in: fixed row height, a measured window of the
/// rows nearest the bottom, and every programmatic scroll echoed back as a
/// scroll sample.
///
/// Indices count from the newest message, so index `i` sits `i` rows above
/// the bottom in either orientation.
pub struct SimulatedList {
    axis: ListAxis,
    viewport_height: f32,
    item_height: f32,
    measured_rows: usize,
    rows: Arc<AtomicUsize>,
    frame: mpsc::UnboundedSender<ScenarioFrameInput>,
}

impl SimulatedList {
    /// `rows` is the message count, kept current by whoever appends messages.
    #[must_use]
    pub fn new(
        orientation: ListOrientation,
        viewport_height: f32,
        item_height: f32,
        measured_rows: usize,
        rows: Arc<AtomicUsize>,
        frame: mpsc::UnboundedSender<ScenarioFrameInput>,
    ) -> Self {
        Self {
            axis: ListAxis::new(orientation),
            viewport_height,
            item_height,
            measured_rows,
            rows,
            frame,
        }
    }

    fn echo(&self, offset: f32) {
        if self.frame.send(FrameInput::Scroll(ScrollEvent::scroll(offset))).is_err() {
            tracing::trace!(offset, "frame context gone, scroll echo dropped");
        }
    }
}

impl VirtualizedList for SimulatedList {
    fn scroll_to_offset(&mut self, offset: f32, _animated: bool) {
        self.echo(offset);
    }

    #[allow(clippy::cast_precision_loss)]
    fn scroll_to_index(&mut self, index: usize, _animated: bool) -> Result<(), LayoutMiss> {
        let rows = self.rows.load(Ordering::Relaxed);
        let highest_measured_index = self.measured_rows.min(rows).saturating_sub(1);
        if index > highest_measured_index {
            return Err(LayoutMiss { requested: index, highest_measured_index });
        }
        self.axis.set_layout(self.viewport_height, rows as f32 * self.item_height);
        let distance = (index as f32 * self.item_height).min(self.axis.max_offset());
        self.echo(self.axis.offset_for_distance(distance));
        Ok(())
    }
}

impl Scenario {
    pub fn validate(&self) -> Result<(), FeedError> {
        if !(self.viewport_height.is_finite() && self.viewport_height > 0.0) {
            return Err(FeedError::InvalidScenario("viewport_height must be positive".to_owned()));
        }
        if !(self.item_height.is_finite() && self.item_height > 0.0) {
            return Err(FeedError::InvalidScenario("item_height must be positive".to_owned()));
        }
        if let Some(pair) = self.steps.windows(2).find(|pair| pair[1].at_ms < pair[0].at_ms) {
            return Err(FeedError::InvalidScenario(format!(
                "steps must be ordered by at_ms ({} comes after {})",
                pair[1].at_ms, pair[0].at_ms
            )));
        }
        if let Some(config) = &self.config {
            config.validate()?;
        }
        Ok(())
    }
}

pub fn load_scenario(path: &Path) -> Result<Scenario, FeedError> {
    let raw = std::fs::read_to_string(path).map_err(|e| FeedError::ScenarioUnreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    parse_scenario(&raw)
}

pub fn parse_scenario(raw: &str) -> Result<Scenario, FeedError> {
    let scenario: Scenario =
        serde_json::from_str(raw).map_err(|e| FeedError::InvalidScenario(e.to_string()))?;
    scenario.validate()?;
    Ok(scenario)
}

/// Replay `scenario`, then let animations and retries run for `settle`.
pub async fn replay(
    scenario: Scenario,
    config: EngineConfig,
    settle: Duration,
) -> Result<Vec<TimedEvent>, FeedError> {
    scenario.validate()?;
    let config = scenario.config.clone().unwrap_or(config);
    config.validate()?;

    let (frame_tx, mut frame_rx) = mpsc::unbounded_channel::<ScenarioFrameInput>();
    let (logic_tx, mut logic_rx) = mpsc::unbounded_channel::<LogicInput>();
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let (bridge, mut bridge_rx) = LogicBridge::channel();

    let adapter: ReplyAdapter<ScenarioMessage, ReplyPreview> = Arc::new(reply_preview);
    let mut frame = FrameContext::new(&config, adapter, bridge, Some(SharedInset::default()));
    let rows = Arc::new(AtomicUsize::new(0));
    let list = SimulatedList::new(
        config.orientation,
        scenario.viewport_height,
        scenario.item_height,
        scenario.measured_rows,
        Arc::clone(&rows),
        frame_tx.clone(),
    );
    let mut logic = LogicContext::new(&config, list, events_tx);

    let cancel = CancellationToken::new();
    let started = Instant::now();
    let mut transcript = Vec::new();

    let driver = drive(&scenario, &frame_tx, &logic_tx, &rows, started, settle, cancel.clone());
    let collector = async {
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                Some(event) = events_rx.recv() => transcript.push(stamp(started, event)),
            }
        }
        while let Ok(event) = events_rx.try_recv() {
            transcript.push(stamp(started, event));
        }
    };

    let ((), (), driven, ()) = tokio::join!(
        run_frame_loop(&mut frame, &mut frame_rx, config.frame_interval(), cancel.clone()),
        run_logic_loop(&mut logic, &mut bridge_rx, &mut logic_rx, cancel.clone()),
        driver,
        collector,
    );
    driven?;

    tracing::info!(events = transcript.len(), "scenario replay finished");
    Ok(transcript)
}

fn stamp(started: Instant, event: FeedEvent<ReplyPreview>) -> TimedEvent {
    let at_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    TimedEvent { at_ms, event }
}

async fn drive(
    scenario: &Scenario,
    frame: &mpsc::UnboundedSender<ScenarioFrameInput>,
    logic: &mpsc::UnboundedSender<LogicInput>,
    rows: &AtomicUsize,
    started: Instant,
    settle: Duration,
    cancel: CancellationToken,
) -> Result<(), FeedError> {
    let send_frame = |input: ScenarioFrameInput| {
        frame.send(input).map_err(|_| FeedError::LogicContextClosed)
    };
    let send_logic =
        |input: LogicInput| logic.send(input).map_err(|_| FeedError::LogicContextClosed);

    let mut message_count = 0usize;
    let result = async {
        send_frame(FrameInput::Layout {
            viewport_height: scenario.viewport_height,
            content_height: 0.0,
        })?;
        for step in &scenario.steps {
            tokio::time::sleep_until(started + Duration::from_millis(step.at_ms)).await;
            tracing::debug!(at_ms = step.at_ms, action = ?step.action, "scenario step");
            match &step.action {
                Action::Messages { count, system } => {
                    for id in message_count..*count {
                        let id = id as u64;
                        send_frame(FrameInput::Mount {
                            key: id,
                            message: Arc::new(ScenarioMessage::generated(id)),
                            swipe_enabled: !system,
                        })?;
                    }
                    for id in *count..message_count {
                        send_frame(FrameInput::Unmount(id as u64))?;
                    }
                    message_count = *count;
                    rows.store(message_count, Ordering::Relaxed);
                    #[allow(clippy::cast_precision_loss)]
                    let content_height = message_count as f32 * scenario.item_height;
                    send_frame(FrameInput::Layout {
                        viewport_height: scenario.viewport_height,
                        content_height,
                    })?;
                    send_logic(LogicInput::MessageCount(message_count))?;
                }
                Action::Scroll { offset, velocity, phase } => {
                    send_frame(FrameInput::Scroll(ScrollEvent {
                        offset: *offset,
                        velocity: *velocity,
                        phase: *phase,
                    }))?;
                }
                Action::Keyboard { event } => send_frame(FrameInput::Keyboard(*event))?,
                Action::KeyboardFrame { height } => {
                    send_frame(FrameInput::KeyboardFrame(*height))?;
                }
                Action::Composer { height } => send_frame(FrameInput::ComposerHeight(*height))?,
                Action::Pointer { id, event } => {
                    send_frame(FrameInput::Pointer { key: *id, event: *event })?;
                }
                Action::PressPill => send_logic(LogicInput::ReturnPillPressed)?,
                Action::ScrollToIndex { index, animated } => {
                    send_logic(LogicInput::ScrollToIndex { index: *index, animated: *animated })?;
                }
            }
        }
        tokio::time::sleep(settle).await;
        Ok(())
    }
    .await;
    cancel.cancel();
    result
}
