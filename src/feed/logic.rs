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

//! The application-logic side of the engine: autoscroll decisions, the
//! return-to-bottom pill, reply dispatch and scroll-to-index recovery.

use super::autoscroll::{AutoscrollDecision, AutoscrollEngine, AutoscrollState, ReturnPill};
use super::axis::ListAxis;
use super::bridge::LogicTask;
use super::list::VirtualizedList;
use super::retry::{PendingRetry, ScrollRetry};
use crate::config::EngineConfig;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Everything the engine tells the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FeedEvent<R> {
    ScrollToBottom { animated: bool },
    ScrollToIndex { index: usize, animated: bool, retry: bool },
    ReturnPill(ReturnPill),
    ReplyRequested { target: R },
}

pub struct LogicContext<L, R> {
    autoscroll: AutoscrollEngine,
    axis: ListAxis,
    retry: ScrollRetry,
    list: L,
    events: mpsc::UnboundedSender<FeedEvent<R>>,
    published_pill: ReturnPill,
}

impl<L, R> LogicContext<L, R>
where
    L: VirtualizedList,
{
    #[must_use]
    pub fn new(config: &EngineConfig, list: L, events: mpsc::UnboundedSender<FeedEvent<R>>) -> Self {
        Self {
            autoscroll: AutoscrollEngine::new(config.at_bottom_threshold, config.keyboard_leniency),
            axis: ListAxis::new(config.orientation),
            retry: ScrollRetry::new(config.scroll_retry_delay()),
            list,
            events,
            published_pill: ReturnPill::default(),
        }
    }

    #[must_use]
    pub fn pill(&self) -> ReturnPill {
        self.autoscroll.pill()
    }

    #[must_use]
    pub fn autoscroll_state(&self) -> AutoscrollState {
        self.autoscroll.state()
    }

    #[must_use]
    pub fn list(&self) -> &L {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut L {
        &mut self.list
    }

    #[must_use]
    pub fn pending_retry(&self) -> Option<PendingRetry> {
        self.retry.pending()
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.retry.deadline()
    }

    /// Work marshalled from the frame context.
    pub fn handle(&mut self, task: LogicTask<R>) {
        match task {
            LogicTask::Tracker(update) => {
                self.autoscroll.on_tracker_update(update);
            }
            LogicTask::Keyboard(snapshot) => self.autoscroll.set_keyboard(snapshot),
            LogicTask::Layout { viewport_height, content_height } => {
                self.axis.set_layout(viewport_height, content_height);
            }
            LogicTask::Reply(target) => {
                tracing::debug!("reply requested");
                self.emit(FeedEvent::ReplyRequested { target });
            }
        }
        self.publish_pill();
    }

    pub fn on_message_count(&mut self, count: usize) {
        match self.autoscroll.on_message_count(count) {
            AutoscrollDecision::ScrollToBottom { animated } => self.scroll_to_bottom(animated),
            AutoscrollDecision::Unread { .. } | AutoscrollDecision::None => {}
        }
        self.publish_pill();
    }

    /// The pill's press handler: same effect as scrolling back organically.
    pub fn press_return_pill(&mut self) {
        self.autoscroll.return_to_bottom();
        self.scroll_to_bottom(true);
        self.publish_pill();
    }

    pub fn scroll_to_bottom(&mut self, animated: bool) {
        self.retry.supersede();
        self.list.scroll_to_offset(self.axis.bottom_offset(), animated);
        self.emit(FeedEvent::ScrollToBottom { animated });
    }

    /// Scroll a message into view, recovering once from a layout miss.
    pub fn scroll_to_index(&mut self, index: usize, animated: bool) {
        self.retry.supersede();
        self.emit(FeedEvent::ScrollToIndex { index, animated, retry: false });
        if let Err(miss) = self.list.scroll_to_index(index, animated) {
            let retry = self.retry.schedule(miss, animated, Instant::now());
            tracing::debug!(
                requested = index,
                retry_index = retry.index,
                "scroll_to_index missed, retry scheduled"
            );
        }
    }

    /// Run the pending retry if it is due. The retry itself is never retried.
    pub fn poll_retry(&mut self, now: Instant) {
        let Some(retry) = self.retry.take_due(now) else {
            return;
        };
        self.emit(FeedEvent::ScrollToIndex { index: retry.index, animated: retry.animated, retry: true });
        if let Err(miss) = self.list.scroll_to_index(retry.index, retry.animated) {
            tracing::debug!(%miss, requested = retry.requested, "scroll retry missed again, giving up");
        }
    }

    fn publish_pill(&mut self) {
        let pill = self.autoscroll.pill();
        if pill != self.published_pill {
            self.published_pill = pill;
            self.emit(FeedEvent::ReturnPill(pill));
        }
    }

    fn emit(&self, event: FeedEvent<R>) {
        if self.events.send(event).is_err() {
            tracing::trace!("no presentation listener for feed event");
        }
    }
}
