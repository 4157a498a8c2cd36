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

//! One-way, fire-and-forget channel from the frame context to the logic
//! context.
//!
//! The frame context never awaits the logic context: sends are non-blocking
//! and a closed receiver only drops the task. The bridge is deliberately not
//! `Clone`, so the frame context stays its single producer.

use super::inset::KeyboardSnapshot;
use super::scroll::TrackerUpdate;
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum LogicTask<R> {
    Tracker(TrackerUpdate),
    /// List geometry changed; the logic context needs it to locate the bottom.
    Layout { viewport_height: f32, content_height: f32 },
    Keyboard(KeyboardSnapshot),
    Reply(R),
}

pub struct LogicBridge<R> {
    tx: mpsc::UnboundedSender<LogicTask<R>>,
}

impl<R> LogicBridge<R> {
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<LogicTask<R>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Schedule `task` on the logic context without waiting.
    pub fn run_on_logic(&self, task: LogicTask<R>) {
        if self.tx.send(task).is_err() {
            tracing::warn!("logic context closed, dropping task");
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
