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

//! Autoscroll / unread decision state machine.
//!
//! Never yank the viewport away from a reader in scrollback: new messages
//! only scroll the list when the viewport is at the bottom and the user is
//! not dragging. Otherwise they accumulate behind the return-to-bottom pill.

use super::inset::KeyboardSnapshot;
use super::scroll::{AtBottomState, TrackerUpdate};
use crate::config::KeyboardLeniency;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutoscrollState {
    pub last_known_message_count: usize,
    pub unread_count: usize,
    pub show_return_pill: bool,
}

/// Presentation-facing view of the return-to-bottom affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReturnPill {
    pub visible: bool,
    pub unread_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoscrollDecision {
    /// Nothing to do (baseline, no growth, or deletions).
    None,
    ScrollToBottom { animated: bool },
    Unread { added: usize },
}

pub struct AutoscrollEngine {
    state: AutoscrollState,
    has_baseline: bool,
    at_bottom: AtBottomState,
    within_lenient: bool,
    is_dragging: bool,
    keyboard: KeyboardSnapshot,
    threshold: f32,
    leniency: KeyboardLeniency,
}

impl AutoscrollEngine {
    #[must_use]
    pub fn new(threshold: f32, leniency: KeyboardLeniency) -> Self {
        Self {
            state: AutoscrollState::default(),
            has_baseline: false,
            at_bottom: AtBottomState::default(),
            within_lenient: true,
            is_dragging: false,
            keyboard: KeyboardSnapshot::default(),
            threshold,
            leniency,
        }
    }

    #[must_use]
    pub fn state(&self) -> AutoscrollState {
        self.state
    }

    #[must_use]
    pub fn pill(&self) -> ReturnPill {
        ReturnPill { visible: self.state.show_return_pill, unread_count: self.state.unread_count }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    /// At-bottom threshold including keyboard leniency.
    #[must_use]
    pub fn effective_threshold(&self) -> f32 {
        self.threshold + self.leniency.extra(self.keyboard)
    }

    /// At-bottom classification used for decisions. With the keyboard closed
    /// this is exactly the tracker's `is_at_bottom`.
    #[must_use]
    /// The tracker classifies against the lenient boundary at the current
    /// distance; the last reported distance may be stale between crossings.
    pub fn is_effectively_at_bottom(&self) -> bool {
        self.at_bottom.is_at_bottom || self.within_lenient
    }

    /// Consume a tracker update. Returns `true` when the viewport just
    /// returned to the bottom and cleared unread messages.
    pub fn on_tracker_update(&mut self, update: TrackerUpdate) -> bool {
        let was_at_bottom = self.is_effectively_at_bottom();
        self.at_bottom = update.at_bottom;
        self.within_lenient = update.within_lenient;
        self.is_dragging = update.is_dragging;
        if !was_at_bottom && self.is_effectively_at_bottom() {
            return self.clear_unread("organic");
        }
        false
    }

    /// Record the keyboard state. Classification waits for the tracker update
    /// that follows every keyboard event.
    pub fn set_keyboard(&mut self, keyboard: KeyboardSnapshot) {
        self.keyboard = keyboard;
    }

    pub fn on_message_count(&mut self, count: usize) -> AutoscrollDecision {
        if !self.has_baseline {
            self.has_baseline = true;
            self.state.last_known_message_count = count;
            tracing::debug!(count, "message count baseline");
            return AutoscrollDecision::None;
        }

        let previous = self.state.last_known_message_count;
        self.state.last_known_message_count = count;
        if count <= previous {
            if count < previous && self.state.unread_count > count {
                self.state.unread_count = count;
                self.state.show_return_pill = count > 0;
            }
            return AutoscrollDecision::None;
        }

        let added = count - previous;
        if self.is_effectively_at_bottom() && !self.is_dragging {
            tracing::debug!(added, "at bottom, autoscrolling");
            self.clear_unread("autoscroll");
            return AutoscrollDecision::ScrollToBottom { animated: true };
        }

        self.state.unread_count += added;
        self.state.show_return_pill = true;
        tracing::debug!(
            added,
            unread = self.state.unread_count,
            dragging = self.is_dragging,
            distance = self.at_bottom.distance_from_bottom,
            threshold = self.effective_threshold(),
            "reader is in scrollback, counting unread"
        );
        AutoscrollDecision::Unread { added }
    }

    /// Explicit return-to-bottom (pill press). Always clears unread.
    pub fn return_to_bottom(&mut self) {
        self.clear_unread("pill");
    }

    fn clear_unread(&mut self, source: &'static str) -> bool {
        let had_unread = self.state.unread_count > 0 || self.state.show_return_pill;
        self.state.unread_count = 0;
        self.state.show_return_pill = false;
        if had_unread {
            tracing::debug!(source, "returned to bottom, unread cleared");
        }
        had_unread
    }
}
