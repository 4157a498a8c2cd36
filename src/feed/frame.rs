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

//! The frame-rate side of the engine.
//!
//! Everything here runs in bounded time per call: no I/O, no awaiting. State
//! the logic context cares about leaves through the [`LogicBridge`] only.

use super::arena::GestureArena;
use super::bridge::{LogicBridge, LogicTask};
use super::gesture::{PointerEvent, SwipeGestureState, SwipeOutcome};
use super::inset::{KeyboardEvent, SharedInset, ViewportInsetAnimator};
use super::scroll::{AtBottomState, ScrollEvent, ScrollTracker};
use crate::config::{EngineConfig, KeyboardLeniency};
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

/// Builds the reply descriptor for a message at trigger time.
pub type ReplyAdapter<M, R> = Arc<dyn Fn(&M) -> R + Send + Sync>;

pub struct FrameContext<K, M, R> {
    tracker: ScrollTracker,
    inset: ViewportInsetAnimator,
    gestures: GestureArena<K, M>,
    leniency: KeyboardLeniency,
    adapter: ReplyAdapter<M, R>,
    bridge: LogicBridge<R>,
}

impl<K, M, R> FrameContext<K, M, R>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    /// `animated_inset` selects animated inset mode when present.
    #[must_use]
    pub fn new(
        config: &EngineConfig,
        adapter: ReplyAdapter<M, R>,
        bridge: LogicBridge<R>,
        animated_inset: Option<SharedInset>,
    ) -> Self {
        Self {
            tracker: ScrollTracker::new(config.orientation, config.at_bottom_threshold),
            inset: ViewportInsetAnimator::new(config.inset, animated_inset),
            gestures: GestureArena::new(config.swipe, config.spring),
            leniency: config.keyboard_leniency,
            adapter,
            bridge,
        }
    }

    #[must_use]
    pub fn at_bottom(&self) -> AtBottomState {
        self.tracker.state()
    }

    #[must_use]
    pub fn tracker(&self) -> &ScrollTracker {
        &self.tracker
    }

    #[must_use]
    pub fn current_inset(&self) -> f32 {
        self.inset.current_inset()
    }

    #[must_use]
    pub fn inset(&self) -> &ViewportInsetAnimator {
        &self.inset
    }

    #[must_use]
    pub fn swipe_state(&self, key: &K) -> Option<SwipeGestureState> {
        self.gestures.state(key)
    }

    #[must_use]
    pub fn swipe_progress(&self, key: &K) -> Option<f32> {
        self.gestures.progress(key)
    }

    pub fn on_scroll(&mut self, event: ScrollEvent) {
        if let Some(update) = self.tracker.on_event(event) {
            self.bridge.run_on_logic(LogicTask::Tracker(update));
        }
    }

    pub fn on_layout(&mut self, viewport_height: f32, content_height: f32) {
        let before = self.tracker.metrics();
        let update = self.tracker.on_layout(viewport_height, content_height);
        let after = self.tracker.metrics();
        if (before.viewport_height.to_bits(), before.content_height.to_bits())
            != (after.viewport_height.to_bits(), after.content_height.to_bits())
        {
            self.bridge.run_on_logic(LogicTask::Layout {
                viewport_height: after.viewport_height,
                content_height: after.content_height,
            });
        }
        if let Some(update) = update {
            self.bridge.run_on_logic(LogicTask::Tracker(update));
        }
    }

    pub fn on_keyboard_frame(&mut self, height: f32) {
        self.inset.on_keyboard_frame(height);
    }

    pub fn on_keyboard_event(&mut self, event: KeyboardEvent) {
        let Some(snapshot) = self.inset.on_keyboard_event(event) else {
            return;
        };
        // The logic context reclassifies only on the tracker update that
        // follows, which carries the current distance even when no band moved.
        self.bridge.run_on_logic(LogicTask::Keyboard(snapshot));
        let _ = self.tracker.set_lenient_extra(self.leniency.extra(snapshot));
        self.bridge.run_on_logic(LogicTask::Tracker(self.tracker.update()));
    }

    pub fn set_composer_height(&mut self, height: f32) {
        self.inset.set_composer_height(height);
    }

    pub fn mount_item(&mut self, key: K, message: Arc<M>, swipe_enabled: bool) {
        self.gestures.mount(key, message, swipe_enabled);
    }

    pub fn unmount_item(&mut self, key: &K) {
        self.gestures.unmount(key);
    }

    pub fn on_pointer(&mut self, key: &K, event: PointerEvent) -> SwipeOutcome {
        let adapter = &self.adapter;
        let bridge = &self.bridge;
        self.gestures.on_pointer(key, event, |message| {
            bridge.run_on_logic(LogicTask::Reply(adapter(message)));
        })
    }

    /// Per-frame work. Returns the number of swipe springs still animating.
    pub fn tick(&mut self, dt: Duration) -> usize {
        self.gestures.tick(dt)
    }
}
