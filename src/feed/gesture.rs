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

//! Swipe-to-reply recognizer for a single message item.
//!
//! Recognition is a race between horizontal activation and vertical failure,
//! decided on the first sample that passes either offset. Once active the
//! gesture is locked: it keeps tracking through pointer exits and vertical
//! drift until the pointer lifts or the system cancels it.

use super::spring::Spring;
use crate::config::{SpringConfig, SwipeConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    /// Pointer left the item's bounds.
    Exit,
    Up,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipePhase {
    #[default]
    Idle,
    Tracking,
    Triggered,
    Resetting,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SwipeGestureState {
    pub translation_x: f32,
    pub phase: SwipePhase,
    pub has_fired_in_this_gesture: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recognition {
    Undetermined,
    Active,
    Failed,
}

/// What a pointer event did to the gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// No recognizer attached (disabled item) or event irrelevant.
    PassThrough,
    /// Waiting for the activation/fail race to resolve.
    Pending,
    Failed,
    Activated,
    Moved,
    Triggered,
    Released { fired: bool },
}

pub struct SwipeGestureEngine<M> {
    message: Arc<M>,
    config: SwipeConfig,
    state: SwipeGestureState,
    recognition: Recognition,
    origin: Option<(f32, f32)>,
    spring: Spring,
}

impl<M> SwipeGestureEngine<M> {
    #[must_use]
    pub fn new(message: Arc<M>, config: SwipeConfig, spring: SpringConfig) -> Self {
        Self {
            message,
            config,
            state: SwipeGestureState::default(),
            recognition: Recognition::Undetermined,
            origin: None,
            spring: Spring::new(spring),
        }
    }

    #[must_use]
    pub fn state(&self) -> SwipeGestureState {
        self.state
    }

    #[must_use]
    pub fn message(&self) -> &Arc<M> {
        &self.message
    }

    /// Reply affordance progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.config.trigger_threshold <= 0.0 {
            return 1.0;
        }
        (self.state.translation_x / self.config.trigger_threshold).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.state.phase == SwipePhase::Resetting
    }

    /// Feed one pointer event. `on_trigger` runs synchronously, at most once
    /// per gesture, the moment the trigger threshold is first reached.
    pub fn on_pointer(&mut self, event: PointerEvent, on_trigger: impl FnOnce(&M)) -> SwipeOutcome {
        match event {
            PointerEvent::Down { x, y } => {
                self.begin(x, y);
                SwipeOutcome::Pending
            }
            PointerEvent::Move { x, y } => {
                let Some((ox, oy)) = self.origin else {
                    // Lost the down event; start the gesture here.
                    self.begin(x, y);
                    return SwipeOutcome::Pending;
                };
                self.on_move(x - ox, y - oy, on_trigger)
            }
            PointerEvent::Exit => match self.recognition {
                Recognition::Active => SwipeOutcome::Moved,
                Recognition::Undetermined if self.origin.is_some() => SwipeOutcome::Pending,
                _ => SwipeOutcome::PassThrough,
            },
            PointerEvent::Up | PointerEvent::Cancel => self.release(),
        }
    }

    /// Advance the spring-back by one frame. Returns `true` while animating.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if self.state.phase != SwipePhase::Resetting {
            return false;
        }
        let moving = self.spring.step(dt);
        self.state.translation_x = self.spring.position();
        if !moving {
            self.state.translation_x = 0.0;
            self.state.phase = SwipePhase::Idle;
        }
        moving
    }

    fn begin(&mut self, x: f32, y: f32) {
        // A new gesture supersedes any spring-back still in flight.
        self.spring.stop();
        self.state = SwipeGestureState::default();
        self.recognition = Recognition::Undetermined;
        self.origin = Some((x, y));
    }

    fn on_move(&mut self, dx: f32, dy: f32, on_trigger: impl FnOnce(&M)) -> SwipeOutcome {
        if !dx.is_finite() || !dy.is_finite() {
            return SwipeOutcome::PassThrough;
        }
        match self.recognition {
            Recognition::Failed => SwipeOutcome::PassThrough,
            Recognition::Undetermined => {
                if dy.abs() > self.config.fail_offset_y {
                    self.recognition = Recognition::Failed;
                    tracing::trace!(dx, dy, "swipe failed: vertical movement first");
                    return SwipeOutcome::Failed;
                }
                if dx <= self.config.activation_offset_x {
                    return SwipeOutcome::Pending;
                }
                self.recognition = Recognition::Active;
                self.state.phase = SwipePhase::Tracking;
                tracing::trace!(dx, dy, "swipe activated");
                match self.track(dx, on_trigger) {
                    SwipeOutcome::Triggered => SwipeOutcome::Triggered,
                    _ => SwipeOutcome::Activated,
                }
            }
            Recognition::Active => self.track(dx, on_trigger),
        }
    }

    fn track(&mut self, dx: f32, on_trigger: impl FnOnce(&M)) -> SwipeOutcome {
        self.state.translation_x = dx.clamp(0.0, self.config.max_translation);
        if self.state.translation_x >= self.config.trigger_threshold
            && !self.state.has_fired_in_this_gesture
        {
            self.state.has_fired_in_this_gesture = true;
            self.state.phase = SwipePhase::Triggered;
            tracing::debug!(translation = self.state.translation_x, "swipe reply triggered");
            on_trigger(&self.message);
            return SwipeOutcome::Triggered;
        }
        SwipeOutcome::Moved
    }

    fn release(&mut self) -> SwipeOutcome {
        let was_active = self.recognition == Recognition::Active;
        let had_origin = self.origin.is_some();
        let fired = self.state.has_fired_in_this_gesture;
        self.origin = None;
        self.recognition = Recognition::Undetermined;
        self.state.has_fired_in_this_gesture = false;

        if was_active && self.state.translation_x > 0.0 {
            self.spring.release_from(self.state.translation_x);
            self.state.phase = SwipePhase::Resetting;
        } else {
            self.spring.stop();
            self.state.translation_x = 0.0;
            self.state.phase = SwipePhase::Idle;
        }
        if !had_origin {
            return SwipeOutcome::PassThrough;
        }
        SwipeOutcome::Released { fired }
    }
}
