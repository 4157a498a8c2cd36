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

//! Keyboard-synchronized bottom inset for the message list.
//!
//! In animated mode the inset lives in a lock-free [`SharedInset`] written
//! from the frame context on every keyboard frame; the layout reads it
//! directly. Without an animation channel the animator falls back to one
//! static value that only moves on discrete keyboard show/hide events.

use crate::config::InsetConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Discrete keyboard notifications (coarse, logic-rate).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeyboardEvent {
    Show { height: f32 },
    Resize { height: f32 },
    Hide,
}

/// Coarse keyboard state as seen by the logic context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KeyboardSnapshot {
    pub is_open: bool,
    pub height: f32,
}

/// A single `f32` readable from any thread without locking.
///
/// The frame context is its only writer.
#[derive(Debug, Clone, Default)]
pub struct SharedInset(Arc<AtomicU32>);

impl SharedInset {
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self(Arc::new(AtomicU32::new(value.to_bits())))
    }

    #[must_use]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Acquire))
    }

    fn set(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsetMode {
    Animated,
    Static,
}

pub struct ViewportInsetAnimator {
    config: InsetConfig,
    animated: Option<SharedInset>,
    static_inset: f32,
    snapshot: KeyboardSnapshot,
    live_keyboard_height: f32,
}

impl ViewportInsetAnimator {
    /// `animated` is the frame-rate channel, if the host provides one.
    #[must_use]
    pub fn new(config: InsetConfig, animated: Option<SharedInset>) -> Self {
        let mut animator = Self {
            config,
            animated,
            static_inset: 0.0,
            snapshot: KeyboardSnapshot::default(),
            live_keyboard_height: 0.0,
        };
        animator.static_inset = animator.inset_for(0.0);
        if let Some(shared) = &animator.animated {
            shared.set(animator.static_inset);
        }
        animator
    }

    #[must_use]
    pub fn mode(&self) -> InsetMode {
        if self.animated.is_some() { InsetMode::Animated } else { InsetMode::Static }
    }

    /// The inset the list should currently apply.
    #[must_use]
    pub fn current_inset(&self) -> f32 {
        match &self.animated {
            Some(shared) => shared.get(),
            None => self.static_inset,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> KeyboardSnapshot {
        self.snapshot
    }

    /// Per-frame keyboard height from the animation driver. Ignored in static
    /// mode, where only discrete events move the inset.
    pub fn on_keyboard_frame(&mut self, height: f32) {
        let Some(shared) = &self.animated else {
            return;
        };
        self.live_keyboard_height = sanitize(height);
        let inset = self.inset_for(self.live_keyboard_height);
        shared.set(inset);
    }

    /// Discrete keyboard event. Returns the new logic-context snapshot when it
    /// changed.
    pub fn on_keyboard_event(&mut self, event: KeyboardEvent) -> Option<KeyboardSnapshot> {
        let snapshot = match event {
            KeyboardEvent::Show { height } | KeyboardEvent::Resize { height } => {
                KeyboardSnapshot { is_open: true, height: sanitize(height) }
            }
            KeyboardEvent::Hide => KeyboardSnapshot { is_open: false, height: 0.0 },
        };
        self.static_inset = self.inset_for(snapshot.height);
        if snapshot == self.snapshot {
            return None;
        }
        tracing::debug!(open = snapshot.is_open, height = snapshot.height, "keyboard snapshot");
        self.snapshot = snapshot;
        Some(snapshot)
    }

    /// Composer height changed (multi-line input growing or shrinking).
    pub fn set_composer_height(&mut self, height: f32) {
        self.config.composer_height = sanitize(height);
        self.static_inset = self.inset_for(self.snapshot.height);
        if let Some(shared) = &self.animated {
            shared.set(self.inset_for(self.live_keyboard_height));
        }
    }

    fn inset_for(&self, keyboard_height: f32) -> f32 {
        self.config.composer_height + keyboard_height.max(self.config.bottom_safe_area)
    }
}

fn sanitize(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
