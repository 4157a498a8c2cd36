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

//! Engine configuration: thresholds, timings and the keyboard leniency function.
//!
//! Every field has a default, so an empty JSON object `{}` is a valid config.

use crate::error::FeedError;
use crate::feed::KeyboardSnapshot;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_AT_BOTTOM_THRESHOLD: f32 = 200.0;
pub const DEFAULT_ACTIVATION_OFFSET_X: f32 = 10.0;
pub const DEFAULT_FAIL_OFFSET_Y: f32 = 15.0;
pub const DEFAULT_TRIGGER_THRESHOLD: f32 = 60.0;
pub const DEFAULT_MAX_TRANSLATION: f32 = 80.0;
pub const DEFAULT_SCROLL_RETRY_DELAY_MS: u64 = 100;
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

/// Which end of the scroll range holds the newest message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListOrientation {
    /// Index 0 at the visual bottom; offset 0 is the bottom.
    #[default]
    Inverted,
    /// Oldest message first; the bottom is the end of the scroll range.
    Normal,
}

/// Extra at-bottom distance granted while the keyboard is open.
///
/// The composer and keyboard cover the lower part of the viewport, so a user
/// who is "visually" at the bottom can be a few hundred pixels away in list
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeyboardLeniency {
    None,
    Fixed { extra: f32 },
    KeyboardHeight { scale: f32 },
}

impl Default for KeyboardLeniency {
    fn default() -> Self {
        Self::KeyboardHeight { scale: 1.0 }
    }
}

impl KeyboardLeniency {
    /// Additional threshold distance for the given keyboard snapshot.
    /// Always 0 while the keyboard is closed.
    #[must_use]
    pub fn extra(self, keyboard: KeyboardSnapshot) -> f32 {
        if !keyboard.is_open {
            return 0.0;
        }
        let extra = match self {
            Self::None => 0.0,
            Self::Fixed { extra } => extra,
            Self::KeyboardHeight { scale } => keyboard.height * scale,
        };
        if extra.is_finite() { extra.max(0.0) } else { 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeConfig {
    /// Horizontal distance (rightward) before the gesture activates.
    pub activation_offset_x: f32,
    /// Vertical distance that fails the gesture if reached before activation.
    pub fail_offset_y: f32,
    /// Translation at which the reply fires.
    pub trigger_threshold: f32,
    /// Upper clamp for the displayed translation.
    pub max_translation: f32,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            activation_offset_x: DEFAULT_ACTIVATION_OFFSET_X,
            fail_offset_y: DEFAULT_FAIL_OFFSET_Y,
            trigger_threshold: DEFAULT_TRIGGER_THRESHOLD,
            max_translation: DEFAULT_MAX_TRANSLATION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    /// Displacement below which the spring may come to rest.
    pub rest_displacement: f32,
    /// Speed (px/s) below which the spring may come to rest.
    pub rest_velocity: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 300.0,
            damping: 28.0,
            mass: 1.0,
            rest_displacement: 0.5,
            rest_velocity: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InsetConfig {
    /// Height of the composer bar sitting above the keyboard.
    pub composer_height: f32,
    /// Bottom safe-area inset (home indicator) used while the keyboard is closed.
    pub bottom_safe_area: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub at_bottom_threshold: f32,
    pub scroll_retry_delay_ms: u64,
    pub frame_interval_ms: u64,
    pub orientation: ListOrientation,
    pub keyboard_leniency: KeyboardLeniency,
    pub swipe: SwipeConfig,
    pub spring: SpringConfig,
    pub inset: InsetConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            at_bottom_threshold: DEFAULT_AT_BOTTOM_THRESHOLD,
            scroll_retry_delay_ms: DEFAULT_SCROLL_RETRY_DELAY_MS,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            orientation: ListOrientation::default(),
            keyboard_leniency: KeyboardLeniency::default(),
            swipe: SwipeConfig::default(),
            spring: SpringConfig::default(),
            inset: InsetConfig::default(),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn scroll_retry_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_retry_delay_ms)
    }

    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn validate(&self) -> Result<(), FeedError> {
        let distances = [
            ("at_bottom_threshold", self.at_bottom_threshold),
            ("swipe.activation_offset_x", self.swipe.activation_offset_x),
            ("swipe.fail_offset_y", self.swipe.fail_offset_y),
            ("swipe.trigger_threshold", self.swipe.trigger_threshold),
            ("swipe.max_translation", self.swipe.max_translation),
            ("inset.composer_height", self.inset.composer_height),
            ("inset.bottom_safe_area", self.inset.bottom_safe_area),
            ("spring.rest_displacement", self.spring.rest_displacement),
            ("spring.rest_velocity", self.spring.rest_velocity),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(FeedError::InvalidConfig(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        for (name, value) in [
            ("spring.stiffness", self.spring.stiffness),
            ("spring.damping", self.spring.damping),
            ("spring.mass", self.spring.mass),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(FeedError::InvalidConfig(format!(
                    "{name} must be a finite positive number, got {value}"
                )));
            }
        }
        if self.swipe.trigger_threshold > self.swipe.max_translation {
            return Err(FeedError::InvalidConfig(format!(
                "swipe.trigger_threshold ({}) exceeds swipe.max_translation ({})",
                self.swipe.trigger_threshold, self.swipe.max_translation
            )));
        }
        if self.swipe.activation_offset_x >= self.swipe.trigger_threshold {
            return Err(FeedError::InvalidConfig(format!(
                "swipe.activation_offset_x ({}) must be below swipe.trigger_threshold ({})",
                self.swipe.activation_offset_x, self.swipe.trigger_threshold
            )));
        }
        if self.frame_interval_ms == 0 {
            return Err(FeedError::InvalidConfig("frame_interval_ms must be at least 1".to_owned()));
        }
        match self.keyboard_leniency {
            KeyboardLeniency::Fixed { extra: value }
            | KeyboardLeniency::KeyboardHeight { scale: value }
                if !value.is_finite() || value < 0.0 =>
            {
                Err(FeedError::InvalidConfig(format!(
                    "keyboard_leniency must be finite and non-negative, got {value}"
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Read and validate a JSON engine config.
pub fn load_config(path: &Path) -> Result<EngineConfig, FeedError> {
    let raw = std::fs::read_to_string(path).map_err(|e| FeedError::ConfigUnreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let config: EngineConfig =
        serde_json::from_str(&raw).map_err(|e| FeedError::InvalidConfig(e.to_string()))?;
    config.validate()?;
    tracing::debug!(path = %path.display(), ?config, "loaded engine config");
    Ok(config)
}
