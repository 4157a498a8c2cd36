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

//! Damped spring toward 0 for swipe spring-back.
//!
//! Frame-rate independent: each tick integrates the elapsed time in small
//! fixed substeps, and the elapsed time itself is clamped so a stalled frame
//! does not fling the value.

use crate::config::SpringConfig;
use std::time::Duration;

/// Largest frame delta integrated in one tick.
const MAX_FRAME_DT: f32 = 0.064;

/// Integration substep (4ms keeps a stiff spring stable).
const SUBSTEP: f32 = 0.004;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    config: SpringConfig,
    position: f32,
    velocity: f32,
}

impl Spring {
    #[must_use]
    pub fn new(config: SpringConfig) -> Self {
        Self { config, position: 0.0, velocity: 0.0 }
    }

    /// Start from `position` at rest and head back to 0.
    pub fn release_from(&mut self, position: f32) {
        self.position = position;
        self.velocity = 0.0;
    }

    pub fn stop(&mut self) {
        self.position = 0.0;
        self.velocity = 0.0;
    }

    #[must_use]
    pub fn position(&self) -> f32 {
        self.position
    }

    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.position.abs() <= self.config.rest_displacement
            && self.velocity.abs() <= self.config.rest_velocity
    }

    /// Advance by `dt`. Returns `true` while still moving. Overshoot past 0 is
    /// clamped, so the value never crosses to the other side.
    pub fn step(&mut self, dt: Duration) -> bool {
        if self.is_at_rest() {
            self.stop();
            return false;
        }
        let mut remaining = dt.as_secs_f32().min(MAX_FRAME_DT);
        let positive = self.position > 0.0;
        while remaining > 0.0 {
            let h = remaining.min(SUBSTEP);
            let force = -self.config.stiffness * self.position - self.config.damping * self.velocity;
            self.velocity += force / self.config.mass * h;
            self.position += self.velocity * h;
            remaining -= h;
            if (self.position > 0.0) != positive {
                self.stop();
                return false;
            }
        }
        if self.is_at_rest() {
            self.stop();
            return false;
        }
        true
    }
}
