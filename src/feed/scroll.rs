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

//! At-bottom tracking for the message list.
//!
//! A pure projection from scroll samples to [`AtBottomState`]. Every sample
//! carries an absolute offset, so dropped or coalesced samples never skew the
//! result: the same final offset always yields the same state.

use super::axis::ListAxis;
use crate::config::ListOrientation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollPhase {
    DragBegin,
    Scroll,
    DragEnd,
    MomentumBegin,
    MomentumEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollEvent {
    /// Absolute raw content offset (never a delta).
    pub offset: f32,
    #[serde(default)]
    pub velocity: f32,
    pub phase: ScrollPhase,
}

impl ScrollEvent {
    #[must_use]
    pub fn scroll(offset: f32) -> Self {
        Self { offset, velocity: 0.0, phase: ScrollPhase::Scroll }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub content_offset: f32,
    pub viewport_height: f32,
    pub content_height: f32,
    pub velocity: f32,
    pub is_dragging: bool,
    pub is_decelerating: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtBottomState {
    pub is_at_bottom: bool,
    pub distance_from_bottom: f32,
}

impl Default for AtBottomState {
    fn default() -> Self {
        Self { is_at_bottom: true, distance_from_bottom: 0.0 }
    }
}

/// What the tracker hands to the logic context when something relevant changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerUpdate {
    pub at_bottom: AtBottomState,
    pub is_dragging: bool,
    /// Inside threshold plus the current keyboard leniency, classified here
    /// against the current distance.
    pub within_lenient: bool,
}

/// Which side of each boundary the viewport sits on. Emission happens only
/// when this changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Band {
    within_threshold: bool,
    within_lenient: bool,
    is_dragging: bool,
}

pub struct ScrollTracker {
    axis: ListAxis,
    threshold: f32,
    /// Additional distance of the relaxed boundary, 0 when no leniency applies.
    lenient_extra: f32,
    metrics: ScrollMetrics,
    state: AtBottomState,
    band: Band,
}

impl ScrollTracker {
    #[must_use]
    pub fn new(orientation: ListOrientation, threshold: f32) -> Self {
        let state = AtBottomState::default();
        Self {
            axis: ListAxis::new(orientation),
            threshold,
            lenient_extra: 0.0,
            metrics: ScrollMetrics::default(),
            state,
            band: Band { within_threshold: true, within_lenient: true, is_dragging: false },
        }
    }

    #[must_use]
    pub fn state(&self) -> AtBottomState {
        self.state
    }

    #[must_use]
    pub fn metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    #[must_use]
    pub fn axis(&self) -> &ListAxis {
        &self.axis
    }

    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Current classification, whether or not a band changed.
    #[must_use]
    pub fn update(&self) -> TrackerUpdate {
        TrackerUpdate {
            at_bottom: self.state,
            is_dragging: self.band.is_dragging,
            within_lenient: self.band.within_lenient,
        }
    }

    pub fn on_event(&mut self, event: ScrollEvent) -> Option<TrackerUpdate> {
        if !event.offset.is_finite() {
            tracing::trace!(offset = event.offset, "dropping non-finite scroll sample");
            return None;
        }
        self.metrics.content_offset = event.offset;
        self.metrics.velocity = if event.velocity.is_finite() { event.velocity } else { 0.0 };
        match event.phase {
            ScrollPhase::DragBegin => {
                self.metrics.is_dragging = true;
                self.metrics.is_decelerating = false;
            }
            ScrollPhase::DragEnd => self.metrics.is_dragging = false,
            ScrollPhase::MomentumBegin => {
                self.metrics.is_dragging = false;
                self.metrics.is_decelerating = true;
            }
            ScrollPhase::MomentumEnd => self.metrics.is_decelerating = false,
            ScrollPhase::Scroll => {}
        }
        self.recompute()
    }

    pub fn on_layout(&mut self, viewport_height: f32, content_height: f32) -> Option<TrackerUpdate> {
        self.axis.set_layout(viewport_height, content_height);
        self.metrics.viewport_height = self.axis.viewport_height();
        self.metrics.content_height = self.axis.content_height();
        self.recompute()
    }

    /// Move the relaxed boundary (threshold + `extra`). Used while the keyboard
    /// is open so crossings of the lenient boundary are reported too.
    pub fn set_lenient_extra(&mut self, extra: f32) -> Option<TrackerUpdate> {
        self.lenient_extra = if extra.is_finite() { extra.max(0.0) } else { 0.0 };
        self.recompute()
    }

    fn recompute(&mut self) -> Option<TrackerUpdate> {
        let distance = self.axis.distance_from_bottom(self.metrics.content_offset);
        let scrollable = self.axis.is_scrollable();
        let within_threshold = !scrollable || distance <= self.threshold;
        self.state = AtBottomState { is_at_bottom: within_threshold, distance_from_bottom: distance };

        let band = Band {
            within_threshold,
            within_lenient: !scrollable || distance <= self.threshold + self.lenient_extra,
            is_dragging: self.metrics.is_dragging,
        };
        if band == self.band {
            return None;
        }
        self.band = band;
        tracing::trace!(
            distance,
            at_bottom = within_threshold,
            dragging = band.is_dragging,
            "at-bottom band changed"
        );
        Some(self.update())
    }
}
