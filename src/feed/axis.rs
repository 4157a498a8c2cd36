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

use crate::config::ListOrientation;

/// Maps raw list scroll offsets to "distance from the visual bottom" and back.
///
/// Everything downstream of this adapter reasons in bottom-distance only, so
/// list inversion never leaks into the at-bottom or autoscroll logic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListAxis {
    orientation: ListOrientation,
    viewport_height: f32,
    content_height: f32,
}

impl ListAxis {
    #[must_use]
    pub fn new(orientation: ListOrientation) -> Self {
        Self { orientation, viewport_height: 0.0, content_height: 0.0 }
    }

    pub fn set_layout(&mut self, viewport_height: f32, content_height: f32) {
        self.viewport_height = sanitize(viewport_height);
        self.content_height = sanitize(content_height);
    }

    #[must_use]
    pub fn orientation(&self) -> ListOrientation {
        self.orientation
    }

    #[must_use]
    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    #[must_use]
    pub fn content_height(&self) -> f32 {
        self.content_height
    }

    /// Largest raw offset the list can scroll to.
    #[must_use]
    pub fn max_offset(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    /// Content shorter than the viewport cannot scroll. An unknown layout
    /// (both heights 0) is treated as scrollable so offsets are trusted.
    #[must_use]
    pub fn is_scrollable(&self) -> bool {
        if self.content_height == 0.0 && self.viewport_height == 0.0 {
            return true;
        }
        self.content_height > self.viewport_height
    }

    #[must_use]
    pub fn distance_from_bottom(&self, raw_offset: f32) -> f32 {
        if !self.is_scrollable() {
            return 0.0;
        }
        let distance = match self.orientation {
            ListOrientation::Inverted => raw_offset,
            ListOrientation::Normal => self.max_offset() - raw_offset,
        };
        distance.max(0.0)
    }

    /// Raw offset that places the viewport `distance` away from the bottom.
    #[must_use]
    pub fn offset_for_distance(&self, distance: f32) -> f32 {
        let distance = sanitize(distance);
        match self.orientation {
            ListOrientation::Inverted => distance,
            ListOrientation::Normal => (self.max_offset() - distance).max(0.0),
        }
    }

    #[must_use]
    pub fn bottom_offset(&self) -> f32 {
        self.offset_for_distance(0.0)
    }
}

fn sanitize(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
