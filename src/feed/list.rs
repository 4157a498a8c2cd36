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

/// The host's virtualized list, as seen from the logic context.
///
/// Implementations forward to the real list view. `scroll_to_index` may miss
/// when the target row has not been measured yet; the caller recovers.
pub trait VirtualizedList {
    fn scroll_to_offset(&mut self, offset: f32, animated: bool);

    fn scroll_to_index(&mut self, index: usize, animated: bool) -> Result<(), LayoutMiss>;
}

/// Scroll-to-index target not measured yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("index {requested} not measured yet (highest measured: {highest_measured_index})")]
pub struct LayoutMiss {
    pub requested: usize,
    pub highest_measured_index: usize,
}

impl LayoutMiss {
    /// Best index known to be safe, never beyond the one originally requested.
    #[must_use]
    pub fn fallback_index(&self) -> usize {
        self.highest_measured_index.min(self.requested)
    }
}
