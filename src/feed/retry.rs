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

//! Single bounded retry for scroll-to-index misses.

use super::list::LayoutMiss;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRetry {
    pub requested: usize,
    pub index: usize,
    pub animated: bool,
    pub due: Instant,
}

/// Holds at most one pending retry. Scheduling or superseding replaces it,
/// dropping the owner cancels it.
#[derive(Debug)]
pub struct ScrollRetry {
    delay: Duration,
    pending: Option<PendingRetry>,
}

impl ScrollRetry {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    pub fn schedule(&mut self, miss: LayoutMiss, animated: bool, now: Instant) -> PendingRetry {
        let retry = PendingRetry {
            requested: miss.requested,
            index: miss.fallback_index(),
            animated,
            due: now + self.delay,
        };
        if let Some(previous) = self.pending.replace(retry) {
            tracing::debug!(index = previous.index, "replacing pending scroll retry");
        }
        retry
    }

    /// A new scroll request makes any pending retry obsolete.
    pub fn supersede(&mut self) {
        if let Some(previous) = self.pending.take() {
            tracing::debug!(index = previous.index, "pending scroll retry superseded");
        }
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|retry| retry.due)
    }

    #[must_use]
    pub fn pending(&self) -> Option<PendingRetry> {
        self.pending
    }

    pub fn take_due(&mut self, now: Instant) -> Option<PendingRetry> {
        match self.pending {
            Some(retry) if retry.due <= now => self.pending.take(),
            _ => None,
        }
    }
}
