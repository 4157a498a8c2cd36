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

use super::gesture::{PointerEvent, SwipeGestureEngine, SwipeGestureState, SwipeOutcome};
use crate::config::{SpringConfig, SwipeConfig};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

/// Per-item swipe recognizers keyed by stable item identity.
///
/// Records live exactly as long as the item is mounted. Items mounted with
/// swipe disabled get no record at all, so their pointer events pass
/// through untouched.
pub struct GestureArena<K, M> {
    engines: HashMap<K, SwipeGestureEngine<M>>,
    swipe: SwipeConfig,
    spring: SpringConfig,
}

impl<K, M> GestureArena<K, M>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    #[must_use]
    pub fn new(swipe: SwipeConfig, spring: SpringConfig) -> Self {
        Self { engines: HashMap::new(), swipe, spring }
    }

    pub fn mount(&mut self, key: K, message: Arc<M>, swipe_enabled: bool) {
        if !swipe_enabled {
            // Remounting as disabled must drop any previous recognizer.
            if self.engines.remove(&key).is_some() {
                tracing::trace!(?key, "swipe disabled on remount");
            }
            return;
        }
        self.engines.insert(key, SwipeGestureEngine::new(message, self.swipe, self.spring));
    }

    pub fn unmount(&mut self, key: &K) {
        self.engines.remove(key);
    }

    #[must_use]
    pub fn is_attached(&self, key: &K) -> bool {
        self.engines.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    #[must_use]
    pub fn state(&self, key: &K) -> Option<SwipeGestureState> {
        self.engines.get(key).map(SwipeGestureEngine::state)
    }

    #[must_use]
    pub fn progress(&self, key: &K) -> Option<f32> {
        self.engines.get(key).map(SwipeGestureEngine::progress)
    }

    pub fn on_pointer(
        &mut self,
        key: &K,
        event: PointerEvent,
        on_trigger: impl FnOnce(&M),
    ) -> SwipeOutcome {
        match self.engines.get_mut(key) {
            Some(engine) => engine.on_pointer(event, on_trigger),
            None => SwipeOutcome::PassThrough,
        }
    }

    /// Advance every spring-back in flight. Returns how many are still moving.
    pub fn tick(&mut self, dt: Duration) -> usize {
        self.engines.values_mut().map(|engine| engine.tick(dt)).filter(|moving| *moving).count()
    }
}
