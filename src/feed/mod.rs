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

//! Interaction engine for a live, bottom-anchored message feed.
//!
//! Work is split between two contexts. [`FrameContext`] owns everything that
//! must react within a display frame: scroll tracking, keyboard-synchronized
//! insets and swipe gestures. [`LogicContext`] owns decisions that touch
//! application state (autoscroll, the return pill, reply dispatch, scroll
//! recovery). The only path between them is the one-way [`LogicBridge`].

pub mod arena;
pub mod autoscroll;
pub mod axis;
pub mod bridge;
pub mod frame;
pub mod gesture;
pub mod inset;
pub mod list;
pub mod logic;
pub mod retry;
pub mod runtime;
pub mod scroll;
pub mod spring;

pub use arena::GestureArena;
pub use autoscroll::{AutoscrollDecision, AutoscrollEngine, AutoscrollState, ReturnPill};
pub use axis::ListAxis;
pub use bridge::{LogicBridge, LogicTask};
pub use frame::{FrameContext, ReplyAdapter};
pub use gesture::{PointerEvent, SwipeGestureEngine, SwipeGestureState, SwipeOutcome, SwipePhase};
pub use inset::{InsetMode, KeyboardEvent, KeyboardSnapshot, SharedInset, ViewportInsetAnimator};
pub use list::{LayoutMiss, VirtualizedList};
pub use logic::{FeedEvent, LogicContext};
pub use retry::{PendingRetry, ScrollRetry};
pub use runtime::{FrameInput, LogicInput, run_frame_loop, run_logic_loop};
pub use scroll::{AtBottomState, ScrollEvent, ScrollMetrics, ScrollPhase, ScrollTracker, TrackerUpdate};
pub use spring::Spring;
