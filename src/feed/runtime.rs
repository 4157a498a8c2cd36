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

//! Async drivers for the two execution contexts.
//!
//! The frame loop wakes on presentation input or the next frame tick, drains
//! everything queued without blocking, then advances animations once. The
//! logic loop waits on the bridge, presentation input and the retry timer.
//! Both stop when the mount's cancellation token fires.

use super::bridge::LogicTask;
use super::frame::FrameContext;
use super::gesture::PointerEvent;
use super::inset::KeyboardEvent;
use super::list::VirtualizedList;
use super::logic::LogicContext;
use super::scroll::ScrollEvent;
use crate::perf;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Input for the frame context, from the host view layer.
#[derive(Debug)]
pub enum FrameInput<K, M> {
    Scroll(ScrollEvent),
    Layout { viewport_height: f32, content_height: f32 },
    KeyboardFrame(f32),
    Keyboard(KeyboardEvent),
    ComposerHeight(f32),
    Mount { key: K, message: Arc<M>, swipe_enabled: bool },
    Unmount(K),
    Pointer { key: K, event: PointerEvent },
}

/// Input for the logic context, from the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicInput {
    MessageCount(usize),
    ReturnPillPressed,
    ScrollToIndex { index: usize, animated: bool },
}

pub async fn run_frame_loop<K, M, R>(
    frame: &mut FrameContext<K, M, R>,
    input: &mut mpsc::UnboundedReceiver<FrameInput<K, M>>,
    frame_interval: Duration,
    cancel: CancellationToken,
) where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    let mut last_frame = Instant::now();
    let mut input_open = true;

    loop {
        // Phase 1: wait for input or the next frame boundary
        let time_to_next = frame_interval.saturating_sub(last_frame.elapsed());
        tokio::select! {
            () = cancel.cancelled() => break,
            received = input.recv(), if input_open => match received {
                Some(event) => apply_frame_input(frame, event),
                None => input_open = false,
            },
            () = tokio::time::sleep(time_to_next) => {}
        }

        // Phase 2: drain everything already queued
        while let Ok(event) = input.try_recv() {
            apply_frame_input(frame, event);
        }

        // Phase 3: advance animations at most once per frame interval
        let now = Instant::now();
        let dt = now.duration_since(last_frame);
        if dt >= frame_interval {
            let _timer = perf::start("frame::tick");
            let animating = frame.tick(dt);
            perf::frame_end(dt, frame_interval);
            tracing::trace!(animating, dt_ms = dt.as_secs_f32() * 1000.0, "frame tick");
            last_frame = now;
        }
    }
    tracing::debug!("frame loop stopped");
}

fn apply_frame_input<K, M, R>(frame: &mut FrameContext<K, M, R>, event: FrameInput<K, M>)
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    match event {
        FrameInput::Scroll(event) => frame.on_scroll(event),
        FrameInput::Layout { viewport_height, content_height } => {
            frame.on_layout(viewport_height, content_height);
        }
        FrameInput::KeyboardFrame(height) => frame.on_keyboard_frame(height),
        FrameInput::Keyboard(event) => frame.on_keyboard_event(event),
        FrameInput::ComposerHeight(height) => frame.set_composer_height(height),
        FrameInput::Mount { key, message, swipe_enabled } => {
            frame.mount_item(key, message, swipe_enabled);
        }
        FrameInput::Unmount(key) => frame.unmount_item(&key),
        FrameInput::Pointer { key, event } => {
            frame.on_pointer(&key, event);
        }
    }
}

pub async fn run_logic_loop<L, R>(
    logic: &mut LogicContext<L, R>,
    bridge: &mut mpsc::UnboundedReceiver<LogicTask<R>>,
    input: &mut mpsc::UnboundedReceiver<LogicInput>,
    cancel: CancellationToken,
) where
    L: VirtualizedList,
{
    let mut bridge_open = true;
    let mut input_open = true;

    loop {
        let deadline = logic.next_deadline();
        if !bridge_open && !input_open && deadline.is_none() {
            break;
        }
        tokio::select! {
            () = cancel.cancelled() => break,
            task = bridge.recv(), if bridge_open => match task {
                Some(task) => logic.handle(task),
                None => bridge_open = false,
            },
            event = input.recv(), if input_open => match event {
                Some(event) => apply_logic_input(logic, event),
                None => input_open = false,
            },
            () = sleep_until_deadline(deadline), if deadline.is_some() => {
                logic.poll_retry(Instant::now());
            }
        }
    }
    if let Some(retry) = logic.pending_retry() {
        tracing::debug!(index = retry.index, "dropping pending scroll retry on unmount");
    }
    tracing::debug!("logic loop stopped");
}

fn apply_logic_input<L, R>(logic: &mut LogicContext<L, R>, event: LogicInput)
where
    L: VirtualizedList,
{
    match event {
        LogicInput::MessageCount(count) => logic.on_message_count(count),
        LogicInput::ReturnPillPressed => logic.press_return_pill(),
        LogicInput::ScrollToIndex { index, animated } => logic.scroll_to_index(index, animated),
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
