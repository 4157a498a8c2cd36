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

//! Frame-budget profiler for the frame context.
//!
//! Gated behind `--features perf`. When the feature is disabled every type is
//! zero-size and every call is a no-op the compiler removes.
//!
//! ```bash
//! cargo run --features perf -- scenario.json --perf-log frames.log
//! # {"run":"...","frame":12,"fn":"frame::tick","ms":0.041}
//! # {"run":"...","frame":12,"event":"frame_end","dt_ms":16.7,"budget_ms":16.0,"over_budget":true}
//! ```

#[cfg(feature = "perf")]
mod enabled {
    use std::cell::RefCell;
    use std::fs::{File, OpenOptions};
    use std::io::{BufWriter, Write};
    use std::path::Path;
    use std::time::{Duration, Instant};

    // Thread-local sink so timers can log on drop without a logger handle.
    thread_local! {
        pub(crate) static LOG_FILE: RefCell<Option<BufWriter<File>>> = const { RefCell::new(None) };
        static FRAME: RefCell<u64> = const { RefCell::new(0) };
        static RUN_ID: RefCell<String> = const { RefCell::new(String::new()) };
    }

    pub struct PerfLogger {
        _private: (),
    }

    fn write_line(body: &str) {
        let frame = FRAME.with(|c| *c.borrow());
        LOG_FILE.with(|f| {
            if let Some(ref mut file) = *f.borrow_mut() {
                RUN_ID.with(|run| {
                    let _ = writeln!(file, r#"{{"run":"{}","frame":{frame},{body}}}"#, run.borrow());
                });
            }
        });
    }

    pub(crate) fn write_timing(name: &'static str, ms: f64) {
        write_line(&format!(r#""fn":"{name}","ms":{ms:.3}"#));
    }

    pub(crate) fn write_frame_end(dt: Duration, budget: Duration) {
        let frame = FRAME.with(|c| {
            let mut value = c.borrow_mut();
            *value += 1;
            *value
        });
        let dt_ms = dt.as_secs_f64() * 1000.0;
        let budget_ms = budget.as_secs_f64() * 1000.0;
        // A frame counts as late once it slips past 1.5x the interval.
        let over_budget = dt_ms > budget_ms * 1.5;
        write_line(&format!(
            r#""event":"frame_end","dt_ms":{dt_ms:.3},"budget_ms":{budget_ms:.3},"over_budget":{over_budget}"#
        ));
        if frame % 240 == 0 {
            LOG_FILE.with(|f| {
                if let Some(ref mut file) = *f.borrow_mut() {
                    let _ = file.flush();
                }
            });
        }
    }

    impl PerfLogger {
        /// Open (or create) the log file. Returns `None` on I/O error.
        pub fn open(path: &Path, append: bool) -> Option<Self> {
            let mut options = OpenOptions::new();
            options.create(true).write(true);
            if append {
                options.append(true);
            } else {
                options.truncate(true);
            }
            let file = options.open(path).ok()?;
            let mut writer = BufWriter::new(file);
            let run_id = uuid::Uuid::new_v4().to_string();
            let _ = writeln!(
                writer,
                r#"{{"event":"run_start","run":"{run_id}","pid":{},"version":"{}"}}"#,
                std::process::id(),
                env!("CARGO_PKG_VERSION")
            );
            let _ = writer.flush();
            LOG_FILE.with(|f| *f.borrow_mut() = Some(writer));
            RUN_ID.with(|r| *r.borrow_mut() = run_id);
            FRAME.with(|c| *c.borrow_mut() = 0);
            Some(Self { _private: () })
        }
    }

    impl Drop for PerfLogger {
        fn drop(&mut self) {
            LOG_FILE.with(|f| {
                if let Some(mut file) = f.borrow_mut().take() {
                    let _ = file.flush();
                }
            });
        }
    }

    pub struct Timer {
        pub(crate) name: &'static str,
        pub(crate) start: Instant,
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            write_timing(self.name, self.start.elapsed().as_secs_f64() * 1000.0);
        }
    }
}

#[cfg(not(feature = "perf"))]
mod disabled {
    use std::path::Path;

    pub struct PerfLogger;
    pub struct Timer;

    impl PerfLogger {
        #[inline]
        pub fn open(_path: &Path, _append: bool) -> Option<Self> {
            None
        }
    }
}

/// Start a named timer that logs its duration on drop. `None` (a no-op) when
/// the feature is off or no logger is open on this thread.
#[cfg(feature = "perf")]
#[must_use]
#[inline]
pub fn start(name: &'static str) -> Option<Timer> {
    enabled::LOG_FILE.with(|f| {
        f.borrow().is_some().then(|| Timer { name, start: std::time::Instant::now() })
    })
}

#[cfg(not(feature = "perf"))]
#[must_use]
#[inline]
pub fn start(_name: &'static str) -> Option<Timer> {
    None
}

/// Close the current frame: logs the elapsed frame time against the budget.
#[cfg(feature = "perf")]
#[inline]
pub fn frame_end(dt: std::time::Duration, budget: std::time::Duration) {
    enabled::write_frame_end(dt, budget);
}

#[cfg(not(feature = "perf"))]
#[inline]
pub fn frame_end(_dt: std::time::Duration, _budget: std::time::Duration) {}

#[cfg(feature = "perf")]
pub use enabled::{PerfLogger, Timer};

#[cfg(not(feature = "perf"))]
pub use disabled::{PerfLogger, Timer};
