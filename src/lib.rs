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

pub mod config;
pub mod error;
pub mod feed;
pub mod perf;
pub mod scenario;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "feedline", about = "Replay chat feed interaction scenarios")]
pub struct Cli {
    /// Scenario file (JSON) to replay
    pub scenario: PathBuf,

    /// Engine config file (JSON); defaults apply for missing keys
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Keep running this long after the last step so animations and retries settle
    #[arg(long, default_value_t = 500)]
    pub settle_ms: u64,

    /// Write tracing diagnostics to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Tracing filter directives (overrides RUST_LOG)
    #[arg(long)]
    pub log_filter: Option<String>,

    /// Append to the log file instead of truncating it
    #[arg(long)]
    pub log_append: bool,

    /// Write per-frame timings to this file (requires `--features perf`)
    #[arg(long)]
    pub perf_log: Option<PathBuf>,
}
