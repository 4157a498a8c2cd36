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

use clap::Parser;
use feedline::Cli;
use feedline::config::{EngineConfig, load_config};
use feedline::error::FeedError;
use feedline::scenario::{load_scenario, replay};
use std::fs::OpenOptions;
use std::io::Write;
use std::time::Duration;

#[allow(clippy::exit)]
fn main() {
    if let Err(err) = run() {
        if let Some(feed_error) = extract_feed_error(&err) {
            eprintln!("{}", feed_error.user_message());
            std::process::exit(feed_error.exit_code());
        }
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    #[cfg(not(feature = "perf"))]
    if cli.perf_log.is_some() {
        return Err(anyhow::anyhow!("`--perf-log` requires a binary built with `--features perf`"));
    }
    let _perf = cli
        .perf_log
        .as_deref()
        .and_then(|path| feedline::perf::PerfLogger::open(path, cli.log_append));

    let config = match cli.config.as_deref() {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    let scenario = load_scenario(&cli.scenario)?;
    tracing::info!(
        scenario = %cli.scenario.display(),
        steps = scenario.steps.len(),
        "loaded scenario"
    );

    // Single-threaded so the perf sink (thread-local) sees the frame loop.
    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let transcript = rt.block_on(replay(scenario, config, Duration::from_millis(cli.settle_ms)))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for event in &transcript {
        serde_json::to_writer(&mut out, event)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn extract_feed_error(err: &anyhow::Error) -> Option<FeedError> {
    err.chain().find_map(|cause| cause.downcast_ref::<FeedError>().cloned())
}

fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let Some(path) = cli.log_file.as_ref() else {
        if std::env::var_os("RUST_LOG").is_some() {
            eprintln!(
                "RUST_LOG is set, but tracing is disabled without --log-file <PATH>. \
Use --log-file to enable diagnostics."
            );
        }
        return Ok(());
    };

    let directives = cli
        .log_filter
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_owned());
    let filter = tracing_subscriber::EnvFilter::try_new(directives.as_str())
        .map_err(|e| anyhow::anyhow!("invalid tracing filter `{directives}`: {e}"))?;

    let mut options = OpenOptions::new();
    options.create(true).write(true);
    if cli.log_append {
        options.append(true);
    } else {
        options.truncate(true);
    }
    let file = options
        .open(path)
        .map_err(|e| anyhow::anyhow!("failed to open log file {}: {e}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))?;

    tracing::info!(
        target: "diagnostics",
        version = env!("CARGO_PKG_VERSION"),
        log_file = %path.display(),
        log_filter = %directives,
        log_append = cli.log_append,
        "tracing enabled"
    );

    Ok(())
}
