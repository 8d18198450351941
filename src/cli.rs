//! Command line front-end: replays a runner event stream through the Jira
//! extension.

use clap::Parser;
use log::{debug, error, info, warn};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::config::{apply_env_overrides, load_config_map};
use crate::error::Result;
use crate::event::LifecycleEvent;
use crate::extension::EventBus;
use crate::reporter::JiraReporter;

/// Files a Jira issue for every failed test in a runner event stream.
#[derive(Parser, Debug)]
#[command(name = "jira-reporter", version, about, long_about = None)]
pub struct Args {
    /// JSON configuration file
    #[arg(short, long, env = "JIRA_REPORTER_CONFIG", default_value = "jira-reporter.json")]
    pub config: PathBuf,

    /// Event stream with one JSON event per line, `-` for stdin
    #[arg(short, long, default_value = "-")]
    pub events: String,

    /// Overrides `debugMode` from the configuration file
    #[arg(long)]
    pub debug_mode: Option<bool>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub dispatched: usize,
    pub skipped: usize,
}

/// Feeds every decodable line of `reader` to `bus`. Blank lines are ignored,
/// malformed ones are logged and counted as skipped.
pub async fn replay<R>(bus: &mut EventBus, reader: R) -> Result<ReplayStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = ReplayStats::default();
    let mut lines = reader.lines();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }
        match LifecycleEvent::from_json_line(&line) {
            Ok(event) => {
                let handled = bus.emit(&event).await;
                debug!("line {}: {} handled by {} extension(s)", line_no, event.kind(), handled);
                stats.dispatched += 1;
            }
            Err(err) => {
                warn!("Skipping malformed event on line {}: {}", line_no, err);
                stats.skipped += 1;
            }
        }
    }

    Ok(stats)
}

fn prepare_config(args: &Args) -> std::result::Result<Map<String, Value>, crate::config::ConfigError> {
    let mut map = load_config_map(&args.config)?;
    apply_env_overrides(&mut map, |name| std::env::var(name).ok());
    if let Some(debug_mode) = args.debug_mode {
        map.insert("debugMode".to_string(), Value::Bool(debug_mode));
    }
    Ok(map)
}

async fn execute(args: Args) -> ExitCode {
    let map = match prepare_config(&args) {
        Ok(map) => map,
        Err(err) => {
            error!("{}", err);
            eprintln!("jira-reporter: {}", err);
            return ExitCode::from(2);
        }
    };

    let reporter = match JiraReporter::initialize(&map) {
        Ok(reporter) => reporter,
        Err(err) => {
            error!("{}", err);
            eprintln!("jira-reporter: {}", err);
            return ExitCode::from(2);
        }
    };

    let mut bus = EventBus::new();
    bus.register(Box::new(reporter));

    let result = if args.events == "-" {
        replay(&mut bus, BufReader::new(tokio::io::stdin())).await
    } else {
        match tokio::fs::File::open(&args.events).await {
            Ok(file) => replay(&mut bus, BufReader::new(file)).await,
            Err(err) => Err(err.into()),
        }
    };

    match result {
        Ok(stats) => {
            info!(
                "Processed {} event(s), skipped {} malformed line(s)",
                stats.dispatched, stats.skipped
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            eprintln!("jira-reporter: {}", err);
            ExitCode::FAILURE
        }
    }
}

pub fn run() -> ExitCode {
    let args = Args::parse();

    let _ = dotenvy::dotenv();

    let default_filter = if args.verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init();

    info!("Starting jira-reporter");

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("jira-reporter: failed to start runtime: {}", err);
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(execute(args))
}

#[cfg(test)]
mod tests {
    use super::{replay, Args, ReplayStats};
    use crate::extension::EventBus;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn parses_flags() {
        let args = Args::parse_from([
            "jira-reporter",
            "--config",
            "ci/jira.json",
            "--events",
            "events.jsonl",
            "--debug-mode",
            "true",
            "-v",
        ]);
        assert_eq!(args.config, PathBuf::from("ci/jira.json"));
        assert_eq!(args.events, "events.jsonl");
        assert_eq!(args.debug_mode, Some(true));
        assert!(args.verbose);
    }

    #[test]
    fn events_default_to_stdin() {
        let args = Args::parse_from(["jira-reporter", "-c", "jira.json"]);
        assert_eq!(args.events, "-");
        assert_eq!(args.debug_mode, None);
    }

    #[tokio::test]
    async fn replay_counts_dispatched_and_skipped_lines() {
        let input = concat!(
            "{\"event\":\"suite.before\",\"suite\":\"acceptance\"}\n",
            "\n",
            "garbage\n",
            "{\"event\":\"suite.after\",\"suite\":\"acceptance\"}\n",
        );
        let mut bus = EventBus::new();
        let stats = replay(&mut bus, input.as_bytes()).await.unwrap();
        assert_eq!(
            stats,
            ReplayStats {
                dispatched: 2,
                skipped: 1
            }
        );
    }
}
