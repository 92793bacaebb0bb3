//! Run command - drive a tracking session from a command script.
//!
//! Each input line is `<action> [json payload]`, for example:
//!
//! ```text
//! configure ["", "https://example.com", "", 50, 0, 30, 10, false]
//! start
//! sleep 3000
//! stop
//! ```
//!
//! `sleep <ms>` pauses the script so position fixes can arrive. Blank lines
//! and `#` comments are skipped. Every dispatched result is printed as
//! `<callback> <STATUS> [keep] <message>`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use geotrack::channel::{CallbackId, Dispatched};
use geotrack::command::CommandRouter;

use crate::error::CliError;
use crate::runner::CliRunner;

/// How long to wait for trailing results after the script ends.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Arguments for the run command.
#[derive(Default)]
pub struct RunArgs {
    pub script: Option<PathBuf>,
    pub track: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub debug: bool,
}

/// One parsed script line.
#[derive(Debug, Clone, PartialEq)]
enum ScriptLine {
    Invoke { action: String, payload: String },
    Sleep(Duration),
}

/// Run the run command.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config.as_deref(), args.debug)?;
    runner.log_startup("run");
    info!(
        event_buffer = runner.config().tracker.event_buffer,
        interval_ms = runner.config().simulator.interval.as_millis() as u64,
        "Simulated source configured"
    );

    let track = match &args.track {
        Some(path) => load_track(path)?,
        None => Vec::new(),
    };
    info!(points = track.len(), "Track loaded");

    let runtime = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
    runtime.block_on(async {
        let tracker = runner.build_tracker(track);
        let printer = spawn_printer(tracker.results);

        let outcome = match &args.script {
            Some(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .map_err(|error| CliError::FileRead {
                        path: path.clone(),
                        error,
                    })?;
                execute_script(BufReader::new(file), &tracker.router).await
            }
            None => execute_script(BufReader::new(tokio::io::stdin()), &tracker.router).await,
        };

        tracker.router.controller().shutdown().await;
        drop(tracker.router);

        if tokio::time::timeout(DRAIN_TIMEOUT, printer).await.is_err() {
            warn!("Timed out waiting for trailing results");
        }
        outcome
    })
}

/// Execute every line of a script against the router.
async fn execute_script<R>(reader: R, router: &CommandRouter) -> Result<(), CliError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut calls: u64 = 0;

    while let Some(line) = lines.next_line().await.map_err(CliError::Input)? {
        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(ScriptLine::Sleep(duration))) => {
                debug!(ms = duration.as_millis() as u64, "Sleeping");
                tokio::time::sleep(duration).await;
            }
            Ok(Some(ScriptLine::Invoke { action, payload })) => {
                calls += 1;
                let call = CallbackId::new(format!("call-{}", calls));
                println!("> {} {}", call, action);
                // Failures were already dispatched on the call's callback
                if let Err(e) = router.execute(&action, &payload, &call).await {
                    debug!(error = %e, "Command failed");
                }
            }
            Err(reason) => eprintln!("Skipping line: {}", reason),
        }
    }

    info!(calls, "Script finished");
    Ok(())
}

/// Print results until every sender is gone.
fn spawn_printer(mut results: mpsc::UnboundedReceiver<Dispatched>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(dispatched) = results.recv().await {
            println!("{}", format_result(&dispatched));
        }
    })
}

fn format_result(dispatched: &Dispatched) -> String {
    let result = &dispatched.result;
    let mut line = format!("< {} {}", dispatched.callback, result.status);
    if result.keep_callback {
        line.push_str(" [keep]");
    }
    if !result.message.is_empty() {
        line.push(' ');
        line.push_str(&result.message);
    }
    line
}

/// Parse a script line. Returns `Ok(None)` for blank lines and comments.
fn parse_line(line: &str) -> Result<Option<ScriptLine>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    if word == "sleep" {
        let ms = rest
            .parse::<u64>()
            .map_err(|_| format!("sleep expects milliseconds, got '{}'", rest))?;
        return Ok(Some(ScriptLine::Sleep(Duration::from_millis(ms))));
    }

    Ok(Some(ScriptLine::Invoke {
        action: word.to_string(),
        payload: rest.to_string(),
    }))
}

/// Load a track file of `latitude,longitude` lines.
fn load_track(path: &Path) -> Result<Vec<(f64, f64)>, CliError> {
    let content = std::fs::read_to_string(path).map_err(|error| CliError::FileRead {
        path: path.to_path_buf(),
        error,
    })?;
    parse_track(&content).map_err(|(line, reason)| CliError::Track {
        path: path.to_path_buf(),
        line,
        reason,
    })
}

/// Parse track content. Errors carry the 1-based line number.
fn parse_track(content: &str) -> Result<Vec<(f64, f64)>, (usize, String)> {
    let mut track = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let point = line
            .split_once(',')
            .and_then(|(lat, lon)| {
                let lat = lat.trim().parse::<f64>().ok()?;
                let lon = lon.trim().parse::<f64>().ok()?;
                Some((lat, lon))
            })
            .filter(|(lat, lon)| (-90.0..=90.0).contains(lat) && (-180.0..=180.0).contains(lon))
            .ok_or_else(|| (index + 1, format!("expected latitude,longitude, got '{}'", line)))?;
        track.push(point);
    }

    Ok(track)
}
