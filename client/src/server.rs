//! Supervisor for the hsdev server process.
//!
//! Spawns the external `hsdev` binary, waits for its startup banner on
//! stdout, relays its stderr log lines into `tracing` at their parsed level,
//! and kills the child on shutdown or drop. Connecting to the started server
//! is the [`Client`](crate::Client)'s job.

use std::process::Stdio;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use regex::Regex;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command};
use tokio::sync::mpsc;

use crate::types::{LogLevel, ServerEvent, ServerOptions};

const START_TIMEOUT_SECS: u64 = 5;

static STARTED_RX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Server started at port (?P<port>\d+)$").expect("banner regex"));

/// hsdev log lines look like `<timestamp>  <LEVEL>  <component>: <text>`.
static LEVEL_RX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*?\s+(?P<level>[A-Z]+)\s+.*$").expect("level regex"));

fn parse_level(line: &str) -> LogLevel {
    LEVEL_RX
        .captures(line)
        .and_then(|captures| LogLevel::parse_str(&captures["level"]))
        .unwrap_or(LogLevel::Info)
}

fn relay_log_line(line: &str) {
    match parse_level(line) {
        LogLevel::Trace => tracing::trace!("hsdev: {line}"),
        LogLevel::Debug => tracing::debug!("hsdev: {line}"),
        LogLevel::Info => tracing::info!("hsdev: {line}"),
        LogLevel::Warning => tracing::warn!("hsdev: {line}"),
        LogLevel::Error => tracing::error!("hsdev: {line}"),
    }
}

async fn await_banner(lines: &mut Lines<BufReader<ChildStdout>>) -> Result<u16> {
    let line = lines
        .next_line()
        .await
        .context("reading server stdout")?
        .context("server exited before printing its startup banner")?;
    let captures = STARTED_RX
        .captures(&line)
        .with_context(|| format!("unknown response from server: {line}"))?;
    captures["port"]
        .parse()
        .with_context(|| format!("invalid port in startup banner: {line}"))
}

/// Handle to a running hsdev server process.
#[derive(Debug)]
pub struct HsdevServer {
    child: Child,
    port: u16,
    #[allow(dead_code)]
    stdout_handle: tokio::task::JoinHandle<()>,
    #[allow(dead_code)]
    stderr_handle: tokio::task::JoinHandle<()>,
}

impl HsdevServer {
    /// Spawn the server process and wait for its startup banner.
    ///
    /// `Started`/`Stopped` events fan out on `event_tx`; callers that don't
    /// care drop the receiver.
    pub async fn start(
        options: &ServerOptions,
        event_tx: mpsc::Sender<ServerEvent>,
    ) -> Result<Self> {
        let (program, leading_args) = options
            .command
            .split_first()
            .context("empty server command")?;
        let resolved = which::which(program)
            .with_context(|| format!("{program} not found in PATH"))?;

        let mut cmd = Command::new(&resolved);
        cmd.args(leading_args);
        cmd.arg("run");
        cmd.args(["--port", &options.port.to_string()]);
        if let Some(db) = &options.db {
            cmd.args(["--db", db]);
        }
        if let Some(log_file) = &options.log_file {
            cmd.args(["--log", log_file]);
        }
        if let Some(level) = options.log_level {
            cmd.args(["--log-level", level.wire_name()]);
        }
        cmd.arg("--no-color");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!("spawning hsdev process: {}", resolved.display());
        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning {program}"))?;

        let stdout = child.stdout.take().context("no stdout from child")?;
        let stderr = child.stderr.take().context("no stderr from child")?;

        // hsdev logs to stderr; relay each line at its own level.
        let stderr_handle = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                relay_log_line(&line);
            }
        });

        let mut stdout_lines = BufReader::new(stdout).lines();
        let port = tokio::time::timeout(
            Duration::from_secs(START_TIMEOUT_SECS),
            await_banner(&mut stdout_lines),
        )
        .await
        .map_err(|_| anyhow!("unable to start hsdev server: no banner within {START_TIMEOUT_SECS}s"))??;

        tracing::info!(port, "hsdev server started");
        let _ = event_tx.send(ServerEvent::Started { port }).await;

        // Stdout goes quiet after the banner; EOF means the process exited.
        let stdout_handle = tokio::spawn(async move {
            while let Ok(Some(line)) = stdout_lines.next_line().await {
                tracing::debug!("hsdev: {line}");
            }
            tracing::debug!("hsdev server exited");
            let _ = event_tx.send(ServerEvent::Stopped).await;
        });

        Ok(Self {
            child,
            port,
            stdout_handle,
            stderr_handle,
        })
    }

    /// Port the server reported in its startup banner.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Kill the server process. Consumes self.
    pub async fn stop(mut self) {
        let _ = self.child.kill().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_regex_extracts_port() {
        let captures = STARTED_RX.captures("Server started at port 4567").unwrap();
        assert_eq!(&captures["port"], "4567");
        assert!(STARTED_RX.captures("Listening on 4567").is_none());
    }

    #[test]
    fn test_parse_level_from_log_line() {
        assert_eq!(
            parse_level("2024-01-05 12:00:01  WARNING  scan: skipped A.hs"),
            LogLevel::Warning
        );
        assert_eq!(
            parse_level("2024-01-05 12:00:01  ERROR  scan: failed"),
            LogLevel::Error
        );
    }

    #[test]
    fn test_parse_level_defaults_to_info() {
        assert_eq!(parse_level("no level marker here"), LogLevel::Info);
    }

    fn options_for(command: &[&str]) -> ServerOptions {
        ServerOptions {
            command: command.iter().map(|&s| s.to_owned()).collect(),
            port: 4567,
            db: None,
            log_file: None,
            log_level: None,
        }
    }

    #[tokio::test]
    async fn test_start_missing_binary() {
        let (event_tx, _event_rx) = mpsc::channel(8);
        let err = HsdevServer::start(&options_for(&["hsdev-definitely-not-installed"]), event_tx)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found in PATH"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_start_waits_for_banner() {
        let (event_tx, mut event_rx) = mpsc::channel(8);
        // The extra run/--port arguments land in the script's positional
        // parameters and are ignored.
        let server = HsdevServer::start(
            &options_for(&["sh", "-c", "echo 'Server started at port 4567'; sleep 5"]),
            event_tx,
        )
        .await
        .unwrap();

        assert_eq!(server.port(), 4567);
        assert!(matches!(
            event_rx.recv().await,
            Some(ServerEvent::Started { port: 4567 })
        ));

        server.stop().await;
        assert!(matches!(event_rx.recv().await, Some(ServerEvent::Stopped)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_start_rejects_unknown_banner() {
        let (event_tx, _event_rx) = mpsc::channel(8);
        let err = HsdevServer::start(
            &options_for(&["sh", "-c", "echo hello; sleep 5"]),
            event_tx,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("unknown response from server"));
    }
}
