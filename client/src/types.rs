//! Public configuration and event types.
//!
//! The embedding application constructs [`ClientConfig`]/[`ServerOptions`]
//! (usually by deserializing its own settings) and receives [`ClientEvent`]s
//! and [`ServerEvent`]s on channels it owns.

use serde::Deserialize;
use serde_json::Value;

fn default_host() -> String {
    "127.0.0.1".to_owned()
}

fn default_port() -> u16 {
    4567
}

fn default_connect_timeout_secs() -> u64 {
    5
}

/// Configuration for connecting to a running hsdev server.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bound on the connect handshake, in seconds. Individual commands have
    /// no timeout; disconnect is their terminal failure path.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Log verbosity understood by the server's `--log-level` flag and `set-log`
/// command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Case-insensitive parse; the server's own log lines use upper case.
    #[must_use]
    pub fn parse_str(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// Configuration for spawning the hsdev server process.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerOptions {
    /// Executable plus leading arguments, e.g. `["hsdev"]` or
    /// `["stack", "exec", "--", "hsdev"]`. The subcommand and flags are
    /// appended by the supervisor.
    pub command: Vec<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path of the symbol database file.
    #[serde(default)]
    pub db: Option<String>,
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default)]
    pub log_level: Option<LogLevel>,
}

/// An event emitted by a [`Client`](crate::Client) connection.
#[derive(Debug)]
pub enum ClientEvent {
    Connected,
    Disconnected,
    /// Every successfully parsed inbound message, before correlation. Meant
    /// for diagnostics; dropped when nobody listens.
    Message { id: Option<String>, body: Value },
}

/// An event emitted by the [`HsdevServer`](crate::HsdevServer) supervisor.
#[derive(Debug)]
pub enum ServerEvent {
    /// The server process printed its startup banner.
    Started { port: u16 },
    /// The server process exited.
    Stopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_defaults() {
        let config: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 4567);
        assert_eq!(config.connect_timeout_secs, 5);
    }

    #[test]
    fn test_client_config_overrides() {
        let config: ClientConfig =
            serde_json::from_value(serde_json::json!({"host": "::1", "port": 9999})).unwrap();
        assert_eq!(config.host, "::1");
        assert_eq!(config.port, 9999);
    }

    #[test]
    fn test_server_options_defaults() {
        let options: ServerOptions =
            serde_json::from_value(serde_json::json!({"command": ["hsdev"]})).unwrap();
        assert_eq!(options.command, vec!["hsdev".to_owned()]);
        assert_eq!(options.port, 4567);
        assert_eq!(options.db, None);
        assert_eq!(options.log_level, None);
    }

    #[test]
    fn test_log_level_deserializes_lowercase() {
        let level: LogLevel = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(level, LogLevel::Warning);
    }

    #[test]
    fn test_log_level_parse_str_case_insensitive() {
        assert_eq!(LogLevel::parse_str("TRACE"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::parse_str("Info"), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse_str("loud"), None);
    }

    #[test]
    fn test_log_level_wire_name_round_trips() {
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warning,
            LogLevel::Error,
        ] {
            assert_eq!(LogLevel::parse_str(level.wire_name()), Some(level));
        }
    }
}
