/// Run configuration: positional args with environment fallbacks.
use anyhow::{Result, bail};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_BOARD_SIZE: u32 = 4;
pub const DEFAULT_LOG_FILE: &str = "term2048.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root URL of the game server.
    pub server_url: String,
    /// Side length requested for new boards.
    pub board_size: u32,
    /// Where tracing output goes; the TUI owns stdout.
    pub log_file: String,
}

impl Config {
    /// Usage: `term2048 [server-url] [board-size]`, with `TERM2048_SERVER`,
    /// `TERM2048_BOARD_SIZE` and `TERM2048_LOG` as fallbacks.
    pub fn from_env_args() -> Result<Self> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::resolve(&args, |key| std::env::var(key).ok())
    }

    fn resolve(args: &[String], env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let server_url = args
            .first()
            .cloned()
            .or_else(|| env("TERM2048_SERVER"))
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        if server_url.trim().is_empty() {
            bail!("server url must not be empty");
        }

        let board_size = match args.get(1).cloned().or_else(|| env("TERM2048_BOARD_SIZE")) {
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => bail!("board size must be a positive integer, got '{raw}'"),
            },
            None => DEFAULT_BOARD_SIZE,
        };

        let log_file = env("TERM2048_LOG").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

        Ok(Self {
            server_url,
            board_size,
            log_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_when_nothing_is_given() {
        let config = Config::resolve(&[], no_env).unwrap();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.board_size, DEFAULT_BOARD_SIZE);
        assert_eq!(config.log_file, DEFAULT_LOG_FILE);
    }

    #[test]
    fn positional_args_win_over_env() {
        let config = Config::resolve(&args(&["http://game:9000", "6"]), |key| {
            match key {
                "TERM2048_SERVER" => Some("http://ignored".into()),
                "TERM2048_BOARD_SIZE" => Some("3".into()),
                _ => None,
            }
        })
        .unwrap();
        assert_eq!(config.server_url, "http://game:9000");
        assert_eq!(config.board_size, 6);
    }

    #[test]
    fn env_fallbacks_apply() {
        let config = Config::resolve(&[], |key| match key {
            "TERM2048_SERVER" => Some("http://env-host:8080".into()),
            "TERM2048_LOG" => Some("/tmp/t2048.log".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.server_url, "http://env-host:8080");
        assert_eq!(config.log_file, "/tmp/t2048.log");
    }

    #[test]
    fn rejects_non_positive_board_size() {
        assert!(Config::resolve(&args(&["http://x", "0"]), no_env).is_err());
        assert!(Config::resolve(&args(&["http://x", "four"]), no_env).is_err());
    }
}
