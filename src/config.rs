//! Process configuration, read from the command line at startup.

use clap::Parser;

/// Command-line flags. Everything has a default, so a bare `persona`
/// serves on `127.0.0.1:8000`.
#[derive(Debug, Clone, Parser)]
#[command(name = "persona", version, about = "Schema-validated person API")]
pub struct Config {
    /// Interface to listen on.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// TCP port to listen on.
    #[arg(long, default_value_t = 8000)]
    pub port: u16,

    /// Log filter used when `RUST_LOG` is unset (e.g. `info`, `persona=debug`).
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    #[arg(long)]
    pub log_json: bool,
}

impl Config {
    /// `host:port`, ready for [`Server::bind`](crate::Server::bind).
    ///
    /// IPv6 hosts are bracketed.
    pub fn listen_addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_on_localhost_8000() {
        let config = Config::try_parse_from(["persona"]).expect("parse");
        assert_eq!(config.listen_addr(), "127.0.0.1:8000");
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "persona", "--host", "::1", "--port", "3000", "--log-level", "debug", "--log-json",
        ])
        .expect("parse");
        assert_eq!(config.listen_addr(), "[::1]:3000");
        assert_eq!(config.log_level, "debug");
        assert!(config.log_json);
    }

    #[test]
    fn rejects_out_of_range_port() {
        assert!(Config::try_parse_from(["persona", "--port", "70000"]).is_err());
    }
}
