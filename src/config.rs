// Server Configuration - command-line flags
//
// The listen address defaults to the fixed port 3333. Nothing is read from
// the environment and nothing is persisted.

use clap::Parser;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3333";

#[derive(Debug, Clone, Parser)]
#[command(name = "ledger-server", version, about = "In-memory customer ledger over HTTP")]
pub struct ServerConfig {
    /// Address the HTTP server listens on
    #[arg(long, default_value = DEFAULT_BIND_ADDR)]
    pub bind: String,

    /// Start without the example customer
    #[arg(long)]
    pub empty: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: DEFAULT_BIND_ADDR.to_string(),
            empty: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::parse_from(["ledger-server"]);

        assert_eq!(config.bind, "0.0.0.0:3333");
        assert!(!config.empty);
    }

    #[test]
    fn test_flags() {
        let config = ServerConfig::parse_from(["ledger-server", "--bind", "127.0.0.1:8080", "--empty"]);

        assert_eq!(config.bind, "127.0.0.1:8080");
        assert!(config.empty);
    }
}
