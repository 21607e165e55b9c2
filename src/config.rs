use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub data_file: PathBuf,
    pub delivery_latency: Duration,
    pub seed: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = env_string("LEADCAST_BIND_ADDR", "127.0.0.1:3001")
            .parse::<SocketAddr>()
            .context("LEADCAST_BIND_ADDR must be a valid host:port")?;

        let data_file = PathBuf::from(env_string("LEADCAST_DATA_FILE", "db.json"));

        let latency_ms = env_string("LEADCAST_DELIVERY_LATENCY_MS", "500")
            .parse::<u64>()
            .context("LEADCAST_DELIVERY_LATENCY_MS must be u64")?;

        let seed = parse_bool(&env_string("LEADCAST_SEED", "true"))
            .context("LEADCAST_SEED must be true or false")?;

        Ok(Self {
            bind_addr,
            data_file,
            delivery_latency: Duration::from_millis(latency_ms),
            seed,
        })
    }

    /// Command-line flags win over the environment.
    pub fn apply_cli(mut self, cli: Cli) -> Self {
        if let Some(bind_addr) = cli.bind {
            self.bind_addr = bind_addr;
        }
        if let Some(data_file) = cli.data_file {
            self.data_file = data_file;
        }
        if let Some(latency_ms) = cli.delivery_latency_ms {
            self.delivery_latency = Duration::from_millis(latency_ms);
        }
        if cli.no_seed {
            self.seed = false;
        }
        self
    }
}

#[derive(Debug, Default, Parser)]
#[command(name = "leadcast", version, about = "Campaign dispatch server")]
pub struct Cli {
    /// Address to listen on, e.g. 127.0.0.1:3001
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    /// Path of the JSON lead document
    #[arg(long)]
    pub data_file: Option<PathBuf>,

    /// Simulated per-delivery latency in milliseconds
    #[arg(long)]
    pub delivery_latency_ms: Option<u64>,

    /// Do not create a seed document when the data file is missing
    #[arg(long)]
    pub no_seed: bool,
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("unrecognized boolean '{}'", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> AppConfig {
        AppConfig {
            bind_addr: "127.0.0.1:3001".parse().unwrap(),
            data_file: PathBuf::from("db.json"),
            delivery_latency: Duration::from_millis(500),
            seed: true,
        }
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert!(parse_bool("TRUE").unwrap());
        assert!(parse_bool(" yes ").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(!parse_bool("off").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn cli_flags_override_config() {
        let cli = Cli::parse_from([
            "leadcast",
            "--bind",
            "0.0.0.0:8080",
            "--data-file",
            "/tmp/leads.json",
            "--delivery-latency-ms",
            "20",
            "--no-seed",
        ]);
        let config = base().apply_cli(cli);

        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.data_file, PathBuf::from("/tmp/leads.json"));
        assert_eq!(config.delivery_latency, Duration::from_millis(20));
        assert!(!config.seed);
    }

    #[test]
    fn absent_cli_flags_keep_config() {
        let config = base().apply_cli(Cli::parse_from(["leadcast"]));
        assert_eq!(config.bind_addr, base().bind_addr);
        assert_eq!(config.data_file, base().data_file);
        assert!(config.seed);
    }
}
