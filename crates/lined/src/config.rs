//! Command-line and environment configuration

use anyhow::{bail, Result};
use clap::Parser;

const BYTES_PER_MB: u64 = 1_000_000;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Bind address
    #[arg(short, long, env = "LINED_BIND", default_value = "127.0.0.1:8080")]
    pub bind: String,

    /// Directory holding `<n>.txt` datasets
    #[arg(short, long, env = "LINED_DATA", default_value = "tmp/data")]
    pub data: String,

    /// Cache capacity in lines (overrides the memory-based estimate)
    #[arg(short, long, env = "LINED_CAPACITY")]
    pub capacity: Option<usize>,

    /// Memory ceiling for cached lines, in megabytes
    #[arg(long, env = "LINED_CACHE_MEMORY_MB", default_value_t = 320)]
    pub cache_memory_mb: u64,

    /// Estimated memory cost of one cached line, in bytes
    #[arg(long, env = "LINED_LINE_COST_BYTES", default_value_t = 1000)]
    pub line_cost_bytes: u64,

    /// Health check mode (for Docker)
    #[arg(long)]
    pub health: bool,
}

impl Config {
    /// Number of lines the cache may hold
    ///
    /// An explicit `--capacity` wins; otherwise the memory ceiling is split
    /// by the per-line estimate.
    pub fn cache_capacity(&self) -> Result<usize> {
        if let Some(capacity) = self.capacity {
            return Ok(capacity);
        }
        if self.line_cost_bytes == 0 {
            bail!("--line-cost-bytes must be greater than 0");
        }
        let budget = self.cache_memory_mb.saturating_mul(BYTES_PER_MB);
        Ok(usize::try_from(budget / self.line_cost_bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["lined"]).unwrap();
        assert_eq!(config.bind, "127.0.0.1:8080");
        assert_eq!(config.data, "tmp/data");
        assert!(!config.health);
        assert_eq!(config.cache_capacity().unwrap(), 320_000);
    }

    #[test]
    fn test_explicit_capacity_wins() {
        let config =
            Config::try_parse_from(["lined", "--capacity", "5", "--cache-memory-mb", "999"])
                .unwrap();
        assert_eq!(config.cache_capacity().unwrap(), 5);
    }

    #[test]
    fn test_capacity_from_budget() {
        let config = Config::try_parse_from([
            "lined",
            "--cache-memory-mb",
            "64",
            "--line-cost-bytes",
            "512",
        ])
        .unwrap();
        assert_eq!(config.cache_capacity().unwrap(), 125_000);
    }

    #[test]
    fn test_zero_line_cost_rejected() {
        let config = Config::try_parse_from(["lined", "--line-cost-bytes", "0"]).unwrap();
        assert!(config.cache_capacity().is_err());
    }
}
