use crate::hash::{Digest, State};
use crate::output::OutputFormat;
use crate::pipeline::PipelineConfig;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "sha256-stream")]
#[command(version)]
#[command(about = "SHA-256 over a bounded stream of big-endian words")]
pub struct Config {
    /// Files to hash ("-" for stdin). Reads stdin when none are given
    pub files: Vec<String>,

    /// Hash this string instead of files
    #[arg(short, long, conflicts_with = "files")]
    pub text: Option<String>,

    /// Run reader, hasher and writer as separate threads
    #[arg(short = 'p', long)]
    pub threaded: bool,

    /// Input word queue capacity (pipeline mode)
    #[arg(long, default_value = "16")]
    pub queue_depth: usize,

    /// Words delivered per burst (pipeline mode)
    #[arg(long, default_value = "16")]
    pub burst: usize,

    /// Start from this chaining value instead of the standard initial hash
    /// (64 hex chars)
    #[arg(long, value_parser = parse_seed)]
    pub seed: Option<State>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Append results to this file instead of stdout
    #[arg(short = 'f', long)]
    pub output: Option<String>,

    /// More log output (repeat for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print digests; no logging below error
    #[arg(short, long)]
    pub quiet: bool,
}

impl Config {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            input_depth: self.queue_depth,
            burst_words: self.burst,
            seed: self.seed,
            ..PipelineConfig::default()
        }
    }

    /// Default `tracing` filter when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

fn parse_seed(s: &str) -> Result<State, String> {
    Digest::from_hex(s)
        .map(|d| *d.words())
        .map_err(|e| format!("invalid seed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::H;

    #[test]
    fn test_defaults() {
        let cfg = Config::try_parse_from(["sha256-stream"]).unwrap();
        assert!(cfg.files.is_empty());
        assert!(!cfg.threaded);
        assert_eq!(cfg.queue_depth, 16);
        assert_eq!(cfg.format, OutputFormat::Text);
        assert_eq!(cfg.log_filter(), "warn");
    }

    #[test]
    fn test_seed_parse() {
        let cfg = Config::try_parse_from([
            "sha256-stream",
            "--seed",
            "6a09e667bb67ae853c6ef372a54ff53a510e527f9b05688c1f83d9ab5be0cd19",
            "-p",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cfg.seed, Some(H));
        assert!(cfg.threaded);
        assert_eq!(cfg.log_filter(), "debug");
        assert_eq!(cfg.pipeline_config().seed, Some(H));
    }

    #[test]
    fn test_bad_seed() {
        assert!(Config::try_parse_from(["sha256-stream", "--seed", "abcd"]).is_err());
    }

    #[test]
    fn test_text_conflicts_with_files() {
        assert!(Config::try_parse_from(["sha256-stream", "-t", "abc", "a.txt"]).is_err());
    }
}
