//! sha256-stream CLI

use anyhow::{Context, Result};
use clap::Parser;
use sha256_stream::hash::H;
use sha256_stream::padding::{block_count, pad};
use sha256_stream::stream::Controller;
use sha256_stream::transport::BeWords;
use sha256_stream::{save_report, Config, Digest, HashReport, Pipeline};
use std::io::Read;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    if let Some(text) = &config.text {
        return hash_one(config, "<text>", text.as_bytes());
    }

    let files: Vec<&str> = if config.files.is_empty() {
        vec!["-"]
    } else {
        config.files.iter().map(String::as_str).collect()
    };

    for name in files {
        let data = read_input(name)?;
        hash_one(config, name, &data)?;
    }
    Ok(())
}

fn read_input(name: &str) -> Result<Vec<u8>> {
    if name == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read(name).with_context(|| format!("Failed to read {}", name))
    }
}

fn hash_one(config: &Config, name: &str, message: &[u8]) -> Result<()> {
    let padded = pad(message);
    let blocks = block_count(message.len());
    info!(source = name, bytes = message.len(), blocks, "hashing");

    let start = Instant::now();
    let digest = if config.threaded {
        let pipeline = Pipeline::new(config.pipeline_config());
        let bytes = pipeline.run(&padded, blocks)?;
        Digest::from_bytes(&bytes)
    } else {
        let mut source = BeWords::new(&padded[..]);
        Controller::with_seed(config.seed.unwrap_or(H), blocks)
            .run(&mut source)
            .with_context(|| format!("Failed to hash {}", name))?
    };
    let elapsed_secs = start.elapsed().as_secs_f64();

    let report = HashReport {
        source: name.to_string(),
        message_bytes: message.len() as u64,
        blocks,
        digest,
        seed: config.seed.map(|s| Digest(s).to_hex()),
        threaded: config.threaded,
        elapsed_secs,
    };

    if config.verbose > 0 && !config.quiet {
        eprintln!("{}", report.detailed());
    }
    save_report(&report, config.format, config.output.as_deref())
}
