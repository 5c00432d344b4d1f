//! Three-stage threaded pipeline
//!
//! reader -> [bounded word queue] -> hasher -> [digest slot] -> splitter ->
//! [bounded word queue] -> writer
//!
//! Stages overlap only on different data. The hasher itself is the
//! sequential [`Controller`](crate::stream::Controller); the queues only let
//! input delivery and output draining run alongside it.

use crate::error::HashError;
use crate::hash::{State, H};
use crate::padding::check_block_count;
use crate::stream::{hash_gen, WORDS_PER_BLOCK};
use crate::transport::{write_words_be, BeWords, WordSource};
use anyhow::{anyhow, Context, Result};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{sync_channel, SyncSender};
use std::sync::Arc;
use std::thread;
use tracing::debug;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Capacity of the input word queue
    pub input_depth: usize,
    /// Capacity of the output word queue
    pub output_depth: usize,
    /// Words the reader sends between stop-flag checks
    pub burst_words: usize,
    /// Chaining value to start from (None = standard initial hash)
    pub seed: Option<State>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_depth: 16,
            output_depth: 8,
            burst_words: 16,
            seed: None,
        }
    }
}

/// Threaded streaming hasher
///
/// One `Pipeline` can hash several messages in turn. Cancellation is sticky:
/// after [`Pipeline::cancel`] every later [`Pipeline::run`] reports
/// [`HashError::Cancelled`] until [`Pipeline::reset`] clears the flag. The
/// word counter restarts from zero with each run.
pub struct Pipeline {
    config: PipelineConfig,
    /// Stop flag
    stop: Arc<AtomicBool>,
    /// Words handed to the input queue by the current or last run
    words_sent: Arc<AtomicU64>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            stop: Arc::new(AtomicBool::new(false)),
            words_sent: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Hash an already padded message of `blocks` blocks.
    ///
    /// Returns the standard 32-byte big-endian digest as assembled by the
    /// writer stage.
    pub fn run(&self, padded: &[u8], blocks: u64) -> Result<[u8; 32]> {
        check_block_count(padded.len(), blocks)?;
        self.words_sent.store(0, Ordering::Relaxed);

        let num_words = blocks.saturating_mul(WORDS_PER_BLOCK);
        let seed = self.config.seed.unwrap_or(H);
        let burst = self.config.burst_words.max(1);
        let stop: &AtomicBool = &self.stop;
        let sent: &AtomicU64 = &self.words_sent;

        let (msg_tx, mut msg_rx) = sync_channel::<u32>(self.config.input_depth);
        let (hash_tx, hash_rx) = sync_channel::<State>(1);
        let (out_tx, out_rx) = sync_channel::<u32>(self.config.output_depth);

        debug!(blocks, words = num_words, "pipeline start");

        thread::scope(|s| -> Result<[u8; 32]> {
            let reader = s.spawn(move || read_burst(padded, num_words, burst, &msg_tx, stop, sent));

            let hasher = s.spawn(move || hash_gen(&mut msg_rx, seed, blocks, &hash_tx, stop));

            let splitter = s.spawn(move || {
                if let Ok(digest) = hash_rx.recv() {
                    for word in digest {
                        if out_tx.send(word).is_err() {
                            break;
                        }
                    }
                }
            });

            // Writer stage runs on the calling thread.
            let mut out = Vec::with_capacity(32);
            for word in out_rx.iter().take(8) {
                write_words_be(&[word], &mut out).context("Failed to write digest word")?;
            }

            let hashed = hasher
                .join()
                .map_err(|_| anyhow!("hash stage panicked"))?;
            reader.join().map_err(|_| anyhow!("reader stage panicked"))?;
            splitter
                .join()
                .map_err(|_| anyhow!("output stage panicked"))?;
            hashed?;

            let digest: [u8; 32] = out
                .try_into()
                .map_err(|v: Vec<u8>| anyhow!("writer received {} of 32 digest bytes", v.len()))?;
            debug!(digest = %hex::encode(digest), "pipeline finished");
            Ok(digest)
        })
    }

    /// Stop the pipeline. A running hash reports [`HashError::Cancelled`].
    pub fn cancel(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Clear a previous cancellation so the pipeline can run again.
    pub fn reset(&self) {
        self.stop.store(false, Ordering::Relaxed);
        self.words_sent.store(0, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Shared stop flag, for cancelling from another thread
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Words delivered into the input queue by the current or last run
    pub fn words_sent(&self) -> u64 {
        self.words_sent.load(Ordering::Relaxed)
    }
}

/// Reader stage: burst-decode big-endian words and feed the input queue.
///
/// Returns quietly on stop or when the hasher hangs up; the hasher is the
/// one that reports why.
fn read_burst(
    padded: &[u8],
    num_words: u64,
    burst: usize,
    tx: &SyncSender<u32>,
    stop: &AtomicBool,
    sent: &AtomicU64,
) {
    let mut source = BeWords::new(padded);
    let mut delivered = 0u64;

    while delivered < num_words {
        if stop.load(Ordering::Relaxed) {
            debug!(delivered, "reader stopped");
            return;
        }
        let n = (num_words - delivered).min(burst as u64);
        for _ in 0..n {
            let Some(word) = source.next_word() else {
                return;
            };
            if tx.send(word).is_err() {
                return;
            }
            delivered += 1;
            sent.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Convenience: the typed hash error behind a pipeline failure, if any.
pub fn hash_error(err: &anyhow::Error) -> Option<&HashError> {
    err.downcast_ref::<HashError>()
}
