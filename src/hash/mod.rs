//! SHA-256 compression core

pub mod digest;
pub mod schedule;
pub mod sha256;

pub use digest::{Digest, DigestAccumulator};
pub use schedule::ScheduleWindow;
pub use sha256::{compress_block, compress_rounds, round, State, H, K, ROUNDS};

use crate::padding::pad;
use crate::transport::words_from_bytes;

/// SHA-256 of an in-memory message.
///
/// Pads the message, runs each block through [`compress_rounds`] and folds
/// it into a [`DigestAccumulator`]. The streaming
/// [`crate::stream::Controller`] must agree with this for every input.
pub fn sha256(data: &[u8]) -> Digest {
    accumulate(&words_from_bytes(&pad(data))).finish()
}

/// Fold every whole block of `words` into a fresh accumulator.
fn accumulate(words: &[u32]) -> DigestAccumulator {
    let mut acc = DigestAccumulator::new();
    for chunk in words.chunks_exact(16) {
        let mut block = [0u32; 16];
        block.copy_from_slice(chunk);
        let working = compress_rounds(acc.state(), &block);
        acc.fold(&working);
    }
    acc
}
