//! Streaming controller
//!
//! Drives one hash computation word by word. Each input word is consumed the
//! moment it arrives: rounds 0..16 of a block run as their words come in,
//! rounds 16..64 run from the schedule window once the 16th word lands, and
//! the block is folded into the chaining value straight after.

use crate::error::{HashError, Result};
use crate::hash::{round, Digest, DigestAccumulator, ScheduleWindow, State, K, ROUNDS};
use crate::hash::schedule::WINDOW;
use crate::transport::{digest_to_words, WordSource};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, SyncSender};
use tracing::{debug, trace, warn};

/// Words per 512-bit block
pub const WORDS_PER_BLOCK: u64 = WINDOW as u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Between blocks, or before the first one
    AwaitingBlock,
    /// Rounds 0..16: waiting on input words
    ExpandingSchedule,
    /// Rounds 16..64: schedule derived from the window
    Compressing,
    /// Adding the working state into the chaining value
    Folding,
    /// Digest produced; terminal
    Done,
}

/// Word-at-a-time SHA-256 over a declared number of padded blocks.
///
/// Feed it with [`Controller::push_word`] from a push-style transport, or hand
/// it a [`WordSource`] with [`Controller::run`]. Either way the digest comes
/// out exactly once.
#[derive(Debug, Clone)]
pub struct Controller {
    acc: DigestAccumulator,
    working: State,
    window: ScheduleWindow,
    round: usize,
    remaining: u64,
    expected: u64,
    received: u64,
    phase: Phase,
    output: Option<Digest>,
}

impl Controller {
    /// Standard SHA-256 over `blocks` blocks.
    pub fn new(blocks: u64) -> Self {
        Self::from_accumulator(DigestAccumulator::new(), blocks)
    }

    /// Continuation variant: start from an explicit chaining value instead of
    /// the standard initial hash.
    pub fn with_seed(seed: State, blocks: u64) -> Self {
        Self::from_accumulator(DigestAccumulator::with_seed(seed), blocks)
    }

    fn from_accumulator(acc: DigestAccumulator, blocks: u64) -> Self {
        let mut ctl = Self {
            working: *acc.state(),
            acc,
            window: ScheduleWindow::new(),
            round: 0,
            remaining: blocks,
            // Counts beyond u64 words can never be delivered; saturate so
            // the shortfall reports as an underrun.
            expected: blocks.saturating_mul(WORDS_PER_BLOCK),
            received: 0,
            phase: Phase::AwaitingBlock,
            output: None,
        };
        ctl.await_block();
        ctl
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Words consumed so far
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Words the declared block count calls for
    pub fn expected(&self) -> u64 {
        self.expected
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    fn await_block(&mut self) {
        debug_assert_eq!(self.phase, Phase::AwaitingBlock);
        if self.remaining == 0 {
            debug!(blocks = self.acc.blocks(), "digest ready");
            self.output = Some(Digest(*self.acc.state()));
            self.phase = Phase::Done;
        } else {
            self.working = *self.acc.state();
            self.window.reset();
            self.round = 0;
            self.phase = Phase::ExpandingSchedule;
        }
    }

    fn compress_tail(&mut self) {
        self.phase = Phase::Compressing;
        while self.round < ROUNDS {
            let w = self.window.expand();
            self.working = round(K[self.round], w, &self.working);
            self.round += 1;
        }

        self.phase = Phase::Folding;
        self.acc.fold(&self.working);
        self.remaining -= 1;
        trace!(block = self.acc.blocks(), remaining = self.remaining, "block folded");

        self.phase = Phase::AwaitingBlock;
        self.await_block();
    }

    /// Consume one input word.
    ///
    /// Returns the digest when this word completes the last block, `None`
    /// while more words are needed.
    pub fn push_word(&mut self, word: u32) -> Result<Option<Digest>> {
        if self.phase != Phase::ExpandingSchedule {
            return Err(HashError::AlreadyFinished);
        }

        let w = self.window.push_input(word);
        self.working = round(K[self.round], w, &self.working);
        self.round += 1;
        self.received += 1;

        if self.round == WINDOW {
            self.compress_tail();
        }
        Ok(self.output.take())
    }

    /// Feed several words; stops at the first digest.
    pub fn push_words(&mut self, words: &[u32]) -> Result<Option<Digest>> {
        for &word in words {
            if let Some(d) = self.push_word(word)? {
                return Ok(Some(d));
            }
        }
        Ok(None)
    }

    /// Take the digest once every block has been folded.
    ///
    /// Anything short of that is an underrun: the partial state is dropped
    /// with `self`.
    pub fn finish(mut self) -> Result<Digest> {
        if let Some(d) = self.output.take() {
            return Ok(d);
        }
        if self.phase == Phase::Done {
            return Err(HashError::AlreadyFinished);
        }
        warn!(expected = self.expected, received = self.received, "input underrun");
        Err(HashError::InputUnderrun {
            expected: self.expected,
            received: self.received,
        })
    }

    /// Pull words from `source` until the digest is ready.
    pub fn run<S: WordSource + ?Sized>(mut self, source: &mut S) -> Result<Digest> {
        while !self.is_done() {
            match source.next_word() {
                Some(word) => {
                    if let Some(d) = self.push_word(word)? {
                        return Ok(d);
                    }
                }
                None => return self.source_ended(source),
            }
        }
        self.finish()
    }

    /// Like [`Controller::run`], checking `stop` before every word.
    pub fn run_with_stop<S: WordSource + ?Sized>(
        mut self,
        source: &mut S,
        stop: &AtomicBool,
    ) -> Result<Digest> {
        while !self.is_done() {
            if stop.load(Ordering::Relaxed) {
                warn!(received = self.received, "hash cancelled");
                return Err(HashError::Cancelled);
            }
            match source.next_word() {
                Some(word) => {
                    if let Some(d) = self.push_word(word)? {
                        return Ok(d);
                    }
                }
                None => {
                    if stop.load(Ordering::Relaxed) {
                        return Err(HashError::Cancelled);
                    }
                    return self.source_ended(source);
                }
            }
        }
        self.finish()
    }

    /// The source returned `None` before the digest was ready: report its
    /// failure if it had one, otherwise an underrun.
    fn source_ended<S: WordSource + ?Sized>(self, source: &mut S) -> Result<Digest> {
        if let Some(err) = source.take_error() {
            warn!(received = self.received, error = %err, "word source failed");
            return Err(err);
        }
        self.finish()
    }
}

/// Hash stage of a channel pipeline.
///
/// Receives `16 * blocks` words from `msg_rx` and sends the digest words on
/// `hash_tx`, blocking until the output stage has room.
pub fn hash_gen(
    msg_rx: &mut Receiver<u32>,
    seed: State,
    blocks: u64,
    hash_tx: &SyncSender<State>,
    stop: &AtomicBool,
) -> Result<()> {
    let digest = Controller::with_seed(seed, blocks).run_with_stop(msg_rx, stop)?;
    // A closed output queue means nobody wants the result any more.
    hash_tx
        .send(digest_to_words(&digest))
        .map_err(|_| HashError::Cancelled)
}

/// Hash words already in memory.
pub fn hash_words(words: &[u32], blocks: u64) -> Result<Digest> {
    let mut source = crate::transport::SliceWords::new(words);
    Controller::new(blocks).run(&mut source)
}
