//! Message schedule generator
//!
//! Keeps the last 16 schedule words in a fixed ring. For the first 16 rounds
//! of a block the words come straight from the input; the remaining 48 are
//! derived from the ring and written back over the oldest slot.

/// Words held by the sliding window
pub const WINDOW: usize = 16;

#[inline]
fn gamma0(x: u32) -> u32 {
    x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

#[inline]
fn gamma1(x: u32) -> u32 {
    x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

/// Sixteen-word sliding window over the expanded message schedule.
///
/// `cursor` always points at the oldest word, which is also the slot the next
/// word is written into. After a push, `get(15)` is the word just produced.
#[derive(Debug, Clone)]
pub struct ScheduleWindow {
    words: [u32; WINDOW],
    cursor: usize,
}

impl ScheduleWindow {
    pub fn new() -> Self {
        Self {
            words: [0u32; WINDOW],
            cursor: 0,
        }
    }

    /// Clear the window at a block boundary.
    pub fn reset(&mut self) {
        self.words = [0u32; WINDOW];
        self.cursor = 0;
    }

    /// Logical index `i` (0 = oldest, 15 = newest).
    #[inline]
    pub fn get(&self, i: usize) -> u32 {
        debug_assert!(i < WINDOW);
        self.words[(self.cursor + i) % WINDOW]
    }

    #[inline]
    fn push(&mut self, word: u32) {
        self.words[self.cursor] = word;
        self.cursor = (self.cursor + 1) % WINDOW;
    }

    /// Rounds 0..16: accept an input word as the next schedule word.
    #[inline]
    pub fn push_input(&mut self, word: u32) -> u32 {
        self.push(word);
        word
    }

    /// Rounds 16..64: derive W[t] from W[t-2], W[t-7], W[t-15], W[t-16].
    #[inline]
    pub fn expand(&mut self) -> u32 {
        let next = gamma1(self.get(14))
            .wrapping_add(self.get(9))
            .wrapping_add(gamma0(self.get(1)))
            .wrapping_add(self.get(0));
        self.push(next);
        next
    }

    /// Snapshot in logical order, oldest first.
    pub fn to_array(&self) -> [u32; WINDOW] {
        std::array::from_fn(|i| self.get(i))
    }
}

impl Default for ScheduleWindow {
    fn default() -> Self {
        Self::new()
    }
}
