//! Word transport at the edges of the hashing core
//!
//! The controller only needs "give me the next word, or tell me the stream
//! ended". Anything that can answer that is a [`WordSource`]. The output side
//! is a split of the digest into words plus a big-endian burst writer.

use crate::error::HashError;
use crate::hash::Digest;
use std::io::{self, Read, Write};
use std::sync::mpsc::Receiver;
use tracing::warn;

/// Blocking, ordered supply of 32-bit message words.
pub trait WordSource {
    /// Next word, or `None` once the source is exhausted, closed or failed.
    fn next_word(&mut self) -> Option<u32>;

    /// Why the last `None` happened, if it was a failure rather than a clean
    /// end of input. Taking the error clears it.
    fn take_error(&mut self) -> Option<HashError> {
        None
    }
}

/// Channel end of a bounded word queue. Blocks until the producer sends or
/// hangs up.
impl WordSource for Receiver<u32> {
    fn next_word(&mut self) -> Option<u32> {
        self.recv().ok()
    }
}

/// Cursor over words already in memory
#[derive(Debug, Clone)]
pub struct SliceWords<'a> {
    words: &'a [u32],
    pos: usize,
}

impl<'a> SliceWords<'a> {
    pub fn new(words: &'a [u32]) -> Self {
        Self { words, pos: 0 }
    }

    pub fn consumed(&self) -> usize {
        self.pos
    }
}

impl WordSource for SliceWords<'_> {
    fn next_word(&mut self) -> Option<u32> {
        let word = self.words.get(self.pos).copied()?;
        self.pos += 1;
        Some(word)
    }
}

/// Adapter for any `u32` iterator
#[derive(Debug, Clone)]
pub struct IterWords<I>(pub I);

impl<I: Iterator<Item = u32>> WordSource for IterWords<I> {
    fn next_word(&mut self) -> Option<u32> {
        self.0.next()
    }
}

/// Decodes big-endian words from a byte stream.
///
/// A trailing fragment shorter than four bytes ends the stream. An I/O error
/// also ends it and is reported through [`WordSource::take_error`].
pub struct BeWords<R: Read> {
    reader: R,
    error: Option<io::Error>,
}

impl<R: Read> BeWords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            error: None,
        }
    }
}

impl<R: Read> WordSource for BeWords<R> {
    fn next_word(&mut self) -> Option<u32> {
        let mut buf = [0u8; 4];
        match self.reader.read_exact(&mut buf) {
            Ok(()) => Some(u32::from_be_bytes(buf)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => None,
            Err(e) => {
                warn!(error = %e, "word reader failed");
                self.error = Some(e);
                None
            }
        }
    }

    fn take_error(&mut self) -> Option<HashError> {
        self.error.take().map(HashError::from)
    }
}

/// Split a byte buffer into big-endian words. Trailing bytes that do not fill
/// a word are dropped.
pub fn words_from_bytes(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

/// The eight output words in `[a..h]` order
pub fn digest_to_words(digest: &Digest) -> [u32; 8] {
    *digest.words()
}

/// Serialize words big-endian into `out`.
pub fn write_words_be<W: Write>(words: &[u32], out: &mut W) -> io::Result<()> {
    for word in words {
        out.write_all(&word.to_be_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_slice_words() {
        let words = [1, 2, 3];
        let mut src = SliceWords::new(&words);
        assert_eq!(src.next_word(), Some(1));
        assert_eq!(src.next_word(), Some(2));
        assert_eq!(src.next_word(), Some(3));
        assert_eq!(src.next_word(), None);
        assert_eq!(src.consumed(), 3);
    }

    #[test]
    fn test_be_words_drops_fragment() {
        let bytes = [0x61, 0x62, 0x63, 0x80, 0x00, 0x01];
        let mut src = BeWords::new(&bytes[..]);
        assert_eq!(src.next_word(), Some(0x61626380));
        assert_eq!(src.next_word(), None);
        assert!(src.take_error().is_none());
    }

    /// Serves `good` zero bytes, then fails every read.
    struct FailingReader {
        good: usize,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.good == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "disk gone"));
            }
            let n = buf.len().min(self.good);
            buf[..n].fill(0);
            self.good -= n;
            Ok(n)
        }
    }

    #[test]
    fn test_be_words_reports_read_failure() {
        let mut src = BeWords::new(FailingReader { good: 8 });
        assert_eq!(src.next_word(), Some(0));
        assert_eq!(src.next_word(), Some(0));
        assert_eq!(src.next_word(), None);
        assert_eq!(
            src.take_error(),
            Some(HashError::SourceFailed {
                kind: io::ErrorKind::Other,
                message: "disk gone".to_string()
            })
        );
        assert!(src.take_error().is_none());
    }

    #[test]
    fn test_receiver_ends_on_hangup() {
        let (tx, mut rx) = mpsc::sync_channel(2);
        tx.send(9u32).unwrap();
        drop(tx);
        assert_eq!(rx.next_word(), Some(9));
        assert_eq!(rx.next_word(), None);
    }

    #[test]
    fn test_words_from_bytes_and_back() {
        let bytes: Vec<u8> = (0u8..12).collect();
        let words = words_from_bytes(&bytes);
        assert_eq!(words, vec![0x00010203, 0x04050607, 0x08090a0b]);

        let mut out = Vec::new();
        write_words_be(&words, &mut out).unwrap();
        assert_eq!(out, bytes);
    }
}
