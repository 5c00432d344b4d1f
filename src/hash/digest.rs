//! Digest accumulator and the finished digest value

use super::sha256::{fold, State, H};
use serde::{Serialize, Serializer};
use std::fmt;

/// Running chaining state across blocks.
///
/// The only place the chaining value changes is [`DigestAccumulator::fold`],
/// called once per block after the 64th round.
#[derive(Debug, Clone)]
pub struct DigestAccumulator {
    state: State,
    blocks: u64,
}

impl DigestAccumulator {
    /// Seeded with the standard initial hash value.
    pub fn new() -> Self {
        Self::with_seed(H)
    }

    /// Seeded with a caller-supplied chaining value (continuation hashing).
    pub fn with_seed(seed: State) -> Self {
        Self {
            state: seed,
            blocks: 0,
        }
    }

    /// Current chaining value, the starting working state for the next block.
    #[inline]
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Blocks folded so far
    pub fn blocks(&self) -> u64 {
        self.blocks
    }

    /// Add a block's final working state into the chaining value.
    #[inline]
    pub fn fold(&mut self, working: &State) {
        fold(&mut self.state, working);
        self.blocks += 1;
    }

    pub fn finish(self) -> Digest {
        Digest(self.state)
    }
}

impl Default for DigestAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Final SHA-256 output as eight words `[a, b, c, d, e, f, g, h]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest(pub State);

impl Digest {
    pub fn words(&self) -> &State {
        &self.0
    }

    /// Standard 32-byte big-endian encoding
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut result = [0u8; 32];
        for (i, &word) in self.0.iter().enumerate() {
            result[i * 4..i * 4 + 4].copy_from_slice(&word.to_be_bytes());
        }
        result
    }

    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Digest(std::array::from_fn(|i| {
            u32::from_be_bytes([
                bytes[i * 4],
                bytes[i * 4 + 1],
                bytes[i * 4 + 2],
                bytes[i * 4 + 3],
            ])
        }))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parse 64 hex characters. Also used for `--seed` values.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s.trim(), &mut bytes)?;
        Ok(Self::from_bytes(&bytes))
    }
}

impl From<Digest> for [u8; 32] {
    fn from(d: Digest) -> Self {
        d.to_bytes()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for word in &self.0 {
            write!(f, "{:08x}", word)?;
        }
        Ok(())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_accumulator_is_iv() {
        let acc = DigestAccumulator::new();
        assert_eq!(acc.state(), &H);
        assert_eq!(acc.blocks(), 0);
    }

    #[test]
    fn test_fold_counts_blocks() {
        let mut acc = DigestAccumulator::with_seed([0; 8]);
        acc.fold(&[1, 2, 3, 4, 5, 6, 7, 8]);
        acc.fold(&[1; 8]);
        assert_eq!(acc.blocks(), 2);
        assert_eq!(acc.finish().words(), &[2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_hex_roundtrip_and_display() {
        let hex_str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
        let d = Digest::from_hex(hex_str).unwrap();
        assert_eq!(d.words()[0], 0xe3b0c442);
        assert_eq!(d.words()[7], 0x7852b855);
        assert_eq!(d.to_hex(), hex_str);
        assert_eq!(d.to_string(), hex_str);
    }

    #[test]
    fn test_from_hex_rejects_short() {
        assert!(Digest::from_hex("e3b0c442").is_err());
        assert!(Digest::from_hex(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn test_serialize_as_hex() {
        let d = Digest(H);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(
            json,
            "\"6a09e667bb67ae853c6ef372a54ff53a510e527f9b05688c1f83d9ab5be0cd19\""
        );
    }
}
