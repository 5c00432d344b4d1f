//! Message padding (FIPS 180-4 section 5.1.1)
//!
//! The hashing core only ever sees whole blocks. This is the collaborator
//! that turns an arbitrary byte message into them and checks that a declared
//! block count agrees with what was produced.

use crate::error::{HashError, Result};

/// Bytes per 512-bit block
pub const BLOCK_BYTES: usize = 64;

/// Length of the padded message for an input of `len` bytes.
///
/// One `0x80` byte and an 8-byte bit length always fit, so the result is at
/// least `len + 9` rounded up to a block.
pub fn padded_len(len: usize) -> usize {
    (len + 9).div_ceil(BLOCK_BYTES) * BLOCK_BYTES
}

/// Blocks the padded form of a `len`-byte message occupies
pub fn block_count(len: usize) -> u64 {
    (padded_len(len) / BLOCK_BYTES) as u64
}

/// Append `0x80`, zero fill and the 64-bit big-endian bit length.
pub fn pad(message: &[u8]) -> Vec<u8> {
    let total = padded_len(message.len());
    let bit_len = (message.len() as u64).wrapping_mul(8);

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(message);
    out.push(0x80);
    out.resize(total - 8, 0);
    out.extend_from_slice(&bit_len.to_be_bytes());
    out
}

/// Check a caller's block count against a padded buffer length.
pub fn check_block_count(padded_len: usize, declared: u64) -> Result<()> {
    if padded_len % BLOCK_BYTES != 0 {
        return Err(HashError::UnalignedInput { len: padded_len });
    }
    let actual = (padded_len / BLOCK_BYTES) as u64;
    if actual != declared {
        return Err(HashError::BlockCountMismatch { declared, actual });
    }
    Ok(())
}
