//! SHA-256 round function and constant tables

use super::schedule::ScheduleWindow;

/// Round constants: first 32 bits of the fractional parts of the cube roots
/// of the first 64 primes.
pub static K: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5,
    0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3,
    0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc,
    0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7,
    0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13,
    0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3,
    0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5,
    0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208,
    0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

/// Initial hash value (FIPS 180-4 section 5.3.3)
pub const H: State = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a,
    0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

/// Rounds per 512-bit block
pub const ROUNDS: usize = 64;

/// Eight-word register file `[a, b, c, d, e, f, g, h]`
pub type State = [u32; 8];

#[inline]
fn ch(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (!x & z)
}

#[inline]
fn maj(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (x & z) ^ (y & z)
}

#[inline]
fn sigma0(x: u32) -> u32 {
    x.rotate_right(2) ^ x.rotate_right(13) ^ x.rotate_right(22)
}

#[inline]
fn sigma1(x: u32) -> u32 {
    x.rotate_right(6) ^ x.rotate_right(11) ^ x.rotate_right(25)
}

/// Apply one compression round to `state`.
///
/// `k` is the round constant and `w` the schedule word for the same round.
/// Returns `[T1 + T2, a, b, c, d + T1, e, f, g]`; the input is left untouched.
#[inline]
pub fn round(k: u32, w: u32, state: &State) -> State {
    let [a, b, c, d, e, f, g, h] = *state;

    let t1 = h
        .wrapping_add(sigma1(e))
        .wrapping_add(ch(e, f, g))
        .wrapping_add(k)
        .wrapping_add(w);
    let t2 = sigma0(a).wrapping_add(maj(a, b, c));

    [t1.wrapping_add(t2), a, b, c, d.wrapping_add(t1), e, f, g]
}

/// Add a finished working state into the chaining state, word by word.
#[inline]
pub fn fold(chain: &mut State, working: &State) {
    for (h, v) in chain.iter_mut().zip(working.iter()) {
        *h = h.wrapping_add(*v);
    }
}

/// Run the 64 rounds of one block starting from `state`.
///
/// Returns the working state before it is folded into the chaining value.
pub fn compress_rounds(state: &State, block: &[u32; 16]) -> State {
    let mut window = ScheduleWindow::new();
    let mut working = *state;

    for (t, &word) in block.iter().enumerate() {
        let w = window.push_input(word);
        working = round(K[t], w, &working);
    }
    for t in 16..ROUNDS {
        let w = window.expand();
        working = round(K[t], w, &working);
    }
    working
}

/// Compress one block of 16 message words into `state`.
///
/// This is the whole-block form of what [`crate::stream::Controller`] does
/// word by word; both share the same window and round code.
pub fn compress_block(state: &State, block: &[u32; 16]) -> State {
    let mut out = *state;
    fold(&mut out, &compress_rounds(state, block));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc_block() -> [u32; 16] {
        let mut block = [0u32; 16];
        block[0] = 0x61626380;
        block[15] = 0x18;
        block
    }

    #[test]
    fn test_compress_abc() {
        let out = compress_block(&H, &abc_block());
        assert_eq!(
            out,
            [
                0xba7816bf, 0x8f01cfea, 0x414140de, 0x5dae2223,
                0xb00361a3, 0x96177a9c, 0xb410ff61, 0xf20015ad,
            ]
        );
    }

    #[test]
    fn test_rounds_then_fold() {
        let working = compress_rounds(&H, &abc_block());
        assert_ne!(working, compress_block(&H, &abc_block()));
        let mut chain = H;
        fold(&mut chain, &working);
        assert_eq!(chain, compress_block(&H, &abc_block()));
    }

    #[test]
    fn test_round_first_abc() {
        // FIPS 180-2 appendix B.1, t = 0
        let out = round(K[0], 0x61626380, &H);
        assert_eq!(
            out,
            [
                0x5d6aebcd, 0x6a09e667, 0xbb67ae85, 0x3c6ef372,
                0xfa2a4622, 0x510e527f, 0x9b05688c, 0x1f83d9ab,
            ]
        );
    }

    #[test]
    fn test_round_is_not_idempotent() {
        let once = round(K[5], 0xdeadbeef, &H);
        let twice = round(K[5], 0xdeadbeef, &once);
        assert_ne!(once, H);
        assert_ne!(twice, once);
    }

    #[test]
    fn test_round_does_not_alias_input() {
        let state = H;
        let _ = round(K[0], 0, &state);
        assert_eq!(state, H);
    }

    #[test]
    fn test_fold_wraps() {
        let mut chain = [u32::MAX; 8];
        fold(&mut chain, &[2; 8]);
        assert_eq!(chain, [1; 8]);
    }

    #[test]
    fn test_functions() {
        assert_eq!(ch(0xffff0000, 0x12345678, 0x9abcdef0), 0x1234def0);
        assert_eq!(maj(0xff00ff00, 0x0ff00ff0, 0x00ff00ff), 0x0ff00ff0);
        assert_eq!(sigma0(1), (1u32 << 30) | (1 << 19) | (1 << 10));
        assert_eq!(sigma1(1), (1u32 << 26) | (1 << 21) | (1 << 7));
    }
}
