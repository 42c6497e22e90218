//! AES key schedule: compact round keys plus the per-call bitsliced
//! expansion.
//!
//! A schedule is derived once per key and stored compressed: for each round
//! key, the two identical bitsliced copies (the same 16 bytes occupy both
//! block slots) are packed into four words using the even/odd bit lanes.
//! Every cipher call unpacks that into the full eight-planes-per-round form
//! and drops it again before returning, so the redundant representation never
//! outlives a single call.
//!
//! Decryption uses the same schedule as encryption; the round function
//! computes inverse MixColumns algebraically, so no inverse schedule is ever
//! generated and the persistent key-material footprint stays at one schedule.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::bitslice::{State, bitslice, inv_bitslice, sub_bytes, sub_bytes_nots};

const RCON: [u8; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

/// Compressed schedule words for the largest supported key (14 rounds).
const MAX_SCHEDULE_WORDS: usize = 4 * (14 + 1);
/// Expanded plane words for the largest supported key.
const MAX_EXPANDED_WORDS: usize = 8 * (14 + 1);

const LANE_EVEN: u32 = 0x5555_5555;
const LANE_ODD: u32 = 0xaaaa_aaaa;

/// An AES key schedule, usable for both encryption and decryption.
///
/// Construction is the only operation that reads the raw key. The schedule is
/// immutable afterwards and may be shared read-only across threads; it is
/// zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AesKey {
    comp: [u32; MAX_SCHEDULE_WORDS],
    rounds: usize,
}

impl AesKey {
    /// Derives the round-key schedule from a raw key.
    ///
    /// The key must be 16, 24 or 32 bytes (10, 12 or 14 rounds); any other
    /// length is a caller bug and panics.
    pub fn new(key: &[u8]) -> Self {
        let rounds = match key.len() {
            16 => 10,
            24 => 12,
            32 => 14,
            _ => panic!("AES key must be 16, 24 or 32 bytes"),
        };
        let nk = key.len() / 4;
        let nw = 4 * (rounds + 1);

        let mut w = [0u32; MAX_SCHEDULE_WORDS];
        for (wi, chunk) in w.iter_mut().zip(key.chunks_exact(4)) {
            *wi = u32::from_le_bytes(chunk.try_into().unwrap());
        }
        for i in nk..nw {
            let mut t = w[i - 1];
            if i % nk == 0 {
                t = sub_word(t.rotate_right(8)) ^ u32::from(RCON[i / nk - 1]);
            } else if nk > 6 && i % nk == 4 {
                t = sub_word(t);
            }
            w[i] = w[i - nk] ^ t;
        }

        // Bitslice each round key against itself and keep only the even bits
        // of even planes and odd bits of odd planes; the duplicate lanes are
        // reconstructed on expansion.
        let mut comp = [0u32; MAX_SCHEDULE_WORDS];
        let mut q = State::default();
        let mut rk = [0u8; 16];
        for r in 0..=rounds {
            for c in 0..4 {
                rk[4 * c..4 * c + 4].copy_from_slice(&w[4 * r + c].to_le_bytes());
            }
            bitslice(&mut q, &rk, &rk);
            for j in 0..4 {
                comp[4 * r + j] = (q[2 * j] & LANE_EVEN) | (q[2 * j + 1] & LANE_ODD);
            }
        }
        w.zeroize();
        q.zeroize();
        rk.zeroize();
        Self { comp, rounds }
    }

    /// Number of rounds (10, 12 or 14).
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Unpacks the compressed schedule into full bitsliced planes.
    ///
    /// Rebuilt on every cipher call and zeroized on drop, so the expanded
    /// form never persists between calls, on any exit path.
    pub(crate) fn expand(&self) -> ExpandedSchedule {
        let mut planes = [0u32; MAX_EXPANDED_WORDS];
        for (i, &c) in self.comp[..4 * (self.rounds + 1)].iter().enumerate() {
            let e = c & LANE_EVEN;
            let o = c & LANE_ODD;
            planes[2 * i] = e | (e << 1);
            planes[2 * i + 1] = o | (o >> 1);
        }
        ExpandedSchedule {
            planes,
            rounds: self.rounds,
        }
    }
}

impl fmt::Debug for AesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // never print key material
        f.debug_struct("AesKey").field("rounds", &self.rounds).finish()
    }
}

/// Ephemeral fully-bitsliced schedule: 8 plane words per round key.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct ExpandedSchedule {
    planes: [u32; MAX_EXPANDED_WORDS],
    rounds: usize,
}

impl ExpandedSchedule {
    pub(crate) fn rounds(&self) -> usize {
        self.rounds
    }

    pub(crate) fn round(&self, r: usize) -> &[u32] {
        debug_assert!(r <= self.rounds);
        &self.planes[8 * r..8 * r + 8]
    }
}

/// Applies the S-box to all four bytes of a word through the bitsliced
/// circuit, keeping the key schedule free of table lookups.
fn sub_word(x: u32) -> u32 {
    let mut blk = [0u8; 16];
    blk[..4].copy_from_slice(&x.to_le_bytes());
    let mut q = State::default();
    bitslice(&mut q, &blk, &blk);
    sub_bytes(&mut q);
    sub_bytes_nots(&mut q);
    let mut out = inv_bitslice(&q);
    let word = u32::from_le_bytes(out[0][..4].try_into().unwrap());
    q.zeroize();
    blk.zeroize();
    out.zeroize();
    word
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    #[should_panic(expected = "AES key must be 16, 24 or 32 bytes")]
    fn rejects_bad_key_length() {
        let _ = AesKey::new(&[0u8; 17]);
    }

    #[test]
    fn round_counts() {
        assert_eq!(AesKey::new(&[0u8; 16]).rounds(), 10);
        assert_eq!(AesKey::new(&[0u8; 24]).rounds(), 12);
        assert_eq!(AesKey::new(&[0u8; 32]).rounds(), 14);
    }

    #[test]
    fn expansion_is_deterministic() {
        let key = AesKey::new(b"0123456789abcdef");
        let a = key.expand();
        let b = key.expand();
        for r in 0..=key.rounds() {
            assert_eq!(a.round(r), b.round(r));
        }
    }

    #[test]
    fn first_round_key_is_the_raw_key() {
        // round 0 of the schedule is the key itself; unpack it and compare
        let raw = *b"Sixteen byte key";
        let key = AesKey::new(&raw);
        let xk = key.expand();
        let mut planes = [0u32; 8];
        planes.copy_from_slice(xk.round(0));
        let blocks = crate::bitslice::inv_bitslice(&planes);
        assert_eq!(blocks[0], raw);
        assert_eq!(blocks[1], raw);
    }

    #[test]
    fn debug_does_not_leak_key_material() {
        let key = AesKey::new(&[0xa5u8; 16]);
        let dbg = format!("{key:?}");
        assert!(dbg.contains("rounds"));
        assert!(!dbg.contains("a5"));
    }
}
