//! Probe-time self-test.
//!
//! A host embedding this engine as one of several AES providers runs
//! [`self_test`] once before selecting it. Failure is reported as a value —
//! never a panic — so the host can fall back to a hardware or table-based
//! implementation instead of taking the process down. This is the only error
//! any operation in this crate returns.

use std::error::Error;
use std::fmt;

use crate::schedule::AesKey;
use crate::xts::xts_double;

/// The engine failed its probe-time self-test and must not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelfTestError {
    what: &'static str,
}

impl fmt::Display for SelfTestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bsaes self-test failed: {}", self.what)
    }
}

impl Error for SelfTestError {}

fn check(ok: bool, what: &'static str) -> Result<(), SelfTestError> {
    if ok { Ok(()) } else { Err(SelfTestError { what }) }
}

const GF_DOUBLING_VECTORS: [([u32; 4], [u32; 4]); 6] = [
    ([1, 0, 0, 0], [2, 0, 0, 0]),
    ([0x8000_0000, 0, 0, 0], [0, 1, 0, 0]),
    ([0, 0x8000_0000, 0, 0], [0, 0, 1, 0]),
    ([0, 0, 0x8000_0000, 0], [0, 0, 0, 1]),
    ([0, 0, 0, 0x8000_0000], [0x87, 0, 0, 0]),
    ([0, 0x8000_0000, 0, 0x8000_0000], [0x87, 0, 1, 0]),
];

// FIPS-197 appendix C examples: key bytes 00 01 02 .., plaintext
// 00 11 22 .. ff, one ciphertext per key size; plus the all-zero AES-128
// vector.
const FIPS_CIPHERTEXTS: [(usize, [u8; 16]); 3] = [
    (
        16,
        [
            0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4,
            0xc5, 0x5a,
        ],
    ),
    (
        24,
        [
            0xdd, 0xa9, 0x7c, 0xa4, 0x86, 0x4c, 0xdf, 0xe0, 0x6e, 0xaf, 0x70, 0xa0, 0xec, 0x0d,
            0x71, 0x91,
        ],
    ),
    (
        32,
        [
            0x8e, 0xa2, 0xb7, 0xca, 0x51, 0x67, 0x45, 0xbf, 0xea, 0xfc, 0x49, 0x90, 0x4b, 0x49,
            0x60, 0x89,
        ],
    ),
];

const ZERO_KEY_CIPHERTEXT: [u8; 16] = [
    0x66, 0xe9, 0x4b, 0xd4, 0xef, 0x8a, 0x2c, 0x3b, 0x88, 0x4c, 0xfa, 0x59, 0xca, 0x34, 0x2b,
    0x2e,
];

/// Verifies the pure-math helpers and one known answer per key size.
///
/// Intended to run once at probe/initialization time, before this engine is
/// selected over alternative AES implementations.
pub fn self_test() -> Result<(), SelfTestError> {
    for (input, expected) in GF_DOUBLING_VECTORS {
        let mut t = input;
        xts_double(&mut t);
        check(t == expected, "GF(2^128) doubling")?;
    }

    let zero = AesKey::new(&[0u8; 16]);
    let mut ct = [0u8; 16];
    zero.encrypt_block(&[0u8; 16], &mut ct);
    check(ct == ZERO_KEY_CIPHERTEXT, "AES-128 zero vector")?;

    let mut key = [0u8; 32];
    for (i, k) in key.iter_mut().enumerate() {
        *k = i as u8;
    }
    let mut pt = [0u8; 16];
    for (i, p) in pt.iter_mut().enumerate() {
        *p = (i as u8) * 0x11;
    }
    for (key_len, expected) in FIPS_CIPHERTEXTS {
        let schedule = AesKey::new(&key[..key_len]);
        let mut ct = [0u8; 16];
        schedule.encrypt_block(&pt, &mut ct);
        check(ct == expected, "block encryption known answer")?;
        let mut back = [0u8; 16];
        schedule.decrypt_block(&ct, &mut back);
        check(back == pt, "block decryption known answer")?;
    }

    Ok(())
}
