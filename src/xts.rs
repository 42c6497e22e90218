//! XTS mode and the GF(2^128) tweak doubler.
//!
//! The caller supplies the starting tweak (already encrypted under the tweak
//! key by the layer above) and the driver doubles it in GF(2^128) after every
//! block, in both directions. The tweak argument is overwritten with the
//! outgoing value so consecutive calls chain exactly like one large call.
//!
//! Tweak words are little-endian throughout; this is deliberately asymmetric
//! with CCM's big-endian counter and must stay that way.

use zeroize::Zeroize;

use crate::engine::{Batch, block_at, check_buffers, decrypt_batch, encrypt_batch, xor16};
use crate::schedule::{AesKey, ExpandedSchedule};

/// Doubles a 128-bit value under the XTS reduction polynomial.
///
/// Words are little-endian limbs, least significant first. When bit 31 of
/// word 3 falls off the top, 0x87 folds into the low byte of word 0.
pub(crate) fn xts_double(t: &mut [u32; 4]) {
    let carry = t[3] >> 31;
    t[3] = (t[3] << 1) | (t[2] >> 31);
    t[2] = (t[2] << 1) | (t[1] >> 31);
    t[1] = (t[1] << 1) | (t[0] >> 31);
    t[0] = (t[0] << 1) ^ (0x87 * carry);
}

fn load_tweak(tweak: &[u8; 16]) -> [u32; 4] {
    let mut t = [0u32; 4];
    for (w, chunk) in t.iter_mut().zip(tweak.chunks_exact(4)) {
        *w = u32::from_le_bytes(chunk.try_into().unwrap());
    }
    t
}

fn tweak_bytes(t: &[u32; 4]) -> [u8; 16] {
    let mut out = [0u8; 16];
    for (chunk, w) in out.chunks_exact_mut(4).zip(t) {
        chunk.copy_from_slice(&w.to_le_bytes());
    }
    out
}

impl AesKey {
    /// XTS-encrypts `input` into `output`, doubling `tweak` once per block.
    pub fn xts_encrypt(&self, input: &[u8], output: &mut [u8], tweak: &mut [u8; 16]) {
        self.xts_crypt(input, output, tweak, encrypt_batch);
    }

    /// XTS-decrypts `input` into `output`, doubling `tweak` once per block.
    ///
    /// The tweak sequence is direction-independent: decryption consumes the
    /// same tweaks in the same order as encryption did.
    pub fn xts_decrypt(&self, input: &[u8], output: &mut [u8], tweak: &mut [u8; 16]) {
        self.xts_crypt(input, output, tweak, decrypt_batch);
    }

    fn xts_crypt(
        &self,
        input: &[u8],
        output: &mut [u8],
        tweak: &mut [u8; 16],
        transform: fn(&ExpandedSchedule, Batch<'_>) -> [[u8; 16]; 2],
    ) {
        check_buffers(input, output);
        if input.is_empty() {
            return;
        }
        let xk = self.expand();
        let nblocks = input.len() / 16;
        let mut t = load_tweak(tweak);
        let mut i = 0;
        if nblocks % 2 == 1 {
            let tb = tweak_bytes(&t);
            let mut blk = xor16(&block_at(input, 0), &tb);
            let e = transform(&xk, Batch::Single(&blk));
            output[..16].copy_from_slice(&xor16(&e[0], &tb));
            xts_double(&mut t);
            blk.zeroize();
            i = 1;
        }
        while i < nblocks {
            // precompute the second slot's tweak before consuming the first
            let tb0 = tweak_bytes(&t);
            let mut t1 = t;
            xts_double(&mut t1);
            let tb1 = tweak_bytes(&t1);

            let mut b0 = xor16(&block_at(input, i), &tb0);
            let mut b1 = xor16(&block_at(input, i + 1), &tb1);
            let e = transform(&xk, Batch::Pair(&b0, &b1));
            output[16 * i..16 * i + 16].copy_from_slice(&xor16(&e[0], &tb0));
            output[16 * i + 16..16 * i + 32].copy_from_slice(&xor16(&e[1], &tb1));

            t = t1;
            xts_double(&mut t);
            b0.zeroize();
            b1.zeroize();
            i += 2;
        }
        *tweak = tweak_bytes(&t);
    }
}
