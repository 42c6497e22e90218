//! CBC mode.
//!
//! The IV argument is the chaining value: each call reads it, threads it
//! through the buffer and overwrites it with the outgoing value, so a long
//! message can be processed in consecutive calls. A chaining value must not
//! be shared by two in-flight calls.

use zeroize::Zeroize;

use crate::engine::{Batch, block_at, check_buffers, decrypt_batch, encrypt_batch, xor16};
use crate::schedule::AesKey;

impl AesKey {
    /// CBC-encrypts `input` into `output`, updating `iv` in place to the last
    /// ciphertext block.
    ///
    /// Buffer lengths must be equal and a multiple of 16; an empty buffer is
    /// a no-op. Encryption is inherently sequential (each block feeds the
    /// next), so only one slot of the core transform is used per block.
    pub fn cbc_encrypt(&self, input: &[u8], output: &mut [u8], iv: &mut [u8; 16]) {
        check_buffers(input, output);
        if input.is_empty() {
            return;
        }
        let xk = self.expand();
        let mut cv = *iv;
        for (cin, cout) in input.chunks_exact(16).zip(output.chunks_exact_mut(16)) {
            let mut blk = xor16(cin.try_into().unwrap(), &cv);
            cv = encrypt_batch(&xk, Batch::Single(&blk))[0];
            cout.copy_from_slice(&cv);
            blk.zeroize();
        }
        *iv = cv;
    }

    /// CBC-decrypts `input` into `output`, updating `iv` in place to the last
    /// ciphertext block.
    ///
    /// Decryption has no cross-block data dependency, so blocks are pushed
    /// through the core transform two at a time; an odd leading block is
    /// handled alone. The result is bit-identical to a one-block-at-a-time
    /// decryption.
    pub fn cbc_decrypt(&self, input: &[u8], output: &mut [u8], iv: &mut [u8; 16]) {
        check_buffers(input, output);
        if input.is_empty() {
            return;
        }
        let xk = self.expand();
        let nblocks = input.len() / 16;
        let mut cv = *iv;
        let mut i = 0;
        if nblocks % 2 == 1 {
            let c0 = block_at(input, 0);
            let d = decrypt_batch(&xk, Batch::Single(&c0));
            output[..16].copy_from_slice(&xor16(&d[0], &cv));
            cv = c0;
            i = 1;
        }
        while i < nblocks {
            let c0 = block_at(input, i);
            let c1 = block_at(input, i + 1);
            let d = decrypt_batch(&xk, Batch::Pair(&c0, &c1));
            output[16 * i..16 * i + 16].copy_from_slice(&xor16(&d[0], &cv));
            output[16 * i + 16..16 * i + 32].copy_from_slice(&xor16(&d[1], &c0));
            cv = c1;
            i += 2;
        }
        *iv = cv;
    }
}
