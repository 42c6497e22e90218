//! CCM payload processing: combined CBC-MAC and CTR in one pass, plus the
//! standalone CBC-MAC primitive for associated data.
//!
//! The 32-byte chaining value is the authenticator (bytes 0..16) followed by
//! the counter block (bytes 16..32). The counter block's upper 12 bytes are
//! the caller's fixed nonce/parameter prefix and pass through untouched; its
//! low 32 bits are a big-endian counter per NIST SP 800-38C, incremented
//! before each block's keystream encryption.
//!
//! Call-order contract (documented, not runtime-enforced): accumulate
//! associated data with [`AesKey::cbc_mac_update`] first, then run the
//! payload through [`AesKey::ccm_encrypt`] / [`AesKey::ccm_decrypt`], then
//! let the caller finalize and compare the tag. These primitives never see
//! the tag.

use crate::engine::{Batch, check_buffers, encrypt_batch, xor16};
use crate::schedule::AesKey;

fn split_auth_ctr(auth_ctr: &[u8; 32]) -> ([u8; 16], [u8; 16]) {
    (
        auth_ctr[..16].try_into().unwrap(),
        auth_ctr[16..].try_into().unwrap(),
    )
}

impl AesKey {
    /// Folds whole blocks into a CBC-MAC authenticator, without any counter
    /// encryption. Used for associated data.
    pub fn cbc_mac_update(&self, input: &[u8], auth: &mut [u8; 16]) {
        assert_eq!(
            input.len() % 16,
            0,
            "buffer length must be a multiple of the AES block size"
        );
        if input.is_empty() {
            return;
        }
        let xk = self.expand();
        let mut a = *auth;
        for blk in input.chunks_exact(16) {
            let x = xor16(&a, blk.try_into().unwrap());
            a = encrypt_batch(&xk, Batch::Single(&x))[0];
        }
        *auth = a;
    }

    /// CCM payload encryption: one pass updating the authenticator with the
    /// plaintext while encrypting it under the counter stream.
    ///
    /// Per block: the plaintext is folded into the authenticator, the counter
    /// is incremented, and one two-slot core call encrypts the authenticator
    /// (slot 0) together with the counter block (slot 1); the ciphertext is
    /// the plaintext XOR the encrypted counter block.
    pub fn ccm_encrypt(&self, input: &[u8], output: &mut [u8], auth_ctr: &mut [u8; 32]) {
        check_buffers(input, output);
        if input.is_empty() {
            return;
        }
        let xk = self.expand();
        let (mut auth, mut ctr) = split_auth_ctr(auth_ctr);
        let mut c = u32::from_be_bytes(ctr[12..16].try_into().unwrap());
        for (cin, cout) in input.chunks_exact(16).zip(output.chunks_exact_mut(16)) {
            auth = xor16(&auth, cin.try_into().unwrap());
            c = c.wrapping_add(1);
            ctr[12..16].copy_from_slice(&c.to_be_bytes());
            let r = encrypt_batch(&xk, Batch::Pair(&auth, &ctr));
            auth = r[0];
            cout.copy_from_slice(&xor16(cin.try_into().unwrap(), &r[1]));
        }
        auth_ctr[..16].copy_from_slice(&auth);
        auth_ctr[16..].copy_from_slice(&ctr);
    }

    /// CCM payload decryption: the data dependency runs the other way.
    ///
    /// The plaintext must be recovered from the ciphertext before it can be
    /// folded into the authenticator, so the authenticator encryption for
    /// block `i` rides in the core call that produces the keystream pad for
    /// block `i+1`, and one finalizing encryption of the authenticator runs
    /// after the last block. Reordering this breaks interoperability with
    /// the encryption side.
    pub fn ccm_decrypt(&self, input: &[u8], output: &mut [u8], auth_ctr: &mut [u8; 32]) {
        check_buffers(input, output);
        if input.is_empty() {
            return;
        }
        let xk = self.expand();
        let (mut auth, mut ctr) = split_auth_ctr(auth_ctr);
        let mut c = u32::from_be_bytes(ctr[12..16].try_into().unwrap());
        let mut first = true;
        for (cin, cout) in input.chunks_exact(16).zip(output.chunks_exact_mut(16)) {
            c = c.wrapping_add(1);
            ctr[12..16].copy_from_slice(&c.to_be_bytes());
            let pad = if first {
                first = false;
                encrypt_batch(&xk, Batch::Single(&ctr))[0]
            } else {
                let r = encrypt_batch(&xk, Batch::Pair(&auth, &ctr));
                auth = r[0];
                r[1]
            };
            let pt = xor16(cin.try_into().unwrap(), &pad);
            cout.copy_from_slice(&pt);
            auth = xor16(&auth, &pt);
        }
        auth = encrypt_batch(&xk, Batch::Single(&auth))[0];
        auth_ctr[..16].copy_from_slice(&auth);
        auth_ctr[16..].copy_from_slice(&ctr);
    }
}
