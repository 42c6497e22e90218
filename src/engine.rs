//! Bitslice core transform: encrypts or decrypts up to two independent
//! blocks per call.
//!
//! The two-slot batch is an explicit sum type: a [`Batch::Single`] call
//! normalizes to a defined zero filler in slot 1, whose content never
//! influences slot 0's output. Scratch state is zeroized before every return.

use cipher::{
    BlockCipher, BlockDecrypt, BlockEncrypt, BlockSizeUser, KeyInit, KeySizeUser,
    generic_array::typenum::{U16, U24, U32},
};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::bitslice::{
    State, add_round_key, bitslice, inv_bitslice, inv_mix_columns, inv_shift_rows, inv_sub_bytes,
    mix_columns, shift_rows, sub_bytes, sub_bytes_nots,
};
use crate::schedule::{AesKey, ExpandedSchedule};

/// Defined filler for the unused slot of a single-block call.
const FILLER: [u8; 16] = [0u8; 16];

/// One or two blocks for a single pass through the core transform.
pub(crate) enum Batch<'a> {
    Single(&'a [u8; 16]),
    Pair(&'a [u8; 16], &'a [u8; 16]),
}

impl<'a> Batch<'a> {
    fn slots(&self) -> (&'a [u8; 16], &'a [u8; 16]) {
        match *self {
            Self::Single(b) => (b, &FILLER),
            Self::Pair(b0, b1) => (b0, b1),
        }
    }
}

/// Encrypts a batch; slot 1 of the result is meaningless for a `Single`
/// batch.
pub(crate) fn encrypt_batch(xk: &ExpandedSchedule, batch: Batch<'_>) -> [[u8; 16]; 2] {
    let (b0, b1) = batch.slots();
    let mut q = State::default();
    bitslice(&mut q, b0, b1);
    add_round_key(&mut q, xk.round(0));
    for r in 1..xk.rounds() {
        sub_bytes(&mut q);
        sub_bytes_nots(&mut q);
        shift_rows(&mut q);
        mix_columns(&mut q);
        add_round_key(&mut q, xk.round(r));
    }
    sub_bytes(&mut q);
    sub_bytes_nots(&mut q);
    shift_rows(&mut q);
    add_round_key(&mut q, xk.round(xk.rounds()));
    let out = inv_bitslice(&q);
    q.zeroize();
    out
}

/// Decrypts a batch with the encryption schedule, walking the round keys
/// backwards and applying the algebraic inverse round function.
pub(crate) fn decrypt_batch(xk: &ExpandedSchedule, batch: Batch<'_>) -> [[u8; 16]; 2] {
    let (b0, b1) = batch.slots();
    let mut q = State::default();
    bitslice(&mut q, b0, b1);
    add_round_key(&mut q, xk.round(xk.rounds()));
    for r in (1..xk.rounds()).rev() {
        inv_shift_rows(&mut q);
        inv_sub_bytes(&mut q);
        add_round_key(&mut q, xk.round(r));
        inv_mix_columns(&mut q);
    }
    inv_shift_rows(&mut q);
    inv_sub_bytes(&mut q);
    add_round_key(&mut q, xk.round(0));
    let out = inv_bitslice(&q);
    q.zeroize();
    out
}

/// Contract check shared by every mode driver: equal lengths, whole blocks.
/// Violations are caller bugs and abort; they never come from untrusted
/// input.
pub(crate) fn check_buffers(input: &[u8], output: &[u8]) {
    assert_eq!(input.len(), output.len(), "input/output length mismatch");
    assert_eq!(
        input.len() % 16,
        0,
        "buffer length must be a multiple of the AES block size"
    );
}

#[inline]
pub(crate) fn xor16(a: &[u8; 16], b: &[u8; 16]) -> [u8; 16] {
    let mut out = [0u8; 16];
    for (o, (x, y)) in out.iter_mut().zip(a.iter().zip(b)) {
        *o = x ^ y;
    }
    out
}

#[inline]
pub(crate) fn block_at(buf: &[u8], i: usize) -> [u8; 16] {
    buf[16 * i..16 * i + 16].try_into().unwrap()
}

impl AesKey {
    /// Encrypts a single 16-byte block.
    pub fn encrypt_block(&self, input: &[u8; 16], output: &mut [u8; 16]) {
        let xk = self.expand();
        *output = encrypt_batch(&xk, Batch::Single(input))[0];
    }

    /// Decrypts a single 16-byte block.
    pub fn decrypt_block(&self, input: &[u8; 16], output: &mut [u8; 16]) {
        let xk = self.expand();
        *output = decrypt_batch(&xk, Batch::Single(input))[0];
    }
}

macro_rules! impl_block_cipher {
    ($name:ident, $keysize:ty, $doc:literal) => {
        #[doc = $doc]
        ///
        /// Adapter exposing the engine through the RustCrypto [`cipher`]
        /// traits for trait-generic call sites. The native [`AesKey`] API is
        /// the primary surface.
        #[derive(Zeroize, ZeroizeOnDrop)]
        pub struct $name(AesKey);

        impl KeySizeUser for $name {
            type KeySize = $keysize;
        }

        impl KeyInit for $name {
            fn new(key: &cipher::Key<Self>) -> Self {
                Self(AesKey::new(key.as_slice()))
            }
        }

        impl BlockSizeUser for $name {
            type BlockSize = U16;
        }

        impl BlockCipher for $name {}

        impl BlockEncrypt for $name {
            fn encrypt_with_backend(
                &self,
                _f: impl cipher::BlockClosure<BlockSize = Self::BlockSize>,
            ) {
                unimplemented!();
            }

            fn encrypt_block(&self, block: &mut cipher::Block<Self>) {
                let input: [u8; 16] = block.as_slice().try_into().unwrap();
                let mut out = [0u8; 16];
                self.0.encrypt_block(&input, &mut out);
                block.copy_from_slice(&out);
            }

            fn encrypt_block_b2b(
                &self,
                in_block: &cipher::Block<Self>,
                out_block: &mut cipher::Block<Self>,
            ) {
                let input: [u8; 16] = in_block.as_slice().try_into().unwrap();
                let mut out = [0u8; 16];
                self.0.encrypt_block(&input, &mut out);
                out_block.copy_from_slice(&out);
            }
        }

        impl BlockDecrypt for $name {
            fn decrypt_with_backend(
                &self,
                _f: impl cipher::BlockClosure<BlockSize = Self::BlockSize>,
            ) {
                unimplemented!();
            }

            fn decrypt_block(&self, block: &mut cipher::Block<Self>) {
                let input: [u8; 16] = block.as_slice().try_into().unwrap();
                let mut out = [0u8; 16];
                self.0.decrypt_block(&input, &mut out);
                block.copy_from_slice(&out);
            }

            fn decrypt_block_b2b(
                &self,
                in_block: &cipher::Block<Self>,
                out_block: &mut cipher::Block<Self>,
            ) {
                let input: [u8; 16] = in_block.as_slice().try_into().unwrap();
                let mut out = [0u8; 16];
                self.0.decrypt_block(&input, &mut out);
                out_block.copy_from_slice(&out);
            }
        }
    };
}

impl_block_cipher!(BsAes128, U16, "Bitsliced AES-128.");
impl_block_cipher!(BsAes192, U24, "Bitsliced AES-192.");
impl_block_cipher!(BsAes256, U32, "Bitsliced AES-256.");

#[cfg(test)]
mod test {
    use super::*;

    use cipher::generic_array::GenericArray;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn kat(key: &[u8], plaintext: &str, ciphertext: &str) {
        let schedule = AesKey::new(key);
        let pt: [u8; 16] = hex::decode(plaintext).unwrap().try_into().unwrap();
        let expected: [u8; 16] = hex::decode(ciphertext).unwrap().try_into().unwrap();
        let mut ct = [0u8; 16];
        schedule.encrypt_block(&pt, &mut ct);
        assert_eq!(ct, expected);
        let mut back = [0u8; 16];
        schedule.decrypt_block(&ct, &mut back);
        assert_eq!(back, pt);
    }

    #[test]
    fn aes128_zero_vector() {
        kat(
            &[0u8; 16],
            "00000000000000000000000000000000",
            "66e94bd4ef8a2c3b884cfa59ca342b2e",
        );
    }

    #[test]
    fn fips197_examples() {
        let key: Vec<u8> = (0u8..32).collect();
        let pt = "00112233445566778899aabbccddeeff";
        kat(&key[..16], pt, "69c4e0d86a7b0430d8cdb78070b4c55a");
        kat(&key[..24], pt, "dda97ca4864cdfe06eaf70a0ec0d7191");
        kat(&key[..32], pt, "8ea2b7ca516745bfeafc49904b496089");
    }

    #[test]
    fn round_trip_all_key_sizes() {
        let mut rng = ChaCha8Rng::from_seed([4; 32]);
        for key_len in [16usize, 24, 32] {
            let mut key = vec![0u8; key_len];
            rng.fill_bytes(&mut key);
            let schedule = AesKey::new(&key);
            for _ in 0..16 {
                let mut pt = [0u8; 16];
                rng.fill_bytes(&mut pt);
                let mut ct = [0u8; 16];
                let mut back = [0u8; 16];
                schedule.encrypt_block(&pt, &mut ct);
                schedule.decrypt_block(&ct, &mut back);
                assert_eq!(back, pt);
                assert_ne!(ct, pt);
            }
        }
    }

    #[test]
    fn garbage_slot_never_influences_real_block() {
        let mut rng = ChaCha8Rng::from_seed([5; 32]);
        let key = AesKey::new(&[0x42u8; 16]);
        let xk = key.expand();
        let mut block = [0u8; 16];
        rng.fill_bytes(&mut block);

        let single = encrypt_batch(&xk, Batch::Single(&block))[0];
        for _ in 0..32 {
            let mut garbage = [0u8; 16];
            rng.fill_bytes(&mut garbage);
            let paired = encrypt_batch(&xk, Batch::Pair(&block, &garbage));
            assert_eq!(paired[0], single);
            let paired = decrypt_batch(&xk, Batch::Pair(&block, &garbage));
            assert_eq!(
                paired[0],
                decrypt_batch(&xk, Batch::Single(&block))[0]
            );
        }
    }

    #[test]
    fn pair_slots_are_independent() {
        let key = AesKey::new(&[7u8; 24]);
        let xk = key.expand();
        let a = [0x11u8; 16];
        let b = [0xeeu8; 16];
        let out = encrypt_batch(&xk, Batch::Pair(&a, &b));
        assert_eq!(out[0], encrypt_batch(&xk, Batch::Single(&a))[0]);
        assert_eq!(out[1], encrypt_batch(&xk, Batch::Pair(&b, &b))[0]);
    }

    #[test]
    fn cipher_trait_adapters_match_native_api() {
        let raw: Vec<u8> = (100u8..132).collect();

        let aes = BsAes256::new(GenericArray::from_slice(&raw));
        let native = AesKey::new(&raw);

        let mut block = GenericArray::clone_from_slice(&[0x3cu8; 16]);
        aes.encrypt_block(&mut block);
        let mut expected = [0u8; 16];
        native.encrypt_block(&[0x3cu8; 16], &mut expected);
        assert_eq!(block.as_slice(), &expected);

        aes.decrypt_block(&mut block);
        assert_eq!(block.as_slice(), &[0x3cu8; 16]);
    }
}
