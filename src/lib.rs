#![doc = include_str!("../README.md")]
//! ## Design notes
//!
//! - The core transform works on a "quad": eight 32-bit words holding two
//!   interleaved blocks in bit-transposed form. Modes that can pipeline
//!   (CBC decryption, XTS, CCM) push two blocks per pass; single-block work
//!   pairs the real block with a defined zero filler whose content cannot
//!   influence the result.
//! - The compact schedule is expanded into its bitsliced form on every call
//!   and scrubbed before returning, trading some throughput for less
//!   persistent key material in memory.
//! - Contract violations (bad key length, partial blocks) panic: they can
//!   only come from caller bugs, never from untrusted input. [`self_test`]
//!   is the only fallible operation.
//! - Every operation is synchronous, allocation-free and free of global
//!   state. An [`AesKey`] may be shared read-only across threads; each
//!   chaining-value buffer must be driven by one call at a time.

#![warn(missing_docs)]
#![warn(clippy::use_self)]

mod bitslice;
mod cbc;
mod ccm;
mod engine;
mod schedule;
mod selftest;
mod xts;

pub use cipher;
pub use engine::{BsAes128, BsAes192, BsAes256};
pub use schedule::AesKey;
pub use selftest::{SelfTestError, self_test};
