//! SNOW-Vi Bit-Exact Reference Model
//!
//! A software model of the SNOW-Vi stream cipher ("SNOW-Vi: an extreme
//! performance variant of SNOW-V for lower grade CPUs", Ekdahl, Johansson,
//! Maximov, Yang) written to be compared register-for-register against a
//! hardware implementation.
//!
//! The model is exposed two ways:
//!
//! - [`SnowViCore`] is the reference model proper: [`initialize`], [`step`],
//!   [`keystream_word`] and [`snapshot`], plus a traced initializer that
//!   reports the registers after every warm-up round.
//! - [`SnowVi`] wraps it in the `cipher` crate traits, so it can be used as
//!   an ordinary stream cipher.
//!
//! # Byte order
//!
//! Everything is little-endian. LFSR cell `a_i` is key/IV bytes
//! `2i, 2i + 1`, FSM lane `j` is bytes `4j..4j + 4`, and keystream bytes are
//! lane 0 first. A key given as 32-bit words uses word `i` =
//! `u32::from_le_bytes(key[4i..4i + 4])`.
//!
//! # Example
//! ```
//! use snow_vi::{SnowVi, SnowViCore, StreamMode};
//! use snow_vi::cipher::{KeyIvInit, StreamCipher};
//!
//! let key = [0u8; 32];
//! let iv = [0u8; 16];
//!
//! let model = SnowViCore::<StreamMode>::initialize(&key, &iv).unwrap();
//! assert_eq!(model.keystream_word()[0], 0xe119_1750);
//!
//! let mut buffer = [0u8; 16];
//! let mut cipher = SnowVi::new(&key.into(), &iv.into());
//! cipher.apply_keystream(&mut buffer);
//! assert_eq!(buffer, model.keystream_bytes());
//! ```
//!
//! [`initialize`]: SnowViCore::initialize
//! [`step`]: SnowViCore::step
//! [`keystream_word`]: SnowViCore::keystream_word
//! [`snapshot`]: SnowViCore::snapshot

#![no_std]
#![deny(unsafe_code)]

pub use cipher; // Re-export cipher crate for downstream users

pub use crate::model::{InitPhase, KeystreamWords, SnowViCore};
pub use crate::error::Error;
pub use crate::snapshot::{SNAPSHOT_BYTES, Snapshot};
pub use crate::state::CipherState;

// --- Mode Abstraction ---

/// Selects how the lower half of LFSR-B is loaded, the only difference
/// between the SNOW-Vi modes at initialization.
pub trait SnowViVariant: Clone {
    /// Cells `(b7, ..., b0)` after key/IV loading, `b0` first.
    const LFSR_B_LOW: [u16; 8];
    /// Algorithm name reported through `cipher::AlgorithmName`.
    const NAME: &'static str;
}

/// Plain keystream generation: `(b7, ..., b0)` start at zero.
#[derive(Clone, Debug)]
pub struct StreamMode;
impl SnowViVariant for StreamMode {
    const LFSR_B_LOW: [u16; 8] = [0; 8];
    const NAME: &'static str = "SNOW-Vi";
}

/// Initialization of the AEAD mode: `(b7, ..., b0)` hold the ASCII string
/// `"AlexEkd JingThom"`. Only the keystream generator is modelled; the
/// GHASH layer on top of it is not part of this crate.
#[derive(Clone, Debug)]
pub struct AeadMode;
impl SnowViVariant for AeadMode {
    const LFSR_B_LOW: [u16; 8] = le_cells(b"AlexEkd JingThom");
    const NAME: &'static str = "SNOW-Vi-AEAD";
}

const fn le_cells(bytes: &[u8; 16]) -> [u16; 8] {
    let mut cells = [0u16; 8];
    let mut i = 0;
    while i < 8 {
        cells[i] = u16::from_le_bytes([bytes[2 * i], bytes[2 * i + 1]]);
        i += 1;
    }
    cells
}

// --- Reference Model ---

pub(crate) mod model;
pub(crate) mod state;

// --- Round Functions ---
pub(crate) mod aesr;
pub(crate) mod lfsr;

// --- Software Backend ---
pub(crate) mod backends;

mod error;
mod snapshot;

// --- Constants ---

/// Key size in bytes (256 bits).
pub const KEY_BYTES: usize = 32;
/// IV size in bytes (128 bits).
pub const IV_BYTES: usize = 16;
/// Key size in 32-bit words.
pub const KEY_WORDS: usize = KEY_BYTES / 4;
/// IV size in 32-bit words.
pub const IV_WORDS: usize = IV_BYTES / 4;
/// Size of one keystream symbol in bytes (128 bits).
pub const KEYSTREAM_BYTES: usize = 16;
/// Number of 16-bit cells in each LFSR.
pub const LFSR_CELLS: usize = 16;
/// Warm-up rounds run by the initialization before keystream is available.
pub const INIT_ROUNDS: usize = 16;

// --- Convenience Type Aliases for Users ---
pub type SnowVi = cipher::StreamCipherCoreWrapper<SnowViCore<StreamMode>>;
pub type SnowViAead = cipher::StreamCipherCoreWrapper<SnowViCore<AeadMode>>;

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::{AeadMode, SnowVi, SnowViAead, SnowViVariant};
    use cipher::{KeyIvInit, StreamCipher};

    #[test]
    fn test_snow_vi_encryption_decryption() {
        let key = [0x01; 32];
        let iv = [0x02; 16];
        let mut plaintext = *b"This is a test message for the SNOW-Vi stream cipher.";
        let original_plaintext = plaintext;
        let mut cipher = SnowVi::new(&key.into(), &iv.into());
        cipher.apply_keystream(&mut plaintext);
        assert_ne!(original_plaintext, plaintext);
        let mut cipher = SnowVi::new(&key.into(), &iv.into());
        cipher.apply_keystream(&mut plaintext);
        assert_eq!(original_plaintext, plaintext);
    }

    #[test]
    fn test_snow_vi_chunked_keystream() {
        let key = [0x03; 32];
        let iv = [0x04; 16];
        let mut data1 = [0u8; 128];
        let mut data2 = [0u8; 128];
        let mut cipher1 = SnowVi::new(&key.into(), &iv.into());
        cipher1.apply_keystream(&mut data1);
        let mut cipher2 = SnowVi::new(&key.into(), &iv.into());
        for chunk in data2.chunks_mut(7) {
            cipher2.apply_keystream(chunk);
        }
        assert_eq!(data1, data2);
        assert_ne!(data1[..64], data1[64..]);
    }

    #[test]
    fn test_modes_diverge() {
        let key = [0x05; 32];
        let iv = [0x06; 16];
        let mut plain = [0u8; 32];
        let mut aead = [0u8; 32];
        SnowVi::new(&key.into(), &iv.into()).apply_keystream(&mut plain);
        SnowViAead::new(&key.into(), &iv.into()).apply_keystream(&mut aead);
        assert_ne!(plain, aead);
    }

    #[test]
    fn test_aead_constant_spells_authors() {
        assert_eq!(
            AeadMode::LFSR_B_LOW,
            [0x6C41, 0x7865, 0x6B45, 0x2064, 0x694A, 0x676E, 0x6854, 0x6D6F]
        );
    }
}
