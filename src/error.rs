//! Error types.
use core::fmt;

use crate::{IV_BYTES, KEY_BYTES};

/// Errors reported when a key or IV of the wrong size is handed to the model.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The key was not 256 bits. `len` is the length that was supplied,
    /// in the unit of the call (bytes or 32-bit words).
    InvalidKeyLength { len: usize },
    /// The IV was not 128 bits. `len` is the length that was supplied.
    InvalidIvLength { len: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidKeyLength { len } => {
                write!(f, "invalid key length {len}, SNOW-Vi takes a {KEY_BYTES}-byte key")
            }
            Error::InvalidIvLength { len } => {
                write!(f, "invalid IV length {len}, SNOW-Vi takes a {IV_BYTES}-byte IV")
            }
        }
    }
}

impl core::error::Error for Error {}
