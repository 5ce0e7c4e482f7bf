//! Decoder failure taxonomy. Every decoder in this module returns one of
//! these variants rather than panicking — mirrors the typed-error style in
//! `other_examples/83e325bc_screenerbotio-ScreenerBot__src-pairs-decoders-types.rs.rs`'s
//! `DecoderError`, tightened to the exact variant set this module's
//! decoders need.

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("discriminator mismatch: expected {expected:?}, got {actual:?}")]
    DiscriminatorMismatch {
        expected: [u8; 8],
        actual: [u8; 8],
    },

    #[error("owner mismatch: expected {expected}, got {actual}")]
    OwnerMismatch { expected: Pubkey, actual: Pubkey },

    #[error("buffer too short: need at least {expected} bytes, got {actual}")]
    LengthTooShort { expected: usize, actual: usize },

    #[error("buffer length mismatch: expected exactly {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("field out of range: offset {offset}, width {len}")]
    FieldOutOfRange { offset: usize, len: usize },
}
