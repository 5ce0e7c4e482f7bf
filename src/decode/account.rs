//! Pool kind dispatch. Ties the four pool/pair decoders into one closed
//! `Pool` variant set and implements the identification rule:
//! discriminator match first, falling back to `(ownerProgram,
//! exactDataLength)` for the one venue with no discriminator (RaydiumV4).

use solana_sdk::pubkey::Pubkey;

use super::error::DecodeError;
use super::primitives::check_discriminator;
use super::{meteora_dlmm, pumpswap, raydium_clmm, raydium_v4};
use super::meteora_dlmm::MeteoraDlmmPair;
use super::pumpswap::PumpSwapPool;
use super::raydium_clmm::RaydiumClmmPool;
use super::raydium_v4::RaydiumV4Pool;

/// Program ids the dispatcher uses to recognize RaydiumV4, the one venue
/// whose pool account carries no Anchor discriminator. Supplied by the
/// caller (config) rather than hardcoded, since these are deployment
/// constants, not data this crate derives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramIds {
    pub raydium_v4: Pubkey,
}

/// Closed set of decoded pool/pair records — exactly these four venues
/// and nothing else is in scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pool {
    PumpSwap(PumpSwapPool),
    RaydiumV4(RaydiumV4Pool),
    RaydiumClmm(RaydiumClmmPool),
    MeteoraDlmm(MeteoraDlmmPair),
}

impl Pool {
    pub fn address(&self) -> Pubkey {
        match self {
            Pool::PumpSwap(p) => p.address,
            Pool::RaydiumV4(p) => p.address,
            Pool::RaydiumClmm(p) => p.address,
            Pool::MeteoraDlmm(p) => p.address,
        }
    }
}

/// Identifies and decodes a pool account. Tries each discriminator-bearing
/// venue in turn, then falls back to RaydiumV4's owner/length check.
///
/// `owner` is the account's owning program, as reported by the source
/// (`AccountUpdate.owner`) — never derived from the data itself.
pub fn decode_pool(
    buf: &[u8],
    address: Pubkey,
    owner: &Pubkey,
    programs: &ProgramIds,
) -> Result<Pool, DecodeError> {
    if check_discriminator(buf, pumpswap::DISCRIMINATOR).is_ok() {
        return pumpswap::decode(buf, address).map(Pool::PumpSwap);
    }
    if check_discriminator(buf, raydium_clmm::DISCRIMINATOR).is_ok() {
        return raydium_clmm::decode(buf, address).map(Pool::RaydiumClmm);
    }
    if check_discriminator(buf, meteora_dlmm::DISCRIMINATOR).is_ok() {
        return meteora_dlmm::decode(buf, address).map(Pool::MeteoraDlmm);
    }
    if owner == &programs.raydium_v4 && buf.len() == raydium_v4::EXACT_LEN {
        return raydium_v4::decode(buf, address, owner, &programs.raydium_v4).map(Pool::RaydiumV4);
    }

    let actual = if buf.len() >= 8 {
        buf[0..8].try_into().unwrap()
    } else {
        [0u8; 8]
    };
    Err(DecodeError::DiscriminatorMismatch {
        expected: pumpswap::DISCRIMINATOR,
        actual,
    })
}
