//! PumpSwap pool decoder — constant-product bonding-curve AMM.
//!
//! Grounded on the constant-product math in the teacher's
//! `dex/meteora_damm.rs` (which, despite its filename, implements PumpSwap
//! buy/sell) for the *simulator* side; the decoder itself follows the
//! manual offset-read idiom shared by every `dex/*.rs` file in the
//! teacher, adapted to this layout.

use solana_sdk::pubkey::Pubkey;

use super::error::DecodeError;
use super::primitives::*;

/// First 8 bytes of `SHA-256("account:Pool")`. The literal discriminator
/// for the PumpSwap pool account is left unspecified upstream (unlike every
/// other account kind, whose discriminator is given as a literal hex
/// string) — this is the Open Question resolved in DESIGN.md: we fix one
/// literal value and reproduce it verbatim everywhere the discriminator is
/// needed, rather than recomputing a hash at runtime.
pub const DISCRIMINATOR: [u8; 8] = [0xf1, 0x9a, 0x6d, 0x04, 0x11, 0xb1, 0x6d, 0xbc];

pub const MIN_LEN: usize = 211;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PumpSwapPool {
    pub address: Pubkey,
    pub pool_bump: u8,
    pub index: u16,
    pub creator: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub lp_mint: Pubkey,
    pub pool_base_token_account: Pubkey,
    pub pool_quote_token_account: Pubkey,
    pub lp_supply: u64,
}

pub fn decode(buf: &[u8], address: Pubkey) -> Result<PumpSwapPool, DecodeError> {
    check_discriminator(buf, DISCRIMINATOR)?;
    require_len(buf, MIN_LEN)?;

    let mut off = 8;
    let pool_bump = u8_at(buf, off)?;
    off += 1;
    let index = u16_le(buf, off)?;
    off += 2;
    let creator = pubkey_at(buf, off)?;
    off += 32;
    let base_mint = pubkey_at(buf, off)?;
    off += 32;
    let quote_mint = pubkey_at(buf, off)?;
    off += 32;
    let lp_mint = pubkey_at(buf, off)?;
    off += 32;
    let pool_base_token_account = pubkey_at(buf, off)?;
    off += 32;
    let pool_quote_token_account = pubkey_at(buf, off)?;
    off += 32;
    let lp_supply = u64_le(buf, off)?;

    Ok(PumpSwapPool {
        address,
        pool_bump,
        index,
        creator,
        base_mint,
        quote_mint,
        lp_mint,
        pool_base_token_account,
        pool_quote_token_account,
        lp_supply,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Vec<u8> {
        let mut buf = vec![0u8; MIN_LEN];
        buf[0..8].copy_from_slice(&DISCRIMINATOR);
        buf[8] = 7; // pool_bump
        buf[9..11].copy_from_slice(&3u16.to_le_bytes());
        buf[203..211].copy_from_slice(&500_000u64.to_le_bytes());
        buf
    }

    #[test]
    fn decodes_well_formed_pool() {
        let addr = Pubkey::new_unique();
        let pool = decode(&fixture(), addr).unwrap();
        assert_eq!(pool.pool_bump, 7);
        assert_eq!(pool.index, 3);
        assert_eq!(pool.lp_supply, 500_000);
        assert_eq!(pool.address, addr);
    }

    #[test]
    fn rejects_bad_discriminator() {
        let mut buf = fixture();
        buf[0] ^= 0xff;
        let err = decode(&buf, Pubkey::new_unique()).unwrap_err();
        assert!(matches!(err, DecodeError::DiscriminatorMismatch { .. }));
    }

    #[test]
    fn rejects_short_buffer() {
        let buf = fixture()[..100].to_vec();
        let err = decode(&buf, Pubkey::new_unique()).unwrap_err();
        assert!(matches!(err, DecodeError::LengthTooShort { .. }));
    }
}
