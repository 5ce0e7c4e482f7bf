//! RaydiumClmm pool decoder — concentrated liquidity, tick-based AMM.
//!
//! The teacher's `dex/raydium_clmm.rs` grounds the manual byte-offset
//! idiom (including its own `padding3`/`padding4` u16 fields between
//! `tick_current` and the fee-growth accumulators), but its concrete
//! offsets include a leading `bump`/`owner` pair that this account's
//! layout omits — the offsets below win.

use solana_sdk::pubkey::Pubkey;

use super::error::DecodeError;
use super::primitives::*;

pub const DISCRIMINATOR: [u8; 8] = [0xf7, 0xed, 0xe3, 0xf5, 0xd7, 0xc3, 0xde, 0x46];
pub const EXACT_LEN: usize = 1544;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaydiumClmmPool {
    pub address: Pubkey,
    pub amm_config: Pubkey,
    pub token_mint_0: Pubkey,
    pub token_mint_1: Pubkey,
    pub token_vault_0: Pubkey,
    pub token_vault_1: Pubkey,
    pub mint_decimals_0: u8,
    pub mint_decimals_1: u8,
    pub tick_spacing: u16,
    pub liquidity: u128,
    pub sqrt_price_x64: u128,
    pub tick_current: i32,
    pub fee_growth_global_0_x64: u128,
    pub fee_growth_global_1_x64: u128,
    pub protocol_fees_token_0: u64,
    pub protocol_fees_token_1: u64,
    pub status: u8,
    pub tick_array_bitmap: [u64; 16],
}

pub fn decode(buf: &[u8], address: Pubkey) -> Result<RaydiumClmmPool, DecodeError> {
    check_discriminator(buf, DISCRIMINATOR)?;
    require_exact_len(buf, EXACT_LEN)?;

    let amm_config = pubkey_at(buf, 8)?;
    let token_mint_0 = pubkey_at(buf, 40)?;
    let token_mint_1 = pubkey_at(buf, 72)?;
    let token_vault_0 = pubkey_at(buf, 104)?;
    let token_vault_1 = pubkey_at(buf, 136)?;
    let mint_decimals_0 = u8_at(buf, 168)?;
    let mint_decimals_1 = u8_at(buf, 169)?;
    let tick_spacing = u16_le(buf, 170)?;
    let liquidity = u128_le(buf, 172)?;
    let sqrt_price_x64 = u128_le(buf, 188)?;
    let tick_current = i32_le(buf, 204)?;
    // padding3 @208..210, padding4 @210..212 — skipped, never returned.
    let fee_growth_global_0_x64 = u128_le(buf, 212)?;
    let fee_growth_global_1_x64 = u128_le(buf, 228)?;
    let protocol_fees_token_0 = u64_le(buf, 244)?;
    let protocol_fees_token_1 = u64_le(buf, 252)?;
    let status = u8_at(buf, 260)?;

    let mut tick_array_bitmap = [0u64; 16];
    for (i, slot) in tick_array_bitmap.iter_mut().enumerate() {
        *slot = u64_le(buf, 261 + i * 8)?;
    }

    Ok(RaydiumClmmPool {
        address,
        amm_config,
        token_mint_0,
        token_mint_1,
        token_vault_0,
        token_vault_1,
        mint_decimals_0,
        mint_decimals_1,
        tick_spacing,
        liquidity,
        sqrt_price_x64,
        tick_current,
        fee_growth_global_0_x64,
        fee_growth_global_1_x64,
        protocol_fees_token_0,
        protocol_fees_token_1,
        status,
        tick_array_bitmap,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Vec<u8> {
        let mut buf = vec![0u8; EXACT_LEN];
        buf[0..8].copy_from_slice(&DISCRIMINATOR);
        buf[170..172].copy_from_slice(&60u16.to_le_bytes());
        buf[172..188].copy_from_slice(&1_000_000u128.to_le_bytes());
        buf[204..208].copy_from_slice(&(-120i32).to_le_bytes());
        // poison the padding to prove it's skipped, not misread as data
        buf[208..212].copy_from_slice(&[0xaa, 0xaa, 0xaa, 0xaa]);
        buf[212..228].copy_from_slice(&42u128.to_le_bytes());
        buf
    }

    #[test]
    fn decodes_and_skips_padding() {
        let pool = decode(&fixture(), Pubkey::new_unique()).unwrap();
        assert_eq!(pool.tick_spacing, 60);
        assert_eq!(pool.liquidity, 1_000_000);
        assert_eq!(pool.tick_current, -120);
        assert_eq!(pool.fee_growth_global_0_x64, 42);
    }

    #[test]
    fn rejects_wrong_length() {
        let buf = fixture()[..1543].to_vec();
        let err = decode(&buf, Pubkey::new_unique()).unwrap_err();
        assert!(matches!(err, DecodeError::LengthMismatch { .. }));
    }
}
