//! MeteoraDlmm pair decoder — discrete-liquidity bin-based AMM.
//!
//! Field grouping (static params / variable params / routing / pubkeys)
//! mirrors the real on-chain `LbPair` layout confirmed by
//! `other_examples/…__src-meteora-accounts.rs.rs`; the fields are packed
//! tightly with no inter-group padding beyond what is named explicitly.

use solana_sdk::pubkey::Pubkey;

use super::error::DecodeError;
use super::primitives::*;

pub const DISCRIMINATOR: [u8; 8] = [0x21, 0x0b, 0x31, 0x62, 0xb5, 0x65, 0xb1, 0x0d];
pub const MIN_LEN: usize = 904;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticParameters {
    pub base_factor: u16,
    pub filter_period: u16,
    pub decay_period: u16,
    pub reduction_factor: u16,
    pub variable_fee_control: u32,
    pub max_volatility_accumulator: u32,
    pub min_bin_id: i32,
    pub max_bin_id: i32,
    pub protocol_share: u16,
    pub base_fee_power_factor: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableParameters {
    pub volatility_accumulator: u32,
    pub volatility_reference: u32,
    pub index_reference: i32,
    pub last_update_timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeteoraDlmmPair {
    pub address: Pubkey,
    pub static_params: StaticParameters,
    pub variable_params: VariableParameters,
    pub bump_seed: u8,
    pub pair_type: u8,
    pub active_id: i32,
    pub bin_step: u16,
    pub status: u8,
    pub token_x_mint: Pubkey,
    pub token_y_mint: Pubkey,
    pub reserve_x: Pubkey,
    pub reserve_y: Pubkey,
    pub oracle: Pubkey,
    pub bin_array_bitmap: [u8; 128],
}

pub fn decode(buf: &[u8], address: Pubkey) -> Result<MeteoraDlmmPair, DecodeError> {
    check_discriminator(buf, DISCRIMINATOR)?;
    require_len(buf, MIN_LEN)?;

    let static_params = StaticParameters {
        base_factor: u16_le(buf, 8)?,
        filter_period: u16_le(buf, 10)?,
        decay_period: u16_le(buf, 12)?,
        reduction_factor: u16_le(buf, 14)?,
        variable_fee_control: u32_le(buf, 16)?,
        max_volatility_accumulator: u32_le(buf, 20)?,
        min_bin_id: i32_le(buf, 24)?,
        max_bin_id: i32_le(buf, 28)?,
        protocol_share: u16_le(buf, 32)?,
        base_fee_power_factor: u8_at(buf, 34)?,
    };

    let variable_params = VariableParameters {
        volatility_accumulator: u32_le(buf, 35)?,
        volatility_reference: u32_le(buf, 39)?,
        index_reference: i32_le(buf, 43)?,
        last_update_timestamp: i64_le(buf, 47)?,
    };

    let bump_seed = u8_at(buf, 55)?;
    let pair_type = u8_at(buf, 56)?;
    let active_id = i32_le(buf, 57)?;
    let bin_step = u16_le(buf, 61)?;
    let status = u8_at(buf, 63)?;

    let token_x_mint = pubkey_at(buf, 64)?;
    let token_y_mint = pubkey_at(buf, 96)?;
    let reserve_x = pubkey_at(buf, 128)?;
    let reserve_y = pubkey_at(buf, 160)?;
    let oracle = pubkey_at(buf, 192)?;

    let bitmap_slice = bytes_at(buf, 224, 128)?;
    let mut bin_array_bitmap = [0u8; 128];
    bin_array_bitmap.copy_from_slice(bitmap_slice);

    Ok(MeteoraDlmmPair {
        address,
        static_params,
        variable_params,
        bump_seed,
        pair_type,
        active_id,
        bin_step,
        status,
        token_x_mint,
        token_y_mint,
        reserve_x,
        reserve_y,
        oracle,
        bin_array_bitmap,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Vec<u8> {
        let mut buf = vec![0u8; MIN_LEN];
        buf[0..8].copy_from_slice(&DISCRIMINATOR);
        buf[8..10].copy_from_slice(&20u16.to_le_bytes()); // base_factor
        buf[61..63].copy_from_slice(&25u16.to_le_bytes()); // bin_step
        buf[57..61].copy_from_slice(&0i32.to_le_bytes()); // active_id
        buf
    }

    #[test]
    fn decodes_static_and_routing_fields() {
        let pair = decode(&fixture(), Pubkey::new_unique()).unwrap();
        assert_eq!(pair.static_params.base_factor, 20);
        assert_eq!(pair.bin_step, 25);
        assert_eq!(pair.active_id, 0);
    }

    #[test]
    fn rejects_short_buffer() {
        let buf = fixture()[..900].to_vec();
        let err = decode(&buf, Pubkey::new_unique()).unwrap_err();
        assert!(matches!(err, DecodeError::LengthTooShort { .. }));
    }
}
