//! AmmConfig decoder — concentrated-liquidity fee/tick-spacing config,
//! named as a dependency of every RaydiumClmm `FrozenTopology`.

use solana_sdk::pubkey::Pubkey;

use super::error::DecodeError;
use super::primitives::*;

pub const DISCRIMINATOR: [u8; 8] = [0xda, 0xf4, 0x21, 0x68, 0xcb, 0xcb, 0x2b, 0x6f];
pub const MIN_LEN: usize = 117;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmmConfig {
    pub address: Pubkey,
    pub trade_fee_rate: u32,
    pub tick_spacing: u16,
    pub protocol_fee_rate: u32,
    pub fund_fee_rate: u32,
    pub owner: Pubkey,
}

pub fn decode(buf: &[u8], address: Pubkey) -> Result<AmmConfig, DecodeError> {
    check_discriminator(buf, DISCRIMINATOR)?;
    require_len(buf, MIN_LEN)?;

    let trade_fee_rate = u32_le(buf, 8)?;
    let tick_spacing = u16_le(buf, 12)?;
    let protocol_fee_rate = u32_le(buf, 14)?;
    let fund_fee_rate = u32_le(buf, 18)?;
    let owner = pubkey_at(buf, 22)?;

    Ok(AmmConfig {
        address,
        trade_fee_rate,
        tick_spacing,
        protocol_fee_rate,
        fund_fee_rate,
        owner,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_fee_fields() {
        let mut buf = vec![0u8; MIN_LEN];
        buf[0..8].copy_from_slice(&DISCRIMINATOR);
        buf[8..12].copy_from_slice(&2_500u32.to_le_bytes());
        buf[12..14].copy_from_slice(&60u16.to_le_bytes());
        let config = decode(&buf, Pubkey::new_unique()).unwrap();
        assert_eq!(config.trade_fee_rate, 2_500);
        assert_eq!(config.tick_spacing, 60);
    }
}
