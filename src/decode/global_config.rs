//! GlobalConfig decoder — constant-product fee policy fallback used by
//! the PumpSwap simulator when a pool has no FeeConfig.

use solana_sdk::pubkey::Pubkey;

use super::error::DecodeError;
use super::primitives::*;

pub const DISCRIMINATOR: [u8; 8] = [0x95, 0x08, 0x9c, 0xca, 0xa0, 0xfc, 0xb0, 0xd9];
pub const MIN_LEN: usize = 321;
const NUM_FEE_RECIPIENTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalConfig {
    pub address: Pubkey,
    pub admin: Pubkey,
    pub lp_fee_basis_points: u64,
    pub protocol_fee_basis_points: u64,
    pub disable_flags: u8,
    pub protocol_fee_recipients: [Pubkey; NUM_FEE_RECIPIENTS],
    pub coin_creator_fee_basis_points: u64,
}

pub fn decode(buf: &[u8], address: Pubkey) -> Result<GlobalConfig, DecodeError> {
    check_discriminator(buf, DISCRIMINATOR)?;
    require_len(buf, MIN_LEN)?;

    let admin = pubkey_at(buf, 8)?;
    let lp_fee_basis_points = u64_le(buf, 40)?;
    let protocol_fee_basis_points = u64_le(buf, 48)?;
    let disable_flags = u8_at(buf, 56)?;

    let mut protocol_fee_recipients = [Pubkey::default(); NUM_FEE_RECIPIENTS];
    for (i, slot) in protocol_fee_recipients.iter_mut().enumerate() {
        *slot = pubkey_at(buf, 57 + i * 32)?;
    }

    let coin_creator_fee_basis_points = u64_le(buf, 57 + NUM_FEE_RECIPIENTS * 32)?;

    Ok(GlobalConfig {
        address,
        admin,
        lp_fee_basis_points,
        protocol_fee_basis_points,
        disable_flags,
        protocol_fee_recipients,
        coin_creator_fee_basis_points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_fee_bps_and_recipients() {
        let mut buf = vec![0u8; MIN_LEN];
        buf[0..8].copy_from_slice(&DISCRIMINATOR);
        buf[40..48].copy_from_slice(&100u64.to_le_bytes());
        buf[48..56].copy_from_slice(&5u64.to_le_bytes());
        buf[313..321].copy_from_slice(&50u64.to_le_bytes());
        let cfg = decode(&buf, Pubkey::new_unique()).unwrap();
        assert_eq!(cfg.lp_fee_basis_points, 100);
        assert_eq!(cfg.protocol_fee_basis_points, 5);
        assert_eq!(cfg.coin_creator_fee_basis_points, 50);
    }
}
