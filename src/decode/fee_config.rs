//! FeeConfig decoder — market-cap-tiered fee schedule consumed by the
//! PumpSwap simulator's tier-selection rule.
//!
//! The `(a,b,c)` mapping inside each 40-byte tier record is undocumented
//! upstream: this decoder fixes the field order
//! `(marketCapLamportsThreshold, coinCreatorFeeBps, lpFeeBps, protocolFeeBps, extraU64)`
//! — and reproduces it verbatim everywhere; see DESIGN.md.

use solana_sdk::pubkey::Pubkey;

use super::error::DecodeError;
use super::primitives::*;

pub const DISCRIMINATOR: [u8; 8] = [0x8f, 0x34, 0x92, 0xbb, 0xdb, 0x7b, 0x4c, 0x9b];
pub const MAX_FEE_TIERS: usize = 64;
const TIER_LEN: usize = 40;
const HEADER_LEN: usize = 65; // disc(8) + bump(1) + admin(32) + flatFees(24)
const VEC_LEN_PREFIX: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlatFees {
    pub lp_bps: u64,
    pub protocol_bps: u64,
    pub coin_creator_bps: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeTier {
    pub market_cap_lamports_threshold: u64,
    pub coin_creator_fee_bps: u64,
    pub lp_fee_bps: u64,
    pub protocol_fee_bps: u64,
    pub extra_u64: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeConfig {
    pub address: Pubkey,
    pub bump: u8,
    pub admin: Pubkey,
    pub flat_fees: FlatFees,
    /// Sorted ascending by `market_cap_lamports_threshold`.
    pub fee_tiers: Vec<FeeTier>,
}

impl FeeConfig {
    /// Lower-bound tier selection: returns the tier of maximum threshold
    /// `<= market_cap`, or the
    /// lowest tier if `market_cap` undercuts every threshold.
    pub fn select_tier(&self, market_cap: u64) -> Option<&FeeTier> {
        let mut best: Option<&FeeTier> = None;
        for tier in &self.fee_tiers {
            if tier.market_cap_lamports_threshold <= market_cap {
                best = Some(tier);
            } else {
                break;
            }
        }
        best.or_else(|| self.fee_tiers.first())
    }
}

pub fn decode(buf: &[u8], address: Pubkey) -> Result<FeeConfig, DecodeError> {
    check_discriminator(buf, DISCRIMINATOR)?;
    require_len(buf, HEADER_LEN + VEC_LEN_PREFIX)?;

    let bump = u8_at(buf, 8)?;
    let admin = pubkey_at(buf, 9)?;
    let flat_fees = FlatFees {
        lp_bps: u64_le(buf, 41)?,
        protocol_bps: u64_le(buf, 49)?,
        coin_creator_bps: u64_le(buf, 57)?,
    };

    let count = u32_le(buf, HEADER_LEN)? as usize;
    if count > MAX_FEE_TIERS {
        return Err(DecodeError::FieldOutOfRange {
            offset: HEADER_LEN,
            len: VEC_LEN_PREFIX,
        });
    }
    let tiers_start = HEADER_LEN + VEC_LEN_PREFIX;
    let tiers_bytes = count * TIER_LEN;
    require_len(buf, tiers_start + tiers_bytes)?;

    let mut fee_tiers = Vec::with_capacity(count);
    for i in 0..count {
        let base = tiers_start + i * TIER_LEN;
        fee_tiers.push(FeeTier {
            market_cap_lamports_threshold: u64_le(buf, base)?,
            coin_creator_fee_bps: u64_le(buf, base + 8)?,
            lp_fee_bps: u64_le(buf, base + 16)?,
            protocol_fee_bps: u64_le(buf, base + 24)?,
            extra_u64: u64_le(buf, base + 32)?,
        });
    }
    fee_tiers.sort_by_key(|t| t.market_cap_lamports_threshold);

    Ok(FeeConfig {
        address,
        bump,
        admin,
        flat_fees,
        fee_tiers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier_bytes(threshold: u64, coin: u64, lp: u64, protocol: u64) -> Vec<u8> {
        let mut v = Vec::with_capacity(TIER_LEN);
        v.extend_from_slice(&threshold.to_le_bytes());
        v.extend_from_slice(&coin.to_le_bytes());
        v.extend_from_slice(&lp.to_le_bytes());
        v.extend_from_slice(&protocol.to_le_bytes());
        v.extend_from_slice(&0u64.to_le_bytes());
        v
    }

    fn fixture(tiers: &[(u64, u64, u64, u64)]) -> Vec<u8> {
        let mut buf = vec![0u8; HEADER_LEN + VEC_LEN_PREFIX];
        buf[0..8].copy_from_slice(&DISCRIMINATOR);
        buf[HEADER_LEN..HEADER_LEN + VEC_LEN_PREFIX]
            .copy_from_slice(&(tiers.len() as u32).to_le_bytes());
        for &(t, c, l, p) in tiers {
            buf.extend_from_slice(&tier_bytes(t, c, l, p));
        }
        buf
    }

    #[test]
    fn decodes_and_sorts_tiers_ascending() {
        // stored out of order on purpose
        let buf = fixture(&[(300, 1, 1, 1), (100, 2, 2, 2), (200, 3, 3, 3)]);
        let cfg = decode(&buf, Pubkey::new_unique()).unwrap();
        let thresholds: Vec<u64> = cfg
            .fee_tiers
            .iter()
            .map(|t| t.market_cap_lamports_threshold)
            .collect();
        assert_eq!(thresholds, vec![100, 200, 300]);
    }

    #[test]
    fn select_tier_picks_highest_threshold_leq_market_cap() {
        let buf = fixture(&[(100, 2, 2, 2), (200, 3, 3, 3), (300, 1, 1, 1)]);
        let cfg = decode(&buf, Pubkey::new_unique()).unwrap();
        let tier = cfg.select_tier(250).unwrap();
        assert_eq!(tier.market_cap_lamports_threshold, 200);
    }

    #[test]
    fn select_tier_falls_back_to_lowest_when_under_all_thresholds() {
        let buf = fixture(&[(100, 2, 2, 2), (200, 3, 3, 3)]);
        let cfg = decode(&buf, Pubkey::new_unique()).unwrap();
        let tier = cfg.select_tier(50).unwrap();
        assert_eq!(tier.market_cap_lamports_threshold, 100);
    }

    #[test]
    fn rejects_tier_count_over_max() {
        let mut buf = vec![0u8; HEADER_LEN + VEC_LEN_PREFIX];
        buf[0..8].copy_from_slice(&DISCRIMINATOR);
        buf[HEADER_LEN..HEADER_LEN + VEC_LEN_PREFIX].copy_from_slice(&65u32.to_le_bytes());
        let err = decode(&buf, Pubkey::new_unique()).unwrap_err();
        assert!(matches!(err, DecodeError::FieldOutOfRange { .. }));
    }
}
