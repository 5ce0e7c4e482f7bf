//! Constant-product swap with tiered fees — PumpSwap-shaped. Fee
//! placement is direction-dependent: output-side fee when selling base
//! for quote, input-side fee when buying base with quote.

use crate::decode::fee_config::FeeConfig;
use crate::decode::global_config::GlobalConfig;
use crate::types::{FeeBreakdown, FeesBps, SwapDirection};

use super::bps::{bps_of, floor_mul_div, split_lp_protocol};
use super::error::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapOutcome {
    pub amount_out: u64,
    pub fee_breakdown: FeeBreakdown,
}

/// Tier/flat/global fallback chain: a non-empty `FeeConfig.feeTiers` wins
/// via lower-bound selection on `marketCap`; a present-but-tierless
/// `FeeConfig` falls back to its `flatFees`; no `FeeConfig` at all falls
/// back to `GlobalConfig`; neither present means zero fees, the only
/// fallback left once both named sources are absent.
pub fn resolve_fees_bps(
    fee_config: Option<&FeeConfig>,
    global_config: Option<&GlobalConfig>,
    quote_reserve: u64,
    market_cap_hint_lamports: Option<u64>,
) -> FeesBps {
    if let Some(fc) = fee_config {
        if !fc.fee_tiers.is_empty() {
            let market_cap = market_cap_hint_lamports.unwrap_or(quote_reserve.saturating_mul(2));
            if let Some(tier) = fc.select_tier(market_cap) {
                return FeesBps {
                    lp_bps: tier.lp_fee_bps,
                    protocol_bps: tier.protocol_fee_bps,
                    coin_creator_bps: tier.coin_creator_fee_bps,
                };
            }
        }
        return FeesBps {
            lp_bps: fc.flat_fees.lp_bps,
            protocol_bps: fc.flat_fees.protocol_bps,
            coin_creator_bps: fc.flat_fees.coin_creator_bps,
        };
    }
    if let Some(gc) = global_config {
        return FeesBps {
            lp_bps: gc.lp_fee_basis_points,
            protocol_bps: gc.protocol_fee_basis_points,
            coin_creator_bps: gc.coin_creator_fee_basis_points,
        };
    }
    FeesBps::default()
}

pub fn simulate(
    amount_in: u64,
    base_reserve: u64,
    quote_reserve: u64,
    side: SwapDirection,
    fees_bps: FeesBps,
) -> Result<SwapOutcome, SimError> {
    if amount_in == 0 || base_reserve == 0 || quote_reserve == 0 {
        return Ok(SwapOutcome {
            amount_out: 0,
            fee_breakdown: FeeBreakdown::default(),
        });
    }

    let trade_bps = fees_bps.trade_fee_bps();
    let (reserve_in, reserve_out) = match side {
        SwapDirection::BaseToQuote => (base_reserve, quote_reserve),
        SwapDirection::QuoteToBase => (quote_reserve, base_reserve),
    };

    match side {
        SwapDirection::BaseToQuote => {
            let gross_out = floor_mul_div(reserve_out as u128, amount_in as u128, reserve_in as u128 + amount_in as u128)?;
            let fee_out = bps_of(gross_out, trade_bps)?;
            let amount_out = (gross_out - fee_out) as u64;
            let fee_out = fee_out as u64;
            let coin_creator = bps_of(gross_out, fees_bps.coin_creator_bps)? as u64;
            let (lp, protocol) = split_lp_protocol(fee_out, fees_bps.lp_bps, fees_bps.protocol_bps);
            Ok(SwapOutcome {
                amount_out,
                fee_breakdown: FeeBreakdown {
                    lp,
                    protocol,
                    coin_creator,
                },
            })
        }
        SwapDirection::QuoteToBase => {
            let fee_in = bps_of(amount_in as u128, trade_bps)?;
            let amount_in_after_fee = amount_in as u128 - fee_in;
            let amount_out = floor_mul_div(
                reserve_out as u128,
                amount_in_after_fee,
                reserve_in as u128 + amount_in_after_fee,
            )? as u64;
            let fee_in = fee_in as u64;
            let coin_creator = bps_of(amount_in as u128, fees_bps.coin_creator_bps)? as u64;
            let (lp, protocol) = split_lp_protocol(fee_in, fees_bps.lp_bps, fees_bps.protocol_bps);
            Ok(SwapOutcome {
                amount_out,
                fee_breakdown: FeeBreakdown {
                    lp,
                    protocol,
                    coin_creator,
                },
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sell_matches_seed_scenario_1() {
        let fees = FeesBps {
            lp_bps: 20,
            protocol_bps: 5,
            coin_creator_bps: 0,
        };
        let out = simulate(1_000_000, 1_000_000_000_000, 2_000_000_000, SwapDirection::BaseToQuote, fees)
            .unwrap();
        let gross_out = (2_000_000_000u128 * 1_000_000 / 1_000_001_000_000) as u64;
        let fee_out = gross_out * 25 / 10_000;
        assert_eq!(out.amount_out, gross_out - fee_out);
        assert_eq!(out.fee_breakdown.lp + out.fee_breakdown.protocol, fee_out);
    }

    #[test]
    fn buy_matches_seed_scenario_2() {
        let fees = FeesBps {
            lp_bps: 20,
            protocol_bps: 5,
            coin_creator_bps: 0,
        };
        let out = simulate(1_000_000, 1_000_000_000_000, 2_000_000_000, SwapDirection::QuoteToBase, fees)
            .unwrap();
        let after_fee = 1_000_000 - (1_000_000 * 25 / 10_000);
        assert_eq!(after_fee, 997_500);
        let expected = (1_000_000_000_000u128 * after_fee as u128 / (2_000_000_000u128 + after_fee as u128)) as u64;
        assert_eq!(out.amount_out, expected);
    }

    #[test]
    fn zero_amount_in_is_a_no_op() {
        let out = simulate(0, 1_000, 1_000, SwapDirection::BaseToQuote, FeesBps::default()).unwrap();
        assert_eq!(out.amount_out, 0);
        assert_eq!(out.fee_breakdown, FeeBreakdown::default());
    }

    #[test]
    fn zero_reserve_yields_zero_output() {
        let out = simulate(100, 0, 1_000, SwapDirection::BaseToQuote, FeesBps::default()).unwrap();
        assert_eq!(out.amount_out, 0);
    }

    #[test]
    fn monotonic_in_amount_in() {
        let fees = FeesBps {
            lp_bps: 20,
            protocol_bps: 5,
            coin_creator_bps: 0,
        };
        let small = simulate(100, 1_000_000, 1_000_000, SwapDirection::BaseToQuote, fees).unwrap();
        let big = simulate(200, 1_000_000, 1_000_000, SwapDirection::BaseToQuote, fees).unwrap();
        assert!(big.amount_out >= small.amount_out);
    }

    #[test]
    fn select_tier_resolves_before_flat_fallback() {
        use crate::decode::fee_config::{FeeConfig, FeeTier, FlatFees};
        use solana_sdk::pubkey::Pubkey;

        let fc = FeeConfig {
            address: Pubkey::new_unique(),
            bump: 0,
            admin: Pubkey::new_unique(),
            flat_fees: FlatFees {
                lp_bps: 1,
                protocol_bps: 1,
                coin_creator_bps: 1,
            },
            fee_tiers: vec![FeeTier {
                market_cap_lamports_threshold: 0,
                coin_creator_fee_bps: 0,
                lp_fee_bps: 20,
                protocol_fee_bps: 5,
                extra_u64: 0,
            }],
        };
        let fees = resolve_fees_bps(Some(&fc), None, 1_000, None);
        assert_eq!(fees.lp_bps, 20);
        assert_eq!(fees.protocol_bps, 5);
    }
}
