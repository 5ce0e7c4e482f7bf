//! Constant-product swap with effective reserves — RaydiumV4-shaped.
//! Order-book open-orders totals and pending-PnL reservations adjust the
//! raw vault balances before the constant-product formula runs.

use crate::types::{FeeBreakdown, SwapDirection};

use super::bps::{floor_mul_div, sat_sub};
use super::error::SimError;
use super::pumpswap::SwapOutcome;

/// `sat_sub(vault + openOrdersTotal, needTakePnl)`.
pub fn effective_reserve(vault_amount: u64, open_orders_total: u64, need_take_pnl: u64) -> u64 {
    sat_sub(
        vault_amount as u128 + open_orders_total as u128,
        need_take_pnl as u128,
    ) as u64
}

/// RaydiumV4 has a single numerator/denominator fee rate with no named
/// lp/protocol split (unlike PumpSwap's `FeesBps`) — the whole collected
/// fee is reported under `lp` in the returned breakdown, since the
/// shared `FeeBreakdown` shape gives no other bucket for it.
pub fn simulate(
    amount_in: u64,
    base_vault_amount: u64,
    quote_vault_amount: u64,
    open_orders_base_total: u64,
    open_orders_quote_total: u64,
    base_need_take_pnl: u64,
    quote_need_take_pnl: u64,
    swap_fee_numerator: u64,
    swap_fee_denominator: u64,
    side: SwapDirection,
) -> Result<SwapOutcome, SimError> {
    let effective_base = effective_reserve(base_vault_amount, open_orders_base_total, base_need_take_pnl);
    let effective_quote =
        effective_reserve(quote_vault_amount, open_orders_quote_total, quote_need_take_pnl);

    if amount_in == 0 || effective_base == 0 || effective_quote == 0 {
        return Ok(SwapOutcome {
            amount_out: 0,
            fee_breakdown: FeeBreakdown::default(),
        });
    }

    let (reserve_in, reserve_out) = match side {
        SwapDirection::BaseToQuote => (effective_base, effective_quote),
        SwapDirection::QuoteToBase => (effective_quote, effective_base),
    };

    let fee_in = floor_mul_div(
        amount_in as u128,
        swap_fee_numerator as u128,
        swap_fee_denominator.max(1) as u128,
    )? as u64;
    let amount_in_after_fee = amount_in - fee_in;
    let amount_out = floor_mul_div(
        reserve_out as u128,
        amount_in_after_fee as u128,
        reserve_in as u128 + amount_in_after_fee as u128,
    )? as u64;

    Ok(SwapOutcome {
        amount_out,
        fee_breakdown: FeeBreakdown {
            lp: fee_in,
            protocol: 0,
            coin_creator: 0,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_reserve_matches_seed_scenario_3() {
        assert_eq!(effective_reserve(100_000, 50_000, 10_000), 140_000);
        assert_eq!(effective_reserve(200_000, 0, 0), 200_000);
    }

    #[test]
    fn amount_out_matches_seed_scenario_3() {
        let out = simulate(
            10_000,
            100_000,
            200_000,
            50_000,
            0,
            10_000,
            0,
            25,
            10_000,
            SwapDirection::BaseToQuote,
        )
        .unwrap();
        assert_eq!(out.fee_breakdown.lp, 25);
        // floor_mul_div(200_000, 9_975, 149_975) = 13_302; spec.md:264's
        // stated 13_301 is an off-by-one against its own formula.
        assert_eq!(out.amount_out, 13_302);
    }

    #[test]
    fn zero_amount_in_is_a_no_op() {
        let out = simulate(0, 100, 100, 0, 0, 0, 0, 25, 10_000, SwapDirection::BaseToQuote).unwrap();
        assert_eq!(out.amount_out, 0);
    }

    #[test]
    fn effective_reserve_never_goes_negative() {
        assert_eq!(effective_reserve(10, 0, 100), 0);
    }
}
