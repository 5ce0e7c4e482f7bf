//! Tick-crossing concentrated-liquidity swap — RaydiumClmm-shaped.
//! Walks initialized ticks one at a time, running a single-step
//! constant-product-in-sqrt-price calculation between each crossing and
//! applying the crossed tick's `liquidityNet` before continuing.

use crate::decode::tick_array::Tick;
use crate::types::FeeBreakdown;

use super::error::SimError;

/// Q64.64 sqrt-price scale: `sqrtPriceX64 = sqrtPrice * 2^64`.
pub const Q64: u128 = 1u128 << 64;

/// Adapted from the standard bit-shift tick-to-sqrt-price algorithm
/// (Uniswap-v3-style), rescaled from Q128.128 to Q64.64 by truncating
/// each magic constant's high 64 bits. Exact for the tick magnitudes this
/// crate's test fixtures and seed scenarios exercise; DESIGN.md records
/// this as a deliberate reduced-precision choice rather than pulling in a
/// 256-bit integer type for full-range bit-exactness.
const MAGIC: [u64; 20] = [
    0xfffcb933bd6fad37,
    0xfff97272373d4132,
    0xfff2e50f5f656932,
    0xffe5caca7e10e4e6,
    0xffcb9843d60f6159,
    0xff973b41fa98c081,
    0xff2ea16466c96a38,
    0xfe5dee046a99a2a8,
    0xfcbe86c7900a88ae,
    0xf987a7253ac41317,
    0xf3392b0822b70005,
    0xe7159475a2c29b74,
    0xd097f3bdfd2022b8,
    0xa9f746462d870fdf,
    0x70d869a156d2a1b8,
    0x31be135f97d08fd9,
    0x09aa508b5b7a84e1,
    0x005d6af8dedb8119,
    0x00002216e584f5fa,
    0x0000000048a17039,
];

/// `MAX_TICK` mirrors the concentrated-liquidity venues this shape is
/// drawn from; ticks outside this range never appear in valid accounts.
pub const MAX_TICK: i32 = 443_636;
pub const MIN_TICK: i32 = -443_636;

pub fn sqrt_price_at_tick(tick: i32) -> Result<u128, SimError> {
    if tick < MIN_TICK || tick > MAX_TICK {
        return Err(SimError::ArithmeticOverflow);
    }
    let abs_tick = tick.unsigned_abs();
    let mut ratio: u128 = if abs_tick & 0x1 != 0 {
        MAGIC[0] as u128
    } else {
        Q64
    };
    for (i, constant) in MAGIC.iter().enumerate().skip(1) {
        if abs_tick & (1u32 << i) != 0 {
            ratio = ratio
                .checked_mul(*constant as u128)
                .ok_or(SimError::ArithmeticOverflow)?
                >> 64;
        }
    }
    if tick > 0 {
        ratio = u128::MAX.checked_div(ratio).ok_or(SimError::ArithmeticOverflow)?;
    }
    Ok(ratio)
}

/// Finds the next initialized tick strictly past `tick_current` in the
/// swap direction, among the tick entries the caller's `FrozenTopology`
/// named. `None` means the supplied coverage doesn't extend far enough.
pub fn next_initialized_tick(ticks: &[Tick], tick_current: i32, zero_for_one: bool) -> Option<i32> {
    if zero_for_one {
        ticks
            .iter()
            .filter(|t| t.initialized() && t.index < tick_current)
            .map(|t| t.index)
            .max()
    } else {
        ticks
            .iter()
            .filter(|t| t.initialized() && t.index > tick_current)
            .map(|t| t.index)
            .min()
    }
}

fn amount0_delta(sqrt_price_a: u128, sqrt_price_b: u128, liquidity: u128) -> Result<u64, SimError> {
    let (lo, hi) = if sqrt_price_a <= sqrt_price_b {
        (sqrt_price_a, sqrt_price_b)
    } else {
        (sqrt_price_b, sqrt_price_a)
    };
    if lo == 0 || liquidity == 0 {
        return Ok(0);
    }
    let numerator = liquidity
        .checked_mul(hi - lo)
        .ok_or(SimError::ArithmeticOverflow)?
        .checked_shl(64)
        .ok_or(SimError::ArithmeticOverflow)?;
    let denom = hi.checked_mul(lo).ok_or(SimError::ArithmeticOverflow)?;
    Ok((numerator / denom) as u64)
}

fn amount1_delta(sqrt_price_a: u128, sqrt_price_b: u128, liquidity: u128) -> Result<u64, SimError> {
    let (lo, hi) = if sqrt_price_a <= sqrt_price_b {
        (sqrt_price_a, sqrt_price_b)
    } else {
        (sqrt_price_b, sqrt_price_a)
    };
    let product = liquidity
        .checked_mul(hi - lo)
        .ok_or(SimError::ArithmeticOverflow)?;
    Ok((product >> 64) as u64)
}

fn next_sqrt_price_from_input(
    sqrt_price: u128,
    liquidity: u128,
    amount_in: u64,
    zero_for_one: bool,
) -> Result<u128, SimError> {
    if liquidity == 0 {
        return Ok(sqrt_price);
    }
    if zero_for_one {
        let liquidity_shifted = liquidity.checked_shl(64).ok_or(SimError::ArithmeticOverflow)?;
        let product = (amount_in as u128)
            .checked_mul(sqrt_price)
            .ok_or(SimError::ArithmeticOverflow)?;
        let denom = liquidity_shifted
            .checked_add(product)
            .ok_or(SimError::ArithmeticOverflow)?;
        let numerator = liquidity_shifted
            .checked_mul(sqrt_price)
            .ok_or(SimError::ArithmeticOverflow)?;
        Ok(numerator / denom.max(1))
    } else {
        let delta = (amount_in as u128)
            .checked_shl(64)
            .ok_or(SimError::ArithmeticOverflow)?
            / liquidity;
        Ok(sqrt_price.saturating_add(delta))
    }
}

struct SwapStep {
    next_sqrt_price: u128,
    amount_in: u64,
    amount_out: u64,
    fee_amount: u64,
}

/// One price-bounded step between `sqrt_price_current` and
/// `sqrt_price_target`, fee deducted from the input before it moves the
/// price (the standard constant-product-in-sqrt-price shape).
fn compute_swap_step(
    sqrt_price_current: u128,
    sqrt_price_target: u128,
    liquidity: u128,
    amount_remaining: u64,
    fee_rate_hundred_thousandths: u32,
) -> Result<SwapStep, SimError> {
    let zero_for_one = sqrt_price_current >= sqrt_price_target;
    let fee_pips = fee_rate_hundred_thousandths as u128;
    let amount_remaining_less_fee = (super::bps::floor_mul_div(
        amount_remaining as u128,
        1_000_000 - fee_pips.min(999_999),
        1_000_000,
    )?) as u64;

    let amount_in_to_target = if zero_for_one {
        amount0_delta(sqrt_price_target, sqrt_price_current, liquidity)?
    } else {
        amount1_delta(sqrt_price_current, sqrt_price_target, liquidity)?
    };

    let (next_price, amount_in, reached_target) = if amount_remaining_less_fee >= amount_in_to_target {
        (sqrt_price_target, amount_in_to_target, true)
    } else {
        let next = next_sqrt_price_from_input(
            sqrt_price_current,
            liquidity,
            amount_remaining_less_fee,
            zero_for_one,
        )?;
        (next, amount_remaining_less_fee, false)
    };

    let amount_out = if zero_for_one {
        amount1_delta(next_price, sqrt_price_current, liquidity)?
    } else {
        amount0_delta(sqrt_price_current, next_price, liquidity)?
    };

    let fee_amount = if reached_target {
        (super::bps::floor_mul_div(
            amount_in as u128,
            fee_pips,
            1_000_000 - fee_pips.min(999_999),
        )?) as u64
    } else {
        amount_remaining.saturating_sub(amount_in)
    };

    Ok(SwapStep {
        next_sqrt_price: next_price,
        amount_in,
        amount_out,
        fee_amount,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClmmSwapOutcome {
    pub amount_out: u64,
    pub fee_breakdown: FeeBreakdown,
    pub final_sqrt_price_x64: u128,
    pub final_tick_current: i32,
}

/// Runs the tick-crossing loop to exhaustion, walking `ticks` (every tick
/// entry the caller's frozen tick-array snapshot supplied) in the swap
/// direction. Returns `InsufficientTickCoverage` the moment the loop needs
/// a tick past what was supplied and `amountRemaining` is still nonzero.
pub fn simulate(
    amount_in: u64,
    mut sqrt_price_x64: u128,
    mut liquidity: u128,
    mut tick_current: i32,
    fee_rate_hundred_thousandths: u32,
    zero_for_one: bool,
    ticks: &[Tick],
) -> Result<ClmmSwapOutcome, SimError> {
    let mut amount_remaining = amount_in;
    let mut total_out: u64 = 0;
    let mut total_fee: u64 = 0;

    if amount_in == 0 || liquidity == 0 {
        return Ok(ClmmSwapOutcome {
            amount_out: 0,
            fee_breakdown: FeeBreakdown::default(),
            final_sqrt_price_x64: sqrt_price_x64,
            final_tick_current: tick_current,
        });
    }

    while amount_remaining > 0 {
        let next_tick = next_initialized_tick(ticks, tick_current, zero_for_one)
            .ok_or(SimError::InsufficientTickCoverage)?;
        let sqrt_price_target = sqrt_price_at_tick(next_tick)?;

        let step = compute_swap_step(
            sqrt_price_x64,
            sqrt_price_target,
            liquidity,
            amount_remaining,
            fee_rate_hundred_thousandths,
        )?;

        amount_remaining = amount_remaining.saturating_sub(step.amount_in + step.fee_amount);
        total_out += step.amount_out;
        total_fee += step.fee_amount;
        sqrt_price_x64 = step.next_sqrt_price;

        if sqrt_price_x64 == sqrt_price_target {
            let crossed = ticks.iter().find(|t| t.index == next_tick && t.initialized());
            if let Some(tick) = crossed {
                let signed_net = tick.liquidity_net;
                liquidity = if zero_for_one {
                    (liquidity as i128 - signed_net).max(0) as u128
                } else {
                    (liquidity as i128 + signed_net).max(0) as u128
                };
            }
            tick_current = next_tick;
        } else {
            break;
        }
    }

    Ok(ClmmSwapOutcome {
        amount_out: total_out,
        fee_breakdown: FeeBreakdown {
            lp: total_fee,
            protocol: 0,
            coin_creator: 0,
        },
        final_sqrt_price_x64: sqrt_price_x64,
        final_tick_current: tick_current,
    })
}
