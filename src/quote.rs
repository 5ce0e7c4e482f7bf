//! The external quoting surface: turns a `(pool, amountIn, direction)`
//! request into a simulated `amountOut`, reading only from the cache and
//! the frozen topology already built up by [`crate::topology`] — a quote
//! never triggers a network fetch of its own.

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use crate::cache::Cache;
use crate::decode::bin_array::Bin;
use crate::decode::tick_array::Tick;
use crate::decode::Pool;
use crate::sim;
use crate::sim::SimError;
use crate::topology::{FrozenTopology, LifecycleState, TopologyRegistry};
use crate::types::{FeeBreakdown, Slot, SwapDirection, VenueId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteRequest {
    pub pool_pubkey: Pubkey,
    pub amount_in: u64,
    pub direction: SwapDirection,
    pub market_cap_hint_lamports: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteResponse {
    pub amount_out: u64,
    pub fee_breakdown: FeeBreakdown,
    pub simulated_tick_current: Option<i32>,
    pub simulated_active_id: Option<i64>,
    pub topology_frozen_at_slot: Slot,
}

/// Closed error set a quote can fail with. `ArithmeticOverflow` is not
/// named as a response case for this surface upstream but is folded in
/// here rather than swallowed, since the CLMM tick-math step can
/// genuinely overflow for extreme liquidity/tick inputs (see
/// `sim::raydium_clmm`) and a quoter must never panic on untrusted
/// account data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("unknown pool")]
    UnknownPool,
    #[error("pool is not yet active")]
    PoolInactive,
    #[error("a named dependency account is missing or malformed")]
    DecodeFailure,
    #[error("swap needs a tick past the frozen tick-array coverage window")]
    InsufficientTickCoverage,
    #[error("swap needs a bin past the frozen bin-array coverage window")]
    InsufficientBinCoverage,
    #[error("arithmetic overflow computing the swap")]
    ArithmeticOverflow,
}

impl From<SimError> for QuoteError {
    fn from(e: SimError) -> Self {
        match e {
            SimError::InsufficientTickCoverage => QuoteError::InsufficientTickCoverage,
            SimError::InsufficientBinCoverage => QuoteError::InsufficientBinCoverage,
            SimError::ArithmeticOverflow => QuoteError::ArithmeticOverflow,
        }
    }
}

/// Computes a quote for `request`, consulting `cache` for account state and
/// `topology` for the pool's frozen dependency set. A pool stuck at
/// `Discovered` (dependencies not yet resolved) reports `PoolInactive`
/// rather than a partial answer; the first successful quote against a
/// `Frozen` pool promotes it to `Active`.
pub fn quote(
    cache: &mut Cache,
    topology: &mut TopologyRegistry,
    request: &QuoteRequest,
) -> Result<QuoteResponse, QuoteError> {
    let state = topology
        .state(&request.pool_pubkey)
        .ok_or(QuoteError::UnknownPool)?;
    if !matches!(state, LifecycleState::Frozen | LifecycleState::Active | LifecycleState::Refreshing) {
        return Err(QuoteError::PoolInactive);
    }
    let frozen = topology
        .frozen(&request.pool_pubkey)
        .ok_or(QuoteError::PoolInactive)?
        .clone();

    let pool = cache
        .get_pool(&request.pool_pubkey)
        .ok_or(QuoteError::DecodeFailure)?
        .clone();

    let (amount_out, fee_breakdown, simulated_tick_current, simulated_active_id) =
        match (&pool, frozen.venue) {
            (Pool::PumpSwap(p), VenueId::PumpSwap) => {
                quote_pumpswap(cache, &frozen, request, p)?
            }
            (Pool::RaydiumV4(p), VenueId::RaydiumV4) => {
                quote_raydium_v4(cache, &frozen, request, p)?
            }
            (Pool::RaydiumClmm(p), VenueId::RaydiumClmm) => {
                quote_raydium_clmm(cache, &frozen, request, p)?
            }
            (Pool::MeteoraDlmm(p), VenueId::MeteoraDlmm) => {
                quote_meteora_dlmm(cache, &frozen, request, p)?
            }
            _ => return Err(QuoteError::DecodeFailure),
        };

    if state == LifecycleState::Frozen {
        topology.activate(&request.pool_pubkey, frozen.frozen_at_slot);
    }

    Ok(QuoteResponse {
        amount_out,
        fee_breakdown,
        simulated_tick_current,
        simulated_active_id,
        topology_frozen_at_slot: frozen.frozen_at_slot,
    })
}

type VenueOutcome = (u64, FeeBreakdown, Option<i32>, Option<i64>);

fn quote_pumpswap(
    cache: &mut Cache,
    frozen: &FrozenTopology,
    request: &QuoteRequest,
    _pool: &crate::decode::pumpswap::PumpSwapPool,
) -> Result<VenueOutcome, QuoteError> {
    let base_reserve = frozen
        .vault_base
        .and_then(|pk| cache.get_vault(&pk))
        .ok_or(QuoteError::DecodeFailure)?
        .amount;
    let quote_reserve = frozen
        .vault_quote
        .and_then(|pk| cache.get_vault(&pk))
        .ok_or(QuoteError::DecodeFailure)?
        .amount;
    let fee_config = frozen.fee_config.and_then(|pk| cache.get_fee_config(&pk)).cloned();
    let global_config = frozen
        .global_config
        .and_then(|pk| cache.get_global_config(&pk))
        .cloned();

    let fees_bps = sim::pumpswap::resolve_fees_bps(
        fee_config.as_ref(),
        global_config.as_ref(),
        quote_reserve,
        request.market_cap_hint_lamports,
    );

    let outcome = sim::pumpswap::simulate(
        request.amount_in,
        base_reserve,
        quote_reserve,
        request.direction,
        fees_bps,
    )?;

    if request.direction == SwapDirection::QuoteToBase {
        let trade_bps = fees_bps.trade_fee_bps();
        if let Some(lower_bps) = trade_bps.checked_sub(1) {
            let fee_in = outcome.fee_breakdown.lp + outcome.fee_breakdown.protocol;
            let lower_fee_in = sim::bps::bps_of(request.amount_in as u128, lower_bps)? as u64;
            crate::logging::log_buy_fee_placement_residual(
                &request.pool_pubkey.to_string(),
                request.amount_in,
                trade_bps,
                fee_in,
                fee_in.saturating_sub(lower_fee_in),
            );
        }
    }

    Ok((outcome.amount_out, outcome.fee_breakdown, None, None))
}

fn quote_raydium_v4(
    cache: &mut Cache,
    frozen: &FrozenTopology,
    request: &QuoteRequest,
    pool: &crate::decode::raydium_v4::RaydiumV4Pool,
) -> Result<VenueOutcome, QuoteError> {
    let base_vault_amount = frozen
        .vault_base
        .and_then(|pk| cache.get_vault(&pk))
        .ok_or(QuoteError::DecodeFailure)?
        .amount;
    let quote_vault_amount = frozen
        .vault_quote
        .and_then(|pk| cache.get_vault(&pk))
        .ok_or(QuoteError::DecodeFailure)?
        .amount;
    let (open_orders_base_total, open_orders_quote_total) = match frozen.open_orders {
        Some(pk) => {
            let oo = cache.get_open_orders(&pk).ok_or(QuoteError::DecodeFailure)?;
            (oo.base_token_total, oo.quote_token_total)
        }
        None => (0, 0),
    };

    let outcome = sim::raydium_v4::simulate(
        request.amount_in,
        base_vault_amount,
        quote_vault_amount,
        open_orders_base_total,
        open_orders_quote_total,
        pool.base_need_take_pnl,
        pool.quote_need_take_pnl,
        pool.swap_fee_numerator,
        pool.swap_fee_denominator,
        request.direction,
    )?;
    Ok((outcome.amount_out, outcome.fee_breakdown, None, None))
}

fn quote_raydium_clmm(
    cache: &mut Cache,
    frozen: &FrozenTopology,
    request: &QuoteRequest,
    pool: &crate::decode::raydium_clmm::RaydiumClmmPool,
) -> Result<VenueOutcome, QuoteError> {
    let trade_fee_rate = frozen
        .amm_config
        .and_then(|pk| cache.get_amm_config(&pk))
        .ok_or(QuoteError::DecodeFailure)?
        .trade_fee_rate;

    let mut ticks: Vec<Tick> = Vec::new();
    for tick_array_ref in &frozen.tick_arrays {
        let array = cache
            .get_tick_array(&pool.address, tick_array_ref.start_tick_index)
            .ok_or(QuoteError::DecodeFailure)?;
        ticks.extend(array.ticks.iter().copied());
    }

    let outcome = sim::raydium_clmm::simulate(
        request.amount_in,
        pool.sqrt_price_x64,
        pool.liquidity,
        pool.tick_current,
        trade_fee_rate,
        request.direction.is_zero_for_one(),
        &ticks,
    )?;
    Ok((
        outcome.amount_out,
        outcome.fee_breakdown,
        Some(outcome.final_tick_current),
        None,
    ))
}

fn quote_meteora_dlmm(
    cache: &mut Cache,
    frozen: &FrozenTopology,
    request: &QuoteRequest,
    pool: &crate::decode::meteora_dlmm::MeteoraDlmmPair,
) -> Result<VenueOutcome, QuoteError> {
    let mut bins: Vec<(i64, Bin)> = Vec::new();
    for bin_array_ref in &frozen.bin_arrays {
        let array = cache
            .get_bin_array(&pool.address, bin_array_ref.index)
            .ok_or(QuoteError::DecodeFailure)?;
        let start = array.start_bin_id();
        bins.extend(array.bins.iter().enumerate().map(|(i, b)| (start + i as i64, *b)));
    }

    let outcome = sim::meteora_dlmm::simulate(
        request.amount_in,
        pool.active_id as i64,
        pool.bin_step,
        pool.static_params.base_factor,
        pool.static_params.base_fee_power_factor,
        pool.variable_params.volatility_accumulator,
        pool.static_params.variable_fee_control,
        request.direction,
        &bins,
    )?;
    Ok((
        outcome.amount_out,
        outcome.fee_breakdown,
        None,
        Some(outcome.final_active_id),
    ))
}
