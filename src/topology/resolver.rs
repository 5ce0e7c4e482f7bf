//! Per-venue dependency resolution. Pure: given a decoded
//! pool and the deployment's program ids, compute the pubkeys a
//! `FrozenTopology` will need — no cache or network access here. Tick and
//! bin array pubkeys are derived via the read-only PDA functions in
//! [`crate::decode::pda`] rather than looked up, since the array's address
//! is a deterministic function of pool + index.

use solana_sdk::pubkey::Pubkey;

use crate::decode::pda;
use crate::decode::Pool;
use crate::types::{Slot, VenueId};

use super::frozen::{BinArrayRef, FrozenTopology, TickArrayRef};

/// Deployment constants the resolver needs but that aren't themselves
/// account data: program ids for owner checks and PDA derivation, plus two
/// singletons with no given derivation.
///
/// Open questions resolved here (see DESIGN.md): PDA seeds are given for
/// `fee_config`, `tick_array` and `bin_array` but not for PumpSwap's
/// `GlobalConfig`, which this engine treats as a fixed
/// per-deployment singleton rather than a derived address; and the
/// `configProgramId` seed component of `fee_config`'s derivation is
/// likewise a configured constant rather than something read off a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VenuePrograms {
    pub raydium_v4_program: Pubkey,
    pub raydium_clmm_program: Pubkey,
    pub meteora_dlmm_program: Pubkey,
    pub fee_program: Pubkey,
    pub fee_config_seed_program: Pubkey,
    pub pumpswap_global_config: Pubkey,
    /// Bin arrays either side of `activeId` a MeteoraDlmm topology freezes
    /// around — the coverage window is `2*radius + 1` arrays.
    pub bin_array_radius: i64,
}

/// Every dependency pubkey a pool's `FrozenTopology` will name, before any
/// of them have been confirmed present in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DependencyPlan {
    pub vault_base: Option<Pubkey>,
    pub vault_quote: Option<Pubkey>,
    pub amm_config: Option<Pubkey>,
    pub global_config: Option<Pubkey>,
    pub fee_config: Option<Pubkey>,
    pub open_orders: Option<Pubkey>,
    pub tick_arrays: Vec<TickArrayRef>,
    pub bin_arrays: Vec<BinArrayRef>,
}

impl DependencyPlan {
    pub fn all_pubkeys(&self) -> Vec<Pubkey> {
        let mut out = Vec::new();
        out.extend(self.vault_base);
        out.extend(self.vault_quote);
        out.extend(self.amm_config);
        out.extend(self.global_config);
        out.extend(self.fee_config);
        out.extend(self.open_orders);
        out.extend(self.tick_arrays.iter().map(|t| t.pubkey));
        out.extend(self.bin_arrays.iter().map(|b| b.pubkey));
        out
    }

    pub fn into_frozen(
        self,
        pool_pubkey: Pubkey,
        venue: VenueId,
        frozen_at_slot: Slot,
    ) -> FrozenTopology {
        FrozenTopology {
            pool_pubkey,
            venue,
            frozen_at_slot,
            vault_base: self.vault_base,
            vault_quote: self.vault_quote,
            amm_config: self.amm_config,
            global_config: self.global_config,
            fee_config: self.fee_config,
            open_orders: self.open_orders,
            tick_arrays: self.tick_arrays,
            bin_arrays: self.bin_arrays,
        }
    }
}

/// The start-tick index of the tick array containing tick `t` at spacing
/// `s` — `floor(t / (s*60)) * (s*60)`. `div_euclid` gives
/// the mathematical floor for a positive divisor, which `i32/` truncation
/// toward zero does not for negative ticks.
pub fn tick_array_start(tick: i32, spacing: i32) -> i32 {
    let span = spacing * 60;
    tick.div_euclid(span) * span
}

/// The bin-array index containing bin id `id` — `floor(id / 70)`.
pub fn bin_array_index(bin_id: i32) -> i64 {
    bin_id.div_euclid(70) as i64
}

pub fn plan_for(pool: &Pool, venue: VenueId, programs: &VenuePrograms) -> DependencyPlan {
    match (pool, venue) {
        (Pool::PumpSwap(p), VenueId::PumpSwap) => DependencyPlan {
            vault_base: Some(p.pool_base_token_account),
            vault_quote: Some(p.pool_quote_token_account),
            global_config: Some(programs.pumpswap_global_config),
            fee_config: Some(
                pda::fee_config_pda(&programs.fee_program, &programs.fee_config_seed_program).0,
            ),
            ..Default::default()
        },
        (Pool::RaydiumV4(p), VenueId::RaydiumV4) => DependencyPlan {
            vault_base: Some(p.base_vault),
            vault_quote: Some(p.quote_vault),
            open_orders: Some(p.open_orders),
            ..Default::default()
        },
        (Pool::RaydiumClmm(p), VenueId::RaydiumClmm) => {
            let spacing = p.tick_spacing as i32;
            let span = spacing * 60;
            let current = tick_array_start(p.tick_current, spacing);
            let starts = [current - span, current, current + span];
            let tick_arrays = starts
                .into_iter()
                .map(|start| TickArrayRef {
                    start_tick_index: start,
                    pubkey: pda::tick_array_pda(&programs.raydium_clmm_program, &p.address, start)
                        .0,
                })
                .collect();
            DependencyPlan {
                vault_base: Some(p.token_vault_0),
                vault_quote: Some(p.token_vault_1),
                amm_config: Some(p.amm_config),
                tick_arrays,
                ..Default::default()
            }
        }
        (Pool::MeteoraDlmm(p), VenueId::MeteoraDlmm) => {
            let radius = programs.bin_array_radius;
            let active_array_index = bin_array_index(p.active_id);
            let bin_arrays = ((active_array_index - radius)..=(active_array_index + radius))
                .map(|index| BinArrayRef {
                    index,
                    pubkey: pda::bin_array_pda(&programs.meteora_dlmm_program, &p.address, index)
                        .0,
                })
                .collect();
            DependencyPlan {
                vault_base: Some(p.reserve_x),
                vault_quote: Some(p.reserve_y),
                bin_arrays,
                ..Default::default()
            }
        }
        _ => DependencyPlan::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_array_start_floors_toward_negative_infinity() {
        // spacing=60 -> span=3600; tick=-1 should floor to -3600, not 0.
        assert_eq!(tick_array_start(-1, 60), -3600);
        assert_eq!(tick_array_start(3599, 60), 0);
        assert_eq!(tick_array_start(3600, 60), 3600);
    }

    #[test]
    fn bin_array_index_floors_negative_ids() {
        assert_eq!(bin_array_index(-1), -1);
        assert_eq!(bin_array_index(69), 0);
        assert_eq!(bin_array_index(70), 1);
    }

    #[test]
    fn clmm_plan_centers_three_tick_arrays_on_current() {
        use crate::decode::raydium_clmm::RaydiumClmmPool;
        let pool = RaydiumClmmPool {
            address: Pubkey::new_unique(),
            amm_config: Pubkey::new_unique(),
            token_mint_0: Pubkey::new_unique(),
            token_mint_1: Pubkey::new_unique(),
            token_vault_0: Pubkey::new_unique(),
            token_vault_1: Pubkey::new_unique(),
            mint_decimals_0: 9,
            mint_decimals_1: 6,
            tick_spacing: 60,
            liquidity: 1_000,
            sqrt_price_x64: 0,
            tick_current: 100,
            fee_growth_global_0_x64: 0,
            fee_growth_global_1_x64: 0,
            protocol_fees_token_0: 0,
            protocol_fees_token_1: 0,
            status: 0,
            tick_array_bitmap: [0u64; 16],
        };
        let programs = VenuePrograms {
            raydium_v4_program: Pubkey::new_unique(),
            raydium_clmm_program: Pubkey::new_unique(),
            meteora_dlmm_program: Pubkey::new_unique(),
            fee_program: Pubkey::new_unique(),
            fee_config_seed_program: Pubkey::new_unique(),
            pumpswap_global_config: Pubkey::new_unique(),
            bin_array_radius: 1,
        };
        let plan = plan_for(&Pool::RaydiumClmm(pool), VenueId::RaydiumClmm, &programs);
        let mut starts: Vec<i32> = plan.tick_arrays.iter().map(|t| t.start_tick_index).collect();
        starts.sort();
        assert_eq!(starts, vec![-3600, 0, 3600]);
    }
}
