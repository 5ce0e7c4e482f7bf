//! The per-pool state machine. One
//! [`TopologyRegistry`] per engine instance, owned the same way the cache
//! is — no interior mutex, single writer.

use std::collections::HashMap;

use solana_sdk::pubkey::Pubkey;

use crate::cache::Cache;
use crate::decode::Pool;
use crate::types::{Slot, VenueId};

use super::frozen::FrozenTopology;
use super::resolver::{self, VenuePrograms};
use super::state::{LifecycleEvent, LifecycleEventType, LifecycleState};

struct PoolEntry {
    state: LifecycleState,
    venue: VenueId,
    discovered_slot: Slot,
    frozen: Option<FrozenTopology>,
}

#[derive(Default)]
pub struct TopologyRegistry {
    entries: HashMap<Pubkey, PoolEntry>,
}

impl TopologyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, pool_pubkey: &Pubkey) -> Option<LifecycleState> {
        self.entries.get(pool_pubkey).map(|e| e.state)
    }

    pub fn frozen(&self, pool_pubkey: &Pubkey) -> Option<&FrozenTopology> {
        self.entries.get(pool_pubkey).and_then(|e| e.frozen.as_ref())
    }

    /// `Unseen -> Discovered` on first observation of a pool. A no-op
    /// (returns `None`) on every subsequent observation of an
    /// already-known pool.
    pub fn observe_pool(&mut self, pool: &Pool, venue: VenueId, slot: Slot) -> Option<LifecycleEvent> {
        let address = pool.address();
        if self.entries.contains_key(&address) {
            return None;
        }
        self.entries.insert(
            address,
            PoolEntry {
                state: LifecycleState::Discovered,
                venue,
                discovered_slot: slot,
                frozen: None,
            },
        );
        Some(LifecycleEvent {
            event_type: LifecycleEventType::Discover,
            pool: address,
            from: LifecycleState::Unseen,
            to: LifecycleState::Discovered,
            reason: None,
            slot,
        })
    }

    /// Attempts `Discovered|Refreshing -> Frozen`. Returns the pubkeys
    /// still missing from cache on failure so the caller can enqueue them
    /// to a bootstrap fetcher (the bootstrap loop).
    pub fn try_freeze(
        &mut self,
        pool_pubkey: &Pubkey,
        pool: &Pool,
        cache: &mut Cache,
        programs: &VenuePrograms,
        slot: Slot,
    ) -> Result<Option<LifecycleEvent>, Vec<Pubkey>> {
        let venue = match self.entries.get(pool_pubkey) {
            Some(entry)
                if matches!(
                    entry.state,
                    LifecycleState::Discovered | LifecycleState::Refreshing
                ) =>
            {
                entry.venue
            }
            _ => return Ok(None),
        };

        let plan = resolver::plan_for(pool, venue, programs);
        let mut missing = Vec::new();

        if let Some(pk) = plan.vault_base {
            if cache.get_vault(&pk).is_none() {
                missing.push(pk);
            }
        }
        if let Some(pk) = plan.vault_quote {
            if cache.get_vault(&pk).is_none() {
                missing.push(pk);
            }
        }
        if let Some(pk) = plan.amm_config {
            if cache.get_amm_config(&pk).is_none() {
                missing.push(pk);
            }
        }
        if let Some(pk) = plan.global_config {
            if cache.get_global_config(&pk).is_none() {
                missing.push(pk);
            }
        }
        if let Some(pk) = plan.fee_config {
            if cache.get_fee_config(&pk).is_none() {
                missing.push(pk);
            }
        }
        if let Some(pk) = plan.open_orders {
            if cache.get_open_orders(&pk).is_none() {
                missing.push(pk);
            }
        }
        for t in &plan.tick_arrays {
            if cache.get_tick_array(pool_pubkey, t.start_tick_index).is_none() {
                missing.push(t.pubkey);
            }
        }
        for b in &plan.bin_arrays {
            if cache.get_bin_array(pool_pubkey, b.index).is_none() {
                missing.push(b.pubkey);
            }
        }

        if !missing.is_empty() {
            return Err(missing);
        }

        let frozen = plan.into_frozen(*pool_pubkey, venue, slot);
        let entry = self.entries.get_mut(pool_pubkey).expect("checked above");
        let from = entry.state;
        entry.state = LifecycleState::Frozen;
        entry.frozen = Some(frozen);
        Ok(Some(LifecycleEvent {
            event_type: LifecycleEventType::Freeze,
            pool: *pool_pubkey,
            from,
            to: LifecycleState::Frozen,
            reason: None,
            slot,
        }))
    }

    /// `Frozen -> Active` on the first quote request that finds every
    /// named dependency present.
    pub fn activate(&mut self, pool_pubkey: &Pubkey, slot: Slot) -> Option<LifecycleEvent> {
        let entry = self.entries.get_mut(pool_pubkey)?;
        if entry.state != LifecycleState::Frozen {
            return None;
        }
        entry.state = LifecycleState::Active;
        Some(LifecycleEvent {
            event_type: LifecycleEventType::Activate,
            pool: *pool_pubkey,
            from: LifecycleState::Frozen,
            to: LifecycleState::Active,
            reason: None,
            slot,
        })
    }

    fn start_refresh(&mut self, pool_pubkey: &Pubkey, slot: Slot, reason: &str) -> Option<LifecycleEvent> {
        let entry = self.entries.get_mut(pool_pubkey)?;
        if entry.state != LifecycleState::Active {
            return None;
        }
        entry.state = LifecycleState::Refreshing;
        Some(LifecycleEvent {
            event_type: LifecycleEventType::RefreshStart,
            pool: *pool_pubkey,
            from: LifecycleState::Active,
            to: LifecycleState::Refreshing,
            reason: Some(reason.to_string()),
            slot,
        })
    }

    /// `Active -> Refreshing` when the active tick has left the frozen
    /// tick-array coverage window.
    pub fn check_tick_drift(
        &mut self,
        pool_pubkey: &Pubkey,
        tick: i32,
        spacing: i32,
        slot: Slot,
    ) -> Option<LifecycleEvent> {
        let covers = self
            .entries
            .get(pool_pubkey)?
            .frozen
            .as_ref()?
            .covers_tick(tick, spacing);
        if covers {
            None
        } else {
            self.start_refresh(pool_pubkey, slot, "active tick left frozen coverage window")
        }
    }

    /// `Active -> Refreshing` when the active bin array has left the
    /// frozen bin-array coverage window.
    pub fn check_bin_drift(
        &mut self,
        pool_pubkey: &Pubkey,
        active_array_index: i64,
        slot: Slot,
    ) -> Option<LifecycleEvent> {
        let covers = self
            .entries
            .get(pool_pubkey)?
            .frozen
            .as_ref()?
            .covers_bin_array(active_array_index);
        if covers {
            None
        } else {
            self.start_refresh(pool_pubkey, slot, "active bin left frozen coverage window")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::pumpswap::PumpSwapPool;
    use crate::decode::vault::Vault;
    use crate::ingress::AccountUpdate;
    use crate::types::Origin;

    fn programs() -> VenuePrograms {
        VenuePrograms {
            raydium_v4_program: Pubkey::new_unique(),
            raydium_clmm_program: Pubkey::new_unique(),
            meteora_dlmm_program: Pubkey::new_unique(),
            fee_program: Pubkey::new_unique(),
            fee_config_seed_program: Pubkey::new_unique(),
            pumpswap_global_config: Pubkey::new_unique(),
            bin_array_radius: 1,
        }
    }

    fn vault_update(pubkey: Pubkey) -> AccountUpdate {
        AccountUpdate {
            pubkey,
            owner: Pubkey::new_unique(),
            data: vec![],
            slot: 1,
            write_version: 1,
            lamports: 1,
            source: Origin::Live,
        }
    }

    #[test]
    fn discover_then_freeze_then_activate() {
        let mut registry = TopologyRegistry::new();
        let mut cache = Cache::new();
        let programs = programs();

        let address = Pubkey::new_unique();
        let base_vault = Pubkey::new_unique();
        let quote_vault = Pubkey::new_unique();
        let pool = Pool::PumpSwap(PumpSwapPool {
            address,
            pool_bump: 0,
            index: 0,
            creator: Pubkey::new_unique(),
            base_mint: Pubkey::new_unique(),
            quote_mint: Pubkey::new_unique(),
            lp_mint: Pubkey::new_unique(),
            pool_base_token_account: base_vault,
            pool_quote_token_account: quote_vault,
            lp_supply: 0,
        });

        let discover = registry.observe_pool(&pool, VenueId::PumpSwap, 10).unwrap();
        assert_eq!(discover.to, LifecycleState::Discovered);
        assert!(registry.observe_pool(&pool, VenueId::PumpSwap, 11).is_none());

        // Missing every dependency: try_freeze must fail with the full list.
        let missing = registry
            .try_freeze(&address, &pool, &mut cache, &programs, 12)
            .unwrap_err();
        assert!(!missing.is_empty());
        assert_eq!(registry.state(&address), Some(LifecycleState::Discovered));

        cache.apply_vault(
            &vault_update(base_vault),
            Vault {
                address: base_vault,
                mint: Pubkey::new_unique(),
                amount: 1_000,
            },
        );
        cache.apply_vault(
            &vault_update(quote_vault),
            Vault {
                address: quote_vault,
                mint: Pubkey::new_unique(),
                amount: 2_000,
            },
        );
        cache.apply_global_config(
            &vault_update(programs.pumpswap_global_config),
            crate::decode::global_config::GlobalConfig {
                address: programs.pumpswap_global_config,
                admin: Pubkey::new_unique(),
                lp_fee_basis_points: 20,
                protocol_fee_basis_points: 5,
                disable_flags: 0,
                protocol_fee_recipients: [Pubkey::default(); 8],
                coin_creator_fee_basis_points: 0,
            },
        );
        let fee_config_pda = crate::decode::pda::fee_config_pda(
            &programs.fee_program,
            &programs.fee_config_seed_program,
        )
        .0;
        cache.apply_fee_config(
            &vault_update(fee_config_pda),
            crate::decode::fee_config::FeeConfig {
                address: fee_config_pda,
                bump: 0,
                admin: Pubkey::new_unique(),
                flat_fees: Default::default(),
                fee_tiers: vec![],
            },
        );

        let freeze = registry
            .try_freeze(&address, &pool, &mut cache, &programs, 13)
            .unwrap()
            .unwrap();
        assert_eq!(freeze.to, LifecycleState::Frozen);
        assert_eq!(registry.state(&address), Some(LifecycleState::Frozen));

        let activate = registry.activate(&address, 14).unwrap();
        assert_eq!(activate.to, LifecycleState::Active);
        assert!(registry.activate(&address, 15).is_none());
    }
}
