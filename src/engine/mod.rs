//! Core engine: the one piece of this crate that is not a pure function.
//! Owns the cache and the topology registry, and implements the ingress
//! dispatch described at the data-flow level — decode, cache apply,
//! lifecycle notify, trace emit, synchronously and in that order for every
//! inbound update.

use std::collections::HashSet;
use std::sync::Arc;

use solana_sdk::pubkey::Pubkey;

use crate::cache::trace::TraceSink;
use crate::cache::Cache;
use crate::collab::{BootstrapFetcher, StreamSource};
use crate::config::{ConfigError, EngineConfig};
use crate::decode::account::ProgramIds;
use crate::decode::{self, amm_config, bin_array, fee_config, global_config, open_orders, tick_array, vault};
use crate::ingress::AccountUpdate;
use crate::quote::{self, QuoteError, QuoteRequest, QuoteResponse};
use crate::topology::{TopologyRegistry, VenuePrograms};
use crate::types::VenueId;

const BIN_ARRAY_HEADER_LEN: usize = 56;
const BIN_ARRAY_TOTAL_LEN: usize = BIN_ARRAY_HEADER_LEN + bin_array::BINS_PER_ARRAY * bin_array::BIN_STRIDE;

/// Which kind of dependency account a buffer decoded to, carrying the
/// decoded record through to the right `Cache::apply_*` call.
enum Dependency {
    Vault(vault::Vault),
    TickArray(tick_array::TickArray),
    BinArray(bin_array::BinArray),
    AmmConfig(amm_config::AmmConfig),
    FeeConfig(fee_config::FeeConfig),
    GlobalConfig(global_config::GlobalConfig),
    OpenOrders(open_orders::OpenOrders),
}

/// Identifies and decodes a dependency account: discriminator match first
/// for every kind that carries one, then owner+length for the two that
/// don't (SPL token vaults, MeteoraDlmm bin arrays), then the Serum
/// magic-bytes check for RaydiumV4's open-orders account.
fn decode_dependency(
    buf: &[u8],
    address: Pubkey,
    owner: &Pubkey,
    venue_programs: &VenuePrograms,
) -> Option<Dependency> {
    if let Ok(config) = amm_config::decode(buf, address) {
        return Some(Dependency::AmmConfig(config));
    }
    if let Ok(config) = fee_config::decode(buf, address) {
        return Some(Dependency::FeeConfig(config));
    }
    if let Ok(config) = global_config::decode(buf, address) {
        return Some(Dependency::GlobalConfig(config));
    }
    if let Ok(array) = tick_array::decode(buf, address) {
        return Some(Dependency::TickArray(array));
    }
    if buf.len() == open_orders::EXACT_LEN {
        if let Ok(oo) = open_orders::decode(buf, address) {
            return Some(Dependency::OpenOrders(oo));
        }
    }
    if *owner == spl_token::id() {
        if let Ok(v) = vault::decode(buf, address) {
            return Some(Dependency::Vault(v));
        }
    }
    if *owner == venue_programs.meteora_dlmm_program && buf.len() == BIN_ARRAY_TOTAL_LEN {
        if let Ok(array) = bin_array::decode(buf, address) {
            return Some(Dependency::BinArray(array));
        }
    }
    None
}

fn venue_of(pool: &decode::Pool) -> VenueId {
    match pool {
        decode::Pool::PumpSwap(_) => VenueId::PumpSwap,
        decode::Pool::RaydiumV4(_) => VenueId::RaydiumV4,
        decode::Pool::RaydiumClmm(_) => VenueId::RaydiumClmm,
        decode::Pool::MeteoraDlmm(_) => VenueId::MeteoraDlmm,
    }
}

/// Owns the cache and topology registry; the one stateful component in
/// this crate. No interior mutex — callers hold `&mut Engine` across a
/// dispatch the same way the cache itself is exclusively owned.
pub struct Engine {
    cache: Cache,
    topology: TopologyRegistry,
    program_ids: ProgramIds,
    venue_programs: VenuePrograms,
    bootstrap: Arc<dyn BootstrapFetcher>,
    /// Pools observed but not yet `Frozen` — re-attempted on every
    /// dependency update rather than tracked with a reverse dependency
    /// graph, since pool counts in scope here stay small enough that an
    /// O(pending) rescan per update is cheap.
    pending: HashSet<Pubkey>,
}

impl Engine {
    pub fn new(config: &EngineConfig, bootstrap: Arc<dyn BootstrapFetcher>) -> Result<Self, ConfigError> {
        let (program_ids, venue_programs) = config.programs.resolve(config.bin_array_radius)?;
        Ok(Self {
            cache: Cache::with_config(&config.cache),
            topology: TopologyRegistry::new(),
            program_ids,
            venue_programs,
            bootstrap,
            pending: HashSet::new(),
        })
    }

    pub fn set_trace_handler(&mut self, sink: Box<dyn TraceSink>) {
        self.cache.set_trace_handler(sink);
    }

    /// Runs the ingress loop until the stream source is exhausted. Each
    /// account update is handled synchronously end to end before the next
    /// is pulled, matching the single-writer, non-tearing read guarantee
    /// quotes depend on.
    pub async fn run(&mut self, stream: &mut dyn StreamSource) {
        while let Some(update) = stream.next_account_update().await {
            self.handle_account_update(update).await;
        }
    }

    /// decode -> cache apply -> lifecycle notify -> trace emit for one
    /// account mutation. A failed decode never touches the cache; a
    /// `lamports == 0` update is always treated as a deletion regardless of
    /// whether decode would have succeeded.
    pub async fn handle_account_update(&mut self, update: AccountUpdate) {
        if update.is_deletion() {
            self.cache.delete(&update.pubkey);
            return;
        }

        if let Ok(pool) = decode::decode_pool(&update.data, update.pubkey, &update.owner, &self.program_ids) {
            let venue = venue_of(&pool);
            let address = pool.address();
            self.cache.apply_pool(&update, pool.clone());
            if self.topology.observe_pool(&pool, venue, update.slot).is_some() {
                self.pending.insert(address);
            }
            self.try_freeze_pending(update.slot).await;
            return;
        }

        if let Some(dependency) = decode_dependency(&update.data, update.pubkey, &update.owner, &self.venue_programs)
        {
            match dependency {
                Dependency::Vault(v) => {
                    self.cache.apply_vault(&update, v);
                }
                Dependency::TickArray(a) => {
                    self.cache.apply_tick_array(&update, a);
                }
                Dependency::BinArray(a) => {
                    self.cache.apply_bin_array(&update, a);
                }
                Dependency::AmmConfig(c) => {
                    self.cache.apply_amm_config(&update, c);
                }
                Dependency::FeeConfig(c) => {
                    self.cache.apply_fee_config(&update, c);
                }
                Dependency::OpenOrders(oo) => {
                    self.cache.apply_open_orders(&update, oo);
                }
                Dependency::GlobalConfig(c) => {
                    self.cache.apply_global_config(&update, c);
                }
            }
            self.try_freeze_pending(update.slot).await;
        }
    }

    /// Attempts `Discovered|Refreshing -> Frozen` for every pending pool.
    /// Missing dependencies are enqueued to the bootstrap fetcher; anything
    /// it returns re-enters through `handle_account_update` tagged
    /// `Origin::Bootstrap` by the fetcher itself, same as a live update.
    async fn try_freeze_pending(&mut self, slot: crate::types::Slot) {
        let candidates: Vec<Pubkey> = self.pending.iter().copied().collect();
        for pool_pubkey in candidates {
            let Some(pool) = self.cache.get_pool(&pool_pubkey).cloned() else {
                continue;
            };
            match self.topology.try_freeze(&pool_pubkey, &pool, &mut self.cache, &self.venue_programs, slot) {
                Ok(Some(_event)) => {
                    self.pending.remove(&pool_pubkey);
                }
                Ok(None) => {
                    self.pending.remove(&pool_pubkey);
                }
                Err(missing) => {
                    for pubkey in missing {
                        if let Some(fetched) = self.bootstrap.fetch_account(pubkey).await {
                            Box::pin(self.handle_account_update(fetched)).await;
                        }
                    }
                }
            }
        }
    }

    /// Checks whether a pool's active price/bin has drifted out of its
    /// frozen coverage window and starts a refresh if so. Call this after
    /// applying a pool update for a venue that tracks continuous price
    /// (RaydiumClmm, MeteoraDlmm) — constant-product venues have no
    /// analogous drift concept.
    pub fn check_drift_clmm(&mut self, pool_pubkey: &Pubkey, tick_current: i32, spacing: i32, slot: crate::types::Slot) {
        if self.topology.check_tick_drift(pool_pubkey, tick_current, spacing, slot).is_some() {
            self.pending.insert(*pool_pubkey);
        }
    }

    pub fn check_drift_dlmm(&mut self, pool_pubkey: &Pubkey, active_array_index: i64, slot: crate::types::Slot) {
        if self.topology.check_bin_drift(pool_pubkey, active_array_index, slot).is_some() {
            self.pending.insert(*pool_pubkey);
        }
    }

    /// The external quoting surface: a pure, synchronous read against the
    /// cache and topology this engine owns.
    pub fn quote(&mut self, request: &QuoteRequest) -> Result<QuoteResponse, QuoteError> {
        quote::quote(&mut self.cache, &mut self.topology, request)
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn topology(&self) -> &TopologyRegistry {
        &self.topology
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::decode::pumpswap::{self, PumpSwapPool};
    use crate::ingress::TxUpdate;
    use crate::types::{Origin, SwapDirection};

    struct NoOpBootstrap;
    #[async_trait]
    impl BootstrapFetcher for NoOpBootstrap {
        async fn fetch_account(&self, _pubkey: Pubkey) -> Option<AccountUpdate> {
            None
        }
    }

    struct EmptyStream;
    #[async_trait]
    impl StreamSource for EmptyStream {
        async fn next_account_update(&mut self) -> Option<AccountUpdate> {
            None
        }
        async fn next_tx_update(&mut self) -> Option<TxUpdate> {
            None
        }
    }

    fn test_config() -> EngineConfig {
        toml::from_str(
            r#"
            [programs]
            raydium_v4_program = "11111111111111111111111111111111111111111"
            raydium_clmm_program = "11111111111111111111111111111111111111111"
            meteora_dlmm_program = "11111111111111111111111111111111111111111"
            fee_program = "11111111111111111111111111111111111111111"
            fee_config_seed_program = "11111111111111111111111111111111111111111"
            pumpswap_global_config = "11111111111111111111111111111111111111111"
            "#,
        )
        .unwrap()
    }

    fn pumpswap_update(address: Pubkey, base_vault: Pubkey, quote_vault: Pubkey, slot: u64) -> AccountUpdate {
        let pool = PumpSwapPool {
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
        };
        let mut buf = vec![0u8; pumpswap::MIN_LEN];
        buf[0..8].copy_from_slice(&pumpswap::DISCRIMINATOR);
        buf[40..41].copy_from_slice(&[pool.pool_bump]);
        buf[8..40].copy_from_slice(&pool.creator.to_bytes());
        buf[41..43].copy_from_slice(&pool.index.to_le_bytes());
        buf[43..75].copy_from_slice(&pool.base_mint.to_bytes());
        buf[75..107].copy_from_slice(&pool.quote_mint.to_bytes());
        buf[107..139].copy_from_slice(&pool.lp_mint.to_bytes());
        buf[139..171].copy_from_slice(&base_vault.to_bytes());
        buf[171..203].copy_from_slice(&quote_vault.to_bytes());

        AccountUpdate {
            pubkey: address,
            owner: Pubkey::new_unique(),
            data: buf,
            slot,
            write_version: 1,
            lamports: 1,
            source: Origin::Live,
        }
    }

    #[tokio::test]
    async fn engine_runs_against_an_empty_stream_without_panicking() {
        let config = test_config();
        let mut engine = Engine::new(&config, Arc::new(NoOpBootstrap)).unwrap();
        let mut stream = EmptyStream;
        engine.run(&mut stream).await;
    }

    #[tokio::test]
    async fn pool_observation_enqueues_a_pending_freeze_attempt() {
        let config = test_config();
        let mut engine = Engine::new(&config, Arc::new(NoOpBootstrap)).unwrap();

        let address = Pubkey::new_unique();
        let base_vault = Pubkey::new_unique();
        let quote_vault = Pubkey::new_unique();
        let update = pumpswap_update(address, base_vault, quote_vault, 10);
        engine.handle_account_update(update).await;

        assert_eq!(
            engine.topology().state(&address),
            Some(crate::topology::LifecycleState::Discovered)
        );

        let quote_request = QuoteRequest {
            pool_pubkey: address,
            amount_in: 1_000,
            direction: SwapDirection::BaseToQuote,
            market_cap_hint_lamports: None,
        };
        assert_eq!(engine.quote(&quote_request), Err(QuoteError::PoolInactive));
    }

    #[test]
    fn decode_dependency_recognizes_open_orders_by_magic_and_length() {
        let mut buf = vec![0u8; open_orders::EXACT_LEN];
        buf[0..5].copy_from_slice(b"serum");
        buf[85..93].copy_from_slice(&42u64.to_le_bytes());
        let programs = VenuePrograms {
            raydium_v4_program: Pubkey::new_unique(),
            raydium_clmm_program: Pubkey::new_unique(),
            meteora_dlmm_program: Pubkey::new_unique(),
            fee_program: Pubkey::new_unique(),
            fee_config_seed_program: Pubkey::new_unique(),
            pumpswap_global_config: Pubkey::new_unique(),
            bin_array_radius: 1,
        };
        let dependency =
            decode_dependency(&buf, Pubkey::new_unique(), &Pubkey::new_unique(), &programs).unwrap();
        match dependency {
            Dependency::OpenOrders(oo) => assert_eq!(oo.base_token_total, 42),
            _ => panic!("expected OpenOrders"),
        }
    }
}
