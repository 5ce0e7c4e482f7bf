//! L2: the coherent state cache. One [`CacheStore`] per account kind, tied
//! together here so the engine has a single `apply_account` entry point
//! that dispatches a decoded record to the right store, emits exactly one
//! [`TraceEvent`] per call, and remembers which
//! store a pubkey landed in so a later deletion (closed account) can find
//! it without re-decoding.

pub mod entry;
pub mod store;
pub mod trace;

use std::collections::HashMap;

use solana_sdk::pubkey::Pubkey;

use crate::decode::amm_config::AmmConfig;
use crate::decode::bin_array::BinArray;
use crate::decode::error::DecodeError;
use crate::decode::fee_config::FeeConfig;
use crate::decode::global_config::GlobalConfig;
use crate::decode::open_orders::OpenOrders;
use crate::decode::tick_array::TickArray;
use crate::decode::vault::Vault;
use crate::decode::Pool;
use crate::ingress::AccountUpdate;
use crate::types::{hex_key, hex_key64, Origin, Slot, WriteVersion};

pub use entry::ApplyOutcome;
use store::CacheStore;
use trace::{TraceEvent, TraceSink};

/// Which per-kind store a cached record lives in. Doubles as the
/// `cacheType` field of every trace event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    Pool,
    Vault,
    TickArray,
    BinArray,
    AmmConfig,
    FeeConfig,
    GlobalConfig,
    OpenOrders,
}

impl CacheKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheKind::Pool => "pool",
            CacheKind::Vault => "vault",
            CacheKind::TickArray => "tick_array",
            CacheKind::BinArray => "bin_array",
            CacheKind::AmmConfig => "amm_config",
            CacheKind::FeeConfig => "fee_config",
            CacheKind::GlobalConfig => "global_config",
            CacheKind::OpenOrders => "open_orders",
        }
    }
}

/// Outcome of `Cache::apply_account` — a superset of [`ApplyOutcome`] that
/// also covers explicit deletion and a failed decode, the three top-level
/// results the `apply()` contract names plus the decoder boundary's own
/// failure, which never touches the cache at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyResult {
    Applied { evicted: bool },
    Rejected {
        existing_slot: Slot,
        existing_write_version: WriteVersion,
    },
    Deleted,
    DecodeFailed(DecodeError),
}

struct UpdateMeta {
    pubkey: Pubkey,
    slot: Slot,
    write_version: WriteVersion,
    source: Origin,
    data_length: usize,
}

/// Owns every per-kind store plus the trace sink. Exclusively owned by the
/// engine instance — no interior mutex.
pub struct Cache {
    pools: CacheStore<Pubkey, Pool>,
    vaults: CacheStore<Pubkey, Vault>,
    tick_arrays: CacheStore<String, TickArray>,
    bin_arrays: CacheStore<String, BinArray>,
    amm_configs: CacheStore<Pubkey, AmmConfig>,
    fee_configs: CacheStore<Pubkey, FeeConfig>,
    global_configs: CacheStore<Pubkey, GlobalConfig>,
    open_orders: CacheStore<Pubkey, OpenOrders>,
    /// Remembers which store (and cache key) a pubkey last landed in, so a
    /// zero-lamports deletion can find it without a second decode.
    key_index: HashMap<Pubkey, (CacheKind, String)>,
    trace_sink: Option<Box<dyn TraceSink>>,
    trace_dropped: u64,
}

impl Cache {
    pub fn new() -> Self {
        Self {
            pools: CacheStore::new(),
            vaults: CacheStore::new(),
            tick_arrays: CacheStore::new(),
            bin_arrays: CacheStore::new(),
            amm_configs: CacheStore::new(),
            fee_configs: CacheStore::new(),
            global_configs: CacheStore::new(),
            open_orders: CacheStore::new(),
            key_index: HashMap::new(),
            trace_sink: None,
            trace_dropped: 0,
        }
    }

    /// Same layout as [`Cache::new`] but with per-kind capacities taken
    /// from a [`crate::config::CacheConfig`] instead of
    /// `CacheStore`'s built-in default.
    pub fn with_config(config: &crate::config::CacheConfig) -> Self {
        Self {
            pools: CacheStore::with_capacity(config.max_pools),
            vaults: CacheStore::with_capacity(config.max_vaults),
            tick_arrays: CacheStore::with_capacity(config.max_tick_arrays),
            bin_arrays: CacheStore::with_capacity(config.max_bin_arrays),
            amm_configs: CacheStore::with_capacity(config.max_configs),
            fee_configs: CacheStore::with_capacity(config.max_configs),
            global_configs: CacheStore::with_capacity(config.max_configs),
            open_orders: CacheStore::with_capacity(config.max_configs),
            key_index: HashMap::new(),
            trace_sink: None,
            trace_dropped: 0,
        }
    }

    /// Registers a sink receiving one [`TraceEvent`] per `apply_*` call.
    /// Multi-producer-safe implementations may drop under backpressure;
    /// `trace_dropped_count` tracks that separately from an emit.
    pub fn set_trace_handler(&mut self, sink: Box<dyn TraceSink>) {
        self.trace_sink = Some(sink);
    }

    pub fn trace_dropped_count(&self) -> u64 {
        self.trace_dropped
    }

    fn emit_trace(&mut self, event: TraceEvent) {
        if let Some(sink) = self.trace_sink.as_mut() {
            sink.emit(event);
        } else {
            self.trace_dropped += 1;
        }
    }

    fn record_key_index(&mut self, pubkey: Pubkey, kind: CacheKind, cache_key: String) {
        self.key_index.insert(pubkey, (kind, cache_key));
    }

    fn apply_into<K, V>(
        store: &mut CacheStore<K, V>,
        key: K,
        value: V,
        meta: &UpdateMeta,
    ) -> ApplyOutcome
    where
        K: std::hash::Hash + Eq + Clone,
    {
        store.apply(key, value, meta.slot, meta.write_version, meta.source)
    }

    fn to_apply_result(outcome: ApplyOutcome) -> ApplyResult {
        match outcome {
            ApplyOutcome::Applied { evicted } => ApplyResult::Applied { evicted },
            ApplyOutcome::Rejected {
                existing_slot,
                existing_write_version,
            } => ApplyResult::Rejected {
                existing_slot,
                existing_write_version,
            },
        }
    }

    fn emit_for(
        &mut self,
        kind: CacheKind,
        meta: &UpdateMeta,
        cache_key: String,
        outcome: &ApplyResult,
    ) {
        let (rejected, existing_slot, existing_write_version) = match outcome {
            ApplyResult::Rejected {
                existing_slot,
                existing_write_version,
            } => (true, Some(*existing_slot), Some(*existing_write_version)),
            _ => (false, None, None),
        };
        let evicted = matches!(outcome, ApplyResult::Applied { evicted: true });
        self.emit_trace(TraceEvent {
            applied_at_ms: 0,
            cache_type: kind.as_str(),
            pubkey: meta.pubkey,
            slot: meta.slot,
            write_version: meta.write_version,
            cache_key,
            data_length: meta.data_length,
            source: meta.source,
            rejected,
            existing_slot,
            existing_write_version,
            evicted,
        });
    }

    pub fn apply_pool(
        &mut self,
        update: &AccountUpdate,
        pool: Pool,
    ) -> ApplyResult {
        let meta = UpdateMeta {
            pubkey: update.pubkey,
            slot: update.slot,
            write_version: update.write_version,
            source: update.source,
            data_length: update.data.len(),
        };
        let address = pool.address();
        let outcome = Self::apply_into(&mut self.pools, address, pool, &meta);
        let result = Self::to_apply_result(outcome);
        if matches!(result, ApplyResult::Applied { .. }) {
            self.record_key_index(address, CacheKind::Pool, address.to_string());
        }
        self.emit_for(CacheKind::Pool, &meta, address.to_string(), &result);
        result
    }

    pub fn apply_vault(&mut self, update: &AccountUpdate, vault: Vault) -> ApplyResult {
        let meta = self.meta_of(update);
        let address = vault.address;
        let outcome = Self::apply_into(&mut self.vaults, address, vault, &meta);
        let result = Self::to_apply_result(outcome);
        if matches!(result, ApplyResult::Applied { .. }) {
            self.record_key_index(address, CacheKind::Vault, address.to_string());
        }
        self.emit_for(CacheKind::Vault, &meta, address.to_string(), &result);
        result
    }

    pub fn apply_tick_array(&mut self, update: &AccountUpdate, array: TickArray) -> ApplyResult {
        let meta = self.meta_of(update);
        let address = array.address;
        let key = hex_key(&array.pool_id, array.start_tick_index);
        let outcome = Self::apply_into(&mut self.tick_arrays, key.clone(), array, &meta);
        let result = Self::to_apply_result(outcome);
        if matches!(result, ApplyResult::Applied { .. }) {
            self.record_key_index(address, CacheKind::TickArray, key.clone());
        }
        self.emit_for(CacheKind::TickArray, &meta, key, &result);
        result
    }

    pub fn apply_bin_array(&mut self, update: &AccountUpdate, array: BinArray) -> ApplyResult {
        let meta = self.meta_of(update);
        let address = array.address;
        let key = hex_key64(&array.lb_pair, array.index);
        let outcome = Self::apply_into(&mut self.bin_arrays, key.clone(), array, &meta);
        let result = Self::to_apply_result(outcome);
        if matches!(result, ApplyResult::Applied { .. }) {
            self.record_key_index(address, CacheKind::BinArray, key.clone());
        }
        self.emit_for(CacheKind::BinArray, &meta, key, &result);
        result
    }

    pub fn apply_amm_config(&mut self, update: &AccountUpdate, config: AmmConfig) -> ApplyResult {
        let meta = self.meta_of(update);
        let address = config.address;
        let outcome = Self::apply_into(&mut self.amm_configs, address, config, &meta);
        let result = Self::to_apply_result(outcome);
        if matches!(result, ApplyResult::Applied { .. }) {
            self.record_key_index(address, CacheKind::AmmConfig, address.to_string());
        }
        self.emit_for(CacheKind::AmmConfig, &meta, address.to_string(), &result);
        result
    }

    pub fn apply_fee_config(&mut self, update: &AccountUpdate, config: FeeConfig) -> ApplyResult {
        let meta = self.meta_of(update);
        let address = config.address;
        let outcome = Self::apply_into(&mut self.fee_configs, address, config, &meta);
        let result = Self::to_apply_result(outcome);
        if matches!(result, ApplyResult::Applied { .. }) {
            self.record_key_index(address, CacheKind::FeeConfig, address.to_string());
        }
        self.emit_for(CacheKind::FeeConfig, &meta, address.to_string(), &result);
        result
    }

    pub fn apply_global_config(
        &mut self,
        update: &AccountUpdate,
        config: GlobalConfig,
    ) -> ApplyResult {
        let meta = self.meta_of(update);
        let address = config.address;
        let outcome = Self::apply_into(&mut self.global_configs, address, config, &meta);
        let result = Self::to_apply_result(outcome);
        if matches!(result, ApplyResult::Applied { .. }) {
            self.record_key_index(address, CacheKind::GlobalConfig, address.to_string());
        }
        self.emit_for(CacheKind::GlobalConfig, &meta, address.to_string(), &result);
        result
    }

    pub fn apply_open_orders(&mut self, update: &AccountUpdate, oo: OpenOrders) -> ApplyResult {
        let meta = self.meta_of(update);
        let address = oo.address;
        let outcome = Self::apply_into(&mut self.open_orders, address, oo, &meta);
        let result = Self::to_apply_result(outcome);
        if matches!(result, ApplyResult::Applied { .. }) {
            self.record_key_index(address, CacheKind::OpenOrders, address.to_string());
        }
        self.emit_for(CacheKind::OpenOrders, &meta, address.to_string(), &result);
        result
    }

    fn meta_of(&self, update: &AccountUpdate) -> UpdateMeta {
        UpdateMeta {
            pubkey: update.pubkey,
            slot: update.slot,
            write_version: update.write_version,
            source: update.source,
            data_length: update.data.len(),
        }
    }

    /// Explicit removal for a closed account — a record is removed only
    /// when an account is explicitly marked deleted. No-op (returns
    /// `None`-shaped `ApplyResult::Deleted` is still reported) if the
    /// pubkey was never cached.
    pub fn delete(&mut self, pubkey: &Pubkey) -> ApplyResult {
        if let Some((kind, key)) = self.key_index.remove(pubkey) {
            match kind {
                CacheKind::Pool => {
                    self.pools.delete(pubkey);
                }
                CacheKind::Vault => {
                    self.vaults.delete(pubkey);
                }
                CacheKind::TickArray => {
                    self.tick_arrays.delete(&key);
                }
                CacheKind::BinArray => {
                    self.bin_arrays.delete(&key);
                }
                CacheKind::AmmConfig => {
                    self.amm_configs.delete(pubkey);
                }
                CacheKind::FeeConfig => {
                    self.fee_configs.delete(pubkey);
                }
                CacheKind::GlobalConfig => {
                    self.global_configs.delete(pubkey);
                }
                CacheKind::OpenOrders => {
                    self.open_orders.delete(pubkey);
                }
            }
        }
        ApplyResult::Deleted
    }

    pub fn get_pool(&mut self, pubkey: &Pubkey) -> Option<&Pool> {
        self.pools.get(pubkey)
    }

    pub fn get_vault(&mut self, pubkey: &Pubkey) -> Option<&Vault> {
        self.vaults.get(pubkey)
    }

    pub fn get_tick_array(&mut self, pool: &Pubkey, start_tick_index: i32) -> Option<&TickArray> {
        self.tick_arrays.get(&hex_key(pool, start_tick_index))
    }

    pub fn get_bin_array(&mut self, lb_pair: &Pubkey, index: i64) -> Option<&BinArray> {
        self.bin_arrays.get(&hex_key64(lb_pair, index))
    }

    pub fn get_amm_config(&mut self, pubkey: &Pubkey) -> Option<&AmmConfig> {
        self.amm_configs.get(pubkey)
    }

    pub fn get_fee_config(&mut self, pubkey: &Pubkey) -> Option<&FeeConfig> {
        self.fee_configs.get(pubkey)
    }

    pub fn get_global_config(&mut self, pubkey: &Pubkey) -> Option<&GlobalConfig> {
        self.global_configs.get(pubkey)
    }

    pub fn get_open_orders(&mut self, pubkey: &Pubkey) -> Option<&OpenOrders> {
        self.open_orders.get(pubkey)
    }

    /// `getByPool` for tick arrays: every tick array cached under `pool`,
    /// keyed by `(poolHex, arrayIndex)`.
    pub fn tick_arrays_for_pool(&self, pool: &Pubkey) -> Vec<&TickArray> {
        let prefix = format!("{}-", hex_prefix(pool));
        self.tick_arrays
            .iter()
            .filter(|(k, _)| k.starts_with(&prefix))
            .map(|(_, v)| v)
            .collect()
    }

    /// `getByPool` for bin arrays, same keying scheme as tick arrays.
    pub fn bin_arrays_for_pool(&self, lb_pair: &Pubkey) -> Vec<&BinArray> {
        let prefix = format!("{}-", hex_prefix(lb_pair));
        self.bin_arrays
            .iter()
            .filter(|(k, _)| k.starts_with(&prefix))
            .map(|(_, v)| v)
            .collect()
    }

    /// Evicts every tick array for `pool` whose array index falls outside
    /// `[min, max]` — tick arrays outside a pool's frozen coverage window
    /// are evicted when the topology re-freezes. Each eviction emits its
    /// own trace event with `evicted=1`.
    pub fn evict_tick_arrays_outside(&mut self, pool: &Pubkey, min: i32, max: i32) {
        let prefix = format!("{}-", hex_prefix(pool));
        let victims: Vec<String> = self
            .tick_arrays
            .iter()
            .filter(|(k, v)| k.starts_with(&prefix) && (v.start_tick_index < min || v.start_tick_index > max))
            .map(|(k, _)| k.clone())
            .collect();
        for key in victims {
            if let Some(array) = self.tick_arrays.delete(&key) {
                self.key_index.remove(&array.address);
                self.emit_trace(TraceEvent {
                    applied_at_ms: 0,
                    cache_type: CacheKind::TickArray.as_str(),
                    pubkey: array.address,
                    slot: 0,
                    write_version: 0,
                    cache_key: key,
                    data_length: 0,
                    source: Origin::Live,
                    rejected: false,
                    existing_slot: None,
                    existing_write_version: None,
                    evicted: true,
                });
            }
        }
    }

    /// Same coverage eviction for bin arrays, indexed by global bin id
    /// range rather than array index directly — callers pass the array
    /// index range (`min/70`-scale), matching `evict_tick_arrays_outside`.
    pub fn evict_bin_arrays_outside(&mut self, lb_pair: &Pubkey, min_index: i64, max_index: i64) {
        let prefix = format!("{}-", hex_prefix(lb_pair));
        let victims: Vec<String> = self
            .bin_arrays
            .iter()
            .filter(|(k, v)| k.starts_with(&prefix) && (v.index < min_index || v.index > max_index))
            .map(|(k, _)| k.clone())
            .collect();
        for key in victims {
            if let Some(array) = self.bin_arrays.delete(&key) {
                self.key_index.remove(&array.address);
                self.emit_trace(TraceEvent {
                    applied_at_ms: 0,
                    cache_type: CacheKind::BinArray.as_str(),
                    pubkey: array.address,
                    slot: 0,
                    write_version: 0,
                    cache_key: key,
                    data_length: 0,
                    source: Origin::Live,
                    rejected: false,
                    existing_slot: None,
                    existing_write_version: None,
                    evicted: true,
                });
            }
        }
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

fn hex_prefix(pubkey: &Pubkey) -> String {
    let mut s = String::with_capacity(64);
    for byte in pubkey.to_bytes() {
        s.push_str(&format!("{:02x}", byte));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::pumpswap::PumpSwapPool;

    fn update(pubkey: Pubkey, slot: Slot, write_version: WriteVersion) -> AccountUpdate {
        AccountUpdate {
            pubkey,
            owner: Pubkey::new_unique(),
            data: vec![0u8; 4],
            slot,
            write_version,
            lamports: 1,
            source: Origin::Live,
        }
    }

    fn pool(address: Pubkey) -> Pool {
        Pool::PumpSwap(PumpSwapPool {
            address,
            pool_bump: 0,
            index: 0,
            creator: Pubkey::new_unique(),
            base_mint: Pubkey::new_unique(),
            quote_mint: Pubkey::new_unique(),
            lp_mint: Pubkey::new_unique(),
            pool_base_token_account: Pubkey::new_unique(),
            pool_quote_token_account: Pubkey::new_unique(),
            lp_supply: 0,
        })
    }

    #[test]
    fn stale_write_is_rejected_and_traced() {
        let mut cache = Cache::new();
        let address = Pubkey::new_unique();
        let u1 = update(address, 100, 5);
        cache.apply_pool(&u1, pool(address));

        let u2 = update(address, 100, 4);
        let result = cache.apply_pool(&u2, pool(address));
        assert_eq!(
            result,
            ApplyResult::Rejected {
                existing_slot: 100,
                existing_write_version: 5
            }
        );
    }

    #[test]
    fn deletion_removes_from_key_index_and_store() {
        let mut cache = Cache::new();
        let address = Pubkey::new_unique();
        let u1 = update(address, 100, 5);
        cache.apply_pool(&u1, pool(address));
        assert!(cache.get_pool(&address).is_some());

        cache.delete(&address);
        assert!(cache.get_pool(&address).is_none());
    }

    #[test]
    fn trace_is_emitted_exactly_once_per_apply() {
        use std::sync::{Arc, Mutex};

        struct SharedSink(Arc<Mutex<Vec<TraceEvent>>>);
        impl TraceSink for SharedSink {
            fn emit(&mut self, event: TraceEvent) {
                self.0.lock().unwrap().push(event);
            }
        }

        let events = Arc::new(Mutex::new(Vec::new()));
        let mut cache = Cache::new();
        cache.set_trace_handler(Box::new(SharedSink(events.clone())));
        let address = Pubkey::new_unique();
        cache.apply_pool(&update(address, 1, 0), pool(address));
        cache.apply_pool(&update(address, 1, 0), pool(address));

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(!events[0].rejected);
        assert!(events[1].rejected);
        assert_eq!(cache.trace_dropped_count(), 0);
    }
}
