//! Shared scalar types used across decoders, the cache and the topology
//! lifecycle. Kept deliberately small: the engine has one closed notion of
//! "which venue", "which slot", "which write version" and everything else
//! builds on `solana_sdk::pubkey::Pubkey`.

use solana_sdk::pubkey::Pubkey;
use std::fmt;

/// Slot number a piece of account data was observed at.
pub type Slot = u64;

/// Per-account write ordinal used to break ties within a slot. Comes from
/// the ingress transport (validator write version for live updates,
/// a bootstrap-assigned monotonic counter for snapshot reads).
pub type WriteVersion = u64;

/// Which DEX venue a pool belongs to. Closed set — exactly four venues
/// are in scope and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VenueId {
    PumpSwap,
    RaydiumV4,
    RaydiumClmm,
    MeteoraDlmm,
}

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VenueId::PumpSwap => "pumpswap",
            VenueId::RaydiumV4 => "raydium_v4",
            VenueId::RaydiumClmm => "raydium_clmm",
            VenueId::MeteoraDlmm => "meteora_dlmm",
        };
        f.write_str(s)
    }
}

/// Where a cached record's bytes came from. The cache must never silently
/// prefer one origin over another on ordering grounds alone — origin is
/// carried for observability, not for ordering (see `cache::entry`).
///
/// One-for-one with the three ingress sources an account update can
/// arrive from: `Live` is the live stream, `Bootstrap` is a snapshot
/// fetch, `RpcFetch` is an on-demand re-fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Delivered by the live account-update stream.
    Live,
    /// Delivered by a bootstrap snapshot fetch.
    Bootstrap,
    /// Delivered by an on-demand RPC re-fetch (e.g. a lifecycle-triggered
    /// dependency resolution that didn't want to wait for the stream).
    RpcFetch,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Origin::Live => "grpc",
            Origin::Bootstrap => "bootstrap",
            Origin::RpcFetch => "rpc-fetch",
        };
        f.write_str(s)
    }
}

/// Which side of a pool's two tokens a swap moves from. Every venue's
/// simulator is phrased in terms of this closed pair rather than
/// venue-specific jargon (`zeroForOne`, `baseToQuote`, `XtoY`) — direction
/// is the one piece of swap-call shape shared by all four simulators.
///
/// Per-venue mapping (recorded in DESIGN.md as each venue has its own
/// token-order convention): PumpSwap/RaydiumV4 base/quote map directly;
/// RaydiumClmm's `token0`/`token1` map to base/quote respectively, so
/// `BaseToQuote` is `zeroForOne`; MeteoraDlmm's `tokenX`/`tokenY` map to
/// base/quote respectively, so `BaseToQuote` is `XtoY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
    BaseToQuote,
    QuoteToBase,
}

impl SwapDirection {
    /// `true` for the direction RaydiumClmm calls `zeroForOne`.
    pub fn is_zero_for_one(self) -> bool {
        matches!(self, SwapDirection::BaseToQuote)
    }
}

/// Fee rate in basis points (denominator `10_000`) for each of the three
/// buckets a quote response breaks fees down into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeesBps {
    pub lp_bps: u64,
    pub protocol_bps: u64,
    pub coin_creator_bps: u64,
}

impl FeesBps {
    /// `lpBps + protocolBps` — the rate actually applied to constant-product
    /// math. `coinCreatorBps` is informational only and excluded from
    /// trade math.
    pub fn trade_fee_bps(&self) -> u64 {
        self.lp_bps + self.protocol_bps
    }
}

/// Absolute fee amounts in base units, split the same three ways as
/// [`FeesBps`]. This is the shape every simulator returns and the shape
/// named in the egress quote response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeBreakdown {
    pub lp: u64,
    pub protocol: u64,
    pub coin_creator: u64,
}

/// Renders a pubkey plus an `i32` index as a lowercase hex string, used for
/// the cross-pool dependency maps that are naturally keyed by
/// (pool, index) rather than by a single pubkey — e.g. tick arrays and bin
/// arrays keyed by their owning pool and array index.
pub fn hex_key(pubkey: &Pubkey, index: i32) -> String {
    hex_key_str(pubkey, &index.to_string())
}

/// Same keying scheme as [`hex_key`] for an `i64` index — BinArray's
/// `index` field is `i64` where TickArray's `startTickIndex` is `i32`.
pub fn hex_key64(pubkey: &Pubkey, index: i64) -> String {
    hex_key_str(pubkey, &index.to_string())
}

fn hex_key_str(pubkey: &Pubkey, index: &str) -> String {
    let mut s = String::with_capacity(64 + 1 + index.len());
    for byte in pubkey.to_bytes() {
        s.push_str(&format!("{:02x}", byte));
    }
    s.push('-');
    s.push_str(index);
    s
}
