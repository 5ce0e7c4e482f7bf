//! `FrozenTopology` — the named set of accounts a pool's quoter will read,
//! stable between freezes.

use solana_sdk::pubkey::Pubkey;

use crate::types::{Slot, VenueId};

/// A tick array named by a frozen topology: its start-tick index and the
/// pubkey it lives at (so the quoter never has to re-derive a PDA).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickArrayRef {
    pub start_tick_index: i32,
    pub pubkey: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinArrayRef {
    pub index: i64,
    pub pubkey: Pubkey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrozenTopology {
    pub pool_pubkey: Pubkey,
    pub venue: VenueId,
    pub frozen_at_slot: Slot,
    pub vault_base: Option<Pubkey>,
    pub vault_quote: Option<Pubkey>,
    pub amm_config: Option<Pubkey>,
    pub global_config: Option<Pubkey>,
    pub fee_config: Option<Pubkey>,
    pub open_orders: Option<Pubkey>,
    pub tick_arrays: Vec<TickArrayRef>,
    pub bin_arrays: Vec<BinArrayRef>,
}

impl FrozenTopology {
    /// Every pubkey this topology names — every account the simulator for
    /// its venue will read.
    pub fn required_pubkeys(&self) -> Vec<Pubkey> {
        let mut out = vec![self.pool_pubkey];
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

    pub fn tick_range(&self) -> Option<(i32, i32)> {
        let min = self.tick_arrays.iter().map(|t| t.start_tick_index).min()?;
        let max = self.tick_arrays.iter().map(|t| t.start_tick_index).max()?;
        Some((min, max))
    }

    pub fn bin_range(&self) -> Option<(i64, i64)> {
        let min = self.bin_arrays.iter().map(|b| b.index).min()?;
        let max = self.bin_arrays.iter().map(|b| b.index).max()?;
        Some((min, max))
    }

    /// `true` while `tick` lies inside the covered tick-array window. A
    /// start-tick index covers the 60 ticks
    /// `[start, start + spacing*60)`; the caller supplies `spacing` since
    /// the topology only stores array start indices.
    pub fn covers_tick(&self, tick: i32, spacing: i32) -> bool {
        let span = spacing * 60;
        self.tick_arrays
            .iter()
            .any(|t| tick >= t.start_tick_index && tick < t.start_tick_index + span)
    }

    /// `true` while `active_array_index` lies inside the covered bin-array
    /// window.
    pub fn covers_bin_array(&self, active_array_index: i64) -> bool {
        self.bin_arrays.iter().any(|b| b.index == active_array_index)
    }
}
