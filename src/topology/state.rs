//! Per-pool lifecycle states and the transition events they emit.

use solana_sdk::pubkey::Pubkey;

use crate::types::Slot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unseen,
    Discovered,
    Frozen,
    Active,
    Refreshing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEventType {
    Discover,
    Freeze,
    Activate,
    RefreshStart,
}

/// `(pool, fromState, toState, reason, slot)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleEvent {
    pub event_type: LifecycleEventType,
    pub pool: Pubkey,
    pub from: LifecycleState,
    pub to: LifecycleState,
    pub reason: Option<String>,
    pub slot: Slot,
}
