//! Ingress record shapes. These are concept-level: the
//! transport that actually produces them (a streaming RPC, a bootstrap
//! fetcher) is an external collaborator (see [`crate::collab`]) and out of
//! scope here. What lives in this crate is only the shape the engine reads.

use solana_sdk::pubkey::Pubkey;

use crate::types::{Origin, Slot, WriteVersion};

/// A single account mutation, as delivered by the stream consumer or a
/// bootstrap RPC fetch. `lamports == 0` is this engine's signal that the
/// account was closed. A cached record should be removed only when an
/// account is explicitly marked deleted; a zeroed lamports balance is the
/// on-chain convention for a closed account and is the one signal
/// available out of this record's fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountUpdate {
    pub pubkey: Pubkey,
    pub owner: Pubkey,
    pub data: Vec<u8>,
    pub slot: Slot,
    pub write_version: WriteVersion,
    pub lamports: u64,
    pub source: Origin,
}

impl AccountUpdate {
    pub fn is_deletion(&self) -> bool {
        self.lamports == 0
    }
}

/// Token balance entry inside a [`TxMeta`] pre/post array. Only `mint`,
/// `owner` and `amount` are read by the core; the rest of a transaction's
/// meta is opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBalance {
    pub account_index: u8,
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TxMeta {
    pub pre_lamports: Vec<u64>,
    pub post_lamports: Vec<u64>,
    pub pre_token_balances: Vec<TokenBalance>,
    pub post_token_balances: Vec<TokenBalance>,
    pub fee: u64,
    pub err: Option<String>,
}

/// A confirmed-transaction event. `message` is kept as opaque bytes — this
/// crate never decodes instruction data out of it; only the lamport and
/// token-balance deltas in `meta` are meaningful to the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxUpdate {
    pub signature: [u8; 64],
    pub slot: Slot,
    pub message: Vec<u8>,
    pub meta: TxMeta,
}

impl TxUpdate {
    /// Per-account-index lamport delta (`post - pre`), the one derived
    /// quantity the core ever asks of a `TxUpdate`.
    pub fn lamport_delta(&self, account_index: usize) -> Option<i128> {
        let pre = *self.meta.pre_lamports.get(account_index)? as i128;
        let post = *self.meta.post_lamports.get(account_index)? as i128;
        Some(post - pre)
    }

    /// Token-balance delta for `account_index`, if that index appears in
    /// both the pre and post arrays.
    pub fn token_balance_delta(&self, account_index: u8) -> Option<i128> {
        let pre = self
            .meta
            .pre_token_balances
            .iter()
            .find(|b| b.account_index == account_index)?;
        let post = self
            .meta
            .post_token_balances
            .iter()
            .find(|b| b.account_index == account_index)?;
        Some(post.amount as i128 - pre.amount as i128)
    }
}
