//! External-collaborator seams. Streaming transport, bootstrap RPC, and
//! trace persistence are all treated as external collaborators and kept
//! out of this crate's scope. These traits fix the *shape* of the
//! boundary the engine talks across without pulling in a yellowstone-grpc
//! client, an RPC bootstrap client, or a persistence layer — the teacher
//! repo's own `engine::mempool_listener` plays the analogous "owns a
//! subscription, pushes typed events inward" role, which this trait
//! generalizes to an interface instead of a concrete websocket client.

use async_trait::async_trait;

use crate::ingress::{AccountUpdate, TxUpdate};

/// Produces the live ingress stream. A production impl wraps a streaming
/// RPC subscription; tests and the demo binary use an in-memory double.
#[async_trait]
pub trait StreamSource: Send + Sync {
    async fn next_account_update(&mut self) -> Option<AccountUpdate>;
    async fn next_tx_update(&mut self) -> Option<TxUpdate>;
}

/// Fetches a single missing account on demand when the topology lifecycle
/// discovers an unresolved dependency (the bootstrap loop). Fetches
/// re-enter through `Cache::apply_account` tagged
/// `Origin::Bootstrap`, same as any other update.
#[async_trait]
pub trait BootstrapFetcher: Send + Sync {
    async fn fetch_account(&self, pubkey: solana_sdk::pubkey::Pubkey) -> Option<AccountUpdate>;
}

/// Durable persistence for the trace stream — persisting traces to a
/// relational store for later analysis is out of scope for this crate.
/// `cache::trace::TraceSink` is the in-process emission point; this trait
/// is the seam a production build would use to ship those events out.
#[async_trait]
pub trait TracePersistence: Send + Sync {
    async fn persist(&self, events: Vec<crate::cache::trace::TraceEvent>);
}
