//! # Pool State Engine
//!
//! An off-chain AMM pool-state engine that mirrors, in real time, the
//! authoritative on-chain state of four DEX venues and exposes a
//! deterministic, integer-exact swap quoter over that state.
//!
//! ## Architecture
//!
//! Four layers, leaves first:
//!
//! - `decode`: bit-exact binary account decoders (L1)
//! - `cache`: write-version-ordered coherent state cache (L2)
//! - `topology`: per-pool dependency lifecycle state machine (L3)
//! - `sim`: integer-exact swap simulators, one per venue shape (L4)
//! - `quote`: the external quoting surface tying L1-L4 together (L5)
//!
//! `types` holds shared scalar types, `ingress`/`collab` fix the shape of
//! the boundary to the streaming transport and bootstrap RPC (both
//! external collaborators), and `engine` is the stateful orchestrator that
//! owns the cache and topology registry and drives the ingress dispatch.
//!
//! ## Safety
//!
//! This crate submits no transactions, routes across no venues, and holds
//! no private keys. It is a read-only state mirror and quoter.

pub mod cache;
pub mod collab;
pub mod config;
pub mod decode;
pub mod engine;
pub mod ingress;
pub mod logging;
pub mod quote;
pub mod sim;
pub mod topology;
pub mod types;

pub use config::EngineConfig;
pub use engine::Engine;
pub use quote::{QuoteError, QuoteRequest, QuoteResponse};
