//! L1: account decoders. Each submodule turns a raw account byte buffer
//! into a typed record or a [`error::DecodeError`] — no cache, topology, or
//! simulator logic lives here. `account` ties the four venue pool/pair
//! decoders into one dispatcher; everything else (vaults, tick arrays, bin
//! arrays, configs) is a dependency entity decoded and looked up on its
//! own.

pub mod account;
pub mod amm_config;
pub mod bin_array;
pub mod error;
pub mod fee_config;
pub mod global_config;
pub mod meteora_dlmm;
pub mod open_orders;
pub mod pda;
pub mod primitives;
pub mod pumpswap;
pub mod raydium_clmm;
pub mod raydium_v4;
pub mod tick_array;
pub mod vault;

pub use account::{decode_pool, Pool, ProgramIds};
pub use error::DecodeError;
