//! L4: integer-exact swap simulators, one per venue shape. Each module is
//! a pure function set over plain numeric/account-derived inputs — no
//! cache or topology dependency lives in here, so a caller in `quote.rs`
//! is free to assemble inputs from whatever snapshot it has in hand.

pub mod bps;
pub mod error;
pub mod meteora_dlmm;
pub mod pumpswap;
pub mod raydium_clmm;
pub mod raydium_v4;

pub use error::SimError;
