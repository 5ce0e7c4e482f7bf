//! Simulator failure taxonomy. Distinct from [`crate::decode::error::DecodeError`]
//! and [`crate::quote::QuoteError`] — a simulator only ever fails because
//! it walked past the ticks/bins a `FrozenTopology` actually names, or
//! because an intermediate computation would have overflowed its integer
//! type. Overflow is treated as a fatal defect to be prevented by wide
//! types and saturating/checked ops; `ArithmeticOverflow` exists as the
//! explicit `Result` a checked op surfaces instead of panicking, should
//! our bounds reasoning ever be wrong.
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    #[error("swap walked past the supplied tick-array coverage")]
    InsufficientTickCoverage,
    #[error("swap walked past the supplied bin-array coverage")]
    InsufficientBinCoverage,
    #[error("arithmetic overflow in swap math")]
    ArithmeticOverflow,
}
