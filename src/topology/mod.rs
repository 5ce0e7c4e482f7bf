//! L3: the pool topology lifecycle. Discovers pools, resolves their
//! dependencies, freezes a named set for safe simulation, and re-freezes
//! on price drift.

pub mod frozen;
pub mod registry;
pub mod resolver;
pub mod state;

pub use frozen::{BinArrayRef, FrozenTopology, TickArrayRef};
pub use registry::TopologyRegistry;
pub use resolver::VenuePrograms;
pub use state::{LifecycleEvent, LifecycleEventType, LifecycleState};
