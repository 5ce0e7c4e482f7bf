//! Trace event schema emitted once per `apply()` call: decode, cache
//! apply, lifecycle notify and trace emit happen synchronously, exactly
//! once per update. The trace sink is the one resource in this engine
//! that may be shared across producers — everything else is single-owner.

use solana_sdk::pubkey::Pubkey;

use crate::types::{Origin, Slot, WriteVersion};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    pub applied_at_ms: u64,
    pub cache_type: &'static str,
    pub pubkey: Pubkey,
    pub slot: Slot,
    pub write_version: WriteVersion,
    pub cache_key: String,
    pub data_length: usize,
    pub source: Origin,
    pub rejected: bool,
    pub existing_slot: Option<Slot>,
    pub existing_write_version: Option<WriteVersion>,
    pub evicted: bool,
}

/// Multi-producer-safe sink for trace events. Implementations may drop
/// events under backpressure, but a drop must be observable —
/// `dropped_count` is the countable side of that contract.
pub trait TraceSink: Send {
    fn emit(&mut self, event: TraceEvent);
    fn dropped_count(&self) -> u64 {
        0
    }
}

/// In-process test double: records every event it sees, never drops.
#[derive(Debug, Default)]
pub struct RecordingTraceSink {
    pub events: Vec<TraceEvent>,
}

impl TraceSink for RecordingTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}
