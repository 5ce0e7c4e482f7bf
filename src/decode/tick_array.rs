//! TickArray decoder — 60 ticks per array, concentrated-liquidity
//! dependency entity consumed by the RaydiumClmm simulator's
//! tick-crossing loop.
//!
//! Note on sizing: the on-chain account is documented as both "10240
//! bytes" total and "170 bytes" per tick for 60 ticks, which do not
//! multiply out exactly once the 44-byte header is included (44 + 60*170
//! = 10244). `TOTAL_LEN` below is kept as the documented nominal minimum;
//! actual memory safety comes
//! from the per-field bounds checks in `primitives`, not from pre-checking
//! an exact total, so the four-byte discrepancy cannot cause an
//! out-of-bounds read either way.

use solana_sdk::pubkey::Pubkey;

use super::error::DecodeError;
use super::primitives::*;

pub const DISCRIMINATOR: [u8; 8] = [0xc0, 0x9b, 0x55, 0xcd, 0x31, 0xf9, 0x81, 0x2a];
pub const TOTAL_LEN: usize = 10240;
pub const TICKS_PER_ARRAY: usize = 60;
pub const TICK_STRIDE: usize = 170;
const HEADER_LEN: usize = 44; // 8 (discriminator) + 32 (poolId) + 4 (startTickIndex)

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub index: i32,
    pub liquidity_net: i128,
    pub liquidity_gross: u128,
    pub fee_growth_outside_0_x64: u128,
    pub fee_growth_outside_1_x64: u128,
}

impl Tick {
    /// A tick is initialized iff its gross liquidity is nonzero.
    pub fn initialized(&self) -> bool {
        self.liquidity_gross != 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickArray {
    pub address: Pubkey,
    pub pool_id: Pubkey,
    pub start_tick_index: i32,
    pub ticks: Vec<Tick>,
}

pub fn decode(buf: &[u8], address: Pubkey) -> Result<TickArray, DecodeError> {
    check_discriminator(buf, DISCRIMINATOR)?;
    require_len(buf, HEADER_LEN)?;

    let pool_id = pubkey_at(buf, 8)?;
    let start_tick_index = i32_le(buf, 40)?;

    let mut ticks = Vec::with_capacity(TICKS_PER_ARRAY);
    for i in 0..TICKS_PER_ARRAY {
        let base = HEADER_LEN + i * TICK_STRIDE;
        let index = i32_le(buf, base)?;
        let liquidity_net = i128_le(buf, base + 4)?;
        let liquidity_gross = u128_le(buf, base + 20)?;
        let fee_growth_outside_0_x64 = u128_le(buf, base + 36)?;
        let fee_growth_outside_1_x64 = u128_le(buf, base + 52)?;
        ticks.push(Tick {
            index,
            liquidity_net,
            liquidity_gross,
            fee_growth_outside_0_x64,
            fee_growth_outside_1_x64,
        });
    }

    Ok(TickArray {
        address,
        pool_id,
        start_tick_index,
        ticks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Vec<u8> {
        let mut buf = vec![0u8; HEADER_LEN + TICKS_PER_ARRAY * TICK_STRIDE];
        buf[0..8].copy_from_slice(&DISCRIMINATOR);
        buf[40..44].copy_from_slice(&(-120i32).to_le_bytes());
        let tick0 = HEADER_LEN;
        buf[tick0..tick0 + 4].copy_from_slice(&(-120i32).to_le_bytes());
        buf[tick0 + 20..tick0 + 36].copy_from_slice(&500u128.to_le_bytes());
        buf
    }

    #[test]
    fn decodes_header_and_first_tick() {
        let array = decode(&fixture(), Pubkey::new_unique()).unwrap();
        assert_eq!(array.start_tick_index, -120);
        assert_eq!(array.ticks.len(), TICKS_PER_ARRAY);
        assert_eq!(array.ticks[0].index, -120);
        assert_eq!(array.ticks[0].liquidity_gross, 500);
        assert!(array.ticks[0].initialized());
        assert!(!array.ticks[1].initialized());
    }

    #[test]
    fn negative_liquidity_net_round_trips_two_complement() {
        let mut buf = fixture();
        let tick0 = HEADER_LEN;
        buf[tick0 + 4..tick0 + 20].copy_from_slice(&(-42i128).to_le_bytes());
        let array = decode(&buf, Pubkey::new_unique()).unwrap();
        assert_eq!(array.ticks[0].liquidity_net, -42);
    }
}
