//! BinArray decoder — 70 bins per array, discrete-liquidity dependency
//! entity consumed by the MeteoraDlmm simulator's bin-walk.
//!
//! The BinArray header is 56 bytes covering `index:i64, version:i64,
//! lbPair:Pubkey` (8+8+32 = 48 bytes) with no discriminator literal named
//! — the extra 8 bytes needed to reach 56 are the account's leading
//! discriminator, present on-chain but whose exact value isn't pinned
//! down here (unlike TickArray/AmmConfig/etc, which are given literal hex
//! discriminators). We therefore read past
//! those 8 bytes without asserting their value, the same way RaydiumV4's
//! pool is identified without a discriminator at all.

use solana_sdk::pubkey::Pubkey;

use super::error::DecodeError;
use super::primitives::*;

pub const BINS_PER_ARRAY: usize = 70;
pub const BIN_STRIDE: usize = 144;
const HEADER_LEN: usize = 56;
const DISCRIMINATOR_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bin {
    pub amount_x: u64,
    pub amount_y: u64,
    pub liquidity_supply: u128,
    pub fee_amount_x: u64,
    pub fee_amount_y: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinArray {
    pub address: Pubkey,
    pub index: i64,
    pub version: i64,
    pub lb_pair: Pubkey,
    pub bins: Vec<Bin>,
}

impl BinArray {
    /// Global bin id of `bins[0]`: `startBinId = index * 70`.
    pub fn start_bin_id(&self) -> i64 {
        self.index * BINS_PER_ARRAY as i64
    }
}

pub fn decode(buf: &[u8], address: Pubkey) -> Result<BinArray, DecodeError> {
    require_len(buf, HEADER_LEN)?;

    let index = i64_le(buf, DISCRIMINATOR_LEN)?;
    let version = i64_le(buf, DISCRIMINATOR_LEN + 8)?;
    let lb_pair = pubkey_at(buf, DISCRIMINATOR_LEN + 16)?;

    let mut bins = Vec::with_capacity(BINS_PER_ARRAY);
    for i in 0..BINS_PER_ARRAY {
        let base = HEADER_LEN + i * BIN_STRIDE;
        let amount_x = u64_le(buf, base)?;
        let amount_y = u64_le(buf, base + 8)?;
        let liquidity_supply = u128_le(buf, base + 16)?;
        let fee_amount_x = u64_le(buf, base + 32)?;
        let fee_amount_y = u64_le(buf, base + 40)?;
        bins.push(Bin {
            amount_x,
            amount_y,
            liquidity_supply,
            fee_amount_x,
            fee_amount_y,
        });
    }

    Ok(BinArray {
        address,
        index,
        version,
        lb_pair,
        bins,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Vec<u8> {
        let mut buf = vec![0u8; HEADER_LEN + BINS_PER_ARRAY * BIN_STRIDE];
        buf[8..16].copy_from_slice(&3i64.to_le_bytes());
        let bin0 = HEADER_LEN;
        buf[bin0..bin0 + 8].copy_from_slice(&1_000u64.to_le_bytes());
        buf[bin0 + 8..bin0 + 16].copy_from_slice(&2_000u64.to_le_bytes());
        buf
    }

    #[test]
    fn decodes_header_and_first_bin() {
        let array = decode(&fixture(), Pubkey::new_unique()).unwrap();
        assert_eq!(array.index, 3);
        assert_eq!(array.start_bin_id(), 210);
        assert_eq!(array.bins.len(), BINS_PER_ARRAY);
        assert_eq!(array.bins[0].amount_x, 1_000);
        assert_eq!(array.bins[0].amount_y, 2_000);
    }
}
