//! OpenOrders decoder — Serum-style order-book participant record.
//! Required by the RaydiumV4 simulator to compute effective reserves;
//! base/quote totals here are added to vault balances.

use solana_sdk::pubkey::Pubkey;

use super::error::DecodeError;
use super::primitives::*;

pub const EXACT_LEN: usize = 3228;
const MAGIC: &[u8; 5] = b"serum";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOrders {
    pub address: Pubkey,
    pub version: u8,
    pub market: Pubkey,
    pub owner: Pubkey,
    pub base_token_free: u64,
    pub base_token_total: u64,
    pub quote_token_free: u64,
    pub quote_token_total: u64,
}

pub fn decode(buf: &[u8], address: Pubkey) -> Result<OpenOrders, DecodeError> {
    require_exact_len(buf, EXACT_LEN)?;
    let magic = bytes_at(buf, 0, 5)?;
    if magic != MAGIC {
        return Err(DecodeError::FieldOutOfRange { offset: 0, len: 5 });
    }

    let version = u8_at(buf, 5)?;
    let market = pubkey_at(buf, 13)?;
    let owner = pubkey_at(buf, 45)?;
    let base_token_free = u64_le(buf, 77)?;
    let base_token_total = u64_le(buf, 85)?;
    let quote_token_free = u64_le(buf, 93)?;
    let quote_token_total = u64_le(buf, 101)?;

    Ok(OpenOrders {
        address,
        version,
        market,
        owner,
        base_token_free,
        base_token_total,
        quote_token_free,
        quote_token_total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Vec<u8> {
        let mut buf = vec![0u8; EXACT_LEN];
        buf[0..5].copy_from_slice(MAGIC);
        buf[77..85].copy_from_slice(&50_000u64.to_le_bytes());
        buf[93..101].copy_from_slice(&0u64.to_le_bytes());
        buf
    }

    #[test]
    fn decodes_totals() {
        let oo = decode(&fixture(), Pubkey::new_unique()).unwrap();
        assert_eq!(oo.base_token_free, 50_000);
        assert_eq!(oo.quote_token_free, 0);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut buf = fixture();
        buf[0] = b'x';
        let err = decode(&buf, Pubkey::new_unique()).unwrap_err();
        assert!(matches!(err, DecodeError::FieldOutOfRange { .. }));
    }
}
