//! RaydiumV4 pool decoder — constant-product + central-limit-order-book
//! hybrid. Native (non-Anchor) layout: no discriminator, identified by
//! `(ownerProgram, exactDataLength)`. Offsets below are taken as
//! authoritative over the teacher's `dex/raydium_amm.rs`, which the
//! manual-slice-decode *idiom* here is grounded on.

use solana_sdk::pubkey::Pubkey;

use super::error::DecodeError;
use super::primitives::*;

pub const EXACT_LEN: usize = 752;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaydiumV4Pool {
    pub address: Pubkey,
    pub status: u64,
    pub base_decimal: u64,
    pub quote_decimal: u64,
    pub swap_fee_numerator: u64,
    pub swap_fee_denominator: u64,
    pub base_need_take_pnl: u64,
    pub quote_need_take_pnl: u64,
    pub pool_open_time: u64,
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub lp_mint: Pubkey,
    pub open_orders: Pubkey,
    pub market_id: Pubkey,
    pub market_program_id: Pubkey,
    pub target_orders: Pubkey,
    pub owner: Pubkey,
    pub lp_reserve: u64,
}

pub fn decode(
    buf: &[u8],
    address: Pubkey,
    owner: &Pubkey,
    expected_owner: &Pubkey,
) -> Result<RaydiumV4Pool, DecodeError> {
    if owner != expected_owner {
        return Err(DecodeError::OwnerMismatch {
            expected: *expected_owner,
            actual: *owner,
        });
    }
    require_exact_len(buf, EXACT_LEN)?;

    let status = u64_le(buf, 0)?;
    let base_decimal = u64_le(buf, 32)?;
    let quote_decimal = u64_le(buf, 40)?;
    if base_decimal > 18 || quote_decimal > 18 {
        return Err(DecodeError::FieldOutOfRange { offset: 32, len: 8 });
    }
    let swap_fee_numerator = u64_le(buf, 176)?;
    let swap_fee_denominator = u64_le(buf, 184)?;
    let base_need_take_pnl = u64_le(buf, 192)?;
    let quote_need_take_pnl = u64_le(buf, 200)?;
    let pool_open_time = u64_le(buf, 224)?;
    let base_vault = pubkey_at(buf, 336)?;
    let quote_vault = pubkey_at(buf, 368)?;
    let base_mint = pubkey_at(buf, 400)?;
    let quote_mint = pubkey_at(buf, 432)?;
    let lp_mint = pubkey_at(buf, 464)?;
    let open_orders = pubkey_at(buf, 496)?;
    let market_id = pubkey_at(buf, 528)?;
    let market_program_id = pubkey_at(buf, 560)?;
    let target_orders = pubkey_at(buf, 592)?;
    let owner_field = pubkey_at(buf, 688)?;
    let lp_reserve = u64_le(buf, 720)?;

    Ok(RaydiumV4Pool {
        address,
        status,
        base_decimal,
        quote_decimal,
        swap_fee_numerator,
        swap_fee_denominator,
        base_need_take_pnl,
        quote_need_take_pnl,
        pool_open_time,
        base_vault,
        quote_vault,
        base_mint,
        quote_mint,
        lp_mint,
        open_orders,
        market_id,
        market_program_id,
        target_orders,
        owner: owner_field,
        lp_reserve,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Vec<u8>, Pubkey) {
        let mut buf = vec![0u8; EXACT_LEN];
        buf[32..40].copy_from_slice(&6u64.to_le_bytes());
        buf[40..48].copy_from_slice(&9u64.to_le_bytes());
        buf[176..184].copy_from_slice(&25u64.to_le_bytes());
        buf[184..192].copy_from_slice(&10_000u64.to_le_bytes());
        let program = Pubkey::new_unique();
        buf[336..368].copy_from_slice(Pubkey::new_unique().as_ref());
        (buf, program)
    }

    #[test]
    fn decodes_exact_length_pool() {
        let (buf, program) = fixture();
        let pool = decode(&buf, Pubkey::new_unique(), &program, &program).unwrap();
        assert_eq!(pool.base_decimal, 6);
        assert_eq!(pool.quote_decimal, 9);
        assert_eq!(pool.swap_fee_numerator, 25);
        assert_eq!(pool.swap_fee_denominator, 10_000);
    }

    #[test]
    fn rejects_wrong_owner() {
        let (buf, program) = fixture();
        let other = Pubkey::new_unique();
        let err = decode(&buf, Pubkey::new_unique(), &other, &program).unwrap_err();
        assert!(matches!(err, DecodeError::OwnerMismatch { .. }));
    }

    #[test]
    fn rejects_wrong_length() {
        let (mut buf, program) = fixture();
        buf.push(0);
        let err = decode(&buf, Pubkey::new_unique(), &program, &program).unwrap_err();
        assert!(matches!(err, DecodeError::LengthMismatch { .. }));
    }

    #[test]
    fn rejects_decimals_out_of_range() {
        let (mut buf, program) = fixture();
        buf[32..40].copy_from_slice(&19u64.to_le_bytes());
        let err = decode(&buf, Pubkey::new_unique(), &program, &program).unwrap_err();
        assert!(matches!(err, DecodeError::FieldOutOfRange { .. }));
    }
}
