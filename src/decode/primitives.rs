//! Little-endian integer reads and the few byte-level helpers every
//! decoder in this module needs. Every decoder in the teacher repo
//! (`dex/raydium_amm.rs`, `dex/raydium_clmm.rs`, `dex/raydium_cpmm.rs`)
//! hand-rolls `data[a..b].try_into().unwrap()` calls inline; here that's
//! centralized so a bad slice bound always turns into a typed
//! `DecodeError::LengthTooShort` instead of a panic.

use super::error::DecodeError;

#[inline]
pub fn require_len(buf: &[u8], min: usize) -> Result<(), DecodeError> {
    if buf.len() < min {
        return Err(DecodeError::LengthTooShort {
            expected: min,
            actual: buf.len(),
        });
    }
    Ok(())
}

#[inline]
pub fn require_exact_len(buf: &[u8], exact: usize) -> Result<(), DecodeError> {
    if buf.len() != exact {
        return Err(DecodeError::LengthMismatch {
            expected: exact,
            actual: buf.len(),
        });
    }
    Ok(())
}

#[inline]
pub fn u8_at(buf: &[u8], off: usize) -> Result<u8, DecodeError> {
    buf.get(off)
        .copied()
        .ok_or(DecodeError::FieldOutOfRange { offset: off, len: 1 })
}

#[inline]
pub fn u16_le(buf: &[u8], off: usize) -> Result<u16, DecodeError> {
    let end = off + 2;
    let slice = buf
        .get(off..end)
        .ok_or(DecodeError::FieldOutOfRange { offset: off, len: 2 })?;
    Ok(u16::from_le_bytes(slice.try_into().unwrap()))
}

#[inline]
pub fn u32_le(buf: &[u8], off: usize) -> Result<u32, DecodeError> {
    let end = off + 4;
    let slice = buf
        .get(off..end)
        .ok_or(DecodeError::FieldOutOfRange { offset: off, len: 4 })?;
    Ok(u32::from_le_bytes(slice.try_into().unwrap()))
}

#[inline]
pub fn i32_le(buf: &[u8], off: usize) -> Result<i32, DecodeError> {
    Ok(u32_le(buf, off)? as i32)
}

#[inline]
pub fn u64_le(buf: &[u8], off: usize) -> Result<u64, DecodeError> {
    let end = off + 8;
    let slice = buf
        .get(off..end)
        .ok_or(DecodeError::FieldOutOfRange { offset: off, len: 8 })?;
    Ok(u64::from_le_bytes(slice.try_into().unwrap()))
}

#[inline]
pub fn i64_le(buf: &[u8], off: usize) -> Result<i64, DecodeError> {
    Ok(u64_le(buf, off)? as i64)
}

/// Reads a u128 stored as two consecutive little-endian u64 limbs
/// (`lo` at `off`, `hi` at `off + 8`), the layout Raydium CLMM and
/// Meteora DLMM both use for `u128` fee-growth accumulators.
#[inline]
pub fn u128_lo_hi_le(buf: &[u8], off: usize) -> Result<u128, DecodeError> {
    let lo = u64_le(buf, off)? as u128;
    let hi = u64_le(buf, off + 8)? as u128;
    Ok(lo | (hi << 64))
}

/// Reads a plain 16-byte little-endian u128 (single contiguous field, not
/// the lo/hi limb pair above).
#[inline]
pub fn u128_le(buf: &[u8], off: usize) -> Result<u128, DecodeError> {
    let end = off + 16;
    let slice = buf
        .get(off..end)
        .ok_or(DecodeError::FieldOutOfRange { offset: off, len: 16 })?;
    Ok(u128::from_le_bytes(slice.try_into().unwrap()))
}

/// Reads a 16-byte little-endian two's-complement i128.
#[inline]
pub fn i128_le(buf: &[u8], off: usize) -> Result<i128, DecodeError> {
    let end = off + 16;
    let slice = buf
        .get(off..end)
        .ok_or(DecodeError::FieldOutOfRange { offset: off, len: 16 })?;
    Ok(i128::from_le_bytes(slice.try_into().unwrap()))
}

#[inline]
pub fn pubkey_at(buf: &[u8], off: usize) -> Result<solana_sdk::pubkey::Pubkey, DecodeError> {
    let end = off + 32;
    let slice = buf
        .get(off..end)
        .ok_or(DecodeError::FieldOutOfRange { offset: off, len: 32 })?;
    Ok(solana_sdk::pubkey::Pubkey::new_from_array(
        slice.try_into().unwrap(),
    ))
}

#[inline]
pub fn bytes_at<'a>(buf: &'a [u8], off: usize, len: usize) -> Result<&'a [u8], DecodeError> {
    buf.get(off..off + len)
        .ok_or(DecodeError::FieldOutOfRange { offset: off, len })
}

/// Checks the 8-byte Anchor discriminator at the front of `buf` against
/// `expected`.
pub fn check_discriminator(buf: &[u8], expected: [u8; 8]) -> Result<(), DecodeError> {
    require_len(buf, 8)?;
    if buf[0..8] != expected {
        return Err(DecodeError::DiscriminatorMismatch {
            expected,
            actual: buf[0..8].try_into().unwrap(),
        });
    }
    Ok(())
}
