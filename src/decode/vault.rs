//! SPL token account decoder ("Vault" in the glossary). Rather than
//! hand-rolling the SPL token account layout, this defers to
//! `spl_token::state::Account::unpack`, exactly the way the teacher's
//! `main.rs`/`dex/*.rs` call sites do (`spl_token::state::Account::unpack(&account_data.data)`);
//! the expected field layout (`amount:u64@64, mint:Pubkey@0`) is the same
//! layout that type implements.

use solana_program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use spl_token::state::Account as SplTokenAccount;

use super::error::DecodeError;
use super::primitives::require_len;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vault {
    pub address: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
}

pub fn decode(buf: &[u8], address: Pubkey) -> Result<Vault, DecodeError> {
    require_len(buf, SplTokenAccount::LEN)?;
    let account = SplTokenAccount::unpack(&buf[..SplTokenAccount::LEN]).map_err(|_| {
        DecodeError::LengthMismatch {
            expected: SplTokenAccount::LEN,
            actual: buf.len(),
        }
    })?;
    Ok(Vault {
        address,
        mint: account.mint,
        amount: account.amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_amount_and_mint() {
        let mint = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let account = SplTokenAccount {
            mint,
            owner,
            amount: 123_456,
            delegate: solana_sdk::program_option::COption::None,
            state: spl_token::state::AccountState::Initialized,
            is_native: solana_sdk::program_option::COption::None,
            delegated_amount: 0,
            close_authority: solana_sdk::program_option::COption::None,
        };
        let mut buf = vec![0u8; SplTokenAccount::LEN];
        SplTokenAccount::pack(account, &mut buf).unwrap();

        let vault = decode(&buf, Pubkey::new_unique()).unwrap();
        assert_eq!(vault.mint, mint);
        assert_eq!(vault.amount, 123_456);
    }
}
