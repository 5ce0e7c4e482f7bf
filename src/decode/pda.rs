//! Read-only PDA derivations. These never touch the network; they
//! only compute the address a dependency account is expected to live at so
//! the topology resolver (`topology::resolver`) knows what to look up in
//! the cache or enqueue to the bootstrap fetcher.

use solana_sdk::pubkey::Pubkey;

/// `["fee_config", configProgramId]`.
pub fn fee_config_pda(fee_program: &Pubkey, config_program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[b"fee_config", config_program_id.as_ref()],
        fee_program,
    )
}

/// `["tick_array", poolId, startTickIndex_as_i32_BE]`.
///
/// Unlike every other seed in this module, the tick index is encoded
/// **big-endian** — the one seed that differs from the LE convention used
/// everywhere else.
pub fn tick_array_pda(clmm_program: &Pubkey, pool_id: &Pubkey, start_tick_index: i32) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            b"tick_array",
            pool_id.as_ref(),
            &start_tick_index.to_be_bytes(),
        ],
        clmm_program,
    )
}

/// `["bin_array", lbPair, index_as_i64_LE]`.
pub fn bin_array_pda(dlmm_program: &Pubkey, lb_pair: &Pubkey, index: i64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[b"bin_array", lb_pair.as_ref(), &index.to_le_bytes()],
        dlmm_program,
    )
}
