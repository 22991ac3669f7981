//! Global Protocol Configuration
//!
//! This account stores protocol-wide settings that apply to all pools.

use anchor_lang::prelude::*;

/// Global configuration account (singleton PDA)
///
/// Seeds: ["config"]
#[account]
#[derive(InitSpace)]
pub struct GlobalConfig {
    /// Protocol authority. Signs `execute_burn` for every pool.
    pub authority: Pubkey,

    /// Collateral token mint pools trade against (e.g. USDC)
    pub collateral_mint: Pubkey,

    /// Protocol fee vault collecting swap fees and burn costs
    pub fee_vault: Pubkey,

    /// Swap fee numerator, applied to every buy cost
    pub swap_fee: u64,

    /// Fee denominator shared by `swap_fee`
    pub fee_scalar: u64,

    /// Flat collateral charge for filing a burn request
    pub burn_cost: u64,

    /// Minimum virtual collateral reserve at pool creation (inclusive)
    pub collateral_init_min: u64,

    /// Maximum virtual collateral reserve at pool creation (exclusive)
    pub collateral_init_max: u64,

    /// Minimum ptoken supply at pool creation (inclusive)
    pub ptoken_init_min: u64,

    /// Maximum ptoken supply at pool creation (exclusive)
    pub ptoken_init_max: u64,

    /// PDA bump seed
    pub bump: u8,
}

impl GlobalConfig {
    pub const SEED: &'static [u8] = b"config";

    /// Check pool seed amounts against the configured creation bounds.
    ///
    /// Minimums are inclusive, maximums exclusive.
    pub fn validate_pool_params(&self, collateral_amount: u64, ptoken_amount: u64) -> bool {
        collateral_amount >= self.collateral_init_min
            && collateral_amount < self.collateral_init_max
            && ptoken_amount >= self.ptoken_init_min
            && ptoken_amount < self.ptoken_init_max
    }
}
