//! Protocol Initialization
//!
//! Sets up the global configuration and the protocol fee vault.
//! This is typically called once during deployment.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::state::GlobalConfig;

/// Accounts required for protocol initialization
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Protocol administrator (becomes the authority)
    #[account(mut)]
    pub authority: Signer<'info>,

    /// Global configuration account (created)
    #[account(
        init,
        payer = authority,
        space = 8 + GlobalConfig::INIT_SPACE,
        seeds = [GlobalConfig::SEED],
        bump,
    )]
    pub config: Account<'info, GlobalConfig>,

    /// Collateral token mint all pools trade against
    pub collateral_mint: InterfaceAccount<'info, Mint>,

    /// Protocol fee vault, a PDA token account that is its own authority
    #[account(
        init,
        payer = authority,
        token::mint = collateral_mint,
        token::authority = fee_vault,
        seeds = [b"vault", collateral_mint.key().as_ref()],
        bump,
    )]
    pub fee_vault: InterfaceAccount<'info, TokenAccount>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> Initialize<'info> {
    /// Initialize the protocol configuration
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        &mut self,
        swap_fee: u64,
        burn_cost: u64,
        fee_scalar: u64,
        collateral_min: u64,
        collateral_max: u64,
        ptoken_max: u64,
        ptoken_min: u64,
        bumps: &InitializeBumps,
    ) -> Result<()> {
        require!(fee_scalar > 0, InitializeError::InvalidFeeScalar);
        require!(swap_fee < fee_scalar, InitializeError::FeeTooHigh);

        self.config.set_inner(GlobalConfig {
            authority: self.authority.key(),
            collateral_mint: self.collateral_mint.key(),
            fee_vault: self.fee_vault.key(),
            swap_fee,
            fee_scalar,
            burn_cost,
            collateral_init_min: collateral_min,
            collateral_init_max: collateral_max,
            ptoken_init_min: ptoken_min,
            ptoken_init_max: ptoken_max,
            bump: bumps.config,
        });

        msg!("Protocol initialized");
        msg!("Authority: {}", self.authority.key());
        msg!("Swap fee: {} / {}", swap_fee, fee_scalar);

        Ok(())
    }
}

#[error_code]
pub enum InitializeError {
    #[msg("Fee scalar must be positive")]
    InvalidFeeScalar,
    #[msg("Swap fee must be below the fee scalar")]
    FeeTooHigh,
}
