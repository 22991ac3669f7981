//! Asset Claim
//!
//! After a winning draw, the recorded winner moves the escrowed asset out of
//! the pool's asset vault. A second claim finds the vault empty and fails.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{
        transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
    },
};

use crate::state::ProbPool;

/// Event emitted when the asset is claimed
#[event]
pub struct AssetClaimed {
    pub pool: Pubkey,
    pub winner: Pubkey,
    pub asset_mint: Pubkey,
}

/// Accounts for claiming the escrowed asset
#[derive(Accounts)]
pub struct ClaimAsset<'info> {
    /// Recorded winner of the pool's draw
    #[account(mut)]
    pub winner: Signer<'info>,

    /// Pool whose asset is being claimed
    #[account(
        seeds = [ProbPool::SEED, pool.asset_mint.as_ref()],
        bump = pool.bump,
        constraint = pool.claimed @ ClaimAssetError::InvalidState,
        constraint = pool.asset_authority == winner.key() @ ClaimAssetError::Unauthorized,
    )]
    pub pool: Account<'info, ProbPool>,

    /// Mint of the escrowed asset
    #[account(
        constraint = asset_mint.key() == pool.asset_mint,
    )]
    pub asset_mint: InterfaceAccount<'info, Mint>,

    /// Pool's asset escrow vault
    #[account(
        mut,
        seeds = [b"vault", asset_mint.key().as_ref(), pool.key().as_ref()],
        bump,
    )]
    pub asset_vault: InterfaceAccount<'info, TokenAccount>,

    /// Winner's asset account
    #[account(
        init_if_needed,
        payer = winner,
        associated_token::mint = asset_mint,
        associated_token::authority = winner,
    )]
    pub winner_asset: InterfaceAccount<'info, TokenAccount>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// Associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,
    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> ClaimAsset<'info> {
    pub fn claim_asset(&mut self, bumps: &ClaimAssetBumps) -> Result<()> {
        // The escrow holds exactly one unit until claimed
        require!(self.asset_vault.amount > 0, ClaimAssetError::NothingToClaim);

        let asset_mint_key = self.asset_mint.key();
        let pool_key = self.pool.key();
        let vault_seeds = &[
            b"vault".as_ref(),
            asset_mint_key.as_ref(),
            pool_key.as_ref(),
            &[bumps.asset_vault],
        ];
        let vault_signer = &[&vault_seeds[..]];

        transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.asset_vault.to_account_info(),
                    mint: self.asset_mint.to_account_info(),
                    to: self.winner_asset.to_account_info(),
                    authority: self.asset_vault.to_account_info(),
                },
                vault_signer,
            ),
            1,
            self.asset_mint.decimals,
        )?;

        emit!(AssetClaimed {
            pool: pool_key,
            winner: self.winner.key(),
            asset_mint: asset_mint_key,
        });

        Ok(())
    }
}

#[error_code]
pub enum ClaimAssetError {
    #[msg("Pool has not been won")]
    InvalidState,
    #[msg("Only the recorded winner may claim")]
    Unauthorized,
    #[msg("Asset vault is already empty")]
    NothingToClaim,
}
