//! Pool Closure
//!
//! Once the pool has settled (the asset was won and claimed), the creator
//! drains the collateral proceeds, burns any unsold ptokens, and closes the
//! pool's vaults and record, recovering rent.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{
        burn, close_account, transfer_checked, Burn, CloseAccount, Mint, TokenAccount,
        TokenInterface, TransferChecked,
    },
};

use crate::state::{GlobalConfig, ProbPool};

/// Event emitted when a pool is closed
#[event]
pub struct PoolClosed {
    pub pool: Pubkey,
    pub creator: Pubkey,
    pub proceeds: u64,
}

/// Accounts for closing a settled pool
#[derive(Accounts)]
pub struct ClosePool<'info> {
    /// Pool creator
    #[account(mut)]
    pub creator: Signer<'info>,

    /// Protocol configuration
    #[account(
        seeds = [GlobalConfig::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, GlobalConfig>,

    /// Pool record, deallocated on success
    #[account(
        mut,
        close = creator,
        seeds = [ProbPool::SEED, pool.asset_mint.as_ref()],
        bump = pool.bump,
        constraint = pool.creator == creator.key() @ ClosePoolError::Unauthorized,
        constraint = pool.claimed @ ClosePoolError::InvalidState,
    )]
    pub pool: Account<'info, ProbPool>,

    /// Collateral mint
    #[account(
        constraint = collateral_mint.key() == config.collateral_mint,
    )]
    pub collateral_mint: InterfaceAccount<'info, Mint>,

    /// Pool's ptoken mint
    #[account(
        mut,
        seeds = [b"mint", pool.key().as_ref()],
        bump,
        constraint = ptoken_mint.key() == pool.ptoken_mint,
    )]
    pub ptoken_mint: InterfaceAccount<'info, Mint>,

    /// Mint of the (already claimed) escrowed asset
    #[account(
        constraint = asset_mint.key() == pool.asset_mint,
    )]
    pub asset_mint: InterfaceAccount<'info, Mint>,

    /// Pool's collateral vault, drained to the recipient then closed
    #[account(
        mut,
        seeds = [b"vault", collateral_mint.key().as_ref(), pool.key().as_ref()],
        bump,
    )]
    pub collateral_vault: InterfaceAccount<'info, TokenAccount>,

    /// Pool's ptoken vault, burned out then closed
    #[account(
        mut,
        seeds = [b"vault", ptoken_mint.key().as_ref(), pool.key().as_ref()],
        bump,
    )]
    pub pool_ptoken_vault: InterfaceAccount<'info, TokenAccount>,

    /// Pool's asset vault, must already be empty
    #[account(
        mut,
        seeds = [b"vault", asset_mint.key().as_ref(), pool.key().as_ref()],
        bump,
    )]
    pub asset_vault: InterfaceAccount<'info, TokenAccount>,

    /// Creator's collateral account receiving the proceeds
    #[account(
        init_if_needed,
        payer = creator,
        associated_token::mint = collateral_mint,
        associated_token::authority = creator,
    )]
    pub recipient: InterfaceAccount<'info, TokenAccount>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// Associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,
    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> ClosePool<'info> {
    pub fn close_pool(&mut self, bumps: &ClosePoolBumps) -> Result<()> {
        // The winner must have pulled the asset out before closure
        require!(self.asset_vault.amount == 0, ClosePoolError::AssetUnclaimed);

        let pool_key = self.pool.key();
        let collateral_mint_key = self.collateral_mint.key();
        let ptoken_mint_key = self.ptoken_mint.key();
        let asset_mint_key = self.asset_mint.key();

        let collateral_seeds = &[
            b"vault".as_ref(),
            collateral_mint_key.as_ref(),
            pool_key.as_ref(),
            &[bumps.collateral_vault],
        ];
        let collateral_signer = &[&collateral_seeds[..]];

        // Proceeds to the creator
        let proceeds = self.collateral_vault.amount;
        transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.collateral_vault.to_account_info(),
                    mint: self.collateral_mint.to_account_info(),
                    to: self.recipient.to_account_info(),
                    authority: self.collateral_vault.to_account_info(),
                },
                collateral_signer,
            ),
            proceeds,
            self.collateral_mint.decimals,
        )?;

        // Unsold ptokens leave circulation
        let ptoken_seeds = &[
            b"vault".as_ref(),
            ptoken_mint_key.as_ref(),
            pool_key.as_ref(),
            &[bumps.pool_ptoken_vault],
        ];
        let ptoken_signer = &[&ptoken_seeds[..]];

        burn(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                Burn {
                    mint: self.ptoken_mint.to_account_info(),
                    from: self.pool_ptoken_vault.to_account_info(),
                    authority: self.pool_ptoken_vault.to_account_info(),
                },
                ptoken_signer,
            ),
            self.pool_ptoken_vault.amount,
        )?;

        close_account(CpiContext::new_with_signer(
            self.token_program.to_account_info(),
            CloseAccount {
                account: self.pool_ptoken_vault.to_account_info(),
                destination: self.creator.to_account_info(),
                authority: self.pool_ptoken_vault.to_account_info(),
            },
            ptoken_signer,
        ))?;

        close_account(CpiContext::new_with_signer(
            self.token_program.to_account_info(),
            CloseAccount {
                account: self.collateral_vault.to_account_info(),
                destination: self.creator.to_account_info(),
                authority: self.collateral_vault.to_account_info(),
            },
            collateral_signer,
        ))?;

        let asset_seeds = &[
            b"vault".as_ref(),
            asset_mint_key.as_ref(),
            pool_key.as_ref(),
            &[bumps.asset_vault],
        ];
        let asset_signer = &[&asset_seeds[..]];

        close_account(CpiContext::new_with_signer(
            self.token_program.to_account_info(),
            CloseAccount {
                account: self.asset_vault.to_account_info(),
                destination: self.creator.to_account_info(),
                authority: self.asset_vault.to_account_info(),
            },
            asset_signer,
        ))?;

        emit!(PoolClosed {
            pool: pool_key,
            creator: self.creator.key(),
            proceeds,
        });

        Ok(())
    }
}

#[error_code]
pub enum ClosePoolError {
    #[msg("Only the pool creator may close it")]
    Unauthorized,
    #[msg("Pool cannot close before the asset is won")]
    InvalidState,
    #[msg("Escrowed asset has not been claimed yet")]
    AssetUnclaimed,
}
