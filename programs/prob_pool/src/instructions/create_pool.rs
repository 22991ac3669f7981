//! Pool Creation
//!
//! A creator opens a probability pool by:
//! 1. Escrowing exactly one unit of the asset
//! 2. Seeding the curve with a virtual collateral reserve and a real,
//!    freshly minted ptoken supply
//!
//! The collateral reserve is virtual: it prices the curve but is not funded
//! by the creator. Both seed amounts are checked against the configured
//! creation bounds.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    mint_to, transfer_checked, Mint, MintTo, TokenAccount, TokenInterface, TransferChecked,
};

use crate::state::{GlobalConfig, ProbPool};

/// Event emitted when a pool is created
#[event]
pub struct PoolCreated {
    pub pool: Pubkey,
    pub creator: Pubkey,
    pub asset_mint: Pubkey,
    pub collateral_supply: u64,
    pub ptoken_supply: u64,
}

/// Accounts for creating a new probability pool
#[derive(Accounts)]
pub struct CreatePool<'info> {
    /// Pool creator (pays for accounts, escrows the asset)
    #[account(mut)]
    pub creator: Signer<'info>,

    /// Global protocol configuration
    #[account(
        seeds = [GlobalConfig::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, GlobalConfig>,

    /// Mint identifying the escrowed asset
    pub asset_mint: InterfaceAccount<'info, Mint>,

    /// Creator's account holding the asset
    #[account(
        mut,
        constraint = creator_asset.owner == creator.key(),
        constraint = creator_asset.mint == asset_mint.key(),
    )]
    pub creator_asset: InterfaceAccount<'info, TokenAccount>,

    /// The new pool account, one per asset
    #[account(
        init,
        payer = creator,
        space = 8 + ProbPool::INIT_SPACE,
        seeds = [ProbPool::SEED, asset_mint.key().as_ref()],
        bump,
    )]
    pub pool: Account<'info, ProbPool>,

    /// Ptoken mint unique to this pool, its own mint authority
    #[account(
        init,
        payer = creator,
        mint::decimals = 0,
        mint::authority = ptoken_mint,
        seeds = [b"mint", pool.key().as_ref()],
        bump,
    )]
    pub ptoken_mint: InterfaceAccount<'info, Mint>,

    /// Escrow vault for the asset
    #[account(
        init,
        payer = creator,
        token::mint = asset_mint,
        token::authority = asset_vault,
        seeds = [b"vault", asset_mint.key().as_ref(), pool.key().as_ref()],
        bump,
    )]
    pub asset_vault: InterfaceAccount<'info, TokenAccount>,

    /// Pool vault for curve proceeds
    #[account(
        init,
        payer = creator,
        token::mint = collateral_mint,
        token::authority = collateral_vault,
        seeds = [b"vault", collateral_mint.key().as_ref(), pool.key().as_ref()],
        bump,
    )]
    pub collateral_vault: InterfaceAccount<'info, TokenAccount>,

    /// Pool vault for unsold ptokens
    #[account(
        init,
        payer = creator,
        token::mint = ptoken_mint,
        token::authority = pool_ptoken_vault,
        seeds = [b"vault", ptoken_mint.key().as_ref(), pool.key().as_ref()],
        bump,
    )]
    pub pool_ptoken_vault: InterfaceAccount<'info, TokenAccount>,

    /// Collateral token mint
    #[account(
        constraint = collateral_mint.key() == config.collateral_mint,
    )]
    pub collateral_mint: InterfaceAccount<'info, Mint>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> CreatePool<'info> {
    pub fn create_pool(
        &mut self,
        collateral_amount: u64,
        ptoken_amount: u64,
        bumps: &CreatePoolBumps,
    ) -> Result<()> {
        require!(
            self.config.validate_pool_params(collateral_amount, ptoken_amount),
            CreatePoolError::OutOfBounds
        );

        self.pool.set_inner(ProbPool {
            creator: self.creator.key(),
            asset_authority: self.creator.key(),
            collateral_vault: self.collateral_vault.key(),
            ptoken_vault: self.pool_ptoken_vault.key(),
            ptoken_mint: self.ptoken_mint.key(),
            asset_mint: self.asset_mint.key(),
            claimed: false,
            collateral_supply: collateral_amount,
            ptoken_supply: ptoken_amount,
            outstanding_ptokens: 0,
            bump: bumps.pool,
        });

        // Mint the full ptoken supply into the pool vault
        let pool_key = self.pool.key();
        let mint_seeds = &[b"mint".as_ref(), pool_key.as_ref(), &[bumps.ptoken_mint]];
        let mint_signer = &[&mint_seeds[..]];

        mint_to(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                MintTo {
                    mint: self.ptoken_mint.to_account_info(),
                    to: self.pool_ptoken_vault.to_account_info(),
                    authority: self.ptoken_mint.to_account_info(),
                },
                mint_signer,
            ),
            ptoken_amount,
        )?;

        // Escrow one unit of the asset
        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.creator_asset.to_account_info(),
                    mint: self.asset_mint.to_account_info(),
                    to: self.asset_vault.to_account_info(),
                    authority: self.creator.to_account_info(),
                },
            ),
            1,
            self.asset_mint.decimals,
        )?;

        emit!(PoolCreated {
            pool: pool_key,
            creator: self.creator.key(),
            asset_mint: self.asset_mint.key(),
            collateral_supply: collateral_amount,
            ptoken_supply: ptoken_amount,
        });

        Ok(())
    }
}

#[error_code]
pub enum CreatePoolError {
    #[msg("Seed amount outside configured creation bounds")]
    OutOfBounds,
}
