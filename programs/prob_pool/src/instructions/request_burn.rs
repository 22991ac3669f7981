//! Burn Request
//!
//! Moves ptokens from the user's personal vault into a per-(pool, user)
//! burn escrow and charges the flat burn cost. This records intent only:
//! the draw itself is executed separately by the protocol authority, which
//! keeps resolution centralized and rate-limitable.
//!
//! A request is irrevocable and rides out the pool: if another user's burn
//! wins before this one is executed, the pool leaves the open state and the
//! escrowed ptokens can no longer be executed, withdrawn, or refunded. The
//! burn cost is the price of entering the queue, not of being drawn.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{
        transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
    },
};

use crate::state::{GlobalConfig, ProbPool};

/// Event emitted when a burn request is filed
#[event]
pub struct BurnRequested {
    pub pool: Pubkey,
    pub user: Pubkey,
    pub ptoken_amount: u64,
}

/// Accounts for filing a burn request
#[derive(Accounts)]
pub struct RequestBurn<'info> {
    /// Requesting user
    #[account(mut)]
    pub user: Signer<'info>,

    /// Protocol configuration
    #[account(
        seeds = [GlobalConfig::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, GlobalConfig>,

    /// Pool the burn targets
    #[account(
        seeds = [ProbPool::SEED, pool.asset_mint.as_ref()],
        bump = pool.bump,
        constraint = pool.is_open() @ RequestBurnError::InvalidState,
    )]
    pub pool: Account<'info, ProbPool>,

    /// Collateral mint, for the burn cost
    #[account(
        constraint = collateral_mint.key() == config.collateral_mint,
    )]
    pub collateral_mint: InterfaceAccount<'info, Mint>,

    /// Pool's ptoken mint
    #[account(
        seeds = [b"mint", pool.key().as_ref()],
        bump,
        constraint = ptoken_mint.key() == pool.ptoken_mint,
    )]
    pub ptoken_mint: InterfaceAccount<'info, Mint>,

    /// User's collateral account, debited the burn cost
    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = user,
    )]
    pub user_collateral: InterfaceAccount<'info, TokenAccount>,

    /// Protocol fee vault
    #[account(
        mut,
        seeds = [b"vault", collateral_mint.key().as_ref()],
        bump,
        constraint = fee_vault.key() == config.fee_vault,
    )]
    pub fee_vault: InterfaceAccount<'info, TokenAccount>,

    /// User's personal ptoken vault
    #[account(
        mut,
        seeds = [b"vault", ptoken_mint.key().as_ref(), user.key().as_ref()],
        bump,
    )]
    pub user_ptoken_vault: InterfaceAccount<'info, TokenAccount>,

    /// Burn escrow holding the pending request, created on first use
    #[account(
        init_if_needed,
        payer = user,
        token::mint = ptoken_mint,
        token::authority = burn_escrow,
        seeds = [b"burn", pool.key().as_ref(), user.key().as_ref()],
        bump,
    )]
    pub burn_escrow: InterfaceAccount<'info, TokenAccount>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// Associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,
    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> RequestBurn<'info> {
    pub fn request_burn(&mut self, ptoken_amount: u64, bumps: &RequestBurnBumps) -> Result<()> {
        require!(ptoken_amount > 0, RequestBurnError::InsufficientSupply);
        require!(
            ptoken_amount <= self.user_ptoken_vault.amount,
            RequestBurnError::InsufficientSupply
        );

        // Escrow the ptokens, signed with the personal vault's seeds
        let ptoken_mint_key = self.ptoken_mint.key();
        let user_key = self.user.key();
        let vault_seeds = &[
            b"vault".as_ref(),
            ptoken_mint_key.as_ref(),
            user_key.as_ref(),
            &[bumps.user_ptoken_vault],
        ];
        let vault_signer = &[&vault_seeds[..]];

        transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.user_ptoken_vault.to_account_info(),
                    mint: self.ptoken_mint.to_account_info(),
                    to: self.burn_escrow.to_account_info(),
                    authority: self.user_ptoken_vault.to_account_info(),
                },
                vault_signer,
            ),
            ptoken_amount,
            self.ptoken_mint.decimals,
        )?;

        // Flat burn cost to the protocol vault
        if self.config.burn_cost > 0 {
            transfer_checked(
                CpiContext::new(
                    self.token_program.to_account_info(),
                    TransferChecked {
                        from: self.user_collateral.to_account_info(),
                        mint: self.collateral_mint.to_account_info(),
                        to: self.fee_vault.to_account_info(),
                        authority: self.user.to_account_info(),
                    },
                ),
                self.config.burn_cost,
                self.collateral_mint.decimals,
            )?;
        }

        emit!(BurnRequested {
            pool: self.pool.key(),
            user: user_key,
            ptoken_amount,
        });

        Ok(())
    }
}

#[error_code]
pub enum RequestBurnError {
    #[msg("Pool is no longer open for burn requests")]
    InvalidState,
    #[msg("Burn amount exceeds personal vault balance")]
    InsufficientSupply,
}
