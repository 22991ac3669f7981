//! Ptoken Purchase
//!
//! Swaps collateral for ptokens priced by the constant-product curve.
//! The quoted cost funds the pool's collateral vault; the quoted fee routes
//! to the protocol fee vault. Purchased ptokens land in the buyer's
//! program-derived personal vault.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{
        transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
    },
};

use crate::amm::ConstantProductCurve;
use crate::state::{GlobalConfig, ProbPool};

/// Event emitted when ptokens are bought
#[event]
pub struct PtokensBought {
    pub pool: Pubkey,
    pub buyer: Pubkey,
    pub ptoken_amount: u64,
    pub cost: u64,
    pub fee: u64,
}

/// Accounts for buying ptokens
#[derive(Accounts)]
pub struct Buy<'info> {
    /// Buyer
    #[account(mut)]
    pub buyer: Signer<'info>,

    /// Protocol configuration
    #[account(
        seeds = [GlobalConfig::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, GlobalConfig>,

    /// Pool being bought from; trading stops once the asset is won
    #[account(
        mut,
        seeds = [ProbPool::SEED, pool.asset_mint.as_ref()],
        bump = pool.bump,
        constraint = pool.is_open() @ BuyError::InvalidState,
    )]
    pub pool: Account<'info, ProbPool>,

    /// Collateral mint
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

    /// Buyer's collateral account
    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = buyer,
    )]
    pub buyer_collateral: InterfaceAccount<'info, TokenAccount>,

    /// Pool's collateral vault
    #[account(
        mut,
        seeds = [b"vault", collateral_mint.key().as_ref(), pool.key().as_ref()],
        bump,
        constraint = collateral_vault.key() == pool.collateral_vault,
    )]
    pub collateral_vault: InterfaceAccount<'info, TokenAccount>,

    /// Protocol fee vault
    #[account(
        mut,
        seeds = [b"vault", collateral_mint.key().as_ref()],
        bump,
        constraint = fee_vault.key() == config.fee_vault,
    )]
    pub fee_vault: InterfaceAccount<'info, TokenAccount>,

    /// Pool's ptoken vault
    #[account(
        mut,
        seeds = [b"vault", ptoken_mint.key().as_ref(), pool.key().as_ref()],
        bump,
        constraint = pool_ptoken_vault.key() == pool.ptoken_vault,
    )]
    pub pool_ptoken_vault: InterfaceAccount<'info, TokenAccount>,

    /// Buyer's personal ptoken vault, created on first buy
    #[account(
        init_if_needed,
        payer = buyer,
        token::mint = ptoken_mint,
        token::authority = user_ptoken_vault,
        seeds = [b"vault", ptoken_mint.key().as_ref(), buyer.key().as_ref()],
        bump,
    )]
    pub user_ptoken_vault: InterfaceAccount<'info, TokenAccount>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// Associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,
    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> Buy<'info> {
    /// Buy `ptoken_amount` ptokens at the curve price
    pub fn buy(&mut self, ptoken_amount: u64, bumps: &BuyBumps) -> Result<()> {
        let quote = ConstantProductCurve::quote_buy(
            self.pool.ptoken_supply,
            self.pool.collateral_supply,
            ptoken_amount,
            self.config.swap_fee,
            self.config.fee_scalar,
        )?;

        msg!("cost: {}, fee: {}", quote.cost, quote.fee);

        // Collateral cost into the pool vault
        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.buyer_collateral.to_account_info(),
                    mint: self.collateral_mint.to_account_info(),
                    to: self.collateral_vault.to_account_info(),
                    authority: self.buyer.to_account_info(),
                },
            ),
            quote.cost,
            self.collateral_mint.decimals,
        )?;

        // Protocol fee into the global vault
        if quote.fee > 0 {
            transfer_checked(
                CpiContext::new(
                    self.token_program.to_account_info(),
                    TransferChecked {
                        from: self.buyer_collateral.to_account_info(),
                        mint: self.collateral_mint.to_account_info(),
                        to: self.fee_vault.to_account_info(),
                        authority: self.buyer.to_account_info(),
                    },
                ),
                quote.fee,
                self.collateral_mint.decimals,
            )?;
        }

        // Ptokens out of the pool vault, signed with its recomputed seeds
        let ptoken_mint_key = self.ptoken_mint.key();
        let pool_key = self.pool.key();
        let vault_seeds = &[
            b"vault".as_ref(),
            ptoken_mint_key.as_ref(),
            pool_key.as_ref(),
            &[bumps.pool_ptoken_vault],
        ];
        let vault_signer = &[&vault_seeds[..]];

        transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.pool_ptoken_vault.to_account_info(),
                    mint: self.ptoken_mint.to_account_info(),
                    to: self.user_ptoken_vault.to_account_info(),
                    authority: self.pool_ptoken_vault.to_account_info(),
                },
                vault_signer,
            ),
            ptoken_amount,
            self.ptoken_mint.decimals,
        )?;

        self.pool
            .apply_buy(ptoken_amount, quote.new_ptoken_supply, quote.new_collateral_supply)?;

        emit!(PtokensBought {
            pool: pool_key,
            buyer: self.buyer.key(),
            ptoken_amount,
            cost: quote.cost,
            fee: quote.fee,
        });

        Ok(())
    }
}

#[error_code]
pub enum BuyError {
    #[msg("Pool is no longer open for trading")]
    InvalidState,
}
