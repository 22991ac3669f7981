//! Personal Vault Withdrawal
//!
//! Moves ptokens from a user's program-derived personal vault back to an
//! ordinary token account they own. An amount of zero withdraws the full
//! balance; a non-zero amount withdraws exactly that many.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{
        transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
    },
};

/// Event emitted on withdrawal
#[event]
pub struct PtokensWithdrawn {
    pub user: Pubkey,
    pub ptoken_mint: Pubkey,
    pub ptoken_amount: u64,
}

/// Accounts for withdrawing from a personal ptoken vault
#[derive(Accounts)]
pub struct UserWithdraw<'info> {
    /// Vault owner
    #[account(mut)]
    pub user: Signer<'info>,

    /// Ptoken mint the vault holds
    pub ptoken_mint: InterfaceAccount<'info, Mint>,

    /// User's personal ptoken vault
    #[account(
        mut,
        seeds = [b"vault", ptoken_mint.key().as_ref(), user.key().as_ref()],
        bump,
    )]
    pub user_ptoken_vault: InterfaceAccount<'info, TokenAccount>,

    /// Destination account owned by the user
    #[account(
        init_if_needed,
        payer = user,
        associated_token::mint = ptoken_mint,
        associated_token::authority = user,
    )]
    pub destination: InterfaceAccount<'info, TokenAccount>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// Associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,
    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> UserWithdraw<'info> {
    pub fn user_withdraw(&mut self, token_amount: u64, bumps: &UserWithdrawBumps) -> Result<()> {
        // Zero means "everything"
        let withdraw_amount = if token_amount == 0 {
            self.user_ptoken_vault.amount
        } else {
            token_amount
        };
        require!(
            withdraw_amount <= self.user_ptoken_vault.amount,
            UserWithdrawError::InsufficientSupply
        );

        if withdraw_amount > 0 {
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
                        to: self.destination.to_account_info(),
                        authority: self.user_ptoken_vault.to_account_info(),
                    },
                    vault_signer,
                ),
                withdraw_amount,
                self.ptoken_mint.decimals,
            )?;
        }

        emit!(PtokensWithdrawn {
            user: self.user.key(),
            ptoken_mint: self.ptoken_mint.key(),
            ptoken_amount: withdraw_amount,
        });

        Ok(())
    }
}

#[error_code]
pub enum UserWithdrawError {
    #[msg("Withdrawal exceeds personal vault balance")]
    InsufficientSupply,
}
