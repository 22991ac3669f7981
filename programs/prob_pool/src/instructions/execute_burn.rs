//! Burn Execution
//!
//! Resolves a pending burn request. The escrowed ptokens are burned whatever
//! the outcome; a winning draw hands the escrowed asset to the requester and
//! freezes the pool. Only the protocol authority may execute, so requesters
//! cannot time their own entropy.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar;
use anchor_spl::token_interface::{burn, Burn, Mint, TokenAccount, TokenInterface};

use crate::draw::{draw_position, entropy_from_slot_hashes, is_winning};
use crate::state::{GlobalConfig, ProbPool};

/// Event emitted when a burn request is resolved
#[event]
pub struct BurnExecuted {
    pub pool: Pubkey,
    pub user: Pubkey,
    pub ptoken_amount: u64,
    pub position: u64,
    pub remaining: u64,
    pub won: bool,
}

/// Accounts for executing a burn draw
#[derive(Accounts)]
pub struct ExecuteBurn<'info> {
    /// Protocol authority, the only key allowed to resolve draws
    #[account(
        mut,
        constraint = authority.key() == config.authority @ ExecuteBurnError::Unauthorized,
    )]
    pub authority: Signer<'info>,

    /// CHECK: user the burn is resolved on behalf of; only its key feeds the
    /// draw and the escrow seeds, no data is read or written
    pub user: UncheckedAccount<'info>,

    /// Protocol configuration
    #[account(
        seeds = [GlobalConfig::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, GlobalConfig>,

    /// Pool the burn targets
    #[account(
        mut,
        seeds = [ProbPool::SEED, pool.asset_mint.as_ref()],
        bump = pool.bump,
        constraint = pool.is_open() @ ExecuteBurnError::InvalidState,
    )]
    pub pool: Account<'info, ProbPool>,

    /// Pool's ptoken mint
    #[account(
        mut,
        seeds = [b"mint", pool.key().as_ref()],
        bump,
        constraint = ptoken_mint.key() == pool.ptoken_mint,
    )]
    pub ptoken_mint: InterfaceAccount<'info, Mint>,

    /// The user's burn escrow, drained to zero by this instruction
    #[account(
        mut,
        seeds = [b"burn", pool.key().as_ref(), user.key().as_ref()],
        bump,
    )]
    pub burn_escrow: InterfaceAccount<'info, TokenAccount>,

    /// CHECK: SlotHashes sysvar, the draw's entropy source
    #[account(address = sysvar::slot_hashes::id())]
    pub slot_hashes: UncheckedAccount<'info>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> ExecuteBurn<'info> {
    pub fn execute_burn(&mut self, ptoken_amount: u64, bumps: &ExecuteBurnBumps) -> Result<()> {
        // The draw settles the request in full: the amount must match the
        // escrowed balance exactly
        require!(
            ptoken_amount > 0 && ptoken_amount == self.burn_escrow.amount,
            ExecuteBurnError::InsufficientSupply
        );

        let remaining = self.pool.remaining_tickets()?;

        // Burn the escrowed ptokens before drawing; losing tickets leave
        // circulation permanently
        let pool_key = self.pool.key();
        let user_key = self.user.key();
        let escrow_seeds = &[
            b"burn".as_ref(),
            pool_key.as_ref(),
            user_key.as_ref(),
            &[bumps.burn_escrow],
        ];
        let escrow_signer = &[&escrow_seeds[..]];

        burn(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                Burn {
                    mint: self.ptoken_mint.to_account_info(),
                    from: self.burn_escrow.to_account_info(),
                    authority: self.burn_escrow.to_account_info(),
                },
                escrow_signer,
            ),
            ptoken_amount,
        )?;

        let entropy = {
            let data = self.slot_hashes.try_borrow_data()?;
            entropy_from_slot_hashes(&data[..])?
        };
        let position = draw_position(&entropy, &pool_key, &user_key, ptoken_amount, remaining)?;
        let won = is_winning(position, remaining, ptoken_amount);

        msg!("draw: {} of {} tickets, won: {}", position, remaining, won);

        self.pool.settle_burn(ptoken_amount, won, user_key)?;

        emit!(BurnExecuted {
            pool: pool_key,
            user: user_key,
            ptoken_amount,
            position,
            remaining,
            won,
        });

        Ok(())
    }
}

#[error_code]
pub enum ExecuteBurnError {
    #[msg("Only the protocol authority may execute burns")]
    Unauthorized,
    #[msg("Pool has already been won")]
    InvalidState,
    #[msg("Burn amount does not match the escrowed request")]
    InsufficientSupply,
}
