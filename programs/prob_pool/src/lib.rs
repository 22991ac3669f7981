//! # Probability Pools
//!
//! Per-asset escrow pools that sell fungible probability tokens (ptokens)
//! against a constant-product bonding curve, then resolve ownership of the
//! escrowed asset through a burn-and-draw lottery.
//!
//! ## Lifecycle
//!
//! 1. A creator escrows one unit of an asset and seeds the curve
//! 2. Buyers purchase ptokens at the curve price
//! 3. Holders escrow ptokens in burn requests
//! 4. The protocol authority executes each draw against chain entropy
//! 5. The winner claims the asset; the creator closes the pool

use anchor_lang::prelude::*;

pub mod amm;
pub mod draw;
pub mod instructions;
pub mod state;

pub use amm::*;
pub use instructions::*;

declare_id!("7tSKVgnzdSAStFuDzPjqE7mhCtXrnX9KLTsbJuGrn52C");

/// Main probability pool program
#[program]
pub mod prob_pool {
    use super::*;

    /// Initialize the protocol configuration and fee vault
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        ctx: Context<Initialize>,
        swap_fee: u64,
        burn_cost: u64,
        fee_scalar: u64,
        collateral_min: u64,
        collateral_max: u64,
        ptoken_max: u64,
        ptoken_min: u64,
    ) -> Result<()> {
        ctx.accounts.initialize(
            swap_fee,
            burn_cost,
            fee_scalar,
            collateral_min,
            collateral_max,
            ptoken_max,
            ptoken_min,
            &ctx.bumps,
        )
    }

    /// Create a probability pool and its vaults
    pub fn create_pool(
        ctx: Context<CreatePool>,
        collateral_amount: u64,
        ptoken_amount: u64,
    ) -> Result<()> {
        ctx.accounts
            .create_pool(collateral_amount, ptoken_amount, &ctx.bumps)
    }

    /// Swap collateral for ptokens at the curve price
    pub fn buy(ctx: Context<Buy>, ptoken_amount: u64) -> Result<()> {
        ctx.accounts.buy(ptoken_amount, &ctx.bumps)
    }

    /// Escrow ptokens pending a burn draw
    pub fn request_burn(ctx: Context<RequestBurn>, ptoken_amount: u64) -> Result<()> {
        ctx.accounts.request_burn(ptoken_amount, &ctx.bumps)
    }

    /// Withdraw ptokens from a personal vault (zero withdraws everything)
    pub fn user_withdraw(ctx: Context<UserWithdraw>, token_amount: u64) -> Result<()> {
        ctx.accounts.user_withdraw(token_amount, &ctx.bumps)
    }

    /// Resolve a pending burn request (protocol authority only)
    pub fn execute_burn(ctx: Context<ExecuteBurn>, ptoken_amount: u64) -> Result<()> {
        ctx.accounts.execute_burn(ptoken_amount, &ctx.bumps)
    }

    /// Claim the escrowed asset after a winning draw
    pub fn claim_asset(ctx: Context<ClaimAsset>) -> Result<()> {
        ctx.accounts.claim_asset(&ctx.bumps)
    }

    /// Close a settled pool and recover its rent
    pub fn close_pool(ctx: Context<ClosePool>) -> Result<()> {
        ctx.accounts.close_pool(&ctx.bumps)
    }
}
