//! Probability Pool State
//!
//! Each pool escrows exactly one unit of an asset and runs a ptoken/collateral
//! AMM against it. Ptoken holders burn their tokens for a chance to win the
//! escrowed asset; the pool closes once the asset has been won and claimed.

use anchor_lang::prelude::*;

/// Per-asset escrow pool account
///
/// Seeds: ["pool", asset_mint]
#[account]
#[derive(InitSpace)]
pub struct ProbPool {
    /// Pool creator. May close the pool after settlement.
    pub creator: Pubkey,

    /// Current owner of the escrowed asset: the creator until a burn wins,
    /// then the winner (who may claim it out of escrow).
    pub asset_authority: Pubkey,

    /// Pool collateral vault (curve proceeds)
    pub collateral_vault: Pubkey,

    /// Pool ptoken vault (unsold curve inventory)
    pub ptoken_vault: Pubkey,

    /// Ptoken mint unique to this pool
    pub ptoken_mint: Pubkey,

    /// Mint identifying the escrowed asset
    pub asset_mint: Pubkey,

    /// Set exactly once, by the winning draw
    pub claimed: bool,

    /// Virtual collateral reserve of the curve
    pub collateral_supply: u64,

    /// Ptoken reserve of the curve (unsold supply)
    pub ptoken_supply: u64,

    /// Ptokens issued to buyers and not yet burned
    pub outstanding_ptokens: u64,

    /// PDA bump seed
    pub bump: u8,
}

impl ProbPool {
    pub const SEED: &'static [u8] = b"pool";

    /// Pool is open for trading and burn requests.
    pub fn is_open(&self) -> bool {
        !self.claimed
    }

    /// Tickets still eligible to win: everything ever minted minus everything
    /// burned so far. The escrowed amount of a pending burn request still
    /// counts as outstanding until `settle_burn` runs.
    pub fn remaining_tickets(&self) -> Result<u64> {
        self.ptoken_supply
            .checked_add(self.outstanding_ptokens)
            .ok_or_else(|| error!(PoolError::Overflow))
    }

    /// Record a buy priced by the bonding curve.
    pub fn apply_buy(
        &mut self,
        ptoken_amount: u64,
        new_ptoken_supply: u64,
        new_collateral_supply: u64,
    ) -> Result<()> {
        self.ptoken_supply = new_ptoken_supply;
        self.collateral_supply = new_collateral_supply;
        self.outstanding_ptokens = self
            .outstanding_ptokens
            .checked_add(ptoken_amount)
            .ok_or_else(|| error!(PoolError::Overflow))?;
        Ok(())
    }

    /// Record an executed burn. The burned amount leaves circulation whatever
    /// the outcome; a win hands the asset to the winner and freezes trading.
    pub fn settle_burn(&mut self, ptoken_amount: u64, won: bool, winner: Pubkey) -> Result<()> {
        self.outstanding_ptokens = self
            .outstanding_ptokens
            .checked_sub(ptoken_amount)
            .ok_or_else(|| error!(PoolError::Overflow))?;
        if won {
            self.claimed = true;
            self.asset_authority = winner;
        }
        Ok(())
    }
}

#[error_code]
pub enum PoolError {
    #[msg("Arithmetic overflow in pool accounting")]
    Overflow,
}
