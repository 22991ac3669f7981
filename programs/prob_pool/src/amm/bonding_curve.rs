//! # Constant-Product Bonding Curve
//!
//! Prices ptoken buys against the invariant
//!
//! ```text
//! collateral_supply * ptoken_supply == k
//! ```
//!
//! A buy of `amount` ptokens removes them from the curve's ptoken reserve, so
//! the collateral reserve must grow to keep `k` constant:
//!
//! ```text
//! 1. new_ptoken_supply     = ptoken_supply - amount
//! 2. new_collateral_supply = ceil(k / new_ptoken_supply)
//! 3. cost                  = new_collateral_supply - collateral_supply
//! 4. fee                   = floor(cost * fee_numerator / fee_scalar)
//! ```
//!
//! The buyer pays `cost + fee`: the cost funds the pool's collateral vault,
//! the fee routes to the protocol vault. Cost rounds up and fee rounds down,
//! so integer rounding can only ever favor the pool:
//!
//! ```text
//! new_collateral_supply * new_ptoken_supply >= k
//! ```
//!
//! Constant-product pricing makes cost strictly convex in `amount`: draining
//! the curve in one large buy is far more expensive than the same quantity
//! bought gradually, and every quote is deterministic and replayable from the
//! recorded reserves.

use anchor_lang::prelude::*;

/// Errors specific to the constant-product curve
#[error_code]
pub enum AmmError {
    #[msg("Buy amount must be positive")]
    InvalidAmount,
    #[msg("Buy amount meets or exceeds remaining curve supply")]
    InsufficientSupply,
    #[msg("Arithmetic overflow")]
    Overflow,
    #[msg("Division by zero")]
    DivisionByZero,
}

/// Priced result of a prospective buy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyQuote {
    /// Collateral owed to the pool vault
    pub cost: u64,
    /// Collateral owed to the protocol fee vault
    pub fee: u64,
    /// Curve ptoken reserve after the buy
    pub new_ptoken_supply: u64,
    /// Curve collateral reserve after the buy
    pub new_collateral_supply: u64,
}

/// Constant-product curve for probability pools
pub struct ConstantProductCurve;

impl ConstantProductCurve {
    /// Quote the collateral cost and protocol fee for buying `amount` ptokens.
    ///
    /// # Arguments
    /// * `ptoken_supply` - Current curve ptoken reserve
    /// * `collateral_supply` - Current curve collateral reserve
    /// * `amount` - Ptokens being bought; must satisfy `0 < amount < ptoken_supply`
    /// * `fee_numerator` / `fee_scalar` - Protocol fee fraction
    ///
    /// # Example
    /// ```ignore
    /// // Pool seeded 10 collateral / 10 ptokens, user buys 4
    /// let q = ConstantProductCurve::quote_buy(10, 10, 4, 250, 10_000)?;
    /// // k = 100, new reserve = ceil(100 / 6) = 17, cost = 7
    /// ```
    pub fn quote_buy(
        ptoken_supply: u64,
        collateral_supply: u64,
        amount: u64,
        fee_numerator: u64,
        fee_scalar: u64,
    ) -> Result<BuyQuote> {
        require!(amount > 0, AmmError::InvalidAmount);
        // Buying the entire reserve would zero the divisor below
        require!(amount < ptoken_supply, AmmError::InsufficientSupply);
        require!(fee_scalar > 0, AmmError::DivisionByZero);

        // Widen before multiplying: u64 reserves can overflow their product
        let k = (ptoken_supply as u128)
            .checked_mul(collateral_supply as u128)
            .ok_or(AmmError::Overflow)?;

        let new_ptoken_supply = ptoken_supply - amount;
        let divisor = new_ptoken_supply as u128;

        // Ceiling division: the pool never undercharges by rounding
        let new_collateral_supply = k
            .checked_add(divisor - 1)
            .ok_or(AmmError::Overflow)?
            .checked_div(divisor)
            .ok_or(AmmError::DivisionByZero)?;

        let cost = new_collateral_supply
            .checked_sub(collateral_supply as u128)
            .ok_or(AmmError::Overflow)?;

        // Floor division: fee rounding also favors the pool side
        let fee = cost
            .checked_mul(fee_numerator as u128)
            .ok_or(AmmError::Overflow)?
            .checked_div(fee_scalar as u128)
            .ok_or(AmmError::DivisionByZero)?;

        Ok(BuyQuote {
            cost: u64::try_from(cost).map_err(|_| AmmError::Overflow)?,
            fee: u64::try_from(fee).map_err(|_| AmmError::Overflow)?,
            new_ptoken_supply,
            new_collateral_supply: u64::try_from(new_collateral_supply)
                .map_err(|_| AmmError::Overflow)?,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
