//! # Burn Draw
//!
//! Decides whether a burn request wins the escrowed asset.
//!
//! ## Ticket model
//!
//! Every ptoken still in play is one lottery ticket. At draw time the eligible
//! ticket count is
//!
//! ```text
//! remaining = ptoken_supply + outstanding_ptokens
//! ```
//!
//! i.e. everything ever minted minus everything already burned without a win.
//! The request's `amount` tickets occupy the top contiguous slice of
//! `[0, remaining)`; a position drawn uniformly from that range wins iff it
//! lands in the slice. Each ticket therefore carries exactly a `1/remaining`
//! marginal chance, and the final burn (`amount == remaining`) always wins, so
//! the asset is guaranteed to be allocated once every ticket is burned.
//!
//! ## Entropy
//!
//! The draw seeds from the most recent SlotHashes sysvar entry, expanded with
//! a keccak hash over the pool key, the requesting user key, and the burn
//! amount so that concurrent draws in one slot stay independent (the
//! expansion scheme follows Chainlink's VRF output-stretching guidance).
//!
//! Known weakness, kept deliberately: a recent slot hash is public before the
//! resolving transaction is final, so an observer choosing whether to submit
//! can bias outcomes. Resolution is therefore restricted to the configured
//! protocol authority; a VRF with delayed reveal is the long-term answer.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::keccak;

/// Byte offset of the newest hash inside the SlotHashes sysvar data:
/// an 8-byte vector length, then the first entry's 8-byte slot number.
const SLOT_HASHES_FIRST_HASH_OFFSET: usize = 8 + 8;

/// Read 32 bytes of entropy from raw SlotHashes sysvar account data.
pub fn entropy_from_slot_hashes(data: &[u8]) -> Result<[u8; 32]> {
    let end = SLOT_HASHES_FIRST_HASH_OFFSET + 32;
    require!(data.len() >= end, DrawError::EntropyUnavailable);
    let mut entropy = [0u8; 32];
    entropy.copy_from_slice(&data[SLOT_HASHES_FIRST_HASH_OFFSET..end]);
    Ok(entropy)
}

/// Derive the drawn ticket position in `[0, remaining)`.
///
/// Deterministic in its inputs: replaying the same entropy, pool, user and
/// amount reproduces the same position for auditing.
pub fn draw_position(
    entropy: &[u8; 32],
    pool: &Pubkey,
    user: &Pubkey,
    burn_amount: u64,
    remaining: u64,
) -> Result<u64> {
    require!(remaining > 0, DrawError::NoSupplyRemaining);

    let mut hasher = keccak::Hasher::default();
    hasher.hash(entropy);
    hasher.hash(pool.as_ref());
    hasher.hash(user.as_ref());
    hasher.hash(&burn_amount.to_le_bytes());
    let digest = hasher.result().to_bytes();

    let raw = u64::from_le_bytes(
        digest[0..8]
            .try_into()
            .map_err(|_| error!(DrawError::EntropyUnavailable))?,
    );
    Ok(raw % remaining)
}

/// Win iff the drawn position lands in the request's ticket slice,
/// the top `burn_amount` positions of `[0, remaining)`.
pub fn is_winning(position: u64, remaining: u64, burn_amount: u64) -> bool {
    position >= remaining.saturating_sub(burn_amount)
}

#[error_code]
pub enum DrawError {
    #[msg("No eligible tickets remain to draw against")]
    NoSupplyRemaining,
    #[msg("SlotHashes sysvar holds no usable entropy")]
    EntropyUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entropy(byte: u8) -> [u8; 32] {
        [byte; 32]
    }

    #[test]
    fn position_is_bounded_and_deterministic() {
        let pool = Pubkey::new_unique();
        let user = Pubkey::new_unique();
        for remaining in [1u64, 2, 7, 1_000, u64::MAX] {
            let a = draw_position(&entropy(0xAB), &pool, &user, 3, remaining).unwrap();
            let b = draw_position(&entropy(0xAB), &pool, &user, 3, remaining).unwrap();
            assert!(a < remaining);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn zero_remaining_is_illegal() {
        let pool = Pubkey::new_unique();
        let user = Pubkey::new_unique();
        let err = draw_position(&entropy(1), &pool, &user, 1, 0).unwrap_err();
        assert_eq!(err, DrawError::NoSupplyRemaining.into());
    }

    #[test]
    fn final_burn_always_wins() {
        // amount == remaining: every position in [0, remaining) is a winner
        let pool = Pubkey::new_unique();
        let user = Pubkey::new_unique();
        for byte in 0..32u8 {
            let pos = draw_position(&entropy(byte), &pool, &user, 10, 10).unwrap();
            assert!(is_winning(pos, 10, 10));
        }
    }

    #[test]
    fn ticket_slice_boundaries() {
        // remaining 10, amount 4: winning slice is [6, 10)
        assert!(!is_winning(0, 10, 4));
        assert!(!is_winning(5, 10, 4));
        assert!(is_winning(6, 10, 4));
        assert!(is_winning(9, 10, 4));
        // zero tickets can never win
        assert!(!is_winning(9, 10, 0));
    }

    #[test]
    fn entropy_reader_wants_full_entry() {
        assert!(entropy_from_slot_hashes(&[0u8; 16]).is_err());

        let mut data = vec![0u8; 8 + 8 + 32];
        data[16..48].copy_from_slice(&[0x5A; 32]);
        assert_eq!(entropy_from_slot_hashes(&data).unwrap(), [0x5A; 32]);
    }
}
