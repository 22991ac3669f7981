//! Instruction handlers for the probability pool protocol
//!
//! Each instruction is one atomic state transition:
//! - `initialize` - Set up the protocol (authority only, once)
//! - `create_pool` - Escrow an asset and open its pool (permissionless)
//! - `buy` - Purchase ptokens at the curve price
//! - `request_burn` - Escrow ptokens pending a draw
//! - `user_withdraw` - Pull ptokens out of a personal vault
//! - `execute_burn` - Resolve a burn request (protocol authority only)
//! - `claim_asset` - Winner collects the escrowed asset
//! - `close_pool` - Creator settles and deallocates a won pool

pub mod buy;
pub mod claim_asset;
pub mod close_pool;
pub mod create_pool;
pub mod execute_burn;
pub mod initialize;
pub mod request_burn;
pub mod user_withdraw;

pub use buy::*;
pub use claim_asset::*;
pub use close_pool::*;
pub use create_pool::*;
pub use execute_burn::*;
pub use initialize::*;
pub use request_burn::*;
pub use user_withdraw::*;
