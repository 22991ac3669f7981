//! AMM pricing for probability pools

pub mod bonding_curve;

pub use bonding_curve::*;
