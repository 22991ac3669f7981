//! State structures for the probability pool protocol

pub mod config;
pub mod pool;

pub use config::*;
pub use pool::*;
