//! Memory model for the Barebones interpreter
//!
//! Barebones has a single flat namespace of non-negative integer variables,
//! held in a [`store::VariableStore`]. Values are `u64`: `decr` saturates at
//! zero and `incr` past `u64::MAX` is reported as an overflow.

pub mod store;

pub use store::VariableStore;
