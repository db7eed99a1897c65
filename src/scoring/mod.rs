//! Vanity scoring for derived addresses.
//!
//! One rule is selected at startup and applied to every candidate:
//! - Leading zero bytes
//! - Leading zero nibbles
//! - Longest uniform run from either end

mod rule;

pub use rule::ScoreRule;
