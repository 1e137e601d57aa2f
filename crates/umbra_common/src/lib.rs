//! Shared foundational types used across the Umbra crates.
//!
//! Provides the port [`Direction`] shared by the structural model, the
//! configuration layer and the interface synthesizer, and the
//! [`ContentHash`] fingerprint used to make emitted designs comparable
//! across runs.

#![warn(missing_docs)]

pub mod direction;
pub mod hash;

pub use direction::{Direction, ParseDirectionError};
pub use hash::ContentHash;
