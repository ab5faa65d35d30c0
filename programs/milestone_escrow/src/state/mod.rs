//! Account state definitions for the Milestone Escrow program
//!
//! All structs use #[repr(C)] for predictable memory layout and zero-copy access.

mod escrow;
mod snapshot;

pub use escrow::*;
pub use snapshot::*;
