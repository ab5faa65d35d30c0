//! Milestone Escrow Program
//!
//! A Solana escrow program for milestone-based job payments:
//! - Recruiter locks three milestone payments up front in a per-job PDA
//! - Recruiter approves milestones in any order
//! - Freelancer claims each approved milestone
//! - Recruiter may cancel for a full refund until the first approval
//!
//! Built with Pinocchio for minimal binary size and compute usage.

#![cfg_attr(target_os = "solana", no_std)]

#[cfg(not(target_os = "solana"))]
extern crate std;

use pinocchio::{
    account_info::AccountInfo,
    program_error::ProgramError,
    pubkey::Pubkey,
    ProgramResult,
};

pub mod derive;
pub mod errors;
pub mod guard;
pub mod instructions;
pub mod ledger;
pub mod machine;
pub mod state;

#[cfg(not(target_os = "solana"))]
pub mod client;

#[cfg(test)]
mod test_utils;

pub use errors::*;
pub use state::*;
pub use instructions::*;

// Program ID: 2aM9sGVczNRJ11XrCghbLhfMhy6PQyajDrEogVFwz6qN
pub const ID: Pubkey = [
    0x17, 0x66, 0xa3, 0xfb, 0x44, 0x25, 0x2a, 0x83,
    0xff, 0xa4, 0xcf, 0xc2, 0x0e, 0xed, 0x15, 0x84,
    0x31, 0xe0, 0x18, 0xee, 0xe5, 0x67, 0xee, 0x31,
    0x51, 0xf8, 0x4b, 0x99, 0xfd, 0x1a, 0xbc, 0x31,
];

// Entrypoint and allocator for BPF builds
#[cfg(not(feature = "no-entrypoint"))]
pinocchio::program_entrypoint!(process_instruction);
#[cfg(not(feature = "no-entrypoint"))]
pinocchio::default_allocator!();
#[cfg(not(feature = "no-entrypoint"))]
pinocchio::nostd_panic_handler!();

/// Main program entrypoint
pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    // Get discriminator (first byte)
    let (discriminator, data) = instruction_data
        .split_first()
        .ok_or(ProgramError::InvalidInstructionData)?;

    match Instruction::try_from(*discriminator)? {
        Instruction::CreateEscrow => process_create_escrow(accounts, data, program_id),
        Instruction::ApproveMilestone => process_approve_milestone(accounts, data, program_id),
        Instruction::ClaimMilestone => process_claim_milestone(accounts, data, program_id),
        Instruction::CancelJob => process_cancel_job(accounts, data, program_id),
    }
}
