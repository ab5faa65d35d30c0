//! Instruction handlers for the Milestone Escrow program
//!
//! Each instruction is implemented as a struct with TryFrom for account parsing
//! and a process function for execution. The rules themselves live in
//! `machine`; handlers only parse, check accounts and apply.

mod create_escrow;
mod approve_milestone;
mod claim_milestone;
mod cancel_job;

pub use create_escrow::*;
pub use approve_milestone::*;
pub use claim_milestone::*;
pub use cancel_job::*;

use pinocchio::{account_info::AccountInfo, program_error::ProgramError, pubkey::Pubkey, ProgramResult};

use crate::{derive::verify_escrow_address, errors::EscrowError, state::MilestoneEscrow};

/// Instruction discriminators (single byte for efficiency)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Instruction {
    /// Create and fund a new escrow
    CreateEscrow = 0,
    /// Recruiter approves a milestone
    ApproveMilestone = 1,
    /// Freelancer claims an approved milestone
    ClaimMilestone = 2,
    /// Recruiter cancels before any approval
    CancelJob = 3,
}

impl TryFrom<u8> for Instruction {
    type Error = ProgramError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::CreateEscrow),
            1 => Ok(Self::ApproveMilestone),
            2 => Ok(Self::ClaimMilestone),
            3 => Ok(Self::CancelJob),
            _ => Err(ProgramError::InvalidInstructionData),
        }
    }
}

/// Read the milestone index argument
/// Layout: [milestone_index: u8]
#[inline(always)]
pub(crate) fn read_milestone_index(data: &[u8]) -> Result<u8, ProgramError> {
    data.first().copied().ok_or(ProgramError::InvalidInstructionData)
}

/// Escrow must exist and be owned by this program
#[inline(always)]
pub(crate) fn check_escrow_account(escrow: &AccountInfo, program_id: &Pubkey) -> ProgramResult {
    // Closed escrows are zero-length or system owned
    if escrow.data_is_empty() {
        return Err(EscrowError::AccountNotInitialized.into());
    }
    if !escrow.is_owned_by(program_id) {
        return Err(ProgramError::IncorrectProgramId);
    }
    Ok(())
}

/// Escrow address must match the seeds stored in it
#[inline(always)]
pub(crate) fn verify_escrow_pda(
    account: &AccountInfo,
    escrow: &MilestoneEscrow,
    program_id: &Pubkey,
) -> ProgramResult {
    verify_escrow_address(
        account.key(),
        &escrow.recruiter,
        &escrow.job_id_hash,
        escrow.bump,
        program_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_discriminators() {
        for tag in 0u8..4 {
            assert_eq!(Instruction::try_from(tag).unwrap() as u8, tag);
        }
        assert_eq!(Instruction::try_from(4u8), Err(ProgramError::InvalidInstructionData));
    }

    #[test]
    fn test_read_milestone_index() {
        assert_eq!(read_milestone_index(&[2]), Ok(2));
        assert_eq!(read_milestone_index(&[7, 1]), Ok(7));
        assert_eq!(read_milestone_index(&[]), Err(ProgramError::InvalidInstructionData));
    }
}
