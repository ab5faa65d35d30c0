//! Read-only view of an escrow account for off-chain consumers
//!
//! The mirroring layer reads the account's raw data and lamports from the
//! ledger and decodes them here; it never infers milestone state on its own.

use pinocchio::{program_error::ProgramError, pubkey::Pubkey};

use super::{EscrowPhase, MilestoneEscrow, MAX_JOB_ID_LEN, MILESTONE_COUNT};

/// Owned copy of every escrow field plus the held balance
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EscrowSnapshot {
    pub recruiter: Pubkey,
    pub freelancer: Pubkey,
    pub job_id_hash: [u8; 32],
    pub job_id: [u8; MAX_JOB_ID_LEN],
    pub job_id_len: u8,
    pub milestone_amounts: [u64; MILESTONE_COUNT],
    pub milestones_approved: [bool; MILESTONE_COUNT],
    pub milestones_claimed: [bool; MILESTONE_COUNT],
    /// Lamports above the rent-exemption reserve
    pub held_balance: u64,
    pub phase: EscrowPhase,
    pub bump: u8,
}

impl EscrowSnapshot {
    /// Decode a snapshot from raw account data and its lamport balance.
    ///
    /// `rent_reserve` is the rent-exempt minimum for `MilestoneEscrow::SPACE`.
    pub fn from_account_data(
        data: &[u8],
        lamports: u64,
        rent_reserve: u64,
    ) -> Result<Self, ProgramError> {
        // RPC buffers carry no alignment guarantee.
        if data.as_ptr() as usize % 8 != 0 {
            return Self::from_unaligned(data, lamports, rent_reserve);
        }
        let escrow = MilestoneEscrow::load(data)?;
        Ok(Self::capture(escrow, lamports.saturating_sub(rent_reserve)))
    }

    fn from_unaligned(data: &[u8], lamports: u64, rent_reserve: u64) -> Result<Self, ProgramError> {
        #[repr(C, align(8))]
        struct Aligned([u8; MilestoneEscrow::SPACE]);

        let mut copy = Aligned([0u8; MilestoneEscrow::SPACE]);
        let len = data.len().min(MilestoneEscrow::SPACE);
        copy.0[..len].copy_from_slice(&data[..len]);
        let escrow = MilestoneEscrow::load(&copy.0[..len])?;
        Ok(Self::capture(escrow, lamports.saturating_sub(rent_reserve)))
    }

    /// Copy every field out of a loaded escrow
    pub fn capture(escrow: &MilestoneEscrow, held_balance: u64) -> Self {
        Self {
            recruiter: escrow.recruiter,
            freelancer: escrow.freelancer,
            job_id_hash: escrow.job_id_hash,
            job_id: escrow.job_id,
            job_id_len: escrow.job_id_len,
            milestone_amounts: escrow.milestone_amounts,
            milestones_approved: escrow.milestones_approved(),
            milestones_claimed: escrow.milestones_claimed(),
            held_balance,
            phase: escrow.phase(),
            bump: escrow.bump,
        }
    }

    /// Stored job ID bytes
    pub fn job_id(&self) -> &[u8] {
        &self.job_id[..(self.job_id_len as usize).min(MAX_JOB_ID_LEN)]
    }
}
