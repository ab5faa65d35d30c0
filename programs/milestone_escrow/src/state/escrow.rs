//! MilestoneEscrow account state
//!
//! One account per job. Holds the two parties, the milestone schedule and the
//! approval/claim bitmaps. Lamports held by the account back every payout.

use pinocchio::{program_error::ProgramError, pubkey::Pubkey};
use core::mem::size_of;
use crate::errors::EscrowError;

/// Number of milestones in every escrow
pub const MILESTONE_COUNT: usize = 3;

/// Maximum stored job ID length in bytes
pub const MAX_JOB_ID_LEN: usize = 64;

const ALL_MILESTONES: u8 = (1 << MILESTONE_COUNT) - 1;

/// Lifecycle phase derived from the bitmaps
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EscrowPhase {
    /// Funded, nothing approved; still cancellable
    Funded = 0,
    /// At least one approval, not every milestone claimed
    InProgress = 1,
    /// Every milestone claimed; kept as a settlement record
    Settled = 2,
}

/// Main escrow account
///
/// Seeds: ["escrow", recruiter, sha256(job_id)]
#[repr(C)]
pub struct MilestoneEscrow {
    /// The recruiter who funded the escrow
    pub recruiter: Pubkey,
    /// The freelancer who is paid per milestone
    pub freelancer: Pubkey,
    /// SHA256 hash of the job_id for PDA derivation
    pub job_id_hash: [u8; 32],
    /// Lamports released per milestone
    pub milestone_amounts: [u64; MILESTONE_COUNT],
    /// Job ID as supplied by the recruiter, zero padded
    pub job_id: [u8; MAX_JOB_ID_LEN],
    /// Number of meaningful bytes in `job_id`
    pub job_id_len: u8,
    /// Bit i set once milestone i is approved
    pub approved_mask: u8,
    /// Bit i set once milestone i is claimed
    pub claimed_mask: u8,
    /// PDA bump seed
    pub bump: u8,
    /// Padding for alignment
    pub _padding: [u8; 4],
}

impl MilestoneEscrow {
    /// Account discriminator
    pub const DISCRIMINATOR: [u8; 8] = [0x4d, 0x69, 0x6c, 0x65, 0x45, 0x73, 0x63, 0x72]; // "MileEscr"

    /// Size of the account data (without discriminator)
    pub const LEN: usize = size_of::<Self>();

    /// Total size including 8-byte discriminator
    pub const SPACE: usize = 8 + Self::LEN;

    /// Default Pubkey for comparison (all zeros)
    pub const DEFAULT_PUBKEY: Pubkey = [0u8; 32];

    /// Load from account data (validates discriminator and length)
    #[inline(always)]
    pub fn load(data: &[u8]) -> Result<&Self, ProgramError> {
        Self::check_initialized(data)?;
        Ok(unsafe { &*(data[8..].as_ptr() as *const Self) })
    }

    /// Load mutable reference from account data
    #[inline(always)]
    pub fn load_mut(data: &mut [u8]) -> Result<&mut Self, ProgramError> {
        Self::check_initialized(data)?;
        Ok(unsafe { &mut *(data[8..].as_mut_ptr() as *mut Self) })
    }

    /// Initialize account data with discriminator
    #[inline(always)]
    pub fn init(data: &mut [u8]) -> Result<&mut Self, ProgramError> {
        if data.len() < Self::SPACE {
            return Err(EscrowError::InvalidAccountData.into());
        }
        if data[..8] == Self::DISCRIMINATOR {
            return Err(EscrowError::AccountAlreadyExists.into());
        }
        data[..8].copy_from_slice(&Self::DISCRIMINATOR);
        data[8..Self::SPACE].fill(0);
        Ok(unsafe { &mut *(data[8..].as_mut_ptr() as *mut Self) })
    }

    #[inline(always)]
    fn check_initialized(data: &[u8]) -> Result<(), ProgramError> {
        // A closed account has zero-length (or zeroed) data.
        if data.is_empty() || data[..8usize.min(data.len())].iter().all(|b| *b == 0) {
            return Err(EscrowError::AccountNotInitialized.into());
        }
        if data.len() < Self::SPACE {
            return Err(EscrowError::InvalidAccountData.into());
        }
        if data[..8] != Self::DISCRIMINATOR {
            return Err(EscrowError::InvalidAccountData.into());
        }
        Ok(())
    }

    /// Stored job ID bytes
    #[inline(always)]
    pub fn job_id(&self) -> &[u8] {
        let len = (self.job_id_len as usize).min(MAX_JOB_ID_LEN);
        &self.job_id[..len]
    }

    #[inline(always)]
    pub fn is_approved(&self, index: usize) -> bool {
        self.approved_mask & (1 << index) != 0
    }

    #[inline(always)]
    pub fn is_claimed(&self, index: usize) -> bool {
        self.claimed_mask & (1 << index) != 0
    }

    /// Approval flags, index-aligned with `milestone_amounts`
    pub fn milestones_approved(&self) -> [bool; MILESTONE_COUNT] {
        core::array::from_fn(|i| self.is_approved(i))
    }

    /// Claim flags, index-aligned with `milestone_amounts`
    pub fn milestones_claimed(&self) -> [bool; MILESTONE_COUNT] {
        core::array::from_fn(|i| self.is_claimed(i))
    }

    #[inline(always)]
    pub fn has_any_approval(&self) -> bool {
        self.approved_mask & ALL_MILESTONES != 0
    }

    /// Sum of every milestone amount
    pub fn total_amount(&self) -> Result<u64, EscrowError> {
        sum_amounts(&self.milestone_amounts)
    }

    /// Lamports still owed to the freelancer (unclaimed milestones)
    pub fn locked_amount(&self) -> Result<u64, EscrowError> {
        self.milestone_amounts
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.is_claimed(*i))
            .try_fold(0u64, |acc, (_, amount)| {
                acc.checked_add(*amount).ok_or(EscrowError::ArithmeticOverflow)
            })
    }

    /// Lifecycle phase derived from the bitmaps
    pub fn phase(&self) -> EscrowPhase {
        if self.claimed_mask & ALL_MILESTONES == ALL_MILESTONES {
            EscrowPhase::Settled
        } else if self.has_any_approval() {
            EscrowPhase::InProgress
        } else {
            EscrowPhase::Funded
        }
    }

    /// Check the data-model invariants hold
    pub fn is_consistent(&self) -> bool {
        self.milestone_amounts.iter().all(|a| *a > 0)
            && self.claimed_mask & !self.approved_mask == 0
            && self.approved_mask & !ALL_MILESTONES == 0
            && (self.job_id_len as usize) <= MAX_JOB_ID_LEN
    }
}

/// Checked sum of a milestone schedule
pub fn sum_amounts(amounts: &[u64; MILESTONE_COUNT]) -> Result<u64, EscrowError> {
    amounts.iter().try_fold(0u64, |acc, amount| {
        acc.checked_add(*amount).ok_or(EscrowError::ArithmeticOverflow)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::AccountBuf;
    use core::mem::{align_of, size_of};

    #[test]
    fn test_escrow_size() {
        assert_eq!(MilestoneEscrow::LEN, size_of::<MilestoneEscrow>());
        assert_eq!(MilestoneEscrow::SPACE, 8 + size_of::<MilestoneEscrow>());
        assert_eq!(MilestoneEscrow::LEN % 8, 0);
        assert_eq!(align_of::<MilestoneEscrow>(), 8);
    }

    #[test]
    fn test_init_then_load() {
        let mut buf = AccountBuf::new();
        {
            let escrow = MilestoneEscrow::init(&mut buf.0).unwrap();
            escrow.milestone_amounts = [1, 2, 3];
            escrow.approved_mask = 0b010;
        }
        let escrow = MilestoneEscrow::load(&buf.0).unwrap();
        assert_eq!(escrow.milestone_amounts, [1, 2, 3]);
        assert_eq!(escrow.milestones_approved(), [false, true, false]);
        assert_eq!(escrow.milestones_claimed(), [false; 3]);
    }

    #[test]
    fn test_double_init_rejected() {
        let mut buf = AccountBuf::new();
        MilestoneEscrow::init(&mut buf.0).unwrap();
        assert_eq!(
            MilestoneEscrow::init(&mut buf.0).err(),
            Some(EscrowError::AccountAlreadyExists.into())
        );
    }

    #[test]
    fn test_load_closed_account() {
        let buf = AccountBuf::new();
        assert_eq!(
            MilestoneEscrow::load(&buf.0).err(),
            Some(EscrowError::AccountNotInitialized.into())
        );
        assert_eq!(
            MilestoneEscrow::load(&[]).err(),
            Some(EscrowError::AccountNotInitialized.into())
        );
    }

    #[test]
    fn test_load_foreign_account() {
        let mut buf = AccountBuf::new();
        buf.0[..8].copy_from_slice(b"JobEscro");
        assert_eq!(
            MilestoneEscrow::load(&buf.0).err(),
            Some(EscrowError::InvalidAccountData.into())
        );
    }

    #[test]
    fn test_phase_and_locked_amount() {
        let mut buf = AccountBuf::new();
        let escrow = MilestoneEscrow::init(&mut buf.0).unwrap();
        escrow.milestone_amounts = [10, 20, 30];
        assert_eq!(escrow.phase(), EscrowPhase::Funded);
        assert_eq!(escrow.locked_amount(), Ok(60));

        escrow.approved_mask = 0b001;
        escrow.claimed_mask = 0b001;
        assert_eq!(escrow.phase(), EscrowPhase::InProgress);
        assert_eq!(escrow.locked_amount(), Ok(50));

        escrow.approved_mask = 0b111;
        escrow.claimed_mask = 0b111;
        assert_eq!(escrow.phase(), EscrowPhase::Settled);
        assert_eq!(escrow.locked_amount(), Ok(0));
        assert!(escrow.is_consistent());

        escrow.approved_mask = 0b011;
        assert!(!escrow.is_consistent());
    }

    #[test]
    fn test_sum_overflow() {
        assert_eq!(
            sum_amounts(&[u64::MAX, 1, 1]),
            Err(EscrowError::ArithmeticOverflow)
        );
    }
}
