//! Escrow state transitions
//!
//! These functions hold the rules for create/approve/claim/cancel and are
//! independent of account parsing, so instruction handlers stay thin. Each one
//! validates every precondition before it writes anything.

use pinocchio::{program_error::ProgramError, pubkey::Pubkey};

use crate::{
    errors::EscrowError,
    guard::require_party,
    ledger::{drain, pay_out, LamportBalance},
    require,
    state::{sum_amounts, MilestoneEscrow, MAX_JOB_ID_LEN, MILESTONE_COUNT},
};

/// Arguments for opening a new escrow
#[derive(Clone, Copy, Debug)]
pub struct EscrowTerms<'a> {
    pub freelancer: Pubkey,
    pub job_id: &'a [u8],
    pub milestone_amounts: [u64; MILESTONE_COUNT],
}

impl EscrowTerms<'_> {
    /// Validate the terms; returns the total lamports to lock
    pub fn validate(&self) -> Result<u64, EscrowError> {
        require!(!self.job_id.is_empty(), EscrowError::InvalidJobId);
        require!(self.job_id.len() <= MAX_JOB_ID_LEN, EscrowError::JobIdTooLong);
        require!(
            self.milestone_amounts.iter().all(|&amount| amount > 0),
            EscrowError::InvalidMilestoneAmount
        );
        require!(
            self.freelancer != MilestoneEscrow::DEFAULT_PUBKEY,
            EscrowError::InvalidFreelancer
        );
        sum_amounts(&self.milestone_amounts)
    }
}

/// Map a wire index to an array slot
#[inline(always)]
pub fn milestone_slot(index: u8) -> Result<usize, EscrowError> {
    let slot = index as usize;
    require!(slot < MILESTONE_COUNT, EscrowError::InvalidMilestoneIndex);
    Ok(slot)
}

/// What currently sits at the derived escrow address
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressState {
    pub lamports: u64,
    pub data_empty: bool,
    pub system_owned: bool,
}

/// How a new escrow account ends up holding `total + rent_reserve`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Funding {
    /// Nothing at the address; create it holding `lamports`
    Create { lamports: u64 },
    /// Lamports were sent to the address ahead of time. The recruiter tops it
    /// up by `deposit`; `excess` goes back to the recruiter once the program
    /// owns the account.
    Adopt { deposit: u64, excess: u64 },
}

impl Funding {
    /// Lamports the recruiter pays in
    pub fn deposit(&self) -> u64 {
        match *self {
            Self::Create { lamports } => lamports,
            Self::Adopt { deposit, .. } => deposit,
        }
    }
}

/// Decide how to fund a new escrow of `total` lamports
pub fn plan_funding(
    address: AddressState,
    total: u64,
    rent_reserve: u64,
    recruiter_lamports: u64,
) -> Result<Funding, EscrowError> {
    // Anything with data or a non-system owner is a live (or reused) escrow
    require!(
        address.data_empty && address.system_owned,
        EscrowError::AccountAlreadyExists
    );

    let required = total
        .checked_add(rent_reserve)
        .ok_or(EscrowError::ArithmeticOverflow)?;
    let deposit = required.saturating_sub(address.lamports);
    require!(recruiter_lamports >= deposit, EscrowError::InsufficientFunds);

    if address.lamports == 0 {
        return Ok(Funding::Create { lamports: required });
    }
    Ok(Funding::Adopt {
        deposit,
        excess: address.lamports.saturating_sub(required),
    })
}

/// Write the terms into a freshly initialized escrow
pub fn open_escrow(
    escrow: &mut MilestoneEscrow,
    recruiter: &Pubkey,
    terms: &EscrowTerms,
    job_id_hash: [u8; 32],
    bump: u8,
) {
    escrow.recruiter = *recruiter;
    escrow.freelancer = terms.freelancer;
    escrow.job_id_hash = job_id_hash;
    escrow.milestone_amounts = terms.milestone_amounts;
    escrow.job_id = [0u8; MAX_JOB_ID_LEN];
    escrow.job_id[..terms.job_id.len()].copy_from_slice(terms.job_id);
    escrow.job_id_len = terms.job_id.len() as u8;
    escrow.approved_mask = 0;
    escrow.claimed_mask = 0;
    escrow.bump = bump;
}

/// Recruiter approves one milestone
pub fn approve_milestone(
    escrow: &mut MilestoneEscrow,
    caller: &Pubkey,
    index: u8,
) -> Result<(), EscrowError> {
    require_party(&escrow.recruiter, caller)?;
    let slot = milestone_slot(index)?;
    require!(!escrow.is_approved(slot), EscrowError::MilestoneAlreadyApproved);

    escrow.approved_mask |= 1 << slot;
    Ok(())
}

/// Freelancer pulls an approved milestone; returns the lamports paid
pub fn claim_milestone(
    escrow: &mut MilestoneEscrow,
    caller: &Pubkey,
    index: u8,
    vault: &impl LamportBalance,
    payee: &impl LamportBalance,
    rent_reserve: u64,
) -> Result<u64, ProgramError> {
    require_party(&escrow.freelancer, caller)?;
    let slot = milestone_slot(index)?;
    require!(escrow.is_approved(slot), EscrowError::MilestoneNotApproved);
    require!(!escrow.is_claimed(slot), EscrowError::MilestoneAlreadyClaimed);

    let amount = escrow.milestone_amounts[slot];
    pay_out(vault, payee, amount, rent_reserve)?;
    escrow.claimed_mask |= 1 << slot;
    Ok(amount)
}

/// Check that the recruiter may still cancel
pub fn check_cancellable(escrow: &MilestoneEscrow, caller: &Pubkey) -> Result<(), EscrowError> {
    require_party(&escrow.recruiter, caller)?;
    require!(!escrow.has_any_approval(), EscrowError::CannotCancelAfterApproval);
    Ok(())
}

/// Recruiter cancels; every lamport goes back. Returns the amount refunded.
///
/// The caller is responsible for zeroing and closing the account afterwards.
pub fn cancel_job(
    escrow: &MilestoneEscrow,
    caller: &Pubkey,
    vault: &impl LamportBalance,
    recruiter: &impl LamportBalance,
) -> Result<u64, ProgramError> {
    check_cancellable(escrow, caller)?;
    drain(vault, recruiter)
}
