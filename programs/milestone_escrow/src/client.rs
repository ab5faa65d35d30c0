//! Off-chain helpers for building instructions and reading escrows
//!
//! Host builds only. Account metas are listed in the order each handler
//! expects them; pair them with the transaction library of your choice.

use std::vec::Vec;

use pinocchio::{program_error::ProgramError, pubkey::Pubkey};

use crate::{
    derive::find_escrow_address_for_job,
    errors::EscrowError,
    instructions::Instruction,
    state::{EscrowSnapshot, MAX_JOB_ID_LEN, MILESTONE_COUNT},
};

/// One account slot of an instruction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccountSlot {
    pub key: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountSlot {
    const fn new(key: Pubkey, is_signer: bool, is_writable: bool) -> Self {
        Self { key, is_signer, is_writable }
    }
}

/// Program-agnostic instruction: accounts plus data
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscrowInstruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountSlot>,
    pub data: Vec<u8>,
}

/// Encode CreateEscrow data (discriminator included)
///
/// Only the one-byte length prefix is enforced here; the program applies the
/// job ID rules itself.
pub fn create_escrow_data(
    freelancer: &Pubkey,
    milestone_amounts: [u64; MILESTONE_COUNT],
    job_id: &[u8],
) -> Result<Vec<u8>, EscrowError> {
    if job_id.len() > u8::MAX as usize {
        return Err(EscrowError::JobIdTooLong);
    }
    let mut data = Vec::with_capacity(1 + 32 + 8 * MILESTONE_COUNT + 1 + job_id.len());
    data.push(Instruction::CreateEscrow as u8);
    data.extend_from_slice(freelancer);
    for amount in milestone_amounts {
        data.extend_from_slice(&amount.to_le_bytes());
    }
    data.push(job_id.len() as u8);
    data.extend_from_slice(job_id);
    Ok(data)
}

/// Build CreateEscrow; returns the instruction and the escrow address
pub fn create_escrow(
    program_id: &Pubkey,
    recruiter: &Pubkey,
    freelancer: &Pubkey,
    job_id: &[u8],
    milestone_amounts: [u64; MILESTONE_COUNT],
) -> Result<(EscrowInstruction, Pubkey), EscrowError> {
    if job_id.is_empty() {
        return Err(EscrowError::InvalidJobId);
    }
    if job_id.len() > MAX_JOB_ID_LEN {
        return Err(EscrowError::JobIdTooLong);
    }
    let (escrow, _) = find_escrow_address_for_job(recruiter, job_id, program_id);
    let ix = EscrowInstruction {
        program_id: *program_id,
        accounts: vec![
            AccountSlot::new(escrow, false, true),
            AccountSlot::new(*recruiter, true, true),
            AccountSlot::new(pinocchio_system::ID, false, false),
        ],
        data: create_escrow_data(freelancer, milestone_amounts, job_id)?,
    };
    Ok((ix, escrow))
}

/// Build ApproveMilestone
pub fn approve_milestone(
    program_id: &Pubkey,
    escrow: &Pubkey,
    recruiter: &Pubkey,
    index: u8,
) -> EscrowInstruction {
    EscrowInstruction {
        program_id: *program_id,
        accounts: vec![
            AccountSlot::new(*escrow, false, true),
            AccountSlot::new(*recruiter, true, false),
        ],
        data: vec![Instruction::ApproveMilestone as u8, index],
    }
}

/// Build ClaimMilestone
pub fn claim_milestone(
    program_id: &Pubkey,
    escrow: &Pubkey,
    freelancer: &Pubkey,
    index: u8,
) -> EscrowInstruction {
    EscrowInstruction {
        program_id: *program_id,
        accounts: vec![
            AccountSlot::new(*escrow, false, true),
            AccountSlot::new(*freelancer, true, true),
        ],
        data: vec![Instruction::ClaimMilestone as u8, index],
    }
}

/// Build CancelJob
pub fn cancel_job(program_id: &Pubkey, escrow: &Pubkey, recruiter: &Pubkey) -> EscrowInstruction {
    EscrowInstruction {
        program_id: *program_id,
        accounts: vec![
            AccountSlot::new(*escrow, false, true),
            AccountSlot::new(*recruiter, true, true),
        ],
        data: vec![Instruction::CancelJob as u8],
    }
}

/// Decode an escrow fetched over RPC
pub fn read_escrow(data: &[u8], lamports: u64, rent_reserve: u64) -> Result<EscrowSnapshot, ProgramError> {
    EscrowSnapshot::from_account_data(data, lamports, rent_reserve)
}

/// Map a failed transaction's custom code back to an escrow error
pub fn decode_error(err: &ProgramError) -> Option<EscrowError> {
    match err {
        ProgramError::Custom(code) => EscrowError::try_from(*code).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        derive::hash_job_id,
        machine::{open_escrow, EscrowTerms},
        state::{EscrowPhase, MilestoneEscrow},
        test_utils::AccountBuf,
        ID,
    };

    const RECRUITER: Pubkey = [1u8; 32];
    const FREELANCER: Pubkey = [2u8; 32];

    #[test]
    fn test_create_escrow_layout() {
        let (ix, escrow) = create_escrow(&ID, &RECRUITER, &FREELANCER, b"job-1", [10, 20, 30]).unwrap();
        assert_eq!(ix.accounts[0].key, escrow);
        assert!(ix.accounts[1].is_signer);
        assert_eq!(ix.data[0], Instruction::CreateEscrow as u8);
        assert_eq!(&ix.data[1..33], &FREELANCER);
        assert_eq!(u64::from_le_bytes(ix.data[41..49].try_into().unwrap()), 20);
        assert_eq!(ix.data[57], 5);
        assert_eq!(&ix.data[58..], b"job-1");
    }

    #[test]
    fn test_create_escrow_rejects_bad_job_ids() {
        assert_eq!(
            create_escrow(&ID, &RECRUITER, &FREELANCER, b"", [1, 1, 1]).err(),
            Some(EscrowError::InvalidJobId)
        );
        let long = [b'j'; MAX_JOB_ID_LEN + 1];
        assert_eq!(
            create_escrow(&ID, &RECRUITER, &FREELANCER, &long, [1, 1, 1]).err(),
            Some(EscrowError::JobIdTooLong)
        );
    }

    #[test]
    fn test_create_escrow_data_rejects_oversized_job_id() {
        let max = [b'j'; u8::MAX as usize];
        let data = create_escrow_data(&FREELANCER, [1, 1, 1], &max).unwrap();
        assert_eq!(data[57], u8::MAX);
        assert_eq!(data.len(), 58 + u8::MAX as usize);

        let over = [b'j'; u8::MAX as usize + 1];
        assert_eq!(
            create_escrow_data(&FREELANCER, [1, 1, 1], &over),
            Err(EscrowError::JobIdTooLong)
        );
    }

    #[test]
    fn test_read_escrow_reports_held_balance() {
        let rent_reserve = 2_227_200;
        let terms = EscrowTerms {
            freelancer: FREELANCER,
            job_id: b"job-1",
            milestone_amounts: [10, 20, 30],
        };
        let total = terms.validate().unwrap();
        let mut buf = AccountBuf::new();
        {
            let escrow = MilestoneEscrow::init(&mut buf.0).unwrap();
            open_escrow(escrow, &RECRUITER, &terms, hash_job_id(terms.job_id), 255);
            escrow.approved_mask = 0b001;
        }

        let snapshot = read_escrow(&buf.0, total + rent_reserve, rent_reserve).unwrap();
        assert_eq!(snapshot.recruiter, RECRUITER);
        assert_eq!(snapshot.job_id(), b"job-1");
        assert_eq!(snapshot.held_balance, total);
        assert_eq!(snapshot.milestones_approved, [true, false, false]);
        assert_eq!(snapshot.phase, EscrowPhase::InProgress);

        assert_eq!(
            read_escrow(&[0u8; MilestoneEscrow::SPACE], 0, rent_reserve).err(),
            Some(EscrowError::AccountNotInitialized.into())
        );
    }

    #[test]
    fn test_role_instructions_mark_signers() {
        let escrow = [4u8; 32];
        let approve = approve_milestone(&ID, &escrow, &RECRUITER, 1);
        assert_eq!(approve.data, vec![1, 1]);
        assert!(approve.accounts[1].is_signer && !approve.accounts[1].is_writable);

        let claim = claim_milestone(&ID, &escrow, &FREELANCER, 2);
        assert_eq!(claim.data, vec![2, 2]);
        assert!(claim.accounts[1].is_signer && claim.accounts[1].is_writable);

        let cancel = cancel_job(&ID, &escrow, &RECRUITER);
        assert_eq!(cancel.data, vec![3]);
    }

    #[test]
    fn test_decode_error() {
        let err: ProgramError = EscrowError::CannotCancelAfterApproval.into();
        assert_eq!(decode_error(&err), Some(EscrowError::CannotCancelAfterApproval));
        assert_eq!(decode_error(&ProgramError::MissingRequiredSignature), None);
    }
}
