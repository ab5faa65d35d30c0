//! CreateEscrow instruction
//!
//! Derives the job's escrow PDA, creates it and locks the full milestone
//! schedule plus the rent reserve in one step.

use pinocchio::{
    account_info::AccountInfo,
    instruction::Signer,
    program_error::ProgramError,
    pubkey::Pubkey,
    seeds,
    sysvars::{rent::Rent, Sysvar},
    ProgramResult,
};
use pinocchio_log::log;
use pinocchio_system::instructions::{Allocate, Assign, CreateAccount, Transfer};

use crate::{
    derive::{find_escrow_address, hash_job_id},
    errors::EscrowError,
    guard::require_signer,
    ledger::transfer_lamports,
    machine::{open_escrow, plan_funding, AddressState, EscrowTerms, Funding},
    require,
    state::{MilestoneEscrow, MILESTONE_COUNT},
};

/// Create escrow instruction accounts
pub struct CreateEscrowAccounts<'a> {
    pub escrow: &'a AccountInfo,
    pub recruiter: &'a AccountInfo,
    pub system_program: &'a AccountInfo,
}

impl<'a> TryFrom<&'a [AccountInfo]> for CreateEscrowAccounts<'a> {
    type Error = ProgramError;

    fn try_from(accounts: &'a [AccountInfo]) -> Result<Self, Self::Error> {
        let [escrow, recruiter, system_program, ..] = accounts else {
            return Err(ProgramError::NotEnoughAccountKeys);
        };

        require_signer(recruiter)?;

        if !escrow.is_writable() || !recruiter.is_writable() {
            return Err(ProgramError::InvalidArgument);
        }
        if system_program.key() != &pinocchio_system::ID {
            return Err(ProgramError::IncorrectProgramId);
        }

        Ok(Self {
            escrow,
            recruiter,
            system_program,
        })
    }
}

/// Instruction data for CreateEscrow
/// Layout: [freelancer: [u8; 32], amounts: [u64; 3], job_id_len: u8, job_id: [u8; job_id_len]]
pub struct CreateEscrowData<'a> {
    pub freelancer: Pubkey,
    pub milestone_amounts: [u64; MILESTONE_COUNT],
    pub job_id: &'a [u8],
}

impl<'a> CreateEscrowData<'a> {
    /// Fixed part before the job ID bytes
    pub const HEADER_LEN: usize = 32 + 8 * MILESTONE_COUNT + 1;

    pub fn try_from_slice(data: &'a [u8]) -> Result<Self, ProgramError> {
        if data.len() < Self::HEADER_LEN {
            return Err(ProgramError::InvalidInstructionData);
        }

        let mut freelancer = [0u8; 32];
        freelancer.copy_from_slice(&data[0..32]);

        let mut milestone_amounts = [0u64; MILESTONE_COUNT];
        for (i, amount) in milestone_amounts.iter_mut().enumerate() {
            let start = 32 + i * 8;
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(&data[start..start + 8]);
            *amount = u64::from_le_bytes(bytes);
        }

        let job_id_len = data[Self::HEADER_LEN - 1] as usize;
        let job_id = data
            .get(Self::HEADER_LEN..Self::HEADER_LEN + job_id_len)
            .ok_or(ProgramError::InvalidInstructionData)?;

        Ok(Self {
            freelancer,
            milestone_amounts,
            job_id,
        })
    }
}

/// Process create_escrow instruction
pub fn process_create_escrow(
    accounts: &[AccountInfo],
    data: &[u8],
    program_id: &Pubkey,
) -> ProgramResult {
    let ctx = CreateEscrowAccounts::try_from(accounts)?;
    let args = CreateEscrowData::try_from_slice(data)?;

    let terms = EscrowTerms {
        freelancer: args.freelancer,
        job_id: args.job_id,
        milestone_amounts: args.milestone_amounts,
    };
    let total = terms.validate()?;

    // Derive PDA and verify
    let job_id_hash = hash_job_id(args.job_id);
    let (expected_pda, bump) = find_escrow_address(ctx.recruiter.key(), &job_id_hash, program_id);
    require!(ctx.escrow.key() == &expected_pda, EscrowError::InvalidPda);

    let address = AddressState {
        lamports: ctx.escrow.lamports(),
        data_empty: ctx.escrow.data_is_empty(),
        system_owned: ctx.escrow.is_owned_by(&pinocchio_system::ID),
    };
    let rent_lamports = Rent::get()?.minimum_balance(MilestoneEscrow::SPACE);
    let funding = plan_funding(address, total, rent_lamports, ctx.recruiter.lamports())?;

    let bump_ref = &[bump];
    let signer_seeds = seeds!(
        crate::derive::ESCROW_SEED,
        ctx.recruiter.key(),
        &job_id_hash,
        bump_ref
    );

    match funding {
        Funding::Create { lamports } => {
            CreateAccount {
                from: ctx.recruiter,
                to: ctx.escrow,
                lamports,
                space: MilestoneEscrow::SPACE as u64,
                owner: program_id,
            }
            .invoke_signed(&[Signer::from(&signer_seeds)])?;
        }
        Funding::Adopt { deposit, excess } => {
            // Someone sent lamports to the PDA ahead of time; CreateAccount
            // would refuse it, so top up and take ownership instead.
            if deposit > 0 {
                Transfer {
                    from: ctx.recruiter,
                    to: ctx.escrow,
                    lamports: deposit,
                }
                .invoke()?;
            }
            Allocate {
                account: ctx.escrow,
                space: MilestoneEscrow::SPACE as u64,
            }
            .invoke_signed(&[Signer::from(&signer_seeds)])?;
            Assign {
                account: ctx.escrow,
                owner: program_id,
            }
            .invoke_signed(&[Signer::from(&signer_seeds)])?;
            // Program owned now; hold exactly total + rent
            if excess > 0 {
                transfer_lamports(ctx.escrow, ctx.recruiter, excess)?;
            }
        }
    }

    // Initialize escrow data
    let escrow_data = &mut ctx.escrow.try_borrow_mut_data()?;
    let escrow = MilestoneEscrow::init(escrow_data)?;
    open_escrow(escrow, ctx.recruiter.key(), &terms, job_id_hash, bump);

    log!(
        "CreateEscrow: locked {} lamports, recruiter paid {}",
        total,
        funding.deposit()
    );

    Ok(())
}
