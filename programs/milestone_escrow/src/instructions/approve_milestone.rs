//! ApproveMilestone instruction
//!
//! Recruiter signs off one milestone. No lamports move.

use pinocchio::{account_info::AccountInfo, program_error::ProgramError, pubkey::Pubkey, ProgramResult};
use pinocchio_log::log;

use crate::{guard::require_signer, machine::approve_milestone, state::MilestoneEscrow};

use super::{check_escrow_account, read_milestone_index, verify_escrow_pda};

/// Approve milestone instruction accounts
pub struct ApproveMilestoneAccounts<'a> {
    pub escrow: &'a AccountInfo,
    pub recruiter: &'a AccountInfo,
}

impl<'a> TryFrom<&'a [AccountInfo]> for ApproveMilestoneAccounts<'a> {
    type Error = ProgramError;

    fn try_from(accounts: &'a [AccountInfo]) -> Result<Self, Self::Error> {
        let [escrow, recruiter, ..] = accounts else {
            return Err(ProgramError::NotEnoughAccountKeys);
        };

        require_signer(recruiter)?;

        if !escrow.is_writable() {
            return Err(ProgramError::InvalidArgument);
        }

        Ok(Self { escrow, recruiter })
    }
}

/// Process approve_milestone instruction
pub fn process_approve_milestone(
    accounts: &[AccountInfo],
    data: &[u8],
    program_id: &Pubkey,
) -> ProgramResult {
    let ctx = ApproveMilestoneAccounts::try_from(accounts)?;
    let index = read_milestone_index(data)?;

    check_escrow_account(ctx.escrow, program_id)?;
    let escrow_data = &mut ctx.escrow.try_borrow_mut_data()?;
    let escrow = MilestoneEscrow::load_mut(escrow_data)?;
    verify_escrow_pda(ctx.escrow, escrow, program_id)?;

    approve_milestone(escrow, ctx.recruiter.key(), index)?;

    log!("ApproveMilestone: milestone {} approved", index);

    Ok(())
}
