//! CancelJob instruction
//!
//! Recruiter takes everything back and the escrow account is destroyed. Only allowed
//! while no milestone has been approved.

use pinocchio::{account_info::AccountInfo, program_error::ProgramError, pubkey::Pubkey, ProgramResult};
use pinocchio_log::log;

use crate::{guard::require_signer, machine::cancel_job, state::MilestoneEscrow};

use super::{check_escrow_account, verify_escrow_pda};

/// Cancel job instruction accounts
pub struct CancelJobAccounts<'a> {
    pub escrow: &'a AccountInfo,
    pub recruiter: &'a AccountInfo,
}

impl<'a> TryFrom<&'a [AccountInfo]> for CancelJobAccounts<'a> {
    type Error = ProgramError;

    fn try_from(accounts: &'a [AccountInfo]) -> Result<Self, Self::Error> {
        let [escrow, recruiter, ..] = accounts else {
            return Err(ProgramError::NotEnoughAccountKeys);
        };

        require_signer(recruiter)?;

        if !escrow.is_writable() || !recruiter.is_writable() {
            return Err(ProgramError::InvalidArgument);
        }
        if escrow.key() == recruiter.key() {
            return Err(ProgramError::InvalidArgument);
        }

        Ok(Self { escrow, recruiter })
    }
}

/// Process cancel_job instruction
pub fn process_cancel_job(
    accounts: &[AccountInfo],
    _data: &[u8],
    program_id: &Pubkey,
) -> ProgramResult {
    let ctx = CancelJobAccounts::try_from(accounts)?;

    check_escrow_account(ctx.escrow, program_id)?;
    let refunded = {
        let escrow_data = &mut ctx.escrow.try_borrow_mut_data()?;
        let escrow = MilestoneEscrow::load(escrow_data)?;
        verify_escrow_pda(ctx.escrow, escrow, program_id)?;

        let refunded = cancel_job(escrow, ctx.recruiter.key(), ctx.escrow, ctx.recruiter)?;

        // Zero out data so the account cannot be loaded again
        escrow_data.fill(0);
        refunded
    };

    // Hand the address back to the system program so the same job can be
    // created again, even later in this transaction
    ctx.escrow.close()?;

    log!("CancelJob: refunded {} lamports", refunded);

    Ok(())
}
