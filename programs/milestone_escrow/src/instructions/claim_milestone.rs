//! ClaimMilestone instruction
//!
//! Freelancer pulls the lamports for an approved milestone straight out of
//! the escrow PDA. The escrow is program owned, so no CPI is needed.

use pinocchio::{
    account_info::AccountInfo,
    program_error::ProgramError,
    pubkey::Pubkey,
    sysvars::{rent::Rent, Sysvar},
    ProgramResult,
};
use pinocchio_log::log;

use crate::{guard::require_signer, machine::claim_milestone, state::MilestoneEscrow};

use super::{check_escrow_account, read_milestone_index, verify_escrow_pda};

/// Claim milestone instruction accounts
pub struct ClaimMilestoneAccounts<'a> {
    pub escrow: &'a AccountInfo,
    pub freelancer: &'a AccountInfo,
}

impl<'a> TryFrom<&'a [AccountInfo]> for ClaimMilestoneAccounts<'a> {
    type Error = ProgramError;

    fn try_from(accounts: &'a [AccountInfo]) -> Result<Self, Self::Error> {
        let [escrow, freelancer, ..] = accounts else {
            return Err(ProgramError::NotEnoughAccountKeys);
        };

        require_signer(freelancer)?;

        if !escrow.is_writable() || !freelancer.is_writable() {
            return Err(ProgramError::InvalidArgument);
        }
        if escrow.key() == freelancer.key() {
            return Err(ProgramError::InvalidArgument);
        }

        Ok(Self { escrow, freelancer })
    }
}

/// Process claim_milestone instruction
pub fn process_claim_milestone(
    accounts: &[AccountInfo],
    data: &[u8],
    program_id: &Pubkey,
) -> ProgramResult {
    let ctx = ClaimMilestoneAccounts::try_from(accounts)?;
    let index = read_milestone_index(data)?;

    check_escrow_account(ctx.escrow, program_id)?;
    let rent_reserve = Rent::get()?.minimum_balance(MilestoneEscrow::SPACE);

    let escrow_data = &mut ctx.escrow.try_borrow_mut_data()?;
    let escrow = MilestoneEscrow::load_mut(escrow_data)?;
    verify_escrow_pda(ctx.escrow, escrow, program_id)?;

    let paid = claim_milestone(
        escrow,
        ctx.freelancer.key(),
        index,
        ctx.escrow,
        ctx.freelancer,
        rent_reserve,
    )?;

    log!("ClaimMilestone: milestone {} paid {} lamports", index, paid);

    Ok(())
}
