//! Lamport custody helpers
//!
//! Every lamport movement out of an escrow goes through here. Both sides of a
//! transfer are computed with checked math before either balance is written.

use pinocchio::{account_info::AccountInfo, program_error::ProgramError, ProgramResult};

use crate::{errors::EscrowError, require};

/// Anything that holds a lamport balance
pub trait LamportBalance {
    fn lamports(&self) -> u64;
    fn set_lamports(&self, lamports: u64) -> ProgramResult;
}

impl LamportBalance for AccountInfo {
    #[inline(always)]
    fn lamports(&self) -> u64 {
        AccountInfo::lamports(self)
    }

    #[inline(always)]
    fn set_lamports(&self, lamports: u64) -> ProgramResult {
        *self.try_borrow_mut_lamports()? = lamports;
        Ok(())
    }
}

/// Lamports available for payouts once the rent reserve is set aside
#[inline(always)]
pub fn spendable(account: &impl LamportBalance, rent_reserve: u64) -> u64 {
    account.lamports().saturating_sub(rent_reserve)
}

/// Move lamports between two accounts
#[inline(always)]
pub fn transfer_lamports(
    from: &impl LamportBalance,
    to: &impl LamportBalance,
    amount: u64,
) -> ProgramResult {
    let from_after = from
        .lamports()
        .checked_sub(amount)
        .ok_or(EscrowError::InsufficientFunds)?;
    let to_after = to
        .lamports()
        .checked_add(amount)
        .ok_or(EscrowError::ArithmeticOverflow)?;
    from.set_lamports(from_after)?;
    to.set_lamports(to_after)?;
    Ok(())
}

/// Pay out of an escrow without dipping into its rent reserve
pub fn pay_out(
    escrow: &impl LamportBalance,
    recipient: &impl LamportBalance,
    amount: u64,
    rent_reserve: u64,
) -> ProgramResult {
    require!(spendable(escrow, rent_reserve) >= amount, EscrowError::InsufficientFunds);
    transfer_lamports(escrow, recipient, amount)
}

/// Move every lamport to `recipient`; returns the amount moved
pub fn drain(escrow: &impl LamportBalance, recipient: &impl LamportBalance) -> Result<u64, ProgramError> {
    let amount = escrow.lamports();
    transfer_lamports(escrow, recipient, amount)?;
    Ok(amount)
}
