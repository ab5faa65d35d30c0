//! Signer capability checks
//!
//! A party may act on an escrow only if its account signed the transaction
//! and its key is the one recorded in the escrow for that role. Handlers run
//! `require_signer` while parsing accounts; the state machine runs
//! `require_party` first thing in every transition.

use pinocchio::{account_info::AccountInfo, program_error::ProgramError, pubkey::Pubkey, ProgramResult};

use crate::errors::EscrowError;

/// Require the account to have signed the transaction
#[inline(always)]
pub fn require_signer(account: &AccountInfo) -> ProgramResult {
    if !account.is_signer() {
        return Err(ProgramError::MissingRequiredSignature);
    }
    Ok(())
}

/// Require the acting key to be the recorded party
#[inline(always)]
pub fn require_party(recorded: &Pubkey, caller: &Pubkey) -> Result<(), EscrowError> {
    if recorded != caller {
        return Err(EscrowError::Unauthorized);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_party() {
        assert_eq!(require_party(&[1; 32], &[1; 32]), Ok(()));
        assert_eq!(require_party(&[1; 32], &[2; 32]), Err(EscrowError::Unauthorized));
    }
}
