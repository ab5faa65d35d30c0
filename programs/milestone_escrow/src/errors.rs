//! Custom error codes for the Milestone Escrow program
//!
//! Error codes start at 6000 (Anchor convention for custom errors) so that
//! explorers and off-chain tooling can tell them apart from runtime errors.

use pinocchio::program_error::ProgramError;

/// Custom error codes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum EscrowError {
    /// A milestone amount is zero
    InvalidMilestoneAmount = 6000,
    /// The derived address already hosts an escrow
    AccountAlreadyExists = 6001,
    /// Signer is not the recorded recruiter/freelancer for this role
    Unauthorized = 6002,
    /// Milestone was already approved
    MilestoneAlreadyApproved = 6003,
    /// Milestone was already claimed
    MilestoneAlreadyClaimed = 6004,
    /// Milestone has not been approved yet
    MilestoneNotApproved = 6005,
    /// Milestone index outside 0..3
    InvalidMilestoneIndex = 6006,
    /// At least one milestone is approved
    CannotCancelAfterApproval = 6007,
    /// Balance cannot cover the transfer
    InsufficientFunds = 6008,
    /// Job ID is empty
    InvalidJobId = 6009,
    /// Job ID too long (max 64 bytes)
    JobIdTooLong = 6010,
    /// Freelancer is the all-zero key
    InvalidFreelancer = 6011,
    /// Escrow address does not match its seeds
    InvalidPda = 6012,
    /// Invalid account data length
    InvalidAccountData = 6013,
    /// Account not initialized
    AccountNotInitialized = 6014,
    /// Arithmetic overflow
    ArithmeticOverflow = 6015,
}

impl EscrowError {
    /// User-facing message for this error.
    pub const fn message(&self) -> &'static str {
        match self {
            Self::InvalidMilestoneAmount => "All milestone amounts must be greater than 0",
            Self::AccountAlreadyExists => "An escrow already exists for this job",
            Self::Unauthorized => "Signer is not allowed to perform this action",
            Self::MilestoneAlreadyApproved => "Milestone has already been approved",
            Self::MilestoneAlreadyClaimed => "Milestone has already been claimed",
            Self::MilestoneNotApproved => "Milestone has not been approved yet",
            Self::InvalidMilestoneIndex => "Invalid milestone index (must be 0, 1, or 2)",
            Self::CannotCancelAfterApproval => "Cannot cancel job after milestone approval",
            Self::InsufficientFunds => "Insufficient funds",
            Self::InvalidJobId => "Job ID cannot be empty",
            Self::JobIdTooLong => "Job ID cannot exceed 64 bytes",
            Self::InvalidFreelancer => "Freelancer address is not valid",
            Self::InvalidPda => "Escrow address does not match its seeds",
            Self::InvalidAccountData => "Escrow account data is malformed",
            Self::AccountNotInitialized => "Escrow account does not exist",
            Self::ArithmeticOverflow => "Arithmetic overflow",
        }
    }
}

impl From<EscrowError> for ProgramError {
    fn from(e: EscrowError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl TryFrom<u32> for EscrowError {
    type Error = ProgramError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        let err = match code {
            6000 => Self::InvalidMilestoneAmount,
            6001 => Self::AccountAlreadyExists,
            6002 => Self::Unauthorized,
            6003 => Self::MilestoneAlreadyApproved,
            6004 => Self::MilestoneAlreadyClaimed,
            6005 => Self::MilestoneNotApproved,
            6006 => Self::InvalidMilestoneIndex,
            6007 => Self::CannotCancelAfterApproval,
            6008 => Self::InsufficientFunds,
            6009 => Self::InvalidJobId,
            6010 => Self::JobIdTooLong,
            6011 => Self::InvalidFreelancer,
            6012 => Self::InvalidPda,
            6013 => Self::InvalidAccountData,
            6014 => Self::AccountNotInitialized,
            6015 => Self::ArithmeticOverflow,
            _ => return Err(ProgramError::Custom(code)),
        };
        Ok(err)
    }
}

/// Helper macro for returning custom errors
#[macro_export]
macro_rules! require {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err.into());
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_codes_round_trip() {
        for code in 6000u32..=6015 {
            let err = EscrowError::try_from(code).unwrap();
            assert_eq!(ProgramError::from(err), ProgramError::Custom(code));
        }
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        assert_eq!(EscrowError::try_from(42u32), Err(ProgramError::Custom(42)));
        assert_eq!(EscrowError::try_from(6016u32), Err(ProgramError::Custom(6016)));
    }

    #[test]
    fn test_messages_are_distinct() {
        let a = EscrowError::MilestoneAlreadyApproved.message();
        let b = EscrowError::MilestoneAlreadyClaimed.message();
        assert_ne!(a, b);
    }
}
