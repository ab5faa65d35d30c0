//! Host-side fixtures shared by unit tests

use core::cell::Cell;

use pinocchio::ProgramResult;

use crate::{ledger::LamportBalance, state::MilestoneEscrow};

/// 8-byte aligned backing buffer, matching runtime account data alignment.
#[repr(C, align(8))]
pub struct AccountBuf(pub [u8; MilestoneEscrow::SPACE]);

impl AccountBuf {
    pub fn new() -> Self {
        Self([0u8; MilestoneEscrow::SPACE])
    }
}

/// In-memory lamport balance
pub struct Wallet(Cell<u64>);

impl Wallet {
    pub fn new(lamports: u64) -> Self {
        Self(Cell::new(lamports))
    }
}

impl LamportBalance for Wallet {
    fn lamports(&self) -> u64 {
        self.0.get()
    }

    fn set_lamports(&self, lamports: u64) -> ProgramResult {
        self.0.set(lamports);
        Ok(())
    }
}
