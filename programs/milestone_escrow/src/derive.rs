//! Escrow address derivation
//!
//! The escrow PDA is a pure function of the recruiter and the SHA256 of the
//! job ID. Hashing first keeps the seed at 32 bytes no matter how long the job
//! ID is (a single PDA seed is capped at 32 bytes).
//!
//! On-chain builds use the pinocchio PDA syscalls; host builds go through
//! `solana-pubkey` so clients derive the exact same address.

use pinocchio::{program_error::ProgramError, pubkey::Pubkey};
use solana_hash::Hash;

use crate::errors::EscrowError;

/// Seed prefix for escrow PDAs
pub const ESCROW_SEED: &[u8] = b"escrow";

/// SHA256 of the raw job ID bytes
#[inline(always)]
pub fn hash_job_id(job_id: &[u8]) -> [u8; 32] {
    let digest: Hash = solana_sha256_hasher::hash(job_id);
    digest.to_bytes()
}

/// Find the canonical escrow address and bump
pub fn find_escrow_address(
    recruiter: &Pubkey,
    job_id_hash: &[u8; 32],
    program_id: &Pubkey,
) -> (Pubkey, u8) {
    let seeds: [&[u8]; 3] = [ESCROW_SEED, recruiter, job_id_hash];
    find_program_address(&seeds, program_id)
}

/// Find the escrow address straight from a raw job ID
pub fn find_escrow_address_for_job(
    recruiter: &Pubkey,
    job_id: &[u8],
    program_id: &Pubkey,
) -> (Pubkey, u8) {
    find_escrow_address(recruiter, &hash_job_id(job_id), program_id)
}

/// Re-derive the escrow address from stored seeds and bump and compare
pub fn verify_escrow_address(
    escrow_key: &Pubkey,
    recruiter: &Pubkey,
    job_id_hash: &[u8; 32],
    bump: u8,
    program_id: &Pubkey,
) -> Result<(), ProgramError> {
    let bump_seed = [bump];
    let seeds: [&[u8]; 4] = [ESCROW_SEED, recruiter, job_id_hash, &bump_seed];
    let expected = create_program_address(&seeds, program_id)
        .map_err(|_| ProgramError::from(EscrowError::InvalidPda))?;
    if &expected != escrow_key {
        return Err(EscrowError::InvalidPda.into());
    }
    Ok(())
}

#[cfg(target_os = "solana")]
#[inline(always)]
fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> (Pubkey, u8) {
    pinocchio::pubkey::find_program_address(seeds, program_id)
}

#[cfg(target_os = "solana")]
#[inline(always)]
fn create_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<Pubkey, ProgramError> {
    pinocchio::pubkey::create_program_address(seeds, program_id)
}

#[cfg(not(target_os = "solana"))]
fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> (Pubkey, u8) {
    let program = solana_pubkey::Pubkey::new_from_array(*program_id);
    let (address, bump) = solana_pubkey::Pubkey::find_program_address(seeds, &program);
    (address.to_bytes(), bump)
}

#[cfg(not(target_os = "solana"))]
fn create_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<Pubkey, ProgramError> {
    let program = solana_pubkey::Pubkey::new_from_array(*program_id);
    solana_pubkey::Pubkey::create_program_address(seeds, &program)
        .map(|address| address.to_bytes())
        .map_err(|_| ProgramError::InvalidSeeds)
}
