//! Proof-of-work puzzle between two consecutive block proofs.
//!
//! A proof `p` is accepted after a block with proof `q` when the SHA-256 digest of
//! the signed decimal string of `p² - q²` starts with `difficulty` hex zeros.

use crate::constants::POW_TARGET_DIFFICULTY;
use crate::error::LedgerError;
use crate::mine;
use sha2::{Digest, Sha256};
use std::sync::atomic::AtomicBool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofOfWork {
    difficulty: usize,
    max_iterations: Option<u64>,
}

impl Default for ProofOfWork {
    fn default() -> Self {
        Self::new(POW_TARGET_DIFFICULTY)
    }
}

impl ProofOfWork {
    pub fn new(difficulty: usize) -> Self {
        Self {
            difficulty,
            max_iterations: None,
        }
    }

    /// Bound the search to `cap` candidates; `solve` then fails instead of spinning.
    pub fn with_max_iterations(mut self, cap: u64) -> Self {
        self.max_iterations = Some(cap);
        self
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    pub fn max_iterations(&self) -> Option<u64> {
        self.max_iterations
    }

    /// Smallest positive proof satisfying the puzzle after `previous_proof`.
    pub fn solve(&self, previous_proof: u64) -> Result<u64, LedgerError> {
        mine::search_parallel(self, previous_proof, &AtomicBool::new(false))
    }

    /// Like `solve`, but gives up between batches once `cancel` is set.
    pub fn solve_until(&self, previous_proof: u64, cancel: &AtomicBool) -> Result<u64, LedgerError> {
        mine::search_parallel(self, previous_proof, cancel)
    }

    pub fn verify(&self, previous_proof: u64, proof: u64) -> bool {
        match challenge_digest(previous_proof, proof) {
            Some(digest) => meets_difficulty(&digest, self.difficulty),
            None => false,
        }
    }
}

/// `proof² - previous_proof²`, or `None` when the square leaves `i128`.
pub fn challenge(previous_proof: u64, proof: u64) -> Option<i128> {
    let p = i128::from(proof).checked_mul(i128::from(proof))?;
    let q = i128::from(previous_proof).checked_mul(i128::from(previous_proof))?;
    p.checked_sub(q)
}

/// Hex digest of the challenge's decimal representation, sign included.
pub fn challenge_digest(previous_proof: u64, proof: u64) -> Option<String> {
    let value = challenge(previous_proof, proof)?;
    let mut hasher = Sha256::new();
    hasher.update(value.to_string().as_bytes());
    Some(hex::encode(hasher.finalize()))
}

pub fn meets_difficulty(digest: &str, difficulty: usize) -> bool {
    digest.len() >= difficulty && digest.bytes().take(difficulty).all(|b| b == b'0')
}
