use crate::{constants::POW_SEARCH_BATCH, error::LedgerError, pow::ProofOfWork};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Searches proofs in consecutive batches, each scanned in parallel with `find_first`,
/// so the returned proof is still the smallest valid one.
/// Unbounded unless the `ProofOfWork` carries an iteration cap. `cancel` is checked
/// before every batch.
pub fn search_parallel(
    pow: &ProofOfWork,
    previous_proof: u64,
    cancel: &AtomicBool,
) -> Result<u64, LedgerError> {
    let mut start = 1u64;
    let mut scanned = 0u64;

    loop {
        if cancel.load(Ordering::Relaxed) {
            debug!(previous_proof, scanned, "proof search cancelled");
            return Err(LedgerError::SearchAborted(format!(
                "cancelled after {scanned} candidates"
            )));
        }

        let mut batch = POW_SEARCH_BATCH;
        if let Some(cap) = pow.max_iterations() {
            let remaining = cap.saturating_sub(scanned);
            if remaining == 0 {
                debug!(previous_proof, scanned, "proof search hit iteration cap");
                return Err(LedgerError::SearchExhausted { attempts: scanned });
            }
            batch = batch.min(remaining);
        }
        let end = start.saturating_add(batch);
        if end == start {
            return Err(LedgerError::SearchExhausted { attempts: scanned });
        }

        let found = (start..end)
            .into_par_iter()
            .find_first(|proof| pow.verify(previous_proof, *proof));

        if let Some(proof) = found {
            info!(
                difficulty = pow.difficulty(),
                "Found proof {} after previous proof {} ({} candidates)",
                proof,
                previous_proof,
                scanned + (proof - start) + 1
            );
            return Ok(proof);
        }

        scanned += end - start;
        start = end;
    }
}
