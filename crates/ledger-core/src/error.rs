use thiserror::Error;

/// Errors surfaced by the ledger core to its callers.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A required request field was absent; nothing was mutated.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A peer address could not be reduced to a `host:port` network location.
    #[error("invalid node address `{0}`")]
    InvalidAddress(String),

    /// The configured iteration cap was reached before a proof was found.
    #[error("proof search exhausted after {attempts} candidates")]
    SearchExhausted { attempts: u64 },

    /// The blocking proof-search task panicked or was cancelled.
    #[error("proof search task failed: {0}")]
    SearchAborted(String),
}

/// Why a single peer was skipped during reconciliation. Never fatal.
#[derive(Debug, Error)]
pub enum PeerError {
    #[error("peer unreachable: {0}")]
    Unreachable(String),

    #[error("peer responded with status {0}")]
    Status(u16),

    #[error("malformed chain response: {0}")]
    Malformed(String),

    #[error("peer timed out after {0} ms")]
    Timeout(u64),
}
