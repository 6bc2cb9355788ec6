pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
pub const GENESIS_PROOF: u64 = 1;
pub const GENESIS_PREVIOUS_HASH: &str = "0";
/// Required count of leading hex `'0'` characters in a proof digest.
pub const POW_TARGET_DIFFICULTY: usize = 4;
/// Candidates scanned per parallel batch during the proof search.
pub const POW_SEARCH_BATCH: u64 = 4096;
pub const PEER_TIMEOUT_MS: u64 = 5_000;
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
