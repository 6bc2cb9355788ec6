use crate::constants::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF, TIMESTAMP_FORMAT};
use crate::{hash_block, Block, ProofOfWork, Transaction};
use serde::Serialize;

/// Append-only block sequence. Never empty: it always starts at a genesis block.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl Chain {
    pub fn new() -> Self {
        let mut chain = Self { blocks: Vec::new() };
        chain.create_block(GENESIS_PROOF, GENESIS_PREVIOUS_HASH.to_string(), Vec::new());
        chain
    }

    /// Wraps received blocks; `None` for an empty sequence.
    pub fn from_blocks(blocks: Vec<Block>) -> Option<Self> {
        if blocks.is_empty() {
            None
        } else {
            Some(Self { blocks })
        }
    }

    /// Appends a block at index `len + 1` stamped with the current local time.
    pub fn create_block(
        &mut self,
        proof: u64,
        previous_hash: String,
        transactions: Vec<Transaction>,
    ) -> &Block {
        let block = Block {
            index: self.blocks.len() as u64 + 1,
            timestamp: now_timestamp(),
            proof,
            previous_hash,
            transactions,
        };
        self.blocks.push(block);
        self.previous_block()
    }

    pub fn previous_block(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; kept for `len` symmetry.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn is_valid(&self, pow: &ProofOfWork) -> bool {
        validate_chain(&self.blocks, pow)
    }
}

pub fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Checks hash linkage and proof validity for every adjacent pair.
/// A lone block is trivially valid; an empty slice is not a chain.
pub fn validate_chain(blocks: &[Block], pow: &ProofOfWork) -> bool {
    if blocks.is_empty() {
        return false;
    }
    blocks.windows(2).all(|pair| {
        let (previous, current) = (&pair[0], &pair[1]);
        current.previous_hash == hash_block(previous) && pow.verify(previous.proof, current.proof)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mine_next(chain: &mut Chain, pow: &ProofOfWork, txs: Vec<Transaction>) {
        let previous = chain.previous_block();
        let proof = pow.solve(previous.proof).unwrap();
        let previous_hash = previous.hash();
        chain.create_block(proof, previous_hash, txs);
    }

    #[test]
    fn genesis_block_example() {
        let chain = Chain::new();
        assert_eq!(chain.len(), 1);
        let genesis = chain.previous_block();
        assert_eq!(genesis.index, 1);
        assert_eq!(genesis.proof, 1);
        assert_eq!(genesis.previous_hash, "0");
        assert!(genesis.transactions.is_empty());
        assert!(!genesis.timestamp.is_empty());
    }

    #[test]
    fn create_block_assigns_next_index() {
        let mut chain = Chain::new();
        let block = chain.create_block(7, "abc".to_string(), vec![Transaction::new("a", "b", 1)]);
        assert_eq!(block.index, 2);
        assert_eq!(block.proof, 7);
        assert_eq!(block.previous_hash, "abc");
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.previous_block().index, 2);
    }

    #[test]
    fn mined_chain_is_valid() {
        let pow = ProofOfWork::new(2);
        let mut chain = Chain::new();
        for i in 0..5 {
            mine_next(&mut chain, &pow, vec![Transaction::new("a", "b", i)]);
        }
        assert_eq!(chain.len(), 6);
        assert!(chain.is_valid(&pow));
        for (position, block) in chain.blocks().iter().enumerate() {
            assert_eq!(block.index, position as u64 + 1);
        }
    }

    #[test]
    fn single_block_is_valid_and_empty_is_not() {
        let pow = ProofOfWork::default();
        assert!(Chain::new().is_valid(&pow));
        assert!(!validate_chain(&[], &pow));
        assert!(Chain::from_blocks(Vec::new()).is_none());
    }

    #[test]
    fn broken_link_is_rejected() {
        let pow = ProofOfWork::new(2);
        let mut chain = Chain::new();
        mine_next(&mut chain, &pow, vec![]);
        let mut blocks = chain.into_blocks();
        blocks[1].previous_hash = "0".repeat(64);
        assert!(!validate_chain(&blocks, &pow));
    }

    #[test]
    fn bad_proof_is_rejected() {
        let pow = ProofOfWork::new(2);
        let mut chain = Chain::new();
        let previous_hash = chain.previous_block().hash();
        // 307 is one short of the smallest valid proof after genesis at difficulty 2.
        chain.create_block(307, previous_hash, vec![]);
        assert!(!chain.is_valid(&pow));
    }

    #[test]
    fn difficulty_is_part_of_validity() {
        let easy = ProofOfWork::new(1);
        let mut chain = Chain::new();
        mine_next(&mut chain, &easy, vec![]);
        assert!(chain.is_valid(&easy));
        let proof = chain.previous_block().proof;
        assert_eq!(chain.is_valid(&ProofOfWork::new(4)), ProofOfWork::new(4).verify(1, proof));
    }

    #[test]
    fn validation_does_not_mutate() {
        let pow = ProofOfWork::new(2);
        let mut chain = Chain::new();
        mine_next(&mut chain, &pow, vec![Transaction::new("x", "y", 3)]);
        let before = chain.clone();
        assert!(validate_chain(chain.blocks(), &pow));
        assert_eq!(chain, before);
    }

    #[test]
    fn chain_serializes_as_block_array() {
        let chain = Chain::new();
        let value = serde_json::to_value(&chain).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["previous_hash"], "0");
    }
}
