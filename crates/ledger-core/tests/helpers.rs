#![allow(dead_code)]

use ledger_core::{
    Chain, NodeConfig, NodeState, PeerChain, PeerClient, PeerError, ProofOfWork, Transaction,
};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

pub const TEST_DIFFICULTY: usize = 2;

pub fn test_pow() -> ProofOfWork {
    ProofOfWork::new(TEST_DIFFICULTY)
}

pub fn test_config() -> NodeConfig {
    NodeConfig {
        pow: test_pow(),
        peer_timeout: Duration::from_millis(200),
        reward: None,
    }
}

/// Mines `extra` blocks on top of a fresh genesis, one tagged transaction per block.
pub fn mined_chain(extra: usize, tag: &str) -> Chain {
    let pow = test_pow();
    let mut chain = Chain::new();
    for i in 0..extra {
        let previous = chain.previous_block();
        let proof = pow.solve(previous.proof).expect("uncapped search");
        let previous_hash = previous.hash();
        chain.create_block(proof, previous_hash, vec![Transaction::new(tag, "bob", i as u64)]);
    }
    chain
}

pub fn answer(chain: &Chain) -> PeerChain {
    PeerChain {
        chain: chain.blocks().to_vec(),
        length: chain.len(),
    }
}

#[derive(Clone)]
pub enum Peer {
    Serve(PeerChain),
    Fail,
    Hang,
}

/// In-memory peers keyed by `host:port`.
#[derive(Clone, Default)]
pub struct MockPeers {
    peers: HashMap<String, Peer>,
}

impl MockPeers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, netloc: &str, peer: Peer) -> Self {
        self.peers.insert(netloc.to_string(), peer);
        self
    }
}

impl PeerClient for MockPeers {
    fn fetch_chain(&self, peer: &str) -> impl Future<Output = Result<PeerChain, PeerError>> + Send {
        let behaviour = self.peers.get(peer).cloned();
        let peer = peer.to_string();
        async move {
            match behaviour {
                Some(Peer::Serve(answer)) => Ok(answer),
                Some(Peer::Hang) => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(PeerError::Unreachable(peer))
                }
                Some(Peer::Fail) | None => Err(PeerError::Unreachable(peer)),
            }
        }
    }
}

pub fn node_with(peers: MockPeers) -> NodeState<MockPeers> {
    NodeState::new(test_config(), peers)
}
