//! Longest-valid-chain selection across registered peers.
//!
//! Raw block count decides; cumulative work is not weighed, so a longer chain
//! mined at the same difficulty always wins over a shorter one.

use crate::chain::validate_chain;
use crate::error::PeerError;
use crate::{Block, Chain, ProofOfWork};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// A peer's answer to `get_chain`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeerChain {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Transport used to pull a peer's full chain.
pub trait PeerClient: Send + Sync + 'static {
    fn fetch_chain(&self, peer: &str) -> impl Future<Output = Result<PeerChain, PeerError>> + Send;
}

pub struct ConsensusEngine<C: PeerClient> {
    client: Arc<C>,
    pow: ProofOfWork,
    timeout: Duration,
}

impl<C: PeerClient> ConsensusEngine<C> {
    pub fn new(client: C, pow: ProofOfWork, timeout: Duration) -> Self {
        Self {
            client: Arc::new(client),
            pow,
            timeout,
        }
    }

    /// Queries every peer concurrently and returns the longest valid chain that is
    /// strictly longer than `local_length`. Equal-length candidates keep the one from
    /// the peer listed first.
    pub async fn best_chain(&self, peers: Vec<String>, local_length: usize) -> Option<Chain> {
        let responses = self.fetch_all(peers).await;

        let mut best: Option<Vec<Block>> = None;
        let mut best_length = local_length;

        for (peer, response) in responses {
            let PeerChain { chain, length } = match response {
                Ok(answer) => answer,
                Err(err) => {
                    warn!(%peer, "skipping peer: {err}");
                    continue;
                }
            };
            if length != chain.len() {
                warn!(
                    %peer,
                    "skipping peer: reported length {} but sent {} blocks",
                    length,
                    chain.len()
                );
                continue;
            }
            if length <= best_length {
                debug!(%peer, length, best_length, "peer chain not longer");
                continue;
            }
            if !validate_chain(&chain, &self.pow) {
                info!(%peer, length, "discarding invalid peer chain");
                continue;
            }
            best_length = length;
            best = Some(chain);
        }

        best.and_then(Chain::from_blocks)
    }

    /// Responses in the same order as `peers`.
    async fn fetch_all(&self, peers: Vec<String>) -> Vec<(String, Result<PeerChain, PeerError>)> {
        let timeout_ms = self.timeout.as_millis() as u64;
        let mut tasks = JoinSet::new();
        for (position, peer) in peers.iter().cloned().enumerate() {
            let client = Arc::clone(&self.client);
            let timeout = self.timeout;
            tasks.spawn(async move {
                let response = match tokio::time::timeout(timeout, client.fetch_chain(&peer)).await {
                    Ok(response) => response,
                    Err(_) => Err(PeerError::Timeout(timeout_ms)),
                };
                (position, response)
            });
        }

        let mut slots: Vec<Option<Result<PeerChain, PeerError>>> =
            peers.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((position, response)) => slots[position] = Some(response),
                Err(err) => warn!("peer fetch task failed: {err}"),
            }
        }

        peers
            .into_iter()
            .zip(slots)
            .filter_map(|(peer, slot)| slot.map(|response| (peer, response)))
            .collect()
    }
}
