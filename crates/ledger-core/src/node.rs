//! Per-process node state shared by every transport handler.

use crate::consensus::{ConsensusEngine, PeerClient};
use crate::constants::PEER_TIMEOUT_MS;
use crate::error::LedgerError;
use crate::{Block, Chain, Mempool, NodeRegistry, ProofOfWork, Transaction};
use serde::Deserialize;
use serde_json::Number;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub pow: ProofOfWork,
    pub peer_timeout: Duration,
    pub reward: Option<MiningReward>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            pow: ProofOfWork::default(),
            peer_timeout: Duration::from_millis(PEER_TIMEOUT_MS),
            reward: None,
        }
    }
}

/// Transaction appended to every block this node mines, after the drained mempool.
#[derive(Debug, Clone)]
pub struct MiningReward {
    pub sender: String,
    pub receiver: String,
    pub amount: Number,
}

impl MiningReward {
    fn transaction(&self) -> Transaction {
        Transaction {
            sender: self.sender.clone(),
            receiver: self.receiver.clone(),
            amount: self.amount.clone(),
        }
    }
}

/// Raw transaction submission; every field must be present.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TransactionRequest {
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub amount: Option<Number>,
}

impl TransactionRequest {
    pub fn into_transaction(self) -> Result<Transaction, LedgerError> {
        Ok(Transaction {
            sender: self.sender.ok_or(LedgerError::MissingField("sender"))?,
            receiver: self.receiver.ok_or(LedgerError::MissingField("receiver"))?,
            amount: self.amount.ok_or(LedgerError::MissingField("amount"))?,
        })
    }
}

/// Lock order is mempool before chain. Mining and reconciliation additionally
/// serialize on `write_gate`, which is never taken while a std lock is held.
pub struct NodeState<C: PeerClient> {
    config: NodeConfig,
    chain: RwLock<Chain>,
    mempool: Mutex<Mempool>,
    nodes: RwLock<NodeRegistry>,
    write_gate: tokio::sync::Mutex<()>,
    consensus: ConsensusEngine<C>,
}

impl<C: PeerClient> NodeState<C> {
    pub fn new(config: NodeConfig, client: C) -> Self {
        let consensus = ConsensusEngine::new(client, config.pow, config.peer_timeout);
        Self {
            config,
            chain: RwLock::new(Chain::new()),
            mempool: Mutex::new(Mempool::new()),
            nodes: RwLock::new(NodeRegistry::new()),
            write_gate: tokio::sync::Mutex::new(()),
            consensus,
        }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Solves the next proof off the async runtime, then drains the mempool into a
    /// new block. Submissions stay open during the search and land in this block.
    /// Dropping the returned future stops the search at its next batch.
    pub async fn mine_block(&self) -> Result<Block, LedgerError> {
        let _gate = self.write_gate.lock().await;

        let (previous_proof, previous_hash) = {
            let chain = read(&self.chain);
            let tip = chain.previous_block();
            (tip.proof, tip.hash())
        };

        let pow = self.config.pow;
        let cancel = CancelOnDrop::default();
        let flag = Arc::clone(&cancel.0);
        let proof = tokio::task::spawn_blocking(move || pow.solve_until(previous_proof, &flag))
            .await
            .map_err(|err| LedgerError::SearchAborted(err.to_string()))??;

        let mut mempool = lock(&self.mempool);
        let mut transactions = mempool.drain();
        if let Some(reward) = &self.config.reward {
            transactions.push(reward.transaction());
        }
        let mut chain = write(&self.chain);
        let block = chain.create_block(proof, previous_hash, transactions).clone();
        drop(chain);
        drop(mempool);

        info!(
            "Mined block {} with proof {} ({} transactions)",
            block.index,
            block.proof,
            block.transactions.len()
        );
        Ok(block)
    }

    /// Queues a transaction and returns the index of the block expected to carry it.
    pub fn submit_transaction(&self, request: TransactionRequest) -> Result<u64, LedgerError> {
        let tx = request.into_transaction()?;
        let mut mempool = lock(&self.mempool);
        let next_index = read(&self.chain).previous_block().index + 1;
        mempool.push(tx);
        Ok(next_index)
    }

    /// Registers every address or none of them. `None` means the list was absent.
    pub fn connect_nodes(&self, addresses: Option<Vec<String>>) -> Result<Vec<String>, LedgerError> {
        let addresses = addresses.ok_or(LedgerError::MissingField("nodes"))?;
        let normalized = addresses
            .iter()
            .map(|address| crate::nodes::normalize_address(address))
            .collect::<Result<Vec<_>, _>>()?;

        let mut nodes = write(&self.nodes);
        for netloc in normalized {
            nodes.register_node(&netloc)?;
        }
        Ok(nodes.to_vec())
    }

    /// Adopts the longest valid peer chain if it is strictly longer than ours.
    /// Returns whether the chain was replaced, plus the chain now held.
    pub async fn reconcile(&self) -> (bool, Chain) {
        let _gate = self.write_gate.lock().await;

        let peers = read(&self.nodes).to_vec();
        let local_length = read(&self.chain).len();
        let candidate = self.consensus.best_chain(peers, local_length).await;

        let mut chain = write(&self.chain);
        let replaced = match candidate {
            Some(candidate) if candidate.len() > chain.len() => {
                info!(
                    "Chain replaced: length {} -> {}",
                    chain.len(),
                    candidate.len()
                );
                *chain = candidate;
                true
            }
            _ => false,
        };
        (replaced, chain.clone())
    }

    pub fn chain(&self) -> Chain {
        read(&self.chain).clone()
    }

    pub fn chain_len(&self) -> usize {
        read(&self.chain).len()
    }

    pub fn is_valid(&self) -> bool {
        read(&self.chain).is_valid(&self.config.pow)
    }

    pub fn pending_transactions(&self) -> Vec<Transaction> {
        lock(&self.mempool).pending().to_vec()
    }

    pub fn nodes(&self) -> Vec<String> {
        read(&self.nodes).to_vec()
    }
}

/// Raises the proof-search cancel flag when the mining future goes away.
#[derive(Default)]
struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
