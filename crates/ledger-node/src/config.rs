use crate::constants::{DEFAULT_LISTEN, DEFAULT_REWARD_RECEIVER};
use clap::Parser;
use ledger_core::constants::{PEER_TIMEOUT_MS, POW_TARGET_DIFFICULTY};
use ledger_core::{MiningReward, NodeConfig, ProofOfWork};
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "ledger-node")]
#[command(about = "Proof-of-work ledger node")]
pub struct Args {
    /// Address to listen on, e.g. 127.0.0.1:5001
    #[arg(long, default_value = DEFAULT_LISTEN)]
    pub listen: String,

    /// Leading hex zeros required in a proof digest
    #[arg(long, default_value_t = POW_TARGET_DIFFICULTY)]
    pub difficulty: usize,

    /// Give up mining after this many proof candidates
    #[arg(long)]
    pub max_iterations: Option<u64>,

    /// Per-peer timeout while reconciling, in milliseconds
    #[arg(long, default_value_t = PEER_TIMEOUT_MS)]
    pub peer_timeout_ms: u64,

    /// Peer to register at startup (repeatable)
    #[arg(long = "peer")]
    pub peers: Vec<String>,

    /// Amount credited to `reward_receiver` in every mined block
    #[arg(long)]
    pub reward_amount: Option<u64>,

    #[arg(long, default_value = DEFAULT_REWARD_RECEIVER)]
    pub reward_receiver: String,
}

impl Args {
    pub fn peer_timeout(&self) -> Duration {
        Duration::from_millis(self.peer_timeout_ms)
    }

    /// `node_id` signs the reward transaction as its sender.
    pub fn node_config(&self, node_id: &str) -> NodeConfig {
        let mut pow = ProofOfWork::new(self.difficulty);
        if let Some(cap) = self.max_iterations {
            pow = pow.with_max_iterations(cap);
        }
        NodeConfig {
            pow,
            peer_timeout: self.peer_timeout(),
            reward: self.reward_amount.map(|amount| MiningReward {
                sender: node_id.to_string(),
                receiver: self.reward_receiver.clone(),
                amount: amount.into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_node() {
        let args = Args::parse_from(["ledger-node"]);
        assert_eq!(args.listen, DEFAULT_LISTEN);
        let config = args.node_config("abc");
        assert_eq!(config.pow, ProofOfWork::new(4));
        assert_eq!(config.peer_timeout, Duration::from_millis(PEER_TIMEOUT_MS));
        assert!(config.reward.is_none());
    }

    #[test]
    fn flags_flow_into_node_config() {
        let args = Args::parse_from([
            "ledger-node",
            "--difficulty",
            "2",
            "--max-iterations",
            "1000",
            "--peer-timeout-ms",
            "250",
            "--peer",
            "http://127.0.0.1:5001",
            "--peer",
            "127.0.0.1:5002",
            "--reward-amount",
            "10",
            "--reward-receiver",
            "User 3",
        ]);
        assert_eq!(args.peers.len(), 2);
        let config = args.node_config("f00d");
        assert_eq!(config.pow, ProofOfWork::new(2).with_max_iterations(1000));
        assert_eq!(config.peer_timeout, Duration::from_millis(250));
        let reward = config.reward.expect("reward configured");
        assert_eq!(reward.sender, "f00d");
        assert_eq!(reward.receiver, "User 3");
        assert_eq!(reward.amount.as_u64(), Some(10));
    }
}
