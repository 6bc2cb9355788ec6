use serde::{Deserialize, Serialize};
use serde_json::{json, Number, Value};
use sha2::{Digest, Sha256};

pub mod chain;
pub mod constants;
pub mod consensus;
pub mod error;
pub mod mempool;
pub mod mine;
pub mod node;
pub mod nodes;
pub mod pow;

pub use chain::{validate_chain, Chain};
pub use consensus::{ConsensusEngine, PeerChain, PeerClient};
pub use error::{LedgerError, PeerError};
pub use mempool::Mempool;
pub use node::{MiningReward, NodeConfig, NodeState, TransactionRequest};
pub use nodes::NodeRegistry;
pub use pow::ProofOfWork;

/// Transfer record. Amounts keep the exact JSON number they were submitted with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub receiver: String,
    pub amount: Number,
}

impl Transaction {
    pub fn new(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: impl Into<Number>,
    ) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount: amount.into(),
        }
    }

    fn canonical_value(&self) -> Value {
        json!({
            "sender": self.sender,
            "receiver": self.receiver,
            "amount": self.amount,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: String,
    pub proof: u64,
    pub previous_hash: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Field set covered by the block digest.
    pub fn canonical_value(&self) -> Value {
        json!({
            "index": self.index,
            "timestamp": self.timestamp,
            "proof": self.proof,
            "previous_hash": self.previous_hash,
            "transactions": self
                .transactions
                .iter()
                .map(Transaction::canonical_value)
                .collect::<Vec<_>>(),
        })
    }

    /// Compact JSON with object keys in byte order at every level.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = String::new();
        write_canonical(&self.canonical_value(), &mut out);
        out.into_bytes()
    }

    pub fn hash(&self) -> String {
        hash_block(self)
    }
}

/// SHA-256 of the block's canonical form, lowercase hex.
pub fn hash_block(block: &Block) -> String {
    let mut hasher = Sha256::new();
    hasher.update(block.canonical_bytes());
    hex::encode(hasher.finalize())
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // Display on a string value yields the escaped, quoted literal.
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
