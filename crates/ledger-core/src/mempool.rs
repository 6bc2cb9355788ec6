use crate::Transaction;
use serde::Serialize;

/// FIFO buffer of transactions waiting for the next mined block.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Mempool {
    pending: Vec<Transaction>,
}

impl Mempool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits the transaction unconditionally; no balance or signature checks.
    pub fn push(&mut self, tx: Transaction) {
        self.pending.push(tx);
    }

    /// Moves every pending transaction out, in admission order, leaving the pool empty.
    pub fn drain(&mut self) -> Vec<Transaction> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_order_and_empties() {
        let mut pool = Mempool::new();
        pool.push(Transaction::new("alice", "bob", 10));
        pool.push(Transaction::new("bob", "carol", 5));
        pool.push(Transaction::new("alice", "bob", 10));
        assert_eq!(pool.pending_count(), 3);

        let drained = pool.drain();
        assert_eq!(
            drained,
            vec![
                Transaction::new("alice", "bob", 10),
                Transaction::new("bob", "carol", 5),
                Transaction::new("alice", "bob", 10),
            ]
        );
        assert!(pool.is_empty());
        assert!(pool.drain().is_empty());
    }
}
