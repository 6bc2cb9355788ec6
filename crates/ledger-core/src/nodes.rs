use crate::error::LedgerError;
use std::collections::BTreeSet;
use url::Url;

/// Known peers as normalized `host:port` strings.
///
/// Sorted iteration gives reconciliation a stable, first-seen tie-break between
/// equally long candidate chains.
#[derive(Debug, Default, Clone)]
pub struct NodeRegistry {
    nodes: BTreeSet<String>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the network location of `address`. Returns whether it was new.
    pub fn register_node(&mut self, address: &str) -> Result<bool, LedgerError> {
        let netloc = normalize_address(address)?;
        Ok(self.nodes.insert(netloc))
    }

    pub fn contains(&self, netloc: &str) -> bool {
        self.nodes.contains(netloc)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.nodes.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Reduces `http://host:port/anything` or bare `host:port` to `host:port`.
///
/// Peers are always fetched over plain HTTP, so any other scheme is rejected.
pub fn normalize_address(address: &str) -> Result<String, LedgerError> {
    let trimmed = address.trim();
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    let url = Url::parse(&candidate).map_err(|_| LedgerError::InvalidAddress(address.to_string()))?;
    if url.scheme() != "http" {
        return Err(LedgerError::InvalidAddress(address.to_string()));
    }
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| LedgerError::InvalidAddress(address.to_string()))?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| LedgerError::InvalidAddress(address.to_string()))?;
    Ok(format!("{host}:{port}"))
}
