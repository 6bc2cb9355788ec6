pub mod api;
pub mod config;
pub mod constants;
pub mod peer;

use anyhow::Result;
use ledger_core::NodeState;
use std::sync::Arc;

pub use api::{router, AppState};
pub use config::Args;
pub use peer::HttpPeerClient;

/// Builds the shared node state and registers any peers given on the command line.
pub fn build_state(args: &Args, node_id: &str) -> Result<AppState> {
    let client = HttpPeerClient::new(args.peer_timeout())?;
    let state = Arc::new(NodeState::new(args.node_config(node_id), client));
    if !args.peers.is_empty() {
        state.connect_nodes(Some(args.peers.clone()))?;
    }
    Ok(state)
}
