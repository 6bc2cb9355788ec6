pub const DEFAULT_LISTEN: &str = "127.0.0.1:5000";
pub const DEFAULT_REWARD_RECEIVER: &str = "miner";
pub const MINED_MESSAGE: &str = "Congratulations, block mined successfully!";
pub const CONNECTED_MESSAGE: &str = "All nodes connected.";
pub const GET_CHAIN_PATH: &str = "/get_chain";
