use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ledger-cli")]
#[command(about = "CLI client for a proof-of-work ledger node")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct Target {
    /// Node base URL (e.g. http://127.0.0.1:5001)
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    node: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mine a block from the pending transactions
    Mine(Target),
    /// Print the full chain
    Chain(Target),
    /// Check the node's chain
    Valid(Target),
    /// Submit a transaction
    Submit {
        #[command(flatten)]
        target: Target,
        /// Sender
        #[arg(long)]
        sender: String,
        /// Receiver
        #[arg(long)]
        receiver: String,
        /// Amount
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,
    },
    /// Register peers with the node
    Connect {
        #[command(flatten)]
        target: Target,
        /// Peer URL (repeatable)
        #[arg(long = "peer", required = true)]
        peers: Vec<String>,
    },
    /// Ask the node to adopt the longest valid peer chain
    Reconcile(Target),
}

#[derive(Serialize)]
struct Tx {
    sender: String,
    receiver: String,
    amount: serde_json::Number,
}

#[derive(Serialize)]
struct Connect {
    nodes: Vec<String>,
}

/// Whole amounts are sent as JSON integers so the block digest matches other clients.
fn amount_number(amount: f64) -> Result<serde_json::Number> {
    if amount.fract() == 0.0 && amount.abs() < i64::MAX as f64 {
        return Ok(serde_json::Number::from(amount as i64));
    }
    serde_json::Number::from_f64(amount).ok_or_else(|| anyhow::anyhow!("amount must be finite"))
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .pretty()
        .init();

    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let res = match cli.cmd {
        Command::Mine(Target { node }) => client.get(format!("{node}/mine_block")).send().await?,
        Command::Chain(Target { node }) => client.get(format!("{node}/get_chain")).send().await?,
        Command::Valid(Target { node }) => client.get(format!("{node}/is_valid")).send().await?,
        Command::Submit {
            target: Target { node },
            sender,
            receiver,
            amount,
        } => {
            let tx = Tx {
                sender,
                receiver,
                amount: amount_number(amount)?,
            };
            client
                .post(format!("{node}/add_transaction"))
                .json(&tx)
                .send()
                .await?
        }
        Command::Connect {
            target: Target { node },
            peers,
        } => {
            client
                .post(format!("{node}/connect_node"))
                .json(&Connect { nodes: peers })
                .send()
                .await?
        }
        Command::Reconcile(Target { node }) => {
            client.get(format!("{node}/replace_chain")).send().await?
        }
    };

    let status = res.status();
    debug!(%status, url = %res.url(), "node responded");
    let body = res.text().await?;
    println!("status: {}", status);
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{body}"),
    }
    Ok(())
}
