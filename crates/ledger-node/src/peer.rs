use crate::constants::GET_CHAIN_PATH;
use ledger_core::{PeerChain, PeerClient, PeerError};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

/// Pulls peer chains over plain HTTP from `http://{host:port}/get_chain`.
#[derive(Clone, Debug)]
pub struct HttpPeerClient {
    http: Client,
}

impl HttpPeerClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

impl PeerClient for HttpPeerClient {
    fn fetch_chain(&self, peer: &str) -> impl Future<Output = Result<PeerChain, PeerError>> + Send {
        let http = self.http.clone();
        let url = format!("http://{peer}{GET_CHAIN_PATH}");
        async move {
            let response = http
                .get(&url)
                .send()
                .await
                .map_err(|err| PeerError::Unreachable(err.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(PeerError::Status(status.as_u16()));
            }
            response
                .json::<PeerChain>()
                .await
                .map_err(|err| PeerError::Malformed(err.to_string()))
        }
    }
}
