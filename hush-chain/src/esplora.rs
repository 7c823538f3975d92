//! Esplora-style address index client.
//!
//! Only the one endpoint the wallet needs: unspent outputs by address.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use bitcoin::{Amount, Txid};

use hush_core::error::{HushError, Result};
use hush_core::traits::AddressIndex;
use hush_core::types::Utxo;

/// Connection parameters for an Esplora instance.
#[derive(Clone, Debug)]
pub struct EsploraConfig {
    /// API base URL, e.g. `https://blockstream.info/testnet/api`.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl EsploraConfig {
    /// Creates a config for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds: 30,
        }
    }
}

/// HTTP client for an Esplora address index.
pub struct EsploraClient {
    config: EsploraConfig,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct EsploraUtxo {
    txid: Txid,
    vout: u32,
    value: u64,
}

impl EsploraClient {
    /// Creates a client with the given config.
    pub fn new(config: EsploraConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("failed to build HTTP client");
        Self { config, http }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl AddressIndex for EsploraClient {
    #[instrument(skip(self))]
    async fn utxos(&self, address: &str) -> Result<Vec<Utxo>> {
        let url = self.url(&format!("address/{address}/utxo"));

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| HushError::Transport(format!("address index: {e}")))?;

        if !response.status().is_success() {
            return Err(HushError::Transport(format!(
                "address index: HTTP {} for {url}",
                response.status()
            )));
        }

        let raw: Vec<EsploraUtxo> = response
            .json()
            .await
            .map_err(|e| HushError::Transport(format!("address index: malformed response ({e})")))?;

        debug!(count = raw.len(), "fetched address utxos");

        Ok(raw
            .into_iter()
            .map(|u| Utxo::new(u.txid, u.vout, Amount::from_sat(u.value)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn parses_utxo_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/address/tb1pexample/utxo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "txid": "2bcd9a2468cb4f095b407db0101e554bcf9624e8866a1f1d2e2bcc8aa2d21d07",
                    "vout": 1,
                    "value": 42_000,
                    "status": {"confirmed": true}
                }
            ])))
            .mount(&server)
            .await;

        let client = EsploraClient::new(EsploraConfig::new(server.uri()));
        let utxos = client.utxos("tb1pexample").await.unwrap();
        assert_eq!(utxos.len(), 1);
        assert_eq!(utxos[0].vout, 1);
        assert_eq!(utxos[0].value, Amount::from_sat(42_000));
    }

    #[tokio::test]
    async fn http_error_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client = EsploraClient::new(EsploraConfig::new(server.uri()));
        let err = client.utxos("tb1pexample").await.unwrap_err();
        assert!(err.is_transport());
    }
}
