//! Bitcoin Core JSON-RPC client.
//!
//! Speaks JSON-RPC 1.0 with basic auth, the way `bitcoind` expects. Verbose
//! transaction decoding happens here: the raw DTOs below convert into
//! `hush-core` chain types at this boundary so the scanner never sees
//! node-specific JSON.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use bitcoin::{Amount, BlockHash, ScriptBuf, Txid};

use hush_core::error::{HushError, Result};
use hush_core::traits::ChainSource;
use hush_core::types::{BlockSummary, TxInfo, TxInput, TxOutput};

/// Connection parameters for a Bitcoin Core node.
#[derive(Clone, Debug)]
pub struct RpcConfig {
    /// Endpoint URL, e.g. `http://127.0.0.1:8332/`.
    pub url: String,
    /// Basic-auth username.
    pub username: String,
    /// Basic-auth password.
    pub password: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl RpcConfig {
    /// Creates a config for the given endpoint and credentials.
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
            timeout_seconds: 30,
        }
    }

    /// Overrides the request timeout.
    pub fn timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

/// JSON-RPC client for a Bitcoin Core node.
pub struct CoreRpcClient {
    config: RpcConfig,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct RawBlock {
    hash: BlockHash,
    height: u64,
    tx: Vec<Txid>,
}

#[derive(Deserialize)]
struct RawTransaction {
    txid: Txid,
    vin: Vec<RawVin>,
    vout: Vec<RawVout>,
}

#[derive(Deserialize)]
struct RawVin {
    txid: Option<Txid>,
    vout: Option<u32>,
}

#[derive(Deserialize)]
struct RawVout {
    // Core reports values in BTC.
    value: f64,
    n: u32,
    #[serde(rename = "scriptPubKey")]
    script_pub_key: RawScriptPubKey,
}

#[derive(Deserialize)]
struct RawScriptPubKey {
    hex: String,
}

impl CoreRpcClient {
    /// Creates a client with the given config.
    pub fn new(config: RpcConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("failed to build HTTP client");
        Self { config, http }
    }

    /// Issues one JSON-RPC call, returning the raw `result` field.
    ///
    /// `Ok(None)` means the node answered with `result: null` (e.g.
    /// `gettxout` on a spent output); every other shortfall is an error.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<Option<T>> {
        let body = json!({
            "jsonrpc": "1.0",
            "id": "hush",
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.config.url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .json(&body)
            .send()
            .await
            .map_err(|e| HushError::Transport(format!("{method}: {e}")))?;

        let status = response.status();
        let envelope: RpcEnvelope<T> = response
            .json()
            .await
            .map_err(|e| HushError::Transport(format!("{method}: malformed response ({e})")))?;

        if let Some(err) = envelope.error {
            return Err(HushError::Rpc {
                method: method.to_string(),
                detail: format!("{} (code {})", err.message, err.code),
            });
        }
        if !status.is_success() {
            return Err(HushError::Transport(format!("{method}: HTTP {status}")));
        }

        Ok(envelope.result)
    }

    /// Like [`Self::call`] but treats a null result as transport failure.
    async fn call_required<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T> {
        self.call(method, params)
            .await?
            .ok_or_else(|| HushError::Transport(format!("{method}: missing result")))
    }
}

fn convert_transaction(raw: RawTransaction) -> Result<TxInfo> {
    let inputs = raw
        .vin
        .into_iter()
        .map(|vin| TxInput {
            prev_txid: vin.txid,
            prev_vout: vin.vout,
        })
        .collect();

    let outputs = raw
        .vout
        .into_iter()
        .map(|vout| {
            let value = Amount::from_btc(vout.value).map_err(|e| {
                HushError::Transport(format!("bad output value {}: {e}", vout.value))
            })?;
            let script = ScriptBuf::from_hex(&vout.script_pub_key.hex)
                .map_err(|e| HushError::Transport(format!("bad output script: {e}")))?;
            Ok(TxOutput {
                index: vout.n,
                value,
                script,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TxInfo {
        txid: raw.txid,
        inputs,
        outputs,
    })
}

#[async_trait]
impl ChainSource for CoreRpcClient {
    #[instrument(skip(self))]
    async fn tip_height(&self) -> Result<u64> {
        self.call_required("getblockcount", json!([])).await
    }

    #[instrument(skip(self))]
    async fn block_hash(&self, height: u64) -> Result<BlockHash> {
        self.call_required("getblockhash", json!([height])).await
    }

    #[instrument(skip(self, hash))]
    async fn block(&self, hash: &BlockHash) -> Result<BlockSummary> {
        let raw: RawBlock = self.call_required("getblock", json!([hash])).await?;
        debug!(height = raw.height, txs = raw.tx.len(), "fetched block");
        Ok(BlockSummary {
            hash: raw.hash,
            height: raw.height,
            txids: raw.tx,
        })
    }

    #[instrument(skip(self, txid, block))]
    async fn transaction(&self, txid: &Txid, block: Option<&BlockHash>) -> Result<TxInfo> {
        let params = match block {
            Some(hash) => json!([txid, true, hash]),
            None => json!([txid, true]),
        };
        let raw: RawTransaction = self.call_required("getrawtransaction", params).await?;
        convert_transaction(raw)
    }

    #[instrument(skip(self, txid))]
    async fn is_unspent(&self, txid: &Txid, vout: u32) -> Result<bool> {
        // gettxout answers null for spent or unknown outputs.
        let result: Option<serde_json::Value> =
            self.call("gettxout", json!([txid, vout, false])).await?;
        Ok(result.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> CoreRpcClient {
        CoreRpcClient::new(RpcConfig::new(server.uri(), "user", "password"))
    }

    async fn mount(server: &MockServer, rpc_method: &str, result: serde_json::Value) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": rpc_method})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": result,
                "error": null,
                "id": "hush",
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn tip_height_parses_result() {
        let server = MockServer::start().await;
        mount(&server, "getblockcount", json!(823_456)).await;
        assert_eq!(client_for(&server).tip_height().await.unwrap(), 823_456);
    }

    #[tokio::test]
    async fn rpc_error_surfaces_method_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "result": null,
                "error": {"code": -8, "message": "Block height out of range"},
                "id": "hush",
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).block_hash(u64::MAX).await.unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("getblockhash"));
        assert!(err.to_string().contains("out of range"));
    }

    #[tokio::test]
    async fn unreachable_node_is_transport_failure() {
        // Nothing listens on this port.
        let client = CoreRpcClient::new(
            RpcConfig::new("http://127.0.0.1:1/", "user", "password").timeout_seconds(1),
        );
        let err = client.tip_height().await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn transaction_converts_values_and_scripts() {
        let server = MockServer::start().await;
        let txid = "2bcd9a2468cb4f095b407db0101e554bcf9624e8866a1f1d2e2bcc8aa2d21d07";
        mount(
            &server,
            "getrawtransaction",
            json!({
                "txid": txid,
                "vin": [{"txid": txid, "vout": 0}],
                "vout": [{
                    "value": 0.00012345,
                    "n": 0,
                    "scriptPubKey": {
                        "hex": "51201234567890123456789012345678901234567890123456789012345678901234"
                    }
                }],
            }),
        )
        .await;

        let tx = client_for(&server)
            .transaction(&Txid::from_str(txid).unwrap(), None)
            .await
            .unwrap();
        assert_eq!(tx.outputs.len(), 1);
        assert_eq!(tx.outputs[0].value, Amount::from_sat(12_345));
        assert!(tx.outputs[0].script.is_p2tr());
        assert_eq!(tx.first_input_outpoint().unwrap().1, 0);
    }

    #[tokio::test]
    async fn spent_output_reports_not_unspent() {
        let server = MockServer::start().await;
        mount(&server, "gettxout", serde_json::Value::Null).await;

        let txid =
            Txid::from_str("2bcd9a2468cb4f095b407db0101e554bcf9624e8866a1f1d2e2bcc8aa2d21d07")
                .unwrap();
        assert!(!client_for(&server).is_unspent(&txid, 0).await.unwrap());
    }
}
