//! JSON-RPC Provider
//!
//! HTTP client for an Ethereum-style JSON-RPC node (Ganache, Anvil, a wallet
//! bridge). Signing is delegated to the node via `eth_sendTransaction`.

use super::*;
use crate::abi::{decode, from_hex, to_hex, word_from_hex, AbiValue, ParamType};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// JSON-RPC provider over HTTP
pub struct JsonRpcProvider {
    client: Client,
    config: RpcConfig,
    next_id: AtomicU64,
}

/// Configuration for the JSON-RPC provider
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// Node URL (e.g., "http://127.0.0.1:7545")
    pub url: String,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Delay between receipt polls in milliseconds
    pub receipt_poll_interval_ms: u64,
    /// Give up waiting for a receipt after this many milliseconds
    pub receipt_timeout_ms: u64,
    /// Gas limit attached to transactions; `None` lets the node estimate
    pub gas_limit: Option<u64>,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:7545".to_string(),
            request_timeout_ms: 10_000,
            receipt_poll_interval_ms: 500,
            receipt_timeout_ms: 60_000,
            gas_limit: None,
        }
    }
}

impl JsonRpcProvider {
    /// Create a new provider with the given configuration
    pub fn new(config: RpcConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            config,
            next_id: AtomicU64::new(1),
        })
    }

    /// Issue one JSON-RPC request and decode its `result`
    async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> ProviderResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = build_request(id, method, params);

        tracing::debug!(method, id, "JSON-RPC request");

        let response = self
            .client
            .post(&self.config.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else if e.is_connect() {
                    ProviderError::Unavailable(self.config.url.clone())
                } else {
                    ProviderError::Request(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message: text,
            });
        }

        let envelope: RpcResponse = response.json().await?;
        parse_response(envelope)
    }

    /// Replay a reverted transaction as a call at its block to recover the reason
    async fn revert_error(&self, request: &CallRequest, receipt: &TransactionReceipt) -> ProviderError {
        let transaction_hash = receipt.transaction_hash.clone();
        let block = receipt
            .block_number
            .map(|n| format!("0x{:x}", n))
            .unwrap_or_else(|| "latest".to_string());
        let params = json!([transaction_object(request, None), block]);

        let reason = match self.request::<String>("eth_call", params).await {
            Err(ProviderError::Rpc { message, .. }) => Some(message),
            Ok(data) => from_hex(&data).ok().and_then(|bytes| decode_error_string(&bytes)),
            Err(e) => {
                tracing::debug!(tx = %transaction_hash, error = %e, "Revert replay failed");
                None
            }
        };

        tracing::warn!(tx = %transaction_hash, reason = ?reason, "Transaction reverted");
        match reason {
            Some(reason) => ProviderError::RevertedWithReason {
                transaction_hash,
                reason,
            },
            None => ProviderError::Reverted(transaction_hash),
        }
    }

    async fn receipt(&self, tx_hash: &str) -> ProviderResult<Option<TransactionReceipt>> {
        let raw: Option<RawReceipt> = self
            .request("eth_getTransactionReceipt", json!([tx_hash]))
            .await?;
        raw.map(RawReceipt::into_receipt).transpose()
    }
}

#[async_trait]
impl Provider for JsonRpcProvider {
    async fn accounts(&self) -> ProviderResult<Vec<Address>> {
        self.request("eth_accounts", json!([])).await
    }

    async fn network_id(&self) -> ProviderResult<String> {
        self.request("net_version", json!([])).await
    }

    async fn call(&self, request: &CallRequest) -> ProviderResult<Vec<u8>> {
        let params = json!([transaction_object(request, None), "latest"]);
        let data: String = self.request("eth_call", params).await?;
        Ok(from_hex(&data)?)
    }

    async fn send_transaction(&self, request: &CallRequest) -> ProviderResult<TransactionReceipt> {
        let params = json!([transaction_object(request, self.config.gas_limit)]);
        let tx_hash: String = self.request("eth_sendTransaction", params).await?;

        tracing::info!(tx = %tx_hash, "Transaction submitted");

        let started = Instant::now();
        let timeout = Duration::from_millis(self.config.receipt_timeout_ms);
        let poll = Duration::from_millis(self.config.receipt_poll_interval_ms);

        loop {
            if let Some(receipt) = self.receipt(&tx_hash).await? {
                if !receipt.success {
                    return Err(self.revert_error(request, &receipt).await);
                }
                tracing::info!(
                    tx = %tx_hash,
                    block = ?receipt.block_number,
                    logs = receipt.logs.len(),
                    "Transaction mined"
                );
                return Ok(receipt);
            }

            if started.elapsed() >= timeout {
                return Err(ProviderError::ReceiptTimeout(tx_hash));
            }
            tokio::time::sleep(poll).await;
        }
    }
}

// ============================================
// Wire format
// ============================================

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

fn build_request(id: u64, method: &str, params: Value) -> RpcRequest<'_> {
    RpcRequest {
        jsonrpc: "2.0",
        id,
        method,
        params,
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Selector of Solidity's `Error(string)` revert payload
const ERROR_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// Reason string of an `Error(string)` revert payload
fn decode_error_string(data: &[u8]) -> Option<String> {
    if data.len() < 4 || data[..4] != ERROR_SELECTOR {
        return None;
    }
    let values = decode(&[ParamType::String], &data[4..]).ok()?;
    match values.first()? {
        AbiValue::String(reason) => Some(reason.clone()),
        _ => None,
    }
}

/// Revert reason carried in an error's `data`: raw revert bytes, or an
/// object holding a `reason` or the bytes under `result`/`data`
fn revert_reason(data: &Value) -> Option<String> {
    match data {
        Value::String(hex) => decode_error_string(&from_hex(hex).ok()?),
        Value::Object(fields) => fields
            .get("reason")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| {
                ["result", "data"]
                    .iter()
                    .filter_map(|key| fields.get(*key))
                    .find_map(revert_reason)
            }),
        _ => None,
    }
}

fn parse_response<T: DeserializeOwned>(envelope: RpcResponse) -> ProviderResult<T> {
    if let Some(error) = envelope.error {
        // Prefer the contract's own reason over the node's wrapper text
        let message = error
            .data
            .as_ref()
            .and_then(revert_reason)
            .unwrap_or(error.message);
        return Err(ProviderError::Rpc {
            code: error.code,
            message,
        });
    }

    // A missing result is JSON null, which is valid for Option<T>
    let result = envelope.result.unwrap_or(Value::Null);
    serde_json::from_value(result).map_err(|e| ProviderError::InvalidResponse(e.to_string()))
}

fn transaction_object(request: &CallRequest, gas_limit: Option<u64>) -> Value {
    let mut tx = json!({
        "to": request.to,
        "data": to_hex(&request.data),
    });
    if let Some(from) = request.from {
        tx["from"] = json!(from);
    }
    if let Some(gas) = gas_limit {
        tx["gas"] = json!(format!("0x{:x}", gas));
    }
    tx
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    transaction_hash: String,
    #[serde(default)]
    block_number: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    logs: Vec<RawLog>,
}

#[derive(Debug, Deserialize)]
struct RawLog {
    address: Address,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    data: String,
}

impl RawReceipt {
    fn into_receipt(self) -> ProviderResult<TransactionReceipt> {
        let block_number = self.block_number.as_deref().map(parse_quantity).transpose()?;
        // Pre-Byzantium receipts have no status field; treat them as successful
        let success = match self.status.as_deref() {
            None => true,
            Some(status) => parse_quantity(status)? == 1,
        };

        let logs = self
            .logs
            .into_iter()
            .map(|log| -> ProviderResult<Log> {
                Ok(Log {
                    address: log.address,
                    topics: log
                        .topics
                        .iter()
                        .map(|t| word_from_hex(t))
                        .collect::<Result<_, _>>()?,
                    data: from_hex(&log.data)?,
                })
            })
            .collect::<ProviderResult<_>>()?;

        Ok(TransactionReceipt {
            transaction_hash: self.transaction_hash,
            block_number,
            success,
            logs,
        })
    }
}

/// Parse a hex quantity such as `0x1b4`
fn parse_quantity(s: &str) -> ProviderResult<u64> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(digits, 16)
        .map_err(|_| ProviderError::InvalidResponse(format!("invalid quantity: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_default_config() {
        let config = RpcConfig::default();
        assert_eq!(config.url, "http://127.0.0.1:7545");
        assert_eq!(config.receipt_poll_interval_ms, 500);
    }

    #[test]
    fn test_request_shape() {
        let request = build_request(7, "eth_accounts", json!([]));
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"jsonrpc": "2.0", "id": 7, "method": "eth_accounts", "params": []})
        );
    }

    #[test]
    fn test_parse_result() {
        let envelope: RpcResponse =
            serde_json::from_value(json!({"jsonrpc": "2.0", "id": 1, "result": "5777"})).unwrap();
        let network: String = parse_response(envelope).unwrap();
        assert_eq!(network, "5777");
    }

    #[test]
    fn test_parse_null_result_as_option() {
        let envelope: RpcResponse =
            serde_json::from_value(json!({"jsonrpc": "2.0", "id": 1, "result": null})).unwrap();
        let receipt: Option<RawReceipt> = parse_response(envelope).unwrap();
        assert!(receipt.is_none());
    }

    #[test]
    fn test_parse_error_keeps_message() {
        let envelope: RpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32000, "message": "revert Invalid employee address"}
        }))
        .unwrap();
        let err = parse_response::<String>(envelope).unwrap_err();
        assert!(matches!(err, ProviderError::Rpc { code: -32000, .. }));
        assert_eq!(err.to_string(), "revert Invalid employee address");
    }

    #[test]
    fn test_transaction_object() {
        let request = CallRequest {
            from: Some(Address::from_low_u64(1)),
            to: Address::from_low_u64(2),
            data: vec![0xab, 0xcd],
        };
        let tx = transaction_object(&request, Some(3_000_000));
        assert_eq!(tx["from"], "0x0000000000000000000000000000000000000001");
        assert_eq!(tx["to"], "0x0000000000000000000000000000000000000002");
        assert_eq!(tx["data"], "0xabcd");
        assert_eq!(tx["gas"], "0x2dc6c0");

        let call = transaction_object(&CallRequest { from: None, ..request }, None);
        assert!(call.get("from").is_none());
        assert!(call.get("gas").is_none());
    }

    #[test]
    fn test_receipt_conversion() {
        let raw: RawReceipt = serde_json::from_value(json!({
            "transactionHash": "0xfeed",
            "blockNumber": "0x1b",
            "status": "0x1",
            "logs": [{
                "address": "0x0000000000000000000000000000000000000002",
                "topics": [format!("0x{}", "ab".repeat(32))],
                "data": "0x0001"
            }]
        }))
        .unwrap();

        let receipt = raw.into_receipt().unwrap();
        assert_eq!(receipt.block_number, Some(27));
        assert!(receipt.success);
        assert_eq!(receipt.logs.len(), 1);
        assert_eq!(receipt.logs[0].topics[0], [0xab; 32]);
        assert_eq!(receipt.logs[0].data, vec![0x00, 0x01]);
    }

    #[test]
    fn test_reverted_receipt_status() {
        let raw: RawReceipt = serde_json::from_value(json!({
            "transactionHash": "0xfeed",
            "status": "0x0",
            "logs": []
        }))
        .unwrap();
        assert!(!raw.into_receipt().unwrap().success);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0x0").unwrap(), 0);
        assert_eq!(parse_quantity("0x1b4").unwrap(), 436);
        assert!(parse_quantity("0xzz").is_err());
    }

    fn error_string(reason: &str) -> Vec<u8> {
        let mut data = ERROR_SELECTOR.to_vec();
        data.extend(crate::abi::encode(&[ParamType::String], &[AbiValue::String(reason.to_string())]).unwrap());
        data
    }

    #[test]
    fn test_decode_error_string() {
        assert_eq!(
            decode_error_string(&error_string("Employee already exists")).as_deref(),
            Some("Employee already exists")
        );
        assert!(decode_error_string(&[0x08, 0xc3]).is_none());
        assert!(decode_error_string(&[0u8; 36]).is_none());
    }

    #[test]
    fn test_parse_error_prefers_revert_data() {
        let data = to_hex(&error_string("Invalid employee address"));
        let envelope: RpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": 3, "message": "execution reverted", "data": data}
        }))
        .unwrap();
        let err = parse_response::<String>(envelope).unwrap_err();
        assert_eq!(err.to_string(), "Invalid employee address");

        // Ganache nests the payload and a decoded reason in an object
        let envelope: RpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {
                "code": -32000,
                "message": "VM Exception while processing transaction: revert Employee does not exist",
                "data": {"reason": "Employee does not exist", "result": "0x"}
            }
        }))
        .unwrap();
        let err = parse_response::<String>(envelope).unwrap_err();
        assert_eq!(err.to_string(), "Employee does not exist");
    }

    // ============================================
    // Against a scripted node
    // ============================================

    type Calls = Arc<std::sync::Mutex<Vec<(String, Value)>>>;

    /// Serve JSON-RPC over HTTP, answering each call with `handler(method, params)`
    async fn scripted_node<F>(handler: F) -> (String, Calls)
    where
        F: Fn(&str, &Value) -> Value + Send + Sync + 'static,
    {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let calls: Calls = Arc::default();
        let handler = Arc::new(handler);

        let recorded = Arc::clone(&calls);
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let handler = Arc::clone(&handler);
                let recorded = Arc::clone(&recorded);
                tokio::spawn(async move {
                    use tokio::io::AsyncWriteExt;

                    while let Some(request) = read_http_json(&mut socket).await {
                        let method = request["method"].as_str().unwrap_or_default().to_string();
                        recorded.lock().unwrap().push((method.clone(), request["params"].clone()));

                        let mut body = handler(&method, &request["params"]);
                        body["jsonrpc"] = json!("2.0");
                        body["id"] = request["id"].clone();
                        let body = body.to_string();
                        let response = format!(
                            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        if socket.write_all(response.as_bytes()).await.is_err() {
                            break;
                        }
                    }
                });
            }
        });

        (url, calls)
    }

    async fn read_http_json(socket: &mut tokio::net::TcpStream) -> Option<Value> {
        use tokio::io::AsyncReadExt;

        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.ok()?;
            if n == 0 {
                return None;
            }
            buf.extend_from_slice(&chunk[..n]);

            let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let headers = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let length: usize = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(0);

            let start = end + 4;
            while buf.len() < start + length {
                let n = socket.read(&mut chunk).await.ok()?;
                if n == 0 {
                    return None;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            return serde_json::from_slice(&buf[start..start + length]).ok();
        }
    }

    fn fast_provider(url: String) -> JsonRpcProvider {
        JsonRpcProvider::new(RpcConfig {
            url,
            request_timeout_ms: 2_000,
            receipt_poll_interval_ms: 10,
            receipt_timeout_ms: 2_000,
            gas_limit: None,
        })
        .unwrap()
    }

    fn add_employee_request() -> CallRequest {
        CallRequest {
            from: Some(Address::from_low_u64(1)),
            to: Address::from_low_u64(0xc0),
            data: vec![0xde, 0xad, 0xbe, 0xef],
        }
    }

    #[tokio::test]
    async fn test_reverted_transaction_reports_contract_reason() {
        let (url, calls) = scripted_node(|method, _params| match method {
            "eth_sendTransaction" => json!({"result": "0xfeed"}),
            "eth_getTransactionReceipt" => json!({"result": {
                "transactionHash": "0xfeed",
                "blockNumber": "0x5",
                "status": "0x0",
                "logs": []
            }}),
            "eth_call" => json!({"error": {
                "code": -32000,
                "message": "VM Exception while processing transaction: revert Employee already exists"
            }}),
            _ => json!({"error": {"code": -32601, "message": "method not found"}}),
        })
        .await;

        let err = fast_provider(url)
            .send_transaction(&add_employee_request())
            .await
            .unwrap_err();
        assert!(matches!(
            &err,
            ProviderError::RevertedWithReason { transaction_hash, .. } if transaction_hash == "0xfeed"
        ));
        assert!(err.to_string().contains("Employee already exists"));

        let calls = calls.lock().unwrap().clone();
        let (_, sent) = calls.iter().find(|(m, _)| m == "eth_sendTransaction").unwrap();
        assert!(sent[0].get("gas").is_none());

        let (_, replay) = calls.iter().find(|(m, _)| m == "eth_call").unwrap();
        assert_eq!(replay[0]["from"], "0x0000000000000000000000000000000000000001");
        assert_eq!(replay[0]["data"], "0xdeadbeef");
        assert_eq!(replay[1], "0x5");
    }

    #[tokio::test]
    async fn test_reverted_transaction_with_error_string_result() {
        let payload = to_hex(&error_string("Invalid employee address"));
        let (url, _calls) = scripted_node(move |method, _params| match method {
            "eth_sendTransaction" => json!({"result": "0xfeed"}),
            "eth_getTransactionReceipt" => json!({"result": {
                "transactionHash": "0xfeed",
                "blockNumber": "0x5",
                "status": "0x0",
                "logs": []
            }}),
            _ => json!({"result": payload.clone()}),
        })
        .await;

        let err = fast_provider(url)
            .send_transaction(&add_employee_request())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid employee address");
    }

    #[tokio::test]
    async fn test_reverted_transaction_without_reason() {
        let (url, _calls) = scripted_node(|method, _params| match method {
            "eth_sendTransaction" => json!({"result": "0xfeed"}),
            "eth_getTransactionReceipt" => json!({"result": {
                "transactionHash": "0xfeed",
                "status": "0x0",
                "logs": []
            }}),
            _ => json!({"result": "0x"}),
        })
        .await;

        let err = fast_provider(url)
            .send_transaction(&add_employee_request())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Reverted(hash) if hash == "0xfeed"));
    }

    #[tokio::test]
    async fn test_receipt_timeout() {
        let (url, calls) = scripted_node(|method, _params| match method {
            "eth_sendTransaction" => json!({"result": "0xfeed"}),
            _ => json!({"result": null}),
        })
        .await;

        let provider = JsonRpcProvider::new(RpcConfig {
            url,
            receipt_poll_interval_ms: 10,
            receipt_timeout_ms: 50,
            ..RpcConfig::default()
        })
        .unwrap();

        let err = provider.send_transaction(&add_employee_request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::ReceiptTimeout(hash) if hash == "0xfeed"));

        let polls = calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == "eth_getTransactionReceipt")
            .count();
        assert!(polls >= 2);
    }

    #[tokio::test]
    async fn test_mined_transaction_receipt() {
        let (url, _calls) = scripted_node(|method, _params| match method {
            "eth_sendTransaction" => json!({"result": "0xfeed"}),
            _ => json!({"result": {
                "transactionHash": "0xfeed",
                "blockNumber": "0x7",
                "status": "0x1",
                "logs": []
            }}),
        })
        .await;

        let receipt = fast_provider(url)
            .send_transaction(&add_employee_request())
            .await
            .unwrap();
        assert!(receipt.success);
        assert_eq!(receipt.block_number, Some(7));
    }

    #[tokio::test]
    async fn test_unreachable_node() {
        let provider = JsonRpcProvider::new(RpcConfig {
            url: "http://127.0.0.1:1".to_string(),
            request_timeout_ms: 500,
            ..RpcConfig::default()
        })
        .unwrap();

        let result = provider.accounts().await;
        assert!(matches!(
            result,
            Err(ProviderError::Unavailable(_)) | Err(ProviderError::Timeout) | Err(ProviderError::Request(_))
        ));
    }
}
