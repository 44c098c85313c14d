//! QUIK Socket Protocol Integration Tests
//!
//! Drives `QuikBrokerAdapter` against an in-process fake of the Lua connector
//! listening on two local TCP ports.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use limit_trader::application::ports::{TradeClientError, TradeClientPort};
use limit_trader::domain::shared::Ticker;
use limit_trader::domain::trading::Limit;
use limit_trader::infrastructure::broker::{QuikBrokerAdapter, QuikConfig};

// =============================================================================
// Fake connector
// =============================================================================

/// Builds the response line for a request, or `None` to hang up.
type Responder = Box<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

struct FakeQuik {
    cmd_port: u16,
    callback_port: u16,
    /// Raw request lines including the terminator.
    lines: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl FakeQuik {
    async fn start(respond: Responder) -> Self {
        let cmd = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let callback = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let cmd_port = cmd.local_addr().unwrap().port();
        let callback_port = callback.local_addr().unwrap().port();
        let lines = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&lines);

        let handle = tokio::spawn(async move {
            let (stream, _) = cmd.accept().await.unwrap();
            let (_callback_stream, _) = callback.accept().await.unwrap();
            let (read_half, mut write_half) = stream.into_split();
            let mut reader = BufReader::new(read_half);

            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                    break;
                }
                recorded.lock().unwrap().push(line.clone());

                let request: Value = serde_json::from_str(line.trim_end()).unwrap();
                let Some(response) = respond(&request) else {
                    break;
                };
                let mut out = serde_json::to_vec(&response).unwrap();
                out.push(b'\n');
                write_half.write_all(&out).await.unwrap();
            }
        });

        Self {
            cmd_port,
            callback_port,
            lines,
            handle,
        }
    }

    fn config(&self) -> QuikConfig {
        QuikConfig::new("L01-00000F00", "127.0.0.1", self.cmd_port, self.callback_port)
            .with_transaction_delay(Duration::from_millis(1))
            .with_read_timeout(Duration::from_secs(2))
    }

    fn requests(&self) -> Vec<Value> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .map(|line| serde_json::from_str(line.trim_end()).unwrap())
            .collect()
    }

    fn count(&self, cmd: &str) -> usize {
        self.requests().iter().filter(|r| r["cmd"] == cmd).count()
    }
}

fn securities() -> Value {
    json!({
        "AAPL": {"code": "AAPL", "currency": "USD"},
        "MSFT": {"code": "MSFT", "currency": "USD"},
        "SBER": {"code": "SBER-RM", "currency": "RUB"}
    })
}

/// Well-behaved connector.
fn happy(request: &Value) -> Option<Value> {
    let cmd = request["cmd"].as_str().unwrap().to_string();
    let data = match cmd.as_str() {
        "getClassSecurityInfo" => securities(),
        "sendTransaction" => json!(true),
        "cancelAllOrders" => json!("7"),
        _ => Value::Null,
    };
    Some(json!({"cmd": cmd, "data": data, "t": "12:00:00", "lua_error": ""}))
}

fn limit(ticker: &str) -> Limit {
    Limit::new(Ticker::new(ticker), dec!(12.5), 3).unwrap()
}

// =============================================================================
// Order placement
// =============================================================================

#[tokio::test]
async fn add_limit_sends_exactly_one_transaction() {
    let fake = FakeQuik::start(Box::new(happy)).await;
    let mut client = QuikBrokerAdapter::new(fake.config()).unwrap();

    client.add_limit(&limit("AAPL")).await.unwrap();

    let transactions: Vec<Value> = fake
        .requests()
        .into_iter()
        .filter(|r| r["cmd"] == "sendTransaction")
        .collect();
    assert_eq!(transactions.len(), 1);

    let data = &transactions[0]["data"];
    assert_eq!(data["PRICE"], "12.50");
    assert_eq!(data["QUANTITY"], "3");
    assert_eq!(data["TRANS_ID"], "2");
    assert_eq!(data["ACCOUNT"], "L01-00000F00");
    assert_eq!(data["CLASSCODE"], "SPBXM");
    assert_eq!(data["SECCODE"], "AAPL");
    assert_eq!(data["TYPE"], "L");
    assert_eq!(data["ACTION"], "NEW_ORDER");
    assert_eq!(data["OPERATION"], "B");
}

#[tokio::test]
async fn frames_end_with_crlf() {
    let fake = FakeQuik::start(Box::new(happy)).await;
    let mut client = QuikBrokerAdapter::new(fake.config()).unwrap();

    client.clear_limits().await.unwrap();

    let lines = fake.lines.lock().unwrap().clone();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("}\r\n"), "line was {:?}", lines[0]);
}

#[tokio::test]
async fn transaction_ids_increase_per_order() {
    let fake = FakeQuik::start(Box::new(happy)).await;
    let mut client = QuikBrokerAdapter::new(fake.config()).unwrap();

    client.add_limit(&limit("AAPL")).await.unwrap();
    client.add_limit(&limit("MSFT")).await.unwrap();

    let ids: Vec<String> = fake
        .requests()
        .iter()
        .filter(|r| r["cmd"] == "sendTransaction")
        .map(|r| r["data"]["TRANS_ID"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["2", "3"]);
    assert_eq!(client.transaction_id(), 3);
}

#[tokio::test]
async fn unknown_ticker_sends_no_transaction() {
    let fake = FakeQuik::start(Box::new(happy)).await;
    let mut client = QuikBrokerAdapter::new(fake.config()).unwrap();

    let err = client.add_limit(&limit("ZZZZ")).await.unwrap_err();

    assert_eq!(
        err,
        TradeClientError::UnknownTicker {
            ticker: "ZZZZ".to_string()
        }
    );
    assert_eq!(fake.count("sendTransaction"), 0);
    assert_eq!(client.transaction_id(), 1);
}

#[tokio::test]
async fn transaction_waits_for_throttle() {
    let fake = FakeQuik::start(Box::new(happy)).await;
    let config = fake
        .config()
        .with_transaction_delay(Duration::from_millis(150));
    let mut client = QuikBrokerAdapter::new(config).unwrap();
    client.get_stocks().await.unwrap();

    let started = std::time::Instant::now();
    client.add_limit(&limit("AAPL")).await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(150));
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn catalog_is_requested_once() {
    let fake = FakeQuik::start(Box::new(happy)).await;
    let mut client = QuikBrokerAdapter::new(fake.config()).unwrap();

    client.add_limit(&limit("AAPL")).await.unwrap();
    client.add_limit(&limit("MSFT")).await.unwrap();
    let stocks = client.get_stocks().await.unwrap();

    assert_eq!(fake.count("getClassSecurityInfo"), 1);
    assert_eq!(stocks.len(), 3);
    let request = &fake.requests()[0];
    assert_eq!(request["cmd"], "getClassSecurityInfo");
    assert_eq!(request["data"], "SPBXM");
}

#[tokio::test]
async fn get_stocks_lists_every_class_security() {
    let fake = FakeQuik::start(Box::new(happy)).await;
    let mut client = QuikBrokerAdapter::new(fake.config()).unwrap();

    let stocks = client.get_stocks().await.unwrap();

    let tickers: Vec<&str> = stocks.iter().map(|s| s.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["AAPL", "MSFT", "SBER"]);
    assert_eq!(stocks[2].currency, "RUB");
}

#[tokio::test]
async fn malformed_catalog_is_protocol_error_and_not_cached() {
    let fake = FakeQuik::start(Box::new(|request: &Value| {
        let cmd = request["cmd"].clone();
        Some(json!({"cmd": cmd, "data": ["AAPL", "MSFT"]}))
    }))
    .await;
    let mut client = QuikBrokerAdapter::new(fake.config()).unwrap();

    let first = client.get_stocks().await.unwrap_err();
    let second = client.get_stocks().await.unwrap_err();

    assert!(matches!(first, TradeClientError::Protocol { .. }));
    assert!(matches!(second, TradeClientError::Protocol { .. }));
    assert_eq!(fake.count("getClassSecurityInfo"), 2);
}

// =============================================================================
// Correlation and errors
// =============================================================================

#[tokio::test]
async fn mismatched_cmd_reports_lua_error() {
    let fake = FakeQuik::start(Box::new(|request: &Value| {
        if request["cmd"] == "sendTransaction" {
            Some(json!({"cmd": "lua_error", "data": null, "t": "", "lua_error": "bad SECCODE"}))
        } else {
            happy(request)
        }
    }))
    .await;
    let mut client = QuikBrokerAdapter::new(fake.config()).unwrap();

    let err = client.add_limit(&limit("AAPL")).await.unwrap_err();

    assert!(err.to_string().contains("bad SECCODE"), "got {err}");
    assert_eq!(
        err,
        TradeClientError::ErrorResponse {
            request_cmd: "sendTransaction".to_string(),
            response_cmd: "lua_error".to_string(),
            lua_error: "bad SECCODE".to_string(),
        }
    );
}

#[tokio::test]
async fn clear_limits_parses_string_count() {
    let fake = FakeQuik::start(Box::new(happy)).await;
    let mut client = QuikBrokerAdapter::new(fake.config()).unwrap();

    assert_eq!(client.clear_limits().await.unwrap(), 7);

    let request = &fake.requests()[0];
    assert_eq!(request["cmd"], "cancelAllOrders");
    assert_eq!(request["data"], Value::Null);
}

#[tokio::test]
async fn numeric_cancel_count_is_protocol_error() {
    let fake = FakeQuik::start(Box::new(|request: &Value| {
        Some(json!({"cmd": request["cmd"].clone(), "data": 7}))
    }))
    .await;
    let mut client = QuikBrokerAdapter::new(fake.config()).unwrap();

    let err = client.clear_limits().await.unwrap_err();
    assert!(matches!(err, TradeClientError::Protocol { .. }));
}

#[tokio::test]
async fn silent_connector_times_out() {
    let cmd = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let callback = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let cmd_port = cmd.local_addr().unwrap().port();
    let callback_port = callback.local_addr().unwrap().port();
    let config = QuikConfig::new("acc", "127.0.0.1", cmd_port, callback_port)
        .with_read_timeout(Duration::from_millis(100));
    let mut client = QuikBrokerAdapter::new(config).unwrap();

    // Accepted connections are held open but never answered.
    let err = client.clear_limits().await.unwrap_err();

    assert!(
        matches!(err, TradeClientError::Connection { ref message } if message.contains("timed out")),
        "got {err:?}"
    );
    assert!(client.is_connected());
    drop((cmd, callback));
}

#[tokio::test]
async fn peer_hangup_is_connection_error_without_reconnect() {
    let fake = FakeQuik::start(Box::new(|_: &Value| None)).await;
    let mut client = QuikBrokerAdapter::new(fake.config()).unwrap();

    let err = client.clear_limits().await.unwrap_err();

    assert!(matches!(err, TradeClientError::Connection { .. }));
    assert!(client.is_connected());
}

// =============================================================================
// Connection lifecycle
// =============================================================================

#[tokio::test]
async fn failed_callback_dial_leaves_client_disconnected() {
    let cmd = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let cmd_port = cmd.local_addr().unwrap().port();
    let closed = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let callback_port = closed.local_addr().unwrap().port();
    drop(closed);

    let config = QuikConfig::new("acc", "127.0.0.1", cmd_port, callback_port)
        .with_connect_timeout(Duration::from_secs(1));
    let mut client = QuikBrokerAdapter::new(config).unwrap();

    let err = client.get_stocks().await.unwrap_err();

    assert!(matches!(err, TradeClientError::Connection { .. }));
    assert!(!client.is_connected());

    // The command socket was opened and then closed again.
    let (mut stream, _) = cmd.accept().await.unwrap();
    let mut buf = [0_u8; 1];
    let read = tokio::io::AsyncReadExt::read(&mut stream, &mut buf)
        .await
        .unwrap_or(0);
    assert_eq!(read, 0);
}

#[tokio::test]
async fn connects_lazily_and_close_disconnects() {
    let fake = FakeQuik::start(Box::new(happy)).await;
    let mut client = QuikBrokerAdapter::new(fake.config()).unwrap();
    assert!(!client.is_connected());

    client.get_stocks().await.unwrap();
    assert!(client.is_connected());

    client.close().await.unwrap();
    assert!(!client.is_connected());

    // Fake sees EOF and finishes.
    tokio::time::timeout(Duration::from_secs(2), fake.handle)
        .await
        .expect("fake connector should exit after close")
        .unwrap();
}
