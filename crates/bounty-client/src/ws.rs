//! GraphQL subscriptions over the `graphql-transport-ws` protocol.
//!
//! Each subscription owns a connection task that feeds a bounded channel.
//! Connection failures are retried per [`RetryConfig`](crate::RetryConfig);
//! the bearer token is fetched again before every attempt.

use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use metrics::counter;
use serde_json::json;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::SEC_WEBSOCKET_PROTOCOL;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, info, warn};

use bounty_models::{ClientMessage, ExecutionResult, GraphqlOperation, ServerMessage};

use crate::config::{GraphqlWsConfig, GRAPHQL_TRANSPORT_WS_PROTOCOL};
use crate::error::{ClientError, ClientResult};
use crate::token::TokenProvider;

/// Buffered results per subscription before the connection task waits.
const SUBSCRIPTION_BUFFER_SIZE: usize = 32;

/// Counter of reconnect attempts across all subscriptions.
pub const WS_RECONNECTS_TOTAL: &str = "bounty_graphql_ws_reconnects_total";

/// Build the `connection_init` message. The token travels as an
/// `Authorization` header inside the payload; no token means no payload.
pub fn connection_init(token: Option<String>) -> ClientMessage {
    ClientMessage::ConnectionInit {
        payload: token.map(|t| json!({ "headers": { "Authorization": format!("Bearer {}", t) } })),
    }
}

/// Subscription client for a single GraphQL endpoint.
pub struct GraphqlWsClient {
    config: GraphqlWsConfig,
    tokens: Arc<dyn TokenProvider>,
    next_id: AtomicU64,
}

impl GraphqlWsClient {
    pub fn new(config: GraphqlWsConfig, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            config,
            tokens,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &GraphqlWsConfig {
        &self.config
    }

    /// Start a subscription. Dropping the returned handle completes it.
    pub fn subscribe(&self, operation: GraphqlOperation) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed).to_string();
        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER_SIZE);

        info!(subscription_id = %id, url = %self.config.url, "Starting GraphQL subscription");

        tokio::spawn(run_subscription(
            self.config.clone(),
            Arc::clone(&self.tokens),
            id.clone(),
            operation,
            tx,
        ));

        Subscription { id, rx }
    }
}

/// Stream of results for one subscription.
///
/// Ends after the server completes the operation, after an operation error
/// (delivered as `Err(ClientError::Graphql)`), or after reconnects are
/// exhausted (delivered as `Err(ClientError::RetriesExhausted)`).
pub struct Subscription {
    id: String,
    rx: mpsc::Receiver<ClientResult<ExecutionResult>>,
}

impl Subscription {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn next_result(&mut self) -> Option<ClientResult<ExecutionResult>> {
        self.rx.recv().await
    }
}

impl Stream for Subscription {
    type Item = ClientResult<ExecutionResult>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

async fn run_subscription(
    config: GraphqlWsConfig,
    tokens: Arc<dyn TokenProvider>,
    id: String,
    operation: GraphqlOperation,
    tx: mpsc::Sender<ClientResult<ExecutionResult>>,
) {
    let mut retries_used = 0u32;

    loop {
        let error = match run_connection(&config, tokens.as_ref(), &id, &operation, &tx, &mut retries_used).await {
            Ok(()) => {
                debug!(subscription_id = %id, "Subscription finished");
                return;
            }
            Err(e) => e,
        };

        if !config.retry.allows_retry(retries_used) {
            warn!(subscription_id = %id, "GraphQL WS reconnects exhausted: {}", error);
            let _ = tx
                .send(Err(ClientError::RetriesExhausted {
                    attempts: retries_used + 1,
                    last_error: error.to_string(),
                }))
                .await;
            return;
        }

        let delay = config.retry.delay_for(retries_used);
        retries_used += 1;
        counter!(WS_RECONNECTS_TOTAL).increment(1);

        warn!(
            subscription_id = %id,
            retry = retries_used,
            delay_ms = delay.as_millis() as u64,
            "GraphQL WS connection failed, reconnecting: {}",
            error
        );

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = tx.closed() => return,
        }
    }
}

/// Drive one connection. `Ok` means the subscription is over for good.
async fn run_connection(
    config: &GraphqlWsConfig,
    tokens: &dyn TokenProvider,
    id: &str,
    operation: &GraphqlOperation,
    tx: &mpsc::Sender<ClientResult<ExecutionResult>>,
    retries_used: &mut u32,
) -> ClientResult<()> {
    let token = tokens.bearer_token().await;

    let mut request = config.url.as_str().into_client_request()?;
    request.headers_mut().insert(
        SEC_WEBSOCKET_PROTOCOL,
        HeaderValue::from_static(GRAPHQL_TRANSPORT_WS_PROTOCOL),
    );

    let (socket, _) = tokio::time::timeout(config.connect_timeout, tokio_tungstenite::connect_async(request))
        .await
        .map_err(|_| ClientError::Timeout("websocket handshake"))??;
    let (mut write, mut read) = socket.split();

    send_message(&mut write, &connection_init(token)).await?;

    tokio::time::timeout(config.ack_timeout, wait_for_ack(&mut read))
        .await
        .map_err(|_| ClientError::Timeout("connection_ack"))??;
    *retries_used = 0;

    send_message(
        &mut write,
        &ClientMessage::Subscribe {
            id: id.to_string(),
            payload: operation.clone(),
        },
    )
    .await?;
    debug!(subscription_id = %id, "Subscribed");

    loop {
        let frame = tokio::select! {
            frame = read.next() => frame,
            _ = tx.closed() => {
                complete_and_close(&mut write, id).await;
                return Ok(());
            }
        };

        let text = match frame {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Close(frame))) => return Err(closed(frame)),
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(e.into()),
            None => return Err(ClientError::Closed("stream ended".to_string())),
        };

        let message = match serde_json::from_str::<ServerMessage>(text.as_str()) {
            Ok(message) => message,
            Err(e) => {
                warn!(subscription_id = %id, "Skipping malformed server message: {}", e);
                continue;
            }
        };

        match message {
            ServerMessage::Next { id: msg_id, payload } if msg_id == id => {
                if tx.send(Ok(payload)).await.is_err() {
                    complete_and_close(&mut write, id).await;
                    return Ok(());
                }
            }
            ServerMessage::Error { id: msg_id, payload } if msg_id == id => {
                let _ = tx.send(Err(ClientError::Graphql(payload))).await;
                return Ok(());
            }
            ServerMessage::Complete { id: msg_id } if msg_id == id => return Ok(()),
            ServerMessage::Ping { payload } => {
                send_message(&mut write, &ClientMessage::Pong { payload }).await?;
            }
            other => debug!(?other, "Ignoring server message"),
        }
    }
}

async fn wait_for_ack<S>(read: &mut S) -> ClientResult<()>
where
    S: Stream<Item = Result<Message, WsError>> + Unpin,
{
    while let Some(frame) = read.next().await {
        match frame? {
            Message::Text(text) => match serde_json::from_str::<ServerMessage>(text.as_str())? {
                ServerMessage::ConnectionAck { .. } => return Ok(()),
                ServerMessage::Ping { .. } | ServerMessage::Pong { .. } => continue,
                other => {
                    return Err(ClientError::protocol(format!(
                        "expected connection_ack, got {:?}",
                        other
                    )))
                }
            },
            Message::Close(frame) => return Err(closed(frame)),
            _ => continue,
        }
    }
    Err(ClientError::Closed("stream ended before connection_ack".to_string()))
}

async fn send_message<S>(write: &mut S, message: &ClientMessage) -> ClientResult<()>
where
    S: Sink<Message, Error = WsError> + Unpin,
{
    let json = serde_json::to_string(message)?;
    write.send(Message::text(json)).await?;
    Ok(())
}

async fn complete_and_close<S>(write: &mut S, id: &str)
where
    S: Sink<Message, Error = WsError> + Unpin,
{
    let complete = ClientMessage::Complete { id: id.to_string() };
    if let Err(e) = send_message(write, &complete).await {
        debug!("Failed to send complete for subscription {}: {}", id, e);
    }
    let _ = write.close().await;
}

fn closed(frame: Option<CloseFrame>) -> ClientError {
    match frame {
        Some(f) => ClientError::Closed(format!("{} {}", u16::from(f.code), f.reason)),
        None => ClientError::Closed("no close frame".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_init_carries_bearer_token() {
        let json = serde_json::to_value(connection_init(Some("tok".into()))).unwrap();
        assert_eq!(json["type"], "connection_init");
        assert_eq!(json["payload"]["headers"]["Authorization"], "Bearer tok");
    }

    #[test]
    fn test_connection_init_without_token_has_no_payload() {
        let json = serde_json::to_value(connection_init(None)).unwrap();
        assert!(json.get("payload").is_none());
    }

    #[test]
    fn test_closed_formats_code_and_reason() {
        use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

        let err = closed(Some(CloseFrame {
            code: CloseCode::Library(4403),
            reason: "Forbidden".into(),
        }));
        assert_eq!(err.to_string(), "Connection closed: 4403 Forbidden");
    }
}
