use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use store::{SubscriberSet, SubscriptionId};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::LiveMessage;

/// Connection lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Live channel configuration
#[derive(Debug, Clone)]
pub struct LiveConfig {
    /// WebSocket endpoint
    pub url: String,

    /// Reconnect attempts before giving up
    pub max_reconnect_attempts: u32,

    /// First reconnect delay; doubles on every further attempt
    pub base_reconnect_delay: Duration,
}

impl LiveConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_reconnect_attempts: 5,
            base_reconnect_delay: Duration::from_secs(1),
        }
    }
}

fn reconnect_delay(base: Duration, attempt: u32) -> Duration {
    base * 2u32.pow(attempt - 1)
}

/// Client for the live document feed.
///
/// Maintains a single connection to the live endpoint. A dropped
/// connection is re-dialed with exponential backoff until the attempt
/// budget is spent; a successful open resets the budget. `disconnect()`
/// is terminal — after it, `connect()` is a no-op.
pub struct LiveUpdateClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: LiveConfig,
    status: Mutex<ConnectionStatus>,
    reconnect_attempts: AtomicU32,
    torn_down: AtomicBool,
    close_tx: Mutex<Option<mpsc::UnboundedSender<()>>>,
    message_subscribers: SubscriberSet<LiveMessage>,
    status_subscribers: SubscriberSet<ConnectionStatus>,
}

impl LiveUpdateClient {
    pub fn new(config: LiveConfig) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                config,
                status: Mutex::new(ConnectionStatus::Disconnected),
                reconnect_attempts: AtomicU32::new(0),
                torn_down: AtomicBool::new(false),
                close_tx: Mutex::new(None),
                message_subscribers: SubscriberSet::new(),
                status_subscribers: SubscriberSet::new(),
            }),
        }
    }

    /// Open the connection on a background task. No-op once torn down,
    /// or while a connection attempt is already underway.
    pub fn connect(&self) {
        let inner = self.inner.clone();
        tokio::spawn(async move {
            inner.run_connection().await;
        });
    }

    /// Tear the client down permanently: close the active connection
    /// with a normal-closure frame and drop every subscriber. There is
    /// no undo; a later `connect()` does nothing. A reconnect timer that
    /// is already running observes the torn-down flag and does not fire.
    pub fn disconnect(&self) {
        self.inner.torn_down.store(true, Ordering::SeqCst);

        let close_tx = self.inner.close_tx.lock().take();
        match close_tx {
            Some(tx) => {
                let _ = tx.send(());
            }
            // No active connection to close; settle the status directly.
            None => self.inner.set_status(ConnectionStatus::Disconnected),
        }

        self.inner.message_subscribers.clear();
        self.inner.status_subscribers.clear();
    }

    pub fn get_status(&self) -> ConnectionStatus {
        *self.inner.status.lock()
    }

    /// Register a handler for inbound live messages.
    pub fn on_message(
        &self,
        handler: impl Fn(&LiveMessage) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.inner.message_subscribers.add(handler)
    }

    /// Remove a message handler. Idempotent.
    pub fn remove_message_handler(&self, id: SubscriptionId) -> bool {
        self.inner.message_subscribers.remove(id)
    }

    /// Register a handler for connection-status transitions.
    pub fn on_status_change(
        &self,
        handler: impl Fn(&ConnectionStatus) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.inner.status_subscribers.add(handler)
    }

    /// Remove a status handler. Idempotent.
    pub fn remove_status_handler(&self, id: SubscriptionId) -> bool {
        self.inner.status_subscribers.remove(id)
    }
}

impl ClientInner {
    async fn run_connection(self: Arc<Self>) {
        if self.torn_down.load(Ordering::SeqCst) {
            debug!("live client torn down, ignoring connect");
            return;
        }

        let should_dial = {
            let mut status = self.status.lock();
            match *status {
                ConnectionStatus::Connecting | ConnectionStatus::Connected => false,
                _ => {
                    *status = ConnectionStatus::Connecting;
                    true
                }
            }
        };
        if !should_dial {
            debug!("live connection already open or opening, ignoring connect");
            return;
        }
        self.status_subscribers.emit(&ConnectionStatus::Connecting);

        info!("connecting to live channel at {}", self.config.url);
        let stream = match connect_async(self.config.url.as_str()).await {
            Ok((stream, _response)) => stream,
            Err(err) => {
                warn!("live connection failed: {err}");
                self.set_status(ConnectionStatus::Error);
                self.clone().schedule_reconnect();
                return;
            }
        };

        if self.torn_down.load(Ordering::SeqCst) {
            debug!("torn down while dialing, dropping connection");
            return;
        }

        self.reconnect_attempts.store(0, Ordering::SeqCst);
        self.set_status(ConnectionStatus::Connected);
        info!("live channel connected");

        let (mut ws_tx, mut ws_rx) = stream.split();
        let (close_tx, mut close_rx) = mpsc::unbounded_channel();
        *self.close_tx.lock() = Some(close_tx);

        let mut requested_close = false;
        loop {
            tokio::select! {
                _ = close_rx.recv() => {
                    debug!("closing live connection on request");
                    let frame = CloseFrame {
                        code: CloseCode::Normal,
                        reason: "client disconnect".into(),
                    };
                    let _ = ws_tx.send(Message::Close(Some(frame))).await;
                    requested_close = true;
                    break;
                }

                frame = ws_rx.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = self.handle_text(&text) {
                            let _ = ws_tx.send(reply).await;
                        }
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        let _ = ws_tx.send(Message::Pong(payload)).await;
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("live channel closed by server");
                        break;
                    }
                    Some(Ok(other)) => {
                        debug!("ignoring non-text live frame: {other:?}");
                    }
                    Some(Err(err)) => {
                        error!("live channel transport error: {err}");
                        self.close_tx.lock().take();
                        self.set_status(ConnectionStatus::Error);
                        self.clone().schedule_reconnect();
                        return;
                    }
                    None => {
                        info!("live channel stream ended");
                        break;
                    }
                }
            }
        }

        self.close_tx.lock().take();
        self.set_status(ConnectionStatus::Disconnected);
        if !requested_close && !self.torn_down.load(Ordering::SeqCst) {
            self.schedule_reconnect();
        }
    }

    /// Parse one inbound text frame. Heartbeat pings are answered inline;
    /// everything else goes to the message subscribers. Parse failures
    /// are logged and dropped.
    fn handle_text(&self, text: &str) -> Option<Message> {
        match serde_json::from_str::<LiveMessage>(text) {
            Ok(LiveMessage::Ping) => {
                debug!("live ping, answering with pong");
                let pong = serde_json::to_string(&LiveMessage::Pong).ok()?;
                Some(Message::Text(pong))
            }
            Ok(LiveMessage::Pong) => {
                debug!("live pong received");
                None
            }
            Ok(message) => {
                self.message_subscribers.emit(&message);
                None
            }
            Err(err) => {
                warn!("dropping malformed live message: {err}");
                None
            }
        }
    }

    fn schedule_reconnect(self: Arc<Self>) {
        if self.torn_down.load(Ordering::SeqCst) {
            debug!("torn down, not reconnecting");
            return;
        }

        let attempts = self.reconnect_attempts.load(Ordering::SeqCst);
        if attempts >= self.config.max_reconnect_attempts {
            warn!("giving up after {attempts} reconnect attempts");
            self.set_status(ConnectionStatus::Disconnected);
            return;
        }

        let attempt = attempts + 1;
        self.reconnect_attempts.store(attempt, Ordering::SeqCst);
        let delay = reconnect_delay(self.config.base_reconnect_delay, attempt);
        info!(
            "reconnecting in {delay:?} (attempt {attempt}/{})",
            self.config.max_reconnect_attempts
        );

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The timer may outlive a disconnect(); re-check before dialing.
            if self.torn_down.load(Ordering::SeqCst) {
                return;
            }
            self.run_connection().await;
        });
    }

    fn set_status(&self, next: ConnectionStatus) {
        {
            let mut status = self.status.lock();
            if *status == next {
                return;
            }
            *status = next;
        }
        self.status_subscribers.emit(&next);
    }
}
