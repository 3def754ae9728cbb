//! Connection handle — owns the socket and correlates requests with
//! responses.
//!
//! One [`Client`] is one connection lifetime. Requests may be issued
//! concurrently from many tasks; each resolves or rejects exactly once, in
//! the order the server answers (which need not be send order). Once the
//! socket closes the handle is terminally disconnected and a fresh
//! [`Client::connect`] starts a fresh id sequence.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc, oneshot};

use crate::codec::{LineReader, LineWriter};
use crate::command::Command;
use crate::error::ClientError;
use crate::protocol::{self, Message};
use crate::types::{ClientConfig, ClientEvent};

const WRITER_CHANNEL_CAPACITY: usize = 64;

enum WriterCommand {
    Send(Value),
    Shutdown,
}

/// Bookkeeping for one in-flight request.
///
/// `complete` fires exactly once; `notify` may fire any number of times
/// before that. Dropping the record closes the notification channel.
#[derive(Debug)]
struct Pending {
    complete: oneshot::Sender<Result<Value, ClientError>>,
    notify: Option<mpsc::UnboundedSender<Value>>,
}

type PendingMap = Arc<Mutex<HashMap<u64, Pending>>>;

/// Handle to one connection to a running hsdev server.
#[derive(Debug)]
pub struct Client {
    writer_tx: mpsc::Sender<WriterCommand>,
    pending: PendingMap,
    next_id: AtomicU64,
    connected: Arc<AtomicBool>,
    #[allow(dead_code)]
    reader_handle: tokio::task::JoinHandle<()>,
    #[allow(dead_code)]
    writer_handle: tokio::task::JoinHandle<()>,
}

impl Client {
    /// Connect to the configured host and port, bounded by the configured
    /// connect timeout.
    ///
    /// Lifecycle and raw-message observation events fan out on `event_tx` in
    /// arrival order; callers that don't care drop the receiver.
    pub async fn connect(
        config: &ClientConfig,
        event_tx: mpsc::Sender<ClientEvent>,
    ) -> Result<Self, ClientError> {
        let timeout = Duration::from_secs(config.connect_timeout_secs);
        let connecting = TcpStream::connect((config.host.as_str(), config.port));
        let stream = match tokio::time::timeout(timeout, connecting).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(ClientError::Connect(e)),
            Err(_) => return Err(ClientError::ConnectTimeout(timeout)),
        };
        tracing::debug!(host = %config.host, port = config.port, "connected to hsdev server");

        let (read_half, write_half) = stream.into_split();
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let connected = Arc::new(AtomicBool::new(true));

        let (writer_tx, mut writer_rx) = mpsc::channel::<WriterCommand>(WRITER_CHANNEL_CAPACITY);
        let writer_handle = tokio::spawn(async move {
            let mut writer = LineWriter::new(write_half);
            while let Some(cmd) = writer_rx.recv().await {
                match cmd {
                    WriterCommand::Send(line) => {
                        if let Err(e) = writer.write_line(&line).await {
                            tracing::warn!("hsdev write error: {e}");
                            break;
                        }
                    }
                    WriterCommand::Shutdown => break,
                }
            }
        });

        let reader_pending = pending.clone();
        let reader_connected = connected.clone();
        let reader_event_tx = event_tx.clone();
        let reader_writer_tx = writer_tx.clone();
        let reader_handle = tokio::spawn(async move {
            let mut reader = LineReader::new(read_half);
            loop {
                match reader.read_line().await {
                    Ok(Some(line)) => {
                        Self::dispatch_line(&line, &reader_pending, &reader_event_tx).await;
                    }
                    Ok(None) => {
                        tracing::debug!("hsdev server closed the connection");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!("hsdev read error: {e}");
                        break;
                    }
                }
            }

            reader_connected.store(false, Ordering::SeqCst);
            let stale: Vec<Pending> = {
                let mut table = reader_pending.lock().await;
                table.drain().map(|(_, entry)| entry).collect()
            };
            let rejected = stale.len();
            for entry in stale {
                let _ = entry.complete.send(Err(ClientError::Disconnected));
            }
            if rejected > 0 {
                tracing::debug!(rejected, "rejected pending requests on disconnect");
            }
            let _ = reader_event_tx.send(ClientEvent::Disconnected).await;
            let _ = reader_writer_tx.send(WriterCommand::Shutdown).await;
        });

        let _ = event_tx.send(ClientEvent::Connected).await;

        Ok(Self {
            writer_tx,
            pending,
            next_id: AtomicU64::new(0),
            connected,
            reader_handle,
            writer_handle,
        })
    }

    /// Whether the socket is still open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Issue a command and wait for its response, decoded with the command's
    /// own decoder.
    ///
    /// There is no per-command timeout; a request that the server never
    /// answers fails when the connection closes.
    pub async fn invoke<C: Command>(&self, command: &C) -> Result<C::Output, ClientError> {
        self.invoke_inner(command, None).await
    }

    /// Like [`invoke`](Self::invoke), forwarding every `notify` message for
    /// this request into `notify_tx` until the terminal response arrives.
    /// The channel closes when the request completes.
    pub async fn invoke_with_notify<C: Command>(
        &self,
        command: &C,
        notify_tx: mpsc::UnboundedSender<Value>,
    ) -> Result<C::Output, ClientError> {
        self.invoke_inner(command, Some(notify_tx)).await
    }

    /// Half-close the connection.
    ///
    /// The server notices the closed write side and closes in turn, which
    /// rejects anything still pending as disconnected.
    pub async fn disconnect(&self) {
        let _ = self.writer_tx.send(WriterCommand::Shutdown).await;
    }

    async fn invoke_inner<C: Command>(
        &self,
        command: &C,
        notify: Option<mpsc::UnboundedSender<Value>>,
    ) -> Result<C::Output, ClientError> {
        if !self.is_connected() {
            return Err(ClientError::Disconnected);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (complete_tx, complete_rx) = oneshot::channel();
        self.pending.lock().await.insert(
            id,
            Pending {
                complete: complete_tx,
                notify,
            },
        );

        // The reader rejects the table's entries when the connection closes;
        // an entry inserted after that drain would wait forever. Re-checking
        // after the insert closes the window: either the drain saw the entry,
        // or this sees the disconnect.
        if !self.is_connected() && self.pending.lock().await.remove(&id).is_some() {
            return Err(ClientError::Disconnected);
        }

        let line = protocol::request(&command.wire_name(), command.params(), id);
        if self
            .writer_tx
            .send(WriterCommand::Send(line))
            .await
            .is_err()
        {
            // Never leak the pending entry when the request can't be written.
            self.pending.lock().await.remove(&id);
            return Err(ClientError::Disconnected);
        }

        let raw = match complete_rx.await {
            Ok(outcome) => outcome?,
            // The reader task rejects everything it drains before exiting,
            // so a dropped sender means the record never survived to be
            // drained: the connection is gone.
            Err(_) => return Err(ClientError::Disconnected),
        };

        Ok(command.decode(&raw)?)
    }

    async fn dispatch_line(line: &str, pending: &PendingMap, event_tx: &mpsc::Sender<ClientEvent>) {
        let parsed: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("invalid response from hsdev server: {line}, error: {e}");
                return;
            }
        };

        if !event_tx.is_closed() {
            let id = parsed
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_owned);
            let _ = event_tx
                .send(ClientEvent::Message {
                    id,
                    body: parsed.clone(),
                })
                .await;
        }

        let Some(message) = Message::classify(parsed) else {
            tracing::warn!("unknown response shape from hsdev server: {line}");
            return;
        };

        match message {
            Message::Result { id, result } => {
                let Some(entry) = Self::take_pending(pending, &id).await else {
                    return;
                };
                let _ = entry.complete.send(Ok(result));
            }
            Message::Error {
                id,
                message,
                details,
            } => {
                let Some(entry) = Self::take_pending(pending, &id).await else {
                    return;
                };
                let _ = entry
                    .complete
                    .send(Err(ClientError::Service { message, details }));
            }
            Message::Notify { id, notify } => {
                let Some(key) = Self::parse_id(&id) else {
                    return;
                };
                // The record stays; more messages may follow for this id.
                let table = pending.lock().await;
                if let Some(entry) = table.get(&key)
                    && let Some(notify_tx) = &entry.notify
                {
                    let _ = notify_tx.send(notify);
                }
            }
        }
    }

    async fn take_pending(pending: &PendingMap, id: &str) -> Option<Pending> {
        let key = Self::parse_id(id)?;
        let entry = pending.lock().await.remove(&key);
        if entry.is_none() {
            tracing::debug!(id, "response for unknown or completed request");
        }
        entry
    }

    fn parse_id(id: &str) -> Option<u64> {
        match id.parse() {
            Ok(key) => Some(key),
            Err(_) => {
                tracing::debug!(id, "response with non-integer id");
                None
            }
        }
    }

    #[cfg(test)]
    pub(crate) async fn pending_len(&self) -> usize {
        self.pending.lock().await.len()
    }
}
