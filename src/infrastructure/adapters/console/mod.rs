//! Console adapter: events from a file or newline-delimited JSON on stdin

use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::{JoinError, JoinSet};

use crate::application::errors::ServiceError;
use crate::application::notifications::{DispatchSummary, NotificationDispatcher};
use crate::domain::entities::MessageCreated;

/// Read a single `MessageCreated` event from a JSON file
pub async fn load_event(path: impl AsRef<Path>) -> Result<MessageCreated, ServiceError> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(MessageCreated::from_json(&raw)?)
}

/// Counters for one `listen` session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenStats {
    pub dispatched: usize,
    pub rejected: usize,
    pub aborted: usize,
}

impl ListenStats {
    fn record(&mut self, joined: Result<DispatchSummary, JoinError>) {
        match joined {
            Ok(summary) => {
                self.dispatched += 1;
                tracing::debug!(
                    conversation_id = %summary.conversation_id,
                    status = ?summary.status,
                    "Invocation finished"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "Invocation aborted");
                self.aborted += 1;
            }
        }
    }
}

/// Runs every event line as an independent invocation
pub struct ConsoleListener {
    dispatcher: Arc<NotificationDispatcher>,
}

impl ConsoleListener {
    pub fn new(dispatcher: Arc<NotificationDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Consume `reader` until EOF, then wait for in-flight invocations.
    ///
    /// Malformed lines (bad UTF-8 or bad JSON) are logged and counted.
    /// A read error stops intake but still waits for spawned invocations.
    pub async fn run<R>(&self, mut reader: R) -> Result<ListenStats, ServiceError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut stats = ListenStats::default();
        let mut tasks: JoinSet<DispatchSummary> = JoinSet::new();
        let mut buf: Vec<u8> = Vec::new();
        let mut line_no = 0usize;

        let read_error = loop {
            // `read_until` keeps partial bytes in `buf` when the other branch wins
            let read = tokio::select! {
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    stats.record(joined);
                    continue;
                }
                read = reader.read_until(b'\n', &mut buf) => read,
            };

            match read {
                Ok(0) => break None,
                Ok(_) => {
                    line_no += 1;
                    self.accept_line(&buf, line_no, &mut tasks, &mut stats);
                    buf.clear();
                }
                Err(e) => break Some(e),
            }
        };

        if let Some(e) = &read_error {
            tracing::error!(error = %e, "Reading events failed, waiting for in-flight invocations");
        } else {
            tracing::debug!(pending = tasks.len(), "Input closed, waiting for invocations");
        }

        while let Some(joined) = tasks.join_next().await {
            stats.record(joined);
        }

        match read_error {
            Some(e) => Err(e.into()),
            None => Ok(stats),
        }
    }

    fn accept_line(
        &self,
        raw: &[u8],
        line_no: usize,
        tasks: &mut JoinSet<DispatchSummary>,
        stats: &mut ListenStats,
    ) {
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line.trim(),
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "Skipping event that is not UTF-8");
                stats.rejected += 1;
                return;
            }
        };
        if line.is_empty() {
            return;
        }

        match MessageCreated::from_json(line) {
            Ok(event) => {
                let dispatcher = Arc::clone(&self.dispatcher);
                tasks.spawn(async move { dispatcher.handle(&event).await });
            }
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "Skipping malformed event");
                stats.rejected += 1;
            }
        }
    }
}
