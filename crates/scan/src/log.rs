//! Per-run progress log.
//!
//! An ordered, append-only sequence of timestamped messages. Entries can be
//! collected at the end of the run, or consumed live through a subscriber
//! channel (the SSE endpoint does this).

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use ethiscan_core::ScanId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanLogEntry {
    pub at: DateTime<Utc>,
    pub message: String,
}

impl ScanLogEntry {
    /// `HH:MM:SS: message`, the way the progress panel shows it.
    pub fn display_line(&self) -> String {
        format!("{}: {}", self.at.format("%H:%M:%S"), self.message)
    }
}

#[derive(Debug)]
pub struct ScanLog {
    scan_id: ScanId,
    entries: Mutex<Vec<ScanLogEntry>>,
    subscriber: Option<UnboundedSender<ScanLogEntry>>,
}

impl ScanLog {
    pub fn new(scan_id: ScanId) -> Self {
        Self {
            scan_id,
            entries: Mutex::new(Vec::new()),
            subscriber: None,
        }
    }

    /// A log that also forwards every entry, in order, to the returned receiver.
    pub fn with_subscriber(scan_id: ScanId) -> (Self, UnboundedReceiver<ScanLogEntry>) {
        let (tx, rx) = unbounded_channel();
        let log = Self {
            scan_id,
            entries: Mutex::new(Vec::new()),
            subscriber: Some(tx),
        };
        (log, rx)
    }

    pub fn scan_id(&self) -> ScanId {
        self.scan_id
    }

    pub fn push(&self, message: impl Into<String>) {
        let entry = ScanLogEntry {
            at: Utc::now(),
            message: message.into(),
        };
        tracing::info!(scan_id = %self.scan_id, "{}", entry.message);

        // Hold the lock while forwarding so subscribers see the same order.
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(tx) = &self.subscriber {
            // Receiver gone means the client stopped listening; keep recording.
            let _ = tx.send(entry.clone());
        }
        entries.push(entry);
    }

    pub fn entries(&self) -> Vec<ScanLogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.message).collect()
    }

    pub fn into_entries(self) -> Vec<ScanLogEntry> {
        self.entries
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_keep_insertion_order() {
        let log = ScanLog::new(ScanId::new());
        log.push("first");
        log.push(String::from("second"));
        log.push("third");

        assert_eq!(log.messages(), vec!["first", "second", "third"]);
        let entries = log.entries();
        assert!(entries.windows(2).all(|w| w[0].at <= w[1].at));
        assert_eq!(log.into_entries().len(), 3);
    }

    #[tokio::test]
    async fn subscriber_sees_every_entry_in_order() {
        let (log, mut rx) = ScanLog::with_subscriber(ScanId::new());
        log.push("a");
        log.push("b");
        drop(log);

        let mut seen = Vec::new();
        while let Some(entry) = rx.recv().await {
            seen.push(entry.message);
        }
        assert_eq!(seen, vec!["a", "b"]);
    }

    #[test]
    fn dropped_subscriber_does_not_stop_recording() {
        let (log, rx) = ScanLog::with_subscriber(ScanId::new());
        drop(rx);
        log.push("still recorded");
        assert_eq!(log.messages(), vec!["still recorded"]);
    }

    #[test]
    fn display_line_prefixes_time() {
        let entry = ScanLogEntry {
            at: DateTime::parse_from_rfc3339("2026-03-01T09:05:07Z").unwrap().with_timezone(&Utc),
            message: "Scan complete!".into(),
        };
        assert_eq!(entry.display_line(), "09:05:07: Scan complete!");
    }
}
