//! Frontier queue and dedup set
//!
//! The frontier is a bounded FIFO of canonical URLs awaiting a worker,
//! paired with the set of every canonical URL admitted during the run.
//! Insertion is non-blocking: a full queue drops the candidate instead of
//! blocking the producer, trading completeness for forward progress.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;

pub(crate) struct Frontier {
    tx: mpsc::Sender<String>,
    rx: tokio::sync::Mutex<mpsc::Receiver<String>>,
    seen: Mutex<HashSet<String>>,
    pending: AtomicUsize,
}

impl Frontier {
    pub(crate) fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx,
            rx: tokio::sync::Mutex::new(rx),
            seen: Mutex::new(HashSet::new()),
            pending: AtomicUsize::new(0),
        }
    }

    /// Offers a canonical URL to the frontier
    ///
    /// The URL is first marked seen (insert-if-absent); a URL seen before is
    /// rejected. A newly seen URL is then enqueued non-blockingly; if the
    /// queue is full the URL is dropped but stays marked seen, so it will
    /// not be retried. Returns whether the URL was actually queued.
    pub(crate) fn offer(&self, canonical: &str) -> bool {
        {
            let mut seen = self.seen.lock().expect("frontier seen set poisoned");
            if !seen.insert(canonical.to_string()) {
                return false;
            }
        }

        match self.tx.try_send(canonical.to_string()) {
            Ok(()) => {
                self.pending.fetch_add(1, Ordering::SeqCst);
                true
            }
            Err(mpsc::error::TrySendError::Full(url)) => {
                tracing::warn!(url = %url, "frontier full, dropping url");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    /// Waits for the next queued URL
    ///
    /// Workers share the receiver; whichever worker acquires it first takes
    /// the next entry. Returns `None` only if the channel has been closed.
    pub(crate) async fn next(&self) -> Option<String> {
        let url = self.rx.lock().await.recv().await?;
        self.pending.fetch_sub(1, Ordering::SeqCst);
        Some(url)
    }

    /// Number of URLs queued and not yet dequeued
    pub(crate) fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}
