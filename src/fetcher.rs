//! Remote option fetcher
//!
//! Each fetch runs on its own background thread and reports back over a
//! channel; the owner drains the channel from its event loop. Every request
//! is stamped with a generation number and only the newest generation may
//! change state, so a slow response for an old query is dropped on arrival.

use crate::collaborator::{Collaborator, FetchRequest, FetchResponse, PageInfo};
use crate::config::PickerConfig;
use crate::error::Result;
use crate::records::PickRecord;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// What the control should show for the current query
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<R> {
    /// Nothing asked yet
    Idle,
    /// Query below the minimum length; no call was made
    TooShort { min_len: usize },
    Loading,
    Error(String),
    Success(Vec<R>),
}

impl<R> FetchState<R> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }
}

/// Result of one background fetch
pub struct FetchOutcome<R> {
    pub generation: u64,
    pub request: FetchRequest,
    pub result: Result<FetchResponse<R>>,
}

pub struct RemoteFetcher<R: PickRecord> {
    collaborator: Arc<dyn Collaborator<R>>,
    min_query_len: usize,
    limit: usize,
    generation: u64,
    last_request: Option<FetchRequest>,
    state: FetchState<R>,
    pagination: Option<PageInfo>,
    tx: Sender<FetchOutcome<R>>,
    rx: Receiver<FetchOutcome<R>>,
}

impl<R: PickRecord> RemoteFetcher<R> {
    pub fn new(collaborator: Arc<dyn Collaborator<R>>, config: &PickerConfig) -> Self {
        let (tx, rx) = unbounded();
        Self {
            collaborator,
            min_query_len: config.min_query_len,
            limit: config.fetch_limit.max(1),
            generation: 0,
            last_request: None,
            state: FetchState::Idle,
            pagination: None,
            tx,
            rx,
        }
    }

    /// Search `scope_key` for `query`, subject to the minimum-length gate.
    ///
    /// Returns whether a request was sent. A short query supersedes any
    /// request still in flight.
    pub fn search(&mut self, scope_key: &str, query: &str) -> bool {
        let query = query.trim();
        if query.chars().count() < self.min_query_len {
            self.generation += 1;
            self.last_request = None;
            self.pagination = None;
            self.state = FetchState::TooShort {
                min_len: self.min_query_len,
            };
            return false;
        }

        let request = FetchRequest::new(scope_key)
            .search(query)
            .page(1)
            .limit(self.limit);
        self.send(request);
        true
    }

    /// Send a request as-is, bypassing the length gate (list pages use this)
    pub fn send(&mut self, request: FetchRequest) {
        self.generation += 1;
        self.last_request = Some(request.clone());
        self.state = FetchState::Loading;

        let generation = self.generation;
        let collaborator = Arc::clone(&self.collaborator);
        let tx = self.tx.clone();

        tracing::debug!(kind = R::KIND, generation, ?request, "dispatching fetch");

        thread::spawn(move || {
            let result = collaborator.fetch(&request);
            let _ = tx.send(FetchOutcome {
                generation,
                request,
                result,
            });
        });
    }

    /// Re-issue the last request after a failure. Returns whether one was sent.
    pub fn retry(&mut self) -> bool {
        if !matches!(self.state, FetchState::Error(_)) {
            return false;
        }
        match self.last_request.clone() {
            Some(request) => {
                tracing::info!(kind = R::KIND, "retrying fetch");
                self.send(request);
                true
            }
            None => false,
        }
    }

    /// Forget the current query and drop anything still in flight
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.last_request = None;
        self.pagination = None;
        self.state = FetchState::Idle;
    }

    /// Apply one outcome. Returns false if it was stale.
    pub fn apply(&mut self, outcome: FetchOutcome<R>) -> bool {
        if outcome.generation != self.generation {
            tracing::debug!(
                kind = R::KIND,
                stale = outcome.generation,
                current = self.generation,
                "discarding stale fetch result"
            );
            return false;
        }

        match outcome.result {
            Ok(response) => {
                tracing::debug!(
                    kind = R::KIND,
                    records = response.records.len(),
                    search = ?outcome.request.search,
                    "fetch succeeded"
                );
                self.pagination = response.pagination;
                self.state = FetchState::Success(response.records);
            }
            Err(e) => {
                tracing::warn!(kind = R::KIND, error = %e, "fetch failed");
                self.pagination = None;
                self.state = FetchState::Error(e.inline_message());
            }
        }
        true
    }

    /// Apply every outcome that has arrived. Returns whether state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.rx.try_recv() {
            changed |= self.apply(outcome);
        }
        changed
    }

    /// Block until the current request resolves or `timeout` passes.
    ///
    /// Stale outcomes arriving meanwhile are discarded. Returns whether the
    /// current request resolved.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.state.is_loading() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(outcome) => {
                    self.apply(outcome);
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return false;
                }
            }
        }
        true
    }

    pub fn state(&self) -> &FetchState<R> {
        &self.state
    }

    /// Records of the last successful fetch; empty in every other state
    pub fn records(&self) -> &[R] {
        match &self.state {
            FetchState::Success(records) => records,
            _ => &[],
        }
    }

    pub fn pagination(&self) -> Option<&PageInfo> {
        self.pagination.as_ref()
    }

    pub fn last_request(&self) -> Option<&FetchRequest> {
        self.last_request.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn min_query_len(&self) -> usize {
        self.min_query_len
    }
}
