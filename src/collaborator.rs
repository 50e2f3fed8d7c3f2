//! Collaborator contract and the in-memory directory implementing it
//!
//! A collaborator answers record queries for one scope key (a clinic). The
//! pickers and list views only ever see the [`Collaborator`] trait.

use crate::error::{CliniPickError, Result};
use crate::options::filter_records;
use crate::pagination::Paginator;
use crate::records::PickRecord;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Page size used when a request does not carry a limit
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
    pub scope_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl FetchRequest {
    pub fn new(scope_key: impl Into<String>) -> Self {
        Self {
            scope_key: scope_key.into(),
            search: None,
            page: None,
            limit: None,
        }
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.is_empty() { None } else { Some(search) };
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Pagination block of a collaborator response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResponse<R> {
    pub records: Vec<R>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageInfo>,
}

/// External record service
pub trait Collaborator<R>: Send + Sync {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse<R>>;
}

// ============================================================================
// In-memory directory
// ============================================================================

/// Scope-partitioned record store answering [`FetchRequest`]s.
///
/// Matching uses the same case-insensitive filter as client-side lists and
/// paging uses the same [`Paginator`], so both list modes agree on edge cases.
pub struct Directory<R> {
    scopes: RwLock<HashMap<String, Vec<R>>>,
    latency: Duration,
    failure: RwLock<Option<String>>,
}

impl<R: PickRecord> Default for Directory<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: PickRecord> Directory<R> {
    pub fn new() -> Self {
        Self {
            scopes: RwLock::new(HashMap::new()),
            latency: Duration::ZERO,
            failure: RwLock::new(None),
        }
    }

    /// Delay every fetch, to make loading states visible
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn insert_scope(&self, scope_key: impl Into<String>, records: Vec<R>) {
        self.scopes.write().insert(scope_key.into(), records);
    }

    pub fn scope_len(&self, scope_key: &str) -> Option<usize> {
        self.scopes.read().get(scope_key).map(Vec::len)
    }

    /// Copy of every record in a scope
    pub fn snapshot(&self, scope_key: &str) -> Option<Vec<R>> {
        self.scopes.read().get(scope_key).cloned()
    }

    /// Make every fetch fail with `message` until cleared with `None`
    pub fn set_failure(&self, message: Option<String>) {
        *self.failure.write() = message;
    }
}

impl<R: PickRecord> Collaborator<R> for Directory<R> {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse<R>> {
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }

        if let Some(message) = self.failure.read().clone() {
            tracing::warn!(
                kind = R::KIND,
                scope = %request.scope_key,
                "directory failing on purpose"
            );
            return Err(CliniPickError::FetchFailed(message));
        }

        let scopes = self.scopes.read();
        let records = scopes
            .get(&request.scope_key)
            .ok_or_else(|| CliniPickError::UnknownScope(request.scope_key.clone()))?;

        let matched = filter_records(records, request.search.as_deref().unwrap_or(""));

        let mut paginator = Paginator::client(request.limit.unwrap_or(DEFAULT_LIMIT).max(1))?;
        paginator.set_total_items(matched.len());
        paginator.go_to(request.page.unwrap_or(1));

        let page: Vec<R> = paginator
            .slice(&matched)
            .iter()
            .map(|r| (*r).clone())
            .collect();

        tracing::debug!(
            kind = R::KIND,
            scope = %request.scope_key,
            search = ?request.search,
            matched = matched.len(),
            returned = page.len(),
            "directory fetch"
        );

        Ok(FetchResponse {
            records: page,
            pagination: Some(PageInfo::from(paginator.state())),
        })
    }
}
