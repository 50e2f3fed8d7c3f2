//! List page controller: filter text plus pagination over one record kind
//!
//! Local lists filter and slice an in-memory array. Remote lists ask the
//! collaborator for one page at a time through a [`RemoteFetcher`], and trust
//! its totals.

use crate::collaborator::{Collaborator, FetchRequest};
use crate::config::PickerConfig;
use crate::error::Result;
use crate::fetcher::{FetchState, RemoteFetcher};
use crate::options::filter_indices;
use crate::pagination::{PageState, Paginator};
use crate::records::PickRecord;
use crate::session::Session;
use std::sync::Arc;
use std::time::Duration;

enum Backend<R: PickRecord> {
    Local { records: Vec<R>, filtered: Vec<usize> },
    Remote { fetcher: RemoteFetcher<R> },
}

pub struct ListView<R: PickRecord> {
    scope_key: String,
    filter: String,
    paginator: Paginator,
    backend: Backend<R>,
}

impl<R: PickRecord> ListView<R> {
    /// List over records already in memory
    pub fn local(records: Vec<R>, page_size: usize) -> Result<Self> {
        let mut paginator = Paginator::client(page_size)?;
        let filtered: Vec<usize> = (0..records.len()).collect();
        paginator.set_total_items(filtered.len());
        Ok(Self {
            scope_key: String::new(),
            filter: String::new(),
            paginator,
            backend: Backend::Local { records, filtered },
        })
    }

    /// List paged by the collaborator; the first page is requested immediately
    pub fn remote(
        session: &Session,
        collaborator: Arc<dyn Collaborator<R>>,
        page_size: usize,
    ) -> Result<Self> {
        let paginator = Paginator::server(page_size)?;
        let fetcher = RemoteFetcher::new(collaborator, &PickerConfig::default());
        let mut view = Self {
            scope_key: session.scope_key().to_string(),
            filter: String::new(),
            paginator,
            backend: Backend::Remote { fetcher },
        };
        view.request_page();
        Ok(view)
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.backend, Backend::Remote { .. })
    }

    fn request_page(&mut self) {
        if let Backend::Remote { fetcher } = &mut self.backend {
            let request = FetchRequest::new(self.scope_key.as_str())
                .search(self.filter.trim())
                .page(self.paginator.current_page())
                .limit(self.paginator.page_size());
            fetcher.send(request);
        }
    }

    /// Change the filter text. The page goes back to 1 before anything is
    /// fetched. Returns whether the filter changed.
    pub fn set_filter(&mut self, filter: impl Into<String>) -> bool {
        let filter = filter.into();
        if filter == self.filter {
            return false;
        }
        self.filter = filter;
        self.paginator.reset();

        if let Backend::Local { records, filtered } = &mut self.backend {
            *filtered = filter_indices(records, &self.filter);
            self.paginator.set_total_items(filtered.len());
            return true;
        }
        self.paginator.forget_totals();
        self.request_page();
        true
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    fn after_move(&mut self, moved: bool) -> bool {
        if moved {
            self.request_page();
        }
        moved
    }

    pub fn go_to(&mut self, page: usize) -> bool {
        let moved = self.paginator.go_to(page);
        self.after_move(moved)
    }

    pub fn first_page(&mut self) -> bool {
        let moved = self.paginator.first();
        self.after_move(moved)
    }

    pub fn last_page(&mut self) -> bool {
        let moved = self.paginator.last();
        self.after_move(moved)
    }

    pub fn next_page(&mut self) -> bool {
        let moved = self.paginator.next();
        self.after_move(moved)
    }

    pub fn prev_page(&mut self) -> bool {
        let moved = self.paginator.prev();
        self.after_move(moved)
    }

    pub fn set_page_size(&mut self, size: usize) -> Result<()> {
        self.paginator.set_page_size(size)?;
        self.request_page();
        Ok(())
    }

    /// Collect a finished page fetch. Returns whether anything changed.
    pub fn poll(&mut self) -> bool {
        let Backend::Remote { fetcher } = &mut self.backend else {
            return false;
        };
        let changed = fetcher.poll();
        if changed {
            Self::adopt_pagination(&mut self.paginator, fetcher);
        }
        changed
    }

    /// Block until the pending page arrives; used by one-shot callers
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let Backend::Remote { fetcher } = &mut self.backend else {
            return true;
        };
        let resolved = fetcher.wait(timeout);
        Self::adopt_pagination(&mut self.paginator, fetcher);
        resolved
    }

    fn adopt_pagination(paginator: &mut Paginator, fetcher: &RemoteFetcher<R>) {
        if let Some(info) = fetcher.pagination() {
            paginator.apply_page_info(info);
        }
    }

    pub fn retry(&mut self) -> bool {
        match &mut self.backend {
            Backend::Remote { fetcher } => fetcher.retry(),
            Backend::Local { .. } => false,
        }
    }

    /// Rows of the current page
    pub fn visible(&self) -> Vec<&R> {
        match &self.backend {
            Backend::Local { records, filtered } => self
                .paginator
                .slice(filtered)
                .iter()
                .map(|&i| &records[i])
                .collect(),
            Backend::Remote { fetcher } => fetcher.records().iter().collect(),
        }
    }

    pub fn page(&self) -> PageState {
        self.paginator.state()
    }

    pub fn is_loading(&self) -> bool {
        match &self.backend {
            Backend::Remote { fetcher } => fetcher.state().is_loading(),
            Backend::Local { .. } => false,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.backend {
            Backend::Remote { fetcher } => match fetcher.state() {
                FetchState::Error(msg) => Some(msg.as_str()),
                _ => None,
            },
            Backend::Local { .. } => None,
        }
    }

    /// The request the next remote fetch would carry
    pub fn current_request(&self) -> Option<&FetchRequest> {
        match &self.backend {
            Backend::Remote { fetcher } => fetcher.last_request(),
            Backend::Local { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborator::Directory;
    use crate::records::Client;

    const WAIT: Duration = Duration::from_secs(5);

    fn clients(n: i64) -> Vec<Client> {
        (1..=n)
            .map(|i| Client::new(i, if i % 4 == 0 { "John" } else { "Kim" }, "Park"))
            .collect()
    }

    #[test]
    fn local_list_slices_filtered_rows() {
        let mut view = ListView::local(clients(47), 10).unwrap();
        assert_eq!(view.page().total_pages, 5);
        view.go_to(5);
        assert_eq!(view.visible().len(), 7);

        assert!(view.set_filter("john"));
        assert_eq!(view.page().current_page, 1);
        assert_eq!(view.page().total_items, 11);
        assert!(view.visible().iter().all(|c| c.first_name == "John"));
    }

    #[test]
    fn same_filter_keeps_page() {
        let mut view = ListView::local(clients(47), 10).unwrap();
        view.go_to(3);
        assert!(!view.set_filter(""));
        assert_eq!(view.page().current_page, 3);
    }

    fn remote_view() -> ListView<Client> {
        let dir = Directory::new();
        dir.insert_scope("Downtown", clients(47));
        ListView::<Client>::remote(&Session::new("Downtown"), Arc::new(dir), 10).unwrap()
    }

    #[test]
    fn remote_list_trusts_collaborator_totals() {
        let mut view = remote_view();
        assert!(view.is_loading());
        assert!(view.wait(WAIT));
        assert_eq!(view.page().total_pages, 5);
        assert_eq!(view.visible().len(), 10);

        view.go_to(4);
        view.wait(WAIT);
        assert_eq!(view.page().current_page, 4);
        assert_eq!(view.visible()[0].id, crate::records::RecordId::Number(31));
    }

    #[test]
    fn remote_filter_change_requests_page_one() {
        let mut view = remote_view();
        view.wait(WAIT);
        view.go_to(5);
        view.wait(WAIT);

        view.set_filter("john");
        assert_eq!(view.current_request().and_then(|r| r.page), Some(1));
        assert_eq!(
            view.current_request().and_then(|r| r.search.clone()),
            Some("john".to_string())
        );
        view.wait(WAIT);
        assert_eq!(view.page().total_items, 11);
        assert_eq!(view.page().current_page, 1);
    }

    #[test]
    fn paging_waits_for_totals_after_filter_change() {
        let dir = Directory::new().with_latency(Duration::from_millis(200));
        dir.insert_scope("Downtown", clients(10));
        let mut view =
            ListView::<Client>::remote(&Session::new("Downtown"), Arc::new(dir), 4).unwrap();
        view.wait(WAIT);
        assert_eq!(view.page().total_pages, 3);

        // "john" matches 2 of 10, so the old 3-page count no longer applies
        view.set_filter("john");
        assert!(!view.next_page());
        assert!(!view.last_page());
        assert!(!view.go_to(3));
        assert_eq!(view.current_request().and_then(|r| r.page), Some(1));
        assert_eq!(view.page().current_page, 1);

        view.wait(WAIT);
        assert_eq!(view.page().total_items, 2);
        assert_eq!(view.page().total_pages, 1);
    }

    #[test]
    fn first_and_last_page_request_the_bounds() {
        let mut view = remote_view();
        view.wait(WAIT);

        assert!(view.last_page());
        assert_eq!(view.current_request().and_then(|r| r.page), Some(5));
        view.wait(WAIT);
        assert_eq!(view.visible().len(), 7);

        assert!(view.first_page());
        assert_eq!(view.current_request().and_then(|r| r.page), Some(1));
    }

    #[test]
    fn remote_page_size_change_returns_to_first_page() {
        let mut view = remote_view();
        view.wait(WAIT);
        view.go_to(3);
        view.wait(WAIT);

        view.set_page_size(25).unwrap();
        assert_eq!(view.current_request().and_then(|r| r.page), Some(1));
        view.wait(WAIT);
        assert_eq!(view.page().total_pages, 2);
        assert_eq!(view.visible().len(), 25);
    }
}
