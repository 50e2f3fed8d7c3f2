//! Generic searchable select
//!
//! One control type serves every record kind. It is parameterised by the
//! collaborator that answers searches and by the mapping from records to
//! options:
//!
//! ```text
//! keystroke -> Debouncer -> RemoteFetcher (gate, last-request-wins)
//!           -> options -> select() -> SelectionController -> on_select
//! ```
//!
//! The owner drives it from its event loop with [`SearchSelect::tick`].

use crate::collaborator::Collaborator;
use crate::config::PickerConfig;
use crate::debounce::{Debouncer, SearchQuery};
use crate::fetcher::{FetchState, RemoteFetcher};
use crate::options::{
    default_mapper, mark_selected, to_options, OptionDescriptor, OptionMapper, OptionView,
};
use crate::records::PickRecord;
use crate::selection::{SelectionController, SelectionState};
use crate::session::Session;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// What the option area should display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerStatus {
    Idle,
    TypeMore { min_len: usize },
    Loading,
    Error(String),
    NoMatches,
    Results(usize),
}

pub struct SearchSelect<R: PickRecord> {
    scope_key: String,
    debouncer: Debouncer,
    fetcher: RemoteFetcher<R>,
    mapper: OptionMapper<R>,
    options: Vec<OptionDescriptor<R>>,
    selection: SelectionController,
    open: bool,
}

impl<R: PickRecord> SearchSelect<R> {
    pub fn new(
        session: &Session,
        collaborator: Arc<dyn Collaborator<R>>,
        config: &PickerConfig,
    ) -> Self {
        Self {
            scope_key: session.scope_key().to_string(),
            debouncer: Debouncer::new(config.quiet_period()),
            fetcher: RemoteFetcher::new(collaborator, config),
            mapper: default_mapper(),
            options: Vec::new(),
            selection: SelectionController::new(),
            open: false,
        }
    }

    pub fn with_mapper(mut self, mapper: OptionMapper<R>) -> Self {
        self.mapper = mapper;
        self.refresh_options();
        self
    }

    /// Register the form field notified on commit and clear
    pub fn on_select(&mut self, callback: impl FnMut(&SelectionState) + Send + 'static) {
        self.selection.on_select(callback);
    }

    /// Open for a fresh search. The committed selection is kept.
    pub fn open(&mut self) {
        self.open = true;
        self.debouncer.reset();
        self.fetcher.search(&self.scope_key, "");
        self.options.clear();
        tracing::debug!(kind = R::KIND, "picker opened");
    }

    /// Close and drop anything still in flight
    pub fn close(&mut self) {
        self.open = false;
        self.fetcher.invalidate();
        self.options.clear();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Feed the full raw text after a keystroke
    pub fn input(&mut self, raw: impl Into<String>, now: Instant) {
        if !self.open {
            return;
        }
        self.debouncer.push(raw, now);
    }

    /// Advance timers and collect finished fetches. Returns whether the
    /// visible state changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.open {
            return false;
        }

        let mut changed = false;
        if let Some(settled) = self.debouncer.poll(now) {
            self.fetcher.search(&self.scope_key, &settled);
            changed = true;
        }
        if self.fetcher.poll() {
            changed = true;
        }
        if changed {
            self.refresh_options();
        }
        changed
    }

    /// Block until the current fetch resolves; used by one-shot callers
    pub fn wait_for_results(&mut self, timeout: Duration) -> bool {
        let resolved = self.fetcher.wait(timeout);
        self.refresh_options();
        resolved
    }

    /// Re-issue the failed fetch
    pub fn retry(&mut self) -> bool {
        let sent = self.fetcher.retry();
        if sent {
            self.refresh_options();
        }
        sent
    }

    /// Commit the option at `index` and close. Returns whether it existed.
    pub fn select(&mut self, index: usize) -> bool {
        let Some(option) = self.options.get(index) else {
            return false;
        };
        let (id, label) = (option.id.clone(), option.label.clone());
        self.selection.commit(id, label);
        self.close();
        true
    }

    pub fn clear(&mut self) -> bool {
        self.selection.clear()
    }

    fn refresh_options(&mut self) {
        self.options = to_options(self.fetcher.records(), &self.mapper);
    }

    pub fn options(&self) -> &[OptionDescriptor<R>] {
        &self.options
    }

    pub fn rendered(&self) -> Vec<OptionView<'_, R>> {
        mark_selected(&self.options, self.selection.state().selected_id.as_ref())
    }

    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn query(&self) -> &SearchQuery {
        self.debouncer.query()
    }

    pub fn status(&self) -> PickerStatus {
        match self.fetcher.state() {
            FetchState::Idle => PickerStatus::Idle,
            FetchState::TooShort { min_len } => PickerStatus::TypeMore { min_len: *min_len },
            FetchState::Loading => PickerStatus::Loading,
            FetchState::Error(msg) => PickerStatus::Error(msg.clone()),
            FetchState::Success(records) if records.is_empty() => PickerStatus::NoMatches,
            FetchState::Success(records) => PickerStatus::Results(records.len()),
        }
    }

    /// How long the event loop may sleep before this picker needs a tick
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        if !self.open {
            return None;
        }
        self.debouncer.time_until_due(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborator::Directory;
    use crate::records::{Client, RecordId};

    const WAIT: Duration = Duration::from_secs(5);

    fn picker() -> SearchSelect<Client> {
        let dir = Directory::new();
        dir.insert_scope(
            "Downtown",
            vec![
                Client::new(1, "John", "Smith"),
                Client::new(2, "Mary", "Johnson"),
                Client::new(3, "Ann", "Lee"),
            ],
        );
        let config = PickerConfig {
            quiet_period_ms: 100,
            ..PickerConfig::default()
        };
        SearchSelect::<Client>::new(&Session::new("Downtown"), Arc::new(dir), &config)
    }

    fn settle(p: &mut SearchSelect<Client>, raw: &str, at: Instant) {
        p.input(raw, at);
        p.tick(at + Duration::from_millis(100));
        p.wait_for_results(WAIT);
    }

    #[test]
    fn opening_starts_with_type_more() {
        let mut p = picker();
        p.open();
        assert_eq!(p.status(), PickerStatus::TypeMore { min_len: 2 });
        assert!(p.options().is_empty());
    }

    #[test]
    fn settled_query_produces_options() {
        let mut p = picker();
        p.open();
        let start = Instant::now();
        p.input("jo", start);
        assert!(!p.tick(start + Duration::from_millis(50)));

        settle(&mut p, "john", start);
        assert_eq!(p.status(), PickerStatus::Results(2));
        let labels: Vec<_> = p.options().iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["John Smith", "Mary Johnson"]);
    }

    #[test]
    fn no_matches_is_not_an_error() {
        let mut p = picker();
        p.open();
        settle(&mut p, "zzz", Instant::now());
        assert_eq!(p.status(), PickerStatus::NoMatches);
    }

    #[test]
    fn select_commits_label_and_survives_reopen() {
        let mut p = picker();
        p.open();
        settle(&mut p, "ann", Instant::now());

        assert!(p.select(0));
        assert!(!p.is_open());
        assert_eq!(p.selection().selected_label.as_deref(), Some("Ann Lee"));

        p.open();
        assert_eq!(p.query(), &SearchQuery::default());
        assert_eq!(p.selection().selected_id, Some(RecordId::Number(3)));

        settle(&mut p, "lee", Instant::now());
        assert!(p.rendered()[0].is_selected);
    }

    #[test]
    fn custom_mapper_shapes_options_and_committed_label() {
        let mapper: OptionMapper<Client> = Arc::new(|c: &Client| OptionDescriptor {
            id: c.id.clone(),
            label: format!("{}, {}", c.last_name, c.first_name),
            subtitle: format!("#{}", c.id),
            source: c.clone(),
        });
        let mut p = picker().with_mapper(mapper);
        p.open();
        settle(&mut p, "john", Instant::now());

        let labels: Vec<_> = p.options().iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Smith, John", "Johnson, Mary"]);
        assert_eq!(p.options()[1].subtitle, "#2");

        assert!(p.select(1));
        assert_eq!(p.selection().selected_label.as_deref(), Some("Johnson, Mary"));

        p.open();
        settle(&mut p, "mary", Instant::now());
        let rendered = p.rendered();
        assert_eq!(rendered.len(), 1);
        assert!(rendered[0].is_selected);
        assert_eq!(rendered[0].option.label, "Johnson, Mary");
    }

    #[test]
    fn select_out_of_range_does_nothing() {
        let mut p = picker();
        p.open();
        assert!(!p.select(0));
        assert!(p.selection().is_empty());
    }

    #[test]
    fn input_is_ignored_while_closed() {
        let mut p = picker();
        let start = Instant::now();
        p.input("john", start);
        assert!(!p.tick(start + Duration::from_secs(1)));
        assert_eq!(p.time_until_due(start), None);
    }
}
