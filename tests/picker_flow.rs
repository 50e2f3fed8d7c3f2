use clinipick::{
    ClinicData, Client, Collaborator, ListView, PickerConfig, PickerStatus, RecordId, Resource,
    SearchSelect, SelectionState, Session,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

const TIMEOUT: Duration = Duration::from_secs(5);

fn config() -> PickerConfig {
    PickerConfig {
        quiet_period_ms: 300,
        ..PickerConfig::default()
    }
}

fn client_picker(latency: Duration) -> SearchSelect<Client> {
    let dirs = ClinicData::sample().directories(latency);
    let collaborator: Arc<dyn Collaborator<Client>> = dirs.clients;
    SearchSelect::new(&Session::new("Downtown"), collaborator, &config())
}

fn labels(picker: &SearchSelect<Client>) -> Vec<String> {
    let mut labels: Vec<String> = picker.options().iter().map(|o| o.label.clone()).collect();
    labels.sort();
    labels
}

#[test]
fn typing_burst_settles_into_one_search() {
    let mut picker = client_picker(Duration::ZERO);
    let quiet = config().quiet_period();
    let start = Instant::now();

    picker.open();
    picker.input("j", start);
    picker.input("jo", start + Duration::from_millis(100));
    picker.input("joh", start + Duration::from_millis(200));
    picker.input("john", start + Duration::from_millis(250));

    // Still inside the quiet period of the last keystroke
    assert!(!picker.tick(start + Duration::from_millis(400)));
    assert_eq!(picker.query().debounced, "");

    picker.tick(start + Duration::from_millis(250) + quiet);
    assert!(picker.wait_for_results(TIMEOUT));
    assert_eq!(picker.query().debounced, "john");
    assert_eq!(
        labels(&picker),
        vec!["John Smith", "Johnny Appleseed", "Mary Johnson"]
    );
    assert_eq!(picker.status(), PickerStatus::Results(3));
}

#[test]
fn short_query_never_reaches_the_collaborator() {
    let mut picker = client_picker(Duration::ZERO);
    let now = Instant::now();

    picker.open();
    picker.input(" j ", now);
    picker.tick(now + config().quiet_period());

    assert_eq!(picker.status(), PickerStatus::TypeMore { min_len: 2 });
    assert!(picker.options().is_empty());
}

#[test]
fn newest_search_wins_over_slow_older_one() {
    let mut picker = client_picker(Duration::from_millis(60));
    let quiet = config().quiet_period();
    let start = Instant::now();

    picker.open();
    picker.input("mary", start);
    picker.tick(start + quiet);
    assert_eq!(picker.status(), PickerStatus::Loading);

    // Second search goes out before the first one answers
    let later = start + quiet + Duration::from_millis(10);
    picker.input("ann", later);
    picker.tick(later + quiet);

    assert!(picker.wait_for_results(TIMEOUT));
    assert_eq!(labels(&picker), vec!["Ann Lee"]);

    // The stale "mary" answer must not show up afterwards either
    std::thread::sleep(Duration::from_millis(150));
    picker.tick(later + quiet + Duration::from_millis(1));
    assert_eq!(labels(&picker), vec!["Ann Lee"]);
}

#[test]
fn failed_search_can_be_retried() {
    let dirs = ClinicData::sample().directories(Duration::ZERO);
    let resources = Arc::clone(&dirs.resources);
    let collaborator: Arc<dyn Collaborator<Resource>> = dirs.resources;
    let mut picker = SearchSelect::new(&Session::new("Downtown"), collaborator, &config());
    let now = Instant::now();

    resources.set_failure(Some("503 Service Unavailable".into()));
    picker.open();
    picker.input("room", now);
    picker.tick(now + config().quiet_period());
    picker.wait_for_results(TIMEOUT);
    assert!(matches!(picker.status(), PickerStatus::Error(ref msg) if msg.contains("503")));
    assert!(picker.options().is_empty());

    resources.set_failure(None);
    assert!(picker.retry());
    assert!(picker.wait_for_results(TIMEOUT));
    assert!(!picker.options().is_empty());
}

#[test]
fn selecting_an_option_updates_the_form_once() {
    let mut picker = client_picker(Duration::ZERO);
    let calls: Arc<Mutex<Vec<SelectionState>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    picker.on_select(move |state| sink.lock().push(state.clone()));

    let now = Instant::now();
    picker.open();
    picker.input("ann.lee", now);
    picker.tick(now + config().quiet_period());
    picker.wait_for_results(TIMEOUT);

    assert!(picker.select(0));
    assert!(!picker.is_open());
    assert_eq!(picker.selection().selected_id, Some(RecordId::from(3)));
    assert_eq!(picker.selection().selected_label.as_deref(), Some("Ann Lee"));

    // Reopening keeps the committed value; choosing it again is a no-op
    picker.open();
    picker.input("ann.lee", now);
    picker.tick(now + config().quiet_period());
    picker.wait_for_results(TIMEOUT);
    picker.select(0);
    assert_eq!(calls.lock().len(), 1);

    assert!(picker.clear());
    assert!(picker.selection().is_empty());
    assert_eq!(calls.lock().len(), 2);
}

#[test]
fn server_list_pages_through_the_collaborator() {
    let dirs = ClinicData::sample().directories(Duration::ZERO);
    let mut view: ListView<Client> =
        ListView::remote(&Session::new("Downtown"), dirs.clients, 4).unwrap();
    assert!(view.wait(TIMEOUT));

    let page = view.page();
    assert_eq!(page.total_items, 10);
    assert_eq!(page.total_pages, 3);
    assert_eq!(view.visible().len(), 4);

    assert!(view.go_to(3));
    assert!(view.wait(TIMEOUT));
    assert_eq!(view.page().current_page, 3);
    assert_eq!(view.visible().len(), 2);

    // A new filter starts over at page 1
    view.set_filter("john");
    assert_eq!(view.current_request().and_then(|r| r.page), Some(1));
    assert!(view.wait(TIMEOUT));
    assert_eq!(view.page().total_items, 3);
    assert_eq!(view.page().total_pages, 1);
    assert!(!view.next_page());
}

#[test]
fn client_and_server_lists_agree() {
    let data = ClinicData::sample();
    let dirs = data.directories(Duration::ZERO);
    let session = Session::new("Downtown");

    let records = dirs.clients.snapshot("Downtown").unwrap();
    let mut local = ListView::local(records, 3).unwrap();
    let mut remote: ListView<Client> =
        ListView::remote(&session, dirs.clients.clone(), 3).unwrap();
    remote.wait(TIMEOUT);

    for filter in ["", "john", "mail.test", "zzz"] {
        local.set_filter(filter);
        remote.set_filter(filter);
        remote.wait(TIMEOUT);
        assert_eq!(local.page().total_items, remote.page().total_items, "filter {filter:?}");
        assert_eq!(local.page().total_pages, remote.page().total_pages, "filter {filter:?}");

        let local_ids: Vec<_> = local.visible().iter().map(|c| c.id.clone()).collect();
        let remote_ids: Vec<_> = remote.visible().iter().map(|c| c.id.clone()).collect();
        assert_eq!(local_ids, remote_ids, "filter {filter:?}");
    }
}

#[test]
fn scope_key_comes_from_the_session() {
    let dirs = ClinicData::sample().directories(Duration::ZERO);
    let collaborator: Arc<dyn Collaborator<Client>> = dirs.clients;
    let mut picker = SearchSelect::new(&Session::new("Uptown"), collaborator, &config());
    let now = Instant::now();

    picker.open();
    picker.input("john", now);
    picker.tick(now + config().quiet_period());
    picker.wait_for_results(TIMEOUT);

    assert_eq!(labels(&picker), vec!["John Baker"]);
}
