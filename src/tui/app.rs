use crate::config::AppConfig;
use crate::data::Directories;
use crate::debounce::Debouncer;
use crate::error::{CliniPickError, Result};
use crate::list_view::ListView;
use crate::picker::{PickerStatus, SearchSelect};
use crate::records::{Client, Order, PickRecord, Resource};
use crate::selection::SelectionState;
use crate::session::Session;
use crate::tui::search::{InputChange, TextInput};
use crate::tui::table::TableState;
use crate::tui::ui;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use parking_lot::Mutex;
use ratatui::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Page sizes cycled with F5/F6
const PAGE_SIZES: [usize; 4] = [5, 10, 20, 50];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    Client,
    Order,
    Resource,
}

impl PickerKind {
    pub fn title(&self) -> &'static str {
        match self {
            PickerKind::Client => " Pick client ",
            PickerKind::Order => " Pick order ",
            PickerKind::Resource => " Pick resource ",
        }
    }
}

/// Values of the appointment form the pickers write into
#[derive(Debug, Clone, Default)]
pub struct AppointmentForm {
    pub client: SelectionState,
    pub order: SelectionState,
    pub resource: SelectionState,
}

/// A picker plus the widgets that edit and browse it
pub struct PickerPane<R: PickRecord> {
    pub picker: SearchSelect<R>,
    pub input: TextInput,
    pub table: TableState,
}

impl<R: PickRecord> PickerPane<R> {
    fn new(picker: SearchSelect<R>) -> Self {
        Self {
            picker,
            input: TextInput::default(),
            table: TableState::default(),
        }
    }

    fn open(&mut self) {
        self.input.clear();
        self.table.reset(0);
        self.picker.open();
    }

    fn tick(&mut self, now: Instant) {
        if self.picker.tick(now) {
            self.table.reset(self.picker.options().len());
        }
    }

    /// Returns true when the pane should close
    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.picker.close();
                return true;
            }
            KeyCode::Enter => {
                if let Some(index) = self.table.selected {
                    return self.picker.select(index);
                }
                return false;
            }
            KeyCode::Up => {
                self.table.select_prev();
                return false;
            }
            KeyCode::Down => {
                self.table.select_next(self.picker.options().len());
                return false;
            }
            KeyCode::Char('r') if ctrl => {
                self.picker.retry();
                return false;
            }
            KeyCode::Char('x') if ctrl => {
                self.picker.clear();
                return false;
            }
            _ => {}
        }

        if self.input.handle_key(key) == InputChange::Edited {
            self.picker.input(self.input.value.clone(), now);
        }
        false
    }

    pub fn status(&self) -> PickerStatus {
        self.picker.status()
    }
}

pub struct App {
    pub session: Session,
    pub clients: ListView<Client>,
    pub list_filter: TextInput,
    pub list_table: TableState,
    filter_gate: Debouncer,

    pub client_pane: PickerPane<Client>,
    pub order_pane: PickerPane<Order>,
    pub resource_pane: PickerPane<Resource>,
    pub active: Option<PickerKind>,

    pub form: Arc<Mutex<AppointmentForm>>,
    pub status_message: String,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        session: Session,
        config: &AppConfig,
        dirs: &Directories,
        remote_list: bool,
    ) -> Result<Self> {
        let clients = if remote_list {
            ListView::<Client>::remote(&session, dirs.clients.clone(), config.page_size)?
        } else {
            let records = dirs
                .clients
                .snapshot(session.scope_key())
                .ok_or_else(|| CliniPickError::UnknownScope(session.scope_key().to_string()))?;
            ListView::local(records, config.page_size)?
        };

        let form = Arc::new(Mutex::new(AppointmentForm::default()));

        let mut client_picker: SearchSelect<Client> =
            SearchSelect::new(&session, dirs.clients.clone(), &config.picker);
        let sink = Arc::clone(&form);
        client_picker.on_select(move |state| sink.lock().client = state.clone());

        let mut order_picker: SearchSelect<Order> =
            SearchSelect::new(&session, dirs.orders.clone(), &config.picker);
        let sink = Arc::clone(&form);
        order_picker.on_select(move |state| sink.lock().order = state.clone());

        let mut resource_picker: SearchSelect<Resource> =
            SearchSelect::new(&session, dirs.resources.clone(), &config.picker);
        let sink = Arc::clone(&form);
        resource_picker.on_select(move |state| sink.lock().resource = state.clone());

        let mut list_table = TableState::default();
        list_table.reset(clients.visible().len());

        Ok(Self {
            session,
            clients,
            list_filter: TextInput::default(),
            list_table,
            filter_gate: Debouncer::new(config.picker.quiet_period()),
            client_pane: PickerPane::new(client_picker),
            order_pane: PickerPane::new(order_picker),
            resource_pane: PickerPane::new(resource_picker),
            active: None,
            form,
            status_message: "Ready".to_string(),
            should_quit: false,
        })
    }

    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> Result<()> {
        let tick_rate = Duration::from_millis(50);
        let mut last_tick = Instant::now();

        loop {
            terminal
                .draw(|frame| ui::draw(frame, self))
                .map_err(|e| CliniPickError::Terminal(e.to_string()))?;

            let now = Instant::now();
            let mut timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if let Some(due) = self.next_due(now) {
                timeout = timeout.min(due);
            }

            if event::poll(timeout).unwrap_or(false) {
                if let Ok(Event::Key(key)) = event::read() {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key, Instant::now());
                    }
                }
            }

            self.tick(Instant::now());
            if last_tick.elapsed() >= tick_rate {
                last_tick = Instant::now();
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    fn next_due(&self, now: Instant) -> Option<Duration> {
        let picker_due = match self.active {
            Some(PickerKind::Client) => self.client_pane.picker.time_until_due(now),
            Some(PickerKind::Order) => self.order_pane.picker.time_until_due(now),
            Some(PickerKind::Resource) => self.resource_pane.picker.time_until_due(now),
            None => None,
        };
        match (picker_due, self.filter_gate.time_until_due(now)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Advance debounce timers and collect background results
    pub fn tick(&mut self, now: Instant) {
        match self.active {
            Some(PickerKind::Client) => self.client_pane.tick(now),
            Some(PickerKind::Order) => self.order_pane.tick(now),
            Some(PickerKind::Resource) => self.resource_pane.tick(now),
            None => {}
        }

        if let Some(filter) = self.filter_gate.poll(now) {
            if self.clients.set_filter(filter) {
                self.list_table.reset(self.clients.visible().len());
            }
        }

        if self.clients.poll() {
            self.list_table.reset(self.clients.visible().len());
            self.status_message = match self.clients.error() {
                Some(err) => format!("\u{26A0} {}  (Ctrl+R to retry)", err),
                None => format!("{} clients", self.clients.page().total_items),
            };
        }
    }

    fn open_picker(&mut self, kind: PickerKind) {
        self.close_picker();
        match kind {
            PickerKind::Client => self.client_pane.open(),
            PickerKind::Order => self.order_pane.open(),
            PickerKind::Resource => self.resource_pane.open(),
        }
        self.active = Some(kind);
    }

    fn close_picker(&mut self) {
        match self.active.take() {
            Some(PickerKind::Client) => self.client_pane.picker.close(),
            Some(PickerKind::Order) => self.order_pane.picker.close(),
            Some(PickerKind::Resource) => self.resource_pane.picker.close(),
            None => {}
        }
    }

    // --- Key handling ---

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::F(2) => return self.open_picker(PickerKind::Client),
            KeyCode::F(3) => return self.open_picker(PickerKind::Order),
            KeyCode::F(4) => return self.open_picker(PickerKind::Resource),
            _ => {}
        }

        if let Some(kind) = self.active {
            let closed = match kind {
                PickerKind::Client => self.client_pane.handle_key(key, now),
                PickerKind::Order => self.order_pane.handle_key(key, now),
                PickerKind::Resource => self.resource_pane.handle_key(key, now),
            };
            if closed {
                self.active = None;
            }
            return;
        }

        self.handle_list_key(key, now);
    }

    fn handle_list_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let moved = match key.code {
            KeyCode::Esc => {
                if self.list_filter.is_empty() {
                    self.should_quit = true;
                } else {
                    self.list_filter.clear();
                    self.filter_gate.push("", now);
                }
                return;
            }
            KeyCode::Up => {
                self.list_table.select_prev();
                return;
            }
            KeyCode::Down => {
                self.list_table.select_next(self.clients.visible().len());
                return;
            }
            KeyCode::PageDown => self.clients.next_page(),
            KeyCode::PageUp => self.clients.prev_page(),
            KeyCode::Home if ctrl => self.clients.first_page(),
            KeyCode::End if ctrl => self.clients.last_page(),
            KeyCode::F(5) => self.step_page_size(false),
            KeyCode::F(6) => self.step_page_size(true),
            KeyCode::Char('r') if ctrl => self.clients.retry(),
            _ => {
                if self.list_filter.handle_key(key) == InputChange::Edited {
                    self.filter_gate.push(self.list_filter.value.clone(), now);
                }
                return;
            }
        };

        if moved {
            self.list_table.reset(self.clients.visible().len());
        }
    }

    fn step_page_size(&mut self, larger: bool) -> bool {
        let current = self.clients.page().page_size;
        let position = PAGE_SIZES.iter().position(|&s| s == current);
        let next = match (position, larger) {
            (Some(i), true) => PAGE_SIZES.get(i + 1).copied(),
            (Some(i), false) => i.checked_sub(1).map(|j| PAGE_SIZES[j]),
            (None, _) => Some(PAGE_SIZES[1]),
        };
        match next {
            Some(size) => match self.clients.set_page_size(size) {
                Ok(()) => {
                    self.status_message = format!("{} rows per page", size);
                    true
                }
                Err(e) => {
                    self.status_message = e.to_string();
                    false
                }
            },
            None => false,
        }
    }

    pub fn form_snapshot(&self) -> AppointmentForm {
        self.form.lock().clone()
    }
}
