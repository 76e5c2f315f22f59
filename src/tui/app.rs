use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info, warn};

use crate::io::config_io;
use crate::io::lock::FileLock;
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::store::{FileStore, Store, StoreError};
use crate::io::watcher::ListWatcher;
use crate::model::{Change, Collection, Config, Record, RecordId};
use crate::ops::record_ops;
use crate::view::ListView;

use super::clipboard::{Clipboard, SystemClipboard};
use super::input::{self, Intent};
use super::render;
use super::theme::Theme;

/// Rows used by the title bar and the status row
pub const CHROME_ROWS: u16 = 2;
/// Screen row of the first list line
pub const LIST_TOP: u16 = 1;
/// How long a TUI save waits for a CLI writer to finish
const SAVE_LOCK_TIMEOUT: Duration = Duration::from_secs(1);

/// What the bottom-line prompt is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    New,
    Edit,
    Due,
    Threshold,
    Recurrence,
}

impl PromptKind {
    pub fn label(self) -> &'static str {
        match self {
            PromptKind::New => "new",
            PromptKind::Edit => "edit",
            PromptKind::Due => "due",
            PromptKind::Threshold => "threshold",
            PromptKind::Recurrence => "recurrence",
        }
    }
}

/// Single-line text entry in the status row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    /// Record the prompt applies to; `None` for a new record
    pub target: Option<RecordId>,
    pub input: String,
}

/// Destructive actions waiting for y/n
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Delete(RecordId),
    Hide(RecordId),
    Archive,
}

/// Current interaction mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Prompt(Prompt),
    Confirm(ConfirmAction),
}

impl Mode {
    /// Record a pending prompt or confirmation applies to
    fn target(&self) -> Option<RecordId> {
        match self {
            Mode::Prompt(prompt) => prompt.target,
            Mode::Confirm(ConfirmAction::Delete(id) | ConfirmAction::Hide(id)) => Some(*id),
            _ => None,
        }
    }

    fn retarget(&mut self, id: RecordId) {
        match self {
            Mode::Prompt(Prompt {
                target: Some(target),
                ..
            }) => *target = id,
            Mode::Confirm(ConfirmAction::Delete(target) | ConfirmAction::Hide(target)) => {
                *target = id
            }
            _ => {}
        }
    }
}

/// Feedback shown in the status row until the next key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Main application state
pub struct App {
    pub store: FileStore,
    pub collection: Collection,
    pub view: ListView,
    pub mode: Mode,
    pub theme: Theme,
    pub status: Option<StatusMessage>,
    pub show_creation_date: bool,
    pub today: NaiveDate,
    pub clipboard: Box<dyn Clipboard>,
    /// Set right before a save; the next watcher event is our own write
    ignore_next_change: bool,
}

impl App {
    pub fn new(
        store: FileStore,
        config: &Config,
        list_height: usize,
        today: NaiveDate,
    ) -> Result<Self, StoreError> {
        let collection = Collection::from_records(store.load()?);
        let mut view = ListView::new(config.ui.page_size, list_height);
        view.rebuild(&collection, today);
        info!(
            path = %store.path().display(),
            count = collection.len(),
            "opened list"
        );
        Ok(App {
            store,
            collection,
            view,
            mode: Mode::Navigate,
            theme: Theme::from_config(&config.ui),
            status: None,
            show_creation_date: config.ui.show_creation_date,
            today,
            clipboard: Box::new(SystemClipboard::default()),
            ignore_next_change: false,
        })
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.view
            .selected_id()
            .and_then(|id| self.collection.get(id))
    }

    pub fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: true,
        });
    }

    /// Persist a mutation and recompute rows, selection and viewport
    pub fn commit(&mut self, change: Change) {
        if !change.is_none() {
            debug!(?change, "committing");
            self.save();
        }
        self.view.rebuild(&self.collection, self.today);
    }

    fn save(&mut self) {
        let _lock = match FileLock::acquire(&self.store.lock_path(), SAVE_LOCK_TIMEOUT) {
            Ok(lock) => lock,
            Err(e) => {
                warn!(error = %e, "save skipped");
                self.set_error(format!("not saved: {}", e));
                return;
            }
        };
        let records: Vec<&Record> = self.collection.iter().collect();
        self.ignore_next_change = true;
        let result = self.store.save(&records);
        if let Err(e) = result {
            self.ignore_next_change = false;
            warn!(error = %e, "save failed");
            self.set_error(e.to_string());
        }
    }

    /// Move completed records to the archive file, then save the list
    pub fn archive_completed(&mut self) {
        let completed: Vec<&Record> = self
            .collection
            .iter()
            .filter(|r| r.is_completed())
            .collect();
        if completed.is_empty() {
            self.set_info("nothing to archive");
            return;
        }
        if let Err(e) = self.store.append_done(&completed) {
            warn!(error = %e, "archive failed");
            self.set_error(e.to_string());
            return;
        }
        let archived = self.collection.take_completed();
        self.set_info(format!(
            "archived {} record{}",
            archived.len(),
            if archived.len() == 1 { "" } else { "s" }
        ));
        self.commit(Change::Replaced);
    }

    /// The watcher saw the list file change
    pub fn on_file_changed(&mut self) {
        if std::mem::take(&mut self.ignore_next_change) {
            debug!("change was our own save");
            return;
        }
        let records = match self.store.load() {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "reload failed");
                self.set_error(e.to_string());
                return;
            }
        };
        // Identities do not survive a reload; follow the selection and any
        // pending prompt or confirmation by content
        let selected = self.selected_record().map(Record::fingerprint);
        let pending = self
            .mode
            .target()
            .and_then(|id| self.collection.get(id))
            .map(Record::fingerprint);
        self.collection.replace_all(records);
        self.view.rebuild(&self.collection, self.today);
        if let Some(id) = selected
            .and_then(|fp| self.collection.find_by_fingerprint(&fp))
            .map(Record::id)
        {
            self.view.select(id);
        }
        if let Some(fp) = pending {
            match self.collection.find_by_fingerprint(&fp).map(Record::id) {
                Some(id) => self.mode.retarget(id),
                None => {
                    self.mode = Mode::Navigate;
                    self.set_info("record changed on disk");
                }
            }
        }
        info!(count = self.collection.len(), "reloaded after external change");
    }

    /// Re-evaluate overdue and threshold state when the date rolls over
    pub fn set_today(&mut self, today: NaiveDate) {
        if today != self.today {
            info!(%today, "date changed");
            self.today = today;
            self.view.rebuild(&self.collection, today);
        }
    }

    pub fn resize(&mut self, terminal_rows: u16) {
        self.view.resize(list_height(terminal_rows));
    }
}

/// List rows available on a terminal this tall
pub fn list_height(terminal_rows: u16) -> usize {
    terminal_rows.saturating_sub(CHROME_ROWS) as usize
}

// ---------------------------------------------------------------------------
// Debounce
// ---------------------------------------------------------------------------

/// Holds the latest value until no new one has arrived for `delay`
#[derive(Debug)]
pub struct Debounced<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debounced<T> {
    pub fn new(delay: Duration) -> Self {
        Debounced {
            delay,
            pending: None,
        }
    }

    /// Replace any pending value and restart the delay
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Time left until the pending value is ready
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, due)| due.saturating_duration_since(now))
    }

    pub fn take_ready(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, due)) if *due <= now => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// UI state
// ---------------------------------------------------------------------------

/// Reselect the record that was selected when the TUI last exited
pub fn restore_ui_state(app: &mut App) {
    let Some(state) = read_ui_state(&app.store.state_path()) else {
        return;
    };
    let id = state
        .selected
        .and_then(|fp| app.collection.find_by_fingerprint(&fp))
        .map(Record::id);
    if let Some(id) = id {
        app.view.select(id);
    }
}

pub fn save_ui_state(app: &App) {
    let state = UiState {
        selected: app.selected_record().map(Record::fingerprint),
    };
    if let Err(e) = write_ui_state(&app.store.state_path(), &state) {
        warn!(error = %e, "could not save UI state");
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the TUI application
pub fn run(file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let config = config_io::load_config(&cwd)?;
    let path = config_io::resolve_list_path(file, &config, &cwd);
    let store = FileStore::new(path, config.done_file.clone());

    let (_, rows) = crossterm::terminal::size()?;
    let mut app = App::new(store, &config, list_height(rows), record_ops::today())?;
    restore_ui_state(&mut app);

    let watcher = if config.watch.enabled {
        match ListWatcher::start(
            app.store.path(),
            Duration::from_millis(config.watch.debounce_ms),
        ) {
            Ok(w) => Some(w),
            Err(e) => {
                warn!(error = %e, "file watching disabled");
                None
            }
        }
    } else {
        None
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let resize_delay = Duration::from_millis(config.ui.resize_debounce_ms);
    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref(), resize_delay);

    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&ListWatcher>,
    resize_delay: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick = Duration::from_millis(250);
    let mut resize = Debounced::new(resize_delay);
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        let timeout = resize
            .remaining(Instant::now())
            .map_or(tick, |left| left.min(tick));
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if input::handle_key(app, key) == Intent::Quit {
                        info!("quit");
                        break;
                    }
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                Event::Resize(_, rows) => resize.push(rows, Instant::now()),
                _ => {}
            }
        }

        if let Some(rows) = resize.take_ready(Instant::now()) {
            debug!(rows, "resized");
            app.resize(rows);
        }
        if watcher.is_some_and(ListWatcher::poll) {
            app.on_file_changed();
        }
        app.set_today(record_ops::today());
    }
    Ok(())
}
