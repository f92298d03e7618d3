use crate::backend::cached_client::CachedBackend;
use crate::backend::types::Employee;
use crate::commands::Action;
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::sync::{ApprovalWriter, FetchPlan, Snapshot, ViewCoordinator, ViewMode, WriteResult};
use crate::ui;
use crate::ui::components::{CommandEvent, CommandPalette, EmployeePicker, KeyResult, PickerEvent};
use crate::ui::renderfns::StatusLine;
use crate::ui::views::{Row, TransactionListView};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::Backend as TerminalBackend;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Transient message for the status bar, cleared on the next key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
  Info(String),
  Error(String),
}

/// Main application state
pub struct App {
  /// Directory, feeds and overrides
  coordinator: ViewCoordinator,

  /// Cached backend shared with background tasks
  backend: CachedBackend,

  /// Ordered approval writes, started on the first edit
  approvals: Option<ApprovalWriter>,

  /// Application configuration
  config: Config,

  list: TransactionListView,
  palette: CommandPalette,
  picker: EmployeePicker,
  notice: Option<Notice>,

  /// Event sender for async tasks
  event_tx: mpsc::UnboundedSender<Event>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: Config) -> Result<Self> {
    let backend = CachedBackend::from_config(&config)?;
    Ok(Self::with_backend(config, backend))
  }

  pub fn with_backend(config: Config, backend: CachedBackend) -> Self {
    // Replaced by the event handler's sender in `run`
    let (tx, _rx) = mpsc::unbounded_channel();

    Self {
      coordinator: ViewCoordinator::new(),
      backend,
      approvals: None,
      config,
      list: TransactionListView::new(),
      palette: CommandPalette::new(),
      picker: EmployeePicker::new(),
      notice: None,
      event_tx: tx,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut events = EventHandler::new(Duration::from_millis(self.config.ui.tick_ms));
    self.event_tx = events.sender();
    self.approvals = None;

    info!(backend = %self.backend.label(), "starting");
    self.start();

    let result = self.event_loop(&mut terminal, &mut events).await;

    // Cleanup terminal, even if the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop<B: TerminalBackend>(
    &mut self,
    terminal: &mut Terminal<B>,
    events: &mut EventHandler,
  ) -> Result<()> {
    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }
    Ok(())
  }

  /// Initial load: employee directory, then the first page.
  pub fn start(&mut self) {
    let plan = self.coordinator.start();
    self.dispatch(plan);
  }

  /// Run a plan in the background; each result comes back as [`Event::Fetch`].
  fn dispatch(&self, plan: FetchPlan) {
    if plan.is_empty() {
      return;
    }

    let backend = self.backend.clone();
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      plan
        .run(&backend, |result| {
          let _ = tx.send(Event::Fetch(result));
        })
        .await;
    });
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {} // UI refresh happens automatically
      Event::Fetch(result) => {
        if !self.coordinator.apply(result) {
          debug!("ignored stale fetch result");
        }
      }
      Event::Approval(WriteResult {
        transaction_id,
        approved,
        result,
      }) => match result {
        Ok(()) => debug!(transaction_id = %transaction_id, approved, "approval saved"),
        Err(e) => self.approval_failed(&transaction_id, &e),
      },
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    // Overlays get the key first
    match self.palette.handle_key(key) {
      KeyResult::Event(event) => return self.handle_command(event),
      KeyResult::Handled => return,
      KeyResult::NotHandled => {}
    }

    match self.picker.handle_key(key) {
      KeyResult::Event(PickerEvent::Selected(employee)) => return self.select_employee(employee),
      KeyResult::Event(PickerEvent::Cancelled) | KeyResult::Handled => return,
      KeyResult::NotHandled => {}
    }

    self.handle_normal_key(key);
  }

  fn handle_normal_key(&mut self, key: KeyEvent) {
    self.notice = None;

    match key.code {
      // Quit
      KeyCode::Char('q') => self.should_quit = true,
      KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.should_quit = true;
      }

      // Navigation
      KeyCode::Up | KeyCode::Char('k') => {
        let len = self.row_count();
        self.list.move_selection(-1, len);
      }
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.row_count();
        self.list.move_selection(1, len);
      }

      // Actions
      KeyCode::Char(' ') | KeyCode::Enter => self.activate_selected(),
      KeyCode::Char('m') => self.load_more(),
      KeyCode::Char('f') => self.open_picker(),
      KeyCode::Char('a') => self.select_employee(Employee::empty()),
      KeyCode::Char('r') => self.refresh(),
      KeyCode::Char(':') => self.palette.activate(),

      _ => {}
    }
  }

  fn handle_command(&mut self, event: CommandEvent) {
    match event {
      CommandEvent::Submitted(action) => {
        debug!(?action, "command");
        match action {
          Action::ShowAll => self.select_employee(Employee::empty()),
          Action::PickEmployee => self.open_picker(),
          Action::LoadMore => self.load_more(),
          Action::Refresh => self.refresh(),
          Action::Quit => self.should_quit = true,
        }
      }
      CommandEvent::Unknown(input) => {
        self.notice = Some(Notice::Error(format!("Unknown command: {}", input)));
      }
      CommandEvent::Cancelled => {}
    }
  }

  /// Rows in the list, including the "View more" row.
  fn row_count(&self) -> usize {
    let transactions = self
      .coordinator
      .active_transactions()
      .map(|t| t.len())
      .unwrap_or(0);
    transactions + usize::from(self.coordinator.load_more_enabled())
  }

  /// Space/Enter: toggle the selected transaction, or load more on "View more".
  fn activate_selected(&mut self) {
    let snapshot = self.coordinator.snapshot();
    let toggle = match self.list.selected_row(&snapshot) {
      Some(Row::Transaction(transaction)) => Some((transaction.id.clone(), !transaction.approved)),
      Some(Row::ViewMore) => {
        self.load_more();
        None
      }
      None => None,
    };

    if let Some((transaction_id, approved)) = toggle {
      self.set_approval(transaction_id, approved);
    }
  }

  /// Record the override locally and queue it for the backend.
  fn set_approval(&mut self, transaction_id: String, approved: bool) {
    self.coordinator.toggle_approval(&transaction_id, approved);

    let backend = &self.backend;
    let event_tx = &self.event_tx;
    let writer = self.approvals.get_or_insert_with(|| {
      let tx = event_tx.clone();
      ApprovalWriter::spawn(backend.clone(), move |result| {
        let _ = tx.send(Event::Approval(result));
      })
    });

    if !writer.submit(&transaction_id, approved) {
      self.approval_failed(&transaction_id, "approval writer stopped");
    }
  }

  fn approval_failed(&mut self, transaction_id: &str, error: &str) {
    warn!(transaction_id = %transaction_id, error = %error, "failed to save approval");
    self.notice = Some(Notice::Error(format!(
      "Failed to save approval for {}: {}",
      transaction_id, error
    )));
  }

  fn load_more(&mut self) {
    let plan = self.coordinator.request_more();
    if plan.is_empty() {
      let reason = match self.coordinator.mode() {
        ViewMode::Filtered(_) => "Paging is only available when showing all employees",
        _ if self.coordinator.paginated().is_loading() => "Already loading",
        _ => "No more transactions",
      };
      self.notice = Some(Notice::Info(reason.to_string()));
      return;
    }
    self.dispatch(plan);
  }

  fn open_picker(&mut self) {
    let current = match self.coordinator.mode() {
      ViewMode::Filtered(id) => Some(id.as_str()),
      _ => None,
    };

    match self.coordinator.directory().data() {
      Some(employees) => self.picker.show(employees, current),
      None => self.notice = Some(Notice::Info("Employees are still loading".to_string())),
    }
  }

  /// Switch the filter; the "All Employees" entry clears it.
  fn select_employee(&mut self, employee: Employee) {
    let plan = self.coordinator.select_employee(Some(&employee));
    self.list.reset();
    self.dispatch(plan);
  }

  /// Drop every cached response and reload the current view.
  fn refresh(&mut self) {
    match self.backend.invalidate_all() {
      Ok(removed) => debug!(removed, "cache cleared"),
      Err(e) => warn!(error = %e, "failed to clear cache"),
    }
    let plan = self.coordinator.reload();
    self.dispatch(plan);
  }

  // Accessors for UI rendering
  pub fn snapshot(&self) -> Snapshot {
    self.coordinator.snapshot()
  }

  pub fn title(&self) -> String {
    self.config.title_or(&self.backend.label()).to_string()
  }

  /// Name of what the list shows
  pub fn view_label(&self, snapshot: &Snapshot) -> String {
    match &snapshot.mode {
      ViewMode::Initializing => "Transactions".to_string(),
      ViewMode::AllLoaded => Employee::empty().full_name(),
      ViewMode::Filtered(id) => snapshot
        .employees
        .as_deref()
        .and_then(|employees| employees.iter().find(|e| &e.id == id))
        .map(Employee::full_name)
        .unwrap_or_else(|| id.clone()),
    }
  }

  pub fn status_line<'a>(&'a self, snapshot: &'a Snapshot) -> StatusLine<'a> {
    match (&self.notice, &snapshot.error) {
      (Some(Notice::Error(msg)), _) => StatusLine::Error(msg),
      (_, Some(msg)) => StatusLine::Error(msg),
      (Some(Notice::Info(msg)), None) => StatusLine::Info(msg),
      (None, None) if snapshot.is_loading => StatusLine::Loading,
      (None, None) => StatusLine::Hint,
    }
  }

  /// Right-hand side of the status bar
  pub fn summary(&self, snapshot: &Snapshot) -> String {
    let edited = self.coordinator.overrides().len();
    if edited == 0 {
      format!("{} shown ", snapshot.transactions.len())
    } else {
      format!("{} shown | {} edited ", snapshot.transactions.len(), edited)
    }
  }

  pub fn list_view_mut(&mut self) -> &mut TransactionListView {
    &mut self.list
  }

  pub fn palette(&self) -> &CommandPalette {
    &self.palette
  }

  pub fn picker(&self) -> &EmployeePicker {
    &self.picker
  }

  pub fn notice(&self) -> Option<&Notice> {
    self.notice.as_ref()
  }

  pub fn should_quit(&self) -> bool {
    self.should_quit
  }
}
