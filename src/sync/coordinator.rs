//! The view state machine: decides which feed is active and keeps the two
//! feeds mutually exclusive.

use tracing::{debug, info};

use crate::backend::cached_client::CachedBackend;
use crate::backend::types::{Employee, Transaction};

use super::directory::EmployeeDirectory;
use super::filtered::FilteredFeed;
use super::overlay::{merge, Overrides};
use super::paginated::PaginatedFeed;
use super::plan::{FetchPlan, FetchResult};

/// Which feed the view is showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewMode {
  /// Bootstrap in progress; the paginated feed is shown once it arrives
  #[default]
  Initializing,
  /// The global paginated feed
  AllLoaded,
  /// Transactions of one employee
  Filtered(String),
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
  pub mode: ViewMode,
  pub transactions: Vec<Transaction>,
  pub employees: Option<Vec<Employee>>,
  pub is_loading: bool,
  /// Whether the "load more" affordance is enabled
  pub has_more: bool,
  pub error: Option<String>,
}

/// Owns the directory, both feeds and the override map.
///
/// Every transition returns the [`FetchPlan`] it needs run; results come back
/// through [`ViewCoordinator::apply`].
#[derive(Debug, Default)]
pub struct ViewCoordinator {
  mode: ViewMode,
  directory: EmployeeDirectory,
  paginated: PaginatedFeed,
  filtered: FilteredFeed,
  overrides: Overrides,
}

impl ViewCoordinator {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn mode(&self) -> &ViewMode {
    &self.mode
  }

  pub fn directory(&self) -> &EmployeeDirectory {
    &self.directory
  }

  pub fn paginated(&self) -> &PaginatedFeed {
    &self.paginated
  }

  pub fn filtered(&self) -> &FilteredFeed {
    &self.filtered
  }

  pub fn overrides(&self) -> &Overrides {
    &self.overrides
  }

  /// Initial load. Runs only while the directory is neither loaded nor
  /// loading, so calling it again after a successful bootstrap does nothing.
  pub fn start(&mut self) -> FetchPlan {
    if self.directory.data().is_some() || self.directory.is_loading() {
      return FetchPlan::default();
    }

    info!("bootstrapping transaction view");
    self.bootstrap()
  }

  /// Switch the filter. `None` and the "All Employees" entry both clear it.
  pub fn select_employee(&mut self, employee: Option<&Employee>) -> FetchPlan {
    match employee.filter(|e| !e.is_empty()) {
      None => {
        info!("showing all transactions");
        self.mode = ViewMode::AllLoaded;
        self.bootstrap()
      }
      Some(employee) => self.filter_by(&employee.id),
    }
  }

  /// Reload whatever the current mode shows.
  pub fn reload(&mut self) -> FetchPlan {
    match self.mode.clone() {
      ViewMode::Initializing => self.start(),
      ViewMode::AllLoaded => self.select_employee(None),
      ViewMode::Filtered(employee_id) => self.filter_by(&employee_id),
    }
  }

  /// Next page of the global feed, if the affordance is enabled.
  pub fn request_more(&mut self) -> FetchPlan {
    if !self.load_more_enabled() {
      debug!(mode = ?self.mode, "load more not available");
      return FetchPlan::default();
    }
    self.paginated.load_next_page().into()
  }

  /// Record a local approval edit. Never touches the feeds.
  pub fn toggle_approval(&mut self, transaction_id: &str, approved: bool) {
    debug!(transaction_id, approved, "approval override");
    self.overrides.record(transaction_id, approved);
  }

  pub fn load_more_enabled(&self) -> bool {
    self.mode == ViewMode::AllLoaded && self.paginated.has_more() && !self.paginated.is_loading()
  }

  /// Route a resolved fetch to its feed. Returns `false` if it was stale.
  pub fn apply(&mut self, result: FetchResult) -> bool {
    match result {
      FetchResult::Employees { ticket, outcome } => self.directory.apply(ticket, outcome),
      FetchResult::Page { ticket, outcome } => {
        let applied = self.paginated.apply(ticket, outcome);
        if applied && self.mode == ViewMode::Initializing {
          self.mode = ViewMode::AllLoaded;
        }
        applied
      }
      FetchResult::EmployeeTransactions { ticket, outcome } => self.filtered.apply(ticket, outcome),
    }
  }

  /// Run a plan to completion against `backend`, applying each result.
  pub async fn execute(&mut self, plan: FetchPlan, backend: &CachedBackend) {
    plan
      .run(backend, |result| {
        self.apply(result);
      })
      .await;
  }

  /// Transactions of the active feed, before overrides.
  pub fn active_transactions(&self) -> Option<&[Transaction]> {
    match self.mode {
      ViewMode::Filtered(_) => self.filtered.transactions(),
      ViewMode::Initializing | ViewMode::AllLoaded => self.paginated.transactions(),
    }
  }

  /// The list to render.
  pub fn transactions(&self) -> Vec<Transaction> {
    merge(self.active_transactions(), &self.overrides)
  }

  pub fn is_loading(&self) -> bool {
    self.directory.is_loading() || self.paginated.is_loading() || self.filtered.is_loading()
  }

  /// Most relevant error: the active feed's, then the directory's.
  pub fn error(&self) -> Option<&str> {
    let feed_error = match self.mode {
      ViewMode::Filtered(_) => self.filtered.error(),
      ViewMode::Initializing | ViewMode::AllLoaded => self.paginated.error(),
    };
    feed_error.or_else(|| self.directory.error())
  }

  pub fn snapshot(&self) -> Snapshot {
    Snapshot {
      mode: self.mode.clone(),
      transactions: self.transactions(),
      employees: self.directory.data().map(<[Employee]>::to_vec),
      is_loading: self.is_loading(),
      has_more: self.load_more_enabled(),
      error: self.error().map(String::from),
    }
  }

  /// Directory fetch followed by the first page, both feeds reset first.
  fn bootstrap(&mut self) -> FetchPlan {
    self.filtered.invalidate();
    self.paginated.invalidate();

    let mut plan = FetchPlan::default();
    plan.push(self.directory.fetch_all());
    if let Some(step) = self.paginated.load_next_page() {
      plan.push(step);
    }
    plan
  }

  fn filter_by(&mut self, employee_id: &str) -> FetchPlan {
    info!(employee_id, "filtering transactions by employee");
    self.paginated.invalidate();
    self.filtered.invalidate();
    self.mode = ViewMode::Filtered(employee_id.to_string());
    self.filtered.load_for_employee(employee_id).into()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::testing::{employee, page, transaction, ScriptedBackend};
  use crate::sync::plan::FetchStep;
  use std::sync::Arc;

  fn ids(transactions: &[Transaction]) -> Vec<&str> {
    transactions.iter().map(|t| t.id.as_str()).collect()
  }

  /// Directory [E1, E2], pages 0 and 1, employee E1 owning T1 and T4.
  fn scripted() -> Arc<ScriptedBackend> {
    Arc::new(
      ScriptedBackend::new()
        .with_employees(vec![employee("e1"), employee("e2")])
        .with_page(0, page(&["t1", "t2"], Some(1)))
        .with_page(1, page(&["t3"], None))
        .with_employee_transactions(
          "e1",
          vec![transaction("t1", "e1", false), transaction("t4", "e1", false)],
        ),
    )
  }

  async fn bootstrapped(backend: &CachedBackend) -> ViewCoordinator {
    let mut coordinator = ViewCoordinator::new();
    let plan = coordinator.start();
    coordinator.execute(plan, backend).await;
    coordinator
  }

  #[tokio::test]
  async fn test_scenario_a_bootstrap() {
    let scripted = scripted();
    let backend = CachedBackend::new(scripted.clone());

    let mut coordinator = ViewCoordinator::new();
    assert_eq!(coordinator.mode(), &ViewMode::Initializing);
    assert!(coordinator.directory().data().is_none());

    let plan = coordinator.start();
    assert_eq!(plan.steps().len(), 2);
    assert!(coordinator.is_loading());
    coordinator.execute(plan, &backend).await;

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.mode, ViewMode::AllLoaded);
    assert_eq!(ids(&snapshot.transactions), vec!["t1", "t2"]);
    assert_eq!(snapshot.employees.unwrap().len(), 2);
    assert!(snapshot.has_more);
    assert!(!snapshot.is_loading);

    // Directory resolved before the first page was requested
    assert_eq!(
      scripted.calls(),
      vec!["employees".to_string(), "paginatedTransactions:0".to_string()]
    );
  }

  #[tokio::test]
  async fn test_start_runs_once() {
    let scripted = scripted();
    let backend = CachedBackend::new(scripted.clone());
    let mut coordinator = bootstrapped(&backend).await;

    assert!(coordinator.start().is_empty());
  }

  #[tokio::test]
  async fn test_start_while_directory_loading_is_noop() {
    let mut coordinator = ViewCoordinator::new();
    let plan = coordinator.start();
    assert!(!plan.is_empty());
    assert!(coordinator.start().is_empty());
  }

  #[tokio::test]
  async fn test_scenario_b_load_more_until_exhausted() {
    let scripted = scripted();
    let backend = CachedBackend::new(scripted.clone());
    let mut coordinator = bootstrapped(&backend).await;

    let plan = coordinator.request_more();
    assert_eq!(plan.steps().len(), 1);
    coordinator.execute(plan, &backend).await;

    let snapshot = coordinator.snapshot();
    assert_eq!(ids(&snapshot.transactions), vec!["t1", "t2", "t3"]);
    assert!(!snapshot.has_more);

    // Exhausted: further requests issue nothing and change nothing
    assert!(coordinator.request_more().is_empty());
    assert_eq!(
      ids(&coordinator.transactions()),
      vec!["t1", "t2", "t3"]
    );
    assert_eq!(scripted.call_count("paginatedTransactions"), 2);
  }

  #[tokio::test]
  async fn test_load_more_disabled_while_loading() {
    let scripted = scripted();
    let backend = CachedBackend::new(scripted.clone());
    let mut coordinator = bootstrapped(&backend).await;

    let in_flight = coordinator.request_more();
    assert!(!in_flight.is_empty());
    assert!(!coordinator.load_more_enabled());
    assert!(coordinator.request_more().is_empty());

    coordinator.execute(in_flight, &backend).await;
    assert_eq!(coordinator.transactions().len(), 3);
  }

  #[tokio::test]
  async fn test_scenario_c_override_does_not_touch_feed() {
    let scripted = scripted();
    let backend = CachedBackend::new(scripted.clone());
    let mut coordinator = bootstrapped(&backend).await;

    coordinator.toggle_approval("t1", true);

    let feed_t1 = &coordinator.paginated().transactions().unwrap()[0];
    assert_eq!(feed_t1.id, "t1");
    assert!(!feed_t1.approved);

    let rendered = coordinator.transactions();
    assert!(rendered[0].approved);
    assert!(!rendered[1].approved);
  }

  #[tokio::test]
  async fn test_scenario_d_filter_keeps_override() {
    let scripted = scripted();
    let backend = CachedBackend::new(scripted.clone());
    let mut coordinator = bootstrapped(&backend).await;
    coordinator.toggle_approval("t1", true);

    let plan = coordinator.select_employee(Some(&employee("e1")));
    assert_eq!(coordinator.mode(), &ViewMode::Filtered("e1".to_string()));
    assert!(coordinator.paginated().transactions().is_none());
    // Nothing from the paginated feed leaks in while the filter loads
    assert!(coordinator.transactions().is_empty());
    assert!(!coordinator.load_more_enabled());

    coordinator.execute(plan, &backend).await;

    let rendered = coordinator.transactions();
    assert_eq!(ids(&rendered), vec!["t1", "t4"]);
    assert!(rendered[0].approved);
    assert!(!rendered[1].approved);
    assert!(!coordinator.snapshot().has_more);
  }

  #[tokio::test]
  async fn test_scenario_e_clear_filter_refetches_from_first_page() {
    let scripted = scripted();
    let backend = CachedBackend::new(scripted.clone());
    let mut coordinator = bootstrapped(&backend).await;
    let plan = coordinator.request_more();
    coordinator.execute(plan, &backend).await;

    let plan = coordinator.select_employee(Some(&employee("e1")));
    coordinator.execute(plan, &backend).await;

    let plan = coordinator.select_employee(None);
    assert_eq!(coordinator.mode(), &ViewMode::AllLoaded);
    assert!(coordinator.filtered().transactions().is_none());
    match plan.steps() {
      [FetchStep::Employees { .. }, FetchStep::Page { cursor: 0, .. }] => {}
      other => panic!("unexpected plan {:?}", other),
    }
    coordinator.execute(plan, &backend).await;

    let snapshot = coordinator.snapshot();
    assert_eq!(ids(&snapshot.transactions), vec!["t1", "t2"]);
    assert!(snapshot.has_more);

    let plan = coordinator.request_more();
    coordinator.execute(plan, &backend).await;
    assert_eq!(ids(&coordinator.transactions()), vec!["t1", "t2", "t3"]);
  }

  #[tokio::test]
  async fn test_empty_employee_clears_filter() {
    let scripted = scripted();
    let backend = CachedBackend::new(scripted.clone());
    let mut coordinator = bootstrapped(&backend).await;

    let plan = coordinator.select_employee(Some(&employee("e1")));
    coordinator.execute(plan, &backend).await;

    let plan = coordinator.select_employee(Some(&Employee::empty()));
    coordinator.execute(plan, &backend).await;
    assert_eq!(coordinator.mode(), &ViewMode::AllLoaded);
    assert_eq!(ids(&coordinator.transactions()), vec!["t1", "t2"]);
  }

  #[tokio::test]
  async fn test_switching_employees_refetches() {
    let scripted = Arc::new(
      ScriptedBackend::new()
        .with_employees(vec![employee("e1"), employee("e2")])
        .with_page(0, page(&["t1"], None))
        .with_employee_transactions("e1", vec![transaction("t1", "e1", false)])
        .with_employee_transactions("e2", vec![transaction("t5", "e2", true)]),
    );
    let backend = CachedBackend::new(scripted.clone());
    let mut coordinator = bootstrapped(&backend).await;

    let plan = coordinator.select_employee(Some(&employee("e1")));
    coordinator.execute(plan, &backend).await;

    let plan = coordinator.select_employee(Some(&employee("e2")));
    assert!(coordinator.transactions().is_empty());
    coordinator.execute(plan, &backend).await;

    assert_eq!(ids(&coordinator.transactions()), vec!["t5"]);
    assert_eq!(coordinator.filtered().employee_id(), Some("e2"));
  }

  #[tokio::test]
  async fn test_stale_page_after_filter_is_dropped() {
    let scripted = scripted();
    let backend = CachedBackend::new(scripted.clone());
    let mut coordinator = bootstrapped(&backend).await;

    // A page is in flight when the user picks an employee
    let stale = coordinator.request_more();
    let plan = coordinator.select_employee(Some(&employee("e1")));
    coordinator.execute(plan, &backend).await;

    let mut results = Vec::new();
    stale.run(&backend, |result| results.push(result)).await;
    for result in results {
      assert!(!coordinator.apply(result));
    }

    assert_eq!(ids(&coordinator.transactions()), vec!["t1", "t4"]);
    assert!(coordinator.paginated().transactions().is_none());
  }

  #[tokio::test]
  async fn test_stale_filter_result_after_clear_is_dropped() {
    let scripted = scripted();
    let backend = CachedBackend::new(scripted.clone());
    let mut coordinator = bootstrapped(&backend).await;

    let stale = coordinator.select_employee(Some(&employee("e1")));
    let plan = coordinator.select_employee(None);
    coordinator.execute(plan, &backend).await;

    let mut results = Vec::new();
    stale.run(&backend, |result| results.push(result)).await;
    for result in results {
      assert!(!coordinator.apply(result));
    }

    assert_eq!(coordinator.mode(), &ViewMode::AllLoaded);
    assert_eq!(ids(&coordinator.transactions()), vec!["t1", "t2"]);
  }

  #[tokio::test]
  async fn test_page_failure_surfaces_error() {
    let scripted = Arc::new(
      ScriptedBackend::new()
        .with_employees(vec![employee("e1")])
        .with_page(0, page(&["t1"], Some(1)))
        .failing("paginatedTransactions:1"),
    );
    let backend = CachedBackend::new(scripted.clone());
    let mut coordinator = bootstrapped(&backend).await;

    let plan = coordinator.request_more();
    coordinator.execute(plan, &backend).await;

    let snapshot = coordinator.snapshot();
    assert!(snapshot.error.unwrap().contains("paginatedTransactions:1"));
    assert_eq!(ids(&snapshot.transactions), vec!["t1"]);
    // Still possible to retry the same page
    assert!(snapshot.has_more);
  }

  #[tokio::test]
  async fn test_missing_directory_allows_restart() {
    let scripted = Arc::new(ScriptedBackend::new().with_page(0, page(&["t1"], None)));
    let backend = CachedBackend::new(scripted.clone());
    let mut coordinator = bootstrapped(&backend).await;

    assert!(coordinator.directory().data().is_none());
    assert_eq!(ids(&coordinator.transactions()), vec!["t1"]);
    assert!(!coordinator.start().is_empty());
  }

  #[tokio::test]
  async fn test_reload_filtered_refetches_same_employee() {
    let scripted = scripted();
    let backend = CachedBackend::new(scripted.clone());
    let mut coordinator = bootstrapped(&backend).await;

    let plan = coordinator.select_employee(Some(&employee("e1")));
    coordinator.execute(plan, &backend).await;

    let plan = coordinator.reload();
    match plan.steps() {
      [FetchStep::EmployeeTransactions { employee_id, .. }] => assert_eq!(employee_id, "e1"),
      other => panic!("unexpected plan {:?}", other),
    }
    coordinator.execute(plan, &backend).await;
    assert_eq!(ids(&coordinator.transactions()), vec!["t1", "t4"]);
  }

  #[tokio::test]
  async fn test_overrides_survive_mode_switches() {
    let scripted = scripted();
    let backend = CachedBackend::new(scripted.clone());
    let mut coordinator = bootstrapped(&backend).await;
    coordinator.toggle_approval("t2", true);

    let plan = coordinator.select_employee(Some(&employee("e1")));
    coordinator.execute(plan, &backend).await;
    let plan = coordinator.select_employee(None);
    coordinator.execute(plan, &backend).await;

    assert!(coordinator.transactions()[1].approved);
    assert_eq!(coordinator.overrides().len(), 1);
  }
}
