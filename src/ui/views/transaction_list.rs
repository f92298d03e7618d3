use crate::backend::types::Transaction;
use crate::sync::{Snapshot, ViewMode};
use crate::ui::renderfns::{approval_color, format_amount, format_date, truncate};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// A selectable line of the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row<'a> {
  Transaction(&'a Transaction),
  /// Trailing "View more" entry, present while more pages can be loaded
  ViewMore,
}

/// Rows of a snapshot in display order
pub fn rows(snapshot: &Snapshot) -> Vec<Row<'_>> {
  let mut rows: Vec<Row> = snapshot.transactions.iter().map(Row::Transaction).collect();
  if snapshot.has_more {
    rows.push(Row::ViewMore);
  }
  rows
}

/// The transaction list with its selection
#[derive(Debug, Default)]
pub struct TransactionListView {
  list_state: ListState,
}

impl TransactionListView {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn selected(&self) -> Option<usize> {
    self.list_state.selected()
  }

  /// Move the selection by `delta`, wrapping around `len` rows.
  pub fn move_selection(&mut self, delta: i32, len: usize) {
    if len == 0 {
      self.list_state.select(None);
      return;
    }
    let current = self.list_state.selected().unwrap_or(0).min(len - 1);
    let next = (current as i32 + delta).rem_euclid(len as i32) as usize;
    self.list_state.select(Some(next));
  }

  /// The row under the cursor; the first row until something else is selected
  pub fn selected_row<'a>(&self, snapshot: &'a Snapshot) -> Option<Row<'a>> {
    rows(snapshot)
      .get(self.list_state.selected().unwrap_or(0))
      .copied()
  }

  /// Put the cursor back on the first row, e.g. after the filter changed.
  pub fn reset(&mut self) {
    self.list_state.select(None);
  }

  pub fn render(&mut self, frame: &mut Frame, area: Rect, snapshot: &Snapshot, view_label: &str) {
    let rows = rows(snapshot);
    ensure_valid_selection(&mut self.list_state, rows.len());

    let count = snapshot.transactions.len();
    let title = if snapshot.is_loading {
      format!(" {} ({}, loading...) ", view_label, count)
    } else {
      format!(" {} ({}) ", view_label, count)
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if rows.is_empty() {
      let content = if snapshot.is_loading || snapshot.mode == ViewMode::Initializing {
        "Loading transactions..."
      } else if snapshot.error.is_some() {
        "Failed to load transactions. Press 'r' to retry."
      } else {
        "No transactions."
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = rows
      .iter()
      .map(|row| match row {
        Row::Transaction(transaction) => ListItem::new(transaction_line(transaction)),
        Row::ViewMore => ListItem::new(Line::from(Span::styled(
          "  View more",
          Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
        ))),
      })
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }
}

fn transaction_line(transaction: &Transaction) -> Line<'static> {
  let color = approval_color(transaction.approved);
  let checkbox = if transaction.approved { "[x]" } else { "[ ]" };

  Line::from(vec![
    Span::styled(checkbox, Style::default().fg(color).bold()),
    Span::raw(" "),
    Span::styled(
      format!("{:<28}", truncate(&transaction.merchant, 28)),
      Style::default().fg(Color::White),
    ),
    Span::styled(
      format!("{:>12}", format_amount(transaction.amount)),
      Style::default().fg(Color::Yellow),
    ),
    Span::raw("  "),
    Span::styled(
      format!("{:<20}", truncate(&transaction.employee.full_name(), 20)),
      Style::default().fg(Color::Cyan),
    ),
    Span::styled(format_date(transaction.date), Style::default().fg(Color::DarkGray)),
  ])
}

/// Keep the selection within `len` rows; select the first row if nothing is.
fn ensure_valid_selection(state: &mut ListState, len: usize) {
  if len == 0 {
    state.select(None);
  } else {
    match state.selected() {
      Some(i) if i >= len => state.select(Some(len - 1)),
      None => state.select(Some(0)),
      _ => {}
    }
  }
}
