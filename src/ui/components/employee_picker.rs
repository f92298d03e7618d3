use super::KeyResult;
use crate::backend::types::Employee;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

/// Events emitted by the picker that the app needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
  /// An entry was chosen; the "All Employees" entry is [`Employee::empty`]
  Selected(Employee),
  Cancelled,
}

/// Overlay for choosing the employee filter
#[derive(Debug, Clone, Default)]
pub struct EmployeePicker {
  active: bool,
  entries: Vec<Employee>,
  selected: usize,
}

impl EmployeePicker {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Show "All Employees" followed by `employees`, highlighting `current`.
  pub fn show(&mut self, employees: &[Employee], current: Option<&str>) {
    self.entries = std::iter::once(Employee::empty())
      .chain(employees.iter().cloned())
      .collect();
    self.selected = current
      .and_then(|id| self.entries.iter().position(|e| e.id == id))
      .unwrap_or(0);
    self.active = true;
  }

  pub fn hide(&mut self) {
    self.active = false;
    self.entries.clear();
    self.selected = 0;
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<PickerEvent> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc | KeyCode::Char('q') => {
        self.hide();
        KeyResult::Event(PickerEvent::Cancelled)
      }
      KeyCode::Enter | KeyCode::Char(' ') => {
        let event = match self.entries.get(self.selected) {
          Some(employee) => PickerEvent::Selected(employee.clone()),
          None => PickerEvent::Cancelled,
        };
        self.hide();
        KeyResult::Event(event)
      }
      KeyCode::Char('j') | KeyCode::Down => {
        if !self.entries.is_empty() {
          self.selected = (self.selected + 1) % self.entries.len();
        }
        KeyResult::Handled
      }
      KeyCode::Char('k') | KeyCode::Up => {
        if !self.entries.is_empty() {
          self.selected = if self.selected == 0 {
            self.entries.len() - 1
          } else {
            self.selected - 1
          };
        }
        KeyResult::Handled
      }
      _ => KeyResult::Handled,
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active || area.width < 8 || area.height < 5 {
      return;
    }

    let max_name_len = self
      .entries
      .iter()
      .map(|e| e.full_name().chars().count())
      .max()
      .unwrap_or(10);
    let width = (max_name_len as u16 + 6).max(24).min(area.width - 4);
    let height = (self.entries.len() as u16 + 2).max(3).min(area.height - 2);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Filter by employee ");

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let items: Vec<ListItem> = self
      .entries
      .iter()
      .map(|employee| {
        let color = if employee.is_empty() {
          Color::Yellow
        } else {
          Color::Cyan
        };
        ListItem::new(Line::from(Span::styled(
          employee.full_name(),
          Style::default().fg(color),
        )))
      })
      .collect();

    let list =
      List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(self.selected));

    frame.render_stateful_widget(list, inner, &mut state);
  }
}
