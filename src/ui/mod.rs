pub mod components;
pub mod renderfns;
pub mod views;

use crate::app::App;
use ratatui::prelude::*;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Transaction list
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  let snapshot = app.snapshot();
  let view_label = app.view_label(&snapshot);

  renderfns::draw_header(frame, chunks[0], &app.title(), &view_label);
  app
    .list_view_mut()
    .render(frame, chunks[1], &snapshot, &view_label);
  renderfns::draw_footer(
    frame,
    chunks[2],
    app.status_line(&snapshot),
    &app.summary(&snapshot),
  );

  // Overlays last so they sit on top of the list
  app.picker().render_overlay(frame, chunks[1]);
  app.palette().render_overlay(frame, chunks[1]);
}
