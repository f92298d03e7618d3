use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// What the bottom line shows, most urgent first
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine<'a> {
  Error(&'a str),
  Info(&'a str),
  Loading,
  Hint,
}

/// Draw the status bar: errors, notices, loading state or key hints
pub fn draw_footer(frame: &mut Frame, area: Rect, status: StatusLine, summary: &str) {
  let (message, style) = match status {
    StatusLine::Error(msg) => (format!(" Error: {}", msg), Style::default().fg(Color::Red)),
    StatusLine::Info(msg) => (format!(" {}", msg), Style::default().fg(Color::Green)),
    StatusLine::Loading => (" Loading...".to_string(), Style::default().fg(Color::Yellow)),
    StatusLine::Hint => (
      " j/k:nav  space:approve  Enter:select  Ctrl-C:quit".to_string(),
      Style::default().fg(Color::DarkGray),
    ),
  };

  let chunks = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Min(1), Constraint::Length(summary.len() as u16 + 1)])
    .split(area);

  frame.render_widget(Paragraph::new(message).style(style), chunks[0]);
  frame.render_widget(
    Paragraph::new(summary)
      .style(Style::default().fg(Color::Cyan))
      .alignment(Alignment::Right),
    chunks[1],
  );
}
