use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Key hints shown in the header, in display order
const SHORTCUTS: &[(&str, &str)] = &[
  ("space", "approve"),
  ("m", "more"),
  ("f", "filter"),
  ("a", "all"),
  ("r", "refresh"),
  (":", "command"),
  ("q", "quit"),
];

/// Draw the header bar with app name, backend, current view and shortcuts
pub fn draw_header(frame: &mut Frame, area: Rect, title: &str, view_label: &str) {
  let mut spans = vec![
    Span::styled(" txr ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", display_host(title)), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" {} ", view_label),
      Style::default().fg(Color::Yellow).bold(),
    ),
    Span::raw(" "),
  ];

  // Keys highlighted, descriptions dimmed
  for (key, label) in SHORTCUTS {
    spans.push(Span::raw("  "));
    spans.push(Span::styled(format!("<{}>", key), Style::default().fg(Color::Cyan)));
    spans.push(Span::styled(format!(" {}", label), Style::default().fg(Color::DarkGray)));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}

/// Strip scheme and path from a URL-like title
fn display_host(title: &str) -> &str {
  title
    .strip_prefix("https://")
    .or_else(|| title.strip_prefix("http://"))
    .unwrap_or(title)
    .split('/')
    .next()
    .unwrap_or(title)
}
