use chrono::NaiveDate;
use ratatui::prelude::Color;
use rust_decimal::Decimal;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Dollar amount with two decimals and thousands separators, e.g. `$1,234.50`
pub fn format_amount(amount: Decimal) -> String {
  let rounded = amount.round_dp(2);
  let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
    "-"
  } else {
    ""
  };
  let text = format!("{:.2}", rounded.abs());
  let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

  let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
  for (i, digit) in whole.chars().enumerate() {
    if i > 0 && (whole.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(digit);
  }

  format!("{}${}.{}", sign, grouped, cents)
}

pub fn format_date(date: NaiveDate) -> String {
  date.format("%b %d, %Y").to_string()
}

pub fn approval_color(approved: bool) -> Color {
  if approved {
    Color::Green
  } else {
    Color::White
  }
}
