//! Display formatting utilities for CLI output

use colored::*;

use crate::aggregate::DerivedView;
use crate::summary::DashboardStats;

const TOTAL_WIDTH: usize = 72;
const NUMBER_WIDTH: usize = 14;

/// Group digits in thousands, keeping up to one decimal place
pub fn format_number(value: f64) -> String {
  let rounded = (value * 10.0).round() / 10.0;
  let whole = rounded.trunc().abs() as u64;
  let fraction = ((rounded.abs() - whole as f64) * 10.0).round() as u64;

  let digits = whole.to_string();
  let mut grouped = String::new();
  for (i, ch) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(ch);
  }

  let sign = if rounded < 0.0 { "-" } else { "" };
  if fraction == 0 {
    format!("{sign}{grouped}")
  } else {
    format!("{sign}{grouped}.{fraction}")
  }
}

/// Adoption percentage with one decimal
pub fn format_percent(value: f64) -> String {
  format!("{value:.1}%")
}

fn label_width() -> usize {
  TOTAL_WIDTH - 2 * NUMBER_WIDTH
}

fn truncate(label: &str, max_width: usize) -> String {
  if label.chars().count() <= max_width {
    label.to_string()
  } else {
    let kept: String = label.chars().take(max_width.saturating_sub(3)).collect();
    format!("{kept}...")
  }
}

fn row(label: &str, users: f64, adoption: f64) -> String {
  let width = label_width();
  let label = truncate(label, width);
  let dots = ".".repeat(width - label.chars().count());
  format!(
    "{}{} {:>uw$} {:>aw$}",
    label,
    dots.dimmed(),
    format_number(users).green(),
    format_percent(adoption).cyan(),
    uw = NUMBER_WIDTH - 1,
    aw = NUMBER_WIDTH - 1,
  )
}

/// Header, separator and one line per row, limited to `top` rows when given
pub fn view_lines(view: &DerivedView, top: Option<usize>) -> Vec<String> {
  let limit = top.unwrap_or(usize::MAX);

  let rows: Vec<String> = match view {
    DerivedView::Country(rows) => {
      rows.iter().take(limit).map(|r| row(&r.country, r.total_users, r.average_adoption)).collect()
    }
    DerivedView::Industry(rows) => {
      rows.iter().take(limit).map(|r| row(&r.industry, r.total_users, r.average_adoption)).collect()
    }
    DerivedView::Tool(rows) => {
      rows.iter().take(limit).map(|r| row(&r.tool, r.total_users, r.average_adoption)).collect()
    }
    DerivedView::Year(rows) => rows
      .iter()
      .take(limit)
      .map(|r| row(&r.year.to_string(), r.total_users, r.average_adoption))
      .collect(),
    DerivedView::AgeGroup(rows) => {
      rows.iter().take(limit).map(|r| row(&r.age_group, r.total_users, r.average_adoption)).collect()
    }
    DerivedView::CompanySize(rows) => {
      rows.iter().take(limit).map(|r| row(&r.size, r.total_users, r.average_adoption)).collect()
    }
  };

  let mut lines = Vec::with_capacity(rows.len() + 2);
  lines.push(format!(
    "{:<lw$} {:>uw$} {:>aw$}",
    view.dimension().as_str().to_uppercase(),
    "USERS",
    "ADOPTION",
    lw = label_width(),
    uw = NUMBER_WIDTH - 1,
    aw = NUMBER_WIDTH - 1,
  ));
  lines.push("=".repeat(TOTAL_WIDTH));

  if rows.is_empty() {
    lines.push("(no matching records)".dimmed().to_string());
  } else {
    lines.extend(rows);
  }

  lines
}

pub fn summary_lines(stats: &DashboardStats) -> Vec<String> {
  let entries = [
    ("Total daily active users", format_number(stats.total_users as f64)),
    ("Average adoption", format_percent(stats.average_adoption)),
    ("Countries", stats.total_countries.to_string()),
    ("Industries", stats.total_industries.to_string()),
    ("Top tool", stats.top_tool.clone()),
    ("Top country", stats.top_country.clone()),
  ];

  entries
    .iter()
    .map(|(name, value)| format!("{:<28} {}", format!("{name}:").bold(), value.green()))
    .collect()
}
