use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::query::QueryStatus;
use crate::store::UserStore;
use crate::ui::view::ShortcutInfo;

/// Draw the header bar with app name, service host, cache state and
/// shortcuts
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  title: &str,
  store: &UserStore,
  shortcuts: &[ShortcutInfo],
) {
  let mut spans = vec![
    Span::styled(" userdeck ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", title), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
  ];

  spans.push(cache_state(store));

  if store.in_flight() > 0 {
    spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
    spans.push(Span::styled(
      format!(" saving {} ", store.in_flight()),
      Style::default().fg(Color::Magenta),
    ));
  }

  spans.push(Span::raw("  "));

  let mut shortcuts = shortcuts.to_vec();
  shortcuts.sort_by_key(|s| s.priority);
  for (i, shortcut) in shortcuts.iter().enumerate() {
    if i > 0 {
      spans.push(Span::raw("   "));
    }
    // Keys and brackets highlighted, descriptions dimmed
    spans.push(Span::styled(
      format!("<{}>", shortcut.key),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {}", shortcut.label),
      Style::default().fg(Color::DarkGray),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}

fn cache_state(store: &UserStore) -> Span<'static> {
  match store.status() {
    QueryStatus::Idle => Span::styled(" idle ", Style::default().fg(Color::DarkGray)),
    QueryStatus::Loading => Span::styled(" loading ", Style::default().fg(Color::Yellow)),
    QueryStatus::Error(_) => Span::styled(" offline ", Style::default().fg(Color::Red).bold()),
    QueryStatus::Ready => {
      let synced = store
        .synced_at()
        .map(|at| at.format("%H:%M:%S").to_string())
        .unwrap_or_default();
      let marker = if store.is_fetching() { "↻" } else { "✓" };
      Span::styled(
        format!(" {} users {} {} ", store.users().len(), marker, synced),
        Style::default().fg(Color::Yellow).bold(),
      )
    }
  }
}
