use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Transient message shown at the right of the footer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
  Info,
  Error,
}

/// Draw the footer bar with route breadcrumb and an optional flash message
pub fn draw_footer(
  frame: &mut Frame,
  area: Rect,
  breadcrumb: &[String],
  flash: Option<(FlashLevel, &str)>,
) {
  let mut spans = Vec::new();

  spans.push(Span::raw(" "));

  for (i, part) in breadcrumb.iter().enumerate() {
    if i > 0 {
      spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
    }

    let style = if i == breadcrumb.len() - 1 {
      // Current view - highlighted
      Style::default().fg(Color::Cyan).bold()
    } else {
      Style::default().fg(Color::White)
    };

    spans.push(Span::styled(part.clone(), style));
  }

  if let Some((level, message)) = flash {
    let style = match level {
      FlashLevel::Info => Style::default().fg(Color::Green),
      FlashLevel::Error => Style::default().fg(Color::Red).bold(),
    };
    spans.push(Span::styled("   │ ", Style::default().fg(Color::DarkGray)));
    spans.push(Span::styled(message.to_string(), style));
  }

  let line = Line::from(spans);
  let paragraph = Paragraph::new(line).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}
