use crate::api::{User, UserId};
use crate::query::QueryStatus;
use crate::store::{MutationOutcome, MutationTicket, UserStore};
use crate::ui::components::{ConfirmDialog, ConfirmEvent, FormEvent, KeyResult, UserForm};
use crate::ui::view::ShortcutInfo;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tracing::debug;

/// Events the detail pane reports to its parent view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailEvent {
  /// Leave the detail route, focus back on the list
  Close,
}

/// A mutation this pane issued and is still waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
  ticket: MutationTicket,
  user_id: UserId,
}

/// Right-hand pane for `/:id`: one record plus its edit and delete modals.
///
/// The record is looked up in the store on every render, so a patch after
/// a confirmed update shows up without any refresh here.
#[derive(Debug, Default)]
pub struct UserDetailPane {
  user_id: Option<UserId>,
  confirm: ConfirmDialog,
  form: UserForm,
  pending: Option<Pending>,
}

impl UserDetailPane {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn user_id(&self) -> Option<UserId> {
    self.user_id
  }

  /// Point the pane at another record. Open modals belong to the old one.
  pub fn show(&mut self, user_id: Option<UserId>) {
    if self.user_id != user_id {
      self.confirm.hide();
      self.form.hide();
    }
    self.user_id = user_id;
  }

  /// True while a request for the shown record is in flight
  pub fn is_pending(&self) -> bool {
    match (self.pending, self.user_id) {
      (Some(pending), Some(id)) => pending.user_id == id,
      _ => false,
    }
  }

  pub fn captures_input(&self) -> bool {
    self.confirm.is_active() || self.form.is_active()
  }

  pub fn handle_key(&mut self, key: KeyEvent, store: &mut UserStore) -> KeyResult<DetailEvent> {
    let Some(id) = self.user_id else {
      return KeyResult::NotHandled;
    };

    match self.confirm.handle_key(key) {
      KeyResult::Event(ConfirmEvent::Confirmed) => {
        if self.pending.is_none() {
          let ticket = store.delete(id);
          self.pending = Some(Pending { ticket, user_id: id });
          self.confirm.set_loading(true);
        }
        return KeyResult::Handled;
      }
      KeyResult::Event(ConfirmEvent::Cancelled) | KeyResult::Handled => {
        return KeyResult::Handled;
      }
      KeyResult::NotHandled => {}
    }

    match self.form.handle_key(key) {
      KeyResult::Event(FormEvent::Submitted(fields)) => {
        if self.pending.is_none() {
          let ticket = store.update(id, fields);
          self.pending = Some(Pending { ticket, user_id: id });
          self.form.set_loading(true);
        }
        return KeyResult::Handled;
      }
      KeyResult::Event(FormEvent::Cancelled) | KeyResult::Handled => {
        return KeyResult::Handled;
      }
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('e') => {
        if let Some(user) = store.user(id) {
          self.form.open_edit(user.to_fields());
          if self.is_pending() {
            self.form.set_loading(true);
          }
        }
        KeyResult::Handled
      }
      KeyCode::Char('d') => {
        if let Some(user) = store.user(id) {
          self.confirm.show(
            "Delete user",
            format!("Delete {}? This cannot be undone.", user.full_name()),
          );
          if self.is_pending() {
            self.confirm.set_loading(true);
          }
        }
        KeyResult::Handled
      }
      KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') | KeyCode::Left => {
        KeyResult::Event(DetailEvent::Close)
      }
      _ => KeyResult::NotHandled,
    }
  }

  /// Clear the pending marker and close the modal once our request is done,
  /// whatever its result.
  pub fn on_mutation(&mut self, outcome: &MutationOutcome) {
    if self.pending.map(|p| p.ticket) != Some(outcome.ticket) {
      return;
    }
    debug!(kind = %outcome.kind, ok = outcome.result.is_ok(), "detail request settled");
    self.pending = None;
    self.confirm.hide();
    self.form.hide();
  }

  pub fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("e", "edit").with_priority(40),
      ShortcutInfo::new("d", "delete").with_priority(50),
      ShortcutInfo::new("esc", "list").with_priority(90),
    ]
  }

  pub fn render(&self, frame: &mut Frame, area: Rect, store: &UserStore, focused: bool) {
    let border = if focused { Color::Cyan } else { Color::Blue };
    let block = Block::default()
      .title(" User ")
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(id) = self.user_id else {
      let paragraph = Paragraph::new("Select a user to see details.")
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, inner);
      return;
    };

    // Data already on hand wins over a failed background refresh
    let user = store.user(id);
    let message = match (store.status(), user) {
      (_, Some(_)) => None,
      (QueryStatus::Idle | QueryStatus::Loading, None) => Some((
        "Loading user details...".to_string(),
        Color::DarkGray,
      )),
      (QueryStatus::Error(e), None) => Some((
        format!("Error loading user details: {}\n\nPress 'r' to retry.", e),
        Color::Red,
      )),
      (QueryStatus::Ready, None) => Some(("User not found.".to_string(), Color::DarkGray)),
    };

    if let Some((text, color)) = message {
      let paragraph = Paragraph::new(text).style(Style::default().fg(color));
      frame.render_widget(paragraph, inner);
      return;
    }

    if let Some(user) = user {
      let paragraph = Paragraph::new(self.detail_lines(user)).wrap(Wrap { trim: false });
      frame.render_widget(paragraph, inner);
    }

    self.confirm.render(frame, area);
    self.form.render(frame, area);
  }

  fn detail_lines<'a>(&self, user: &'a User) -> Vec<Line<'a>> {
    let heading = |text: &'static str| {
      Line::from(Span::styled(
        text,
        Style::default().fg(Color::Magenta).bold(),
      ))
    };
    let field = |label: &'static str, value: String| {
      Line::from(vec![
        Span::styled(format!("{:<12}", label), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
      ])
    };

    let mut lines = vec![
      Line::from(Span::styled(
        user.full_name(),
        Style::default().fg(Color::Cyan).bold(),
      )),
      Line::from(Span::styled(
        user.username.clone().unwrap_or_default(),
        Style::default().fg(Color::Gray),
      )),
      Line::from(""),
      heading("Position"),
      Line::from(user.position().unwrap_or("-").to_string()),
    ];

    if let Some(company) = &user.company {
      if !company.name.is_empty() {
        lines.push(field("Company", company.name.clone()));
      }
      if !company.department.is_empty() {
        lines.push(field("Department", company.department.clone()));
      }
    }

    lines.push(Line::from(""));
    lines.push(heading("Contact Information"));
    lines.push(field("Email", user.email.clone()));
    lines.push(field("Phone", user.phone.clone().unwrap_or_default()));
    if let Some(address) = &user.address {
      lines.push(field("Address", address.one_line()));
    }

    let mut personal = Vec::new();
    if let Some(age) = user.age {
      personal.push(field("Age", age.to_string()));
    }
    if let Some(gender) = &user.gender {
      personal.push(field("Gender", gender.clone()));
    }
    if let Some(birth_date) = &user.birth_date {
      personal.push(field("Born", birth_date.clone()));
    }
    if let Some(university) = &user.university {
      personal.push(field("University", university.clone()));
    }
    if !personal.is_empty() {
      lines.push(Line::from(""));
      lines.push(heading("Personal"));
      lines.extend(personal);
    }

    if let Some(image) = &user.image {
      lines.push(Line::from(""));
      lines.push(field("Image", image.clone()));
    }

    lines.push(Line::from(""));
    let actions = if self.is_pending() {
      Line::from(Span::styled("Saving...", Style::default().fg(Color::Yellow)))
    } else {
      Line::from(vec![
        Span::styled("[e]", Style::default().fg(Color::Cyan)),
        Span::styled(" Edit   ", Style::default().fg(Color::DarkGray)),
        Span::styled("[d]", Style::default().fg(Color::Red)),
        Span::styled(" Delete", Style::default().fg(Color::DarkGray)),
      ])
    };
    lines.push(actions);

    lines
  }
}
