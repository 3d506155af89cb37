use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::api::UserFields;
use crate::ui::renderfns::centered_rect;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

const FIELD_LABELS: [&str; 3] = ["First name", "Last name", "Email"];
const FIRST_NAME: usize = 0;
const LAST_NAME: usize = 1;
const EMAIL: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
  /// Valid form submitted
  Submitted(UserFields),
  Cancelled,
}

/// Validation messages per field, in display order
pub type FieldErrors = [Option<&'static str>; 3];

/// Validate the raw field values.
pub fn validate(first_name: &str, last_name: &str, email: &str) -> FieldErrors {
  [
    (first_name.trim().chars().count() < 3).then_some("First name must be at least 3 characters"),
    (last_name.trim().chars().count() < 3).then_some("Last name must be at least 3 characters"),
    (!is_valid_email(email.trim())).then_some("Invalid email format"),
  ]
}

/// `local@domain.tld`: one `@`, no whitespace, a dot inside the domain.
fn is_valid_email(email: &str) -> bool {
  if email.chars().any(char::is_whitespace) {
    return false;
  }
  let Some((local, domain)) = email.split_once('@') else {
    return false;
  };
  if local.is_empty() || domain.contains('@') {
    return false;
  }
  match domain.rsplit_once('.') {
    Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !host.ends_with('.'),
    None => false,
  }
}

/// Modal form for creating or editing a user
#[derive(Debug, Clone, Default)]
pub struct UserForm {
  active: bool,
  loading: bool,
  title: String,
  inputs: [TextInput; 3],
  touched: [bool; 3],
  focused: usize,
}

impl UserForm {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Open an empty form
  pub fn open_create(&mut self) {
    self.open("Create", UserFields::default());
  }

  /// Open pre-filled with the current values
  pub fn open_edit(&mut self, current: UserFields) {
    self.open("Update", current);
  }

  fn open(&mut self, title: &str, values: UserFields) {
    let value = |v: Option<String>| TextInput::with_value(v.as_deref().unwrap_or(""));
    *self = Self {
      active: true,
      loading: false,
      title: title.to_string(),
      inputs: [
        value(values.first_name),
        value(values.last_name),
        value(values.email),
      ],
      touched: [false; 3],
      focused: FIRST_NAME,
    };
  }

  pub fn hide(&mut self) {
    self.active = false;
    self.loading = false;
  }

  pub fn set_loading(&mut self, loading: bool) {
    self.loading = loading;
  }

  pub fn errors(&self) -> FieldErrors {
    validate(
      self.inputs[FIRST_NAME].value(),
      self.inputs[LAST_NAME].value(),
      self.inputs[EMAIL].value(),
    )
  }

  pub fn is_valid(&self) -> bool {
    self.errors().iter().all(Option::is_none)
  }

  /// Trimmed values as a request body
  pub fn fields(&self) -> UserFields {
    let value = |i: usize| Some(self.inputs[i].value().trim().to_string());
    UserFields {
      first_name: value(FIRST_NAME),
      last_name: value(LAST_NAME),
      email: value(EMAIL),
    }
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<FormEvent> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc => {
        self.hide();
        return KeyResult::Event(FormEvent::Cancelled);
      }
      KeyCode::Tab | KeyCode::Down => {
        self.touched[self.focused] = true;
        self.focused = (self.focused + 1) % self.inputs.len();
        return KeyResult::Handled;
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.touched[self.focused] = true;
        self.focused = (self.focused + self.inputs.len() - 1) % self.inputs.len();
        return KeyResult::Handled;
      }
      KeyCode::Enter => {
        self.touched = [true; 3];
        if self.loading || !self.is_valid() {
          return KeyResult::Handled;
        }
        return KeyResult::Event(FormEvent::Submitted(self.fields()));
      }
      _ => {}
    }

    if self.loading {
      return KeyResult::Handled;
    }

    if self.inputs[self.focused].handle_key(key) == InputResult::Consumed {
      self.touched[self.focused] = true;
    }
    KeyResult::Handled
  }

  pub fn render(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let form_area = centered_rect(56, 14, area);
    frame.render_widget(Clear, form_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Cyan))
      .title(format!(" {} user ", self.title));

    let errors = self.errors();
    let mut lines = Vec::new();

    for (i, label) in FIELD_LABELS.iter().enumerate() {
      let focused = i == self.focused;
      let label_style = if focused {
        Style::default().fg(Color::Cyan).bold()
      } else {
        Style::default().fg(Color::Gray)
      };
      lines.push(Line::from(Span::styled(*label, label_style)));

      let (before, after) = self.inputs[i].split_at_cursor();
      let mut spans = vec![Span::raw("> "), Span::raw(before)];
      if focused {
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
      }
      spans.push(Span::raw(after));
      lines.push(Line::from(spans));

      match errors[i].filter(|_| self.touched[i]) {
        Some(message) => lines.push(Line::from(Span::styled(
          message,
          Style::default().fg(Color::Red),
        ))),
        None => lines.push(Line::from("")),
      }
    }

    let submit = if self.loading {
      Span::styled("Loading...", Style::default().fg(Color::Yellow))
    } else if self.is_valid() {
      Span::styled("[Enter] Submit", Style::default().fg(Color::Green).bold())
    } else {
      Span::styled("[Enter] Submit", Style::default().fg(Color::DarkGray))
    };
    lines.push(Line::from(vec![
      submit,
      Span::raw("   "),
      Span::styled("[Tab] Next field", Style::default().fg(Color::DarkGray)),
      Span::raw("   "),
      Span::styled("[Esc] Cancel", Style::default().fg(Color::DarkGray)),
    ]));

    frame.render_widget(Paragraph::new(lines).block(block), form_area);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn type_str(form: &mut UserForm, s: &str) {
    for c in s.chars() {
      form.handle_key(key(KeyCode::Char(c)));
    }
  }

  fn fill(form: &mut UserForm, first: &str, last: &str, email: &str) {
    type_str(form, first);
    form.handle_key(key(KeyCode::Tab));
    type_str(form, last);
    form.handle_key(key(KeyCode::Tab));
    type_str(form, email);
  }

  #[test]
  fn test_validate_names() {
    let errors = validate("Al", "Bo", "a@b.co");
    assert_eq!(errors[0], Some("First name must be at least 3 characters"));
    assert_eq!(errors[1], Some("Last name must be at least 3 characters"));
    assert_eq!(errors[2], None);

    assert_eq!(validate("Ann", "Lee", "a@b.co"), [None, None, None]);
  }

  #[test]
  fn test_validate_email() {
    assert!(is_valid_email("ann@example.com"));
    assert!(is_valid_email("a.b+c@mail.example.org"));
    assert!(!is_valid_email("ann"));
    assert!(!is_valid_email("ann@example"));
    assert!(!is_valid_email("@example.com"));
    assert!(!is_valid_email("ann@.com"));
    assert!(!is_valid_email("ann@example."));
    assert!(!is_valid_email("a@b@c.com"));
    assert!(!is_valid_email("ann lee@example.com"));
  }

  #[test]
  fn test_submit_valid_form() {
    let mut form = UserForm::new();
    form.open_create();
    fill(&mut form, "Cat", "Stevens", " cat@example.com ");

    let result = form.handle_key(key(KeyCode::Enter));
    assert_eq!(
      result,
      KeyResult::Event(FormEvent::Submitted(UserFields {
        first_name: Some("Cat".to_string()),
        last_name: Some("Stevens".to_string()),
        email: Some("cat@example.com".to_string()),
      }))
    );
  }

  #[test]
  fn test_invalid_form_does_not_submit() {
    let mut form = UserForm::new();
    form.open_create();
    fill(&mut form, "Ca", "Stevens", "cat@example.com");

    assert_eq!(form.handle_key(key(KeyCode::Enter)), KeyResult::Handled);
    assert!(form.is_active());
  }

  #[test]
  fn test_errors_only_for_touched_fields() {
    let mut form = UserForm::new();
    form.open_create();
    assert_eq!(form.touched, [false; 3]);

    type_str(&mut form, "A");
    assert_eq!(form.touched, [true, false, false]);

    form.handle_key(key(KeyCode::Enter));
    assert_eq!(form.touched, [true; 3]);
  }

  #[test]
  fn test_edit_prefills_values() {
    let mut form = UserForm::new();
    form.open_edit(UserFields {
      first_name: Some("Ann".to_string()),
      last_name: Some("Lee".to_string()),
      email: Some("ann@example.com".to_string()),
    });

    assert!(form.is_valid());
    type_str(&mut form, "e");
    assert_eq!(form.fields().first_name.as_deref(), Some("Anne"));
  }

  #[test]
  fn test_loading_blocks_submit_and_edits() {
    let mut form = UserForm::new();
    form.open_create();
    fill(&mut form, "Cat", "Stevens", "cat@example.com");
    form.set_loading(true);

    assert_eq!(form.handle_key(key(KeyCode::Enter)), KeyResult::Handled);
    form.handle_key(key(KeyCode::Char('x')));
    assert_eq!(form.fields().email.as_deref(), Some("cat@example.com"));
  }

  #[test]
  fn test_escape_cancels() {
    let mut form = UserForm::new();
    form.open_create();
    assert_eq!(
      form.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(FormEvent::Cancelled)
    );
    assert!(!form.is_active());
  }
}
