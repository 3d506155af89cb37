use thiserror::Error;

/// The single failure kind for every call against the remote user service.
///
/// Transport errors, non-success statuses and malformed bodies all collapse
/// into this type; only the message differs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
  message: String,
}

impl FetchError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }

  pub fn message(&self) -> &str {
    &self.message
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_display_is_message() {
    let err = FetchError::new("Failed to delete user");
    assert_eq!(err.to_string(), "Failed to delete user");
    assert_eq!(err.message(), "Failed to delete user");
  }
}
