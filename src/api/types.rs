//! Serde types for the remote user service.
//!
//! Only `id` is load-bearing for the cache; the remaining fields are payload
//! shown by the views. Anything the typed fields don't name is kept in
//! `extra` so records survive a decode/encode pass unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Server-assigned user identifier.
pub type UserId = u64;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
  pub lat: f64,
  pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
  pub address: String,
  pub city: String,
  pub state: String,
  pub postal_code: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub coordinates: Option<Coordinates>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Address {
  /// One-line rendering, skipping empty parts.
  pub fn one_line(&self) -> String {
    [
      self.address.as_str(),
      self.city.as_str(),
      self.state.as_str(),
      self.postal_code.as_str(),
    ]
    .iter()
    .filter(|part| !part.is_empty())
    .copied()
    .collect::<Vec<_>>()
    .join(", ")
  }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Company {
  pub name: String,
  pub department: String,
  pub title: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub address: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bank {
  pub card_expire: String,
  pub card_number: String,
  pub card_type: String,
  pub currency: String,
  pub iban: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Crypto {
  pub coin: String,
  pub wallet: String,
  pub network: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Hair {
  pub color: String,
  #[serde(rename = "type")]
  pub kind: String,
}

/// A user record as returned by the service.
///
/// Every field except `id` defaults, because the create endpoint echoes back
/// only what was submitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: UserId,
  #[serde(default)]
  pub first_name: String,
  #[serde(default)]
  pub last_name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub maiden_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub age: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub gender: Option<String>,
  #[serde(default)]
  pub email: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub username: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub birth_date: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub blood_group: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub height: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub weight: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub eye_color: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub hair: Option<Hair>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub university: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address: Option<Address>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub company: Option<Company>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bank: Option<Bank>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub crypto: Option<Crypto>,
  // ip, macAddress, ssn, userAgent, ...
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl User {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
      .trim()
      .to_string()
  }

  /// Job title from the embedded company, if any.
  pub fn position(&self) -> Option<&str> {
    self
      .company
      .as_ref()
      .map(|c| c.title.as_str())
      .filter(|t| !t.is_empty())
  }

  /// The editable subset of this record, as a fully-populated patch.
  pub fn to_fields(&self) -> UserFields {
    UserFields {
      first_name: Some(self.first_name.clone()),
      last_name: Some(self.last_name.clone()),
      email: Some(self.email.clone()),
    }
  }
}

/// Partial record used as the body of create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFields {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub first_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub last_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
}

/// Envelope of the list endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct UsersPage {
  pub users: Option<Vec<User>>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_decode_full_record_keeps_unknown_fields() {
    let raw = json!({
      "id": 1,
      "firstName": "Emily",
      "lastName": "Johnson",
      "email": "emily.johnson@x.dummyjson.com",
      "age": 28,
      "hair": { "color": "Brown", "type": "Curly" },
      "address": {
        "address": "626 Main Street",
        "city": "Phoenix",
        "state": "Mississippi",
        "postalCode": "29112",
        "coordinates": { "lat": -77.16213, "lng": -92.084824 },
        "country": "United States"
      },
      "company": { "name": "Dooley, Kozey and Cronin", "department": "Engineering", "title": "Sales Manager" },
      "ip": "42.48.100.32",
      "macAddress": "47:fa:41:18:ec:eb"
    });

    let user: User = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(user.id, 1);
    assert_eq!(user.full_name(), "Emily Johnson");
    assert_eq!(user.position(), Some("Sales Manager"));
    assert_eq!(user.hair.as_ref().unwrap().kind, "Curly");
    assert_eq!(user.extra.get("ip"), Some(&json!("42.48.100.32")));
    assert_eq!(
      user.address.as_ref().unwrap().extra.get("country"),
      Some(&json!("United States"))
    );

    let back = serde_json::to_value(&user).unwrap();
    assert_eq!(back, raw);
  }

  #[test]
  fn test_decode_create_echo() {
    // The create endpoint only echoes submitted fields plus the new id
    let user: User = serde_json::from_value(json!({
      "id": 209,
      "firstName": "Cat",
      "lastName": "Stevens",
      "email": "cat@example.com"
    }))
    .unwrap();

    assert_eq!(user.id, 209);
    assert!(user.company.is_none());
    assert_eq!(user.position(), None);
  }

  #[test]
  fn test_fields_skip_absent() {
    let fields = UserFields {
      first_name: Some("Ann".to_string()),
      ..Default::default()
    };
    assert_eq!(
      serde_json::to_value(&fields).unwrap(),
      json!({ "firstName": "Ann" })
    );
  }

  #[test]
  fn test_address_one_line() {
    let address = Address {
      address: "1 Main St".to_string(),
      city: "Phoenix".to_string(),
      ..Default::default()
    };
    assert_eq!(address.one_line(), "1 Main St, Phoenix");
  }
}
