use futures::future::{BoxFuture, FutureExt};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::error::FetchError;
use super::types::{User, UserFields, UserId, UsersPage};
use super::UserApi;

/// HTTP client for the remote user service
#[derive(Clone)]
pub struct UsersClient {
  base_url: String,
  client: Client,
}

impl UsersClient {
  /// Create a client rooted at `base_url` (e.g. "https://dummyjson.com")
  pub fn new(base_url: &Url) -> Self {
    Self {
      base_url: base_url.as_str().trim_end_matches('/').to_string(),
      client: Client::new(),
    }
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  fn request(&self, method: Method, path: &str) -> RequestBuilder {
    debug!(%method, path, "request");
    self
      .client
      .request(method, format!("{}{}", self.base_url, path))
  }

  /// Send a request, mapping transport failures and non-success statuses
  /// to a `FetchError` prefixed with `context`.
  async fn send(&self, req: RequestBuilder, context: &str) -> Result<Response, FetchError> {
    let response = req.send().await.map_err(|e| {
      warn!(error = %e, "{}", context);
      FetchError::new(format!("{}: {}", context, e))
    })?;

    let status = response.status();
    if !status.is_success() {
      warn!(%status, "{}", context);
      return Err(FetchError::new(format!("{} ({})", context, status)));
    }

    Ok(response)
  }

  async fn decode<T: DeserializeOwned>(response: Response, context: &str) -> Result<T, FetchError> {
    response
      .json()
      .await
      .map_err(|e| FetchError::new(format!("{}: {}", context, e)))
  }

  pub async fn list_users(&self) -> Result<Vec<User>, FetchError> {
    const CONTEXT: &str = "Failed to fetch users";

    let response = self
      .send(self.request(Method::GET, "/users"), CONTEXT)
      .await?;
    let page: UsersPage = Self::decode(response, CONTEXT).await?;

    page
      .users
      .ok_or_else(|| FetchError::new("Users data not found"))
  }

  pub async fn delete_user(&self, id: UserId) -> Result<UserId, FetchError> {
    let req = self.request(Method::DELETE, &format!("/users/{}", id));
    self.send(req, "Failed to delete user").await?;
    Ok(id)
  }

  pub async fn update_user(&self, id: UserId, fields: &UserFields) -> Result<User, FetchError> {
    const CONTEXT: &str = "Failed to update user";

    let req = self
      .request(Method::PUT, &format!("/users/{}", id))
      .json(fields);
    let response = self.send(req, CONTEXT).await?;
    Self::decode(response, CONTEXT).await
  }

  pub async fn create_user(&self, fields: &UserFields) -> Result<User, FetchError> {
    const CONTEXT: &str = "Failed to create user";

    let req = self.request(Method::POST, "/users/add").json(fields);
    let response = self.send(req, CONTEXT).await?;
    Self::decode(response, CONTEXT).await
  }
}

impl UserApi for UsersClient {
  fn list_users(&self) -> BoxFuture<'_, Result<Vec<User>, FetchError>> {
    UsersClient::list_users(self).boxed()
  }

  fn delete_user(&self, id: UserId) -> BoxFuture<'_, Result<UserId, FetchError>> {
    UsersClient::delete_user(self, id).boxed()
  }

  fn update_user(&self, id: UserId, fields: UserFields) -> BoxFuture<'_, Result<User, FetchError>> {
    async move { UsersClient::update_user(self, id, &fields).await }.boxed()
  }

  fn create_user(&self, fields: UserFields) -> BoxFuture<'_, Result<User, FetchError>> {
    async move { UsersClient::create_user(self, &fields).await }.boxed()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use wiremock::matchers::{body_json, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  fn client_for(server: &MockServer) -> UsersClient {
    UsersClient::new(&Url::parse(&server.uri()).unwrap())
  }

  fn fields(first: &str, last: &str, email: &str) -> UserFields {
    UserFields {
      first_name: Some(first.to_string()),
      last_name: Some(last.to_string()),
      email: Some(email.to_string()),
    }
  }

  #[tokio::test]
  async fn test_list_users_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/users"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "users": [
          { "id": 1, "firstName": "Ann", "lastName": "Lee", "email": "ann@example.com" },
          { "id": 2, "firstName": "Bob", "lastName": "Ray", "email": "bob@example.com" }
        ],
        "total": 2,
        "skip": 0,
        "limit": 30
      })))
      .mount(&server)
      .await;

    let users = client_for(&server).list_users().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].first_name, "Ann");
    assert_eq!(users[1].id, 2);
  }

  #[tokio::test]
  async fn test_list_users_missing_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/users"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total": 0 })))
      .mount(&server)
      .await;

    let err = client_for(&server).list_users().await.unwrap_err();
    assert_eq!(err.message(), "Users data not found");
  }

  #[tokio::test]
  async fn test_list_users_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/users"))
      .respond_with(ResponseTemplate::new(500))
      .mount(&server)
      .await;

    let err = client_for(&server).list_users().await.unwrap_err();
    assert!(err.message().starts_with("Failed to fetch users"));
  }

  #[tokio::test]
  async fn test_delete_user_returns_id() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
      .and(path("/users/7"))
      .respond_with(
        ResponseTemplate::new(200).set_body_json(json!({ "id": 7, "isDeleted": true })),
      )
      .mount(&server)
      .await;

    let id = client_for(&server).delete_user(7).await.unwrap();
    assert_eq!(id, 7);
  }

  #[tokio::test]
  async fn test_delete_user_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
      .and(path("/users/999"))
      .respond_with(ResponseTemplate::new(404))
      .mount(&server)
      .await;

    let err = client_for(&server).delete_user(999).await.unwrap_err();
    assert!(err.message().starts_with("Failed to delete user"));
  }

  #[tokio::test]
  async fn test_update_user_sends_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
      .and(path("/users/3"))
      .and(body_json(json!({
        "firstName": "Ann",
        "lastName": "Lee",
        "email": "ann@example.com"
      })))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "id": 3,
        "firstName": "Ann",
        "lastName": "Lee",
        "email": "ann@example.com",
        "age": 30
      })))
      .mount(&server)
      .await;

    let user = client_for(&server)
      .update_user(3, &fields("Ann", "Lee", "ann@example.com"))
      .await
      .unwrap();
    assert_eq!(user.id, 3);
    assert_eq!(user.age, Some(30));
  }

  #[tokio::test]
  async fn test_create_user_posts_to_add() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/users/add"))
      .respond_with(ResponseTemplate::new(201).set_body_json(json!({
        "id": 209,
        "firstName": "Cat",
        "lastName": "Stevens",
        "email": "cat@example.com"
      })))
      .mount(&server)
      .await;

    let user = client_for(&server)
      .create_user(&fields("Cat", "Stevens", "cat@example.com"))
      .await
      .unwrap();
    assert_eq!(user.id, 209);
    assert_eq!(user.first_name, "Cat");
  }

  #[tokio::test]
  async fn test_create_user_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/users/add"))
      .respond_with(ResponseTemplate::new(400))
      .mount(&server)
      .await;

    let err = client_for(&server)
      .create_user(&fields("Cat", "Stevens", "cat@example.com"))
      .await
      .unwrap_err();
    assert!(err.message().starts_with("Failed to create user"));
  }

  #[tokio::test]
  async fn test_trait_object_dispatch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/users"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "users": [] })))
      .mount(&server)
      .await;

    let api: std::sync::Arc<dyn UserApi> = std::sync::Arc::new(client_for(&server));
    assert!(api.list_users().await.unwrap().is_empty());
  }
}
