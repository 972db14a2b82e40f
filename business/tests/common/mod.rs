//! Shared mock-server setup for user directory integration tests.

#![allow(dead_code)]

use std::time::Duration;

use userdir_business::{BusinessConfig, MutateUserRequest, UserDirectoryClient, UserName};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Holds a mock user service and a client pointed at it.
pub struct TestContext {
    pub mock_server: MockServer,
    pub client: UserDirectoryClient,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_config(|config| config).await
    }

    pub async fn with_retention(retention: Duration) -> Self {
        Self::with_config(|config| config.with_retention(retention)).await
    }

    pub async fn with_config(configure: impl FnOnce(BusinessConfig) -> BusinessConfig) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let mock_server = MockServer::start().await;
        let config = configure(BusinessConfig::new(mock_server.uri()));
        let client = UserDirectoryClient::new(config).expect("client should build");

        Self {
            mock_server,
            client,
        }
    }

    /// Number of requests the mock server saw for `method` + `path`.
    pub async fn request_count(&self, http_method: &str, request_path: &str) -> usize {
        self.mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == http_method && r.url.path() == request_path)
            .count()
    }

    pub async fn total_requests(&self) -> usize {
        self.mock_server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or_default()
    }

    /// `GET /?page=1&limit=10` answering `{ "users": users }` once.
    pub async fn mock_list_once(&self, users: Vec<serde_json::Value>) {
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("page", "1"))
            .and(query_param("limit", "10"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "users": users })),
            )
            .up_to_n_times(1)
            .mount(&self.mock_server)
            .await;
    }

    /// `GET /?page=1&limit=10` answering `{ "users": users }` every time.
    pub async fn mock_list(&self, users: Vec<serde_json::Value>) {
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("page", "1"))
            .and(query_param("limit", "10"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "users": users })),
            )
            .mount(&self.mock_server)
            .await;
    }
}

pub fn user_json(id: u64, username: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "email": format!("{username}@example.com"),
        "username": username,
        "password": "secret123",
        "name": { "firstname": username, "lastname": "Tester" },
        "address": {
            "city": "kilcoole",
            "street": "new road",
            "number": 7682,
            "zipcode": "12926-3874",
            "geolocation": { "lat": "-37.3159", "long": "81.1496" }
        },
        "phone": "1-570-236-7033"
    })
}

pub fn payload(username: &str) -> MutateUserRequest {
    MutateUserRequest {
        email: format!("{username}@example.com"),
        username: username.to_owned(),
        password: "secret123".to_owned(),
        name: UserName {
            firstname: username.to_owned(),
            lastname: "Tester".to_owned(),
        },
    }
}
