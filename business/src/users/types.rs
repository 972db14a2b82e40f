//! User records exchanged with the user service.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque identifier assigned by the user service.
///
/// The service may send it as a JSON string or number; it is always carried
/// as a string here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(Arc<str>);

impl UserId {
    pub fn new(id: &str) -> Self {
        Self(Arc::from(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(id) => Self(Arc::from(id)),
            RawId::Number(id) => Self::new(&id.to_string()),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserName {
    pub firstname: String,
    pub lastname: String,
}

impl UserName {
    pub fn full(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
            .trim()
            .to_owned()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geolocation {
    pub lat: String,
    pub long: String,
}

/// Postal address. Read-only from the client's side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub number: Option<serde_json::Number>,
    #[serde(default)]
    pub zipcode: String,
    #[serde(default)]
    pub geolocation: Option<Geolocation>,
}

/// A user record as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    /// Sent and returned in plaintext by the service contract.
    #[serde(default)]
    pub password: String,
    pub name: UserName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl User {
    /// The mutable subset of this user, e.g. to prefill an edit form.
    pub fn to_mutate_request(&self) -> MutateUserRequest {
        MutateUserRequest {
            email: self.email.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            name: self.name.clone(),
        }
    }
}

/// Body of create and update requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutateUserRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub name: UserName,
}

/// Status/message acknowledgement, e.g. from a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericResponse {
    pub status: String,
    pub message: String,
}
