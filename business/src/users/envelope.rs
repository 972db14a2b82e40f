//! Response envelope normalization.
//!
//! The user service is not consistent about its response shapes: lists come
//! as `{ "users": [...] }` or as a bare array, single users as
//! `{ "user": {...} }` (older deployments use `notes` / `note`) or as the bare
//! record, deletes as `{ "status", "message" }` or as the deleted record.
//! Everything is mapped to plain values here so the rest of the crate never
//! sees an envelope.

use serde::Deserialize;

use super::error::UserDirectoryError;
use super::types::{GenericResponse, User};
use crate::http::Response;

#[derive(Deserialize)]
#[serde(untagged)]
enum UsersEnvelope {
    Wrapped {
        #[serde(alias = "notes")]
        users: Vec<User>,
    },
    Bare(Vec<User>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UserEnvelope {
    Wrapped {
        #[serde(alias = "note")]
        user: User,
    },
    Bare(User),
}

/// Message used when a delete succeeds without a status/message body.
pub const DELETED_MESSAGE: &str = "User deleted";

pub fn users_from(response: &Response) -> Result<Vec<User>, UserDirectoryError> {
    let envelope: UsersEnvelope = response
        .json()
        .map_err(|e| UserDirectoryError::decode("user list", e))?;
    Ok(match envelope {
        UsersEnvelope::Wrapped { users } | UsersEnvelope::Bare(users) => users,
    })
}

pub fn user_from(response: &Response) -> Result<User, UserDirectoryError> {
    let envelope: UserEnvelope = response
        .json()
        .map_err(|e| UserDirectoryError::decode("user", e))?;
    Ok(match envelope {
        UserEnvelope::Wrapped { user } | UserEnvelope::Bare(user) => user,
    })
}

/// Any 2xx delete body is an acknowledgement; only a `{status, message}` body
/// carries its own text.
pub fn generic_from(response: &Response) -> GenericResponse {
    response
        .json::<GenericResponse>()
        .unwrap_or_else(|_| GenericResponse {
            status: "success".to_owned(),
            message: DELETED_MESSAGE.to_owned(),
        })
}

/// Error text from a failed response: its `message`, then its `detail`,
/// then a generic line naming the status.
pub fn error_message(response: &Response) -> String {
    let from_body = response
        .json::<serde_json::Value>()
        .ok()
        .and_then(|body| {
            ["message", "detail"].iter().find_map(|field| match body.get(*field) {
                Some(serde_json::Value::String(text)) if !text.trim().is_empty() => {
                    Some(text.clone())
                }
                Some(serde_json::Value::Null) | None => None,
                Some(other) => Some(other.to_string()),
            })
        });

    from_body.unwrap_or_else(|| format!("Request failed with status {}", response.status))
}
