//! Update a user.

use anyhow::{Context as _, Result};
use inquire::{Password, PasswordDisplayMode};
use tracing::instrument;
use userdir_business::{MutateUserRequest, UpdateUserMutation, UserDirectoryClient, UserId};

use super::report;
use crate::cli::UserFields;
use crate::output::Output;

/// Overlay the fields given on the command line onto `current`.
fn merge_fields(current: MutateUserRequest, fields: UserFields) -> MutateUserRequest {
    let UserFields {
        email,
        username,
        password,
        firstname,
        lastname,
    } = fields;

    let mut merged = current;
    if let Some(email) = email {
        merged.email = email;
    }
    if let Some(username) = username {
        merged.username = username;
    }
    if let Some(password) = password {
        merged.password = password;
    }
    if let Some(firstname) = firstname {
        merged.name.firstname = firstname;
    }
    if let Some(lastname) = lastname {
        merged.name.lastname = lastname;
    }
    merged
}

/// The service may omit the stored password; ask for one instead of sending it blank.
fn fill_password(
    mut payload: MutateUserRequest,
    prompt: impl FnOnce() -> Result<String>,
) -> Result<MutateUserRequest> {
    if payload.password.is_empty() {
        payload.password = prompt()?;
    }
    Ok(payload)
}

fn prompt_password() -> Result<String> {
    Password::new("Password:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("The current password was not returned by the service")
        .prompt()
        .context("Failed to read password")
}

#[instrument(skip_all, name = "update", fields(user_id = %id))]
pub async fn run_update(client: &UserDirectoryClient, id: &str, fields: UserFields) -> Result<()> {
    let out = Output::new();
    let id = UserId::new(id);

    if fields == UserFields::default() {
        out.warning("Nothing to update; pass at least one field.");
        return Ok(());
    }

    let current = client
        .get_user(id.clone())
        .await
        .map_err(|e| report(&out, "load user", e))?;
    let payload = fill_password(
        merge_fields(current.to_mutate_request(), fields),
        prompt_password,
    )?;

    let mutation = UpdateUserMutation::new(client);
    let user = mutation
        .call((id, payload))
        .await
        .map_err(|e| report(&out, "update user", e))?;

    out.success(format!("Updated user {}", user.id));
    out.user(&user);
    Ok(())
}

#[cfg(test)]
mod tests {
    use userdir_business::{BusinessConfig, UserName};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn current() -> MutateUserRequest {
        MutateUserRequest {
            email: "john@gmail.com".to_owned(),
            username: "johnd".to_owned(),
            password: "m38rmF$".to_owned(),
            name: UserName {
                firstname: "john".to_owned(),
                lastname: "doe".to_owned(),
            },
        }
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let merged = merge_fields(
            current(),
            UserFields {
                lastname: Some("Smith".to_owned()),
                ..UserFields::default()
            },
        );

        assert_eq!(merged.email, "john@gmail.com");
        assert_eq!(merged.username, "johnd");
        assert_eq!(merged.password, "m38rmF$");
        assert_eq!(merged.name.firstname, "john");
        assert_eq!(merged.name.lastname, "Smith");
    }

    #[test]
    fn test_merge_overrides_every_field() {
        let fields = UserFields {
            email: Some("j@x.io".to_owned()),
            username: Some("jay".to_owned()),
            password: Some("hunter22".to_owned()),
            firstname: Some("Jay".to_owned()),
            lastname: Some("Dee".to_owned()),
        };

        let merged = merge_fields(current(), fields);
        assert_eq!(merged.email, "j@x.io");
        assert_eq!(merged.username, "jay");
        assert_eq!(merged.password, "hunter22");
        assert_eq!(merged.name.full(), "Jay Dee");
    }

    #[test]
    fn test_blank_password_is_prompted_for() {
        let mut stored = current();
        stored.password = String::new();

        let filled = fill_password(stored, || Ok("n3wPass!".to_owned())).unwrap();
        assert_eq!(filled.password, "n3wPass!");
        assert_eq!(filled.username, "johnd");
    }

    #[test]
    fn test_known_password_skips_prompt() {
        let filled = fill_password(current(), || panic!("prompted")).unwrap();
        assert_eq!(filled.password, "m38rmF$");
    }

    #[test]
    fn test_password_prompt_failure_propagates() {
        let mut stored = current();
        stored.password = String::new();

        let err = fill_password(stored, || Err(anyhow::anyhow!("cancelled"))).unwrap_err();
        assert_eq!(err.to_string(), "cancelled");
    }

    #[tokio::test]
    async fn test_update_sends_merged_payload() {
        let mock_server = MockServer::start().await;
        let stored = serde_json::json!({
            "id": 1,
            "email": "john@gmail.com",
            "username": "johnd",
            "password": "m38rmF$",
            "name": { "firstname": "john", "lastname": "doe" }
        });
        Mock::given(method("GET"))
            .and(path("/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(stored))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/1"))
            .and(body_partial_json(serde_json::json!({
                "email": "john@gmail.com",
                "name": { "firstname": "john", "lastname": "Smith" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 1,
                "email": "john@gmail.com",
                "username": "johnd",
                "name": { "firstname": "john", "lastname": "Smith" }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = UserDirectoryClient::new(BusinessConfig::new(mock_server.uri())).unwrap();
        let fields = UserFields {
            lastname: Some("Smith".to_owned()),
            ..UserFields::default()
        };
        run_update(&client, "1", fields).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_without_fields_sends_nothing() {
        let mock_server = MockServer::start().await;
        let client = UserDirectoryClient::new(BusinessConfig::new(mock_server.uri())).unwrap();

        run_update(&client, "1", UserFields::default()).await.unwrap();
        let requests = mock_server.received_requests().await.unwrap_or_default();
        assert!(requests.is_empty());
    }
}
