//! Create a user.

use anyhow::{Context as _, Result};
use inquire::{Password, PasswordDisplayMode, Text};
use tracing::instrument;
use userdir_business::{CreateUserMutation, MutateUserRequest, UserDirectoryClient, UserName};

use super::report;
use crate::cli::UserFields;
use crate::output::Output;

fn prompt_text(label: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Text::new(label)
            .prompt()
            .with_context(|| format!("Failed to read {}", label.trim_end_matches(':'))),
    }
}

/// Fill every field not given on the command line from the terminal.
fn prompt_missing(fields: UserFields) -> Result<MutateUserRequest> {
    let email = prompt_text("Email:", fields.email)?;
    let username = prompt_text("Username:", fields.username)?;
    let password = match fields.password {
        Some(password) => password,
        None => Password::new("Password:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
            .context("Failed to read password")?,
    };
    let firstname = prompt_text("First name:", fields.firstname)?;
    let lastname = prompt_text("Last name:", fields.lastname)?;

    Ok(MutateUserRequest {
        email,
        username,
        password,
        name: UserName {
            firstname,
            lastname,
        },
    })
}

#[instrument(skip_all, name = "create")]
pub async fn run_create(client: &UserDirectoryClient, fields: UserFields) -> Result<()> {
    let out = Output::new();
    let payload = prompt_missing(fields)?;

    let mutation = CreateUserMutation::new(client);
    let user = mutation
        .call(payload)
        .await
        .map_err(|e| report(&out, "create user", e))?;

    out.success(format!("Created user {} ({})", user.username, user.id));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_missing_uses_given_fields() {
        // All fields supplied, so no prompt is shown.
        let fields = UserFields {
            email: Some("jane@example.com".to_owned()),
            username: Some("jane".to_owned()),
            password: Some("secret123".to_owned()),
            firstname: Some("Jane".to_owned()),
            lastname: Some("Doe".to_owned()),
        };

        let payload = prompt_missing(fields).unwrap();
        assert_eq!(payload.email, "jane@example.com");
        assert_eq!(payload.username, "jane");
        assert_eq!(payload.name.full(), "Jane Doe");
    }
}
