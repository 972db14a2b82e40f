//! Delete a user, after confirmation.

use anyhow::{Context as _, Result};
use inquire::Confirm;
use tracing::instrument;
use userdir_business::{DeleteUserMutation, UserDirectoryClient, UserId};

use super::report;
use crate::output::Output;

#[instrument(skip_all, name = "delete", fields(user_id = %id, yes))]
pub async fn run_delete(client: &UserDirectoryClient, id: &str, yes: bool) -> Result<()> {
    let out = Output::new();
    let id = UserId::new(id);

    if !yes {
        let confirmed = Confirm::new(&format!("Delete user {id}?"))
            .with_default(false)
            .with_help_message("This cannot be undone")
            .prompt()
            .context("Failed to read confirmation")?;

        if !confirmed {
            out.warning("Cancelled.");
            return Ok(());
        }
    }

    let mutation = DeleteUserMutation::new(client);
    let response = mutation
        .call(id)
        .await
        .map_err(|e| report(&out, "delete user", e))?;

    out.success(format!("{} ({})", response.message, response.status));
    Ok(())
}
