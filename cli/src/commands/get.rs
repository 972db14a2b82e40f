//! Show a single user.

use anyhow::Result;
use tracing::instrument;
use userdir_business::{UserDirectoryClient, UserId};

use super::report;
use crate::output::Output;

#[instrument(skip_all, name = "get", fields(user_id = %id))]
pub async fn run_get(client: &UserDirectoryClient, id: &str) -> Result<()> {
    let out = Output::new();

    let user = client
        .get_user(UserId::new(id))
        .await
        .map_err(|e| report(&out, "get user", e))?;

    out.user(&user);
    Ok(())
}
