//! List users command.

use anyhow::{Context as _, Result, anyhow};
use inquire::Select;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::instrument;
use userdir_business::{ListUsersQuery, QueryStatus, User, UserDirectoryClient};

use crate::output::Output;

#[derive(Tabled)]
struct ListRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Phone")]
    phone: String,
}

impl From<&User> for ListRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            name: user.name.full(),
            phone: user.phone.clone().unwrap_or_default(),
        }
    }
}

fn render_table(users: &[User]) -> String {
    let rows: Vec<ListRow> = users.iter().map(ListRow::from).collect();
    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    table.to_string()
}

#[instrument(skip_all, name = "list", fields(page, limit))]
pub async fn run_list(
    client: &UserDirectoryClient,
    page: u32,
    limit: u32,
    interactive: bool,
) -> Result<()> {
    let out = Output::new();

    let query = ListUsersQuery::new(client, page, limit);
    let users = match query.refresh().await {
        QueryStatus::Loaded(users) => users,
        QueryStatus::Error(e) => {
            out.error(format!("Error listing users: {e}"));
            return Err(anyhow!(e));
        }
        QueryStatus::Idle | QueryStatus::Loading => {
            return Err(anyhow!("List operation did not complete"));
        }
    };

    if users.is_empty() {
        out.dim(format!("No users on page {page}."));
        return Ok(());
    }

    if interactive {
        let options: Vec<String> = users
            .iter()
            .map(|user| format!("{} <{}> [{}]", user.username, user.email, user.id))
            .collect();

        let selection = Select::new("Select a user to view:", options)
            .with_help_message("Use arrow keys to navigate, Enter to select")
            .raw_prompt_skippable()
            .context("Failed to select user")?;

        if let Some(user) = selection.and_then(|selected| users.get(selected.index)) {
            out.user(user);
        }
    } else {
        out.print(render_table(&users));
        out.count(format!("Page {page}"), users.len());
    }

    Ok(())
}
