use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "userdir")]
#[command(about = "Manage users in a remote user directory", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the user service
    #[arg(long, global = true, env = "USERDIR_API_BASE_URL")]
    pub api_url: Option<String>,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List one page of users
    List {
        /// Page number, starting at 1
        #[arg(long, short = 'p', default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Users per page
        #[arg(long, short = 'l', default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
        limit: u32,

        /// Interactive mode (select a user to view)
        #[arg(long, short = 'I')]
        interactive: bool,
    },
    /// Show a single user
    Get {
        /// User ID
        id: String,
    },
    /// Create a user; missing fields are prompted for
    Create {
        #[command(flatten)]
        fields: UserFields,
    },
    /// Update a user; missing fields keep their current value
    Update {
        /// User ID
        id: String,

        #[command(flatten)]
        fields: UserFields,
    },
    /// Delete a user
    Delete {
        /// User ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Editable user fields shared by `create` and `update`.
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct UserFields {
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    #[arg(long, short = 'u')]
    pub username: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    #[arg(long)]
    pub firstname: Option<String>,

    #[arg(long)]
    pub lastname: Option<String>,
}
