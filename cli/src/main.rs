#![allow(clippy::exit)]

mod cli;
mod commands;
mod context;
mod output;
mod timing;

use anyhow::Result;
use clap::Parser as _;

use crate::cli::{Cli, Commands};
use crate::commands::{
    generate_completions, run_create, run_delete, run_get, run_list, run_update,
};
use crate::context::build_client;

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        return generate_completions(shell, &mut std::io::stdout());
    }

    let client = build_client(cli.api_url)?;

    match cli.command {
        Commands::List {
            page,
            limit,
            interactive,
        } => run_list(&client, page, limit, interactive).await,
        Commands::Get { id } => run_get(&client, &id).await,
        Commands::Create { fields } => run_create(&client, fields).await,
        Commands::Update { id, fields } => run_update(&client, &id, fields).await,
        Commands::Delete { id, yes } => run_delete(&client, &id, yes).await,
        Commands::Completions { .. } => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    timing::init_tracing(cli.verbose, cli.timing);

    if let Err(e) = run(cli).await {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}
