//! `userdir completions <shell>`

use std::io::Write;

use anyhow::{Context as _, Result};
use clap::CommandFactory as _;
use clap_complete::Shell;

use crate::cli::Cli;

/// Write the completion script for `shell` to `writer`.
pub fn generate_completions(shell: Shell, writer: &mut impl Write) -> Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_owned();
    clap_complete::generate(shell, &mut cmd, bin_name, writer);
    writer.flush().context("Failed to write completions")
}
