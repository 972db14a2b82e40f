//! Command implementations for the `userdir` CLI.
//!
//! Each subcommand lives in its own module.

pub mod completions;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

pub use completions::generate_completions;
pub use create::run_create;
pub use delete::run_delete;
pub use get::run_get;
pub use list::run_list;
pub use update::run_update;

use anyhow::anyhow;
use userdir_business::UserDirectoryError;

use crate::output::Output;

/// Print a client error and turn it into the command's failure.
///
/// Validation failures are listed field by field.
pub(crate) fn report(out: &Output, action: &str, err: UserDirectoryError) -> anyhow::Error {
    match err.validation_errors() {
        Some(errors) => {
            out.error(format!("Cannot {action}: some fields are invalid"));
            out.validation_errors(errors);
        }
        None => out.error(format!("Failed to {action}: {err}")),
    }
    anyhow!(err)
}
