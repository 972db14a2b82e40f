//! Styled terminal output.
//!
//! Every command prints through [`Output`] instead of `println!`.

use std::fmt::Display;

use console::{Term, style};
use userdir_business::{User, ValidationErrors};

pub struct Output {
    term: Term,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Print a success message with a green checkmark.
    pub fn success(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("✓").green().bold(), message)),
        );
    }

    /// Print an error message with a red X.
    pub fn error(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("✗").red().bold(), message)),
        );
    }

    pub fn warning(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("⚠").yellow().bold(), message)),
        );
    }

    pub fn print(&self, message: impl Display) {
        drop(self.term.write_line(&message.to_string()));
    }

    pub fn header(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&style(message).bold().cyan().to_string()),
        );
    }

    pub fn dim(&self, message: impl Display) {
        drop(self.term.write_line(&style(message).dim().to_string()));
    }

    /// Print a labeled value with indentation.
    pub fn labeled_indent(&self, label: impl Display, value: impl Display, indent: usize) {
        let spaces = " ".repeat(indent);
        drop(
            self.term
                .write_line(&format!("{spaces}{}: {}", style(label).dim(), value)),
        );
    }

    /// One line per rejected field.
    pub fn validation_errors(&self, errors: &ValidationErrors) {
        for (field, message) in errors.iter() {
            drop(self.term.write_line(&format!(
                "  {} {}: {}",
                style("✗").red(),
                style(field).bold(),
                message
            )));
        }
    }

    /// Full record of one user.
    pub fn user(&self, user: &User) {
        self.header(format!("User {}", user.id));
        self.labeled_indent("Username", &user.username, 2);
        self.labeled_indent("Email", &user.email, 2);
        self.labeled_indent("Name", user.name.full(), 2);
        if let Some(phone) = &user.phone {
            self.labeled_indent("Phone", phone, 2);
        }
        if let Some(address) = &user.address {
            let number = address
                .number
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            self.labeled_indent(
                "Address",
                format!(
                    "{number} {}, {} {}",
                    address.street, address.city, address.zipcode
                )
                .trim(),
                2,
            );
        }
    }

    pub fn count(&self, label: impl Display, count: usize) {
        drop(self.term.write_line(&format!(
            "{}: {} user(s)",
            style(label).dim(),
            style(count).cyan().bold()
        )));
    }
}
