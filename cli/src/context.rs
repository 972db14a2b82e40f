//! Client construction from the environment and command-line overrides.

use anyhow::{Context as _, Result};
use userdir_business::{BusinessConfig, ENV_PREFIX, UserDirectoryClient};

const API_BASE_URL_VAR: &str = "API_BASE_URL";

/// Resolve the configuration: `USERDIR_*` variables, with `--api-url` taking
/// precedence over `USERDIR_API_BASE_URL`.
pub fn resolve_config<I>(vars: I, api_url: Option<String>) -> Result<BusinessConfig>
where
    I: IntoIterator<Item = (String, String)>,
{
    let base_url_var = format!("{ENV_PREFIX}{API_BASE_URL_VAR}");
    let vars: Vec<(String, String)> = match api_url {
        Some(url) => vars
            .into_iter()
            .filter(|(key, _)| *key != base_url_var)
            .chain(std::iter::once((base_url_var.clone(), url)))
            .collect(),
        None => vars.into_iter().collect(),
    };

    BusinessConfig::from_vars(vars).context("Invalid configuration")
}

pub fn build_client(api_url: Option<String>) -> Result<UserDirectoryClient> {
    let config = resolve_config(std::env::vars(), api_url)?;
    tracing::debug!(api_base_url = %config.api_base_url, "Building user directory client");
    UserDirectoryClient::new(config).context("Failed to build HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_flag_overrides_env() {
        let config = resolve_config(
            vars(&[("USERDIR_API_BASE_URL", "http://env.example/users")]),
            Some("http://flag.example/users".to_owned()),
        )
        .unwrap();
        assert_eq!(config.api_base_url, "http://flag.example/users");
    }

    #[test]
    fn test_env_used_without_flag() {
        let config = resolve_config(
            vars(&[
                ("USERDIR_API_BASE_URL", "http://env.example/users"),
                ("USERDIR_RETENTION_SECS", "30"),
            ]),
            None,
        )
        .unwrap();
        assert_eq!(config.api_base_url, "http://env.example/users");
        assert_eq!(config.retention.as_secs(), 30);
    }

    #[test]
    fn test_bad_flag_is_rejected() {
        assert!(resolve_config(Vec::new(), Some("ftp://nope".to_owned())).is_err());
    }
}
