use std::time::Duration;

use andon_core::notification::DEFAULT_DURATION_SECS;
use andon_graphql::ApiAuth;
use uuid::Uuid;

/// Configuration errors. Raised at startup, before any request is made.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },

    #[error("Set exactly one of ANDON_API_KEY or ANDON_AUTH_TOKEN")]
    AmbiguousAuth,
}

/// Console configuration loaded from environment variables.
///
/// The GraphQL endpoint and credentials are produced by the stack
/// deployment and injected at build or launch time.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// GraphQL endpoint URL.
    pub graphql_endpoint: String,
    /// Credentials for the endpoint.
    pub auth: ApiAuth,
    /// Per-request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Usage metrics endpoint; metrics are disabled when unset.
    pub metrics_url: Option<String>,
    /// Anonymous deployment id reported with usage metrics.
    pub solution_uuid: Uuid,
    /// How long toasts stay on screen (default: `5`).
    pub notification_secs: u32,
}

impl ConsoleConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                      | Default            |
    /// |------------------------------|--------------------|
    /// | `ANDON_GRAPHQL_ENDPOINT`     | required           |
    /// | `ANDON_API_KEY`              | one of these two   |
    /// | `ANDON_AUTH_TOKEN`           | is required        |
    /// | `ANDON_REQUEST_TIMEOUT_SECS` | `30`               |
    /// | `ANDON_METRICS_URL`          | unset (disabled)   |
    /// | `ANDON_SOLUTION_UUID`        | random v4          |
    /// | `ANDON_NOTIFICATION_SECS`    | `5`                |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let graphql_endpoint =
            get("ANDON_GRAPHQL_ENDPOINT").ok_or(ConfigError::Missing("ANDON_GRAPHQL_ENDPOINT"))?;

        let auth = match (get("ANDON_API_KEY"), get("ANDON_AUTH_TOKEN")) {
            (Some(key), None) => ApiAuth::ApiKey(key),
            (None, Some(token)) => ApiAuth::Bearer(token),
            (None, None) => return Err(ConfigError::Missing("ANDON_API_KEY")),
            (Some(_), Some(_)) => return Err(ConfigError::AmbiguousAuth),
        };

        let request_timeout_secs = parse_or("ANDON_REQUEST_TIMEOUT_SECS", get("ANDON_REQUEST_TIMEOUT_SECS"), 30)?;
        let notification_secs = parse_or(
            "ANDON_NOTIFICATION_SECS",
            get("ANDON_NOTIFICATION_SECS"),
            DEFAULT_DURATION_SECS,
        )?;

        let solution_uuid = match get("ANDON_SOLUTION_UUID") {
            Some(value) => Uuid::parse_str(&value).map_err(|_| ConfigError::Invalid {
                var: "ANDON_SOLUTION_UUID",
                value,
            })?,
            None => Uuid::new_v4(),
        };

        Ok(Self {
            graphql_endpoint,
            auth,
            request_timeout_secs,
            metrics_url: get("ANDON_METRICS_URL"),
            solution_uuid,
            notification_secs,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_or<T: std::str::FromStr>(
    var: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}
