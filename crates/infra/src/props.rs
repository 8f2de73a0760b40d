//! Stack properties assembled from the build environment.
//!
//! The packaging pipeline substitutes the bucket prefix, solution name and
//! version into the environment before synthesis. Any of them missing means
//! the build was misconfigured, so we fail before producing anything.

use andon_core::types::SOLUTION_ID;
use serde::Serialize;

pub const STACK_NAME: &str = "AmazonVirtualAndonStack";
pub const SOLUTION_DISPLAY_NAME: &str = "Amazon Virtual Andon";

pub const BUCKET_VAR: &str = "SOLUTION_BUCKET_NAME_PLACEHOLDER";
pub const NAME_VAR: &str = "SOLUTION_NAME_PLACEHOLDER";
pub const VERSION_VAR: &str = "SOLUTION_VERSION_PLACEHOLDER";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InfraError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

/// A value the deployed stack exports for the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackOutput {
    pub key: &'static str,
    pub description: &'static str,
    /// Console environment variable the value is wired into, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub console_env: Option<&'static str>,
}

/// Outputs the console reads after deployment.
pub const OUTPUTS: &[StackOutput] = &[
    StackOutput {
        key: "GraphQLEndpoint",
        description: "GraphQL endpoint serving the console",
        console_env: Some("ANDON_GRAPHQL_ENDPOINT"),
    },
    StackOutput {
        key: "UserPoolId",
        description: "Cognito user pool for console users",
        console_env: None,
    },
    StackOutput {
        key: "WebClientId",
        description: "User pool app client for the console",
        console_env: None,
    },
    StackOutput {
        key: "WebsiteBucket",
        description: "Bucket hosting the console assets",
        console_env: None,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackProps {
    pub stack_name: &'static str,
    pub description: String,
    pub solution_id: &'static str,
    pub solution_name: String,
    pub solution_display_name: &'static str,
    pub solution_version: String,
    pub solution_asset_hosting_bucket_name_prefix: String,
    pub outputs: Vec<StackOutput>,
}

impl StackProps {
    /// Read the stack parameters from the process environment.
    ///
    /// | Env Var                            | Default  |
    /// |------------------------------------|----------|
    /// | `SOLUTION_BUCKET_NAME_PLACEHOLDER` | required |
    /// | `SOLUTION_NAME_PLACEHOLDER`        | required |
    /// | `SOLUTION_VERSION_PLACEHOLDER`     | required |
    pub fn from_env() -> Result<Self, InfraError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Variables are checked in the order bucket, name, version; the first
    /// missing or blank one is reported.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, InfraError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .ok_or(InfraError::Missing(var))
        };

        let bucket_prefix = required(BUCKET_VAR)?;
        let solution_name = required(NAME_VAR)?;
        let solution_version = required(VERSION_VAR)?;

        Ok(Self {
            stack_name: STACK_NAME,
            description: format!(
                "({SOLUTION_ID}) - {SOLUTION_DISPLAY_NAME}. Version {solution_version}"
            ),
            solution_id: SOLUTION_ID,
            solution_name,
            solution_display_name: SOLUTION_DISPLAY_NAME,
            solution_version,
            solution_asset_hosting_bucket_name_prefix: bucket_prefix,
            outputs: OUTPUTS.to_vec(),
        })
    }
}
