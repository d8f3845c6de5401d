use std::env;

use crate::error::ConfigError;

/// Which [`TodoStore`](crate::store::TodoStore) backend to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    DynamoDb {
        table_name: String,
        /// Custom endpoint URL (for local DynamoDB).
        endpoint_url: Option<String>,
    },
}

/// Configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend: StoreBackend,
}

impl Config {
    /// Environment variables:
    /// - `TODO_STORE` - `dynamodb` (default) or `memory`
    /// - `DYNAMODB_TABLE` - table name, required for `dynamodb`
    /// - `AWS_ENDPOINT_URL` - optional DynamoDB endpoint override
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let kind = lookup("TODO_STORE").unwrap_or_else(|| "dynamodb".to_string());

        let backend = match kind.to_lowercase().as_str() {
            "memory" => StoreBackend::Memory,
            "dynamodb" => StoreBackend::DynamoDb {
                table_name: lookup("DYNAMODB_TABLE")
                    .filter(|t| !t.is_empty())
                    .ok_or(ConfigError::Missing("DYNAMODB_TABLE"))?,
                endpoint_url: lookup("AWS_ENDPOINT_URL").filter(|u| !u.is_empty()),
            },
            _ => {
                return Err(ConfigError::Invalid {
                    name: "TODO_STORE",
                    value: kind,
                })
            }
        };

        Ok(Self { backend })
    }
}
