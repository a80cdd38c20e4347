use std::sync::Arc;

use crate::client::RdsDataClient;
use crate::error::RdsDataError;
use crate::transport::DataApiTransport;

pub const ENV_RESOURCE_ARN: &str = "RDS_DATA_API_CLIENT_RESOURCE_ARN";
pub const ENV_SECRET_ARN: &str = "RDS_DATA_API_CLIENT_SECRETARN";
pub const ENV_DATABASE: &str = "RDS_DATA_API_CLIENT_DATABASE";
pub const ENV_REGION: &str = "RDS_DATA_API_CLIENT_REGION";
pub const ENV_ENDPOINT: &str = "RDS_DATA_API_CLIENT_ENDPOINT";

/// Target database and endpoint settings for a Data API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RdsDataOptions {
    /// ARN of the Aurora cluster
    pub resource_arn: String,
    /// ARN of the secret holding database credentials
    pub secret_arn: String,
    pub database: String,
    pub schema: Option<String>,
    /// AWS region, for transports that sign requests; the HTTP transport ignores it
    pub region: Option<String>,
    /// Base URL of a Data API compatible endpoint, required by the HTTP transport
    pub endpoint: Option<String>,
}

impl RdsDataOptions {
    #[must_use]
    pub fn new(
        resource_arn: impl Into<String>,
        secret_arn: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            resource_arn: resource_arn.into(),
            secret_arn: secret_arn.into(),
            database: database.into(),
            schema: None,
            region: None,
            endpoint: None,
        }
    }

    #[must_use]
    pub fn builder(
        resource_arn: impl Into<String>,
        secret_arn: impl Into<String>,
        database: impl Into<String>,
    ) -> RdsDataOptionsBuilder {
        RdsDataOptionsBuilder::new(resource_arn, secret_arn, database)
    }

    /// Read options from the `RDS_DATA_API_CLIENT_*` environment variables.
    ///
    /// The region falls back to `AWS_REGION`, then `AWS_DEFAULT_REGION`.
    ///
    /// # Errors
    /// Returns `RdsDataError::ConfigError` if a required variable is missing or empty.
    pub fn from_env() -> Result<Self, RdsDataError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, RdsDataError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            non_empty(key)
                .ok_or_else(|| RdsDataError::ConfigError(format!("{key} is required")))
        };

        let options = Self {
            resource_arn: required(ENV_RESOURCE_ARN)?,
            secret_arn: required(ENV_SECRET_ARN)?,
            database: required(ENV_DATABASE)?,
            schema: None,
            region: non_empty(ENV_REGION)
                .or_else(|| non_empty("AWS_REGION"))
                .or_else(|| non_empty("AWS_DEFAULT_REGION")),
            endpoint: non_empty(ENV_ENDPOINT),
        };
        Ok(options)
    }

    /// Check that the target identifiers are present.
    ///
    /// # Errors
    /// Returns `RdsDataError::ConfigError` naming the first empty field.
    pub fn validate(&self) -> Result<(), RdsDataError> {
        if self.resource_arn.trim().is_empty() {
            return Err(RdsDataError::ConfigError(
                "resource_arn is required".to_string(),
            ));
        }
        if self.secret_arn.trim().is_empty() {
            return Err(RdsDataError::ConfigError(
                "secret_arn is required".to_string(),
            ));
        }
        if self.database.trim().is_empty() {
            return Err(RdsDataError::ConfigError(
                "database is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fluent builder for Data API options.
#[derive(Debug, Clone)]
pub struct RdsDataOptionsBuilder {
    opts: RdsDataOptions,
}

impl RdsDataOptionsBuilder {
    #[must_use]
    pub fn new(
        resource_arn: impl Into<String>,
        secret_arn: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            opts: RdsDataOptions::new(resource_arn, secret_arn, database),
        }
    }

    #[must_use]
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.opts.schema = Some(schema.into());
        self
    }

    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.opts.region = Some(region.into());
        self
    }

    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.opts.endpoint = Some(endpoint.into());
        self
    }

    #[must_use]
    pub fn finish(self) -> RdsDataOptions {
        self.opts
    }

    /// Validate the options and build a client over `transport`.
    ///
    /// # Errors
    /// Returns `RdsDataError::ConfigError` if validation fails.
    pub fn build(
        self,
        transport: Arc<dyn DataApiTransport>,
    ) -> Result<RdsDataClient, RdsDataError> {
        RdsDataClient::new(self.finish(), transport)
    }
}
