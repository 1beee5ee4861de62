/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Errors returned while building a resolution context or resolving an endpoint.

use thiserror::Error;

/// Boxed error used as the cause of custom resolver failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The configuration cannot produce an endpoint.
///
/// These errors are never transient: retrying the same configuration yields the same error.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidConfigurationError {
    /// Neither a region nor an endpoint override was configured
    #[error("a region must be set when no endpoint override is configured")]
    MissingRegion,

    /// The region cannot be used as part of a host name
    #[error("`{region}` is not a valid region: {reason}")]
    InvalidRegion {
        /// The rejected region
        region: String,
        /// Why the region was rejected
        reason: &'static str,
    },

    /// The service name cannot be used as a host label
    #[error("`{service}` is not a valid service name: {reason}")]
    InvalidServiceName {
        /// The rejected service name
        service: String,
        /// Why the service name was rejected
        reason: &'static str,
    },

    /// The endpoint override is not an absolute URI
    #[error("endpoint override `{uri}` is invalid: {reason}")]
    InvalidEndpointOverride {
        /// The rejected override
        uri: String,
        /// Why the override was rejected
        reason: &'static str,
    },

    /// FIPS was requested but the partition has no FIPS endpoints
    #[error("FIPS is enabled but partition `{partition}` does not support FIPS")]
    FipsNotSupported {
        /// Partition the region belongs to
        partition: String,
    },

    /// Dual-stack was requested but the partition has no dual-stack endpoints
    #[error("dual-stack is enabled but partition `{partition}` does not support dual-stack")]
    DualStackNotSupported {
        /// Partition the region belongs to
        partition: String,
    },
}

/// Endpoint resolution failed
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ResolveEndpointError {
    /// The resolution context cannot produce an endpoint
    #[error("invalid endpoint configuration")]
    InvalidConfiguration(#[from] InvalidConfigurationError),

    /// The computed endpoint is not a valid URI
    #[error("resolved endpoint `{uri}` is not a valid URI")]
    InvalidUri {
        /// The rejected URI
        uri: String,
        /// Underlying parse error
        #[source]
        source: http::uri::InvalidUri,
    },

    /// A custom resolver failed
    #[error("{message}")]
    Other {
        /// Description of the failure
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<BoxError>,
    },
}

impl ResolveEndpointError {
    /// Create a [`ResolveEndpointError`] with a message
    pub fn message(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            source: None,
        }
    }

    /// Attach a cause to a message error. Other variants are returned unchanged.
    pub fn with_cause(self, cause: impl Into<BoxError>) -> Self {
        match self {
            Self::Other { message, .. } => Self::Other {
                message,
                source: Some(cause.into()),
            },
            other => other,
        }
    }

    /// Returns the configuration error, if this is one
    pub fn as_invalid_configuration(&self) -> Option<&InvalidConfigurationError> {
        match self {
            Self::InvalidConfiguration(err) => Some(err),
            _ => None,
        }
    }
}

/// Errors applying a resolved endpoint to a request URI
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum InvalidEndpointError {
    /// The endpoint has no authority to send requests to
    #[error("endpoint must have an authority")]
    EndpointMustHaveAuthority,

    /// The endpoint has no scheme
    #[error("endpoint must have a scheme")]
    EndpointMustHaveScheme,

    /// The host prefix combined with the endpoint authority is not a valid authority
    #[error("host prefix `{prefix}` cannot be applied to `{authority}`")]
    InvalidPrefixedAuthority {
        /// The prefix being applied
        prefix: String,
        /// The endpoint authority
        authority: String,
        /// Underlying parse error
        #[source]
        source: http::uri::InvalidUri,
    },

    /// The merged URI could not be built
    #[error("failed to build request URI")]
    FailedToBuildUri(#[source] http::Error),
}

/// A host prefix is not a valid authority fragment
#[derive(Debug, Error)]
#[error("`{prefix}` is not a valid endpoint prefix")]
pub struct InvalidEndpointPrefix {
    prefix: String,
    #[source]
    source: http::uri::InvalidUri,
}

impl InvalidEndpointPrefix {
    pub(crate) fn new(prefix: String, source: http::uri::InvalidUri) -> Self {
        Self { prefix, source }
    }
}

/// Partition metadata could not be loaded
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PartitionMetadataError {
    /// The document is not valid partition JSON
    #[error("invalid partition metadata document")]
    InvalidDocument(#[from] serde_json::Error),

    /// A partition's region regex does not compile
    #[error("partition `{partition}` has an invalid region regex")]
    InvalidRegionRegex {
        /// The partition whose regex failed
        partition: String,
        /// Underlying regex error
        #[source]
        source: regex_lite::Error,
    },

    /// The document defines no partitions
    #[error("partition metadata must define at least one partition")]
    NoPartitions,
}
