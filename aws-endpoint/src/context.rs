/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Inputs to endpoint resolution.

use std::collections::BTreeMap;

use aws_types::region::Region;
use http::Uri;

use crate::error::InvalidConfigurationError;

/// Service level options that influence which endpoint is selected
///
/// # Examples
/// ```rust
/// use aws_endpoint::ServiceConfiguration;
/// let config = ServiceConfiguration::new()
///     .with_use_fips(true)
///     .with_use_dual_stack(true);
/// assert!(config.use_fips());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ServiceConfiguration {
    use_dual_stack: bool,
    use_fips: bool,
    path_style_access: bool,
    // ordered so that equality and hashing do not depend on insertion order
    options: BTreeMap<String, String>,
}

impl ServiceConfiguration {
    /// Configuration with every option disabled
    pub fn new() -> Self {
        Self::default()
    }

    /// When true, send requests to the dual-stack (IPv4 and IPv6) endpoint.
    ///
    /// If the partition has no dual-stack endpoints, resolution fails.
    pub fn with_use_dual_stack(mut self, use_dual_stack: bool) -> Self {
        self.use_dual_stack = use_dual_stack;
        self
    }

    /// When true, send requests to the FIPS-compliant regional endpoint.
    ///
    /// If no FIPS-compliant endpoint can be determined, resolution fails.
    pub fn with_use_fips(mut self, use_fips: bool) -> Self {
        self.use_fips = use_fips;
        self
    }

    /// When true, operation data (e.g. bucket names) stays in the path instead of being injected
    /// into the host.
    pub fn with_path_style_access(mut self, path_style_access: bool) -> Self {
        self.path_style_access = path_style_access;
        self
    }

    /// Set a named service specific option
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    /// Whether dual-stack endpoints are requested
    pub fn use_dual_stack(&self) -> bool {
        self.use_dual_stack
    }

    /// Whether FIPS endpoints are requested
    pub fn use_fips(&self) -> bool {
        self.use_fips
    }

    /// Whether path style addressing is requested
    pub fn path_style_access(&self) -> bool {
        self.path_style_access
    }

    /// Look up a named service specific option
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }
}

/// Everything an endpoint resolver needs to know about a request
///
/// Contexts are validated when they are created and are immutable afterwards. Modified copies are
/// produced with the `with_*` methods, which carry every other field forward unchanged.
///
/// # Examples
/// ```rust
/// use aws_endpoint::{EndpointResolverContext, ServiceConfiguration};
/// use aws_types::region::Region;
///
/// let context = EndpointResolverContext::try_new(
///     Some(Region::new("us-west-2")),
///     ServiceConfiguration::new().with_use_dual_stack(true),
///     None,
///     false,
/// )
/// .expect("valid context");
/// assert!(context.use_dual_stack());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EndpointResolverContext {
    region: Option<Region>,
    service_configuration: ServiceConfiguration,
    endpoint_override: Option<Uri>,
    disable_host_prefix_injection: bool,
}

impl EndpointResolverContext {
    /// Validate and create a resolution context
    ///
    /// Fails when:
    /// - there is neither a region nor an endpoint override
    /// - the region cannot be used in a host name
    /// - the endpoint override is not an absolute `http` or `https` URI
    pub fn try_new(
        region: Option<Region>,
        service_configuration: ServiceConfiguration,
        endpoint_override: Option<Uri>,
        disable_host_prefix_injection: bool,
    ) -> Result<Self, InvalidConfigurationError> {
        if let Some(uri) = &endpoint_override {
            validate_endpoint_override(uri)?;
        }
        match &region {
            Some(region) => validate_region(region)?,
            None if endpoint_override.is_none() => {
                return Err(InvalidConfigurationError::MissingRegion)
            }
            None => {}
        }
        Ok(Self {
            region,
            service_configuration,
            endpoint_override,
            disable_host_prefix_injection,
        })
    }

    /// Copy of this context with a different region
    pub fn with_region(self, region: Option<Region>) -> Result<Self, InvalidConfigurationError> {
        Self::try_new(
            region,
            self.service_configuration,
            self.endpoint_override,
            self.disable_host_prefix_injection,
        )
    }

    /// Copy of this context with different service configuration
    pub fn with_service_configuration(
        self,
        service_configuration: ServiceConfiguration,
    ) -> Result<Self, InvalidConfigurationError> {
        Self::try_new(
            self.region,
            service_configuration,
            self.endpoint_override,
            self.disable_host_prefix_injection,
        )
    }

    /// Copy of this context with a different endpoint override
    pub fn with_endpoint_override(
        self,
        endpoint_override: Option<Uri>,
    ) -> Result<Self, InvalidConfigurationError> {
        Self::try_new(
            self.region,
            self.service_configuration,
            endpoint_override,
            self.disable_host_prefix_injection,
        )
    }

    /// Copy of this context with host prefix injection enabled or disabled
    pub fn with_disable_host_prefix_injection(self, disable_host_prefix_injection: bool) -> Self {
        Self {
            disable_host_prefix_injection,
            ..self
        }
    }

    /// The region as configured, including any legacy `fips` marker
    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    /// The region endpoints are computed for, with any legacy `fips` marker removed
    pub fn effective_region(&self) -> Option<Region> {
        self.region
            .as_ref()
            .map(|region| match strip_fips_marker(region.as_ref()) {
                Some(stripped) => Region::new(stripped.to_owned()),
                None => region.clone(),
            })
    }

    /// Service configuration for this request
    pub fn service_configuration(&self) -> &ServiceConfiguration {
        &self.service_configuration
    }

    /// Explicit endpoint that bypasses region based resolution
    pub fn endpoint_override(&self) -> Option<&Uri> {
        self.endpoint_override.as_ref()
    }

    /// Whether operation host prefixes are suppressed
    pub fn disable_host_prefix_injection(&self) -> bool {
        self.disable_host_prefix_injection
    }

    /// FIPS is requested explicitly or through a legacy pseudo-region such as `fips-us-gov-west-1`
    pub fn use_fips(&self) -> bool {
        self.service_configuration.use_fips()
            || self
                .region
                .as_ref()
                .map(|region| strip_fips_marker(region.as_ref()).is_some())
                .unwrap_or(false)
    }

    /// Dual-stack is requested
    pub fn use_dual_stack(&self) -> bool {
        self.service_configuration.use_dual_stack()
    }

    /// Whether operation host prefixes may be applied to the resolved endpoint
    pub fn host_prefix_allowed(&self) -> bool {
        !self.disable_host_prefix_injection && !self.service_configuration.path_style_access()
    }
}

fn strip_fips_marker(region: &str) -> Option<&str> {
    region
        .strip_prefix("fips-")
        .or_else(|| region.strip_suffix("-fips"))
}

pub(crate) fn validate_region(region: &Region) -> Result<(), InvalidConfigurationError> {
    let invalid = |reason| InvalidConfigurationError::InvalidRegion {
        region: region.to_string(),
        reason,
    };
    let name = strip_fips_marker(region.as_ref()).unwrap_or(region.as_ref());
    if name.is_empty() {
        return Err(invalid("region must not be empty"));
    }
    if name.len() > 63 {
        return Err(invalid("region must be at most 63 characters"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(invalid(
            "region may only contain ASCII letters, digits, and hyphens",
        ));
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Err(invalid("region must not start or end with a hyphen"));
    }
    Ok(())
}

pub(crate) fn validate_endpoint_override(uri: &Uri) -> Result<(), InvalidConfigurationError> {
    let invalid = |reason| InvalidConfigurationError::InvalidEndpointOverride {
        uri: uri.to_string(),
        reason,
    };
    match uri.scheme_str() {
        Some("http") | Some("https") => {}
        Some(_) => return Err(invalid("scheme must be `http` or `https`")),
        None => return Err(invalid("a scheme is required")),
    }
    if uri.authority().is_none() {
        return Err(invalid("a host is required"));
    }
    Ok(())
}
