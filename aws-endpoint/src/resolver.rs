/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Endpoint resolvers

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use http::Uri;

use crate::context::EndpointResolverContext;
use crate::endpoint::{Endpoint, ResolvedEndpoint};
use crate::error::{InvalidConfigurationError, ResolveEndpointError};
use crate::partition::PartitionResolver;

/// Result of endpoint resolution
pub type Result = std::result::Result<ResolvedEndpoint, ResolveEndpointError>;

/// Resolve an endpoint for a request
///
/// Implementations must be pure: resolving the same context twice returns the same endpoint.
pub trait ResolveEndpoint: Send + Sync {
    /// Resolve the endpoint for `context`
    fn resolve_endpoint(&self, context: &EndpointResolverContext) -> Result;
}

// Implement the resolver trait for all closures and functions that take
// a context and return a `Result`
impl<F> ResolveEndpoint for F
where
    F: Fn(&EndpointResolverContext) -> Result + Send + Sync,
{
    fn resolve_endpoint(&self, context: &EndpointResolverContext) -> Result {
        (self)(context)
    }
}

// Static `Endpoint`s can be passed in place of a resolver.
impl ResolveEndpoint for Endpoint {
    fn resolve_endpoint(&self, context: &EndpointResolverContext) -> Result {
        Ok(ResolvedEndpoint::new(
            self.clone(),
            None,
            context.host_prefix_allowed(),
        ))
    }
}

/// A cheaply clonable, type erased [`ResolveEndpoint`]
#[derive(Clone)]
pub struct SharedEndpointResolver(Arc<dyn ResolveEndpoint>);

impl SharedEndpointResolver {
    /// Wrap `resolver`
    pub fn new(resolver: impl ResolveEndpoint + 'static) -> Self {
        Self(Arc::new(resolver))
    }

    /// Wrap an existing `Arc`
    pub fn from_arc(arc: Arc<dyn ResolveEndpoint>) -> Self {
        Self(arc)
    }
}

impl fmt::Debug for SharedEndpointResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedEndpointResolver").finish()
    }
}

impl ResolveEndpoint for SharedEndpointResolver {
    fn resolve_endpoint(&self, context: &EndpointResolverContext) -> Result {
        self.0.resolve_endpoint(context)
    }
}

/// Region based resolver for a single service
///
/// | dual-stack | FIPS  | endpoint                                        |
/// |------------|-------|-------------------------------------------------|
/// | false      | false | `https://{service}.{region}.{dnsSuffix}`          |
/// | false      | true  | `https://{service}-fips.{region}.{dnsSuffix}`     |
/// | true       | false | `https://{service}.{region}.{dualStackDnsSuffix}` |
/// | true       | true  | `https://{service}-fips.{region}.{dualStackDnsSuffix}` |
///
/// An endpoint override in the context is returned as-is, regardless of the variant flags.
///
/// # Examples
/// ```rust
/// use aws_endpoint::{DefaultResolver, EndpointResolverContext, ResolveEndpoint, ServiceConfiguration};
/// use aws_types::region::Region;
///
/// let resolver = DefaultResolver::new("kinesis");
/// let context = EndpointResolverContext::try_new(
///     Some(Region::new("us-west-2")),
///     ServiceConfiguration::new().with_use_fips(true),
///     None,
///     false,
/// )
/// .expect("valid context");
/// let endpoint = resolver.resolve_endpoint(&context).expect("valid endpoint");
/// assert_eq!(
///     endpoint.uri().to_string(),
///     "https://kinesis-fips.us-west-2.amazonaws.com/"
/// );
/// ```
#[derive(Clone, Debug)]
pub struct DefaultResolver {
    service: Cow<'static, str>,
    partitions: PartitionResolver,
}

impl DefaultResolver {
    /// Resolver for `service` using the built-in partition metadata
    pub fn new(service: impl Into<Cow<'static, str>>) -> Self {
        Self {
            service: service.into(),
            partitions: PartitionResolver::default(),
        }
    }

    /// Replace the partition metadata
    pub fn with_partitions(mut self, partitions: PartitionResolver) -> Self {
        self.partitions = partitions;
        self
    }

    /// The service endpoints are resolved for
    pub fn service(&self) -> &str {
        &self.service
    }
}

impl ResolveEndpoint for DefaultResolver {
    fn resolve_endpoint(&self, context: &EndpointResolverContext) -> Result {
        let host_prefix_allowed = context.host_prefix_allowed();
        if let Some(endpoint_override) = context.endpoint_override() {
            tracing::debug!(endpoint = %endpoint_override, "using endpoint override");
            return Ok(ResolvedEndpoint::new(
                Endpoint::mutable(endpoint_override.clone()),
                None,
                host_prefix_allowed,
            ));
        }

        validate_service(&self.service)?;
        let region = context
            .effective_region()
            .ok_or(InvalidConfigurationError::MissingRegion)?;
        let use_fips = context.use_fips();
        let use_dual_stack = context.use_dual_stack();

        let partition = self.partitions.resolve_partition(region.as_ref());
        tracing::trace!(partition = partition.id(), region = %region, "selected partition");
        if use_fips && !partition.supports_fips() {
            return Err(InvalidConfigurationError::FipsNotSupported {
                partition: partition.id().to_owned(),
            }
            .into());
        }
        if use_dual_stack && !partition.supports_dual_stack() {
            return Err(InvalidConfigurationError::DualStackNotSupported {
                partition: partition.id().to_owned(),
            }
            .into());
        }

        let fips = if use_fips { "-fips" } else { "" };
        let dns_suffix = if use_dual_stack {
            partition.dual_stack_dns_suffix()
        } else {
            partition.dns_suffix()
        };
        let url = format!("https://{}{}.{}.{}", self.service, fips, region, dns_suffix);
        let uri: Uri = url
            .parse()
            .map_err(|source| ResolveEndpointError::InvalidUri {
                uri: url.clone(),
                source,
            })?;
        tracing::debug!(endpoint = %uri, region = %region, use_fips, use_dual_stack, "resolved endpoint");
        Ok(ResolvedEndpoint::new(
            Endpoint::mutable(uri),
            Some(partition.id().to_owned()),
            host_prefix_allowed,
        ))
    }
}

fn validate_service(service: &str) -> std::result::Result<(), InvalidConfigurationError> {
    let invalid = |reason| InvalidConfigurationError::InvalidServiceName {
        service: service.to_owned(),
        reason,
    };
    if service.is_empty() || service.len() > 63 {
        return Err(invalid("service name must be between 1 and 63 characters"));
    }
    if !service.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(invalid(
            "service name may only contain ASCII letters, digits, and hyphens",
        ));
    }
    if service.starts_with('-') || service.ends_with('-') {
        return Err(invalid("service name must not start or end with a hyphen"));
    }
    Ok(())
}
