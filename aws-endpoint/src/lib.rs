/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! AWS endpoint resolution
//!
//! Maps a region, the FIPS and dual-stack variant flags, and an optional endpoint override to
//! the base URL requests are sent to.
//!
//! ```rust
//! use aws_endpoint::{DefaultResolver, EndpointResolverContext, ResolveEndpoint, ServiceConfiguration};
//! use aws_types::region::Region;
//! use http::Uri;
//!
//! let resolver = DefaultResolver::new("customresponsemetadata");
//! let context = EndpointResolverContext::try_new(
//!     Some(Region::new("us-west-2")),
//!     ServiceConfiguration::new().with_use_dual_stack(true),
//!     None,
//!     false,
//! )?;
//! let endpoint = resolver.resolve_endpoint(&context)?;
//!
//! let mut request_uri = Uri::from_static("/2016-03-11/allTypes");
//! endpoint.apply(&mut request_uri, None)?;
//! assert_eq!(
//!     request_uri.to_string(),
//!     "https://customresponsemetadata.us-west-2.api.aws/2016-03-11/allTypes"
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs, rust_2018_idioms)]

pub mod context;
pub mod endpoint;
pub mod env_config;
pub mod error;
pub mod partition;
pub mod resolver;

pub use context::{EndpointResolverContext, ServiceConfiguration};
pub use endpoint::{Endpoint, EndpointPrefix, ResolvedEndpoint};
pub use error::{InvalidConfigurationError, ResolveEndpointError};
pub use partition::{Partition, PartitionResolver};
pub use resolver::{DefaultResolver, ResolveEndpoint, SharedEndpointResolver};
