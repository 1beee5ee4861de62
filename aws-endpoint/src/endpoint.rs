/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Resolved endpoints and their application to outgoing request URIs.

use std::borrow::Cow;
use std::str::FromStr;

use http::uri::{Authority, Uri};

use crate::error::{InvalidEndpointError, InvalidEndpointPrefix};

/// API Endpoint
///
/// A base URI that operation paths are appended to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint {
    uri: Uri,

    /// If true, the endpoint prefix is ignored when setting the endpoint on a request
    immutable: bool,
}

impl Endpoint {
    /// Create a new endpoint from a URI
    ///
    /// Certain operations will augment the endpoint with additional metadata. For example,
    /// a bucket-addressed operation can prefix the host with the bucket name. If your endpoint does
    /// not support this (for example, when communicating with localhost), use [`Endpoint::immutable`].
    pub fn mutable(uri: Uri) -> Self {
        Endpoint {
            uri,
            immutable: false,
        }
    }

    /// Create a new immutable endpoint from a URI
    ///
    /// ```rust
    /// # use aws_endpoint::Endpoint;
    /// use http::Uri;
    /// let endpoint = Endpoint::immutable(Uri::from_static("http://localhost:8000"));
    /// ```
    ///
    /// Host prefixes requested by an operation are ignored by immutable endpoints.
    pub fn immutable(uri: Uri) -> Self {
        Endpoint {
            uri,
            immutable: true,
        }
    }

    /// The base URI of this endpoint
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Whether host prefixes are ignored by this endpoint
    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    /// Sets the endpoint on `uri`, potentially applying the specified `prefix` in the process.
    ///
    /// The path and query of `uri` are kept and appended to the endpoint's path.
    pub fn set_endpoint(
        &self,
        uri: &mut Uri,
        prefix: Option<&EndpointPrefix>,
    ) -> Result<(), InvalidEndpointError> {
        let prefix = prefix.map(|p| p.as_str()).unwrap_or("");
        let authority = self
            .uri
            .authority()
            .ok_or(InvalidEndpointError::EndpointMustHaveAuthority)?;
        let authority = if !self.immutable && !prefix.is_empty() {
            Authority::from_str(&format!("{}{}", prefix, authority)).map_err(|source| {
                InvalidEndpointError::InvalidPrefixedAuthority {
                    prefix: prefix.to_string(),
                    authority: authority.to_string(),
                    source,
                }
            })?
        } else {
            authority.clone()
        };
        let scheme = self
            .uri
            .scheme()
            .cloned()
            .ok_or(InvalidEndpointError::EndpointMustHaveScheme)?;
        let merged = Self::merge_paths(&self.uri, uri);
        let path_and_query = if merged.is_empty() {
            "/"
        } else {
            merged.as_ref()
        };
        let new_uri = Uri::builder()
            .authority(authority)
            .scheme(scheme)
            .path_and_query(path_and_query)
            .build()
            .map_err(InvalidEndpointError::FailedToBuildUri)?;
        *uri = new_uri;
        Ok(())
    }

    fn merge_paths<'a>(endpoint: &'a Uri, uri: &'a Uri) -> Cow<'a, str> {
        if let Some(query) = endpoint.path_and_query().and_then(|pq| pq.query()) {
            tracing::warn!(query = %query, "query specified in endpoint will be ignored during endpoint resolution");
        }
        let endpoint_path = endpoint.path();
        let uri_path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("");
        if endpoint_path.is_empty() {
            Cow::Borrowed(uri_path_and_query)
        } else {
            let ep_no_slash = endpoint_path.strip_suffix('/').unwrap_or(endpoint_path);
            let uri_path_no_slash = uri_path_and_query
                .strip_prefix('/')
                .unwrap_or(uri_path_and_query);
            Cow::Owned(format!("{}/{}", ep_no_slash, uri_path_no_slash))
        }
    }
}

/// Operation specific host prefix, e.g. a bucket name used for virtual hosting
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct EndpointPrefix(String);

impl EndpointPrefix {
    /// Validate and create a new prefix. The prefix must form a valid authority on its own.
    pub fn new(prefix: impl Into<String>) -> Result<Self, InvalidEndpointPrefix> {
        let prefix = prefix.into();
        match Authority::from_str(&prefix) {
            Ok(_) => Ok(EndpointPrefix(prefix)),
            Err(err) => Err(InvalidEndpointPrefix::new(prefix, err)),
        }
    }

    /// The prefix as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Output of endpoint resolution
///
/// Couples the [`Endpoint`] with the decisions the resolver made about it so that the transport
/// layer can apply it without revisiting the resolution context.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedEndpoint {
    endpoint: Endpoint,
    partition: Option<String>,
    host_prefix_allowed: bool,
}

impl ResolvedEndpoint {
    /// Create a resolved endpoint
    ///
    /// `partition` is `None` when the endpoint did not come from partition metadata, e.g. an
    /// endpoint override.
    pub fn new(endpoint: Endpoint, partition: Option<String>, host_prefix_allowed: bool) -> Self {
        Self {
            endpoint,
            partition,
            host_prefix_allowed,
        }
    }

    /// The resolved endpoint
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Base URI of the resolved endpoint
    pub fn uri(&self) -> &Uri {
        self.endpoint.uri()
    }

    /// Partition the endpoint was computed from
    pub fn partition(&self) -> Option<&str> {
        self.partition.as_deref()
    }

    /// Whether operation host prefixes will be applied by [`ResolvedEndpoint::apply`]
    pub fn host_prefix_allowed(&self) -> bool {
        self.host_prefix_allowed
    }

    /// Rewrites `uri` onto this endpoint.
    ///
    /// `prefix` is dropped when host prefix injection is disabled for this endpoint.
    pub fn apply(
        &self,
        uri: &mut Uri,
        prefix: Option<&EndpointPrefix>,
    ) -> Result<(), InvalidEndpointError> {
        let prefix = prefix.filter(|_| self.host_prefix_allowed);
        self.endpoint.set_endpoint(uri, prefix)
    }
}

#[cfg(test)]
mod test {
    use http::Uri;

    use crate::endpoint::{Endpoint, EndpointPrefix, ResolvedEndpoint};
    use crate::error::InvalidEndpointError;

    #[test]
    fn prefix_endpoint() {
        let ep = Endpoint::mutable(Uri::from_static("https://us-east-1.dynamo.amazonaws.com"));
        let mut uri = Uri::from_static("/list_tables?k=v");
        ep.set_endpoint(
            &mut uri,
            Some(&EndpointPrefix::new("subregion.").expect("valid prefix")),
        )
        .expect("valid endpoint");
        assert_eq!(
            uri,
            Uri::from_static("https://subregion.us-east-1.dynamo.amazonaws.com/list_tables?k=v")
        );
    }

    #[test]
    fn prefix_endpoint_custom_port() {
        let ep = Endpoint::mutable(Uri::from_static(
            "https://us-east-1.dynamo.amazonaws.com:6443",
        ));
        let mut uri = Uri::from_static("/list_tables?k=v");
        ep.set_endpoint(
            &mut uri,
            Some(&EndpointPrefix::new("subregion.").expect("valid prefix")),
        )
        .expect("valid endpoint");
        assert_eq!(
            uri,
            Uri::from_static(
                "https://subregion.us-east-1.dynamo.amazonaws.com:6443/list_tables?k=v"
            )
        );
    }

    #[test]
    fn prefix_immutable_endpoint() {
        let ep = Endpoint::immutable(Uri::from_static("https://us-east-1.dynamo.amazonaws.com"));
        let mut uri = Uri::from_static("/list_tables?k=v");
        ep.set_endpoint(
            &mut uri,
            Some(&EndpointPrefix::new("subregion.").expect("valid prefix")),
        )
        .expect("valid endpoint");
        assert_eq!(
            uri,
            Uri::from_static("https://us-east-1.dynamo.amazonaws.com/list_tables?k=v")
        );
    }

    #[test]
    fn endpoint_with_path() {
        for uri in &[
            // check that trailing slashes are properly normalized
            "https://us-east-1.dynamo.amazonaws.com/private",
            "https://us-east-1.dynamo.amazonaws.com/private/",
        ] {
            let ep = Endpoint::immutable(Uri::from_static(uri));
            let mut uri = Uri::from_static("/list_tables?k=v");
            ep.set_endpoint(
                &mut uri,
                Some(&EndpointPrefix::new("subregion.").expect("valid prefix")),
            )
            .expect("valid endpoint");
            assert_eq!(
                uri,
                Uri::from_static("https://us-east-1.dynamo.amazonaws.com/private/list_tables?k=v")
            );
        }
    }

    #[test]
    fn set_endpoint_empty_path() {
        let ep = Endpoint::immutable(Uri::from_static("http://localhost:8000"));
        let mut uri = Uri::from_static("/");
        ep.set_endpoint(&mut uri, None).expect("valid endpoint");
        assert_eq!(uri, Uri::from_static("http://localhost:8000/"))
    }

    #[test]
    fn endpoint_without_authority_is_rejected() {
        let ep = Endpoint::mutable(Uri::from_static("/just/a/path"));
        let mut uri = Uri::from_static("/list_tables");
        let err = ep.set_endpoint(&mut uri, None).expect_err("no authority");
        assert!(matches!(err, InvalidEndpointError::EndpointMustHaveAuthority));
        assert_eq!(uri, Uri::from_static("/list_tables"));
    }

    #[test]
    fn invalid_prefix() {
        EndpointPrefix::new("not a prefix").expect_err("spaces are not allowed in a host");
    }

    #[test]
    fn resolved_endpoint_drops_prefix_when_disallowed() {
        let endpoint = Endpoint::mutable(Uri::from_static("https://s3.us-west-2.amazonaws.com"));
        let prefix = EndpointPrefix::new("bucket.").expect("valid prefix");

        let allowed = ResolvedEndpoint::new(endpoint.clone(), Some("aws".into()), true);
        let mut uri = Uri::from_static("/key");
        allowed.apply(&mut uri, Some(&prefix)).expect("valid");
        assert_eq!(
            uri,
            Uri::from_static("https://bucket.s3.us-west-2.amazonaws.com/key")
        );

        let disallowed = ResolvedEndpoint::new(endpoint, Some("aws".into()), false);
        let mut uri = Uri::from_static("/key");
        disallowed.apply(&mut uri, Some(&prefix)).expect("valid");
        assert_eq!(uri, Uri::from_static("https://s3.us-west-2.amazonaws.com/key"));
        assert_eq!(disallowed.partition(), Some("aws"));
    }
}
