/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;
use std::thread;

use aws_endpoint::{
    DefaultResolver, EndpointPrefix, EndpointResolverContext, InvalidConfigurationError,
    ResolveEndpoint, ServiceConfiguration, SharedEndpointResolver,
};
use aws_types::region::Region;
use http::Uri;
use proptest::prelude::*;

const SERVICE: &str = "customresponsemetadata";
const OPERATION_PATH: &str = "/2016-03-11/allTypes";

fn context(dual_stack: bool, fips: bool) -> EndpointResolverContext {
    EndpointResolverContext::try_new(
        Some(Region::from_static("us-west-2")),
        ServiceConfiguration::new()
            .with_use_dual_stack(dual_stack)
            .with_use_fips(fips),
        None,
        false,
    )
    .expect("valid context")
}

fn request_url(context: &EndpointResolverContext) -> String {
    let endpoint = DefaultResolver::new(SERVICE)
        .resolve_endpoint(context)
        .expect("endpoint resolves");
    let mut uri = Uri::from_static(OPERATION_PATH);
    endpoint.apply(&mut uri, None).expect("valid endpoint");
    uri.to_string()
}

#[test]
fn dualstack_endpoint_resolution() {
    assert_eq!(
        request_url(&context(true, false)),
        "https://customresponsemetadata.us-west-2.api.aws/2016-03-11/allTypes"
    );
}

#[test]
fn fips_endpoint_resolution() {
    assert_eq!(
        request_url(&context(false, true)),
        "https://customresponsemetadata-fips.us-west-2.amazonaws.com/2016-03-11/allTypes"
    );
}

#[test]
fn dualstack_fips_endpoint_resolution() {
    assert_eq!(
        request_url(&context(true, true)),
        "https://customresponsemetadata-fips.us-west-2.api.aws/2016-03-11/allTypes"
    );
}

#[test]
fn standard_endpoint_resolution() {
    assert_eq!(
        request_url(&context(false, false)),
        "https://customresponsemetadata.us-west-2.amazonaws.com/2016-03-11/allTypes"
    );
}

#[test]
fn override_with_base_path() {
    let context = context(true, true)
        .with_endpoint_override(Some(Uri::from_static("http://localhost:4566/proxy/")))
        .expect("valid override");
    assert_eq!(
        request_url(&context),
        "http://localhost:4566/proxy/2016-03-11/allTypes"
    );
}

#[test]
fn host_prefix_injection() {
    let resolver = DefaultResolver::new(SERVICE);
    let prefix = EndpointPrefix::new("data.").expect("valid prefix");

    let endpoint = resolver
        .resolve_endpoint(&context(false, false))
        .expect("endpoint resolves");
    let mut uri = Uri::from_static(OPERATION_PATH);
    endpoint.apply(&mut uri, Some(&prefix)).expect("valid");
    assert_eq!(
        uri.to_string(),
        "https://data.customresponsemetadata.us-west-2.amazonaws.com/2016-03-11/allTypes"
    );

    let disabled = context(false, false).with_disable_host_prefix_injection(true);
    let endpoint = resolver
        .resolve_endpoint(&disabled)
        .expect("endpoint resolves");
    let mut uri = Uri::from_static(OPERATION_PATH);
    endpoint.apply(&mut uri, Some(&prefix)).expect("valid");
    assert_eq!(
        uri.to_string(),
        "https://customresponsemetadata.us-west-2.amazonaws.com/2016-03-11/allTypes"
    );
}

#[test]
fn unsupported_variant_fails_before_any_url_is_built() {
    let context = EndpointResolverContext::try_new(
        Some(Region::from_static("us-iso-east-1")),
        ServiceConfiguration::new()
            .with_use_dual_stack(true)
            .with_use_fips(true),
        None,
        false,
    )
    .expect("valid context");
    let err = DefaultResolver::new(SERVICE)
        .resolve_endpoint(&context)
        .expect_err("aws-iso has no dual-stack endpoints");
    assert_eq!(
        err.as_invalid_configuration(),
        Some(&InvalidConfigurationError::DualStackNotSupported {
            partition: "aws-iso".into()
        })
    );
}

#[test]
fn shared_resolver_across_threads() {
    let resolver = SharedEndpointResolver::new(DefaultResolver::new(SERVICE));
    let context = Arc::new(context(true, true));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolver = resolver.clone();
            let context = context.clone();
            thread::spawn(move || {
                resolver
                    .resolve_endpoint(&context)
                    .expect("endpoint resolves")
                    .uri()
                    .to_string()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(
            handle.join().expect("no panic"),
            "https://customresponsemetadata-fips.us-west-2.api.aws/"
        );
    }
}

fn region_name() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["us", "eu", "ap", "sa", "ca", "me", "af"]),
        prop::sample::select(vec!["east", "west", "north", "south", "central"]),
        1u8..10,
    )
        .prop_map(|(area, direction, n)| format!("{area}-{direction}-{n}"))
}

proptest! {
    #[test]
    fn variant_table_holds_for_all_regions(
        region in region_name(),
        dual_stack in any::<bool>(),
        fips in any::<bool>(),
    ) {
        let context = EndpointResolverContext::try_new(
            Some(Region::new(region.clone())),
            ServiceConfiguration::new()
                .with_use_dual_stack(dual_stack)
                .with_use_fips(fips),
            None,
            false,
        )
        .expect("valid context");
        let service = if fips { "customresponsemetadata-fips" } else { SERVICE };
        let suffix = if dual_stack { "api.aws" } else { "amazonaws.com" };
        let resolver = DefaultResolver::new(SERVICE);
        let first = resolver.resolve_endpoint(&context).expect("endpoint resolves");
        let second = resolver.resolve_endpoint(&context).expect("endpoint resolves");
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            first.uri().to_string(),
            format!("https://{service}.{region}.{suffix}/")
        );
    }

    #[test]
    fn override_ignores_variant_flags(
        region in region_name(),
        dual_stack in any::<bool>(),
        fips in any::<bool>(),
        port in 1024u16..65535,
    ) {
        let endpoint_override: Uri = format!("https://localhost:{port}").parse().expect("valid uri");
        let context = EndpointResolverContext::try_new(
            Some(Region::new(region)),
            ServiceConfiguration::new()
                .with_use_dual_stack(dual_stack)
                .with_use_fips(fips),
            Some(endpoint_override.clone()),
            false,
        )
        .expect("valid context");
        let endpoint = DefaultResolver::new(SERVICE)
            .resolve_endpoint(&context)
            .expect("endpoint resolves");
        prop_assert_eq!(endpoint.uri(), &endpoint_override);
    }
}
