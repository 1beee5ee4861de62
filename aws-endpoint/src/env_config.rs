/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Load endpoint settings from the process environment

use aws_types::os_shim_internal::Env;
use aws_types::region::Region;
use http::Uri;

use crate::context::{
    validate_endpoint_override, validate_region, EndpointResolverContext, ServiceConfiguration,
};
use crate::error::InvalidConfigurationError;

mod env {
    pub(super) const USE_FIPS_ENDPOINT: &str = "AWS_USE_FIPS_ENDPOINT";
    pub(super) const USE_DUALSTACK_ENDPOINT: &str = "AWS_USE_DUALSTACK_ENDPOINT";
    pub(super) const ENDPOINT_URL: &str = "AWS_ENDPOINT_URL";
    pub(super) const REGION: &str = "AWS_REGION";
    pub(super) const DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";
}

/// Endpoint settings found in the environment
///
/// This checks the following variables:
/// 1. `AWS_REGION`, then `AWS_DEFAULT_REGION`
/// 2. `AWS_USE_FIPS_ENDPOINT=true/false`
/// 3. `AWS_USE_DUALSTACK_ENDPOINT=true/false`
/// 4. `AWS_ENDPOINT_URL`
///
/// Invalid values are logged and ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvironmentConfig {
    region: Option<Region>,
    use_fips: Option<bool>,
    use_dual_stack: Option<bool>,
    endpoint_url: Option<Uri>,
}

impl EnvironmentConfig {
    /// Read settings from `env`
    pub fn load(env: &Env) -> Self {
        let region = non_empty(env, env::REGION)
            .map(|region| (env::REGION, region))
            .or_else(|| {
                non_empty(env, env::DEFAULT_REGION).map(|region| (env::DEFAULT_REGION, region))
            })
            .and_then(|(var, region)| {
                let region = Region::new(region);
                match validate_region(&region) {
                    Ok(()) => Some(region),
                    Err(err) => {
                        tracing::warn!(
                            var = var,
                            err = %err,
                            "invalid value for environment variable, ignoring"
                        );
                        None
                    }
                }
            });
        let endpoint_url = non_empty(env, env::ENDPOINT_URL).and_then(|url| {
            let checked = url
                .parse::<Uri>()
                .map_err(|err| err.to_string())
                .and_then(|uri| {
                    validate_endpoint_override(&uri)
                        .map(|()| uri)
                        .map_err(|err| err.to_string())
                });
            match checked {
                Ok(uri) => Some(uri),
                Err(err) => {
                    tracing::warn!(
                        var = env::ENDPOINT_URL,
                        value = %url,
                        err = %err,
                        "invalid value for environment variable, ignoring"
                    );
                    None
                }
            }
        });
        Self {
            region,
            use_fips: bool_var(env, env::USE_FIPS_ENDPOINT),
            use_dual_stack: bool_var(env, env::USE_DUALSTACK_ENDPOINT),
            endpoint_url,
        }
    }

    /// Region from `AWS_REGION` or `AWS_DEFAULT_REGION`
    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    /// Value of `AWS_USE_FIPS_ENDPOINT`
    pub fn use_fips(&self) -> Option<bool> {
        self.use_fips
    }

    /// Value of `AWS_USE_DUALSTACK_ENDPOINT`
    pub fn use_dual_stack(&self) -> Option<bool> {
        self.use_dual_stack
    }

    /// Value of `AWS_ENDPOINT_URL`
    pub fn endpoint_url(&self) -> Option<&Uri> {
        self.endpoint_url.as_ref()
    }

    /// Service configuration with the variant flags found in the environment. Unset flags are off.
    pub fn service_configuration(&self) -> ServiceConfiguration {
        ServiceConfiguration::new()
            .with_use_fips(self.use_fips.unwrap_or_default())
            .with_use_dual_stack(self.use_dual_stack.unwrap_or_default())
    }

    /// Build a resolution context from the environment alone
    pub fn into_context(self) -> Result<EndpointResolverContext, InvalidConfigurationError> {
        let service_configuration = self.service_configuration();
        EndpointResolverContext::try_new(
            self.region,
            service_configuration,
            self.endpoint_url,
            false,
        )
    }
}

fn non_empty(env: &Env, name: &str) -> Option<String> {
    env.get(name).ok().filter(|value| !value.trim().is_empty())
}

fn bool_var(env: &Env, name: &'static str) -> Option<bool> {
    let value = non_empty(env, name)?;
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => {
            tracing::warn!(
                var = name,
                value = %value,
                "invalid value for environment variable, expected `true` or `false`, ignoring"
            );
            None
        }
    }
}
