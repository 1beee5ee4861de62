/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Partition metadata
//!
//! A partition is a group of regions that share DNS suffixes and endpoint variant support, e.g.
//! `aws`, `aws-cn` or `aws-us-gov`.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::error::PartitionMetadataError;

/// Endpoint metadata shared by all regions of a partition
#[derive(Clone, Debug)]
pub struct Partition {
    id: String,
    region_regex: Regex,
    regions: Vec<String>,
    dns_suffix: String,
    dual_stack_dns_suffix: String,
    supports_fips: bool,
    supports_dual_stack: bool,
}

impl Partition {
    /// Partition identifier, e.g. `aws-us-gov`
    pub fn id(&self) -> &str {
        &self.id
    }

    /// DNS suffix used by standard and FIPS endpoints
    pub fn dns_suffix(&self) -> &str {
        &self.dns_suffix
    }

    /// DNS suffix used by dual-stack endpoints
    pub fn dual_stack_dns_suffix(&self) -> &str {
        &self.dual_stack_dns_suffix
    }

    /// Whether FIPS endpoints exist in this partition
    pub fn supports_fips(&self) -> bool {
        self.supports_fips
    }

    /// Whether dual-stack endpoints exist in this partition
    pub fn supports_dual_stack(&self) -> bool {
        self.supports_dual_stack
    }

    /// Whether `region` is listed explicitly by this partition
    pub fn contains_region(&self, region: &str) -> bool {
        self.regions.iter().any(|r| r == region)
    }

    /// Whether `region` follows this partition's region naming scheme
    pub fn matches_region(&self, region: &str) -> bool {
        self.region_regex.is_match(region)
    }
}

/// Maps regions to the [`Partition`] they belong to
///
/// Regions listed explicitly by a partition win. Otherwise the first partition whose region regex
/// matches is used, and unknown regions fall back to the `aws` partition.
#[derive(Clone, Debug)]
pub struct PartitionResolver {
    // never empty
    partitions: Vec<Partition>,
}

const DEFAULT_PARTITION: &str = "aws";

const BUILTIN_PARTITIONS: &str = include_str!("partition/partitions.json");

impl PartitionResolver {
    /// Partition metadata compiled into this crate
    pub fn builtin() -> &'static PartitionResolver {
        static BUILTIN: OnceLock<PartitionResolver> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            PartitionResolver::from_json(BUILTIN_PARTITIONS)
                .expect("built-in partition metadata is valid")
        })
    }

    /// Load partition metadata from a JSON document
    ///
    /// The document has the shape:
    /// ```json
    /// {
    ///   "partitions": [{
    ///     "id": "aws",
    ///     "regionRegex": "^(us|eu)\\-\\w+\\-\\d+$",
    ///     "regions": { "us-east-1": {} },
    ///     "outputs": {
    ///       "dnsSuffix": "amazonaws.com",
    ///       "dualStackDnsSuffix": "api.aws",
    ///       "supportsFIPS": true,
    ///       "supportsDualStack": true
    ///     }
    ///   }]
    /// }
    /// ```
    /// Unknown fields are ignored.
    pub fn from_json(document: &str) -> Result<Self, PartitionMetadataError> {
        let document: PartitionsDocument = serde_json::from_str(document)?;
        let partitions = document
            .partitions
            .into_iter()
            .map(|partition| {
                let region_regex = Regex::new(&partition.region_regex).map_err(|source| {
                    PartitionMetadataError::InvalidRegionRegex {
                        partition: partition.id.clone(),
                        source,
                    }
                })?;
                Ok(Partition {
                    id: partition.id,
                    region_regex,
                    regions: partition.regions.into_keys().collect(),
                    dns_suffix: partition.outputs.dns_suffix,
                    dual_stack_dns_suffix: partition.outputs.dual_stack_dns_suffix,
                    supports_fips: partition.outputs.supports_fips,
                    supports_dual_stack: partition.outputs.supports_dual_stack,
                })
            })
            .collect::<Result<Vec<_>, PartitionMetadataError>>()?;
        Self::new(partitions)
    }

    /// Create a resolver over `partitions`, in priority order
    pub fn new(partitions: Vec<Partition>) -> Result<Self, PartitionMetadataError> {
        if partitions.is_empty() {
            return Err(PartitionMetadataError::NoPartitions);
        }
        Ok(Self { partitions })
    }

    /// The partition `region` belongs to
    pub fn resolve_partition(&self, region: &str) -> &Partition {
        self.partitions
            .iter()
            .find(|p| p.contains_region(region))
            .or_else(|| self.partitions.iter().find(|p| p.matches_region(region)))
            .or_else(|| self.partitions.iter().find(|p| p.id == DEFAULT_PARTITION))
            .unwrap_or(&self.partitions[0])
    }

    /// All known partitions, in priority order
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }
}

impl Default for PartitionResolver {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

#[derive(Deserialize)]
struct PartitionsDocument {
    partitions: Vec<PartitionDocument>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartitionDocument {
    id: String,
    region_regex: String,
    #[serde(default)]
    regions: BTreeMap<String, IgnoredAny>,
    outputs: PartitionOutputs,
}

#[derive(Deserialize)]
struct PartitionOutputs {
    #[serde(rename = "dnsSuffix")]
    dns_suffix: String,
    #[serde(rename = "dualStackDnsSuffix")]
    dual_stack_dns_suffix: String,
    #[serde(rename = "supportsFIPS")]
    supports_fips: bool,
    #[serde(rename = "supportsDualStack")]
    supports_dual_stack: bool,
}
