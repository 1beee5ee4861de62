/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Cross-service types used while resolving endpoints.

#![warn(missing_docs, rust_2018_idioms)]

pub mod os_shim_internal;
pub mod region;
