//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Account level requests that are not tied to a table.
use crate::auth_common::credentials_provider::Credentials;
use crate::error::DynamoError;
use crate::handle::Handle;
use crate::marshal::{DynamoRequest, RequestOptions};
use crate::types::Endpoint;
use serde_derive::{Deserialize, Serialize};
use std::result::Result;
use std::time::Duration;

/// Struct used for reading the provisioned capacity quotas of the account in the current region.
#[derive(Default, Debug, Clone, Serialize)]
pub struct DescribeLimitsRequest {
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

/// Struct representing the result of a [`DescribeLimitsRequest`].
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeLimitsResult {
    pub(crate) account_max_read_capacity_units: Option<i64>,
    pub(crate) account_max_write_capacity_units: Option<i64>,
    pub(crate) table_max_read_capacity_units: Option<i64>,
    pub(crate) table_max_write_capacity_units: Option<i64>,
}

impl DescribeLimitsResult {
    pub fn account_max_read_capacity_units(&self) -> Option<i64> {
        self.account_max_read_capacity_units
    }
    pub fn account_max_write_capacity_units(&self) -> Option<i64> {
        self.account_max_write_capacity_units
    }
    pub fn table_max_read_capacity_units(&self) -> Option<i64> {
        self.table_max_read_capacity_units
    }
    pub fn table_max_write_capacity_units(&self) -> Option<i64> {
        self.table_max_write_capacity_units
    }
}

impl DescribeLimitsRequest {
    pub fn new() -> DescribeLimitsRequest {
        DescribeLimitsRequest::default()
    }

    pub fn timeout(mut self, t: &Duration) -> Self {
        self.options.timeout = Some(*t);
        self
    }

    pub fn credentials(mut self, c: Credentials) -> Self {
        self.options.credentials = Some(c);
        self
    }

    pub async fn execute(&self, h: &Handle) -> Result<DescribeLimitsResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for DescribeLimitsRequest {
    type Output = DescribeLimitsResult;
    const OPERATION: &'static str = "DescribeLimits";

    fn options(&self) -> &RequestOptions {
        &self.options
    }
}

/// Struct used for reading the regional endpoint of the service.
#[derive(Default, Debug, Clone, Serialize)]
pub struct DescribeEndpointsRequest {
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeEndpointsResult {
    #[serde(default)]
    pub(crate) endpoints: Vec<Endpoint>,
}

impl DescribeEndpointsResult {
    pub fn endpoints(&self) -> &Vec<Endpoint> {
        &self.endpoints
    }
}

impl DescribeEndpointsRequest {
    pub fn new() -> DescribeEndpointsRequest {
        DescribeEndpointsRequest::default()
    }

    pub fn timeout(mut self, t: &Duration) -> Self {
        self.options.timeout = Some(*t);
        self
    }

    pub fn credentials(mut self, c: Credentials) -> Self {
        self.options.credentials = Some(c);
        self
    }

    pub async fn execute(&self, h: &Handle) -> Result<DescribeEndpointsResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for DescribeEndpointsRequest {
    type Output = DescribeEndpointsResult;
    const OPERATION: &'static str = "DescribeEndpoints";

    fn options(&self) -> &RequestOptions {
        &self.options
    }
}
