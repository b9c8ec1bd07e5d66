//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::auth_common::credentials_provider::Credentials;
use crate::error::DynamoError;
use crate::handle::Handle;
use crate::marshal::{validate_not_empty, validate_table_name, DynamoRequest, RequestOptions};
use crate::types::{TimeToLiveDescription, TimeToLiveSpecification};
use serde_derive::{Deserialize, Serialize};
use std::result::Result;
use std::time::Duration;

/// Struct used for reading the time to live setting of a table.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTimeToLiveRequest {
    pub(crate) table_name: String,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTimeToLiveResult {
    #[serde(default)]
    pub(crate) time_to_live_description: TimeToLiveDescription,
}

impl DescribeTimeToLiveResult {
    pub fn time_to_live_description(&self) -> &TimeToLiveDescription {
        &self.time_to_live_description
    }
}

impl DescribeTimeToLiveRequest {
    pub fn new(table_name: &str) -> DescribeTimeToLiveRequest {
        DescribeTimeToLiveRequest {
            table_name: table_name.to_string(),
            ..Default::default()
        }
    }

    pub fn timeout(mut self, t: &Duration) -> Self {
        self.options.timeout = Some(*t);
        self
    }

    pub fn credentials(mut self, c: Credentials) -> Self {
        self.options.credentials = Some(c);
        self
    }

    pub async fn execute(&self, h: &Handle) -> Result<DescribeTimeToLiveResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for DescribeTimeToLiveRequest {
    type Output = DescribeTimeToLiveResult;
    const OPERATION: &'static str = "DescribeTimeToLive";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_table_name(&self.table_name)
    }
}

/// Struct used for enabling or disabling time to live on a table.
///
/// Items whose `attribute_name` attribute holds an epoch time in seconds
/// that has passed are deleted by the service in the background.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateTimeToLiveRequest {
    pub(crate) table_name: String,
    pub(crate) time_to_live_specification: TimeToLiveSpecification,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateTimeToLiveResult {
    pub(crate) time_to_live_specification: Option<TimeToLiveSpecification>,
}

impl UpdateTimeToLiveResult {
    pub fn time_to_live_specification(&self) -> Option<&TimeToLiveSpecification> {
        self.time_to_live_specification.as_ref()
    }
}

impl UpdateTimeToLiveRequest {
    pub fn new(table_name: &str, attribute_name: &str, enabled: bool) -> UpdateTimeToLiveRequest {
        UpdateTimeToLiveRequest {
            table_name: table_name.to_string(),
            time_to_live_specification: TimeToLiveSpecification {
                enabled,
                attribute_name: attribute_name.to_string(),
            },
            options: RequestOptions::default(),
        }
    }

    pub fn timeout(mut self, t: &Duration) -> Self {
        self.options.timeout = Some(*t);
        self
    }

    pub fn credentials(mut self, c: Credentials) -> Self {
        self.options.credentials = Some(c);
        self
    }

    pub async fn execute(&self, h: &Handle) -> Result<UpdateTimeToLiveResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for UpdateTimeToLiveRequest {
    type Output = UpdateTimeToLiveResult;
    const OPERATION: &'static str = "UpdateTimeToLive";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_table_name(&self.table_name)?;
        validate_not_empty(
            "time to live attribute name",
            &self.time_to_live_specification.attribute_name,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimeToLiveStatus;

    #[test]
    fn marshal_update_ttl() {
        let req = UpdateTimeToLiveRequest::new("Sessions", "ExpiresAt", true);
        req.validate().unwrap();
        let v: serde_json::Value = serde_json::from_slice(&req.marshal().unwrap()).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "TableName": "Sessions",
                "TimeToLiveSpecification": {"Enabled": true, "AttributeName": "ExpiresAt"}
            })
        );
        assert!(UpdateTimeToLiveRequest::new("Sessions", "", true).validate().is_err());
    }

    #[test]
    fn unmarshal_describe_ttl() {
        let r = DescribeTimeToLiveRequest::unmarshal(
            br#"{"TimeToLiveDescription":{"TimeToLiveStatus":"ENABLED","AttributeName":"ExpiresAt"}}"#,
        )
        .unwrap();
        let d = r.time_to_live_description();
        assert_eq!(d.time_to_live_status, Some(TimeToLiveStatus::Enabled));
        assert_eq!(d.attribute_name.as_deref(), Some("ExpiresAt"));
    }
}
