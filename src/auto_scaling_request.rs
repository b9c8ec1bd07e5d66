//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::auth_common::credentials_provider::Credentials;
use crate::error::{ia_err, DynamoError};
use crate::handle::Handle;
use crate::marshal::{validate_table_name, DynamoRequest, RequestOptions};
use crate::types::{
    AutoScalingSettingsUpdate, GlobalSecondaryIndexAutoScalingUpdate, ReplicaAutoScalingUpdate,
    TableAutoScalingDescription,
};
use serde_derive::{Deserialize, Serialize};
use std::result::Result;
use std::time::Duration;

/// Struct used for reading the auto scaling settings of every replica of a global table.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTableReplicaAutoScalingRequest {
    pub(crate) table_name: String,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTableReplicaAutoScalingResult {
    pub(crate) table_auto_scaling_description: Option<TableAutoScalingDescription>,
}

impl DescribeTableReplicaAutoScalingResult {
    pub fn table_auto_scaling_description(&self) -> Option<&TableAutoScalingDescription> {
        self.table_auto_scaling_description.as_ref()
    }
}

impl DescribeTableReplicaAutoScalingRequest {
    pub fn new(table_name: &str) -> DescribeTableReplicaAutoScalingRequest {
        DescribeTableReplicaAutoScalingRequest {
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

    pub async fn execute(
        &self,
        h: &Handle,
    ) -> Result<DescribeTableReplicaAutoScalingResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for DescribeTableReplicaAutoScalingRequest {
    type Output = DescribeTableReplicaAutoScalingResult;
    const OPERATION: &'static str = "DescribeTableReplicaAutoScaling";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_table_name(&self.table_name)
    }
}

/// Struct used for changing the auto scaling settings of a global table, its
/// indexes, or individual replicas.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateTableReplicaAutoScalingRequest {
    pub(crate) table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) global_secondary_index_updates: Option<Vec<GlobalSecondaryIndexAutoScalingUpdate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) provisioned_write_capacity_auto_scaling_update: Option<AutoScalingSettingsUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) replica_updates: Option<Vec<ReplicaAutoScalingUpdate>>,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateTableReplicaAutoScalingResult {
    pub(crate) table_auto_scaling_description: Option<TableAutoScalingDescription>,
}

impl UpdateTableReplicaAutoScalingResult {
    pub fn table_auto_scaling_description(&self) -> Option<&TableAutoScalingDescription> {
        self.table_auto_scaling_description.as_ref()
    }
}

impl UpdateTableReplicaAutoScalingRequest {
    pub fn new(table_name: &str) -> UpdateTableReplicaAutoScalingRequest {
        UpdateTableReplicaAutoScalingRequest {
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

    /// Change the write capacity auto scaling of the table in every replica.
    pub fn write_capacity_update(
        mut self,
        update: AutoScalingSettingsUpdate,
    ) -> UpdateTableReplicaAutoScalingRequest {
        self.provisioned_write_capacity_auto_scaling_update = Some(update);
        self
    }

    pub fn global_secondary_index_update(
        mut self,
        update: GlobalSecondaryIndexAutoScalingUpdate,
    ) -> UpdateTableReplicaAutoScalingRequest {
        self.global_secondary_index_updates
            .get_or_insert_with(Vec::new)
            .push(update);
        self
    }

    pub fn replica_update(
        mut self,
        update: ReplicaAutoScalingUpdate,
    ) -> UpdateTableReplicaAutoScalingRequest {
        self.replica_updates.get_or_insert_with(Vec::new).push(update);
        self
    }

    pub async fn execute(
        &self,
        h: &Handle,
    ) -> Result<UpdateTableReplicaAutoScalingResult, DynamoError> {
        h.execute(self).await
    }
}

pub(crate) fn validate_scaling(u: &AutoScalingSettingsUpdate) -> Result<(), DynamoError> {
    if let (Some(min), Some(max)) = (u.minimum_units, u.maximum_units) {
        if min < 1 || min > max {
            return ia_err!("auto scaling minimum units {} must be between 1 and maximum units {}", min, max);
        }
    }
    if let Some(p) = &u.scaling_policy_update {
        let t = p.target_tracking_scaling_policy_configuration.target_value;
        if !(20.0..=90.0).contains(&t) {
            return ia_err!("auto scaling target value {} must be between 20 and 90", t);
        }
    }
    Ok(())
}

impl DynamoRequest for UpdateTableReplicaAutoScalingRequest {
    type Output = UpdateTableReplicaAutoScalingResult;
    const OPERATION: &'static str = "UpdateTableReplicaAutoScaling";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_table_name(&self.table_name)?;
        if self.global_secondary_index_updates.is_none()
            && self.provisioned_write_capacity_auto_scaling_update.is_none()
            && self.replica_updates.is_none()
        {
            return ia_err!("UpdateTableReplicaAutoScaling requires at least one update");
        }
        if let Some(u) = &self.provisioned_write_capacity_auto_scaling_update {
            validate_scaling(u)?;
        }
        for u in self.global_secondary_index_updates.iter().flatten() {
            if let Some(s) = &u.provisioned_write_capacity_auto_scaling_update {
                validate_scaling(s)?;
            }
        }
        for r in self.replica_updates.iter().flatten() {
            if r.region_name.is_empty() {
                return ia_err!("replica update must name a region");
            }
            if let Some(s) = &r.replica_provisioned_read_capacity_auto_scaling_update {
                validate_scaling(s)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marshal_update_auto_scaling() {
        let req = UpdateTableReplicaAutoScalingRequest::new("Music")
            .write_capacity_update(AutoScalingSettingsUpdate::target_tracking(5, 100, 70.0))
            .replica_update(ReplicaAutoScalingUpdate {
                region_name: "eu-west-1".to_string(),
                ..Default::default()
            });
        req.validate().unwrap();
        let v: serde_json::Value = serde_json::from_slice(&req.marshal().unwrap()).unwrap();
        assert_eq!(v["ProvisionedWriteCapacityAutoScalingUpdate"]["MaximumUnits"], 100);
        assert_eq!(v["ReplicaUpdates"][0]["RegionName"], "eu-west-1");
        assert!(v.get("GlobalSecondaryIndexUpdates").is_none());
    }

    #[test]
    fn validate_auto_scaling() {
        assert!(UpdateTableReplicaAutoScalingRequest::new("Music").validate().is_err());
        assert!(UpdateTableReplicaAutoScalingRequest::new("Music")
            .write_capacity_update(AutoScalingSettingsUpdate::target_tracking(10, 5, 70.0))
            .validate()
            .is_err());
        assert!(UpdateTableReplicaAutoScalingRequest::new("Music")
            .write_capacity_update(AutoScalingSettingsUpdate::target_tracking(1, 5, 95.0))
            .validate()
            .is_err());
    }

    #[test]
    fn unmarshal_describe_auto_scaling() {
        let r = DescribeTableReplicaAutoScalingRequest::unmarshal(
            br#"{"TableAutoScalingDescription":{"TableName":"Music","TableStatus":"ACTIVE",
                "Replicas":[{"RegionName":"us-east-1","ReplicaStatus":"ACTIVE",
                  "ReplicaProvisionedReadCapacityAutoScalingSettings":{"MinimumUnits":5,"MaximumUnits":40}}]}}"#,
        )
        .unwrap();
        let d = r.table_auto_scaling_description().unwrap();
        let replica = &d.replicas.as_ref().unwrap()[0];
        assert_eq!(replica.region_name.as_deref(), Some("us-east-1"));
        assert_eq!(
            replica
                .replica_provisioned_read_capacity_auto_scaling_settings
                .as_ref()
                .unwrap()
                .maximum_units,
            Some(40)
        );
    }
}
