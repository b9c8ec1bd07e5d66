//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Requests for global tables created with the 2017.11.29 global tables
//! version, where a global table is a replication group of identically
//! named tables in several regions.
use crate::auth_common::credentials_provider::Credentials;
use crate::auto_scaling_request::validate_scaling;
use crate::error::{ia_err, DynamoError};
use crate::handle::Handle;
use crate::marshal::{validate_index_name, validate_table_name, DynamoRequest, RequestOptions};
use crate::region::Region;
use crate::types::{
    AutoScalingSettingsUpdate, BillingMode, GlobalTable, GlobalTableDescription,
    GlobalTableGlobalSecondaryIndexSettingsUpdate, Replica, ReplicaSettingsDescription,
    ReplicaSettingsUpdate, ReplicaUpdate,
};
use serde_derive::{Deserialize, Serialize};
use std::result::Result;
use std::time::Duration;

const MAX_GLOBAL_TABLE_INDEX_UPDATES: usize = 20;
const MAX_REPLICA_SETTINGS_UPDATES: usize = 50;

fn validate_global_table_name(name: &str) -> Result<(), DynamoError> {
    if name.starts_with("arn:") {
        return ia_err!("global table name must not be an ARN");
    }
    validate_table_name(name)
}

fn validate_region(region: &str) -> Result<(), DynamoError> {
    Region::new(region).map(|_| ())
}

/// Struct representing the result of the create, describe and update global table requests.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalTableResult {
    #[serde(default)]
    pub(crate) global_table_description: GlobalTableDescription,
}

impl GlobalTableResult {
    pub fn global_table_description(&self) -> &GlobalTableDescription {
        &self.global_table_description
    }
}

/// Struct used for creating a global table from existing, empty, identically
/// named tables in each replica region.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateGlobalTableRequest {
    pub(crate) global_table_name: String,
    pub(crate) replication_group: Vec<Replica>,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

impl CreateGlobalTableRequest {
    pub fn new(global_table_name: &str) -> CreateGlobalTableRequest {
        CreateGlobalTableRequest {
            global_table_name: global_table_name.to_string(),
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

    /// Add a replica region.
    pub fn replica(mut self, region_name: &str) -> CreateGlobalTableRequest {
        self.replication_group.push(Replica::new(region_name));
        self
    }

    pub async fn execute(&self, h: &Handle) -> Result<GlobalTableResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for CreateGlobalTableRequest {
    type Output = GlobalTableResult;
    const OPERATION: &'static str = "CreateGlobalTable";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_global_table_name(&self.global_table_name)?;
        if self.replication_group.is_empty() {
            return ia_err!("global table requires at least one replica region");
        }
        for r in &self.replication_group {
            match &r.region_name {
                Some(n) => validate_region(n)?,
                None => return ia_err!("replica must name a region"),
            }
        }
        Ok(())
    }
}

/// Struct used for reading the description of a global table.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeGlobalTableRequest {
    pub(crate) global_table_name: String,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

impl DescribeGlobalTableRequest {
    pub fn new(global_table_name: &str) -> DescribeGlobalTableRequest {
        DescribeGlobalTableRequest {
            global_table_name: global_table_name.to_string(),
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

    pub async fn execute(&self, h: &Handle) -> Result<GlobalTableResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for DescribeGlobalTableRequest {
    type Output = GlobalTableResult;
    const OPERATION: &'static str = "DescribeGlobalTable";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_global_table_name(&self.global_table_name)
    }
}

/// Struct used for adding or removing replica regions of a global table.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateGlobalTableRequest {
    pub(crate) global_table_name: String,
    pub(crate) replica_updates: Vec<ReplicaUpdate>,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

impl UpdateGlobalTableRequest {
    pub fn new(global_table_name: &str) -> UpdateGlobalTableRequest {
        UpdateGlobalTableRequest {
            global_table_name: global_table_name.to_string(),
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

    pub fn add_replica(mut self, region_name: &str) -> UpdateGlobalTableRequest {
        self.replica_updates.push(ReplicaUpdate::create(region_name));
        self
    }

    pub fn remove_replica(mut self, region_name: &str) -> UpdateGlobalTableRequest {
        self.replica_updates.push(ReplicaUpdate::delete(region_name));
        self
    }

    pub async fn execute(&self, h: &Handle) -> Result<GlobalTableResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for UpdateGlobalTableRequest {
    type Output = GlobalTableResult;
    const OPERATION: &'static str = "UpdateGlobalTable";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_global_table_name(&self.global_table_name)?;
        if self.replica_updates.is_empty() {
            return ia_err!("UpdateGlobalTable requires at least one replica update");
        }
        for u in &self.replica_updates {
            match u {
                ReplicaUpdate::Create(a) => validate_region(&a.region_name)?,
                ReplicaUpdate::Delete(a) => validate_region(&a.region_name)?,
            }
        }
        Ok(())
    }
}

/// Struct used for listing global tables.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListGlobalTablesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) exclusive_start_global_table_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) region_name: Option<String>,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListGlobalTablesResult {
    #[serde(default)]
    pub(crate) global_tables: Vec<GlobalTable>,
    pub(crate) last_evaluated_global_table_name: Option<String>,
}

impl ListGlobalTablesResult {
    pub fn global_tables(&self) -> &Vec<GlobalTable> {
        &self.global_tables
    }
    pub fn last_evaluated_global_table_name(&self) -> Option<&str> {
        self.last_evaluated_global_table_name.as_deref()
    }
}

impl ListGlobalTablesRequest {
    pub fn new() -> ListGlobalTablesRequest {
        ListGlobalTablesRequest::default()
    }

    pub fn timeout(mut self, t: &Duration) -> Self {
        self.options.timeout = Some(*t);
        self
    }

    pub fn credentials(mut self, c: Credentials) -> Self {
        self.options.credentials = Some(c);
        self
    }

    pub fn exclusive_start_global_table_name(mut self, name: &str) -> ListGlobalTablesRequest {
        self.exclusive_start_global_table_name = Some(name.to_string());
        self
    }

    pub fn limit(mut self, limit: u32) -> ListGlobalTablesRequest {
        self.limit = Some(limit);
        self
    }

    /// Only list global tables with a replica in this region.
    pub fn region_name(mut self, region_name: &str) -> ListGlobalTablesRequest {
        self.region_name = Some(region_name.to_string());
        self
    }

    pub async fn execute(&self, h: &Handle) -> Result<ListGlobalTablesResult, DynamoError> {
        h.execute(self).await
    }

    pub async fn execute_all(&self, h: &Handle) -> Result<ListGlobalTablesResult, DynamoError> {
        let mut req = self.clone();
        let mut res = ListGlobalTablesResult::default();
        loop {
            let mut page = req.execute(h).await?;
            res.global_tables.append(&mut page.global_tables);
            match page.last_evaluated_global_table_name {
                Some(n) => req.exclusive_start_global_table_name = Some(n),
                None => return Ok(res),
            }
        }
    }
}

impl DynamoRequest for ListGlobalTablesRequest {
    type Output = ListGlobalTablesResult;
    const OPERATION: &'static str = "ListGlobalTables";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        if self.limit == Some(0) {
            return ia_err!("limit must be greater than 0");
        }
        if let Some(n) = &self.exclusive_start_global_table_name {
            validate_global_table_name(n)?;
        }
        if let Some(r) = &self.region_name {
            validate_region(r)?;
        }
        Ok(())
    }
}

/// Struct representing the result of the describe and update global table settings requests.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalTableSettingsResult {
    pub(crate) global_table_name: Option<String>,
    #[serde(default)]
    pub(crate) replica_settings: Vec<ReplicaSettingsDescription>,
}

impl GlobalTableSettingsResult {
    pub fn global_table_name(&self) -> Option<&str> {
        self.global_table_name.as_deref()
    }
    pub fn replica_settings(&self) -> &Vec<ReplicaSettingsDescription> {
        &self.replica_settings
    }
    /// The settings of the replica in the given region, if there is one.
    pub fn replica(&self, region_name: &str) -> Option<&ReplicaSettingsDescription> {
        self.replica_settings
            .iter()
            .find(|r| r.region_name == region_name)
    }
}

/// Struct used for reading the capacity settings of every replica of a global table.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeGlobalTableSettingsRequest {
    pub(crate) global_table_name: String,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

impl DescribeGlobalTableSettingsRequest {
    pub fn new(global_table_name: &str) -> DescribeGlobalTableSettingsRequest {
        DescribeGlobalTableSettingsRequest {
            global_table_name: global_table_name.to_string(),
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

    pub async fn execute(&self, h: &Handle) -> Result<GlobalTableSettingsResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for DescribeGlobalTableSettingsRequest {
    type Output = GlobalTableSettingsResult;
    const OPERATION: &'static str = "DescribeGlobalTableSettings";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_global_table_name(&self.global_table_name)
    }
}

/// Struct used for changing the billing mode and capacity of a global table
/// and its replicas.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateGlobalTableSettingsRequest {
    pub(crate) global_table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) global_table_billing_mode: Option<BillingMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) global_table_provisioned_write_capacity_units: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) global_table_provisioned_write_capacity_auto_scaling_settings_update:
        Option<AutoScalingSettingsUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) global_table_global_secondary_index_settings_update:
        Option<Vec<GlobalTableGlobalSecondaryIndexSettingsUpdate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) replica_settings_update: Option<Vec<ReplicaSettingsUpdate>>,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

impl UpdateGlobalTableSettingsRequest {
    pub fn new(global_table_name: &str) -> UpdateGlobalTableSettingsRequest {
        UpdateGlobalTableSettingsRequest {
            global_table_name: global_table_name.to_string(),
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

    pub fn billing_mode(mut self, mode: BillingMode) -> UpdateGlobalTableSettingsRequest {
        self.global_table_billing_mode = Some(mode);
        self
    }

    pub fn write_capacity_units(mut self, units: i64) -> UpdateGlobalTableSettingsRequest {
        self.global_table_provisioned_write_capacity_units = Some(units);
        self
    }

    pub fn write_capacity_auto_scaling(
        mut self,
        update: AutoScalingSettingsUpdate,
    ) -> UpdateGlobalTableSettingsRequest {
        self.global_table_provisioned_write_capacity_auto_scaling_settings_update = Some(update);
        self
    }

    pub fn global_secondary_index_settings(
        mut self,
        update: GlobalTableGlobalSecondaryIndexSettingsUpdate,
    ) -> UpdateGlobalTableSettingsRequest {
        self.global_table_global_secondary_index_settings_update
            .get_or_insert_with(Vec::new)
            .push(update);
        self
    }

    pub fn replica_settings(
        mut self,
        update: ReplicaSettingsUpdate,
    ) -> UpdateGlobalTableSettingsRequest {
        self.replica_settings_update
            .get_or_insert_with(Vec::new)
            .push(update);
        self
    }

    pub async fn execute(&self, h: &Handle) -> Result<GlobalTableSettingsResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for UpdateGlobalTableSettingsRequest {
    type Output = GlobalTableSettingsResult;
    const OPERATION: &'static str = "UpdateGlobalTableSettings";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_global_table_name(&self.global_table_name)?;
        if self.global_table_provisioned_write_capacity_units.is_some()
            && self
                .global_table_provisioned_write_capacity_auto_scaling_settings_update
                .is_some()
        {
            return ia_err!("write capacity units and auto scaling cannot both be set");
        }
        if let Some(u) = self.global_table_provisioned_write_capacity_units {
            if u < 1 {
                return ia_err!("write capacity units must be at least 1");
            }
        }
        if let Some(s) = &self.global_table_provisioned_write_capacity_auto_scaling_settings_update
        {
            validate_scaling(s)?;
        }
        if let Some(v) = &self.global_table_global_secondary_index_settings_update {
            if v.len() > MAX_GLOBAL_TABLE_INDEX_UPDATES {
                return ia_err!(
                    "too many index settings updates, the limit is {}",
                    MAX_GLOBAL_TABLE_INDEX_UPDATES
                );
            }
            for u in v {
                validate_index_name(&u.index_name)?;
            }
        }
        if let Some(v) = &self.replica_settings_update {
            if v.len() > MAX_REPLICA_SETTINGS_UPDATES {
                return ia_err!(
                    "too many replica settings updates, the limit is {}",
                    MAX_REPLICA_SETTINGS_UPDATES
                );
            }
            for u in v {
                validate_region(&u.region_name)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GlobalTableStatus;

    #[test]
    fn marshal_create_global_table() {
        let req = CreateGlobalTableRequest::new("Music")
            .replica("us-east-1")
            .replica("eu-west-1");
        req.validate().unwrap();
        let v: serde_json::Value = serde_json::from_slice(&req.marshal().unwrap()).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "GlobalTableName": "Music",
                "ReplicationGroup": [{"RegionName": "us-east-1"}, {"RegionName": "eu-west-1"}]
            })
        );
        assert!(CreateGlobalTableRequest::new("Music").validate().is_err());
        assert!(CreateGlobalTableRequest::new("Music")
            .replica("not a region")
            .validate()
            .is_err());
    }

    #[test]
    fn marshal_update_global_table() {
        let req = UpdateGlobalTableRequest::new("Music")
            .add_replica("ap-southeast-2")
            .remove_replica("eu-west-1");
        req.validate().unwrap();
        let v: serde_json::Value = serde_json::from_slice(&req.marshal().unwrap()).unwrap();
        assert_eq!(
            v["ReplicaUpdates"],
            serde_json::json!([
                {"Create": {"RegionName": "ap-southeast-2"}},
                {"Delete": {"RegionName": "eu-west-1"}}
            ])
        );
        assert!(UpdateGlobalTableRequest::new("Music").validate().is_err());
    }

    #[test]
    fn unmarshal_global_table() {
        let r = DescribeGlobalTableRequest::unmarshal(
            br#"{"GlobalTableDescription":{"GlobalTableName":"Music","GlobalTableStatus":"ACTIVE",
                "ReplicationGroup":[{"RegionName":"us-east-1"}]}}"#,
        )
        .unwrap();
        let d = r.global_table_description();
        assert_eq!(d.global_table_status, Some(GlobalTableStatus::Active));
        assert_eq!(d.replication_group.as_ref().map(|g| g.len()), Some(1));

        let r = ListGlobalTablesRequest::unmarshal(
            br#"{"GlobalTables":[{"GlobalTableName":"Music","ReplicationGroup":[{"RegionName":"us-east-1"}]}],
                "LastEvaluatedGlobalTableName":"Music"}"#,
        )
        .unwrap();
        assert_eq!(r.global_tables()[0].global_table_name.as_deref(), Some("Music"));
        assert_eq!(r.last_evaluated_global_table_name(), Some("Music"));
    }

    #[test]
    fn validate_global_table_settings() {
        let req = UpdateGlobalTableSettingsRequest::new("Music")
            .write_capacity_units(10)
            .replica_settings(ReplicaSettingsUpdate {
                region_name: "eu-west-1".to_string(),
                replica_provisioned_read_capacity_units: Some(10),
                ..Default::default()
            });
        req.validate().unwrap();
        let v: serde_json::Value = serde_json::from_slice(&req.marshal().unwrap()).unwrap();
        assert_eq!(v["GlobalTableProvisionedWriteCapacityUnits"], 10);
        assert_eq!(
            v["ReplicaSettingsUpdate"][0]["ReplicaProvisionedReadCapacityUnits"],
            10
        );

        assert!(req
            .write_capacity_auto_scaling(AutoScalingSettingsUpdate::target_tracking(1, 10, 50.0))
            .validate()
            .is_err());
        assert!(UpdateGlobalTableSettingsRequest::new("Music")
            .write_capacity_units(0)
            .validate()
            .is_err());
    }

    #[test]
    fn replica_settings_lookup() {
        let r = DescribeGlobalTableSettingsRequest::unmarshal(
            br#"{"GlobalTableName":"Music","ReplicaSettings":[
                {"RegionName":"us-east-1","ReplicaProvisionedReadCapacityUnits":5},
                {"RegionName":"eu-west-1","ReplicaProvisionedReadCapacityUnits":10}]}"#,
        )
        .unwrap();
        assert_eq!(r.global_table_name(), Some("Music"));
        assert_eq!(
            r.replica("eu-west-1")
                .and_then(|s| s.replica_provisioned_read_capacity_units),
            Some(10)
        );
        assert!(r.replica("ap-south-1").is_none());
    }
}
