//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! On-demand backups, restores, and point in time recovery.
use crate::auth_common::credentials_provider::Credentials;
use crate::error::{ia_err, DynamoError};
use crate::handle::Handle;
use crate::marshal::{
    validate_not_empty, validate_table_name, DynamoRequest, RequestOptions, MAX_ARN_LEN,
};
use crate::table_request::wait_for_table;
use crate::types::{
    epoch_seconds_opt, BackupDescription, BackupDetails, BackupSummary, BackupTypeFilter,
    BillingMode, ContinuousBackupsDescription, GlobalSecondaryIndex, LocalSecondaryIndex,
    PointInTimeRecoverySpecification, ProvisionedThroughput, SseSpecification, TableDescription,
};
use chrono::{DateTime, Utc};
use serde_derive::{Deserialize, Serialize};
use std::result::Result;
use std::time::Duration;

const MAX_LIST_BACKUPS_LIMIT: u32 = 100;

fn validate_backup_arn(arn: &str) -> Result<(), DynamoError> {
    validate_not_empty("backup ARN", arn)?;
    if arn.len() < 37 || arn.len() > MAX_ARN_LEN {
        return ia_err!("backup ARN '{}' must be between 37 and {} characters", arn, MAX_ARN_LEN);
    }
    Ok(())
}

/// Struct used for creating an on-demand backup of a table.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateBackupRequest {
    pub(crate) table_name: String,
    pub(crate) backup_name: String,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateBackupResult {
    pub(crate) backup_details: Option<BackupDetails>,
}

impl CreateBackupResult {
    pub fn backup_details(&self) -> Option<&BackupDetails> {
        self.backup_details.as_ref()
    }
    /// The ARN of the new backup, used by the describe, delete and restore requests.
    pub fn backup_arn(&self) -> Option<&str> {
        self.backup_details.as_ref().map(|d| d.backup_arn.as_str())
    }
}

impl CreateBackupRequest {
    pub fn new(table_name: &str, backup_name: &str) -> CreateBackupRequest {
        CreateBackupRequest {
            table_name: table_name.to_string(),
            backup_name: backup_name.to_string(),
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

    pub async fn execute(&self, h: &Handle) -> Result<CreateBackupResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for CreateBackupRequest {
    type Output = CreateBackupResult;
    const OPERATION: &'static str = "CreateBackup";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_table_name(&self.table_name)?;
        // Backup names follow the same rules as table names.
        if self.backup_name.starts_with("arn:") {
            return ia_err!("backup name must not be an ARN");
        }
        validate_table_name(&self.backup_name)
    }
}

/// Struct used for deleting a backup.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteBackupRequest {
    pub(crate) backup_arn: String,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteBackupResult {
    pub(crate) backup_description: Option<BackupDescription>,
}

impl DeleteBackupResult {
    pub fn backup_description(&self) -> Option<&BackupDescription> {
        self.backup_description.as_ref()
    }
}

impl DeleteBackupRequest {
    pub fn new(backup_arn: &str) -> DeleteBackupRequest {
        DeleteBackupRequest {
            backup_arn: backup_arn.to_string(),
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

    pub async fn execute(&self, h: &Handle) -> Result<DeleteBackupResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for DeleteBackupRequest {
    type Output = DeleteBackupResult;
    const OPERATION: &'static str = "DeleteBackup";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_backup_arn(&self.backup_arn)
    }
}

/// Struct used for reading the details of a backup.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeBackupRequest {
    pub(crate) backup_arn: String,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeBackupResult {
    pub(crate) backup_description: Option<BackupDescription>,
}

impl DescribeBackupResult {
    pub fn backup_description(&self) -> Option<&BackupDescription> {
        self.backup_description.as_ref()
    }
}

impl DescribeBackupRequest {
    pub fn new(backup_arn: &str) -> DescribeBackupRequest {
        DescribeBackupRequest {
            backup_arn: backup_arn.to_string(),
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

    pub async fn execute(&self, h: &Handle) -> Result<DescribeBackupResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for DescribeBackupRequest {
    type Output = DescribeBackupResult;
    const OPERATION: &'static str = "DescribeBackup";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_backup_arn(&self.backup_arn)
    }
}

/// Struct used for listing backups.
///
/// Without a table name, backups of every table in the region are listed.
/// [`ListBackupsRequest::execute_all()`] follows `LastEvaluatedBackupArn`
/// until the listing is complete.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListBackupsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) table_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) limit: Option<u32>,
    #[serde(
        default,
        with = "epoch_seconds_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) time_range_lower_bound: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "epoch_seconds_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) time_range_upper_bound: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) exclusive_start_backup_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) backup_type: Option<BackupTypeFilter>,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListBackupsResult {
    #[serde(default)]
    pub(crate) backup_summaries: Vec<BackupSummary>,
    pub(crate) last_evaluated_backup_arn: Option<String>,
}

impl ListBackupsResult {
    pub fn backup_summaries(&self) -> &Vec<BackupSummary> {
        &self.backup_summaries
    }
    pub fn last_evaluated_backup_arn(&self) -> Option<&str> {
        self.last_evaluated_backup_arn.as_deref()
    }
}

impl ListBackupsRequest {
    pub fn new() -> ListBackupsRequest {
        ListBackupsRequest::default()
    }

    pub fn timeout(mut self, t: &Duration) -> Self {
        self.options.timeout = Some(*t);
        self
    }

    pub fn credentials(mut self, c: Credentials) -> Self {
        self.options.credentials = Some(c);
        self
    }

    /// Only list backups of this table.
    pub fn table_name(mut self, table_name: &str) -> ListBackupsRequest {
        self.table_name = Some(table_name.to_string());
        self
    }

    pub fn limit(mut self, limit: u32) -> ListBackupsRequest {
        self.limit = Some(limit);
        self
    }

    /// Only list backups created between `lower` (inclusive) and `upper` (exclusive).
    pub fn time_range(
        mut self,
        lower: Option<DateTime<Utc>>,
        upper: Option<DateTime<Utc>>,
    ) -> ListBackupsRequest {
        self.time_range_lower_bound = lower;
        self.time_range_upper_bound = upper;
        self
    }

    pub fn backup_type(mut self, backup_type: BackupTypeFilter) -> ListBackupsRequest {
        self.backup_type = Some(backup_type);
        self
    }

    pub fn exclusive_start_backup_arn(mut self, arn: &str) -> ListBackupsRequest {
        self.exclusive_start_backup_arn = Some(arn.to_string());
        self
    }

    pub async fn execute(&self, h: &Handle) -> Result<ListBackupsResult, DynamoError> {
        h.execute(self).await
    }

    /// List every matching backup, following the last evaluated ARN across calls.
    pub async fn execute_all(&self, h: &Handle) -> Result<ListBackupsResult, DynamoError> {
        let mut req = self.clone();
        let mut res = ListBackupsResult::default();
        loop {
            let mut page = req.execute(h).await?;
            res.backup_summaries.append(&mut page.backup_summaries);
            match page.last_evaluated_backup_arn {
                Some(arn) => req.exclusive_start_backup_arn = Some(arn),
                None => return Ok(res),
            }
        }
    }
}

impl DynamoRequest for ListBackupsRequest {
    type Output = ListBackupsResult;
    const OPERATION: &'static str = "ListBackups";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        if let Some(t) = &self.table_name {
            validate_table_name(t)?;
        }
        if let Some(l) = self.limit {
            if l == 0 || l > MAX_LIST_BACKUPS_LIMIT {
                return ia_err!("limit must be between 1 and {}", MAX_LIST_BACKUPS_LIMIT);
            }
        }
        if let (Some(lo), Some(hi)) = (self.time_range_lower_bound, self.time_range_upper_bound) {
            if lo >= hi {
                return ia_err!("time range lower bound must be before the upper bound");
            }
        }
        if let Some(arn) = &self.exclusive_start_backup_arn {
            validate_backup_arn(arn)?;
        }
        Ok(())
    }
}

// Setters for the table settings a restore may change, shared by both restore requests.
macro_rules! restore_override_setters {
    ($t:ty) => {
        impl $t {
            pub fn billing_mode_override(mut self, mode: BillingMode) -> $t {
                self.billing_mode_override = Some(mode);
                self
            }

            pub fn global_secondary_index_override(mut self, gsi: GlobalSecondaryIndex) -> $t {
                self.global_secondary_index_override
                    .get_or_insert_with(Vec::new)
                    .push(gsi);
                self
            }

            pub fn local_secondary_index_override(mut self, lsi: LocalSecondaryIndex) -> $t {
                self.local_secondary_index_override
                    .get_or_insert_with(Vec::new)
                    .push(lsi);
                self
            }

            pub fn provisioned_throughput_override(mut self, read: i64, write: i64) -> $t {
                self.provisioned_throughput_override = Some(ProvisionedThroughput::new(read, write));
                self
            }

            pub fn sse_specification_override(mut self, sse: SseSpecification) -> $t {
                self.sse_specification_override = Some(sse);
                self
            }

            fn validate_overrides(&self) -> Result<(), DynamoError> {
                if self.billing_mode_override == Some(BillingMode::PayPerRequest)
                    && self.provisioned_throughput_override.is_some()
                {
                    return ia_err!(
                        "provisioned throughput cannot be set with PAY_PER_REQUEST billing"
                    );
                }
                Ok(())
            }
        }
    };
}

/// Struct used for restoring a backup into a new table.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RestoreTableFromBackupRequest {
    pub(crate) target_table_name: String,
    pub(crate) backup_arn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) billing_mode_override: Option<BillingMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) global_secondary_index_override: Option<Vec<GlobalSecondaryIndex>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) local_secondary_index_override: Option<Vec<LocalSecondaryIndex>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) provisioned_throughput_override: Option<ProvisionedThroughput>,
    #[serde(
        rename = "SSESpecificationOverride",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) sse_specification_override: Option<SseSpecification>,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

restore_override_setters!(RestoreTableFromBackupRequest);

/// Struct representing the result of a restore.
///
/// The new table starts in the `CREATING` state; use
/// [`RestoreTableResult::wait_for_active()`] to wait until it can be used.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RestoreTableResult {
    #[serde(default)]
    pub(crate) table_description: TableDescription,
}

impl RestoreTableResult {
    pub fn table_description(&self) -> &TableDescription {
        &self.table_description
    }

    /// Wait for the restored table to become active.
    pub async fn wait_for_active(
        &mut self,
        h: &Handle,
        wait: Duration,
        delay: Duration,
    ) -> Result<(), DynamoError> {
        if let Some(td) = wait_for_table(h, &self.table_description, false, wait, delay).await? {
            self.table_description = td;
        }
        Ok(())
    }
}

impl RestoreTableFromBackupRequest {
    pub fn new(backup_arn: &str, target_table_name: &str) -> RestoreTableFromBackupRequest {
        RestoreTableFromBackupRequest {
            backup_arn: backup_arn.to_string(),
            target_table_name: target_table_name.to_string(),
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

    pub async fn execute(&self, h: &Handle) -> Result<RestoreTableResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for RestoreTableFromBackupRequest {
    type Output = RestoreTableResult;
    const OPERATION: &'static str = "RestoreTableFromBackup";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_backup_arn(&self.backup_arn)?;
        if self.target_table_name.starts_with("arn:") {
            return ia_err!("target table name must not be an ARN");
        }
        validate_table_name(&self.target_table_name)?;
        self.validate_overrides()
    }
}

/// Struct used for restoring a table to a point in time into a new table.
///
/// Point in time recovery must be enabled on the source table. Either a
/// restore time or [`RestoreTableToPointInTimeRequest::use_latest_restorable_time()`]
/// must be given, but not both.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RestoreTableToPointInTimeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) source_table_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) source_table_name: Option<String>,
    pub(crate) target_table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) use_latest_restorable_time: Option<bool>,
    #[serde(
        default,
        with = "epoch_seconds_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) restore_date_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) billing_mode_override: Option<BillingMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) global_secondary_index_override: Option<Vec<GlobalSecondaryIndex>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) local_secondary_index_override: Option<Vec<LocalSecondaryIndex>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) provisioned_throughput_override: Option<ProvisionedThroughput>,
    #[serde(
        rename = "SSESpecificationOverride",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) sse_specification_override: Option<SseSpecification>,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

restore_override_setters!(RestoreTableToPointInTimeRequest);

impl RestoreTableToPointInTimeRequest {
    /// Restore `source_table`, given as a name or an ARN, into `target_table_name`.
    pub fn new(source_table: &str, target_table_name: &str) -> RestoreTableToPointInTimeRequest {
        let mut req = RestoreTableToPointInTimeRequest {
            target_table_name: target_table_name.to_string(),
            ..Default::default()
        };
        if source_table.starts_with("arn:") {
            req.source_table_arn = Some(source_table.to_string());
        } else {
            req.source_table_name = Some(source_table.to_string());
        }
        req
    }

    pub fn timeout(mut self, t: &Duration) -> Self {
        self.options.timeout = Some(*t);
        self
    }

    pub fn credentials(mut self, c: Credentials) -> Self {
        self.options.credentials = Some(c);
        self
    }

    pub fn restore_date_time(mut self, t: DateTime<Utc>) -> RestoreTableToPointInTimeRequest {
        self.restore_date_time = Some(t);
        self
    }

    pub fn use_latest_restorable_time(mut self) -> RestoreTableToPointInTimeRequest {
        self.use_latest_restorable_time = Some(true);
        self
    }

    pub async fn execute(&self, h: &Handle) -> Result<RestoreTableResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for RestoreTableToPointInTimeRequest {
    type Output = RestoreTableResult;
    const OPERATION: &'static str = "RestoreTableToPointInTime";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        match (&self.source_table_name, &self.source_table_arn) {
            (Some(n), None) => validate_table_name(n)?,
            (None, Some(a)) => validate_table_name(a)?,
            _ => return ia_err!("exactly one of source table name or ARN is required"),
        }
        if self.target_table_name.starts_with("arn:") {
            return ia_err!("target table name must not be an ARN");
        }
        validate_table_name(&self.target_table_name)?;
        let latest = self.use_latest_restorable_time.unwrap_or(false);
        if latest == self.restore_date_time.is_some() {
            return ia_err!("exactly one of restore time or latest restorable time is required");
        }
        self.validate_overrides()
    }
}

/// Struct used for reading the continuous backup and point in time recovery status of a table.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeContinuousBackupsRequest {
    pub(crate) table_name: String,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContinuousBackupsResult {
    pub(crate) continuous_backups_description: Option<ContinuousBackupsDescription>,
}

impl ContinuousBackupsResult {
    pub fn continuous_backups_description(&self) -> Option<&ContinuousBackupsDescription> {
        self.continuous_backups_description.as_ref()
    }

    /// Returns true if point in time recovery is enabled.
    pub fn pitr_enabled(&self) -> bool {
        self.continuous_backups_description
            .as_ref()
            .map_or(false, |d| d.pitr_enabled())
    }
}

impl DescribeContinuousBackupsRequest {
    pub fn new(table_name: &str) -> DescribeContinuousBackupsRequest {
        DescribeContinuousBackupsRequest {
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

    pub async fn execute(&self, h: &Handle) -> Result<ContinuousBackupsResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for DescribeContinuousBackupsRequest {
    type Output = ContinuousBackupsResult;
    const OPERATION: &'static str = "DescribeContinuousBackups";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_table_name(&self.table_name)
    }
}

/// Struct used for enabling or disabling point in time recovery on a table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateContinuousBackupsRequest {
    pub(crate) table_name: String,
    pub(crate) point_in_time_recovery_specification: PointInTimeRecoverySpecification,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

impl UpdateContinuousBackupsRequest {
    pub fn new(table_name: &str, pitr_enabled: bool) -> UpdateContinuousBackupsRequest {
        UpdateContinuousBackupsRequest {
            table_name: table_name.to_string(),
            point_in_time_recovery_specification: PointInTimeRecoverySpecification {
                point_in_time_recovery_enabled: pitr_enabled,
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

    pub async fn execute(&self, h: &Handle) -> Result<ContinuousBackupsResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for UpdateContinuousBackupsRequest {
    type Output = ContinuousBackupsResult;
    const OPERATION: &'static str = "UpdateContinuousBackups";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_table_name(&self.table_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BackupStatus;
    use chrono::TimeZone;

    const ARN: &str = "arn:aws:dynamodb:us-east-1:123456789012:table/Music/backup/01489602797149-73d8d5bc";

    #[test]
    fn validate_backup_requests() {
        CreateBackupRequest::new("Music", "MusicBackup").validate().unwrap();
        assert!(CreateBackupRequest::new("Music", "x").validate().is_err());
        DescribeBackupRequest::new(ARN).validate().unwrap();
        assert!(DeleteBackupRequest::new("").validate().is_err());
        assert!(DeleteBackupRequest::new("arn:short").validate().is_err());
    }

    #[test]
    fn marshal_list_backups() {
        let lo = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let hi = Utc.timestamp_opt(1_700_086_400, 0).unwrap();
        let req = ListBackupsRequest::new()
            .table_name("Music")
            .time_range(Some(lo), Some(hi))
            .backup_type(BackupTypeFilter::User)
            .limit(10);
        req.validate().unwrap();
        let v: serde_json::Value = serde_json::from_slice(&req.marshal().unwrap()).unwrap();
        assert_eq!(v["TableName"], "Music");
        assert_eq!(v["BackupType"], "USER");
        assert_eq!(v["TimeRangeLowerBound"].as_f64(), Some(1_700_000_000.0));
        assert!(v.get("ExclusiveStartBackupArn").is_none());

        assert!(ListBackupsRequest::new()
            .time_range(Some(hi), Some(lo))
            .validate()
            .is_err());
        assert!(ListBackupsRequest::new().limit(0).validate().is_err());
    }

    #[test]
    fn unmarshal_list_backups() {
        let r = ListBackupsRequest::unmarshal(
            br#"{"BackupSummaries":[{"TableName":"Music","BackupName":"MusicBackup",
                "BackupStatus":"AVAILABLE","BackupCreationDateTime":1489602797.149}],
                "LastEvaluatedBackupArn":"arn:next"}"#,
        )
        .unwrap();
        assert_eq!(r.backup_summaries().len(), 1);
        assert_eq!(
            r.backup_summaries()[0].backup_status,
            Some(BackupStatus::Available)
        );
        assert_eq!(r.last_evaluated_backup_arn(), Some("arn:next"));
    }

    #[test]
    fn marshal_restore_overrides() {
        let req = RestoreTableFromBackupRequest::new(ARN, "MusicRestored")
            .billing_mode_override(BillingMode::PayPerRequest);
        req.validate().unwrap();
        let v: serde_json::Value = serde_json::from_slice(&req.marshal().unwrap()).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "TargetTableName": "MusicRestored",
                "BackupArn": ARN,
                "BillingModeOverride": "PAY_PER_REQUEST"
            })
        );
        assert!(req
            .clone()
            .provisioned_throughput_override(5, 5)
            .validate()
            .is_err());
    }

    #[test]
    fn validate_point_in_time_restore() {
        let req = RestoreTableToPointInTimeRequest::new("Music", "MusicYesterday");
        assert!(req.validate().is_err());
        let req = req.use_latest_restorable_time();
        req.validate().unwrap();
        let v: serde_json::Value = serde_json::from_slice(&req.marshal().unwrap()).unwrap();
        assert_eq!(v["SourceTableName"], "Music");
        assert_eq!(v["UseLatestRestorableTime"], true);
        assert!(req
            .restore_date_time(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
            .validate()
            .is_err());

        let req = RestoreTableToPointInTimeRequest::new(
            "arn:aws:dynamodb:us-east-1:123456789012:table/Music",
            "MusicYesterday",
        );
        assert!(req.source_table_name.is_none());
        assert!(req.source_table_arn.is_some());
    }

    #[test]
    fn continuous_backups() {
        let req = UpdateContinuousBackupsRequest::new("Music", true);
        let v: serde_json::Value = serde_json::from_slice(&req.marshal().unwrap()).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "TableName": "Music",
                "PointInTimeRecoverySpecification": {"PointInTimeRecoveryEnabled": true}
            })
        );
        let r = DescribeContinuousBackupsRequest::unmarshal(
            br#"{"ContinuousBackupsDescription":{"ContinuousBackupsStatus":"ENABLED",
                "PointInTimeRecoveryDescription":{"PointInTimeRecoveryStatus":"DISABLED"}}}"#,
        )
        .unwrap();
        assert!(!r.pitr_enabled());
        assert!(!ContinuousBackupsResult::default().pitr_enabled());
    }
}
