//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::auth_common::credentials_provider::Credentials;
use crate::error::ErrorCode::{RequestTimeout, ResourceNotFound};
use crate::error::{ia_err, DynamoError};
use crate::handle::Handle;
use crate::marshal::{validate_index_name, validate_table_name, DynamoRequest, RequestOptions};
use crate::types::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, GlobalSecondaryIndexUpdate,
    IndexStatus, KeySchemaElement, KeyType, LocalSecondaryIndex, ProvisionedThroughput,
    SseSpecification, StreamSpecification, TableClass, TableDescription, TableStatus, Tag,
};
use serde_derive::{Deserialize, Serialize};
use std::result::Result;
use std::time::{Duration, Instant};
use tracing::debug;

const MAX_LOCAL_SECONDARY_INDEXES: usize = 5;
const MAX_GLOBAL_SECONDARY_INDEXES: usize = 20;

/// Struct used for creating a table.
///
/// Table creation is asynchronous in the service: the returned description
/// will usually show [`TableStatus::Creating`]. Use
/// [`CreateTableResult::wait_for_active()`] before using the table.
///
/// Example:
/// ```no_run
/// use dynamodb_rust_sdk::CreateTableRequest;
/// use dynamodb_rust_sdk::types::*;
/// # use dynamodb_rust_sdk::Handle;
/// # #[tokio::main]
/// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let handle = Handle::builder().build().await?;
///     CreateTableRequest::new("Music")
///         .attribute("Artist", ScalarAttributeType::S)
///         .attribute("SongTitle", ScalarAttributeType::S)
///         .hash_key("Artist")
///         .range_key("SongTitle")
///         .billing_mode(BillingMode::PayPerRequest)
///         .execute(&handle)
///         .await?
///         // wait up to 60 seconds for the table to become active
///         .wait_for_active_ms(&handle, 60000, 1000)
///         .await?;
/// # Ok(())
/// # }
///```
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTableRequest {
    pub(crate) table_name: String,
    pub(crate) attribute_definitions: Vec<AttributeDefinition>,
    pub(crate) key_schema: Vec<KeySchemaElement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) local_secondary_indexes: Option<Vec<LocalSecondaryIndex>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) global_secondary_indexes: Option<Vec<GlobalSecondaryIndex>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) billing_mode: Option<BillingMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) provisioned_throughput: Option<ProvisionedThroughput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) stream_specification: Option<StreamSpecification>,
    #[serde(rename = "SSESpecification", skip_serializing_if = "Option::is_none")]
    pub(crate) sse_specification: Option<SseSpecification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) tags: Option<Vec<Tag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) table_class: Option<TableClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) deletion_protection_enabled: Option<bool>,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

/// Struct representing the result of a [`CreateTableRequest`].
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTableResult {
    #[serde(default)]
    pub(crate) table_description: TableDescription,
}

impl CreateTableRequest {
    pub fn new(table_name: &str) -> CreateTableRequest {
        CreateTableRequest {
            table_name: table_name.to_string(),
            ..Default::default()
        }
    }

    /// Specify the timeout value for the request.
    ///
    /// This only covers the initial request. Waiting for the table to become
    /// active is done by [`CreateTableResult::wait_for_active()`].
    pub fn timeout(mut self, t: &Duration) -> Self {
        self.options.timeout = Some(*t);
        self
    }

    /// Use specific credentials for this request instead of the handle's.
    pub fn credentials(mut self, c: Credentials) -> Self {
        self.options.credentials = Some(c);
        self
    }

    /// Define the type of an attribute used in the key schema of the table or an index.
    pub fn attribute(
        mut self,
        name: &str,
        attribute_type: crate::types::ScalarAttributeType,
    ) -> CreateTableRequest {
        self.attribute_definitions
            .push(AttributeDefinition::new(name, attribute_type));
        self
    }

    /// Set the partition key of the table.
    pub fn hash_key(mut self, name: &str) -> CreateTableRequest {
        self.key_schema.retain(|k| k.key_type != KeyType::Hash);
        self.key_schema.insert(0, KeySchemaElement::hash(name));
        self
    }

    /// Set the sort key of the table.
    pub fn range_key(mut self, name: &str) -> CreateTableRequest {
        self.key_schema.retain(|k| k.key_type != KeyType::Range);
        self.key_schema.push(KeySchemaElement::range(name));
        self
    }

    pub fn local_secondary_index(mut self, index: LocalSecondaryIndex) -> CreateTableRequest {
        self.local_secondary_indexes
            .get_or_insert_with(Vec::new)
            .push(index);
        self
    }

    pub fn global_secondary_index(mut self, index: GlobalSecondaryIndex) -> CreateTableRequest {
        self.global_secondary_indexes
            .get_or_insert_with(Vec::new)
            .push(index);
        self
    }

    pub fn billing_mode(mut self, mode: BillingMode) -> CreateTableRequest {
        self.billing_mode = Some(mode);
        self
    }

    /// Required unless the billing mode is [`BillingMode::PayPerRequest`].
    pub fn provisioned_throughput(mut self, read_units: i64, write_units: i64) -> CreateTableRequest {
        self.provisioned_throughput = Some(ProvisionedThroughput::new(read_units, write_units));
        self
    }

    pub fn stream_specification(mut self, spec: StreamSpecification) -> CreateTableRequest {
        self.stream_specification = Some(spec);
        self
    }

    pub fn sse_specification(mut self, spec: SseSpecification) -> CreateTableRequest {
        self.sse_specification = Some(spec);
        self
    }

    pub fn tag(mut self, key: &str, value: &str) -> CreateTableRequest {
        self.tags.get_or_insert_with(Vec::new).push(Tag::new(key, value));
        self
    }

    pub fn table_class(mut self, class: TableClass) -> CreateTableRequest {
        self.table_class = Some(class);
        self
    }

    pub fn deletion_protection_enabled(mut self, val: bool) -> CreateTableRequest {
        self.deletion_protection_enabled = Some(val);
        self
    }

    pub async fn execute(&self, h: &Handle) -> Result<CreateTableResult, DynamoError> {
        h.execute(self).await
    }

    fn is_provisioned(&self) -> bool {
        self.billing_mode.unwrap_or_default() == BillingMode::Provisioned
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute_definitions
            .iter()
            .any(|a| a.attribute_name == name)
    }

    fn validate_key_schema(&self, owner: &str, ks: &[KeySchemaElement]) -> Result<(), DynamoError> {
        match ks {
            [h] | [h, _] if h.key_type != KeyType::Hash => {
                return ia_err!("the first key of {} must be the HASH key", owner)
            }
            [_, r] if r.key_type != KeyType::Range => {
                return ia_err!("the second key of {} must be the RANGE key", owner)
            }
            [h, r] if h.attribute_name == r.attribute_name => {
                return ia_err!("the HASH and RANGE keys of {} must differ", owner)
            }
            [_] | [_, _] => (),
            _ => return ia_err!("{} must have one or two key attributes", owner),
        }
        for k in ks {
            if !self.has_attribute(&k.attribute_name) {
                return ia_err!(
                    "key attribute '{}' of {} has no attribute definition",
                    k.attribute_name,
                    owner
                );
            }
        }
        Ok(())
    }
}

impl CreateTableResult {
    pub fn table_description(&self) -> &TableDescription {
        &self.table_description
    }

    /// Wait for the table, and all its global secondary indexes, to become active.
    ///
    /// This method will loop, polling the table with DescribeTable every
    /// `delay` until it is active, an error occurs, or `wait` has elapsed.
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

    /// Convenience form of [`CreateTableResult::wait_for_active()`] taking milliseconds.
    pub async fn wait_for_active_ms(
        &mut self,
        h: &Handle,
        wait_ms: u64,
        delay_ms: u64,
    ) -> Result<(), DynamoError> {
        self.wait_for_active(
            h,
            Duration::from_millis(wait_ms),
            Duration::from_millis(delay_ms),
        )
        .await
    }
}

impl DynamoRequest for CreateTableRequest {
    type Output = CreateTableResult;
    const OPERATION: &'static str = "CreateTable";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_table_name(&self.table_name)?;
        if self.table_name.starts_with("arn:") {
            return ia_err!("a table must be created by name, not ARN");
        }
        self.validate_key_schema("the table", &self.key_schema)?;
        if self.is_provisioned() {
            if self.provisioned_throughput.is_none() {
                return ia_err!("provisioned throughput is required for PROVISIONED billing mode");
            }
        } else if self.provisioned_throughput.is_some() {
            return ia_err!("provisioned throughput cannot be set for PAY_PER_REQUEST billing mode");
        }
        if let Some(lsis) = &self.local_secondary_indexes {
            if lsis.len() > MAX_LOCAL_SECONDARY_INDEXES {
                return ia_err!("at most {} local secondary indexes are allowed", MAX_LOCAL_SECONDARY_INDEXES);
            }
            if self.key_schema.len() != 2 {
                return ia_err!("local secondary indexes require a table with a RANGE key");
            }
            for ix in lsis {
                validate_index_name(&ix.index_name)?;
                let owner = format!("index '{}'", ix.index_name);
                self.validate_key_schema(&owner, &ix.key_schema)?;
                if ix.key_schema.len() != 2 || ix.key_schema[0] != self.key_schema[0] {
                    return ia_err!(
                        "{} must have the table's HASH key and a RANGE key",
                        owner
                    );
                }
            }
        }
        if let Some(gsis) = &self.global_secondary_indexes {
            if gsis.len() > MAX_GLOBAL_SECONDARY_INDEXES {
                return ia_err!("at most {} global secondary indexes are allowed", MAX_GLOBAL_SECONDARY_INDEXES);
            }
            for ix in gsis {
                validate_index_name(&ix.index_name)?;
                self.validate_key_schema(&format!("index '{}'", ix.index_name), &ix.key_schema)?;
                if self.is_provisioned() && ix.provisioned_throughput.is_none() {
                    return ia_err!(
                        "index '{}' needs provisioned throughput for PROVISIONED billing mode",
                        ix.index_name
                    );
                }
            }
        }
        Ok(())
    }
}

/// Struct used for deleting a table and all of its items.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteTableRequest {
    pub(crate) table_name: String,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

/// Struct representing the result of a [`DeleteTableRequest`].
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteTableResult {
    #[serde(default)]
    pub(crate) table_description: TableDescription,
}

impl DeleteTableRequest {
    pub fn new(table_name: &str) -> DeleteTableRequest {
        DeleteTableRequest {
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

    pub async fn execute(&self, h: &Handle) -> Result<DeleteTableResult, DynamoError> {
        h.execute(self).await
    }
}

impl DeleteTableResult {
    /// The table as it was when deletion started, usually with status [`TableStatus::Deleting`].
    pub fn table_description(&self) -> &TableDescription {
        &self.table_description
    }

    /// Wait until DescribeTable reports the table no longer exists.
    pub async fn wait_for_deletion(
        &self,
        h: &Handle,
        wait: Duration,
        delay: Duration,
    ) -> Result<(), DynamoError> {
        wait_for_table(h, &self.table_description, true, wait, delay).await?;
        Ok(())
    }

    pub async fn wait_for_deletion_ms(
        &self,
        h: &Handle,
        wait_ms: u64,
        delay_ms: u64,
    ) -> Result<(), DynamoError> {
        self.wait_for_deletion(
            h,
            Duration::from_millis(wait_ms),
            Duration::from_millis(delay_ms),
        )
        .await
    }
}

impl DynamoRequest for DeleteTableRequest {
    type Output = DeleteTableResult;
    const OPERATION: &'static str = "DeleteTable";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_table_name(&self.table_name)
    }
}

/// Struct used for getting the current description of a table.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTableRequest {
    pub(crate) table_name: String,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTableResult {
    #[serde(default)]
    pub(crate) table: TableDescription,
}

impl DescribeTableResult {
    pub fn table(&self) -> &TableDescription {
        &self.table
    }
}

impl DescribeTableRequest {
    pub fn new(table_name: &str) -> DescribeTableRequest {
        DescribeTableRequest {
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

    /// Execute the request. A table that does not exist results in
    /// [`ResourceNotFound`](crate::ErrorCode::ResourceNotFound).
    pub async fn execute(&self, h: &Handle) -> Result<DescribeTableResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for DescribeTableRequest {
    type Output = DescribeTableResult;
    const OPERATION: &'static str = "DescribeTable";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_table_name(&self.table_name)
    }
}

/// Struct used for modifying the throughput, indexes, streams, encryption or
/// class of an existing table.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateTableRequest {
    pub(crate) table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) attribute_definitions: Option<Vec<AttributeDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) billing_mode: Option<BillingMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) provisioned_throughput: Option<ProvisionedThroughput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) global_secondary_index_updates: Option<Vec<GlobalSecondaryIndexUpdate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) stream_specification: Option<StreamSpecification>,
    #[serde(rename = "SSESpecification", skip_serializing_if = "Option::is_none")]
    pub(crate) sse_specification: Option<SseSpecification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) table_class: Option<TableClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) deletion_protection_enabled: Option<bool>,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateTableResult {
    #[serde(default)]
    pub(crate) table_description: TableDescription,
}

impl UpdateTableResult {
    pub fn table_description(&self) -> &TableDescription {
        &self.table_description
    }

    /// Wait for the table and its indexes to become active after the update.
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

impl UpdateTableRequest {
    pub fn new(table_name: &str) -> UpdateTableRequest {
        UpdateTableRequest {
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

    /// Define an attribute used by a new global secondary index.
    pub fn attribute(
        mut self,
        name: &str,
        attribute_type: crate::types::ScalarAttributeType,
    ) -> UpdateTableRequest {
        self.attribute_definitions
            .get_or_insert_with(Vec::new)
            .push(AttributeDefinition::new(name, attribute_type));
        self
    }

    pub fn billing_mode(mut self, mode: BillingMode) -> UpdateTableRequest {
        self.billing_mode = Some(mode);
        self
    }

    pub fn provisioned_throughput(mut self, read_units: i64, write_units: i64) -> UpdateTableRequest {
        self.provisioned_throughput = Some(ProvisionedThroughput::new(read_units, write_units));
        self
    }

    pub fn global_secondary_index_update(mut self, update: GlobalSecondaryIndexUpdate) -> UpdateTableRequest {
        self.global_secondary_index_updates
            .get_or_insert_with(Vec::new)
            .push(update);
        self
    }

    pub fn stream_specification(mut self, spec: StreamSpecification) -> UpdateTableRequest {
        self.stream_specification = Some(spec);
        self
    }

    pub fn sse_specification(mut self, spec: SseSpecification) -> UpdateTableRequest {
        self.sse_specification = Some(spec);
        self
    }

    pub fn table_class(mut self, class: TableClass) -> UpdateTableRequest {
        self.table_class = Some(class);
        self
    }

    pub fn deletion_protection_enabled(mut self, val: bool) -> UpdateTableRequest {
        self.deletion_protection_enabled = Some(val);
        self
    }

    pub async fn execute(&self, h: &Handle) -> Result<UpdateTableResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for UpdateTableRequest {
    type Output = UpdateTableResult;
    const OPERATION: &'static str = "UpdateTable";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_table_name(&self.table_name)?;
        if self.billing_mode == Some(BillingMode::PayPerRequest) && self.provisioned_throughput.is_some() {
            return ia_err!("provisioned throughput cannot be set for PAY_PER_REQUEST billing mode");
        }
        if let Some(updates) = &self.global_secondary_index_updates {
            for u in updates {
                if u.action_count() != 1 {
                    return ia_err!("each global secondary index update must have exactly one action");
                }
            }
        }
        if self.attribute_definitions.is_none()
            && self.billing_mode.is_none()
            && self.provisioned_throughput.is_none()
            && self.global_secondary_index_updates.is_none()
            && self.stream_specification.is_none()
            && self.sse_specification.is_none()
            && self.table_class.is_none()
            && self.deletion_protection_enabled.is_none()
        {
            return ia_err!("UpdateTable requires at least one change");
        }
        Ok(())
    }
}

fn table_and_indexes_active(td: &TableDescription) -> bool {
    td.is_active()
        && td
            .global_secondary_indexes
            .iter()
            .flatten()
            .all(|ix| ix.index_status.map_or(true, |s| s == IndexStatus::Active))
}

// Poll DescribeTable until the table is active (or gone, if `deleted`).
// Returns the last description seen, or None if the table no longer exists.
pub(crate) async fn wait_for_table(
    h: &Handle,
    start: &TableDescription,
    deleted: bool,
    wait: Duration,
    delay: Duration,
) -> Result<Option<TableDescription>, DynamoError> {
    let name = match (&start.table_name, &start.table_arn) {
        (Some(n), _) => n.clone(),
        (None, Some(arn)) => arn.clone(),
        (None, None) => return ia_err!("table description has no table name to wait on"),
    };
    if !deleted && table_and_indexes_active(start) {
        return Ok(None);
    }
    if wait < delay {
        return ia_err!("wait duration must be greater than delay duration");
    }

    let start_time = Instant::now();
    let mut first_loop = true;
    loop {
        if start_time.elapsed() > wait {
            return Err(DynamoError::new(
                RequestTimeout,
                &format!("table '{}' did not reach the expected state in {:?}", name, wait),
            ));
        }
        if !first_loop {
            tokio::time::sleep(delay).await;
        }
        first_loop = false;

        match DescribeTableRequest::new(&name).execute(h).await {
            Ok(res) => {
                debug!("table '{}' status {:?}", name, res.table.table_status);
                if res.table.table_status == Some(TableStatus::Deleting) && !deleted {
                    return Err(DynamoError::new(
                        ResourceNotFound,
                        &format!("table '{}' is being deleted", name),
                    ));
                }
                if !deleted && table_and_indexes_active(&res.table) {
                    return Ok(Some(res.table));
                }
            }
            Err(e) if deleted && e.code == ResourceNotFound => return Ok(None),
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        CreateGlobalSecondaryIndexAction, DeleteGlobalSecondaryIndexAction, Projection,
        ScalarAttributeType,
    };

    fn music() -> CreateTableRequest {
        CreateTableRequest::new("Music")
            .attribute("Artist", ScalarAttributeType::S)
            .attribute("SongTitle", ScalarAttributeType::S)
            .hash_key("Artist")
            .range_key("SongTitle")
    }

    #[test]
    fn marshal_create_table() {
        let req = music()
            .provisioned_throughput(5, 5)
            .tag("team", "audio")
            .sse_specification(SseSpecification {
                enabled: Some(true),
                ..Default::default()
            });
        req.validate().unwrap();
        let v: serde_json::Value = serde_json::from_slice(&req.marshal().unwrap()).unwrap();
        assert_eq!(
            v["KeySchema"],
            serde_json::json!([
                {"AttributeName": "Artist", "KeyType": "HASH"},
                {"AttributeName": "SongTitle", "KeyType": "RANGE"}
            ])
        );
        assert_eq!(v["AttributeDefinitions"][1]["AttributeType"], "S");
        assert_eq!(v["ProvisionedThroughput"]["ReadCapacityUnits"], 5);
        assert_eq!(v["SSESpecification"]["Enabled"], true);
        assert_eq!(v["Tags"][0]["Key"], "team");
        assert!(v.get("BillingMode").is_none());
    }

    #[test]
    fn validate_create_table() {
        // provisioned is the default billing mode
        assert!(music().validate().is_err());
        assert!(music().billing_mode(BillingMode::PayPerRequest).validate().is_ok());
        assert!(music()
            .billing_mode(BillingMode::PayPerRequest)
            .provisioned_throughput(1, 1)
            .validate()
            .is_err());
        assert!(CreateTableRequest::new("Music")
            .hash_key("Artist")
            .billing_mode(BillingMode::PayPerRequest)
            .validate()
            .is_err());
        assert!(CreateTableRequest::new("Music")
            .attribute("Artist", ScalarAttributeType::S)
            .range_key("Artist")
            .billing_mode(BillingMode::PayPerRequest)
            .validate()
            .is_err());

        let gsi = GlobalSecondaryIndex {
            index_name: "ByTitle".to_string(),
            key_schema: vec![KeySchemaElement::hash("SongTitle")],
            projection: Projection::keys_only(),
            provisioned_throughput: None,
        };
        assert!(music()
            .provisioned_throughput(1, 1)
            .global_secondary_index(gsi.clone())
            .validate()
            .is_err());
        assert!(music()
            .billing_mode(BillingMode::PayPerRequest)
            .global_secondary_index(gsi)
            .validate()
            .is_ok());

        let lsi = LocalSecondaryIndex {
            index_name: "ByYear".to_string(),
            key_schema: vec![KeySchemaElement::hash("Artist"), KeySchemaElement::range("Year")],
            projection: Projection::all(),
        };
        assert!(music()
            .billing_mode(BillingMode::PayPerRequest)
            .local_secondary_index(lsi.clone())
            .validate()
            .is_err());
        assert!(music()
            .attribute("Year", ScalarAttributeType::N)
            .billing_mode(BillingMode::PayPerRequest)
            .local_secondary_index(lsi)
            .validate()
            .is_ok());
    }

    #[test]
    fn key_setters_replace() {
        let req = CreateTableRequest::new("T")
            .range_key("b")
            .hash_key("a")
            .hash_key("c");
        assert_eq!(req.key_schema, vec![KeySchemaElement::hash("c"), KeySchemaElement::range("b")]);
    }

    #[test]
    fn validate_update_table() {
        assert!(UpdateTableRequest::new("Music").validate().is_err());
        assert!(UpdateTableRequest::new("Music")
            .provisioned_throughput(10, 10)
            .validate()
            .is_ok());
        let both = GlobalSecondaryIndexUpdate {
            create: Some(CreateGlobalSecondaryIndexAction {
                index_name: "ix1".to_string(),
                key_schema: vec![KeySchemaElement::hash("a")],
                projection: Projection::all(),
                provisioned_throughput: None,
            }),
            delete: Some(DeleteGlobalSecondaryIndexAction {
                index_name: "ix2".to_string(),
            }),
            ..Default::default()
        };
        assert!(UpdateTableRequest::new("Music")
            .global_secondary_index_update(both)
            .validate()
            .is_err());
    }

    #[test]
    fn unmarshal_table_results() {
        let r = DescribeTableRequest::unmarshal(
            br#"{"Table":{"TableName":"Music","TableStatus":"ACTIVE",
                "GlobalSecondaryIndexes":[{"IndexName":"ByTitle","IndexStatus":"CREATING"}]}}"#,
        )
        .unwrap();
        assert!(r.table().is_active());
        assert!(!table_and_indexes_active(r.table()));
        let r = DeleteTableRequest::unmarshal(
            br#"{"TableDescription":{"TableName":"Music","TableStatus":"DELETING"}}"#,
        )
        .unwrap();
        assert_eq!(r.table_description().table_status, Some(TableStatus::Deleting));
    }
}
