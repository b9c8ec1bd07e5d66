//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::auth_common::credentials_provider::Credentials;
use crate::error::{ia_err, DynamoError};
use crate::handle::Handle;
use crate::marshal::{
    validate_index_name, validate_names, validate_table_name, validate_values, DynamoRequest,
    RequestOptions,
};
use crate::query_request::{items_as, validate_select};
use crate::types::{
    AttributeValue, Condition, ConditionalOperator, ConsumedCapacity, DynamoItem, Item,
    ReturnConsumedCapacity, Select, ToAttributeValue,
};
use serde_derive::{Deserialize, Serialize};
use std::collections::HashMap;
use std::result::Result;
use std::time::Duration;

/// Encapsulates a DynamoDB Scan: reading every item of a table or index.
///
/// Paging works as for [`QueryRequest`](crate::QueryRequest). A large table
/// can be read in parallel by giving each worker its own
/// [`segment()`](ScanRequest::segment()) of the same total:
/// ```no_run
/// # use dynamodb_rust_sdk::{Handle, ScanRequest};
/// # #[tokio::main]
/// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let handle = Handle::builder().build().await?;
/// let mut tasks = Vec::new();
/// for seg in 0..4 {
///     let h = handle.clone();
///     tasks.push(tokio::spawn(async move {
///         ScanRequest::new("Music").segment(seg, 4).execute_all(&h).await
///     }));
/// }
/// for t in tasks {
///     println!("segment items: {}", t.await??.items().len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanRequest {
    pub(crate) table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) index_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) attributes_to_get: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) select: Option<Select>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) scan_filter: Option<HashMap<String, Condition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) conditional_operator: Option<ConditionalOperator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) exclusive_start_key: Option<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) return_consumed_capacity: Option<ReturnConsumedCapacity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) total_segments: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) segment: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) projection_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) filter_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) expression_attribute_names: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) expression_attribute_values: Option<HashMap<String, AttributeValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) consistent_read: Option<bool>,
    #[serde(skip)]
    pub(crate) is_done: bool,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

pub(crate) const MAX_TOTAL_SEGMENTS: u32 = 1_000_000;

/// Struct representing the result of a scan operation.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanResult {
    #[serde(default)]
    pub(crate) items: Vec<Item>,
    #[serde(default)]
    pub(crate) count: i64,
    #[serde(default)]
    pub(crate) scanned_count: i64,
    pub(crate) last_evaluated_key: Option<Item>,
    pub(crate) consumed_capacity: Option<ConsumedCapacity>,
}

impl ScanResult {
    pub fn items(&self) -> &Vec<Item> {
        &self.items
    }
    pub fn take_items(&mut self) -> Vec<Item> {
        std::mem::take(&mut self.items)
    }
    /// Convert every item into a native struct that implements [`DynamoItem`].
    pub fn items_as<T: DynamoItem + Default>(&self) -> Result<Vec<T>, DynamoError> {
        items_as(&self.items)
    }
    pub fn count(&self) -> i64 {
        self.count
    }
    pub fn scanned_count(&self) -> i64 {
        self.scanned_count
    }
    /// The key to continue from. `None` means the scan (or segment) is complete.
    pub fn last_evaluated_key(&self) -> Option<&Item> {
        self.last_evaluated_key.as_ref()
    }
    pub fn consumed_capacity(&self) -> Option<&ConsumedCapacity> {
        self.consumed_capacity.as_ref()
    }

    pub(crate) fn merge(&mut self, mut page: ScanResult) {
        self.items.append(&mut page.items);
        self.count += page.count;
        self.scanned_count += page.scanned_count;
        self.last_evaluated_key = page.last_evaluated_key;
        if let Some(c) = &page.consumed_capacity {
            self.consumed_capacity.get_or_insert_with(Default::default).merge(c);
        }
    }
}

impl ScanRequest {
    pub fn new(table_name: &str) -> ScanRequest {
        ScanRequest {
            table_name: table_name.to_string(),
            ..Default::default()
        }
    }

    /// Specify the timeout value for each page of the scan.
    ///
    /// If not set, the default timeout value configured for the [`Handle`](crate::HandleBuilder::timeout()) is used.
    pub fn timeout(mut self, t: &Duration) -> Self {
        self.options.timeout = Some(*t);
        self
    }

    /// Use specific credentials for this request instead of the handle's.
    pub fn credentials(mut self, c: Credentials) -> Self {
        self.options.credentials = Some(c);
        self
    }

    pub fn index_name(mut self, index_name: &str) -> ScanRequest {
        self.index_name = Some(index_name.to_string());
        self
    }

    pub fn attributes_to_get(mut self, names: &[&str]) -> ScanRequest {
        self.attributes_to_get = Some(names.iter().map(|s| s.to_string()).collect());
        self
    }

    /// The maximum number of items to evaluate per page.
    pub fn limit(mut self, limit: u32) -> ScanRequest {
        self.limit = Some(limit);
        self
    }

    pub fn select(mut self, select: Select) -> ScanRequest {
        self.select = Some(select);
        self
    }

    /// Add a legacy `ScanFilter` entry.
    pub fn scan_filter(mut self, name: &str, cond: Condition) -> ScanRequest {
        self.scan_filter
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), cond);
        self
    }

    pub fn conditional_operator(mut self, op: ConditionalOperator) -> ScanRequest {
        self.conditional_operator = Some(op);
        self
    }

    pub fn exclusive_start_key(mut self, key: Item) -> ScanRequest {
        self.exclusive_start_key = Some(key);
        self.is_done = false;
        self
    }

    pub fn return_consumed_capacity(mut self, val: ReturnConsumedCapacity) -> ScanRequest {
        self.return_consumed_capacity = Some(val);
        self
    }

    /// Read only segment `segment` (zero based) of `total_segments` equal parts of the table.
    pub fn segment(mut self, segment: u32, total_segments: u32) -> ScanRequest {
        self.segment = Some(segment);
        self.total_segments = Some(total_segments);
        self
    }

    pub fn projection_expression(mut self, expr: &str) -> ScanRequest {
        self.projection_expression = Some(expr.to_string());
        self
    }

    pub fn filter_expression(mut self, expr: &str) -> ScanRequest {
        self.filter_expression = Some(expr.to_string());
        self
    }

    pub fn expression_attribute_name(mut self, placeholder: &str, name: &str) -> ScanRequest {
        self.expression_attribute_names
            .get_or_insert_with(HashMap::new)
            .insert(placeholder.to_string(), name.to_string());
        self
    }

    pub fn expression_attribute_value(
        mut self,
        placeholder: &str,
        val: impl ToAttributeValue,
    ) -> ScanRequest {
        self.expression_attribute_values
            .get_or_insert_with(HashMap::new)
            .insert(placeholder.to_string(), val.to_attribute_value());
        self
    }

    pub fn consistent_read(mut self, val: bool) -> ScanRequest {
        self.consistent_read = Some(val);
        self
    }

    /// Execute one page of the scan.
    pub async fn execute(&self, h: &Handle) -> Result<ScanResult, DynamoError> {
        h.execute(self).await
    }

    /// Execute one page of the scan, and move the start key past it.
    ///
    /// Returns an error once [`ScanRequest::is_done()`] is `true`.
    pub async fn execute_batch(&mut self, h: &Handle) -> Result<ScanResult, DynamoError> {
        if self.is_done {
            return ia_err!("scan has already returned its last page");
        }
        let res = h.execute(self).await?;
        self.exclusive_start_key = res.last_evaluated_key.clone();
        self.is_done = self.exclusive_start_key.is_none();
        Ok(res)
    }

    pub fn is_done(&self) -> bool {
        self.is_done
    }

    /// Execute the scan until every page is read, returning all items in one result.
    pub async fn execute_all(&self, h: &Handle) -> Result<ScanResult, DynamoError> {
        let mut req = self.clone();
        req.is_done = false;
        let mut total = ScanResult::default();
        while !req.is_done {
            let page = req.execute_batch(h).await?;
            total.merge(page);
        }
        Ok(total)
    }
}

impl DynamoRequest for ScanRequest {
    type Output = ScanResult;
    const OPERATION: &'static str = "Scan";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_table_name(&self.table_name)?;
        if let Some(ix) = &self.index_name {
            validate_index_name(ix)?;
        }
        match (self.segment, self.total_segments) {
            (None, None) => (),
            (Some(s), Some(t)) => {
                if t == 0 || t > MAX_TOTAL_SEGMENTS {
                    return ia_err!("total segments must be between 1 and {}", MAX_TOTAL_SEGMENTS);
                }
                if s >= t {
                    return ia_err!("segment {} is out of range for {} total segments", s, t);
                }
            }
            _ => return ia_err!("segment and total segments must be set together"),
        }
        if self.filter_expression.is_some() && self.scan_filter.is_some() {
            return ia_err!("filter expression and legacy scan filter cannot be used together");
        }
        if self.projection_expression.is_some() && self.attributes_to_get.is_some() {
            return ia_err!("projection expression and attributes to get cannot be used together");
        }
        validate_select(self.select, &self.index_name, &self.projection_expression, &self.attributes_to_get)?;
        if self.limit == Some(0) {
            return ia_err!("limit must be greater than zero");
        }
        if let Some(f) = &self.scan_filter {
            for c in f.values() {
                c.validate()?;
            }
        }
        validate_names(&self.expression_attribute_names)?;
        validate_values(&self.expression_attribute_values)
    }
}
