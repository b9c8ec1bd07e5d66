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
use crate::types::{
    AttributeValue, Condition, ConditionalOperator, ConsumedCapacity, DynamoItem, Item,
    ReturnConsumedCapacity, Select, ToAttributeValue,
};
use serde_derive::{Deserialize, Serialize};
use std::collections::HashMap;
use std::result::Result;
use std::time::Duration;
use tracing::trace;

/// Encapsulates a DynamoDB Query: reading the items that share a partition key.
///
/// A single call to [`QueryRequest::execute()`] returns one page of at most
/// 1 MB of items. To read every matching item, use [`QueryRequest::execute_all()`],
/// or call [`QueryRequest::execute_batch()`] in a loop until [`QueryRequest::is_done()`]
/// returns `true`:
/// ```no_run
/// # use dynamodb_rust_sdk::{Handle, QueryRequest};
/// # #[tokio::main]
/// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let handle = Handle::builder().build().await?;
/// let mut qreq = QueryRequest::new("Music")
///     .key_condition_expression("Artist = :a AND SongTitle BETWEEN :t1 AND :t2")
///     .expression_attribute_value(":a", "Acme Band")
///     .expression_attribute_value(":t1", "A")
///     .expression_attribute_value(":t2", "M")
///     .limit(50);
/// while !qreq.is_done() {
///     let page = qreq.execute_batch(&handle).await?;
///     for item in page.items() {
///         println!("{}", item);
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryRequest {
    pub(crate) table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) index_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) select: Option<Select>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) attributes_to_get: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) consistent_read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) key_condition_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) key_conditions: Option<HashMap<String, Condition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) filter_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) query_filter: Option<HashMap<String, Condition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) conditional_operator: Option<ConditionalOperator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) projection_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) expression_attribute_names: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) expression_attribute_values: Option<HashMap<String, AttributeValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) scan_index_forward: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) exclusive_start_key: Option<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) return_consumed_capacity: Option<ReturnConsumedCapacity>,
    #[serde(skip)]
    pub(crate) is_done: bool,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

/// Struct representing the result of a query operation.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryResult {
    #[serde(default)]
    pub(crate) items: Vec<Item>,
    #[serde(default)]
    pub(crate) count: i64,
    #[serde(default)]
    pub(crate) scanned_count: i64,
    pub(crate) last_evaluated_key: Option<Item>,
    pub(crate) consumed_capacity: Option<ConsumedCapacity>,
}

impl QueryResult {
    /// Get the items returned. Empty when [`Select::Count`] was used.
    pub fn items(&self) -> &Vec<Item> {
        &self.items
    }
    /// Take the items returned, leaving this result with none.
    pub fn take_items(&mut self) -> Vec<Item> {
        std::mem::take(&mut self.items)
    }
    /// Convert every item into a native struct that implements [`DynamoItem`].
    pub fn items_as<T: DynamoItem + Default>(&self) -> Result<Vec<T>, DynamoError> {
        items_as(&self.items)
    }
    /// The number of items that matched, after any filter was applied.
    pub fn count(&self) -> i64 {
        self.count
    }
    /// The number of items evaluated, before any filter was applied.
    pub fn scanned_count(&self) -> i64 {
        self.scanned_count
    }
    /// The key to continue from. `None` means there are no more results.
    pub fn last_evaluated_key(&self) -> Option<&Item> {
        self.last_evaluated_key.as_ref()
    }
    pub fn consumed_capacity(&self) -> Option<&ConsumedCapacity> {
        self.consumed_capacity.as_ref()
    }

    // Fold another page into this result.
    pub(crate) fn merge(&mut self, mut page: QueryResult) {
        self.items.append(&mut page.items);
        self.count += page.count;
        self.scanned_count += page.scanned_count;
        self.last_evaluated_key = page.last_evaluated_key;
        if let Some(c) = &page.consumed_capacity {
            self.consumed_capacity.get_or_insert_with(Default::default).merge(c);
        }
    }
}

pub(crate) fn items_as<T: DynamoItem + Default>(items: &[Item]) -> Result<Vec<T>, DynamoError> {
    let mut v = Vec::with_capacity(items.len());
    for i in items {
        let mut t = T::default();
        t.from_item(i)?;
        v.push(t);
    }
    Ok(v)
}

impl QueryRequest {
    /// Create a new `QueryRequest` on the given table.
    pub fn new(table_name: &str) -> QueryRequest {
        QueryRequest {
            table_name: table_name.to_string(),
            ..Default::default()
        }
    }

    /// Specify the timeout value for each page of the query.
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

    /// Query a secondary index of the table instead of the table itself.
    pub fn index_name(mut self, index_name: &str) -> QueryRequest {
        self.index_name = Some(index_name.to_string());
        self
    }

    pub fn select(mut self, select: Select) -> QueryRequest {
        self.select = Some(select);
        self
    }

    /// Legacy form of [`projection_expression()`](QueryRequest::projection_expression()).
    pub fn attributes_to_get(mut self, names: &[&str]) -> QueryRequest {
        self.attributes_to_get = Some(names.iter().map(|s| s.to_string()).collect());
        self
    }

    /// The maximum number of items to evaluate per page. This is not a limit on the number of matching items.
    pub fn limit(mut self, limit: u32) -> QueryRequest {
        self.limit = Some(limit);
        self
    }

    pub fn consistent_read(mut self, val: bool) -> QueryRequest {
        self.consistent_read = Some(val);
        self
    }

    /// The condition on the partition key, and optionally the sort key, of the items to read.
    pub fn key_condition_expression(mut self, expr: &str) -> QueryRequest {
        self.key_condition_expression = Some(expr.to_string());
        self
    }

    /// Add a legacy `KeyConditions` entry. This cannot be combined with a key condition expression.
    pub fn key_condition(mut self, name: &str, cond: Condition) -> QueryRequest {
        self.key_conditions
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), cond);
        self
    }

    /// A condition applied to items after they are read. Filtered items still consume capacity.
    pub fn filter_expression(mut self, expr: &str) -> QueryRequest {
        self.filter_expression = Some(expr.to_string());
        self
    }

    /// Add a legacy `QueryFilter` entry.
    pub fn query_filter(mut self, name: &str, cond: Condition) -> QueryRequest {
        self.query_filter
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), cond);
        self
    }

    pub fn conditional_operator(mut self, op: ConditionalOperator) -> QueryRequest {
        self.conditional_operator = Some(op);
        self
    }

    pub fn projection_expression(mut self, expr: &str) -> QueryRequest {
        self.projection_expression = Some(expr.to_string());
        self
    }

    pub fn expression_attribute_name(mut self, placeholder: &str, name: &str) -> QueryRequest {
        self.expression_attribute_names
            .get_or_insert_with(HashMap::new)
            .insert(placeholder.to_string(), name.to_string());
        self
    }

    pub fn expression_attribute_value(
        mut self,
        placeholder: &str,
        val: impl ToAttributeValue,
    ) -> QueryRequest {
        self.expression_attribute_values
            .get_or_insert_with(HashMap::new)
            .insert(placeholder.to_string(), val.to_attribute_value());
        self
    }

    /// Return items in ascending (`true`, the default) or descending sort key order.
    pub fn scan_index_forward(mut self, val: bool) -> QueryRequest {
        self.scan_index_forward = Some(val);
        self
    }

    /// Start reading after this key, usually the [`QueryResult::last_evaluated_key()`] of a previous page.
    pub fn exclusive_start_key(mut self, key: Item) -> QueryRequest {
        self.exclusive_start_key = Some(key);
        self.is_done = false;
        self
    }

    pub fn return_consumed_capacity(mut self, val: ReturnConsumedCapacity) -> QueryRequest {
        self.return_consumed_capacity = Some(val);
        self
    }

    /// Execute one page of the query.
    pub async fn execute(&self, h: &Handle) -> Result<QueryResult, DynamoError> {
        h.execute(self).await
    }

    /// Execute one page of the query, and move the start key past it.
    ///
    /// Call this in a loop until [`QueryRequest::is_done()`] returns `true`. Calling it
    /// again after the last page is an error; set a new start key with
    /// [`QueryRequest::exclusive_start_key()`] to read again.
    pub async fn execute_batch(&mut self, h: &Handle) -> Result<QueryResult, DynamoError> {
        if self.is_done {
            return ia_err!("query has already returned its last page");
        }
        let res = h.execute(self).await?;
        match &res.last_evaluated_key {
            Some(k) => self.exclusive_start_key = Some(k.clone()),
            None => {
                trace!("no last evaluated key, query is done");
                self.exclusive_start_key = None;
                self.is_done = true;
            }
        }
        Ok(res)
    }

    /// Whether the last call to [`QueryRequest::execute_batch()`] returned the final page.
    pub fn is_done(&self) -> bool {
        self.is_done
    }

    /// Execute the query until every page is read, returning all items in one result.
    ///
    /// The timeout applies to each page. The returned counts and consumed
    /// capacity are totals across pages.
    pub async fn execute_all(&self, h: &Handle) -> Result<QueryResult, DynamoError> {
        let mut req = self.clone();
        req.is_done = false;
        let mut total = QueryResult::default();
        while !req.is_done {
            let page = req.execute_batch(h).await?;
            total.merge(page);
        }
        Ok(total)
    }
}

impl DynamoRequest for QueryRequest {
    type Output = QueryResult;
    const OPERATION: &'static str = "Query";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_table_name(&self.table_name)?;
        if let Some(ix) = &self.index_name {
            validate_index_name(ix)?;
        }
        match (&self.key_condition_expression, &self.key_conditions) {
            (None, None) => return ia_err!("a query requires a key condition"),
            (Some(_), Some(_)) => {
                return ia_err!("key condition expression and legacy key conditions cannot be used together")
            }
            (Some(e), None) if e.trim().is_empty() => {
                return ia_err!("key condition expression must not be empty")
            }
            _ => (),
        }
        if self.filter_expression.is_some() && self.query_filter.is_some() {
            return ia_err!("filter expression and legacy query filter cannot be used together");
        }
        if self.projection_expression.is_some() && self.attributes_to_get.is_some() {
            return ia_err!("projection expression and attributes to get cannot be used together");
        }
        validate_select(self.select, &self.index_name, &self.projection_expression, &self.attributes_to_get)?;
        if self.limit == Some(0) {
            return ia_err!("limit must be greater than zero");
        }
        for conds in [&self.key_conditions, &self.query_filter].into_iter().flatten() {
            for c in conds.values() {
                c.validate()?;
            }
        }
        if let Some(k) = &self.exclusive_start_key {
            k.validate()?;
        }
        validate_names(&self.expression_attribute_names)?;
        validate_values(&self.expression_attribute_values)
    }
}

// Shared by query and scan.
pub(crate) fn validate_select(
    select: Option<Select>,
    index_name: &Option<String>,
    projection: &Option<String>,
    attributes_to_get: &Option<Vec<String>>,
) -> Result<(), DynamoError> {
    match select {
        Some(Select::AllProjectedAttributes) if index_name.is_none() => {
            ia_err!("ALL_PROJECTED_ATTRIBUTES can only be selected when reading an index")
        }
        Some(Select::SpecificAttributes) if projection.is_none() && attributes_to_get.is_none() => {
            ia_err!("SPECIFIC_ATTRIBUTES requires a projection expression or attributes to get")
        }
        Some(s) if s != Select::SpecificAttributes
            && (projection.is_some() || attributes_to_get.is_some()) =>
        {
            ia_err!("select {:?} cannot be combined with a projection", s)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ComparisonOperator;

    #[test]
    fn marshal_query() {
        let req = QueryRequest::new("Music")
            .index_name("ByYear")
            .key_condition_expression("#y = :y")
            .expression_attribute_name("#y", "Year")
            .expression_attribute_value(":y", 2020)
            .scan_index_forward(false)
            .limit(10)
            .exclusive_start_key(Item::new().n("Year", 2020).s("Artist", "A"));
        req.validate().unwrap();
        let v: serde_json::Value = serde_json::from_slice(&req.marshal().unwrap()).unwrap();
        assert_eq!(v["IndexName"], "ByYear");
        assert_eq!(v["KeyConditionExpression"], "#y = :y");
        assert_eq!(v["ScanIndexForward"], false);
        assert_eq!(v["Limit"], 10);
        assert_eq!(v["ExclusiveStartKey"]["Artist"], serde_json::json!({"S": "A"}));
        assert!(v.get("IsDone").is_none());
        assert_eq!(QueryRequest::target(), "DynamoDB_20120810.Query");
    }

    #[test]
    fn marshal_legacy_key_conditions() {
        let req = QueryRequest::new("Music")
            .key_condition("Artist", Condition::new(ComparisonOperator::Eq).value("A"))
            .query_filter("Year", Condition::new(ComparisonOperator::Gt).value(2000));
        req.validate().unwrap();
        let v: serde_json::Value = serde_json::from_slice(&req.marshal().unwrap()).unwrap();
        assert_eq!(
            v["KeyConditions"]["Artist"],
            serde_json::json!({"AttributeValueList": [{"S": "A"}], "ComparisonOperator": "EQ"})
        );
        assert_eq!(v["QueryFilter"]["Year"]["ComparisonOperator"], "GT");
    }

    #[test]
    fn validate_query() {
        assert!(QueryRequest::new("Music").validate().is_err());
        let base = QueryRequest::new("Music").key_condition_expression("Artist = :a");
        assert!(base.clone().limit(0).validate().is_err());
        assert!(base
            .clone()
            .key_condition("Artist", Condition::new(ComparisonOperator::Eq).value("A"))
            .validate()
            .is_err());
        assert!(base.clone().select(Select::AllProjectedAttributes).validate().is_err());
        assert!(base.clone().select(Select::SpecificAttributes).validate().is_err());
        assert!(base
            .clone()
            .select(Select::SpecificAttributes)
            .projection_expression("Year")
            .validate()
            .is_ok());
        assert!(base
            .clone()
            .select(Select::Count)
            .projection_expression("Year")
            .validate()
            .is_err());
        assert!(base
            .filter_expression("Year > :y")
            .query_filter("Year", Condition::new(ComparisonOperator::Gt).value(1))
            .validate()
            .is_err());
    }

    #[test]
    fn merge_pages() {
        let mut total = QueryResult::default();
        let p1 = QueryRequest::unmarshal(
            br#"{"Items":[{"Id":{"N":"1"}}],"Count":1,"ScannedCount":2,
                "LastEvaluatedKey":{"Id":{"N":"1"}},"ConsumedCapacity":{"CapacityUnits":0.5}}"#,
        )
        .unwrap();
        let p2 = QueryRequest::unmarshal(
            br#"{"Items":[{"Id":{"N":"2"}}],"Count":1,"ScannedCount":1,"ConsumedCapacity":{"CapacityUnits":0.5}}"#,
        )
        .unwrap();
        assert_eq!(p1.last_evaluated_key().unwrap().get_i64("Id"), Some(1));
        total.merge(p1);
        total.merge(p2);
        assert_eq!(total.items().len(), 2);
        assert_eq!(total.count(), 2);
        assert_eq!(total.scanned_count(), 3);
        assert!(total.last_evaluated_key().is_none());
        assert_eq!(total.consumed_capacity().unwrap().capacity_units, Some(1.0));

        let r = QueryRequest::unmarshal(br#"{"Count":7,"ScannedCount":7}"#).unwrap();
        assert!(r.items().is_empty());
        assert_eq!(r.count(), 7);
    }
}
