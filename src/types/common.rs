//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use serde_derive::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ia_err;
use crate::error::DynamoError;
use crate::types::{AttributeValue, Item, ToAttributeValue};

/// The capacity units consumed by an operation.
///
/// Only returned if the request asked for it with [`ReturnConsumedCapacity`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConsumedCapacity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_units: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_capacity_units: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_capacity_units: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Capacity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_secondary_indexes: Option<HashMap<String, Capacity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_secondary_indexes: Option<HashMap<String, Capacity>>,
}

fn add_units(total: &mut Option<f64>, more: Option<f64>) {
    if let Some(m) = more {
        *total = Some(total.unwrap_or(0.0) + m);
    }
}

impl ConsumedCapacity {
    // Add the table-level units of another page or call. Per-index details are not merged.
    pub(crate) fn merge(&mut self, other: &ConsumedCapacity) {
        if self.table_name.is_none() {
            self.table_name = other.table_name.clone();
        }
        add_units(&mut self.capacity_units, other.capacity_units);
        add_units(&mut self.read_capacity_units, other.read_capacity_units);
        add_units(&mut self.write_capacity_units, other.write_capacity_units);
    }
}

/// Capacity units consumed by a table or index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Capacity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_capacity_units: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_capacity_units: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_units: Option<f64>,
}

/// Which item attributes a write operation returns.
#[derive(Clone, Copy, Default, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnValue {
    #[default]
    None,
    AllOld,
    UpdatedOld,
    AllNew,
    UpdatedNew,
    #[serde(other)]
    Unknown,
}

/// Level of detail about consumed capacity returned by an operation.
#[derive(Clone, Copy, Default, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnConsumedCapacity {
    Indexes,
    Total,
    #[default]
    None,
    #[serde(other)]
    Unknown,
}

/// Whether item collection metrics are returned by a write operation.
#[derive(Clone, Copy, Default, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnItemCollectionMetrics {
    Size,
    #[default]
    None,
    #[serde(other)]
    Unknown,
}

/// Whether the item is returned when a condition check fails.
#[derive(Clone, Copy, Default, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnValuesOnConditionCheckFailure {
    AllOld,
    #[default]
    None,
    #[serde(other)]
    Unknown,
}

/// The attributes returned by a query or scan.
#[derive(Clone, Copy, Default, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Select {
    #[default]
    AllAttributes,
    AllProjectedAttributes,
    SpecificAttributes,
    Count,
    #[serde(other)]
    Unknown,
}

/// Information about the item collection a written item belongs to.
///
/// Only returned for tables with local secondary indexes, if requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemCollectionMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_collection_key: Option<Item>,
    /// Lower and upper bound of the estimated collection size, in GB.
    #[serde(
        rename = "SizeEstimateRangeGB",
        skip_serializing_if = "Option::is_none"
    )]
    pub size_estimate_range_gb: Option<Vec<f64>>,
}

/// Comparison operators for the legacy `KeyConditions`, `QueryFilter`,
/// `ScanFilter` and `Expected` parameters.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonOperator {
    Eq,
    Ne,
    In,
    Le,
    Lt,
    Ge,
    Gt,
    Between,
    NotNull,
    Null,
    Contains,
    NotContains,
    BeginsWith,
    #[serde(other)]
    Unknown,
}

impl ComparisonOperator {
    // number of values each operator takes; None means "one or more"
    fn arity(&self) -> Option<usize> {
        match self {
            ComparisonOperator::NotNull | ComparisonOperator::Null => Some(0),
            ComparisonOperator::Between => Some(2),
            ComparisonOperator::In | ComparisonOperator::Unknown => None,
            _ => Some(1),
        }
    }
}

/// A legacy condition on a single attribute, for example `Year BETWEEN 1990 AND 1999`.
///
/// New code should use condition or filter expressions instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Condition {
    #[serde(
        rename = "AttributeValueList",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub attribute_value_list: Vec<AttributeValue>,
    pub comparison_operator: ComparisonOperator,
}

impl Condition {
    pub fn new(op: ComparisonOperator) -> Condition {
        Condition {
            attribute_value_list: Vec::new(),
            comparison_operator: op,
        }
    }

    pub fn value(mut self, v: impl ToAttributeValue) -> Condition {
        self.attribute_value_list.push(v.to_attribute_value());
        self
    }

    pub(crate) fn validate(&self) -> Result<(), DynamoError> {
        let n = self.attribute_value_list.len();
        match self.comparison_operator.arity() {
            Some(want) if want != n => {
                return ia_err!(
                    "comparison operator {:?} takes {} value(s), got {}",
                    self.comparison_operator,
                    want,
                    n
                );
            }
            None if n == 0 => {
                return ia_err!(
                    "comparison operator {:?} needs at least one value",
                    self.comparison_operator
                );
            }
            _ => (),
        }
        for v in &self.attribute_value_list {
            v.validate()?;
        }
        Ok(())
    }
}

/// A legacy expected-value condition on a write (the `Expected` parameter).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExpectedAttributeValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<AttributeValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_operator: Option<ComparisonOperator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_value_list: Option<Vec<AttributeValue>>,
}

impl ExpectedAttributeValue {
    /// Expect the attribute to exist with the given value.
    pub fn value(v: impl ToAttributeValue) -> Self {
        ExpectedAttributeValue {
            value: Some(v.to_attribute_value()),
            exists: Some(true),
            ..Default::default()
        }
    }

    /// Expect the attribute not to exist.
    pub fn not_exists() -> Self {
        ExpectedAttributeValue {
            exists: Some(false),
            ..Default::default()
        }
    }

    /// Expect the attribute to satisfy a [`Condition`].
    pub fn condition(c: Condition) -> Self {
        ExpectedAttributeValue {
            comparison_operator: Some(c.comparison_operator),
            attribute_value_list: Some(c.attribute_value_list),
            ..Default::default()
        }
    }
}

/// Actions for the legacy `AttributeUpdates` parameter of UpdateItem.
#[derive(Clone, Copy, Default, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeAction {
    Add,
    #[default]
    Put,
    Delete,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeValueUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<AttributeValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<AttributeAction>,
}

impl AttributeValueUpdate {
    pub fn put(v: impl ToAttributeValue) -> Self {
        AttributeValueUpdate {
            value: Some(v.to_attribute_value()),
            action: Some(AttributeAction::Put),
        }
    }

    pub fn add(v: impl ToAttributeValue) -> Self {
        AttributeValueUpdate {
            value: Some(v.to_attribute_value()),
            action: Some(AttributeAction::Add),
        }
    }

    pub fn delete() -> Self {
        AttributeValueUpdate {
            value: None,
            action: Some(AttributeAction::Delete),
        }
    }
}

/// How multiple legacy conditions are combined.
#[derive(Clone, Copy, Default, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionalOperator {
    #[default]
    And,
    Or,
    #[serde(other)]
    Unknown,
}

/// A key/value tag on a DynamoDB resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: &str, value: &str) -> Tag {
        Tag {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// The reason a single item in a transaction caused it to be cancelled.
///
/// `code` is `"None"` for items that did not cause the cancellation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CancellationReason {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A regional endpoint returned by DescribeEndpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Endpoint {
    pub address: String,
    pub cache_period_in_minutes: i64,
}

/// Status of time to live on a table.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeToLiveStatus {
    Enabling,
    Disabling,
    Enabled,
    Disabled,
    #[serde(other)]
    Unknown,
}

/// Enables or disables time to live on a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimeToLiveSpecification {
    pub enabled: bool,
    /// The attribute holding the expiry time, in epoch seconds.
    pub attribute_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimeToLiveDescription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_live_status: Option<TimeToLiveStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_name: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContributorInsightsAction {
    Enable,
    Disable,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContributorInsightsStatus {
    Enabling,
    Enabled,
    Disabling,
    Disabled,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContributorInsightsSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributor_insights_status: Option<ContributorInsightsStatus>,
}

/// Details of a failure reported by DescribeContributorInsights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FailureException {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_use_service_strings() {
        assert_eq!(serde_json::to_string(&ReturnValue::AllOld).unwrap(), r#""ALL_OLD""#);
        assert_eq!(
            serde_json::to_string(&Select::AllProjectedAttributes).unwrap(),
            r#""ALL_PROJECTED_ATTRIBUTES""#
        );
        assert_eq!(
            serde_json::to_string(&ComparisonOperator::BeginsWith).unwrap(),
            r#""BEGINS_WITH""#
        );
        let s: TimeToLiveStatus = serde_json::from_str(r#""ENABLED""#).unwrap();
        assert_eq!(s, TimeToLiveStatus::Enabled);
        // values added to the service later do not break older clients
        let s: ContributorInsightsStatus = serde_json::from_str(r#""PAUSED""#).unwrap();
        assert_eq!(s, ContributorInsightsStatus::Unknown);
    }

    #[test]
    fn condition_arity() {
        assert!(Condition::new(ComparisonOperator::Eq).value(1).validate().is_ok());
        assert!(Condition::new(ComparisonOperator::Eq).validate().is_err());
        assert!(Condition::new(ComparisonOperator::Between).value(1).value(5).validate().is_ok());
        assert!(Condition::new(ComparisonOperator::Between).value(1).validate().is_err());
        assert!(Condition::new(ComparisonOperator::NotNull).validate().is_ok());
        assert!(Condition::new(ComparisonOperator::In).validate().is_err());
        assert!(Condition::new(ComparisonOperator::In).value("a").value("b").validate().is_ok());
    }

    #[test]
    fn consumed_capacity_from_json() {
        let c: ConsumedCapacity = serde_json::from_str(
            r#"{"TableName":"Music","CapacityUnits":1.5,"Table":{"CapacityUnits":1.0},
                "GlobalSecondaryIndexes":{"ByYear":{"CapacityUnits":0.5}}}"#,
        )
        .unwrap();
        assert_eq!(c.table_name.as_deref(), Some("Music"));
        assert_eq!(c.capacity_units, Some(1.5));
        assert_eq!(c.global_secondary_indexes.unwrap()["ByYear"].capacity_units, Some(0.5));
    }

    #[test]
    fn merge_capacity() {
        let mut total = ConsumedCapacity::default();
        let page = ConsumedCapacity {
            table_name: Some("Music".to_string()),
            capacity_units: Some(1.5),
            ..Default::default()
        };
        total.merge(&page);
        total.merge(&page);
        assert_eq!(total.table_name.as_deref(), Some("Music"));
        assert_eq!(total.capacity_units, Some(3.0));
        assert_eq!(total.read_capacity_units, None);
    }
}
