//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::auth_common::credentials_provider::Credentials;
use crate::error::ErrorCode::IllegalArgument;
use crate::error::{ia_err, DynamoError};
use crate::handle::Handle;
use crate::marshal::{
    validate_names, validate_table_name, validate_values, DynamoRequest, RequestOptions,
};
use crate::types::{
    AttributeValue, ConditionalOperator, ConsumedCapacity, DynamoItem, ExpectedAttributeValue,
    Item, ItemCollectionMetrics, ReturnConsumedCapacity, ReturnItemCollectionMetrics, ReturnValue,
    ReturnValuesOnConditionCheckFailure, ToAttributeValue,
};
use serde_derive::{Deserialize, Serialize};
use std::collections::HashMap;
use std::result::Result;
use std::time::Duration;

/// Struct used for creating or replacing a single item in a DynamoDB table.
///
/// If an item with the same primary key already exists, it is replaced
/// entirely unless a condition expression prevents it:
/// ```no_run
/// # use dynamodb_rust_sdk::{Handle, PutItemRequest};
/// # use dynamodb_rust_sdk::types::Item;
/// # #[tokio::main]
/// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let handle = Handle::builder().build().await?;
/// // only create the item if it does not already exist
/// PutItemRequest::new("Music")
///     .item(Item::new().s("Artist", "Acme Band").s("SongTitle", "Happy Day").n("Year", 2021))
///     .condition_expression("attribute_not_exists(Artist)")
///     .execute(&handle)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutItemRequest {
    pub(crate) table_name: String,
    pub(crate) item: Item,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) condition_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) expression_attribute_names: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) expression_attribute_values: Option<HashMap<String, AttributeValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) expected: Option<HashMap<String, ExpectedAttributeValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) conditional_operator: Option<ConditionalOperator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) return_values: Option<ReturnValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) return_consumed_capacity: Option<ReturnConsumedCapacity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) return_values_on_condition_check_failure:
        Option<ReturnValuesOnConditionCheckFailure>,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

/// Struct representing the result of a [`PutItemRequest`] operation.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutItemResult {
    pub(crate) attributes: Option<Item>,
    pub(crate) consumed_capacity: Option<ConsumedCapacity>,
    pub(crate) item_collection_metrics: Option<ItemCollectionMetrics>,
}

impl PutItemResult {
    /// The previous item, if [`ReturnValue::AllOld`] was requested and an item was replaced.
    pub fn attributes(&self) -> Option<&Item> {
        self.attributes.as_ref()
    }
    pub fn consumed_capacity(&self) -> Option<&ConsumedCapacity> {
        self.consumed_capacity.as_ref()
    }
    pub fn item_collection_metrics(&self) -> Option<&ItemCollectionMetrics> {
        self.item_collection_metrics.as_ref()
    }
}

impl PutItemRequest {
    /// Create a new `PutItemRequest`.
    ///
    /// `table_name` is required and must be a valid table name or ARN.
    pub fn new(table_name: &str) -> PutItemRequest {
        PutItemRequest {
            table_name: table_name.to_string(),
            ..Default::default()
        }
    }

    /// Specify the timeout value for the request.
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

    /// Specify the item to write. It must include the primary key attributes.
    pub fn item(mut self, item: Item) -> PutItemRequest {
        self.item = item;
        self
    }

    /// Specify the item to write from a native Rust struct that implements [`DynamoItem`].
    pub fn put_item(mut self, item: &dyn DynamoItem) -> Result<PutItemRequest, DynamoError> {
        match item.to_item() {
            Ok(value) => {
                self.item = value;
                Ok(self)
            }
            Err(e) => Err(DynamoError::new(
                IllegalArgument,
                &format!("could not convert struct to Item: {}", e),
            )),
        }
    }

    /// A condition that must hold for the put to succeed, for example
    /// `"attribute_not_exists(pk)"`. If it does not hold, the call fails with
    /// [`ConditionalCheckFailed`](crate::ErrorCode::ConditionalCheckFailed).
    pub fn condition_expression(mut self, expr: &str) -> PutItemRequest {
        self.condition_expression = Some(expr.to_string());
        self
    }

    /// Add a substitution for an attribute name placeholder (such as `#n`).
    pub fn expression_attribute_name(mut self, placeholder: &str, name: &str) -> PutItemRequest {
        self.expression_attribute_names
            .get_or_insert_with(HashMap::new)
            .insert(placeholder.to_string(), name.to_string());
        self
    }

    /// Add a value for a placeholder (such as `:v`) used in the condition expression.
    pub fn expression_attribute_value(
        mut self,
        placeholder: &str,
        val: impl ToAttributeValue,
    ) -> PutItemRequest {
        self.expression_attribute_values
            .get_or_insert_with(HashMap::new)
            .insert(placeholder.to_string(), val.to_attribute_value());
        self
    }

    /// Add a legacy `Expected` condition on an attribute.
    pub fn expected(mut self, name: &str, val: ExpectedAttributeValue) -> PutItemRequest {
        self.expected
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), val);
        self
    }

    /// How multiple legacy `Expected` conditions are combined.
    pub fn conditional_operator(mut self, op: ConditionalOperator) -> PutItemRequest {
        self.conditional_operator = Some(op);
        self
    }

    /// Return the replaced item. Only [`ReturnValue::None`] and [`ReturnValue::AllOld`] are allowed.
    pub fn return_values(mut self, val: ReturnValue) -> PutItemRequest {
        self.return_values = Some(val);
        self
    }

    pub fn return_consumed_capacity(mut self, val: ReturnConsumedCapacity) -> PutItemRequest {
        self.return_consumed_capacity = Some(val);
        self
    }

    pub fn return_item_collection_metrics(
        mut self,
        val: ReturnItemCollectionMetrics,
    ) -> PutItemRequest {
        self.return_item_collection_metrics = Some(val);
        self
    }

    pub fn return_values_on_condition_check_failure(
        mut self,
        val: ReturnValuesOnConditionCheckFailure,
    ) -> PutItemRequest {
        self.return_values_on_condition_check_failure = Some(val);
        self
    }

    /// Execute the request, returning a [`PutItemResult`].
    pub async fn execute(&self, h: &Handle) -> Result<PutItemResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for PutItemRequest {
    type Output = PutItemResult;
    const OPERATION: &'static str = "PutItem";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_table_name(&self.table_name)?;
        if self.item.is_empty() {
            return ia_err!("item must not be empty");
        }
        self.item.validate()?;
        if let Some(rv) = self.return_values {
            if rv != ReturnValue::None && rv != ReturnValue::AllOld {
                return ia_err!("PutItem only supports return values NONE or ALL_OLD, not {:?}", rv);
            }
        }
        if self.condition_expression.is_some() && self.expected.is_some() {
            return ia_err!("condition expression and legacy expected values cannot be used together");
        }
        validate_names(&self.expression_attribute_names)?;
        validate_values(&self.expression_attribute_values)
    }
}
