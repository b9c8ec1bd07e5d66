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
    validate_key, validate_names, validate_table_name, validate_values, DynamoRequest,
    RequestOptions,
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

/// Struct used for deleting a single item from a DynamoDB table.
///
/// Deleting an item that does not exist is not an error, unless a condition
/// expression requires the item to exist.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteItemRequest {
    pub(crate) table_name: String,
    pub(crate) key: Item,
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

/// Struct representing the result of a [`DeleteItemRequest`] operation.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteItemResult {
    pub(crate) attributes: Option<Item>,
    pub(crate) consumed_capacity: Option<ConsumedCapacity>,
    pub(crate) item_collection_metrics: Option<ItemCollectionMetrics>,
}

impl DeleteItemResult {
    /// The deleted item, if [`ReturnValue::AllOld`] was requested and the item existed.
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

impl DeleteItemRequest {
    /// Create a new `DeleteItemRequest`.
    pub fn new(table_name: &str) -> DeleteItemRequest {
        DeleteItemRequest {
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

    /// Specify the primary key of the item to delete.
    pub fn key(mut self, key: Item) -> DeleteItemRequest {
        self.key = key;
        self
    }

    /// Specify the primary key from a native Rust struct that implements [`DynamoItem`].
    pub fn item_key(mut self, item_key: &dyn DynamoItem) -> Result<DeleteItemRequest, DynamoError> {
        match item_key.to_item() {
            Ok(value) => {
                self.key = value;
                Ok(self)
            }
            Err(e) => Err(DynamoError::new(
                IllegalArgument,
                &format!("could not convert struct to Item: {}", e),
            )),
        }
    }

    pub fn condition_expression(mut self, expr: &str) -> DeleteItemRequest {
        self.condition_expression = Some(expr.to_string());
        self
    }

    pub fn expression_attribute_name(mut self, placeholder: &str, name: &str) -> DeleteItemRequest {
        self.expression_attribute_names
            .get_or_insert_with(HashMap::new)
            .insert(placeholder.to_string(), name.to_string());
        self
    }

    pub fn expression_attribute_value(
        mut self,
        placeholder: &str,
        val: impl ToAttributeValue,
    ) -> DeleteItemRequest {
        self.expression_attribute_values
            .get_or_insert_with(HashMap::new)
            .insert(placeholder.to_string(), val.to_attribute_value());
        self
    }

    /// Add a legacy `Expected` condition on an attribute.
    pub fn expected(mut self, name: &str, val: ExpectedAttributeValue) -> DeleteItemRequest {
        self.expected
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), val);
        self
    }

    pub fn conditional_operator(mut self, op: ConditionalOperator) -> DeleteItemRequest {
        self.conditional_operator = Some(op);
        self
    }

    /// Return the deleted item. Only [`ReturnValue::None`] and [`ReturnValue::AllOld`] are allowed.
    pub fn return_values(mut self, val: ReturnValue) -> DeleteItemRequest {
        self.return_values = Some(val);
        self
    }

    pub fn return_consumed_capacity(mut self, val: ReturnConsumedCapacity) -> DeleteItemRequest {
        self.return_consumed_capacity = Some(val);
        self
    }

    pub fn return_item_collection_metrics(
        mut self,
        val: ReturnItemCollectionMetrics,
    ) -> DeleteItemRequest {
        self.return_item_collection_metrics = Some(val);
        self
    }

    pub fn return_values_on_condition_check_failure(
        mut self,
        val: ReturnValuesOnConditionCheckFailure,
    ) -> DeleteItemRequest {
        self.return_values_on_condition_check_failure = Some(val);
        self
    }

    /// Execute the request, returning a [`DeleteItemResult`].
    pub async fn execute(&self, h: &Handle) -> Result<DeleteItemResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for DeleteItemRequest {
    type Output = DeleteItemResult;
    const OPERATION: &'static str = "DeleteItem";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_table_name(&self.table_name)?;
        validate_key(&self.key)?;
        if let Some(rv) = self.return_values {
            if rv != ReturnValue::None && rv != ReturnValue::AllOld {
                return ia_err!("DeleteItem only supports return values NONE or ALL_OLD, not {:?}", rv);
            }
        }
        if self.condition_expression.is_some() && self.expected.is_some() {
            return ia_err!("condition expression and legacy expected values cannot be used together");
        }
        validate_names(&self.expression_attribute_names)?;
        validate_values(&self.expression_attribute_values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marshal_delete() {
        let req = DeleteItemRequest::new("Music")
            .key(Item::new().s("Artist", "Acme Band").s("SongTitle", "Happy Day"))
            .condition_expression("Price > :p")
            .expression_attribute_value(":p", 20)
            .return_values(ReturnValue::AllOld);
        req.validate().unwrap();
        let v: serde_json::Value = serde_json::from_slice(&req.marshal().unwrap()).unwrap();
        assert_eq!(v["TableName"], "Music");
        assert_eq!(v["Key"]["SongTitle"], serde_json::json!({"S": "Happy Day"}));
        assert_eq!(v["ConditionExpression"], "Price > :p");
        assert_eq!(v["ReturnValues"], "ALL_OLD");
    }

    #[test]
    fn validate_delete() {
        assert!(DeleteItemRequest::new("Music").validate().is_err());
        assert!(DeleteItemRequest::new("Music")
            .key(Item::new().s("Artist", "x"))
            .return_values(ReturnValue::AllNew)
            .validate()
            .is_err());
        assert!(DeleteItemRequest::new("Music")
            .key(Item::new().s("Artist", "x"))
            .expression_attribute_value("p", 1)
            .validate()
            .is_err());
    }
}
