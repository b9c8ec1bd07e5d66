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
    validate_key, validate_names, validate_table_name, validate_values, DynamoRequest,
    RequestOptions,
};
use crate::types::{
    AttributeValue, AttributeValueUpdate, ConditionalOperator, ConsumedCapacity,
    ExpectedAttributeValue, Item, ItemCollectionMetrics, ReturnConsumedCapacity,
    ReturnItemCollectionMetrics, ReturnValue, ReturnValuesOnConditionCheckFailure,
    ToAttributeValue,
};
use serde_derive::{Deserialize, Serialize};
use std::collections::HashMap;
use std::result::Result;
use std::time::Duration;

/// Struct used for modifying the attributes of a single item, or creating it
/// if it does not exist.
///
/// ```no_run
/// # use dynamodb_rust_sdk::{Handle, UpdateItemRequest};
/// # use dynamodb_rust_sdk::types::{Item, ReturnValue};
/// # #[tokio::main]
/// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let handle = Handle::builder().build().await?;
/// let res = UpdateItemRequest::new("Music")
///     .key(Item::new().s("Artist", "Acme Band").s("SongTitle", "Happy Day"))
///     .update_expression("SET Plays = if_not_exists(Plays, :zero) + :one")
///     .expression_attribute_value(":zero", 0)
///     .expression_attribute_value(":one", 1)
///     .return_values(ReturnValue::UpdatedNew)
///     .execute(&handle)
///     .await?;
/// println!("plays: {:?}", res.attributes().and_then(|a| a.get_i64("Plays")));
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateItemRequest {
    pub(crate) table_name: String,
    pub(crate) key: Item,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) update_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) condition_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) expression_attribute_names: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) expression_attribute_values: Option<HashMap<String, AttributeValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) attribute_updates: Option<HashMap<String, AttributeValueUpdate>>,
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

/// Struct representing the result of an [`UpdateItemRequest`] operation.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateItemResult {
    pub(crate) attributes: Option<Item>,
    pub(crate) consumed_capacity: Option<ConsumedCapacity>,
    pub(crate) item_collection_metrics: Option<ItemCollectionMetrics>,
}

impl UpdateItemResult {
    /// The attributes selected by [`UpdateItemRequest::return_values()`], if any.
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

impl UpdateItemRequest {
    /// Create a new `UpdateItemRequest`.
    pub fn new(table_name: &str) -> UpdateItemRequest {
        UpdateItemRequest {
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

    /// Specify the primary key of the item to update.
    pub fn key(mut self, key: Item) -> UpdateItemRequest {
        self.key = key;
        self
    }

    /// The update to apply, for example `"SET #c = :c REMOVE Tags"`.
    pub fn update_expression(mut self, expr: &str) -> UpdateItemRequest {
        self.update_expression = Some(expr.to_string());
        self
    }

    pub fn condition_expression(mut self, expr: &str) -> UpdateItemRequest {
        self.condition_expression = Some(expr.to_string());
        self
    }

    pub fn expression_attribute_name(mut self, placeholder: &str, name: &str) -> UpdateItemRequest {
        self.expression_attribute_names
            .get_or_insert_with(HashMap::new)
            .insert(placeholder.to_string(), name.to_string());
        self
    }

    pub fn expression_attribute_value(
        mut self,
        placeholder: &str,
        val: impl ToAttributeValue,
    ) -> UpdateItemRequest {
        self.expression_attribute_values
            .get_or_insert_with(HashMap::new)
            .insert(placeholder.to_string(), val.to_attribute_value());
        self
    }

    /// Add a legacy `AttributeUpdates` action. This cannot be combined with an update expression.
    pub fn attribute_update(mut self, name: &str, update: AttributeValueUpdate) -> UpdateItemRequest {
        self.attribute_updates
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), update);
        self
    }

    pub fn expected(mut self, name: &str, val: ExpectedAttributeValue) -> UpdateItemRequest {
        self.expected
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), val);
        self
    }

    pub fn conditional_operator(mut self, op: ConditionalOperator) -> UpdateItemRequest {
        self.conditional_operator = Some(op);
        self
    }

    pub fn return_values(mut self, val: ReturnValue) -> UpdateItemRequest {
        self.return_values = Some(val);
        self
    }

    pub fn return_consumed_capacity(mut self, val: ReturnConsumedCapacity) -> UpdateItemRequest {
        self.return_consumed_capacity = Some(val);
        self
    }

    pub fn return_item_collection_metrics(
        mut self,
        val: ReturnItemCollectionMetrics,
    ) -> UpdateItemRequest {
        self.return_item_collection_metrics = Some(val);
        self
    }

    pub fn return_values_on_condition_check_failure(
        mut self,
        val: ReturnValuesOnConditionCheckFailure,
    ) -> UpdateItemRequest {
        self.return_values_on_condition_check_failure = Some(val);
        self
    }

    /// Execute the request, returning an [`UpdateItemResult`].
    pub async fn execute(&self, h: &Handle) -> Result<UpdateItemResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for UpdateItemRequest {
    type Output = UpdateItemResult;
    const OPERATION: &'static str = "UpdateItem";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_table_name(&self.table_name)?;
        validate_key(&self.key)?;
        match (&self.update_expression, &self.attribute_updates) {
            (Some(e), None) if e.trim().is_empty() => {
                return ia_err!("update expression must not be empty")
            }
            (Some(_), Some(_)) => {
                return ia_err!("update expression and legacy attribute updates cannot be used together")
            }
            _ => (),
        }
        if self.condition_expression.is_some() && self.expected.is_some() {
            return ia_err!("condition expression and legacy expected values cannot be used together");
        }
        if let Some(updates) = &self.attribute_updates {
            for (name, u) in updates {
                if let Some(v) = &u.value {
                    if let Err(e) = v.validate() {
                        return ia_err!("invalid update for attribute '{}': {}", name, e.message);
                    }
                }
            }
        }
        validate_names(&self.expression_attribute_names)?;
        validate_values(&self.expression_attribute_values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marshal_update_expression() {
        let req = UpdateItemRequest::new("Music")
            .key(Item::new().s("Artist", "Acme Band").s("SongTitle", "Happy Day"))
            .update_expression("SET #t = :t ADD Plays :one")
            .expression_attribute_name("#t", "Title")
            .expression_attribute_value(":t", "Happier Day")
            .expression_attribute_value(":one", 1)
            .return_values(ReturnValue::UpdatedNew);
        req.validate().unwrap();
        let v: serde_json::Value = serde_json::from_slice(&req.marshal().unwrap()).unwrap();
        assert_eq!(v["UpdateExpression"], "SET #t = :t ADD Plays :one");
        assert_eq!(v["ExpressionAttributeValues"][":t"], serde_json::json!({"S": "Happier Day"}));
        assert_eq!(v["ReturnValues"], "UPDATED_NEW");
        assert!(v.get("AttributeUpdates").is_none());
    }

    #[test]
    fn marshal_legacy_attribute_updates() {
        let req = UpdateItemRequest::new("Music")
            .key(Item::new().s("Artist", "Acme Band"))
            .attribute_update("Plays", AttributeValueUpdate::add(1))
            .attribute_update("Old", AttributeValueUpdate::delete());
        req.validate().unwrap();
        let v: serde_json::Value = serde_json::from_slice(&req.marshal().unwrap()).unwrap();
        assert_eq!(
            v["AttributeUpdates"]["Plays"],
            serde_json::json!({"Value": {"N": "1"}, "Action": "ADD"})
        );
        assert_eq!(v["AttributeUpdates"]["Old"], serde_json::json!({"Action": "DELETE"}));
    }

    #[test]
    fn validate_update() {
        let key = Item::new().s("Artist", "x");
        assert!(UpdateItemRequest::new("Music")
            .key(key.clone())
            .update_expression(" ")
            .validate()
            .is_err());
        assert!(UpdateItemRequest::new("Music")
            .key(key.clone())
            .update_expression("SET a = :a")
            .attribute_update("b", AttributeValueUpdate::delete())
            .validate()
            .is_err());
        assert!(UpdateItemRequest::new("Music")
            .key(key)
            .attribute_update("b", AttributeValueUpdate::put(AttributeValue::Ss(vec![])))
            .validate()
            .is_err());
    }

    #[test]
    fn unmarshal_updated_attributes() {
        let r = UpdateItemRequest::unmarshal(br#"{"Attributes":{"Plays":{"N":"12"}}}"#).unwrap();
        assert_eq!(r.attributes().unwrap().get_i64("Plays"), Some(12));
    }
}
