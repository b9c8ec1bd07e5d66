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
use crate::types::{AttributeValue, Item, ReturnValuesOnConditionCheckFailure, ToAttributeValue};

/// The keys (and projection) to read from one table in a BatchGetItem request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeysAndAttributes {
    pub keys: Vec<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_to_get: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_names: Option<HashMap<String, String>>,
}

impl KeysAndAttributes {
    pub fn new(keys: Vec<Item>) -> Self {
        KeysAndAttributes {
            keys,
            ..Default::default()
        }
    }

    pub fn key(mut self, key: Item) -> Self {
        self.keys.push(key);
        self
    }

    pub fn consistent_read(mut self, val: bool) -> Self {
        self.consistent_read = Some(val);
        self
    }

    pub fn projection_expression(mut self, expr: &str) -> Self {
        self.projection_expression = Some(expr.to_string());
        self
    }

    pub fn expression_attribute_name(mut self, placeholder: &str, name: &str) -> Self {
        self.expression_attribute_names
            .get_or_insert_with(HashMap::new)
            .insert(placeholder.to_string(), name.to_string());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutRequest {
    pub item: Item,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteRequest {
    pub key: Item,
}

/// A single put or delete in a BatchWriteItem request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WriteRequest {
    #[serde(rename = "PutRequest")]
    Put(PutRequest),
    #[serde(rename = "DeleteRequest")]
    Delete(DeleteRequest),
}

impl WriteRequest {
    pub fn put(item: Item) -> Self {
        WriteRequest::Put(PutRequest { item })
    }

    pub fn delete(key: Item) -> Self {
        WriteRequest::Delete(DeleteRequest { key })
    }

    pub(crate) fn validate(&self) -> Result<(), DynamoError> {
        match self {
            WriteRequest::Put(p) => {
                if p.item.is_empty() {
                    return ia_err!("put request item must not be empty");
                }
                p.item.validate()
            }
            WriteRequest::Delete(d) => {
                if d.key.is_empty() {
                    return ia_err!("delete request key must not be empty");
                }
                d.key.validate()
            }
        }
    }
}

/// One item to read in a TransactGetItems request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactGetItem {
    pub get: Get,
}

impl TransactGetItem {
    pub fn new(table_name: &str, key: Item) -> Self {
        TransactGetItem {
            get: Get {
                table_name: table_name.to_string(),
                key,
                ..Default::default()
            },
        }
    }

    pub fn projection_expression(mut self, expr: &str) -> Self {
        self.get.projection_expression = Some(expr.to_string());
        self
    }

    pub fn expression_attribute_name(mut self, placeholder: &str, name: &str) -> Self {
        self.get
            .expression_attribute_names
            .get_or_insert_with(HashMap::new)
            .insert(placeholder.to_string(), name.to_string());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Get {
    pub key: Item,
    pub table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_names: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConditionCheck {
    pub key: Item,
    pub table_name: String,
    pub condition_expression: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_names: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_values: Option<HashMap<String, AttributeValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_values_on_condition_check_failure: Option<ReturnValuesOnConditionCheckFailure>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Put {
    pub item: Item,
    pub table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_names: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_values: Option<HashMap<String, AttributeValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_values_on_condition_check_failure: Option<ReturnValuesOnConditionCheckFailure>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Delete {
    pub key: Item,
    pub table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_names: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_values: Option<HashMap<String, AttributeValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_values_on_condition_check_failure: Option<ReturnValuesOnConditionCheckFailure>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Update {
    pub key: Item,
    pub table_name: String,
    pub update_expression: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_names: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_values: Option<HashMap<String, AttributeValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_values_on_condition_check_failure: Option<ReturnValuesOnConditionCheckFailure>,
}

/// One action in a TransactWriteItems request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransactWriteItem {
    ConditionCheck(ConditionCheck),
    Put(Put),
    Delete(Delete),
    Update(Update),
}

impl TransactWriteItem {
    pub fn put(table_name: &str, item: Item) -> Self {
        TransactWriteItem::Put(Put {
            item,
            table_name: table_name.to_string(),
            ..Default::default()
        })
    }

    pub fn delete(table_name: &str, key: Item) -> Self {
        TransactWriteItem::Delete(Delete {
            key,
            table_name: table_name.to_string(),
            ..Default::default()
        })
    }

    pub fn update(table_name: &str, key: Item, update_expression: &str) -> Self {
        TransactWriteItem::Update(Update {
            key,
            table_name: table_name.to_string(),
            update_expression: update_expression.to_string(),
            ..Default::default()
        })
    }

    pub fn condition_check(table_name: &str, key: Item, condition_expression: &str) -> Self {
        TransactWriteItem::ConditionCheck(ConditionCheck {
            key,
            table_name: table_name.to_string(),
            condition_expression: condition_expression.to_string(),
            ..Default::default()
        })
    }

    /// Set the condition expression of a put, delete or update.
    ///
    /// For a condition check this replaces its expression.
    pub fn condition_expression(mut self, expr: &str) -> Self {
        match &mut self {
            TransactWriteItem::ConditionCheck(c) => c.condition_expression = expr.to_string(),
            TransactWriteItem::Put(p) => p.condition_expression = Some(expr.to_string()),
            TransactWriteItem::Delete(d) => d.condition_expression = Some(expr.to_string()),
            TransactWriteItem::Update(u) => u.condition_expression = Some(expr.to_string()),
        }
        self
    }

    pub fn expression_attribute_name(mut self, placeholder: &str, name: &str) -> Self {
        let names = match &mut self {
            TransactWriteItem::ConditionCheck(c) => &mut c.expression_attribute_names,
            TransactWriteItem::Put(p) => &mut p.expression_attribute_names,
            TransactWriteItem::Delete(d) => &mut d.expression_attribute_names,
            TransactWriteItem::Update(u) => &mut u.expression_attribute_names,
        };
        names
            .get_or_insert_with(HashMap::new)
            .insert(placeholder.to_string(), name.to_string());
        self
    }

    pub fn expression_attribute_value(
        mut self,
        placeholder: &str,
        val: impl ToAttributeValue,
    ) -> Self {
        let values = match &mut self {
            TransactWriteItem::ConditionCheck(c) => &mut c.expression_attribute_values,
            TransactWriteItem::Put(p) => &mut p.expression_attribute_values,
            TransactWriteItem::Delete(d) => &mut d.expression_attribute_values,
            TransactWriteItem::Update(u) => &mut u.expression_attribute_values,
        };
        values
            .get_or_insert_with(HashMap::new)
            .insert(placeholder.to_string(), val.to_attribute_value());
        self
    }

    pub fn return_values_on_condition_check_failure(
        mut self,
        val: ReturnValuesOnConditionCheckFailure,
    ) -> Self {
        let rv = match &mut self {
            TransactWriteItem::ConditionCheck(c) => {
                &mut c.return_values_on_condition_check_failure
            }
            TransactWriteItem::Put(p) => &mut p.return_values_on_condition_check_failure,
            TransactWriteItem::Delete(d) => &mut d.return_values_on_condition_check_failure,
            TransactWriteItem::Update(u) => &mut u.return_values_on_condition_check_failure,
        };
        *rv = Some(val);
        self
    }

    pub fn table_name(&self) -> &str {
        match self {
            TransactWriteItem::ConditionCheck(c) => &c.table_name,
            TransactWriteItem::Put(p) => &p.table_name,
            TransactWriteItem::Delete(d) => &d.table_name,
            TransactWriteItem::Update(u) => &u.table_name,
        }
    }

    // The item or key this action applies to.
    pub(crate) fn target(&self) -> &Item {
        match self {
            TransactWriteItem::ConditionCheck(c) => &c.key,
            TransactWriteItem::Put(p) => &p.item,
            TransactWriteItem::Delete(d) => &d.key,
            TransactWriteItem::Update(u) => &u.key,
        }
    }
}

/// The item returned for one [`TransactGetItem`]. `item` is `None` if the item
/// did not exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,
}
