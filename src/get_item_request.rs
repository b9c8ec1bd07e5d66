//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::auth_common::credentials_provider::Credentials;
use crate::error::DynamoError;
use crate::error::ErrorCode::IllegalArgument;
use crate::handle::Handle;
use crate::marshal::{validate_key, validate_table_name, DynamoRequest, RequestOptions};
use crate::types::{ConsumedCapacity, DynamoItem, Item, ReturnConsumedCapacity};
use serde_derive::{Deserialize, Serialize};
use std::collections::HashMap;
use std::result::Result;
use std::time::Duration;

/// Struct used for getting a single item from a DynamoDB table.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemRequest {
    pub(crate) table_name: String,
    pub(crate) key: Item,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) consistent_read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) projection_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) expression_attribute_names: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) attributes_to_get: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) return_consumed_capacity: Option<ReturnConsumedCapacity>,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

/// Struct representing the result of a [`GetItemRequest`] operation.
///
/// This struct is returned from a [`GetItemRequest::execute()`] call.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemResult {
    pub(crate) item: Option<Item>,
    pub(crate) consumed_capacity: Option<ConsumedCapacity>,
}

impl GetItemResult {
    /// Get the returned item. If no item with the given key exists in the table, this value will be `None`.
    pub fn item(&self) -> Option<&Item> {
        self.item.as_ref()
    }
    /// Get the consumed capacity of the operation, if it was requested.
    pub fn consumed_capacity(&self) -> Option<&ConsumedCapacity> {
        self.consumed_capacity.as_ref()
    }
}

impl GetItemRequest {
    /// Create a new `GetItemRequest`.
    ///
    /// `table_name` is required and must be a valid table name or ARN.
    pub fn new(table_name: &str) -> GetItemRequest {
        GetItemRequest {
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

    /// Specify the primary key of the item to get.
    ///
    /// `key` must contain the partition key, and the sort key if the table has one.
    pub fn key(mut self, key: Item) -> GetItemRequest {
        self.key = key;
        self
    }

    /// Specify the primary key from a native Rust struct.
    ///
    /// `item_key` must be an instance of a struct that implements the [`DynamoItem`] trait,
    /// which is done by adding the [`derive@DynamoItem`] derive to the struct definition.
    /// Only the key attributes of the struct should be set: every field is sent.
    pub fn item_key(mut self, item_key: &dyn DynamoItem) -> Result<GetItemRequest, DynamoError> {
        match item_key.to_item() {
            Ok(value) => {
                self = self.key(value);
                Ok(self)
            }
            Err(e) => Err(DynamoError::new(
                IllegalArgument,
                &format!("could not convert struct to Item: {}", e),
            )),
        }
    }

    /// Use a strongly consistent read. The default is eventually consistent.
    pub fn consistent_read(mut self, val: bool) -> GetItemRequest {
        self.consistent_read = Some(val);
        self
    }

    /// Specify which attributes to return, for example `"title, info.rating"`.
    pub fn projection_expression(mut self, expr: &str) -> GetItemRequest {
        self.projection_expression = Some(expr.to_string());
        self
    }

    /// Add a substitution for an attribute name placeholder (such as `#n`) used in the projection expression.
    pub fn expression_attribute_name(mut self, placeholder: &str, name: &str) -> GetItemRequest {
        self.expression_attribute_names
            .get_or_insert_with(HashMap::new)
            .insert(placeholder.to_string(), name.to_string());
        self
    }

    /// Legacy form of [`projection_expression()`](GetItemRequest::projection_expression()).
    pub fn attributes_to_get(mut self, names: &[&str]) -> GetItemRequest {
        self.attributes_to_get = Some(names.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn return_consumed_capacity(mut self, val: ReturnConsumedCapacity) -> GetItemRequest {
        self.return_consumed_capacity = Some(val);
        self
    }

    /// Execute the request, returning a [`GetItemResult`].
    ///
    /// If the item exists in the table, [`GetItemResult::item()`] will be `Some()`.
    pub async fn execute(&self, h: &Handle) -> Result<GetItemResult, DynamoError> {
        h.execute(self).await
    }

    /// Execute the request, populating an existing Rust native struct.
    ///
    /// `item` must be an instance of a struct that implements the [`DynamoItem`] trait.
    /// Returns `Ok(false)`, leaving `item` unchanged, if there is no item with the given key.
    /// ```no_run
    /// use dynamodb_rust_sdk::GetItemRequest;
    /// use dynamodb_rust_sdk::types::*;
    /// # use dynamodb_rust_sdk::Handle;
    /// # #[tokio::main]
    /// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let handle = Handle::builder().build().await?;
    /// #[derive(Default, Debug, DynamoItem)]
    /// struct Person {
    ///     pub id: i64,
    ///     pub name: String,
    ///     #[dynamo(attribute = "zip_code")]
    ///     pub zip: i32,
    /// }
    /// let mut person = Person::default();
    /// let found = GetItemRequest::new("people")
    ///     .key(Item::new().n("id", 123456))
    ///     .execute_into(&handle, &mut person)
    ///     .await?;
    /// if found {
    ///     println!("name={}", person.name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn execute_into(
        &self,
        h: &Handle,
        item: &mut dyn DynamoItem,
    ) -> Result<bool, DynamoError> {
        let resp = self.execute(h).await?;
        match &resp.item {
            Some(i) => {
                item.from_item(i)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl DynamoRequest for GetItemRequest {
    type Output = GetItemResult;
    const OPERATION: &'static str = "GetItem";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_table_name(&self.table_name)?;
        validate_key(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn marshal_get_item() {
        let req = GetItemRequest::new("Music")
            .key(Item::new().s("Artist", "No One You Know").s("SongTitle", "Call Me Today"))
            .consistent_read(true)
            .projection_expression("#a, Year")
            .expression_attribute_name("#a", "AlbumTitle")
            .timeout(&Duration::from_secs(1));
        req.validate().unwrap();
        let v: serde_json::Value = serde_json::from_slice(&req.marshal().unwrap()).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "TableName": "Music",
                "Key": {
                    "Artist": {"S": "No One You Know"},
                    "SongTitle": {"S": "Call Me Today"}
                },
                "ConsistentRead": true,
                "ProjectionExpression": "#a, Year",
                "ExpressionAttributeNames": {"#a": "AlbumTitle"}
            })
        );
        assert_eq!(req.options().timeout, Some(Duration::from_secs(1)));
        assert_eq!(GetItemRequest::target(), "DynamoDB_20120810.GetItem");
    }

    #[test]
    fn unmarshal_found_and_missing() {
        let r = GetItemRequest::unmarshal(
            br#"{"Item":{"Artist":{"S":"Acme Band"},"Year":{"N":"2020"}},
                "ConsumedCapacity":{"TableName":"Music","CapacityUnits":0.5}}"#,
        )
        .unwrap();
        let item = r.item().unwrap();
        assert_eq!(item.get_s("Artist"), Some("Acme Band"));
        assert_eq!(item.get_i64("Year"), Some(2020));
        assert_eq!(r.consumed_capacity().unwrap().capacity_units, Some(0.5));

        let r = GetItemRequest::unmarshal(b"{}").unwrap();
        assert!(r.item().is_none());
        let r = GetItemRequest::unmarshal(b"").unwrap();
        assert!(r.item().is_none());
    }

    #[test]
    fn validate_rejects_missing_key() {
        let e = GetItemRequest::new("Music").validate().unwrap_err();
        assert_eq!(e.code, ErrorCode::IllegalArgument);
        assert!(GetItemRequest::new("x")
            .key(Item::new().s("id", "1"))
            .validate()
            .is_err());
    }
}
