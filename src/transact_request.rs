//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Requests that read or write several items as one all-or-nothing transaction.
use crate::auth_common::credentials_provider::Credentials;
use crate::error::{ia_err, DynamoError};
use crate::handle::Handle;
use crate::marshal::{
    validate_count, validate_names, validate_table_name, validate_values, DynamoRequest,
    RequestOptions, MAX_TRANSACT_ITEMS,
};
use crate::types::{
    ConsumedCapacity, Item, ItemCollectionMetrics, ItemResponse, ReturnConsumedCapacity,
    ReturnItemCollectionMetrics, TransactGetItem, TransactWriteItem,
};
use rand::Rng;
use serde_derive::{Deserialize, Serialize};
use std::collections::HashMap;
use std::result::Result;
use std::time::Duration;

const MAX_CLIENT_REQUEST_TOKEN_LEN: usize = 36;

/// Struct used for reading up to 100 items, from one or more tables, as a single consistent snapshot.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactGetItemsRequest {
    pub(crate) transact_items: Vec<TransactGetItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) return_consumed_capacity: Option<ReturnConsumedCapacity>,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

/// Struct representing the result of a [`TransactGetItemsRequest`] operation.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactGetItemsResult {
    #[serde(default)]
    pub(crate) responses: Vec<ItemResponse>,
    pub(crate) consumed_capacity: Option<Vec<ConsumedCapacity>>,
}

impl TransactGetItemsResult {
    /// One response per requested item, in request order.
    pub fn responses(&self) -> &Vec<ItemResponse> {
        &self.responses
    }
    /// The item read for the request at `index`, if it existed.
    pub fn item(&self, index: usize) -> Option<&Item> {
        self.responses.get(index).and_then(|r| r.item.as_ref())
    }
    pub fn consumed_capacity(&self) -> Option<&Vec<ConsumedCapacity>> {
        self.consumed_capacity.as_ref()
    }
}

impl TransactGetItemsRequest {
    pub fn new() -> TransactGetItemsRequest {
        TransactGetItemsRequest::default()
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

    /// Add an item to read. Results are returned in the order items are added.
    pub fn add(mut self, item: TransactGetItem) -> TransactGetItemsRequest {
        self.transact_items.push(item);
        self
    }

    /// Add an item to read by table name and key.
    pub fn get(self, table_name: &str, key: Item) -> TransactGetItemsRequest {
        self.add(TransactGetItem::new(table_name, key))
    }

    pub fn return_consumed_capacity(mut self, val: ReturnConsumedCapacity) -> TransactGetItemsRequest {
        self.return_consumed_capacity = Some(val);
        self
    }

    pub async fn execute(&self, h: &Handle) -> Result<TransactGetItemsResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for TransactGetItemsRequest {
    type Output = TransactGetItemsResult;
    const OPERATION: &'static str = "TransactGetItems";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_count("transaction items", self.transact_items.len(), MAX_TRANSACT_ITEMS)?;
        for t in &self.transact_items {
            validate_table_name(&t.get.table_name)?;
            crate::marshal::validate_key(&t.get.key)?;
            validate_names(&t.get.expression_attribute_names)?;
        }
        Ok(())
    }
}

/// Struct used for applying up to 100 puts, updates, deletes and condition
/// checks as a single transaction.
///
/// If any condition fails, nothing is written and the call fails with
/// [`TransactionCanceled`](crate::ErrorCode::TransactionCanceled); the
/// per-item reasons are in [`DynamoError::cancellation_reasons()`].
///
/// A random client request token is assigned when the request is created, so
/// retries of the same request object are idempotent for ten minutes.
/// ```no_run
/// # use dynamodb_rust_sdk::{Handle, TransactWriteItemsRequest};
/// # use dynamodb_rust_sdk::types::{Item, TransactWriteItem};
/// # #[tokio::main]
/// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let handle = Handle::builder().build().await?;
/// TransactWriteItemsRequest::new()
///     .add(
///         TransactWriteItem::update("Accounts", Item::new().s("Id", "alice"), "SET Bal = Bal - :amt")
///             .condition_expression("Bal >= :amt")
///             .expression_attribute_value(":amt", 10),
///     )
///     .add(
///         TransactWriteItem::update("Accounts", Item::new().s("Id", "bob"), "SET Bal = Bal + :amt")
///             .expression_attribute_value(":amt", 10),
///     )
///     .execute(&handle)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactWriteItemsRequest {
    pub(crate) transact_items: Vec<TransactWriteItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) return_consumed_capacity: Option<ReturnConsumedCapacity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
    pub(crate) client_request_token: String,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

/// Struct representing the result of a [`TransactWriteItemsRequest`] operation.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactWriteItemsResult {
    pub(crate) consumed_capacity: Option<Vec<ConsumedCapacity>>,
    pub(crate) item_collection_metrics: Option<HashMap<String, Vec<ItemCollectionMetrics>>>,
}

impl TransactWriteItemsResult {
    pub fn consumed_capacity(&self) -> Option<&Vec<ConsumedCapacity>> {
        self.consumed_capacity.as_ref()
    }
    pub fn item_collection_metrics(&self) -> Option<&HashMap<String, Vec<ItemCollectionMetrics>>> {
        self.item_collection_metrics.as_ref()
    }
}

impl Default for TransactWriteItemsRequest {
    fn default() -> Self {
        TransactWriteItemsRequest {
            transact_items: Vec::new(),
            return_consumed_capacity: None,
            return_item_collection_metrics: None,
            client_request_token: new_client_request_token(),
            options: RequestOptions::default(),
        }
    }
}

// 32 random hex digits.
fn new_client_request_token() -> String {
    let v: u128 = rand::thread_rng().gen();
    format!("{:032x}", v)
}

impl TransactWriteItemsRequest {
    pub fn new() -> TransactWriteItemsRequest {
        TransactWriteItemsRequest::default()
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

    pub fn add(mut self, item: TransactWriteItem) -> TransactWriteItemsRequest {
        self.transact_items.push(item);
        self
    }

    pub fn return_consumed_capacity(mut self, val: ReturnConsumedCapacity) -> TransactWriteItemsRequest {
        self.return_consumed_capacity = Some(val);
        self
    }

    pub fn return_item_collection_metrics(
        mut self,
        val: ReturnItemCollectionMetrics,
    ) -> TransactWriteItemsRequest {
        self.return_item_collection_metrics = Some(val);
        self
    }

    /// Replace the generated idempotency token. It must be 1 to 36 characters.
    pub fn client_request_token(mut self, token: &str) -> TransactWriteItemsRequest {
        self.client_request_token = token.to_string();
        self
    }

    /// Get the idempotency token that will be sent.
    pub fn get_client_request_token(&self) -> &str {
        &self.client_request_token
    }

    pub async fn execute(&self, h: &Handle) -> Result<TransactWriteItemsResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for TransactWriteItemsRequest {
    type Output = TransactWriteItemsResult;
    const OPERATION: &'static str = "TransactWriteItems";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_count("transaction items", self.transact_items.len(), MAX_TRANSACT_ITEMS)?;
        let tlen = self.client_request_token.len();
        if tlen == 0 || tlen > MAX_CLIENT_REQUEST_TOKEN_LEN {
            return ia_err!(
                "client request token must be 1 to {} characters",
                MAX_CLIENT_REQUEST_TOKEN_LEN
            );
        }
        for t in &self.transact_items {
            validate_table_name(t.table_name())?;
            if t.target().is_empty() {
                return ia_err!("transaction item on table '{}' has no key or item", t.table_name());
            }
            t.target().validate()?;
            let (names, values) = match t {
                TransactWriteItem::ConditionCheck(c) => {
                    if c.condition_expression.trim().is_empty() {
                        return ia_err!("condition check on table '{}' has no condition", c.table_name);
                    }
                    (&c.expression_attribute_names, &c.expression_attribute_values)
                }
                TransactWriteItem::Put(p) => (&p.expression_attribute_names, &p.expression_attribute_values),
                TransactWriteItem::Delete(d) => (&d.expression_attribute_names, &d.expression_attribute_values),
                TransactWriteItem::Update(u) => {
                    if u.update_expression.trim().is_empty() {
                        return ia_err!("update on table '{}' has no update expression", u.table_name);
                    }
                    (&u.expression_attribute_names, &u.expression_attribute_values)
                }
            };
            validate_names(names)?;
            validate_values(values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marshal_transact_get() {
        let req = TransactGetItemsRequest::new()
            .get("Music", Item::new().s("Artist", "A"))
            .add(TransactGetItem::new("Albums", Item::new().s("Id", "1")).projection_expression("Title"));
        req.validate().unwrap();
        let v: serde_json::Value = serde_json::from_slice(&req.marshal().unwrap()).unwrap();
        assert_eq!(v["TransactItems"][0]["Get"]["TableName"], "Music");
        assert_eq!(v["TransactItems"][1]["Get"]["ProjectionExpression"], "Title");

        let r = TransactGetItemsRequest::unmarshal(
            br#"{"Responses":[{"Item":{"Artist":{"S":"A"}}},{}]}"#,
        )
        .unwrap();
        assert_eq!(r.item(0).unwrap().get_s("Artist"), Some("A"));
        assert!(r.item(1).is_none());
        assert!(r.item(2).is_none());
    }

    #[test]
    fn client_request_token() {
        let a = TransactWriteItemsRequest::new();
        let b = TransactWriteItemsRequest::new();
        assert_eq!(a.get_client_request_token().len(), 32);
        assert_ne!(a.get_client_request_token(), b.get_client_request_token());
        let req = a
            .add(TransactWriteItem::put("Music", Item::new().s("Artist", "A")))
            .client_request_token("order-1234");
        req.validate().unwrap();
        let v: serde_json::Value = serde_json::from_slice(&req.marshal().unwrap()).unwrap();
        assert_eq!(v["ClientRequestToken"], "order-1234");
        assert_eq!(v["TransactItems"][0]["Put"]["Item"]["Artist"]["S"], "A");
        assert!(req.client_request_token(&"x".repeat(37)).validate().is_err());
    }

    #[test]
    fn validate_transact_write() {
        assert!(TransactWriteItemsRequest::new().validate().is_err());
        assert!(TransactWriteItemsRequest::new()
            .add(TransactWriteItem::update("Accounts", Item::new().s("Id", "a"), " "))
            .validate()
            .is_err());
        assert!(TransactWriteItemsRequest::new()
            .add(TransactWriteItem::delete("Accounts", Item::new()))
            .validate()
            .is_err());
        assert!(TransactWriteItemsRequest::new()
            .add(
                TransactWriteItem::condition_check("Accounts", Item::new().s("Id", "a"), "Bal > :z")
                    .expression_attribute_value("z", 0)
            )
            .validate()
            .is_err());
        let mut req = TransactWriteItemsRequest::new();
        for i in 0..101 {
            req = req.add(TransactWriteItem::delete("Accounts", Item::new().n("Id", i)));
        }
        assert!(req.validate().is_err());
    }
}
