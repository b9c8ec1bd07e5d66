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
    validate_count, validate_table_name, DynamoRequest, RequestOptions, MAX_BATCH_WRITE_REQUESTS,
};
use crate::types::{
    ConsumedCapacity, Item, ItemCollectionMetrics, ReturnConsumedCapacity,
    ReturnItemCollectionMetrics, WriteRequest,
};
use serde_derive::{Deserialize, Serialize};
use std::collections::HashMap;
use std::result::Result;
use std::time::Duration;

/// Struct used for putting or deleting up to 25 items, in one or more tables, in a single call.
///
/// The writes are not atomic: each put or delete succeeds or fails on its own.
/// Conditional writes are not supported; use [`TransactWriteItemsRequest`](crate::TransactWriteItemsRequest) for those.
/// ```no_run
/// # use dynamodb_rust_sdk::{Handle, BatchWriteItemRequest};
/// # use dynamodb_rust_sdk::types::Item;
/// # #[tokio::main]
/// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let handle = Handle::builder().build().await?;
/// let mut req = BatchWriteItemRequest::new()
///     .put("Music", Item::new().s("Artist", "Acme Band").s("SongTitle", "Happy Day"))
///     .delete("Music", Item::new().s("Artist", "Acme Band").s("SongTitle", "Sad Day"));
/// loop {
///     let res = req.execute(&handle).await?;
///     match res.unprocessed_request(&req) {
///         Some(next) => req = next,
///         None => break,
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchWriteItemRequest {
    pub(crate) request_items: HashMap<String, Vec<WriteRequest>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) return_consumed_capacity: Option<ReturnConsumedCapacity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

/// Struct representing the result of a [`BatchWriteItemRequest`] operation.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchWriteItemResult {
    #[serde(default)]
    pub(crate) unprocessed_items: HashMap<String, Vec<WriteRequest>>,
    pub(crate) item_collection_metrics: Option<HashMap<String, Vec<ItemCollectionMetrics>>>,
    pub(crate) consumed_capacity: Option<Vec<ConsumedCapacity>>,
}

impl BatchWriteItemResult {
    /// The writes the service did not process, keyed by table name.
    pub fn unprocessed_items(&self) -> &HashMap<String, Vec<WriteRequest>> {
        &self.unprocessed_items
    }
    pub fn item_collection_metrics(&self) -> Option<&HashMap<String, Vec<ItemCollectionMetrics>>> {
        self.item_collection_metrics.as_ref()
    }
    pub fn consumed_capacity(&self) -> Option<&Vec<ConsumedCapacity>> {
        self.consumed_capacity.as_ref()
    }
    /// A request for the writes that were not processed, or `None` if all were.
    ///
    /// `original` is the request that produced this result. Its timeout, credentials
    /// and return settings are carried over to the new request.
    pub fn unprocessed_request(
        &self,
        original: &BatchWriteItemRequest,
    ) -> Option<BatchWriteItemRequest> {
        if self.unprocessed_items.values().all(|w| w.is_empty()) {
            return None;
        }
        Some(BatchWriteItemRequest {
            request_items: self.unprocessed_items.clone(),
            return_consumed_capacity: original.return_consumed_capacity,
            return_item_collection_metrics: original.return_item_collection_metrics,
            options: original.options.clone(),
        })
    }
}

impl BatchWriteItemRequest {
    pub fn new() -> BatchWriteItemRequest {
        BatchWriteItemRequest::default()
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

    /// Add a write to a table.
    pub fn write(mut self, table_name: &str, w: WriteRequest) -> BatchWriteItemRequest {
        self.request_items
            .entry(table_name.to_string())
            .or_default()
            .push(w);
        self
    }

    pub fn put(self, table_name: &str, item: Item) -> BatchWriteItemRequest {
        self.write(table_name, WriteRequest::put(item))
    }

    pub fn delete(self, table_name: &str, key: Item) -> BatchWriteItemRequest {
        self.write(table_name, WriteRequest::delete(key))
    }

    pub fn return_consumed_capacity(mut self, val: ReturnConsumedCapacity) -> BatchWriteItemRequest {
        self.return_consumed_capacity = Some(val);
        self
    }

    pub fn return_item_collection_metrics(
        mut self,
        val: ReturnItemCollectionMetrics,
    ) -> BatchWriteItemRequest {
        self.return_item_collection_metrics = Some(val);
        self
    }

    /// The total number of writes in the request, across all tables.
    pub fn write_count(&self) -> usize {
        self.request_items.values().map(|w| w.len()).sum()
    }

    pub async fn execute(&self, h: &Handle) -> Result<BatchWriteItemResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for BatchWriteItemRequest {
    type Output = BatchWriteItemResult;
    const OPERATION: &'static str = "BatchWriteItem";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_count("write requests", self.write_count(), MAX_BATCH_WRITE_REQUESTS)?;
        for (table, writes) in &self.request_items {
            validate_table_name(table)?;
            if writes.is_empty() {
                return ia_err!("no write requests given for table '{}'", table);
            }
            for w in writes {
                w.validate()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marshal_batch_write() {
        let req = BatchWriteItemRequest::new()
            .put("Music", Item::new().s("Artist", "A"))
            .delete("Music", Item::new().s("Artist", "B"))
            .return_item_collection_metrics(ReturnItemCollectionMetrics::Size);
        req.validate().unwrap();
        let v: serde_json::Value = serde_json::from_slice(&req.marshal().unwrap()).unwrap();
        assert_eq!(
            v["RequestItems"]["Music"],
            serde_json::json!([
                {"PutRequest": {"Item": {"Artist": {"S": "A"}}}},
                {"DeleteRequest": {"Key": {"Artist": {"S": "B"}}}}
            ])
        );
        assert_eq!(v["ReturnItemCollectionMetrics"], "SIZE");
    }

    #[test]
    fn batch_write_limits() {
        assert!(BatchWriteItemRequest::new().validate().is_err());
        let mut req = BatchWriteItemRequest::new();
        for i in 0..25 {
            req = req.put("Music", Item::new().n("Id", i));
        }
        assert!(req.validate().is_ok());
        let req = req.put("Other", Item::new().n("Id", 99));
        assert_eq!(req.write_count(), 26);
        assert!(req.validate().is_err());
        assert!(BatchWriteItemRequest::new()
            .put("Music", Item::new())
            .validate()
            .is_err());
    }

    #[test]
    fn unprocessed_items_follow_up() {
        let r = BatchWriteItemRequest::unmarshal(
            br#"{"UnprocessedItems":{"Music":[{"PutRequest":{"Item":{"Artist":{"S":"A"}}}}]}}"#,
        )
        .unwrap();
        let original = BatchWriteItemRequest::new()
            .put("Music", Item::new().s("Artist", "A"))
            .put("Music", Item::new().s("Artist", "B"))
            .return_consumed_capacity(ReturnConsumedCapacity::Total)
            .return_item_collection_metrics(ReturnItemCollectionMetrics::Size)
            .timeout(&Duration::from_millis(1500))
            .credentials(Credentials::new("AKIDBATCH", "secret"));
        let next = r.unprocessed_request(&original).unwrap();
        assert_eq!(next.write_count(), 1);
        assert_eq!(next.options.timeout, Some(Duration::from_millis(1500)));
        assert_eq!(
            next.options.credentials.as_ref().map(|c| c.access_key_id()),
            Some("AKIDBATCH")
        );
        let v: serde_json::Value = serde_json::from_slice(&next.marshal().unwrap()).unwrap();
        assert_eq!(v["ReturnConsumedCapacity"], "TOTAL");
        assert_eq!(v["ReturnItemCollectionMetrics"], "SIZE");
        assert_eq!(v["RequestItems"]["Music"][0]["PutRequest"]["Item"]["Artist"]["S"], "A");

        assert!(BatchWriteItemRequest::unmarshal(b"{}")
            .unwrap()
            .unprocessed_request(&original)
            .is_none());
    }
}
