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
    validate_count, validate_key, validate_names, validate_table_name, DynamoRequest,
    RequestOptions, MAX_BATCH_GET_KEYS,
};
use crate::types::{ConsumedCapacity, Item, KeysAndAttributes, ReturnConsumedCapacity};
use serde_derive::{Deserialize, Serialize};
use std::collections::HashMap;
use std::result::Result;
use std::time::Duration;

/// Struct used for reading up to 100 items, from one or more tables, in a single call.
///
/// The service may return only part of the requested items. The keys it did
/// not process are available from [`BatchGetItemResult::unprocessed_keys()`],
/// and [`BatchGetItemResult::unprocessed_request()`] builds a follow-up request for them.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchGetItemRequest {
    pub(crate) request_items: HashMap<String, KeysAndAttributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) return_consumed_capacity: Option<ReturnConsumedCapacity>,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

/// Struct representing the result of a [`BatchGetItemRequest`] operation.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchGetItemResult {
    #[serde(default)]
    pub(crate) responses: HashMap<String, Vec<Item>>,
    #[serde(default)]
    pub(crate) unprocessed_keys: HashMap<String, KeysAndAttributes>,
    pub(crate) consumed_capacity: Option<Vec<ConsumedCapacity>>,
}

impl BatchGetItemResult {
    /// The items read, keyed by table name. Items are returned in no particular order.
    pub fn responses(&self) -> &HashMap<String, Vec<Item>> {
        &self.responses
    }
    /// The items read from one table.
    pub fn items(&self, table_name: &str) -> Option<&Vec<Item>> {
        self.responses.get(table_name)
    }
    pub fn unprocessed_keys(&self) -> &HashMap<String, KeysAndAttributes> {
        &self.unprocessed_keys
    }
    pub fn consumed_capacity(&self) -> Option<&Vec<ConsumedCapacity>> {
        self.consumed_capacity.as_ref()
    }
    /// A request for the keys that were not processed, or `None` if every key was.
    ///
    /// `original` is the request that produced this result. Its timeout, credentials
    /// and consumed capacity setting are carried over to the new request.
    pub fn unprocessed_request(
        &self,
        original: &BatchGetItemRequest,
    ) -> Option<BatchGetItemRequest> {
        if self.unprocessed_keys.values().all(|k| k.keys.is_empty()) {
            return None;
        }
        Some(BatchGetItemRequest {
            request_items: self.unprocessed_keys.clone(),
            return_consumed_capacity: original.return_consumed_capacity,
            options: original.options.clone(),
        })
    }
}

impl BatchGetItemRequest {
    pub fn new() -> BatchGetItemRequest {
        BatchGetItemRequest::default()
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

    /// Set the keys and projection to read from a table, replacing any previously set.
    pub fn table(mut self, table_name: &str, keys: KeysAndAttributes) -> BatchGetItemRequest {
        self.request_items.insert(table_name.to_string(), keys);
        self
    }

    /// Add one key to read from a table.
    pub fn key(mut self, table_name: &str, key: Item) -> BatchGetItemRequest {
        self.request_items
            .entry(table_name.to_string())
            .or_default()
            .keys
            .push(key);
        self
    }

    pub fn return_consumed_capacity(mut self, val: ReturnConsumedCapacity) -> BatchGetItemRequest {
        self.return_consumed_capacity = Some(val);
        self
    }

    /// The total number of keys in the request, across all tables.
    pub fn key_count(&self) -> usize {
        self.request_items.values().map(|k| k.keys.len()).sum()
    }

    pub async fn execute(&self, h: &Handle) -> Result<BatchGetItemResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for BatchGetItemRequest {
    type Output = BatchGetItemResult;
    const OPERATION: &'static str = "BatchGetItem";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_count("keys", self.key_count(), MAX_BATCH_GET_KEYS)?;
        for (table, ka) in &self.request_items {
            validate_table_name(table)?;
            if ka.keys.is_empty() {
                return ia_err!("no keys given for table '{}'", table);
            }
            if ka.projection_expression.is_some() && ka.attributes_to_get.is_some() {
                return ia_err!(
                    "projection expression and attributes to get cannot both be set for table '{}'",
                    table
                );
            }
            for k in &ka.keys {
                validate_key(k)?;
            }
            validate_names(&ka.expression_attribute_names)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marshal_batch_get() {
        let req = BatchGetItemRequest::new()
            .key("Music", Item::new().s("Artist", "A").s("SongTitle", "x"))
            .key("Music", Item::new().s("Artist", "B").s("SongTitle", "y"))
            .table(
                "Albums",
                KeysAndAttributes::new(vec![Item::new().s("Id", "1")]).consistent_read(true),
            );
        assert_eq!(req.key_count(), 3);
        req.validate().unwrap();
        let v: serde_json::Value = serde_json::from_slice(&req.marshal().unwrap()).unwrap();
        assert_eq!(v["RequestItems"]["Music"]["Keys"].as_array().unwrap().len(), 2);
        assert_eq!(v["RequestItems"]["Albums"]["ConsistentRead"], true);
        assert!(v.get("ReturnConsumedCapacity").is_none());
    }

    #[test]
    fn batch_get_limits() {
        assert!(BatchGetItemRequest::new().validate().is_err());
        let mut req = BatchGetItemRequest::new();
        for i in 0..101 {
            req = req.key("Music", Item::new().n("Id", i));
        }
        let e = req.validate().unwrap_err();
        assert!(e.message.contains("101"));
        assert!(BatchGetItemRequest::new()
            .table("Music", KeysAndAttributes::default())
            .validate()
            .is_err());
    }

    #[test]
    fn unprocessed_keys_follow_up() {
        let r = BatchGetItemRequest::unmarshal(
            br#"{"Responses":{"Music":[{"Artist":{"S":"A"}}]},
                "UnprocessedKeys":{"Music":{"Keys":[{"Artist":{"S":"B"}}]}}}"#,
        )
        .unwrap();
        assert_eq!(r.items("Music").unwrap()[0].get_s("Artist"), Some("A"));
        let original = BatchGetItemRequest::new()
            .key("Music", Item::new().s("Artist", "A"))
            .key("Music", Item::new().s("Artist", "B"))
            .return_consumed_capacity(ReturnConsumedCapacity::Indexes)
            .timeout(&Duration::from_secs(2))
            .credentials(Credentials::new("AKIDGET", "secret"));
        let next = r.unprocessed_request(&original).unwrap();
        assert_eq!(next.key_count(), 1);
        assert_eq!(next.return_consumed_capacity, Some(ReturnConsumedCapacity::Indexes));
        assert_eq!(next.options.timeout, Some(Duration::from_secs(2)));
        assert_eq!(
            next.options.credentials.as_ref().map(|c| c.access_key_id()),
            Some("AKIDGET")
        );

        let r = BatchGetItemRequest::unmarshal(br#"{"Responses":{},"UnprocessedKeys":{}}"#).unwrap();
        assert!(r.unprocessed_request(&original).is_none());
    }
}
