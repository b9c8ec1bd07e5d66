//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Conversion of requests to and from the DynamoDB JSON wire format.
use crate::auth_common::credentials_provider::Credentials;
use crate::error::{ia_err, DynamoError, ErrorCode};
use crate::types::{AttributeValue, Item};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// Prefix of the `X-Amz-Target` header for every operation.
pub const TARGET_PREFIX: &str = "DynamoDB_20120810";
/// Content type of every request and response body.
pub const CONTENT_TYPE: &str = "application/x-amz-json-1.0";
/// The service name used in request signatures.
pub const SERVICE_NAME: &str = "dynamodb";

pub(crate) const MAX_BATCH_GET_KEYS: usize = 100;
pub(crate) const MAX_BATCH_WRITE_REQUESTS: usize = 25;
pub(crate) const MAX_TRANSACT_ITEMS: usize = 100;
pub(crate) const MAX_TABLE_NAME_LEN: usize = 255;
pub(crate) const MIN_TABLE_NAME_LEN: usize = 3;
pub(crate) const MAX_ARN_LEN: usize = 1024;

/// Settings that apply to one request, and are never sent to the service.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub(crate) timeout: Option<Duration>,
    pub(crate) credentials: Option<Credentials>,
}

/// Implemented by every request type.
///
/// Users normally call `execute()` on the request itself, which calls
/// [`Handle::execute()`](crate::Handle::execute) with it.
pub trait DynamoRequest: Serialize + Send + Sync {
    /// The result type returned by a successful call.
    type Output: DeserializeOwned + Send + 'static;

    /// The API operation name, as used in the `X-Amz-Target` header.
    const OPERATION: &'static str;

    /// Per-request overrides of the handle's timeout and credentials.
    fn options(&self) -> &RequestOptions;

    /// Client-side argument checks, run before the request is marshalled.
    fn validate(&self) -> Result<(), DynamoError> {
        Ok(())
    }

    /// The JSON request body.
    fn marshal(&self) -> Result<Bytes, DynamoError> {
        match serde_json::to_vec(self) {
            Ok(v) => Ok(Bytes::from(v)),
            Err(e) => ia_err!("error marshalling {} request: {}", Self::OPERATION, e),
        }
    }

    /// Parse a successful response body. An empty body is read as `{}`.
    fn unmarshal(body: &[u8]) -> Result<Self::Output, DynamoError> {
        let body: &[u8] = if body.iter().all(|b| b.is_ascii_whitespace()) {
            b"{}"
        } else {
            body
        };
        serde_json::from_slice(body).map_err(|e| {
            DynamoError::new(
                ErrorCode::BadResponse,
                &format!(
                    "error unmarshalling {} response: {} ({})",
                    Self::OPERATION,
                    e,
                    crate::error::sdk_version()
                ),
            )
        })
    }

    /// The full `X-Amz-Target` header value.
    fn target() -> String {
        format!("{}.{}", TARGET_PREFIX, Self::OPERATION)
    }
}

/// Check a table or index name, or a table ARN.
pub(crate) fn validate_table_name(name: &str) -> Result<(), DynamoError> {
    if name.starts_with("arn:") {
        if name.len() > MAX_ARN_LEN {
            return ia_err!("table ARN is longer than {} characters", MAX_ARN_LEN);
        }
        return Ok(());
    }
    validate_name("table", name)
}

pub(crate) fn validate_index_name(name: &str) -> Result<(), DynamoError> {
    validate_name("index", name)
}

fn validate_name(what: &str, name: &str) -> Result<(), DynamoError> {
    if name.len() < MIN_TABLE_NAME_LEN || name.len() > MAX_TABLE_NAME_LEN {
        return ia_err!(
            "{} name '{}' must be between {} and {} characters",
            what,
            name,
            MIN_TABLE_NAME_LEN,
            MAX_TABLE_NAME_LEN
        );
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || *c == '.'))
    {
        return ia_err!("{} name '{}' contains invalid character '{}'", what, name, c);
    }
    Ok(())
}

/// A primary key must have at least one attribute, and valid values.
pub(crate) fn validate_key(key: &Item) -> Result<(), DynamoError> {
    if key.is_empty() {
        return ia_err!("key must not be empty");
    }
    if key.len() > 2 {
        return ia_err!("key has {} attributes, at most 2 are allowed", key.len());
    }
    key.validate()
}

pub(crate) fn validate_not_empty(field: &str, value: &str) -> Result<(), DynamoError> {
    if value.is_empty() {
        return ia_err!("{} must not be empty", field);
    }
    Ok(())
}

/// Placeholders in `ExpressionAttributeNames` start with `#`.
pub(crate) fn validate_names(names: &Option<HashMap<String, String>>) -> Result<(), DynamoError> {
    if let Some(m) = names {
        for (k, v) in m {
            if !k.starts_with('#') || k.len() < 2 {
                return ia_err!("attribute name placeholder '{}' must start with '#'", k);
            }
            validate_not_empty(&format!("attribute name for '{}'", k), v)?;
        }
    }
    Ok(())
}

/// Placeholders in `ExpressionAttributeValues` start with `:`, and every value must be valid.
pub(crate) fn validate_values(
    values: &Option<HashMap<String, AttributeValue>>,
) -> Result<(), DynamoError> {
    if let Some(m) = values {
        for (k, v) in m {
            if !k.starts_with(':') || k.len() < 2 {
                return ia_err!("attribute value placeholder '{}' must start with ':'", k);
            }
            if let Err(e) = v.validate() {
                return ia_err!("invalid value for '{}': {}", k, e.message);
            }
        }
    }
    Ok(())
}

/// Check a list length is between 1 and `max`.
pub(crate) fn validate_count(what: &str, count: usize, max: usize) -> Result<(), DynamoError> {
    if count == 0 {
        return ia_err!("{} must not be empty", what);
    }
    if count > max {
        return ia_err!("too many {}: {} given, the limit is {}", what, count, max);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names() {
        assert!(validate_table_name("Music").is_ok());
        assert!(validate_table_name("my_table.v-2").is_ok());
        assert!(validate_table_name("ab").is_err());
        assert!(validate_table_name(&"x".repeat(256)).is_err());
        assert!(validate_table_name(&"x".repeat(255)).is_ok());
        let e = validate_table_name("bad name").unwrap_err();
        assert!(e.message.contains("invalid character ' '"));
        assert!(validate_table_name("arn:aws:dynamodb:us-east-1:123456789012:table/Music").is_ok());
        assert!(validate_index_name("by-artist").is_ok());
        assert!(validate_index_name("ix").is_err());
    }

    #[test]
    fn keys_and_counts() {
        assert!(validate_key(&Item::new()).is_err());
        assert!(validate_key(&Item::new().s("pk", "a").n("sk", 1)).is_ok());
        assert!(validate_key(&Item::new().s("a", "a").s("b", "b").s("c", "c")).is_err());
        assert!(validate_key(&Item::new().n("pk", "not a number")).is_err());
        assert!(validate_count("keys", 0, 100).is_err());
        assert!(validate_count("keys", 100, 100).is_ok());
        let e = validate_count("write requests", 26, 25).unwrap_err();
        assert_eq!(e.code, ErrorCode::IllegalArgument);
        assert!(e.message.contains("26"));
        assert!(validate_not_empty("UpdateExpression", "").is_err());
    }

    #[test]
    fn expression_placeholders() {
        let mut names = HashMap::new();
        names.insert("#y".to_string(), "Year".to_string());
        assert!(validate_names(&Some(names.clone())).is_ok());
        names.insert("y".to_string(), "Year".to_string());
        assert!(validate_names(&Some(names)).is_err());
        assert!(validate_names(&None).is_ok());

        let mut values = HashMap::new();
        values.insert(":v".to_string(), AttributeValue::number(5));
        assert!(validate_values(&Some(values.clone())).is_ok());
        values.insert(":bad".to_string(), AttributeValue::N("five".to_string()));
        let e = validate_values(&Some(values)).unwrap_err();
        assert!(e.message.contains("':bad'"));
    }
}
