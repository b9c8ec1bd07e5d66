//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::auth_common::credentials_provider::Credentials;
use crate::error::{ia_err, DynamoError};
use crate::handle::Handle;
use crate::marshal::{validate_table_name, DynamoRequest, RequestOptions};
use serde_derive::{Deserialize, Serialize};
use std::result::Result;
use std::time::Duration;

const MAX_LIST_TABLES_LIMIT: u32 = 100;

/// Struct used for listing the tables of the account in the handle's region.
///
/// Each call returns at most 100 names. [`ListTablesRequest::execute_all()`]
/// follows `LastEvaluatedTableName` until every name has been read.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTablesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) exclusive_start_table_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) limit: Option<u32>,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

/// Struct representing the result of a [`ListTablesRequest`] operation.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTablesResult {
    #[serde(default)]
    pub(crate) table_names: Vec<String>,
    pub(crate) last_evaluated_table_name: Option<String>,
}

impl ListTablesRequest {
    pub fn new() -> ListTablesRequest {
        ListTablesRequest::default()
    }

    /// Specify the timeout value for each call.
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

    /// Start listing after this table name.
    pub fn exclusive_start_table_name(mut self, name: &str) -> ListTablesRequest {
        self.exclusive_start_table_name = Some(name.to_string());
        self
    }

    /// The maximum number of names to return per call, from 1 to 100.
    pub fn limit(mut self, limit: u32) -> ListTablesRequest {
        self.limit = Some(limit);
        self
    }

    pub async fn execute(&self, h: &Handle) -> Result<ListTablesResult, DynamoError> {
        h.execute(self).await
    }

    /// List every table, following the start table name across calls.
    pub async fn execute_all(&self, h: &Handle) -> Result<ListTablesResult, DynamoError> {
        let mut req = self.clone();
        let mut res = ListTablesResult::default();
        loop {
            let mut page = req.execute(h).await?;
            res.table_names.append(&mut page.table_names);
            match page.last_evaluated_table_name {
                Some(n) => req.exclusive_start_table_name = Some(n),
                None => return Ok(res),
            }
        }
    }
}

impl ListTablesResult {
    /// The table names, in ascending order.
    pub fn table_names(&self) -> &Vec<String> {
        &self.table_names
    }
    /// The name to start the next call from. `None` if there are no more tables.
    pub fn last_evaluated_table_name(&self) -> Option<&str> {
        self.last_evaluated_table_name.as_deref()
    }
}

impl DynamoRequest for ListTablesRequest {
    type Output = ListTablesResult;
    const OPERATION: &'static str = "ListTables";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        if let Some(l) = self.limit {
            if l == 0 || l > MAX_LIST_TABLES_LIMIT {
                return ia_err!("limit must be between 1 and {}", MAX_LIST_TABLES_LIMIT);
            }
        }
        if let Some(n) = &self.exclusive_start_table_name {
            validate_table_name(n)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marshal_list_tables() {
        let req = ListTablesRequest::new();
        assert_eq!(&req.marshal().unwrap()[..], b"{}");
        let req = req.limit(10).exclusive_start_table_name("Music");
        req.validate().unwrap();
        let v: serde_json::Value = serde_json::from_slice(&req.marshal().unwrap()).unwrap();
        assert_eq!(v, serde_json::json!({"ExclusiveStartTableName": "Music", "Limit": 10}));
        assert!(ListTablesRequest::new().limit(101).validate().is_err());
        assert!(ListTablesRequest::new().limit(0).validate().is_err());
    }

    #[test]
    fn unmarshal_list_tables() {
        let r = ListTablesRequest::unmarshal(
            br#"{"TableNames":["Forum","Music"],"LastEvaluatedTableName":"Music"}"#,
        )
        .unwrap();
        assert_eq!(r.table_names(), &vec!["Forum".to_string(), "Music".to_string()]);
        assert_eq!(r.last_evaluated_table_name(), Some("Music"));
        let r = ListTablesRequest::unmarshal(b"{}").unwrap();
        assert!(r.table_names().is_empty());
        assert!(r.last_evaluated_table_name().is_none());
    }
}
