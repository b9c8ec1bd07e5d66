//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! DynamoDB Rust SDK
//!
//! This is a Rust client for the [Amazon DynamoDB](https://aws.amazon.com/dynamodb/) JSON API
//! (version `2012-08-10`). It can be used with the DynamoDB service in any AWS region and with
//! [DynamoDB Local](https://docs.aws.amazon.com/amazondynamodb/latest/developerguide/DynamoDBLocal.html).
//!
//! This SDK supplies and uses Rust `async` methods throughout, using the [tokio](https://crates.io/crates/tokio) runtime.
//! A thin synchronous layer is available in the [`blocking`] module.
//!
//! The general flow for an application using DynamoDB is:
//! - Create a [`HandleBuilder`] with all needed parameters
//! - Create a [`Handle`] from the [`HandleBuilder`] that will be used throughout the application, across all threads
//! - Interact with DynamoDB using the [`Handle`] and Request structs such as [`GetItemRequest`], [`PutItemRequest`], [`QueryRequest`], etc.
//!
//! ## Simple Example
//! The following code creates a [`Handle`] from values in the current environment and then reads a single item from a table.
//! For a more complete example, see the [Quickstart](#quickstart) below.
//! ```no_run
//! use dynamodb_rust_sdk::{Handle, GetItemRequest};
//! use dynamodb_rust_sdk::types::Item;
//! use std::error::Error;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn Error>> {
//!     let handle = Handle::builder()
//! #       .endpoint("http://localhost:8000")?
//! #       .mode(dynamodb_rust_sdk::HandleMode::Local)?
//!         .from_environment()?
//!         .build().await?;
//!     let getres = GetItemRequest::new("Music")
//!         .key(Item::new().s("Artist", "No One You Know").s("SongTitle", "Call Me Today"))
//!         .execute(&handle)
//!         .await?;
//!     println!("GetItemResult={:?}", getres);
//!     Ok(())
//! }
//! ```
//!
//! ## Prerequisites
//! - Rust 1.78 or later
//! - An AWS account with access to DynamoDB, or a running instance of DynamoDB Local.
//!
//! ## Installation
//! Add the following dependency to your `Cargo.toml` file:
//! ```text
//! [dependencies]
//! dynamodb-rust-sdk = "0.1"
//! ```
//!
//! ## Configuring the SDK
//!
//! ### Region and endpoint
//!
//! The region is taken, in order, from [`HandleBuilder::region()`], the `AWS_REGION` or
//! `AWS_DEFAULT_REGION` environment variables, or the `region` of the selected profile in
//! `~/.aws/config`. If none is set, `us-east-1` is used. The endpoint is derived from the
//! region unless one is given with [`HandleBuilder::endpoint()`] or `AWS_ENDPOINT_URL_DYNAMODB`.
//!
//! ### Credentials
//!
//! Every request is signed with AWS Signature Version 4. Credentials are looked up, in order:
//! - Credentials set directly with [`HandleBuilder::credentials()`], or a custom
//!   [`CredentialsProvider`] set with [`HandleBuilder::credentials_provider()`]
//! - The `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and optional `AWS_SESSION_TOKEN` environment variables
//! - The shared credentials file `~/.aws/credentials` (and `~/.aws/config`), using the profile
//!   named by `AWS_PROFILE`, or `default`
//!
//! The format of the shared credentials file is:
//! ```ini
//! [default]
//! aws_access_key_id = <your-access-key-id>
//! aws_secret_access_key = <your-secret-access-key>
//! ```
//!
//! Individual requests can be sent with other credentials using their `credentials()` method.
//!
//! ### Connecting to DynamoDB Local
//!
//! Use [`HandleMode::Local`]. The endpoint defaults to `http://localhost:8000`, and DynamoDB Local
//! accepts any credentials, so none need to be configured:
//! ```no_run
//! # use dynamodb_rust_sdk::{Handle, HandleMode};
//! # #[tokio::main]
//! # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let handle = Handle::builder()
//!     .mode(HandleMode::Local)?
//!     .build()
//!     .await?;
//! # Ok(())
//! # }
//! ```
//! The same can be done with the environment variable `AWS_DYNAMODB_MODE=local` and
//! [`HandleBuilder::from_environment()`].
//!
//! ### Timeouts and retries
//!
//! Every request uses the handle timeout (see [`HandleBuilder::timeout()`]) unless it sets its own.
//! Throttling errors, 5xx responses and connection failures are retried with exponential backoff
//! and jitter, according to the [`RetryPolicy`] of the handle.
//!
//! ## Quickstart
//!
//! The following is a complete example that creates a table, writes and reads an item, queries
//! the table, and then drops the table.
//! ```no_run
//! use dynamodb_rust_sdk::types::*;
//! use dynamodb_rust_sdk::*;
//! use std::error::Error;
//! use std::time::Duration;
//!
//! #[derive(Default, Debug, DynamoItem)]
//! struct Song {
//!     #[dynamo(attribute = "Artist")]
//!     artist: String,
//!     #[dynamo(attribute = "SongTitle")]
//!     title: String,
//!     #[dynamo(attribute = "Year")]
//!     year: i32,
//!     #[dynamo(attribute = "Awards")]
//!     awards: Option<i64>,
//! }
//!
//! #[tokio::main]
//! pub async fn main() -> Result<(), Box<dyn Error>> {
//!     let handle = Handle::builder().from_environment()?.build().await?;
//!
//!     // Create a table and wait for it to be ready
//!     let mut res = CreateTableRequest::new("Music")
//!         .attribute("Artist", ScalarAttributeType::S)
//!         .attribute("SongTitle", ScalarAttributeType::S)
//!         .hash_key("Artist")
//!         .range_key("SongTitle")
//!         .billing_mode(BillingMode::PayPerRequest)
//!         .execute(&handle)
//!         .await?;
//!     res.wait_for_active(&handle, Duration::from_secs(60), Duration::from_secs(1))
//!         .await?;
//!
//!     // Put an item from a native struct
//!     let song = Song {
//!         artist: "No One You Know".to_string(),
//!         title: "Call Me Today".to_string(),
//!         year: 2015,
//!         awards: None,
//!     };
//!     PutItemRequest::new("Music")
//!         .put_item(&song)?
//!         .execute(&handle)
//!         .await?;
//!
//!     // Get it back
//!     let mut got = Song::default();
//!     GetItemRequest::new("Music")
//!         .key(Item::new().s("Artist", "No One You Know").s("SongTitle", "Call Me Today"))
//!         .execute_into(&handle, &mut got)
//!         .await?;
//!     println!("got {:?}", got);
//!
//!     // Query every song of the artist, across all pages
//!     let qres = QueryRequest::new("Music")
//!         .key_condition_expression("Artist = :a")
//!         .expression_attribute_value(":a", "No One You Know")
//!         .execute_all(&handle)
//!         .await?;
//!     let songs: Vec<Song> = qres.items_as()?;
//!     println!("{} songs", songs.len());
//!
//!     // Drop the table
//!     let mut dres = DeleteTableRequest::new("Music").execute(&handle).await?;
//!     dres.wait_for_deletion(&handle, Duration::from_secs(60), Duration::from_secs(1))
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! The SDK logs through the [tracing](https://crates.io/crates/tracing) crate. Request and
//! response bodies are logged at `trace` level; retries and table state changes at `debug`.
//!
//! ## License
//!
//! Copyright (C) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//!
//! This SDK is licensed under the Universal Permissive License 1.0. See
//! [LICENSE](https://oss.oracle.com/licenses/upl/) for details.
//!

// Lets the derive macro's `::dynamodb_rust_sdk` paths resolve inside this crate.
extern crate self as dynamodb_rust_sdk;

pub(crate) mod handle_builder;
pub use crate::handle_builder::{HandleBuilder, HandleMode, DEFAULT_LOCAL_ENDPOINT};

pub(crate) mod handle;
pub use crate::handle::Handle;

pub(crate) mod async_handler;
pub use crate::async_handler::AsyncHandler;

pub mod auth_common;
pub use crate::auth_common::credentials_provider::{Credentials, CredentialsProvider};

pub(crate) mod auto_scaling_request;
pub use crate::auto_scaling_request::{
    DescribeTableReplicaAutoScalingRequest, DescribeTableReplicaAutoScalingResult,
    UpdateTableReplicaAutoScalingRequest, UpdateTableReplicaAutoScalingResult,
};

pub(crate) mod backup_request;
pub use crate::backup_request::{
    ContinuousBackupsResult, CreateBackupRequest, CreateBackupResult, DeleteBackupRequest,
    DeleteBackupResult, DescribeBackupRequest, DescribeBackupResult,
    DescribeContinuousBackupsRequest, ListBackupsRequest, ListBackupsResult,
    RestoreTableFromBackupRequest, RestoreTableResult, RestoreTableToPointInTimeRequest,
    UpdateContinuousBackupsRequest,
};

pub(crate) mod batch_get_item_request;
pub use crate::batch_get_item_request::{BatchGetItemRequest, BatchGetItemResult};

pub(crate) mod batch_write_item_request;
pub use crate::batch_write_item_request::{BatchWriteItemRequest, BatchWriteItemResult};

pub mod blocking;

pub(crate) mod contributor_insights_request;
pub use crate::contributor_insights_request::{
    DescribeContributorInsightsRequest, DescribeContributorInsightsResult,
    ListContributorInsightsRequest, ListContributorInsightsResult,
    UpdateContributorInsightsRequest, UpdateContributorInsightsResult,
};

pub(crate) mod delete_item_request;
pub use crate::delete_item_request::{DeleteItemRequest, DeleteItemResult};

pub(crate) mod error;
pub use crate::error::{DynamoError, ErrorCode, ErrorType};

pub(crate) mod get_item_request;
pub use crate::get_item_request::{GetItemRequest, GetItemResult};

pub(crate) mod global_table_request;
pub use crate::global_table_request::{
    CreateGlobalTableRequest, DescribeGlobalTableRequest, DescribeGlobalTableSettingsRequest,
    GlobalTableResult, GlobalTableSettingsResult, ListGlobalTablesRequest,
    ListGlobalTablesResult, UpdateGlobalTableRequest, UpdateGlobalTableSettingsRequest,
};

pub(crate) mod list_tables_request;
pub use crate::list_tables_request::{ListTablesRequest, ListTablesResult};

pub(crate) mod marshal;
pub use crate::marshal::{DynamoRequest, RequestOptions};

pub(crate) mod metrics;
pub use crate::metrics::{MetricEvent, RequestMetrics};

pub(crate) mod put_item_request;
pub use crate::put_item_request::{PutItemRequest, PutItemResult};

pub(crate) mod query_request;
pub use crate::query_request::{QueryRequest, QueryResult};

pub(crate) mod region;
pub use crate::region::{Region, DEFAULT_REGION};

pub(crate) mod retry;
pub use crate::retry::RetryPolicy;

pub(crate) mod scan_request;
pub use crate::scan_request::{ScanRequest, ScanResult};

pub(crate) mod system_request;
pub use crate::system_request::{
    DescribeEndpointsRequest, DescribeEndpointsResult, DescribeLimitsRequest,
    DescribeLimitsResult,
};

pub(crate) mod table_request;
pub use crate::table_request::{
    CreateTableRequest, CreateTableResult, DeleteTableRequest, DeleteTableResult,
    DescribeTableRequest, DescribeTableResult, UpdateTableRequest, UpdateTableResult,
};

pub(crate) mod tag_request;
pub use crate::tag_request::{
    ListTagsOfResourceRequest, ListTagsOfResourceResult, TagResourceRequest, TagResourceResult,
    UntagResourceRequest, UntagResourceResult,
};

pub(crate) mod time_to_live_request;
pub use crate::time_to_live_request::{
    DescribeTimeToLiveRequest, DescribeTimeToLiveResult, UpdateTimeToLiveRequest,
    UpdateTimeToLiveResult,
};

pub(crate) mod transact_request;
pub use crate::transact_request::{
    TransactGetItemsRequest, TransactGetItemsResult, TransactWriteItemsRequest,
    TransactWriteItemsResult,
};

pub mod types;
pub use crate::types::DynamoItem;

pub(crate) mod update_item_request;
pub use crate::update_item_request::{UpdateItemRequest, UpdateItemResult};
