//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//

// This is an example program showing the basic item operations. It creates
// a table, puts, updates, gets, queries and deletes a few items, then deletes
// the table.

// To run this example against DynamoDB Local (http://localhost:8000):
//    cargo run --example quickstart
//
// To run against the cloud service instead:
//    AWS_DYNAMODB_MODE=cloud AWS_REGION=eu-west-1 cargo run --example quickstart
// with credentials in the environment or in ~/.aws/credentials.
//
// for extra output:
//    RUST_LOG=debug cargo run --example quickstart
//
// or, for a LOT of tracing output:
//    RUST_LOG=trace cargo run --example quickstart

use dynamodb_rust_sdk::types::*;
use dynamodb_rust_sdk::CreateTableRequest;
use dynamodb_rust_sdk::DeleteItemRequest;
use dynamodb_rust_sdk::DeleteTableRequest;
use dynamodb_rust_sdk::DynamoError;
use dynamodb_rust_sdk::ErrorCode;
use dynamodb_rust_sdk::GetItemRequest;
use dynamodb_rust_sdk::Handle;
use dynamodb_rust_sdk::HandleMode;
use dynamodb_rust_sdk::PutItemRequest;
use dynamodb_rust_sdk::QueryRequest;
use dynamodb_rust_sdk::UpdateItemRequest;
use std::error::Error;
use std::time::Duration;
use tracing::info;

const TABLE: &str = "QuickstartMusic";

#[derive(Default, Debug, DynamoItem)]
struct Song {
    #[dynamo(attribute = "Artist")]
    artist: String,
    #[dynamo(attribute = "SongTitle")]
    title: String,
    #[dynamo(attribute = "AlbumTitle")]
    album: String,
    year: i32,
    plays: Option<i64>,
}

// This method shows various ways to configure a Handle.
async fn get_handle() -> Result<Handle, DynamoError> {
    // Note: later methods called on this builder will override earlier methods.
    // This allows for setting desired defaults that can be overridden by, for example,
    // .from_environment().
    Handle::builder()
        // For DynamoDB Local: Local mode uses http://localhost:8000 and dummy credentials
        .mode(HandleMode::Local)?
        //
        // For the cloud service: a region, and credentials from the default chain
        // .mode(HandleMode::Cloud)?
        // .region("eu-west-1")?
        //
        // Or a named profile from ~/.aws/credentials and ~/.aws/config
        // .profile("dev")?
        //
        // Optional full endpoint, for VPC endpoints or unrecognized regions
        // .endpoint("https://dynamodb.eu-west-1.amazonaws.com")?
        //
        // To read all of the above from environment variables:
        // or, to override above from environment;
        .from_environment()?
        //
        // Optional: set a different default timeout (default is 30 seconds)
        .timeout(Duration::from_secs(15))?
        //
        // Build the handle
        .build()
        .await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Set up a tracing subscriber to see output based on RUST_LOG environment setting
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_ansi(false)
        .compact()
        .init();

    // Create a handle. This should be used throughout the program
    info!("Creating new handle...");
    let handle = get_handle().await?;

    // Create an example table
    CreateTableRequest::new(TABLE)
        .attribute("Artist", ScalarAttributeType::S)
        .attribute("SongTitle", ScalarAttributeType::S)
        .hash_key("Artist")
        .range_key("SongTitle")
        .billing_mode(BillingMode::PayPerRequest)
        .execute(&handle)
        .await?
        // wait up to 30 seconds for table to be created
        .wait_for_active_ms(&handle, 30000, 500)
        .await?;

    // Put an item into the table, built attribute by attribute
    let putres = PutItemRequest::new(TABLE)
        .timeout(&Duration::from_millis(3000))
        .item(
            Item::new()
                .s("Artist", "No One You Know")
                .s("SongTitle", "Call Me Today")
                .s("AlbumTitle", "Somewhat Famous")
                .n("year", 2015),
        )
        .return_consumed_capacity(ReturnConsumedCapacity::Total)
        .execute(&handle)
        .await?;
    println!("PutItemResult={:?}", putres);

    // Putting the same item again, only if it doesn't exist, fails
    let e = PutItemRequest::new(TABLE)
        .item(
            Item::new()
                .s("Artist", "No One You Know")
                .s("SongTitle", "Call Me Today"),
        )
        .condition_expression("attribute_not_exists(Artist)")
        .execute(&handle)
        .await
        .unwrap_err();
    if e.code != ErrorCode::ConditionalCheckFailed {
        return Err(e.into());
    }

    // Put an item from a native struct
    let song = Song {
        artist: "No One You Know".to_string(),
        title: "Somewhere Down The Road".to_string(),
        album: "Somewhat Famous".to_string(),
        year: 2016,
        plays: Some(0),
    };
    PutItemRequest::new(TABLE)
        .put_item(&song)?
        .execute(&handle)
        .await?;

    // Update a counter, returning the new value
    let updres = UpdateItemRequest::new(TABLE)
        .key(
            Item::new()
                .s("Artist", "No One You Know")
                .s("SongTitle", "Somewhere Down The Road"),
        )
        .update_expression("SET plays = if_not_exists(plays, :zero) + :one")
        .expression_attribute_value(":zero", 0)
        .expression_attribute_value(":one", 1)
        .return_values(ReturnValue::UpdatedNew)
        .execute(&handle)
        .await?;
    println!("UpdateItemResult={:?}", updres);

    // Get the item back, into a native struct
    let mut song = Song::default();
    GetItemRequest::new(TABLE)
        .key(
            Item::new()
                .s("Artist", "No One You Know")
                .s("SongTitle", "Somewhere Down The Road"),
        )
        .consistent_read(true)
        .execute_into(&handle, &mut song)
        .await?;
    println!("Song={:?}", song);
    if song.plays != Some(1) {
        return Err("UpdateItem should have set plays to 1, but did not".into());
    }

    // write in some more items, so query below has more to return
    for i in 1..=10 {
        let _ = PutItemRequest::new(TABLE)
            .item(
                Item::new()
                    .s("Artist", "Acme Band")
                    .s("SongTitle", &format!("Song {:02}", i))
                    .n("year", 2000 + i),
            )
            .execute(&handle)
            .await?;
    }

    // Query all songs by one artist, two at a time
    let qres = QueryRequest::new(TABLE)
        .key_condition_expression("Artist = :a")
        .expression_attribute_value(":a", "Acme Band")
        .limit(2)
        .execute_all(&handle)
        .await?;
    println!("Query found {} items", qres.count());

    // Query with a filter and reverse ordering, one page at a time
    let mut qreq = QueryRequest::new(TABLE)
        .key_condition_expression("Artist = :a")
        .filter_expression("#y >= :y")
        .expression_attribute_name("#y", "year")
        .expression_attribute_value(":a", "Acme Band")
        .expression_attribute_value(":y", 2005)
        .scan_index_forward(false)
        .limit(3);
    while !qreq.is_done() {
        let page = qreq.execute_batch(&handle).await?;
        for item in page.items() {
            println!("  {}", item.to_json());
        }
    }

    // Remove an item, returning what was deleted
    let delres = DeleteItemRequest::new(TABLE)
        .key(
            Item::new()
                .s("Artist", "No One You Know")
                .s("SongTitle", "Call Me Today"),
        )
        .return_values(ReturnValue::AllOld)
        .execute(&handle)
        .await?;
    println!("DeleteItemResult={:?}", delres);

    // Delete the table
    DeleteTableRequest::new(TABLE)
        .execute(&handle)
        .await?
        .wait_for_deletion_ms(&handle, 30000, 500)
        .await?;

    Ok(())
}
