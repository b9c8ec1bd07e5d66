//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//

// This is an example program showing how a Handle can be used across
// multiple threads. The program doesn't do anything very useful, it just creates
// a table then spawns a bunch of tasks to put/get/update/delete/query/scan
// table data in loops until a certain amount of time expires. It then deletes the
// table.

// To run this example against DynamoDB Local (http://localhost:8000):
//    cargo run --example multi_threaded
//
// for extra output:
//    RUST_LOG=debug cargo run --example multi_threaded
//
// or, for a LOT of tracing output:
//    RUST_LOG=trace cargo run --example multi_threaded

// Parameters for runtime execution
// Highest ID to use in the table
const MAX_ID: u32 = 100;
// Amount of time to run each task for
const RUNTIME_SECONDS: u64 = 10;

const TABLE: &str = "test_multi_thread";

use dynamodb_rust_sdk::types::*;
use dynamodb_rust_sdk::BatchWriteItemRequest;
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
use dynamodb_rust_sdk::ScanRequest;
use dynamodb_rust_sdk::UpdateItemRequest;
use std::error::Error;
use std::future::Future;
use std::time::{Duration, SystemTime};
use tokio::time::sleep;
use tracing::{debug, info, trace};

async fn get_handle() -> Result<Handle, DynamoError> {
    Handle::builder()
        // Default to DynamoDB Local, overridden by environment below
        .mode(HandleMode::Local)?
        .from_environment()?
        // allow at most 16 requests in flight at once, across all tasks
        .max_concurrent_requests(16)?
        .timeout(Duration::from_secs(15))?
        .build()
        .await
}

// simple convenience function to get current seconds since the epoch
fn now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn random_id() -> i64 {
    (rand::random::<u32>() % MAX_ID) as i64
}

async fn random_pause(min_ms: u64) {
    let ms = (rand::random::<u64>() % 100) + min_ms;
    trace!("sleeping for {} ms", ms);
    sleep(Duration::from_millis(ms)).await;
}

// Run one of the do_* loops as a task, returning 0 on success and 1 on error.
fn spawn_loop<F, Fut>(
    tasks: &mut tokio::task::JoinSet<i32>,
    name: &'static str,
    handle: &Handle,
    end_sec: u64,
    f: F,
) where
    F: FnOnce(Handle, u64) -> Fut,
    Fut: Future<Output = Result<(), Box<dyn Error + Send + Sync>>> + Send + 'static,
{
    // Handle uses an internal Arc, so each task gets a cheap clone of the same handle.
    let fut = f(handle.clone(), end_sec);
    tasks.spawn(async move {
        match fut.await {
            Ok(()) => 0,
            Err(e) => {
                info!("{} returned error: {}", name, e);
                1
            }
        }
    });
}

// Example way to use multiple threaded tokio runtime
#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> Result<(), Box<dyn Error>> {
    // Set up a tracing subscriber to see output based on RUST_LOG environment setting
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_ansi(false)
        .compact()
        .init();

    // Create a database handle. This should be used throughout the program, across all threads
    info!("Creating new handle...");
    let handle = get_handle().await?;

    // Create an example table, with a numeric partition key
    CreateTableRequest::new(TABLE)
        .attribute("id", ScalarAttributeType::N)
        .hash_key("id")
        .provisioned_throughput(100, 100)
        .execute(&handle)
        .await?
        // wait up to 30 seconds for table to be created
        .wait_for_active_ms(&handle, 30000, 500)
        .await?;

    // set the time (in seconds since epoch) when all tasks should end
    let end_time = now() + RUNTIME_SECONDS;

    let mut tasks = tokio::task::JoinSet::new();
    spawn_loop(&mut tasks, "do_puts", &handle, end_time, do_puts);
    spawn_loop(&mut tasks, "do_gets", &handle, end_time, do_gets);
    spawn_loop(&mut tasks, "do_updates", &handle, end_time, do_updates);
    spawn_loop(&mut tasks, "do_batch_writes", &handle, end_time, do_batch_writes);
    spawn_loop(&mut tasks, "do_queries", &handle, end_time, do_queries);
    spawn_loop(&mut tasks, "do_scans", &handle, end_time, do_scans);
    spawn_loop(&mut tasks, "do_deletes", &handle, end_time, do_deletes);

    info!("All tasks started. Waiting for them to finish.");
    let mut failed = 0;
    while let Some(res) = tasks.join_next().await {
        failed += res.unwrap_or(1);
    }

    info!("All tasks complete ({} failed). Deleting table.", failed);

    DeleteTableRequest::new(TABLE)
        .execute(&handle)
        .await?
        .wait_for_deletion_ms(&handle, 30000, 500)
        .await?;

    if failed > 0 {
        return Err(format!("{} tasks failed", failed).into());
    }
    Ok(())
}

type TaskResult = Result<(), Box<dyn Error + Send + Sync>>;

// Loop putting items into the table
async fn do_puts(handle: Handle, end_sec: u64) -> TaskResult {
    while now() <= end_sec {
        let id = random_id();
        debug!("do_puts() writing item for id {}", id);
        let putres = PutItemRequest::new(TABLE)
            .item(Item::new().n("id", id).s("name", "jane"))
            .execute(&handle)
            .await?;
        trace!("PutItemResult={:?}", putres);
        random_pause(5).await;
    }
    Ok(())
}

async fn do_gets(handle: Handle, end_sec: u64) -> TaskResult {
    while now() <= end_sec {
        // In most cases this will find nothing until a lot of items are written.
        let id = random_id();
        debug!("do_gets() reading item for id {}", id);
        let getres = GetItemRequest::new(TABLE)
            .key(Item::new().n("id", id))
            .execute(&handle)
            .await?;
        if getres.item().is_none() {
            trace!("No item found for id {}", id);
        }
        random_pause(5).await;
    }
    Ok(())
}

async fn do_updates(handle: Handle, end_sec: u64) -> TaskResult {
    while now() <= end_sec {
        // Only update items that exist
        let id = random_id();
        debug!("do_updates() updating item for id {}", id);
        let res = UpdateItemRequest::new(TABLE)
            .key(Item::new().n("id", id))
            .update_expression("SET #n = :n ADD updates :one")
            .condition_expression("attribute_exists(id)")
            .expression_attribute_name("#n", "name")
            .expression_attribute_value(":n", "martha")
            .expression_attribute_value(":one", 1)
            .execute(&handle)
            .await;
        match res {
            Ok(r) => trace!("UpdateItemResult={:?}", r),
            Err(e) if e.code == ErrorCode::ConditionalCheckFailed => {
                trace!("No item to update for id {}", id)
            }
            Err(e) => return Err(e.into()),
        }
        random_pause(5).await;
    }
    Ok(())
}

async fn do_batch_writes(handle: Handle, end_sec: u64) -> TaskResult {
    while now() <= end_sec {
        let mut req = BatchWriteItemRequest::new();
        let start = random_id();
        for id in start..(start + 5).min(MAX_ID as i64) {
            req = req.put(TABLE, Item::new().n("id", id).s("name", "batch"));
        }
        if req.write_count() == 0 {
            continue;
        }
        debug!("do_batch_writes() writing {} items", req.write_count());
        // Unprocessed writes are retried until everything is written
        let mut next = Some(req);
        while let Some(r) = next {
            let res = r.execute(&handle).await?;
            next = res.unprocessed_request(&r);
        }
        random_pause(20).await;
    }
    Ok(())
}

async fn do_queries(handle: Handle, end_sec: u64) -> TaskResult {
    while now() <= end_sec {
        let id = random_id();
        debug!("do_queries() reading item for id {}", id);
        let res = QueryRequest::new(TABLE)
            .key_condition_expression("id = :id")
            .expression_attribute_value(":id", id)
            .execute(&handle)
            .await?;
        trace!("Query returned {} items", res.count());
        random_pause(5).await;
    }
    Ok(())
}

async fn do_scans(handle: Handle, end_sec: u64) -> TaskResult {
    while now() <= end_sec {
        // Read the whole table, in pages of 25
        let res = ScanRequest::new(TABLE).limit(25).execute_all(&handle).await?;
        debug!("Full scan returned {} items", res.count());
        random_pause(10).await;
    }
    Ok(())
}

async fn do_deletes(handle: Handle, end_sec: u64) -> TaskResult {
    while now() <= end_sec {
        // Delete an item from the table (if it exists)
        let id = random_id();
        debug!("do_deletes() deleting item for id {}", id);
        let delres = DeleteItemRequest::new(TABLE)
            .key(Item::new().n("id", id))
            .execute(&handle)
            .await?;
        trace!("DeleteItemResult={:?}", delres);
        random_pause(10).await;
    }
    Ok(())
}
