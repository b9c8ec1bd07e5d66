//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
// These tests run every request against an in-process http server that
// records what it receives and replies with canned responses.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;

use dynamodb_rust_sdk::blocking::{BlockingExecute, BlockingHandle};
use dynamodb_rust_sdk::types::{
    BillingMode, DynamoItem, IndexStatus, Item, ScalarAttributeType, TableStatus,
    TransactWriteItem,
};
use dynamodb_rust_sdk::{
    AsyncHandler, CreateTableRequest, CreateTableResult, Credentials, DeleteTableRequest,
    DynamoError, ErrorCode, ErrorType, GetItemRequest, Handle, HandleBuilder, ListTablesRequest,
    ListTablesResult, MetricEvent, PutItemRequest, QueryRequest, RetryPolicy, ScanRequest,
    TransactWriteItemsRequest, UpdateTableRequest,
};

use std::collections::VecDeque;
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
struct Received {
    target: String,
    headers: HeaderMap,
    body: serde_json::Value,
}

#[derive(Debug, Clone)]
struct Canned {
    status: u16,
    error_type: Option<&'static str>,
    body: String,
}

impl Canned {
    fn ok(body: &str) -> Canned {
        Canned {
            status: 200,
            error_type: None,
            body: body.to_string(),
        }
    }

    fn error(status: u16, error_type: &str, message: &str) -> Canned {
        Canned {
            status,
            error_type: None,
            body: serde_json::json!({
                "__type": format!("com.amazonaws.dynamodb.v20120810#{}", error_type),
                "message": message
            })
            .to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct FakeService {
    received: Mutex<Vec<Received>>,
    responses: Mutex<VecDeque<Canned>>,
    count: AtomicUsize,
}

impl FakeService {
    fn reply(&self, c: Canned) {
        self.responses.lock().unwrap().push_back(c);
    }

    fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

async fn dispatch(
    State(svc): State<Arc<FakeService>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let n = svc.count.fetch_add(1, Ordering::SeqCst);
    let target = headers
        .get("x-amz-target")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    svc.received.lock().unwrap().push(Received {
        target,
        headers,
        body,
    });
    let canned = svc
        .responses
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Canned::ok("{}"));
    let mut resp = (
        StatusCode::from_u16(canned.status).unwrap(),
        [
            ("content-type", "application/x-amz-json-1.0".to_string()),
            ("x-amzn-requestid", format!("REQ{}", n)),
        ],
        canned.body,
    )
        .into_response();
    if let Some(t) = canned.error_type {
        resp.headers_mut()
            .insert("x-amzn-errortype", t.parse().unwrap());
    }
    resp
}

async fn start_service() -> (Arc<FakeService>, String) {
    let svc = Arc::new(FakeService::default());
    let app = Router::new()
        .route("/", post(dispatch))
        .with_state(svc.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (svc, format!("http://{}", addr))
}

fn builder(endpoint: &str) -> Result<HandleBuilder, DynamoError> {
    Handle::builder()
        .endpoint(endpoint)?
        .region("us-west-2")?
        .credentials(Credentials::new("AKIDTEST", "secret"))?
        .timeout(Duration::from_secs(5))?
        .retry_policy(RetryPolicy::new(
            3,
            Duration::from_millis(1),
            Duration::from_millis(5),
        ))
}

async fn handle(endpoint: &str) -> Handle {
    builder(endpoint).unwrap().build().await.unwrap()
}

#[tokio::test]
async fn signs_and_targets_requests() -> Result<(), Box<dyn Error>> {
    let (svc, url) = start_service().await;
    let h = handle(&url).await;
    svc.reply(Canned::ok(
        r#"{"Item":{"Artist":{"S":"No One You Know"},"Year":{"N":"2015"}}}"#,
    ));

    let res = GetItemRequest::new("Music")
        .key(Item::new().s("Artist", "No One You Know"))
        .consistent_read(true)
        .execute(&h)
        .await?;
    let item = res.item().expect("item");
    assert_eq!(item.get_i64("Year"), Some(2015));

    let rcv = svc.received();
    assert_eq!(rcv.len(), 1);
    let r = &rcv[0];
    assert_eq!(r.target, "DynamoDB_20120810.GetItem");
    assert_eq!(
        r.headers.get("content-type").unwrap(),
        "application/x-amz-json-1.0"
    );
    assert!(r.headers.contains_key("x-amz-date"));
    let auth = r.headers.get("authorization").unwrap().to_str()?;
    assert!(auth.starts_with("AWS4-HMAC-SHA256 Credential=AKIDTEST/"));
    assert!(auth.contains("/us-west-2/dynamodb/aws4_request"));
    assert!(auth.contains("x-amz-target"));
    assert!(r
        .headers
        .get("user-agent")
        .unwrap()
        .to_str()?
        .starts_with("dynamodb-rust-sdk/"));
    assert_eq!(
        r.body,
        serde_json::json!({
            "TableName": "Music",
            "Key": {"Artist": {"S": "No One You Know"}},
            "ConsistentRead": true
        })
    );
    Ok(())
}

#[tokio::test]
async fn per_request_credentials() -> Result<(), Box<dyn Error>> {
    let (svc, url) = start_service().await;
    let h = handle(&url).await;
    ListTablesRequest::new()
        .credentials(Credentials::with_session_token("OTHERKEY", "other", "tok"))
        .execute(&h)
        .await?;
    let rcv = svc.received();
    let r = &rcv[0];
    let auth = r.headers.get("authorization").unwrap().to_str()?;
    assert!(auth.starts_with("AWS4-HMAC-SHA256 Credential=OTHERKEY/"));
    assert_eq!(r.headers.get("x-amz-security-token").unwrap(), "tok");
    Ok(())
}

#[tokio::test]
async fn invalid_requests_are_not_sent() {
    let (svc, url) = start_service().await;
    let h = handle(&url).await;
    let e = PutItemRequest::new("Music").execute(&h).await.unwrap_err();
    assert_eq!(e.code, ErrorCode::IllegalArgument);
    assert_eq!(e.error_kind(), ErrorType::Client);
    assert!(svc.received().is_empty());
}

#[tokio::test]
async fn service_errors() -> Result<(), Box<dyn Error>> {
    let (svc, url) = start_service().await;
    let h = handle(&url).await;
    svc.reply(Canned::error(
        400,
        "ConditionalCheckFailedException",
        "The conditional request failed",
    ));
    let e = PutItemRequest::new("Music")
        .item(Item::new().s("Artist", "a"))
        .condition_expression("attribute_not_exists(Artist)")
        .execute(&h)
        .await
        .unwrap_err();
    assert_eq!(e.code, ErrorCode::ConditionalCheckFailed);
    assert_eq!(e.error_type(), Some("ConditionalCheckFailedException"));
    assert_eq!(e.message, "The conditional request failed");
    assert_eq!(e.status_code(), Some(400));
    assert_eq!(e.request_id(), Some("REQ0"));
    assert_eq!(e.error_kind(), ErrorType::Service);
    // not retried
    assert_eq!(svc.received().len(), 1);

    // error type given only by header
    svc.reply(Canned {
        status: 400,
        error_type: Some("ResourceNotFoundException:http://internal.amazon.com/coral/"),
        body: String::new(),
    });
    let e = ListTablesRequest::new().execute(&h).await.unwrap_err();
    assert_eq!(e.code, ErrorCode::ResourceNotFound);
    assert_eq!(e.message, "http status 400");
    Ok(())
}

#[tokio::test]
async fn transaction_cancellation_reasons() {
    let (svc, url) = start_service().await;
    let h = handle(&url).await;
    svc.reply(Canned {
        status: 400,
        error_type: None,
        body: r#"{"__type":"com.amazonaws.dynamodb.v20120810#TransactionCanceledException",
                  "Message":"Transaction cancelled",
                  "CancellationReasons":[{"Code":"None"},{"Code":"ConditionalCheckFailed","Message":"failed"}]}"#
            .to_string(),
    });
    let e = TransactWriteItemsRequest::new()
        .add(TransactWriteItem::put("Music", Item::new().s("Artist", "a")))
        .add(TransactWriteItem::delete("Music", Item::new().s("Artist", "b")))
        .execute(&h)
        .await
        .unwrap_err();
    assert_eq!(e.code, ErrorCode::TransactionCanceled);
    assert_eq!(e.message, "Transaction cancelled");
    let reasons = e.cancellation_reasons();
    assert_eq!(reasons.len(), 2);
    assert_eq!(reasons[1].code.as_deref(), Some("ConditionalCheckFailed"));

    let rcv = svc.received();
    let body = &rcv[0].body;
    assert_eq!(body["TransactItems"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["ClientRequestToken"].as_str().map(|s| s.len()),
        Some(32)
    );
}

#[tokio::test]
async fn retries_throttling_with_metrics() -> Result<(), Box<dyn Error>> {
    let (svc, url) = start_service().await;
    let h = handle(&url).await;
    svc.reply(Canned::error(
        400,
        "ProvisionedThroughputExceededException",
        "slow down",
    ));
    svc.reply(Canned::error(500, "InternalServerError", "oops"));
    svc.reply(Canned::ok(r#"{"TableNames":["Music"]}"#));

    let req = ListTablesRequest::new();
    let (res, metrics) = h.execute_with_metrics(&req).await;
    assert_eq!(res?.table_names(), &vec!["Music".to_string()]);
    assert_eq!(metrics.attempts(), 3);
    assert_eq!(metrics.status_codes(), &[400, 500, 200]);
    assert_eq!(metrics.request_ids(), &["REQ0", "REQ1", "REQ2"]);
    assert!(metrics.time(MetricEvent::ClientExecuteTime).is_some());
    assert!(metrics.time(MetricEvent::HttpRequestTime).is_some());
    assert!(metrics.time(MetricEvent::RetryPauseTime).is_some());

    // every attempt is signed again with the same body
    let rcv = svc.received();
    assert_eq!(rcv.len(), 3);
    assert!(rcv.iter().all(|r| r.target == "DynamoDB_20120810.ListTables"));
    Ok(())
}

#[tokio::test]
async fn retries_give_up() {
    let (svc, url) = start_service().await;
    let h = handle(&url).await;
    for _ in 0..5 {
        svc.reply(Canned::error(400, "ThrottlingException", "Rate exceeded"));
    }
    let e = ListTablesRequest::new().execute(&h).await.unwrap_err();
    assert_eq!(e.code, ErrorCode::Throttling);
    // the first attempt plus three retries
    assert_eq!(svc.received().len(), 4);
}

#[tokio::test]
async fn unreadable_response() {
    let (svc, url) = start_service().await;
    let h = handle(&url).await;
    svc.reply(Canned::ok("this is not json"));
    let e = ListTablesRequest::new().execute(&h).await.unwrap_err();
    assert_eq!(e.code, ErrorCode::BadResponse);
}

#[tokio::test]
async fn list_tables_follows_pages() -> Result<(), Box<dyn Error>> {
    let (svc, url) = start_service().await;
    let h = handle(&url).await;
    svc.reply(Canned::ok(
        r#"{"TableNames":["a","b"],"LastEvaluatedTableName":"b"}"#,
    ));
    svc.reply(Canned::ok(r#"{"TableNames":["c"]}"#));
    let res = ListTablesRequest::new().limit(2).execute_all(&h).await?;
    assert_eq!(res.table_names().len(), 3);
    assert!(res.last_evaluated_table_name().is_none());
    let rcv = svc.received();
    assert_eq!(rcv.len(), 2);
    assert!(rcv[0].body.get("ExclusiveStartTableName").is_none());
    assert_eq!(rcv[1].body["ExclusiveStartTableName"], "b");
    assert_eq!(rcv[1].body["Limit"], 2);
    Ok(())
}

#[derive(Default, Debug, PartialEq, DynamoItem)]
struct Song {
    #[dynamo(attribute = "Artist")]
    artist: String,
    #[dynamo(attribute = "SongTitle")]
    title: String,
    plays: i64,
}

#[tokio::test]
async fn query_follows_pages() -> Result<(), Box<dyn Error>> {
    let (svc, url) = start_service().await;
    let h = handle(&url).await;
    svc.reply(Canned::ok(
        r#"{"Items":[{"Artist":{"S":"Acme"},"SongTitle":{"S":"One"},"plays":{"N":"3"}}],
            "Count":1,"ScannedCount":2,
            "LastEvaluatedKey":{"Artist":{"S":"Acme"},"SongTitle":{"S":"One"}}}"#,
    ));
    svc.reply(Canned::ok(
        r#"{"Items":[{"Artist":{"S":"Acme"},"SongTitle":{"S":"Two"},"plays":{"N":"5"}}],
            "Count":1,"ScannedCount":1}"#,
    ));
    let res = QueryRequest::new("Music")
        .key_condition_expression("Artist = :a")
        .expression_attribute_value(":a", "Acme")
        .limit(1)
        .execute_all(&h)
        .await?;
    assert_eq!(res.count(), 2);
    assert_eq!(res.scanned_count(), 3);
    assert!(res.last_evaluated_key().is_none());
    let songs: Vec<Song> = res.items_as()?;
    assert_eq!(
        songs[1],
        Song {
            artist: "Acme".to_string(),
            title: "Two".to_string(),
            plays: 5
        }
    );

    let rcv = svc.received();
    assert_eq!(rcv[0].target, "DynamoDB_20120810.Query");
    assert_eq!(
        rcv[0].body["ExpressionAttributeValues"],
        serde_json::json!({":a": {"S": "Acme"}})
    );
    assert_eq!(
        rcv[1].body["ExclusiveStartKey"],
        serde_json::json!({"Artist": {"S": "Acme"}, "SongTitle": {"S": "One"}})
    );
    Ok(())
}

#[tokio::test]
async fn put_native_struct() -> Result<(), Box<dyn Error>> {
    let (svc, url) = start_service().await;
    let h = handle(&url).await;
    let song = Song {
        artist: "Acme".to_string(),
        title: "Three".to_string(),
        plays: 0,
    };
    PutItemRequest::new("Music").put_item(&song)?.execute(&h).await?;
    assert_eq!(
        svc.received()[0].body["Item"],
        serde_json::json!({
            "Artist": {"S": "Acme"},
            "SongTitle": {"S": "Three"},
            "plays": {"N": "0"}
        })
    );
    Ok(())
}

#[derive(Default)]
struct Counter {
    ok: AtomicUsize,
    failed: AtomicUsize,
}

struct CountingHandler(Arc<Counter>);

impl AsyncHandler<ListTablesRequest, ListTablesResult> for CountingHandler {
    fn on_success(&self, _request: &ListTablesRequest, _result: &ListTablesResult) {
        self.0.ok.fetch_add(1, Ordering::SeqCst);
    }
    fn on_error(&self, _error: &DynamoError) {
        self.0.failed.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn spawned_requests() -> Result<(), Box<dyn Error>> {
    let (svc, url) = start_service().await;
    let h = builder(&url)?.max_concurrent_requests(2)?.build().await?;
    let counter = Arc::new(Counter::default());

    let mut tasks = Vec::new();
    for _ in 0..8 {
        tasks.push(h.spawn(ListTablesRequest::new(), CountingHandler(counter.clone())));
    }
    for t in tasks {
        t.await??;
    }
    assert_eq!(counter.ok.load(Ordering::SeqCst), 8);
    assert_eq!(counter.failed.load(Ordering::SeqCst), 0);

    svc.reply(Canned::error(400, "ValidationException", "bad"));
    let r = h
        .spawn(ListTablesRequest::new(), CountingHandler(counter.clone()))
        .await?;
    assert_eq!(r.unwrap_err().code, ErrorCode::Validation);
    assert_eq!(counter.failed.load(Ordering::SeqCst), 1);
    assert_eq!(svc.received().len(), 9);
    Ok(())
}

#[test]
fn blocking_handle() -> Result<(), Box<dyn Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    let (svc, url) = rt.block_on(start_service());
    svc.reply(Canned::ok(r#"{"TableNames":["Music"]}"#));

    let h = BlockingHandle::new(builder(&url)?)?;
    let res = ListTablesRequest::new().execute_blocking(&h)?;
    assert_eq!(res.table_names(), &vec!["Music".to_string()]);
    let res = h.execute(&GetItemRequest::new("Music").key(Item::new().s("Artist", "x")))?;
    assert!(res.item().is_none());
    assert_eq!(svc.received().len(), 2);
    Ok(())
}

#[tokio::test]
async fn request_timeout() {
    let (svc, url) = start_service().await;
    let h = handle(&url).await;
    for _ in 0..5 {
        svc.reply(Canned::error(503, "ServiceUnavailable", "busy"));
    }
    // a zero timeout leaves no room for even one attempt
    let e = ListTablesRequest::new()
        .timeout(&Duration::ZERO)
        .execute(&h)
        .await
        .unwrap_err();
    assert_eq!(e.code, ErrorCode::RequestTimeout);
    assert!(svc.received().is_empty());
}

#[tokio::test]
async fn query_and_scan_pages_end() -> Result<(), Box<dyn Error>> {
    let (svc, url) = start_service().await;
    let h = handle(&url).await;
    svc.reply(Canned::ok(
        r#"{"Items":[],"Count":0,"ScannedCount":0,"LastEvaluatedKey":{"Artist":{"S":"Acme"}}}"#,
    ));
    svc.reply(Canned::ok(r#"{"Items":[],"Count":0,"ScannedCount":0}"#));

    let mut qreq = QueryRequest::new("Music")
        .key_condition_expression("Artist = :a")
        .expression_attribute_value(":a", "Acme");
    let mut pages = 0;
    while !qreq.is_done() {
        qreq.execute_batch(&h).await?;
        pages += 1;
    }
    assert_eq!(pages, 2);
    // a finished query does not silently start over
    let e = qreq.execute_batch(&h).await.unwrap_err();
    assert_eq!(e.code, ErrorCode::IllegalArgument);
    assert_eq!(svc.received().len(), 2);

    // a new start key reads again from there
    let mut qreq = qreq.exclusive_start_key(Item::new().s("Artist", "Acme"));
    assert!(!qreq.is_done());
    qreq.execute_batch(&h).await?;
    assert!(qreq.is_done());
    assert_eq!(
        svc.received()[2].body["ExclusiveStartKey"],
        serde_json::json!({"Artist": {"S": "Acme"}})
    );

    let mut sreq = ScanRequest::new("Music");
    sreq.execute_batch(&h).await?;
    assert!(sreq.is_done());
    let e = sreq.execute_batch(&h).await.unwrap_err();
    assert_eq!(e.code, ErrorCode::IllegalArgument);
    assert_eq!(svc.received().len(), 4);
    Ok(())
}

fn music_table() -> CreateTableRequest {
    CreateTableRequest::new("Music")
        .attribute("Artist", ScalarAttributeType::S)
        .hash_key("Artist")
        .billing_mode(BillingMode::PayPerRequest)
}

fn describe_reply(table_status: &str, index_status: Option<&str>) -> Canned {
    let mut table = serde_json::json!({"TableName": "Music", "TableStatus": table_status});
    if let Some(s) = index_status {
        table["GlobalSecondaryIndexes"] =
            serde_json::json!([{"IndexName": "ByYear", "IndexStatus": s}]);
    }
    Canned::ok(&serde_json::json!({ "Table": table }).to_string())
}

async fn create_music(svc: &FakeService, h: &Handle) -> Result<CreateTableResult, DynamoError> {
    svc.reply(Canned::ok(
        r#"{"TableDescription":{"TableName":"Music","TableStatus":"CREATING"}}"#,
    ));
    music_table().execute(h).await
}

#[tokio::test]
async fn create_table_waits_for_table_and_indexes() -> Result<(), Box<dyn Error>> {
    let (svc, url) = start_service().await;
    let h = handle(&url).await;
    let mut res = create_music(&svc, &h).await?;
    assert_eq!(
        res.table_description().table_status,
        Some(TableStatus::Creating)
    );

    svc.reply(describe_reply("CREATING", Some("CREATING")));
    // the table is active before its index is
    svc.reply(describe_reply("ACTIVE", Some("CREATING")));
    svc.reply(describe_reply("ACTIVE", Some("ACTIVE")));
    res.wait_for_active_ms(&h, 5000, 5).await?;

    let td = res.table_description();
    assert!(td.is_active());
    assert_eq!(
        td.global_secondary_indexes.as_ref().unwrap()[0].index_status,
        Some(IndexStatus::Active)
    );
    let rcv = svc.received();
    assert_eq!(rcv.len(), 4);
    assert_eq!(rcv[0].target, "DynamoDB_20120810.CreateTable");
    for r in &rcv[1..] {
        assert_eq!(r.target, "DynamoDB_20120810.DescribeTable");
        assert_eq!(r.body, serde_json::json!({"TableName": "Music"}));
    }
    Ok(())
}

#[tokio::test]
async fn active_table_is_not_polled() -> Result<(), Box<dyn Error>> {
    let (svc, url) = start_service().await;
    let h = handle(&url).await;
    svc.reply(Canned::ok(
        r#"{"TableDescription":{"TableName":"Music","TableStatus":"ACTIVE"}}"#,
    ));
    music_table()
        .execute(&h)
        .await?
        .wait_for_active_ms(&h, 1000, 10)
        .await?;
    assert_eq!(svc.received().len(), 1);
    Ok(())
}

#[tokio::test]
async fn table_deleted_while_waiting_for_active() -> Result<(), Box<dyn Error>> {
    let (svc, url) = start_service().await;
    let h = handle(&url).await;
    let mut res = create_music(&svc, &h).await?;
    svc.reply(describe_reply("CREATING", None));
    svc.reply(describe_reply("DELETING", None));
    let e = res.wait_for_active_ms(&h, 5000, 5).await.unwrap_err();
    assert_eq!(e.code, ErrorCode::ResourceNotFound);
    assert_eq!(svc.received().len(), 3);
    Ok(())
}

#[tokio::test]
async fn update_table_waits_for_active() -> Result<(), Box<dyn Error>> {
    let (svc, url) = start_service().await;
    let h = handle(&url).await;
    svc.reply(Canned::ok(
        r#"{"TableDescription":{"TableName":"Music","TableStatus":"UPDATING"}}"#,
    ));
    svc.reply(describe_reply("UPDATING", None));
    svc.reply(describe_reply("ACTIVE", None));
    let mut res = UpdateTableRequest::new("Music")
        .billing_mode(BillingMode::PayPerRequest)
        .execute(&h)
        .await?;
    res.wait_for_active(&h, Duration::from_secs(5), Duration::from_millis(5))
        .await?;
    assert!(res.table_description().is_active());
    assert_eq!(svc.received().len(), 3);
    Ok(())
}

#[tokio::test]
async fn delete_table_waits_until_gone() -> Result<(), Box<dyn Error>> {
    let (svc, url) = start_service().await;
    let h = handle(&url).await;
    svc.reply(Canned::ok(
        r#"{"TableDescription":{"TableName":"Music","TableStatus":"DELETING"}}"#,
    ));
    svc.reply(describe_reply("DELETING", None));
    svc.reply(Canned::error(
        400,
        "ResourceNotFoundException",
        "Requested resource not found: Table: Music not found",
    ));
    let res = DeleteTableRequest::new("Music").execute(&h).await?;
    res.wait_for_deletion_ms(&h, 5000, 5).await?;
    let rcv = svc.received();
    assert_eq!(rcv.len(), 3);
    assert_eq!(rcv[0].target, "DynamoDB_20120810.DeleteTable");
    assert_eq!(rcv[2].target, "DynamoDB_20120810.DescribeTable");

    // other errors end the wait
    svc.reply(Canned::error(400, "AccessDeniedException", "denied"));
    let e = res.wait_for_deletion_ms(&h, 5000, 5).await.unwrap_err();
    assert_eq!(e.code, ErrorCode::AccessDenied);
    Ok(())
}

#[tokio::test]
async fn table_wait_times_out() -> Result<(), Box<dyn Error>> {
    let (svc, url) = start_service().await;
    let h = handle(&url).await;
    let mut res = create_music(&svc, &h).await?;
    // every DescribeTable reply says the table is still being created
    for _ in 0..100 {
        svc.reply(describe_reply("CREATING", None));
    }
    let e = res.wait_for_active_ms(&h, 60, 10).await.unwrap_err();
    assert_eq!(e.code, ErrorCode::RequestTimeout);
    assert!(svc.received().len() >= 2);
    assert_eq!(
        res.table_description().table_status,
        Some(TableStatus::Creating)
    );
    Ok(())
}

#[tokio::test]
async fn table_wait_shorter_than_delay() -> Result<(), Box<dyn Error>> {
    let (svc, url) = start_service().await;
    let h = handle(&url).await;
    let mut res = create_music(&svc, &h).await?;
    let e = res.wait_for_active_ms(&h, 10, 100).await.unwrap_err();
    assert_eq!(e.code, ErrorCode::IllegalArgument);

    svc.reply(Canned::ok(
        r#"{"TableDescription":{"TableName":"Music","TableStatus":"DELETING"}}"#,
    ));
    let del = DeleteTableRequest::new("Music").execute(&h).await?;
    let e = del.wait_for_deletion_ms(&h, 10, 100).await.unwrap_err();
    assert_eq!(e.code, ErrorCode::IllegalArgument);
    // only the CreateTable and DeleteTable calls reached the service
    assert_eq!(svc.received().len(), 2);
    Ok(())
}
