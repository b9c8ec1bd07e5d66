//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::async_handler::AsyncHandler;
use crate::auth_common::chain_credentials_provider::ChainCredentialsProvider;
use crate::auth_common::credentials_provider::{Credentials, CredentialsProvider};
use crate::auth_common::signer::{self, SigningParams};
use crate::auth_common::static_credentials_provider::StaticCredentialsProvider;
use crate::error::ErrorCode::InternalRetry;
use crate::error::{user_agent, DynamoError, ErrorCode};
use crate::handle_builder::{HandleBuilder, HandleMode, DEFAULT_LOCAL_ENDPOINT};
use crate::marshal::{DynamoRequest, CONTENT_TYPE, SERVICE_NAME};
use crate::metrics::{MetricEvent, RequestMetrics};
use crate::region::Region;
use crate::retry::RetryPolicy;
use bytes::Bytes;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;

use std::result::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, trace};
use url::Url;

const REQUEST_ID_HEADER: &str = "x-amzn-requestid";
const ERROR_TYPE_HEADER: &str = "x-amzn-errortype";
const TARGET_HEADER: &str = "x-amz-target";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// **The main database handle**.
///
/// This should be created once and used
/// throughout the application lifetime, across all threads.
///
/// Note: there is no need to enclose this struct in an `Rc` or [`Arc`], as it uses an
/// [`Arc`] internally, so calling `.clone()` on this struct will always return the
/// same underlying handle.
#[derive(Clone, Debug)]
pub struct Handle {
    // Use an inner Arc so cloning keeps the same contents
    pub(crate) inner: Arc<HandleRef>,
}

#[derive(Debug)]
pub(crate) struct HandleRef {
    pub(crate) client: reqwest::Client,
    pub(crate) endpoint: Url,
    pub(crate) region: Region,
    pub(crate) mode: HandleMode,
    pub(crate) credentials: Box<dyn CredentialsProvider>,
    retry_policy: RetryPolicy,
    limiter: Option<Semaphore>,
    timeout: Duration,
}

/// Per-call state threaded through the execution of one request.
#[derive(Debug)]
pub(crate) struct ExecutionContext {
    pub(crate) operation: &'static str,
    pub(crate) timeout: Duration,
    pub(crate) deadline: Instant,
    pub(crate) retries: u32,
    pub(crate) credentials: Option<Credentials>,
    pub(crate) metrics: RequestMetrics,
}

impl ExecutionContext {
    pub(crate) fn new(
        operation: &'static str,
        timeout: Duration,
        credentials: Option<Credentials>,
    ) -> Self {
        ExecutionContext {
            operation,
            timeout,
            deadline: Instant::now() + timeout,
            retries: 0,
            credentials,
            metrics: RequestMetrics::new(),
        }
    }

    fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

impl Handle {
    /// Create a new [`HandleBuilder`].
    pub fn builder() -> HandleBuilder {
        HandleBuilder::new()
    }

    // Create the new Handle based on builder configuration
    pub(crate) async fn new(b: &HandleBuilder) -> Result<Handle, DynamoError> {
        let builder = b.clone();
        let timeout = builder.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let c = {
            if let Some(c) = &builder.client {
                c.clone()
            } else {
                let mut cb = reqwest::Client::builder()
                    .timeout(timeout)
                    .connect_timeout(timeout);
                if let Some(cert) = &builder.add_cert {
                    cb = cb.add_root_certificate(cert.clone());
                }
                if builder.accept_invalid_certs {
                    cb = cb.danger_accept_invalid_certs(true);
                }
                cb.build()?
            }
        };
        let region = builder.region.clone().unwrap_or_default();
        let endpoint = match (&builder.endpoint, builder.mode) {
            (Some(e), _) => e.clone(),
            (None, HandleMode::Local) => Url::parse(DEFAULT_LOCAL_ENDPOINT)?,
            (None, HandleMode::Cloud) => Url::parse(&region.dynamodb_endpoint())?,
        };
        let credentials: Box<dyn CredentialsProvider> = match (builder.credentials_provider, builder.mode) {
            (Some(p), _) => p,
            (None, HandleMode::Local) => Box::new(StaticCredentialsProvider::new(
                Credentials::new("local", "local"),
            )),
            (None, HandleMode::Cloud) => Box::new(ChainCredentialsProvider::default()),
        };
        debug!(
            "Creating new Handle: {:?}, region={}, endpoint={}, credentials={}",
            builder.mode,
            region,
            endpoint,
            credentials.name()
        );
        Ok(Handle {
            inner: Arc::new(HandleRef {
                client: c,
                endpoint,
                region,
                mode: builder.mode,
                credentials,
                retry_policy: builder.retry_policy,
                limiter: builder.max_concurrent_requests.map(Semaphore::new),
                timeout,
            }),
        })
    }

    /// The endpoint all requests are sent to.
    pub fn endpoint(&self) -> &str {
        self.inner.endpoint.as_str()
    }

    /// The region used to sign requests.
    pub fn region(&self) -> &Region {
        &self.inner.region
    }

    pub fn mode(&self) -> HandleMode {
        self.inner.mode
    }

    /// Execute a request and return its result.
    ///
    /// Each request type also has an `execute(&handle)` method that calls this.
    pub async fn execute<R: DynamoRequest>(&self, request: &R) -> Result<R::Output, DynamoError> {
        self.execute_with_metrics(request).await.0
    }

    /// Execute a request and return its result along with the timings and
    /// identifiers collected while running it.
    pub async fn execute_with_metrics<R: DynamoRequest>(
        &self,
        request: &R,
    ) -> (Result<R::Output, DynamoError>, RequestMetrics) {
        let options = request.options();
        let mut ctx = ExecutionContext::new(
            R::OPERATION,
            self.get_timeout(&options.timeout),
            options.credentials.clone(),
        );
        ctx.metrics.start_event(MetricEvent::ClientExecuteTime);
        let result = self.execute_in_context(request, &mut ctx).await;
        ctx.metrics.end_event(MetricEvent::ClientExecuteTime);
        ctx.metrics.log(ctx.operation, result.is_ok());
        if let Err(e) = &result {
            debug!("{} failed: {}", ctx.operation, e);
        }
        (result, ctx.metrics)
    }

    async fn execute_in_context<R: DynamoRequest>(
        &self,
        request: &R,
        ctx: &mut ExecutionContext,
    ) -> Result<R::Output, DynamoError> {
        request.validate()?;
        ctx.metrics.start_event(MetricEvent::RequestMarshallTime);
        let body = request.marshal();
        ctx.metrics.end_event(MetricEvent::RequestMarshallTime);
        let body = body?;
        trace!("{} request body: {}", ctx.operation, String::from_utf8_lossy(&body));

        let _permit = match &self.inner.limiter {
            Some(s) => match s.acquire().await {
                Ok(p) => Some(p),
                Err(e) => return Err(DynamoError::new(ErrorCode::UnknownError, &e.to_string())),
            },
            None => None,
        };

        let bytes = self.send_and_receive(&R::target(), body, ctx).await?;
        ctx.metrics.start_event(MetricEvent::ResponseProcessingTime);
        let result = R::unmarshal(&bytes);
        ctx.metrics.end_event(MetricEvent::ResponseProcessingTime);
        result
    }

    /// Submit a request as a tokio task, calling `handler` when it completes.
    ///
    /// The returned [`JoinHandle`] also yields the result. This must be called
    /// from within a tokio runtime.
    pub fn spawn<R, H>(&self, request: R, handler: H) -> JoinHandle<Result<R::Output, DynamoError>>
    where
        R: DynamoRequest + 'static,
        H: AsyncHandler<R, R::Output> + 'static,
    {
        let h = self.clone();
        tokio::spawn(async move {
            let result = h.execute(&request).await;
            match &result {
                Ok(r) => handler.on_success(&request, r),
                Err(e) => handler.on_error(e),
            }
            result
        })
    }

    /// Submit a request as a tokio task with no completion handler.
    pub fn spawn_without_handler<R>(&self, request: R) -> JoinHandle<Result<R::Output, DynamoError>>
    where
        R: DynamoRequest + 'static,
    {
        let h = self.clone();
        tokio::spawn(async move { h.execute(&request).await })
    }

    // The x-amzn-RequestId header, if present. It must be a plain visible string.
    fn get_request_id(headers: &HeaderMap) -> Result<Option<String>, DynamoError> {
        let val = match headers.get(REQUEST_ID_HEADER) {
            Some(v) => v,
            None => return Ok(None),
        };
        match val.to_str() {
            Ok(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_graphic()) => {
                Ok(Some(s.to_string()))
            }
            _ => Err(DynamoError::new(
                ErrorCode::BadResponse,
                &format!("\"{}\" value in return headers is not valid", REQUEST_ID_HEADER),
            )),
        }
    }

    async fn post_data(
        &self,
        target: &str,
        body: &Bytes,
        ctx: &mut ExecutionContext,
    ) -> Result<Bytes, DynamoError> {
        ctx.metrics.start_event(MetricEvent::CredentialsRequestTime);
        let creds = match &ctx.credentials {
            Some(c) => c.validate().map(|_| c.clone()),
            None => self.inner.credentials.credentials(),
        };
        ctx.metrics.end_event(MetricEvent::CredentialsRequestTime);
        let creds = creds?;

        let remaining = ctx.remaining();
        if remaining.is_zero() {
            return Err(timeout_error(ctx));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static(CONTENT_TYPE),
        );
        headers.insert(TARGET_HEADER, HeaderValue::from_str(target)?);
        signer::sign_request(
            &Method::POST,
            &self.inner.endpoint,
            &mut headers,
            body,
            &SigningParams {
                credentials: &creds,
                region: self.inner.region.id(),
                service: SERVICE_NAME,
                time: Utc::now(),
            },
        )?;
        // not signed; proxies may rewrite it
        headers.insert(reqwest::header::USER_AGENT, HeaderValue::from_str(user_agent())?);

        ctx.metrics.add_attempt();
        ctx.metrics.start_event(MetricEvent::HttpRequestTime);
        let resp = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .body(body.clone())
            .timeout(remaining)
            .headers(headers)
            .send()
            .await;
        let resp = match resp {
            Ok(r) => r,
            Err(e) => {
                ctx.metrics.end_event(MetricEvent::HttpRequestTime);
                return Err(e.into());
            }
        };
        let status = resp.status().as_u16();
        let request_id = Self::get_request_id(resp.headers());
        let error_type = resp
            .headers()
            .get(ERROR_TYPE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let content = resp.bytes().await;
        ctx.metrics.end_event(MetricEvent::HttpRequestTime);
        let request_id = request_id?;
        let content = content?;
        ctx.metrics.add_response(status, request_id.as_deref());
        trace!(
            "{} response: status={} request_id={:?}",
            ctx.operation,
            status,
            request_id
        );

        if !(200..300).contains(&status) {
            return Err(DynamoError::from_response(
                status,
                request_id,
                error_type.as_deref(),
                &content,
            ));
        }
        Ok(content)
    }

    pub(crate) async fn send_and_receive(
        &self,
        target: &str,
        body: Bytes,
        ctx: &mut ExecutionContext,
    ) -> Result<Bytes, DynamoError> {
        ctx.retries = 0;
        loop {
            match self.send_and_receive_once(target, &body, ctx).await {
                Ok(r) => return Ok(r),
                Err(e) => {
                    if e.code == InternalRetry {
                        ctx.retries += 1;
                        continue;
                    }
                    return Err(e);
                }
            }
        }
    }

    pub(crate) async fn send_and_receive_once(
        &self,
        target: &str,
        body: &Bytes,
        ctx: &mut ExecutionContext,
    ) -> Result<Bytes, DynamoError> {
        let err = match self.post_data(target, body, ctx).await {
            Ok(b) => return Ok(b),
            Err(e) => e,
        };
        let policy = &self.inner.retry_policy;
        if !policy.should_retry(&err, ctx.retries) {
            return Err(err);
        }
        let delay = policy.delay(ctx.retries);
        if delay >= ctx.remaining() {
            debug!(
                "not retrying {}: pause of {:?} would exceed the {:?} timeout",
                ctx.operation, delay, ctx.timeout
            );
            return Err(err);
        }
        debug!(
            "retry {} of {} after {:?}: {}",
            ctx.retries + 1,
            ctx.operation,
            delay,
            err
        );
        ctx.metrics.add_time(MetricEvent::RetryPauseTime, delay);
        tokio::time::sleep(delay).await;
        Err(DynamoError::new(InternalRetry, ""))
    }

    pub(crate) fn get_timeout(&self, t: &Option<Duration>) -> Duration {
        // if t is given, use that. If not, use handle's timeout
        if let Some(d) = t {
            return *d;
        }
        self.inner.timeout
    }
}

fn timeout_error(ctx: &ExecutionContext) -> DynamoError {
    DynamoError::new(
        ErrorCode::RequestTimeout,
        &format!(
            "{} did not complete within {:?} ({} retries)",
            ctx.operation, ctx.timeout, ctx.retries
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn defaults_for_cloud_and_local() {
        let h = Handle::builder()
            .credentials(Credentials::new("a", "b"))
            .unwrap()
            .build()
            .await
            .unwrap();
        assert_eq!(h.endpoint(), "https://dynamodb.us-east-1.amazonaws.com/");
        assert_eq!(h.region().id(), "us-east-1");
        assert_eq!(h.get_timeout(&None), DEFAULT_TIMEOUT);
        assert_eq!(
            h.get_timeout(&Some(Duration::from_secs(2))),
            Duration::from_secs(2)
        );

        let h = Handle::builder()
            .mode(HandleMode::Local)
            .unwrap()
            .region("eu-west-1")
            .unwrap()
            .build()
            .await
            .unwrap();
        assert_eq!(h.endpoint(), "http://localhost:8000/");
        assert_eq!(h.region().id(), "eu-west-1");
        assert_eq!(h.inner.credentials.name(), "static");
    }

    #[test]
    fn request_id_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(Handle::get_request_id(&headers).unwrap(), None);
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("ABC123"));
        assert_eq!(
            Handle::get_request_id(&headers).unwrap().as_deref(),
            Some("ABC123")
        );
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("has space"));
        assert_eq!(
            Handle::get_request_id(&headers).unwrap_err().code,
            ErrorCode::BadResponse
        );
    }

    #[test]
    fn context_deadline() {
        let ctx = ExecutionContext::new("GetItem", Duration::ZERO, None);
        assert!(ctx.remaining().is_zero());
        let e = timeout_error(&ctx);
        assert_eq!(e.code, ErrorCode::RequestTimeout);
        assert!(e.message.starts_with("GetItem did not complete"));
    }
}
