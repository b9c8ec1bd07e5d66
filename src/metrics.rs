//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Per-request timing metrics.
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// A timed phase of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricEvent {
    /// The whole call, from validation to the final result.
    ClientExecuteTime,
    /// Converting the request to its JSON body.
    RequestMarshallTime,
    /// Getting credentials from the provider.
    CredentialsRequestTime,
    /// Signing, sending and receiving one http request.
    HttpRequestTime,
    /// Reading and unmarshalling one response.
    ResponseProcessingTime,
    /// Sleeping between retries.
    RetryPauseTime,
}

/// Timings and identifiers collected while executing one request.
///
/// Events may be started and ended more than once (for example once per
/// attempt); the totals are accumulated.
#[derive(Debug, Clone, Default)]
pub struct RequestMetrics {
    totals: HashMap<MetricEvent, Duration>,
    started: HashMap<MetricEvent, Instant>,
    request_ids: Vec<String>,
    status_codes: Vec<u16>,
    attempts: u32,
}

impl RequestMetrics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn start_event(&mut self, event: MetricEvent) {
        self.started.insert(event, Instant::now());
    }

    pub(crate) fn end_event(&mut self, event: MetricEvent) {
        if let Some(start) = self.started.remove(&event) {
            *self.totals.entry(event).or_default() += start.elapsed();
        }
    }

    pub(crate) fn add_time(&mut self, event: MetricEvent, d: Duration) {
        *self.totals.entry(event).or_default() += d;
    }

    pub(crate) fn add_attempt(&mut self) {
        self.attempts += 1;
    }

    pub(crate) fn add_response(&mut self, status: u16, request_id: Option<&str>) {
        self.status_codes.push(status);
        if let Some(rid) = request_id {
            self.request_ids.push(rid.to_string());
        }
    }

    /// Total time spent in the given event, if it happened at all.
    pub fn time(&self, event: MetricEvent) -> Option<Duration> {
        self.totals.get(&event).copied()
    }

    /// The number of http requests sent, including retries.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// The `x-amzn-RequestId` of every response received, in order.
    pub fn request_ids(&self) -> &[String] {
        &self.request_ids
    }

    /// The http status of every response received, in order.
    pub fn status_codes(&self) -> &[u16] {
        &self.status_codes
    }

    fn millis(&self, event: MetricEvent) -> u128 {
        self.time(event).map(|d| d.as_millis()).unwrap_or(0)
    }

    pub(crate) fn log(&self, operation: &str, success: bool) {
        debug!(
            operation,
            success,
            attempts = self.attempts,
            request_id = self.request_ids.last().map(|s| s.as_str()).unwrap_or(""),
            status = self.status_codes.last().copied().unwrap_or(0),
            client_execute_ms = self.millis(MetricEvent::ClientExecuteTime),
            marshall_ms = self.millis(MetricEvent::RequestMarshallTime),
            credentials_ms = self.millis(MetricEvent::CredentialsRequestTime),
            http_ms = self.millis(MetricEvent::HttpRequestTime),
            response_ms = self.millis(MetricEvent::ResponseProcessingTime),
            retry_pause_ms = self.millis(MetricEvent::RetryPauseTime),
            "request metrics"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_accumulate() {
        let mut m = RequestMetrics::new();
        assert_eq!(m.time(MetricEvent::HttpRequestTime), None);
        m.add_time(MetricEvent::RetryPauseTime, Duration::from_millis(20));
        m.add_time(MetricEvent::RetryPauseTime, Duration::from_millis(30));
        assert_eq!(
            m.time(MetricEvent::RetryPauseTime),
            Some(Duration::from_millis(50))
        );

        m.start_event(MetricEvent::HttpRequestTime);
        m.end_event(MetricEvent::HttpRequestTime);
        assert!(m.time(MetricEvent::HttpRequestTime).is_some());

        // ending an event that never started records nothing
        m.end_event(MetricEvent::ResponseProcessingTime);
        assert_eq!(m.time(MetricEvent::ResponseProcessingTime), None);
    }

    #[test]
    fn responses_are_recorded_in_order() {
        let mut m = RequestMetrics::new();
        m.add_attempt();
        m.add_response(500, Some("A"));
        m.add_attempt();
        m.add_response(200, Some("B"));
        assert_eq!(m.attempts(), 2);
        assert_eq!(m.status_codes(), &[500, 200]);
        assert_eq!(m.request_ids(), &["A".to_string(), "B".to_string()]);
    }
}
