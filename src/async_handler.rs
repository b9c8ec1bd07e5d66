//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::DynamoError;

/// Callbacks for a request submitted with [`Handle::spawn()`](crate::Handle::spawn).
///
/// Exactly one of the two methods is called, from the task that ran the request.
/// Handlers should return quickly; long work belongs in another task.
pub trait AsyncHandler<R, T>: Send + Sync {
    /// Called with the original request and its result when the call succeeds.
    fn on_success(&self, request: &R, result: &T);
    /// Called when the call fails, after all retries.
    fn on_error(&self, error: &DynamoError);
}
