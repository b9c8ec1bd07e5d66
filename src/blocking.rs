//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Synchronous access to DynamoDB, for applications that do not use `async`.
//!
//! ```no_run
//! use dynamodb_rust_sdk::blocking::{BlockingExecute, BlockingHandle};
//! use dynamodb_rust_sdk::{Handle, ListTablesRequest};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let handle = BlockingHandle::new(Handle::builder().from_environment()?)?;
//! let res = ListTablesRequest::new().execute_blocking(&handle)?;
//! println!("tables: {:?}", res.table_names());
//! # Ok(())
//! # }
//! ```
use crate::error::{ia_err, DynamoError};
use crate::handle::Handle;
use crate::handle_builder::HandleBuilder;
use crate::marshal::DynamoRequest;
use tokio::runtime::Runtime;

/// A [`Handle`] paired with its own single-threaded tokio runtime.
///
/// Every call blocks the calling thread until the result is ready. Calls must
/// not be made from within an async runtime; doing so returns an error.
#[derive(Debug)]
pub struct BlockingHandle {
    handle: Handle,
    runtime: Runtime,
}

fn check_not_async(what: &str) -> Result<(), DynamoError> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return ia_err!(
            "illegal state: {} called from within an async runtime; use Handle instead",
            what
        );
    }
    Ok(())
}

impl BlockingHandle {
    /// Build a handle from the given builder, on a new runtime.
    pub fn new(builder: HandleBuilder) -> Result<Self, DynamoError> {
        check_not_async("BlockingHandle::new")?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let handle = runtime.block_on(builder.build())?;
        Ok(BlockingHandle { handle, runtime })
    }

    /// The underlying async handle.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Execute a request, blocking until it completes.
    pub fn execute<R: DynamoRequest>(&self, request: &R) -> Result<R::Output, DynamoError> {
        check_not_async("BlockingHandle::execute")?;
        self.runtime.block_on(self.handle.execute(request))
    }
}

/// Adds `execute_blocking()` to every request type.
pub trait BlockingExecute: DynamoRequest + Sized {
    fn execute_blocking(&self, h: &BlockingHandle) -> Result<Self::Output, DynamoError> {
        h.execute(self)
    }
}

impl<R: DynamoRequest> BlockingExecute for R {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HandleMode;

    #[test]
    fn builds_outside_a_runtime() {
        let b = Handle::builder().mode(HandleMode::Local).unwrap();
        let h = BlockingHandle::new(b).unwrap();
        assert_eq!(h.handle().endpoint(), "http://localhost:8000/");
    }

    #[tokio::test]
    async fn refuses_to_run_inside_a_runtime() {
        let b = Handle::builder().mode(HandleMode::Local).unwrap();
        let e = BlockingHandle::new(b).unwrap_err();
        assert!(e.message.contains("illegal state"));
    }
}
