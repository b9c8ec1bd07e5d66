//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::auth_common::credentials_provider::{Credentials, CredentialsProvider};
use crate::error::DynamoError;

/// A credentials provider that always returns the same, fixed credentials.
///
/// This is an ideal provider to be used if credentials are not read from the
/// environment or from a profile file.
#[derive(Debug, Clone)]
pub struct StaticCredentialsProvider {
    credentials: Credentials,
}

impl StaticCredentialsProvider {
    pub fn new(credentials: Credentials) -> Self {
        StaticCredentialsProvider { credentials }
    }
}

impl CredentialsProvider for StaticCredentialsProvider {
    fn credentials(&self) -> Result<Credentials, DynamoError> {
        self.credentials.validate()?;
        Ok(self.credentials.clone())
    }
    fn name(&self) -> &'static str {
        "static"
    }
}
