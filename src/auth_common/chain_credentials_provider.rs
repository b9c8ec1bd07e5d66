//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::auth_common::credentials_provider::{
    credentials_error, Credentials, CredentialsProvider,
};
use crate::auth_common::environment_credentials_provider::EnvironmentCredentialsProvider;
use crate::auth_common::profile_credentials_provider::ProfileCredentialsProvider;
use crate::error::DynamoError;
use tracing::trace;

/// A credentials provider that tries a list of providers in order and returns
/// the first credentials found.
///
/// The default chain checks the environment, then the `default` profile of the
/// shared credentials files.
#[derive(Debug, Clone)]
pub struct ChainCredentialsProvider {
    providers: Vec<Box<dyn CredentialsProvider>>,
}

impl ChainCredentialsProvider {
    pub fn new(providers: Vec<Box<dyn CredentialsProvider>>) -> Self {
        ChainCredentialsProvider { providers }
    }

    /// The environment, then the given profile from the given files.
    pub(crate) fn env_then_profile(profile: ProfileCredentialsProvider) -> Self {
        ChainCredentialsProvider {
            providers: vec![
                Box::new(EnvironmentCredentialsProvider::new()),
                Box::new(profile),
            ],
        }
    }
}

impl Default for ChainCredentialsProvider {
    fn default() -> Self {
        Self::env_then_profile(ProfileCredentialsProvider::new(
            crate::auth_common::profile_credentials_provider::DEFAULT_PROFILE,
        ))
    }
}

impl CredentialsProvider for ChainCredentialsProvider {
    fn credentials(&self) -> Result<Credentials, DynamoError> {
        let mut reasons: Vec<String> = Vec::new();
        for p in &self.providers {
            match p.credentials() {
                Ok(c) => {
                    trace!("using credentials from {} provider", p.name());
                    return Ok(c);
                }
                Err(e) => reasons.push(e.message),
            }
        }
        Err(credentials_error(
            self.name(),
            &format!("no credentials found: [{}]", reasons.join("; ")),
        ))
    }
    fn name(&self) -> &'static str {
        "chain"
    }
}
