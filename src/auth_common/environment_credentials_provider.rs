//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::auth_common::credentials_provider::{
    credentials_error, Credentials, CredentialsProvider,
};
use crate::error::DynamoError;
use std::collections::HashMap;

const ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
const SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
const SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// A credentials provider that reads `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`
/// and (optionally) `AWS_SESSION_TOKEN` from the process environment.
///
/// The environment is read on every call, so changes made after the handle
/// is created are picked up.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentCredentialsProvider {
    // fixed variable values, used in place of the process environment in tests
    overrides: Option<HashMap<String, String>>,
}

impl EnvironmentCredentialsProvider {
    pub fn new() -> Self {
        EnvironmentCredentialsProvider { overrides: None }
    }

    #[cfg(test)]
    pub(crate) fn from_map(vars: &[(&str, &str)]) -> Self {
        EnvironmentCredentialsProvider {
            overrides: Some(
                vars.iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
        }
    }

    fn var(&self, name: &str) -> Option<String> {
        let v = match &self.overrides {
            Some(m) => m.get(name).cloned(),
            None => std::env::var(name).ok(),
        };
        v.filter(|s| !s.is_empty())
    }
}

impl CredentialsProvider for EnvironmentCredentialsProvider {
    fn credentials(&self) -> Result<Credentials, DynamoError> {
        let akid = self.var(ACCESS_KEY_ID);
        let secret = self.var(SECRET_ACCESS_KEY);
        match (akid, secret) {
            (Some(a), Some(s)) => Ok(Credentials {
                access_key_id: a,
                secret_access_key: s,
                session_token: self.var(SESSION_TOKEN),
            }),
            (Some(_), None) => Err(credentials_error(
                self.name(),
                &format!("{} is set but {} is not", ACCESS_KEY_ID, SECRET_ACCESS_KEY),
            )),
            _ => Err(credentials_error(
                self.name(),
                &format!("{} is not set", ACCESS_KEY_ID),
            )),
        }
    }
    fn name(&self) -> &'static str {
        "environment"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn reads_keys_and_token() {
        let p = EnvironmentCredentialsProvider::from_map(&[
            ("AWS_ACCESS_KEY_ID", "AKID"),
            ("AWS_SECRET_ACCESS_KEY", "SECRET"),
            ("AWS_SESSION_TOKEN", "TOKEN"),
        ]);
        let c = p.credentials().unwrap();
        assert_eq!(c.access_key_id(), "AKID");
        assert_eq!(c.secret_access_key(), "SECRET");
        assert_eq!(c.session_token(), Some("TOKEN"));
    }

    #[test]
    fn missing_or_partial_keys_fail() {
        let p = EnvironmentCredentialsProvider::from_map(&[]);
        assert_eq!(p.credentials().unwrap_err().code, ErrorCode::CredentialsError);
        let p = EnvironmentCredentialsProvider::from_map(&[("AWS_ACCESS_KEY_ID", "AKID")]);
        let e = p.credentials().unwrap_err();
        assert!(e.message.contains("AWS_SECRET_ACCESS_KEY"));
        let p = EnvironmentCredentialsProvider::from_map(&[
            ("AWS_ACCESS_KEY_ID", ""),
            ("AWS_SECRET_ACCESS_KEY", "x"),
        ]);
        assert!(p.credentials().is_err());
    }
}
