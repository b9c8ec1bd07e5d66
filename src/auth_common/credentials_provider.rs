//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::{DynamoError, ErrorCode};
use std::fmt::Debug;

/// AWS access credentials used to sign requests.
///
/// The `Debug` output of this struct never includes the secret key or session token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub(crate) access_key_id: String,
    pub(crate) secret_access_key: String,
    pub(crate) session_token: Option<String>,
}

impl Credentials {
    pub fn new(access_key_id: &str, secret_access_key: &str) -> Credentials {
        Credentials {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
            session_token: None,
        }
    }

    /// Create temporary credentials including a session token.
    pub fn with_session_token(
        access_key_id: &str,
        secret_access_key: &str,
        session_token: &str,
    ) -> Credentials {
        Credentials {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
            session_token: Some(session_token.to_string()),
        }
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    pub(crate) fn validate(&self) -> Result<(), DynamoError> {
        if self.access_key_id.is_empty() || self.secret_access_key.is_empty() {
            return Err(DynamoError::new(
                ErrorCode::CredentialsError,
                "access key id and secret access key must both be non-empty",
            ));
        }
        Ok(())
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "** redacted **"),
            )
            .finish()
    }
}

/// Trait defining a source of [`Credentials`].
///
/// Providers are called once per request attempt, so implementations that read
/// from slow sources should cache what they load.
pub trait CredentialsProvider: Send + Sync + Debug + CredentialsProviderClone {
    /// Returns the credentials to sign the next request with.
    fn credentials(&self) -> Result<Credentials, DynamoError>;
    /// Returns a short name for this provider, used in log and error messages.
    fn name(&self) -> &'static str;
}

// This allows users of this library to clone a Box<dyn CredentialsProvider>
pub trait CredentialsProviderClone {
    fn clone_box(&self) -> Box<dyn CredentialsProvider>;
}

impl<T> CredentialsProviderClone for T
where
    T: 'static + CredentialsProvider + Clone,
{
    fn clone_box(&self) -> Box<dyn CredentialsProvider> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn CredentialsProvider> {
    fn clone(&self) -> Box<dyn CredentialsProvider> {
        self.clone_box()
    }
}

pub(crate) fn credentials_error(provider: &str, msg: &str) -> DynamoError {
    DynamoError::new(
        ErrorCode::CredentialsError,
        &format!("{} credentials provider: {}", provider, msg),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_secrets() {
        let c = Credentials::with_session_token("AKIDEXAMPLE", "very-secret", "tok123");
        let s = format!("{:?}", c);
        assert!(s.contains("AKIDEXAMPLE"));
        assert!(!s.contains("very-secret"));
        assert!(!s.contains("tok123"));
    }

    #[test]
    fn empty_keys_are_rejected() {
        assert!(Credentials::new("", "x").validate().is_err());
        assert!(Credentials::new("a", "").validate().is_err());
        assert!(Credentials::new("a", "b").validate().is_ok());
    }
}
