//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Builder for creating a [`DynamoDB Handle`](crate::Handle)
//!

use std::default::Default;
use std::env;
use std::result::Result;
use std::time::Duration;

use crate::auth_common::chain_credentials_provider::ChainCredentialsProvider;
use crate::auth_common::credentials_provider::{Credentials, CredentialsProvider};
use crate::auth_common::file_utils::file_to_string;
use crate::auth_common::profile_credentials_provider::{
    ProfileCredentialsProvider, DEFAULT_CONFIG_FILE_PATH, DEFAULT_CREDENTIALS_FILE_PATH,
    DEFAULT_PROFILE,
};
use crate::auth_common::static_credentials_provider::StaticCredentialsProvider;
use crate::error::{ia_err, DynamoError};
use crate::handle::Handle;
use crate::region::Region;
use crate::retry::RetryPolicy;
use reqwest::Certificate;
use reqwest::Client;
use url::Url;

/// The endpoint used in [`HandleMode::Local`] when none is given.
pub const DEFAULT_LOCAL_ENDPOINT: &str = "http://localhost:8000";

/// Builder used to set all the parameters to create a [`DynamoDB Handle`](crate::Handle).
///
/// With no settings at all, the handle connects to DynamoDB in `us-east-1`
/// using credentials from the environment or the `default` profile of
/// `~/.aws/credentials`.
#[derive(Default, Debug, Clone)]
pub struct HandleBuilder {
    pub(crate) endpoint: Option<Url>,
    pub(crate) region: Option<Region>,
    pub(crate) mode: HandleMode,
    pub(crate) credentials_provider: Option<Box<dyn CredentialsProvider>>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) retry_policy: RetryPolicy,
    pub(crate) max_concurrent_requests: Option<usize>,
    pub(crate) add_cert: Option<Certificate>,
    pub(crate) client: Option<Client>,
    pub(crate) accept_invalid_certs: bool,
    // For error messaging
    pub(crate) from_environment: bool,
}

/// The kind of DynamoDB service to connect to.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleMode {
    /// Connect to the Amazon DynamoDB service.
    #[default]
    Cloud,
    /// Connect to a DynamoDB Local instance (typically for testing purposes).
    ///
    /// DynamoDB Local accepts any credentials, so fixed dummy credentials are
    /// used unless a credentials provider is set.
    Local,
}

impl HandleBuilder {
    /// Create a new HandleBuilder struct with default settings.
    pub fn new() -> Self {
        HandleBuilder {
            ..Default::default()
        }
    }

    /// Build a new [`Handle`].
    ///
    /// Note: Internally, if the [`HandleBuilder`] contains
    /// a reference to an existing [`reqwest::Client`], it will clone and
    /// use that. Otherwise, it will create a new [`reqwest::Client`] for its
    /// own internal use. See [`reqwest_client()`](HandleBuilder::reqwest_client()).
    pub async fn build(self) -> Result<Handle, DynamoError> {
        Handle::new(&self).await
    }

    /// Gather configuration settings from the current environment.
    ///
    /// This method will scan the process [`standard environment`](std::env::Vars) to collect and
    /// set the configuration parameters. The values can be overridden in code if this method is
    /// called first and other methods are called afterwards, for example:
    ///```no_run
    /// # use dynamodb_rust_sdk::Handle;
    /// # use std::time::Duration;
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    ///   let handle = Handle::builder()
    ///       .from_environment()?
    ///       .timeout(Duration::from_secs(5))?
    ///       .build()
    ///       .await?;
    /// # Ok(())
    /// # }
    ///```
    /// The following environment variables are used:
    ///
    /// | variable | description |
    /// | -------- | ----------- |
    /// | `AWS_ENDPOINT_URL_DYNAMODB` | The URL endpoint to use. See [`HandleBuilder::endpoint()`]. |
    /// | `AWS_ENDPOINT_URL` | Used if `AWS_ENDPOINT_URL_DYNAMODB` is not set. |
    /// | `AWS_REGION` | The region identifier. See [`HandleBuilder::region()`]. |
    /// | `AWS_DEFAULT_REGION` | Used if `AWS_REGION` is not set. |
    /// | `AWS_PROFILE` | The profile to read from the shared credentials and config files. Defaults to `default`. |
    /// | `AWS_SHARED_CREDENTIALS_FILE` | The shared credentials file. Defaults to `~/.aws/credentials`. |
    /// | `AWS_CONFIG_FILE` | The shared config file. Defaults to `~/.aws/config`. |
    /// | `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_SESSION_TOKEN` | Credentials. These take precedence over the profile. |
    /// | `AWS_CA_BUNDLE` | A PEM file with an extra root certificate (see [`HandleBuilder::add_cert_from_pemfile()`]). |
    /// | `AWS_MAX_ATTEMPTS` | The total number of attempts per request, including the first. |
    /// | `AWS_DYNAMODB_MODE` | `cloud` (the default) or `local`. See [`HandleMode`]. |
    ///
    /// If no region is set, the `region` of the profile in the config file is used.
    /// Credentials already given with [`HandleBuilder::credentials()`] or
    /// [`HandleBuilder::credentials_provider()`] are kept.
    pub fn from_environment(self) -> Result<Self, DynamoError> {
        self.from_vars(|name| env::var(name).ok())
    }

    pub(crate) fn from_vars<F>(mut self, var: F) -> Result<Self, DynamoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| var(name).filter(|v| !v.trim().is_empty());
        self.from_environment = true;
        if let Some(val) = var("AWS_DYNAMODB_MODE") {
            match val.to_lowercase().as_str() {
                "cloud" => self = self.mode(HandleMode::Cloud)?,
                "local" => self = self.mode(HandleMode::Local)?,
                v => return ia_err!("invalid value '{}' for AWS_DYNAMODB_MODE", v),
            }
        }
        if let Some(val) = var("AWS_ENDPOINT_URL_DYNAMODB").or_else(|| var("AWS_ENDPOINT_URL")) {
            self = self.endpoint(&val)?;
        }
        if let Some(val) = var("AWS_REGION").or_else(|| var("AWS_DEFAULT_REGION")) {
            self = self.region(&val)?;
        }
        let profile = var("AWS_PROFILE").unwrap_or_else(|| DEFAULT_PROFILE.to_string());
        let credentials_file = var("AWS_SHARED_CREDENTIALS_FILE")
            .unwrap_or_else(|| DEFAULT_CREDENTIALS_FILE_PATH.to_string());
        let config_file =
            var("AWS_CONFIG_FILE").unwrap_or_else(|| DEFAULT_CONFIG_FILE_PATH.to_string());
        let pp = ProfileCredentialsProvider::new_from_files(&credentials_file, &config_file, &profile);
        if self.region.is_none() {
            if let Some(r) = pp.region() {
                self = self.region(&r)?;
            }
        }
        // credentials set on the builder are kept
        if self.credentials_provider.is_none()
            && (self.mode == HandleMode::Cloud || var("AWS_ACCESS_KEY_ID").is_some())
        {
            self.credentials_provider = Some(Box::new(ChainCredentialsProvider::env_then_profile(pp)));
        }
        if let Some(val) = var("AWS_CA_BUNDLE") {
            self = self.add_cert_from_pemfile(&val)?;
        }
        if let Some(val) = var("AWS_MAX_ATTEMPTS") {
            match val.trim().parse::<u32>() {
                Ok(n) if n >= 1 => {
                    let d = RetryPolicy::default();
                    self.retry_policy = RetryPolicy::new(n - 1, d.base_delay(), d.max_delay());
                }
                _ => return ia_err!("invalid value '{}' for AWS_MAX_ATTEMPTS", val),
            }
        }
        Ok(self)
    }

    /// Set a specific endpoint connection to use.
    ///
    /// This is typically used with DynamoDB Local, or a proxy in front of the
    /// service. If the value has no scheme, `https://` is assumed. If no region
    /// has been set and the host has the form `dynamodb.<region>.amazonaws.com`,
    /// the region is taken from the host.
    ///
    /// Examples:
    /// ```text
    ///     // DynamoDB Local
    ///     http://localhost:8000
    ///
    ///     // Cloud service
    ///     https://dynamodb.eu-west-1.amazonaws.com
    /// ```
    pub fn endpoint(mut self, endpoint: &str) -> Result<Self, DynamoError> {
        let endpoint = endpoint.trim();
        let url = if endpoint.starts_with("https://") || endpoint.starts_with("http://") {
            Url::parse(endpoint)?
        } else {
            Url::parse(&format!("https://{}", endpoint))?
        };
        let host = match url.host_str() {
            Some(h) if !h.is_empty() => h.to_string(),
            _ => return ia_err!("endpoint '{}' has no host", endpoint),
        };
        if self.region.is_none() {
            self.region = Region::from_host(&host);
        }
        self.endpoint = Some(url);
        Ok(self)
    }

    /// Specify the region, such as `us-west-2`.
    ///
    /// The region is used in request signatures, and to derive the endpoint
    /// if none is set. The default region is `us-east-1`.
    pub fn region(mut self, region: &str) -> Result<Self, DynamoError> {
        self.region = Some(Region::new(region)?);
        Ok(self)
    }

    /// Set the mode for the handle.
    ///
    /// Use [`HandleMode::Local`] to connect to a DynamoDB Local instance.
    /// By default, HandleBuilder assumes [`HandleMode::Cloud`].
    pub fn mode(mut self, mode: HandleMode) -> Result<Self, DynamoError> {
        self.mode = mode;
        Ok(self)
    }

    /// Use the given credentials provider for all requests.
    pub fn credentials_provider(
        mut self,
        provider: Box<dyn CredentialsProvider>,
    ) -> Result<Self, DynamoError> {
        self.credentials_provider = Some(provider);
        Ok(self)
    }

    /// Use fixed credentials for all requests.
    pub fn credentials(self, credentials: Credentials) -> Result<Self, DynamoError> {
        credentials.validate()?;
        self.credentials_provider(Box::new(StaticCredentialsProvider::new(credentials)))
    }

    /// Read credentials (and, if no region is set, the region) from a named
    /// profile of `~/.aws/credentials` and `~/.aws/config`.
    pub fn profile(self, profile: &str) -> Result<Self, DynamoError> {
        self.profile_from_files(DEFAULT_CREDENTIALS_FILE_PATH, DEFAULT_CONFIG_FILE_PATH, profile)
    }

    /// Read credentials (and, if no region is set, the region) from a named
    /// profile of the given credentials and config files.
    pub fn profile_from_files(
        mut self,
        credentials_file: &str,
        config_file: &str,
        profile: &str,
    ) -> Result<Self, DynamoError> {
        let pp = ProfileCredentialsProvider::new_from_files(credentials_file, config_file, profile);
        if self.region.is_none() {
            if let Some(r) = pp.region() {
                self = self.region(&r)?;
            }
        }
        self.credentials_provider(Box::new(pp))
    }

    /// Add a root certificate to trust for https connections, from a file.
    ///
    /// The file must contain an x509 certificate in `PEM` file format.
    pub fn add_cert_from_pemfile(self, pemfile: &str) -> Result<Self, DynamoError> {
        let buf = file_to_string(pemfile)?.into_bytes();
        match reqwest::Certificate::from_pem(&buf) {
            Ok(cert) => self.add_cert(cert),
            Err(e) => ia_err!("error getting certificate from pemfile {}: {}", pemfile, e),
        }
    }

    /// Add a root certificate to trust for https connections.
    pub fn add_cert(mut self, cert: Certificate) -> Result<Self, DynamoError> {
        self.add_cert = Some(cert);
        Ok(self)
    }

    // see https://docs.rs/reqwest/latest/reqwest/struct.ClientBuilder.html#method.danger_accept_invalid_certs
    /// Allow https connection without validating certificates.
    ///
    /// **Warning:** This is only recommended for local testing purposes. Its use is insecure. See [`reqwest::ClientBuilder::danger_accept_invalid_certs()`] for details.
    ///
    pub fn danger_accept_invalid_certs(
        mut self,
        accept_invalid_certs: bool,
    ) -> Result<Self, DynamoError> {
        self.accept_invalid_certs = accept_invalid_certs;
        Ok(self)
    }

    /// Specify a [`reqwest::Client`] to use for all http/s connections.
    ///
    /// By default, the [`Handle`] creates an internal [`reqwest::Client`] to use for
    /// all communications. If your application already has a reqwest Client, you can pass that
    /// into the HandleBuilder to avoid creating multiple connection pools.
    pub fn reqwest_client(mut self, client: &Client) -> Result<Self, DynamoError> {
        self.client = Some(client.clone());
        Ok(self)
    }

    /// Specify the timeout used for operations.
    ///
    /// This is the total time allowed for a call, including all retries. It is
    /// also used as the connection timeout. The request timeout can be set on a
    /// per-request basis.
    ///
    /// The default timeout is 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Result<Self, DynamoError> {
        if timeout.is_zero() {
            return ia_err!("timeout must be greater than zero");
        }
        self.timeout = Some(timeout);
        Ok(self)
    }

    /// Specify how failed requests are retried. See [`RetryPolicy`].
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Result<Self, DynamoError> {
        self.retry_policy = policy;
        Ok(self)
    }

    /// Limit the number of requests in flight at once on this handle.
    ///
    /// Further calls wait for a running one to finish. By default there is no limit.
    pub fn max_concurrent_requests(mut self, max: usize) -> Result<Self, DynamoError> {
        if max == 0 {
            return ia_err!("max_concurrent_requests must be at least 1");
        }
        self.max_concurrent_requests = Some(max);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let m: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| m.get(name).cloned()
    }

    #[test]
    fn endpoint_forms() {
        let b = HandleBuilder::new().endpoint("localhost:8000").unwrap();
        assert_eq!(b.endpoint.as_ref().unwrap().as_str(), "https://localhost:8000/");
        assert_eq!(b.region, None);

        let b = HandleBuilder::new()
            .endpoint("https://dynamodb.ap-south-1.amazonaws.com")
            .unwrap();
        assert_eq!(b.region.as_ref().map(|r| r.id()), Some("ap-south-1"));

        // an explicit region is not replaced by the endpoint host
        let b = HandleBuilder::new()
            .region("us-west-2")
            .unwrap()
            .endpoint("dynamodb.ap-south-1.amazonaws.com")
            .unwrap();
        assert_eq!(b.region.as_ref().map(|r| r.id()), Some("us-west-2"));

        assert!(HandleBuilder::new().endpoint("http://").is_err());
    }

    #[test]
    fn settings_are_validated() {
        assert!(HandleBuilder::new().region("nowhere").is_err());
        assert!(HandleBuilder::new().timeout(Duration::ZERO).is_err());
        assert!(HandleBuilder::new().max_concurrent_requests(0).is_err());
        assert!(HandleBuilder::new().credentials(Credentials::new("", "x")).is_err());
        assert!(HandleBuilder::new().add_cert_from_pemfile("/no/such/cert.pem").is_err());
    }

    #[test]
    fn environment_settings() {
        let b = HandleBuilder::new()
            .from_vars(vars(&[
                ("AWS_DYNAMODB_MODE", "Local"),
                ("AWS_ENDPOINT_URL", "http://ddb:8000"),
                ("AWS_DEFAULT_REGION", "eu-west-3"),
                ("AWS_MAX_ATTEMPTS", "3"),
                ("AWS_SHARED_CREDENTIALS_FILE", "/no/such/credentials"),
                ("AWS_CONFIG_FILE", "/no/such/config"),
            ]))
            .unwrap();
        assert_eq!(b.mode, HandleMode::Local);
        assert_eq!(b.endpoint.as_ref().unwrap().as_str(), "http://ddb:8000/");
        assert_eq!(b.region.as_ref().map(|r| r.id()), Some("eu-west-3"));
        assert_eq!(b.retry_policy.max_retries(), 2);
        // local mode without keys keeps the dummy credentials
        assert!(b.credentials_provider.is_none());
        assert!(b.from_environment);
    }

    #[tokio::test]
    async fn environment_keeps_explicit_credentials() {
        let b = HandleBuilder::new()
            .credentials(Credentials::new("AKID", "SECRET"))
            .unwrap()
            .from_vars(vars(&[
                ("AWS_ACCESS_KEY_ID", "AKIDENV"),
                ("AWS_SECRET_ACCESS_KEY", "ENVSECRET"),
                ("AWS_SHARED_CREDENTIALS_FILE", "/no/such/credentials"),
                ("AWS_CONFIG_FILE", "/no/such/config"),
            ]))
            .unwrap();
        let p = b.credentials_provider.as_ref().unwrap();
        assert_eq!(p.name(), "static");
        assert_eq!(p.credentials().unwrap().access_key_id(), "AKID");

        // the same with nothing set in the environment, through build()
        let h = HandleBuilder::new()
            .credentials(Credentials::new("AKID", "SECRET"))
            .unwrap()
            .from_vars(|_| None)
            .unwrap()
            .build()
            .await
            .unwrap();
        assert_eq!(h.inner.credentials.name(), "static");
        assert_eq!(h.inner.credentials.credentials().unwrap().secret_access_key(), "SECRET");
    }

    #[test]
    fn environment_prefers_specific_variables() {
        let b = HandleBuilder::new()
            .from_vars(vars(&[
                ("AWS_ENDPOINT_URL_DYNAMODB", "http://one:1"),
                ("AWS_ENDPOINT_URL", "http://two:2"),
                ("AWS_REGION", "us-west-1"),
                ("AWS_DEFAULT_REGION", "us-west-2"),
                ("AWS_SHARED_CREDENTIALS_FILE", "/no/such/credentials"),
                ("AWS_CONFIG_FILE", "/no/such/config"),
            ]))
            .unwrap();
        assert_eq!(b.endpoint.as_ref().unwrap().host_str(), Some("one"));
        assert_eq!(b.region.as_ref().map(|r| r.id()), Some("us-west-1"));
        assert_eq!(
            b.credentials_provider.as_ref().map(|p| p.name()),
            Some("chain")
        );
    }

    #[test]
    fn environment_region_from_profile() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config");
        std::fs::write(&config, "[profile dev]\nregion = sa-east-1\n").unwrap();
        let config = config.display().to_string();
        let b = HandleBuilder::new()
            .from_vars(vars(&[
                ("AWS_PROFILE", "dev"),
                ("AWS_CONFIG_FILE", &config),
                ("AWS_SHARED_CREDENTIALS_FILE", "/no/such/credentials"),
            ]))
            .unwrap();
        assert_eq!(b.region.as_ref().map(|r| r.id()), Some("sa-east-1"));
    }

    #[test]
    fn bad_environment_values() {
        assert!(HandleBuilder::new()
            .from_vars(vars(&[("AWS_DYNAMODB_MODE", "onprem")]))
            .is_err());
        assert!(HandleBuilder::new()
            .from_vars(vars(&[
                ("AWS_MAX_ATTEMPTS", "0"),
                ("AWS_CONFIG_FILE", "/no/such/config"),
            ]))
            .is_err());
    }
}
