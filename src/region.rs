//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! AWS region identifiers and the DynamoDB endpoint for each.
use crate::error::{ia_err, DynamoError};

/// The region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// An AWS region identifier, such as `us-west-2`.
///
/// Any well-formed identifier is accepted, so regions launched after this
/// library was released can be used without an update.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    id: String,
}

impl Region {
    /// Validate and create a region from its identifier.
    ///
    /// An identifier is a lower-case, dash-separated list of at least three
    /// parts ending with a number, for example `ap-southeast-2` or
    /// `us-gov-west-1`.
    pub fn new(id: &str) -> Result<Region, DynamoError> {
        let id = id.trim().to_lowercase();
        let parts: Vec<&str> = id.split('-').collect();
        if parts.len() < 3
            || parts.iter().any(|p| p.is_empty())
            || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return ia_err!("invalid region identifier '{}'", id);
        }
        if let Some(last) = parts.last() {
            if last.parse::<u32>().is_err() {
                return ia_err!("invalid region identifier '{}': must end with a number", id);
            }
        }
        Ok(Region { id })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The domain suffix for endpoints in this region's partition.
    fn dns_suffix(&self) -> &'static str {
        if self.id.starts_with("cn-") {
            "amazonaws.com.cn"
        } else {
            "amazonaws.com"
        }
    }

    /// The https endpoint of DynamoDB in this region.
    pub fn dynamodb_endpoint(&self) -> String {
        format!("https://dynamodb.{}.{}", self.id, self.dns_suffix())
    }

    /// Infer the region from a DynamoDB endpoint host, such as
    /// `dynamodb.eu-west-1.amazonaws.com`.
    ///
    /// Returns `None` for hosts that do not follow that pattern (for example
    /// `localhost`).
    pub fn from_host(host: &str) -> Option<Region> {
        let rest = host.strip_prefix("dynamodb.")?;
        let (id, suffix) = rest.split_once('.')?;
        if !suffix.starts_with("amazonaws.com") {
            return None;
        }
        Region::new(id).ok()
    }
}

impl Default for Region {
    fn default() -> Self {
        Region {
            id: DEFAULT_REGION.to_string(),
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl std::str::FromStr for Region {
    type Err = DynamoError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints() {
        let r = Region::new("us-west-2").unwrap();
        assert_eq!(r.dynamodb_endpoint(), "https://dynamodb.us-west-2.amazonaws.com");
        let r: Region = "cn-north-1".parse().unwrap();
        assert_eq!(
            r.dynamodb_endpoint(),
            "https://dynamodb.cn-north-1.amazonaws.com.cn"
        );
        assert_eq!(
            Region::default().dynamodb_endpoint(),
            "https://dynamodb.us-east-1.amazonaws.com"
        );
        assert_eq!(Region::new(" EU-Central-1 ").unwrap().id(), "eu-central-1");
    }

    #[test]
    fn bad_identifiers() {
        for id in ["", "us", "us-east", "us-east-x", "us--1", "us_east-1", "us-east-1/"] {
            assert!(Region::new(id).is_err(), "{} should be rejected", id);
        }
        assert!(Region::new("us-gov-west-1").is_ok());
    }

    #[test]
    fn region_from_host() {
        assert_eq!(
            Region::from_host("dynamodb.eu-west-1.amazonaws.com").map(|r| r.id().to_string()),
            Some("eu-west-1".to_string())
        );
        assert_eq!(
            Region::from_host("dynamodb.cn-northwest-1.amazonaws.com.cn")
                .map(|r| r.id().to_string()),
            Some("cn-northwest-1".to_string())
        );
        assert_eq!(Region::from_host("localhost"), None);
        assert_eq!(Region::from_host("dynamodb.example.com"), None);
    }
}
