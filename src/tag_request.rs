//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::auth_common::credentials_provider::Credentials;
use crate::error::{ia_err, DynamoError};
use crate::handle::Handle;
use crate::marshal::{validate_count, validate_not_empty, DynamoRequest, RequestOptions, MAX_ARN_LEN};
use crate::types::Tag;
use serde_derive::{Deserialize, Serialize};
use std::result::Result;
use std::time::Duration;

const MAX_TAGS: usize = 50;
const MAX_TAG_KEY_LEN: usize = 128;
const MAX_TAG_VALUE_LEN: usize = 256;

fn validate_resource_arn(arn: &str) -> Result<(), DynamoError> {
    validate_not_empty("resource ARN", arn)?;
    if !arn.starts_with("arn:") || arn.len() > MAX_ARN_LEN {
        return ia_err!("'{}' is not a valid resource ARN", arn);
    }
    Ok(())
}

fn validate_tag_key(key: &str) -> Result<(), DynamoError> {
    validate_not_empty("tag key", key)?;
    if key.chars().count() > MAX_TAG_KEY_LEN {
        return ia_err!("tag key '{}' is longer than {} characters", key, MAX_TAG_KEY_LEN);
    }
    if key.starts_with("aws:") {
        return ia_err!("tag key '{}' uses the reserved 'aws:' prefix", key);
    }
    Ok(())
}

/// Struct used for adding tags to a table, index or backup.
///
/// Tagging a key that already exists replaces its value.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagResourceRequest {
    pub(crate) resource_arn: String,
    pub(crate) tags: Vec<Tag>,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

/// TagResource returns an empty body.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct TagResourceResult {}

impl TagResourceRequest {
    pub fn new(resource_arn: &str) -> TagResourceRequest {
        TagResourceRequest {
            resource_arn: resource_arn.to_string(),
            ..Default::default()
        }
    }

    pub fn timeout(mut self, t: &Duration) -> Self {
        self.options.timeout = Some(*t);
        self
    }

    pub fn credentials(mut self, c: Credentials) -> Self {
        self.options.credentials = Some(c);
        self
    }

    pub fn tag(mut self, key: &str, value: &str) -> TagResourceRequest {
        self.tags.push(Tag::new(key, value));
        self
    }

    pub async fn execute(&self, h: &Handle) -> Result<TagResourceResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for TagResourceRequest {
    type Output = TagResourceResult;
    const OPERATION: &'static str = "TagResource";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_resource_arn(&self.resource_arn)?;
        validate_count("tags", self.tags.len(), MAX_TAGS)?;
        for t in &self.tags {
            validate_tag_key(&t.key)?;
            if t.value.chars().count() > MAX_TAG_VALUE_LEN {
                return ia_err!("value of tag '{}' is longer than {} characters", t.key, MAX_TAG_VALUE_LEN);
            }
        }
        Ok(())
    }
}

/// Struct used for removing tags from a resource.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UntagResourceRequest {
    pub(crate) resource_arn: String,
    pub(crate) tag_keys: Vec<String>,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

/// UntagResource returns an empty body.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct UntagResourceResult {}

impl UntagResourceRequest {
    pub fn new(resource_arn: &str) -> UntagResourceRequest {
        UntagResourceRequest {
            resource_arn: resource_arn.to_string(),
            ..Default::default()
        }
    }

    pub fn timeout(mut self, t: &Duration) -> Self {
        self.options.timeout = Some(*t);
        self
    }

    pub fn credentials(mut self, c: Credentials) -> Self {
        self.options.credentials = Some(c);
        self
    }

    pub fn tag_key(mut self, key: &str) -> UntagResourceRequest {
        self.tag_keys.push(key.to_string());
        self
    }

    pub async fn execute(&self, h: &Handle) -> Result<UntagResourceResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for UntagResourceRequest {
    type Output = UntagResourceResult;
    const OPERATION: &'static str = "UntagResource";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_resource_arn(&self.resource_arn)?;
        validate_count("tag keys", self.tag_keys.len(), MAX_TAGS)?;
        for k in &self.tag_keys {
            validate_tag_key(k)?;
        }
        Ok(())
    }
}

/// Struct used for listing the tags of a resource.
///
/// Results are paged with `NextToken`; [`ListTagsOfResourceRequest::execute_all()`]
/// reads every page.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTagsOfResourceRequest {
    pub(crate) resource_arn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) next_token: Option<String>,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTagsOfResourceResult {
    #[serde(default)]
    pub(crate) tags: Vec<Tag>,
    pub(crate) next_token: Option<String>,
}

impl ListTagsOfResourceResult {
    pub fn tags(&self) -> &Vec<Tag> {
        &self.tags
    }
    /// The value of the tag with the given key, if present.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }
    pub fn next_token(&self) -> Option<&str> {
        self.next_token.as_deref()
    }
}

impl ListTagsOfResourceRequest {
    pub fn new(resource_arn: &str) -> ListTagsOfResourceRequest {
        ListTagsOfResourceRequest {
            resource_arn: resource_arn.to_string(),
            ..Default::default()
        }
    }

    pub fn timeout(mut self, t: &Duration) -> Self {
        self.options.timeout = Some(*t);
        self
    }

    pub fn credentials(mut self, c: Credentials) -> Self {
        self.options.credentials = Some(c);
        self
    }

    pub fn next_token(mut self, token: &str) -> ListTagsOfResourceRequest {
        self.next_token = Some(token.to_string());
        self
    }

    pub async fn execute(&self, h: &Handle) -> Result<ListTagsOfResourceResult, DynamoError> {
        h.execute(self).await
    }

    pub async fn execute_all(&self, h: &Handle) -> Result<ListTagsOfResourceResult, DynamoError> {
        let mut req = self.clone();
        let mut res = ListTagsOfResourceResult::default();
        loop {
            let mut page = req.execute(h).await?;
            res.tags.append(&mut page.tags);
            match page.next_token {
                Some(t) => req.next_token = Some(t),
                None => return Ok(res),
            }
        }
    }
}

impl DynamoRequest for ListTagsOfResourceRequest {
    type Output = ListTagsOfResourceResult;
    const OPERATION: &'static str = "ListTagsOfResource";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_resource_arn(&self.resource_arn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARN: &str = "arn:aws:dynamodb:us-east-1:123456789012:table/Music";

    #[test]
    fn marshal_tag_resource() {
        let req = TagResourceRequest::new(ARN)
            .tag("Owner", "blueTeam")
            .tag("Stage", "prod");
        req.validate().unwrap();
        let v: serde_json::Value = serde_json::from_slice(&req.marshal().unwrap()).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "ResourceArn": ARN,
                "Tags": [{"Key": "Owner", "Value": "blueTeam"}, {"Key": "Stage", "Value": "prod"}]
            })
        );
        assert!(TagResourceRequest::new(ARN).validate().is_err());
        assert!(TagResourceRequest::new("Music").tag("a", "b").validate().is_err());
        assert!(TagResourceRequest::new(ARN).tag("aws:x", "b").validate().is_err());
        assert!(TagResourceRequest::new(ARN)
            .tag("Owner", &"v".repeat(MAX_TAG_VALUE_LEN + 1))
            .validate()
            .is_err());
    }

    #[test]
    fn marshal_untag_resource() {
        let req = UntagResourceRequest::new(ARN).tag_key("Owner");
        req.validate().unwrap();
        let v: serde_json::Value = serde_json::from_slice(&req.marshal().unwrap()).unwrap();
        assert_eq!(v, serde_json::json!({"ResourceArn": ARN, "TagKeys": ["Owner"]}));
        assert!(UntagResourceRequest::new(ARN).validate().is_err());
        UntagResourceRequest::unmarshal(b"{}").unwrap();
        TagResourceRequest::unmarshal(b"").unwrap();
    }

    #[test]
    fn unmarshal_tags() {
        let r = ListTagsOfResourceRequest::unmarshal(
            br#"{"Tags":[{"Key":"Owner","Value":"blueTeam"}],"NextToken":"t1"}"#,
        )
        .unwrap();
        assert_eq!(r.tag("Owner"), Some("blueTeam"));
        assert_eq!(r.tag("Stage"), None);
        assert_eq!(r.next_token(), Some("t1"));
    }
}
