//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::auth_common::credentials_provider::Credentials;
use crate::error::{ia_err, DynamoError};
use crate::handle::Handle;
use crate::marshal::{validate_index_name, validate_table_name, DynamoRequest, RequestOptions};
use crate::types::{
    epoch_seconds_opt, ContributorInsightsAction, ContributorInsightsStatus,
    ContributorInsightsSummary, FailureException,
};
use chrono::{DateTime, Utc};
use serde_derive::{Deserialize, Serialize};
use std::result::Result;
use std::time::Duration;

const MAX_LIST_CONTRIBUTOR_INSIGHTS: u32 = 100;

/// Struct used for reading the contributor insights status of a table or index.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeContributorInsightsRequest {
    pub(crate) table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) index_name: Option<String>,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeContributorInsightsResult {
    pub(crate) table_name: Option<String>,
    pub(crate) index_name: Option<String>,
    #[serde(default)]
    pub(crate) contributor_insights_rule_list: Vec<String>,
    pub(crate) contributor_insights_status: Option<ContributorInsightsStatus>,
    #[serde(default, with = "epoch_seconds_opt")]
    pub(crate) last_update_date_time: Option<DateTime<Utc>>,
    pub(crate) failure_exception: Option<FailureException>,
}

impl DescribeContributorInsightsResult {
    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }
    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }
    /// The CloudWatch Contributor Insights rules of the table or index.
    pub fn contributor_insights_rule_list(&self) -> &Vec<String> {
        &self.contributor_insights_rule_list
    }
    pub fn contributor_insights_status(&self) -> Option<ContributorInsightsStatus> {
        self.contributor_insights_status
    }
    pub fn last_update_date_time(&self) -> Option<DateTime<Utc>> {
        self.last_update_date_time
    }
    /// Set when the status is `FAILED`.
    pub fn failure_exception(&self) -> Option<&FailureException> {
        self.failure_exception.as_ref()
    }
}

impl DescribeContributorInsightsRequest {
    pub fn new(table_name: &str) -> DescribeContributorInsightsRequest {
        DescribeContributorInsightsRequest {
            table_name: table_name.to_string(),
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

    pub fn index_name(mut self, index_name: &str) -> DescribeContributorInsightsRequest {
        self.index_name = Some(index_name.to_string());
        self
    }

    pub async fn execute(
        &self,
        h: &Handle,
    ) -> Result<DescribeContributorInsightsResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for DescribeContributorInsightsRequest {
    type Output = DescribeContributorInsightsResult;
    const OPERATION: &'static str = "DescribeContributorInsights";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_table_name(&self.table_name)?;
        if let Some(i) = &self.index_name {
            validate_index_name(i)?;
        }
        Ok(())
    }
}

/// Struct used for listing the contributor insights summaries of all
/// tables, or of one table and its indexes.
#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListContributorInsightsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) table_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) next_token: Option<String>,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListContributorInsightsResult {
    #[serde(default)]
    pub(crate) contributor_insights_summaries: Vec<ContributorInsightsSummary>,
    pub(crate) next_token: Option<String>,
}

impl ListContributorInsightsResult {
    pub fn contributor_insights_summaries(&self) -> &Vec<ContributorInsightsSummary> {
        &self.contributor_insights_summaries
    }
    pub fn next_token(&self) -> Option<&str> {
        self.next_token.as_deref()
    }
}

impl ListContributorInsightsRequest {
    pub fn new() -> ListContributorInsightsRequest {
        ListContributorInsightsRequest::default()
    }

    pub fn timeout(mut self, t: &Duration) -> Self {
        self.options.timeout = Some(*t);
        self
    }

    pub fn credentials(mut self, c: Credentials) -> Self {
        self.options.credentials = Some(c);
        self
    }

    pub fn table_name(mut self, table_name: &str) -> ListContributorInsightsRequest {
        self.table_name = Some(table_name.to_string());
        self
    }

    pub fn max_results(mut self, max: u32) -> ListContributorInsightsRequest {
        self.max_results = Some(max);
        self
    }

    pub fn next_token(mut self, token: &str) -> ListContributorInsightsRequest {
        self.next_token = Some(token.to_string());
        self
    }

    pub async fn execute(&self, h: &Handle) -> Result<ListContributorInsightsResult, DynamoError> {
        h.execute(self).await
    }

    pub async fn execute_all(
        &self,
        h: &Handle,
    ) -> Result<ListContributorInsightsResult, DynamoError> {
        let mut req = self.clone();
        let mut res = ListContributorInsightsResult::default();
        loop {
            let mut page = req.execute(h).await?;
            res.contributor_insights_summaries
                .append(&mut page.contributor_insights_summaries);
            match page.next_token {
                Some(t) => req.next_token = Some(t),
                None => return Ok(res),
            }
        }
    }
}

impl DynamoRequest for ListContributorInsightsRequest {
    type Output = ListContributorInsightsResult;
    const OPERATION: &'static str = "ListContributorInsights";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        if let Some(t) = &self.table_name {
            validate_table_name(t)?;
        }
        if let Some(m) = self.max_results {
            if m > MAX_LIST_CONTRIBUTOR_INSIGHTS {
                return ia_err!("max results must be at most {}", MAX_LIST_CONTRIBUTOR_INSIGHTS);
            }
        }
        Ok(())
    }
}

/// Struct used for enabling or disabling contributor insights on a table or index.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateContributorInsightsRequest {
    pub(crate) table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) index_name: Option<String>,
    pub(crate) contributor_insights_action: ContributorInsightsAction,
    #[serde(skip)]
    pub(crate) options: RequestOptions,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateContributorInsightsResult {
    pub(crate) table_name: Option<String>,
    pub(crate) index_name: Option<String>,
    pub(crate) contributor_insights_status: Option<ContributorInsightsStatus>,
}

impl UpdateContributorInsightsResult {
    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }
    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }
    pub fn contributor_insights_status(&self) -> Option<ContributorInsightsStatus> {
        self.contributor_insights_status
    }
}

impl UpdateContributorInsightsRequest {
    pub fn new(table_name: &str, enable: bool) -> UpdateContributorInsightsRequest {
        UpdateContributorInsightsRequest {
            table_name: table_name.to_string(),
            index_name: None,
            contributor_insights_action: if enable {
                ContributorInsightsAction::Enable
            } else {
                ContributorInsightsAction::Disable
            },
            options: RequestOptions::default(),
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

    pub fn index_name(mut self, index_name: &str) -> UpdateContributorInsightsRequest {
        self.index_name = Some(index_name.to_string());
        self
    }

    pub async fn execute(
        &self,
        h: &Handle,
    ) -> Result<UpdateContributorInsightsResult, DynamoError> {
        h.execute(self).await
    }
}

impl DynamoRequest for UpdateContributorInsightsRequest {
    type Output = UpdateContributorInsightsResult;
    const OPERATION: &'static str = "UpdateContributorInsights";

    fn options(&self) -> &RequestOptions {
        &self.options
    }

    fn validate(&self) -> Result<(), DynamoError> {
        validate_table_name(&self.table_name)?;
        if let Some(i) = &self.index_name {
            validate_index_name(i)?;
        }
        Ok(())
    }
}
