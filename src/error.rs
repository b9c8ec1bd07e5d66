//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::types::CancellationReason;
use serde_derive::Deserialize;

include!(concat!(env!("OUT_DIR"), "/ua.rs"));

pub(crate) fn sdk_version() -> &'static str {
    SDK_VERSION
}

pub(crate) fn user_agent() -> &'static str {
    USER_AGENT
}

/// Error returned by every operation in this library.
///
/// Service-side errors carry the raw error type reported by DynamoDB, the request id
/// and the HTTP status code. Client-side errors (bad arguments, network failures,
/// unreadable responses) have none of these.
#[derive(Debug, Clone)]
pub struct DynamoError {
    pub code: ErrorCode,
    pub message: String,
    pub(crate) error_type: Option<String>,
    pub(crate) request_id: Option<String>,
    pub(crate) status_code: Option<u16>,
    pub(crate) cancellation_reasons: Vec<CancellationReason>,
}

/// Which side of the conversation caused an error.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ErrorType {
    /// The request was bad, or never reached the service.
    Client,
    /// The service failed to process a valid request.
    Service,
    Unknown,
}

impl std::error::Error for DynamoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl std::fmt::Display for DynamoError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "code={:?} message=\"{}\"", self.code, self.message)?;
        if let Some(rid) = &self.request_id {
            write!(f, " request_id={}", rid)?;
        }
        if let Some(status) = self.status_code {
            write!(f, " status={}", status)?;
        }
        Ok(())
    }
}

impl DynamoError {
    pub fn new(code: ErrorCode, msg: &str) -> DynamoError {
        DynamoError {
            code,
            message: msg.to_string(),
            error_type: None,
            request_id: None,
            status_code: None,
            cancellation_reasons: Vec::new(),
        }
    }

    /// The raw error type string returned by the service, without its namespace.
    ///
    /// This is `None` for client-side errors.
    pub fn error_type(&self) -> Option<&str> {
        self.error_type.as_deref()
    }

    /// The `x-amzn-RequestId` of the failed request, if the service returned one.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// The HTTP status code of the failed request, if a response was received.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// For [`ErrorCode::TransactionCanceled`], the per-item reasons the transaction was
    /// cancelled. The order matches the order of the items in the request.
    pub fn cancellation_reasons(&self) -> &Vec<CancellationReason> {
        &self.cancellation_reasons
    }

    /// Classify the error as caused by the client or by the service.
    pub fn error_kind(&self) -> ErrorType {
        if let Some(status) = self.status_code {
            if status >= 500 {
                return ErrorType::Service;
            }
            if status >= 400 {
                return ErrorType::Client;
            }
        }
        if self.code.is_client_side() {
            return ErrorType::Client;
        }
        ErrorType::Unknown
    }

    /// Returns true if retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        if self.code.is_retryable() {
            return true;
        }
        matches!(self.status_code, Some(s) if s >= 500)
    }

    /// Build a service error from a non-2xx http response.
    ///
    /// The error type is taken from the `__type` member of the JSON body if present,
    /// otherwise from the `x-amzn-ErrorType` header, otherwise it is derived from
    /// the http status alone.
    pub(crate) fn from_response(
        status: u16,
        request_id: Option<String>,
        error_type_header: Option<&str>,
        body: &[u8],
    ) -> DynamoError {
        let parsed: Option<ErrorBody> = serde_json::from_slice(body).ok();
        let mut etype: Option<String> = None;
        let mut message = String::new();
        let mut reasons: Vec<CancellationReason> = Vec::new();
        if let Some(eb) = parsed {
            etype = eb.error_type;
            message = eb.message.or(eb.message_upper).unwrap_or_default();
            reasons = eb.cancellation_reasons.unwrap_or_default();
        } else if !body.is_empty() {
            message = String::from_utf8_lossy(body).to_string();
        }
        if etype.is_none() {
            if let Some(h) = error_type_header {
                // header form is "Name:http://internal.amazon.com/..."
                etype = Some(h.split(':').next().unwrap_or(h).to_string());
            }
        }
        let short_type = etype.as_deref().map(strip_error_namespace);
        let code = match short_type {
            Some(t) => ErrorCode::from_error_type(t),
            None => ErrorCode::from_status(status),
        };
        if message.is_empty() {
            message = format!("http status {}", status);
        }
        DynamoError {
            code,
            message,
            error_type: short_type.map(|s| s.to_string()),
            request_id,
            status_code: Some(status),
            cancellation_reasons: reasons,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type")]
    error_type: Option<String>,
    message: Option<String>,
    #[serde(rename = "Message")]
    message_upper: Option<String>,
    #[serde(rename = "CancellationReasons")]
    cancellation_reasons: Option<Vec<CancellationReason>>,
}

// "com.amazonaws.dynamodb.v20120810#ResourceNotFoundException" -> "ResourceNotFoundException"
fn strip_error_namespace(t: &str) -> &str {
    match t.rfind('#') {
        Some(i) => &t[i + 1..],
        None => t,
    }
}

macro_rules! ia_error {
    ($($t:tt)*) => {{
        let m = format!($($t)*);
        DynamoError::new(
            crate::error::ErrorCode::IllegalArgument,
            &format!("{} ({})", m, crate::error::sdk_version()),
        )
    }};
}

pub(crate) use ia_error;

macro_rules! ia_err {
    ($($t:tt)*) => {{
        let m = format!($($t)*);
        Err(DynamoError::new(
            crate::error::ErrorCode::IllegalArgument,
            &format!("{} ({})", m, crate::error::sdk_version()),
        ))
    }};
}

pub(crate) use ia_err;

impl From<reqwest::Error> for DynamoError {
    fn from(e: reqwest::Error) -> Self {
        let code = if e.is_timeout() {
            ErrorCode::RequestTimeout
        } else if e.is_connect() || e.is_request() {
            ErrorCode::ConnectionError
        } else if e.is_decode() || e.is_body() {
            ErrorCode::BadResponse
        } else {
            ErrorCode::UnknownError
        };
        DynamoError::new(
            code,
            &format!("reqwest error: {} ({})", e, crate::error::sdk_version()),
        )
    }
}

impl From<reqwest::header::InvalidHeaderValue> for DynamoError {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        ia_error!("invalid header value: {}", e)
    }
}

impl From<url::ParseError> for DynamoError {
    fn from(e: url::ParseError) -> Self {
        ia_error!("error parsing url: {}", e)
    }
}

impl From<chrono::ParseError> for DynamoError {
    fn from(e: chrono::ParseError) -> Self {
        ia_error!("invalid datetime value: {}", e)
    }
}

impl From<std::io::Error> for DynamoError {
    fn from(e: std::io::Error) -> Self {
        ia_error!("i/o error: {}", e)
    }
}

impl From<serde_json::Error> for DynamoError {
    fn from(e: serde_json::Error) -> Self {
        DynamoError::new(
            ErrorCode::BadResponse,
            &format!("json error: {} ({})", e, crate::error::sdk_version()),
        )
    }
}

/// ErrorCode represents the kind of error.
///
/// The first group are the exceptions DynamoDB itself documents for its
/// operations. The second group are errors common to every AWS JSON
/// protocol service. The last group are raised by this library before a
/// request is sent or while reading its response.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ErrorCode {
    /// There is another ongoing conflicting backup control plane operation on the table.
    BackupInUse,
    /// Backup not found for the given BackupARN.
    BackupNotFound,
    /// A condition specified in the operation could not be evaluated to true.
    ConditionalCheckFailed,
    /// Backups have not yet been enabled for this table.
    ContinuousBackupsUnavailable,
    /// The specified global table already exists.
    GlobalTableAlreadyExists,
    /// The specified global table does not exist.
    GlobalTableNotFound,
    /// DynamoDB rejected the request because a client token was reused with different parameters.
    IdempotentParameterMismatch,
    /// The operation tried to access a nonexistent index.
    IndexNotFound,
    /// An error occurred on the server side.
    InternalServerError,
    /// An invalid restore time was specified.
    InvalidRestoreTime,
    /// An item collection is too large (local secondary indexes only).
    ItemCollectionSizeLimitExceeded,
    /// There is no limit to the number of daily on-demand backups, but the number of
    /// concurrent control plane operations is limited.
    LimitExceeded,
    /// Point in time recovery has not yet been enabled for this source table.
    PointInTimeRecoveryUnavailable,
    /// The request rate is too high for the provisioned throughput of the table.
    ///
    /// This is retried automatically with exponential backoff.
    ProvisionedThroughputExceeded,
    /// The specified replica is already part of the global table.
    ReplicaAlreadyExists,
    /// The specified replica is no longer part of the global table.
    ReplicaNotFound,
    /// Throughput exceeds the current throughput quota for the account.
    RequestLimitExceeded,
    /// The operation conflicts with the resource's availability.
    ResourceInUse,
    /// The operation tried to access a nonexistent table or index.
    ResourceNotFound,
    /// A target table with the specified name already exists.
    TableAlreadyExists,
    /// A target table with the specified name is either being created or deleted.
    TableInUse,
    /// A source table with the name TableName does not currently exist.
    TableNotFound,
    /// The entire transaction request was canceled.
    ///
    /// See [`DynamoError::cancellation_reasons()`].
    TransactionCanceled,
    /// Operation was rejected because there is an ongoing transaction for the item.
    TransactionConflict,
    /// The transaction with the given request token is already in progress.
    TransactionInProgress,

    /// The input fails to satisfy the constraints specified by the service.
    Validation,
    /// The request was denied due to request throttling.
    Throttling,
    /// The caller does not have permission to perform the action.
    AccessDenied,
    /// The access key id or security token is invalid.
    UnrecognizedClient,
    /// The request signature does not match the computed one.
    InvalidSignature,
    /// The request signature is missing required components.
    IncompleteSignature,
    /// The request did not include an access key or token.
    MissingAuthenticationToken,
    /// The security token included in the request is expired.
    ExpiredToken,
    /// The request body could not be parsed by the service.
    Serialization,
    /// The service is temporarily unable to handle the request.
    ServiceUnavailable,

    /// An argument given to this library is not valid. The request was not sent.
    IllegalArgument,
    /// The request did not complete within its timeout.
    RequestTimeout,
    /// A network connection to the endpoint could not be made or was lost.
    ConnectionError,
    /// The response from the service could not be read or unmarshalled.
    BadResponse,
    /// Credentials could not be obtained from the configured provider.
    CredentialsError,
    /// UnknownError represents an error this library does not recognize.
    UnknownError,
    /// InternalRetry is used internally for retry logic.
    InternalRetry,
}

impl ErrorCode {
    /// Map a service error type name (without namespace) to an error code.
    pub fn from_error_type(t: &str) -> ErrorCode {
        match t {
            "BackupInUseException" => ErrorCode::BackupInUse,
            "BackupNotFoundException" => ErrorCode::BackupNotFound,
            "ConditionalCheckFailedException" => ErrorCode::ConditionalCheckFailed,
            "ContinuousBackupsUnavailableException" => ErrorCode::ContinuousBackupsUnavailable,
            "GlobalTableAlreadyExistsException" => ErrorCode::GlobalTableAlreadyExists,
            "GlobalTableNotFoundException" => ErrorCode::GlobalTableNotFound,
            "IdempotentParameterMismatchException" => ErrorCode::IdempotentParameterMismatch,
            "IndexNotFoundException" => ErrorCode::IndexNotFound,
            "InternalServerError" | "InternalServerErrorException" | "InternalFailure" => {
                ErrorCode::InternalServerError
            }
            "InvalidRestoreTimeException" => ErrorCode::InvalidRestoreTime,
            "ItemCollectionSizeLimitExceededException" => {
                ErrorCode::ItemCollectionSizeLimitExceeded
            }
            "LimitExceededException" => ErrorCode::LimitExceeded,
            "PointInTimeRecoveryUnavailableException" => {
                ErrorCode::PointInTimeRecoveryUnavailable
            }
            "ProvisionedThroughputExceededException" => ErrorCode::ProvisionedThroughputExceeded,
            "ReplicaAlreadyExistsException" => ErrorCode::ReplicaAlreadyExists,
            "ReplicaNotFoundException" => ErrorCode::ReplicaNotFound,
            "RequestLimitExceeded" | "RequestLimitExceededException" => {
                ErrorCode::RequestLimitExceeded
            }
            "ResourceInUseException" => ErrorCode::ResourceInUse,
            "ResourceNotFoundException" => ErrorCode::ResourceNotFound,
            "TableAlreadyExistsException" => ErrorCode::TableAlreadyExists,
            "TableInUseException" => ErrorCode::TableInUse,
            "TableNotFoundException" => ErrorCode::TableNotFound,
            "TransactionCanceledException" => ErrorCode::TransactionCanceled,
            "TransactionConflictException" => ErrorCode::TransactionConflict,
            "TransactionInProgressException" => ErrorCode::TransactionInProgress,
            "ValidationException" => ErrorCode::Validation,
            "ThrottlingException" | "Throttling" => ErrorCode::Throttling,
            "AccessDeniedException" => ErrorCode::AccessDenied,
            "UnrecognizedClientException" => ErrorCode::UnrecognizedClient,
            "InvalidSignatureException" => ErrorCode::InvalidSignature,
            "IncompleteSignatureException" | "IncompleteSignature" => {
                ErrorCode::IncompleteSignature
            }
            "MissingAuthenticationTokenException" | "MissingAuthenticationToken" => {
                ErrorCode::MissingAuthenticationToken
            }
            "ExpiredTokenException" => ErrorCode::ExpiredToken,
            "SerializationException" => ErrorCode::Serialization,
            "ServiceUnavailable" | "ServiceUnavailableException" => ErrorCode::ServiceUnavailable,
            _ => ErrorCode::UnknownError,
        }
    }

    pub(crate) fn from_status(status: u16) -> ErrorCode {
        match status {
            400 => ErrorCode::Validation,
            403 => ErrorCode::AccessDenied,
            404 => ErrorCode::ResourceNotFound,
            413 => ErrorCode::Validation,
            429 => ErrorCode::Throttling,
            500 => ErrorCode::InternalServerError,
            503 => ErrorCode::ServiceUnavailable,
            _ => ErrorCode::UnknownError,
        }
    }

    /// Returns true for codes that are worth retrying with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCode::ProvisionedThroughputExceeded
                | ErrorCode::Throttling
                | ErrorCode::RequestLimitExceeded
                | ErrorCode::InternalServerError
                | ErrorCode::ServiceUnavailable
                | ErrorCode::ConnectionError
        )
    }

    /// Returns true for codes raised by this library itself, not by the service.
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            ErrorCode::IllegalArgument
                | ErrorCode::RequestTimeout
                | ErrorCode::ConnectionError
                | ErrorCode::BadResponse
                | ErrorCode::CredentialsError
                | ErrorCode::InternalRetry
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmarshal_namespaced_error_type() {
        let body = br#"{"__type":"com.amazonaws.dynamodb.v20120810#ResourceNotFoundException","message":"Requested resource not found"}"#;
        let e = DynamoError::from_response(400, Some("RID1".to_string()), None, body);
        assert_eq!(e.code, ErrorCode::ResourceNotFound);
        assert_eq!(e.message, "Requested resource not found");
        assert_eq!(e.error_type(), Some("ResourceNotFoundException"));
        assert_eq!(e.request_id(), Some("RID1"));
        assert_eq!(e.error_kind(), ErrorType::Client);
        assert!(!e.is_retryable());
    }

    #[test]
    fn unmarshal_upper_case_message() {
        let body = br#"{"__type":"com.amazon.coral.validate#ValidationException","Message":"1 validation error detected"}"#;
        let e = DynamoError::from_response(400, None, None, body);
        assert_eq!(e.code, ErrorCode::Validation);
        assert_eq!(e.message, "1 validation error detected");
    }

    #[test]
    fn unmarshal_from_header_when_body_is_not_json() {
        let e = DynamoError::from_response(
            503,
            None,
            Some("ServiceUnavailable:http://internal.amazon.com/coral/"),
            b"<html>unavailable</html>",
        );
        assert_eq!(e.code, ErrorCode::ServiceUnavailable);
        assert_eq!(e.message, "<html>unavailable</html>");
        assert_eq!(e.error_kind(), ErrorType::Service);
        assert!(e.is_retryable());
    }

    #[test]
    fn unmarshal_by_status_only() {
        let e = DynamoError::from_response(500, None, None, b"");
        assert_eq!(e.code, ErrorCode::InternalServerError);
        assert_eq!(e.message, "http status 500");
        assert!(e.is_retryable());
    }

    #[test]
    fn unmarshal_unknown_type_keeps_raw_name() {
        let body = br#"{"__type":"com.amazonaws.dynamodb.v20120810#SomeBrandNewException","message":"x"}"#;
        let e = DynamoError::from_response(400, None, None, body);
        assert_eq!(e.code, ErrorCode::UnknownError);
        assert_eq!(e.error_type(), Some("SomeBrandNewException"));
    }

    #[test]
    fn unmarshal_transaction_cancellation_reasons() {
        let body = br#"{"__type":"com.amazonaws.dynamodb.v20120810#TransactionCanceledException",
            "Message":"Transaction cancelled",
            "CancellationReasons":[{"Code":"None"},{"Code":"ConditionalCheckFailed","Message":"The conditional request failed"}]}"#;
        let e = DynamoError::from_response(400, None, None, body);
        assert_eq!(e.code, ErrorCode::TransactionCanceled);
        assert_eq!(e.cancellation_reasons().len(), 2);
        assert_eq!(
            e.cancellation_reasons()[1].code.as_deref(),
            Some("ConditionalCheckFailed")
        );
    }

    #[test]
    fn transaction_conflicts_are_not_retried() {
        let body = br#"{"__type":"com.amazonaws.dynamodb.v20120810#TransactionInProgressException","message":"busy"}"#;
        let e = DynamoError::from_response(400, None, None, body);
        assert_eq!(e.code, ErrorCode::TransactionInProgress);
        assert!(!e.is_retryable());
        assert!(!ErrorCode::TransactionConflict.is_retryable());
        assert!(ErrorCode::RequestLimitExceeded.is_retryable());
        assert!(ErrorCode::ConnectionError.is_retryable());
    }

    #[test]
    fn ia_errors_carry_sdk_version() {
        let e = ia_error!("bad value {}", 5);
        assert_eq!(e.code, ErrorCode::IllegalArgument);
        assert!(e.message.starts_with("bad value 5 ("));
        assert!(e.message.contains(sdk_version()));
        assert_eq!(e.error_kind(), ErrorType::Client);
    }
}
