//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! AWS Signature Version 4 request signing.
use crate::auth_common::credentials_provider::Credentials;
use crate::error::{ia_err, DynamoError};
use chrono::prelude::*;
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use sha2::{Digest, Sha256};
use tracing::trace;
use url::Url;

type HmacSha256 = Hmac<Sha256>;

static ALGORITHM: &str = "AWS4-HMAC-SHA256";
static DATE_HEADER: &str = "x-amz-date";
static HOST_HEADER: &str = "host";
static SECURITY_TOKEN_HEADER: &str = "x-amz-security-token";
static AUTHORIZATION_HEADER: &str = "authorization";
static TERMINATOR: &str = "aws4_request";

/// What a request is signed for.
#[derive(Debug, Clone)]
pub(crate) struct SigningParams<'a> {
    pub(crate) credentials: &'a Credentials,
    pub(crate) region: &'a str,
    pub(crate) service: &'a str,
    pub(crate) time: DateTime<Utc>,
}

/// Sign a request, adding the `host`, `x-amz-date`, `x-amz-security-token` (for
/// temporary credentials) and `authorization` headers to `headers`.
///
/// Every header present in `headers` when this is called is signed. Headers that
/// may be changed by proxies (such as `user-agent`) should be added afterwards.
pub(crate) fn sign_request(
    method: &Method,
    url: &Url,
    headers: &mut HeaderMap,
    payload: &[u8],
    params: &SigningParams,
) -> Result<(), DynamoError> {
    let amz_date = params.time.format("%Y%m%dT%H%M%SZ").to_string();
    let date = params.time.format("%Y%m%d").to_string();

    if !headers.contains_key(HOST_HEADER) {
        headers.insert(HOST_HEADER, HeaderValue::from_str(&host_header(url)?)?);
    }
    headers.insert(DATE_HEADER, HeaderValue::from_str(&amz_date)?);
    if let Some(token) = params.credentials.session_token() {
        headers.insert(SECURITY_TOKEN_HEADER, HeaderValue::from_str(token)?);
    }
    headers.remove(AUTHORIZATION_HEADER);

    let (canonical_headers, signed_headers) = canonical_headers(headers)?;
    let canonical_request = format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        method.as_str(),
        canonical_uri(url),
        canonical_query(url),
        canonical_headers,
        signed_headers,
        hex_sha256(payload)
    );
    trace!("canonical request:\n{}", canonical_request);

    let scope = format!(
        "{}/{}/{}/{}",
        date, params.region, params.service, TERMINATOR
    );
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        amz_date,
        scope,
        hex_sha256(canonical_request.as_bytes())
    );
    let key = signing_key(
        params.credentials.secret_access_key(),
        &date,
        params.region,
        params.service,
    )?;
    let signature = to_hex(&hmac(&key, string_to_sign.as_bytes())?);
    let authorization = format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM,
        params.credentials.access_key_id(),
        scope,
        signed_headers,
        signature
    );
    headers.insert(AUTHORIZATION_HEADER, HeaderValue::from_str(&authorization)?);
    Ok(())
}

// host[:port], with the port only if it is not the scheme default
fn host_header(url: &Url) -> Result<String, DynamoError> {
    let host = match url.host_str() {
        Some(h) => h,
        None => return ia_err!("no host in url {}", url),
    };
    match url.port() {
        Some(p) => Ok(format!("{}:{}", host, p)),
        None => Ok(host.to_string()),
    }
}

pub(crate) fn signing_key(
    secret: &str,
    date: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>, DynamoError> {
    let k_date = hmac(format!("AWS4{}", secret).as_bytes(), date.as_bytes())?;
    let k_region = hmac(&k_date, region.as_bytes())?;
    let k_service = hmac(&k_region, service.as_bytes())?;
    hmac(&k_service, TERMINATOR.as_bytes())
}

fn hmac(key: &[u8], data: &[u8]) -> Result<Vec<u8>, DynamoError> {
    let mut mac = match HmacSha256::new_from_slice(key) {
        Ok(m) => m,
        Err(e) => return ia_err!("invalid signing key: {}", e),
    };
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn hex_sha256(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

fn to_hex(data: &[u8]) -> String {
    let mut s = String::with_capacity(data.len() * 2);
    for b in data {
        s.push_str(&format!("{:02x}", b));
    }
    s
}

// RFC 3986 unreserved characters pass through, everything else is %XX encoded.
fn uri_encode(s: &str, encode_slash: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            b'/' if !encode_slash => out.push('/'),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

fn canonical_uri(url: &Url) -> String {
    let path = url.path();
    if path.is_empty() {
        return "/".to_string();
    }
    // the path from Url is already percent-encoded once; non-S3 services
    // expect each segment to be encoded again
    uri_encode(path, false)
}

fn canonical_query(url: &Url) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (uri_encode(&k, true), uri_encode(&v, true)))
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<String>>()
        .join("&")
}

// Returns (canonical headers block, signed header list).
fn canonical_headers(headers: &HeaderMap) -> Result<(String, String), DynamoError> {
    let mut names: Vec<&HeaderName> = headers.keys().collect();
    // HeaderName is always lower case
    names.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    let mut block = String::new();
    for name in &names {
        let mut values: Vec<String> = Vec::new();
        for v in headers.get_all(*name) {
            let s = match v.to_str() {
                Ok(s) => s,
                Err(_) => return ia_err!("header {} has a non-ascii value", name),
            };
            values.push(collapse_whitespace(s));
        }
        block.push_str(name.as_str());
        block.push(':');
        block.push_str(&values.join(","));
        block.push('\n');
    }
    let signed = names
        .iter()
        .map(|n| n.as_str())
        .collect::<Vec<&str>>()
        .join(";");
    Ok((block, signed))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<&str>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_credentials() -> Credentials {
        Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
    }

    #[test]
    fn derived_signing_key() {
        let key = signing_key(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "20120215",
            "us-east-1",
            "iam",
        )
        .unwrap();
        assert_eq!(
            to_hex(&key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn get_vanilla() {
        let creds = example_credentials();
        let params = SigningParams {
            credentials: &creds,
            region: "us-east-1",
            service: "service",
            time: Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap(),
        };
        let url = Url::parse("https://example.amazonaws.com/").unwrap();
        let mut headers = HeaderMap::new();
        sign_request(&Method::GET, &url, &mut headers, b"", &params).unwrap();
        assert_eq!(headers["x-amz-date"], "20150830T123600Z");
        assert_eq!(headers["host"], "example.amazonaws.com");
        assert_eq!(
            headers["authorization"],
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
             SignedHeaders=host;x-amz-date, \
             Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
        );
    }

    #[test]
    fn session_token_is_signed() {
        let creds = Credentials::with_session_token("AKID", "SECRET", "TOKEN");
        let params = SigningParams {
            credentials: &creds,
            region: "eu-west-1",
            service: "dynamodb",
            time: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        };
        let url = Url::parse("http://localhost:8000/").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-amz-target", HeaderValue::from_static("DynamoDB_20120810.ListTables"));
        sign_request(&Method::POST, &url, &mut headers, b"{}", &params).unwrap();
        assert_eq!(headers["host"], "localhost:8000");
        assert_eq!(headers["x-amz-security-token"], "TOKEN");
        let auth = headers["authorization"].to_str().unwrap();
        assert!(auth.starts_with(
            "AWS4-HMAC-SHA256 Credential=AKID/20240102/eu-west-1/dynamodb/aws4_request, "
        ));
        assert!(auth.contains("SignedHeaders=host;x-amz-date;x-amz-security-token;x-amz-target,"));
    }

    #[test]
    fn canonical_parts() {
        let url = Url::parse("https://example.com/a b/c?b=2&a=1&a=0&sp=x y").unwrap();
        assert_eq!(canonical_uri(&url), "/a%2520b/c");
        assert_eq!(canonical_query(&url), "a=0&a=1&b=2&sp=x%20y");
        assert_eq!(collapse_whitespace("  a   b  c "), "a b c");
        assert_eq!(
            hex_sha256(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
