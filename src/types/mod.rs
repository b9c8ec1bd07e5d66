//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Data types used in DynamoDB requests and results.
//!
//! [`AttributeValue`] and [`Item`] hold the data stored in tables. The remaining
//! types are the structured members of requests and results (table descriptions,
//! capacity units, backup details and so on). All of them serialize with the member
//! names used by the DynamoDB JSON API.
mod attribute_value;
mod backup;
mod batch;
mod common;
mod global_table;
mod item;
mod table;

pub use attribute_value::*;
pub use backup::*;
pub use batch::*;
pub use common::*;
pub use global_table::*;
pub use item::*;
pub use table::*;

pub use dynamodb_rust_sdk_derive::*;

// Binary attribute values are base64 strings on the wire.
pub(crate) mod base64_bytes {
    use base64::prelude::{Engine as _, BASE64_STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&BASE64_STANDARD.encode(v))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        BASE64_STANDARD
            .decode(s.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

pub(crate) mod base64_bytes_vec {
    use base64::prelude::{Engine as _, BASE64_STANDARD};
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &[Vec<u8>], s: S) -> Result<S::Ok, S::Error> {
        let mut seq = s.serialize_seq(Some(v.len()))?;
        for b in v {
            seq.serialize_element(&BASE64_STANDARD.encode(b))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Vec<u8>>, D::Error> {
        let strs = Vec::<String>::deserialize(d)?;
        let mut out = Vec::with_capacity(strs.len());
        for s in strs {
            out.push(
                BASE64_STANDARD
                    .decode(s.as_bytes())
                    .map_err(serde::de::Error::custom)?,
            );
        }
        Ok(out)
    }
}

// Timestamps are fractional epoch seconds on the wire.
pub(crate) mod epoch_seconds {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn to_f64(t: &DateTime<Utc>) -> f64 {
        t.timestamp_millis() as f64 / 1000.0
    }

    pub(crate) fn from_f64(v: f64) -> Option<DateTime<Utc>> {
        let millis = (v * 1000.0).round() as i64;
        Utc.timestamp_millis_opt(millis).single()
    }

    pub fn serialize<S: Serializer>(t: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(to_f64(t))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let v = f64::deserialize(d)?;
        from_f64(v).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {}", v)))
    }
}

pub(crate) mod epoch_seconds_opt {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match t {
            Some(t) => s.serialize_f64(super::epoch_seconds::to_f64(t)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<f64>::deserialize(d)? {
            Some(v) => super::epoch_seconds::from_f64(v)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {}", v))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_derive::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Stamped {
        #[serde(
            default,
            with = "epoch_seconds_opt",
            skip_serializing_if = "Option::is_none"
        )]
        at: Option<chrono::DateTime<Utc>>,
    }

    #[test]
    fn epoch_seconds_keep_millis() {
        let t = Utc.timestamp_millis_opt(1_700_000_000_250).unwrap();
        let s = serde_json::to_string(&Stamped { at: Some(t) }).unwrap();
        assert_eq!(s, r#"{"at":1700000000.25}"#);
        let back: Stamped = serde_json::from_str(&s).unwrap();
        assert_eq!(back.at, Some(t));
        let empty: Stamped = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.at, None);
        assert_eq!(serde_json::to_string(&empty).unwrap(), "{}");
    }
}
