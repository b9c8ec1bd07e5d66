//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, Utc};
use serde_derive::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::str::FromStr;

use crate::error::ia_err;
use crate::error::DynamoError;
use crate::types::Item;

/// A byte array stored as a DynamoDB binary (`B`) attribute.
///
/// This is a simple wrapper around `Vec<u8>` so the [`ToAttributeValue`] and
/// [`FromAttributeValue`] traits can tell binary data apart from a list of numbers.
/// It is left as a pure public struct to allow direct setting and taking of the
/// underlying vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DynamoBinary {
    pub data: Vec<u8>,
}

impl DynamoBinary {
    pub fn new(data: Vec<u8>) -> Self {
        DynamoBinary { data }
    }
}

/// The data for a single attribute of an item.
///
/// Each variant maps to one of the DynamoDB data type descriptors, and serializes in the
/// DynamoDB JSON form, for example `{"S": "Hello"}` or `{"N": "123.45"}`.
///
/// Numbers are kept as strings so no precision is lost between the client and the
/// service. Use [`ToAttributeValue`] to build values from native Rust types, and
/// [`FromAttributeValue`] (or the typed getters on [`Item`]) to read them back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// A string.
    S(String),
    /// A number, sent as its decimal string representation.
    N(String),
    /// Binary data.
    #[serde(with = "super::base64_bytes")]
    B(Vec<u8>),
    /// A set of strings.
    #[serde(rename = "SS")]
    Ss(Vec<String>),
    /// A set of numbers.
    #[serde(rename = "NS")]
    Ns(Vec<String>),
    /// A set of binary values.
    #[serde(rename = "BS", with = "super::base64_bytes_vec")]
    Bs(Vec<Vec<u8>>),
    /// A map of attribute names to values.
    M(Item),
    /// An ordered list of values.
    L(Vec<AttributeValue>),
    /// An explicit null. The service always sends `true`.
    #[serde(rename = "NULL")]
    Null(bool),
    /// A boolean.
    #[serde(rename = "BOOL")]
    Bool(bool),
}

impl AttributeValue {
    /// Create a number value from any type that displays as a decimal number.
    pub fn number(n: impl std::fmt::Display) -> AttributeValue {
        AttributeValue::N(n.to_string())
    }

    pub fn null() -> AttributeValue {
        AttributeValue::Null(true)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null(_))
    }

    /// The DynamoDB data type descriptor for this value (`"S"`, `"N"`, `"SS"`, ...).
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::S(_) => "S",
            AttributeValue::N(_) => "N",
            AttributeValue::B(_) => "B",
            AttributeValue::Ss(_) => "SS",
            AttributeValue::Ns(_) => "NS",
            AttributeValue::Bs(_) => "BS",
            AttributeValue::M(_) => "M",
            AttributeValue::L(_) => "L",
            AttributeValue::Null(_) => "NULL",
            AttributeValue::Bool(_) => "BOOL",
        }
    }

    pub fn as_s(&self) -> Option<&str> {
        if let AttributeValue::S(s) = self {
            return Some(s);
        }
        None
    }

    pub fn as_n(&self) -> Option<&str> {
        if let AttributeValue::N(s) = self {
            return Some(s);
        }
        None
    }

    pub fn as_b(&self) -> Option<&Vec<u8>> {
        if let AttributeValue::B(b) = self {
            return Some(b);
        }
        None
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let AttributeValue::Bool(b) = self {
            return Some(*b);
        }
        None
    }

    pub fn as_m(&self) -> Option<&Item> {
        if let AttributeValue::M(m) = self {
            return Some(m);
        }
        None
    }

    pub fn as_l(&self) -> Option<&Vec<AttributeValue>> {
        if let AttributeValue::L(l) = self {
            return Some(l);
        }
        None
    }

    pub fn as_ss(&self) -> Option<&Vec<String>> {
        if let AttributeValue::Ss(v) = self {
            return Some(v);
        }
        None
    }

    pub fn as_ns(&self) -> Option<&Vec<String>> {
        if let AttributeValue::Ns(v) = self {
            return Some(v);
        }
        None
    }

    pub fn as_bs(&self) -> Option<&Vec<Vec<u8>>> {
        if let AttributeValue::Bs(v) = self {
            return Some(v);
        }
        None
    }

    /// Return the value of a number as a `BigDecimal`.
    pub fn as_big_decimal(&self) -> Result<BigDecimal, DynamoError> {
        if let AttributeValue::N(s) = self {
            return parse_number(s);
        }
        ia_err!("expected N value, actual: {}", self.type_name())
    }

    /// Check the value (recursively) for things the service would reject: numbers
    /// that do not parse, and empty sets.
    pub fn validate(&self) -> Result<(), DynamoError> {
        match self {
            AttributeValue::N(s) => {
                parse_number(s)?;
            }
            AttributeValue::Ss(v) => {
                if v.is_empty() {
                    return ia_err!("string set must not be empty");
                }
            }
            AttributeValue::Ns(v) => {
                if v.is_empty() {
                    return ia_err!("number set must not be empty");
                }
                for n in v {
                    parse_number(n)?;
                }
            }
            AttributeValue::Bs(v) => {
                if v.is_empty() {
                    return ia_err!("binary set must not be empty");
                }
            }
            AttributeValue::M(m) => m.validate()?,
            AttributeValue::L(l) => {
                for v in l {
                    v.validate()?;
                }
            }
            _ => (),
        }
        Ok(())
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(s) => write!(f, "{}", s),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}

fn parse_number(s: &str) -> Result<BigDecimal, DynamoError> {
    match BigDecimal::from_str(s.trim()) {
        Ok(n) => Ok(n),
        Err(e) => ia_err!("invalid number value \"{}\": {}", s, e),
    }
}

/// Conversion of a native Rust value into an [`AttributeValue`].
pub trait ToAttributeValue {
    fn to_attribute_value(&self) -> AttributeValue;
}

impl ToAttributeValue for AttributeValue {
    fn to_attribute_value(&self) -> AttributeValue {
        self.clone()
    }
}
impl<T: ToAttributeValue + ?Sized> ToAttributeValue for &T {
    fn to_attribute_value(&self) -> AttributeValue {
        (**self).to_attribute_value()
    }
}
impl ToAttributeValue for str {
    fn to_attribute_value(&self) -> AttributeValue {
        AttributeValue::S(self.to_string())
    }
}
impl ToAttributeValue for String {
    fn to_attribute_value(&self) -> AttributeValue {
        AttributeValue::S(self.clone())
    }
}
impl ToAttributeValue for bool {
    fn to_attribute_value(&self) -> AttributeValue {
        AttributeValue::Bool(*self)
    }
}

macro_rules! number_to_av {
    ($($t:ty),*) => {
        $(
            impl ToAttributeValue for $t {
                fn to_attribute_value(&self) -> AttributeValue {
                    AttributeValue::N(self.to_string())
                }
            }
        )*
    };
}

number_to_av!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64, BigDecimal);

impl ToAttributeValue for DynamoBinary {
    fn to_attribute_value(&self) -> AttributeValue {
        AttributeValue::B(self.data.clone())
    }
}
impl ToAttributeValue for Item {
    fn to_attribute_value(&self) -> AttributeValue {
        AttributeValue::M(self.clone())
    }
}
impl ToAttributeValue for DateTime<Utc> {
    fn to_attribute_value(&self) -> AttributeValue {
        AttributeValue::S(self.to_rfc3339())
    }
}
impl ToAttributeValue for DateTime<FixedOffset> {
    fn to_attribute_value(&self) -> AttributeValue {
        AttributeValue::S(self.to_rfc3339())
    }
}
impl<T: ToAttributeValue> ToAttributeValue for Option<T> {
    fn to_attribute_value(&self) -> AttributeValue {
        match self {
            Some(v) => v.to_attribute_value(),
            None => AttributeValue::Null(true),
        }
    }
}
impl<T: ToAttributeValue> ToAttributeValue for Vec<T> {
    fn to_attribute_value(&self) -> AttributeValue {
        AttributeValue::L(self.iter().map(|v| v.to_attribute_value()).collect())
    }
}
impl<T: ToAttributeValue> ToAttributeValue for HashMap<String, T> {
    fn to_attribute_value(&self) -> AttributeValue {
        let mut m = Item::new();
        for (k, v) in self {
            m.put(k, v);
        }
        AttributeValue::M(m)
    }
}
impl<T: ToAttributeValue> ToAttributeValue for BTreeMap<String, T> {
    fn to_attribute_value(&self) -> AttributeValue {
        let mut m = Item::new();
        for (k, v) in self {
            m.put(k, v);
        }
        AttributeValue::M(m)
    }
}
impl ToAttributeValue for HashSet<String> {
    fn to_attribute_value(&self) -> AttributeValue {
        // sorted so the same set always marshals to the same bytes
        let mut v: Vec<String> = self.iter().cloned().collect();
        v.sort();
        AttributeValue::Ss(v)
    }
}
impl ToAttributeValue for BTreeSet<String> {
    fn to_attribute_value(&self) -> AttributeValue {
        AttributeValue::Ss(self.iter().cloned().collect())
    }
}
impl ToAttributeValue for serde_json::Value {
    fn to_attribute_value(&self) -> AttributeValue {
        match self {
            serde_json::Value::Null => AttributeValue::Null(true),
            serde_json::Value::Bool(b) => AttributeValue::Bool(*b),
            serde_json::Value::Number(n) => AttributeValue::N(n.to_string()),
            serde_json::Value::String(s) => AttributeValue::S(s.clone()),
            serde_json::Value::Array(a) => {
                AttributeValue::L(a.iter().map(|v| v.to_attribute_value()).collect())
            }
            serde_json::Value::Object(o) => {
                let mut m = Item::new();
                for (k, v) in o {
                    m.put(k, v);
                }
                AttributeValue::M(m)
            }
        }
    }
}

/// Conversion of an [`AttributeValue`] into a native Rust value.
pub trait FromAttributeValue {
    fn from_attribute_value(av: &AttributeValue) -> Result<Self, DynamoError>
    where
        Self: Sized;

    /// Called when the attribute is not present in an item at all.
    ///
    /// The default is an error. `Option<T>` returns `None`.
    fn from_missing(name: &str) -> Result<Self, DynamoError>
    where
        Self: Sized,
    {
        ia_err!("attribute \"{}\" is missing from item", name)
    }
}

// a simple macro to make the following impls easier to read
macro_rules! fav {
    ($f:expr, $a:path, $b:literal) => {{
        if let $a(v) = $f {
            return Ok(v.clone());
        }
        ia_err!(
            "wrong type for attribute: expected {}, actual: {}",
            $b,
            $f.type_name()
        )
    }};
}

macro_rules! number_from_av {
    ($($t:ty),*) => {
        $(
            impl FromAttributeValue for $t {
                fn from_attribute_value(av: &AttributeValue) -> Result<Self, DynamoError> {
                    if let AttributeValue::N(s) = av {
                        return match s.trim().parse::<$t>() {
                            Ok(v) => Ok(v),
                            Err(e) => ia_err!(
                                "can't convert number \"{}\" to {}: {}",
                                s,
                                stringify!($t),
                                e
                            ),
                        };
                    }
                    ia_err!(
                        "wrong type for attribute: expected N, actual: {}",
                        av.type_name()
                    )
                }
            }
        )*
    };
}

number_from_av!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64);

impl FromAttributeValue for AttributeValue {
    fn from_attribute_value(av: &AttributeValue) -> Result<Self, DynamoError> {
        Ok(av.clone())
    }
}
impl FromAttributeValue for String {
    fn from_attribute_value(av: &AttributeValue) -> Result<Self, DynamoError> {
        fav! {av, AttributeValue::S, "S"}
    }
}
impl FromAttributeValue for bool {
    fn from_attribute_value(av: &AttributeValue) -> Result<Self, DynamoError> {
        fav! {av, AttributeValue::Bool, "BOOL"}
    }
}
impl FromAttributeValue for BigDecimal {
    fn from_attribute_value(av: &AttributeValue) -> Result<Self, DynamoError> {
        av.as_big_decimal()
    }
}
impl FromAttributeValue for Item {
    fn from_attribute_value(av: &AttributeValue) -> Result<Self, DynamoError> {
        fav! {av, AttributeValue::M, "M"}
    }
}
impl FromAttributeValue for DynamoBinary {
    fn from_attribute_value(av: &AttributeValue) -> Result<Self, DynamoError> {
        if let AttributeValue::B(v) = av {
            return Ok(DynamoBinary { data: v.clone() });
        }
        ia_err!(
            "wrong type for attribute: expected B, actual: {}",
            av.type_name()
        )
    }
}
impl FromAttributeValue for DateTime<FixedOffset> {
    fn from_attribute_value(av: &AttributeValue) -> Result<Self, DynamoError> {
        if let AttributeValue::S(s) = av {
            return Ok(DateTime::parse_from_rfc3339(s)?);
        }
        ia_err!(
            "wrong type for timestamp attribute: expected S, actual: {}",
            av.type_name()
        )
    }
}
impl FromAttributeValue for DateTime<Utc> {
    fn from_attribute_value(av: &AttributeValue) -> Result<Self, DynamoError> {
        let t = DateTime::<FixedOffset>::from_attribute_value(av)?;
        Ok(t.with_timezone(&Utc))
    }
}
impl<T: FromAttributeValue> FromAttributeValue for Option<T> {
    fn from_attribute_value(av: &AttributeValue) -> Result<Self, DynamoError> {
        if av.is_null() {
            return Ok(None);
        }
        Ok(Some(T::from_attribute_value(av)?))
    }

    fn from_missing(_name: &str) -> Result<Self, DynamoError> {
        Ok(None)
    }
}
impl<T: FromAttributeValue> FromAttributeValue for Vec<T> {
    fn from_attribute_value(av: &AttributeValue) -> Result<Self, DynamoError> {
        if let AttributeValue::L(v) = av {
            let mut v1: Vec<T> = Vec::with_capacity(v.len());
            for i in v {
                v1.push(T::from_attribute_value(i)?);
            }
            return Ok(v1);
        }
        ia_err!(
            "wrong type for attribute: expected L, actual: {}",
            av.type_name()
        )
    }
}
impl<T: FromAttributeValue> FromAttributeValue for HashMap<String, T> {
    fn from_attribute_value(av: &AttributeValue) -> Result<Self, DynamoError> {
        if let AttributeValue::M(m) = av {
            let mut m1: HashMap<String, T> = HashMap::new();
            for (k, v) in m.iter() {
                m1.insert(k.to_string(), T::from_attribute_value(v)?);
            }
            return Ok(m1);
        }
        ia_err!(
            "wrong type for attribute: expected M, actual: {}",
            av.type_name()
        )
    }
}
impl<T: FromAttributeValue> FromAttributeValue for BTreeMap<String, T> {
    fn from_attribute_value(av: &AttributeValue) -> Result<Self, DynamoError> {
        if let AttributeValue::M(m) = av {
            let mut m1: BTreeMap<String, T> = BTreeMap::new();
            for (k, v) in m.iter() {
                m1.insert(k.to_string(), T::from_attribute_value(v)?);
            }
            return Ok(m1);
        }
        ia_err!(
            "wrong type for attribute: expected M, actual: {}",
            av.type_name()
        )
    }
}
impl FromAttributeValue for HashSet<String> {
    fn from_attribute_value(av: &AttributeValue) -> Result<Self, DynamoError> {
        if let AttributeValue::Ss(v) = av {
            return Ok(v.iter().cloned().collect());
        }
        ia_err!(
            "wrong type for attribute: expected SS, actual: {}",
            av.type_name()
        )
    }
}
impl FromAttributeValue for BTreeSet<String> {
    fn from_attribute_value(av: &AttributeValue) -> Result<Self, DynamoError> {
        if let AttributeValue::Ss(v) = av {
            return Ok(v.iter().cloned().collect());
        }
        ia_err!(
            "wrong type for attribute: expected SS, actual: {}",
            av.type_name()
        )
    }
}

/// Reads a single named attribute out of an [`Item`].
///
/// This is implemented for every [`FromAttributeValue`] type and is used by the
/// [`derive@DynamoItem`](crate::DynamoItem) macro. The `&self` receiver only
/// drives type inference for the field being populated.
pub trait FromItemAttribute {
    fn from_item_attribute(&self, name: &str, item: &Item) -> Result<Self, DynamoError>
    where
        Self: Sized;
}

impl<T: FromAttributeValue> FromItemAttribute for T {
    fn from_item_attribute(&self, name: &str, item: &Item) -> Result<Self, DynamoError> {
        match item.get(name) {
            Some(av) => T::from_attribute_value(av),
            None => T::from_missing(name),
        }
    }
}
