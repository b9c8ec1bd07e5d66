//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use serde_derive::{Deserialize, Serialize};
use std::collections::btree_map::Iter;
use std::collections::BTreeMap;

use crate::error::ia_err;
use crate::error::DynamoError;
use crate::types::{AttributeValue, DynamoBinary, FromAttributeValue, ToAttributeValue};

pub use dynamodb_rust_sdk_derive::*;

/// A single item in a DynamoDB table: a map of attribute names to [`AttributeValue`]s.
///
/// `Item` is used for full items (put, get, query and scan results) as well as for
/// primary keys and exclusive start keys. Attributes are kept sorted by name, so the
/// same item always marshals to the same JSON.
///
/// Items are typically built with the chainable [`column()`](Item::column) method:
/// ```no_run
/// use dynamodb_rust_sdk::types::*;
/// let item = Item::new()
///     .s("Artist", "No One You Know")
///     .s("SongTitle", "Call Me Today")
///     .n("Year", 2015)
///     .column("Genres", vec!["Country", "Pop"]);
/// ```
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item {
    pub(crate) m: BTreeMap<String, AttributeValue>,
}

impl Item {
    pub fn new() -> Self {
        Item { m: BTreeMap::new() }
    }

    /// Create an item from a JSON object in DynamoDB JSON form, for example
    /// `{"Id": {"N": "1"}, "Name": {"S": "Joe"}}`.
    pub fn from_json(json: &str) -> Result<Self, DynamoError> {
        match serde_json::from_str::<Item>(json) {
            Ok(i) => Ok(i),
            Err(e) => ia_err!("invalid item json: {}", e),
        }
    }

    /// Create an item from a plain JSON object, for example `{"Id": 1, "Name": "Joe"}`.
    ///
    /// Numbers become `N`, strings `S`, booleans `BOOL`, arrays `L`, objects `M` and
    /// nulls `NULL`.
    pub fn from_json_object(json: &serde_json::Value) -> Result<Self, DynamoError> {
        if let serde_json::Value::Object(o) = json {
            let mut item = Item::new();
            for (k, v) in o {
                item.put(k, v);
            }
            return Ok(item);
        }
        ia_err!("item json must be an object")
    }

    /// The item in DynamoDB JSON form.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.m.is_empty()
    }

    pub fn iter(&self) -> Iter<String, AttributeValue> {
        self.m.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.m.contains_key(name)
    }

    pub fn put(&mut self, name: &str, val: impl ToAttributeValue) {
        self.m.insert(name.to_string(), val.to_attribute_value());
    }

    pub fn column(mut self, name: &str, val: impl ToAttributeValue) -> Item {
        self.put(name, val);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        self.m.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.m.get(name)
    }

    /// Convert the named attribute to any type implementing [`FromAttributeValue`].
    ///
    /// A missing attribute is an error unless `T` is an `Option`.
    pub fn get_as<T: FromAttributeValue>(&self, name: &str) -> Result<T, DynamoError> {
        match self.m.get(name) {
            Some(av) => T::from_attribute_value(av),
            None => T::from_missing(name),
        }
    }

    pub fn put_s(&mut self, name: &str, val: &str) {
        self.m
            .insert(name.to_string(), AttributeValue::S(val.to_string()));
    }
    pub fn s(mut self, name: &str, val: &str) -> Item {
        self.put_s(name, val);
        self
    }
    pub fn get_s(&self, name: &str) -> Option<&str> {
        self.m.get(name).and_then(|v| v.as_s())
    }

    pub fn put_n(&mut self, name: &str, val: impl std::fmt::Display) {
        self.m.insert(name.to_string(), AttributeValue::number(val));
    }
    pub fn n(mut self, name: &str, val: impl std::fmt::Display) -> Item {
        self.put_n(name, val);
        self
    }
    /// The raw decimal string of a number attribute.
    pub fn get_n(&self, name: &str) -> Option<&str> {
        self.m.get(name).and_then(|v| v.as_n())
    }
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get_n(name).and_then(|s| s.parse::<i64>().ok())
    }
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get_n(name).and_then(|s| s.parse::<f64>().ok())
    }

    pub fn put_b(&mut self, name: &str, val: Vec<u8>) {
        self.m.insert(name.to_string(), AttributeValue::B(val));
    }
    pub fn b(mut self, name: &str, val: Vec<u8>) -> Item {
        self.put_b(name, val);
        self
    }
    pub fn get_b(&self, name: &str) -> Option<&Vec<u8>> {
        self.m.get(name).and_then(|v| v.as_b())
    }
    pub fn get_binary(&self, name: &str) -> Option<DynamoBinary> {
        self.get_b(name).map(|b| DynamoBinary::new(b.clone()))
    }

    pub fn put_bool(&mut self, name: &str, val: bool) {
        self.m.insert(name.to_string(), AttributeValue::Bool(val));
    }
    pub fn bool(mut self, name: &str, val: bool) -> Item {
        self.put_bool(name, val);
        self
    }
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.m.get(name).and_then(|v| v.as_bool())
    }

    pub fn put_null(&mut self, name: &str) {
        self.m.insert(name.to_string(), AttributeValue::Null(true));
    }
    pub fn null(mut self, name: &str) -> Item {
        self.put_null(name);
        self
    }

    pub fn get_m(&self, name: &str) -> Option<&Item> {
        self.m.get(name).and_then(|v| v.as_m())
    }

    pub fn get_l(&self, name: &str) -> Option<&Vec<AttributeValue>> {
        self.m.get(name).and_then(|v| v.as_l())
    }

    pub fn get_ss(&self, name: &str) -> Option<&Vec<String>> {
        self.m.get(name).and_then(|v| v.as_ss())
    }

    /// Check every attribute value. See [`AttributeValue::validate()`].
    pub fn validate(&self) -> Result<(), DynamoError> {
        for (k, v) in &self.m {
            if k.is_empty() {
                return ia_err!("attribute names must not be empty");
            }
            if let Err(mut e) = v.validate() {
                e.message = format!("attribute \"{}\": {}", k, e.message);
                return Err(e);
            }
        }
        Ok(())
    }
}

impl From<BTreeMap<String, AttributeValue>> for Item {
    fn from(m: BTreeMap<String, AttributeValue>) -> Self {
        Item { m }
    }
}

impl From<std::collections::HashMap<String, AttributeValue>> for Item {
    fn from(m: std::collections::HashMap<String, AttributeValue>) -> Self {
        Item {
            m: m.into_iter().collect(),
        }
    }
}

impl IntoIterator for Item {
    type Item = (String, AttributeValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.m.into_iter()
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

/// Trait that defines methods to convert to and from an [`Item`].
///
/// It is typically not necessary to implement this trait for structs. Instead,
/// use the [`derive@DynamoItem`] derive macro to automatically
/// have a struct implement this trait.
pub trait DynamoItem {
    /// Create a new [`Item`] based on the contents of `Self`.
    fn to_item(&self) -> Result<Item, DynamoError>;
    /// Populate `Self` with the contents of a given [`Item`].
    fn from_item(&mut self, item: &Item) -> Result<(), DynamoError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_and_getters() {
        let item = Item::new()
            .s("Artist", "No One You Know")
            .n("Year", 2015)
            .n("Price", 1.25)
            .bool("Explicit", false)
            .b("Cover", vec![0, 1, 2])
            .null("Label")
            .column("Tags", vec!["a", "b"])
            .column("Credits", Item::new().s("Producer", "Sam"));
        assert_eq!(item.len(), 8);
        assert_eq!(item.get_s("Artist"), Some("No One You Know"));
        assert_eq!(item.get_i64("Year"), Some(2015));
        assert_eq!(item.get_f64("Price"), Some(1.25));
        assert_eq!(item.get_bool("Explicit"), Some(false));
        assert_eq!(item.get_b("Cover"), Some(&vec![0, 1, 2]));
        assert!(item.get("Label").unwrap().is_null());
        assert_eq!(item.get_l("Tags").unwrap().len(), 2);
        assert_eq!(item.get_m("Credits").unwrap().get_s("Producer"), Some("Sam"));
        assert_eq!(item.get_s("Year"), None);
        assert_eq!(item.get_as::<Option<String>>("Label").unwrap(), None);
        assert_eq!(item.get_as::<Option<String>>("Nope").unwrap(), None);
        assert!(item.get_as::<String>("Nope").is_err());
    }

    #[test]
    fn json_forms() {
        let item = Item::from_json(r#"{"Id":{"N":"1"},"Name":{"S":"Joe"}}"#).unwrap();
        assert_eq!(item.get_i64("Id"), Some(1));
        // attributes marshal in name order
        assert_eq!(item.to_json(), r#"{"Id":{"N":"1"},"Name":{"S":"Joe"}}"#);
        assert!(Item::from_json(r#"{"Id":{"X":"1"}}"#).is_err());

        let j: serde_json::Value = serde_json::from_str(r#"{"Id":1,"Name":"Joe"}"#).unwrap();
        assert_eq!(Item::from_json_object(&j).unwrap(), item);
        assert!(Item::from_json_object(&serde_json::Value::Bool(true)).is_err());
    }

    #[test]
    fn validate_names_the_bad_attribute() {
        let item = Item::new().s("ok", "x").n("Bad", "1.2.3");
        let err = item.validate().unwrap_err();
        assert!(err.message.contains("\"Bad\""));
        assert!(Item::new().s("", "x").validate().is_err());
    }
}
