//! Structured attribute values stored on resources

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Attribute mapping of a resource (stable ordering via BTreeMap)
pub type Attributes = BTreeMap<String, AttributeValue>;

/// Attribute value (strongly typed)
///
/// Serialized untagged, so the JSON form of a value is the plain JSON value
/// (`null`, `true`, `42`, `1.5`, `"text"`, `{...}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Null value
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Text value
    Text(String),
    /// Nested mapping
    Map(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Returns true if this is null
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Tries to get as boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            AttributeValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Tries to get as integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Tries to get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Tries to get as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Tries to get as nested mapping
    pub fn as_map(&self) -> Option<&BTreeMap<String, AttributeValue>> {
        match self {
            AttributeValue::Map(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "null"),
            AttributeValue::Boolean(v) => write!(f, "{}", v),
            AttributeValue::Integer(v) => write!(f, "{}", v),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::Text(v) => write!(f, "{:?}", v),
            AttributeValue::Map(v) => write!(f, "{}", DisplayAttributes(v)),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Boolean(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Integer(v)
    }
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        AttributeValue::Integer(i64::from(v))
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Text(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::Text(v)
    }
}

impl From<Attributes> for AttributeValue {
    fn from(v: Attributes) -> Self {
        AttributeValue::Map(v)
    }
}

/// Builds an attribute mapping from key/value pairs
///
/// ```
/// use core_types::{attributes, AttributeValue};
///
/// let attrs = attributes([("ip", "localhost"), ("os", "Linux")]);
/// assert_eq!(attrs["ip"], AttributeValue::from("localhost"));
/// ```
pub fn attributes<I, K, V>(pairs: I) -> Attributes
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<AttributeValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Display adapter rendering a mapping as `{key: value, ...}`
pub struct DisplayAttributes<'a>(pub &'a Attributes);

impl fmt::Display for DisplayAttributes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessors() {
        assert_eq!(AttributeValue::from(true).as_boolean(), Some(true));
        assert_eq!(AttributeValue::from(5).as_integer(), Some(5));
        assert_eq!(AttributeValue::from(2.5).as_float(), Some(2.5));
        assert_eq!(AttributeValue::from("x").as_text(), Some("x"));
        assert!(AttributeValue::Null.is_null());
        assert_eq!(AttributeValue::from("x").as_integer(), None);
    }

    #[test]
    fn test_json_form_is_plain() {
        let attrs = attributes([
            ("port", AttributeValue::from(22)),
            ("ratio", AttributeValue::from(0.5)),
            ("scheme", AttributeValue::from("ssh")),
            ("enabled", AttributeValue::from(false)),
            ("owner", AttributeValue::Null),
        ]);
        let json = serde_json::to_string(&attrs).unwrap();
        assert_eq!(
            json,
            r#"{"enabled":false,"owner":null,"port":22,"ratio":0.5,"scheme":"ssh"}"#
        );
    }

    #[test]
    fn test_untagged_deserialization_picks_narrowest_variant() {
        let attrs: Attributes =
            serde_json::from_str(r#"{"a":1,"b":1.25,"c":"1","d":null,"e":{"f":true}}"#).unwrap();

        assert_eq!(attrs["a"], AttributeValue::Integer(1));
        assert_eq!(attrs["b"], AttributeValue::Float(1.25));
        assert_eq!(attrs["c"], AttributeValue::Text("1".to_string()));
        assert_eq!(attrs["d"], AttributeValue::Null);
        let nested = attrs["e"].as_map().unwrap();
        assert_eq!(nested["f"], AttributeValue::Boolean(true));
    }

    #[test]
    fn test_display_attributes() {
        let attrs = attributes([("ip", "localhost"), ("os", "Linux")]);
        assert_eq!(
            DisplayAttributes(&attrs).to_string(),
            r#"{ip: "localhost", os: "Linux"}"#
        );
        assert_eq!(DisplayAttributes(&Attributes::new()).to_string(), "{}");
    }
}
