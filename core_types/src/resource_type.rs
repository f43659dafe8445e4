//! Resource type tags

use serde::{Deserialize, Serialize};
use std::fmt;

/// Free-form tag naming what kind of thing a resource represents
///
/// Examples: "Host", "User", "Project". The tree attaches no meaning to the
/// tag; it is stored and returned verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceType(String);

impl ResourceType {
    /// Creates a new resource type tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Returns the tag as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ResourceType {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ResourceType {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_from() {
        let a: ResourceType = "Host".into();
        let b: ResourceType = "Host".to_string().into();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "Host");
    }

    #[test]
    fn test_resource_type_display() {
        assert_eq!(format!("{}", ResourceType::new("User")), "User");
    }

    #[test]
    fn test_serialization() {
        let tag = ResourceType::new("Project");
        let json = serde_json::to_string(&tag).unwrap();
        assert_eq!(json, "\"Project\"");

        let parsed: ResourceType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tag);
    }
}
