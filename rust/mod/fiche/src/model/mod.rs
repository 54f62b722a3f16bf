mod content;
mod folder;
mod location;
mod system;

pub use content::{Content, Image};
pub use folder::Folder;
pub use location::Location;
pub use system::System;

use serde::{Deserialize, Serialize};

/// Kind of a fiche. Content and Folders are split into two tabs per Location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Measure,
    Classification,
}

impl ContentType {
    /// Wire values accepted for `type`.
    pub const VALUES: &'static [&'static str] = &["measure", "classification"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Measure => "measure",
            ContentType::Classification => "classification",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "measure" => Some(ContentType::Measure),
            "classification" => Some(ContentType::Classification),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_wire_names() {
        assert_eq!(serde_json::to_string(&ContentType::Measure).unwrap(), "\"measure\"");
        assert_eq!(
            serde_json::from_str::<ContentType>("\"classification\"").unwrap(),
            ContentType::Classification
        );
        assert!(serde_json::from_str::<ContentType>("\"Measure\"").is_err());
    }

    #[test]
    fn content_type_parse_matches_values() {
        for v in ContentType::VALUES {
            assert_eq!(ContentType::parse(v).unwrap().as_str(), *v);
        }
        assert_eq!(ContentType::parse("other"), None);
    }
}
