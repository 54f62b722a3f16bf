//! Document schemas checked before any store mutation.
//!
//! Only the fields listed here are inspected. Anything else in a document is
//! accepted as-is.

use radfiche_core::ServiceError;
use serde_json::Value;

use crate::model::ContentType;

/// One constrained field of a document.
#[derive(Debug)]
pub struct FieldRule {
    pub name: &'static str,
    pub required: bool,
    /// Closed set of accepted values, if the field is enumerated.
    pub allowed: Option<&'static [&'static str]>,
}

impl FieldRule {
    const fn required(name: &'static str) -> Self {
        Self { name, required: true, allowed: None }
    }

    const fn optional(name: &'static str) -> Self {
        Self { name, required: false, allowed: None }
    }

    const fn required_enum(name: &'static str, allowed: &'static [&'static str]) -> Self {
        Self { name, required: true, allowed: Some(allowed) }
    }
}

/// Schema of one entity.
#[derive(Debug)]
pub struct EntitySchema {
    pub entity: &'static str,
    pub fields: &'static [FieldRule],
}

pub const SYSTEM: EntitySchema = EntitySchema {
    entity: "System",
    fields: &[FieldRule::required("name"), FieldRule::required("slug")],
};

pub const LOCATION: EntitySchema = EntitySchema {
    entity: "Location",
    fields: &[
        FieldRule::required("name"),
        FieldRule::required("slug"),
        FieldRule::required("systemId"),
    ],
};

pub const FOLDER: EntitySchema = EntitySchema {
    entity: "Folder",
    fields: &[
        FieldRule::required("name"),
        FieldRule::required("locationId"),
        FieldRule::required_enum("type", ContentType::VALUES),
    ],
};

pub const CONTENT: EntitySchema = EntitySchema {
    entity: "Content",
    fields: &[
        FieldRule::required("title"),
        FieldRule::required_enum("type", ContentType::VALUES),
        FieldRule::optional("description"),
        FieldRule::optional("folderId"),
        FieldRule::required("locationId"),
    ],
};

/// Check `doc` against `schema`, collecting every violation into one
/// `ServiceError::Validation`.
pub fn check(schema: &EntitySchema, doc: &Value) -> Result<(), ServiceError> {
    let mut problems = Vec::new();

    for rule in schema.fields {
        let value = doc.get(rule.name).filter(|v| !v.is_null());
        match value {
            None => {
                if rule.required {
                    problems.push(format!("{}: `{}` is required", rule.name, rule.name));
                }
            }
            Some(Value::String(s)) => {
                if rule.required && s.is_empty() {
                    problems.push(format!("{}: `{}` is required", rule.name, rule.name));
                } else if let Some(allowed) = rule.allowed {
                    if !allowed.contains(&s.as_str()) {
                        problems.push(format!(
                            "{}: `{}` is not a valid value (expected one of {})",
                            rule.name,
                            s,
                            allowed.join(", ")
                        ));
                    }
                }
            }
            Some(other) => {
                problems.push(format!("{}: expected a string, got {}", rule.name, other));
            }
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::Validation(format!(
            "{} validation failed: {}",
            schema.entity,
            problems.join(", ")
        )))
    }
}
