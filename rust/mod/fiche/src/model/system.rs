use serde::{Deserialize, Serialize};

/// System: root of the hierarchy (e.g. "Thorax", "Membre Supérieur").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct System {
    pub id: String,

    pub name: String,

    /// Lowercased, hyphen-joined `name`.
    pub slug: String,

    pub created_at: String,
}
