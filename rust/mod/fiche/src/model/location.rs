use serde::{Deserialize, Serialize};

/// Location: a named anatomical site inside one System.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,

    pub name: String,

    pub slug: String,

    /// Owning System. Not checked for existence.
    pub system_id: String,

    pub created_at: String,

    pub updated_at: String,
}
