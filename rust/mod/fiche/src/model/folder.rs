use serde::{Deserialize, Serialize};

use super::ContentType;

/// Folder: optional grouping of Content inside a Location and type,
/// displayed in ascending `order`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,

    pub name: String,

    pub location_id: String,

    #[serde(rename = "type")]
    pub kind: ContentType,

    #[serde(default)]
    pub order: i64,

    pub created_at: String,
}
