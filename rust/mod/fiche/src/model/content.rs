use serde::{Deserialize, Serialize};

use super::ContentType;

/// An image attached to a fiche. The list order is the display order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Image {
    pub url: String,

    /// Defaults to the uploaded file's original name.
    #[serde(default)]
    pub caption: String,
}

/// Content, a fiche: title, rich-text description and images, tagged as a
/// measure or a classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: String,

    pub title: String,

    #[serde(rename = "type")]
    pub kind: ContentType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,

    /// HTML produced by the rich-text editor, stored verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub images: Vec<Image>,

    pub location_id: String,

    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_json_shape() {
        let content = Content {
            id: "c1".into(),
            title: "Index cardio-thoracique".into(),
            kind: ContentType::Measure,
            folder_id: None,
            description: Some("<p>ICT &lt; 0,5</p>".into()),
            images: vec![Image {
                url: "https://cdn.example/fiches/1-ict.png".into(),
                caption: "ict.png".into(),
            }],
            location_id: "l1".into(),
            created_at: "2024-01-01T00:00:00+00:00".into(),
        };
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["type"], "measure");
        assert_eq!(json["locationId"], "l1");
        assert_eq!(json["images"][0]["caption"], "ict.png");
        assert!(json.get("folderId").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn image_caption_defaults_to_empty() {
        let image: Image = serde_json::from_str(r#"{"url": "u"}"#).unwrap();
        assert_eq!(image.caption, "");
    }
}
