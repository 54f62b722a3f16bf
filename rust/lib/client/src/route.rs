use std::fmt;

use fiche::model::ContentType;

/// Pages of the web client and their paths.
///
/// Unknown paths resolve to [`ClientRoute::Home`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientRoute {
    /// `/`: systems list.
    Home,
    /// `/system/:systemId`: locations of a system.
    System { system_id: String },
    /// `/add-folder/system`
    AddSystem,
    /// `/add-folder/location/:systemId`
    AddLocation { system_id: String },
    /// `/system/:systemId/location/:locationId`: content tabs.
    Location { system_id: String, location_id: String },
    /// `/system/:systemId/location/:locationId/content/:type`
    AddContent {
        system_id: String,
        location_id: String,
        kind: ContentType,
    },
    /// `/system/:systemId/location/:locationId/content/:type/:contentId/view`
    ViewContent {
        system_id: String,
        location_id: String,
        kind: ContentType,
        content_id: String,
    },
    /// `/system/:systemId/location/:locationId/content/:type/edit/:contentId`
    EditContent {
        system_id: String,
        location_id: String,
        kind: ContentType,
        content_id: String,
    },
}

impl ClientRoute {
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        Self::from_segments(&segments).unwrap_or(ClientRoute::Home)
    }

    fn from_segments(segments: &[&str]) -> Option<Self> {
        let route = match segments {
            [] => ClientRoute::Home,
            ["system", s] => ClientRoute::System { system_id: s.to_string() },
            ["add-folder", "system"] => ClientRoute::AddSystem,
            ["add-folder", "location", s] => ClientRoute::AddLocation { system_id: s.to_string() },
            ["system", s, "location", l] => ClientRoute::Location {
                system_id: s.to_string(),
                location_id: l.to_string(),
            },
            ["system", s, "location", l, "content", t] => ClientRoute::AddContent {
                system_id: s.to_string(),
                location_id: l.to_string(),
                kind: ContentType::parse(t)?,
            },
            ["system", s, "location", l, "content", t, "edit", c] => ClientRoute::EditContent {
                system_id: s.to_string(),
                location_id: l.to_string(),
                kind: ContentType::parse(t)?,
                content_id: c.to_string(),
            },
            ["system", s, "location", l, "content", t, c, "view"] => ClientRoute::ViewContent {
                system_id: s.to_string(),
                location_id: l.to_string(),
                kind: ContentType::parse(t)?,
                content_id: c.to_string(),
            },
            _ => return None,
        };
        Some(route)
    }

    /// The page a form or detail view returns to.
    pub fn back(&self) -> ClientRoute {
        match self {
            ClientRoute::Home | ClientRoute::System { .. } | ClientRoute::AddSystem => {
                ClientRoute::Home
            }
            ClientRoute::AddLocation { system_id } | ClientRoute::Location { system_id, .. } => {
                ClientRoute::System {
                    system_id: system_id.clone(),
                }
            }
            ClientRoute::AddContent {
                system_id,
                location_id,
                ..
            }
            | ClientRoute::ViewContent {
                system_id,
                location_id,
                ..
            }
            | ClientRoute::EditContent {
                system_id,
                location_id,
                ..
            } => ClientRoute::Location {
                system_id: system_id.clone(),
                location_id: location_id.clone(),
            },
        }
    }
}

impl fmt::Display for ClientRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientRoute::Home => write!(f, "/"),
            ClientRoute::System { system_id } => write!(f, "/system/{}", system_id),
            ClientRoute::AddSystem => write!(f, "/add-folder/system"),
            ClientRoute::AddLocation { system_id } => {
                write!(f, "/add-folder/location/{}", system_id)
            }
            ClientRoute::Location {
                system_id,
                location_id,
            } => write!(f, "/system/{}/location/{}", system_id, location_id),
            ClientRoute::AddContent {
                system_id,
                location_id,
                kind,
            } => write!(f, "/system/{}/location/{}/content/{}", system_id, location_id, kind),
            ClientRoute::ViewContent {
                system_id,
                location_id,
                kind,
                content_id,
            } => write!(
                f,
                "/system/{}/location/{}/content/{}/{}/view",
                system_id, location_id, kind, content_id
            ),
            ClientRoute::EditContent {
                system_id,
                location_id,
                kind,
                content_id,
            } => write!(
                f,
                "/system/{}/location/{}/content/{}/edit/{}",
                system_id, location_id, kind, content_id
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_page() {
        assert_eq!(ClientRoute::parse("/"), ClientRoute::Home);
        assert_eq!(ClientRoute::parse("/add-folder/system"), ClientRoute::AddSystem);
        assert_eq!(
            ClientRoute::parse("/system/s1/location/l1/content/classification/edit/c1"),
            ClientRoute::EditContent {
                system_id: "s1".into(),
                location_id: "l1".into(),
                kind: ContentType::Classification,
                content_id: "c1".into(),
            }
        );
        assert_eq!(
            ClientRoute::parse("/system/s1/location/l1/content/measure/c1/view"),
            ClientRoute::ViewContent {
                system_id: "s1".into(),
                location_id: "l1".into(),
                kind: ContentType::Measure,
                content_id: "c1".into(),
            }
        );
    }

    #[test]
    fn format_and_parse_agree() {
        for path in [
            "/",
            "/system/s1",
            "/add-folder/system",
            "/add-folder/location/s1",
            "/system/s1/location/l1",
            "/system/s1/location/l1/content/measure",
            "/system/s1/location/l1/content/measure/c1/view",
            "/system/s1/location/l1/content/classification/edit/c1",
        ] {
            assert_eq!(ClientRoute::parse(path).to_string(), path);
        }
    }

    #[test]
    fn unknown_paths_go_home() {
        assert_eq!(ClientRoute::parse("/nowhere"), ClientRoute::Home);
        assert_eq!(ClientRoute::parse("/system/s1/location/l1/content/diagram"), ClientRoute::Home);
        assert_eq!(ClientRoute::parse("/system"), ClientRoute::Home);
    }

    #[test]
    fn back_walks_up_the_hierarchy() {
        let edit = ClientRoute::parse("/system/s1/location/l1/content/measure/edit/c1");
        assert_eq!(edit.back().to_string(), "/system/s1/location/l1");
        assert_eq!(edit.back().back().to_string(), "/system/s1");
        assert_eq!(edit.back().back().back(), ClientRoute::Home);
        assert_eq!(ClientRoute::parse("/add-folder/location/s1").back().to_string(), "/system/s1");
    }
}
