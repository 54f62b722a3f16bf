use fiche::model::{Content, Folder, Location, System};

/// Records listed by name in the client.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for System {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Location {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Folder {
    fn name(&self) -> &str {
        &self.name
    }
}

fn matches(text: &str, query: &str) -> bool {
    text.to_lowercase().contains(&query.to_lowercase())
}

/// Case-insensitive substring match on `name`. An empty query keeps all.
pub fn filter_by_name<'a, T: Named>(items: &'a [T], query: &str) -> Vec<&'a T> {
    items.iter().filter(|item| matches(item.name(), query)).collect()
}

/// Case-insensitive substring match on `title`.
pub fn filter_by_title<'a>(items: &'a [Content], query: &str) -> Vec<&'a Content> {
    items.iter().filter(|c| matches(&c.title, query)).collect()
}

#[cfg(test)]
mod tests {
    use fiche::model::ContentType;

    use super::*;

    fn system(name: &str) -> System {
        System {
            id: name.to_lowercase(),
            name: name.into(),
            slug: name.to_lowercase(),
            created_at: String::new(),
        }
    }

    fn content(title: &str) -> Content {
        Content {
            id: title.into(),
            title: title.into(),
            kind: ContentType::Measure,
            folder_id: None,
            description: None,
            images: Vec::new(),
            location_id: "l1".into(),
            created_at: String::new(),
        }
    }

    #[test]
    fn name_filter_ignores_case() {
        let systems = vec![system("Thorax"), system("Membre Supérieur"), system("Rachis")];
        let found: Vec<&str> = filter_by_name(&systems, "SUPÉ").iter().map(|s| s.name()).collect();
        assert_eq!(found, vec!["Membre Supérieur"]);
        assert_eq!(filter_by_name(&systems, "").len(), 3);
        assert!(filter_by_name(&systems, "crâne").is_empty());
    }

    #[test]
    fn title_filter_matches_substring() {
        let contents = vec![content("Index cardio-thoracique"), content("Angle de Cobb")];
        let found = filter_by_title(&contents, "cobb");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Angle de Cobb");
    }
}
