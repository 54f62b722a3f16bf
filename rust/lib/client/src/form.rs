use reqwest::multipart::{Form, Part};

use fiche::model::{Content, ContentType, Image};

use crate::error::ClientError;

/// A file picked in the image input.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub mime: String,
    pub data: Vec<u8>,
}

/// State of the add/edit content form.
#[derive(Debug, Clone)]
pub struct ContentForm {
    pub title: String,
    /// Rich-text HTML.
    pub description: String,
    pub kind: ContentType,
    pub folder_id: Option<String>,
    existing: Vec<Image>,
    new_images: Vec<ImageFile>,
}

impl ContentForm {
    /// Empty form for a new fiche of the given type.
    pub fn new(kind: ContentType) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            kind,
            folder_id: None,
            existing: Vec::new(),
            new_images: Vec::new(),
        }
    }

    /// Form prefilled from a stored fiche. Its images start out retained.
    pub fn edit(content: &Content) -> Self {
        Self {
            title: content.title.clone(),
            description: content.description.clone().unwrap_or_default(),
            kind: content.kind,
            folder_id: content.folder_id.clone(),
            existing: content.images.clone(),
            new_images: Vec::new(),
        }
    }

    /// Add picked files. Files whose type is not `image/*` are skipped and
    /// their names returned.
    pub fn add_images(&mut self, files: Vec<ImageFile>) -> Vec<String> {
        let mut rejected = Vec::new();
        for file in files {
            if file.mime.starts_with("image/") {
                self.new_images.push(file);
            } else {
                rejected.push(file.file_name);
            }
        }
        rejected
    }

    pub fn existing_images(&self) -> &[Image] {
        &self.existing
    }

    pub fn new_images(&self) -> &[ImageFile] {
        &self.new_images
    }

    /// Drop a retained image; it will not be sent back on update.
    pub fn remove_existing(&mut self, index: usize) -> Option<Image> {
        (index < self.existing.len()).then(|| self.existing.remove(index))
    }

    pub fn remove_new(&mut self, index: usize) -> Option<ImageFile> {
        (index < self.new_images.len()).then(|| self.new_images.remove(index))
    }

    /// The trimmed title, or an error if it is blank.
    fn checked_title(&self) -> Result<String, ClientError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ClientError::Form("Le titre est requis".into()));
        }
        Ok(title.to_string())
    }

    fn base_form(self, location_id: &str) -> Result<(Form, Vec<Image>), ClientError> {
        let title = self.checked_title()?;
        let mut form = Form::new()
            .text("title", title)
            .text("description", self.description)
            .text("type", self.kind.as_str())
            .text("locationId", location_id.to_string());
        if let Some(folder_id) = self.folder_id {
            form = form.text("folderId", folder_id);
        }
        for file in self.new_images {
            let part = Part::bytes(file.data)
                .file_name(file.file_name)
                .mime_str(&file.mime)?;
            form = form.part("images", part);
        }
        Ok((form, self.existing))
    }

    /// Multipart body for `POST /api/locations/:id/content`.
    pub fn into_create_form(self, location_id: &str) -> Result<Form, ClientError> {
        self.base_form(location_id).map(|(form, _)| form)
    }

    /// Multipart body for `PUT /api/content/:id`, carrying the retained
    /// images as `existingImages`.
    pub fn into_update_form(self, location_id: &str) -> Result<Form, ClientError> {
        let (form, existing) = self.base_form(location_id)?;
        let existing = serde_json::to_string(&existing)
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(form.text("existingImages", existing))
    }
}
