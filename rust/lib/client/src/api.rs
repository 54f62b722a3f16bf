use reqwest::multipart::Form;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use fiche::model::{Content, ContentType, Folder, Location, System};

use crate::error::ClientError;
use crate::form::ContentForm;

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

/// Typed client for the `/api` routes.
#[derive(Clone)]
pub struct FicheClient {
    http: reqwest::Client,
    base_url: String,
}

impl FicheClient {
    /// `base_url` is the server origin, without the `/api` prefix.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Parse an API response, mapping HTTP errors to `ClientError`.
    async fn parse<R: DeserializeOwned>(resp: reqwest::Response) -> Result<R, ClientError> {
        let status = resp.status();
        if !status.is_success() {
            let code = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or(body);
            debug!("api error {}: {}", code, message);
            return Err(ClientError::Server { status: code, message });
        }
        resp.json::<R>()
            .await
            .map_err(|e| ClientError::Decode(format!("response body: {}", e)))
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ClientError> {
        let resp = self.http.get(self.url(path)).send().await?;
        Self::parse(resp).await
    }

    async fn post_json<R: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<R, ClientError> {
        let resp = self.http.post(self.url(path)).json(body).send().await?;
        Self::parse(resp).await
    }

    /// DELETE and return the confirmation message.
    async fn delete(&self, path: &str) -> Result<String, ClientError> {
        let resp = self.http.delete(self.url(path)).send().await?;
        Self::parse::<MessageBody>(resp).await.map(|m| m.message)
    }

    // ── Systems ──

    pub async fn list_systems(&self) -> Result<Vec<System>, ClientError> {
        self.get("/systems").await
    }

    pub async fn create_system(&self, name: &str) -> Result<System, ClientError> {
        self.post_json("/systems", &json!({ "name": name })).await
    }

    pub async fn delete_system(&self, id: &str) -> Result<String, ClientError> {
        self.delete(&format!("/systems/{}", id)).await
    }

    // ── Locations ──

    pub async fn list_locations(&self, system_id: &str) -> Result<Vec<Location>, ClientError> {
        self.get(&format!("/systems/{}/locations", system_id)).await
    }

    pub async fn create_location(&self, system_id: &str, name: &str) -> Result<Location, ClientError> {
        self.post_json(&format!("/systems/{}/locations", system_id), &json!({ "name": name }))
            .await
    }

    pub async fn delete_location(&self, id: &str) -> Result<String, ClientError> {
        self.delete(&format!("/locations/{}", id)).await
    }

    // ── Folders ──

    pub async fn list_folders(
        &self,
        location_id: &str,
        kind: ContentType,
    ) -> Result<Vec<Folder>, ClientError> {
        self.get(&format!("/locations/{}/folders/{}", location_id, kind)).await
    }

    pub async fn create_folder(
        &self,
        location_id: &str,
        name: &str,
        kind: ContentType,
        order: Option<i64>,
    ) -> Result<Folder, ClientError> {
        let mut body = json!({ "name": name, "type": kind });
        if let Some(order) = order {
            body["order"] = json!(order);
        }
        self.post_json(&format!("/locations/{}/folders", location_id), &body)
            .await
    }

    pub async fn delete_folder(&self, id: &str) -> Result<String, ClientError> {
        self.delete(&format!("/folders/{}", id)).await
    }

    // ── Content ──

    pub async fn list_contents(
        &self,
        location_id: &str,
        kind: ContentType,
    ) -> Result<Vec<Content>, ClientError> {
        self.get(&format!("/locations/{}/content/{}", location_id, kind)).await
    }

    pub async fn get_content(&self, id: &str) -> Result<Content, ClientError> {
        self.get(&format!("/content/{}", id)).await
    }

    /// Send a new fiche. The form is checked before any request is made.
    pub async fn create_content(
        &self,
        location_id: &str,
        form: ContentForm,
    ) -> Result<Content, ClientError> {
        let multipart = form.into_create_form(location_id)?;
        self.send_form(self.http.post(self.url(&format!("/locations/{}/content", location_id))), multipart)
            .await
    }

    /// Send an edited fiche: the retained images plus any new files.
    pub async fn update_content(
        &self,
        id: &str,
        location_id: &str,
        form: ContentForm,
    ) -> Result<Content, ClientError> {
        let multipart = form.into_update_form(location_id)?;
        self.send_form(self.http.put(self.url(&format!("/content/{}", id))), multipart)
            .await
    }

    pub async fn delete_content(&self, id: &str) -> Result<String, ClientError> {
        self.delete(&format!("/content/{}", id)).await
    }

    async fn send_form(
        &self,
        req: reqwest::RequestBuilder,
        form: Form,
    ) -> Result<Content, ClientError> {
        let resp = req.multipart(form).send().await?;
        Self::parse(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_rooted_under_api() {
        let client = FicheClient::new("http://localhost:5002/");
        assert_eq!(client.url("/systems"), "http://localhost:5002/api/systems");
    }
}
