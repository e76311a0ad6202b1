//! REST client for the content backend.
//!
//! `ContentApi` is the seam the dispatcher talks through; `HttpContentApi`
//! is the `reqwest` implementation used against a real server.

use crate::{
    config::AppConfig,
    errors::{ClientError, ClientResult},
    models::{
        content::{ContentId, ContentRecord},
        filters::Filters,
        metadata::MetadataType,
        user::User,
    },
    services::form::ContentForm,
};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, header};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, instrument};

#[async_trait]
pub trait ContentApi: Send + Sync + 'static {
    async fn list_content(&self, filters: &Filters) -> ClientResult<Vec<ContentRecord>>;

    async fn create_content(&self, form: ContentForm) -> ClientResult<()>;

    async fn update_content(&self, id: ContentId, form: ContentForm) -> ClientResult<()>;

    /// PATCH the item with a JSON body instead of multipart.
    async fn update_content_json(&self, id: ContentId, body: serde_json::Value) -> ClientResult<()>;

    async fn delete_content(&self, id: ContentId) -> ClientResult<()>;

    async fn list_metadata_types(&self) -> ClientResult<Vec<MetadataType>>;

    async fn current_user(&self) -> ClientResult<User>;

    async fn logout(&self) -> ClientResult<()>;
}

/// Standard response wrapper used by every backend endpoint.
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Clone, Debug)]
pub struct HttpContentApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpContentApi {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> ClientResult<Self> {
        Self::from_builder(base_url, token, Client::builder().timeout(timeout))
    }

    /// Finish `builder` and point the client at `base_url`.
    pub fn from_builder(
        base_url: impl Into<String>,
        token: Option<String>,
        builder: ClientBuilder,
    ) -> ClientResult<Self> {
        let client = builder.build().map_err(ClientError::Build)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_config(cfg: &AppConfig) -> ClientResult<Self> {
        Self::new(
            cfg.api_url.clone(),
            cfg.token.clone(),
            Duration::from_secs(cfg.timeout_secs),
        )
    }

    pub fn content_list_url(&self) -> String {
        format!("{}/api/content/", self.base_url)
    }

    pub fn content_url(&self, id: ContentId) -> String {
        format!("{}/api/content/{}/", self.base_url, id)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.header(header::AUTHORIZATION, format!("Token {}", token)),
            None => builder,
        }
    }

    /// Send and turn non-2xx responses into `ClientError::Status`.
    async fn send(
        &self,
        method: Method,
        url: &str,
        builder: RequestBuilder,
    ) -> ClientResult<String> {
        let response = builder
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                method: method.clone(),
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| ClientError::Transport {
                method: method.clone(),
                url: url.to_string(),
                source,
            })?;
        debug!(%method, url, %status, bytes = body.len(), "backend responded");

        if !status.is_success() {
            return Err(ClientError::from_status(method, url.to_string(), status, &body));
        }
        Ok(body)
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        url: &str,
        builder: RequestBuilder,
    ) -> ClientResult<T> {
        let body = self.send(Method::GET, url, builder).await?;
        serde_json::from_str::<Envelope<T>>(&body)
            .map(|envelope| envelope.data)
            .map_err(|err| ClientError::Decode {
                url: url.to_string(),
                reason: err.to_string(),
            })
    }
}

#[async_trait]
impl ContentApi for HttpContentApi {
    #[instrument(level = "debug", skip(self), err(Display))]
    async fn list_content(&self, filters: &Filters) -> ClientResult<Vec<ContentRecord>> {
        let url = self.content_list_url();
        let builder = self.request(Method::GET, &url).query(filters);
        self.get_data(&url, builder).await
    }

    #[instrument(level = "debug", skip_all, err(Display))]
    async fn create_content(&self, form: ContentForm) -> ClientResult<()> {
        let url = self.content_list_url();
        let builder = self
            .request(Method::POST, &url)
            .multipart(form.into_multipart());
        self.send(Method::POST, &url, builder).await.map(|_| ())
    }

    #[instrument(level = "debug", skip(self, form), err(Display))]
    async fn update_content(&self, id: ContentId, form: ContentForm) -> ClientResult<()> {
        let url = self.content_url(id);
        let builder = self
            .request(Method::PATCH, &url)
            .multipart(form.into_multipart());
        self.send(Method::PATCH, &url, builder).await.map(|_| ())
    }

    #[instrument(level = "debug", skip(self), err(Display))]
    async fn update_content_json(
        &self,
        id: ContentId,
        body: serde_json::Value,
    ) -> ClientResult<()> {
        let url = self.content_url(id);
        let builder = self.request(Method::PATCH, &url).json(&body);
        self.send(Method::PATCH, &url, builder).await.map(|_| ())
    }

    #[instrument(level = "debug", skip(self), err(Display))]
    async fn delete_content(&self, id: ContentId) -> ClientResult<()> {
        let url = self.content_url(id);
        let builder = self.request(Method::DELETE, &url);
        self.send(Method::DELETE, &url, builder).await.map(|_| ())
    }

    async fn list_metadata_types(&self) -> ClientResult<Vec<MetadataType>> {
        let url = self.url("/api/metadata_types/");
        let builder = self.request(Method::GET, &url);
        self.get_data(&url, builder).await
    }

    async fn current_user(&self) -> ClientResult<User> {
        let url = self.url("/api/user/");
        let builder = self.request(Method::GET, &url);
        self.get_data(&url, builder).await
    }

    async fn logout(&self) -> ClientResult<()> {
        let url = self.url("/api/logout/");
        let builder = self.request(Method::POST, &url);
        self.send(Method::POST, &url, builder).await.map(|_| ())
    }
}
