//! `reqwest` client for the listings backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::application::ports::{ClientError, PostsApi};
use crate::domain::forms::PostSubmission;
use crate::domain::posts::Post;
use crate::infra::error::InfraError;
use postdesk_api_types::{ApiErrorBody, HealthResponse, MessageResponse, fields};

const POSTS_PATH: &str = "api/posts";
const HEALTH_PATH: &str = "api/health";

pub fn user_agent() -> &'static str {
    concat!("postdesk/", env!("CARGO_PKG_VERSION"))
}

#[derive(Clone, Debug)]
pub struct HttpPostsApi {
    client: Client,
    base: Url,
}

impl HttpPostsApi {
    pub fn new(base: Url, timeout: Duration) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(user_agent())
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base: normalize_base(base),
        })
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base.join(path).map_err(ClientError::transport)
    }

    fn authed(&self, method: Method, url: Url, token: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
    }

    async fn send_submission(
        &self,
        method: Method,
        url: Url,
        token: &str,
        form: Form,
    ) -> Result<Post, ClientError> {
        let resp = self
            .authed(method, url, token)
            .multipart(form)
            .send()
            .await
            .map_err(ClientError::transport)?;
        decode(resp).await
    }
}

#[async_trait]
impl PostsApi for HttpPostsApi {
    #[instrument(skip_all)]
    async fn list_posts(&self, token: &str) -> Result<Vec<Post>, ClientError> {
        let url = self.url(POSTS_PATH)?;
        let resp = self
            .authed(Method::GET, url, token)
            .send()
            .await
            .map_err(ClientError::transport)?;
        let posts: Vec<Post> = decode(resp).await?;
        debug!(count = posts.len(), "fetched posts");
        Ok(posts)
    }

    #[instrument(skip_all, fields(post_id = %submission.form.post_id))]
    async fn create_post(
        &self,
        token: &str,
        submission: PostSubmission,
    ) -> Result<Post, ClientError> {
        let url = self.url(POSTS_PATH)?;
        let form = submission_form(submission, None)?;
        self.send_submission(Method::POST, url, token, form).await
    }

    #[instrument(skip_all, fields(id = id, post_id = %submission.form.post_id))]
    async fn update_post(
        &self,
        token: &str,
        id: i64,
        submission: PostSubmission,
    ) -> Result<Post, ClientError> {
        let url = self.url(&format!("{POSTS_PATH}/{id}"))?;
        let form = submission_form(submission, Some(id))?;
        self.send_submission(Method::PUT, url, token, form).await
    }

    #[instrument(skip_all, fields(id = id))]
    async fn delete_post(&self, token: &str, id: i64) -> Result<(), ClientError> {
        let url = self.url(&format!("{POSTS_PATH}/{id}"))?;
        let resp = self
            .authed(Method::DELETE, url, token)
            .send()
            .await
            .map_err(ClientError::transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(api_failure(resp).await);
        }
        let bytes = resp.bytes().await.unwrap_or_default();
        if let Ok(body) = serde_json::from_slice::<MessageResponse>(&bytes) {
            debug!(message = %body.message, "post deleted");
        }
        Ok(())
    }

    async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = self.url(HEALTH_PATH)?;
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ClientError::transport)?;
        decode(resp).await
    }
}

/// Build the multipart body; `id` is only sent on update.
fn submission_form(submission: PostSubmission, id: Option<i64>) -> Result<Form, ClientError> {
    let PostSubmission { form, image } = submission;

    let mut body = Form::new();
    if let Some(id) = id {
        body = body.text(fields::ID, id.to_string());
    }
    body = body
        .text(fields::POST_ID, form.post_id)
        .text(fields::PLATFORM, form.platform)
        .text(fields::COUNTRY, form.country)
        .text(fields::STATUS, String::from(form.status));

    if let Some(image) = image {
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .map_err(ClientError::transport)?;
        body = body.part(fields::IMAGE, part);
    }
    Ok(body)
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(api_failure(resp).await);
    }
    let bytes = resp.bytes().await.map_err(ClientError::transport)?;
    serde_json::from_slice(&bytes).map_err(ClientError::decode)
}

async fn api_failure(resp: Response) -> ClientError {
    let status = resp.status().as_u16();
    let bytes = resp.bytes().await.unwrap_or_default();
    let message = serde_json::from_slice::<ApiErrorBody>(&bytes)
        .ok()
        .and_then(|body| body.error)
        .filter(|message| !message.trim().is_empty());
    debug!(status, ?message, "backend returned an error");
    ClientError::Api { status, message }
}

/// Ensure relative joins append to the base path instead of replacing its last segment.
fn normalize_base(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}
