use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use crate::classifier::classify;
use crate::config::GraphConfig;
use crate::error::{GraphError, GraphResult};
use crate::types::*;

/// Thin Graph API client. Every response passes through [`classify`] before
/// the caller sees it.
#[derive(Clone)]
pub struct FacebookClient {
    client: reqwest::Client,
    config: GraphConfig,
}

impl FacebookClient {
    pub fn new(config: GraphConfig) -> GraphResult<Self> {
        let base = Url::parse(config.api_base()).map_err(|e| {
            GraphError::InvalidConfig(format!("Invalid API base '{}': {}", config.api_base(), e))
        })?;
        if base.cannot_be_a_base() {
            return Err(GraphError::InvalidConfig(format!(
                "API base '{}' cannot take path segments",
                config.api_base()
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self { client, config })
    }

    /// Client configured from `FACEBOOK_*` environment variables
    pub fn from_env() -> GraphResult<Self> {
        Self::new(GraphConfig::from_env())
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Fetch a single object by id or alias
    pub async fn fetch_object<T: DeserializeOwned>(&self, object_id: &str) -> GraphResult<T> {
        debug!("Graph: fetching object {}", object_id);
        let url = self.url(&[object_id])?;
        let raw = self.execute(self.request(Method::GET, url)).await?;
        parse_json(&raw)
    }

    /// Fetch the `data` array of an object's connection
    pub async fn fetch_connections<T: DeserializeOwned>(
        &self,
        object_id: &str,
        connection: &str,
    ) -> GraphResult<Vec<T>> {
        debug!("Graph: fetching {} of {}", connection, object_id);
        let url = self.url(&[object_id, connection])?;
        let raw = self.execute(self.request(Method::GET, url)).await?;

        let list: GraphListResponse<T> = parse_json(&raw)?;
        debug!(
            "Graph: got {} {}, has_more={}",
            list.data.len(),
            connection,
            list.paging.as_ref().is_some_and(|p| p.next.is_some())
        );
        Ok(list.data)
    }

    /// Publish to a connection. Returns the new object's id.
    pub async fn publish(
        &self,
        object_id: &str,
        connection: &str,
        params: &[(&str, &str)],
    ) -> GraphResult<String> {
        let raw = self.post_form(&[object_id, connection], params).await?;
        let created: PublishResponse = parse_json(&raw)?;
        info!("Graph: published to {}/{}, id={}", object_id, connection, created.id);
        Ok(created.id)
    }

    /// Post to a connection, ignoring the response body
    pub async fn post(
        &self,
        object_id: &str,
        connection: &str,
        params: &[(&str, &str)],
    ) -> GraphResult<()> {
        self.post_form(&[object_id, connection], params).await?;
        Ok(())
    }

    /// Delete an object. The Graph API takes deletes as a POST with
    /// `method=delete`.
    pub async fn delete_object(&self, object_id: &str) -> GraphResult<()> {
        debug!("Graph: deleting {}", object_id);
        self.post_form(&[object_id], &[("method", "delete")]).await?;
        info!("Graph: deleted {}", object_id);
        Ok(())
    }

    /// Profile of the user owning the access token
    pub async fn user_profile(&self) -> GraphResult<UserProfile> {
        self.fetch_object("me").await
    }

    /// Raw picture bytes for a user
    pub async fn user_profile_image(
        &self,
        user_id: &str,
        image_type: ImageType,
    ) -> GraphResult<Vec<u8>> {
        let mut url = self.url(&[user_id, "picture"])?;
        url.query_pairs_mut()
            .append_pair("type", image_type.as_str());
        debug!("Graph: fetching {} picture for {}", image_type.as_str(), user_id);

        let raw = self.execute(self.request(Method::GET, url)).await?;
        debug!("Graph: got picture {} bytes", raw.body.len());
        Ok(raw.body)
    }

    /// Decline an event invitation
    pub async fn decline_invitation(&self, event_id: &str) -> GraphResult<()> {
        self.post(event_id, "declined", &[]).await
    }

    /// Add a friend to one of the current user's friend lists
    pub async fn add_to_friend_list(&self, list_id: &str, friend_id: &str) -> GraphResult<()> {
        debug!("Graph: adding {} to friend list {}", friend_id, list_id);
        self.post_form(&[list_id, "members", friend_id], &[]).await?;
        Ok(())
    }

    pub async fn delete_friend_list(&self, list_id: &str) -> GraphResult<()> {
        self.delete_object(list_id).await
    }

    async fn post_form(&self, segments: &[&str], params: &[(&str, &str)]) -> GraphResult<RawResponse> {
        let url = self.url(segments)?;
        debug!("Graph: POST {}", url.path());
        self.execute(self.request(Method::POST, url).form(params))
            .await
    }

    fn url(&self, segments: &[&str]) -> GraphResult<Url> {
        let mut url = Url::parse(self.config.api_base())
            .map_err(|e| GraphError::InvalidConfig(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| GraphError::InvalidConfig("API base cannot take path segments".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match self.config.authorization_header() {
            Some(value) => builder.header(AUTHORIZATION, value),
            None => builder,
        }
    }

    /// Send a request and turn classified failures into errors
    async fn execute(&self, builder: RequestBuilder) -> GraphResult<RawResponse> {
        let response = builder.send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        let raw = RawResponse::new(status, body).with_headers(headers);
        debug!(
            "Graph: {} ({}) {} bytes",
            status,
            raw.content_type().unwrap_or("no content type"),
            raw.body.len()
        );

        if let Some(failure) = classify(&raw, self.config.request_context()) {
            warn!(
                "Graph: {} classified as {:?}: {}",
                status,
                failure.category(),
                failure
            );
            return Err(GraphError::Api(failure));
        }

        Ok(raw)
    }
}

fn parse_json<T: DeserializeOwned>(raw: &RawResponse) -> GraphResult<T> {
    serde_json::from_slice(&raw.body).map_err(|e| GraphError::ParseError(e.to_string()))
}
