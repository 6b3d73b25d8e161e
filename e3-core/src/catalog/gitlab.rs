//! GitLab backend for the catalog
//!
//! Implements the CatalogClient trait against the GitLab REST API (v4).
//! Listings follow the `X-Next-Page` header until the last page.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::client::CatalogClient;
use super::config::CatalogConfig;
use super::{Attributes, Group, Project};
use crate::error::E3Error;

/// GitLab API client
pub struct GitlabClient {
    client: reqwest::Client,
    api_base: String,
    private_token: Option<String>,
    per_page: u32,
}

#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

impl GitlabClient {
    /// Create a client from catalog configuration
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        config.validate()?;

        if config.private_token.is_none() {
            warn!("No GitLab token configured; only public groups and projects are visible");
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("e3/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_base: api_base(&config.url),
            private_token: config.private_token.clone(),
            per_page: config.per_page,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match &self.private_token {
            Some(token) => request.header("PRIVATE-TOKEN", token),
            None => request,
        }
    }

    /// GET a single JSON object
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path);
        debug!("GET {}", url);

        let response = self
            .request(&url)
            .send()
            .await
            .with_context(|| format!("Failed to reach catalog at {url}"))?;
        let response = check_status(response, &url).await?;

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse catalog response from {url}"))
    }

    /// GET every page of a listing
    async fn get_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let url = self.endpoint(path);
        let mut items = Vec::new();
        let mut page: u32 = 1;

        loop {
            debug!("GET {} (page {})", url, page);

            let response = self
                .request(&url)
                .query(query)
                .query(&[("per_page", self.per_page), ("page", page)])
                .send()
                .await
                .with_context(|| format!("Failed to reach catalog at {url}"))?;
            let response = check_status(response, &url).await?;
            let next = next_page(response.headers());

            let batch: Vec<T> = response
                .json()
                .await
                .with_context(|| format!("Failed to parse catalog listing from {url}"))?;
            items.extend(batch);

            match next {
                Some(next) if next > page => page = next,
                _ => break,
            }
        }

        debug!("Listed {} item(s) from {}", items.len(), url);
        Ok(items)
    }
}

#[async_trait]
impl CatalogClient for GitlabClient {
    async fn list_groups(&self, parent: u64) -> Result<Vec<Group>> {
        let raw: Vec<Attributes> = self
            .get_all(&format!("groups/{parent}/subgroups"), &[])
            .await?;
        raw.into_iter().map(Group::from_attributes).collect()
    }

    async fn list_projects(&self, scope: u64, include_subgroups: bool) -> Result<Vec<Project>> {
        let raw: Vec<Attributes> = self
            .get_all(
                &format!("groups/{scope}/projects"),
                &[("include_subgroups", include_subgroups.to_string())],
            )
            .await?;
        raw.into_iter().map(Project::from_attributes).collect()
    }

    async fn list_tags(&self, project: u64) -> Result<Vec<String>> {
        let tags: Vec<Tag> = self
            .get_all(&format!("projects/{project}/repository/tags"), &[])
            .await?;
        Ok(tags.into_iter().map(|t| t.name).collect())
    }

    async fn get_group(&self, id: u64) -> Result<Group> {
        let raw: Attributes = self.get_json(&format!("groups/{id}")).await?;
        Group::from_attributes(raw)
    }

    async fn get_project(&self, id: u64) -> Result<Project> {
        let raw: Attributes = self.get_json(&format!("projects/{id}")).await?;
        Project::from_attributes(raw)
    }

    fn name(&self) -> &'static str {
        "gitlab"
    }
}

/// API root for a GitLab base URL
fn api_base(url: &str) -> String {
    format!("{}/api/v4", url.trim_end_matches('/'))
}

/// Page number announced by `X-Next-Page`, empty on the last page
fn next_page(headers: &HeaderMap) -> Option<u32> {
    headers
        .get("x-next-page")?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

async fn check_status(response: reqwest::Response, url: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!("Catalog API error: {} - {}", status, body);
    Err(E3Error::Http {
        status: status.as_u16(),
        url: url.to_string(),
        body,
    }
    .into())
}
