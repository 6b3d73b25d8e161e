//! Catalog client trait - Abstraction over catalog services
//!
//! This trait allows swapping between:
//! - GitLab (HTTP API)
//! - In-memory catalog (testing, offline fixtures)

use anyhow::Result;
use async_trait::async_trait;

use super::{Group, Project};

/// Read-only access to a group/project catalog
///
/// Every listing returns the complete, flattened result; implementations
/// deal with pagination themselves.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Direct subgroups of `parent`
    async fn list_groups(&self, parent: u64) -> Result<Vec<Group>>;

    /// Projects in `scope`, optionally including every nested subgroup
    async fn list_projects(&self, scope: u64, include_subgroups: bool) -> Result<Vec<Project>>;

    /// Tag names of a project
    async fn list_tags(&self, project: u64) -> Result<Vec<String>>;

    /// Fetch a single group by id
    async fn get_group(&self, id: u64) -> Result<Group>;

    /// Fetch a single project by id
    async fn get_project(&self, id: u64) -> Result<Project>;

    /// Client identifier for logging/debugging
    fn name(&self) -> &'static str;
}
