//! Catalog snapshot
//!
//! A name-indexed view over one listing of the catalog's projects. The full
//! listing is kept alongside the index so that projects sharing a name stay
//! visible to the resolver.

use anyhow::Result;
use std::collections::{HashMap, HashSet};

use super::client::CatalogClient;
use super::Project;

/// Projects of one catalog listing, indexed by name
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    /// Every listed project, in listing order
    projects: Vec<Project>,
    /// Name to position in `projects`; the last listed project wins
    by_name: HashMap<String, usize>,
}

impl CatalogSnapshot {
    /// Build a snapshot from a project listing
    pub fn from_projects(projects: Vec<Project>) -> Self {
        let mut by_name: HashMap<String, usize> = HashMap::with_capacity(projects.len());

        for (position, project) in projects.iter().enumerate() {
            if let Some(previous) = by_name.insert(project.name.clone(), position) {
                let shadowed = &projects[previous];
                if shadowed.id != project.id {
                    tracing::warn!(
                        "Project name '{}' is used by ids {} and {}; lookups by exact name use {}",
                        project.name,
                        shadowed.id,
                        project.id,
                        project.id
                    );
                }
            }
        }

        Self { projects, by_name }
    }

    /// List every project below `root` (subgroups included) and index it,
    /// skipping `excluded` names
    pub async fn fetch(
        client: &dyn CatalogClient,
        root: u64,
        excluded: &[String],
    ) -> Result<Self> {
        let projects: Vec<Project> = client
            .list_projects(root, true)
            .await?
            .into_iter()
            .filter(|p| !excluded.contains(&p.name))
            .collect();

        tracing::debug!(
            "Fetched {} project(s) below group {} from '{}'",
            projects.len(),
            root,
            client.name()
        );

        Ok(Self::from_projects(projects))
    }

    /// Project registered under exactly `name`
    pub fn get(&self, name: &str) -> Option<&Project> {
        self.by_name.get(name).map(|&position| &self.projects[position])
    }

    /// Every listed project, duplicates included
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Distinct project names in the order they were first listed
    pub fn names(&self) -> Vec<&str> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(self.by_name.len());
        self.projects
            .iter()
            .map(|project| project.name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Number of distinct names
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
