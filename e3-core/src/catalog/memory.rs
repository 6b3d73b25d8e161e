//! In-memory catalog
//!
//! Holds a fixed group/project tree and answers the same queries as the
//! GitLab client. Used by tests and for offline fixtures.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

use super::client::CatalogClient;
use super::{Group, Project};

/// A catalog whose contents are supplied up front
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    /// (parent id, group) in insertion order
    groups: Vec<(u64, Group)>,
    /// (owning group id, project) in insertion order
    projects: Vec<(u64, Project)>,
    tags: HashMap<u64, Vec<String>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subgroup below `parent`
    pub fn with_group(mut self, parent: u64, group: Group) -> Self {
        self.groups.push((parent, group));
        self
    }

    /// Add a project owned by `group`
    pub fn with_project(mut self, group: u64, project: Project) -> Self {
        self.projects.push((group, project));
        self
    }

    /// Set the tags of a project
    pub fn with_tags(mut self, project: u64, tags: &[&str]) -> Self {
        self.tags
            .insert(project, tags.iter().map(|t| t.to_string()).collect());
        self
    }

    /// `scope` and every group nested below it
    fn descendants(&self, scope: u64) -> Vec<u64> {
        let mut found = vec![scope];
        let mut cursor = 0;
        while cursor < found.len() {
            let current = found[cursor];
            found.extend(
                self.groups
                    .iter()
                    .filter(|(parent, _)| *parent == current)
                    .map(|(_, group)| group.id),
            );
            cursor += 1;
        }
        found
    }
}

#[async_trait]
impl CatalogClient for MemoryCatalog {
    async fn list_groups(&self, parent: u64) -> Result<Vec<Group>> {
        Ok(self
            .groups
            .iter()
            .filter(|(p, _)| *p == parent)
            .map(|(_, group)| group.clone())
            .collect())
    }

    async fn list_projects(&self, scope: u64, include_subgroups: bool) -> Result<Vec<Project>> {
        let scopes = if include_subgroups {
            self.descendants(scope)
        } else {
            vec![scope]
        };

        Ok(self
            .projects
            .iter()
            .filter(|(owner, _)| scopes.contains(owner))
            .map(|(_, project)| project.clone())
            .collect())
    }

    async fn list_tags(&self, project: u64) -> Result<Vec<String>> {
        Ok(self.tags.get(&project).cloned().unwrap_or_default())
    }

    async fn get_group(&self, id: u64) -> Result<Group> {
        self.groups
            .iter()
            .map(|(_, group)| group)
            .find(|group| group.id == id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Group {id} not found"))
    }

    async fn get_project(&self, id: u64) -> Result<Project> {
        self.projects
            .iter()
            .map(|(_, project)| project)
            .find(|project| project.id == id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Project {id} not found"))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
