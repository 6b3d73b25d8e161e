//! Catalog records
//!
//! Groups and projects keep the full JSON object returned by the catalog
//! service as their attributes; the handful of typed fields the tool relies
//! on are extracted from it once.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Open key-value map of catalog attributes
pub type Attributes = Map<String, Value>;

/// A single module's record in the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    /// Catalog identifier
    pub id: u64,

    /// Project name, e.g. `e3-motor`
    pub name: String,

    /// SSH clone URL
    pub clone_url: String,

    /// Tag names in the order the catalog lists them
    pub tags: Vec<String>,

    /// Everything the catalog returned for this project
    pub attributes: Attributes,
}

/// A named container of projects and subgroups
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Catalog identifier
    pub id: u64,

    /// Group name
    pub name: String,

    /// Everything the catalog returned for this group
    pub attributes: Attributes,
}

#[derive(Deserialize)]
struct ProjectFields {
    id: u64,
    name: String,
    #[serde(default)]
    ssh_url_to_repo: Option<String>,
}

#[derive(Deserialize)]
struct GroupFields {
    id: u64,
    name: String,
}

impl Project {
    /// Build a project from a minimal set of fields
    pub fn new(id: u64, name: &str, clone_url: &str) -> Self {
        let mut attributes = Attributes::new();
        attributes.insert("id".to_string(), Value::from(id));
        attributes.insert("name".to_string(), Value::from(name));
        attributes.insert("ssh_url_to_repo".to_string(), Value::from(clone_url));

        Self {
            id,
            name: name.to_string(),
            clone_url: clone_url.to_string(),
            tags: Vec::new(),
            attributes,
        }
    }

    /// Build a project from a raw catalog object
    pub fn from_attributes(attributes: Attributes) -> Result<Self> {
        let fields: ProjectFields = serde_json::from_value(Value::Object(attributes.clone()))
            .context("Catalog project is missing 'id' or 'name'")?;

        Ok(Self {
            id: fields.id,
            name: fields.name,
            clone_url: fields.ssh_url_to_repo.unwrap_or_default(),
            tags: Vec::new(),
            attributes,
        })
    }

    /// Attach the project's tag names
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Attributes as indented JSON
    pub fn attributes_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.attributes).context("Failed to format project attributes")
    }
}

impl Group {
    /// Build a group from a minimal set of fields
    pub fn new(id: u64, name: &str) -> Self {
        let mut attributes = Attributes::new();
        attributes.insert("id".to_string(), Value::from(id));
        attributes.insert("name".to_string(), Value::from(name));

        Self {
            id,
            name: name.to_string(),
            attributes,
        }
    }

    /// Build a group from a raw catalog object
    pub fn from_attributes(attributes: Attributes) -> Result<Self> {
        let fields: GroupFields = serde_json::from_value(Value::Object(attributes.clone()))
            .context("Catalog group is missing 'id' or 'name'")?;

        Ok(Self {
            id: fields.id,
            name: fields.name,
            attributes,
        })
    }

    /// Attributes as indented JSON
    pub fn attributes_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.attributes).context("Failed to format group attributes")
    }
}
