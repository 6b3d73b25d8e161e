//! e3 Catalog - module group and project discovery
//!
//! This module provides read-only access to the e3 module catalog, which
//! lives in a GitLab group hierarchy.
//!
//! # Overview
//!
//! The catalog system allows users to:
//! - List the module groups below the e3 root group
//! - List every module project, including those in subgroups
//! - Look up one project's attributes, clone URL and tags
//!
//! # Architecture
//!
//! ```text
//! GitLab (API v4)
//!     │
//!     ├── groups/{root}/subgroups          ← module groups
//!     ├── groups/{root}/projects           ← module projects
//!     └── projects/{id}/repository/tags    ← released versions
//!            │
//!            ▼
//!     CatalogClient (GitlabClient | MemoryCatalog)
//!            │
//!            ▼
//!     CatalogSnapshot ──► resolver::resolve
//! ```
//!
//! Nothing is cached between invocations: every command builds a fresh
//! snapshot.

mod client;
mod config;
mod gitlab;
mod memory;
mod model;
mod snapshot;

pub use client::CatalogClient;
pub use config::{CatalogConfig, DEFAULT_GITLAB_URL, DEFAULT_GROUP_ID};
pub use gitlab::GitlabClient;
pub use memory::MemoryCatalog;
pub use model::{Attributes, Group, Project};
pub use snapshot::CatalogSnapshot;
