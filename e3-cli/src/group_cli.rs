//! e3 group commands
//!
//! Lists the module groups below the e3 root group, or shows one of them.

use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;

use e3_core::catalog::{CatalogClient, CatalogConfig, Group};

use crate::outcome::Outcome;

/// Show one group, or list all groups
#[derive(Args, Debug)]
pub struct GroupCommand {
    /// Group name
    #[clap(conflicts_with = "all")]
    pub name: Option<String>,

    /// List all groups
    #[clap(long)]
    pub all: bool,

    /// List the modules in the group (or in every group with --all)
    #[clap(long)]
    pub modules: bool,
}

impl GroupCommand {
    /// Command output goes to `out`; a missing group is reported on `err`
    pub async fn execute<W: Write, E: Write>(
        self,
        client: &dyn CatalogClient,
        config: &CatalogConfig,
        out: &mut W,
        err: &mut E,
    ) -> Result<Outcome> {
        let groups: Vec<Group> = client
            .list_groups(config.group_id)
            .await?
            .into_iter()
            .filter(|g| !config.is_group_excluded(&g.name))
            .collect();

        if self.all {
            writeln!(out, "There are {} groups:", groups.len())?;
            for group in &groups {
                writeln!(out, "- {}", group.name)?;
                if self.modules {
                    for name in module_names(client, config, group).await? {
                        writeln!(out, "  {name}")?;
                    }
                }
            }
            return Ok(Outcome::Success);
        }

        let name = self
            .name
            .context("You need to specify a group, or use --all")?;

        // Later listings win, as with project names
        let Some(listed) = groups.iter().rev().find(|g| g.name == name) else {
            writeln!(err, "Group {name} does not exist.")?;
            return Ok(Outcome::NotFound);
        };

        if self.modules {
            let names = module_names(client, config, listed).await?;
            writeln!(
                out,
                "The group {} contains the following {} modules:",
                listed.name,
                names.len()
            )?;
            for name in names {
                writeln!(out, "{name}")?;
            }
        } else {
            let group = client.get_group(listed.id).await?;
            writeln!(out, "{}", group.attributes_pretty()?)?;
        }

        Ok(Outcome::Success)
    }
}

/// Names of the projects directly in `group`
async fn module_names(
    client: &dyn CatalogClient,
    config: &CatalogConfig,
    group: &Group,
) -> Result<Vec<String>> {
    let projects = client.list_projects(group.id, false).await?;
    Ok(projects
        .into_iter()
        .map(|p| p.name)
        .filter(|name| !config.is_project_excluded(name))
        .collect())
}
