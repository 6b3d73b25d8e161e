//! e3 module commands
//!
//! Resolves a (possibly partial) module name to a catalog project and shows
//! its attributes, clone URL or tags.

use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use tracing::debug;

use e3_core::catalog::{CatalogClient, CatalogConfig, CatalogSnapshot};
use e3_core::resolver::{resolve, Resolution};

use crate::outcome::Outcome;

/// Show one module, or list all modules
#[derive(Args, Debug)]
pub struct ModuleCommand {
    /// Module name; `e3-` may be omitted and partial names (regular
    /// expressions) are accepted when they match a single module
    #[clap(conflicts_with = "all")]
    pub name: Option<String>,

    /// List all modules
    #[clap(long)]
    pub all: bool,

    /// Print the module's git clone URL
    #[clap(long, conflicts_with_all = ["tags", "all"])]
    pub git_url: bool,

    /// List the module's tags
    #[clap(long, conflicts_with = "all")]
    pub tags: bool,
}

impl ModuleCommand {
    /// Command output goes to `out`; names that do not resolve are
    /// reported on `err`
    pub async fn execute<W: Write, E: Write>(
        self,
        client: &dyn CatalogClient,
        config: &CatalogConfig,
        out: &mut W,
        err: &mut E,
    ) -> Result<Outcome> {
        let snapshot =
            CatalogSnapshot::fetch(client, config.group_id, &config.excluded_projects).await?;

        if self.all {
            let names = snapshot.names();
            writeln!(out, "There are {} projects:", names.len())?;
            for name in names {
                writeln!(out, "{name}")?;
            }
            return Ok(Outcome::Success);
        }

        let name = self
            .name
            .context("You have to provide a module name with those options")?;

        let listed = match resolve(&name, &snapshot) {
            Resolution::Found { project, tier } => {
                debug!("Resolved '{}' to '{}' ({:?} match)", name, project.name, tier);
                project
            }
            Resolution::NotFound => {
                writeln!(err, "No clear match for {name}.")?;
                return Ok(Outcome::NotFound);
            }
            Resolution::Ambiguous(candidates) => {
                writeln!(err, "Multiple options match:")?;
                for candidate in candidates {
                    writeln!(err, "- {}", candidate.name)?;
                }
                writeln!(err, "No clear match for {name}.")?;
                return Ok(Outcome::Ambiguous);
            }
        };

        let project = client.get_project(listed.id).await?;

        if self.tags {
            let project = project.with_tags(client.list_tags(listed.id).await?);
            for tag in &project.tags {
                writeln!(out, "{tag}")?;
            }
        } else if self.git_url {
            writeln!(out, "{}", project.clone_url)?;
        } else {
            writeln!(out, "{}", project.attributes_pretty()?)?;
        }

        Ok(Outcome::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use e3_core::catalog::{Group, MemoryCatalog, Project};
    use pretty_assertions::assert_eq;

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::new()
            .with_group(215, Group::new(10, "motion"))
            .with_project(215, Project::new(1, "e3-require", "git@host:e3/e3-require.git"))
            .with_project(10, Project::new(2, "e3-motor", "git@host:e3/e3-motor.git"))
            .with_project(10, Project::new(3, "e3-motorcontrol", "git@host:e3/e3-motorcontrol.git"))
            .with_project(10, Project::new(4, "e3-foo-a", ""))
            .with_project(10, Project::new(5, "e3-foo-b", ""))
            .with_project(10, Project::new(6, "e3-sandbox", ""))
            .with_tags(2, &["7.0.2", "7.0.1"])
    }

    fn config() -> CatalogConfig {
        CatalogConfig {
            excluded_projects: vec!["e3-sandbox".to_string()],
            ..Default::default()
        }
    }

    fn command(name: Option<&str>) -> ModuleCommand {
        ModuleCommand {
            name: name.map(str::to_string),
            all: name.is_none(),
            git_url: false,
            tags: false,
        }
    }

    async fn run_with_stderr(command: ModuleCommand) -> (Outcome, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let outcome = command
            .execute(&catalog(), &config(), &mut out, &mut err)
            .await
            .unwrap();
        (
            outcome,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    async fn run(command: ModuleCommand) -> (Outcome, String) {
        let (outcome, output, _) = run_with_stderr(command).await;
        (outcome, output)
    }

    #[tokio::test]
    async fn test_list_all_modules() {
        let (outcome, output) = run(command(None)).await;

        assert_eq!(outcome, Outcome::Success);
        assert_eq!(
            output,
            "There are 5 projects:\ne3-require\ne3-motor\ne3-motorcontrol\ne3-foo-a\ne3-foo-b\n"
        );
    }

    #[tokio::test]
    async fn test_git_url_of_prefixed_match() {
        let (outcome, output) = run(ModuleCommand {
            git_url: true,
            ..command(Some("motor"))
        })
        .await;

        assert_eq!(outcome, Outcome::Success);
        assert_eq!(output, "git@host:e3/e3-motor.git\n");
    }

    #[tokio::test]
    async fn test_git_url_output_is_clean_when_unresolved() {
        let (outcome, output, errors) = run_with_stderr(ModuleCommand {
            git_url: true,
            ..command(Some("foo"))
        })
        .await;

        assert_eq!(outcome, Outcome::Ambiguous);
        assert!(output.is_empty());
        assert!(errors.ends_with("No clear match for foo.\n"));
    }

    #[tokio::test]
    async fn test_tags() {
        let (_, output) = run(ModuleCommand {
            tags: true,
            ..command(Some("e3-motor"))
        })
        .await;

        assert_eq!(output, "7.0.2\n7.0.1\n");
    }

    #[tokio::test]
    async fn test_attributes() {
        let (_, output) = run(command(Some("require"))).await;
        assert!(output.contains("\"name\": \"e3-require\""));
    }

    #[tokio::test]
    async fn test_ambiguous_lists_candidates() {
        let (outcome, output, errors) = run_with_stderr(command(Some("foo"))).await;

        assert_eq!(outcome, Outcome::Ambiguous);
        assert_eq!(output, "");
        assert_eq!(
            errors,
            "Multiple options match:\n- e3-foo-a\n- e3-foo-b\nNo clear match for foo.\n"
        );
    }

    #[tokio::test]
    async fn test_not_found_and_excluded() {
        for name in ["sequencer", "sandbox"] {
            let (outcome, output, errors) = run_with_stderr(command(Some(name))).await;
            assert_eq!(outcome, Outcome::NotFound);
            assert_eq!(output, "");
            assert_eq!(errors, format!("No clear match for {name}.\n"));
        }
    }
}
