//! e3 env commands
//!
//! Lists the modules and versions installed in the sourced e3 environment.

use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use e3_core::env::{EnvConfig, InstalledModule, Inspector, Metadata};
use e3_core::E3Error;

use crate::outcome::Outcome;

/// Show installed versions of one module, or of all modules
#[derive(Args, Debug)]
pub struct EnvCommand {
    /// Module name
    #[clap(conflicts_with = "all")]
    pub name: Option<String>,

    /// Show all installed modules
    #[clap(long)]
    pub all: bool,

    /// Print each version's metadata
    #[clap(long)]
    pub meta: bool,
}

/// Table row for installed modules
#[derive(Tabled)]
struct InstalledRow {
    #[tabled(rename = "Module")]
    name: String,
    #[tabled(rename = "Versions")]
    versions: String,
}

impl EnvCommand {
    /// Command output goes to `out`; a module that is not installed is
    /// reported on `err`
    pub fn execute<W: Write, E: Write>(
        self,
        config: &EnvConfig,
        out: &mut W,
        err: &mut E,
    ) -> Result<Outcome> {
        if !self.all && self.name.is_none() {
            anyhow::bail!("You have to provide a module name, or use --all");
        }

        let inspector = Inspector::new(config).with_metadata(self.meta);
        writeln!(out, "{}", inspector.sitemods_path().display())?;

        if self.all {
            let modules = inspector.list_modules()?;
            if self.meta {
                for module in &modules {
                    write_module(out, module)?;
                }
            } else {
                write_table(out, &modules)?;
            }
            return Ok(Outcome::Success);
        }

        let name = self.name.context("Module name is required")?;
        match inspector.module(&name) {
            Ok(module) => {
                write_module(out, &module)?;
                Ok(Outcome::Success)
            }
            Err(e) => match e.downcast_ref::<E3Error>() {
                Some(e3_err) if e3_err.is_not_found() => {
                    writeln!(err, "{e3_err}")?;
                    Ok(Outcome::NotFound)
                }
                _ => Err(e),
            },
        }
    }
}

fn write_module<W: Write>(out: &mut W, module: &InstalledModule) -> Result<()> {
    writeln!(out, "{}", module.name)?;
    for version in &module.versions {
        writeln!(out, "- {}", version.version)?;
        match &version.metadata {
            None => {}
            Some(Metadata::Missing) => writeln!(out, "  metadata missing")?,
            Some(Metadata::Unreadable(reason)) => {
                writeln!(out, "  metadata unreadable: {reason}")?
            }
            Some(Metadata::Document(document)) => {
                let rendered = serde_yaml_ng::to_string(document)
                    .context("Failed to format module metadata")?;
                for line in rendered.lines() {
                    writeln!(out, "  {line}")?;
                }
            }
        }
    }
    Ok(())
}

fn write_table<W: Write>(out: &mut W, modules: &[InstalledModule]) -> Result<()> {
    if modules.is_empty() {
        writeln!(out, "No modules installed.")?;
        return Ok(());
    }

    let rows: Vec<InstalledRow> = modules
        .iter()
        .map(|module| InstalledRow {
            name: module.name.clone(),
            versions: module.version_names().join(", "),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string();

    writeln!(out, "{table}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn environment(root: &Path) -> EnvConfig {
        EnvConfig {
            epics_base: root.to_path_buf(),
            require_name: "require".to_string(),
            require_version: "5.0.0".to_string(),
        }
    }

    fn install(config: &EnvConfig, module: &str, version: &str, meta: Option<&str>) {
        let dir = config.sitemods_path().join(module).join(version);
        fs::create_dir_all(&dir).unwrap();
        if let Some(content) = meta {
            fs::write(dir.join(format!("{module}_meta.yaml")), content).unwrap();
        }
    }

    fn run_with_stderr(command: EnvCommand, config: &EnvConfig) -> (Outcome, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let outcome = command.execute(config, &mut out, &mut err).unwrap();
        (
            outcome,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    fn run(command: EnvCommand, config: &EnvConfig) -> (Outcome, String) {
        let (outcome, output, _) = run_with_stderr(command, config);
        (outcome, output)
    }

    #[test]
    fn test_meta_marks_missing_versions() {
        let temp_dir = TempDir::new().unwrap();
        let config = environment(temp_dir.path());
        install(&config, "motor", "7.0.1", Some("asyn: 4.42.0\n"));
        install(&config, "motor", "7.0.2", None);

        let (outcome, output) = run(
            EnvCommand {
                name: Some("motor".to_string()),
                all: false,
                meta: true,
            },
            &config,
        );

        assert_eq!(outcome, Outcome::Success);
        let expected = format!(
            "{}\nmotor\n- 7.0.1\n  asyn: 4.42.0\n- 7.0.2\n  metadata missing\n",
            config.sitemods_path().display()
        );
        assert_eq!(output, expected);
    }

    #[test]
    fn test_versions_without_meta() {
        let temp_dir = TempDir::new().unwrap();
        let config = environment(temp_dir.path());
        install(&config, "asyn", "4.42.0", Some("a: 1\n"));

        let (_, output) = run(
            EnvCommand {
                name: Some("asyn".to_string()),
                all: false,
                meta: false,
            },
            &config,
        );

        assert!(output.ends_with("asyn\n- 4.42.0\n"));
        assert!(!output.contains("a: 1"));
    }

    #[test]
    fn test_all_renders_table() {
        let temp_dir = TempDir::new().unwrap();
        let config = environment(temp_dir.path());
        install(&config, "motor", "7.0.1", None);
        install(&config, "motor", "7.0.2", None);
        install(&config, "asyn", "4.42.0", None);

        let (_, output) = run(
            EnvCommand {
                name: None,
                all: true,
                meta: false,
            },
            &config,
        );

        assert!(output.contains("Module"));
        assert!(output.contains("7.0.1, 7.0.2"));
        assert!(output.find("asyn").unwrap() < output.find("motor").unwrap());
    }

    #[test]
    fn test_all_with_meta() {
        let temp_dir = TempDir::new().unwrap();
        let config = environment(temp_dir.path());
        install(&config, "motor", "7.0.1", None);

        let (_, output) = run(
            EnvCommand {
                name: None,
                all: true,
                meta: true,
            },
            &config,
        );

        assert!(output.ends_with("motor\n- 7.0.1\n  metadata missing\n"));
    }

    #[test]
    fn test_module_not_installed() {
        let temp_dir = TempDir::new().unwrap();
        let config = environment(temp_dir.path());
        fs::create_dir_all(config.sitemods_path()).unwrap();

        let (outcome, output, errors) = run_with_stderr(
            EnvCommand {
                name: Some("motor".to_string()),
                all: false,
                meta: false,
            },
            &config,
        );

        assert_eq!(outcome, Outcome::NotFound);
        assert_eq!(output, format!("{}\n", config.sitemods_path().display()));
        assert!(errors.contains("Module motor is not installed"));
    }

    #[test]
    fn test_name_required_without_all() {
        let temp_dir = TempDir::new().unwrap();
        let config = environment(temp_dir.path());

        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = EnvCommand {
            name: None,
            all: false,
            meta: true,
        }
        .execute(&config, &mut out, &mut err);

        assert!(result.is_err());
        assert!(out.is_empty());
    }
}
