//! Installed e3 environment inspection
//!
//! An e3 environment is located through three environment variables; the
//! installed modules live below it in `siteMods`:
//!
//! ```text
//! $EPICS_BASE/$E3_REQUIRE_NAME/$E3_REQUIRE_VERSION/siteMods/
//! └── <module>/
//!     └── <version>/
//!         └── <module>_meta.yaml
//! ```

mod inspector;

pub use inspector::{metadata_file, InstalledModule, InstalledVersion, Inspector, Metadata};

use std::path::PathBuf;

use crate::error::E3Error;

pub const EPICS_BASE: &str = "EPICS_BASE";
pub const E3_REQUIRE_NAME: &str = "E3_REQUIRE_NAME";
pub const E3_REQUIRE_VERSION: &str = "E3_REQUIRE_VERSION";

/// Variables that must all be set to inspect an environment
pub const REQUIRED_VARIABLES: [&str; 3] = [EPICS_BASE, E3_REQUIRE_NAME, E3_REQUIRE_VERSION];

/// Directory holding installed modules, relative to the require version
pub const SITE_MODS: &str = "siteMods";

/// Location of an installed e3 environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    pub epics_base: PathBuf,
    pub require_name: String,
    pub require_version: String,
}

impl EnvConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, E3Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`; unset and empty variables
    /// are both reported as missing
    pub fn from_lookup<F>(lookup: F) -> Result<Self, E3Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let values: Vec<Option<String>> = REQUIRED_VARIABLES
            .iter()
            .map(|key| lookup(key).filter(|value| !value.is_empty()))
            .collect();

        let missing: Vec<&'static str> = REQUIRED_VARIABLES
            .iter()
            .zip(&values)
            .filter(|(_, value)| value.is_none())
            .map(|(key, _)| *key)
            .collect();

        match values.as_slice() {
            [Some(base), Some(name), Some(version)] => Ok(Self {
                epics_base: PathBuf::from(base),
                require_name: name.clone(),
                require_version: version.clone(),
            }),
            _ => Err(E3Error::MissingEnvironment {
                required: REQUIRED_VARIABLES.to_vec(),
                missing,
            }),
        }
    }

    /// `<EPICS_BASE>/<E3_REQUIRE_NAME>/<E3_REQUIRE_VERSION>/siteMods`
    pub fn sitemods_path(&self) -> PathBuf {
        self.epics_base
            .join(&self.require_name)
            .join(&self.require_version)
            .join(SITE_MODS)
    }
}
