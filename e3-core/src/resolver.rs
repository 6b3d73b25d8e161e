//! Module name resolution
//!
//! Maps a user-supplied module name to one catalog project. Three tiers run
//! in order and the first hit wins:
//!
//! 1. **Exact**: `target` is a project name.
//! 2. **Prefixed**: `e3-{target}` is a project name. Module projects carry
//!    the `e3-` prefix, which users usually leave out.
//! 3. **Fuzzy**: `target` is a regular expression searched, unanchored and
//!    case-sensitively, in every listed project name. A target that does
//!    not compile as a regular expression is searched as a plain substring.
//!    One match selects that project; several make the result ambiguous.
//!
//! The fuzzy tier scans the full listing rather than the name index, so two
//! projects sharing a name both show up as candidates. Repeats of the same
//! project id count once.

use regex::Regex;

use crate::catalog::{CatalogSnapshot, Project};

/// Prefix carried by module projects in the catalog
pub const MODULE_PREFIX: &str = "e3-";

/// Which tier produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    Prefixed,
    Fuzzy,
}

/// Outcome of resolving a module name
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a> {
    /// Exactly one project matched
    Found {
        project: &'a Project,
        tier: MatchTier,
    },
    /// Nothing matched at any tier
    NotFound,
    /// Several projects matched the fuzzy tier, in listing order
    Ambiguous(Vec<&'a Project>),
}

impl<'a> Resolution<'a> {
    /// The selected project, if resolution succeeded
    pub fn project(&self) -> Option<&'a Project> {
        match self {
            Resolution::Found { project, .. } => Some(project),
            _ => None,
        }
    }

    /// Names of the competing candidates (empty unless ambiguous)
    pub fn candidate_names(&self) -> Vec<&'a str> {
        match self {
            Resolution::Ambiguous(candidates) => {
                candidates.iter().map(|p| p.name.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// Search pattern for the fuzzy tier
enum Pattern {
    Regex(Regex),
    Literal(String),
}

impl Pattern {
    fn new(target: &str) -> Self {
        match Regex::new(target) {
            Ok(regex) => Pattern::Regex(regex),
            Err(e) => {
                tracing::debug!(
                    "'{}' is not a valid regular expression ({}); matching it literally",
                    target,
                    e
                );
                Pattern::Literal(target.to_string())
            }
        }
    }

    fn is_match(&self, name: &str) -> bool {
        match self {
            Pattern::Regex(regex) => regex.is_match(name),
            Pattern::Literal(literal) => name.contains(literal.as_str()),
        }
    }
}

/// Resolve `target` against a catalog snapshot
pub fn resolve<'a>(target: &str, snapshot: &'a CatalogSnapshot) -> Resolution<'a> {
    if let Some(project) = snapshot.get(target) {
        return Resolution::Found {
            project,
            tier: MatchTier::Exact,
        };
    }

    if let Some(project) = snapshot.get(&format!("{MODULE_PREFIX}{target}")) {
        return Resolution::Found {
            project,
            tier: MatchTier::Prefixed,
        };
    }

    let pattern = Pattern::new(target);
    let mut candidates: Vec<&Project> = Vec::new();
    for project in snapshot.projects() {
        // A listing may repeat the same remote project
        if pattern.is_match(&project.name) && !candidates.iter().any(|c| c.id == project.id) {
            candidates.push(project);
        }
    }

    tracing::debug!(
        "Fuzzy match for '{}' found {} candidate(s)",
        target,
        candidates.len()
    );

    match candidates.len() {
        0 => Resolution::NotFound,
        1 => Resolution::Found {
            project: candidates.remove(0),
            tier: MatchTier::Fuzzy,
        },
        _ => Resolution::Ambiguous(candidates),
    }
}
