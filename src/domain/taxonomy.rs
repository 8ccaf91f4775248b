//! Static three-level taxonomies: expertise (domain/category/skill) and
//! location (country/state/LGA).
//!
//! Both file formats collapse into one [`Taxonomy`] shape. The taxonomy is
//! read-only once loaded.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::path::{KeyPath, Level};

/// Which of the two pickers a taxonomy feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomyKind {
    Expertise,
    Location,
}

impl TaxonomyKind {
    pub const ALL: [TaxonomyKind; 2] = [TaxonomyKind::Expertise, TaxonomyKind::Location];

    /// User-facing name of a level for this kind.
    pub fn level_name(self, level: Level) -> &'static str {
        match (self, level) {
            (TaxonomyKind::Expertise, Level::Root) => "domain",
            (TaxonomyKind::Expertise, Level::Branch) => "category",
            (TaxonomyKind::Expertise, Level::Leaf) => "skill",
            (TaxonomyKind::Location, Level::Root) => "country",
            (TaxonomyKind::Location, Level::Branch) => "state",
            (TaxonomyKind::Location, Level::Leaf) => "lga",
        }
    }
}

impl fmt::Display for TaxonomyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxonomyKind::Expertise => f.write_str("expertise"),
            TaxonomyKind::Location => f.write_str("location"),
        }
    }
}

impl FromStr for TaxonomyKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expertise" => Ok(TaxonomyKind::Expertise),
            "location" => Ok(TaxonomyKind::Location),
            other => Err(DomainError::InvalidKey {
                key: other.to_string(),
                reason: "expected 'expertise' or 'location'".to_string(),
            }),
        }
    }
}

/// Level-3 node: skill or LGA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode {
    pub id: String,
    pub label: String,
}

/// Level-2 node: category or state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchNode {
    pub id: String,
    pub label: String,
    pub leaves: Vec<LeafNode>,
}

/// Level-1 node: domain or country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootNode {
    pub id: String,
    pub label: String,
    pub branches: Vec<BranchNode>,
}

impl RootNode {
    pub fn branch(&self, id: &str) -> Option<&BranchNode> {
        self.branches.iter().find(|b| b.id == id)
    }
}

impl BranchNode {
    pub fn leaf(&self, id: &str) -> Option<&LeafNode> {
        self.leaves.iter().find(|l| l.id == id)
    }
}

/// Immutable three-level tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    pub kind: TaxonomyKind,
    pub roots: Vec<RootNode>,
}

// ============================================================
// FILE FORMATS
// ============================================================

#[derive(Debug, Deserialize)]
struct ExpertiseFile {
    #[serde(default)]
    domains: Vec<RawDomain>,
}

#[derive(Debug, Deserialize)]
struct RawDomain {
    id: String,
    label: String,
    #[serde(default)]
    categories: Vec<RawCategory>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    id: String,
    label: String,
    #[serde(default)]
    skills: Vec<RawSkill>,
}

#[derive(Debug, Deserialize)]
struct RawSkill {
    id: String,
    label: String,
}

#[derive(Debug, Deserialize)]
struct LocationFile {
    #[serde(default)]
    countries: Vec<RawCountry>,
}

#[derive(Debug, Deserialize)]
struct RawCountry {
    id: String,
    label: Option<String>,
    #[serde(default)]
    states: Vec<RawState>,
}

/// States carry no separate label; LGAs are bare strings.
#[derive(Debug, Deserialize)]
struct RawState {
    state: String,
    #[serde(default)]
    lgas: Vec<String>,
}

impl From<ExpertiseFile> for Taxonomy {
    fn from(file: ExpertiseFile) -> Self {
        let roots = file
            .domains
            .into_iter()
            .map(|d| RootNode {
                id: d.id,
                label: d.label,
                branches: d
                    .categories
                    .into_iter()
                    .map(|c| BranchNode {
                        id: c.id,
                        label: c.label,
                        leaves: c
                            .skills
                            .into_iter()
                            .map(|s| LeafNode {
                                id: s.id,
                                label: s.label,
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        Taxonomy {
            kind: TaxonomyKind::Expertise,
            roots,
        }
    }
}

impl From<LocationFile> for Taxonomy {
    fn from(file: LocationFile) -> Self {
        let roots = file
            .countries
            .into_iter()
            .map(|c| RootNode {
                label: c.label.unwrap_or_else(|| c.id.clone()),
                id: c.id,
                branches: c
                    .states
                    .into_iter()
                    .map(|s| BranchNode {
                        label: s.state.clone(),
                        id: s.state,
                        leaves: s
                            .lgas
                            .into_iter()
                            .map(|lga| LeafNode {
                                label: lga.clone(),
                                id: lga,
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        Taxonomy {
            kind: TaxonomyKind::Location,
            roots,
        }
    }
}

fn key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // no control characters, no surrounding whitespace
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s\x00-\x1f](?:[^\x00-\x1f]*[^\s\x00-\x1f])?$").expect("valid key pattern")
    })
}

fn validate_key(key: &str) -> DomainResult<()> {
    if key_pattern().is_match(key) {
        Ok(())
    } else {
        Err(DomainError::InvalidKey {
            key: key.to_string(),
            reason: "keys must be non-empty without control characters or surrounding whitespace"
                .to_string(),
        })
    }
}

fn check_unique<'a>(parent: &str, keys: impl Iterator<Item = &'a str>) -> DomainResult<()> {
    let mut seen = HashSet::new();
    for key in keys {
        validate_key(key)?;
        if !seen.insert(key) {
            return Err(DomainError::DuplicateKey {
                parent: parent.to_string(),
                key: key.to_string(),
            });
        }
    }
    Ok(())
}

impl Taxonomy {
    /// Parse a taxonomy file of the given kind from TOML.
    pub fn parse(kind: TaxonomyKind, content: &str) -> DomainResult<Self> {
        let taxonomy: Taxonomy = match kind {
            TaxonomyKind::Expertise => toml::from_str::<ExpertiseFile>(content)
                .map_err(|e| invalid_format(kind, e))?
                .into(),
            TaxonomyKind::Location => toml::from_str::<LocationFile>(content)
                .map_err(|e| invalid_format(kind, e))?
                .into(),
        };
        taxonomy.validate()?;
        Ok(taxonomy)
    }

    /// Check that the tree is non-empty and ids are unique within each parent.
    pub fn validate(&self) -> DomainResult<()> {
        if self.roots.is_empty() {
            return Err(DomainError::EmptyTaxonomy(self.kind.to_string()));
        }
        check_unique(
            &self.kind.to_string(),
            self.roots.iter().map(|r| r.id.as_str()),
        )?;
        for root in &self.roots {
            check_unique(&root.id, root.branches.iter().map(|b| b.id.as_str()))?;
            for branch in &root.branches {
                check_unique(
                    &format!("{}/{}", root.id, branch.id),
                    branch.leaves.iter().map(|l| l.id.as_str()),
                )?;
            }
        }
        Ok(())
    }

    pub fn root(&self, id: &str) -> Option<&RootNode> {
        self.roots.iter().find(|r| r.id == id)
    }

    /// True when every segment of `path` names an existing node.
    pub fn contains(&self, path: &KeyPath) -> bool {
        self.label_of(path).is_some()
    }

    /// Label of the node addressed by `path`, if present.
    pub fn label_of(&self, path: &KeyPath) -> Option<&str> {
        match path {
            KeyPath::Root(r) => self.root(r).map(|n| n.label.as_str()),
            KeyPath::Branch(r, b) => self
                .root(r)
                .and_then(|n| n.branch(b))
                .map(|n| n.label.as_str()),
            KeyPath::Leaf(r, b, l) => self
                .root(r)
                .and_then(|n| n.branch(b))
                .and_then(|n| n.leaf(l))
                .map(|n| n.label.as_str()),
        }
    }

    /// Total number of nodes across all three levels.
    pub fn node_count(&self) -> usize {
        self.roots
            .iter()
            .map(|r| 1 + r.branches.iter().map(|b| 1 + b.leaves.len()).sum::<usize>())
            .sum()
    }

    /// Stable SHA-256 digest (hex) of the tree contents.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.kind.to_string().as_bytes());
        for root in &self.roots {
            hasher.update(format!("\n0\t{}\t{}", root.id, root.label).as_bytes());
            for branch in &root.branches {
                hasher.update(format!("\n1\t{}\t{}", branch.id, branch.label).as_bytes());
                for leaf in &branch.leaves {
                    hasher.update(format!("\n2\t{}\t{}", leaf.id, leaf.label).as_bytes());
                }
            }
        }
        hex::encode(hasher.finalize())
    }
}

fn invalid_format(kind: TaxonomyKind, e: toml::de::Error) -> DomainError {
    DomainError::InvalidFormat {
        source_name: kind.to_string(),
        message: e.message().to_string(),
    }
}
