//! Filter dimensions and the per-request selection

use serde::{Deserialize, Serialize};

use crate::models::Organism;

/// One independently filterable field of the organism catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Kingdom,
    Phylum,
    ClassName,
    Organism,
    Query,
}

impl Dimension {
    /// Every dimension, in display order
    pub const ALL: [Dimension; 5] = [
        Dimension::Kingdom,
        Dimension::Phylum,
        Dimension::ClassName,
        Dimension::Organism,
        Dimension::Query,
    ];

    /// The fixed taxonomy hierarchy: kingdom < phylum < class_name
    pub const HIERARCHY: [Dimension; 3] =
        [Dimension::Kingdom, Dimension::Phylum, Dimension::ClassName];

    /// Query-string key for this dimension
    pub fn key(self) -> &'static str {
        match self {
            Dimension::Kingdom => "kingdom",
            Dimension::Phylum => "phylum",
            Dimension::ClassName => "class_name",
            Dimension::Organism => "organism",
            Dimension::Query => "query",
        }
    }

    /// Parse a query-string key; unknown keys yield `None`
    pub fn parse(key: &str) -> Option<Dimension> {
        match key {
            "kingdom" => Some(Dimension::Kingdom),
            "phylum" => Some(Dimension::Phylum),
            "class_name" => Some(Dimension::ClassName),
            "organism" => Some(Dimension::Organism),
            "query" => Some(Dimension::Query),
            _ => None,
        }
    }

    /// Whether this dimension participates in the taxonomy hierarchy
    pub fn is_hierarchical(self) -> bool {
        Self::HIERARCHY.contains(&self)
    }

    /// Hierarchy dimensions strictly above this one (its ancestors)
    pub fn ancestors(self) -> &'static [Dimension] {
        match self {
            Dimension::Phylum => &[Dimension::Kingdom],
            Dimension::ClassName => &[Dimension::Kingdom, Dimension::Phylum],
            _ => &[],
        }
    }

    /// Hierarchy dimensions strictly below this one (its descendants)
    pub fn descendants(self) -> &'static [Dimension] {
        match self {
            Dimension::Kingdom => &[Dimension::Phylum, Dimension::ClassName],
            Dimension::Phylum => &[Dimension::ClassName],
            _ => &[],
        }
    }

    /// The value an organism record holds for this dimension, if any.
    /// The free-text query dimension has no record-side value.
    pub fn value_of(self, organism: &Organism) -> Option<&str> {
        match self {
            Dimension::Kingdom => organism.kingdom.as_deref(),
            Dimension::Phylum => organism.phylum.as_deref(),
            Dimension::ClassName => organism.class_name.as_deref(),
            Dimension::Organism => Some(organism.scientific_name.as_str()),
            Dimension::Query => None,
        }
    }
}

/// Current filter selection: at most one value per dimension, absence means
/// unconstrained. Created fresh per request from the query string and never
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub kingdom: Option<String>,
    pub phylum: Option<String>,
    pub class_name: Option<String>,
    pub organism: Option<String>,
    pub query: Option<String>,
}

impl FilterSelection {
    pub fn get(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Kingdom => self.kingdom.as_deref(),
            Dimension::Phylum => self.phylum.as_deref(),
            Dimension::ClassName => self.class_name.as_deref(),
            Dimension::Organism => self.organism.as_deref(),
            Dimension::Query => self.query.as_deref(),
        }
    }

    /// Set or clear one dimension. An empty value clears, so "All" options
    /// submitted as empty strings degrade to unconstrained.
    pub fn set(&mut self, dimension: Dimension, value: Option<String>) {
        let value = value.filter(|v| !v.is_empty());
        match dimension {
            Dimension::Kingdom => self.kingdom = value,
            Dimension::Phylum => self.phylum = value,
            Dimension::ClassName => self.class_name = value,
            Dimension::Organism => self.organism = value,
            Dimension::Query => self.query = value,
        }
    }

    /// Builder-style `set`, used by tests and fixtures
    pub fn with(mut self, dimension: Dimension, value: &str) -> Self {
        self.set(dimension, Some(value.to_string()));
        self
    }

    pub fn is_empty(&self) -> bool {
        Dimension::ALL.iter().all(|d| self.get(*d).is_none())
    }

    /// Whether `organism` satisfies every populated dimension
    pub fn matches(&self, organism: &Organism) -> bool {
        Dimension::ALL
            .iter()
            .all(|d| self.dimension_matches(organism, *d))
    }

    /// Whether `organism` satisfies every populated dimension except `skip`.
    /// Used by the option builder so the user can see and switch among
    /// sibling values without first clearing the filter.
    pub fn matches_except(&self, organism: &Organism, skip: Dimension) -> bool {
        self.matches_excluding(organism, &[skip])
    }

    /// Like [`matches_except`](Self::matches_except) for a set of skipped
    /// dimensions.
    pub fn matches_excluding(&self, organism: &Organism, skip: &[Dimension]) -> bool {
        Dimension::ALL
            .iter()
            .filter(|d| !skip.contains(d))
            .all(|d| self.dimension_matches(organism, *d))
    }

    fn dimension_matches(&self, organism: &Organism, dimension: Dimension) -> bool {
        let Some(wanted) = self.get(dimension) else {
            return true;
        };
        match dimension {
            Dimension::Query => organism_matches_text(organism, wanted),
            _ => dimension.value_of(organism) == Some(wanted),
        }
    }
}

/// Case-insensitive substring match over the organism's name and taxonomy
/// fields, mirroring the listing's free-text search.
fn organism_matches_text(organism: &Organism, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    let mut haystacks = vec![organism.scientific_name.as_str()];
    haystacks.extend(organism.common_name.as_deref());
    haystacks.extend(organism.kingdom.as_deref());
    haystacks.extend(organism.phylum.as_deref());
    haystacks.extend(organism.class_name.as_deref());
    haystacks
        .iter()
        .any(|h| h.to_lowercase().contains(&needle))
}
