//! Taxonomy and observation domain types
//!
//! These deserialize straight from the iNaturalist v1 API payloads. Fields the
//! API may omit default to empty values so a sparse record still loads.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::ObservationError;

// =============================================================================
// RANK
// =============================================================================

/// Taxonomic rank. Only genus and species drive resolution; everything else
/// is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum Rank {
    Genus,
    Species,
    Other(String),
}

impl Rank {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Genus => "genus",
            Self::Species => "species",
            Self::Other(s) => s,
        }
    }

    pub fn is_genus(&self) -> bool {
        matches!(self, Self::Genus)
    }

    pub fn is_species(&self) -> bool {
        matches!(self, Self::Species)
    }
}

impl Default for Rank {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for Rank {
    fn from(s: String) -> Self {
        match s.as_str() {
            "genus" => Self::Genus,
            "species" => Self::Species,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for Rank {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// TAXON
// =============================================================================

/// One node of a classification, with the ancestor chain and direct parent
/// as supplied alongside the observation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Taxon {
    pub id: u64,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub rank: Rank,

    /// Numeric rank level (genus = 20, species = 10); diagnostics only
    #[serde(default)]
    pub rank_level: Option<f64>,

    /// Root-to-parent order
    #[serde(default)]
    pub ancestors: Vec<Taxon>,

    #[serde(default)]
    pub parent: Option<Box<Taxon>>,
}

impl Taxon {
    pub fn new(id: u64, name: impl Into<String>, rank: impl Into<Rank>) -> Self {
        Self {
            id,
            name: name.into(),
            rank: rank.into(),
            rank_level: None,
            ancestors: Vec::new(),
            parent: None,
        }
    }

    pub fn with_ancestors(mut self, ancestors: Vec<Taxon>) -> Self {
        self.ancestors = ancestors;
        self
    }

    pub fn with_parent(mut self, parent: Taxon) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    pub fn snapshot(&self) -> TaxonSnapshot {
        TaxonSnapshot {
            id: self.id,
            name: self.name.clone(),
            rank: self.rank.clone(),
            ancestor_count: self.ancestors.len(),
            has_parent: self.parent.is_some(),
        }
    }
}

/// Flat summary of a taxon for error reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonSnapshot {
    pub id: u64,
    pub name: String,
    pub rank: Rank,
    pub ancestor_count: usize,
    pub has_parent: bool,
}

impl fmt::Display for TaxonSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "taxon id={}, name='{}', rank={}, ancestors={}, parent={}",
            self.id,
            self.name,
            self.rank,
            self.ancestor_count,
            if self.has_parent { "present" } else { "absent" }
        )
    }
}

// =============================================================================
// OBSERVATION
// =============================================================================

/// Latitude/longitude in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl FromStr for Coordinates {
    type Err = ObservationError;

    /// Parse the API's `"lat,lng"` form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ObservationError::InvalidLocation(s.to_string());

        let mut parts = s.split(',');
        let (lat, lng) = match (parts.next(), parts.next(), parts.next()) {
            (Some(lat), Some(lng), None) => (lat, lng),
            _ => return Err(invalid()),
        };

        Ok(Self {
            latitude: lat.trim().parse().map_err(|_| invalid())?,
            longitude: lng.trim().parse().map_err(|_| invalid())?,
        })
    }
}

/// An observation as consumed by the finder
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub id: Option<u64>,
    /// `None` when the observation has no GPS fix
    pub location: Option<Coordinates>,
    /// `None` when the observation is unidentified
    pub taxon: Option<Taxon>,
}

impl Observation {
    /// Name of the identified taxon, if any
    pub fn species_name(&self) -> Option<&str> {
        self.taxon
            .as_ref()
            .map(|t| t.name.as_str())
            .filter(|n| !n.is_empty())
    }
}
