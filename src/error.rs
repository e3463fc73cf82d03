//! Error handling for the nearby-genus finder
//!
//! One `thiserror` enum per concern, wrapped by [`NearbyError`] for callers
//! that drive the whole pipeline.

use thiserror::Error;

use crate::taxonomy::TaxonSnapshot;

/// Main error type for the finder pipeline
#[derive(Error, Debug)]
pub enum NearbyError {
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Observation(#[from] ObservationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

/// Observation reference could not be decoded into an id
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("Could not extract observation ID from: {input}")]
    Unparseable { input: String },
}

/// Failures of the remote collaborators (observation fetch, genus search)
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("No {entity} found for '{key}'")]
    NotFound { entity: &'static str, key: String },

    #[error("Request to iNaturalist API failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("iNaturalist API error {status} from {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Failed to parse response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl FetchError {
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// True when the remote service simply has no such entity
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// The fetched observation lacks something the pipeline needs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObservationError {
    #[error("This observation doesn't have GPS coordinates available")]
    MissingLocation,

    #[error("Invalid location format: {0}")]
    InvalidLocation(String),

    #[error("This observation doesn't have taxonomic information")]
    MissingTaxon,
}

/// No genus-resolution strategy succeeded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Could not determine genus for this observation ({0})")]
    Unresolved(TaxonSnapshot),
}
