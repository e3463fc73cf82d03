//! iNaturalist API response types
//!
//! Reference: https://api.inaturalist.org/v1/docs/

use serde::Deserialize;

use crate::error::ObservationError;
use crate::taxonomy::{Coordinates, Observation, Taxon};

/// Top-level wrapper shared by the v1 list endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub results: Vec<T>,
}

/// Observation as returned by `GET /observations/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct ObservationRecord {
    #[serde(default)]
    pub id: Option<u64>,

    /// `"lat,lng"`, absent or empty without a GPS fix
    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub taxon: Option<Taxon>,

    #[serde(default)]
    pub species_guess: Option<String>,

    #[serde(default)]
    pub uri: Option<String>,
}

impl TryFrom<ObservationRecord> for Observation {
    type Error = ObservationError;

    fn try_from(record: ObservationRecord) -> Result<Self, Self::Error> {
        let location = match record.location.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<Coordinates>()?),
        };

        Ok(Observation {
            id: record.id,
            location,
            taxon: record.taxon,
        })
    }
}
