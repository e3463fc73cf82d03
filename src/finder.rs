//! Nearby-genus finder
//!
//! Runs the whole pipeline for one observation reference:
//! parse -> fetch -> resolve genus -> build locator.
//! Either a complete [`NearbyReport`] comes back or an error; nothing partial.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{FetchError, NearbyError, ObservationError};
use crate::inaturalist::ObservationRecord;
use crate::locator;
use crate::reference::{self, ObservationId};
use crate::resolver::{self, GenusLookup, ResolvedGenus};
use crate::taxonomy::Observation;

/// Observation fetch capability
#[async_trait]
pub trait ObservationSource: Send + Sync {
    /// Fails with `FetchError::NotFound` when the service has no such id
    async fn fetch_observation(
        &self,
        id: &ObservationId,
    ) -> Result<ObservationRecord, FetchError>;
}

/// Everything the finder learned about one observation
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyReport {
    pub observation_id: ObservationId,
    pub latitude: f64,
    pub longitude: f64,
    /// Name of the observation's identified taxon
    pub species_name: Option<String>,
    pub genus: ResolvedGenus,
    /// Search URL for same-genus observations nearby
    pub url: String,
}

pub struct NearbyFinder {
    source: Arc<dyn ObservationSource>,
    lookup: Arc<dyn GenusLookup>,
}

impl NearbyFinder {
    pub fn new(source: Arc<dyn ObservationSource>, lookup: Arc<dyn GenusLookup>) -> Self {
        Self { source, lookup }
    }

    /// Build a finder where one client serves both capabilities
    pub fn with_client<C>(client: Arc<C>) -> Self
    where
        C: ObservationSource + GenusLookup + 'static,
    {
        Self {
            source: client.clone(),
            lookup: client,
        }
    }

    /// Resolve `reference` (id or link) into a nearby-genus report
    pub async fn find(&self, reference: &str) -> Result<NearbyReport, NearbyError> {
        let observation_id = reference::parse(reference)?;
        self.find_by_id(observation_id).await
    }

    /// Same as [`find`](Self::find) for an already parsed id
    pub async fn find_by_id(
        &self,
        observation_id: ObservationId,
    ) -> Result<NearbyReport, NearbyError> {
        tracing::info!(observation_id = %observation_id, "Processing observation");

        let record = self.source.fetch_observation(&observation_id).await?;
        tracing::debug!(
            observation_id = %observation_id,
            has_location = record.location.is_some(),
            has_taxon = record.taxon.is_some(),
            species_guess = ?record.species_guess,
            uri = ?record.uri,
            "Fetched observation"
        );

        let observation = Observation::try_from(record)?;
        let species_name = observation.species_name().map(str::to_string);

        let location = observation
            .location
            .ok_or(ObservationError::MissingLocation)?;
        let taxon = observation.taxon.ok_or(ObservationError::MissingTaxon)?;

        let genus = resolver::resolve(&taxon, self.lookup.as_ref()).await?;
        let url = locator::build(location.latitude, location.longitude, genus.id);

        tracing::info!(
            observation_id = %observation_id,
            genus_id = genus.id,
            genus_name = %genus.name,
            "Built proximity locator"
        );

        Ok(NearbyReport {
            observation_id,
            latitude: location.latitude,
            longitude: location.longitude,
            species_name,
            genus,
            url,
        })
    }
}
