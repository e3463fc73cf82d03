//! iNaturalist nearby-genus finder
//!
//! Takes one iNaturalist observation (id or link), works out the genus of the
//! observed organism and builds a search URL for observations of that genus
//! within 1km of the source observation.
//!
//! ## Pipeline
//! Reference -> Observation fetch -> Genus resolution -> Proximity locator
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use inat_nearby::{finder::NearbyFinder, inaturalist::INatClient};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = Arc::new(INatClient::from_env()?);
//! let report = NearbyFinder::with_client(client)
//!     .find("https://www.inaturalist.org/observations/12345")
//!     .await?;
//! println!("{}", report.url);
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Domain types
pub mod taxonomy;

// Reference parsing, genus resolution, locator building
pub mod locator;
pub mod reference;
pub mod resolver;

// Remote API and configuration
pub mod config;
pub mod inaturalist;

// End-to-end pipeline
pub mod finder;

pub use error::NearbyError;
pub use finder::{NearbyFinder, NearbyReport, ObservationSource};
pub use resolver::{GenusLookup, ResolvedGenus};
