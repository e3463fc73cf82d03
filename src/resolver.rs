//! Genus resolution
//!
//! Works out the genus of an observation's taxon by walking an ordered chain
//! of strategies, cheapest and most certain first:
//!
//! 1. **Direct genus** - the taxon itself is genus rank
//! 2. **Binomial** - first word of the name, matched against genus-rank
//!    ancestors, then against the remote registry via [`GenusLookup`]
//! 3. **Parent** - a species whose direct parent is genus rank
//!
//! Each strategy reports a [`StrategyOutcome`]; the driver moves on unless it
//! is `Found`. Lookup failures never abort the chain.

use async_trait::async_trait;
use std::fmt;

use crate::error::{FetchError, ResolutionError};
use crate::taxonomy::Taxon;

/// Marks hybrid names such as "× Chitalpa tashkentensis"
const HYBRID_MARKER: char = '×';

/// Name-to-genus-id capability backed by a remote taxonomic registry.
///
/// Implementations return the id of the first active, genus-rank taxon whose
/// name equals `name` exactly, or `FetchError::NotFound`.
#[async_trait]
pub trait GenusLookup: Send + Sync {
    async fn find_genus_id(&self, name: &str) -> Result<u64, FetchError>;
}

/// The resolved genus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedGenus {
    pub id: u64,
    pub name: String,
}

impl ResolvedGenus {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for ResolvedGenus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ID: {})", self.name, self.id)
    }
}

/// Resolution strategies in the order they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    DirectGenus,
    Binomial,
    Parent,
}

impl Strategy {
    pub const CHAIN: [Strategy; 3] = [Self::DirectGenus, Self::Binomial, Self::Parent];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectGenus => write!(f, "direct-genus"),
            Self::Binomial => write!(f, "binomial"),
            Self::Parent => write!(f, "parent"),
        }
    }
}

/// Result of a single strategy
#[derive(Debug)]
pub enum StrategyOutcome {
    Found(ResolvedGenus),
    /// Preconditions of the strategy did not hold
    NotApplicable,
    /// Remote lookup was attempted and failed (not found or transport)
    LookupFailed(FetchError),
}

/// Resolve the genus for `taxon`, consulting `lookup` only when the name
/// yields a candidate that no ancestor confirms.
pub async fn resolve(
    taxon: &Taxon,
    lookup: &dyn GenusLookup,
) -> Result<ResolvedGenus, ResolutionError> {
    trace_taxonomy(taxon, tracing::Level::DEBUG);

    for strategy in Strategy::CHAIN {
        let outcome = match strategy {
            Strategy::DirectGenus => direct_genus(taxon),
            Strategy::Binomial => binomial(taxon, lookup).await,
            Strategy::Parent => parent_genus(taxon),
        };

        match outcome {
            StrategyOutcome::Found(genus) => {
                tracing::debug!(
                    strategy = %strategy,
                    genus_id = genus.id,
                    genus_name = %genus.name,
                    "Resolved genus"
                );
                return Ok(genus);
            }
            StrategyOutcome::NotApplicable => {
                tracing::debug!(strategy = %strategy, "Strategy not applicable");
            }
            StrategyOutcome::LookupFailed(err) => {
                tracing::debug!(strategy = %strategy, error = %err, "Genus lookup failed");
            }
        }
    }

    trace_taxonomy(taxon, tracing::Level::WARN);
    Err(ResolutionError::Unresolved(taxon.snapshot()))
}

fn direct_genus(taxon: &Taxon) -> StrategyOutcome {
    if taxon.rank.is_genus() && !taxon.name.is_empty() {
        StrategyOutcome::Found(ResolvedGenus::new(taxon.id, taxon.name.clone()))
    } else {
        StrategyOutcome::NotApplicable
    }
}

/// First word of a binomial name; `None` for single words and hybrids
pub fn genus_candidate(name: &str) -> Option<&str> {
    if !name.contains(' ') || name.starts_with(HYBRID_MARKER) {
        return None;
    }
    name.split_whitespace().next()
}

async fn binomial(taxon: &Taxon, lookup: &dyn GenusLookup) -> StrategyOutcome {
    let Some(candidate) = genus_candidate(&taxon.name) else {
        return StrategyOutcome::NotApplicable;
    };

    if let Some(ancestor) = taxon
        .ancestors
        .iter()
        .find(|a| a.name == candidate && a.rank.is_genus())
    {
        tracing::debug!(
            genus_id = ancestor.id,
            genus_name = %candidate,
            "Found genus in ancestors by name"
        );
        return StrategyOutcome::Found(ResolvedGenus::new(ancestor.id, candidate));
    }

    tracing::debug!(candidate = %candidate, "Searching registry for genus");
    match lookup.find_genus_id(candidate).await {
        Ok(id) => StrategyOutcome::Found(ResolvedGenus::new(id, candidate)),
        Err(err) => StrategyOutcome::LookupFailed(err),
    }
}

fn parent_genus(taxon: &Taxon) -> StrategyOutcome {
    match taxon.parent.as_deref() {
        Some(parent)
            if taxon.rank.is_species() && parent.rank.is_genus() && !parent.name.is_empty() =>
        {
            StrategyOutcome::Found(ResolvedGenus::new(parent.id, parent.name.clone()))
        }
        _ => StrategyOutcome::NotApplicable,
    }
}

/// Structured dump of the taxon, its ancestors and direct parent
fn trace_taxonomy(taxon: &Taxon, level: tracing::Level) {
    macro_rules! emit {
        ($($arg:tt)+) => {
            if level == tracing::Level::WARN {
                tracing::warn!($($arg)+);
            } else {
                tracing::debug!($($arg)+);
            }
        };
    }

    emit!(
        taxon_id = taxon.id,
        name = %taxon.name,
        rank = %taxon.rank,
        rank_level = ?taxon.rank_level,
        ancestors = taxon.ancestors.len(),
        "Main taxon"
    );
    for (index, ancestor) in taxon.ancestors.iter().enumerate() {
        emit!(
            index,
            taxon_id = ancestor.id,
            name = %ancestor.name,
            rank = %ancestor.rank,
            "Ancestor"
        );
    }
    if let Some(parent) = taxon.parent.as_deref() {
        emit!(
            taxon_id = parent.id,
            name = %parent.name,
            rank = %parent.rank,
            "Direct parent"
        );
    }
}
