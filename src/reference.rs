//! Observation reference parsing
//!
//! Turns whatever the user pasted (a bare id, an observation page link, a
//! search link with `observation_id=`) into an [`ObservationId`].
//!
//! Order of attempts, first hit wins:
//! 1. the whole input is digits
//! 2. generic URL interpretation (query parameter, then path segments)
//! 3. regex over the raw string for the known iNaturalist hosts

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use url::{ParseError, Url};

use crate::error::ReferenceError;

/// Known observation page shapes, tried in order
static HOST_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"inaturalist\.org/observations/(\d+)").unwrap(),
        Regex::new(r"inaturalist\.ca/observations/(\d+)").unwrap(),
    ]
});

/// Base used to read scheme-less input such as `host/observations/1` as a path
static RELATIVE_BASE: LazyLock<Url> = LazyLock::new(|| Url::parse("file:///").unwrap());

/// Canonical observation identifier (ASCII digits only)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObservationId(String);

impl ObservationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse an observation reference into its id
pub fn parse(input: &str) -> Result<ObservationId, ReferenceError> {
    if is_digits(input) {
        return Ok(ObservationId(input.to_string()));
    }

    if let Some(id) = from_url(input) {
        return Ok(ObservationId(id));
    }

    // Malformed URLs land here too
    HOST_PATTERNS
        .iter()
        .find_map(|re| re.captures(input))
        .and_then(|caps| caps.get(1))
        .map(|m| ObservationId(m.as_str().to_string()))
        .ok_or_else(|| ReferenceError::Unparseable {
            input: input.to_string(),
        })
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Generic URL interpretation; `None` on parse failure or when nothing matches
fn from_url(input: &str) -> Option<String> {
    let url = match Url::parse(input) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => RELATIVE_BASE.join(input).ok()?,
        Err(_) => return None,
    };

    let from_query = url
        .query_pairs()
        .find(|(key, value)| key == "observation_id" && !value.is_empty())
        .map(|(_, value)| value.into_owned())
        .filter(|value| is_digits(value));
    if from_query.is_some() {
        return from_query;
    }

    let segments: Vec<&str> = url.path().split('/').filter(|s| !s.is_empty()).collect();

    if let Some(pos) = segments.iter().position(|s| *s == "observations") {
        if let Some(next) = segments.get(pos + 1).filter(|s| is_digits(s)) {
            return Some(next.to_string());
        }
    }

    match segments.as_slice() {
        [.., "observations", last] if is_digits(last) => Some(last.to_string()),
        _ => None,
    }
}
