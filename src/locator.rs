//! Proximity locator
//!
//! Builds the iNaturalist observation-search URL for a genus around a point.
//! Field order and the `radius`/`subview` values are fixed.

pub const OBSERVATIONS_URL: &str = "https://www.inaturalist.org/observations";

/// Search radius in kilometres
pub const RADIUS_KM: u32 = 1;

const SUBVIEW: &str = "map";

/// Locator for observations of `genus_id` within [`RADIUS_KM`] of (`lat`, `lng`)
pub fn build(lat: f64, lng: f64, genus_id: u64) -> String {
    format!(
        "{}?lat={}&lng={}&radius={}&subview={}&taxon_id={}",
        OBSERVATIONS_URL,
        format_degrees(lat),
        format_degrees(lng),
        RADIUS_KM,
        SUBVIEW,
        genus_id
    )
}

/// Shortest round-trip decimal; whole numbers keep one decimal place (`12.0`)
fn format_degrees(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
