//! INatClient and NearbyFinder against a mock iNaturalist API

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use inat_nearby::config::NearbyConfig;
use inat_nearby::error::{FetchError, NearbyError, ObservationError};
use inat_nearby::finder::{NearbyFinder, ObservationSource};
use inat_nearby::inaturalist::INatClient;
use inat_nearby::reference;
use inat_nearby::resolver::{GenusLookup, ResolvedGenus};

fn client_for(server: &MockServer) -> INatClient {
    let config = NearbyConfig::default()
        .with_api_base(format!("{}/v1", server.uri()))
        .with_rate_limit(Duration::ZERO);
    INatClient::new(&config).unwrap()
}

async fn mount_observation(server: &MockServer, id: &str, observation: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/observations/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_results": 1,
            "page": 1,
            "per_page": 1,
            "results": [observation]
        })))
        .mount(server)
        .await;
}

async fn mount_genus_search(server: &MockServer, name: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/v1/taxa"))
        .and(query_param("q", name))
        .and(query_param("rank", "genus"))
        .and(query_param("is_active", "true"))
        .respond_with(response)
        .mount(server)
        .await;
}

fn taxa(results: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "total_results": 0, "results": results }))
}

// =============================================================================
// OBSERVATION FETCH
// =============================================================================

#[tokio::test]
async fn fetches_observation_record() {
    let server = MockServer::start().await;
    mount_observation(
        &server,
        "123",
        json!({
            "id": 123,
            "location": "37.7749,-122.4194",
            "taxon": { "id": 47348, "name": "Amanita", "rank": "genus" }
        }),
    )
    .await;

    let client = client_for(&server);
    let id = reference::parse("123").unwrap();
    let record = client.fetch_observation(&id).await.unwrap();

    assert_eq!(record.id, Some(123));
    assert_eq!(record.location.as_deref(), Some("37.7749,-122.4194"));
    assert_eq!(record.taxon.unwrap().name, "Amanita");
}

#[tokio::test]
async fn missing_observation_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/observations/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "Not found" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/observations/405"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    for id in ["404", "405"] {
        let err = client
            .fetch_observation(&reference::parse(id).unwrap())
            .await
            .unwrap_err();
        assert!(err.is_not_found(), "id {}: {:?}", id, err);
    }
}

#[tokio::test]
async fn server_error_is_reported_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/observations/1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_observation(&reference::parse("1").unwrap())
        .await
        .unwrap_err();

    match err {
        FetchError::Status { status, body, .. } => {
            assert_eq!(status, 503);
            assert_eq!(body, "upstream unavailable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/observations/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_observation(&reference::parse("1").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Decode { .. }), "{err:?}");
}

// =============================================================================
// GENUS LOOKUP
// =============================================================================

#[tokio::test]
async fn genus_lookup_takes_first_exact_match() {
    let server = MockServer::start().await;
    mount_genus_search(
        &server,
        "Amanita",
        taxa(json!([
            { "id": 1, "name": "Amanitopsis", "rank": "genus" },
            { "id": 47348, "name": "Amanita", "rank": "genus" },
            { "id": 2, "name": "Amanita", "rank": "genus" }
        ])),
    )
    .await;

    let id = client_for(&server).find_genus_id("Amanita").await.unwrap();
    assert_eq!(id, 47348);
}

#[tokio::test]
async fn genus_lookup_is_exact_and_rank_checked() {
    let server = MockServer::start().await;
    mount_genus_search(
        &server,
        "Amanita",
        taxa(json!([
            { "id": 1, "name": "amanita", "rank": "genus" },
            { "id": 2, "name": "Amanita", "rank": "subgenus" }
        ])),
    )
    .await;

    let err = client_for(&server)
        .find_genus_id("Amanita")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "No genus found for 'Amanita'");
}

// =============================================================================
// END TO END
// =============================================================================

#[tokio::test]
async fn end_to_end_with_ancestor_genus() {
    let server = MockServer::start().await;
    mount_observation(
        &server,
        "555",
        json!({
            "id": 555,
            "location": "12.3,-98.7",
            "taxon": {
                "id": 43584,
                "name": "Homo sapiens",
                "rank": "species",
                "ancestors": [
                    { "id": 1, "name": "Animalia", "rank": "kingdom" },
                    { "id": 10, "name": "Homo", "rank": "genus" }
                ]
            }
        }),
    )
    .await;
    // Ancestor match means the taxa endpoint must never be hit
    Mock::given(method("GET"))
        .and(path("/v1/taxa"))
        .respond_with(taxa(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let finder = NearbyFinder::with_client(Arc::new(client_for(&server)));
    let report = finder
        .find("https://www.inaturalist.org/observations/555")
        .await
        .unwrap();

    assert_eq!(report.genus, ResolvedGenus::new(10, "Homo"));
    assert!(report.url.contains("taxon_id=10"));
    assert!(report.url.contains("lat=12.3&lng=-98.7"));
    assert_eq!(
        report.url,
        "https://www.inaturalist.org/observations?lat=12.3&lng=-98.7&radius=1&subview=map&taxon_id=10"
    );
}

#[tokio::test]
async fn end_to_end_with_remote_genus_lookup() {
    let server = MockServer::start().await;
    mount_observation(
        &server,
        "777",
        json!({
            "id": 777,
            "location": "45.0,7.25",
            "taxon": { "id": 48715, "name": "Amanita muscaria", "rank": "species", "ancestors": [] }
        }),
    )
    .await;
    mount_genus_search(
        &server,
        "Amanita",
        taxa(json!([{ "id": 47348, "name": "Amanita", "rank": "genus" }])),
    )
    .await;

    let finder = NearbyFinder::with_client(Arc::new(client_for(&server)));
    let report = finder.find("777").await.unwrap();

    assert_eq!(report.genus, ResolvedGenus::new(47348, "Amanita"));
    assert_eq!(report.species_name.as_deref(), Some("Amanita muscaria"));
    assert_eq!(
        report.url,
        "https://www.inaturalist.org/observations?lat=45.0&lng=7.25&radius=1&subview=map&taxon_id=47348"
    );
}

#[tokio::test]
async fn end_to_end_lookup_outage_uses_parent() {
    let server = MockServer::start().await;
    mount_observation(
        &server,
        "888",
        json!({
            "id": 888,
            "location": "1.5,2.5",
            "taxon": {
                "id": 48715,
                "name": "Amanita muscaria",
                "rank": "species",
                "parent": { "id": 7, "name": "Amanita", "rank": "genus" }
            }
        }),
    )
    .await;
    mount_genus_search(&server, "Amanita", ResponseTemplate::new(500)).await;

    let finder = NearbyFinder::with_client(Arc::new(client_for(&server)));
    let report = finder.find("888").await.unwrap();

    assert_eq!(report.genus, ResolvedGenus::new(7, "Amanita"));
}

#[tokio::test]
async fn end_to_end_without_gps_fix() {
    let server = MockServer::start().await;
    mount_observation(
        &server,
        "999",
        json!({
            "id": 999,
            "location": null,
            "taxon": { "id": 47348, "name": "Amanita", "rank": "genus" }
        }),
    )
    .await;

    let finder = NearbyFinder::with_client(Arc::new(client_for(&server)));
    let err = finder.find("999").await.unwrap_err();

    assert!(matches!(
        err,
        NearbyError::Observation(ObservationError::MissingLocation)
    ));
}
