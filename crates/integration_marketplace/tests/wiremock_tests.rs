//! Integration tests for the marketplace client using wiremock

use integration_marketplace::{
    HttpMarketplaceClient, MarketplaceClient, MarketplaceConfig, MarketplaceError,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn client_for(server: &MockServer) -> HttpMarketplaceClient {
    HttpMarketplaceClient::new(MarketplaceConfig::for_testing(format!(
        "{}/api",
        server.uri()
    )))
    .unwrap()
}

fn sample_trucks() -> serde_json::Value {
    serde_json::json!([
        {
            "_id": "t1",
            "name": "Dosa Express",
            "cuisine": "South Indian",
            "address": "Janpath, Bhubaneswar",
            "location": { "type": "Point", "coordinates": [85.8245, 20.2961] }
        },
        {
            "_id": "t2",
            "name": "Rolls on Wheels",
            "location": { "type": "Point", "coordinates": [85.8169, 20.3538] }
        },
        {
            "_id": "t3",
            "name": "Nowhere Snacks"
        }
    ])
}

#[tokio::test]
async fn test_list_trucks_skips_records_without_location() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/trucks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_trucks()))
        .mount(&server)
        .await;

    let trucks = client_for(&server).list_trucks().await.unwrap();

    assert_eq!(trucks.len(), 2);
    assert_eq!(trucks[0].name, "Dosa Express");
    assert_eq!(trucks[0].cuisine.as_deref(), Some("South Indian"));
    assert!((trucks[1].coordinates.latitude() - 20.3538).abs() < 1e-9);
}

#[tokio::test]
async fn test_list_trucks_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/trucks"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "data": sample_trucks() })),
        )
        .mount(&server)
        .await;

    let trucks = client_for(&server).list_trucks().await.unwrap();
    assert_eq!(trucks.len(), 2);
}

#[tokio::test]
async fn test_list_events() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "_id": "e1",
                "title": "Night Market",
                "startsAt": "2026-03-01T18:00:00Z",
                "location": { "type": "Point", "coordinates": [85.8245, 20.2961] }
            }
        ])))
        .mount(&server)
        .await;

    let events = client_for(&server).list_events().await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "Night Market");
    assert!(events[0].starts_at.is_some());
}

#[tokio::test]
async fn test_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/trucks"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = client_for(&server).list_trucks().await;
    assert!(matches!(result, Err(MarketplaceError::RequestFailed(_))));
}

#[tokio::test]
async fn test_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/trucks"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client_for(&server).list_trucks().await;
    assert!(matches!(result, Err(MarketplaceError::ParseError(_))));
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/trucks"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    assert!(client_for(&server).is_healthy().await);
}
