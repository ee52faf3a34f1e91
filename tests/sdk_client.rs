//! The Rust client against a live gateway and mock booking API.

use limo_gateway_sdk::{ClientError, GatewayClient, GatewayRequest, Payload, TripQuery};
use serde_json::json;

mod common;

use common::{config_for, start_gateway, MockReply, MockUpstream, TEST_API_KEY};

fn trip() -> TripQuery {
    TripQuery {
        pickup: "JFK".into(),
        destination: "Midtown".into(),
        date: "2024-06-01".into(),
        time: "18:30".into(),
        passengers: 3,
    }
}

#[tokio::test]
async fn test_fleet_returns_json_payload() {
    let upstream = MockUpstream::start(MockReply::json(200, r#"{"vehicles":[]}"#)).await;
    let gateway = start_gateway(config_for(&upstream.base_url()), Some(TEST_API_KEY)).await;
    let client = GatewayClient::new(&gateway.endpoint()).unwrap();

    let payload = client.fleet().await.unwrap();
    assert_eq!(payload, Payload::Json(json!({ "vehicles": [] })));
    assert_eq!(upstream.last_request().target, "/v1/fleet");
}

#[tokio::test]
async fn test_vehicle_pricing_posts_trip_with_vehicle() {
    let upstream = MockUpstream::start(MockReply::json(200, r#"{"total":240}"#)).await;
    let gateway = start_gateway(config_for(&upstream.base_url()), Some(TEST_API_KEY)).await;
    let client = GatewayClient::new(&gateway.endpoint()).unwrap();

    client.vehicle_pricing("suv-2", &trip()).await.unwrap();

    let seen = upstream.last_request();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.target, "/v1/fleet/pricing");
    let sent: serde_json::Value = serde_json::from_slice(&seen.body).unwrap();
    assert_eq!(sent["vehicleId"], "suv-2");
    assert_eq!(sent["passengers"], 3);
}

#[tokio::test]
async fn test_get_with_extra_query() {
    let upstream = MockUpstream::start(MockReply::json(200, "[]")).await;
    let gateway = start_gateway(config_for(&upstream.base_url()), Some(TEST_API_KEY)).await;
    let client = GatewayClient::new(&gateway.endpoint()).unwrap();

    let req = GatewayRequest::get().query("date", "2024-06-01");
    client.request("/v1/fleet/available", req).await.unwrap();
    assert_eq!(
        upstream.last_request().target,
        "/v1/fleet/available?date=2024-06-01"
    );
}

#[tokio::test]
async fn test_rejection_surfaces_gateway_message() {
    let upstream = MockUpstream::start(MockReply::json(200, "{}")).await;
    let gateway = start_gateway(config_for(&upstream.base_url()), Some(TEST_API_KEY)).await;
    let client = GatewayClient::new(&gateway.endpoint()).unwrap();

    let err = client.booking("not a valid id").await.unwrap_err();
    match err {
        ClientError::Gateway { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Not found");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(upstream.connections(), 0);
}

#[tokio::test]
async fn test_non_envelope_error_falls_back() {
    let upstream = MockUpstream::start(MockReply::json(422, r#"{"title":"bad date"}"#)).await;
    let gateway = start_gateway(config_for(&upstream.base_url()), Some(TEST_API_KEY)).await;
    let client = GatewayClient::new(&gateway.endpoint()).unwrap();

    let err = client.available_vehicles(&trip()).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Gateway { status: 422, ref message } if message == "Request failed"
    ));
}

#[tokio::test]
async fn test_cancel_and_connection_check() {
    let upstream = MockUpstream::start(MockReply::json(200, r#"{"ok":true}"#)).await;
    let gateway = start_gateway(config_for(&upstream.base_url()), Some(TEST_API_KEY)).await;
    let client = GatewayClient::new(&gateway.endpoint()).unwrap();

    client.cancel_booking("bk-991").await.unwrap();
    assert_eq!(upstream.last_request().target, "/v1/bookings/bk-991/cancel");

    client.test_connection().await.unwrap();
    assert_eq!(upstream.last_request().target, "/v1/test-connection");
}
