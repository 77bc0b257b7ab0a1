#![allow(clippy::unwrap_used)]
// Integration tests for `FleetClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lorasim_api::{
    CreateDeviceRequest, CreateGatewayRequest, CreateServerRequest, Error, FleetClient,
    ServerConfig, ServerKind,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, FleetClient) {
    let server = MockServer::start().await;
    let client = FleetClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

// ── Server tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_servers() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/network-servers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "s1", "config": { "type": "generic" }, "deviceCount": 2, "gatewayCount": 1 },
            { "name": "cs", "config": { "type": "chirpstack", "url": "http://cs:8080" } }
        ])))
        .mount(&server)
        .await;

    let servers = client.list_servers().await.unwrap();
    assert_eq!(servers.len(), 2);
    assert_eq!(servers[0].name, "s1");
    assert_eq!(servers[0].device_count, 2);
    assert_eq!(servers[1].kind(), ServerKind::ChirpStack);
}

#[tokio::test]
async fn test_list_no_content_is_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/network-servers"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    assert!(client.list_servers().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_server_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/network-servers"))
        .and(body_json(json!({ "name": "s1", "config": { "type": "generic" } })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "name": "s1" })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client
        .create_server(&CreateServerRequest {
            name: "s1".into(),
            config: ServerConfig::generic(),
        })
        .await
        .unwrap();
    assert_eq!(created.unwrap().name, "s1");
}

#[tokio::test]
async fn test_delete_server_no_content() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/network-servers/s1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_server("s1").await.unwrap();
}

#[tokio::test]
async fn test_sync_server() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/network-servers/lab/sync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    client.sync_server("lab").await.unwrap();
}

// ── Gateway tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_list_gateways() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/network-servers/s1/gateways"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "eui": "0102030405060708",
            "discoveryUri": "ws://lns:3001",
            "discoveryState": "connected",
            "dataUri": "ws://lns:3001/traffic",
            "dataState": "connected"
        }])))
        .mount(&server)
        .await;

    let gws = client.list_gateways("s1").await.unwrap();
    assert_eq!(gws.len(), 1);
    assert_eq!(gws[0].data_state.as_deref(), Some("connected"));
}

#[tokio::test]
async fn test_create_gateway_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/network-servers/s1/gateways"))
        .and(body_json(
            json!({ "eui": "0102030405060708", "discoveryUri": "ws://lns:3001" }),
        ))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "eui": "0102030405060708",
            "discoveryState": "disconnected",
            "dataState": "disconnected"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gw = client
        .create_gateway(
            "s1",
            &CreateGatewayRequest {
                eui: "0102030405060708".into(),
                discovery_uri: "ws://lns:3001".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(gw.eui, "0102030405060708");
}

#[tokio::test]
async fn test_connect_and_disconnect_gateway() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/network-servers/s1/gateways/0102030405060708/connect"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/network-servers/s1/gateways/0102030405060708/disconnect"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.connect_gateway("s1", "0102030405060708").await.unwrap();
    client
        .disconnect_gateway("s1", "0102030405060708")
        .await
        .unwrap();
}

// ── Device tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_device_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/network-servers/s1/devices"))
        .and(body_json(json!({
            "deveui": "0102030405060708",
            "joineui": "0000000000000000",
            "appkey": "00000000000000000000000000000000",
            "devnonce": 7
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let created = client
        .create_device(
            "s1",
            &CreateDeviceRequest {
                deveui: "0102030405060708".into(),
                joineui: "0000000000000000".into(),
                appkey: "00000000000000000000000000000000".into(),
                devnonce: 7,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(created.is_none());
}

#[tokio::test]
async fn test_join_and_uplink() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/network-servers/s1/devices/0102030405060708/join"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/network-servers/s1/devices/0102030405060708/uplink"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.join_device("s1", "0102030405060708").await.unwrap();
    client.uplink_device("s1", "0102030405060708").await.unwrap();
}

// ── Error handling tests ────────────────────────────────────────────

#[tokio::test]
async fn test_error_message_is_verbatim() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/network-servers/s1/devices/0102030405060708/uplink"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "message": "device has not joined yet" })),
        )
        .mount(&server)
        .await;

    let err = client
        .uplink_device("s1", "0102030405060708")
        .await
        .unwrap_err();
    match err {
        Error::Http { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "device has not joined yet");
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_error_body_uses_fallback() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/network-servers/missing"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.delete_server("missing").await.unwrap_err();
    assert_eq!(err.to_string(), "Request failed");
}

#[tokio::test]
async fn test_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/network-servers/ghost/gateways"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "network server not found" })),
        )
        .mount(&server)
        .await;

    let err = client.list_gateways("ghost").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "network server not found");
}

#[tokio::test]
async fn test_deserialization_error_keeps_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/network-servers"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let err = client.list_servers().await.unwrap_err();
    assert!(
        matches!(err, Error::Deserialization { ref body, .. } if body == "{not json"),
        "expected Deserialization error, got: {err:?}"
    );
}

#[tokio::test]
async fn test_connection_refused_is_network_failure() {
    // Nothing listens on port 9 on loopback.
    let client = FleetClient::from_reqwest("http://127.0.0.1:9", reqwest::Client::new()).unwrap();
    let err = client.list_servers().await.unwrap_err();
    assert!(err.is_network_failure(), "got: {err:?}");
}
