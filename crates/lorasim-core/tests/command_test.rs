#![allow(clippy::unwrap_used)]
// Command execution: REST call, follow-up refresh, lifecycle events.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lorasim_core::{
    Command, CommandPhase, Controller, ControllerConfig, GatewayAction, NewServer,
    PresentationState, TreeLevel, render,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Controller) {
    let server = MockServer::start().await;
    let config = ControllerConfig::from_url_str(&server.uri()).unwrap();
    let controller = Controller::new(config).unwrap();
    (server, controller)
}

async fn mount_get(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a GET that answers `before` once, then `after`.
async fn mount_get_then(
    server: &MockServer,
    route: &str,
    before: serde_json::Value,
    after: serde_json::Value,
) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(before))
        .up_to_n_times(1)
        .mount(server)
        .await;
    mount_get(server, route, after).await;
}

fn phases(rx: &mut tokio::sync::broadcast::Receiver<lorasim_core::CommandEvent>) -> Vec<String> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event.phase.to_string());
    }
    out
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_generic_server_then_listed() {
    let (server, controller) = setup().await;

    Mock::given(method("POST"))
        .and(path("/network-servers"))
        .and(body_json(json!({ "name": "s1", "config": { "type": "generic" } })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "name": "s1" })))
        .expect(1)
        .mount(&server)
        .await;
    mount_get(
        &server,
        "/network-servers",
        json!([{ "name": "s1", "config": { "type": "generic" } }]),
    )
    .await;
    mount_get(&server, "/network-servers/s1/gateways", json!([])).await;
    mount_get(&server, "/network-servers/s1/devices", json!([])).await;

    let request = NewServer::generic("s1").validate().unwrap();
    let mut events = controller.command_events();
    let outcome = controller.execute(Command::CreateServer(request)).await;

    assert!(outcome.succeeded());
    let report = outcome.refresh.unwrap();
    assert!(report.applied);
    assert_eq!(
        phases(&mut events),
        vec!["pending", "succeeded", "refreshing", "idle"]
    );

    let mut presentation = PresentationState::new();
    presentation.expand_all(["s1"]);
    let view = render(&controller.snapshot(), &presentation);
    let s1 = view.server("s1").unwrap();
    assert_eq!((s1.gateways.count, s1.devices.count), (0, 0));
}

#[tokio::test]
async fn test_zero_appkey_device_cannot_join() {
    let (server, controller) = setup().await;
    mount_get(&server, "/network-servers", json!([{ "name": "s1" }])).await;
    mount_get(&server, "/network-servers/s1/gateways", json!([])).await;
    mount_get(
        &server,
        "/network-servers/s1/devices",
        json!([{
            "deveui": "0102030405060708",
            "joineui": "0000000000000000",
            "appkey": "00000000000000000000000000000000"
        }]),
    )
    .await;

    controller.refresh().await.unwrap();

    let mut presentation = PresentationState::new();
    presentation.toggle(TreeLevel::Server, "s1");
    presentation.toggle(TreeLevel::Devices, "s1");
    let view = render(&controller.snapshot(), &presentation);
    let device = &view.server("s1").unwrap().devices.items[0];
    assert!(!device.join.is_available());
    assert_eq!(device.join.reason(), Some("ABP device"));
    assert!(!device.uplink.is_available());
}

#[tokio::test]
async fn test_connect_gateway_flips_offered_action() {
    let (server, controller) = setup().await;
    mount_get(&server, "/network-servers", json!([{ "name": "s1" }])).await;
    mount_get(&server, "/network-servers/s1/devices", json!([])).await;
    mount_get_then(
        &server,
        "/network-servers/s1/gateways",
        json!([{ "eui": "0102030405060708", "discoveryState": "disconnected", "dataState": "disconnected" }]),
        json!([{ "eui": "0102030405060708", "discoveryState": "connected", "dataState": "connected" }]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(
            "/network-servers/s1/gateways/0102030405060708/connect",
        ))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    controller.refresh().await.unwrap();
    let mut presentation = PresentationState::new();
    presentation.expand_all(["s1"]);

    let before = render(&controller.snapshot(), &presentation);
    assert_eq!(
        before.server("s1").unwrap().gateways.items[0].action,
        GatewayAction::Connect
    );

    let outcome = controller
        .execute(Command::ConnectGateway {
            server: "s1".into(),
            eui: "0102030405060708".into(),
        })
        .await;
    assert!(outcome.succeeded());
    assert!(outcome.refresh_error().is_none());

    let after = render(&controller.snapshot(), &presentation);
    assert_eq!(
        after.server("s1").unwrap().gateways.items[0].action,
        GatewayAction::Disconnect
    );
}

#[tokio::test]
async fn test_failed_command_reports_backend_message_and_still_refreshes() {
    let (server, controller) = setup().await;
    Mock::given(method("POST"))
        .and(path("/network-servers/s1/devices/0102030405060708/join"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "device already joined" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/network-servers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut events = controller.command_events();
    let outcome = controller
        .execute(Command::JoinDevice {
            server: "s1".into(),
            eui: "0102030405060708".into(),
        })
        .await;

    assert!(!outcome.succeeded());
    assert!(outcome.refresh.as_ref().unwrap().applied);
    assert_eq!(
        outcome.failure_message().as_deref(),
        Some("Error sending join: device already joined")
    );

    let received: Vec<CommandPhase> = std::iter::from_fn(|| events.try_recv().ok())
        .map(|e| e.phase)
        .collect();
    assert_eq!(
        received,
        vec![
            CommandPhase::Pending,
            CommandPhase::Failed {
                message: "Error sending join: device already joined".into()
            },
            CommandPhase::Idle,
        ]
    );
}

#[tokio::test]
async fn test_malformed_error_body_falls_back_to_generic_text() {
    let (server, controller) = setup().await;
    Mock::given(method("DELETE"))
        .and(path("/network-servers/s1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let outcome = controller
        .execute(Command::DeleteServer { name: "s1".into() })
        .await;
    assert_eq!(
        outcome.failure_message().as_deref(),
        Some("Error deleting network server: Request failed")
    );
}

#[tokio::test]
async fn test_refresh_failure_after_success_is_reported_separately() {
    let (server, controller) = setup().await;
    Mock::given(method("POST"))
        .and(path("/network-servers/cs/sync"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/network-servers"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let command = Command::SyncServer { name: "cs".into() };
    assert_eq!(
        command.success_message().as_deref(),
        Some("Successfully synced cs")
    );

    let outcome = controller.execute(command).await;
    assert!(outcome.succeeded());
    assert!(outcome.refresh_error().is_some());
}

#[tokio::test]
async fn test_command_ids_are_unique() {
    let (server, controller) = setup().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let mut events = controller.command_events();
    for _ in 0..2 {
        controller
            .execute(Command::UplinkDevice {
                server: "s1".into(),
                eui: "aa".into(),
            })
            .await;
    }
    let ids: Vec<u64> = std::iter::from_fn(|| events.try_recv().ok())
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec![1, 1, 1, 2, 2, 2]);
}
