//! Integration tests for the snapshot collector against a stub printer API.
//!
//! Each test spins up a real axum server on an ephemeral port and drives the
//! collector through the production client stack.

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use printbridge::client::PrinterClient;
use printbridge::collector::{Sample, SnapshotCollector};
use serde_json::json;
use std::net::SocketAddr;
use std::time::Duration;

async fn spawn_upstream(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub upstream");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve stub");
    });
    addr
}

fn collector_for(addr: SocketAddr) -> SnapshotCollector {
    let client = PrinterClient::new(
        &format!("http://{addr}"),
        "maker",
        "",
        Some(Duration::from_secs(5)),
    )
    .expect("client builds");
    SnapshotCollector::new(client)
}

fn find<'a>(samples: &'a [Sample], name: &str) -> Vec<&'a Sample> {
    samples.iter().filter(|s| s.name == name).collect()
}

fn label<'a>(sample: &'a Sample, key: &str) -> &'a str {
    sample
        .labels
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.as_str())
        .unwrap_or_else(|| panic!("label {key} missing"))
}

fn full_upstream() -> Router {
    Router::new()
        .route(
            "/api/v1/info",
            get(|| async {
                Json(json!({
                    "hostname": "prusa-mk4",
                    "serial": "SN777",
                    "nozzle_diameter": 0.4,
                    "min_extrusion_temp": 170
                }))
            }),
        )
        .route(
            "/api/v1/status",
            get(|| async {
                Json(json!({
                    "printer": {
                        "state": "PRINTING",
                        "temp_nozzle": 215.3,
                        "target_nozzle": 215.0,
                        "temp_bed": 60.2,
                        "target_bed": 60.0,
                        "axis_z": 1.8,
                        "flow": 95,
                        "speed": 100,
                        "fan_hotend": 5600,
                        "fan_print": 3000
                    }
                }))
            }),
        )
        .route(
            "/api/v1/job",
            get(|| async {
                Json(json!({
                    "state": "PRINTING",
                    "progress": 37.5,
                    "time_remaining": 5400,
                    "time_printing": 3600
                }))
            }),
        )
}

#[tokio::test]
async fn full_payloads_map_to_documented_samples() {
    let addr = spawn_upstream(full_upstream()).await;
    let samples = collector_for(addr).collect().await;

    assert!(find(&samples, "scrape_error").is_empty());

    let info = find(&samples, "printer_info");
    assert_eq!(info.len(), 1);
    assert_eq!(label(info[0], "hostname"), "prusa-mk4");
    assert_eq!(label(info[0], "serial"), "SN777");
    assert_eq!(info[0].value, 1.0);

    let state = find(&samples, "printer_state");
    assert_eq!(label(state[0], "state"), "printing");

    let temps = find(&samples, "temperature_celsius");
    assert_eq!(temps.len(), 2);
    assert_eq!(label(temps[0], "sensor"), "nozzle");
    assert_eq!(temps[0].value, 215.3);
    assert_eq!(label(temps[1], "sensor"), "bed");

    // axis_x and axis_y were not reported; only z may appear
    let axes = find(&samples, "axis_position");
    assert_eq!(axes.len(), 1);
    assert_eq!(label(axes[0], "axis"), "z");
    assert_eq!(axes[0].value, 1.8);

    let job_state = find(&samples, "job_state");
    assert_eq!(label(job_state[0], "state"), "printing");
    assert_eq!(find(&samples, "job_progress_percent")[0].value, 37.5);
    assert_eq!(find(&samples, "job_time_remaining_seconds")[0].value, 5400.0);
    assert_eq!(find(&samples, "job_time_printing_seconds")[0].value, 3600.0);
}

#[tokio::test]
async fn null_and_absent_fields_emit_no_samples() {
    let app = Router::new()
        .route(
            "/api/v1/info",
            get(|| async {
                Json(json!({
                    "hostname": "prusa-mk4",
                    "serial": "SN777",
                    "nozzle_diameter": null
                }))
            }),
        )
        .route(
            "/api/v1/status",
            get(|| async {
                Json(json!({
                    "printer": {
                        "state": "IDLE",
                        "temp_nozzle": null,
                        "flow": 0
                    }
                }))
            }),
        )
        .route("/api/v1/job", get(|| async { StatusCode::NO_CONTENT }));
    let addr = spawn_upstream(app).await;
    let samples = collector_for(addr).collect().await;

    assert!(find(&samples, "nozzle_diameter_millimeters").is_empty());
    assert!(find(&samples, "min_extrusion_temperature_celsius").is_empty());
    assert!(find(&samples, "temperature_celsius").is_empty());
    assert!(find(&samples, "target_temperature_celsius").is_empty());
    assert!(find(&samples, "axis_position").is_empty());

    // zero is a real observation, not absence
    let flow = find(&samples, "flow_percent");
    assert_eq!(flow.len(), 1);
    assert_eq!(flow[0].value, 0.0);
}

#[tokio::test]
async fn job_no_content_yields_no_job_samples_and_no_error() {
    let app = Router::new()
        .route(
            "/api/v1/info",
            get(|| async { Json(json!({"hostname": "h", "serial": "s"})) }),
        )
        .route(
            "/api/v1/status",
            get(|| async { Json(json!({"printer": {"state": "IDLE"}})) }),
        )
        .route("/api/v1/job", get(|| async { StatusCode::NO_CONTENT }));
    let addr = spawn_upstream(app).await;
    let samples = collector_for(addr).collect().await;

    assert!(find(&samples, "job_state").is_empty());
    assert!(find(&samples, "job_progress_percent").is_empty());
    assert!(find(&samples, "scrape_error").is_empty());
    assert_eq!(find(&samples, "printer_info").len(), 1);
}

#[tokio::test]
async fn one_failing_fetch_never_disturbs_the_others() {
    let app = Router::new()
        .route(
            "/api/v1/info",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .route(
            "/api/v1/status",
            get(|| async { Json(json!({"printer": {"state": "IDLE", "temp_bed": 24.0}})) }),
        )
        .route(
            "/api/v1/job",
            get(|| async { Json(json!({"state": "FINISHED", "progress": 100.0})) }),
        );
    let addr = spawn_upstream(app).await;
    let samples = collector_for(addr).collect().await;

    let errors = find(&samples, "scrape_error");
    assert_eq!(errors.len(), 1);
    assert_eq!(label(errors[0], "endpoint"), "info");
    assert!(label(errors[0], "error").contains("500"));

    // both successful fetches are fully represented
    assert_eq!(find(&samples, "printer_state").len(), 1);
    assert_eq!(find(&samples, "temperature_celsius").len(), 1);
    assert_eq!(find(&samples, "job_state").len(), 1);
    assert_eq!(find(&samples, "job_progress_percent")[0].value, 100.0);
    assert!(find(&samples, "printer_info").is_empty());
}

#[tokio::test]
async fn malformed_json_is_a_fetch_failure() {
    let app = Router::new()
        .route("/api/v1/info", get(|| async { "not json at all" }))
        .route(
            "/api/v1/status",
            get(|| async { Json(json!({"printer": {"state": "IDLE"}})) }),
        )
        .route("/api/v1/job", get(|| async { StatusCode::NO_CONTENT }));
    let addr = spawn_upstream(app).await;
    let samples = collector_for(addr).collect().await;

    let errors = find(&samples, "scrape_error");
    assert_eq!(errors.len(), 1);
    assert_eq!(label(errors[0], "endpoint"), "info");
    assert_eq!(find(&samples, "printer_state").len(), 1);
}

#[tokio::test]
async fn unreachable_printer_fails_all_three_independently() {
    // Nothing is listening on this address once the listener is dropped.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let samples = collector_for(addr).collect().await;

    let errors = find(&samples, "scrape_error");
    assert_eq!(errors.len(), 3);
    let mut endpoints: Vec<_> = errors.iter().map(|s| label(s, "endpoint")).collect();
    endpoints.sort();
    assert_eq!(endpoints, vec!["info", "job", "status"]);
}
