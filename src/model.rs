//! Upstream JSON payloads consumed from the printer API.
//!
//! Every optional upstream field is an `Option` so that a missing key and an
//! explicit `null` both decode to `None`. Zero is a valid reading and must
//! stay distinguishable from "not reported", so no sentinel values anywhere.

use serde::Deserialize;

/// `/api/v1/info`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrinterInfo {
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub serial: String,
    pub nozzle_diameter: Option<f64>,
    pub min_extrusion_temp: Option<i64>,
}

/// `/api/v1/status` envelope; the telemetry is nested under `printer`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusEnvelope {
    #[serde(default)]
    pub printer: PrinterTelemetry,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrinterTelemetry {
    #[serde(default)]
    pub state: String,
    pub temp_nozzle: Option<f64>,
    pub target_nozzle: Option<f64>,
    pub temp_bed: Option<f64>,
    pub target_bed: Option<f64>,
    pub axis_x: Option<f64>,
    pub axis_y: Option<f64>,
    pub axis_z: Option<f64>,
    pub flow: Option<i64>,
    pub speed: Option<i64>,
    pub fan_hotend: Option<i64>,
    pub fan_print: Option<i64>,
}

/// `/api/v1/job`. The endpoint answers 204 when no job is active, in which
/// case this struct is never decoded at all.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobInfo {
    #[serde(default)]
    pub state: String,
    pub progress: Option<f64>,
    pub time_remaining: Option<i64>,
    pub time_printing: Option<i64>,
}
