//! The snapshot collector.
//!
//! Each collection cycle fans out the three printer queries concurrently,
//! waits for all of them at a join barrier, and maps every present field to
//! exactly one gauge sample. A failed fetch becomes a `scrape_error` sample
//! instead of aborting the cycle; failures are data, not control flow.

use crate::client::{FetchError, PrinterClient};
use crate::model::{JobInfo, PrinterInfo, PrinterTelemetry, StatusEnvelope};
use tracing::warn;

/// One emitted gauge: metric name, help text, label pairs, value.
///
/// Samples carry no identity beyond (name, label set); the consumer treats
/// each cycle as replacing the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub name: &'static str,
    pub help: &'static str,
    pub labels: Vec<(&'static str, String)>,
    pub value: f64,
}

impl Sample {
    fn gauge(name: &'static str, help: &'static str, value: f64) -> Self {
        Self {
            name,
            help,
            labels: Vec::new(),
            value,
        }
    }

    fn labeled(
        name: &'static str,
        help: &'static str,
        labels: Vec<(&'static str, String)>,
        value: f64,
    ) -> Self {
        Self {
            name,
            help,
            labels,
            value,
        }
    }
}

/// Stateless between cycles: every `collect` call is a fresh, independent
/// snapshot of the printer.
pub struct SnapshotCollector {
    client: PrinterClient,
}

impl SnapshotCollector {
    pub fn new(client: PrinterClient) -> Self {
        Self { client }
    }

    /// Run one collection cycle.
    ///
    /// The three fetches run concurrently and are joined without
    /// short-circuiting; a slow or failing fetch never blocks or cancels its
    /// siblings. Cycle duration is bounded by the slowest per-fetch timeout.
    pub async fn collect(&self) -> Vec<Sample> {
        let (info, status, job) = tokio::join!(
            self.fetch_info(),
            self.fetch_status(),
            self.fetch_job(),
        );

        let mut samples = Vec::new();
        append(&mut samples, "info", info);
        append(&mut samples, "status", status);
        append(&mut samples, "job", job);
        samples
    }

    async fn fetch_info(&self) -> Result<Vec<Sample>, FetchError> {
        let info: PrinterInfo = self.client.get_json("/api/v1/info").await?;
        Ok(info_samples(&info))
    }

    async fn fetch_status(&self) -> Result<Vec<Sample>, FetchError> {
        let status: StatusEnvelope = self.client.get_json("/api/v1/status").await?;
        Ok(status_samples(&status.printer))
    }

    async fn fetch_job(&self) -> Result<Vec<Sample>, FetchError> {
        // 204 means no job is active: a successful fetch with nothing to
        // report, distinct from a failure.
        match self.client.get_json_optional::<JobInfo>("/api/v1/job").await? {
            Some(job) => Ok(job_samples(&job)),
            None => Ok(Vec::new()),
        }
    }
}

fn append(
    samples: &mut Vec<Sample>,
    endpoint: &'static str,
    result: Result<Vec<Sample>, FetchError>,
) {
    match result {
        Ok(mut emitted) => samples.append(&mut emitted),
        Err(err) => {
            warn!(endpoint, error = %err, "printer fetch failed");
            samples.push(error_sample(endpoint, &err));
        }
    }
}

fn error_sample(endpoint: &'static str, err: &FetchError) -> Sample {
    Sample::labeled(
        "scrape_error",
        "A printer fetch failed during this scrape",
        vec![
            ("endpoint", endpoint.to_string()),
            ("error", err.to_string()),
        ],
        1.0,
    )
}

fn info_samples(info: &PrinterInfo) -> Vec<Sample> {
    let mut out = vec![Sample::labeled(
        "printer_info",
        "The identity of the printer",
        vec![
            ("hostname", info.hostname.clone()),
            ("serial", info.serial.clone()),
        ],
        1.0,
    )];
    if let Some(diameter) = info.nozzle_diameter {
        out.push(Sample::gauge(
            "nozzle_diameter_millimeters",
            "The diameter of the nozzle",
            diameter,
        ));
    }
    if let Some(temp) = info.min_extrusion_temp {
        out.push(Sample::gauge(
            "min_extrusion_temperature_celsius",
            "The minimum extrusion temperature",
            temp as f64,
        ));
    }
    out
}

fn status_samples(printer: &PrinterTelemetry) -> Vec<Sample> {
    let mut out = vec![Sample::labeled(
        "printer_state",
        "The current state of the printer",
        vec![("state", printer.state.to_lowercase())],
        1.0,
    )];

    for (sensor, temp) in [("nozzle", printer.temp_nozzle), ("bed", printer.temp_bed)] {
        if let Some(temp) = temp {
            out.push(Sample::labeled(
                "temperature_celsius",
                "The current temperature reading",
                vec![("sensor", sensor.to_string())],
                temp,
            ));
        }
    }

    for (sensor, target) in [
        ("nozzle", printer.target_nozzle),
        ("bed", printer.target_bed),
    ] {
        if let Some(target) = target {
            out.push(Sample::labeled(
                "target_temperature_celsius",
                "The target temperature",
                vec![("sensor", sensor.to_string())],
                target,
            ));
        }
    }

    for (axis, position) in [
        ("x", printer.axis_x),
        ("y", printer.axis_y),
        ("z", printer.axis_z),
    ] {
        if let Some(position) = position {
            out.push(Sample::labeled(
                "axis_position",
                "The current axis position",
                vec![("axis", axis.to_string())],
                position,
            ));
        }
    }

    if let Some(flow) = printer.flow {
        out.push(Sample::gauge(
            "flow_percent",
            "The current flow percentage",
            flow as f64,
        ));
    }
    if let Some(speed) = printer.speed {
        out.push(Sample::gauge(
            "speed_percent",
            "The current speed percentage",
            speed as f64,
        ));
    }

    for (fan, rpm) in [("hotend", printer.fan_hotend), ("print", printer.fan_print)] {
        if let Some(rpm) = rpm {
            out.push(Sample::labeled(
                "fan_speed_rpm",
                "The current fan RPM",
                vec![("fan", fan.to_string())],
                rpm as f64,
            ));
        }
    }

    out
}

fn job_samples(job: &JobInfo) -> Vec<Sample> {
    let mut out = vec![Sample::labeled(
        "job_state",
        "The current state of the job",
        vec![("state", job.state.to_lowercase())],
        1.0,
    )];
    if let Some(progress) = job.progress {
        out.push(Sample::gauge(
            "job_progress_percent",
            "The current job progress",
            progress,
        ));
    }
    if let Some(remaining) = job.time_remaining {
        out.push(Sample::gauge(
            "job_time_remaining_seconds",
            "The time remaining for the job",
            remaining as f64,
        ));
    }
    if let Some(printing) = job.time_printing {
        out.push(Sample::gauge(
            "job_time_printing_seconds",
            "The time the job has been printing",
            printing as f64,
        ));
    }
    out
}
