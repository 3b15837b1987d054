//! Encode one cycle's samples into Prometheus text format.
//!
//! Nothing is pre-declared: each scrape builds a fresh registry from the
//! samples it actually produced, so no descriptor state leaks between cycles.

use crate::collector::Sample;
use anyhow::{Context, Result};
use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};

/// Render `samples` as Prometheus text exposition format (version 0.0.4).
pub fn encode(samples: &[Sample]) -> Result<String> {
    let registry = Registry::new();

    // Group by metric name, preserving first-seen order. All samples sharing
    // a name carry the same label keys.
    let mut groups: Vec<(&'static str, Vec<&Sample>)> = Vec::new();
    for sample in samples {
        match groups.iter_mut().find(|(name, _)| *name == sample.name) {
            Some((_, group)) => group.push(sample),
            None => groups.push((sample.name, vec![sample])),
        }
    }

    for (name, group) in groups {
        let first = group[0];
        let keys: Vec<&str> = first.labels.iter().map(|(key, _)| *key).collect();
        if keys.is_empty() {
            let gauge = Gauge::with_opts(Opts::new(name, first.help))
                .with_context(|| format!("build gauge {name}"))?;
            registry
                .register(Box::new(gauge.clone()))
                .with_context(|| format!("register gauge {name}"))?;
            for sample in &group {
                gauge.set(sample.value);
            }
        } else {
            let vec = GaugeVec::new(Opts::new(name, first.help), &keys)
                .with_context(|| format!("build gauge vec {name}"))?;
            registry
                .register(Box::new(vec.clone()))
                .with_context(|| format!("register gauge vec {name}"))?;
            for sample in &group {
                let values: Vec<&str> = sample.labels.iter().map(|(_, v)| v.as_str()).collect();
                vec.with_label_values(&values).set(sample.value);
            }
        }
    }

    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&registry.gather(), &mut buffer)
        .context("encode metrics")?;
    String::from_utf8(buffer).context("metrics are not valid UTF-8")
}
