//! printbridge - digest-authenticated proxy and Prometheus exporter for a
//! PrusaLink-class 3D printer HTTP API.
//!
//! Sits between a monitoring client and the printer. Requests to `/metrics`
//! trigger a fresh collection cycle against the printer's JSON API; every
//! other request is relayed to the printer with credentials injected.

pub mod cli;
pub mod client;
pub mod collector;
pub mod exposition;
pub mod model;
pub mod proxy;
pub mod server;
