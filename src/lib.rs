// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # pdnsync - Declarative zone synchronizer for PowerDNS
//!
//! pdnsync converges the declared configuration of a PowerDNS Authoritative
//! Server - zones, per-zone attributes, DNSSEC/NSEC3 parameters, domain
//! metadata and record sets - against the server's live state, issuing only
//! the minimal set of mutations and reporting whether anything changed.
//!
//! ## Overview
//!
//! Desired state lives in a YAML file; live state lives on the server and
//! is reached through the control-plane HTTP API and `pdnsutil`. Every
//! reconciler computes an explicit plan from one live snapshot before
//! issuing anything, so runs are idempotent and safe to repeat: a run that
//! fails partway leaves applied mutations in place and the next run
//! converges the rest.
//!
//! ## Modules
//!
//! - [`config`] - desired-state file loading and validation
//! - [`model`] - validated desired-state types with kind-tagged zone roles
//! - [`pdns`] - the zone store: HTTP API client and `pdnsutil` adapter
//! - [`plan`] - the tagged mutation plan and its apply step
//! - [`reconcilers`] - the per-object convergence engines
//! - [`errors`] - config/validation/store error taxonomy
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use pdnsync::config;
//! use pdnsync::pdns::{api::PdnsApi, pdnsutil::PdnsUtil, PdnsStore};
//! use pdnsync::reconcilers;
//!
//! async fn converge_all() -> anyhow::Result<()> {
//!     let run = config::load(Path::new("zones.yaml"))?;
//!     let api_key = PdnsApi::api_key_from_env()?;
//!     let api = PdnsApi::new(&run.api_url, &run.server_id, api_key)?;
//!     let store = PdnsStore::new(api, PdnsUtil::new(&run.pdnsutil));
//!
//!     for zone in &run.zones {
//!         let outcome = reconcilers::reconcile_zone(&store, zone).await?;
//!         println!("{}: changed={}", outcome.zone, outcome.changed);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod errors;
pub mod model;
pub mod pdns;
pub mod plan;
pub mod reconcilers;

#[cfg(test)]
mod model_tests;
