// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared helpers for integration tests.

use pdnsync::config::{validate, ConfigFile, RunConfig};
use pdnsync::model::ZoneSpec;
use pdnsync::pdns::{api::PdnsApi, pdnsutil::PdnsUtil, PdnsStore};
use wiremock::MockServer;

/// Parse and validate an inline YAML configuration.
pub fn run_config(yaml: &str) -> RunConfig {
    let file: ConfigFile = serde_yaml::from_str(yaml).expect("fixture should parse");
    validate(file).expect("fixture should validate")
}

/// The first zone of an inline configuration.
pub fn single_zone(yaml: &str) -> ZoneSpec {
    let mut run = run_config(yaml);
    assert_eq!(run.zones.len(), 1, "fixture should declare one zone");
    run.zones.remove(0)
}

/// A store pointed at a mock API server.
///
/// The administrative command is `true` so DNSSEC operations succeed
/// without a real pdnsutil; tests that must observe them use the unit-level
/// in-memory store instead.
pub fn store_for(server: &MockServer) -> PdnsStore {
    let api = PdnsApi::new(&server.uri(), "localhost", "test-key").expect("mock URI is valid");
    PdnsStore::new(api, PdnsUtil::new("true"))
}
