// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone metadata reconciliation.
//!
//! Converges the declared metadata map (defaults already merged in by the
//! loader) against live metadata. Reserved kinds are owned by the zone-state
//! and DNSSEC reconcilers and are invisible here: never upserted, never
//! deleted, whatever their live value.

use tracing::{debug, info};

use crate::errors::SyncError;
use crate::model::{is_reserved_metadata_kind, MetadataMap, ZoneSpec};
use crate::pdns::ZoneStore;
use crate::plan::{apply_all, Action};

/// Plan the metadata mutations for one zone.
///
/// One upsert per desired kind whose values differ from live (absence
/// counts as different), one delete per live non-reserved kind absent from
/// the desired map. Keys are independent; the order is deterministic map
/// order but carries no meaning.
#[must_use]
pub fn plan(zone: &str, desired: &MetadataMap, live: &MetadataMap) -> Vec<Action> {
    let mut actions = Vec::new();

    for (kind, values) in desired {
        if live.get(kind) != Some(values) {
            actions.push(Action::UpsertMetadata {
                zone: zone.to_string(),
                kind: kind.clone(),
                values: values.clone(),
            });
        }
    }

    for kind in live.keys() {
        if is_reserved_metadata_kind(kind) {
            continue;
        }
        if !desired.contains_key(kind) {
            actions.push(Action::DeleteMetadata {
                zone: zone.to_string(),
                kind: kind.clone(),
            });
        }
    }

    actions
}

/// Converge one zone's metadata.
///
/// Reports changed iff at least one upsert or delete was issued.
///
/// # Errors
///
/// Returns a [`SyncError`] on any store failure; remaining metadata calls
/// for this zone are not attempted.
pub async fn converge(store: &dyn ZoneStore, spec: &ZoneSpec) -> Result<bool, SyncError> {
    let live = store.get_metadata(&spec.name).await?;
    debug!(
        zone = %spec.name,
        desired_kinds = spec.metadata.len(),
        live_kinds = live.len(),
        "Metadata fetched"
    );

    let actions = plan(&spec.name, &spec.metadata, &live);
    if actions.is_empty() {
        debug!(zone = %spec.name, "Metadata already converged");
        return Ok(false);
    }

    apply_all(store, &actions).await?;
    info!(zone = %spec.name, actions = actions.len(), "Metadata converged");
    Ok(true)
}
