// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone garbage collection.
//!
//! Removes zones that exist live but are absent from the desired set. Runs
//! once per run, after every desired zone converged, and only when pruning
//! is enabled.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::errors::SyncError;
use crate::model::canonical_name;
use crate::pdns::ZoneStore;
use crate::plan::{apply, Action};

/// Plan the deletions: one per live zone not in the desired set.
///
/// Comparison is on canonical names, so declared names with or without the
/// trailing dot match the wire form the server lists.
#[must_use]
pub fn plan(desired: &BTreeSet<String>, live: &[String]) -> Vec<Action> {
    let desired_canonical: BTreeSet<String> =
        desired.iter().map(|name| canonical_name(name)).collect();

    live.iter()
        .filter(|name| !desired_canonical.contains(&canonical_name(name)))
        .map(|name| Action::DeleteZone {
            zone: name.trim_end_matches('.').to_string(),
        })
        .collect()
}

/// Delete every live zone absent from the desired set.
///
/// Deletions are independent, but the first failure aborts the remaining
/// ones in this run; whatever is left is collected on the next run.
/// Reports changed iff at least one deletion succeeded.
///
/// # Errors
///
/// Returns a [`SyncError`] for the first failing deletion.
pub async fn collect(store: &dyn ZoneStore, desired: &BTreeSet<String>) -> Result<bool, SyncError> {
    let live = store.list_zones().await?;
    let actions = plan(desired, &live);
    if actions.is_empty() {
        debug!(live = live.len(), "No unknown zones to prune");
        return Ok(false);
    }

    warn!(count = actions.len(), "Pruning zones absent from the desired set");
    for action in &actions {
        apply(store, action).await?;
        info!(zone = %action.zone(), "Zone pruned");
    }
    Ok(true)
}
