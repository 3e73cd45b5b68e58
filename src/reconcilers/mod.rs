// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconciliation engines for declared DNS state.
//!
//! Each reconciler compares one kind of desired object against the live
//! state behind the [`ZoneStore`](crate::pdns::ZoneStore) and issues the
//! minimal, ordered set of mutations. All of them split into a pure planning
//! function (snapshot in, actions out) and a mechanical apply step, so a dry
//! run or a test can see exactly what a real run would do.
//!
//! # Stage order
//!
//! Per zone, strictly sequential and fail-fast:
//!
//! 1. [`zone`] - the zone must exist with its declared attributes before
//!    anything else can act on it
//! 2. [`dnssec`] - secure/unsecure transitions and NSEC3 parameters
//!    (primary zones only)
//! 3. [`metadata`] - non-reserved metadata kinds
//! 4. [`rrsets`] - record-set grouping, diff and batched patch (primary
//!    zones only)
//!
//! After every desired zone: [`gc`] removes live zones absent from the
//! desired set, when pruning is enabled.
//!
//! A failure in one stage skips the remaining stages for that zone. Nothing
//! is rolled back; re-running the same desired state converges whatever is
//! left.

pub mod dnssec;
pub mod gc;
pub mod metadata;
pub mod rrsets;
pub mod zone;

use tracing::info;

use crate::errors::SyncError;
use crate::model::{MetadataMap, ZoneSpec};
use crate::pdns::types::DnssecState;
use crate::pdns::ZoneStore;
use crate::plan::Action;

/// Result of reconciling one zone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoneOutcome {
    /// The zone that was processed
    pub zone: String,
    /// Whether any mutating action was issued
    pub changed: bool,
}

/// Run all stages for one zone, in order, fail-fast.
///
/// Reports changed iff any stage issued a mutation.
///
/// # Errors
///
/// Returns the first stage's [`SyncError`]; later stages for this zone are
/// not attempted.
pub async fn reconcile_zone(
    store: &dyn ZoneStore,
    spec: &ZoneSpec,
) -> Result<ZoneOutcome, SyncError> {
    info!(zone = %spec.name, kind = %spec.kind_str(), "Reconciling zone");

    let mut changed = zone::converge(store, spec).await?;
    changed |= dnssec::converge(store, spec).await?;
    changed |= metadata::converge(store, spec).await?;
    changed |= rrsets::converge(store, spec).await?;

    info!(zone = %spec.name, changed = changed, "Zone reconciled");
    Ok(ZoneOutcome {
        zone: spec.name.clone(),
        changed,
    })
}

/// Compute the full plan for one zone without mutating anything.
///
/// For a zone that does not exist live, the later stages plan against empty
/// live state; the real run would create the zone first, so the printed
/// plan is advisory for those stages.
///
/// # Errors
///
/// Returns a [`SyncError`] on a malformed declaration or a read failure.
pub async fn plan_zone(store: &dyn ZoneStore, spec: &ZoneSpec) -> Result<Vec<Action>, SyncError> {
    let live_zone = store.get_zone(&spec.name).await?;
    let exists = live_zone.is_some();

    let mut actions = zone::plan(spec, live_zone.as_ref());

    if let Some(primary) = spec.primary() {
        let live_dnssec = if exists {
            store.dnssec_state(&spec.name).await?
        } else {
            DnssecState::unsecured()
        };
        actions.extend(dnssec::plan(&spec.name, primary, &live_dnssec));
    }

    let live_metadata = if exists {
        store.get_metadata(&spec.name).await?
    } else {
        MetadataMap::new()
    };
    actions.extend(metadata::plan(&spec.name, &spec.metadata, &live_metadata));

    if let Some(primary) = spec.primary() {
        if let Some(decls) = &primary.records {
            let mut desired = rrsets::group(&spec.name, decls, primary.default_ttl)?;
            let live_rrsets = if exists {
                store.get_rrsets(&spec.name).await?
            } else {
                Vec::new()
            };
            rrsets::substitute_soa_serial(&spec.name, &mut desired, &live_rrsets)?;
            let changes = rrsets::plan(&desired, &live_rrsets);
            if !changes.is_empty() {
                actions.push(Action::PatchRrsets {
                    zone: spec.name.clone(),
                    changes,
                });
            }
        }
    }

    Ok(actions)
}

#[cfg(test)]
mod dnssec_tests;
#[cfg(test)]
mod metadata_tests;
