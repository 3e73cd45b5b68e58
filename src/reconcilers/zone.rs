// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone state reconciliation.
//!
//! Ensures a declared zone exists with its declared attributes. This stage
//! runs first: nothing else can act on a zone that does not exist yet.

use tracing::{debug, info};

use crate::constants::BOOTSTRAP_NAMESERVER;
use crate::errors::SyncError;
use crate::model::{ZoneRole, ZoneSpec};
use crate::pdns::types::{CreateZoneRequest, ZoneAttributes, ZoneKind};
use crate::pdns::ZoneStore;
use crate::plan::{apply_all, Action};

/// The full desired attribute set for a zone, per its kind.
///
/// Fields the kind does not manage stay unset, so an update built from this
/// never clobbers them.
#[must_use]
pub fn desired_attributes(spec: &ZoneSpec) -> ZoneAttributes {
    match &spec.role {
        ZoneRole::Primary(primary) => ZoneAttributes {
            kind: primary.kind.into(),
            masters: None,
            soa_edit: Some(primary.soa_edit.clone()),
            soa_edit_api: Some(primary.soa_edit_api.clone()),
            dnssec: Some(primary.dnssec),
            presigned: Some(primary.presigned),
            api_rectify: Some(primary.api_rectify),
            nsec3param: Some(
                primary
                    .nsec3
                    .as_ref()
                    .map(|n| n.param_string())
                    .unwrap_or_default(),
            ),
            nsec3narrow: Some(primary.nsec3.as_ref().is_some_and(|n| n.narrow)),
        },
        ZoneRole::Secondary(secondary) => ZoneAttributes {
            kind: ZoneKind::Slave,
            masters: Some(secondary.masters.clone()),
            soa_edit: None,
            soa_edit_api: None,
            dnssec: None,
            presigned: None,
            api_rectify: None,
            nsec3param: None,
            nsec3narrow: None,
        },
    }
}

/// Whether the live attributes drift from the desired set, per kind.
///
/// Slave zones compare kind and masters (order-significant); Master and
/// Native zones compare everything the kind manages and ignore masters.
fn attributes_differ(spec: &ZoneSpec, desired: &ZoneAttributes, live: &ZoneAttributes) -> bool {
    if desired.kind != live.kind {
        return true;
    }
    match &spec.role {
        ZoneRole::Secondary(_) => {
            desired.masters.as_deref().unwrap_or_default()
                != live.masters.as_deref().unwrap_or_default()
        }
        ZoneRole::Primary(_) => {
            desired.soa_edit_or_empty() != live.soa_edit_or_empty()
                || desired.soa_edit_api_or_empty() != live.soa_edit_api_or_empty()
                || desired.dnssec.unwrap_or(false) != live.dnssec.unwrap_or(false)
                || desired.presigned.unwrap_or(false) != live.presigned.unwrap_or(false)
                || desired.api_rectify.unwrap_or(false) != live.api_rectify.unwrap_or(false)
                || desired.nsec3param_or_empty() != live.nsec3param_or_empty()
                || desired.nsec3narrow.unwrap_or(false) != live.nsec3narrow.unwrap_or(false)
        }
    }
}

/// Plan the zone-state mutations for one zone.
///
/// Returns at most one action: a create when the zone is absent, an update
/// carrying the full desired attribute set when any compared field drifts,
/// or nothing.
#[must_use]
pub fn plan(spec: &ZoneSpec, live: Option<&ZoneAttributes>) -> Vec<Action> {
    let desired = desired_attributes(spec);

    let Some(live) = live else {
        let nameservers = match &spec.role {
            // The control API refuses to create a primary zone without a
            // nameserver; the record reconciler replaces it this run.
            ZoneRole::Primary(_) => vec![BOOTSTRAP_NAMESERVER.to_string()],
            ZoneRole::Secondary(_) => Vec::new(),
        };
        return vec![Action::CreateZone {
            zone: spec.name.clone(),
            request: CreateZoneRequest {
                name: spec.canonical_name(),
                attributes: desired,
                nameservers,
            },
        }];
    };

    if attributes_differ(spec, &desired, live) {
        return vec![Action::UpdateZone {
            zone: spec.name.clone(),
            attributes: desired,
        }];
    }

    Vec::new()
}

/// Converge one zone's existence and attributes.
///
/// Reports changed iff a create or update was issued.
///
/// # Errors
///
/// Returns a [`SyncError`] on any store failure; the caller skips the
/// remaining stages for this zone.
pub async fn converge(store: &dyn ZoneStore, spec: &ZoneSpec) -> Result<bool, SyncError> {
    let live = store.get_zone(&spec.name).await?;
    debug!(
        zone = %spec.name,
        kind = %spec.kind_str(),
        exists = live.is_some(),
        "Zone state fetched"
    );

    let actions = plan(spec, live.as_ref());
    if actions.is_empty() {
        debug!(zone = %spec.name, "Zone attributes already converged");
        return Ok(false);
    }

    apply_all(store, &actions).await?;
    info!(zone = %spec.name, actions = actions.len(), "Zone state converged");
    Ok(true)
}
