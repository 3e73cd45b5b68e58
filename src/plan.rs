// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! The per-zone mutation plan.
//!
//! Every reconciler computes its mutations as an explicit sequence of tagged
//! [`Action`] values before anything is issued, which is what makes dry runs
//! and store-free tests possible. A plan is ephemeral: computed from one
//! live snapshot, applied in order, then discarded; the server remains the
//! only durable state.

use serde::Serialize;
use tracing::info;

use crate::errors::StoreError;
use crate::model::Nsec3Params;
use crate::pdns::types::{CreateZoneRequest, RrsetChange, ZoneAttributes};
use crate::pdns::ZoneStore;

/// One mutation against the zone store.
///
/// An empty plan is the no-op case; there is no explicit noop entry.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Action {
    /// Create a zone that does not exist live
    CreateZone {
        /// Target zone
        zone: String,
        /// Full creation request including bootstrap nameservers
        request: CreateZoneRequest,
    },

    /// Replace a live zone's attributes with the full desired set
    UpdateZone {
        /// Target zone
        zone: String,
        /// The full desired attribute set, not a partial patch
        attributes: ZoneAttributes,
    },

    /// Delete a zone absent from the desired set
    DeleteZone {
        /// Target zone
        zone: String,
    },

    /// Enable DNSSEC
    SecureZone {
        /// Target zone
        zone: String,
    },

    /// Remove all DNSSEC state
    DisableDnssec {
        /// Target zone
        zone: String,
    },

    /// Set NSEC3 parameters on a secured zone
    SetNsec3 {
        /// Target zone
        zone: String,
        /// Desired parameters
        params: Nsec3Params,
    },

    /// Rectify ordering and auxiliary data after an NSEC3 change
    RectifyZone {
        /// Target zone
        zone: String,
    },

    /// Create or replace one metadata kind
    UpsertMetadata {
        /// Target zone
        zone: String,
        /// Metadata kind
        kind: String,
        /// Desired ordered values
        values: Vec<String>,
    },

    /// Delete one metadata kind
    DeleteMetadata {
        /// Target zone
        zone: String,
        /// Metadata kind
        kind: String,
    },

    /// Apply one batched record-set patch
    PatchRrsets {
        /// Target zone
        zone: String,
        /// REPLACE and DELETE entries; never empty in a computed plan
        changes: Vec<RrsetChange>,
    },
}

impl Action {
    /// Short label for logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::CreateZone { .. } => "create_zone",
            Self::UpdateZone { .. } => "update_zone",
            Self::DeleteZone { .. } => "delete_zone",
            Self::SecureZone { .. } => "secure_zone",
            Self::DisableDnssec { .. } => "disable_dnssec",
            Self::SetNsec3 { .. } => "set_nsec3",
            Self::RectifyZone { .. } => "rectify_zone",
            Self::UpsertMetadata { .. } => "upsert_metadata",
            Self::DeleteMetadata { .. } => "delete_metadata",
            Self::PatchRrsets { .. } => "patch_rrsets",
        }
    }

    /// The zone this action targets.
    #[must_use]
    pub fn zone(&self) -> &str {
        match self {
            Self::CreateZone { zone, .. }
            | Self::UpdateZone { zone, .. }
            | Self::DeleteZone { zone }
            | Self::SecureZone { zone }
            | Self::DisableDnssec { zone }
            | Self::SetNsec3 { zone, .. }
            | Self::RectifyZone { zone }
            | Self::UpsertMetadata { zone, .. }
            | Self::DeleteMetadata { zone, .. }
            | Self::PatchRrsets { zone, .. } => zone,
        }
    }
}

/// Issue one action against the store.
///
/// # Errors
///
/// Returns the store's error unchanged; the caller decides what it aborts.
pub async fn apply(store: &dyn ZoneStore, action: &Action) -> Result<(), StoreError> {
    info!(zone = %action.zone(), action = %action.label(), "Applying");
    match action {
        Action::CreateZone { request, .. } => store.create_zone(request).await,
        Action::UpdateZone { zone, attributes } => store.update_zone(zone, attributes).await,
        Action::DeleteZone { zone } => store.delete_zone(zone).await,
        Action::SecureZone { zone } => store.secure_zone(zone).await,
        Action::DisableDnssec { zone } => store.disable_dnssec(zone).await,
        Action::SetNsec3 { zone, params } => store.set_nsec3(zone, params).await,
        Action::RectifyZone { zone } => store.rectify_zone(zone).await,
        Action::UpsertMetadata { zone, kind, values } => {
            store.upsert_metadata(zone, kind, values).await
        }
        Action::DeleteMetadata { zone, kind } => store.delete_metadata(zone, kind).await,
        Action::PatchRrsets { zone, changes } => store.patch_rrsets(zone, changes).await,
    }
}

/// Issue a whole plan in order, failing fast on the first error.
///
/// # Errors
///
/// Returns the first store error; actions already issued stay applied.
pub async fn apply_all(store: &dyn ZoneStore, actions: &[Action]) -> Result<(), StoreError> {
    for action in actions {
        apply(store, action).await?;
    }
    Ok(())
}
