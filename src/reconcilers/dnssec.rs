// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNSSEC and NSEC3 convergence.
//!
//! Decides secure/unsecure transitions and NSEC3 parameter updates for a
//! zone already known to exist. Slave zones never reach this stage: their
//! DNSSEC state is owned by their masters.

use tracing::{debug, info};

use crate::errors::SyncError;
use crate::model::{PrimaryZone, ZoneSpec};
use crate::pdns::types::DnssecState;
use crate::pdns::ZoneStore;
use crate::plan::{apply_all, Action};

/// Plan the DNSSEC transitions for one primary zone.
///
/// Transition order:
/// 1. desired signed, live unsecured: secure first, then fall through to
///    the NSEC3 comparison below.
/// 2. desired unsigned, live secured: disable and stop; no NSEC3 action is
///    ever planned in the same run.
/// 3. desired signed with declared NSEC3 parameters: if the live
///    configuration is absent or differs in algorithm, iterations, salt or
///    the narrow bit, set the parameters and rectify. A zone without a
///    declared NSEC3 block is NSEC-only and leaves live parameters alone.
#[must_use]
pub fn plan(zone: &str, primary: &PrimaryZone, live: &DnssecState) -> Vec<Action> {
    let mut actions = Vec::new();

    if !primary.dnssec {
        if live.secured {
            actions.push(Action::DisableDnssec {
                zone: zone.to_string(),
            });
        }
        return actions;
    }

    if !live.secured {
        actions.push(Action::SecureZone {
            zone: zone.to_string(),
        });
    }

    if let Some(desired_nsec3) = &primary.nsec3 {
        let nsec3_converged = live.secured && live.nsec3.as_ref() == Some(desired_nsec3);
        if !nsec3_converged {
            actions.push(Action::SetNsec3 {
                zone: zone.to_string(),
                params: desired_nsec3.clone(),
            });
            actions.push(Action::RectifyZone {
                zone: zone.to_string(),
            });
        }
    }

    actions
}

/// Converge one primary zone's DNSSEC state.
///
/// Reports changed iff at least one operation was issued. Re-running with
/// the same desired state against the resulting live state issues none.
///
/// # Errors
///
/// Returns a [`SyncError`] on any store failure; the caller skips the
/// remaining stages for this zone.
pub async fn converge(store: &dyn ZoneStore, spec: &ZoneSpec) -> Result<bool, SyncError> {
    let Some(primary) = spec.primary() else {
        return Ok(false);
    };

    let live = store.dnssec_state(&spec.name).await?;
    debug!(
        zone = %spec.name,
        secured = live.secured,
        nsec3 = ?live.nsec3,
        "DNSSEC state fetched"
    );

    let actions = plan(&spec.name, primary, &live);
    if actions.is_empty() {
        debug!(zone = %spec.name, "DNSSEC state already converged");
        return Ok(false);
    }

    apply_all(store, &actions).await?;
    info!(zone = %spec.name, actions = actions.len(), "DNSSEC state converged");
    Ok(true)
}
