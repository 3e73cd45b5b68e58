// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Record-set reconciliation.
//!
//! Groups the zone's flat record declarations into record sets, diffs them
//! against the live record sets, and applies one batched patch containing
//! only the pairs that actually drift. The serial of a declared SOA may be
//! the `AUTO` sentinel, which inherits the live serial before the diff so an
//! unchanged declaration never forces a write.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::constants::{RRSET_TYPE_SOA, SOA_SERIAL_AUTO, SOA_SERIAL_BASE};
use crate::errors::{SyncError, ValidationError};
use crate::model::{canonical_name, RecordDecls, ZoneSpec};
use crate::pdns::types::{ApiRecord, ApiRrset, ChangeType, RrsetChange};
use crate::pdns::ZoneStore;
use crate::plan::{apply, Action};

/// Key of a record set: owning name in wire form, record type.
pub type RrsetKey = (String, String);

/// One desired record after grouping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DesiredRecord {
    /// Content in presentation format
    pub content: String,
    /// Write a companion PTR record if this record set is replaced
    pub ptr_sync: bool,
}

/// A desired record set after grouping: one resolved ttl, canonical records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DesiredRrset {
    /// The single explicit ttl override of the group, else the zone default
    pub ttl: u32,
    /// Records sorted by content
    pub records: Vec<DesiredRecord>,
}

/// Partition flat record declarations into record sets.
///
/// Within a group the ttl resolves to the single explicit override, or the
/// zone default if none; the records are sorted by content so grouping is
/// insensitive to declaration order.
///
/// # Errors
///
/// Returns a [`ValidationError`] if an item sets both content and ttl,
/// neither, requests PTR sync on a ttl override, or if two items of one
/// group both carry ttl overrides.
pub fn group(
    zone: &str,
    decls: &RecordDecls,
    default_ttl: u32,
) -> Result<BTreeMap<RrsetKey, DesiredRrset>, ValidationError> {
    let mut rrsets = BTreeMap::new();

    for (name, by_type) in decls {
        let owner = canonical_name(name);
        for (rtype, items) in by_type {
            let mut ttl_override = None;
            let mut records = Vec::new();

            for item in items {
                match (&item.content, item.ttl) {
                    (Some(content), None) => {
                        records.push(DesiredRecord {
                            content: content.clone(),
                            ptr_sync: item.ptr_sync.unwrap_or(false),
                        });
                    }
                    (None, Some(ttl)) => {
                        if item.ptr_sync.is_some() {
                            return Err(ValidationError::PtrSyncOnTtl {
                                zone: zone.to_string(),
                                name: owner.clone(),
                                rtype: rtype.clone(),
                            });
                        }
                        if ttl_override.is_some() {
                            return Err(ValidationError::DuplicateTtl {
                                zone: zone.to_string(),
                                name: owner.clone(),
                                rtype: rtype.clone(),
                            });
                        }
                        ttl_override = Some(ttl);
                    }
                    (Some(_), Some(_)) => {
                        return Err(ValidationError::ContentAndTtl {
                            zone: zone.to_string(),
                            name: owner.clone(),
                            rtype: rtype.clone(),
                        });
                    }
                    (None, None) => {
                        return Err(ValidationError::EmptyItem {
                            zone: zone.to_string(),
                            name: owner.clone(),
                            rtype: rtype.clone(),
                        });
                    }
                }
            }

            records.sort_by(|a, b| a.content.cmp(&b.content));
            rrsets.insert(
                (owner.clone(), rtype.clone()),
                DesiredRrset {
                    ttl: ttl_override.unwrap_or(default_ttl),
                    records,
                },
            );
        }
    }

    Ok(rrsets)
}

/// Substitute the `AUTO` serial sentinel with the live serial.
///
/// Runs before the diff: a declared SOA with serial `AUTO` inherits the
/// serial of the zone's live SOA record (or the base serial if the zone has
/// none yet), so re-running an unchanged declaration yields no diff while
/// any other edited SOA field still forces a replace. The substitution is
/// textual; serials maintained by SOA-EDIT-API policies survive untouched.
///
/// # Errors
///
/// Returns a [`ValidationError`] if a declared SOA group does not hold
/// exactly one record or its content has no serial field.
pub fn substitute_soa_serial(
    zone: &str,
    desired: &mut BTreeMap<RrsetKey, DesiredRrset>,
    live: &[ApiRrset],
) -> Result<(), ValidationError> {
    let live_serial = live
        .iter()
        .find(|rrset| rrset.rtype == RRSET_TYPE_SOA)
        .and_then(|rrset| rrset.records.first())
        .and_then(|record| record.content.split_whitespace().nth(2))
        .map(str::to_string);

    for ((name, rtype), rrset) in desired.iter_mut() {
        if rtype != RRSET_TYPE_SOA {
            continue;
        }
        if rrset.records.len() != 1 {
            return Err(ValidationError::SoaRecordCount {
                zone: zone.to_string(),
                name: name.clone(),
                count: rrset.records.len(),
            });
        }

        let record = &mut rrset.records[0];
        let mut tokens: Vec<String> = record
            .content
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if tokens.len() < 3 {
            return Err(ValidationError::MalformedSoa {
                zone: zone.to_string(),
                content: record.content.clone(),
            });
        }

        if tokens[2] == SOA_SERIAL_AUTO {
            tokens[2] = live_serial
                .clone()
                .unwrap_or_else(|| SOA_SERIAL_BASE.to_string());
            record.content = tokens.join(" ");
        }
    }

    Ok(())
}

fn content_set(contents: impl Iterator<Item = impl AsRef<str>>) -> BTreeSet<String> {
    contents.map(|c| c.as_ref().to_string()).collect()
}

/// Diff desired record sets against live ones.
///
/// One REPLACE entry per desired pair whose resolved ttl or canonical
/// content set drifts from live (absence counts as drift), one DELETE entry
/// per live pair absent from desired. Clean pairs are omitted entirely,
/// which is also what gates PTR sync: `set-ptr` only ever serializes inside
/// a REPLACE entry.
#[must_use]
pub fn plan(desired: &BTreeMap<RrsetKey, DesiredRrset>, live: &[ApiRrset]) -> Vec<RrsetChange> {
    let live_index: BTreeMap<RrsetKey, &ApiRrset> = live
        .iter()
        .map(|rrset| ((rrset.name.clone(), rrset.rtype.clone()), rrset))
        .collect();

    let mut changes = Vec::new();

    for ((name, rtype), want) in desired {
        let converged = live_index.get(&(name.clone(), rtype.clone())).is_some_and(|have| {
            have.ttl == want.ttl
                && content_set(have.records.iter().map(|r| &r.content))
                    == content_set(want.records.iter().map(|r| &r.content))
        });
        if converged {
            continue;
        }

        changes.push(RrsetChange {
            name: name.clone(),
            rtype: rtype.clone(),
            changetype: ChangeType::Replace,
            ttl: Some(want.ttl),
            records: want
                .records
                .iter()
                .map(|record| ApiRecord {
                    content: record.content.clone(),
                    disabled: false,
                    set_ptr: record.ptr_sync.then_some(true),
                })
                .collect(),
        });
    }

    for (name, rtype) in live_index.keys() {
        if !desired.contains_key(&(name.clone(), rtype.clone())) {
            changes.push(RrsetChange::delete(name.clone(), rtype.clone()));
        }
    }

    changes
}

/// Converge one primary zone's record sets.
///
/// A zone that declares no records skips this stage entirely; an explicitly
/// empty declaration map still diffs (and deletes) as declared. Reports
/// changed iff the patch carried at least one entry.
///
/// # Errors
///
/// Returns a [`SyncError`] on a malformed declaration or store failure;
/// entries the server already applied before a failure are not retried or
/// rolled back.
pub async fn converge(store: &dyn ZoneStore, spec: &ZoneSpec) -> Result<bool, SyncError> {
    let Some(primary) = spec.primary() else {
        return Ok(false);
    };
    let Some(decls) = &primary.records else {
        debug!(zone = %spec.name, "No record declarations, skipping record sets");
        return Ok(false);
    };

    let mut desired = group(&spec.name, decls, primary.default_ttl)?;
    let live = store.get_rrsets(&spec.name).await?;
    substitute_soa_serial(&spec.name, &mut desired, &live)?;

    let changes = plan(&desired, &live);
    debug!(
        zone = %spec.name,
        desired = desired.len(),
        live = live.len(),
        changes = changes.len(),
        "Record sets diffed"
    );
    if changes.is_empty() {
        debug!(zone = %spec.name, "Record sets already converged");
        return Ok(false);
    }

    apply(
        store,
        &Action::PatchRrsets {
            zone: spec.name.clone(),
            changes: changes.clone(),
        },
    )
    .await?;
    info!(zone = %spec.name, entries = changes.len(), "Record sets converged");
    Ok(true)
}
