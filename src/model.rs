// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Validated desired-state types.
//!
//! The configuration loader turns the raw file model into these types, so by
//! the time a reconciler runs, every zone carries exactly the fields that are
//! valid for its kind. Kind-specific fields live behind the [`ZoneRole`]
//! tagged variant instead of being checked for presence at runtime.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{NSEC3_ALGORITHM, NSEC3_FLAGS, RESERVED_METADATA_KINDS};

/// Record declarations of a zone: owning name -> record type -> items.
pub type RecordDecls = BTreeMap<String, BTreeMap<String, Vec<RecordEntry>>>;

/// Metadata map: metadata kind -> ordered list of values.
pub type MetadataMap = BTreeMap<String, Vec<String>>;

/// Append the trailing dot the wire format expects, if missing.
#[must_use]
pub fn canonical_name(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}

/// Whether a metadata kind is owned by the zone-state/DNSSEC reconcilers.
#[must_use]
pub fn is_reserved_metadata_kind(kind: &str) -> bool {
    RESERVED_METADATA_KINDS.contains(&kind)
}

/// A single declared record item.
///
/// An item is either a record content (optionally requesting PTR sync) or a
/// ttl override for its whole record-set group, never both. The loader
/// rejects unknown keys; the grouping step rejects items that set both or
/// neither field.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RecordEntry {
    /// Record content in zone-file presentation format
    #[serde(rename = "c", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// TTL override for the whole (name, type) group
    #[serde(rename = "t", skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,

    /// Write a companion PTR record in the matching reverse zone.
    ///
    /// Honored only when the owning record set is replaced this run; a
    /// record set that diffs clean skips the request entirely.
    #[serde(rename = "r", skip_serializing_if = "Option::is_none")]
    pub ptr_sync: Option<bool>,
}

/// NSEC3 parameters of a secured zone.
///
/// The algorithm is fixed at 1 (SHA-1); only iterations, salt and the
/// narrow bit are operator-controlled. `narrow` travels separately from the
/// parameter string (NSEC3NARROW vs NSEC3PARAM on the server side).
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Nsec3Params {
    /// NSEC3 hash algorithm; anything but 1 on the live side forces a reset
    pub algorithm: u8,
    /// Additional hash iterations
    pub iterations: u16,
    /// Hex salt, empty for unsalted hashing
    pub salt: String,
    /// Narrow mode: answer with white lies instead of materialized hashes
    pub narrow: bool,
}

impl Nsec3Params {
    /// NSEC3 parameters with the given operator-controlled fields.
    #[must_use]
    pub fn new(iterations: u16, salt: impl Into<String>, narrow: bool) -> Self {
        Self {
            algorithm: NSEC3_ALGORITHM,
            iterations,
            salt: salt.into(),
            narrow,
        }
    }

    /// Presentation form of the NSEC3PARAM fields, narrow bit excluded.
    ///
    /// This is the string `pdnsutil set-nsec3` takes and the NSEC3PARAM
    /// metadata value the server reports: `algorithm flags iterations salt`,
    /// with `-` for the empty salt.
    #[must_use]
    pub fn param_string(&self) -> String {
        let salt = if self.salt.is_empty() {
            "-"
        } else {
            self.salt.as_str()
        };
        format!("{} {} {} {}", self.algorithm, NSEC3_FLAGS, self.iterations, salt)
    }

    /// Parse a live NSEC3PARAM value.
    ///
    /// Expected format: `algorithm flags iterations salt`, e.g. `1 0 5 ab`.
    /// The flags field is accepted but not retained; the narrow bit comes
    /// from NSEC3NARROW and is supplied by the caller.
    #[must_use]
    pub fn parse(params: &str, narrow: bool) -> Option<Self> {
        let tokens: Vec<&str> = params.split_whitespace().collect();
        if tokens.len() != 4 {
            return None;
        }
        let algorithm = tokens[0].parse().ok()?;
        let iterations = tokens[2].parse().ok()?;
        let salt = if tokens[3] == "-" {
            String::new()
        } else {
            tokens[3].to_string()
        };
        Some(Self {
            algorithm,
            iterations,
            salt,
            narrow,
        })
    }
}

/// Zone kinds that answer authoritatively from the local backend.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub enum PrimaryKind {
    /// Primary with outgoing transfers and NOTIFY
    Master,
    /// Backend-replicated, no transfer machinery
    Native,
}

impl PrimaryKind {
    /// Wire name of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Master => "Master",
            Self::Native => "Native",
        }
    }
}

/// Fields valid for Master and Native zones.
#[derive(Clone, Debug, Serialize)]
pub struct PrimaryZone {
    /// Master or Native
    pub kind: PrimaryKind,
    /// SOA-EDIT policy applied on outgoing transfers
    pub soa_edit: String,
    /// SOA-EDIT-API policy applied on API writes; defaults to `soa_edit`
    pub soa_edit_api: String,
    /// Whether the zone is signed
    pub dnssec: bool,
    /// Whether signatures come pre-computed from elsewhere
    pub presigned: bool,
    /// Whether the server rectifies the zone after API writes
    pub api_rectify: bool,
    /// NSEC3 parameters; `None` means NSEC-only denial of existence
    pub nsec3: Option<Nsec3Params>,
    /// TTL for record sets without an explicit override
    pub default_ttl: u32,
    /// Declared records, grouped later by the record-set reconciler.
    ///
    /// `None` skips record-set reconciliation for the zone; an explicitly
    /// empty map still diffs and deletes whatever is live.
    pub records: Option<RecordDecls>,
}

/// Fields valid for Slave zones.
#[derive(Clone, Debug, Serialize)]
pub struct SecondaryZone {
    /// Masters to transfer from, order-significant; never empty
    pub masters: Vec<String>,
}

/// Kind-specific zone fields, enforced at construction.
#[derive(Clone, Debug, Serialize)]
pub enum ZoneRole {
    /// Master or Native zone with locally managed content
    Primary(PrimaryZone),
    /// Slave zone whose content arrives by zone transfer
    Secondary(SecondaryZone),
}

/// A validated desired zone.
#[derive(Clone, Debug, Serialize)]
pub struct ZoneSpec {
    /// Zone name as declared, without the trailing dot
    pub name: String,
    /// Kind-specific fields
    pub role: ZoneRole,
    /// Desired non-reserved metadata, defaults already merged in
    pub metadata: MetadataMap,
}

impl ZoneSpec {
    /// Zone name in wire form, with the trailing dot.
    #[must_use]
    pub fn canonical_name(&self) -> String {
        canonical_name(&self.name)
    }

    /// Wire name of the declared kind.
    #[must_use]
    pub fn kind_str(&self) -> &'static str {
        match &self.role {
            ZoneRole::Primary(p) => p.kind.as_str(),
            ZoneRole::Secondary(_) => "Slave",
        }
    }

    /// The primary fields, if this is a Master or Native zone.
    #[must_use]
    pub fn primary(&self) -> Option<&PrimaryZone> {
        match &self.role {
            ZoneRole::Primary(p) => Some(p),
            ZoneRole::Secondary(_) => None,
        }
    }
}
