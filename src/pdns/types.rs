// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Wire types for the PowerDNS control-plane API.
//!
//! Everything the API speaks is deserialized into these types at the
//! adapter boundary; the reconcilers never look at raw JSON. Booleans are
//! real booleans here and only become strings ("1") where the server stores
//! them that way (NSEC3NARROW metadata).

use serde::{Deserialize, Serialize};

use crate::model::{Nsec3Params, PrimaryKind};

/// Zone kind as the API spells it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ZoneKind {
    /// Authoritative primary with outgoing transfers
    Master,
    /// Replica populated by zone transfer from its masters
    Slave,
    /// Authoritative, replicated through the backend instead of AXFR
    Native,
}

impl ZoneKind {
    /// Wire name of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Master => "Master",
            Self::Slave => "Slave",
            Self::Native => "Native",
        }
    }
}

impl From<PrimaryKind> for ZoneKind {
    fn from(kind: PrimaryKind) -> Self {
        match kind {
            PrimaryKind::Master => Self::Master,
            PrimaryKind::Native => Self::Native,
        }
    }
}

/// Zone-level attributes, as sent on create/update and read back on get.
///
/// Every field but the kind is optional: a desired attribute set carries
/// only the fields valid for the zone's kind (a Slave update is kind and
/// masters, nothing else), and serialization skips the rest so an update
/// never clobbers attributes the kind does not manage. The live side fills
/// whatever the server reports; unset string attributes come back empty.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ZoneAttributes {
    /// Master, Slave or Native
    pub kind: ZoneKind,

    /// Masters to transfer from; part of the desired set for Slave only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masters: Option<Vec<String>>,

    /// SOA-EDIT policy for outgoing transfers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soa_edit: Option<String>,

    /// SOA-EDIT-API policy for API writes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soa_edit_api: Option<String>,

    /// Whether the zone is DNSSEC-signed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnssec: Option<bool>,

    /// Whether signatures are supplied externally
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presigned: Option<bool>,

    /// Whether the server rectifies after API writes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_rectify: Option<bool>,

    /// NSEC3PARAM presentation string, empty for NSEC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nsec3param: Option<String>,

    /// NSEC3 narrow mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nsec3narrow: Option<bool>,
}

impl ZoneAttributes {
    /// The SOA-EDIT policy, with the unset and empty cases collapsed.
    #[must_use]
    pub fn soa_edit_or_empty(&self) -> &str {
        self.soa_edit.as_deref().unwrap_or("")
    }

    /// The SOA-EDIT-API policy, with the unset and empty cases collapsed.
    #[must_use]
    pub fn soa_edit_api_or_empty(&self) -> &str {
        self.soa_edit_api.as_deref().unwrap_or("")
    }

    /// The NSEC3PARAM string, with the unset and empty cases collapsed.
    #[must_use]
    pub fn nsec3param_or_empty(&self) -> &str {
        self.nsec3param.as_deref().unwrap_or("")
    }
}

/// A zone as returned by the API, attributes plus optional record sets.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiZone {
    /// Zone name in wire form (trailing dot)
    pub name: String,

    /// Zone-level attributes
    #[serde(flatten)]
    pub attributes: ZoneAttributes,

    /// Record sets; present when fetched with rrsets enabled
    #[serde(default)]
    pub rrsets: Vec<ApiRrset>,
}

/// One record inside a record set.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiRecord {
    /// Record content in presentation format
    pub content: String,

    /// Disabled records are not served
    #[serde(default)]
    pub disabled: bool,

    /// Ask the server to write a companion PTR record.
    ///
    /// Write-only: the live side never reports it, so it is excluded from
    /// equality by never being set on deserialized records.
    #[serde(rename = "set-ptr", default, skip_serializing_if = "Option::is_none")]
    pub set_ptr: Option<bool>,
}

impl ApiRecord {
    /// A plain enabled record with the given content.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            disabled: false,
            set_ptr: None,
        }
    }
}

/// A live record set keyed by (name, type).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiRrset {
    /// Owning name in wire form
    pub name: String,

    /// Record type, e.g. "A", "SOA"
    #[serde(rename = "type")]
    pub rtype: String,

    /// Shared TTL of the record set
    #[serde(default)]
    pub ttl: u32,

    /// Records of the set
    #[serde(default)]
    pub records: Vec<ApiRecord>,
}

/// Patch entry kind.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    /// Replace the whole record set with the supplied records
    Replace,
    /// Drop the record set entirely
    Delete,
}

/// One entry of an rrset patch.
///
/// DELETE entries carry neither ttl nor records; the pair is dropped
/// whatever its live contents are.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RrsetChange {
    /// Owning name in wire form
    pub name: String,

    /// Record type
    #[serde(rename = "type")]
    pub rtype: String,

    /// REPLACE or DELETE
    pub changetype: ChangeType,

    /// Resolved TTL; REPLACE only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,

    /// Replacement records; REPLACE only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<ApiRecord>,
}

impl RrsetChange {
    /// A DELETE entry for the given (name, type) pair.
    #[must_use]
    pub fn delete(name: impl Into<String>, rtype: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rtype: rtype.into(),
            changetype: ChangeType::Delete,
            ttl: None,
            records: Vec::new(),
        }
    }
}

/// One metadata entry as the API reports and accepts it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetadataItem {
    /// Metadata kind, e.g. "ALLOW-AXFR-FROM"
    pub kind: String,

    /// Ordered values under the kind
    #[serde(default)]
    pub metadata: Vec<String>,
}

/// Typed DNSSEC status of a zone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DnssecState {
    /// Whether the zone is signed
    pub secured: bool,

    /// Live NSEC3 configuration; `None` means NSEC
    pub nsec3: Option<Nsec3Params>,
}

impl DnssecState {
    /// State of a zone that has never been secured.
    #[must_use]
    pub fn unsecured() -> Self {
        Self {
            secured: false,
            nsec3: None,
        }
    }
}

/// Body of a zone-creation call.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct CreateZoneRequest {
    /// Zone name in wire form
    pub name: String,

    /// Initial zone-level attributes
    #[serde(flatten)]
    pub attributes: ZoneAttributes,

    /// Bootstrap nameservers; required by the API for non-Slave zones
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nameservers: Vec<String>,
}
