// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Desired-state configuration loading.
//!
//! The configuration file (YAML, or JSON via the YAML superset) declares the
//! API endpoint, a default metadata map, and the full set of managed zones
//! with their records. Loading is strict: unknown fields anywhere in the
//! file are rejected, and every zone is validated into a [`ZoneSpec`] whose
//! [`ZoneRole`] carries only the fields valid for its kind. A Slave zone
//! with a `soa_edit`, or a Master zone with `masters`, never reaches a
//! reconciler.
//!
//! # Example
//!
//! ```yaml
//! api_url: http://127.0.0.1:8081
//! prune: true
//! default_metadata:
//!   ALLOW-AXFR-FROM: ["AUTO-NS"]
//! zones:
//!   example.com:
//!     kind: Master
//!     soa_edit: INCEPTION-INCREMENT
//!     dnssec: true
//!     nsec3:
//!       iterations: 5
//!       salt: ab
//!     records:
//!       example.com:
//!         SOA:
//!           - c: ns1.example.com. hostmaster.example.com. AUTO 10800 3600 604800 3600
//!         NS:
//!           - c: ns1.example.com.
//!       www.example.com:
//!         A:
//!           - c: 192.0.2.10
//!             r: true
//!           - t: 300
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_PDNSUTIL_BIN, DEFAULT_RECORD_TTL_SECS, DEFAULT_SERVER_ID,
};
use crate::errors::ConfigError;
use crate::model::{
    is_reserved_metadata_kind, MetadataMap, Nsec3Params, PrimaryKind, PrimaryZone, RecordDecls,
    SecondaryZone, ZoneRole, ZoneSpec,
};

/// Zone kind as written in the configuration file.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub enum ZoneKindConfig {
    /// Authoritative primary with outgoing transfers
    Master,
    /// Replica populated from its masters
    Slave,
    /// Authoritative, backend-replicated
    Native,
}

impl ZoneKindConfig {
    fn as_str(self) -> &'static str {
        match self {
            Self::Master => "Master",
            Self::Slave => "Slave",
            Self::Native => "Native",
        }
    }
}

/// NSEC3 parameters as written in the configuration file.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Nsec3Config {
    /// Additional hash iterations
    pub iterations: u16,

    /// Hex salt; defaults to unsalted
    #[serde(default)]
    pub salt: String,

    /// Narrow mode
    #[serde(default)]
    pub narrow: bool,
}

/// One zone as written in the configuration file.
///
/// All kind-specific fields are optional here; [`validate`] enforces which
/// of them the declared kind requires or forbids.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoneConfig {
    /// Master, Slave or Native
    pub kind: ZoneKindConfig,

    /// SOA-EDIT policy; mandatory unless kind is Slave
    #[serde(default)]
    pub soa_edit: Option<String>,

    /// SOA-EDIT-API policy; defaults to `soa_edit`
    #[serde(default)]
    pub soa_edit_api: Option<String>,

    /// Whether the zone is DNSSEC-signed
    #[serde(default)]
    pub dnssec: Option<bool>,

    /// Whether signatures are supplied externally
    #[serde(default)]
    pub presigned: Option<bool>,

    /// Whether the server rectifies after API writes
    #[serde(default)]
    pub api_rectify: Option<bool>,

    /// NSEC3 parameters for a signed zone
    #[serde(default)]
    pub nsec3: Option<Nsec3Config>,

    /// TTL for record sets without an explicit override
    #[serde(default)]
    pub default_ttl: Option<u32>,

    /// Masters to transfer from; mandatory iff kind is Slave
    #[serde(default)]
    pub masters: Option<Vec<String>>,

    /// Per-zone metadata, overriding the default map per key
    #[serde(default)]
    pub metadata: MetadataMap,

    /// Record declarations: owning name -> type -> items
    #[serde(default)]
    pub records: Option<RecordDecls>,
}

/// The configuration file as a whole.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// PowerDNS API endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// PowerDNS server id, `localhost` on the Authoritative Server
    #[serde(default = "default_server_id")]
    pub server_id: String,

    /// Administrative command for DNSSEC operations
    #[serde(default = "default_pdnsutil_bin")]
    pub pdnsutil: String,

    /// Delete live zones absent from the declared set
    #[serde(default)]
    pub prune: bool,

    /// Metadata applied to every zone unless overridden per key
    #[serde(default)]
    pub default_metadata: MetadataMap,

    /// Managed zones by name (without trailing dot)
    #[serde(default)]
    pub zones: BTreeMap<String, ZoneConfig>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_server_id() -> String {
    DEFAULT_SERVER_ID.to_string()
}

fn default_pdnsutil_bin() -> String {
    DEFAULT_PDNSUTIL_BIN.to_string()
}

/// A loaded and validated run configuration.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// PowerDNS API endpoint
    pub api_url: String,
    /// PowerDNS server id
    pub server_id: String,
    /// Administrative command for DNSSEC operations
    pub pdnsutil: String,
    /// Whether the garbage collector runs after the zones
    pub prune: bool,
    /// Validated zones in deterministic name order
    pub zones: Vec<ZoneSpec>,
}

/// Load and validate a configuration file.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read or parsed, or if a
/// zone declaration is invalid for its kind.
pub fn load(path: &Path) -> Result<RunConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let file: ConfigFile = serde_yaml::from_str(&text).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    validate(file)
}

/// Validate a parsed configuration file into a [`RunConfig`].
///
/// # Errors
///
/// Returns a [`ConfigError`] naming the first invalid zone declaration.
pub fn validate(file: ConfigFile) -> Result<RunConfig, ConfigError> {
    let mut zones = Vec::with_capacity(file.zones.len());
    for (name, zone) in &file.zones {
        zones.push(validate_zone(name, zone, &file.default_metadata)?);
    }
    Ok(RunConfig {
        api_url: file.api_url,
        server_id: file.server_id,
        pdnsutil: file.pdnsutil,
        prune: file.prune,
        zones,
    })
}

/// Merge the default metadata map with a zone's own, zone winning per key.
fn merged_metadata(
    zone: &str,
    defaults: &MetadataMap,
    overrides: &MetadataMap,
) -> Result<MetadataMap, ConfigError> {
    let mut merged = defaults.clone();
    for (kind, values) in overrides {
        merged.insert(kind.clone(), values.clone());
    }
    for kind in merged.keys() {
        if is_reserved_metadata_kind(kind) {
            return Err(ConfigError::ReservedMetadataKind {
                zone: zone.to_string(),
                kind: kind.clone(),
            });
        }
    }
    Ok(merged)
}

fn validate_zone(
    name: &str,
    zone: &ZoneConfig,
    default_metadata: &MetadataMap,
) -> Result<ZoneSpec, ConfigError> {
    let metadata = merged_metadata(name, default_metadata, &zone.metadata)?;

    let role = match zone.kind {
        ZoneKindConfig::Slave => validate_secondary(name, zone)?,
        ZoneKindConfig::Master => validate_primary(name, zone, PrimaryKind::Master)?,
        ZoneKindConfig::Native => validate_primary(name, zone, PrimaryKind::Native)?,
    };

    Ok(ZoneSpec {
        name: name.trim_end_matches('.').to_string(),
        role,
        metadata,
    })
}

fn validate_secondary(name: &str, zone: &ZoneConfig) -> Result<ZoneRole, ConfigError> {
    // Primary-only fields are meaningless on a Slave zone and must not be
    // declared at all.
    let forbidden: [(&'static str, bool); 8] = [
        ("soa_edit", zone.soa_edit.is_some()),
        ("soa_edit_api", zone.soa_edit_api.is_some()),
        ("dnssec", zone.dnssec.is_some()),
        ("presigned", zone.presigned.is_some()),
        ("api_rectify", zone.api_rectify.is_some()),
        ("nsec3", zone.nsec3.is_some()),
        ("default_ttl", zone.default_ttl.is_some()),
        ("records", zone.records.is_some()),
    ];
    for (field, present) in forbidden {
        if present {
            return Err(ConfigError::FieldNotAllowed {
                zone: name.to_string(),
                field,
                kind: zone.kind.as_str(),
            });
        }
    }

    let masters = zone.masters.clone().ok_or_else(|| ConfigError::MissingMasters {
        zone: name.to_string(),
    })?;
    if masters.is_empty() {
        return Err(ConfigError::EmptyMasters {
            zone: name.to_string(),
        });
    }

    Ok(ZoneRole::Secondary(SecondaryZone { masters }))
}

fn validate_primary(
    name: &str,
    zone: &ZoneConfig,
    kind: PrimaryKind,
) -> Result<ZoneRole, ConfigError> {
    if zone.masters.is_some() {
        return Err(ConfigError::FieldNotAllowed {
            zone: name.to_string(),
            field: "masters",
            kind: zone.kind.as_str(),
        });
    }

    let soa_edit = zone.soa_edit.clone().ok_or_else(|| ConfigError::MissingSoaEdit {
        zone: name.to_string(),
    })?;
    let soa_edit_api = zone.soa_edit_api.clone().unwrap_or_else(|| soa_edit.clone());

    Ok(ZoneRole::Primary(PrimaryZone {
        kind,
        soa_edit,
        soa_edit_api,
        dnssec: zone.dnssec.unwrap_or(false),
        presigned: zone.presigned.unwrap_or(false),
        api_rectify: zone.api_rectify.unwrap_or(false),
        nsec3: zone
            .nsec3
            .as_ref()
            .map(|n| Nsec3Params::new(n.iterations, n.salt.clone(), n.narrow)),
        default_ttl: zone.default_ttl.unwrap_or(DEFAULT_RECORD_TTL_SECS),
        records: zone.records.clone(),
    }))
}
