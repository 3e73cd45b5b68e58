// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for pdnsync.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Control-Plane API Constants
// ============================================================================

/// Environment variable holding the API key sent in the `X-API-Key` header
pub const API_KEY_ENV: &str = "PDNS_AUTH_API_KEY";

/// Default PowerDNS `server_id`.
///
/// On the Authoritative Server the server id is always `localhost`.
pub const DEFAULT_SERVER_ID: &str = "localhost";

/// Default PowerDNS Authoritative API endpoint
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8081";

// ============================================================================
// Administrative Interface Constants
// ============================================================================

/// Default administrative command used for DNSSEC operations
pub const DEFAULT_PDNSUTIL_BIN: &str = "pdnsutil";

// ============================================================================
// DNS Protocol Constants
// ============================================================================

/// Default TTL for record sets that carry no explicit override (1 hour)
pub const DEFAULT_RECORD_TTL_SECS: u32 = 3600;

/// Sentinel serial value in a declared SOA record.
///
/// A declared SOA whose serial field equals this token inherits the serial
/// of the live SOA record, so an unchanged declaration never forces a write.
pub const SOA_SERIAL_AUTO: &str = "AUTO";

/// Serial substituted for the `AUTO` sentinel when the zone has no live SOA
pub const SOA_SERIAL_BASE: &str = "1";

/// RRset type carrying the zone serial
pub const RRSET_TYPE_SOA: &str = "SOA";

/// Nameserver written into a freshly created primary zone.
///
/// The control API refuses to create a primary zone without at least one
/// nameserver; the record reconciler replaces it in the same run.
pub const BOOTSTRAP_NAMESERVER: &str = "ns.bootstrap.invalid.";

/// NSEC3 hash algorithm (SHA-1, the only value the protocol defines)
pub const NSEC3_ALGORITHM: u8 = 1;

/// NSEC3 flags field written on `set-nsec3` (opt-out never enabled)
pub const NSEC3_FLAGS: u8 = 0;

// ============================================================================
// Metadata Constants
// ============================================================================

/// Metadata kinds owned by the zone-state and DNSSEC reconcilers.
///
/// These are derived from zone attributes and are invisible to the metadata
/// reconciler: never upserted, never deleted, never diffed.
pub const RESERVED_METADATA_KINDS: [&str; 6] = [
    "API-RECTIFY",
    "NSEC3NARROW",
    "NSEC3PARAM",
    "PRESIGNED",
    "SOA-EDIT",
    "SOA-EDIT-API",
];

// ============================================================================
// Run Output Constants
// ============================================================================

/// Literal stdout token emitted when an invocation issued a mutation.
///
/// Calling layers detect "changed" vs "no-op" by scanning for this token;
/// everything else on stdout is the dry-run plan, diagnostics go to stderr.
pub const CHANGED_MARKER: &str = "CHANGED";

/// Scope label printed with the marker for the garbage-collection invocation
pub const PRUNE_SCOPE: &str = "prune";
