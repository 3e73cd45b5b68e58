// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for desired-state validation and zone store operations.
//!
//! This module provides the error taxonomy used by the reconcilers:
//! - Configuration errors: a declared zone is missing a field mandatory for
//!   its kind, or carries a field its kind forbids
//! - Validation errors: malformed record declarations, caught during
//!   record-set grouping before any diff is computed
//! - Store errors: any non-success response from the PowerDNS API or the
//!   administrative command interface
//!
//! All three are detected before or during the mutation that triggered them
//! and abort the current zone's processing; nothing is retried or rolled
//! back. Recovery is by re-running the same desired state.

use thiserror::Error;

/// Errors in the declared desired state, detected at construction.
///
/// A `ConfigError` means the configuration file could not be turned into a
/// well-formed zone specification. No store call has been issued when one of
/// these is raised.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to read configuration file '{path}': {source}")]
    Read {
        /// Path that was opened
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed
    #[error("Failed to parse configuration file '{path}': {reason}")]
    Parse {
        /// Path that was parsed
        path: String,
        /// Deserializer message, including unknown-field rejections
        reason: String,
    },

    /// The API base URL is not a valid absolute URL
    #[error("Invalid API URL '{url}': {reason}")]
    InvalidApiUrl {
        /// The offending URL string
        url: String,
        /// Explanation of what is invalid
        reason: String,
    },

    /// The API key environment variable is unset
    #[error("API key environment variable '{var}' is not set")]
    MissingApiKey {
        /// Name of the environment variable that was consulted
        var: &'static str,
    },

    /// A non-slave zone is missing its mandatory SOA-edit policy
    #[error("Zone '{zone}': soa_edit is mandatory for Master and Native zones")]
    MissingSoaEdit {
        /// The zone with the incomplete declaration
        zone: String,
    },

    /// A slave zone declares no masters
    #[error("Zone '{zone}': masters is mandatory for Slave zones")]
    MissingMasters {
        /// The zone with the incomplete declaration
        zone: String,
    },

    /// A slave zone declares an empty masters list
    #[error("Zone '{zone}': masters must not be empty on a Slave zone")]
    EmptyMasters {
        /// The zone with the incomplete declaration
        zone: String,
    },

    /// A field was declared on a zone kind it is meaningless for
    #[error("Zone '{zone}': field '{field}' is not allowed on a {kind} zone")]
    FieldNotAllowed {
        /// The zone with the invalid declaration
        zone: String,
        /// The offending field name
        field: &'static str,
        /// The declared zone kind
        kind: &'static str,
    },

    /// A desired metadata map declares a reserved kind
    #[error("Zone '{zone}': metadata kind '{kind}' is reserved and managed through zone attributes")]
    ReservedMetadataKind {
        /// The zone with the invalid declaration
        zone: String,
        /// The reserved metadata kind
        kind: String,
    },
}

/// Malformed record declarations, detected during record-set grouping.
///
/// Grouping runs before the diff, so a `ValidationError` aborts the zone
/// with no record mutation attempted.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A record item sets both a content and a ttl override
    #[error("RRset '{name} {rtype}' in zone '{zone}': item sets both content and ttl")]
    ContentAndTtl {
        /// The zone being grouped
        zone: String,
        /// Owning name of the record set
        name: String,
        /// Record type of the record set
        rtype: String,
    },

    /// A record item sets neither a content nor a ttl override
    #[error("RRset '{name} {rtype}' in zone '{zone}': item sets neither content nor ttl")]
    EmptyItem {
        /// The zone being grouped
        zone: String,
        /// Owning name of the record set
        name: String,
        /// Record type of the record set
        rtype: String,
    },

    /// A ttl override item requests PTR sync
    #[error("RRset '{name} {rtype}' in zone '{zone}': ttl override cannot request PTR sync")]
    PtrSyncOnTtl {
        /// The zone being grouped
        zone: String,
        /// Owning name of the record set
        name: String,
        /// Record type of the record set
        rtype: String,
    },

    /// Two items in the same record-set group supply ttl overrides
    #[error("RRset '{name} {rtype}' in zone '{zone}': duplicate ttl override")]
    DuplicateTtl {
        /// The zone being grouped
        zone: String,
        /// Owning name of the record set
        name: String,
        /// Record type of the record set
        rtype: String,
    },

    /// A declared SOA record set does not hold exactly one record
    #[error("RRset '{name} SOA' in zone '{zone}' must hold exactly one record, found {count}")]
    SoaRecordCount {
        /// The zone being grouped
        zone: String,
        /// Owning name of the SOA record set
        name: String,
        /// Number of records found in the group
        count: usize,
    },

    /// A declared SOA content is too short to carry a serial field
    #[error("Zone '{zone}': SOA content '{content}' has no serial field")]
    MalformedSoa {
        /// The zone being grouped
        zone: String,
        /// The offending SOA content
        content: String,
    },
}

/// Non-success responses from the zone store.
///
/// Carries the attempted operation and the underlying status so the caller
/// can identify the zone, the component, and the cause. Operations already
/// issued before the failing one are not undone.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The control-plane API returned a non-success status
    #[error("API operation '{operation}' on zone '{zone}' failed with HTTP {status}: {message}")]
    Api {
        /// The attempted operation (e.g. "update_zone")
        operation: &'static str,
        /// The zone the operation targeted ("-" for server-scoped calls)
        zone: String,
        /// HTTP status code returned by the API
        status: u16,
        /// Response body or error message
        message: String,
    },

    /// The HTTP request could not be sent or its body could not be read
    #[error("API operation '{operation}' on zone '{zone}' failed: {source}")]
    Transport {
        /// The attempted operation
        operation: &'static str,
        /// The zone the operation targeted ("-" for server-scoped calls)
        zone: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// A success response could not be decoded into the expected shape
    #[error("API operation '{operation}' on zone '{zone}' returned an unexpected response: {message}")]
    UnexpectedResponse {
        /// The attempted operation
        operation: &'static str,
        /// The zone the operation targeted
        zone: String,
        /// Explanation of what did not decode
        message: String,
    },

    /// The administrative command exited unsuccessfully
    #[error("Administrative command '{command}' failed ({status}): {stderr}")]
    Admin {
        /// The full command line that was run
        command: String,
        /// Exit status, or a description when killed by a signal
        status: String,
        /// Captured stderr
        stderr: String,
    },

    /// The administrative command could not be spawned
    #[error("Failed to run administrative command '{command}': {source}")]
    AdminSpawn {
        /// The full command line that was attempted
        command: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Composite error type covering everything a reconciliation run can raise.
///
/// Errors are zone-scoped: the orchestrator knows which zone raised one, and
/// within a zone processing is fail-fast and strictly ordered.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Desired-state object invalid for its kind
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Malformed record declarations
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Non-success response from the zone store
    #[error(transparent)]
    Store(#[from] StoreError),
}
