// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone store: the abstract client over the PowerDNS control-plane API and
//! the administrative command interface.
//!
//! The reconcilers talk to the [`ZoneStore`] trait only; [`PdnsStore`] is
//! the production implementation composing the HTTP client ([`api::PdnsApi`])
//! and the `pdnsutil` runner ([`pdnsutil::PdnsUtil`]). Tests substitute an
//! in-memory store, which is what keeps the convergence logic runnable
//! without a live server.

pub mod api;
pub mod pdnsutil;
pub mod types;

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::model::{MetadataMap, Nsec3Params};
use crate::pdns::api::PdnsApi;
use crate::pdns::pdnsutil::PdnsUtil;
use crate::pdns::types::{
    ApiRrset, CreateZoneRequest, DnssecState, RrsetChange, ZoneAttributes,
};

/// Operations the reconcilers need from the durable zone state.
///
/// Every call is synchronous from the engine's point of view: it is awaited
/// to completion before the next one is issued, and a failure is surfaced
/// immediately with no retry.
#[async_trait]
pub trait ZoneStore: Send + Sync {
    /// Fetch a zone's attributes, `None` if the zone does not exist.
    async fn get_zone(&self, zone: &str) -> Result<Option<ZoneAttributes>, StoreError>;

    /// Create a zone.
    async fn create_zone(&self, request: &CreateZoneRequest) -> Result<(), StoreError>;

    /// Replace a zone's attributes with the full desired set.
    async fn update_zone(
        &self,
        zone: &str,
        attributes: &ZoneAttributes,
    ) -> Result<(), StoreError>;

    /// Delete a zone.
    async fn delete_zone(&self, zone: &str) -> Result<(), StoreError>;

    /// Names of all zones on the server, in wire form.
    async fn list_zones(&self) -> Result<Vec<String>, StoreError>;

    /// A zone's full metadata map, reserved kinds included.
    async fn get_metadata(&self, zone: &str) -> Result<MetadataMap, StoreError>;

    /// Create or replace the values under one metadata kind.
    async fn upsert_metadata(
        &self,
        zone: &str,
        kind: &str,
        values: &[String],
    ) -> Result<(), StoreError>;

    /// Delete one metadata kind.
    async fn delete_metadata(&self, zone: &str, kind: &str) -> Result<(), StoreError>;

    /// A zone's live record sets.
    async fn get_rrsets(&self, zone: &str) -> Result<Vec<ApiRrset>, StoreError>;

    /// Apply one batched record-set patch.
    async fn patch_rrsets(&self, zone: &str, changes: &[RrsetChange]) -> Result<(), StoreError>;

    /// A zone's typed DNSSEC status.
    async fn dnssec_state(&self, zone: &str) -> Result<DnssecState, StoreError>;

    /// Enable DNSSEC for a zone.
    async fn secure_zone(&self, zone: &str) -> Result<(), StoreError>;

    /// Remove all DNSSEC state from a zone.
    async fn disable_dnssec(&self, zone: &str) -> Result<(), StoreError>;

    /// Set NSEC3 parameters on a secured zone.
    async fn set_nsec3(&self, zone: &str, params: &Nsec3Params) -> Result<(), StoreError>;

    /// Rectify a zone's ordering and auxiliary data.
    async fn rectify_zone(&self, zone: &str) -> Result<(), StoreError>;
}

/// Production store: PowerDNS HTTP API plus `pdnsutil`.
#[derive(Clone, Debug)]
pub struct PdnsStore {
    api: PdnsApi,
    admin: PdnsUtil,
}

impl PdnsStore {
    /// Store backed by the given API client and administrative runner.
    #[must_use]
    pub fn new(api: PdnsApi, admin: PdnsUtil) -> Self {
        Self { api, admin }
    }
}

#[async_trait]
impl ZoneStore for PdnsStore {
    async fn get_zone(&self, zone: &str) -> Result<Option<ZoneAttributes>, StoreError> {
        Ok(self
            .api
            .get_zone(zone, false)
            .await?
            .map(|z| z.attributes))
    }

    async fn create_zone(&self, request: &CreateZoneRequest) -> Result<(), StoreError> {
        self.api.create_zone(request).await
    }

    async fn update_zone(
        &self,
        zone: &str,
        attributes: &ZoneAttributes,
    ) -> Result<(), StoreError> {
        self.api.update_zone(zone, attributes).await
    }

    async fn delete_zone(&self, zone: &str) -> Result<(), StoreError> {
        self.api.delete_zone(zone).await
    }

    async fn list_zones(&self) -> Result<Vec<String>, StoreError> {
        self.api.list_zones().await
    }

    async fn get_metadata(&self, zone: &str) -> Result<MetadataMap, StoreError> {
        self.api.get_metadata(zone).await
    }

    async fn upsert_metadata(
        &self,
        zone: &str,
        kind: &str,
        values: &[String],
    ) -> Result<(), StoreError> {
        self.api.upsert_metadata(zone, kind, values).await
    }

    async fn delete_metadata(&self, zone: &str, kind: &str) -> Result<(), StoreError> {
        self.api.delete_metadata(zone, kind).await
    }

    async fn get_rrsets(&self, zone: &str) -> Result<Vec<ApiRrset>, StoreError> {
        let api_zone = self.api.get_zone(zone, true).await?.ok_or_else(|| {
            StoreError::UnexpectedResponse {
                operation: "get_rrsets",
                zone: zone.to_string(),
                message: "zone disappeared between reconciliation stages".to_string(),
            }
        })?;
        Ok(api_zone.rrsets)
    }

    async fn patch_rrsets(&self, zone: &str, changes: &[RrsetChange]) -> Result<(), StoreError> {
        self.api.patch_rrsets(zone, changes).await
    }

    /// Assemble the DNSSEC status from the zone flag and the NSEC3 metadata.
    ///
    /// NSEC3PARAM and NSEC3NARROW are reserved metadata kinds owned by this
    /// layer; the server stores the narrow bit as the string "1".
    async fn dnssec_state(&self, zone: &str) -> Result<DnssecState, StoreError> {
        let api_zone = self.api.get_zone(zone, false).await?.ok_or_else(|| {
            StoreError::UnexpectedResponse {
                operation: "dnssec_state",
                zone: zone.to_string(),
                message: "zone disappeared between reconciliation stages".to_string(),
            }
        })?;
        if !api_zone.attributes.dnssec.unwrap_or(false) {
            return Ok(DnssecState::unsecured());
        }

        let metadata = self.api.get_metadata(zone).await?;
        let narrow = metadata
            .get("NSEC3NARROW")
            .and_then(|values| values.first())
            .is_some_and(|v| v == "1");
        let nsec3 = match metadata.get("NSEC3PARAM").and_then(|values| values.first()) {
            Some(params) => Some(Nsec3Params::parse(params, narrow).ok_or_else(|| {
                StoreError::UnexpectedResponse {
                    operation: "dnssec_state",
                    zone: zone.to_string(),
                    message: format!("unparseable NSEC3PARAM value '{params}'"),
                }
            })?),
            None => None,
        };

        Ok(DnssecState {
            secured: true,
            nsec3,
        })
    }

    async fn secure_zone(&self, zone: &str) -> Result<(), StoreError> {
        self.admin.secure_zone(zone).await
    }

    async fn disable_dnssec(&self, zone: &str) -> Result<(), StoreError> {
        self.admin.disable_dnssec(zone).await
    }

    async fn set_nsec3(&self, zone: &str, params: &Nsec3Params) -> Result<(), StoreError> {
        self.admin.set_nsec3(zone, params).await
    }

    async fn rectify_zone(&self, zone: &str) -> Result<(), StoreError> {
        self.admin.rectify_zone(zone).await
    }
}

#[cfg(test)]
mod types_tests;
