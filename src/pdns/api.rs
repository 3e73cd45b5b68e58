// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP client for the PowerDNS control-plane API.
//!
//! All zone, metadata and record-set calls go through [`PdnsApi`]. Requests
//! are authenticated with the `X-API-Key` header and addressed as
//! `/api/v1/servers/{server_id}/...`; zone names are canonicalized to their
//! wire form (trailing dot) when URLs are built.
//!
//! There is deliberately no retry here: a failing call surfaces immediately
//! as a [`StoreError`] and the run converges whatever remains on the next
//! invocation.

use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info};
use url::Url;

use crate::constants::API_KEY_ENV;
use crate::errors::{ConfigError, StoreError};
use crate::model::{canonical_name, MetadataMap};
use crate::pdns::types::{ApiZone, CreateZoneRequest, MetadataItem, RrsetChange, ZoneAttributes};

/// Placeholder zone label for server-scoped calls in error context.
const NO_ZONE: &str = "-";

/// Client for one PowerDNS Authoritative API endpoint.
#[derive(Clone, Debug)]
pub struct PdnsApi {
    client: HttpClient,
    base_url: String,
    server_id: String,
    api_key: String,
}

impl PdnsApi {
    /// Build a client for the given endpoint and server id.
    ///
    /// The URL is validated up front so a typo fails before any zone is
    /// touched. The API key is passed in by the caller (read from the
    /// environment at startup) and is never logged.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiUrl`] if `api_url` is not an
    /// absolute http(s) URL.
    pub fn new(
        api_url: &str,
        server_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let parsed = Url::parse(api_url).map_err(|e| ConfigError::InvalidApiUrl {
            url: api_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidApiUrl {
                url: api_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self {
            client: HttpClient::new(),
            base_url: api_url.trim_end_matches('/').to_string(),
            server_id: server_id.into(),
            api_key: api_key.into(),
        })
    }

    /// Read the API key from the conventional environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] if the variable is unset.
    pub fn api_key_from_env() -> Result<String, ConfigError> {
        std::env::var(API_KEY_ENV).map_err(|_| ConfigError::MissingApiKey { var: API_KEY_ENV })
    }

    fn zones_url(&self) -> String {
        format!(
            "{}/api/v1/servers/{}/zones",
            self.base_url, self.server_id
        )
    }

    fn zone_url(&self, zone: &str) -> String {
        format!("{}/{}", self.zones_url(), canonical_name(zone))
    }

    fn metadata_url(&self, zone: &str) -> String {
        format!("{}/metadata", self.zone_url(zone))
    }

    /// Execute one request and return the status and body text.
    ///
    /// This is the single place HTTP mechanics live; the typed operations
    /// below decide what the status means for them.
    async fn send<T: Serialize + std::fmt::Debug>(
        &self,
        operation: &'static str,
        zone: &str,
        method: &str,
        url: &str,
        body: Option<&T>,
    ) -> Result<(StatusCode, String), StoreError> {
        info!(
            method = %method,
            url = %url,
            operation = %operation,
            "API request"
        );
        debug!(body = ?body, "API request body");

        let mut request = match method {
            "GET" => self.client.get(url),
            "POST" => self.client.post(url),
            "PUT" => self.client.put(url),
            "PATCH" => self.client.patch(url),
            "DELETE" => self.client.delete(url),
            other => {
                return Err(StoreError::UnexpectedResponse {
                    operation,
                    zone: zone.to_string(),
                    message: format!("unsupported HTTP method '{other}'"),
                })
            }
        };
        if let Some(body_data) = body {
            request = request.json(body_data);
        }

        let response = request
            .header("X-API-Key", &self.api_key)
            .send()
            .await
            .map_err(|source| StoreError::Transport {
                operation,
                zone: zone.to_string(),
                source,
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| StoreError::Transport {
                operation,
                zone: zone.to_string(),
                source,
            })?;

        debug!(
            operation = %operation,
            status = %status,
            response_len = text.len(),
            "API response"
        );

        Ok((status, text))
    }

    /// Like [`Self::send`], but a non-success status is an error.
    async fn request<T: Serialize + std::fmt::Debug>(
        &self,
        operation: &'static str,
        zone: &str,
        method: &str,
        url: &str,
        body: Option<&T>,
    ) -> Result<String, StoreError> {
        let (status, text) = self.send(operation, zone, method, url, body).await?;
        if !status.is_success() {
            error!(
                operation = %operation,
                zone = %zone,
                status = %status,
                error = %text,
                "API request failed"
            );
            return Err(StoreError::Api {
                operation,
                zone: zone.to_string(),
                status: status.as_u16(),
                message: text,
            });
        }
        Ok(text)
    }

    fn decode<T: DeserializeOwned>(
        operation: &'static str,
        zone: &str,
        text: &str,
    ) -> Result<T, StoreError> {
        serde_json::from_str(text).map_err(|e| StoreError::UnexpectedResponse {
            operation,
            zone: zone.to_string(),
            message: e.to_string(),
        })
    }

    /// Fetch a zone, optionally with its record sets.
    ///
    /// # Errors
    ///
    /// A 404 is `Ok(None)`; any other non-success status is a
    /// [`StoreError`].
    pub async fn get_zone(
        &self,
        zone: &str,
        with_rrsets: bool,
    ) -> Result<Option<ApiZone>, StoreError> {
        let mut url = self.zone_url(zone);
        if !with_rrsets {
            url.push_str("?rrsets=false");
        }

        let (status, text) = self
            .send("get_zone", zone, "GET", &url, None::<&()>)
            .await?;
        if status == StatusCode::NOT_FOUND {
            debug!(zone = %zone, "Zone not present on server");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(StoreError::Api {
                operation: "get_zone",
                zone: zone.to_string(),
                status: status.as_u16(),
                message: text,
            });
        }
        Ok(Some(Self::decode("get_zone", zone, &text)?))
    }

    /// Create a zone.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on any non-success status, including
    /// conflicts with an existing zone.
    pub async fn create_zone(&self, request: &CreateZoneRequest) -> Result<(), StoreError> {
        let url = self.zones_url();
        self.request("create_zone", &request.name, "POST", &url, Some(request))
            .await?;
        Ok(())
    }

    /// Replace a zone's attributes with the full desired set.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on any non-success status.
    pub async fn update_zone(
        &self,
        zone: &str,
        attributes: &ZoneAttributes,
    ) -> Result<(), StoreError> {
        let url = self.zone_url(zone);
        self.request("update_zone", zone, "PUT", &url, Some(attributes))
            .await?;
        Ok(())
    }

    /// Delete a zone.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on any non-success status.
    pub async fn delete_zone(&self, zone: &str) -> Result<(), StoreError> {
        let url = self.zone_url(zone);
        self.request("delete_zone", zone, "DELETE", &url, None::<&()>)
            .await?;
        Ok(())
    }

    /// List the names of all zones on the server, in wire form.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on any non-success status.
    pub async fn list_zones(&self) -> Result<Vec<String>, StoreError> {
        let url = self.zones_url();
        let text = self
            .request("list_zones", NO_ZONE, "GET", &url, None::<&()>)
            .await?;
        let zones: Vec<ApiZone> = Self::decode("list_zones", NO_ZONE, &text)?;
        Ok(zones.into_iter().map(|z| z.name).collect())
    }

    /// Fetch a zone's full metadata map.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on any non-success status.
    pub async fn get_metadata(&self, zone: &str) -> Result<MetadataMap, StoreError> {
        let url = self.metadata_url(zone);
        let text = self
            .request("get_metadata", zone, "GET", &url, None::<&()>)
            .await?;
        let items: Vec<MetadataItem> = Self::decode("get_metadata", zone, &text)?;
        Ok(items
            .into_iter()
            .map(|item| (item.kind, item.metadata))
            .collect())
    }

    /// Create or replace the values under one metadata kind.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on any non-success status.
    pub async fn upsert_metadata(
        &self,
        zone: &str,
        kind: &str,
        values: &[String],
    ) -> Result<(), StoreError> {
        let url = format!("{}/{kind}", self.metadata_url(zone));
        let item = MetadataItem {
            kind: kind.to_string(),
            metadata: values.to_vec(),
        };
        self.request("upsert_metadata", zone, "PUT", &url, Some(&item))
            .await?;
        Ok(())
    }

    /// Delete one metadata kind.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on any non-success status.
    pub async fn delete_metadata(&self, zone: &str, kind: &str) -> Result<(), StoreError> {
        let url = format!("{}/{kind}", self.metadata_url(zone));
        self.request("delete_metadata", zone, "DELETE", &url, None::<&()>)
            .await?;
        Ok(())
    }

    /// Apply one batched record-set patch.
    ///
    /// Entries already applied by the server before a failure are not
    /// retried or rolled back; re-running converges them.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on any non-success status.
    pub async fn patch_rrsets(
        &self,
        zone: &str,
        changes: &[RrsetChange],
    ) -> Result<(), StoreError> {
        let url = self.zone_url(zone);
        let body = serde_json::json!({ "rrsets": changes });
        self.request("patch_rrsets", zone, "PATCH", &url, Some(&body))
            .await?;
        Ok(())
    }
}
