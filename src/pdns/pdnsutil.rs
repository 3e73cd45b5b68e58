// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Administrative command adapter for `pdnsutil`.
//!
//! DNSSEC transitions (secure, unsecure, NSEC3 parameters, rectify) go
//! through the PowerDNS administrative tool rather than the HTTP API. This
//! module builds the argument vectors, runs the tool, and converts failures
//! into typed [`StoreError`] values; nothing above this layer sees command
//! output.

use tokio::process::Command;
use tracing::{debug, error, info};

use crate::errors::StoreError;
use crate::model::Nsec3Params;

/// Runner for one `pdnsutil` binary.
#[derive(Clone, Debug)]
pub struct PdnsUtil {
    program: String,
}

impl PdnsUtil {
    /// Runner invoking the given program, normally `pdnsutil`.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments for securing a zone.
    #[must_use]
    pub fn secure_zone_args(zone: &str) -> Vec<String> {
        vec!["secure-zone".to_string(), zone.to_string()]
    }

    /// Arguments for removing all DNSSEC state from a zone.
    #[must_use]
    pub fn disable_dnssec_args(zone: &str) -> Vec<String> {
        vec!["disable-dnssec".to_string(), zone.to_string()]
    }

    /// Arguments for setting NSEC3 parameters on a secured zone.
    #[must_use]
    pub fn set_nsec3_args(zone: &str, params: &Nsec3Params) -> Vec<String> {
        let mut args = vec![
            "set-nsec3".to_string(),
            zone.to_string(),
            params.param_string(),
        ];
        if params.narrow {
            args.push("narrow".to_string());
        }
        args
    }

    /// Arguments for rectifying a zone after an NSEC3 change.
    #[must_use]
    pub fn rectify_zone_args(zone: &str) -> Vec<String> {
        vec!["rectify-zone".to_string(), zone.to_string()]
    }

    /// Run the tool with the given arguments and capture its output.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AdminSpawn`] if the program cannot be started
    /// and [`StoreError::Admin`] on a non-zero exit, carrying the command
    /// line and captured stderr.
    async fn run(&self, args: &[String]) -> Result<(), StoreError> {
        let command_line = format!("{} {}", self.program, args.join(" "));
        info!(command = %command_line, "Running administrative command");

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(|source| StoreError::AdminSpawn {
                command: command_line.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let status = output
                .status
                .code()
                .map_or_else(|| "killed by signal".to_string(), |c| format!("exit {c}"));
            error!(
                command = %command_line,
                status = %status,
                stderr = %stderr,
                "Administrative command failed"
            );
            return Err(StoreError::Admin {
                command: command_line,
                status,
                stderr,
            });
        }

        debug!(
            command = %command_line,
            stdout_len = output.stdout.len(),
            "Administrative command succeeded"
        );
        Ok(())
    }

    /// Enable DNSSEC for a zone with default keys.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the command cannot run or exits
    /// unsuccessfully.
    pub async fn secure_zone(&self, zone: &str) -> Result<(), StoreError> {
        self.run(&Self::secure_zone_args(zone)).await
    }

    /// Remove all DNSSEC state from a zone.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the command cannot run or exits
    /// unsuccessfully.
    pub async fn disable_dnssec(&self, zone: &str) -> Result<(), StoreError> {
        self.run(&Self::disable_dnssec_args(zone)).await
    }

    /// Set NSEC3 parameters on a secured zone.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the command cannot run or exits
    /// unsuccessfully.
    pub async fn set_nsec3(&self, zone: &str, params: &Nsec3Params) -> Result<(), StoreError> {
        self.run(&Self::set_nsec3_args(zone, params)).await
    }

    /// Rectify a zone's ordering and auxiliary data.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the command cannot run or exits
    /// unsuccessfully.
    pub async fn rectify_zone(&self, zone: &str) -> Result<(), StoreError> {
        self.run(&Self::rectify_zone_args(zone)).await
    }
}
