// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for the desired-state model types.

#[cfg(test)]
mod tests {
    use crate::model::*;

    // =====================================================
    // Canonical Name Tests
    // =====================================================

    #[test]
    fn test_canonical_name_appends_dot() {
        assert_eq!(canonical_name("example.com"), "example.com.");
    }

    #[test]
    fn test_canonical_name_keeps_existing_dot() {
        assert_eq!(canonical_name("example.com."), "example.com.");
    }

    #[test]
    fn test_canonical_name_subdomain() {
        assert_eq!(canonical_name("www.example.com"), "www.example.com.");
    }

    // =====================================================
    // Reserved Metadata Kind Tests
    // =====================================================

    #[test]
    fn test_reserved_kinds_are_reserved() {
        for kind in [
            "API-RECTIFY",
            "NSEC3NARROW",
            "NSEC3PARAM",
            "PRESIGNED",
            "SOA-EDIT",
            "SOA-EDIT-API",
        ] {
            assert!(is_reserved_metadata_kind(kind), "{kind} should be reserved");
        }
    }

    #[test]
    fn test_ordinary_kinds_are_not_reserved() {
        assert!(!is_reserved_metadata_kind("ALLOW-AXFR-FROM"));
        assert!(!is_reserved_metadata_kind("AXFR-SOURCE"));
        assert!(!is_reserved_metadata_kind("soa-edit"));
    }

    // =====================================================
    // NSEC3 Parameter Tests
    // =====================================================

    #[test]
    fn test_nsec3_param_string() {
        let params = Nsec3Params::new(5, "ab", false);
        assert_eq!(params.param_string(), "1 0 5 ab");
    }

    #[test]
    fn test_nsec3_param_string_empty_salt() {
        let params = Nsec3Params::new(1, "", true);
        assert_eq!(params.param_string(), "1 0 1 -");
    }

    #[test]
    fn test_nsec3_parse_round_trip() {
        let params = Nsec3Params::new(5, "ab", false);
        let parsed = Nsec3Params::parse(&params.param_string(), false).unwrap();
        assert_eq!(parsed, params);
    }

    #[test]
    fn test_nsec3_parse_dash_salt_is_empty() {
        let parsed = Nsec3Params::parse("1 0 10 -", false).unwrap();
        assert_eq!(parsed.salt, "");
        assert_eq!(parsed.iterations, 10);
    }

    #[test]
    fn test_nsec3_parse_retains_foreign_algorithm() {
        // A live value with algorithm 2 must parse so the convergence logic
        // can see the mismatch and reset it.
        let parsed = Nsec3Params::parse("2 0 5 ab", false).unwrap();
        assert_eq!(parsed.algorithm, 2);
        assert_ne!(parsed, Nsec3Params::new(5, "ab", false));
    }

    #[test]
    fn test_nsec3_parse_narrow_passthrough() {
        let parsed = Nsec3Params::parse("1 0 5 ab", true).unwrap();
        assert!(parsed.narrow);
    }

    #[test]
    fn test_nsec3_parse_rejects_wrong_token_count() {
        assert!(Nsec3Params::parse("1 0 5", false).is_none());
        assert!(Nsec3Params::parse("1 0 5 ab cd", false).is_none());
        assert!(Nsec3Params::parse("", false).is_none());
    }

    #[test]
    fn test_nsec3_parse_rejects_non_numeric_fields() {
        assert!(Nsec3Params::parse("x 0 5 ab", false).is_none());
        assert!(Nsec3Params::parse("1 0 lots ab", false).is_none());
    }

    // =====================================================
    // Record Entry Tests
    // =====================================================

    #[test]
    fn test_record_entry_content_item() {
        let entry: RecordEntry = serde_yaml::from_str("c: 192.0.2.1\nr: true").unwrap();
        assert_eq!(entry.content.as_deref(), Some("192.0.2.1"));
        assert_eq!(entry.ptr_sync, Some(true));
        assert_eq!(entry.ttl, None);
    }

    #[test]
    fn test_record_entry_ttl_item() {
        let entry: RecordEntry = serde_yaml::from_str("t: 300").unwrap();
        assert_eq!(entry.ttl, Some(300));
        assert_eq!(entry.content, None);
    }

    #[test]
    fn test_record_entry_rejects_unknown_keys() {
        let result: Result<RecordEntry, _> = serde_yaml::from_str("c: 192.0.2.1\nttl: 300");
        assert!(result.is_err());
    }

    // =====================================================
    // Zone Spec Tests
    // =====================================================

    fn primary_spec(name: &str, kind: PrimaryKind) -> ZoneSpec {
        ZoneSpec {
            name: name.to_string(),
            role: ZoneRole::Primary(PrimaryZone {
                kind,
                soa_edit: "INCEPTION-INCREMENT".to_string(),
                soa_edit_api: "INCEPTION-INCREMENT".to_string(),
                dnssec: false,
                presigned: false,
                api_rectify: false,
                nsec3: None,
                default_ttl: 3600,
                records: None,
            }),
            metadata: MetadataMap::new(),
        }
    }

    #[test]
    fn test_zone_spec_canonical_name() {
        let spec = primary_spec("example.com", PrimaryKind::Master);
        assert_eq!(spec.canonical_name(), "example.com.");
    }

    #[test]
    fn test_zone_spec_kind_str() {
        assert_eq!(
            primary_spec("a.test", PrimaryKind::Master).kind_str(),
            "Master"
        );
        assert_eq!(
            primary_spec("a.test", PrimaryKind::Native).kind_str(),
            "Native"
        );
        let slave = ZoneSpec {
            name: "a.test".to_string(),
            role: ZoneRole::Secondary(SecondaryZone {
                masters: vec!["192.0.2.53".to_string()],
            }),
            metadata: MetadataMap::new(),
        };
        assert_eq!(slave.kind_str(), "Slave");
    }

    #[test]
    fn test_zone_spec_primary_accessor() {
        assert!(primary_spec("a.test", PrimaryKind::Master).primary().is_some());
        let slave = ZoneSpec {
            name: "a.test".to_string(),
            role: ZoneRole::Secondary(SecondaryZone {
                masters: vec!["192.0.2.53".to_string()],
            }),
            metadata: MetadataMap::new(),
        };
        assert!(slave.primary().is_none());
    }
}
