// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for the API wire types.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::model::{Nsec3Params, PrimaryKind};
    use crate::pdns::types::*;

    // =====================================================
    // Zone Kind Tests
    // =====================================================

    #[test]
    fn test_zone_kind_wire_names() {
        assert_eq!(serde_json::to_value(ZoneKind::Master).unwrap(), json!("Master"));
        assert_eq!(serde_json::to_value(ZoneKind::Slave).unwrap(), json!("Slave"));
        assert_eq!(serde_json::to_value(ZoneKind::Native).unwrap(), json!("Native"));
    }

    #[test]
    fn test_zone_kind_from_primary_kind() {
        assert_eq!(ZoneKind::from(PrimaryKind::Master), ZoneKind::Master);
        assert_eq!(ZoneKind::from(PrimaryKind::Native), ZoneKind::Native);
    }

    // =====================================================
    // Zone Attribute Tests
    // =====================================================

    #[test]
    fn test_zone_attributes_deserialize_from_api_response() {
        // The API returns far more fields than the attributes; they are
        // ignored.
        let attributes: ZoneAttributes = serde_json::from_value(json!({
            "id": "example.com.",
            "name": "example.com.",
            "kind": "Master",
            "serial": 2024010101u32,
            "soa_edit": "INCEPTION-INCREMENT",
            "soa_edit_api": "DEFAULT",
            "dnssec": true,
            "nsec3param": "1 0 5 ab",
            "nsec3narrow": false,
            "masters": [],
            "url": "/api/v1/servers/localhost/zones/example.com."
        }))
        .unwrap();

        assert_eq!(attributes.kind, ZoneKind::Master);
        assert_eq!(attributes.soa_edit_or_empty(), "INCEPTION-INCREMENT");
        assert_eq!(attributes.soa_edit_api_or_empty(), "DEFAULT");
        assert_eq!(attributes.dnssec, Some(true));
        assert_eq!(attributes.nsec3param_or_empty(), "1 0 5 ab");
        assert_eq!(attributes.masters.as_deref(), Some(&[][..]));
    }

    #[test]
    fn test_zone_attributes_slave_serializes_kind_and_masters_only() {
        let attributes = ZoneAttributes {
            kind: ZoneKind::Slave,
            masters: Some(vec!["192.0.2.53".to_string()]),
            soa_edit: None,
            soa_edit_api: None,
            dnssec: None,
            presigned: None,
            api_rectify: None,
            nsec3param: None,
            nsec3narrow: None,
        };

        assert_eq!(
            serde_json::to_value(&attributes).unwrap(),
            json!({ "kind": "Slave", "masters": ["192.0.2.53"] })
        );
    }

    #[test]
    fn test_zone_attributes_unset_helpers_collapse_to_empty() {
        let attributes: ZoneAttributes =
            serde_json::from_value(json!({ "kind": "Native" })).unwrap();
        assert_eq!(attributes.soa_edit_or_empty(), "");
        assert_eq!(attributes.soa_edit_api_or_empty(), "");
        assert_eq!(attributes.nsec3param_or_empty(), "");
    }

    // =====================================================
    // Record and RRset Tests
    // =====================================================

    #[test]
    fn test_api_record_serializes_without_unset_ptr_flag() {
        let record = ApiRecord::new("192.0.2.1");
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({ "content": "192.0.2.1", "disabled": false })
        );
    }

    #[test]
    fn test_api_record_serializes_ptr_flag() {
        let record = ApiRecord {
            content: "192.0.2.1".to_string(),
            disabled: false,
            set_ptr: Some(true),
        };
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({ "content": "192.0.2.1", "disabled": false, "set-ptr": true })
        );
    }

    #[test]
    fn test_api_rrset_deserialize_ignores_comments() {
        let rrset: ApiRrset = serde_json::from_value(json!({
            "name": "www.example.com.",
            "type": "A",
            "ttl": 300,
            "records": [{ "content": "192.0.2.1", "disabled": false }],
            "comments": [{ "content": "who set this", "account": "ops", "modified_at": 0 }]
        }))
        .unwrap();

        assert_eq!(rrset.name, "www.example.com.");
        assert_eq!(rrset.rtype, "A");
        assert_eq!(rrset.ttl, 300);
        assert_eq!(rrset.records.len(), 1);
    }

    // =====================================================
    // Patch Entry Tests
    // =====================================================

    #[test]
    fn test_change_type_wire_names() {
        assert_eq!(
            serde_json::to_value(ChangeType::Replace).unwrap(),
            json!("REPLACE")
        );
        assert_eq!(
            serde_json::to_value(ChangeType::Delete).unwrap(),
            json!("DELETE")
        );
    }

    #[test]
    fn test_delete_entry_carries_no_ttl_or_records() {
        let change = RrsetChange::delete("old.example.com.", "TXT");
        assert_eq!(
            serde_json::to_value(&change).unwrap(),
            json!({
                "name": "old.example.com.",
                "type": "TXT",
                "changetype": "DELETE"
            })
        );
    }

    #[test]
    fn test_replace_entry_serialization() {
        let change = RrsetChange {
            name: "www.example.com.".to_string(),
            rtype: "A".to_string(),
            changetype: ChangeType::Replace,
            ttl: Some(300),
            records: vec![ApiRecord::new("192.0.2.1")],
        };
        assert_eq!(
            serde_json::to_value(&change).unwrap(),
            json!({
                "name": "www.example.com.",
                "type": "A",
                "changetype": "REPLACE",
                "ttl": 300,
                "records": [{ "content": "192.0.2.1", "disabled": false }]
            })
        );
    }

    // =====================================================
    // Metadata and DNSSEC State Tests
    // =====================================================

    #[test]
    fn test_metadata_item_round_trip() {
        let item = MetadataItem {
            kind: "ALLOW-AXFR-FROM".to_string(),
            metadata: vec!["AUTO-NS".to_string()],
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({ "kind": "ALLOW-AXFR-FROM", "metadata": ["AUTO-NS"] })
        );
        assert_eq!(serde_json::from_value::<MetadataItem>(value).unwrap(), item);
    }

    #[test]
    fn test_dnssec_state_unsecured() {
        assert_eq!(
            DnssecState::unsecured(),
            DnssecState {
                secured: false,
                nsec3: None
            }
        );
    }

    // =====================================================
    // Zone Creation Request Tests
    // =====================================================

    #[test]
    fn test_create_zone_request_flattens_attributes() {
        let request = CreateZoneRequest {
            name: "example.com.".to_string(),
            attributes: ZoneAttributes {
                kind: ZoneKind::Master,
                masters: None,
                soa_edit: Some("INCEPTION-INCREMENT".to_string()),
                soa_edit_api: Some("INCEPTION-INCREMENT".to_string()),
                dnssec: Some(false),
                presigned: Some(false),
                api_rectify: Some(false),
                nsec3param: Some(String::new()),
                nsec3narrow: Some(false),
            },
            nameservers: vec!["ns.bootstrap.invalid.".to_string()],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["name"], "example.com.");
        assert_eq!(value["kind"], "Master");
        assert_eq!(value["soa_edit"], "INCEPTION-INCREMENT");
        assert_eq!(value["nameservers"], json!(["ns.bootstrap.invalid."]));
        assert!(value.get("masters").is_none());
    }

    #[test]
    fn test_nsec3_params_param_string_matches_live_metadata_form() {
        // The desired param string must compare equal to what the server
        // reports in NSEC3PARAM.
        let params = Nsec3Params::new(5, "ab", false);
        let live = Nsec3Params::parse("1 0 5 ab", false).unwrap();
        assert_eq!(params, live);
    }
}
