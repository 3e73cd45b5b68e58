// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for metadata diff planning.

#[cfg(test)]
mod tests {
    use crate::model::MetadataMap;
    use crate::plan::Action;
    use crate::reconcilers::metadata::plan;

    // =====================================================
    // Helper Functions
    // =====================================================

    fn map(entries: &[(&str, &[&str])]) -> MetadataMap {
        entries
            .iter()
            .map(|(kind, values)| {
                (
                    (*kind).to_string(),
                    values.iter().map(|v| (*v).to_string()).collect(),
                )
            })
            .collect()
    }

    // =====================================================
    // Upsert Planning
    // =====================================================

    #[test]
    fn test_equal_maps_plan_nothing() {
        let desired = map(&[("ALLOW-AXFR-FROM", &["AUTO-NS"])]);
        let live = map(&[("ALLOW-AXFR-FROM", &["AUTO-NS"])]);
        assert!(plan("example.com", &desired, &live).is_empty());
    }

    #[test]
    fn test_missing_live_key_is_upserted() {
        let desired = map(&[("ALLOW-AXFR-FROM", &["AUTO-NS"])]);
        let live = MetadataMap::new();

        let actions = plan("example.com", &desired, &live);
        assert_eq!(actions.len(), 1);
        match &actions[0] {
            Action::UpsertMetadata { zone, kind, values } => {
                assert_eq!(zone, "example.com");
                assert_eq!(kind, "ALLOW-AXFR-FROM");
                assert_eq!(values, &vec!["AUTO-NS"]);
            }
            other => panic!("expected UpsertMetadata, got {other:?}"),
        }
    }

    #[test]
    fn test_differing_values_are_upserted() {
        let desired = map(&[("ALLOW-AXFR-FROM", &["192.0.2.0/24"])]);
        let live = map(&[("ALLOW-AXFR-FROM", &["AUTO-NS"])]);

        let actions = plan("example.com", &desired, &live);
        assert_eq!(actions.len(), 1);
        assert!(matches!(actions[0], Action::UpsertMetadata { .. }));
    }

    #[test]
    fn test_value_order_is_significant() {
        let desired = map(&[("ALLOW-AXFR-FROM", &["192.0.2.1", "192.0.2.2"])]);
        let live = map(&[("ALLOW-AXFR-FROM", &["192.0.2.2", "192.0.2.1"])]);
        assert_eq!(plan("example.com", &desired, &live).len(), 1);
    }

    // =====================================================
    // Delete Planning
    // =====================================================

    #[test]
    fn test_unknown_live_key_is_deleted() {
        let desired = MetadataMap::new();
        let live = map(&[("AXFR-SOURCE", &["192.0.2.7"])]);

        let actions = plan("example.com", &desired, &live);
        assert_eq!(actions.len(), 1);
        match &actions[0] {
            Action::DeleteMetadata { kind, .. } => assert_eq!(kind, "AXFR-SOURCE"),
            other => panic!("expected DeleteMetadata, got {other:?}"),
        }
    }

    #[test]
    fn test_reserved_live_keys_are_never_deleted() {
        let desired = MetadataMap::new();
        let live = map(&[
            ("API-RECTIFY", &["1"]),
            ("NSEC3NARROW", &["1"]),
            ("NSEC3PARAM", &["1 0 5 ab"]),
            ("PRESIGNED", &["1"]),
            ("SOA-EDIT", &["INCEPTION-INCREMENT"]),
            ("SOA-EDIT-API", &["DEFAULT"]),
        ]);
        assert!(plan("example.com", &desired, &live).is_empty());
    }

    #[test]
    fn test_mixed_upsert_and_delete() {
        let desired = map(&[("ALLOW-AXFR-FROM", &["AUTO-NS"])]);
        let live = map(&[
            ("AXFR-SOURCE", &["192.0.2.7"]),
            ("SOA-EDIT", &["INCEPTION-INCREMENT"]),
        ]);

        let actions = plan("example.com", &desired, &live);
        let labels: Vec<&str> = actions.iter().map(Action::label).collect();
        assert_eq!(labels, vec!["upsert_metadata", "delete_metadata"]);
    }

    #[test]
    fn test_empty_desired_against_reserved_only_live_plans_nothing() {
        let live = map(&[("SOA-EDIT", &["INCEPTION-INCREMENT"])]);
        assert!(plan("example.com", &MetadataMap::new(), &live).is_empty());
    }
}
