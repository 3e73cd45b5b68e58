// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for DNSSEC/NSEC3 transition planning.

#[cfg(test)]
mod tests {
    use crate::model::{Nsec3Params, PrimaryKind, PrimaryZone};
    use crate::pdns::types::DnssecState;
    use crate::plan::Action;
    use crate::reconcilers::dnssec::plan;

    // =====================================================
    // Helper Functions
    // =====================================================

    fn primary(dnssec: bool, nsec3: Option<Nsec3Params>) -> PrimaryZone {
        PrimaryZone {
            kind: PrimaryKind::Master,
            soa_edit: "INCEPTION-INCREMENT".to_string(),
            soa_edit_api: "INCEPTION-INCREMENT".to_string(),
            dnssec,
            presigned: false,
            api_rectify: false,
            nsec3,
            default_ttl: 3600,
            records: None,
        }
    }

    fn secured_with(nsec3: Option<Nsec3Params>) -> DnssecState {
        DnssecState {
            secured: true,
            nsec3,
        }
    }

    fn labels(actions: &[Action]) -> Vec<&'static str> {
        actions.iter().map(Action::label).collect()
    }

    // =====================================================
    // Unsigned Desired State
    // =====================================================

    #[test]
    fn test_unsigned_unsecured_plans_nothing() {
        let actions = plan(
            "example.com",
            &primary(false, None),
            &DnssecState::unsecured(),
        );
        assert!(actions.is_empty());
    }

    #[test]
    fn test_disable_issues_exactly_one_action() {
        // Secured with NSEC3 live, desired unsigned: one disable, and no
        // NSEC3 or rectify action in the same run.
        let actions = plan(
            "example.com",
            &primary(false, Some(Nsec3Params::new(5, "ab", false))),
            &secured_with(Some(Nsec3Params::new(5, "ab", false))),
        );
        assert_eq!(labels(&actions), vec!["disable_dnssec"]);
    }

    // =====================================================
    // Signed Desired State
    // =====================================================

    #[test]
    fn test_secure_then_nsec3_then_rectify_for_fresh_zone() {
        let actions = plan(
            "example.com",
            &primary(true, Some(Nsec3Params::new(5, "ab", false))),
            &DnssecState::unsecured(),
        );
        assert_eq!(labels(&actions), vec!["secure_zone", "set_nsec3", "rectify_zone"]);
    }

    #[test]
    fn test_secure_only_for_nsec_only_zone() {
        let actions = plan(
            "example.com",
            &primary(true, None),
            &DnssecState::unsecured(),
        );
        assert_eq!(labels(&actions), vec!["secure_zone"]);
    }

    #[test]
    fn test_converged_zone_plans_nothing() {
        let params = Nsec3Params::new(5, "ab", false);
        let actions = plan(
            "example.com",
            &primary(true, Some(params.clone())),
            &secured_with(Some(params)),
        );
        assert!(actions.is_empty());
    }

    #[test]
    fn test_converged_nsec_only_zone_plans_nothing() {
        let actions = plan("example.com", &primary(true, None), &secured_with(None));
        assert!(actions.is_empty());
    }

    #[test]
    fn test_nsec_only_desired_leaves_live_nsec3_alone() {
        // No unset operation exists; a zone without a declared NSEC3 block
        // keeps whatever the server has.
        let actions = plan(
            "example.com",
            &primary(true, None),
            &secured_with(Some(Nsec3Params::new(5, "ab", false))),
        );
        assert!(actions.is_empty());
    }

    // =====================================================
    // NSEC3 Parameter Drift
    // =====================================================

    #[test]
    fn test_missing_live_nsec3_plans_set_and_rectify() {
        let actions = plan(
            "example.com",
            &primary(true, Some(Nsec3Params::new(5, "ab", false))),
            &secured_with(None),
        );
        assert_eq!(labels(&actions), vec!["set_nsec3", "rectify_zone"]);
    }

    #[test]
    fn test_iterations_drift_plans_set_and_rectify() {
        let actions = plan(
            "example.com",
            &primary(true, Some(Nsec3Params::new(10, "ab", false))),
            &secured_with(Some(Nsec3Params::new(5, "ab", false))),
        );
        assert_eq!(labels(&actions), vec!["set_nsec3", "rectify_zone"]);
        match &actions[0] {
            Action::SetNsec3 { params, .. } => assert_eq!(params.iterations, 10),
            other => panic!("expected SetNsec3, got {other:?}"),
        }
    }

    #[test]
    fn test_salt_drift_plans_set_and_rectify() {
        let actions = plan(
            "example.com",
            &primary(true, Some(Nsec3Params::new(5, "cd", false))),
            &secured_with(Some(Nsec3Params::new(5, "ab", false))),
        );
        assert_eq!(labels(&actions), vec!["set_nsec3", "rectify_zone"]);
    }

    #[test]
    fn test_narrow_drift_plans_set_and_rectify() {
        let actions = plan(
            "example.com",
            &primary(true, Some(Nsec3Params::new(5, "ab", true))),
            &secured_with(Some(Nsec3Params::new(5, "ab", false))),
        );
        assert_eq!(labels(&actions), vec!["set_nsec3", "rectify_zone"]);
    }

    #[test]
    fn test_foreign_algorithm_plans_set_and_rectify() {
        let mut live_params = Nsec3Params::new(5, "ab", false);
        live_params.algorithm = 2;
        let actions = plan(
            "example.com",
            &primary(true, Some(Nsec3Params::new(5, "ab", false))),
            &secured_with(Some(live_params)),
        );
        assert_eq!(labels(&actions), vec!["set_nsec3", "rectify_zone"]);
    }
}
