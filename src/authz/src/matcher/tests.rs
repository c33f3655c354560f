//! Test suite for the permission matcher
//!
//! Covers exact matches, wildcard positions, malformed input and the
//! any/all asymmetry on empty requirement lists.

use super::*;
use proptest::prelude::*;

// ============================================================================
// Permission Parsing
// ============================================================================

#[test]
fn test_permission_parsing() {
    let permission = Permission::parse("rbac:group:read").unwrap();
    assert_eq!(permission.application(), "rbac");
    assert_eq!(permission.resource_type(), "group");
    assert_eq!(permission.action(), "read");
    assert!(!permission.has_wildcards());
    assert_eq!(permission.to_string(), "rbac:group:read");

    assert!(Permission::parse("rbac:*:read").unwrap().has_wildcards());
}

#[test]
fn test_permission_component_count_errors() {
    assert_eq!(
        Permission::parse("rbac:group"),
        Err(PermissionParseError::ComponentCount {
            raw: "rbac:group".to_string(),
            found: 2,
        })
    );

    assert!(matches!(
        Permission::parse("rbac:group:read:extra"),
        Err(PermissionParseError::ComponentCount { found: 4, .. })
    ));

    assert!(matches!(
        Permission::parse(""),
        Err(PermissionParseError::ComponentCount { found: 1, .. })
    ));
}

// ============================================================================
// matches
// ============================================================================

#[test]
fn test_full_wildcard_grant() {
    assert!(matches("rbac:*:*", "rbac:role:read"));
}

#[test]
fn test_action_mismatch() {
    assert!(!matches("rbac:group:read", "rbac:group:write"));
}

#[test]
fn test_exact_match() {
    assert!(matches("rbac:group:read", "rbac:group:read"));
}

#[test]
fn test_single_position_wildcards() {
    assert!(matches("rbac:*:read", "rbac:principal:read"));
    assert!(!matches("rbac:*:read", "rbac:principal:write"));

    assert!(matches("rbac:group:*", "rbac:group:write"));
    assert!(!matches("rbac:group:*", "rbac:role:write"));
}

#[test]
fn test_application_is_never_wildcarded() {
    assert!(!matches("*:*:*", "rbac:group:read"));
    assert!(!matches("inventory:*:*", "rbac:group:read"));
}

#[test]
fn test_wildcard_only_on_granted_side() {
    // A wildcard in the requirement is a literal, not a pattern
    assert!(!matches("rbac:group:read", "rbac:*:read"));
    assert!(matches("rbac:*:read", "rbac:*:read"));
}

#[test]
fn test_wildcard_must_be_whole_component() {
    assert!(!matches("rbac:gr*:read", "rbac:group:read"));
}

#[test]
fn test_malformed_strings_never_match() {
    assert!(!matches("rbac:group", "rbac:group:read"));
    assert!(!matches("rbac:group:read", "rbac:group"));
    assert!(!matches("rbac:*:*:*", "rbac:group:read"));
    assert!(!matches("rbac:group", "rbac:groups"));
    assert!(!matches("", "rbac:group:read"));
}

#[test]
fn test_byte_equal_strings_match_without_parsing() {
    assert!(matches("rbac:group:read", "rbac:group:read"));
    assert!(matches("rbac:group", "rbac:group"));
    assert!(matches("", ""));

    // A literal `*` on the required side only matches itself
    assert!(matches("rbac:*:*", "rbac:*:*"));
    assert!(!matches("rbac:group:read", "rbac:*:*"));
}

#[test]
fn test_comparison_is_case_sensitive() {
    assert!(!matches("RBAC:group:read", "rbac:group:read"));
    assert!(!matches("rbac:Group:read", "rbac:group:read"));
}

// ============================================================================
// evaluate_any / evaluate_all
// ============================================================================

#[test]
fn test_empty_required_list_asymmetry() {
    let granted = ["rbac:*:*"];
    let required: [&str; 0] = [];

    assert!(evaluate_all(&required, &granted));
    assert!(!evaluate_any(&required, &granted));
}

#[test]
fn test_empty_granted_list() {
    let granted: [&str; 0] = [];

    assert!(!evaluate_any(&["rbac:group:read"], &granted));
    assert!(!evaluate_all(&["rbac:group:read"], &granted));
}

#[test]
fn test_evaluate_any() {
    let granted = vec!["rbac:group:read".to_string(), "cost-management:*:*".to_string()];

    assert!(evaluate_any(&["rbac:role:read", "rbac:group:read"], &granted));
    assert!(evaluate_any(&["cost-management:report:read"], &granted));
    assert!(!evaluate_any(&["rbac:role:read", "rbac:group:write"], &granted));
}

#[test]
fn test_evaluate_all() {
    let granted = ["rbac:group:*", "rbac:role:read"];

    assert!(evaluate_all(&["rbac:group:write", "rbac:role:read"], &granted));
    assert!(!evaluate_all(&["rbac:group:write", "rbac:role:write"], &granted));
}

#[test]
fn test_malformed_entries_are_skipped_not_fatal() {
    let granted = ["broken", "rbac:group:read"];

    assert!(evaluate_all(&["rbac:group:read"], &granted));
    assert!(!evaluate_all(&["rbac:group:read", "broken:hosts"], &granted));
    assert!(evaluate_any(&["broken:hosts", "rbac:group:read"], &granted));
    assert!(!evaluate_any(&["broken:hosts"], &["broken:*"]));
}

// ============================================================================
// Properties
// ============================================================================

fn component() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,11}"
}

proptest! {
    #[test]
    fn prop_full_wildcard_matches_any_same_app(
        app in component(),
        resource_type in component(),
        action in component(),
    ) {
        let granted = format!("{}:*:*", app);
        let required = format!("{}:{}:{}", app, resource_type, action);
        prop_assert!(matches(&granted, &required));
    }

    #[test]
    fn prop_different_application_never_matches(
        granted_app in component(),
        required_app in component(),
        resource_type in component(),
        action in component(),
        wildcard_type in any::<bool>(),
        wildcard_action in any::<bool>(),
    ) {
        prop_assume!(granted_app != required_app);

        let granted = format!(
            "{}:{}:{}",
            granted_app,
            if wildcard_type { WILDCARD } else { resource_type.as_str() },
            if wildcard_action { WILDCARD } else { action.as_str() },
        );
        let required = format!("{}:{}:{}", required_app, resource_type, action);
        prop_assert!(!matches(&granted, &required));
    }

    #[test]
    fn prop_wrong_component_count_never_matches(
        components in prop::collection::vec(component(), 1..6),
    ) {
        prop_assume!(components.len() != COMPONENT_COUNT);

        let raw = components.join(":");
        prop_assert!(!matches("rbac:*:*", &raw));
        prop_assert!(!matches(&raw, "rbac:group:read"));
    }
}
