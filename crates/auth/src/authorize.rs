use crate::permissions::Requirement;
use crate::principal::Principal;

/// Evaluate a declared requirement against a decoded principal.
///
/// - No IO
/// - No panics
/// - Pure: same inputs, same decision
///
/// True iff **every** `{resource, action}` pair in the requirement is present
/// in the principal's permission snapshot. A principal without a role carries
/// an empty snapshot and is denied anything with at least one pair
/// (fail-closed).
pub fn authorize(principal: &Principal, requirement: &Requirement) -> bool {
    requirement
        .pairs()
        .iter()
        .all(|p| principal.permissions.allows(&p.resource, &p.action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::{PermissionMap, RequiredPermission};
    use proptest::prelude::*;
    use taskforge_core::UserId;

    fn principal_with(permissions: PermissionMap) -> Principal {
        Principal {
            id: UserId::new(),
            email: "p@x.com".to_string(),
            role: Some("tester".to_string()),
            permissions,
        }
    }

    #[test]
    fn single_pair_allowed_when_granted() {
        let p = principal_with(PermissionMap::new().with("projects", &["read"]));
        assert!(authorize(&p, &Requirement::single("projects", "read")));
    }

    #[test]
    fn single_pair_denied_when_action_missing() {
        let p = principal_with(PermissionMap::new().with("projects", &["read"]));
        assert!(!authorize(&p, &Requirement::single("projects", "create")));
    }

    #[test]
    fn multiple_pairs_are_and_combined() {
        let requirement = Requirement::all([
            RequiredPermission::new("a", "read"),
            RequiredPermission::new("b", "write"),
        ]);

        // Only (a, read) granted: denied.
        let partial = principal_with(PermissionMap::new().with("a", &["read"]));
        assert!(!authorize(&partial, &requirement));

        // Both granted: allowed.
        let full = principal_with(
            PermissionMap::new().with("a", &["read"]).with("b", &["write"]),
        );
        assert!(authorize(&full, &requirement));
    }

    #[test]
    fn missing_role_snapshot_denies() {
        let p = Principal {
            id: UserId::new(),
            email: "p@x.com".to_string(),
            role: None,
            permissions: PermissionMap::new(),
        };
        assert!(!authorize(&p, &Requirement::single("projects", "read")));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let p = principal_with(PermissionMap::new().with("tasks", &["read", "update"]));
        let req = Requirement::single("tasks", "update");
        for _ in 0..10 {
            assert!(authorize(&p, &req));
        }
    }

    proptest! {
        /// Every pair taken from the granted map must be allowed.
        #[test]
        fn granted_pairs_are_always_allowed(
            grants in prop::collection::btree_map(
                "[a-z]{1,8}",
                prop::collection::btree_set("[a-z]{1,8}", 1..4),
                1..5,
            )
        ) {
            let mut map = PermissionMap::new();
            for (resource, actions) in &grants {
                for action in actions {
                    map.grant(resource.clone(), action.clone());
                }
            }
            let p = principal_with(map);

            for (resource, actions) in &grants {
                for action in actions {
                    prop_assert!(authorize(
                        &p,
                        &Requirement::single(resource.clone(), action.clone()),
                    ));
                }
            }
        }

        /// A requirement naming a resource the principal was never granted is
        /// always denied, whatever else the snapshot contains.
        #[test]
        fn ungranted_resources_are_always_denied(
            grants in prop::collection::btree_map(
                "[a-z]{1,8}",
                prop::collection::btree_set("[a-z]{1,8}", 1..4),
                0..5,
            ),
            action in "[a-z]{1,8}",
        ) {
            let mut map = PermissionMap::new();
            for (resource, actions) in &grants {
                for a in actions {
                    map.grant(resource.clone(), a.clone());
                }
            }
            let p = principal_with(map);

            // A resource name outside the generated alphabet length.
            let unknown = "missing-resource";
            prop_assert!(!grants.contains_key(unknown));
            prop_assert!(!authorize(&p, &Requirement::single(unknown, action)));
        }
    }
}
