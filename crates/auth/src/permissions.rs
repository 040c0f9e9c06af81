use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A role's permission grants: resource name → set of allowed action names.
///
/// Action names are an open vocabulary (conventionally `create`, `read`,
/// `update`, `delete`). The mapping is always present: a role with no grants
/// holds an empty map, never an absent one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMap(BTreeMap<String, BTreeSet<String>>);

impl PermissionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a single action on a resource.
    pub fn grant(&mut self, resource: impl Into<String>, action: impl Into<String>) {
        self.0.entry(resource.into()).or_default().insert(action.into());
    }

    /// Builder-style grant of several actions on one resource.
    pub fn with(mut self, resource: &str, actions: &[&str]) -> Self {
        for action in actions {
            self.grant(resource, *action);
        }
        self
    }

    /// Whether `action` is allowed on `resource`.
    ///
    /// A resource that was never granted yields false (fail-closed), as does
    /// an action missing from the resource's set.
    pub fn allows(&self, resource: &str, action: &str) -> bool {
        self.0
            .get(resource)
            .is_some_and(|actions| actions.contains(action))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// One `{resource, action}` pair demanded by a protected operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredPermission {
    pub resource: String,
    pub action: String,
}

impl RequiredPermission {
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }
}

/// The full requirement declared for a protected operation.
///
/// Pairs are AND-combined: every pair must be satisfied for the operation to
/// be allowed. There is no any-of construct. Requirements are declared once
/// at startup and never mutated afterwards; declare at least one pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement(Vec<RequiredPermission>);

impl Requirement {
    /// Requirement of a single `{resource, action}` pair.
    pub fn single(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self(vec![RequiredPermission::new(resource, action)])
    }

    /// Requirement of several pairs, all of which must hold.
    pub fn all(pairs: impl IntoIterator<Item = RequiredPermission>) -> Self {
        Self(pairs.into_iter().collect())
    }

    pub fn pairs(&self) -> &[RequiredPermission] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
