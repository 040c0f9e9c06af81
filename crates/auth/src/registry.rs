//! Static mapping from protected operations to their permission requirements.
//!
//! Declared once at startup, looked up by the routing shim before each
//! handler runs. Replaces the metadata/reflection-driven declaration style
//! with an explicit table.

use std::collections::HashMap;

use crate::permissions::Requirement;

/// Derive the operation's group from its identifier.
///
/// Operation identifiers follow `"<group>.<name>"` ("users.create",
/// "projects.read"); the group is the segment before the first dot.
fn group_of(operation: &str) -> &str {
    operation.split('.').next().unwrap_or(operation)
}

/// Registry of declared permission requirements.
///
/// Requirements exist at two granularities: a default covering every
/// operation in a group, and a per-operation entry. An operation entry
/// **entirely replaces** the group default; the two are never merged.
///
/// An operation with no entry at either level is unguarded: authenticated
/// principals may call it. That fail-open default mirrors the observed
/// behavior of the system this replaces; a stricter deployment would
/// register a default for every group.
#[derive(Debug, Default)]
pub struct RequirementRegistry {
    group_defaults: HashMap<String, Requirement>,
    operations: HashMap<String, Requirement>,
}

impl RequirementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the default requirement for every operation in `group`.
    pub fn set_group_default(&mut self, group: impl Into<String>, requirement: Requirement) {
        debug_assert!(!requirement.is_empty(), "requirements must be non-empty");
        self.group_defaults.insert(group.into(), requirement);
    }

    /// Declare the requirement for one operation, overriding any group
    /// default.
    pub fn set_operation(&mut self, operation: impl Into<String>, requirement: Requirement) {
        debug_assert!(!requirement.is_empty(), "requirements must be non-empty");
        self.operations.insert(operation.into(), requirement);
    }

    /// Look up the requirement governing `operation`.
    ///
    /// Per-operation entries win outright; otherwise the group default
    /// applies; otherwise `None` (unguarded).
    pub fn requirement_for(&self, operation: &str) -> Option<&Requirement> {
        self.operations
            .get(operation)
            .or_else(|| self.group_defaults.get(group_of(operation)))
    }
}
