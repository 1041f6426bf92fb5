use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use backoffice_core::{Entity, RoleId};

use crate::Permission;

/// Named bundle of permissions assignable to users.
///
/// Roles are loaded eagerly by whoever owns persistence and then shared by
/// reference (`Arc<Role>`) between the users holding them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    permissions: HashSet<Permission>,
}

impl Role {
    pub fn new(id: RoleId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            disabled: false,
            permissions: HashSet::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions.extend(permissions);
        self
    }

    /// Convenience for role fixtures built from bare codes.
    pub fn with_codes<I, S>(self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_permissions(codes.into_iter().map(|c| Permission::new(Into::<String>::into(c))))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Informational only: a disabled role still answers membership checks.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn permissions(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }

    /// Permission codes granted by this role, sorted.
    pub fn permission_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.permissions.iter().map(Permission::code).collect();
        codes.sort_unstable();
        codes
    }

    /// True iff this role grants exactly `code`.
    pub fn has_permission_to(&self, code: &str) -> bool {
        self.permissions.contains(code)
    }

    /// Replace the granted permission set wholesale.
    pub fn update_permissions(&mut self, permissions: impl IntoIterator<Item = Permission>) {
        self.permissions = permissions.into_iter().collect();
    }
}

impl Entity for Role {
    type Id = RoleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_role_grants_nothing() {
        let role = Role::new(RoleId::new(), "Nobody");
        assert!(!role.has_permission_to("READ_CLIENT"));
        assert!(role.permission_codes().is_empty());
    }

    #[test]
    fn membership_is_exact() {
        let role = Role::new(RoleId::new(), "Teller").with_codes(["REPAYMENT_LOAN", "READ_CLIENT"]);
        assert!(role.has_permission_to("REPAYMENT_LOAN"));
        assert!(!role.has_permission_to("repayment_loan"));
        assert!(!role.has_permission_to("ALL_FUNCTIONS"));
    }

    #[test]
    fn duplicate_codes_collapse() {
        let role = Role::new(RoleId::new(), "Dup")
            .with_codes(["READ_CLIENT", "READ_CLIENT"])
            .with_permissions([Permission::new("READ_CLIENT").with_grouping("portfolio")]);
        assert_eq!(role.permission_codes(), vec!["READ_CLIENT"]);
    }

    #[test]
    fn update_permissions_replaces_set() {
        let mut role = Role::new(RoleId::new(), "Clerk").with_codes(["READ_CLIENT"]);
        role.update_permissions([Permission::new("READ_LOAN")]);
        assert!(!role.has_permission_to("READ_CLIENT"));
        assert_eq!(role.permission_codes(), vec!["READ_LOAN"]);
    }

    #[test]
    fn disabled_role_still_answers_membership() {
        let mut role = Role::new(RoleId::new(), "Old").with_codes(["READ_CLIENT"]);
        role.set_disabled(true);
        assert!(role.is_disabled());
        assert!(role.has_permission_to("READ_CLIENT"));
    }

    #[test]
    fn identity_via_entity() {
        let id = RoleId::new();
        let role = Role::new(id, "Admin");
        assert!(role.has_id_of(&id));
        assert!(!role.has_id_of(&RoleId::new()));
    }
}
