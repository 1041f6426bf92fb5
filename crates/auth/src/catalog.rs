//! Role/permission configuration.
//!
//! Roles are administered elsewhere and handed to this crate fully loaded. The
//! catalogue is that hand-off point: it is built from serialized definitions,
//! and `resolve` turns a user's role ids into shared `Arc<Role>` handles.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use backoffice_core::{Entity, RoleId};

use crate::{Permission, Role};

/// Serialized role definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleDefinition {
    pub id: RoleId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Serialized catalogue: descriptive permission entries plus role definitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDefinition {
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub roles: Vec<RoleDefinition>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid role catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown role: {0}")]
    UnknownRole(RoleId),

    #[error("duplicate role: {0}")]
    DuplicateRole(RoleId),
}

/// All configured roles, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct RoleCatalog {
    roles: BTreeMap<RoleId, Arc<Role>>,
}

impl RoleCatalog {
    pub fn from_definition(definition: CatalogDefinition) -> Result<Self, CatalogError> {
        // Codes listed in `permissions` pick up their descriptive attributes;
        // unlisted codes become bare permissions.
        let described: HashMap<String, Permission> = definition
            .permissions
            .into_iter()
            .map(|p| (p.code().to_string(), p))
            .collect();

        let mut roles = BTreeMap::new();
        for def in definition.roles {
            let permissions = def.permissions.into_iter().map(|code| match described.get(&code) {
                Some(p) => p.clone(),
                None => Permission::new(code),
            });

            let mut role = Role::new(def.id, def.name).with_permissions(permissions);
            if let Some(description) = def.description {
                role = role.with_description(description);
            }
            role.set_disabled(def.disabled);

            if roles.insert(def.id, Arc::new(role)).is_some() {
                return Err(CatalogError::DuplicateRole(def.id));
            }
        }

        tracing::debug!(roles = roles.len(), "role catalog loaded");
        Ok(Self { roles })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::from_definition(serde_json::from_str(json)?)
    }

    /// Read a JSON catalogue from disk.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading role catalog {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("parsing role catalog {}", path.display()))
    }

    pub fn insert(&mut self, role: Role) -> Result<(), CatalogError> {
        let id = *role.id();
        if self.roles.contains_key(&id) {
            return Err(CatalogError::DuplicateRole(id));
        }
        self.roles.insert(id, Arc::new(role));
        Ok(())
    }

    pub fn get(&self, id: &RoleId) -> Option<&Arc<Role>> {
        self.roles.get(id)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn roles(&self) -> impl Iterator<Item = &Arc<Role>> {
        self.roles.values()
    }

    /// Resolve role ids to shared role handles, failing on the first unknown id.
    pub fn resolve(&self, ids: &[RoleId]) -> Result<Vec<Arc<Role>>, CatalogError> {
        ids.iter()
            .map(|id| self.roles.get(id).cloned().ok_or(CatalogError::UnknownRole(*id)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: &str = "0190a3c2-0000-7000-8000-000000000001";
    const TELLER: &str = "0190a3c2-0000-7000-8000-000000000002";

    fn catalog_json() -> String {
        format!(
            r#"{{
                "permissions": [
                    {{ "code": "APPROVE_LOAN", "grouping": "portfolio", "entity_name": "LOAN",
                       "action_name": "APPROVE", "can_maker_checker": true }}
                ],
                "roles": [
                    {{ "id": "{ADMIN}", "name": "Super user", "permissions": ["ALL_FUNCTIONS"] }},
                    {{ "id": "{TELLER}", "name": "Teller", "description": "front desk",
                       "permissions": ["REPAYMENT_LOAN", "APPROVE_LOAN"] }}
                ]
            }}"#
        )
    }

    #[test]
    fn loads_roles_and_descriptive_permissions() {
        let catalog = RoleCatalog::from_json(&catalog_json()).unwrap();
        assert_eq!(catalog.len(), 2);

        let teller = catalog.get(&TELLER.parse().unwrap()).unwrap();
        assert_eq!(teller.name(), "Teller");
        assert_eq!(teller.description(), Some("front desk"));
        assert!(teller.has_permission_to("REPAYMENT_LOAN"));

        let approve = teller.permissions().find(|p| p.has_code("APPROVE_LOAN")).unwrap();
        assert!(approve.can_maker_checker());
        assert_eq!(approve.grouping(), Some("portfolio"));
    }

    #[test]
    fn resolve_returns_shared_handles() {
        let catalog = RoleCatalog::from_json(&catalog_json()).unwrap();
        let admin: RoleId = ADMIN.parse().unwrap();

        let first = catalog.resolve(&[admin]).unwrap();
        let second = catalog.resolve(&[admin]).unwrap();
        assert!(Arc::ptr_eq(&first[0], &second[0]));
    }

    #[test]
    fn resolve_fails_on_unknown_role() {
        let catalog = RoleCatalog::from_json(&catalog_json()).unwrap();
        let missing = RoleId::new();
        let err = catalog.resolve(&[ADMIN.parse().unwrap(), missing]).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownRole(id) if id == missing));
    }

    #[test]
    fn duplicate_role_ids_are_rejected() {
        let json = format!(
            r#"{{ "roles": [ {{ "id": "{ADMIN}", "name": "a" }}, {{ "id": "{ADMIN}", "name": "b" }} ] }}"#
        );
        assert!(matches!(RoleCatalog::from_json(&json), Err(CatalogError::DuplicateRole(_))));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(RoleCatalog::from_json("{ nope"), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = RoleCatalog::load("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("reading role catalog"));
    }
}
