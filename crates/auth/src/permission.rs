use std::borrow::{Borrow, Cow};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use backoffice_core::ValueObject;

/// Permission identifier plus descriptive catalogue attributes.
///
/// Permissions are identified by an opaque code (e.g. `"CREATE_CURRENCY"`).
/// Equality, hashing and every authorization decision use the code alone; the
/// grouping/entity/action attributes are descriptive only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    code: Cow<'static, str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grouping: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entity_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    action_name: Option<String>,
    #[serde(default)]
    can_maker_checker: bool,
}

impl Permission {
    pub fn new(code: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            grouping: None,
            entity_name: None,
            action_name: None,
            can_maker_checker: false,
        }
    }

    pub fn with_grouping(mut self, grouping: impl Into<String>) -> Self {
        self.grouping = Some(grouping.into());
        self
    }

    pub fn with_action(mut self, action_name: impl Into<String>, entity_name: impl Into<String>) -> Self {
        self.action_name = Some(action_name.into());
        self.entity_name = Some(entity_name.into());
        self
    }

    pub fn with_maker_checker(mut self, enabled: bool) -> Self {
        self.can_maker_checker = enabled;
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Exact, case-sensitive code comparison.
    pub fn has_code(&self, code: &str) -> bool {
        self.code() == code
    }

    pub fn grouping(&self) -> Option<&str> {
        self.grouping.as_deref()
    }

    pub fn entity_name(&self) -> Option<&str> {
        self.entity_name.as_deref()
    }

    pub fn action_name(&self) -> Option<&str> {
        self.action_name.as_deref()
    }

    pub fn can_maker_checker(&self) -> bool {
        self.can_maker_checker
    }
}

impl PartialEq for Permission {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Permission {}

// Must hash exactly like `str` so `Borrow<str>` lookups stay consistent.
impl Hash for Permission {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code().hash(state);
    }
}

impl Borrow<str> for Permission {
    fn borrow(&self) -> &str {
        self.code()
    }
}

impl ValueObject for Permission {}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn has_code_is_exact_and_case_sensitive() {
        let p = Permission::new("CREATE_CURRENCY");
        assert!(p.has_code("CREATE_CURRENCY"));
        assert!(!p.has_code("create_currency"));
        assert!(!p.has_code("CREATE_CURRENCY "));
    }

    #[test]
    fn equality_ignores_descriptive_attributes() {
        let plain = Permission::new("APPROVE_LOAN");
        let described = Permission::new("APPROVE_LOAN")
            .with_grouping("portfolio")
            .with_action("APPROVE", "LOAN")
            .with_maker_checker(true);
        assert_eq!(plain, described);
    }

    #[test]
    fn set_lookup_by_str() {
        let set: HashSet<Permission> = [Permission::new("READ_CLIENT")].into_iter().collect();
        assert!(set.contains("READ_CLIENT"));
        assert!(!set.contains("READ_LOAN"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let p: Permission = serde_json::from_str(r#"{"code":"READ_OFFICE"}"#).unwrap();
        assert_eq!(p.code(), "READ_OFFICE");
        assert!(!p.can_maker_checker());
        assert_eq!(p.grouping(), None);
    }
}
