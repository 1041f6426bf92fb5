//! Application user: identity/profile state plus the role snapshot that the
//! authorization procedures in [`crate::authorize`] evaluate.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use backoffice_core::{Entity, OfficeId, RoleId, UserId};

use crate::Role;

/// Password hashing collaborator.
///
/// Hashing lives outside this crate; implementations typically salt with the
/// user id.
pub trait PasswordEncoder {
    fn encode(&self, raw_password: &str, user_id: &UserId) -> String;
}

/// Profile data for a new user. `password` is already encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppUser {
    pub id: UserId,
    pub office_id: OfficeId,
    pub username: String,
    pub password: String,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub mobile: Option<String>,
}

/// Requested profile changes; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppUserUpdate {
    pub password: Option<String>,
    pub password_encoded: Option<String>,
    pub office_id: Option<OfficeId>,
    pub roles: Option<Vec<RoleId>>,
    pub username: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
}

/// Principal whose authorization is evaluated against its assigned roles.
///
/// # Invariants
/// - `roles` is never absent; an unassigned user holds an empty snapshot.
/// - The role snapshot is replaced wholesale, never edited in place.
#[derive(Clone)]
pub struct AppUser {
    id: UserId,
    office_id: OfficeId,
    username: String,
    email: String,
    firstname: String,
    lastname: String,
    mobile: Option<String>,
    password: String,
    enabled: bool,
    account_non_expired: bool,
    account_non_locked: bool,
    credentials_non_expired: bool,
    first_time_login_remaining: bool,
    deleted: bool,
    roles: Arc<[Arc<Role>]>,
}

impl AppUser {
    /// Create an enabled user with a first-time-login pending.
    ///
    /// Profile strings are trimmed; their content is not validated here.
    pub fn new(new_user: NewAppUser, roles: impl IntoIterator<Item = Arc<Role>>) -> Self {
        Self {
            id: new_user.id,
            office_id: new_user.office_id,
            username: new_user.username.trim().to_string(),
            email: new_user.email.trim().to_string(),
            firstname: new_user.firstname.trim().to_string(),
            lastname: new_user.lastname.trim().to_string(),
            mobile: new_user.mobile,
            password: new_user.password.trim().to_string(),
            enabled: true,
            account_non_expired: true,
            account_non_locked: true,
            credentials_non_expired: true,
            first_time_login_remaining: true,
            deleted: false,
            roles: role_snapshot(roles),
        }
    }

    /// Login account for a partner organisation; the partner name doubles as
    /// first and last name.
    pub fn from_partner(
        id: UserId,
        office_id: OfficeId,
        roles: impl IntoIterator<Item = Arc<Role>>,
        partner_name: &str,
        login_name: &str,
        password: &str,
        email: &str,
    ) -> Self {
        Self::new(
            NewAppUser {
                id,
                office_id,
                username: login_name.to_string(),
                password: password.to_string(),
                email: email.to_string(),
                firstname: partner_name.to_string(),
                lastname: partner_name.to_string(),
                mobile: None,
            },
            roles,
        )
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn firstname(&self) -> &str {
        &self.firstname
    }

    pub fn lastname(&self) -> &str {
        &self.lastname
    }

    pub fn mobile(&self) -> Option<&str> {
        self.mobile.as_deref()
    }

    pub fn office_id(&self) -> OfficeId {
        self.office_id
    }

    /// Encoded password.
    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_account_non_expired(&self) -> bool {
        self.account_non_expired
    }

    pub fn is_account_non_locked(&self) -> bool {
        self.account_non_locked
    }

    pub fn is_credentials_non_expired(&self) -> bool {
        self.credentials_non_expired
    }

    pub fn is_first_time_login_remaining(&self) -> bool {
        self.first_time_login_remaining
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Current role snapshot.
    pub fn roles(&self) -> &[Arc<Role>] {
        &self.roles
    }

    pub fn role_ids(&self) -> BTreeSet<RoleId> {
        self.roles.iter().map(|r| *r.id()).collect()
    }

    /// Replace the held roles wholesale.
    ///
    /// An empty replacement is ignored and the existing roles are kept.
    pub fn update_roles(&mut self, roles: impl IntoIterator<Item = Arc<Role>>) {
        let snapshot = role_snapshot(roles);
        if !snapshot.is_empty() {
            self.roles = snapshot;
        }
    }

    pub fn update_password(&mut self, encoded_password: impl Into<String>) {
        self.password = encoded_password.into();
        self.first_time_login_remaining = false;
    }

    pub fn change_office(&mut self, office_id: OfficeId) {
        self.office_id = office_id;
    }

    /// Apply profile changes and return the ones that actually differed.
    ///
    /// `officeId` and `roles` are only reported: resolving them is the caller's
    /// job, followed by [`AppUser::change_office`] / [`AppUser::update_roles`].
    pub fn update(&mut self, changes: &AppUserUpdate, encoder: &dyn PasswordEncoder) -> BTreeMap<String, Value> {
        let mut actual = BTreeMap::new();

        if let Some(raw) = &changes.password {
            let encoded = encoder.encode(raw, &self.id);
            if encoded != self.password {
                actual.insert("passwordEncoded".to_string(), Value::from(encoded.clone()));
                self.update_password(encoded);
            }
        }

        if let Some(encoded) = &changes.password_encoded {
            if *encoded != self.password {
                actual.insert("passwordEncoded".to_string(), Value::from(encoded.clone()));
                self.update_password(encoded.clone());
            }
        }

        if let Some(office_id) = changes.office_id {
            if office_id != self.office_id {
                actual.insert("officeId".to_string(), Value::from(office_id.to_string()));
            }
        }

        if let Some(role_ids) = &changes.roles {
            let requested: BTreeSet<RoleId> = role_ids.iter().copied().collect();
            if requested != self.role_ids() {
                let ids: Vec<Value> = requested.iter().map(|id| Value::from(id.to_string())).collect();
                actual.insert("roles".to_string(), Value::Array(ids));
            }
        }

        if let Some(value) = changed(&changes.username, &self.username) {
            actual.insert("username".to_string(), Value::from(value.clone()));
            self.username = value;
        }

        if let Some(value) = changed(&changes.firstname, &self.firstname) {
            actual.insert("firstname".to_string(), Value::from(value.clone()));
            self.firstname = value;
        }

        if let Some(value) = changed(&changes.lastname, &self.lastname) {
            actual.insert("lastname".to_string(), Value::from(value.clone()));
            self.lastname = value;
        }

        if let Some(value) = changed(&changes.email, &self.email) {
            actual.insert("email".to_string(), Value::from(value.clone()));
            self.email = value;
        }

        if let Some(value) = changed(&changes.mobile, self.mobile.as_deref().unwrap_or_default()) {
            actual.insert("mobile".to_string(), Value::from(value.clone()));
            self.mobile = Some(value);
        }

        actual
    }

    /// Soft delete: the row stays, but the account can no longer log in and
    /// the username is freed for reuse.
    pub fn delete(&mut self) {
        self.deleted = true;
        self.enabled = false;
        self.account_non_expired = false;
        self.first_time_login_remaining = true;
        self.username = format!("{}_DELETED_{}", self.id, self.username);
    }
}

fn changed(requested: &Option<String>, current: &str) -> Option<String> {
    requested.as_ref().filter(|v| v.as_str() != current).cloned()
}

/// Deduplicate by role id, keeping first occurrence order.
fn role_snapshot(roles: impl IntoIterator<Item = Arc<Role>>) -> Arc<[Arc<Role>]> {
    let mut seen = HashSet::new();
    roles
        .into_iter()
        .filter(|role| seen.insert(*role.id()))
        .collect()
}

impl Entity for AppUser {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Debug for AppUser {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppUser")
            .field("id", &self.id)
            .field("office_id", &self.office_id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("enabled", &self.enabled)
            .field("deleted", &self.deleted)
            .field("roles", &self.roles.iter().map(|r| r.name()).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PrefixEncoder;

    impl PasswordEncoder for PrefixEncoder {
        fn encode(&self, raw_password: &str, user_id: &UserId) -> String {
            format!("{user_id}:{raw_password}")
        }
    }

    fn new_user(roles: Vec<Arc<Role>>) -> AppUser {
        AppUser::new(
            NewAppUser {
                id: UserId::new(),
                office_id: OfficeId::new(),
                username: "  mifos ".to_string(),
                password: " secret-hash ".to_string(),
                email: " admin@example.com ".to_string(),
                firstname: "App".to_string(),
                lastname: "Administrator".to_string(),
                mobile: None,
            },
            roles,
        )
    }

    fn role(name: &str, codes: &[&str]) -> Arc<Role> {
        Arc::new(Role::new(RoleId::new(), name).with_codes(codes.iter().copied()))
    }

    #[test]
    fn new_user_is_trimmed_and_enabled() {
        let user = new_user(vec![]);
        assert_eq!(user.username(), "mifos");
        assert_eq!(user.email(), "admin@example.com");
        assert_eq!(user.password(), "secret-hash");
        assert!(user.is_enabled());
        assert!(user.is_account_non_expired());
        assert!(user.is_account_non_locked());
        assert!(user.is_credentials_non_expired());
        assert!(user.is_first_time_login_remaining());
        assert!(user.roles().is_empty());
    }

    #[test]
    fn partner_user_uses_partner_name_for_both_names() {
        let user = AppUser::from_partner(
            UserId::new(),
            OfficeId::new(),
            Vec::new(),
            "Acme Cable",
            "acme",
            "hash",
            "ops@acme.test",
        );
        assert_eq!(user.firstname(), "Acme Cable");
        assert_eq!(user.lastname(), "Acme Cable");
        assert_eq!(user.mobile(), None);
    }

    #[test]
    fn partner_user_keeps_free_form_email_trimmed() {
        let user = AppUser::from_partner(
            UserId::new(),
            OfficeId::new(),
            Vec::new(),
            "Acme Cable",
            " acme ",
            "hash",
            " ops ",
        );
        assert_eq!(user.email(), "ops");
        assert_eq!(user.username(), "acme");
        assert!(user.is_enabled());
    }

    #[test]
    fn update_roles_replaces_whole_set() {
        let old = role("Old", &["READ_CLIENT"]);
        let new = role("New", &["READ_LOAN"]);
        let mut user = new_user(vec![old.clone()]);

        user.update_roles([new.clone()]);

        assert_eq!(user.roles().len(), 1);
        assert_eq!(user.roles()[0].id(), new.id());
    }

    #[test]
    fn update_roles_with_empty_set_keeps_existing() {
        let old = role("Old", &["READ_CLIENT"]);
        let mut user = new_user(vec![old.clone()]);

        user.update_roles(Vec::new());

        assert_eq!(user.role_ids(), BTreeSet::from([*old.id()]));
    }

    #[test]
    fn duplicate_roles_collapse_by_id() {
        let r = role("Teller", &["READ_CLIENT"]);
        let user = new_user(vec![r.clone(), r.clone()]);
        assert_eq!(user.roles().len(), 1);
    }

    #[test]
    fn update_password_clears_first_time_login() {
        let mut user = new_user(vec![]);
        user.update_password("new-hash");
        assert_eq!(user.password(), "new-hash");
        assert!(!user.is_first_time_login_remaining());
    }

    #[test]
    fn update_reports_only_actual_changes() {
        let r = role("Teller", &["READ_CLIENT"]);
        let mut user = new_user(vec![r.clone()]);
        let other_role = RoleId::new();

        let changes = AppUserUpdate {
            password: Some("pw".to_string()),
            office_id: Some(user.office_id()),
            roles: Some(vec![*r.id(), other_role]),
            username: Some("mifos".to_string()),
            email: Some("new@example.com".to_string()),
            mobile: Some("555-0100".to_string()),
            ..Default::default()
        };

        let actual = user.update(&changes, &PrefixEncoder);

        let keys: Vec<&str> = actual.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["email", "mobile", "passwordEncoded", "roles"]);
        assert_eq!(user.password(), format!("{}:pw", user.id()));
        assert_eq!(user.email(), "new@example.com");
        assert_eq!(user.mobile(), Some("555-0100"));
        // roles are reported, not applied
        assert_eq!(user.role_ids(), BTreeSet::from([*r.id()]));
    }

    #[test]
    fn update_with_same_encoded_password_is_not_a_change() {
        let mut user = new_user(vec![]);
        let changes = AppUserUpdate {
            password_encoded: Some("secret-hash".to_string()),
            ..Default::default()
        };
        assert!(user.update(&changes, &PrefixEncoder).is_empty());
        assert!(user.is_first_time_login_remaining());
    }

    #[test]
    fn update_deserializes_camel_case() {
        let changes: AppUserUpdate =
            serde_json::from_str(r#"{"passwordEncoded":"h","firstname":"Ann"}"#).unwrap();
        assert_eq!(changes.password_encoded.as_deref(), Some("h"));
        assert_eq!(changes.firstname.as_deref(), Some("Ann"));
        assert!(changes.office_id.is_none());
    }

    #[test]
    fn delete_is_soft_and_frees_username() {
        let mut user = new_user(vec![]);
        user.update_password("h");
        user.delete();

        assert!(user.is_deleted());
        assert!(!user.is_enabled());
        assert!(!user.is_account_non_expired());
        assert!(user.is_first_time_login_remaining());
        assert_eq!(user.username(), format!("{}_DELETED_mifos", user.id()));
    }

    #[test]
    fn has_id_of_is_plain_identity() {
        let user = new_user(vec![]);
        assert!(user.has_id_of(user.id()));
        assert!(!user.has_id_of(&UserId::new()));
    }

    #[test]
    fn debug_output_omits_password() {
        let user = new_user(vec![]);
        let rendered = format!("{user:?}");
        assert!(!rendered.contains("secret-hash"));
        assert!(rendered.contains("mifos"));
    }
}
