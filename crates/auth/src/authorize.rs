//! Authorization decision procedures for [`AppUser`].
//!
//! Everything here is a pure read of the user's current role snapshot:
//! - No IO
//! - No caching (roles can change between requests)
//! - The only error is [`AuthzError::Denied`], raised by the `validate_*` wrappers

use thiserror::Error;

use backoffice_core::Entity;

use crate::codes::{self, ALL_FUNCTIONS, ALL_FUNCTIONS_READ, CHECKER_SUPER_USER, REPORTING_SUPER_USER};
use crate::AppUser;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// The user lacks every permission that would allow the attempted action.
    #[error("{0}")]
    Denied(String),
}

impl AuthzError {
    pub fn denied(msg: impl Into<String>) -> Self {
        Self::Denied(msg.into())
    }

    pub fn message(&self) -> &str {
        match self {
            AuthzError::Denied(msg) => msg,
        }
    }
}

/// Command-side authorization contract (checked at the command boundary).
///
/// Implement this on command envelopes; the dispatcher validates the acting
/// user against `permission_name()` before routing.
pub trait CommandAuthorization {
    fn permission_name(&self) -> String;
}

impl AppUser {
    /// True iff some held role grants [`ALL_FUNCTIONS`].
    fn has_all_functions_permission(&self) -> bool {
        self.roles().iter().any(|role| role.has_permission_to(ALL_FUNCTIONS))
    }

    /// Primitive decision: the universal grant wins, otherwise any role granting
    /// `code` does.
    pub fn has_permission_to(&self, code: &str) -> bool {
        self.has_all_functions_permission() || self.roles().iter().any(|role| role.has_permission_to(code))
    }

    /// True ("denied") iff none of `codes` is held. An empty list is denied.
    pub fn has_not_permission_for_any_of(&self, codes: &[&str]) -> bool {
        !self.has_any_permission(codes)
    }

    pub fn has_any_permission<S: AsRef<str>>(&self, codes: &[S]) -> bool {
        codes.iter().any(|code| self.has_permission_to(code.as_ref()))
    }

    pub fn is_super_user(&self) -> bool {
        self.has_all_functions_permission()
    }

    /// One entry per permission code per role, in role order. A code granted
    /// by two roles appears twice.
    pub fn authorities(&self) -> Vec<String> {
        self.roles()
            .iter()
            .flat_map(|role| role.permission_codes().into_iter().map(str::to_string))
            .collect()
    }

    pub fn can_not_approve_loan_in_past(&self) -> bool {
        self.has_not_permission_for_any_of(&[ALL_FUNCTIONS, codes::APPROVE_IN_PAST_LOAN])
    }

    pub fn can_not_reject_loan_in_past(&self) -> bool {
        self.has_not_permission_for_any_of(&[ALL_FUNCTIONS, codes::REJECT_IN_PAST_LOAN])
    }

    pub fn can_not_withdraw_by_client_loan_in_past(&self) -> bool {
        self.has_not_permission_for_any_of(&[ALL_FUNCTIONS, codes::WITHDRAW_IN_PAST_LOAN])
    }

    pub fn can_not_disburse_loan_in_past(&self) -> bool {
        self.has_not_permission_for_any_of(&[ALL_FUNCTIONS, codes::DISBURSE_IN_PAST_LOAN])
    }

    pub fn can_not_make_repayment_on_loan_in_past(&self) -> bool {
        self.has_not_permission_for_any_of(&[ALL_FUNCTIONS, codes::REPAYMENT_IN_PAST_LOAN])
    }

    pub fn has_not_permission_for_report(&self, report_name: &str) -> bool {
        let report_code = codes::report_read_code(report_name);
        self.has_not_permission_for_any_of(&[ALL_FUNCTIONS, ALL_FUNCTIONS_READ, REPORTING_SUPER_USER, &report_code])
    }

    /// `ALL_FUNCTIONS_READ` only counts when `access_type` is `READ` (any case).
    pub fn has_not_permission_for_datatable(&self, datatable: &str, access_type: &str) -> bool {
        let match_permission = codes::datatable_code(access_type, datatable);

        if access_type.eq_ignore_ascii_case(codes::READ) {
            return self.has_not_permission_for_any_of(&[ALL_FUNCTIONS, ALL_FUNCTIONS_READ, &match_permission]);
        }

        self.has_not_permission_for_any_of(&[ALL_FUNCTIONS, &match_permission])
    }

    /// Validate a single permission code. Denials are audited.
    pub fn validate_has_permission_to(&self, function: &str) -> Result<(), AuthzError> {
        if self.has_permission_to(function) {
            return Ok(());
        }

        tracing::info!(
            user_id = %self.id(),
            action = %function,
            allowed = ?self.authorities(),
            "unauthorized access"
        );
        Err(AuthzError::denied(format!("User has no authority to: {function}")))
    }

    /// Validate that any one of `allowed_permissions` is held.
    pub fn validate_has_permission_to_any<S: AsRef<str>>(
        &self,
        function: &str,
        allowed_permissions: &[S],
    ) -> Result<(), AuthzError> {
        if self.has_any_permission(allowed_permissions) {
            Ok(())
        } else {
            Err(AuthzError::denied(format!("User has no authority to: {function}")))
        }
    }

    /// Maker-checker: the checker must hold `<FUNCTION>_CHECKER` or [`CHECKER_SUPER_USER`].
    pub fn validate_has_checker_permission_to(&self, function: &str) -> Result<(), AuthzError> {
        let checker_code = codes::checker_code(function);
        if self.has_permission_to(CHECKER_SUPER_USER) || self.has_permission_to(&checker_code) {
            return Ok(());
        }

        Err(AuthzError::denied(format!(
            "User has no authority to be a checker for: {function}"
        )))
    }

    pub fn validate_has_read_permission(&self, resource_type: &str) -> Result<(), AuthzError> {
        let match_permission = codes::resource_read_code(resource_type);
        if !self.has_not_permission_for_any_of(&[ALL_FUNCTIONS, ALL_FUNCTIONS_READ, &match_permission]) {
            return Ok(());
        }

        Err(AuthzError::denied(format!(
            "User has no authority to view {}s",
            resource_type.to_lowercase()
        )))
    }

    pub fn validate_has_datatable_read_permission(&self, datatable: &str) -> Result<(), AuthzError> {
        if self.has_not_permission_for_datatable(datatable, codes::READ) {
            return Err(AuthzError::denied(format!(
                "Not authorised to read datatable: {datatable}"
            )));
        }
        Ok(())
    }
}
