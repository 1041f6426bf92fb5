//! Well-known permission codes and the naming conventions used to synthesize
//! per-resource codes.
//!
//! Stored permission codes must match synthesized ones byte for byte, so the
//! casing and underscore rules here are part of the contract.

/// Universal grant: every permission check succeeds.
pub const ALL_FUNCTIONS: &str = "ALL_FUNCTIONS";

/// Read-only universal grant (reports, datatables, resource listings).
pub const ALL_FUNCTIONS_READ: &str = "ALL_FUNCTIONS_READ";

/// May run any report.
pub const REPORTING_SUPER_USER: &str = "REPORTING_SUPER_USER";

/// May act as checker for any maker-checker function.
pub const CHECKER_SUPER_USER: &str = "CHECKER_SUPER_USER";

pub const APPROVE_IN_PAST_LOAN: &str = "APPROVEINPAST_LOAN";
pub const REJECT_IN_PAST_LOAN: &str = "REJECTINPAST_LOAN";
pub const WITHDRAW_IN_PAST_LOAN: &str = "WITHDRAWINPAST_LOAN";
pub const DISBURSE_IN_PAST_LOAN: &str = "DISBURSEINPAST_LOAN";
pub const REPAYMENT_IN_PAST_LOAN: &str = "REPAYMENTINPAST_LOAN";

/// Access type whose datatable checks also accept [`ALL_FUNCTIONS_READ`].
pub const READ: &str = "READ";

/// `"<FUNCTION>_CHECKER"`, function upper-cased.
pub fn checker_code(function: &str) -> String {
    format!("{}_CHECKER", function.to_uppercase())
}

/// `"<ACCESS_TYPE>_<datatable>"`, both parts taken verbatim.
pub fn datatable_code(access_type: &str, datatable: &str) -> String {
    format!("{access_type}_{datatable}")
}

/// `"READ_<report>"`, report name taken verbatim.
pub fn report_read_code(report_name: &str) -> String {
    format!("READ_{report_name}")
}

/// `"READ_<RESOURCE>"`, resource type upper-cased.
pub fn resource_read_code(resource_type: &str) -> String {
    format!("READ_{}", resource_type.to_uppercase())
}

/// Permission required to run a command: `"<ACTION>_<ENTITY>"`, upper-cased.
pub fn task_permission(action_name: &str, entity_name: &str) -> String {
    format!("{}_{}", action_name.to_uppercase(), entity_name.to_uppercase())
}
