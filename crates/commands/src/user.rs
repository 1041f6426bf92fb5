//! User profile requests built from `USER` commands.

use backoffice_auth::{AppUser, AppUserUpdate, NewAppUser, PasswordEncoder};
use backoffice_core::{OfficeId, RoleId, UserId};

use crate::{CommandError, JsonCommand};

fn required(command: &JsonCommand, name: &str) -> Result<String, CommandError> {
    command
        .string_value_of_parameter_named(name)
        .ok_or_else(|| CommandError::validation(format!("{name} is required")))
}

/// Profile for a new user.
///
/// With `sendPasswordToEmail` set, the password comes from `generate_password`
/// instead of the body. Either way it is encoded before it leaves here.
pub fn new_user_from_command(
    command: &JsonCommand,
    id: UserId,
    office_id: OfficeId,
    encoder: &dyn PasswordEncoder,
    generate_password: impl FnOnce() -> String,
) -> Result<NewAppUser, CommandError> {
    let send_password_to_email = command
        .bool_value_of_parameter_named("sendPasswordToEmail")
        .unwrap_or(false);
    let raw_password = if send_password_to_email {
        generate_password()
    } else {
        required(command, "password")?
    };

    Ok(NewAppUser {
        id,
        office_id,
        username: required(command, "username")?,
        password: encoder.encode(&raw_password, &id),
        email: required(command, "email")?,
        firstname: required(command, "firstname")?,
        lastname: required(command, "lastname")?,
        mobile: command.string_value_of_parameter_named("mobile"),
    })
}

/// Changes requested for `user`; parameters equal to the current value are left out.
pub fn user_update_from_command(command: &JsonCommand, user: &AppUser) -> Result<AppUserUpdate, CommandError> {
    let mut update = AppUserUpdate::default();

    if command.has_parameter("password") {
        update.password = command.string_value_of_parameter_named("password");
    }

    if command.is_change_in_string_parameter_named("passwordEncoded", user.password()) {
        update.password_encoded = command.string_value_of_parameter_named("passwordEncoded");
    }

    if command.has_parameter("officeId") {
        let office_id: OfficeId = required(command, "officeId")?.parse()?;
        if office_id != user.office_id() {
            update.office_id = Some(office_id);
        }
    }

    let current_roles: Vec<String> = user.role_ids().iter().map(RoleId::to_string).collect();
    if command.is_change_in_array_parameter_named("roles", &current_roles) {
        let requested = command.array_value_of_parameter_named("roles").unwrap_or_default();
        update.roles = Some(
            requested
                .iter()
                .map(|id| id.parse::<RoleId>())
                .collect::<Result<Vec<_>, _>>()?,
        );
    }

    let text_fields: [(&str, &str, &mut Option<String>); 4] = [
        ("username", user.username(), &mut update.username),
        ("firstname", user.firstname(), &mut update.firstname),
        ("lastname", user.lastname(), &mut update.lastname),
        ("email", user.email(), &mut update.email),
    ];
    for (name, current, slot) in text_fields {
        if command.is_change_in_string_parameter_named(name, current) {
            *slot = command.string_value_of_parameter_named(name);
        }
    }

    if command.is_change_in_string_parameter_named("mobile", user.mobile().unwrap_or_default()) {
        update.mobile = command.string_value_of_parameter_named("mobile");
    }

    Ok(update)
}
