//! Command execution pipeline (application-level orchestration).
//!
//! ```text
//! CommandWrapper + JSON body + acting AppUser
//!   ↓
//! 1. Authorize: user must hold "<ACTION>_<ENTITY>" (or ALL_FUNCTIONS)
//!   ↓
//! 2. Route to the handler registered for (ENTITY, ACTION)
//!   ↓
//! 3. Parse the body and hand it to the handler
//! ```
//!
//! Authorization failures surface as `CommandError::Unauthorized` and the
//! handler is never invoked.

use std::collections::HashMap;

use backoffice_auth::{AppUser, CommandAuthorization};
use backoffice_core::Entity;

use crate::{CommandError, CommandProcessingResult, CommandSourceHandler, CommandWrapper, JsonCommand};

type RouteKey = (String, String);

/// Registry of write-side handlers keyed by `(ENTITY, ACTION)`.
#[derive(Default)]
pub struct CommandDispatcher {
    handlers: HashMap<RouteKey, Box<dyn CommandSourceHandler>>,
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `action` on `entity` (both matched upper-cased).
    pub fn register(
        &mut self,
        entity_name: &str,
        action_name: &str,
        handler: impl CommandSourceHandler + 'static,
    ) -> Result<(), CommandError> {
        let key = (entity_name.to_uppercase(), action_name.to_uppercase());
        if self.handlers.contains_key(&key) {
            return Err(CommandError::DuplicateHandler {
                entity: key.0,
                action: key.1,
            });
        }
        self.handlers.insert(key, Box::new(handler));
        Ok(())
    }

    pub fn supports(&self, wrapper: &CommandWrapper) -> bool {
        self.handlers.contains_key(&route_key(wrapper))
    }

    pub fn dispatch(
        &self,
        user: &AppUser,
        wrapper: &CommandWrapper,
        json: &str,
    ) -> Result<CommandProcessingResult, CommandError> {
        let permission = wrapper.permission_name();
        let span = tracing::info_span!(
            "dispatch_command",
            entity = %wrapper.entity_name(),
            action = %wrapper.action_name(),
            user_id = %user.id(),
        );
        let _guard = span.enter();

        user.validate_has_permission_to(&permission)?;

        let handler = self
            .handlers
            .get(&route_key(wrapper))
            .ok_or_else(|| CommandError::UnsupportedCommand {
                entity: wrapper.entity_name().to_string(),
                action: wrapper.action_name().to_string(),
            })?;

        let command = JsonCommand::from_json(wrapper.clone(), json)?;
        let result = handler.process_command(&command);

        match &result {
            Ok(processed) => tracing::debug!(resource_id = ?processed.resource_id, "command processed"),
            Err(err) => tracing::warn!(error = %err, "command rejected"),
        }
        result
    }
}

fn route_key(wrapper: &CommandWrapper) -> RouteKey {
    (wrapper.entity_name().to_string(), wrapper.action_name().to_string())
}
