//! Command envelope, parsed JSON body and processing result.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use backoffice_auth::{CommandAuthorization, codes};

use crate::CommandError;

/// Routing envelope: which action on which entity the caller asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandWrapper {
    entity_name: String,
    action_name: String,
    resource_id: Option<String>,
}

impl CommandWrapper {
    pub fn new(entity_name: impl Into<String>, action_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into().to_uppercase(),
            action_name: action_name.into().to_uppercase(),
            resource_id: None,
        }
    }

    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    pub fn action_name(&self) -> &str {
        &self.action_name
    }

    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }
}

impl CommandAuthorization for CommandWrapper {
    /// `"<ACTION>_<ENTITY>"`, e.g. `CREATE_CURRENCY`.
    fn permission_name(&self) -> String {
        codes::task_permission(&self.action_name, &self.entity_name)
    }
}

/// Parsed command body plus the envelope it arrived in.
#[derive(Debug, Clone)]
pub struct JsonCommand {
    wrapper: CommandWrapper,
    parsed: Value,
}

impl JsonCommand {
    pub fn from_json(wrapper: CommandWrapper, json: &str) -> Result<Self, CommandError> {
        let parsed: Value = serde_json::from_str(json)?;
        if !parsed.is_object() {
            return Err(CommandError::validation("command body must be a JSON object"));
        }
        Ok(Self { wrapper, parsed })
    }

    pub fn wrapper(&self) -> &CommandWrapper {
        &self.wrapper
    }

    pub fn entity_name(&self) -> &str {
        self.wrapper.entity_name()
    }

    pub fn action_name(&self) -> &str {
        self.wrapper.action_name()
    }

    pub fn resource_id(&self) -> Option<&str> {
        self.wrapper.resource_id()
    }

    pub fn json(&self) -> &Value {
        &self.parsed
    }

    fn parameter(&self, name: &str) -> Option<&Value> {
        self.parsed.get(name).filter(|v| !v.is_null())
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameter(name).is_some()
    }

    /// Trimmed string value; numbers and booleans are rendered as text.
    pub fn string_value_of_parameter_named(&self, name: &str) -> Option<String> {
        match self.parameter(name)? {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Accepts JSON booleans and the strings `"true"` / `"false"`.
    pub fn bool_value_of_parameter_named(&self, name: &str) -> Option<bool> {
        match self.parameter(name)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Array elements rendered as trimmed strings.
    pub fn array_value_of_parameter_named(&self, name: &str) -> Option<Vec<String>> {
        let items = self.parameter(name)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect(),
        )
    }

    pub fn is_change_in_string_parameter_named(&self, name: &str, existing: &str) -> bool {
        self.string_value_of_parameter_named(name)
            .is_some_and(|value| value != existing)
    }

    /// Order-insensitive comparison of the requested array against `existing`.
    pub fn is_change_in_array_parameter_named(&self, name: &str, existing: &[String]) -> bool {
        self.array_value_of_parameter_named(name).is_some_and(|value| {
            let requested: BTreeSet<&str> = value.iter().map(String::as_str).collect();
            let current: BTreeSet<&str> = existing.iter().map(String::as_str).collect();
            requested != current
        })
    }
}

/// Outcome of a successfully processed command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandProcessingResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub changes: BTreeMap<String, Value>,
}

impl CommandProcessingResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn with_changes(mut self, changes: BTreeMap<String, Value>) -> Self {
        self.changes = changes;
        self
    }
}
