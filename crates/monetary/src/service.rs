use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, PoisonError};

use serde_json::Value;

use backoffice_commands::{CommandError, CommandProcessingResult, JsonCommand};

use crate::CurrencyCode;

/// Write-side currency configuration service.
pub trait CurrencyWriteService: Send + Sync {
    /// Replace the set of currencies the organisation transacts in.
    fn create_allowed_currencies(&self, command: &JsonCommand) -> Result<CommandProcessingResult, CommandError>;
}

/// Process-local allowed-currency set.
#[derive(Debug, Default)]
pub struct InMemoryCurrencyWriteService {
    allowed: Mutex<BTreeSet<CurrencyCode>>,
}

impl InMemoryCurrencyWriteService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allowed_currencies(&self) -> Vec<CurrencyCode> {
        self.allowed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

impl CurrencyWriteService for InMemoryCurrencyWriteService {
    fn create_allowed_currencies(&self, command: &JsonCommand) -> Result<CommandProcessingResult, CommandError> {
        let requested = command
            .array_value_of_parameter_named("currencies")
            .ok_or_else(|| CommandError::validation("currencies is required"))?;

        let codes = requested
            .iter()
            .map(|code| CurrencyCode::parse(code))
            .collect::<Result<BTreeSet<_>, _>>()?;

        let mut allowed = self.allowed.lock().unwrap_or_else(PoisonError::into_inner);

        let mut changes = BTreeMap::new();
        if *allowed != codes {
            let listed: Vec<Value> = codes.iter().map(|c| Value::from(c.as_str())).collect();
            changes.insert("currencies".to_string(), Value::Array(listed));
            tracing::info!(currencies = ?codes, "allowed currencies updated");
            *allowed = codes;
        }

        Ok(CommandProcessingResult::empty().with_changes(changes))
    }
}
