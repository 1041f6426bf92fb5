use crate::{CommandError, CommandProcessingResult, JsonCommand};

/// Write-side handler for one `(entity, action)` pair.
///
/// Handlers run after the dispatcher has authorized the acting user; they do
/// not repeat the permission check.
pub trait CommandSourceHandler: Send + Sync {
    fn process_command(&self, command: &JsonCommand) -> Result<CommandProcessingResult, CommandError>;
}
