use std::sync::Arc;

use backoffice_commands::{CommandDispatcher, CommandError, CommandProcessingResult, CommandSourceHandler, JsonCommand};

use crate::CurrencyWriteService;

/// Handles `CREATE CURRENCY`; the dispatcher has already checked `CREATE_CURRENCY`.
pub struct CreateCurrencyCommandHandler<S> {
    write_service: Arc<S>,
}

impl<S: CurrencyWriteService> CreateCurrencyCommandHandler<S> {
    pub fn new(write_service: Arc<S>) -> Self {
        Self { write_service }
    }
}

impl<S: CurrencyWriteService> CommandSourceHandler for CreateCurrencyCommandHandler<S> {
    fn process_command(&self, command: &JsonCommand) -> Result<CommandProcessingResult, CommandError> {
        self.write_service.create_allowed_currencies(command)
    }
}

/// Register every monetary handler on `dispatcher`.
pub fn register_handlers<S>(dispatcher: &mut CommandDispatcher, write_service: Arc<S>) -> Result<(), CommandError>
where
    S: CurrencyWriteService + 'static,
{
    dispatcher.register("CURRENCY", "CREATE", CreateCurrencyCommandHandler::new(write_service))
}
