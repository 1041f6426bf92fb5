//! `backoffice-commands` — JSON command model and the authorizing command
//! dispatcher that sits in front of every write-side handler.

pub mod command;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod user;

pub use command::{CommandProcessingResult, CommandWrapper, JsonCommand};
pub use dispatcher::CommandDispatcher;
pub use error::CommandError;
pub use handler::CommandSourceHandler;
pub use user::{new_user_from_command, user_update_from_command};
