//! Monetary configuration commands (allowed currencies).
//!
//! Only the command-handling edge lives here; currency persistence is behind
//! [`CurrencyWriteService`].

pub mod currency;
pub mod handler;
pub mod service;

pub use currency::CurrencyCode;
pub use handler::{CreateCurrencyCommandHandler, register_handlers};
pub use service::{CurrencyWriteService, InMemoryCurrencyWriteService};
