//! Core business logic abstractions

pub mod balance;
pub mod commission;
pub mod config;
pub mod currency;
pub mod exchange;
pub mod log;
pub mod partner;
pub mod repository;

// Re-export main types for cleaner imports
pub use balance::{SafeTypeTotal, aggregate_by_safe_type};
pub use currency::{Currency, CurrencyTotals};
pub use exchange::{AmountField, ExchangeFormState, ExchangeType, on_field_edited};
pub use partner::{PartnerSafeRecord, SafeTypeKind};
pub use repository::PartnerRepository;
