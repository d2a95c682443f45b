pub mod balances;
pub mod dashboard;
pub mod exchange;
pub mod setup;
pub mod ui;
