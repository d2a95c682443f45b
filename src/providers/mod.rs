pub mod rest;
pub mod snapshot;
pub mod util;
