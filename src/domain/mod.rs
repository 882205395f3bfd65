//! Domain module
//!
//! Donation events, Rupiah amounts and producer payload extraction rules.

pub mod amount;
pub mod donation;
pub mod payload;

pub use amount::{format_rupiah, Rupiah};
pub use donation::Donation;
pub use payload::{FieldPath, FieldRule};
