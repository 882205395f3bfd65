//! donation_relay Library
//!
//! Re-exports modules for the server binary, tools and integration testing.

pub mod api;
pub mod config;
pub mod domain;
mod error;
pub mod pending_store;

pub use api::AppState;
pub use config::Config;
pub use domain::{Donation, Rupiah};
pub use error::{AppError, AppResult};
pub use pending_store::{PendingStore, Submission};
