//! Cart and order pricing.

pub mod errors;
pub mod models;
mod repositories;
pub mod service;

pub use errors::PricingServiceError;
pub use service::*;
