//! Business logic services for the application layer.

pub mod guardian_service;
pub mod shortener_service;

pub use guardian_service::{GuardianConfig, GuardianService};
pub use shortener_service::ShortenerService;
