//! Application layer services implementing business logic.
//!
//! Services consume the domain traits and give the HTTP handlers and the admin CLI a
//! small API to call.
//!
//! # Available Services
//!
//! - [`services::shortener_service::ShortenerService`] - Shorten and resolve pipelines
//! - [`services::guardian_service::GuardianService`] - Malicious-URL blocklist and refresh cycle

pub mod services;
