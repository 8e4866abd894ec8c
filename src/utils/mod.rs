//! Helpers shared across layers.
//!
//! - [`slug_codec`] - Base62 encoding of ids into slugs
//! - [`db_error`] - SQLx error classification

pub mod db_error;
pub mod slug_codec;
