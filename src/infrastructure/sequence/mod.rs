//! [`crate::domain::repositories::IdSequence`] implementations.

mod atomic_sequence;
mod redis_sequence;

pub use atomic_sequence::AtomicIdSequence;
pub use redis_sequence::RedisIdSequence;
