//! Key-value store adapters: Redis for production, in-memory for tests.

mod in_memory;
mod redis;

pub use in_memory::InMemoryStore;
pub use redis::RedisStore;
