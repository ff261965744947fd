mod in_memory;
mod redis;

pub use in_memory::InMemoryCounterStore;
pub use self::redis::{create_pool, RedisCounterStore, RedisPool};
