//! Store backends - in-memory and Redis

mod factory;
mod in_memory;
mod redis;

pub use factory::{StoreFactory, StoreHandles, StoreSettings, StoreType};
pub use in_memory::InMemoryStore;
pub use redis::{RedisStore, RedisStoreConfig};
