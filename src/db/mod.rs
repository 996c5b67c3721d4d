pub mod memory;
pub mod postgres;
pub mod redis;
pub mod repository;

pub use memory::MemoryStore;
pub use postgres::{create_pool, PgStore};
pub use redis::create_redis_client;
pub use redis::Cache;
pub use redis::CacheKey;
pub use redis::CacheWriterHandle;
pub use repository::{PreferenceRepository, RatingRepository};

#[cfg(test)]
pub use repository::{MockPreferenceRepository, MockRatingRepository};
