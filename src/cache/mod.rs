// Cache module
//
// Read-through response caching over an optional volatile store.
// Submodules: key derivation, the store trait and its Redis/in-memory
// backends, the single-flight registry, statistics, and the facade itself.

pub mod error;
pub mod facade;
pub mod key;
pub mod memory;
pub mod redis;
pub mod singleflight;
pub mod stats;
pub mod store;

pub use error::CacheError;
pub use facade::{CacheFacade, CacheOptions};
pub use key::{build_key, resource_pattern, validate_key};
pub use memory::MemoryStore;
pub use redis::RedisStore;
pub use singleflight::{FlightSlot, Singleflight};
pub use stats::{CacheStats, CacheStatsTracker};
pub use store::VolatileStore;
