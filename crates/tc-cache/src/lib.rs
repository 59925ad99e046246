//! tc-cache: bounded memoization for thermocycle.
//!
//! A [`Cache`] holds at most `capacity` entries; when full, its [`EvictionPolicy`]
//! picks the entry to drop. Keys for computed results are content hashes
//! ([`CacheKey`]) of the stage name and the serialized inputs.

pub mod cache;
pub mod error;
pub mod key;
pub mod policy;

pub use cache::{Cache, CacheStats};
pub use error::{CacheError, CacheResult};
pub use key::CacheKey;
pub use policy::{EvictionPolicy, InsertionOrder, LeastRecentlyUsed};
