use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cannot serialize cache key: {0}")]
    Key(#[from] serde_json::Error),

    #[error("Cache capacity must be at least 1")]
    ZeroCapacity,
}

pub type CacheResult<T> = Result<T, CacheError>;
