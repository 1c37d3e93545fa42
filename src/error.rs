use thiserror::Error;

/// Why a [`MapConfig`](crate::MapConfig) was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("initial capacity must be greater than zero")]
    ZeroCapacity,
    #[error("load factor must be finite and at least 2^-20, got {0}")]
    InvalidLoadFactor(f64),
}

#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum MapError {
    #[error("invalid map configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("key not found")]
    KeyNotFound,
}
