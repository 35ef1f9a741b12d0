//! Error types for the object pool

use thiserror::Error;

/// Configuration errors reported by [`PoolBuilder`](crate::PoolBuilder).
///
/// All of these fail at configuration time, never once a pool is running.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("The initial size value is invalid: must not be negative")]
    NegativeInitialSize,

    #[error("The max size value is invalid: must be -1 (unbounded) or non-negative")]
    InvalidMaxSize,

    #[error("The maximum size of the pool ({max}) shall not be smaller than the initial size ({initial})")]
    MaxSizeBelowInitial { max: i64, initial: i64 },

    #[error("The maximum size of the pool has not been set")]
    MissingMaxSize,

    #[error("The object pool cannot be instantiated as the object factory is not defined")]
    MissingFactory,

    #[error("The limit of acquired invalid objects must not be negative")]
    NegativeAcquiredInvalidLimit,
}

/// Errors reported by [`ObjectPool`](crate::ObjectPool) operations.
///
/// `E` is the error type of the configured [`ObjectFactory`](crate::ObjectFactory);
/// creation failures propagate unchanged to whichever caller triggered them.
#[derive(Error, Debug)]
pub enum PoolError<E> {
    #[error("invalid pool configuration")]
    Config(#[from] ConfigError),

    #[error("the object factory failed to create a pooled object")]
    Factory(#[source] E),

    #[error("gave up acquiring: {discarded} consecutive objects failed validation")]
    AcquiredInvalidLimitReached { discarded: usize },

    #[error("the pool has been disposed")]
    Disposed,

    #[error("the returned object is not tracked as active by this pool")]
    NotActive,
}

pub type PoolResult<T, E> = Result<T, PoolError<E>>;
