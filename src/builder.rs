//! Fluent configuration and construction of object pools

use crate::errors::{ConfigError, PoolError, PoolResult};
use crate::factory::ObjectFactory;
use crate::pool::ObjectPool;
use crate::validator::{NoopValidator, ObjectValidator};

/// Max-size value meaning "no capacity ceiling".
pub const UNBOUNDED: i64 = -1;

const DEFAULT_ACQUIRED_INVALID_LIMIT: i64 = 10;

/// Accumulates pool configuration and builds an [`ObjectPool`].
///
/// Setters that can receive an invalid value validate it immediately and
/// return a [`ConfigError`]; [`build`](PoolBuilder::build) performs the final
/// cross-field checks and the eager initial fill. The max size has no
/// default: a pool is never materialized without an explicit capacity
/// decision, bounded or [`UNBOUNDED`].
///
/// # Examples
///
/// ```
/// use blockpool::{ObjectFactory, PoolBuilder};
/// use std::convert::Infallible;
///
/// struct Counters;
///
/// impl ObjectFactory for Counters {
///     type Object = u64;
///     type Error = Infallible;
///
///     fn create(&self) -> Result<u64, Infallible> {
///         Ok(0)
///     }
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = PoolBuilder::new()
///     .initial_size(2)?
///     .max_size(8)?
///     .acquired_invalid_limit(5)?
///     .with_factory(Counters)
///     .build()?;
///
/// assert_eq!(pool.initial_size(), 2);
/// assert_eq!(pool.capacity(), Some(8));
/// assert_eq!(pool.acquired_invalid_limit(), 5);
/// # Ok(())
/// # }
/// ```
pub struct PoolBuilder<F: ObjectFactory> {
    initial_size: i64,
    max_size: Option<i64>,
    factory: Option<F>,
    validator: Option<Box<dyn ObjectValidator<F::Object>>>,
    acquired_invalid_limit: i64,
}

impl<F: ObjectFactory> PoolBuilder<F> {
    /// Create a builder with default configuration: initial size 0, max size
    /// unset, no validator, acquired-invalid limit 10.
    pub fn new() -> Self {
        Self {
            initial_size: 0,
            max_size: None,
            factory: None,
            validator: None,
            acquired_invalid_limit: DEFAULT_ACQUIRED_INVALID_LIMIT,
        }
    }

    /// Number of objects eagerly created when the pool is built.
    ///
    /// Rejects negative values.
    pub fn initial_size(mut self, initial_size: i64) -> Result<Self, ConfigError> {
        if initial_size < 0 {
            return Err(ConfigError::NegativeInitialSize);
        }
        self.initial_size = initial_size;
        Ok(self)
    }

    /// Maximum simultaneous objects (idle + active), or [`UNBOUNDED`].
    ///
    /// Rejects values below `-1` and bounded values below the configured
    /// initial size.
    pub fn max_size(mut self, max_size: i64) -> Result<Self, ConfigError> {
        if max_size < UNBOUNDED {
            return Err(ConfigError::InvalidMaxSize);
        }
        if max_size != UNBOUNDED && max_size < self.initial_size {
            return Err(ConfigError::MaxSizeBelowInitial {
                max: max_size,
                initial: self.initial_size,
            });
        }
        self.max_size = Some(max_size);
        Ok(self)
    }

    /// The factory creating and destroying pooled objects. Required.
    pub fn with_factory(mut self, factory: F) -> Self {
        self.factory = Some(factory);
        self
    }

    /// The validator consulted on acquire and/or return. Optional; without
    /// one, a no-op validator with both flags off is used.
    pub fn with_validator(mut self, validator: impl ObjectValidator<F::Object> + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Maximum consecutive invalid objects one acquire call may discard
    /// before failing.
    ///
    /// Rejects negative values.
    pub fn acquired_invalid_limit(mut self, acquired_invalid_limit: i64) -> Result<Self, ConfigError> {
        if acquired_invalid_limit < 0 {
            return Err(ConfigError::NegativeAcquiredInvalidLimit);
        }
        self.acquired_invalid_limit = acquired_invalid_limit;
        Ok(self)
    }

    /// Run the cross-field checks, eagerly fill the pool, and return it.
    ///
    /// Fails with a [`ConfigError`] when the factory or max size is missing
    /// or the max size undercuts the initial size, and with
    /// [`PoolError::Factory`] when the eager fill fails.
    pub fn build(self) -> PoolResult<ObjectPool<F>, F::Error> {
        let factory = self.factory.ok_or(ConfigError::MissingFactory)?;
        let max_size = self.max_size.ok_or(ConfigError::MissingMaxSize)?;
        if max_size != UNBOUNDED && max_size < self.initial_size {
            return Err(PoolError::Config(ConfigError::MaxSizeBelowInitial {
                max: max_size,
                initial: self.initial_size,
            }));
        }

        let capacity = if max_size == UNBOUNDED {
            None
        } else {
            Some(max_size as usize)
        };
        let validator = self
            .validator
            .unwrap_or_else(|| Box::new(NoopValidator));

        ObjectPool::new(
            self.initial_size as usize,
            capacity,
            factory,
            validator,
            self.acquired_invalid_limit as usize,
        )
    }
}

impl<F: ObjectFactory> Default for PoolBuilder<F> {
    fn default() -> Self {
        Self::new()
    }
}
