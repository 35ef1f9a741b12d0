//! # blockpool
//!
//! Thread-safe, bounded, blocking object pool for expensive-to-construct
//! objects such as connections, buffers, or workers.
//!
//! ## Features
//!
//! - Capacity-bounded pooling with blocking and timed acquisition
//! - On-demand object creation through a user-supplied factory
//! - Optional revalidation of objects on acquire and/or return
//! - Eager pre-population of the pool at build time
//! - Transparent discard-and-retry of objects that fail validation
//! - Fluent builder with fail-fast configuration validation
//!
//! ## Quick Start
//!
//! ```rust
//! use blockpool::{ObjectFactory, PoolBuilder};
//! use std::convert::Infallible;
//!
//! struct BufferFactory;
//!
//! impl ObjectFactory for BufferFactory {
//!     type Object = Vec<u8>;
//!     type Error = Infallible;
//!
//!     fn create(&self) -> Result<Vec<u8>, Infallible> {
//!         Ok(Vec::with_capacity(4096))
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = PoolBuilder::new()
//!     .initial_size(2)?
//!     .max_size(8)?
//!     .with_factory(BufferFactory)
//!     .build()?;
//!
//! let buffer = pool.acquire()?;
//! // ... use the buffer ...
//! pool.return_object(buffer)?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod errors;
mod factory;
mod pool;
mod validator;

pub use builder::{PoolBuilder, UNBOUNDED};
pub use errors::{ConfigError, PoolError, PoolResult};
pub use factory::ObjectFactory;
pub use pool::ObjectPool;
pub use validator::{NoopValidator, ObjectValidator};
