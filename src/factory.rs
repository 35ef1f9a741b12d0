//! Factory contract for creating and destroying pooled objects

use std::error::Error;

/// Creates and destroys the objects managed by an [`ObjectPool`](crate::ObjectPool).
///
/// The pool calls [`create`](ObjectFactory::create) for the eager initial fill
/// and whenever an acquire finds no idle object while the pool is below
/// capacity. Creation failures are propagated to the caller of the operation
/// that triggered them; the pool never retries a failed creation on its own.
///
/// [`destroy`](ObjectFactory::destroy) is best-effort cleanup, invoked for
/// objects that fail validation and for idle objects drained on dispose. The
/// default implementation simply drops the object, which is sufficient for
/// types whose `Drop` releases everything they hold.
///
/// # Examples
///
/// ```
/// use blockpool::ObjectFactory;
/// use std::convert::Infallible;
///
/// struct BufferFactory;
///
/// impl ObjectFactory for BufferFactory {
///     type Object = Vec<u8>;
///     type Error = Infallible;
///
///     fn create(&self) -> Result<Vec<u8>, Infallible> {
///         Ok(Vec::with_capacity(4096))
///     }
/// }
/// ```
pub trait ObjectFactory: Send + Sync {
    /// The pooled object type.
    type Object: Send + 'static;

    /// Caller-defined creation error, surfaced as
    /// [`PoolError::Factory`](crate::PoolError::Factory).
    type Error: Error + Send + Sync + 'static;

    /// Produce a new pooled object.
    fn create(&self) -> Result<Self::Object, Self::Error>;

    /// Tear down an object that is leaving the pool.
    fn destroy(&self, object: Self::Object) {
        drop(object);
    }
}
