//! Core object pool engine

use crate::errors::{PoolError, PoolResult};
use crate::factory::ObjectFactory;
use crate::validator::ObjectValidator;

use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// Shared state, only ever touched with the pool lock held.
struct PoolState<T> {
    /// Unborrowed objects, most recently returned last (LIFO).
    idle: Vec<T>,
    /// Objects currently checked out by callers.
    active: usize,
    /// Terminal flag; no acquire or return succeeds once set.
    disposed: bool,
}

impl<T> PoolState<T> {
    fn total(&self) -> usize {
        self.active + self.idle.len()
    }
}

/// Thread-safe, bounded, blocking object pool.
///
/// Callers borrow objects with [`acquire`](ObjectPool::acquire) or
/// [`try_acquire`](ObjectPool::try_acquire) and hand them back with
/// [`return_object`](ObjectPool::return_object). The pool enforces the
/// configured capacity ceiling: when every slot is taken, acquires park on a
/// condition variable until a return or a dispose frees one. At most one
/// caller ever holds a given object at a time.
///
/// Pools are built through [`PoolBuilder`](crate::PoolBuilder).
///
/// # Examples
///
/// ```
/// use blockpool::{ObjectFactory, PoolBuilder};
/// use std::convert::Infallible;
///
/// struct Connections;
///
/// impl ObjectFactory for Connections {
///     type Object = String;
///     type Error = Infallible;
///
///     fn create(&self) -> Result<String, Infallible> {
///         Ok(String::from("connection"))
///     }
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = PoolBuilder::new()
///     .initial_size(0)?
///     .max_size(10)?
///     .with_factory(Connections)
///     .build()?;
///
/// let first = pool.acquire()?;
/// let second = pool.acquire()?;
/// assert_eq!(pool.active_count(), 2);
/// assert_eq!(pool.idle_count(), 0);
///
/// pool.return_object(first)?;
/// pool.return_object(second)?;
/// assert_eq!(pool.active_count(), 0);
/// assert_eq!(pool.idle_count(), 2);
/// # Ok(())
/// # }
/// ```
pub struct ObjectPool<F: ObjectFactory> {
    state: Mutex<PoolState<F::Object>>,
    /// Signalled whenever a return or dispose may have freed a slot.
    slot_freed: Condvar,
    factory: F,
    validator: Box<dyn ObjectValidator<F::Object>>,
    /// `None` is unbounded.
    capacity: Option<usize>,
    initial_size: usize,
    acquired_invalid_limit: usize,
}

impl<F: ObjectFactory> ObjectPool<F> {
    /// Create a pool and eagerly fill it with `initial_size` objects.
    ///
    /// A creation failure during the fill destroys the partial fill and
    /// propagates; a half-built pool is never handed out.
    pub(crate) fn new(
        initial_size: usize,
        capacity: Option<usize>,
        factory: F,
        validator: Box<dyn ObjectValidator<F::Object>>,
        acquired_invalid_limit: usize,
    ) -> PoolResult<Self, F::Error> {
        let mut idle = Vec::with_capacity(capacity.unwrap_or(initial_size));
        for _ in 0..initial_size {
            match factory.create() {
                Ok(object) => idle.push(object),
                Err(err) => {
                    for object in idle.drain(..) {
                        factory.destroy(object);
                    }
                    return Err(PoolError::Factory(err));
                }
            }
        }

        Ok(Self {
            state: Mutex::new(PoolState {
                idle,
                active: 0,
                disposed: false,
            }),
            slot_freed: Condvar::new(),
            factory,
            validator,
            capacity,
            initial_size,
            acquired_invalid_limit,
        })
    }

    /// Borrow an object, blocking until one is available.
    ///
    /// Waits indefinitely while the pool is at capacity with no idle objects.
    /// Fails with [`PoolError::Disposed`] if the pool is (or becomes)
    /// disposed, with [`PoolError::Factory`] if on-demand creation fails, and
    /// with [`PoolError::AcquiredInvalidLimitReached`] once more than the
    /// configured number of consecutive objects failed validation.
    pub fn acquire(&self) -> PoolResult<F::Object, F::Error> {
        Ok(self
            .acquire_inner(None)?
            .expect("blocking acquire cannot time out"))
    }

    /// Borrow an object, waiting at most `timeout`.
    ///
    /// The timeout is a single overall deadline for the whole call, not
    /// re-armed per retry attempt. Elapsing without an object is an expected
    /// outcome reported as `Ok(None)`, never an error; every error case is
    /// identical to [`acquire`](ObjectPool::acquire).
    pub fn try_acquire(&self, timeout: Duration) -> PoolResult<Option<F::Object>, F::Error> {
        self.acquire_inner(Some(Instant::now() + timeout))
    }

    fn acquire_inner(&self, deadline: Option<Instant>) -> PoolResult<Option<F::Object>, F::Error> {
        let mut discarded = 0;
        let mut state = self.state.lock();

        loop {
            // Re-checked after every wake-up; wake-ups are never trusted blindly.
            if state.disposed {
                return Err(PoolError::Disposed);
            }

            let candidate = if let Some(object) = state.idle.pop() {
                Some(object)
            } else if self.has_free_slot(&state) {
                // Created, not yet idle or active; the slot stays reserved
                // because the lock is held across the call.
                Some(self.factory.create().map_err(PoolError::Factory)?)
            } else {
                None
            };

            let Some(object) = candidate else {
                match deadline {
                    None => self.slot_freed.wait(&mut state),
                    Some(deadline) => {
                        if Instant::now() >= deadline {
                            return Ok(None);
                        }
                        let _ = self.slot_freed.wait_until(&mut state, deadline);
                    }
                }
                continue;
            };

            if self.validator.validate_on_acquire() && !self.validator.validate(&object) {
                self.factory.destroy(object);
                discarded += 1;
                if discarded > self.acquired_invalid_limit {
                    return Err(PoolError::AcquiredInvalidLimitReached { discarded });
                }
                continue;
            }

            state.active += 1;
            return Ok(Some(object));
        }
    }

    /// Hand a borrowed object back to the pool.
    ///
    /// With a validator whose `validate_on_return` flag is set, the object is
    /// validated first; failing objects are destroyed instead of re-idled.
    /// Either way the freed slot is signalled to one parked waiter.
    ///
    /// Returning to a disposed pool destroys the object and fails with
    /// [`PoolError::Disposed`]. Returning when the pool tracks no active
    /// objects is a caller error ([`PoolError::NotActive`]) and leaves the
    /// bookkeeping untouched.
    pub fn return_object(&self, object: F::Object) -> PoolResult<(), F::Error> {
        let mut state = self.state.lock();

        if state.disposed {
            // Stragglers returned after dispose are torn down here; dispose
            // itself only destroys idle objects.
            state.active = state.active.saturating_sub(1);
            drop(state);
            self.factory.destroy(object);
            return Err(PoolError::Disposed);
        }

        if state.active == 0 {
            return Err(PoolError::NotActive);
        }

        state.active -= 1;
        if self.validator.validate_on_return() && !self.validator.validate(&object) {
            self.factory.destroy(object);
        } else {
            state.idle.push(object);
        }

        self.slot_freed.notify_one();
        Ok(())
    }

    /// Dispose the pool: destroy all idle objects and wake every parked waiter.
    ///
    /// Idempotent. Subsequent [`acquire`](ObjectPool::acquire),
    /// [`try_acquire`](ObjectPool::try_acquire) and
    /// [`return_object`](ObjectPool::return_object) calls fail with
    /// [`PoolError::Disposed`] instead of blocking. Objects still checked out
    /// are the holder's responsibility and are destroyed if returned later.
    pub fn dispose(&self) {
        let mut state = self.state.lock();
        if state.disposed {
            return;
        }
        state.disposed = true;
        let drained = std::mem::take(&mut state.idle);
        self.slot_freed.notify_all();
        drop(state);

        // Outside the lock: teardown may be slow and waiters must observe
        // the disposed flag promptly.
        for object in drained {
            self.factory.destroy(object);
        }
    }

    /// Objects currently checked out.
    pub fn active_count(&self) -> usize {
        self.state.lock().active
    }

    /// Objects currently idle in the pool.
    pub fn idle_count(&self) -> usize {
        self.state.lock().idle.len()
    }

    /// The configured capacity ceiling; `None` is unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// The number of objects eagerly created at build time.
    pub fn initial_size(&self) -> usize {
        self.initial_size
    }

    /// Maximum consecutive invalid objects discarded during one acquire.
    pub fn acquired_invalid_limit(&self) -> usize {
        self.acquired_invalid_limit
    }

    /// Whether the pool has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.state.lock().disposed
    }

    fn has_free_slot(&self, state: &PoolState<F::Object>) -> bool {
        match self.capacity {
            None => true,
            Some(capacity) => state.total() < capacity,
        }
    }
}

impl<F: ObjectFactory> Drop for ObjectPool<F> {
    fn drop(&mut self) {
        self.dispose();
    }
}
