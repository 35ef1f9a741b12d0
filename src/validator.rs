//! Validator contract deciding whether pooled objects are fit for reuse

/// Checks liveness of pooled objects, with two independent flags controlling
/// when the pool consults it.
///
/// With [`validate_on_acquire`](ObjectValidator::validate_on_acquire) true,
/// every object is validated before being handed out; objects that fail are
/// destroyed transparently and the acquire moves on to the next candidate.
/// With [`validate_on_return`](ObjectValidator::validate_on_return) true,
/// returned objects are validated before re-entering the idle set.
///
/// # Examples
///
/// ```
/// use blockpool::ObjectValidator;
///
/// struct NonEmpty;
///
/// impl ObjectValidator<String> for NonEmpty {
///     fn validate(&self, object: &String) -> bool {
///         !object.is_empty()
///     }
///
///     fn validate_on_acquire(&self) -> bool {
///         true
///     }
///
///     fn validate_on_return(&self) -> bool {
///         false
///     }
/// }
/// ```
pub trait ObjectValidator<T>: Send + Sync {
    /// Whether the object is still usable.
    fn validate(&self, object: &T) -> bool;

    /// Consult [`validate`](ObjectValidator::validate) before handing out an object.
    fn validate_on_acquire(&self) -> bool;

    /// Consult [`validate`](ObjectValidator::validate) before re-idling a returned object.
    fn validate_on_return(&self) -> bool;
}

/// The default validator: validates nothing, never consulted.
///
/// Configured pools without an explicit validator use this, so the engine
/// never has to special-case a missing validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopValidator;

impl<T> ObjectValidator<T> for NoopValidator {
    fn validate(&self, _object: &T) -> bool {
        true
    }

    fn validate_on_acquire(&self) -> bool {
        false
    }

    fn validate_on_return(&self) -> bool {
        false
    }
}
