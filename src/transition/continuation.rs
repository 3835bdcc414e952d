//! Success/error handlers scoped to one operation call.

use crate::domain::Request;
use crate::error::{ClientError, FacadeError, Result};

type OnSuccess<'a, R> = Box<dyn FnOnce(Request) -> R + Send + 'a>;
type OnError<'a, R> = Box<dyn FnOnce(ClientError) -> Result<R> + Send + 'a>;

/// The `(on_success, on_error)` pair of a single operation.
///
/// Without custom handlers the updated [`Request`] is returned as is and a
/// remote error comes back unchanged as [`FacadeError::Client`]:
///
/// ```
/// use connect_facades::{Continuation, Request};
///
/// let defaults: Continuation<'_, Request> = Continuation::default();
///
/// // Map the result to something else, and recover from remote errors.
/// let custom = Continuation::on_success(|request: Request| request.reason().is_some())
///     .on_error(|_error| Ok(false));
/// ```
pub struct Continuation<'a, R> {
    on_success: OnSuccess<'a, R>,
    on_error: OnError<'a, R>,
}

impl Default for Continuation<'_, Request> {
    fn default() -> Self {
        Self::on_success(|request| request)
    }
}

impl<'a, R> Continuation<'a, R> {
    /// Use `f` on success; errors keep propagating unchanged.
    pub fn on_success<F>(f: F) -> Self
    where
        F: FnOnce(Request) -> R + Send + 'a,
    {
        Self {
            on_success: Box::new(f),
            on_error: Box::new(|error| Err(FacadeError::Client(error))),
        }
    }

    /// Replace the error handler. Whatever it returns becomes the operation's result.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: FnOnce(ClientError) -> Result<R> + Send + 'a,
    {
        self.on_error = Box::new(f);
        self
    }

    pub(crate) fn succeed(self, request: Request) -> R {
        (self.on_success)(request)
    }

    pub(crate) fn fail(self, error: ClientError) -> Result<R> {
        (self.on_error)(error)
    }
}
