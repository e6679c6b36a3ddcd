//! Request handler abstraction.
use crate::h1::Request;
use crate::response::ResponseWriter;

/// A request handler.
///
/// Invoked at most once per connection, only once the request has reached
/// its done state. The handler has full discretion over what it writes; a
/// failure while producing the response (a missing file, a dead upstream) is
/// the handler's to recover, falling back to a 500 response.
pub trait Handler<IO>: Send + Sync {
    /// Handle one parsed request.
    fn call(
        &self,
        writer: ResponseWriter<IO>,
        request: Request,
    ) -> impl Future<Output = ()> + Send;
}

// ===== FromFn =====

/// Create a [`Handler`] from an async function.
pub fn from_fn<F>(f: F) -> FromFn<F> {
    FromFn { f }
}

#[derive(Debug)]
pub struct FromFn<F> {
    f: F,
}

impl<IO, F, Fut> Handler<IO> for FromFn<F>
where
    F: Fn(ResponseWriter<IO>, Request) -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send,
{
    fn call(
        &self,
        writer: ResponseWriter<IO>,
        request: Request,
    ) -> impl Future<Output = ()> + Send {
        (self.f)(writer, request)
    }
}
