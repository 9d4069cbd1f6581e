//! Keyed memoization of async operations

use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

type Operation<A, T, E> = Box<dyn Fn(A) -> BoxFuture<'static, Result<T, E>> + Send + Sync>;
type KeyFn<A> = Box<dyn Fn(&A) -> String + Send + Sync>;
type SharedCall<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

/// An async operation memoized by a string key
///
/// `key_of` must be a pure function of its argument: two arguments that
/// should share a result must produce the same key.
pub struct Memoized<A, T, E> {
    op: Operation<A, T, E>,
    key_of: KeyFn<A>,
    entries: Mutex<HashMap<String, SharedCall<T, E>>>,
}

impl<A, T, E> Memoized<A, T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Wrap `op`, deriving cache keys with `key_of`
    pub fn new<F, Fut, K>(op: F, key_of: K) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        K: Fn(&A) -> String + Send + Sync + 'static,
    {
        Self {
            op: Box::new(move |arg| op(arg).boxed()),
            key_of: Box::new(key_of),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Run the operation for `arg`, or join the computation already
    /// started for its key.
    pub async fn call(&self, arg: A) -> Result<T, E> {
        let key = (self.key_of)(&arg);

        // Lookup and insert happen under one guard with no await in between,
        // so two callers can never both start `op` for the same key.
        let call = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            match entries.get(&key) {
                Some(existing) => {
                    debug!("Joining existing computation for key {}", key);
                    existing.clone()
                }
                None => {
                    debug!("Starting computation for key {}", key);
                    let call = (self.op)(arg).shared();
                    entries.insert(key, call.clone());
                    call
                }
            }
        };

        call.await
    }

    /// Number of keys seen so far, pending or resolved
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
