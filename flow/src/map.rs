//! Concurrent mapping over a collection, delegated to [`Flow::parallel`]

use crate::config::Flow;
use crate::signal::{task, Done, Task};
use std::sync::Arc;

impl Flow {
    /// Run `projection` once per value, concurrently, collecting results in input order
    ///
    /// Each value becomes a zero-argument task and the list is handed to
    /// [`Flow::parallel`], so ordering and error reporting are the same.
    /// An empty input calls `callback(None, vec![])` without ever calling
    /// `projection`.
    pub fn map<I, V, T, E, P, F>(&self, values: I, projection: P, callback: F)
    where
        I: IntoIterator<Item = V>,
        V: Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
        P: Fn(V, Done<T, E>) + Send + Sync + 'static,
        F: FnOnce(Option<E>, Vec<Option<T>>) + Send + 'static,
    {
        self.parallel(project(values, projection), callback);
    }
}

pub(crate) fn project<I, V, T, E, P>(values: I, projection: P) -> Vec<Task<T, E>>
where
    I: IntoIterator<Item = V>,
    V: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    P: Fn(V, Done<T, E>) + Send + Sync + 'static,
{
    let projection = Arc::new(projection);
    values
        .into_iter()
        .map(|value| {
            let projection = Arc::clone(&projection);
            task(move |done| projection(value, done))
        })
        .collect()
}
