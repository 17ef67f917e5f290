//! # Async Flow
//!
//! Callback-style control flow over asynchronous units of work.
//!
//! A task is anything that does some work and eventually reports through a
//! [`Done`] completion signal, carrying an optional error and an optional
//! value. Three combinators orchestrate lists of tasks:
//!
//! - [`serial`] runs tasks one at a time, feeding each task the value its
//!   predecessor reported, and stops at the first error.
//! - [`parallel`] launches every task at once and collects the values in
//!   task order, whatever order they finish in.
//! - [`map`] turns each input value into a task through a projection and
//!   runs the result through [`parallel`].
//!
//! Each main callback fires exactly once per run. The combinators never
//! block: they return as soon as their tasks have been launched, and the
//! main callback fires from whichever completion signal finishes the run.
//!
//! ```
//! use async_flow::{map, parallel, serial, step, task};
//!
//! serial(
//!     vec![
//!         step(|_, done| done.ok(String::from("a"))),
//!         step(|input: Option<String>, done| done.ok(input.unwrap_or_default() + "b")),
//!     ],
//!     |error: Option<()>, value| assert_eq!(value.as_deref(), Some("ab")),
//! );
//!
//! parallel(
//!     vec![task(|done| done.ok(1)), task(|done| done.ok(2))],
//!     |error: Option<()>, results| assert_eq!(results, vec![Some(1), Some(2)]),
//! );
//!
//! map(
//!     vec![1, 2, 3],
//!     |value: u32, done| done.ok(value * 2),
//!     |error: Option<()>, results| assert_eq!(results, vec![Some(2), Some(4), Some(6)]),
//! );
//! ```
//!
//! Runs configured through [`FlowConfig`] go through a [`Flow`]; the free
//! functions use [`Flow::default`]. The `*_future` methods on [`Flow`]
//! expose the same runs as futures for `async` callers.

pub mod config;
pub mod error;
pub mod future;
pub mod map;
pub mod parallel;
pub mod serial;
pub mod signal;

pub use config::{Flow, FlowConfig};
pub use error::{FlowError, Result};
pub use future::{step_from_future, task_from_future, FlowFuture};
pub use serial::Chain;
pub use signal::{step, task, Done, Step, Task};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Run `tasks` in order, threading values; see [`Flow::serial`]
pub fn serial<T, E, F>(tasks: Vec<Step<T, E>>, callback: F)
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnOnce(Option<E>, Option<T>) + Send + 'static,
{
    Flow::default().serial(tasks, callback);
}

/// Launch all `tasks` and collect values by position; see [`Flow::parallel`]
pub fn parallel<T, E, F>(tasks: Vec<Task<T, E>>, callback: F)
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnOnce(Option<E>, Vec<Option<T>>) + Send + 'static,
{
    Flow::default().parallel(tasks, callback);
}

/// Project `values` into tasks and run them in parallel; see [`Flow::map`]
pub fn map<I, V, T, E, P, F>(values: I, projection: P, callback: F)
where
    I: IntoIterator<Item = V>,
    V: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    P: Fn(V, Done<T, E>) + Send + Sync + 'static,
    F: FnOnce(Option<E>, Vec<Option<T>>) + Send + 'static,
{
    Flow::default().map(values, projection, callback);
}

/// Run state stays usable even if a task panicked while a signal held the lock
pub(crate) fn lock<S>(state: &Mutex<S>) -> MutexGuard<'_, S> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
